//! Route handlers for the ledger page and the transaction endpoints.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRequest;
use maud::html;

use crate::{
    AppState, Error,
    alert::Alert,
    ledger::{
        form::TransactionForm,
        view::{DisplayOptions, ledger_fragment, ledger_page},
    },
    store::TransactionStore,
    transaction::{Transaction, TransactionId},
};

/// The state needed to show and change the ledger.
#[derive(Clone)]
pub struct LedgerState {
    /// The system of record for transactions.
    pub store: Arc<dyn TransactionStore>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The symbol shown in front of amounts, e.g. "$".
    pub currency_symbol: String,
}

impl FromRef<AppState> for LedgerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone.clone(),
            currency_symbol: state.currency_symbol.clone(),
        }
    }
}

impl LedgerState {
    fn display_options(&self) -> DisplayOptions<'_> {
        DisplayOptions {
            local_timezone: &self.local_timezone,
            currency_symbol: &self.currency_symbol,
        }
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>, Error> {
        self.store
            .list()
            .await
            .inspect_err(|error| tracing::error!("could not list transactions: {error}"))
            .map_err(Error::from)
    }

    /// The ledger fragment with the latest transactions and an out-of-band
    /// alert saying `change_message`, e.g. "Transaction added".
    ///
    /// The change has already been saved when this is called, so a failed
    /// refetch says so instead of reporting the change as failed.
    async fn refreshed_ledger(&self, change_message: &str) -> Response {
        match self.list_transactions().await {
            Ok(transactions) => html! {
                (ledger_fragment(&transactions, self.display_options()))
                (Alert::SuccessSimple { message: change_message.to_owned() }.into_oob_html())
            }
            .into_response(),
            Err(error) => {
                let alert = Alert::Error {
                    message: format!("{change_message}, but the ledger could not be refreshed"),
                    details: format!(
                        "The change was saved. Use the refresh button to see the latest \
                        transactions. ({error})"
                    ),
                };

                (StatusCode::BAD_GATEWAY, alert.into_html()).into_response()
            }
        }
    }
}

/// Display the ledger.
///
/// htmx requests, e.g. from the refresh button, get only the ledger fragment.
/// If the transactions cannot be loaded, a full page request still gets the
/// page with an empty ledger and an error alert so that the user can retry.
pub async fn get_ledger_page(
    State(state): State<LedgerState>,
    HxRequest(is_htmx_request): HxRequest,
) -> Response {
    let result = state.list_transactions().await;

    match (result, is_htmx_request) {
        (Ok(transactions), true) => {
            ledger_fragment(&transactions, state.display_options()).into_response()
        }
        (Ok(transactions), false) => {
            ledger_page(&transactions, None, state.display_options()).into_response()
        }
        (Err(error), true) => error.into_alert_response(),
        (Err(error), false) => {
            let alert = Alert::Error {
                message: "Could not load transactions".to_owned(),
                details: format!("{error}. Use the refresh button to try again."),
            };

            ledger_page(&[], Some(alert), state.display_options()).into_response()
        }
    }
}

/// A route handler for creating a new transaction.
///
/// Responds with the refreshed ledger fragment on success.
pub async fn create_transaction_endpoint(
    State(state): State<LedgerState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let transaction = match form.validate() {
        Ok(transaction) => transaction,
        Err(error) => {
            tracing::debug!("rejected transaction form: {error}");
            return Error::from(error).into_alert_response();
        }
    };

    if let Err(error) = state.store.create(transaction).await {
        tracing::error!("could not create transaction: {error}");
        return Error::from(error).into_alert_response();
    }

    state.refreshed_ledger("Transaction added").await
}

/// A route handler for deleting a transaction.
///
/// Responds with the refreshed ledger fragment on success.
pub async fn delete_transaction_endpoint(
    State(state): State<LedgerState>,
    Path(transaction_id): Path<String>,
) -> Response {
    let transaction_id = TransactionId::new(transaction_id);

    if let Err(error) = state.store.delete(&transaction_id).await {
        tracing::error!("could not delete transaction {transaction_id}: {error}");
        return Error::from(error).into_alert_response();
    }

    state.refreshed_ledger("Transaction deleted").await
}
