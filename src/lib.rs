//! Pennywise is a web app for keeping track of personal income and expenses.
//!
//! The server renders the ledger page, a summary of all transactions followed
//! by the transaction table, and forwards changes to a transaction store.
//! The store is either a REST API ([HttpTransactionStore]) or kept in the
//! server process ([InMemoryTransactionStore]).

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod endpoints;
mod error;
mod html;
mod ledger;
mod logging;
mod metrics;
mod not_found;
mod routing;
mod store;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use error::Error;
pub use ledger::{InputValidationError, TransactionForm};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use metrics::{MAX_RATIO, Metrics, compute_metrics};
pub use routing::build_router;
pub use store::{HttpTransactionStore, InMemoryTransactionStore, StoreError, TransactionStore};
pub use timezone::is_valid_timezone;
pub use transaction::{Amount, NewTransaction, Transaction, TransactionId};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
