//! Implements a struct that holds the state of the web server.

use std::sync::Arc;

use crate::{Error, store::TransactionStore, timezone::is_valid_timezone};

/// The state of the web server.
#[derive(Clone)]
pub struct AppState {
    /// The system of record for transactions.
    pub store: Arc<dyn TransactionStore>,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The symbol shown in front of amounts, e.g. "$".
    pub currency_symbol: String,
}

impl AppState {
    /// Create a new [AppState] that reads and writes transactions through `store`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `local_timezone` is not a known timezone.
    pub fn new(
        store: impl TransactionStore + 'static,
        local_timezone: &str,
        currency_symbol: &str,
    ) -> Result<Self, Error> {
        if !is_valid_timezone(local_timezone) {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        Ok(Self {
            store: Arc::new(store),
            local_timezone: local_timezone.to_owned(),
            currency_symbol: currency_symbol.to_owned(),
        })
    }
}
