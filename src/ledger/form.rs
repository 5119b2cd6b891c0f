//! The form for adding a transaction and its validation.

use serde::{Deserialize, Serialize};

use crate::transaction::NewTransaction;

/// Reasons a submitted transaction is rejected before it reaches the store.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum InputValidationError {
    /// The description was empty or only whitespace.
    #[error("the description cannot be empty")]
    EmptyDescription,

    /// The amount field was left empty.
    #[error("the amount cannot be empty")]
    MissingAmount,

    /// The amount was not a finite number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),
}

/// The form data for adding a transaction.
///
/// Both fields are kept as text so that bad input becomes a validation
/// alert instead of a form rejection.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TransactionForm {
    /// Text describing the transaction.
    #[serde(default)]
    pub description: String,
    /// The signed amount: negative for an expense, positive for income.
    #[serde(default)]
    pub amount: String,
}

impl TransactionForm {
    /// Check the form and convert it into a transaction for the store.
    ///
    /// # Errors
    /// Returns an [InputValidationError] if the description is empty or the
    /// amount is empty or not a finite number.
    pub fn validate(self) -> Result<NewTransaction, InputValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(InputValidationError::EmptyDescription);
        }

        let amount = self.amount.trim();
        if amount.is_empty() {
            return Err(InputValidationError::MissingAmount);
        }

        let amount = amount
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite())
            .ok_or_else(|| InputValidationError::InvalidAmount(amount.to_owned()))?;

        Ok(NewTransaction {
            description: description.to_owned(),
            amount,
        })
    }
}
