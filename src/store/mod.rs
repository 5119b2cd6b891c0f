//! Access to the system of record for transactions.
//!
//! The app never keeps transactions between requests: every page render lists
//! the whole collection again, and every mutation is followed by a fresh list.

mod http;
mod memory;

use async_trait::async_trait;

use crate::transaction::{NewTransaction, Transaction, TransactionId};

pub use http::HttpTransactionStore;
pub use memory::InMemoryTransactionStore;

/// Errors from talking to the transaction store.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StoreError {
    /// The request could not be sent or no response arrived in time.
    #[error("could not reach the transaction store: {0}")]
    Network(String),

    /// The store answered with an unsuccessful status code.
    #[error("the transaction store responded with status {status}: {message}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body, or the canonical reason for the status.
        message: String,
    },

    /// The transaction does not exist in the store.
    #[error("transaction {0} does not exist")]
    NotFound(TransactionId),

    /// The store answered with a body that could not be understood.
    #[error("could not read the response from the transaction store: {0}")]
    MalformedResponse(String),

    /// The lock guarding an in-process store was poisoned.
    #[error("could not acquire the transaction store lock")]
    LockPoisoned,
}

/// The operations the app needs from the store.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Get every transaction, in the order the store returns them.
    async fn list(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Create a transaction and return it as stored.
    ///
    /// Callers validate `transaction` before calling this.
    async fn create(&self, transaction: NewTransaction) -> Result<Transaction, StoreError>;

    /// Delete the transaction with `id`.
    ///
    /// # Errors
    /// Returns [StoreError::NotFound] if there is no such transaction.
    async fn delete(&self, id: &TransactionId) -> Result<(), StoreError>;
}
