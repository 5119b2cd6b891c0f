//! A transaction store that lives in the server process.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    store::{StoreError, TransactionStore},
    transaction::{Amount, NewTransaction, Transaction, TransactionId},
};

/// Keeps transactions in memory, in creation order.
///
/// IDs are assigned from a counter starting at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryTransactionStore {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    transactions: Vec<Transaction>,
    last_id: u64,
}

impl State {
    fn insert(&mut self, transaction: NewTransaction) -> Transaction {
        self.last_id += 1;

        let transaction = Transaction {
            id: TransactionId::new(self.last_id.to_string()),
            description: transaction.description,
            amount: Amount::Number(transaction.amount),
            created_at: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default(),
        };

        self.transactions.push(transaction.clone());
        transaction
    }
}

impl InMemoryTransactionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `transactions`, in order.
    pub fn with_transactions(transactions: impl IntoIterator<Item = NewTransaction>) -> Self {
        let mut state = State::default();

        for transaction in transactions {
            state.insert(transaction);
        }

        Self {
            state: Mutex::new(state),
        }
    }

    /// Create a store with a few example transactions for trying out the app.
    pub fn with_sample_data() -> Self {
        let sample = [
            ("Salary", 2800.0),
            ("Rent", -1150.0),
            ("Groceries", -214.37),
            ("Freelance invoice", 640.0),
            ("Electricity bill", -89.9),
            ("Cinema", -24.0),
        ];

        Self::with_transactions(sample.map(|(description, amount)| NewTransaction {
            description: description.to_owned(),
            amount,
        }))
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state.lock().map_err(|error| {
            tracing::error!("could not acquire the in-memory store lock: {error}");
            StoreError::LockPoisoned
        })
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn list(&self) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.lock()?.transactions.clone())
    }

    async fn create(&self, transaction: NewTransaction) -> Result<Transaction, StoreError> {
        Ok(self.lock()?.insert(transaction))
    }

    async fn delete(&self, id: &TransactionId) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let count_before = state.transactions.len();

        state.transactions.retain(|transaction| &transaction.id != id);

        if state.transactions.len() == count_before {
            Err(StoreError::NotFound(id.clone()))
        } else {
            Ok(())
        }
    }
}
