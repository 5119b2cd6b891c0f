//! The ledger page: a summary of all transactions, the transaction table and
//! the endpoints for adding and deleting transactions.

mod form;
mod handlers;
mod view;

pub use form::{InputValidationError, TransactionForm};
pub use handlers::{create_transaction_endpoint, delete_transaction_endpoint, get_ledger_page};
