pub mod core;
pub mod backend;
pub mod server;
pub mod client;

pub use crate::core::{Account, AccountId, Ledger, LedgerError, Transaction, TransactionKind};
pub use crate::core::{account, ledger, transaction};
