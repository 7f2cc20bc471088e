pub mod account_id;
pub mod account;
pub mod calendar;
pub mod transaction;
pub mod ledger;
pub mod error;

pub use account_id::AccountId;
pub use account::Account;
pub use calendar::{Clock, Day, FixedClock, SystemClock};
pub use transaction::{Amount, Transaction, TransactionKind};
pub use ledger::{open_account, Ledger};
pub use error::{LedgerError, LedgerResult};
