use thiserror::Error;

use crate::backend::BackendError;
use crate::core::{AccountId, Amount};

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Occurs when no record is stored under the requested account id.
    #[error("no such account: {0}")]
    AccountNotFound(AccountId),
    /// Occurs when the stored bytes for an account cannot be
    /// decoded into a valid account record.
    #[error("corrupt record for account {account}: {reason}")]
    CorruptRecord {
        account: AccountId,
        reason: String
    },
    /// Occurs when a withdrawal is attempted on an empty account
    /// or would take the balance below zero.
    #[error("insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account: AccountId,
        balance: Amount,
        requested: Amount
    },
    /// Occurs when a withdrawal would take the amount withdrawn
    /// today past the account's daily limit.
    #[error("daily withdrawal limit exceeded: {withdrawn_today} of {limit} already withdrawn, requested {requested}")]
    LimitExceeded {
        limit: Amount,
        withdrawn_today: Amount,
        requested: Amount
    },
    /// Occurs when applying an amount would overflow the integer range
    /// of the balance or of the daily counter.
    #[error("amount {requested} overflows account {account}")]
    AmountOverflow {
        account: AccountId,
        requested: Amount
    },
    /// Occurs when provisioning an account under an id that is already taken.
    #[error("account already exists: {0}")]
    AccountExists(AccountId),
    /// The underlying store failed to run the transaction.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] BackendError),
}

impl From<BackendError> for LedgerError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::KeyNotFound(key) => LedgerError::AccountNotFound(AccountId::new(key)),
            BackendError::KeyExists(key) => LedgerError::AccountExists(AccountId::new(key)),
            other => LedgerError::StoreUnavailable(other)
        }
    }
}

impl LedgerError {
    /// Only store failures are worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, LedgerError::StoreUnavailable(..))
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
