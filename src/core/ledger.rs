use std::sync::Arc;

use log::{debug, info};

use crate::backend::AccountStore;
use crate::core::account::Account;
use crate::core::account_id::AccountId;
use crate::core::calendar::{Clock, SystemClock};
use crate::core::error::LedgerResult;
use crate::core::transaction::{Amount, Transaction};

/// The account ledger engine.
///
/// Holds no account state of its own: every operation runs as exactly one
/// store transaction, and isolation between concurrent callers is whatever
/// the store's `update` guarantees per key.
pub struct Ledger<S> {
    store: S,
    clock: Arc<dyn Clock>
}

impl<S: AccountStore> Ledger<S> {
    pub fn new(store: S) -> Ledger<S> {
        Ledger::with_clock(store, SystemClock)
    }

    pub fn with_clock(store: S, clock: impl Clock + 'static) -> Ledger<S> {
        Ledger { store, clock: Arc::new(clock) }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn verify_exists(&self, id: &AccountId) -> LedgerResult<()> {
        self.store.read(id.as_str())?;
        return Ok(());
    }

    pub fn get_balance(&self, id: &AccountId) -> LedgerResult<Amount> {
        Ok(self.account(id)?.balance())
    }

    /// Read-only snapshot of the whole record.
    pub fn account(&self, id: &AccountId) -> LedgerResult<Account> {
        let bytes = self.store.read(id.as_str())?;
        Account::decode(id, &bytes)
    }

    /// Reads, mutates and writes back the account in a single store
    /// transaction, returning the committed state.
    pub fn apply_transaction(&self, transaction: &Transaction) -> LedgerResult<Account> {
        let id = &transaction.account_id;

        let committed = self.store.update(id.as_str(), |bytes: &[u8]| -> LedgerResult<(Vec<u8>, Account)> {
            let mut account = Account::decode(id, bytes)?;
            // the day is taken once the record is held
            let today = self.clock.today();
            account.apply(id, transaction.kind, transaction.amount, today)?;
            Ok((account.encode()?, account))
        });

        match &committed {
            Ok(account) => info!("{} committed, balance now {}", transaction, account.balance()),
            Err(err) => debug!("{} rejected: {}", transaction, err)
        }
        return committed;
    }
}

/// Provisions a new account directly in the store. The ledger never creates
/// accounts itself; this is for administration and seeding.
pub fn open_account<S: AccountStore>(store: &S, id: &AccountId, account: &Account) -> LedgerResult<()> {
    store.insert(id.as_str(), account.encode()?)?;
    info!("opened account {} with balance {}", id, account.balance());
    return Ok(());
}
