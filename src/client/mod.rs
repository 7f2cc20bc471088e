mod gateway_client;
mod session;

pub use gateway_client::GatewayClient;
pub use session::{check_transaction, Session};

use crate::backend::AccountStore;
use crate::core::{AccountId, Amount, Ledger, Transaction};

/// The three operations a terminal can ask of the bank, wherever it lives.
pub trait Teller {
    fn verify_user(&self, id: &AccountId) -> anyhow::Result<()>;
    fn balance(&self, id: &AccountId) -> anyhow::Result<Amount>;
    /// Returns the balance after the transaction.
    fn transact(&self, transaction: &Transaction) -> anyhow::Result<Amount>;
}

/// Talks to a ledger in the same process, bypassing the gateway.
impl<S: AccountStore> Teller for Ledger<S> {
    fn verify_user(&self, id: &AccountId) -> anyhow::Result<()> {
        Ok(self.verify_exists(id)?)
    }

    fn balance(&self, id: &AccountId) -> anyhow::Result<Amount> {
        Ok(self.get_balance(id)?)
    }

    fn transact(&self, transaction: &Transaction) -> anyhow::Result<Amount> {
        Ok(self.apply_transaction(transaction)?.balance())
    }
}
