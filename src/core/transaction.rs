use serde::{Serialize, Deserialize};
use colored::Colorize;

use crate::core::account_id::AccountId;

pub type Amount = i64;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[serde(alias = "w")]
    Withdraw,
    #[serde(alias = "d")]
    Deposit
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let disp = match self {
            Self::Withdraw => "Withdraw",
            Self::Deposit => "Deposit"
        };
        write!(f, "{}", disp)
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    /// Accepts the full name or the one-letter tag, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "w" | "withdraw" => Ok(Self::Withdraw),
            "d" | "deposit" => Ok(Self::Deposit),
            other => Err(format!("unknown transaction kind: {}", other))
        }
    }
}

/// A single request against one account. Never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub account_id: AccountId,
    pub kind: TransactionKind,
    pub amount: Amount
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} {}", self.kind.to_string().bold(), self.account_id, self.amount)
    }
}

impl Transaction {
    pub fn new(account_id: impl Into<AccountId>, kind: TransactionKind, amount: Amount) -> Transaction {
        Transaction { account_id: account_id.into(), kind, amount }
    }

    pub fn withdraw(account_id: impl Into<AccountId>, amount: Amount) -> Transaction {
        Transaction::new(account_id, TransactionKind::Withdraw, amount)
    }

    pub fn deposit(account_id: impl Into<AccountId>, amount: Amount) -> Transaction {
        Transaction::new(account_id, TransactionKind::Deposit, amount)
    }
}
