//! Request and response bodies shared by the gateway and its clients.

use serde::{Serialize, Deserialize};

use crate::core::{Amount, TransactionKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactRequest {
    pub kind: TransactionKind,
    pub amount: Amount
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: Amount
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error kind, e.g. `LIMIT_EXCEEDED`
    pub code: String,
    pub message: String
}
