use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json
};
use log::error;

use crate::core::{Amount, LedgerError};
use crate::server::dto::ErrorBody;

#[derive(Debug)]
pub enum ServerError {
    Ledger(LedgerError),
    /// Amounts must be strictly positive at the gateway.
    InvalidAmount(Amount),
    InternalError(anyhow::Error)
}

impl ServerError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Ledger(err) => match err {
                LedgerError::AccountNotFound(..) => (StatusCode::NOT_FOUND, "ACCOUNT_NOT_FOUND"),
                LedgerError::CorruptRecord { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "CORRUPT_RECORD"),
                LedgerError::InsufficientFunds { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_FUNDS"),
                LedgerError::LimitExceeded { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "LIMIT_EXCEEDED"),
                LedgerError::AmountOverflow { .. } => (StatusCode::BAD_REQUEST, "AMOUNT_OVERFLOW"),
                LedgerError::AccountExists(..) => (StatusCode::CONFLICT, "ACCOUNT_EXISTS"),
                LedgerError::StoreUnavailable(..) => (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
            },
            Self::InvalidAmount(..) => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
            Self::InternalError(..) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    }

    /// Worth retrying unchanged.
    fn is_transient(&self) -> bool {
        matches!(self, Self::Ledger(err) if err.is_transient())
    }

    fn message(&self) -> String {
        match self {
            Self::Ledger(err) => err.to_string(),
            Self::InvalidAmount(amount) => format!("amount must be positive, got {}", amount),
            Self::InternalError(err) => format!("Internal error: {}", err)
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.message();
        if status.is_server_error() {
            error!("{}: {}", code, message);
        }
        let body = Json(ErrorBody { code: code.to_owned(), message });
        if self.is_transient() {
            return (status, [(header::RETRY_AFTER, "1")], body).into_response();
        }
        (status, body).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::InternalError(err.into())
    }
}
