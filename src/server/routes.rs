//! HTTP surface of the ledger.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | /health | liveness |
//! | GET | /accounts/:id | verify the account exists |
//! | GET | /accounts/:id/balance | current balance |
//! | POST | /accounts/:id/transactions | deposit or withdraw |
//!
//! Handlers only translate between HTTP and the ledger. Ledger calls block
//! on the store, so they run on tokio's blocking pool.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router
};
use log::debug;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::backend::AccountStore;
use crate::core::{AccountId, Ledger, LedgerResult, Transaction};
use crate::server::dto::{BalanceResponse, HealthResponse, TransactRequest};
use crate::server::error::ServerError;

type SharedLedger<S> = Arc<Ledger<S>>;

pub fn router<S: AccountStore + 'static>(ledger: SharedLedger<S>, timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/accounts/:id", get(verify_user::<S>))
        .route("/accounts/:id/balance", get(balance::<S>))
        .route("/accounts/:id/transactions", post(transact::<S>))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(ledger)
}

async fn run_blocking<T, F>(call: F) -> Result<T, ServerError>
where
    F: FnOnce() -> LedgerResult<T> + Send + 'static,
    T: Send + 'static
{
    let result = tokio::task::spawn_blocking(call).await?;
    Ok(result?)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned()
    })
}

async fn verify_user<S: AccountStore + 'static>(
    State(ledger): State<SharedLedger<S>>,
    Path(id): Path<String>
) -> Result<StatusCode, ServerError> {
    let id = AccountId::new(id);
    debug!("verify {}", id);
    run_blocking(move || ledger.verify_exists(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn balance<S: AccountStore + 'static>(
    State(ledger): State<SharedLedger<S>>,
    Path(id): Path<String>
) -> Result<Json<BalanceResponse>, ServerError> {
    let id = AccountId::new(id);
    let balance = run_blocking(move || ledger.get_balance(&id)).await?;
    Ok(Json(BalanceResponse { balance }))
}

async fn transact<S: AccountStore + 'static>(
    State(ledger): State<SharedLedger<S>>,
    Path(id): Path<String>,
    Json(request): Json<TransactRequest>
) -> Result<Json<BalanceResponse>, ServerError> {
    if request.amount <= 0 {
        return Err(ServerError::InvalidAmount(request.amount));
    }
    let transaction = Transaction::new(AccountId::new(id), request.kind, request.amount);
    let account = run_blocking(move || ledger.apply_transaction(&transaction)).await?;
    Ok(Json(BalanceResponse { balance: account.balance() }))
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{self, Body},
        http::{Request, StatusCode},
        Router
    };
    use rstest::{fixture, rstest};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::backend::{AccountStore, JsonStore, MemoryStore};
    use crate::core::{open_account, Account, FixedClock, Ledger};
    use super::router;

    const TODAY: u32 = 21;

    #[fixture]
    fn ledger() -> Arc<Ledger<MemoryStore>> {
        let store = MemoryStore::new();
        open_account(&store, &"Bilbo".into(), &Account::new(1000, 500).with_withdrawn(480, TODAY)).unwrap();
        open_account(&store, &"Frodo".into(), &Account::new(0, 500)).unwrap();
        store.insert("Gimli", b"{}".to_vec()).unwrap();
        Arc::new(Ledger::with_clock(store, FixedClock(TODAY)))
    }

    fn app(ledger: &Arc<Ledger<MemoryStore>>) -> Router {
        router(Arc::clone(ledger), Duration::from_secs(5))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, payload: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    #[rstest]
    #[tokio::test]
    async fn health(ledger: Arc<Ledger<MemoryStore>>) {
        let (status, body) = send(app(&ledger), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[rstest]
    #[case("/accounts/Bilbo", StatusCode::NO_CONTENT)]
    #[case("/accounts/ghost", StatusCode::NOT_FOUND)]
    #[tokio::test]
    async fn verify_user(ledger: Arc<Ledger<MemoryStore>>, #[case] uri: &str, #[case] expected: StatusCode) {
        let (status, _) = send(app(&ledger), get(uri)).await;
        assert_eq!(status, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn balance(ledger: Arc<Ledger<MemoryStore>>) {
        let (status, body) = send(app(&ledger), get("/accounts/Bilbo/balance")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"balance": 1000}));

        let (status, body) = send(app(&ledger), get("/accounts/ghost/balance")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ACCOUNT_NOT_FOUND");

        let (status, body) = send(app(&ledger), get("/accounts/Gimli/balance")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "CORRUPT_RECORD");
    }

    #[rstest]
    #[tokio::test]
    async fn withdraw_up_to_limit(ledger: Arc<Ledger<MemoryStore>>) {
        let uri = "/accounts/Bilbo/transactions";

        let (status, body) = send(app(&ledger), post(uri, json!({"kind": "withdraw", "amount": 30}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "LIMIT_EXCEEDED");

        let (status, body) = send(app(&ledger), post(uri, json!({"kind": "w", "amount": 20}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"balance": 980}));
    }

    #[rstest]
    #[tokio::test]
    async fn deposit_and_overdraw(ledger: Arc<Ledger<MemoryStore>>) {
        let uri = "/accounts/Frodo/transactions";

        let (status, body) = send(app(&ledger), post(uri, json!({"kind": "withdraw", "amount": 20}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "INSUFFICIENT_FUNDS");

        let (status, body) = send(app(&ledger), post(uri, json!({"kind": "deposit", "amount": 50}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"balance": 50}));
    }

    #[rstest]
    #[case(0)]
    #[case(-20)]
    #[tokio::test]
    async fn non_positive_amount(ledger: Arc<Ledger<MemoryStore>>, #[case] amount: i64) {
        let before = ledger.store().read("Bilbo").unwrap();
        let request = post("/accounts/Bilbo/transactions", json!({"kind": "deposit", "amount": amount}));

        let (status, body) = send(app(&ledger), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_AMOUNT");
        assert_eq!(ledger.store().read("Bilbo").unwrap(), before);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_kind(ledger: Arc<Ledger<MemoryStore>>) {
        let request = post("/accounts/Bilbo/transactions", json!({"kind": "transfer", "amount": 20}));
        let response = app(&ledger).oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[rstest]
    #[tokio::test]
    async fn transact_on_ghost(ledger: Arc<Ledger<MemoryStore>>) {
        let request = post("/accounts/ghost/transactions", json!({"kind": "withdraw", "amount": 20}));
        let (status, _) = send(app(&ledger), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(ledger.store().keys().unwrap(), vec!["Bilbo", "Frodo", "Gimli"]);
    }

    #[tokio::test]
    async fn store_failure_is_retryable() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("accounts.json")).unwrap();
        open_account(&store, &"Bilbo".into(), &Account::new(1000, 500)).unwrap();
        std::fs::remove_file(store.path()).unwrap();
        let ledger = Arc::new(Ledger::with_clock(store, FixedClock(TODAY)));
        let app = || router(Arc::clone(&ledger), Duration::from_secs(5));

        let response = app().oneshot(get("/accounts/Bilbo/balance")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()["retry-after"], "1");

        let request = post("/accounts/Bilbo/transactions", json!({"kind": "withdraw", "amount": 20}));
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "STORE_UNAVAILABLE");
    }

    #[rstest]
    #[tokio::test]
    async fn rejections_are_not_retryable(ledger: Arc<Ledger<MemoryStore>>) {
        let response = app(&ledger).oneshot(get("/accounts/ghost/balance")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get("retry-after").is_none());
    }
}
