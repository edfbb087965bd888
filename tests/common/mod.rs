use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;
use stock_server::core::AppState;
use stock_server::storage::MemoryStore;

/// State backed by the in-memory store. Kept alongside the server so tests
/// can inspect the write-call counter.
pub fn create_test_state() -> Arc<AppState<MemoryStore>> {
    AppState::new(MemoryStore::new())
}

pub fn create_test_server(state: Arc<AppState<MemoryStore>>) -> TestServer {
    let app = stock_server::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Creates a record over the API and returns the response body.
pub async fn seed(server: &TestServer, entity: &str, body: Value) -> Value {
    let response = server.post(&format!("/api/{entity}")).json(&body).await;
    assert_eq!(
        response.status_code(),
        201,
        "seeding {entity} failed: {}",
        response.text()
    );
    response.json()
}

pub async fn seed_enterprise(server: &TestServer, name: &str) -> Value {
    seed(server, "enterprise", json!({ "name": name })).await
}

pub async fn seed_warehouse(server: &TestServer, code: &str, enterprise_id: i64) -> Value {
    seed(
        server,
        "warehouse",
        json!({ "code": code, "name": "Main", "enterprise_id": enterprise_id }),
    )
    .await
}
