mod common;

use axum::http::StatusCode;
use sqlx::SqlitePool;
use url_shortener::infrastructure::safety::FailurePolicy;

#[sqlx::test]
async fn test_health_endpoint_success(pool: SqlitePool) {
    let server = common::test_server(common::create_test_state(pool));

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["safety"]["status"], "disabled");
    assert_eq!(json["checks"]["safety"]["message"], "disabled");
}

#[sqlx::test]
async fn test_health_reports_safety_policy(pool: SqlitePool) {
    let state =
        common::create_test_state_with_oracle(pool, common::unsafe_oracle(FailurePolicy::FailOpen));
    let server = common::test_server(state);

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["checks"]["safety"]["status"], "ok");
    assert_eq!(json["checks"]["safety"]["message"], "fail-open");
}

#[sqlx::test]
async fn test_health_endpoint_structure(pool: SqlitePool) {
    let server = common::test_server(common::create_test_state(pool));

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("database").is_some());
    assert!(json["checks"].get("safety").is_some());
}

#[sqlx::test]
async fn test_health_degraded_when_database_closed(pool: SqlitePool) {
    let server = common::test_server(common::create_test_state(pool.clone()));
    pool.close().await;

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
}
