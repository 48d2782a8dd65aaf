mod common;

use axum::http::StatusCode;
use sqlx::SqlitePool;
use url_shortener::infrastructure::safety::FailurePolicy;

#[sqlx::test]
async fn test_redirect_success(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    common::create_test_link(&pool, "go00000001", "https://example.com/page", user_id, None)
        .await;

    let server = common::test_server(common::create_test_state(pool.clone()));

    let response = server.get("/go00000001").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "https://example.com/page");
    assert_eq!(common::link_clicks(&pool, "go00000001").await, 1);
}

#[sqlx::test]
async fn test_redirect_counts_every_visit(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    common::create_test_link(&pool, "go00000002", "https://example.com", user_id, None).await;

    let server = common::test_server(common::create_test_state(pool.clone()));

    for _ in 0..3 {
        server
            .get("/go00000002")
            .await
            .assert_status(StatusCode::TEMPORARY_REDIRECT);
    }

    assert_eq!(common::link_clicks(&pool, "go00000002").await, 3);
}

#[sqlx::test]
async fn test_redirect_unknown_key(pool: SqlitePool) {
    let server = common::test_server(common::create_test_state(pool));

    let response = server.get("/nope000000").await;

    response.assert_status_not_found();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "not_found");
}

#[sqlx::test]
async fn test_gated_link_requires_password(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    common::create_test_link(
        &pool,
        "gate000001",
        "https://example.com/secret",
        user_id,
        Some("open-sesame"),
    )
    .await;

    let server = common::test_server(common::create_test_state(pool.clone()));

    let response = server.get("/gate000001").await;

    response.assert_status_unauthorized();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "password_required");
    assert_eq!(common::link_clicks(&pool, "gate000001").await, 0);
}

#[sqlx::test]
async fn test_gated_link_shows_form_to_browsers(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    common::create_test_link(
        &pool,
        "gate000002",
        "https://example.com/secret",
        user_id,
        Some("open-sesame"),
    )
    .await;

    let server = common::test_server(common::create_test_state(pool));

    let response = server
        .get("/gate000002")
        .add_header("Accept", "text/html,application/xhtml+xml")
        .await;

    response.assert_status_unauthorized();
    let html = response.text();
    assert!(html.contains("password protected"));
    assert!(html.contains("gate000002"));
}

#[sqlx::test]
async fn test_gated_link_with_correct_password(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    common::create_test_link(
        &pool,
        "gate000003",
        "https://example.com/secret",
        user_id,
        Some("open-sesame"),
    )
    .await;

    let server = common::test_server(common::create_test_state(pool.clone()));

    let response = server
        .post("/gate000003")
        .form(&[("password", "open-sesame")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "https://example.com/secret");
    assert_eq!(common::link_clicks(&pool, "gate000003").await, 1);
}

#[sqlx::test]
async fn test_gated_link_with_wrong_password(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    common::create_test_link(
        &pool,
        "gate000004",
        "https://example.com/secret",
        user_id,
        Some("open-sesame"),
    )
    .await;

    let server = common::test_server(common::create_test_state(pool.clone()));

    let response = server
        .post("/gate000004")
        .form(&[("password", "guess")])
        .await;

    response.assert_status_unauthorized();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "unauthorized");
    assert_eq!(common::link_clicks(&pool, "gate000004").await, 0);
}

#[sqlx::test]
async fn test_gated_link_with_empty_password(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    common::create_test_link(
        &pool,
        "gate000005",
        "https://example.com/secret",
        user_id,
        Some("open-sesame"),
    )
    .await;

    let server = common::test_server(common::create_test_state(pool));

    let response = server.post("/gate000005").form(&[("password", "")]).await;

    response.assert_status_unauthorized();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "password_required");
}

#[sqlx::test]
async fn test_redirect_to_unsafe_target_is_blocked(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    let target = format!("https://{}/landing", common::MALWARE_HOST);
    common::create_test_link(&pool, "bad0000001", &target, user_id, None).await;

    let state = common::create_test_state_with_oracle(
        pool.clone(),
        common::unsafe_oracle(FailurePolicy::FailOpen),
    );
    let server = common::test_server(state);

    let response = server.get("/bad0000001").await;

    response.assert_status_forbidden();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "unsafe_url");
    assert_eq!(common::link_clicks(&pool, "bad0000001").await, 0);
}

#[sqlx::test]
async fn test_redirect_when_oracle_unavailable_fails_closed(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    common::create_test_link(&pool, "down000001", "https://example.com", user_id, None).await;

    let state = common::create_test_state_with_oracle(
        pool.clone(),
        common::unsafe_oracle(FailurePolicy::FailClosed),
    );
    let server = common::test_server(state);

    let response = server.get("/down000001").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body = response.text();
    assert!(body.contains("dependency_unavailable"));
    assert!(!body.contains(common::SAFETY_API_KEY), "{body}");
    assert!(!body.contains("127.0.0.1"), "{body}");
    assert_eq!(common::link_clicks(&pool, "down000001").await, 0);
}

#[sqlx::test]
async fn test_redirect_when_oracle_unavailable_fails_open(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    common::create_test_link(&pool, "down000002", "https://example.com", user_id, None).await;

    let state = common::create_test_state_with_oracle(
        pool.clone(),
        common::unsafe_oracle(FailurePolicy::FailOpen),
    );
    let server = common::test_server(state);

    let response = server.get("/down000002").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(common::link_clicks(&pool, "down000002").await, 1);
}

#[sqlx::test]
async fn test_concurrent_resolutions_count_every_click(pool: SqlitePool) {
    const RESOLUTIONS: usize = 30;

    let user_id = common::create_test_user(&pool, "alice").await;
    common::create_test_link(&pool, "busy000001", "https://example.com", user_id, None).await;

    let state = common::create_test_state(pool.clone());
    let server = common::test_server(state.clone());
    for _ in 0..2 {
        server
            .get("/busy000001")
            .await
            .assert_status(StatusCode::TEMPORARY_REDIRECT);
    }
    let before = common::link_clicks(&pool, "busy000001").await;

    let handles: Vec<_> = (0..RESOLUTIONS)
        .map(|_| {
            let resolver = state.link_resolver.clone();
            tokio::spawn(async move { resolver.resolve("busy000001", None).await })
        })
        .collect();

    for handle in handles {
        let target = handle.await.unwrap().unwrap();
        assert_eq!(target, "https://example.com");
    }

    assert_eq!(
        common::link_clicks(&pool, "busy000001").await,
        before + RESOLUTIONS as i64
    );
}
