mod common;

use sqlx::SqlitePool;
use std::sync::Arc;
use url_shortener::domain::entities::{LinkPatch, NewLink};
use url_shortener::domain::repositories::LinkRepository;
use url_shortener::error::AppError;
use url_shortener::infrastructure::persistence::SqliteLinkRepository;

fn new_link(key: &str, user_id: i64) -> NewLink {
    NewLink {
        key: key.to_string(),
        target_url: "https://example.com".to_string(),
        user_id,
        password_hash: None,
    }
}

#[sqlx::test]
async fn test_create_link(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    let repo = SqliteLinkRepository::new(Arc::new(pool));

    let link = repo.create(new_link("abcDEF1234", user_id)).await.unwrap();

    assert_eq!(link.key, "abcDEF1234");
    assert_eq!(link.target_url, "https://example.com");
    assert_eq!(link.user_id, user_id);
    assert_eq!(link.clicks, 0);
    assert!(!link.is_password_protected());
}

#[sqlx::test]
async fn test_create_duplicate_key_conflicts(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    let repo = SqliteLinkRepository::new(Arc::new(pool));

    repo.create(new_link("dupkey0001", user_id)).await.unwrap();
    let result = repo.create(new_link("dupkey0001", user_id)).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
async fn test_find_by_key(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    common::create_test_link(&pool, "findme0001", "https://example.com/a", user_id, None).await;

    let repo = SqliteLinkRepository::new(Arc::new(pool));

    let link = repo.find_by_key("findme0001").await.unwrap().unwrap();
    assert_eq!(link.target_url, "https://example.com/a");

    assert!(repo.find_by_key("missing000").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_list_by_user_is_scoped(pool: SqlitePool) {
    let alice = common::create_test_user(&pool, "alice").await;
    let bob = common::create_test_user(&pool, "bob").await;
    common::create_test_link(&pool, "alice00001", "https://a.example", alice, None).await;
    common::create_test_link(&pool, "alice00002", "https://b.example", alice, None).await;
    common::create_test_link(&pool, "bob0000001", "https://c.example", bob, None).await;

    let repo = SqliteLinkRepository::new(Arc::new(pool));

    let links = repo.list_by_user(alice).await.unwrap();
    assert_eq!(links.len(), 2);
    assert!(links.iter().all(|l| l.user_id == alice));

    assert_eq!(repo.list_by_user(bob).await.unwrap().len(), 1);
}

#[sqlx::test]
async fn test_update_target_keeps_password(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    let id = common::create_test_link(
        &pool,
        "upd0000001",
        "https://old.example",
        user_id,
        Some("secret-pass"),
    )
    .await;

    let repo = SqliteLinkRepository::new(Arc::new(pool));

    let link = repo
        .update(
            id,
            LinkPatch {
                target_url: Some("https://new.example".to_string()),
                password_hash: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(link.target_url, "https://new.example");
    assert!(link.is_password_protected());
}

#[sqlx::test]
async fn test_update_clears_password(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    let id = common::create_test_link(
        &pool,
        "upd0000002",
        "https://old.example",
        user_id,
        Some("secret-pass"),
    )
    .await;

    let repo = SqliteLinkRepository::new(Arc::new(pool));

    let link = repo
        .update(
            id,
            LinkPatch {
                target_url: None,
                password_hash: Some(None),
            },
        )
        .await
        .unwrap();

    assert_eq!(link.target_url, "https://old.example");
    assert!(!link.is_password_protected());
}

#[sqlx::test]
async fn test_update_missing_link(pool: SqlitePool) {
    let repo = SqliteLinkRepository::new(Arc::new(pool));

    let result = repo.update(404, LinkPatch::default()).await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
async fn test_delete_link(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    let id = common::create_test_link(&pool, "del0000001", "https://example.com", user_id, None)
        .await;

    let repo = SqliteLinkRepository::new(Arc::new(pool));

    assert!(repo.delete(id).await.unwrap());
    assert!(!repo.delete(id).await.unwrap());
    assert!(repo.find_by_id(id).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_increment_clicks(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    let id = common::create_test_link(&pool, "clk0000001", "https://example.com", user_id, None)
        .await;

    let repo = SqliteLinkRepository::new(Arc::new(pool.clone()));

    repo.increment_clicks(id).await.unwrap();
    repo.increment_clicks(id).await.unwrap();

    assert_eq!(common::link_clicks(&pool, "clk0000001").await, 2);
    assert_eq!(repo.total_clicks().await.unwrap(), 2);
}

#[sqlx::test]
async fn test_increment_clicks_missing_link(pool: SqlitePool) {
    let repo = SqliteLinkRepository::new(Arc::new(pool));

    let result = repo.increment_clicks(12345).await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
async fn test_concurrent_increments_are_not_lost(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    let id = common::create_test_link(&pool, "race000001", "https://example.com", user_id, None)
        .await;

    let repo = Arc::new(SqliteLinkRepository::new(Arc::new(pool.clone())));

    let tasks: Vec<_> = (0..25)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.increment_clicks(id).await })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(common::link_clicks(&pool, "race000001").await, 25);
}

#[sqlx::test]
async fn test_deleting_user_cascades_links(pool: SqlitePool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    common::create_test_link(&pool, "cas0000001", "https://example.com", user_id, None).await;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let repo = SqliteLinkRepository::new(Arc::new(pool));
    assert_eq!(repo.count().await.unwrap(), 0);
}
