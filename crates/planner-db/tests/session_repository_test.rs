//! Integration tests for Session repository using in-memory SurrealDB.

use chrono::{Duration, Utc};
use planner_core::models::session::CreateSession;
use planner_core::models::user::CreateUser;
use planner_core::repository::{SessionRepository, UserRepository};
use planner_db::repository::{SurrealSessionRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> (Surreal<Db>, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    planner_db::run_migrations(&db).await.unwrap();

    let user = SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            username: "alice".into(),
            password_hash: "hash".into(),
        })
        .await
        .unwrap();

    (db, user.id)
}

fn session(user_id: Uuid, token_hash: &str, ttl: Duration) -> CreateSession {
    CreateSession {
        user_id,
        token_hash: token_hash.into(),
        expires_at: Utc::now() + ttl,
    }
}

#[tokio::test]
async fn create_and_find_by_token_hash() {
    let (db, user_id) = setup().await;
    let repo = SurrealSessionRepository::new(db);

    let created = repo
        .create(session(user_id, "unique_token_hash", Duration::hours(1)))
        .await
        .unwrap();
    assert_eq!(created.user_id, user_id);

    let fetched = repo.get_by_token_hash("unique_token_hash").await.unwrap();
    assert_eq!(fetched.id, created.id);
}

#[tokio::test]
async fn invalidate_session() {
    let (db, user_id) = setup().await;
    let repo = SurrealSessionRepository::new(db);

    let created = repo
        .create(session(user_id, "to_invalidate", Duration::hours(1)))
        .await
        .unwrap();
    repo.invalidate(created.id).await.unwrap();

    let result = repo.get_by_token_hash("to_invalidate").await;
    assert!(result.is_err(), "invalidated session should not be found");
}

#[tokio::test]
async fn invalidate_user_sessions() {
    let (db, user_id) = setup().await;
    let repo = SurrealSessionRepository::new(db);

    for i in 0..3 {
        repo.create(session(user_id, &format!("session_{i}"), Duration::hours(1)))
            .await
            .unwrap();
    }

    repo.invalidate_user_sessions(user_id).await.unwrap();

    for i in 0..3 {
        assert!(repo.get_by_token_hash(&format!("session_{i}")).await.is_err());
    }
}

#[tokio::test]
async fn cleanup_expired_only_removes_expired() {
    let (db, user_id) = setup().await;
    let repo = SurrealSessionRepository::new(db);

    repo.create(session(user_id, "expired_1", -Duration::hours(1)))
        .await
        .unwrap();
    repo.create(session(user_id, "expired_2", -Duration::minutes(5)))
        .await
        .unwrap();
    repo.create(session(user_id, "alive", Duration::hours(1)))
        .await
        .unwrap();

    let removed = repo.cleanup_expired().await.unwrap();
    assert_eq!(removed, 2);

    assert!(repo.get_by_token_hash("alive").await.is_ok());
    assert!(repo.get_by_token_hash("expired_1").await.is_err());
}
