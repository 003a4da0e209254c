//! SurrealDB implementation of [`UserRepository`].
//!
//! Creating a user also creates its profile; deleting a user removes
//! everything hanging off that profile.

use chrono::{DateTime, Utc};
use planner_core::error::PlannerResult;
use planner_core::models::user::{CreateUser, User};
use planner_core::repository::UserRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;
use uuid::Uuid;

use super::profile::DELETE_PROFILE_CASCADE;
use super::{parse_uuid, rejected, transaction};
use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ProfileIdRow {
    record_id: String,
}

impl UserRow {
    fn into_user(self, id: Uuid) -> User {
        User {
            id,
            username: self.username,
            password_hash: self.password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        Ok(User {
            id: parse_uuid(&self.record_id, "user")?,
            username: self.username,
            password_hash: self.password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const CREATE_USER_WITH_PROFILE: &str = "\
CREATE type::record('user', $id) SET \
    username = $username, password_hash = $password_hash;
CREATE type::record('profile', $profile_id) SET \
    user_id = $id, username = $username;
";

/// The profile cascade followed by the user's sessions and the user
/// record. Binds `$id` and `$profile_id`.
fn delete_user_cascade() -> String {
    transaction(&format!(
        "{DELETE_PROFILE_CASCADE}\
         DELETE session WHERE user_id = $id;\n\
         DELETE type::record('user', $id);\n"
    ))
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> PlannerResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let profile_id = Uuid::new_v4();

        self.db
            .query(transaction(CREATE_USER_WITH_PROFILE))
            .bind(("id", id_str))
            .bind(("profile_id", profile_id.to_string()))
            .bind(("username", input.username))
            .bind(("password_hash", input.password_hash))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| rejected("user", e))?;

        info!(user_id = %id, profile_id = %profile_id, "User created");

        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: Uuid) -> PlannerResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id))
    }

    async fn get_by_username(&self, username: &str) -> PlannerResult<User> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE username = $username",
            )
            .bind(("username", username.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("username={username}"),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn delete(&self, id: Uuid) -> PlannerResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id FROM profile WHERE user_id = $id")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileIdRow> = result.take(0).map_err(DbError::from)?;
        let profile = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "profile".into(),
            id: format!("user_id={id_str}"),
        })?;

        self.db
            .query(delete_user_cascade())
            .bind(("id", id_str))
            .bind(("profile_id", profile.record_id.clone()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        info!(user_id = %id, profile_id = %profile.record_id, "User deleted");

        Ok(())
    }
}
