//! SurrealDB implementation of [`ProfileRepository`].

use chrono::{DateTime, Utc};
use planner_core::error::PlannerResult;
use planner_core::models::profile::Profile;
use planner_core::models::role::Role;
use planner_core::repository::{ProfileRepository, RoleRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;
use uuid::Uuid;

use super::role::SurrealRoleRepository;
use super::{ensure_exists, parse_uuid, transaction};
use crate::error::DbError;

/// Removes a profile's footprint: fulfillments and invitations it holds,
/// the events it owns with their roles, fulfillments and invitations,
/// then the profile record. Binds `$profile_id`.
pub(super) const DELETE_PROFILE_CASCADE: &str = "\
DELETE fulfills WHERE in = type::record('profile', $profile_id);
DELETE invited_to WHERE in = type::record('profile', $profile_id);
DELETE fulfills WHERE out IN (\
    SELECT VALUE id FROM role WHERE event_id IN (\
        SELECT VALUE meta::id(id) FROM event WHERE owner_id = $profile_id\
    )\
);
DELETE invited_to WHERE out IN (\
    SELECT VALUE id FROM event WHERE owner_id = $profile_id\
);
DELETE role WHERE event_id IN (\
    SELECT VALUE meta::id(id) FROM event WHERE owner_id = $profile_id\
);
DELETE event WHERE owner_id = $profile_id;
DELETE type::record('profile', $profile_id);
";

/// Profile row with its record ID. Also used by the event and role
/// repositories for invitees and fulfillers.
#[derive(Debug, SurrealValue)]
pub(super) struct ProfileRowWithId {
    record_id: String,
    user_id: String,
    username: String,
    created_at: DateTime<Utc>,
}

impl ProfileRowWithId {
    pub(super) fn try_into_profile(self) -> Result<Profile, DbError> {
        Ok(Profile {
            id: parse_uuid(&self.record_id, "profile")?,
            user_id: parse_uuid(&self.user_id, "user")?,
            username: self.username,
            created_at: self.created_at,
        })
    }
}

pub(super) fn into_profiles(rows: Vec<ProfileRowWithId>) -> Result<Vec<Profile>, DbError> {
    rows.into_iter()
        .map(ProfileRowWithId::try_into_profile)
        .collect()
}

/// SurrealDB implementation of the Profile repository.
#[derive(Clone)]
pub struct SurrealProfileRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProfileRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn find_one(
        &self,
        condition: &'static str,
        value: String,
        missing_id: String,
    ) -> PlannerResult<Profile> {
        let mut result = self
            .db
            .query(format!(
                "SELECT meta::id(id) AS record_id, * FROM profile WHERE {condition}"
            ))
            .bind(("value", value))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "profile".into(),
            id: missing_id,
        })?;

        Ok(row.try_into_profile()?)
    }
}

impl<C: Connection> ProfileRepository for SurrealProfileRepository<C> {
    async fn get_by_id(&self, id: Uuid) -> PlannerResult<Profile> {
        let id_str = id.to_string();
        self.find_one("id = type::record('profile', $value)", id_str.clone(), id_str)
            .await
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> PlannerResult<Profile> {
        let user_id_str = user_id.to_string();
        self.find_one(
            "user_id = $value",
            user_id_str.clone(),
            format!("user_id={user_id_str}"),
        )
        .await
    }

    async fn get_by_username(&self, username: &str) -> PlannerResult<Profile> {
        self.find_one(
            "username = $value",
            username.to_string(),
            format!("username={username}"),
        )
        .await
    }

    async fn delete(&self, id: Uuid) -> PlannerResult<()> {
        ensure_exists(&self.db, "profile", id).await?;

        self.db
            .query(transaction(DELETE_PROFILE_CASCADE))
            .bind(("profile_id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        info!(profile_id = %id, "Profile deleted");

        Ok(())
    }

    async fn roles(&self, id: Uuid) -> PlannerResult<Vec<Role>> {
        SurrealRoleRepository::new(self.db.clone())
            .list_by_profile(id)
            .await
    }
}
