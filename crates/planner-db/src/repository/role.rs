//! SurrealDB implementation of [`RoleRepository`].
//!
//! Fulfillment is a `profile -> fulfills -> role` edge.

use chrono::{DateTime, Utc};
use planner_core::error::PlannerResult;
use planner_core::models::profile::Profile;
use planner_core::models::role::{CreateRole, Role, UpdateRole};
use planner_core::repository::RoleRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::profile::{ProfileRowWithId, into_profiles};
use super::{CountRow, ensure_exists, parse_uuid, rejected, transaction};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RoleRow {
    event_id: String,
    name: String,
    description: String,
    amount: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct RoleRowWithId {
    record_id: String,
    event_id: String,
    name: String,
    description: String,
    amount: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn row_to_role(row: RoleRow, id: Uuid) -> Result<Role, DbError> {
    Ok(Role {
        id,
        event_id: parse_uuid(&row.event_id, "event")?,
        name: row.name,
        description: row.description,
        amount: row.amount,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl RoleRowWithId {
    fn try_into_role(self) -> Result<Role, DbError> {
        let id = parse_uuid(&self.record_id, "role")?;
        row_to_role(
            RoleRow {
                event_id: self.event_id,
                name: self.name,
                description: self.description,
                amount: self.amount,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            id,
        )
    }
}

fn into_roles(rows: Vec<RoleRowWithId>) -> Result<Vec<Role>, DbError> {
    rows.into_iter().map(RoleRowWithId::try_into_role).collect()
}

/// SurrealDB implementation of the Role repository.
#[derive(Clone)]
pub struct SurrealRoleRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRoleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn is_fulfilled_by(&self, role_id: &str, profile_id: &str) -> Result<bool, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM fulfills \
                 WHERE in = type::record('profile', $profile_id) \
                 AND out = type::record('role', $role_id) GROUP ALL",
            )
            .bind(("profile_id", profile_id.to_string()))
            .bind(("role_id", role_id.to_string()))
            .await?;

        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }
}

impl<C: Connection> RoleRepository for SurrealRoleRepository<C> {
    async fn create(&self, input: CreateRole) -> PlannerResult<Role> {
        ensure_exists(&self.db, "event", input.event_id).await?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('role', $id) SET \
                 event_id = $event_id, \
                 name = $name, description = $description, \
                 amount = $amount",
            )
            .bind(("id", id_str.clone()))
            .bind(("event_id", input.event_id.to_string()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("amount", input.amount))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| rejected("role", e))?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: id_str,
        })?;

        row_to_role(row, id).map_err(Into::into)
    }

    async fn get_by_id(&self, id: Uuid) -> PlannerResult<Role> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('role', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: id_str,
        })?;

        row_to_role(row, id).map_err(Into::into)
    }

    async fn update(&self, id: Uuid, input: UpdateRole) -> PlannerResult<Role> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.amount.is_some() {
            sets.push("amount = $amount");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('role', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(amount) = input.amount {
            builder = builder.bind(("amount", amount));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| rejected("role", e))?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: id_str,
        })?;

        row_to_role(row, id).map_err(Into::into)
    }

    async fn delete(&self, id: Uuid) -> PlannerResult<()> {
        self.db
            .query(transaction(
                "DELETE fulfills WHERE out = type::record('role', $id);
                 DELETE type::record('role', $id);
",
            ))
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_by_event(&self, event_id: Uuid) -> PlannerResult<Vec<Role>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 WHERE event_id = $event_id \
                 ORDER BY created_at ASC",
            )
            .bind(("event_id", event_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(into_roles(rows)?)
    }

    async fn fulfill(&self, role_id: Uuid, profile_id: Uuid) -> PlannerResult<()> {
        ensure_exists(&self.db, "role", role_id).await?;
        ensure_exists(&self.db, "profile", profile_id).await?;

        let role_id_str = role_id.to_string();
        let profile_id_str = profile_id.to_string();

        if self.is_fulfilled_by(&role_id_str, &profile_id_str).await? {
            return Ok(());
        }

        let query =
            format!("RELATE profile:`{profile_id_str}` -> fulfills -> role:`{role_id_str}`;");

        self.db
            .query(query)
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| rejected("fulfillment", e))?;

        Ok(())
    }

    async fn unfulfill(&self, role_id: Uuid, profile_id: Uuid) -> PlannerResult<()> {
        self.db
            .query(
                "DELETE fulfills WHERE \
                 in = type::record('profile', $profile_id) AND \
                 out = type::record('role', $role_id)",
            )
            .bind(("profile_id", profile_id.to_string()))
            .bind(("role_id", role_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn fulfilled_by(&self, role_id: Uuid) -> PlannerResult<Vec<Profile>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM profile \
                 WHERE id IN (\
                     SELECT VALUE in FROM fulfills \
                     WHERE out = type::record('role', $role_id)\
                 ) \
                 ORDER BY username ASC",
            )
            .bind(("role_id", role_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(into_profiles(rows)?)
    }

    async fn list_by_profile(&self, profile_id: Uuid) -> PlannerResult<Vec<Role>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 WHERE id IN (\
                     SELECT VALUE out FROM fulfills \
                     WHERE in = type::record('profile', $profile_id)\
                 ) \
                 ORDER BY created_at ASC",
            )
            .bind(("profile_id", profile_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(into_roles(rows)?)
    }
}
