//! SurrealDB implementation of [`EventRepository`].
//!
//! Invitations are `profile -> invited_to -> event` edges.

use chrono::{DateTime, Utc};
use planner_core::error::PlannerResult;
use planner_core::models::event::{CreateEvent, Event, UpdateEvent};
use planner_core::models::profile::Profile;
use planner_core::repository::EventRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use super::profile::{ProfileRowWithId, into_profiles};
use super::{
    CountRow, DATE_FORMAT, ensure_exists, parse_date, parse_uuid, rejected, transaction,
};
use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct EventRow {
    owner_id: String,
    name: String,
    date: String,
    description: String,
    location: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct EventRowWithId {
    record_id: String,
    owner_id: String,
    name: String,
    date: String,
    description: String,
    location: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EventRow {
    fn into_event(self, id: Uuid) -> Result<Event, DbError> {
        Ok(Event {
            id,
            owner_id: parse_uuid(&self.owner_id, "owner")?,
            name: self.name,
            date: parse_date(&self.date)?,
            description: self.description,
            location: self.location,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl EventRowWithId {
    fn try_into_event(self) -> Result<Event, DbError> {
        Ok(Event {
            id: parse_uuid(&self.record_id, "event")?,
            owner_id: parse_uuid(&self.owner_id, "owner")?,
            name: self.name,
            date: parse_date(&self.date)?,
            description: self.description,
            location: self.location,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const EVENT_ORDER: &str = "ORDER BY date ASC, created_at ASC";

const INVITED_EVENT_IDS: &str = "\
SELECT VALUE out FROM invited_to \
WHERE in = type::record('profile', $profile_id)";

/// SurrealDB implementation of the Event repository.
#[derive(Clone)]
pub struct SurrealEventRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealEventRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn list_where(&self, condition: &str, profile_id: Uuid) -> PlannerResult<Vec<Event>> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM event \
             WHERE {condition} {EVENT_ORDER}"
        );

        let mut result = self
            .db
            .query(query)
            .bind(("profile_id", profile_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EventRowWithId> = result.take(0).map_err(DbError::from)?;

        let events = rows
            .into_iter()
            .map(|row| row.try_into_event())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(events)
    }
}

impl<C: Connection> EventRepository for SurrealEventRepository<C> {
    async fn create(&self, input: CreateEvent) -> PlannerResult<Event> {
        ensure_exists(&self.db, "profile", input.owner_id).await?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('event', $id) SET \
                 owner_id = $owner_id, \
                 name = $name, date = $date, \
                 description = $description, \
                 location = $location",
            )
            .bind(("id", id_str.clone()))
            .bind(("owner_id", input.owner_id.to_string()))
            .bind(("name", input.name))
            .bind(("date", input.date.format(DATE_FORMAT).to_string()))
            .bind(("description", input.description))
            .bind(("location", input.location))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| rejected("event", e))?;

        let rows: Vec<EventRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "event".into(),
            id: id_str,
        })?;

        Ok(row.into_event(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> PlannerResult<Event> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('event', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EventRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "event".into(),
            id: id_str,
        })?;

        Ok(row.into_event(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateEvent) -> PlannerResult<Event> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.date.is_some() {
            sets.push("date = $date");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.location.is_some() {
            sets.push("location = $location");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('event', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(date) = input.date {
            builder = builder.bind(("date", date.format(DATE_FORMAT).to_string()));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(location) = input.location {
            builder = builder.bind(("location", location));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| rejected("event", e))?;

        let rows: Vec<EventRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "event".into(),
            id: id_str,
        })?;

        Ok(row.into_event(id)?)
    }

    async fn delete(&self, id: Uuid) -> PlannerResult<()> {
        let id_str = id.to_string();

        // Fulfillments of the event's roles, the roles, the invitations,
        // then the event itself.
        self.db
            .query(transaction(
                "DELETE fulfills WHERE out IN (\
                     SELECT VALUE id FROM role WHERE event_id = $id\
                 );
                 DELETE role WHERE event_id = $id;
                 DELETE invited_to WHERE out = type::record('event', $id);
                 DELETE type::record('event', $id);
",
            ))
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_owned_by(&self, profile_id: Uuid) -> PlannerResult<Vec<Event>> {
        self.list_where("owner_id = $profile_id", profile_id).await
    }

    async fn list_invited(&self, profile_id: Uuid) -> PlannerResult<Vec<Event>> {
        self.list_where(&format!("id IN ({INVITED_EVENT_IDS})"), profile_id)
            .await
    }

    async fn list_owned_or_invited(&self, profile_id: Uuid) -> PlannerResult<Vec<Event>> {
        self.list_where(
            &format!("owner_id = $profile_id OR id IN ({INVITED_EVENT_IDS})"),
            profile_id,
        )
        .await
    }

    async fn invite(&self, event_id: Uuid, profile_id: Uuid) -> PlannerResult<()> {
        ensure_exists(&self.db, "event", event_id).await?;
        ensure_exists(&self.db, "profile", profile_id).await?;

        if self.is_invited(event_id, profile_id).await? {
            debug!(event_id = %event_id, profile_id = %profile_id, "Already invited");
            return Ok(());
        }

        let query = format!("RELATE profile:`{profile_id}` -> invited_to -> event:`{event_id}`;");

        self.db
            .query(query)
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| rejected("invitation", e))?;

        Ok(())
    }

    async fn uninvite(&self, event_id: Uuid, profile_id: Uuid) -> PlannerResult<()> {
        self.db
            .query(
                "DELETE invited_to WHERE \
                 in = type::record('profile', $profile_id) AND \
                 out = type::record('event', $event_id)",
            )
            .bind(("profile_id", profile_id.to_string()))
            .bind(("event_id", event_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn invitees(&self, event_id: Uuid) -> PlannerResult<Vec<Profile>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM profile \
                 WHERE id IN (\
                     SELECT VALUE in FROM invited_to \
                     WHERE out = type::record('event', $event_id)\
                 ) \
                 ORDER BY username ASC",
            )
            .bind(("event_id", event_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(into_profiles(rows)?)
    }

    async fn is_invited(&self, event_id: Uuid, profile_id: Uuid) -> PlannerResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM invited_to \
                 WHERE in = type::record('profile', $profile_id) \
                 AND out = type::record('event', $event_id) GROUP ALL",
            )
            .bind(("profile_id", profile_id.to_string()))
            .bind(("event_id", event_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }
}
