//! SurrealDB repository implementations.

mod event;
mod profile;
mod role;
mod session;
mod user;

pub use event::SurrealEventRepository;
pub use profile::SurrealProfileRepository;
pub use role::SurrealRoleRepository;
pub use session::SurrealSessionRepository;
pub use user::SurrealUserRepository;

use chrono::NaiveDate;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Storage format of `event.date`. Sorts lexically in date order for
/// the four-digit years that event validation allows.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
pub(crate) struct CountRow {
    pub(crate) total: u64,
}

pub(crate) fn parse_uuid(raw: &str, field: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(raw).map_err(|e| DbError::Decode(format!("invalid {field} UUID: {e}")))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| DbError::Decode(format!("invalid event date {raw:?}: {e}")))
}

/// Wraps `statements` in a single SurrealQL transaction.
pub(crate) fn transaction(statements: &str) -> String {
    format!("BEGIN TRANSACTION;\n{statements}COMMIT TRANSACTION;")
}

/// Classifies a statement error. Unique index violations become
/// `AlreadyExists` for `entity`.
pub(crate) fn rejected(entity: &str, err: surrealdb::Error) -> DbError {
    let message = err.to_string();
    if message.contains("already contains") {
        DbError::AlreadyExists {
            entity: entity.into(),
        }
    } else {
        DbError::Query(message)
    }
}

/// Fails with `NotFound` unless `table:id` exists.
pub(crate) async fn ensure_exists<C: Connection>(
    db: &Surreal<C>,
    table: &'static str,
    id: Uuid,
) -> Result<(), DbError> {
    let id_str = id.to_string();
    let mut result = db
        .query("SELECT count() AS total FROM type::record($table, $id) GROUP ALL")
        .bind(("table", table))
        .bind(("id", id_str.clone()))
        .await?;

    let rows: Vec<CountRow> = result.take(0)?;
    if rows.first().map(|r| r.total).unwrap_or(0) == 0 {
        return Err(DbError::NotFound {
            entity: table.into(),
            id: id_str,
        });
    }
    Ok(())
}
