//! Schema definitions and migration runner for SurrealDB.
//!
//! All tables are SCHEMAFULL. UUIDs are stored as strings, event dates
//! as `YYYY-MM-DD` strings. Text limits are repeated as ASSERTs so a
//! write that skipped input validation is still rejected.
//!
//! Invitations and role fulfillment are relation tables keyed by
//! `(in, out)`; there are no DB events, so every cascade is issued by
//! the repositories.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::{debug, info};

use crate::error::DbError;
use crate::repository::transaction;

/// Bookkeeping table: one row per applied schema version.
const VERSION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct AppliedVersion {
    version: u32,
}

/// A numbered schema step. Versions ascend without gaps.
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "events_roles_invitations",
    sql: SCHEMA_V1,
}];

/// Users, their profiles, events with role slots, and the invitation
/// and fulfillment edges.
const SCHEMA_V1: &str = "\
-- Users
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD username ON TABLE user TYPE string \
    ASSERT string::len($value) >= 1 AND string::len($value) <= 150;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_username ON TABLE user \
    COLUMNS username UNIQUE;

-- Profiles (one per user)
DEFINE TABLE profile SCHEMAFULL;
DEFINE FIELD user_id ON TABLE profile TYPE string;
DEFINE FIELD username ON TABLE profile TYPE string;
DEFINE FIELD created_at ON TABLE profile TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_profile_user ON TABLE profile \
    COLUMNS user_id UNIQUE;
DEFINE INDEX idx_profile_username ON TABLE profile \
    COLUMNS username UNIQUE;

-- Events (owned by a profile)
DEFINE TABLE event SCHEMAFULL;
DEFINE FIELD owner_id ON TABLE event TYPE string;
DEFINE FIELD name ON TABLE event TYPE string \
    ASSERT string::len($value) >= 1 AND string::len($value) <= 30;
DEFINE FIELD date ON TABLE event TYPE string;
DEFINE FIELD description ON TABLE event TYPE string \
    ASSERT string::len($value) <= 200;
DEFINE FIELD location ON TABLE event TYPE string \
    ASSERT string::len($value) <= 50;
DEFINE FIELD created_at ON TABLE event TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE event TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_event_owner ON TABLE event COLUMNS owner_id;

-- Roles (belong to an event)
DEFINE TABLE role SCHEMAFULL;
DEFINE FIELD event_id ON TABLE role TYPE string;
DEFINE FIELD name ON TABLE role TYPE string \
    ASSERT string::len($value) >= 1 AND string::len($value) <= 30;
DEFINE FIELD description ON TABLE role TYPE string \
    ASSERT string::len($value) <= 100;
DEFINE FIELD amount ON TABLE role TYPE int ASSERT $value >= 0;
DEFINE FIELD created_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_role_event ON TABLE role COLUMNS event_id;

-- Sessions
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD user_id ON TABLE session TYPE string;
DEFINE FIELD token_hash ON TABLE session TYPE string;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_token ON TABLE session \
    COLUMNS token_hash UNIQUE;
DEFINE INDEX idx_session_user ON TABLE session COLUMNS user_id;

-- Profile -> Event invitation
DEFINE TABLE invited_to TYPE RELATION SCHEMAFULL;
DEFINE INDEX idx_invited_to_pair ON TABLE invited_to \
    COLUMNS in, out UNIQUE;

-- Profile -> Role fulfillment
DEFINE TABLE fulfills TYPE RELATION SCHEMAFULL;
DEFINE INDEX idx_fulfills_pair ON TABLE fulfills \
    COLUMNS in, out UNIQUE;
";

/// Bring the database up to the latest schema version.
///
/// Each pending migration runs in one transaction together with the
/// `_migration` row that records it, so a failed step leaves the
/// previous version in place.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(VERSION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let applied = applied_version(db).await?;
    debug!(version = applied, "Schema version before migrating");

    for migration in MIGRATIONS.iter().filter(|m| m.version > applied) {
        info!(version = migration.version, name = migration.name, "Migrating schema");

        let script = transaction(&format!(
            "{}CREATE _migration SET version = $version, name = $name;\n",
            migration.sql
        ));
        db.query(script)
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "schema v{} ({}) failed: {e}",
                    migration.version, migration.name
                ))
            })?;
    }

    Ok(())
}

async fn applied_version<C: Connection>(db: &Surreal<C>) -> Result<u32, DbError> {
    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let rows: Vec<AppliedVersion> = result.take(0)?;
    Ok(rows.first().map(|r| r.version).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_tables_are_unique_per_pair() {
        for edge in ["invited_to", "fulfills"] {
            assert!(SCHEMA_V1.contains(&format!("DEFINE TABLE {edge} TYPE RELATION")));
            assert!(SCHEMA_V1.contains(&format!("ON TABLE {edge} COLUMNS in, out UNIQUE")));
        }
    }

    #[test]
    fn text_limits_are_asserted() {
        assert!(SCHEMA_V1.contains("string::len($value) <= 200"));
        assert!(SCHEMA_V1.contains("string::len($value) <= 100"));
        assert!(SCHEMA_V1.contains("string::len($value) <= 50"));
        assert!(SCHEMA_V1.contains("amount ON TABLE role TYPE int ASSERT $value >= 0"));
    }

    #[test]
    fn versions_count_up_from_one() {
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version as usize, i + 1, "{}", migration.name);
        }
    }
}
