//! Database migration system for the survey store.
//!
//! Migrations are an ordered table of SQL batches. Each pending migration is
//! applied inside a transaction together with the version bump, so a failed
//! step leaves the previous version intact.

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::schema::{CREATE_KV_TABLE, CREATE_METADATA_TABLE};

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// One schema step.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Version the database is at after this step.
    pub version: i32,
    /// Short description for logs.
    pub description: &'static str,
    /// Statements to execute.
    pub statements: &'static [&'static str],
}

/// All migrations, oldest first.
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "key-value blob table",
    statements: &[CREATE_KV_TABLE],
}];

/// The current schema version.
#[must_use]
pub fn current_version() -> i32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Initialize the database schema, applying any pending migrations.
///
/// # Errors
///
/// Returns an error if the stored version is unreadable or newer than this
/// build, or if a migration fails.
pub fn initialize_schema(conn: &mut Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;

    let version = get_schema_version(conn)?;
    let current = current_version();
    if version > current {
        return Err(Error::DatabaseMigration {
            message: format!("database schema version {version} is newer than supported {current}"),
        });
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > version) {
        apply(conn, migration)?;
    }
    Ok(())
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (fresh database).
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
        None => Ok(0),
    }
}

fn apply(conn: &mut Connection, migration: &Migration) -> Result<()> {
    debug!(
        version = migration.version,
        "Applying migration: {}", migration.description
    );
    let tx = conn.transaction()?;
    for statement in migration.statements {
        tx.execute(statement, [])?;
    }
    tx.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, migration.version.to_string()),
    )?;
    tx.commit()?;
    info!(version = migration.version, "Schema migrated");
    Ok(())
}
