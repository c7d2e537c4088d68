//! Schema versioning for the `SQLite` store.
//!
//! The version lives in the `metadata` table. Each migration runs inside a
//! transaction together with the version bump.

use rusqlite::Connection;
use tracing::info;

use crate::error::{Error, Result};

use super::schema::{CREATE_METADATA_TABLE, V1_STATEMENTS};

/// The current schema version.
pub const CURRENT_VERSION: i32 = 1;

const VERSION_KEY: &str = "schema_version";

/// Bring the database schema up to [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns an error if the stored version is unreadable, newer than this
/// build understands, or a migration fails.
pub fn initialize_schema(conn: &mut Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;

    let version = schema_version(conn)?;
    if version > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {version} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }

    for next in (version + 1)..=CURRENT_VERSION {
        let tx = conn.transaction()?;
        run_migration(&tx, next)?;
        tx.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            (VERSION_KEY, next.to_string()),
        )?;
        tx.commit()?;
        info!("Applied schema migration v{}", next);
    }

    Ok(())
}

/// Read the schema version. A fresh database reports 0.
pub fn schema_version(conn: &Connection) -> Result<i32> {
    let result: std::result::Result<String, rusqlite::Error> = conn.query_row(
        "SELECT value FROM metadata WHERE key = ?1",
        [VERSION_KEY],
        |row| row.get(0),
    );

    match result {
        Ok(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

fn run_migration(conn: &Connection, version: i32) -> Result<()> {
    match version {
        1 => {
            for statement in V1_STATEMENTS {
                conn.execute(statement, [])?;
            }
            Ok(())
        }
        _ => Err(Error::DatabaseMigration {
            message: format!("unknown migration version: {version}"),
        }),
    }
}
