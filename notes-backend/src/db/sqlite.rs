//! Pooled SQLite database holding the notes collection.

use chrono::{DateTime, SubsecRound, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Result as SqliteResult;
use rusqlite::types::Type;
use std::path::Path;
use std::time::Duration;

use crate::error::NoteError;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Fixed-width UTC timestamp so text comparison matches time order.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS notes (
        id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL CHECK (length(trim(title)) > 0),
        content TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open (creating if needed) the database file and ensure the schema exists.
    pub fn new(database_url: &str, pool_size: u32) -> Result<Self, NoteError> {
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(database_url).with_init(|conn| {
            conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;")
        });

        let pool = Pool::builder()
            .max_size(pool_size)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;

        let db = Self { pool };
        db.init_schema()?;
        log::info!("[DB] Notes database ready at {}", database_url);
        Ok(db)
    }

    /// Check out a pooled connection.
    pub fn conn(&self) -> Result<DbConn, NoteError> {
        Ok(self.pool.get()?)
    }

    /// Round-trip a trivial query to prove the database is reachable.
    pub fn ping(&self) -> Result<(), NoteError> {
        let conn = self.conn()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    fn init_schema(&self) -> Result<(), NoteError> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }
}

/// Current time at the resolution the store persists.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp; `idx` is the column for error reporting.
pub fn parse_timestamp(idx: usize, raw: &str) -> SqliteResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
