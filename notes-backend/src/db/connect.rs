//! Lazily-opened, process-wide database handle.
//!
//! The first successful `connect()` opens the pool and every later call
//! reuses it. A failed open is not cached, so the next request retries.

use once_cell::sync::OnceCell;
use std::sync::Arc;

use super::Database;
use crate::error::NoteError;

pub struct Connector {
    database_url: String,
    pool_size: u32,
    database: OnceCell<Arc<Database>>,
}

impl Connector {
    pub fn new(database_url: impl Into<String>, pool_size: u32) -> Self {
        Self {
            database_url: database_url.into(),
            pool_size,
            database: OnceCell::new(),
        }
    }

    /// Shared database handle, opened on first use.
    pub fn connect(&self) -> Result<Arc<Database>, NoteError> {
        self.database
            .get_or_try_init(|| {
                log::info!("[DB] Opening notes database at {}", self.database_url);
                Database::new(&self.database_url, self.pool_size).map(Arc::new)
            })
            .cloned()
    }

    pub fn is_connected(&self) -> bool {
        self.database.get().is_some()
    }
}
