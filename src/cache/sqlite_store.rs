//! Launch store backed by a SQLite database.

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::queue::SerialQueue;
use super::store::{
    CacheSnapshot, DeletionCompletion, InsertionCompletion, LaunchStore, LocalLaunchItem,
    RetrievalCompletion, StoreError,
};

/// Schema for the cache tables.
const CACHE_SCHEMA: &str = r#"
-- The single snapshot row
CREATE TABLE IF NOT EXISTS launch_cache (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    timestamp TEXT NOT NULL
);

-- Launches of the snapshot (position preserves order)
CREATE TABLE IF NOT EXISTS cached_launches (
    position INTEGER PRIMARY KEY,
    launch_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    date TEXT NOT NULL
);
"#;

/// SQLite-based launch store.
///
/// Statements run on a private worker thread in the order operations were
/// requested; each insert or delete is a single transaction.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    queue: SerialQueue,
}

impl SqliteStore {
    /// Open or create the store database at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open a store that lives only as long as this value.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(CACHE_SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            queue: SerialQueue::new("launches-sqlite-store")?,
        })
    }

    fn perform<T, F>(
        &self,
        action: F,
        completion: Box<dyn FnOnce(Result<T, StoreError>) + Send>,
    ) where
        T: 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        self.queue.dispatch(move || {
            let result = match conn.lock() {
                Ok(mut conn) => action(&mut conn),
                Err(e) => Err(StoreError::Database(format!("Lock poisoned: {}", e))),
            };
            completion(result);
        });
    }
}

impl LaunchStore for SqliteStore {
    fn delete_cached_launches(&self, completion: DeletionCompletion) {
        self.perform(
            |conn| {
                let tx = conn.transaction()?;
                clear(&tx)?;
                tx.commit()?;
                debug!("cleared cache database");
                Ok(())
            },
            completion,
        );
    }

    fn insert(
        &self,
        launches: Vec<LocalLaunchItem>,
        timestamp: DateTime<Utc>,
        completion: InsertionCompletion,
    ) {
        self.perform(
            move |conn| {
                let tx = conn.transaction()?;
                clear(&tx)?;

                tx.execute(
                    "INSERT INTO launch_cache (id, timestamp) VALUES (1, ?)",
                    params![timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)],
                )?;

                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO cached_launches (position, launch_id, name, date)
                         VALUES (?, ?, ?, ?)",
                    )?;
                    for (position, launch) in launches.iter().enumerate() {
                        stmt.execute(params![
                            position as i64,
                            launch.id,
                            launch.name,
                            launch.date
                        ])?;
                    }
                }

                tx.commit()?;
                debug!(launches = launches.len(), "stored launches in cache database");
                Ok(())
            },
            completion,
        );
    }

    fn retrieve(&self, completion: RetrievalCompletion) {
        self.perform(
            |conn| {
                let timestamp: Option<String> = conn
                    .query_row("SELECT timestamp FROM launch_cache WHERE id = 1", [], |row| {
                        row.get(0)
                    })
                    .optional()?;

                let timestamp = match timestamp {
                    Some(value) => parse_timestamp(&value)?,
                    None => return Ok(None),
                };

                let mut stmt = conn.prepare(
                    "SELECT launch_id, name, date FROM cached_launches ORDER BY position",
                )?;
                let launches = stmt
                    .query_map([], |row| {
                        Ok(LocalLaunchItem {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            date: row.get(2)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Some(CacheSnapshot {
                    launches,
                    timestamp,
                }))
            },
            completion,
        );
    }
}

/// Remove the snapshot row and its launches.
fn clear(conn: &Connection) -> Result<(), StoreError> {
    conn.execute("DELETE FROM cached_launches", [])?;
    conn.execute("DELETE FROM launch_cache", [])?;
    Ok(())
}

/// Parse a timestamp stored in RFC 3339 format.
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Encoding(format!("Failed to parse timestamp '{}': {}", s, e)))
}
