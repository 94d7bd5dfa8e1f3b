use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::error::{Error, Result, StoreError};
use crate::record::PageRecord;
use crate::store::{RecordStore, StoreResult};

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(250);

/// Search table in a SQLite database.
///
/// Each batch is written in one transaction with `INSERT OR REPLACE`, so a
/// rerun overwrites rows with the same `page_path`. A database that stays
/// busy past the busy timeout is reported as throttled.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    table: String,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>, table: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).map_err(fatal)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;").map_err(fatal)?;
        Self::with_connection(conn, table)
    }

    pub fn in_memory(table: impl Into<String>) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(fatal)?;
        Self::with_connection(conn, table)
    }

    fn with_connection(conn: Connection, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        validate_identifier(&table)?;
        conn.busy_timeout(DEFAULT_BUSY_TIMEOUT).map_err(fatal)?;
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                page_path           TEXT PRIMARY KEY,
                page_section        TEXT NOT NULL,
                page_date           TEXT NOT NULL,
                page_search_content TEXT NOT NULL,
                object_key          TEXT NOT NULL,
                metadata            TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_{table}_section ON {table}(page_section);"
        ))
        .map_err(fatal)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            table,
        })
    }

    /// How long a write waits on a locked database before reporting throttling.
    pub fn busy_timeout(self, timeout: Duration) -> Result<Self> {
        self.with_conn(|conn| conn.busy_timeout(timeout))
            .map_err(Error::Store)?;
        Ok(self)
    }

    pub fn count(&self) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let count: i64 = self
            .with_conn(|conn| conn.query_row(&sql, [], |row| row.get(0)))
            .map_err(Error::Store)?;
        Ok(count as u64)
    }

    pub fn get(&self, page_path: &str) -> Result<Option<PageRecord>> {
        let sql = format!(
            "SELECT page_path, page_section, page_date, page_search_content, object_key, metadata
             FROM {} WHERE page_path = ?1",
            self.table
        );
        self.with_conn(|conn| {
            conn.query_row(&sql, [page_path], |row| {
                Ok(PageRecord {
                    page_path: row.get(0)?,
                    page_section: row.get(1)?,
                    page_date: row.get(2)?,
                    page_search_content: row.get(3)?,
                    object_key: row.get(4)?,
                    metadata: row.get(5)?,
                })
            })
            .optional()
        })
        .map_err(Error::Store)
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> rusqlite::Result<T>,
    ) -> StoreResult<T> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::backend("sqlite connection mutex poisoned"))?;
        f(&mut conn).map_err(classify)
    }

    async fn blocking<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection, &str) -> rusqlite::Result<T> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.with_conn(|conn| f(conn, &store.table)))
            .await
            .map_err(StoreError::backend)?
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    fn name(&self) -> &str {
        &self.table
    }

    async fn put_batch(&self, rows: &[PageRecord]) -> StoreResult<()> {
        let rows = rows.to_vec();
        self.blocking(move |conn, table| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare_cached(&format!(
                    "INSERT OR REPLACE INTO {table}
                     (page_path, page_section, page_date, page_search_content, object_key, metadata)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
                ))?;
                for row in &rows {
                    stmt.execute(params![
                        row.page_path,
                        row.page_section,
                        row.page_date,
                        row.page_search_content,
                        row.object_key,
                        row.metadata,
                    ])?;
                }
            }
            tx.commit()
        })
        .await
    }

    async fn clear(&self) -> StoreResult<u64> {
        self.blocking(|conn, table| {
            conn.execute(&format!("DELETE FROM {table}"), [])
                .map(|n| n as u64)
        })
        .await
    }
}

/// Busy and locked databases are capacity problems; everything else is fatal.
fn classify(err: rusqlite::Error) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if matches!(
                failure.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ) =>
        {
            StoreError::throttled(err.to_string())
        }
        _ => StoreError::backend(err),
    }
}

fn fatal(err: rusqlite::Error) -> Error {
    Error::Store(StoreError::backend(err))
}

fn validate_identifier(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(Error::config(format!(
            "table name {table:?} must be an identifier of letters, digits and underscores"
        )))
    }
}
