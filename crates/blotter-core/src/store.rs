//! SQLite storage for incident records.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::record::Record;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS incidents (
        incident_time     TEXT,
        incident_number   TEXT,
        incident_location TEXT,
        nature            TEXT,
        incident_ori      TEXT
    );
";

/// Number of incidents sharing a nature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NatureCount {
    pub nature: String,
    pub count: u64,
}

/// SQLite-backed incident table.
pub struct IncidentStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl IncidentStore {
    /// Create a fresh database at `path`, replacing any existing file.
    pub fn create(path: &Path) -> Result<Self> {
        if path.exists() {
            fs::remove_file(path).map_err(|e| prepare_error(path, e))?;
            debug!("Removed existing database {}", path.display());
        }
        Self::open(path)
    }

    /// Open (or create) the database at `path`, keeping existing rows.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| prepare_error(path, e))?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        info!("Opened incident database {}", path.display());

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// In-memory database, mostly useful for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, path: None })
    }

    /// Database file, if not in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert records in one transaction. Returns the number inserted.
    pub fn populate(&mut self, records: &[Record]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO incidents \
                 (incident_time, incident_number, incident_location, nature, incident_ori) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.date_time,
                    record.case_number,
                    record.address,
                    record.category,
                    record.agency_code,
                ])?;
            }
        }
        tx.commit()?;

        debug!("Inserted {} incidents", records.len());
        Ok(records.len())
    }

    /// Total number of stored incidents.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM incidents", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Incident count per nature, ordered by nature.
    pub fn nature_counts(&self) -> Result<Vec<NatureCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT nature, COUNT(*) FROM incidents GROUP BY nature ORDER BY nature",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(NatureCount {
                nature: row.get(0)?,
                count: row.get::<_, i64>(1)? as u64,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// All stored incidents in insertion order.
    pub fn records(&self) -> Result<Vec<Record>> {
        let mut stmt = self.conn.prepare(
            "SELECT incident_time, incident_number, incident_location, nature, incident_ori \
             FROM incidents ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Record {
                date_time: row.get(0)?,
                case_number: row.get(1)?,
                address: row.get(2)?,
                category: row.get(3)?,
                agency_code: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

fn prepare_error(path: &Path, err: std::io::Error) -> StoreError {
    StoreError::Prepare {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
