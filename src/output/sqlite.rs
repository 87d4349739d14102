//! SQLite result table

use crate::address::{Address, AddressRecord};
use crate::output::schema::initialize_schema;
use crate::output::OutputError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

/// Metadata stored alongside the records of one run
#[derive(Debug, Clone)]
pub struct RunMetadata {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config_hash: String,
    pub domains_in: usize,
}

/// Writes run results to a SQLite database
pub struct SqliteWriter {
    conn: Connection,
}

impl SqliteWriter {
    /// Opens or creates the database, creating missing parent directories
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteWriter)` - Database opened and schema initialized
    /// * `Err(OutputError)` - Directory or database could not be created
    pub fn open(path: &Path) -> Result<Self, OutputError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| OutputError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> Result<Self, OutputError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Writes a run row and all of its records in a single transaction
    ///
    /// # Returns
    ///
    /// * `Ok(i64)` - The id of the new run
    /// * `Err(OutputError)` - Nothing was written
    pub fn write_run(
        &mut self,
        metadata: &RunMetadata,
        records: &[AddressRecord],
    ) -> Result<i64, OutputError> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO runs (started_at, finished_at, config_hash, domains_in, addresses_out)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                metadata.started_at.to_rfc3339(),
                metadata.finished_at.to_rfc3339(),
                metadata.config_hash,
                metadata.domains_in as i64,
                records.len() as i64,
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO addresses
                    (run_id, domain, source_url, country, region, city, postcode, road, house_number)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;

            for record in records {
                let a = &record.address;
                stmt.execute(params![
                    run_id,
                    record.domain,
                    record.source_url,
                    a.country,
                    a.region,
                    a.city,
                    a.postcode,
                    a.road,
                    a.house_number,
                ])?;
            }
        }

        tx.commit()?;
        tracing::debug!("Stored run {} with {} addresses", run_id, records.len());

        Ok(run_id)
    }

    /// Loads the records of a run, ordered by domain
    pub fn load_addresses(&self, run_id: i64) -> Result<Vec<AddressRecord>, OutputError> {
        let mut stmt = self.conn.prepare(
            "SELECT domain, source_url, country, region, city, postcode, road, house_number
             FROM addresses WHERE run_id = ?1 ORDER BY domain",
        )?;

        let records = stmt
            .query_map(params![run_id], |row| {
                Ok(AddressRecord {
                    domain: row.get(0)?,
                    source_url: row.get(1)?,
                    address: Address {
                        country: row.get(2)?,
                        region: row.get(3)?,
                        city: row.get(4)?,
                        postcode: row.get(5)?,
                        road: row.get(6)?,
                        house_number: row.get(7)?,
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Number of runs stored so far
    pub fn count_runs(&self) -> Result<u64, OutputError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
