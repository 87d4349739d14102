//! Output module for persisting and summarizing run results
//!
//! This module handles:
//! - Writing address records to the SQLite result table
//! - Mirroring the records to CSV
//! - Writing every configured target even when one of them fails
//! - Printing run statistics

mod csv;
mod persist;
mod schema;
mod sqlite;
pub mod stats;

pub use csv::{write_csv, write_records, CSV_HEADER};
pub use persist::{persist_run, PersistReport};
pub use schema::{initialize_schema, SCHEMA_SQL};
pub use sqlite::{RunMetadata, SqliteWriter};
pub use stats::{print_statistics, RunStatistics};

use thiserror::Error;

/// Errors writing run results
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
