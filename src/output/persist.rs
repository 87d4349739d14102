//! Writes a run to every configured output target

use crate::address::AddressRecord;
use crate::config::OutputConfig;
use crate::output::{write_csv, OutputError, RunMetadata, SqliteWriter};
use std::path::Path;

/// Outcome of each output target of one run
///
/// A failed target never prevents the others from being written.
#[derive(Debug)]
pub struct PersistReport {
    /// Run id assigned by the database
    pub database: Result<i64, OutputError>,

    /// `None` when no CSV mirror is configured
    pub csv: Option<Result<(), OutputError>>,
}

impl PersistReport {
    /// Every error, database first
    pub fn errors(&self) -> Vec<&OutputError> {
        let mut errors = Vec::new();
        if let Err(e) = &self.database {
            errors.push(e);
        }
        if let Some(Err(e)) = &self.csv {
            errors.push(e);
        }
        errors
    }
}

/// Writes the CSV mirror (if configured) and the SQLite run
///
/// The CSV file is written first and both targets are always attempted.
pub fn persist_run(
    output: &OutputConfig,
    metadata: &RunMetadata,
    records: &[AddressRecord],
) -> PersistReport {
    let csv = output.csv_path.as_deref().map(|csv_path| {
        let result = write_csv(Path::new(csv_path), records);
        match &result {
            Ok(()) => tracing::info!("Wrote CSV mirror to {}", csv_path),
            Err(e) => tracing::error!("{}", e),
        }
        result
    });

    let database_path = Path::new(&output.database_path);
    let database = SqliteWriter::open(database_path)
        .and_then(|mut writer| writer.write_run(metadata, records));
    match &database {
        Ok(run_id) => tracing::info!(
            "Stored {} addresses as run {} in {}",
            records.len(),
            run_id,
            database_path.display()
        ),
        Err(e) => tracing::error!("Failed to store results in {}: {}", database_path.display(), e),
    }

    PersistReport { database, csv }
}
