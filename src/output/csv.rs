//! CSV mirror of the result table

use crate::address::AddressRecord;
use crate::output::OutputError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Header row, same column order as the `addresses` table
pub const CSV_HEADER: &[&str] = &[
    "domain",
    "country",
    "region",
    "city",
    "postcode",
    "road",
    "house_number",
    "source_url",
];

/// Writes the records as a CSV file, replacing any existing file
pub fn write_csv(path: &Path, records: &[AddressRecord]) -> Result<(), OutputError> {
    let io_error = |source| OutputError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let file = File::create(path).map_err(io_error)?;
    let mut out = BufWriter::new(file);
    write_records(&mut out, records).map_err(io_error)?;
    out.flush().map_err(io_error)
}

/// Writes the header and one row per record
pub fn write_records<W: Write>(out: &mut W, records: &[AddressRecord]) -> std::io::Result<()> {
    writeln!(out, "{}", CSV_HEADER.join(","))?;

    for record in records {
        let mut row = vec![escape_field(&record.domain)];
        row.extend(
            record
                .address
                .fields()
                .iter()
                .map(|(_, value)| escape_field(value.unwrap_or(""))),
        );
        row.push(escape_field(&record.source_url));
        writeln!(out, "{}", row.join(","))?;
    }

    Ok(())
}

/// Quotes a field when it contains a comma, quote, or line break
fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
