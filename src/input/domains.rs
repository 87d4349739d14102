//! Domain list reader

use crate::url::normalize_domain;
use crate::ScoutError;
use std::path::Path;

/// Name of the column read from a headed domain file
const DOMAIN_COLUMN: &str = "domain";

/// Reads and normalizes the domains listed in a file
///
/// Two layouts are accepted:
/// - A comma-separated file whose first row is a header with a `domain`
///   column; that column is read from every following row
/// - One domain per line
///
/// Blank lines and lines starting with `#` are skipped in both layouts.
/// Entries that do not normalize to a hostname are logged and skipped.
///
/// # Arguments
///
/// * `path` - Path to the domain list
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Normalized domains in file order, duplicates kept
/// * `Err(ScoutError)` - The file could not be read
pub fn load_domains(path: &Path) -> Result<Vec<String>, ScoutError> {
    let content = std::fs::read_to_string(path).map_err(|e| ScoutError::Input {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let domains = parse_domains(&content);
    tracing::info!("Loaded {} domains from {}", domains.len(), path.display());
    Ok(domains)
}

/// Parses domain list content; see [`load_domains`]
pub fn parse_domains(content: &str) -> Vec<String> {
    let mut lines = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .peekable();

    let column = lines.peek().and_then(|first| header_column(first));
    if column.is_some() {
        lines.next();
    }

    lines
        .filter_map(|line| {
            let raw = match column {
                Some(index) => split_row(line).into_iter().nth(index)?,
                None => line.to_string(),
            };

            let domain = normalize_domain(&raw);
            if domain.is_none() {
                tracing::warn!("Skipping invalid domain entry {:?}", raw);
            }
            domain
        })
        .collect()
}

/// Position of the `domain` column if `line` is a header row
fn header_column(line: &str) -> Option<usize> {
    if !line.contains(',') && !line.eq_ignore_ascii_case(DOMAIN_COLUMN) {
        return None;
    }

    split_row(line)
        .iter()
        .position(|name| name.eq_ignore_ascii_case(DOMAIN_COLUMN))
}

/// Splits a comma-separated row, trimming cells and surrounding quotes
fn split_row(line: &str) -> Vec<String> {
    line.split(',')
        .map(|cell| cell.trim().trim_matches('"').trim().to_string())
        .collect()
}
