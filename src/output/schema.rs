//! Result database schema

/// SQL schema for the result database
pub const SCHEMA_SQL: &str = r#"
-- One row per pipeline run
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT NOT NULL,
    config_hash TEXT NOT NULL,
    domains_in INTEGER NOT NULL,
    addresses_out INTEGER NOT NULL
);

-- One row per resolved domain
CREATE TABLE IF NOT EXISTS addresses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    domain TEXT NOT NULL,
    source_url TEXT NOT NULL,
    country TEXT,
    region TEXT,
    city TEXT,
    postcode TEXT,
    road TEXT,
    house_number TEXT,
    UNIQUE(run_id, domain)
);

CREATE INDEX IF NOT EXISTS idx_addresses_domain ON addresses(domain);
"#;

/// Creates the tables if they do not exist yet
///
/// # Arguments
///
/// * `conn` - The database connection
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_one_address_per_domain_per_run() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO runs (started_at, finished_at, config_hash, domains_in, addresses_out)
             VALUES ('a', 'b', 'h', 1, 1)",
            [],
        )
        .unwrap();

        let insert = "INSERT INTO addresses (run_id, domain, source_url) VALUES (1, 'a.com', 'u')";
        conn.execute(insert, []).unwrap();
        assert!(conn.execute(insert, []).is_err());
    }
}
