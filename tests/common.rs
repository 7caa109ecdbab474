// Common test utilities for integration tests

use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder};
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

/// Connect to the test database described by the `DB_*` environment
/// variables. Returns `None` when `DB_HOST` is unset so the suite can be
/// run without a live server.
pub fn test_connection() -> Option<Conn> {
    let host = match env::var("DB_HOST") {
        Ok(host) => host,
        Err(_) => {
            eprintln!("DB_HOST not set, skipping database integration test");
            return None;
        }
    };
    let opts = OptsBuilder::new()
        .ip_or_hostname(Some(host))
        .user(env::var("DB_USER").ok())
        .pass(env::var("DB_PASSWORD").ok())
        .db_name(Some(
            env::var("DB_NAME").unwrap_or_else(|_| "jeopardy_2".into()),
        ));
    Some(Conn::new(opts).expect("connecting to the test database"))
}

/// Drop a scratch table, ignoring errors, so reruns start clean.
pub fn drop_table(conn: &mut Conn, table: &str) {
    let _ = conn.query_drop(format!("DROP TABLE IF EXISTS `{table}`"));
}

/// Write a CSV file into a temp data directory and return (dir, file name).
pub fn create_test_csv(file_name: &str, content: &str) -> (TempDir, String) {
    use std::fs;

    let dir = tempfile::tempdir().expect("temp data dir");
    let path: PathBuf = dir.path().join(file_name);
    fs::write(&path, content).expect("writing test csv");
    (dir, file_name.to_string())
}
