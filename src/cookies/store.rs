//! Read-only access to Firefox's `cookies.sqlite`.
//!
//! The store belongs to the browser; this module opens it with
//! `SQLITE_OPEN_READ_ONLY`, drains every row of `moz_cookies` into a
//! [`CookieJar`], and drops the connection before anything else runs.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::cookies::jar::{CookieJar, CookieRecord};

/// File name of the cookie database inside a profile directory.
pub const STORE_FILE_NAME: &str = "cookies.sqlite";

/// Errors reading the browser's cookie database.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database file does not exist in the profile directory.
    #[error("cookie store '{}' does not exist", path.display())]
    Missing {
        /// Expected location of the database.
        path: PathBuf,
    },

    /// The database file exists but could not be opened.
    #[error("failed to open cookie store '{}': {source}", path.display())]
    Open {
        /// Location of the database.
        path: PathBuf,
        /// Underlying SQLite error.
        #[source]
        source: rusqlite::Error,
    },

    /// Reading `moz_cookies` failed after the database was opened.
    #[error("failed to read moz_cookies from '{}': {source}", path.display())]
    Query {
        /// Location of the database.
        path: PathBuf,
        /// Underlying SQLite error.
        #[source]
        source: rusqlite::Error,
    },
}

struct StoreRow {
    host: String,
    name: String,
    value: String,
    expiry: i64,
    is_secure: i64,
}

/// Loads every cookie from `profile_dir/cookies.sqlite` into a jar.
///
/// Rows are inserted in table order, so a row that repeats a
/// `(host, name)` pair replaces the earlier value. The connection is
/// closed before this function returns; the browser is never blocked
/// for longer than one query.
///
/// # Errors
///
/// Returns [`StoreError::Missing`] when the file is absent, and
/// [`StoreError::Open`] / [`StoreError::Query`] when SQLite rejects it.
pub fn load_jar(profile_dir: &Path) -> Result<CookieJar, StoreError> {
    let path = profile_dir.join(STORE_FILE_NAME);
    if !path.exists() {
        return Err(StoreError::Missing { path });
    }

    let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|source| StoreError::Open {
            path: path.clone(),
            source,
        })?;

    let jar = read_all(&conn).map_err(|source| StoreError::Query {
        path: path.clone(),
        source,
    })?;

    debug!(
        store = %path.display(),
        hosts = jar.host_count(),
        cookies = jar.len(),
        "loaded cookie store"
    );
    Ok(jar)
}

fn read_all(conn: &Connection) -> Result<CookieJar, rusqlite::Error> {
    let mut stmt = conn.prepare("SELECT host, name, value, expiry, isSecure FROM moz_cookies")?;
    let rows = stmt.query_map([], |row| {
        Ok(StoreRow {
            host: row.get(0)?,
            name: row.get(1)?,
            value: row.get(2)?,
            expiry: row.get(3)?,
            is_secure: row.get(4)?,
        })
    })?;

    let mut jar = CookieJar::new();
    for row in rows {
        let row = row?;
        jar.insert(
            row.host,
            row.name,
            CookieRecord::new(row.value, row.expiry, row.is_secure != 0),
        );
    }
    Ok(jar)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Creates a profile directory holding a cookie database with the
    /// given rows, mirroring the columns Firefox actually writes.
    fn profile_with_cookies(rows: &[(&str, &str, &str, i64, i64)]) -> TempDir {
        let profile = TempDir::new().unwrap();
        let conn = Connection::open(profile.path().join(STORE_FILE_NAME)).unwrap();
        conn.execute_batch(
            "CREATE TABLE moz_cookies (
                id INTEGER PRIMARY KEY,
                originAttributes TEXT NOT NULL DEFAULT '',
                name TEXT,
                value TEXT,
                host TEXT,
                path TEXT,
                expiry INTEGER,
                isSecure INTEGER,
                isHttpOnly INTEGER,
                sameSite INTEGER DEFAULT 0
            )",
        )
        .unwrap();
        for (host, name, value, expiry, is_secure) in rows {
            conn.execute(
                "INSERT INTO moz_cookies (host, name, value, path, expiry, isSecure, isHttpOnly)
                 VALUES (?1, ?2, ?3, '/', ?4, ?5, 0)",
                rusqlite::params![host, name, value, expiry, is_secure],
            )
            .unwrap();
        }
        profile
    }

    #[test]
    fn test_load_jar_reads_all_rows() {
        let profile = profile_with_cookies(&[
            (".youtube.com", "SID", "sid-value", 1_900_000_000, 1),
            (".youtube.com", "HSID", "hsid-value", 1_900_000_000, 0),
            (".spotify.com", "sp_dc", "dc-value", 1_950_000_000, 1),
        ]);

        let jar = load_jar(profile.path()).unwrap();
        assert_eq!(jar.host_count(), 2);
        assert_eq!(jar.len(), 3);

        let sid = jar.get(".youtube.com", "SID").unwrap();
        assert_eq!(sid.value(), "sid-value");
        assert_eq!(sid.expiry, 1_900_000_000);
        assert!(sid.secure);

        let hsid = jar.get(".youtube.com", "HSID").unwrap();
        assert!(!hsid.secure);
    }

    #[test]
    fn test_load_jar_later_row_wins() {
        let profile = profile_with_cookies(&[
            (".spotify.com", "sp_dc", "stale", 1_000, 1),
            (".spotify.com", "sp_dc", "fresh", 2_000, 1),
        ]);

        let jar = load_jar(profile.path()).unwrap();
        assert_eq!(jar.len(), 1);
        let record = jar.get(".spotify.com", "sp_dc").unwrap();
        assert_eq!(record.value(), "fresh");
        assert_eq!(record.expiry, 2_000);
    }

    #[test]
    fn test_load_jar_empty_table() {
        let profile = profile_with_cookies(&[]);

        let jar = load_jar(profile.path()).unwrap();
        assert!(jar.is_empty());
    }

    #[test]
    fn test_load_jar_missing_store() {
        let profile = TempDir::new().unwrap();

        let result = load_jar(profile.path());
        assert!(matches!(result, Err(StoreError::Missing { .. })));
    }

    #[test]
    fn test_load_jar_corrupt_store() {
        let profile = TempDir::new().unwrap();
        fs::write(profile.path().join(STORE_FILE_NAME), b"this is not sqlite").unwrap();

        let result = load_jar(profile.path());
        assert!(result.is_err());
    }
}
