//! Request-scoped connections.
//!
//! Every request opens its own connection and drops it on every exit path.
//! A failed open does not abort the request here: the scope is left empty and
//! whichever operation needs the store fails with `DataUnavailable`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;

use crate::error::{BrowseError, Result};

pub trait ConnectionSource {
    fn connect(&self) -> rusqlite::Result<Connection>;

    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct SqliteFile {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteFile {
    pub fn new(path: impl Into<PathBuf>, busy_timeout: Duration) -> Self {
        Self {
            path: path.into(),
            busy_timeout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionSource for SqliteFile {
    fn connect(&self) -> rusqlite::Result<Connection> {
        use rusqlite::OpenFlags;
        // Never create the file implicitly; a missing database is unreachable.
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct RequestScope {
    conn: Option<Connection>,
    source: String,
}

impl RequestScope {
    pub fn acquire<S: ConnectionSource + ?Sized>(source: &S) -> Self {
        let conn = match source.connect() {
            Ok(conn) => Some(conn),
            Err(err) => {
                tracing::warn!(source = %source.describe(), error = %err, "connection unavailable");
                None
            }
        };
        Self {
            conn,
            source: source.describe(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    pub fn connection(&mut self) -> Result<&mut Connection> {
        match self.conn.as_mut() {
            Some(conn) => Ok(conn),
            None => Err(BrowseError::DataUnavailable(format!(
                "no connection to {}",
                self.source
            ))),
        }
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take()
            && let Err((_, err)) = conn.close()
        {
            tracing::warn!(source = %self.source, error = %err, "closing connection failed");
        }
        tracing::trace!(source = %self.source, "request scope released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unreachable;

    impl ConnectionSource for Unreachable {
        fn connect(&self) -> rusqlite::Result<Connection> {
            Err(rusqlite::Error::InvalidPath(PathBuf::from("/unreachable")))
        }

        fn describe(&self) -> String {
            "unreachable".to_string()
        }
    }

    #[test]
    fn failed_acquire_surfaces_data_unavailable() {
        let mut scope = RequestScope::acquire(&Unreachable);
        assert!(!scope.is_connected());
        assert!(matches!(
            scope.connection(),
            Err(BrowseError::DataUnavailable(_))
        ));
    }

    #[test]
    fn missing_file_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.sqlite");
        let source = SqliteFile::new(&path, Duration::from_millis(100));
        let scope = RequestScope::acquire(&source);
        assert!(!scope.is_connected());
        assert!(!path.exists());
    }
}
