//! Storage database behind the dashboard's key-value entries.
//!
//! # Responsibility
//! - Hand out a connection whose `kv_entries` table is ready to use.
//! - Keep schema upgrades ordered and all-or-nothing.
//!
//! # Invariants
//! - `PRAGMA user_version` records the last applied migration.
//! - A database stamped by a newer binary is never opened.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The storage file could not be opened or created.
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    /// Statement or migration failure on an open connection.
    Sqlite(rusqlite::Error),
    /// The file was written by a binary with a newer key-value schema.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open key-value store `{}`: {source}", path.display())
            }
            Self::Sqlite(err) => write!(f, "key-value store error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "key-value store schema v{db_version} needs a newer build (this one reads up to v{latest_supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Sqlite(source) => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
