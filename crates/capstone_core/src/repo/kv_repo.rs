//! Key-value repository contracts and implementations.
//!
//! # Responsibility
//! - Provide the read/write/clear contract dashboard state is persisted through.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - Keys are non-blank.
//! - `set_value` fully replaces the previous value for a key.
//! - `remove_value` on a missing key is a no-op, not an error.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const KV_TABLE: &str = "kv_entries";
const KV_REQUIRED_COLUMNS: &[&str] = &["key", "value", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors raised by key-value repositories.
#[derive(Debug)]
pub enum RepoError {
    /// SQLite transport or schema failure.
    Db(DbError),
    /// Connection was not bootstrapped through `open_db`/`open_db_in_memory`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Storage key is blank after trim.
    InvalidKey(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "storage connection is at schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::InvalidKey(key) => write!(f, "invalid storage key `{key}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Local key-value storage with synchronous read/write/clear semantics.
pub trait KvRepository {
    /// Returns the raw value stored under `key`, if any.
    fn get_value(&self, key: &str) -> RepoResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set_value(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Removes `key`. Returns whether an entry existed.
    fn remove_value(&self, key: &str) -> RepoResult<bool>;
}

impl<T: KvRepository + ?Sized> KvRepository for &T {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get_value(key)
    }

    fn set_value(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).set_value(key, value)
    }

    fn remove_value(&self, key: &str) -> RepoResult<bool> {
        (**self).remove_value(key)
    }
}

/// SQLite-backed key-value repository over the `kv_entries` table.
pub struct SqliteKvRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema was
    ///   tampered with.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl KvRepository for SqliteKvRepository<'_> {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>> {
        let key = normalize_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_value(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = normalize_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_entries (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_value(&self, key: &str) -> RepoResult<bool> {
        let key = normalize_key(key)?;
        let changed = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

/// Ephemeral key-value repository for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct InMemoryKvRepository {
    entries: RefCell<BTreeMap<String, String>>,
}

impl InMemoryKvRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KvRepository for InMemoryKvRepository {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>> {
        let key = normalize_key(key)?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_value(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = normalize_key(key)?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_value(&self, key: &str) -> RepoResult<bool> {
        let key = normalize_key(key)?;
        Ok(self.entries.borrow_mut().remove(key).is_some())
    }
}

fn normalize_key(key: &str) -> RepoResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidKey(key.to_string()));
    }
    Ok(trimmed)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version =
        conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [KV_TABLE],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable(KV_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([KV_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    for &column in KV_REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: KV_TABLE,
                column,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{normalize_key, InMemoryKvRepository, KvRepository, RepoError};

    #[test]
    fn normalize_key_rejects_blank_keys() {
        let err = normalize_key("   ").unwrap_err();
        assert!(matches!(err, RepoError::InvalidKey(_)));
        assert_eq!(normalize_key(" user ").unwrap(), "user");
    }

    #[test]
    fn in_memory_repository_replaces_and_removes_values() {
        let repo = InMemoryKvRepository::new();
        repo.set_value("user", "a").unwrap();
        repo.set_value("user", "b").unwrap();
        assert_eq!(repo.get_value("user").unwrap().as_deref(), Some("b"));
        assert_eq!(repo.len(), 1);

        assert!(repo.remove_value("user").unwrap());
        assert!(!repo.remove_value("user").unwrap());
        assert!(repo.is_empty());
    }
}
