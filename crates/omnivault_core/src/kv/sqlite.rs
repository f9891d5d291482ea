//! SQLite-backed medium over the `kv_entries` table.

use super::{check_quota, KeyValueStore, KvResult};
use crate::config::CoreConfig;
use rusqlite::{params, Connection, OptionalExtension};

/// Medium borrowing a migrated connection from [`crate::db::open_db`].
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
    quota_bytes: Option<usize>,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            quota_bytes: None,
        }
    }

    /// Rejects values larger than `quota_bytes`; `None` lifts the limit.
    pub fn with_quota(conn: &'conn Connection, quota_bytes: Option<usize>) -> Self {
        Self { conn, quota_bytes }
    }

    /// Applies the quota from `config.storage_quota_bytes`.
    pub fn configured(conn: &'conn Connection, config: &CoreConfig) -> Self {
        Self::with_quota(conn, config.storage_quota_bytes)
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
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

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        check_quota(self.quota_bytes, value)?;
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}
