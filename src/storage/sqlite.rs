use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};

use super::{migrations::run_migrations, SnapshotSlot};

/// Snapshot stored as one row of a key/value table in SQLite.
pub struct SqliteSlot {
    conn: Connection,
    key: String,
    db_path: Option<PathBuf>,
}

impl SqliteSlot {
    pub fn open(db_path: PathBuf, key: impl Into<String>) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let conn = Connection::open(&db_path).context("failed to open SQLite database")?;
        if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
            error!("Failed to enable WAL mode: {err}");
        }

        let slot = Self::from_connection(conn, key, Some(db_path))?;
        info!("Snapshot database initialized at {}", slot.describe());
        Ok(slot)
    }

    pub fn open_in_memory(key: impl Into<String>) -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory SQLite")?;
        Self::from_connection(conn, key, None)
    }

    fn from_connection(
        mut conn: Connection,
        key: impl Into<String>,
        db_path: Option<PathBuf>,
    ) -> Result<Self> {
        run_migrations(&mut conn).context("failed to run database migrations")?;
        Ok(Self {
            conn,
            key: key.into(),
            db_path,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }
}

impl SnapshotSlot for SqliteSlot {
    fn load(&self) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT payload FROM snapshots WHERE key = ?1",
                params![self.key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("failed to read snapshot '{}'", self.key))
    }

    fn save(&mut self, payload: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO snapshots (key, payload, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                     payload = excluded.payload,
                     updated_at = excluded.updated_at",
                params![self.key, payload, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("failed to write snapshot '{}'", self.key))?;
        Ok(())
    }

    fn describe(&self) -> String {
        match &self.db_path {
            Some(path) => format!("{}#{}", path.display(), self.key),
            None => format!(":memory:#{}", self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_replaces_previous_payload() {
        let mut slot = SqliteSlot::open_in_memory("moodbloom-storage").unwrap();
        assert!(slot.load().unwrap().is_none());

        slot.save("first").unwrap();
        slot.save("second").unwrap();

        assert_eq!(slot.load().unwrap().as_deref(), Some("second"));
        let rows: i64 = slot
            .conn
            .query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn keys_are_independent() {
        let mut slot = SqliteSlot::open_in_memory("a").unwrap();
        slot.save("payload-a").unwrap();

        let other = SqliteSlot {
            conn: slot.conn,
            key: "b".into(),
            db_path: None,
        };
        assert!(other.load().unwrap().is_none());
    }
}
