// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::TrackerConfig;
use crate::error::StorageError;
use crate::store::{ExternalChange, KeyValueStore};
use crate::utils::generate_id;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Pumpkin", "pumpkin"));

const PROBE_KEY: &str = "__pumpkin_probe__";

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("pumpkin.sqlite"))
}

pub fn open_or_init(config: &TrackerConfig) -> Result<SqliteStore> {
    let path = db_path()?;
    SqliteStore::open(&path, config.quota_bytes)
}

/// Key-value store in a single SQLite table, shared by every process that opens the file.
///
/// Each write bumps a global revision and records the writing handle, so a handle can
/// ask what others changed since it last looked. Removals leave a NULL tombstone for
/// the same reason.
pub struct SqliteStore {
    conn: Connection,
    writer: String,
    last_seen_rev: i64,
    quota_bytes: Option<usize>,
    available: bool,
}

impl SqliteStore {
    pub fn open(path: &Path, quota_bytes: Option<usize>) -> Result<Self> {
        let conn =
            Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
        init_schema(&conn)?;
        let last_seen_rev = max_rev(&conn)?;
        let available = probe(&conn);
        if !available {
            warn!(path = %path.display(), "storage probe failed");
        }
        Ok(Self {
            conn,
            writer: generate_id(),
            last_seen_rev,
            quota_bytes,
            available,
        })
    }

    /// Values written by other handles since the previous poll, oldest first.
    pub fn poll_external_changes(&mut self) -> Result<Vec<ExternalChange>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM kv WHERE rev > ?1 AND writer != ?2 ORDER BY rev")
            .map_err(|e| backend_err(&e))?;
        let rows = stmt
            .query_map(params![self.last_seen_rev, self.writer], |r| {
                Ok(ExternalChange {
                    key: r.get(0)?,
                    value: r.get(1)?,
                })
            })
            .map_err(|e| backend_err(&e))?;
        let mut changes = Vec::new();
        for row in rows {
            changes.push(row.map_err(|e| backend_err(&e))?);
        }
        drop(stmt);
        self.last_seen_rev = max_rev(&self.conn).map_err(|e| StorageError::Backend(e.to_string()))?;
        debug!(count = changes.len(), "polled external changes");
        Ok(changes)
    }

    fn next_rev(&self) -> Result<i64, StorageError> {
        self.conn
            .query_row("SELECT IFNULL(MAX(rev), 0) + 1 FROM kv", [], |r| r.get(0))
            .map_err(|e| backend_err(&e))
    }

    fn used_bytes_except(&self, key: &str) -> Result<usize, StorageError> {
        let used: i64 = self
            .conn
            .query_row(
                "SELECT IFNULL(SUM(length(CAST(key AS BLOB)) + length(CAST(value AS BLOB))), 0)
                 FROM kv WHERE key != ?1 AND value IS NOT NULL",
                params![key],
                |r| r.get(0),
            )
            .map_err(|e| backend_err(&e))?;
        Ok(used.max(0) as usize)
    }

    fn write(&mut self, key: &str, value: Option<&str>) -> Result<(), StorageError> {
        let rev = self.next_rev()?;
        self.conn
            .execute(
                "INSERT INTO kv(key, value, rev, writer) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(key) DO UPDATE SET value=excluded.value, rev=excluded.rev,
                 writer=excluded.writer, updated_at=datetime('now')",
                params![key, value, rev, self.writer],
            )
            .map_err(|e| write_err(key, &e))?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        let v: Option<Option<String>> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key=?1", params![key], |r| r.get(0))
            .optional()
            .map_err(|e| backend_err(&e))?;
        Ok(v.flatten())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        if let Some(quota) = self.quota_bytes {
            if self.used_bytes_except(key)? + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        self.write(key, Some(value))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        self.write(key, None)
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS kv(
        key TEXT PRIMARY KEY,
        value TEXT,
        rev INTEGER NOT NULL,
        writer TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_kv_rev ON kv(rev);
    "#,
    )?;
    Ok(())
}

fn max_rev(conn: &Connection) -> Result<i64> {
    let rev = conn.query_row("SELECT IFNULL(MAX(rev), 0) FROM kv", [], |r| r.get(0))?;
    Ok(rev)
}

fn probe(conn: &Connection) -> bool {
    conn.execute(
        "INSERT OR REPLACE INTO kv(key, value, rev, writer) VALUES (?1, 'test', 0, '')",
        params![PROBE_KEY],
    )
    .and_then(|_| conn.execute("DELETE FROM kv WHERE key=?1", params![PROBE_KEY]))
    .is_ok()
}

fn backend_err(e: &rusqlite::Error) -> StorageError {
    StorageError::Backend(e.to_string())
}

fn write_err(key: &str, e: &rusqlite::Error) -> StorageError {
    match e.sqlite_error_code() {
        Some(ErrorCode::DiskFull) => StorageError::QuotaExceeded {
            key: key.to_string(),
        },
        Some(ErrorCode::ReadOnly) | Some(ErrorCode::CannotOpen) => StorageError::Unavailable,
        _ => backend_err(e),
    }
}
