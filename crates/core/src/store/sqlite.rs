//! SQLite-backed record store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{
    HistoryEntry, KeywordPatterns, RecordStore, StoreError, TorrentFile, TorrentRecord, TrendItem,
    TrendPeriod,
};

/// SQLite-backed record store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            -- Canonical torrent metadata (one row per info hash)
            CREATE TABLE IF NOT EXISTS torrents (
                infohash TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                create_time TEXT NOT NULL,
                length INTEGER NOT NULL DEFAULT 0,
                file_count INTEGER NOT NULL DEFAULT 0,
                files TEXT NOT NULL DEFAULT '[]',
                heat INTEGER NOT NULL DEFAULT 0
            );

            -- Append-only search log
            CREATE TABLE IF NOT EXISTS search_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                keyword TEXT NOT NULL,
                origin TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_search_history_created ON search_history(created_at);

            CREATE TABLE IF NOT EXISTS recommendations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                keyword TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS keyword_blocklist (
                pattern TEXT PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS keyword_allowlist (
                pattern TEXT PRIMARY KEY
            );

            -- Trend lists are written by an external job
            CREATE TABLE IF NOT EXISTS trends (
                period TEXT NOT NULL,
                rank INTEGER NOT NULL,
                keyword TEXT NOT NULL,
                heat INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (period, rank)
            );
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Internal("connection lock poisoned".to_string()))
    }

    /// Insert or replace a torrent record.
    pub fn insert_torrent(&self, record: &TorrentRecord) -> Result<(), StoreError> {
        let files = serde_json::to_string(&record.files)
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO torrents (infohash, name, create_time, length, file_count, files, heat)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                record.infohash.to_lowercase(),
                &record.name,
                record.create_time.to_rfc3339(),
                record.length,
                record.file_count,
                files,
                record.heat,
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    /// Append a keyword to the recommendation list (no-op if present).
    pub fn add_recommendation(&self, keyword: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO recommendations (keyword) VALUES (?)",
            params![keyword],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    pub fn add_block_pattern(&self, pattern: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO keyword_blocklist (pattern) VALUES (?)",
            params![pattern],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    pub fn add_allow_pattern(&self, pattern: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO keyword_allowlist (pattern) VALUES (?)",
            params![pattern],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    /// Replace the trend list for a period.
    pub fn set_trends(&self, period: TrendPeriod, items: &[TrendItem]) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        tx.execute("DELETE FROM trends WHERE period = ?", params![period.as_str()])
            .map_err(|e| StoreError::Database(e.to_string()))?;
        for (rank, item) in items.iter().enumerate() {
            tx.execute(
                "INSERT INTO trends (period, rank, keyword, heat) VALUES (?, ?, ?, ?)",
                params![period.as_str(), rank as i64, &item.keyword, item.heat],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
        }
        tx.commit()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    /// Most recent history entries, newest first.
    pub fn recent_history(&self, limit: u32) -> Result<Vec<HistoryEntry>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT keyword, origin, created_at FROM search_history
                 ORDER BY id DESC LIMIT ?",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![limit], |row| {
                let created_at_str: String = row.get(2)?;
                Ok(HistoryEntry {
                    keyword: row.get(0)?,
                    origin: row.get(1)?,
                    created_at: parse_timestamp(&created_at_str),
                })
            })
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(entries)
    }

    fn load_patterns(conn: &Connection, table: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = conn
            .prepare(&format!("SELECT pattern FROM {} ORDER BY pattern", table))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut patterns = Vec::new();
        for row in rows {
            patterns.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(patterns)
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<TorrentRecord> {
        let create_time_str: String = row.get(2)?;
        let files_json: String = row.get(5)?;
        // A corrupt file list should not hide the torrent itself
        let files: Vec<TorrentFile> = serde_json::from_str(&files_json).unwrap_or_default();

        Ok(TorrentRecord {
            infohash: row.get(0)?,
            name: row.get(1)?,
            create_time: parse_timestamp(&create_time_str),
            length: row.get(3)?,
            file_count: row.get(4)?,
            files,
            heat: row.get(6)?,
        })
    }
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

impl RecordStore for SqliteStore {
    fn create_history(&self, keyword: &str, origin: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO search_history (keyword, origin, created_at) VALUES (?, ?, ?)",
            params![keyword, origin, Utc::now().to_rfc3339()],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    fn recommendations(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT keyword FROM recommendations ORDER BY id")
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut keywords = Vec::new();
        for row in rows {
            keywords.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(keywords)
    }

    fn get_torrent(&self, infohash: &str) -> Result<TorrentRecord, StoreError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT infohash, name, create_time, length, file_count, files, heat
             FROM torrents WHERE infohash = ?",
            params![infohash.to_lowercase()],
            Self::row_to_record,
        )
        .optional()
        .map_err(|e| StoreError::Database(e.to_string()))?
        .ok_or_else(|| StoreError::NotFound(infohash.to_string()))
    }

    fn trends(&self, period: TrendPeriod) -> Result<Vec<TrendItem>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT keyword, heat FROM trends WHERE period = ? ORDER BY rank")
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![period.as_str()], |row| {
                Ok(TrendItem {
                    keyword: row.get(0)?,
                    heat: row.get(1)?,
                })
            })
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(items)
    }

    fn keyword_patterns(&self) -> Result<KeywordPatterns, StoreError> {
        let conn = self.conn()?;
        Ok(KeywordPatterns {
            block: Self::load_patterns(&conn, "keyword_blocklist")?,
            allow: Self::load_patterns(&conn, "keyword_allowlist")?,
        })
    }
}
