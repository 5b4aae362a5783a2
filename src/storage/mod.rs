//! Persistent game history using SQLite (rusqlite)
//!
//! Finished games are appended to a single table so the highest score
//! survives restarts. The database lives in the OS-standard data directory
//! (via the `directories` crate).

use directories::ProjectDirs;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info};

/// Current schema version. Bump this when making schema changes.
const SCHEMA_VERSION: u32 = 1;

const DB_FILE: &str = "wordslot.db";

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("could not determine data directory")]
    NoDataDirectory,
    #[error("database schema version {found} is newer than supported version {supported}")]
    FutureSchemaVersion { found: u32, supported: u32 },
    #[error("failed to create data directory: {0}")]
    CreateDirFailed(std::io::Error),
}

/// One finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub id: i64,
    /// Unix timestamp (milliseconds) when the game ended
    pub finished_at: i64,
    pub score: u32,
    pub words: u32,
}

/// Handle to the game history database.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the history database.
    ///
    /// - Linux: `$XDG_DATA_HOME/wordslot/` or `~/.local/share/wordslot/`
    /// - macOS: `~/Library/Application Support/wordslot/`
    pub fn open() -> Result<Self, StorageError> {
        let data_dir = Self::data_dir()?;
        std::fs::create_dir_all(&data_dir).map_err(StorageError::CreateDirFailed)?;

        let db_path = data_dir.join(DB_FILE);
        debug!(path = %db_path.display(), "opening game history");
        let storage = Storage {
            conn: Connection::open(&db_path)?,
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let storage = Storage {
            conn: Connection::open_in_memory()?,
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Get the OS-standard data directory.
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "wordslot")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    /// Append a finished game.
    pub fn record_game(&self, score: u32, words: u32) -> Result<GameRecord, StorageError> {
        let finished_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        self.conn.execute(
            "INSERT INTO games (finished_at, score, words) VALUES (?1, ?2, ?3)",
            params![finished_at, score, words],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, score, words, "game recorded");
        Ok(GameRecord {
            id,
            finished_at,
            score,
            words,
        })
    }

    /// Highest score across all recorded games (0 if none).
    pub fn best_score(&self) -> Result<u32, StorageError> {
        let best: u32 = self
            .conn
            .query_row("SELECT COALESCE(MAX(score), 0) FROM games", [], |row| row.get(0))?;
        Ok(best)
    }

    /// Number of recorded games.
    pub fn games_played(&self) -> Result<u32, StorageError> {
        let count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Most recent games, newest first.
    pub fn recent_games(&self, limit: usize) -> Result<Vec<GameRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, finished_at, score, words FROM games ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(GameRecord {
                id: row.get(0)?,
                finished_at: row.get(1)?,
                score: row.get(2)?,
                words: row.get(3)?,
            })
        })?;
        let games = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(games)
    }

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema_v1()?;
        } else if current_version > SCHEMA_VERSION {
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: u32 = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(version)
    }

    fn create_schema_v1(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE meta (
                schema_version INTEGER NOT NULL
            );

            CREATE TABLE games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                finished_at INTEGER NOT NULL,
                score INTEGER NOT NULL,
                words INTEGER NOT NULL
            );

            CREATE INDEX idx_games_score ON games (score);
            "#,
        )?;
        self.conn.execute(
            "INSERT INTO meta (schema_version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(())
    }
}
