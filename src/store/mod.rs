//! SQLite persistence for the normalized relational tables.
//!
//! One [`Database`] per process, opened at the start of a load run. Every
//! batch write runs inside a single transaction so a failed file load leaves
//! the table untouched. Conflict policy differs per table: reference tables
//! (game, team, player) keep the first observed row, fact tables
//! (play_by_play, boxscores) overwrite non-key columns so a re-load always
//! converges on the latest fetch.

mod actions;
mod bios;
mod boxscores;
mod games;

use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

pub use boxscores::category_table;

/// Store-level error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Handle on the SQLite database, schema initialized.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` and ensure the
    /// schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let db = Self { conn };
        db.init_schema()?;
        debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS game (
                game_id TEXT PRIMARY KEY,
                season_id TEXT NOT NULL,
                season_year TEXT NOT NULL,
                game_date TEXT NOT NULL,
                matchup TEXT NOT NULL,
                home_team_id INTEGER NOT NULL,
                away_team_id INTEGER NOT NULL,
                result TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS team (
                team_id INTEGER PRIMARY KEY,
                name TEXT,
                city TEXT,
                abbreviation TEXT,
                slug TEXT
            );
            CREATE TABLE IF NOT EXISTS player (
                player_id INTEGER PRIMARY KEY,
                first_name TEXT,
                last_name TEXT,
                slug TEXT,
                team_id INTEGER,
                is_defunct INTEGER,
                jersey_number INTEGER,
                position TEXT,
                height INTEGER,
                weight REAL,
                college TEXT,
                country TEXT,
                draft_year INTEGER,
                draft_round INTEGER,
                draft_number INTEGER,
                roster_status INTEGER,
                points REAL,
                rebounds REAL,
                assists REAL,
                stats_timeframe TEXT,
                from_year INTEGER,
                to_year INTEGER
            );
            CREATE TABLE IF NOT EXISTS play_by_play (
                game_id TEXT NOT NULL,
                action_id INTEGER NOT NULL,
                action_number INTEGER,
                clock TEXT,
                elapsed TEXT,
                period INTEGER,
                team_id INTEGER,
                player_id INTEGER,
                x_legacy REAL,
                y_legacy REAL,
                shot_distance REAL,
                is_field_goal INTEGER,
                score_home INTEGER,
                score_away INTEGER,
                points_total INTEGER,
                location TEXT,
                description TEXT,
                action_type TEXT,
                sub_type TEXT,
                shot_value INTEGER,
                PRIMARY KEY (game_id, action_id)
            );",
        )?;
        boxscores::init_boxscore_schema(&self.conn)?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn conn_for_tests(&self) -> &Connection {
        &self.conn
    }

    /// Total row count of a table. Status reporting only.
    pub fn count(&self, table: &str) -> Result<i64> {
        // Table names come from the fixed schema above, never user input.
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        Ok(self.conn.query_row(&sql, [], |row| row.get(0))?)
    }
}
