//! Application settings.
//!
//! All tunables live in one explicit struct passed into constructors; there
//! is no process-wide mutable session or configuration state.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::endpoints::{EntityKind, StatCategory};
use crate::models::{Season, SeasonType};

/// Default database filename inside the data directory.
pub const DEFAULT_DATABASE_FILENAME: &str = "courtline.db";

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory for intermediate files and the database.
    pub data_dir: PathBuf,
    /// Database filename.
    pub database_filename: String,
    /// Request timeout in seconds. The upstream throttles slow clients, so a
    /// request that hits this deadline is treated as fatal for the run.
    pub request_timeout: u64,
    /// Lower bound of the randomized inter-request delay, in milliseconds.
    pub delay_min_ms: u64,
    /// Upper bound of the randomized inter-request delay, in milliseconds.
    pub delay_max_ms: u64,
    /// Seed delay for exponential backoff after a rate-limit signal.
    pub backoff_seed_ms: u64,
    /// Maximum retries of one unit after consecutive rate-limit signals.
    pub max_retries: u32,
    /// Hard ceiling on requests per rolling minute (0 = unlimited).
    pub max_requests_per_minute: u32,
}

impl Default for Settings {
    fn default() -> Self {
        // Default to ~/Documents/courtline/ for user data.
        // Falls back gracefully: Documents dir -> Home dir -> Current dir
        let data_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("courtline");

        Self {
            data_dir,
            database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
            request_timeout: 10,
            delay_min_ms: 1_000,
            delay_max_ms: 5_000,
            backoff_seed_ms: 2_000,
            max_retries: 5,
            max_requests_per_minute: 30,
        }
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Full path to the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_filename)
    }

    /// Directory holding game logs and per-game play-by-play files.
    pub fn game_dir(&self) -> PathBuf {
        self.data_dir.join("game")
    }

    /// Merged game-log CSV for one season type (the checkpointed file).
    pub fn game_log_path(&self, season_type: SeasonType) -> PathBuf {
        self.game_dir()
            .join(format!("{}_game_logs.csv", season_type.slug()))
    }

    /// Per-game play-by-play intermediate file.
    pub fn play_by_play_path(
        &self,
        season_year: &str,
        season_type: SeasonType,
        game_id: &str,
    ) -> PathBuf {
        self.game_dir()
            .join(season_year)
            .join(season_type.slug())
            .join(format!("{}.csv", game_id))
    }

    /// Directory holding boxscore CSVs for one entity kind.
    pub fn boxscore_dir(&self, kind: EntityKind) -> PathBuf {
        self.data_dir.join(kind.slug()).join("boxscores")
    }

    /// Per-category boxscore intermediate file.
    pub fn boxscore_path(
        &self,
        kind: EntityKind,
        category: StatCategory,
        season: Season,
        season_type: SeasonType,
    ) -> PathBuf {
        self.boxscore_dir(kind).join(format!(
            "{}_{}_{}.csv",
            category.slug(),
            season.label(),
            season_type.slug()
        ))
    }

    /// Player bios catalog dump.
    pub fn bios_path(&self) -> PathBuf {
        self.data_dir.join("player_bios.csv")
    }

    /// Ensure the data directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        fs::create_dir_all(self.game_dir())?;
        fs::create_dir_all(self.boxscore_dir(EntityKind::Player))?;
        fs::create_dir_all(self.boxscore_dir(EntityKind::Team))?;
        Ok(())
    }
}
