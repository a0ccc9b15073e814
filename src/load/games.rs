//! Game-log loading.

use tracing::{info, warn};

use super::{LoadError, LoadStats};
use crate::checkpoint::GameLogFile;
use crate::config::Settings;
use crate::models::SeasonType;
use crate::store::Database;

/// Load both season types' game logs into the game table. Games already in
/// the store keep their original row.
pub fn load_games(db: &mut Database, settings: &Settings) -> Result<LoadStats, LoadError> {
    let mut stats = LoadStats::default();
    for season_type in SeasonType::both() {
        let path = settings.game_log_path(season_type);
        if !path.exists() {
            continue;
        }
        let log = match GameLogFile::load(&path) {
            Ok(log) => log,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable game log");
                stats.skipped += 1;
                continue;
            }
        };
        let inserted = db.insert_games(log.games())?;
        info!(path = %path.display(), inserted, "game log loaded");
        stats.files += 1;
        stats.rows += inserted;
    }
    stats.print_summary("game");
    Ok(stats)
}
