//! Durable extraction checkpoint, kept as a column in the merged game-log
//! CSV.
//!
//! The tracker owns the `processed` column of the game log: a game is marked
//! only after its play-by-play file is durably on disk, and every mutation
//! goes through an atomic whole-file rewrite. Progress can therefore only
//! move forward; a crash between fetch and flush re-extracts at most the
//! in-flight game.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::csvio;
use crate::models::{Game, SeasonType, GAME_LOG_HEADERS};

/// One season type's merged game log plus its checkpoint state.
#[derive(Debug)]
pub struct GameLogFile {
    path: PathBuf,
    games: Vec<Game>,
}

impl GameLogFile {
    /// Load the game log at `path`, or start empty if it does not exist.
    /// Unparsable rows are dropped with a log line rather than aborting.
    pub fn load(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            return Ok(Self {
                path: path.to_path_buf(),
                games: Vec::new(),
            });
        }
        let (_, rows) = csvio::read_file(path)?;
        let mut games = Vec::with_capacity(rows.len());
        for row in &rows {
            match Game::from_csv_row(row) {
                Some(game) => games.push(game),
                None => warn!(path = %path.display(), "skipping unparsable game-log row"),
            }
        }
        debug!(path = %path.display(), games = games.len(), "loaded game log");
        Ok(Self {
            path: path.to_path_buf(),
            games,
        })
    }

    pub fn for_settings(settings: &Settings, season_type: SeasonType) -> io::Result<Self> {
        Self::load(&settings.game_log_path(season_type))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Games whose play-by-play has not yet been extracted, in file order.
    pub fn unprocessed(&self) -> impl Iterator<Item = &Game> {
        self.games.iter().filter(|g| !g.processed)
    }

    /// Append newly merged games, skipping ids already present. Existing
    /// rows keep their checkpoint flag. Returns how many were added.
    pub fn append_games(&mut self, incoming: Vec<Game>) -> usize {
        let known: HashSet<String> = self.games.iter().map(|g| g.game_id.clone()).collect();
        let mut added = 0;
        for game in incoming {
            if known.contains(&game.game_id) {
                continue;
            }
            self.games.push(game);
            added += 1;
        }
        added
    }

    /// Mark one game processed. The flag is monotone; marking an already
    /// processed game is a no-op. Returns whether state changed.
    pub fn mark_processed(&mut self, game_id: &str) -> bool {
        match self.games.iter_mut().find(|g| g.game_id == game_id) {
            Some(game) if !game.processed => {
                game.processed = true;
                true
            }
            _ => false,
        }
    }

    /// Clear every checkpoint flag. Used by `checkpoint reset`.
    pub fn reset(&mut self) -> usize {
        let mut cleared = 0;
        for game in &mut self.games {
            if game.processed {
                game.processed = false;
                cleared += 1;
            }
        }
        cleared
    }

    /// Rebuild the checkpoint column from what is actually on disk: a game
    /// is processed exactly when its play-by-play file exists. Recovers the
    /// tracker after manual file moves or a restored backup.
    pub fn sync_from_disk(&mut self, settings: &Settings, season_type: SeasonType) -> usize {
        let mut changed = 0;
        for game in &mut self.games {
            let on_disk = settings
                .play_by_play_path(&game.season_year, season_type, &game.game_id)
                .exists();
            if game.processed != on_disk {
                game.processed = on_disk;
                changed += 1;
            }
        }
        if changed > 0 {
            info!(path = %self.path.display(), changed, "resynced checkpoint from disk");
        }
        changed
    }

    /// Persist the current state via an atomic replace.
    pub fn flush(&self) -> io::Result<()> {
        let headers: Vec<String> = GAME_LOG_HEADERS.iter().map(|h| h.to_string()).collect();
        let rows: Vec<Vec<String>> = self.games.iter().map(Game::to_csv_row).collect();
        csvio::write_rows_atomic(&self.path, &headers, &rows)
    }

    /// Counts of (processed, total) for status reporting.
    pub fn progress(&self) -> (usize, usize) {
        let done = self.games.iter().filter(|g| g.processed).count();
        (done, self.games.len())
    }
}
