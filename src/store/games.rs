//! Game table writes.

use rusqlite::params;
use tracing::debug;

use super::{Database, Result};
use crate::models::Game;

impl Database {
    /// Insert a batch of games in one transaction. Games are immutable once
    /// observed; an id already present is left untouched. Returns how many
    /// rows were actually inserted.
    pub fn insert_games(&mut self, games: &[Game]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO game (game_id, season_id, season_year, game_date, matchup,
                                   home_team_id, away_team_id, result)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT (game_id) DO NOTHING",
            )?;
            for game in games {
                inserted += stmt.execute(params![
                    game.game_id,
                    game.season_id,
                    game.season_year,
                    game.date.to_string(),
                    game.matchup,
                    game.home.team_id,
                    game.away.team_id,
                    game.result().as_str(),
                ])?;
            }
        }
        tx.commit()?;
        debug!(batch = games.len(), inserted, "game batch committed");
        Ok(inserted)
    }
}
