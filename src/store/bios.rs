//! Team and player catalog writes.

use rusqlite::params;
use tracing::debug;

use super::{Database, Result};
use crate::models::{PlayerBio, TeamBio};

impl Database {
    /// Insert teams, keeping the first observed row per id.
    pub fn insert_teams(&mut self, teams: &[TeamBio]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO team (team_id, name, city, abbreviation, slug)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (team_id) DO NOTHING",
            )?;
            for team in teams {
                inserted += stmt.execute(params![
                    team.team_id,
                    team.name,
                    team.city,
                    team.abbreviation,
                    team.slug,
                ])?;
            }
        }
        tx.commit()?;
        debug!(batch = teams.len(), inserted, "team batch committed");
        Ok(inserted)
    }

    /// Insert players, keeping the first observed row per id.
    pub fn insert_players(&mut self, players: &[PlayerBio]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO player (
                    player_id, first_name, last_name, slug, team_id, is_defunct,
                    jersey_number, position, height, weight, college, country,
                    draft_year, draft_round, draft_number, roster_status,
                    points, rebounds, assists, stats_timeframe, from_year, to_year
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
                           ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22)
                 ON CONFLICT (player_id) DO NOTHING",
            )?;
            for player in players {
                inserted += stmt.execute(params![
                    player.player_id,
                    player.first_name,
                    player.last_name,
                    player.slug,
                    player.team_id,
                    player.is_defunct,
                    player.jersey_number,
                    player.position,
                    player.height,
                    player.weight,
                    player.college,
                    player.country,
                    player.draft_year,
                    player.draft_round,
                    player.draft_number,
                    player.roster_status,
                    player.points,
                    player.rebounds,
                    player.assists,
                    player.stats_timeframe,
                    player.from_year,
                    player.to_year,
                ])?;
            }
        }
        tx.commit()?;
        debug!(batch = players.len(), inserted, "player batch committed");
        Ok(inserted)
    }
}
