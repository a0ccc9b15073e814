//! Play-by-play table writes.

use rusqlite::params;
use tracing::debug;

use super::{Database, Result};
use crate::models::Action;

impl Database {
    /// Upsert one game's actions in a single transaction. Re-loading a game
    /// overwrites every non-key column, so the table always reflects the
    /// latest extracted file.
    pub fn upsert_actions(&mut self, actions: &[Action]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO play_by_play (
                    game_id, action_id, action_number, clock, elapsed, period,
                    team_id, player_id, x_legacy, y_legacy, shot_distance,
                    is_field_goal, score_home, score_away, points_total,
                    location, description, action_type, sub_type, shot_value
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                           ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
                 ON CONFLICT (game_id, action_id) DO UPDATE SET
                    action_number = excluded.action_number,
                    clock = excluded.clock,
                    elapsed = excluded.elapsed,
                    period = excluded.period,
                    team_id = excluded.team_id,
                    player_id = excluded.player_id,
                    x_legacy = excluded.x_legacy,
                    y_legacy = excluded.y_legacy,
                    shot_distance = excluded.shot_distance,
                    is_field_goal = excluded.is_field_goal,
                    score_home = excluded.score_home,
                    score_away = excluded.score_away,
                    points_total = excluded.points_total,
                    location = excluded.location,
                    description = excluded.description,
                    action_type = excluded.action_type,
                    sub_type = excluded.sub_type,
                    shot_value = excluded.shot_value",
            )?;
            for action in actions {
                stmt.execute(params![
                    action.game_id,
                    action.action_id,
                    action.action_number,
                    action.clock,
                    action.elapsed,
                    action.period,
                    action.team_id,
                    action.player_id,
                    action.x_legacy,
                    action.y_legacy,
                    action.shot_distance,
                    action.is_field_goal,
                    action.score_home,
                    action.score_away,
                    action.points_total,
                    action.location,
                    action.description,
                    action.action_type,
                    action.sub_type,
                    action.shot_value,
                ])?;
            }
        }
        tx.commit()?;
        debug!(batch = actions.len(), "play-by-play batch committed");
        Ok(actions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(game_id: &str, action_id: i64, description: &str) -> Action {
        Action {
            action_id,
            game_id: game_id.to_string(),
            action_number: Some(action_id),
            clock: Some("10:00".to_string()),
            elapsed: Some("10 minutes 0 seconds".to_string()),
            period: Some(1),
            team_id: Some(1),
            player_id: Some(42),
            x_legacy: None,
            y_legacy: None,
            shot_distance: None,
            is_field_goal: Some(false),
            score_home: None,
            score_away: None,
            points_total: None,
            location: None,
            description: Some(description.to_string()),
            action_type: Some("Made Shot".to_string()),
            sub_type: None,
            shot_value: None,
        }
    }

    #[test]
    fn reload_overwrites_non_key_columns() {
        let mut db = Database::open_in_memory().unwrap();
        db.upsert_actions(&[action("G1", 1, "first")]).unwrap();
        db.upsert_actions(&[action("G1", 1, "second")]).unwrap();

        let count: i64 = db.count("play_by_play").unwrap();
        assert_eq!(count, 1);
        let description: String = db
            .conn
            .query_row(
                "SELECT description FROM play_by_play WHERE game_id = 'G1' AND action_id = 1",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(description, "second");
    }

    #[test]
    fn same_action_id_in_different_games_coexists() {
        let mut db = Database::open_in_memory().unwrap();
        db.upsert_actions(&[action("G1", 1, "a"), action("G2", 1, "b")])
            .unwrap();
        assert_eq!(db.count("play_by_play").unwrap(), 2);
    }
}
