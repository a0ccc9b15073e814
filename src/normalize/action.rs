//! Play-by-play normalization: clock values, id columns, and the two-pass
//! team/player fix-up.

use std::cmp::Reverse;
use std::collections::HashSet;

use tracing::warn;

use super::clock::{elapsed_interval, parse_clock};
use crate::models::{Action, RawAction};

fn nonzero(id: Option<i64>) -> Option<i64> {
    id.filter(|v| *v != 0)
}

fn parse_score(raw: &Option<String>) -> Option<i64> {
    raw.as_deref().and_then(|s| s.parse().ok())
}

/// Convert raw actions for one game into canonical tuples and apply the
/// team/player resolution passes. Rows without an action id cannot be keyed
/// and are dropped with a log line.
pub fn normalize_actions(game_id: &str, raw: &[RawAction]) -> Vec<Action> {
    let mut actions: Vec<Action> = raw
        .iter()
        .filter_map(|r| {
            let action_id = match r.action_id {
                Some(id) => id,
                None => {
                    warn!(game_id, "dropping action without actionId");
                    return None;
                }
            };
            let clock = r.clock.as_deref().and_then(|c| {
                let parsed = parse_clock(c);
                if parsed.is_none() {
                    warn!(game_id, action_id, clock = c, "unparsable clock value");
                }
                parsed
            });
            let elapsed = clock.as_deref().and_then(elapsed_interval);
            Some(Action {
                action_id,
                game_id: game_id.to_string(),
                action_number: r.action_number,
                clock,
                elapsed,
                period: r.period,
                // Zero means absent in the feed's id columns.
                team_id: nonzero(r.team_id),
                player_id: nonzero(r.person_id),
                x_legacy: r.x_legacy,
                y_legacy: r.y_legacy,
                shot_distance: r.shot_distance,
                is_field_goal: r.is_field_goal.map(|v| v != 0),
                score_home: parse_score(&r.score_home),
                score_away: parse_score(&r.score_away),
                points_total: r.points_total,
                location: r.location.clone(),
                description: r.description.clone(),
                action_type: r.action_type.clone(),
                sub_type: r.sub_type.clone(),
                shot_value: r.shot_value,
            })
        })
        .collect();

    resolve_team_player(&mut actions);
    actions
}

/// Two-pass team/player disambiguation over the feed's shared id space.
///
/// Pass 1: timeout events arrive with the team id in the player-id slot;
/// move it over and clear the player. Pass 2: any row whose team id is empty
/// but whose player id matches one of the game's observed team ids is
/// reinterpreted as team-level, and a player id equal to a known team id is
/// cleared even when the team id is already set.
///
/// This is a process-of-elimination heuristic over ids that can genuinely
/// collide (nothing stops a player id from matching a team id); it is kept
/// byte-for-byte compatible with the historical loader because downstream
/// aggregation depends on its exact behavior, imperfect or not.
pub fn resolve_team_player(actions: &mut [Action]) {
    for action in actions.iter_mut() {
        if action.action_type.as_deref() == Some("Timeout") {
            action.team_id = action.player_id.take();
        }
    }

    let team_ids: HashSet<i64> = actions.iter().filter_map(|a| a.team_id).collect();

    for action in actions.iter_mut() {
        match (action.team_id, action.player_id) {
            (None, Some(player)) if team_ids.contains(&player) => {
                action.team_id = Some(player);
                action.player_id = None;
            }
            (Some(_), Some(player)) if team_ids.contains(&player) => {
                action.player_id = None;
            }
            _ => {}
        }
    }
}

/// Order actions by (period, descending clock, action number), the total
/// order play-by-play carries within a game.
pub fn sort_actions(actions: &mut [Action]) {
    actions.sort_by(|a, b| {
        (a.period, Reverse(a.clock.as_deref()), a.action_number).cmp(&(
            b.period,
            Reverse(b.clock.as_deref()),
            b.action_number,
        ))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(action_id: i64, action_type: &str, team: Option<i64>, person: Option<i64>) -> RawAction {
        RawAction {
            action_id: Some(action_id),
            action_number: Some(action_id),
            clock: Some("PT10M00.00S".to_string()),
            period: Some(1),
            team_id: team,
            person_id: person,
            action_type: Some(action_type.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn timeout_moves_team_id_out_of_player_slot() {
        let rows = vec![
            raw(1, "Made Shot", Some(1610612743), Some(203999)),
            raw(2, "Timeout", None, Some(1610612743)),
        ];
        let actions = normalize_actions("G1", &rows);
        assert_eq!(actions[1].team_id, Some(1610612743));
        assert_eq!(actions[1].player_id, None);
    }

    #[test]
    fn empty_team_with_known_team_id_in_player_slot_is_reassigned() {
        let rows = vec![
            raw(1, "Made Shot", Some(100), Some(1)),
            raw(2, "Made Shot", Some(200), Some(2)),
            // team id missing, player slot holds team 200
            raw(3, "Substitution", None, Some(200)),
        ];
        let actions = normalize_actions("G1", &rows);
        assert_eq!(actions[2].team_id, Some(200));
        assert_eq!(actions[2].player_id, None);
    }

    #[test]
    fn player_id_matching_team_id_is_cleared_when_team_set() {
        let rows = vec![
            raw(1, "Made Shot", Some(100), Some(1)),
            raw(2, "Turnover", Some(100), Some(100)),
        ];
        let actions = normalize_actions("G1", &rows);
        assert_eq!(actions[1].team_id, Some(100));
        assert_eq!(actions[1].player_id, None);
    }

    #[test]
    fn shooting_rows_keep_both_ids() {
        let rows = vec![raw(1, "Made Shot", Some(100), Some(203999))];
        let actions = normalize_actions("G1", &rows);
        assert_eq!(actions[0].team_id, Some(100));
        assert_eq!(actions[0].player_id, Some(203999));
    }

    #[test]
    fn zero_ids_are_nulled() {
        let rows = vec![raw(1, "Jump Ball", Some(0), Some(0))];
        let actions = normalize_actions("G1", &rows);
        assert_eq!(actions[0].team_id, None);
        assert_eq!(actions[0].player_id, None);
    }

    #[test]
    fn bad_clock_becomes_null_not_error() {
        let mut row = raw(1, "Made Shot", Some(100), Some(2));
        row.clock = Some("eleven twenty".to_string());
        let actions = normalize_actions("G1", &[row]);
        assert_eq!(actions[0].clock, None);
        assert_eq!(actions[0].elapsed, None);
    }

    #[test]
    fn ordering_is_period_then_descending_clock() {
        let mut a1 = raw(1, "Made Shot", Some(100), Some(2));
        a1.clock = Some("PT01M00.00S".to_string());
        let mut a2 = raw(2, "Made Shot", Some(100), Some(2));
        a2.clock = Some("PT10M00.00S".to_string());
        let mut a3 = raw(3, "Made Shot", Some(100), Some(2));
        a3.period = Some(2);
        a3.clock = Some("PT12M00.00S".to_string());

        let mut actions = normalize_actions("G1", &[a1, a2, a3]);
        sort_actions(&mut actions);
        let ids: Vec<i64> = actions.iter().map(|a| a.action_id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }
}
