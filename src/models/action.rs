//! Play-by-play action models.
//!
//! [`RawAction`] mirrors one entry of the upstream's `game.actions` list and
//! also round-trips through the per-game intermediate CSV. [`Action`] is the
//! canonical relational tuple produced by the normalizer.

use serde::{Deserialize, Serialize};

/// Column layout of the per-game play-by-play intermediate CSV. Kept in the
/// upstream's camelCase so the raw files are a faithful capture.
pub const ACTION_CSV_HEADERS: [&str; 23] = [
    "actionId",
    "actionNumber",
    "clock",
    "period",
    "teamId",
    "teamTricode",
    "personId",
    "playerName",
    "playerNameI",
    "xLegacy",
    "yLegacy",
    "shotDistance",
    "shotResult",
    "isFieldGoal",
    "scoreHome",
    "scoreAway",
    "pointsTotal",
    "location",
    "description",
    "actionType",
    "subType",
    "videoAvailable",
    "shotValue",
];

/// One raw play-by-play event as the upstream emits it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawAction {
    pub action_id: Option<i64>,
    pub action_number: Option<i64>,
    /// Duration-coded game clock, e.g. "PT11M23.00S".
    pub clock: Option<String>,
    pub period: Option<i64>,
    pub team_id: Option<i64>,
    pub team_tricode: Option<String>,
    pub person_id: Option<i64>,
    pub player_name: Option<String>,
    pub player_name_i: Option<String>,
    pub x_legacy: Option<i64>,
    pub y_legacy: Option<i64>,
    pub shot_distance: Option<f64>,
    pub shot_result: Option<String>,
    pub is_field_goal: Option<i64>,
    pub score_home: Option<String>,
    pub score_away: Option<String>,
    pub points_total: Option<i64>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub action_type: Option<String>,
    pub sub_type: Option<String>,
    pub video_available: Option<i64>,
    pub shot_value: Option<i64>,
}

fn cell<T: ToString>(v: &Option<T>) -> String {
    v.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn parse_opt<T: std::str::FromStr>(s: &str) -> Option<T> {
    if s.is_empty() {
        None
    } else {
        s.parse().ok()
    }
}

fn text_opt(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

impl RawAction {
    pub fn to_csv_row(&self) -> Vec<String> {
        vec![
            cell(&self.action_id),
            cell(&self.action_number),
            cell(&self.clock),
            cell(&self.period),
            cell(&self.team_id),
            cell(&self.team_tricode),
            cell(&self.person_id),
            cell(&self.player_name),
            cell(&self.player_name_i),
            cell(&self.x_legacy),
            cell(&self.y_legacy),
            cell(&self.shot_distance),
            cell(&self.shot_result),
            cell(&self.is_field_goal),
            cell(&self.score_home),
            cell(&self.score_away),
            cell(&self.points_total),
            cell(&self.location),
            cell(&self.description),
            cell(&self.action_type),
            cell(&self.sub_type),
            cell(&self.video_available),
            cell(&self.shot_value),
        ]
    }

    pub fn from_csv_row(row: &[String]) -> Option<Self> {
        if row.len() < ACTION_CSV_HEADERS.len() {
            return None;
        }
        Some(RawAction {
            action_id: parse_opt(&row[0]),
            action_number: parse_opt(&row[1]),
            clock: text_opt(&row[2]),
            period: parse_opt(&row[3]),
            team_id: parse_opt(&row[4]),
            team_tricode: text_opt(&row[5]),
            person_id: parse_opt(&row[6]),
            player_name: text_opt(&row[7]),
            player_name_i: text_opt(&row[8]),
            x_legacy: parse_opt(&row[9]),
            y_legacy: parse_opt(&row[10]),
            shot_distance: parse_opt(&row[11]),
            shot_result: text_opt(&row[12]),
            is_field_goal: parse_opt(&row[13]),
            score_home: text_opt(&row[14]),
            score_away: text_opt(&row[15]),
            points_total: parse_opt(&row[16]),
            location: text_opt(&row[17]),
            description: text_opt(&row[18]),
            action_type: text_opt(&row[19]),
            sub_type: text_opt(&row[20]),
            video_available: parse_opt(&row[21]),
            shot_value: parse_opt(&row[22]),
        })
    }
}

/// A normalized play-by-play action, ready for the bulk loader.
///
/// Within a game, actions are totally ordered by (period, descending clock,
/// action number). Team-level events carry exactly one of team/player after
/// normalization; player-level shooting events may carry both.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub action_id: i64,
    pub game_id: String,
    pub action_number: Option<i64>,
    /// Normalized "MM:SS" game clock, None if the raw value was unparsable.
    pub clock: Option<String>,
    /// Human-readable elapsed form of the clock, e.g. "7 minutes 12 seconds".
    pub elapsed: Option<String>,
    pub period: Option<i64>,
    pub team_id: Option<i64>,
    pub player_id: Option<i64>,
    pub x_legacy: Option<i64>,
    pub y_legacy: Option<i64>,
    pub shot_distance: Option<f64>,
    pub is_field_goal: Option<bool>,
    pub score_home: Option<i64>,
    pub score_away: Option<i64>,
    pub points_total: Option<i64>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub action_type: Option<String>,
    pub sub_type: Option<String>,
    pub shot_value: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_action_csv_round_trip() {
        let raw = RawAction {
            action_id: Some(7),
            action_number: Some(4),
            clock: Some("PT11M23.00S".to_string()),
            period: Some(1),
            team_id: Some(1610612743),
            person_id: Some(203999),
            description: Some("Jokic 12' Jump Shot (2 PTS), assist".to_string()),
            action_type: Some("Made Shot".to_string()),
            is_field_goal: Some(1),
            ..Default::default()
        };
        let row = raw.to_csv_row();
        assert_eq!(row.len(), ACTION_CSV_HEADERS.len());
        assert_eq!(RawAction::from_csv_row(&row), Some(raw));
    }

    #[test]
    fn deserializes_from_upstream_json() {
        let raw: RawAction = serde_json::from_str(
            r#"{"actionId": 3, "actionNumber": 2, "clock": "PT12M00.00S",
                "period": 1, "teamId": 0, "personId": 2544,
                "actionType": "Jump Ball", "unknownField": true}"#,
        )
        .unwrap();
        assert_eq!(raw.action_id, Some(3));
        assert_eq!(raw.team_id, Some(0));
        assert_eq!(raw.action_type.as_deref(), Some("Jump Ball"));
    }
}
