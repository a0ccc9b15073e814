//! Boxscore normalization: columnar result-set rows to composite-keyed
//! tuples split by stat category.

use serde_json::Value;
use tracing::warn;

use super::{boxscore_id, round_stat, NormalizeError};
use crate::endpoints::{EntityKind, StatCategory};
use crate::models::{BoxscoreMeta, CategoryRow, ResultSet, StatValue};

const PLAYER_BASE: &[&str] = &[
    "FGM", "FGA", "FG_PCT", "FG3M", "FG3A", "FG3_PCT", "FTM", "FTA", "FT_PCT", "OREB", "DREB",
    "REB", "AST", "TOV", "STL", "BLK", "BLKA", "PF", "PFD", "PTS", "PLUS_MINUS", "DD2", "TD3",
    "MIN_SEC",
];

const PLAYER_ADVANCED: &[&str] = &[
    "OFF_RATING", "DEF_RATING", "NET_RATING", "AST_PCT", "AST_TO", "AST_RATIO", "OREB_PCT",
    "DREB_PCT", "REB_PCT", "TM_TOV_PCT", "EFG_PCT", "TS_PCT", "USG_PCT", "PACE", "PIE", "MIN_SEC",
];

const PLAYER_MISC: &[&str] = &[
    "PTS_OFF_TOV", "PTS_2ND_CHANCE", "PTS_FB", "PTS_PAINT", "OPP_PTS_OFF_TOV",
    "OPP_PTS_2ND_CHANCE", "OPP_PTS_FB", "OPP_PTS_PAINT", "BLK", "BLKA", "PF", "PFD", "MIN_SEC",
];

const PLAYER_SCORING: &[&str] = &[
    "PCT_FGA_2PT", "PCT_FGA_3PT", "PCT_PTS_2PT", "PCT_PTS_2PT_MR", "PCT_PTS_3PT", "PCT_PTS_FB",
    "PCT_PTS_FT", "PCT_PTS_OFF_TOV", "PCT_PTS_PAINT", "PCT_AST_2PM", "PCT_UAST_2PM",
    "PCT_AST_3PM", "PCT_UAST_3PM", "PCT_AST_FGM", "PCT_UAST_FGM", "FGM", "FGA", "FG_PCT",
    "MIN_SEC",
];

const PLAYER_USAGE: &[&str] = &[
    "USG_PCT", "PCT_FGM", "PCT_FGA", "PCT_FG3M", "PCT_FG3A", "PCT_FTM", "PCT_FTA", "PCT_OREB",
    "PCT_DREB", "PCT_REB", "PCT_AST", "PCT_TOV", "PCT_STL", "PCT_BLK", "PCT_BLKA", "PCT_PF",
    "PCT_PFD", "PCT_PTS", "MIN_SEC",
];

const TEAM_BASE: &[&str] = &[
    "FGM", "FGA", "FG_PCT", "FG3M", "FG3A", "FG3_PCT", "FTM", "FTA", "FT_PCT", "OREB", "DREB",
    "REB", "AST", "TOV", "STL", "BLK", "BLKA", "PF", "PFD", "PTS", "PLUS_MINUS",
];

const TEAM_ADVANCED: &[&str] = &[
    "OFF_RATING", "DEF_RATING", "NET_RATING", "AST_PCT", "AST_TO", "AST_RATIO", "OREB_PCT",
    "DREB_PCT", "REB_PCT", "TM_TOV_PCT", "EFG_PCT", "TS_PCT", "PACE", "PIE",
];

const TEAM_MISC: &[&str] = &[
    "PTS_OFF_TOV", "PTS_2ND_CHANCE", "PTS_FB", "PTS_PAINT", "OPP_PTS_OFF_TOV",
    "OPP_PTS_2ND_CHANCE", "OPP_PTS_FB", "OPP_PTS_PAINT",
];

const TEAM_SCORING: &[&str] = &[
    "PCT_FGA_2PT", "PCT_FGA_3PT", "PCT_PTS_2PT", "PCT_PTS_2PT_MR", "PCT_PTS_3PT", "PCT_PTS_FB",
    "PCT_PTS_FT", "PCT_PTS_OFF_TOV", "PCT_PTS_PAINT", "PCT_AST_2PM", "PCT_UAST_2PM",
    "PCT_AST_3PM", "PCT_UAST_3PM", "PCT_AST_FGM", "PCT_UAST_FGM",
];

const TEAM_FOUR_FACTORS: &[&str] = &[
    "EFG_PCT", "FTA_RATE", "TM_TOV_PCT", "OREB_PCT", "OPP_EFG_PCT", "OPP_FTA_RATE",
    "OPP_TOV_PCT", "OPP_OREB_PCT",
];

/// The fixed stat-column list for one (entity kind, category) table.
/// Rank and fantasy columns present in the raw feed are deliberately not
/// listed and therefore dropped.
pub fn category_columns(kind: EntityKind, category: StatCategory) -> &'static [&'static str] {
    match (kind, category) {
        (EntityKind::Player, StatCategory::Base) => PLAYER_BASE,
        (EntityKind::Player, StatCategory::Advanced) => PLAYER_ADVANCED,
        (EntityKind::Player, StatCategory::Misc) => PLAYER_MISC,
        (EntityKind::Player, StatCategory::Scoring) => PLAYER_SCORING,
        (EntityKind::Player, StatCategory::Usage) => PLAYER_USAGE,
        (EntityKind::Player, StatCategory::FourFactors) => &[],
        (EntityKind::Team, StatCategory::Base) => TEAM_BASE,
        (EntityKind::Team, StatCategory::Advanced) => TEAM_ADVANCED,
        (EntityKind::Team, StatCategory::Misc) => TEAM_MISC,
        (EntityKind::Team, StatCategory::Scoring) => TEAM_SCORING,
        (EntityKind::Team, StatCategory::FourFactors) => TEAM_FOUR_FACTORS,
        (EntityKind::Team, StatCategory::Usage) => &[],
    }
}

fn stat_cell(value: &Value) -> Option<StatValue> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64().map(|f| StatValue::Num(round_stat(f))),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => match s.parse::<f64>() {
            Ok(f) => Some(StatValue::Num(round_stat(f))),
            Err(_) => Some(StatValue::Text(s.clone())),
        },
        Value::Bool(b) => Some(StatValue::Num(if *b { 1.0 } else { 0.0 })),
        other => Some(StatValue::Text(other.to_string())),
    }
}

fn text_cell(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn id_cell(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Normalize one category's result set into (meta, category) tuple pairs.
/// A missing expected column rejects the whole unit; individual rows
/// lacking an entity or game id are dropped with a log line.
pub fn normalize_boxscores(
    rs: &ResultSet,
    kind: EntityKind,
    category: StatCategory,
) -> Result<Vec<(BoxscoreMeta, CategoryRow)>, NormalizeError> {
    let idx_entity = rs.require(kind.id_column())?;
    let idx_game = rs.require("GAME_ID")?;
    let idx_season = rs.require("SEASON_YEAR")?;
    let idx_team = match kind {
        EntityKind::Player => Some(rs.require("TEAM_ID")?),
        EntityKind::Team => None,
    };
    let idx_date = rs.column("GAME_DATE");
    let idx_matchup = rs.column("MATCHUP");
    let idx_wl = rs.column("WL");
    let idx_min = rs.column("MIN");

    let columns = category_columns(kind, category);
    let stat_indices: Vec<usize> = columns
        .iter()
        .map(|name| rs.require(name))
        .collect::<Result<_, _>>()?;

    let mut out = Vec::with_capacity(rs.rows.len());
    for row in &rs.rows {
        let entity_id = match id_cell(row.get(idx_entity)) {
            Some(id) => id,
            None => {
                warn!(column = kind.id_column(), "dropping row without entity id");
                continue;
            }
        };
        let game_id = match text_cell(row.get(idx_game)) {
            Some(id) => id,
            None => {
                warn!(entity_id, "dropping row without game id");
                continue;
            }
        };
        let key = boxscore_id(entity_id, &game_id);

        let meta = BoxscoreMeta {
            boxscore_id: key.clone(),
            season_year: text_cell(row.get(idx_season)).unwrap_or_default(),
            entity_id,
            team_id: idx_team
                .and_then(|i| id_cell(row.get(i)))
                .unwrap_or(entity_id),
            game_id,
            game_date: idx_date.and_then(|i| text_cell(row.get(i))),
            matchup: idx_matchup.and_then(|i| text_cell(row.get(i))),
            win_loss: idx_wl.and_then(|i| text_cell(row.get(i))),
            minutes: idx_min.and_then(|i| row.get(i)).and_then(Value::as_f64),
        };

        let values = stat_indices
            .iter()
            .map(|&i| row.get(i).and_then(stat_cell))
            .collect();

        out.push((
            meta,
            CategoryRow {
                boxscore_id: key,
                values,
            },
        ));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn four_factors_set() -> ResultSet {
        let mut headers: Vec<String> = vec![
            "SEASON_YEAR".into(),
            "TEAM_ID".into(),
            "GAME_ID".into(),
            "GAME_DATE".into(),
            "MATCHUP".into(),
            "WL".into(),
            "MIN".into(),
        ];
        headers.extend(TEAM_FOUR_FACTORS.iter().map(|s| s.to_string()));

        let mut row = vec![
            json!("2023-24"),
            json!(1610612743),
            json!("0022300001"),
            json!("2023-10-24"),
            json!("DEN vs. LAL"),
            json!("W"),
            json!(240.0),
        ];
        row.extend((0..TEAM_FOUR_FACTORS.len()).map(|i| json!(0.1234567 * i as f64)));
        ResultSet {
            headers,
            rows: vec![row],
        }
    }

    #[test]
    fn builds_composite_key_and_rounds_stats() {
        let rs = four_factors_set();
        let rows = normalize_boxscores(&rs, EntityKind::Team, StatCategory::FourFactors).unwrap();
        assert_eq!(rows.len(), 1);
        let (meta, stats) = &rows[0];
        assert_eq!(meta.boxscore_id, "1610612743-0022300001");
        assert_eq!(meta.team_id, meta.entity_id);
        assert_eq!(stats.values.len(), TEAM_FOUR_FACTORS.len());
        // 0.1234567 * 2 rounded to three decimals
        assert_eq!(stats.values[2], Some(StatValue::Num(0.247)));
    }

    #[test]
    fn missing_stat_column_rejects_unit() {
        let mut rs = four_factors_set();
        rs.headers.pop();
        for row in &mut rs.rows {
            row.pop();
        }
        let err = normalize_boxscores(&rs, EntityKind::Team, StatCategory::FourFactors)
            .unwrap_err();
        assert!(matches!(err, NormalizeError::MissingColumn(_)));
    }

    #[test]
    fn rows_without_ids_are_dropped() {
        let mut rs = four_factors_set();
        let mut bad = rs.rows[0].clone();
        bad[1] = Value::Null;
        rs.rows.push(bad);
        let rows = normalize_boxscores(&rs, EntityKind::Team, StatCategory::FourFactors).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
