//! Player-bios normalization: the combined player/team catalog feed into
//! separate team and player tuples.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::warn;

use super::NormalizeError;
use crate::models::{PlayerBio, ResultSet, TeamBio};

/// Convert the feed's "feet-inches" height form ("6-10") to total inches.
/// Anything else, including bare numbers, is treated as absent.
pub fn height_to_inches(raw: &str) -> Option<i64> {
    let (feet, inches) = raw.split_once('-')?;
    let feet: i64 = feet.trim().parse().ok()?;
    let inches: i64 = inches.trim().parse().ok()?;
    Some(feet * 12 + inches)
}

/// Extract a numeric jersey number. The feed sometimes carries ranged
/// values like "00-12" for players who changed numbers; keep the first.
pub fn clean_jersey_number(raw: &str) -> Option<i64> {
    let first = raw.split('-').next()?.trim();
    first.parse().ok()
}

/// Interpret the feed's roster-status cell. It arrives as 1/0, "1.0"/"0.0",
/// or null depending on the season queried.
pub fn roster_status(value: &Value) -> Option<bool> {
    match value {
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f != 0.0),
        _ => None,
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let t = s.trim();
            t.parse::<i64>()
                .ok()
                .or_else(|| t.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

fn float(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Split the bios result set into distinct teams and per-player rows.
/// Teams are keyed by id and deduplicated; players without an id are
/// dropped with a log line.
pub fn normalize_bios(rs: &ResultSet) -> Result<(Vec<TeamBio>, Vec<PlayerBio>), NormalizeError> {
    let idx_person = rs.require("PERSON_ID")?;
    let idx_team = rs.require("TEAM_ID")?;

    let idx_first = rs.column("PLAYER_FIRST_NAME");
    let idx_last = rs.column("PLAYER_LAST_NAME");
    let idx_slug = rs.column("PLAYER_SLUG");
    let idx_team_name = rs.column("TEAM_NAME");
    let idx_team_city = rs.column("TEAM_CITY");
    let idx_team_abbr = rs.column("TEAM_ABBREVIATION");
    let idx_team_slug = rs.column("TEAM_SLUG");
    let idx_defunct = rs.column("IS_DEFUNCT");
    let idx_jersey = rs.column("JERSEY_NUMBER");
    let idx_position = rs.column("POSITION");
    let idx_height = rs.column("HEIGHT");
    let idx_weight = rs.column("WEIGHT");
    let idx_college = rs.column("COLLEGE");
    let idx_country = rs.column("COUNTRY");
    let idx_draft_year = rs.column("DRAFT_YEAR");
    let idx_draft_round = rs.column("DRAFT_ROUND");
    let idx_draft_number = rs.column("DRAFT_NUMBER");
    let idx_roster = rs.column("ROSTER_STATUS");
    let idx_pts = rs.column("PTS");
    let idx_reb = rs.column("REB");
    let idx_ast = rs.column("AST");
    let idx_timeframe = rs.column("STATS_TIMEFRAME");
    let idx_from = rs.column("FROM_YEAR");
    let idx_to = rs.column("TO_YEAR");

    let mut teams: BTreeMap<i64, TeamBio> = BTreeMap::new();
    let mut players = Vec::with_capacity(rs.rows.len());

    for row in &rs.rows {
        let player_id = match integer(row.get(idx_person)) {
            Some(id) => id,
            None => {
                warn!("dropping bios row without PERSON_ID");
                continue;
            }
        };
        let team_id = integer(row.get(idx_team)).filter(|id| *id != 0);

        if let Some(id) = team_id {
            teams.entry(id).or_insert_with(|| TeamBio {
                team_id: id,
                name: idx_team_name.and_then(|i| text(row.get(i))),
                city: idx_team_city.and_then(|i| text(row.get(i))),
                abbreviation: idx_team_abbr.and_then(|i| text(row.get(i))),
                slug: idx_team_slug.and_then(|i| text(row.get(i))),
            });
        }

        players.push(PlayerBio {
            player_id,
            first_name: idx_first.and_then(|i| text(row.get(i))),
            last_name: idx_last.and_then(|i| text(row.get(i))),
            slug: idx_slug.and_then(|i| text(row.get(i))),
            team_id,
            is_defunct: idx_defunct
                .and_then(|i| integer(row.get(i)))
                .map(|v| v != 0),
            jersey_number: idx_jersey
                .and_then(|i| text(row.get(i)))
                .and_then(|s| clean_jersey_number(&s)),
            position: idx_position.and_then(|i| text(row.get(i))),
            height: idx_height
                .and_then(|i| text(row.get(i)))
                .and_then(|s| height_to_inches(&s)),
            weight: idx_weight.and_then(|i| float(row.get(i))),
            college: idx_college.and_then(|i| text(row.get(i))),
            country: idx_country.and_then(|i| text(row.get(i))),
            draft_year: idx_draft_year.and_then(|i| integer(row.get(i))),
            draft_round: idx_draft_round.and_then(|i| integer(row.get(i))),
            draft_number: idx_draft_number.and_then(|i| integer(row.get(i))),
            roster_status: idx_roster.and_then(|i| row.get(i)).and_then(roster_status),
            points: idx_pts.and_then(|i| float(row.get(i))),
            rebounds: idx_reb.and_then(|i| float(row.get(i))),
            assists: idx_ast.and_then(|i| float(row.get(i))),
            stats_timeframe: idx_timeframe.and_then(|i| text(row.get(i))),
            from_year: idx_from.and_then(|i| integer(row.get(i))),
            to_year: idx_to.and_then(|i| integer(row.get(i))),
        });
    }

    Ok((teams.into_values().collect(), players))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bios_set() -> ResultSet {
        let headers = [
            "PERSON_ID",
            "PLAYER_FIRST_NAME",
            "PLAYER_LAST_NAME",
            "PLAYER_SLUG",
            "TEAM_ID",
            "TEAM_CITY",
            "TEAM_NAME",
            "TEAM_ABBREVIATION",
            "TEAM_SLUG",
            "IS_DEFUNCT",
            "JERSEY_NUMBER",
            "POSITION",
            "HEIGHT",
            "WEIGHT",
            "COLLEGE",
            "COUNTRY",
            "DRAFT_YEAR",
            "DRAFT_ROUND",
            "DRAFT_NUMBER",
            "ROSTER_STATUS",
            "PTS",
            "REB",
            "AST",
            "STATS_TIMEFRAME",
            "FROM_YEAR",
            "TO_YEAR",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let rows = vec![
            vec![
                json!(203999),
                json!("Nikola"),
                json!("Jokic"),
                json!("nikola-jokic"),
                json!(1610612743),
                json!("Denver"),
                json!("Nuggets"),
                json!("DEN"),
                json!("nuggets"),
                json!(0),
                json!("15"),
                json!("C"),
                json!("6-11"),
                json!("284"),
                json!("Mega Basket"),
                json!("Serbia"),
                json!(2014),
                json!(2),
                json!(41),
                json!(1.0),
                json!(26.4),
                json!(12.4),
                json!(9.0),
                json!("Season"),
                json!(2015),
                json!(2023),
            ],
            vec![
                json!(1629027),
                json!("Jamal"),
                json!("Murray"),
                json!("jamal-murray"),
                json!(1610612743),
                json!("Denver"),
                json!("Nuggets"),
                json!("DEN"),
                json!("nuggets"),
                json!(0),
                json!("00-27"),
                json!("G"),
                json!("6-4"),
                json!("215"),
                json!("Kentucky"),
                json!("Canada"),
                json!(2016),
                json!(1),
                json!(7),
                json!("0.0"),
                json!(21.2),
                json!(4.1),
                json!(6.5),
                json!("Season"),
                json!(2016),
                json!(2023),
            ],
        ];
        ResultSet { headers, rows }
    }

    #[test]
    fn splits_teams_and_players() {
        let (teams, players) = normalize_bios(&bios_set()).unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].team_id, 1610612743);
        assert_eq!(teams[0].abbreviation.as_deref(), Some("DEN"));
        assert_eq!(players.len(), 2);
    }

    #[test]
    fn height_and_jersey_are_cleaned() {
        let (_, players) = normalize_bios(&bios_set()).unwrap();
        assert_eq!(players[0].height, Some(83));
        assert_eq!(players[0].jersey_number, Some(15));
        // ranged jersey keeps the first number
        assert_eq!(players[1].jersey_number, Some(0));
        assert_eq!(players[1].height, Some(76));
    }

    #[test]
    fn roster_status_variants() {
        assert_eq!(roster_status(&json!(1)), Some(true));
        assert_eq!(roster_status(&json!(0)), Some(false));
        assert_eq!(roster_status(&json!("1.0")), Some(true));
        assert_eq!(roster_status(&json!("0.0")), Some(false));
        assert_eq!(roster_status(&Value::Null), None);
    }

    #[test]
    fn height_parsing() {
        assert_eq!(height_to_inches("6-10"), Some(82));
        assert_eq!(height_to_inches("5-9"), Some(69));
        assert_eq!(height_to_inches("82"), None);
        assert_eq!(height_to_inches(""), None);
    }

    #[test]
    fn missing_person_column_rejects_unit() {
        let mut rs = bios_set();
        rs.headers[0] = "SOMETHING_ELSE".into();
        assert!(matches!(
            normalize_bios(&rs),
            Err(NormalizeError::MissingColumn(_))
        ));
    }
}
