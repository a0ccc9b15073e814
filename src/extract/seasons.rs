//! Season game-log extraction: fetch per-season logs and maintain the
//! merged, checkpointed game-log file.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use console::style;
use serde_json::Value;
use tracing::{info, warn};

use super::{ExtractError, ExtractStats, Extractor};
use crate::checkpoint::GameLogFile;
use crate::client::StatsApi;
use crate::endpoints::{game_log_params, Endpoint};
use crate::models::{Game, ResultSet, Season, SeasonType, TeamSide};
use crate::normalize::NormalizeError;

struct SideRow {
    season_id: String,
    date: Option<NaiveDate>,
    matchup: String,
    side: TeamSide,
    is_home: bool,
}

fn cell_text(row: &[Value], idx: usize) -> Option<String> {
    match row.get(idx)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn cell_id(row: &[Value], idx: usize) -> Option<i64> {
    match row.get(idx)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Merge the upstream's one-row-per-team game log into one row per game.
///
/// A row whose matchup contains "vs." is the home side; "@" marks the away
/// side. Games missing either side are dropped with a log line; they will
/// complete on a later extraction run.
pub fn merge_game_rows(rs: &ResultSet, season_year: &str) -> Result<Vec<Game>, NormalizeError> {
    let idx_season = rs.require("SEASON_ID")?;
    let idx_team = rs.require("TEAM_ID")?;
    let idx_abbr = rs.require("TEAM_ABBREVIATION")?;
    let idx_name = rs.require("TEAM_NAME")?;
    let idx_game = rs.require("GAME_ID")?;
    let idx_date = rs.require("GAME_DATE")?;
    let idx_matchup = rs.require("MATCHUP")?;
    let idx_wl = rs.require("WL")?;

    // game_id -> (home, away); BTreeMap keeps output in game-id order.
    let mut pairs: BTreeMap<String, (Option<SideRow>, Option<SideRow>)> = BTreeMap::new();

    for row in &rs.rows {
        let game_id = match cell_text(row, idx_game) {
            Some(id) => id,
            None => continue,
        };
        let matchup = cell_text(row, idx_matchup).unwrap_or_default();
        let is_home = if matchup.contains("vs.") {
            true
        } else if matchup.contains('@') {
            false
        } else {
            warn!(game_id, matchup, "matchup without side marker, dropping row");
            continue;
        };
        let side = match (cell_id(row, idx_team), cell_text(row, idx_abbr)) {
            (Some(team_id), Some(abbreviation)) => TeamSide {
                team_id,
                abbreviation,
                name: cell_text(row, idx_name).unwrap_or_default(),
                win_loss: cell_text(row, idx_wl),
            },
            _ => {
                warn!(game_id, "game-log row without team identity, dropping");
                continue;
            }
        };
        let entry = pairs.entry(game_id).or_insert((None, None));
        let slot = if is_home { &mut entry.0 } else { &mut entry.1 };
        *slot = Some(SideRow {
            season_id: cell_text(row, idx_season).unwrap_or_default(),
            date: cell_text(row, idx_date).and_then(|d| d.parse().ok()),
            matchup,
            side,
            is_home,
        });
    }

    let mut games = Vec::with_capacity(pairs.len());
    for (game_id, pair) in pairs {
        match pair {
            (Some(home), Some(away)) => {
                debug_assert!(home.is_home && !away.is_home);
                let date = match home.date.or(away.date) {
                    Some(d) => d,
                    None => {
                        warn!(game_id, "game without a parsable date, dropping");
                        continue;
                    }
                };
                games.push(Game {
                    season_id: home.season_id,
                    game_id,
                    date,
                    // The home side's matchup reads naturally ("DEN vs. LAL").
                    matchup: home.matchup,
                    home: home.side,
                    away: away.side,
                    season_year: season_year.to_string(),
                    processed: false,
                });
            }
            _ => warn!(game_id, "game missing one side, dropping"),
        }
    }
    Ok(games)
}

impl<'a, A: StatsApi> Extractor<'a, A> {
    /// Extract game logs for an inclusive season range, one season type at a
    /// time. Each season's merged games are appended to the game-log file
    /// and flushed before the next season is fetched.
    pub async fn extract_game_logs(
        &self,
        start: Season,
        end: Season,
        season_types: &[SeasonType],
    ) -> Result<ExtractStats, ExtractError> {
        let mut stats = ExtractStats::default();
        self.settings().ensure_directories()?;

        for &season_type in season_types {
            let mut log = GameLogFile::for_settings(self.settings(), season_type)?;
            println!(
                "\n{} Extracting {} game logs {}..={}",
                style("→").cyan(),
                season_type.slug(),
                start,
                end
            );

            for year in start.0..=end.0 {
                let season = Season(year);
                let body = match self
                    .fetch_unit(Endpoint::GameLog, &game_log_params(season, season_type))
                    .await?
                {
                    Some(body) => body,
                    None => {
                        stats.skipped += 1;
                        continue;
                    }
                };
                let rs = match ResultSet::from_response(&body) {
                    Ok(rs) => rs,
                    Err(e) => {
                        warn!(season = %season, error = %e, "skipping season");
                        stats.failed += 1;
                        continue;
                    }
                };
                let games = match merge_game_rows(&rs, &season.label()) {
                    Ok(games) => games,
                    Err(e) => {
                        warn!(season = %season, error = %e, "skipping season");
                        stats.failed += 1;
                        continue;
                    }
                };
                let added = log.append_games(games);
                log.flush()?;
                info!(season = %season, added, "season game log extracted");
                stats.fetched += 1;
            }
        }
        stats.print_summary("game log");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn log_set(rows: Vec<Vec<Value>>) -> ResultSet {
        ResultSet {
            headers: [
                "SEASON_ID",
                "TEAM_ID",
                "TEAM_ABBREVIATION",
                "TEAM_NAME",
                "GAME_ID",
                "GAME_DATE",
                "MATCHUP",
                "WL",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            rows,
        }
    }

    fn side(team: i64, abbr: &str, game: &str, matchup: &str, wl: &str) -> Vec<Value> {
        vec![
            json!("22023"),
            json!(team),
            json!(abbr),
            json!(format!("{} Full Name", abbr)),
            json!(game),
            json!("2023-10-24"),
            json!(matchup),
            json!(wl),
        ]
    }

    #[test]
    fn merges_two_rows_into_one_game() {
        let rs = log_set(vec![
            side(1, "DEN", "G1", "DEN vs. LAL", "W"),
            side(2, "LAL", "G1", "LAL @ DEN", "L"),
        ]);
        let games = merge_game_rows(&rs, "2023-24").unwrap();
        assert_eq!(games.len(), 1);
        let game = &games[0];
        assert_eq!(game.home.team_id, 1);
        assert_eq!(game.away.team_id, 2);
        assert_eq!(game.matchup, "DEN vs. LAL");
        assert_eq!(game.home.win_loss.as_deref(), Some("W"));
        assert!(!game.processed);
    }

    #[test]
    fn incomplete_pairs_are_dropped() {
        let rs = log_set(vec![
            side(1, "DEN", "G1", "DEN vs. LAL", "W"),
            side(2, "LAL", "G1", "LAL @ DEN", "L"),
            side(3, "BOS", "G2", "BOS vs. MIA", "W"),
        ]);
        let games = merge_game_rows(&rs, "2023-24").unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].game_id, "G1");
    }

    #[test]
    fn in_progress_games_keep_empty_win_loss() {
        let mut home = side(1, "DEN", "G1", "DEN vs. LAL", "");
        home[7] = Value::Null;
        let mut away = side(2, "LAL", "G1", "LAL @ DEN", "");
        away[7] = Value::Null;
        let games = merge_game_rows(&log_set(vec![home, away]), "2023-24").unwrap();
        assert_eq!(games[0].home.win_loss, None);
        assert_eq!(games[0].away.win_loss, None);
    }

    #[test]
    fn missing_column_is_an_error() {
        let mut rs = log_set(vec![]);
        rs.headers.remove(0);
        assert!(matches!(
            merge_game_rows(&rs, "2023-24"),
            Err(NormalizeError::MissingColumn(_))
        ));
    }
}
