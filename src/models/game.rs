//! Season and game models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column layout of the merged game-log CSV. The trailing `processed` column
/// is reserved for the checkpoint tracker and never touched by the loader.
pub const GAME_LOG_HEADERS: [&str; 14] = [
    "SEASON_ID",
    "GAME_ID",
    "GAME_DATE",
    "MATCHUP",
    "HOME_TEAM_ID",
    "HOME_TEAM_ABBREVIATION",
    "HOME_TEAM_NAME",
    "HOME_WL",
    "AWAY_TEAM_ID",
    "AWAY_TEAM_ABBREVIATION",
    "AWAY_TEAM_NAME",
    "AWAY_WL",
    "SEASON_YEAR",
    "processed",
];

/// A season identified by its start year, e.g. `Season(2023)` is "2023-24".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Season(pub u16);

impl Season {
    /// Upstream label, start year plus two-digit end year.
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.0, (self.0 + 1) % 100)
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Season-type tag carried on every season-scoped request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonType {
    RegularSeason,
    Playoffs,
}

impl SeasonType {
    /// Value the upstream expects in the `SeasonType` parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::RegularSeason => "Regular Season",
            Self::Playoffs => "Playoffs",
        }
    }

    /// Filesystem-safe tag used in intermediate file paths.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::RegularSeason => "regular_season",
            Self::Playoffs => "playoffs",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "regular" | "regular_season" | "Regular Season" => Some(Self::RegularSeason),
            "playoffs" | "Playoffs" => Some(Self::Playoffs),
            _ => None,
        }
    }

    pub fn both() -> [SeasonType; 2] {
        [Self::RegularSeason, Self::Playoffs]
    }
}

/// One team's half of a merged game row.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSide {
    pub team_id: i64,
    pub abbreviation: String,
    pub name: String,
    /// "W" or "L"; missing for games not yet final.
    pub win_loss: Option<String>,
}

/// Derived home/away result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Home,
    Away,
}

impl GameResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "HOME",
            Self::Away => "AWAY",
        }
    }
}

/// A merged game row: one row per game, built from the two per-team rows the
/// upstream emits. Immutable once observed, except for the checkpoint flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub season_id: String,
    pub game_id: String,
    pub date: NaiveDate,
    pub matchup: String,
    pub home: TeamSide,
    pub away: TeamSide,
    /// Season label the row was fetched under, e.g. "2023-24".
    pub season_year: String,
    /// Checkpoint flag: true once this game's play-by-play has been durably
    /// extracted. Owned by the checkpoint tracker.
    pub processed: bool,
}

impl Game {
    /// Home/away result derived from the home side's win/loss marker.
    pub fn result(&self) -> GameResult {
        if self.home.win_loss.as_deref() == Some("W") {
            GameResult::Home
        } else {
            GameResult::Away
        }
    }

    pub fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.season_id.clone(),
            self.game_id.clone(),
            self.date.to_string(),
            self.matchup.clone(),
            self.home.team_id.to_string(),
            self.home.abbreviation.clone(),
            self.home.name.clone(),
            self.home.win_loss.clone().unwrap_or_default(),
            self.away.team_id.to_string(),
            self.away.abbreviation.clone(),
            self.away.name.clone(),
            self.away.win_loss.clone().unwrap_or_default(),
            self.season_year.clone(),
            self.processed.to_string(),
        ]
    }

    /// Parse a game-log CSV row. Rows written before the checkpoint column
    /// existed (13 fields) are treated as unprocessed.
    pub fn from_csv_row(row: &[String]) -> Option<Self> {
        if row.len() < 13 {
            return None;
        }
        let side = |id: &String, abbr: &String, name: &String, wl: &String| -> Option<TeamSide> {
            Some(TeamSide {
                team_id: id.parse().ok()?,
                abbreviation: abbr.clone(),
                name: name.clone(),
                win_loss: if wl.is_empty() { None } else { Some(wl.clone()) },
            })
        };
        Some(Game {
            season_id: row[0].clone(),
            game_id: row[1].clone(),
            date: row[2].parse().ok()?,
            matchup: row[3].clone(),
            home: side(&row[4], &row[5], &row[6], &row[7])?,
            away: side(&row[8], &row[9], &row[10], &row[11])?,
            season_year: row[12].clone(),
            processed: row.get(13).map(|v| v == "true").unwrap_or(false),
        })
    }
}
