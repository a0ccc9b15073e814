//! Boxscore models: composite-keyed aggregates split across stat categories.

use rusqlite::types::{ToSql, ToSqlOutput};

/// Shared identifying columns of a boxscore row, common to every category.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxscoreMeta {
    /// Composite idempotency key: `{entity_id}-{game_id}`.
    pub boxscore_id: String,
    pub season_year: String,
    /// Player id for player boxscores, team id for team boxscores.
    pub entity_id: i64,
    /// Team the player belongs to; equals `entity_id` for team boxscores.
    pub team_id: i64,
    pub game_id: String,
    pub game_date: Option<String>,
    pub matchup: Option<String>,
    pub win_loss: Option<String>,
    pub minutes: Option<f64>,
}

/// A single normalized stat cell. Most stats are numeric; a few columns
/// (e.g. MIN_SEC) are clock-formatted text.
#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    Num(f64),
    Text(String),
}

impl ToSql for StatValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            StatValue::Num(n) => n.to_sql(),
            StatValue::Text(s) => s.to_sql(),
        }
    }
}

/// Category-specific stat columns for one boxscore row, aligned with the
/// category's fixed column list in `normalize::category_columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRow {
    pub boxscore_id: String,
    pub values: Vec<Option<StatValue>>,
}
