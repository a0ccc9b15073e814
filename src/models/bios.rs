//! Team and player catalog models, built from the player-bios endpoint.

/// A team observed in the bios feed. Immutable reference data.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamBio {
    pub team_id: i64,
    pub name: Option<String>,
    pub city: Option<String>,
    pub abbreviation: Option<String>,
    pub slug: Option<String>,
}

/// A player row from the bios feed, after the normalizer's cleanups
/// (height in inches, numeric jersey, boolean roster status).
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerBio {
    pub player_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub slug: Option<String>,
    pub team_id: Option<i64>,
    pub is_defunct: Option<bool>,
    pub jersey_number: Option<i64>,
    pub position: Option<String>,
    /// Height in inches, converted from the feed's "6-10" form.
    pub height: Option<i64>,
    pub weight: Option<f64>,
    pub college: Option<String>,
    pub country: Option<String>,
    pub draft_year: Option<i64>,
    pub draft_round: Option<i64>,
    pub draft_number: Option<i64>,
    pub roster_status: Option<bool>,
    pub points: Option<f64>,
    pub rebounds: Option<f64>,
    pub assists: Option<f64>,
    pub stats_timeframe: Option<String>,
    pub from_year: Option<i64>,
    pub to_year: Option<i64>,
}
