//! Record normalization: raw per-row payloads to canonical relational
//! tuples.
//!
//! Every function here is pure (raw row in, tuple or rejection reason out);
//! rejects are logged with unit identity by the caller and never panic.

mod action;
mod bios;
mod boxscore;
mod clock;
mod numeric;

pub use action::{normalize_actions, resolve_team_player, sort_actions};
pub use bios::{clean_jersey_number, height_to_inches, normalize_bios, roster_status};
pub use boxscore::{category_columns, normalize_boxscores};
pub use clock::{clock_to_duration, elapsed_interval, parse_clock};
pub use numeric::round_stat;

/// Rejection reason for a row or unit that cannot be normalized.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("missing expected column: {0}")]
    MissingColumn(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Composite idempotency key for a boxscore row: entity id and game id
/// joined with a fixed separator. Deterministic, and collision-free as long
/// as entity ids contain no `-` (they are numeric upstream).
pub fn boxscore_id(entity_id: i64, game_id: &str) -> String {
    format!("{}-{}", entity_id, game_id)
}
