//! Data models for seasons, games, play-by-play actions, and boxscores.

mod action;
mod bios;
mod boxscore;
mod game;
mod resultset;

pub use action::{Action, RawAction, ACTION_CSV_HEADERS};
pub use bios::{PlayerBio, TeamBio};
pub use boxscore::{BoxscoreMeta, CategoryRow, StatValue};
pub use game::{Game, GameResult, Season, SeasonType, TeamSide, GAME_LOG_HEADERS};
pub use resultset::ResultSet;
