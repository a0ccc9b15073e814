//! Upstream endpoint catalog and request parameter templates.
//!
//! The stats API is JSON-over-HTTP GET with a fixed parameter template per
//! endpoint. Requests must carry a browser-like header set (the upstream
//! rejects obvious non-browser clients), pinned here once rather than held
//! in any process-wide session state.

use reqwest::header::{HeaderMap, HeaderValue};

use crate::models::{Season, SeasonType};

/// Base URL all endpoint paths are resolved against.
pub const BASE_URL: &str = "https://stats.nba.com/stats/";

/// Named upstream endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Season game logs: one row per team per game.
    GameLog,
    /// Per-game play-by-play actions.
    PlayByPlay,
    /// Per-player per-game boxscores, split by `MeasureType`.
    PlayerGameLogs,
    /// Per-team per-game boxscores, split by `MeasureType`.
    TeamGameLogs,
    /// League-wide player bios catalog.
    PlayerBios,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::GameLog => "leaguegamelog",
            Self::PlayByPlay => "playbyplayv3",
            Self::PlayerGameLogs => "playergamelogs",
            Self::TeamGameLogs => "teamgamelogs",
            Self::PlayerBios => "playerindex",
        }
    }

    pub fn url(&self) -> String {
        format!("{}{}", BASE_URL, self.path())
    }
}

/// Boxscore stat category, mapped to the upstream `MeasureType` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatCategory {
    Base,
    Advanced,
    Misc,
    Scoring,
    Usage,
    FourFactors,
}

impl StatCategory {
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Base => "Base",
            Self::Advanced => "Advanced",
            Self::Misc => "Misc",
            Self::Scoring => "Scoring",
            Self::Usage => "Usage",
            Self::FourFactors => "Four Factors",
        }
    }

    /// Filesystem-safe tag used in intermediate file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Advanced => "advanced",
            Self::Misc => "misc",
            Self::Scoring => "scoring",
            Self::Usage => "usage",
            Self::FourFactors => "four_factors",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "base" => Some(Self::Base),
            "advanced" => Some(Self::Advanced),
            "misc" => Some(Self::Misc),
            "scoring" => Some(Self::Scoring),
            "usage" => Some(Self::Usage),
            "four_factors" | "four-factors" => Some(Self::FourFactors),
            _ => None,
        }
    }
}

/// Whether a boxscore unit is per-player or per-team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Team,
}

impl EntityKind {
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Team => "team",
        }
    }

    /// Categories the upstream serves for this entity kind. The player
    /// dashboard has no Four Factors split; the team dashboard has no Usage.
    pub fn categories(&self) -> &'static [StatCategory] {
        match self {
            Self::Player => &[
                StatCategory::Base,
                StatCategory::Advanced,
                StatCategory::Misc,
                StatCategory::Scoring,
                StatCategory::Usage,
            ],
            Self::Team => &[
                StatCategory::Base,
                StatCategory::Advanced,
                StatCategory::Misc,
                StatCategory::Scoring,
                StatCategory::FourFactors,
            ],
        }
    }

    pub fn boxscore_endpoint(&self) -> Endpoint {
        match self {
            Self::Player => Endpoint::PlayerGameLogs,
            Self::Team => Endpoint::TeamGameLogs,
        }
    }

    /// Header naming the entity id column in boxscore result sets.
    pub fn id_column(&self) -> &'static str {
        match self {
            Self::Player => "PLAYER_ID",
            Self::Team => "TEAM_ID",
        }
    }
}

/// Parameter set for a season game-log request.
pub fn game_log_params(season: Season, season_type: SeasonType) -> Vec<(String, String)> {
    vec![
        ("Season".to_string(), season.label()),
        ("SeasonType".to_string(), season_type.as_param().to_string()),
    ]
}

/// Parameter set for a per-game play-by-play request.
pub fn play_by_play_params(game_id: &str) -> Vec<(String, String)> {
    vec![
        ("GameID".to_string(), game_id.to_string()),
        ("StartPeriod".to_string(), "0".to_string()),
        ("EndPeriod".to_string(), "0".to_string()),
    ]
}

/// Parameter set for a per-category boxscore request.
pub fn boxscore_params(
    category: StatCategory,
    season: Season,
    season_type: SeasonType,
) -> Vec<(String, String)> {
    vec![
        ("MeasureType".to_string(), category.as_param().to_string()),
        ("Season".to_string(), season.label()),
        ("SeasonType".to_string(), season_type.as_param().to_string()),
    ]
}

/// Parameter set for the player bios catalog.
pub fn player_bios_params(season: Season) -> Vec<(String, String)> {
    vec![
        ("Season".to_string(), season.label()),
        ("SeasonType".to_string(), SeasonType::RegularSeason.as_param().to_string()),
        ("LeagueID".to_string(), "00".to_string()),
    ]
}

/// Static browser-like header set sent with every request.
pub fn stats_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let pairs: [(&str, &str); 12] = [
        ("Accept", "*/*"),
        ("Accept-Language", "en-US,en;q=0.9"),
        ("Connection", "keep-alive"),
        ("Host", "stats.nba.com"),
        ("Origin", "https://www.nba.com"),
        ("Referer", "https://www.nba.com/"),
        ("Sec-Fetch-Dest", "empty"),
        ("Sec-Fetch-Mode", "cors"),
        ("Sec-Fetch-Site", "same-site"),
        (
            "sec-ch-ua",
            "\"Google Chrome\";v=\"131\", \"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\"",
        ),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", "\"Linux\""),
    ];
    for (name, value) in pairs {
        if let Ok(v) = HeaderValue::from_str(value) {
            headers.insert(name, v);
        }
    }
    headers
}

/// User agent matching the spoofed Chrome header set.
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
