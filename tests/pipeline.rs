//! End-to-end extraction pipeline tests against a scripted upstream.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;

use courtline::checkpoint::GameLogFile;
use courtline::client::{FetchOutcome, StatsApi};
use courtline::config::Settings;
use courtline::csvio;
use courtline::endpoints::{Endpoint, EntityKind, StatCategory};
use courtline::extract::{ExtractError, Extractor};
use courtline::models::{Season, SeasonType};

/// Upstream fake that replays a fixed outcome script and records every
/// request it receives.
struct ScriptedApi {
    script: Mutex<Vec<FetchOutcome>>,
    calls: Mutex<Vec<(Endpoint, Vec<(String, String)>)>>,
}

impl ScriptedApi {
    fn new(mut script: Vec<FetchOutcome>) -> Self {
        script.reverse();
        Self {
            script: Mutex::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl StatsApi for ScriptedApi {
    async fn fetch(&self, endpoint: Endpoint, params: &[(String, String)]) -> FetchOutcome {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint, params.to_vec()));
        self.script
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(FetchOutcome::Network("script exhausted".into()))
    }
}

fn fast_settings(dir: &TempDir) -> Settings {
    Settings {
        delay_min_ms: 0,
        delay_max_ms: 0,
        backoff_seed_ms: 1,
        max_retries: 3,
        max_requests_per_minute: 0,
        ..Settings::with_data_dir(dir.path().to_path_buf())
    }
}

fn game_log_body(games: &[(&str, i64, &str, i64, &str)]) -> Value {
    // (game_id, home_team_id, home_abbr, away_team_id, away_abbr)
    let mut rows = Vec::new();
    for (game_id, home_id, home_abbr, away_id, away_abbr) in games {
        rows.push(json!([
            "22023",
            home_id,
            home_abbr,
            format!("{} Full", home_abbr),
            game_id,
            "2023-10-24",
            format!("{} vs. {}", home_abbr, away_abbr),
            "W"
        ]));
        rows.push(json!([
            "22023",
            away_id,
            away_abbr,
            format!("{} Full", away_abbr),
            game_id,
            "2023-10-24",
            format!("{} @ {}", away_abbr, home_abbr),
            "L"
        ]));
    }
    json!({
        "resultSets": [{
            "headers": ["SEASON_ID", "TEAM_ID", "TEAM_ABBREVIATION", "TEAM_NAME",
                        "GAME_ID", "GAME_DATE", "MATCHUP", "WL"],
            "rowSet": rows
        }]
    })
}

fn play_by_play_body(game_id: &str, actions: usize) -> Value {
    let actions: Vec<Value> = (1..=actions)
        .map(|i| {
            json!({
                "actionId": i,
                "actionNumber": i,
                "clock": "PT10M00.00S",
                "period": 1,
                "teamId": 10,
                "personId": 42,
                "actionType": "Made Shot"
            })
        })
        .collect();
    json!({"game": {"gameId": game_id, "actions": actions}})
}

fn game_log_path(settings: &Settings) -> PathBuf {
    settings.game_log_path(SeasonType::RegularSeason)
}

fn boxscore_body() -> Value {
    json!({
        "resultSets": [{
            "headers": ["SEASON_YEAR", "TEAM_ID", "GAME_ID", "EFG_PCT"],
            "rowSet": [["2023-24", 1610612743_i64, "0022300001", 0.561]]
        }]
    })
}

#[tokio::test]
async fn extraction_advances_checkpoint_per_game() {
    let dir = TempDir::new().unwrap();
    let settings = fast_settings(&dir);

    // Season extraction merges two teams' rows into one game each.
    let api = ScriptedApi::new(vec![FetchOutcome::Success(game_log_body(&[
        ("G1", 10, "DEN", 20, "LAL"),
        ("G2", 30, "BOS", 40, "MIA"),
    ]))]);
    let extractor = Extractor::new(&api, &settings);
    let stats = extractor
        .extract_game_logs(Season(2023), Season(2023), &[SeasonType::RegularSeason])
        .await
        .unwrap();
    assert_eq!(stats.fetched, 1);

    let log = GameLogFile::load(&game_log_path(&settings)).unwrap();
    assert_eq!(log.games().len(), 2);
    assert_eq!(log.progress(), (0, 2));

    // Play-by-play extraction processes both games and marks them durable.
    let api = ScriptedApi::new(vec![
        FetchOutcome::Success(play_by_play_body("G1", 3)),
        FetchOutcome::Success(play_by_play_body("G2", 2)),
    ]);
    let extractor = Extractor::new(&api, &settings);
    let stats = extractor
        .extract_play_by_play(&[SeasonType::RegularSeason])
        .await
        .unwrap();
    assert_eq!(stats.fetched, 2);

    let log = GameLogFile::load(&game_log_path(&settings)).unwrap();
    assert_eq!(log.progress(), (2, 2));
    assert!(settings
        .play_by_play_path("2023-24", SeasonType::RegularSeason, "G1")
        .exists());
    assert!(settings
        .play_by_play_path("2023-24", SeasonType::RegularSeason, "G2")
        .exists());
}

#[tokio::test]
async fn processed_games_are_never_refetched() {
    let dir = TempDir::new().unwrap();
    let settings = fast_settings(&dir);

    let api = ScriptedApi::new(vec![FetchOutcome::Success(game_log_body(&[(
        "G1", 10, "DEN", 20, "LAL",
    )]))]);
    Extractor::new(&api, &settings)
        .extract_game_logs(Season(2023), Season(2023), &[SeasonType::RegularSeason])
        .await
        .unwrap();

    let api = ScriptedApi::new(vec![FetchOutcome::Success(play_by_play_body("G1", 1))]);
    Extractor::new(&api, &settings)
        .extract_play_by_play(&[SeasonType::RegularSeason])
        .await
        .unwrap();

    // A second run has nothing pending and must not touch the upstream.
    let api = ScriptedApi::new(vec![]);
    let stats = Extractor::new(&api, &settings)
        .extract_play_by_play(&[SeasonType::RegularSeason])
        .await
        .unwrap();
    assert_eq!(stats.fetched, 0);
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn fatal_outcome_aborts_and_preserves_checkpoint() {
    let dir = TempDir::new().unwrap();
    let settings = fast_settings(&dir);

    let api = ScriptedApi::new(vec![FetchOutcome::Success(game_log_body(&[
        ("G1", 10, "DEN", 20, "LAL"),
        ("G2", 30, "BOS", 40, "MIA"),
    ]))]);
    Extractor::new(&api, &settings)
        .extract_game_logs(Season(2023), Season(2023), &[SeasonType::RegularSeason])
        .await
        .unwrap();

    // G1 succeeds, then the upstream denies access: the run must stop with
    // G1's progress kept and G2 still pending.
    let api = ScriptedApi::new(vec![
        FetchOutcome::Success(play_by_play_body("G1", 2)),
        FetchOutcome::Forbidden,
    ]);
    let result = Extractor::new(&api, &settings)
        .extract_play_by_play(&[SeasonType::RegularSeason])
        .await;
    assert!(matches!(result, Err(ExtractError::Fatal(_))));

    let log = GameLogFile::load(&game_log_path(&settings)).unwrap();
    assert_eq!(log.progress(), (1, 2));
    let pending: Vec<_> = log.unprocessed().map(|g| g.game_id.clone()).collect();
    assert_eq!(pending, vec!["G2"]);

    // The next run picks up exactly the interrupted game.
    let api = ScriptedApi::new(vec![FetchOutcome::Success(play_by_play_body("G2", 2))]);
    Extractor::new(&api, &settings)
        .extract_play_by_play(&[SeasonType::RegularSeason])
        .await
        .unwrap();
    assert_eq!(api.call_count(), 1);
    let log = GameLogFile::load(&game_log_path(&settings)).unwrap();
    assert_eq!(log.progress(), (2, 2));
}

#[tokio::test]
async fn boxscore_dumps_land_complete_with_no_temp_leftovers() {
    let dir = TempDir::new().unwrap();
    let settings = fast_settings(&dir);

    // Team kind covers five stat categories, one unit each.
    let api = ScriptedApi::new(vec![
        FetchOutcome::Success(boxscore_body()),
        FetchOutcome::Success(boxscore_body()),
        FetchOutcome::Success(boxscore_body()),
        FetchOutcome::Success(boxscore_body()),
        FetchOutcome::Success(boxscore_body()),
    ]);
    let stats = Extractor::new(&api, &settings)
        .extract_boxscores(
            &[EntityKind::Team],
            Season(2023),
            Season(2023),
            &[SeasonType::RegularSeason],
        )
        .await
        .unwrap();
    assert_eq!(stats.fetched, 5);

    // Every dump is parseable in full, and no temp sibling survives the
    // atomic rename.
    for &category in EntityKind::Team.categories() {
        let path = settings.boxscore_path(
            EntityKind::Team,
            category,
            Season(2023),
            SeasonType::RegularSeason,
        );
        let (headers, rows) = csvio::read_file(&path).unwrap();
        assert_eq!(headers, vec!["SEASON_YEAR", "TEAM_ID", "GAME_ID", "EFG_PCT"]);
        assert_eq!(rows.len(), 1);
        assert!(!path.with_extension("csv.tmp").exists());
    }
}

#[tokio::test]
async fn existing_boxscore_dumps_are_not_refetched() {
    let dir = TempDir::new().unwrap();
    let settings = fast_settings(&dir);

    // One unit already on disk from an earlier run. Dumps are written
    // atomically, so existence means the unit is complete.
    let base_path = settings.boxscore_path(
        EntityKind::Team,
        StatCategory::Base,
        Season(2023),
        SeasonType::RegularSeason,
    );
    csvio::write_rows_atomic(
        &base_path,
        &["SEASON_YEAR".to_string(), "TEAM_ID".to_string()],
        &[vec!["2023-24".to_string(), "1610612743".to_string()]],
    )
    .unwrap();

    let api = ScriptedApi::new(vec![
        FetchOutcome::Success(boxscore_body()),
        FetchOutcome::Success(boxscore_body()),
        FetchOutcome::Success(boxscore_body()),
        FetchOutcome::Success(boxscore_body()),
    ]);
    let stats = Extractor::new(&api, &settings)
        .extract_boxscores(
            &[EntityKind::Team],
            Season(2023),
            Season(2023),
            &[SeasonType::RegularSeason],
        )
        .await
        .unwrap();

    // Only the four missing categories hit the upstream; the existing dump
    // is untouched.
    assert_eq!(api.call_count(), 4);
    assert_eq!(stats.fetched, 4);
    let (headers, rows) = csvio::read_file(&base_path).unwrap();
    assert_eq!(headers, vec!["SEASON_YEAR", "TEAM_ID"]);
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn skippable_failures_leave_the_game_pending() {
    let dir = TempDir::new().unwrap();
    let settings = fast_settings(&dir);

    let api = ScriptedApi::new(vec![FetchOutcome::Success(game_log_body(&[(
        "G1", 10, "DEN", 20, "LAL",
    )]))]);
    Extractor::new(&api, &settings)
        .extract_game_logs(Season(2023), Season(2023), &[SeasonType::RegularSeason])
        .await
        .unwrap();

    let api = ScriptedApi::new(vec![FetchOutcome::Http(500)]);
    let stats = Extractor::new(&api, &settings)
        .extract_play_by_play(&[SeasonType::RegularSeason])
        .await
        .unwrap();
    assert_eq!(stats.skipped, 1);

    let log = GameLogFile::load(&game_log_path(&settings)).unwrap();
    assert_eq!(log.progress(), (0, 1));
}
