//! Play-by-play loading: walk the per-game files, normalize, and upsert one
//! game per transaction.

use std::fs;
use std::path::Path;

use tracing::{debug, error, warn};

use super::{LoadError, LoadStats};
use crate::config::Settings;
use crate::csvio;
use crate::models::RawAction;
use crate::normalize::{normalize_actions, sort_actions};
use crate::store::Database;

fn load_game_file(db: &mut Database, path: &Path, game_id: &str) -> Result<usize, LoadError> {
    let (_, rows) = csvio::read_file(path)?;
    let raw: Vec<RawAction> = rows
        .iter()
        .filter_map(|row| {
            let parsed = RawAction::from_csv_row(row);
            if parsed.is_none() {
                warn!(game_id, "skipping malformed play-by-play row");
            }
            parsed
        })
        .collect();
    let mut actions = normalize_actions(game_id, &raw);
    sort_actions(&mut actions);
    Ok(db.upsert_actions(&actions)?)
}

/// Load every per-game play-by-play file under the game directory. Layout is
/// `game/{season_year}/{season_type}/{game_id}.csv`; the file stem is the
/// game id. Unreadable files are skipped.
pub fn load_play_by_play(db: &mut Database, settings: &Settings) -> Result<LoadStats, LoadError> {
    let mut stats = LoadStats::default();
    let game_dir = settings.game_dir();
    if !game_dir.exists() {
        stats.print_summary("play-by-play");
        return Ok(stats);
    }

    for season_entry in fs::read_dir(&game_dir)? {
        let season_path = season_entry?.path();
        if !season_path.is_dir() {
            // The checkpointed game-log CSVs live beside the season dirs.
            continue;
        }
        for type_entry in fs::read_dir(&season_path)? {
            let type_path = type_entry?.path();
            if !type_path.is_dir() {
                continue;
            }
            for file_entry in fs::read_dir(&type_path)? {
                let file_path = file_entry?.path();
                if file_path.extension().and_then(|e| e.to_str()) != Some("csv") {
                    continue;
                }
                let game_id = match file_path.file_stem().and_then(|s| s.to_str()) {
                    Some(stem) => stem.to_string(),
                    None => continue,
                };
                match load_game_file(db, &file_path, &game_id) {
                    Ok(rows) => {
                        debug!(game_id, rows, "play-by-play file loaded");
                        stats.files += 1;
                        stats.rows += rows;
                    }
                    Err(LoadError::Io(e)) => {
                        warn!(path = %file_path.display(), error = %e, "skipping file");
                        stats.skipped += 1;
                    }
                    Err(LoadError::Store(e)) => {
                        error!(
                            path = %file_path.display(),
                            error = %e,
                            "aborting load, batch rolled back"
                        );
                        return Err(LoadError::Batch {
                            path: file_path,
                            source: e,
                        });
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }
    stats.print_summary("play-by-play");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::models::{SeasonType, ACTION_CSV_HEADERS};

    fn write_game_file(settings: &Settings, game_id: &str, actions: &[RawAction]) {
        let path = settings.play_by_play_path("2023-24", SeasonType::RegularSeason, game_id);
        let headers: Vec<String> = ACTION_CSV_HEADERS.iter().map(|h| h.to_string()).collect();
        let rows: Vec<Vec<String>> = actions.iter().map(RawAction::to_csv_row).collect();
        csvio::write_file(&path, &headers, &rows).unwrap();
    }

    fn action(id: i64) -> RawAction {
        RawAction {
            action_id: Some(id),
            action_number: Some(id),
            clock: Some("PT10M00.00S".to_string()),
            period: Some(1),
            team_id: Some(1610612743),
            person_id: Some(203999),
            action_type: Some("Made Shot".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn loads_and_normalizes_per_game_files() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::with_data_dir(dir.path().to_path_buf());
        write_game_file(&settings, "0022300001", &[action(1), action(2)]);
        write_game_file(&settings, "0022300002", &[action(1)]);

        let mut db = Database::open_in_memory().unwrap();
        let stats = load_play_by_play(&mut db, &settings).unwrap();
        assert_eq!(stats.files, 2);
        assert_eq!(stats.rows, 3);
        assert_eq!(db.count("play_by_play").unwrap(), 3);

        // Clock was normalized on the way in.
        let clock: String = db
            .conn_for_tests()
            .query_row(
                "SELECT clock FROM play_by_play WHERE game_id = '0022300001' AND action_id = 1",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(clock, "10:00");
    }

    #[test]
    fn store_failure_reports_the_failing_file() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::with_data_dir(dir.path().to_path_buf());
        write_game_file(&settings, "0022300001", &[action(1)]);

        let mut db = Database::open_in_memory().unwrap();
        db.conn_for_tests()
            .execute_batch("DROP TABLE play_by_play")
            .unwrap();

        match load_play_by_play(&mut db, &settings) {
            Err(LoadError::Batch { path, .. }) => {
                assert!(path.ends_with("0022300001.csv"));
            }
            other => panic!("expected a batch error, got {:?}", other),
        }
    }

    #[test]
    fn reload_does_not_duplicate_rows() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::with_data_dir(dir.path().to_path_buf());
        write_game_file(&settings, "0022300001", &[action(1)]);

        let mut db = Database::open_in_memory().unwrap();
        load_play_by_play(&mut db, &settings).unwrap();
        load_play_by_play(&mut db, &settings).unwrap();
        assert_eq!(db.count("play_by_play").unwrap(), 1);
    }
}
