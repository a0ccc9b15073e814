//! Player catalog loading.

use tracing::info;

use super::{LoadError, LoadStats};
use crate::config::Settings;
use crate::csvio;
use crate::models::ResultSet;
use crate::normalize::normalize_bios;
use crate::store::Database;

/// Load the bios dump into the team and player tables. Both tables keep the
/// first observed row per id.
pub fn load_bios(db: &mut Database, settings: &Settings) -> Result<LoadStats, LoadError> {
    let mut stats = LoadStats::default();
    let path = settings.bios_path();
    if !path.exists() {
        stats.print_summary("catalog");
        return Ok(stats);
    }

    let (headers, rows) = csvio::read_file(&path)?;
    let rs = ResultSet::from_csv(headers, rows);
    let (teams, players) = match normalize_bios(&rs) {
        Ok(split) => split,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "bios dump unusable");
            stats.skipped += 1;
            stats.print_summary("catalog");
            return Ok(stats);
        }
    };

    let team_rows = db.insert_teams(&teams)?;
    let player_rows = db.insert_players(&players)?;
    info!(teams = team_rows, players = player_rows, "catalog loaded");
    stats.files += 1;
    stats.rows += team_rows + player_rows;
    stats.print_summary("catalog");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_catalog_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::with_data_dir(dir.path().to_path_buf());

        let headers: Vec<String> = [
            "PERSON_ID",
            "PLAYER_FIRST_NAME",
            "PLAYER_LAST_NAME",
            "TEAM_ID",
            "TEAM_CITY",
            "TEAM_NAME",
            "TEAM_ABBREVIATION",
            "HEIGHT",
            "JERSEY_NUMBER",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let rows = vec![
            vec![
                "203999".to_string(),
                "Nikola".to_string(),
                "Jokic".to_string(),
                "1610612743".to_string(),
                "Denver".to_string(),
                "Nuggets".to_string(),
                "DEN".to_string(),
                "6-11".to_string(),
                "15".to_string(),
            ],
            vec![
                "1629027".to_string(),
                "Jamal".to_string(),
                "Murray".to_string(),
                "1610612743".to_string(),
                "Denver".to_string(),
                "Nuggets".to_string(),
                "DEN".to_string(),
                "6-4".to_string(),
                "27".to_string(),
            ],
        ];
        csvio::write_file(&settings.bios_path(), &headers, &rows).unwrap();

        let mut db = Database::open_in_memory().unwrap();
        let first = load_bios(&mut db, &settings).unwrap();
        assert_eq!(first.rows, 3); // one team plus two players

        let second = load_bios(&mut db, &settings).unwrap();
        assert_eq!(second.rows, 0);
        assert_eq!(db.count("team").unwrap(), 1);
        assert_eq!(db.count("player").unwrap(), 2);
    }
}
