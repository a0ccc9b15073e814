//! Boxscore loading: walk the per-category dumps, normalize, and upsert one
//! file per transaction.

use std::fs;
use std::path::Path;

use tracing::{debug, error, warn};

use super::{LoadError, LoadStats};
use crate::config::Settings;
use crate::csvio;
use crate::endpoints::{EntityKind, StatCategory};
use crate::models::ResultSet;
use crate::normalize::normalize_boxscores;
use crate::store::Database;

/// Recover the stat category from a dump filename. Category slugs can
/// themselves contain underscores, so match against the kind's known
/// categories rather than splitting.
fn category_from_filename(kind: EntityKind, name: &str) -> Option<StatCategory> {
    kind.categories()
        .iter()
        .copied()
        .find(|cat| name.starts_with(&format!("{}_", cat.slug())))
}

fn load_boxscore_file(
    db: &mut Database,
    kind: EntityKind,
    category: StatCategory,
    path: &Path,
) -> Result<usize, LoadError> {
    let (headers, rows) = csvio::read_file(path)?;
    let rs = ResultSet::from_csv(headers, rows);
    let normalized = match normalize_boxscores(&rs, kind, category) {
        Ok(rows) => rows,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping boxscore file");
            return Ok(0);
        }
    };
    Ok(db.upsert_boxscores(kind, category, &normalized)?)
}

/// Load every boxscore dump for the given entity kinds.
pub fn load_boxscores(
    db: &mut Database,
    settings: &Settings,
    kinds: &[EntityKind],
) -> Result<LoadStats, LoadError> {
    let mut stats = LoadStats::default();
    for &kind in kinds {
        let dir = settings.boxscore_dir(kind);
        if !dir.exists() {
            continue;
        }
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            let category = match category_from_filename(kind, name) {
                Some(category) => category,
                None => {
                    warn!(path = %path.display(), "filename without a known category, skipping");
                    stats.skipped += 1;
                    continue;
                }
            };
            match load_boxscore_file(db, kind, category, &path) {
                Ok(0) => stats.skipped += 1,
                Ok(rows) => {
                    debug!(path = %path.display(), rows, "boxscore file loaded");
                    stats.files += 1;
                    stats.rows += rows;
                }
                Err(LoadError::Io(e)) => {
                    warn!(path = %path.display(), error = %e, "skipping file");
                    stats.skipped += 1;
                }
                Err(LoadError::Store(e)) => {
                    error!(
                        path = %path.display(),
                        error = %e,
                        "aborting load, batch rolled back"
                    );
                    return Err(LoadError::Batch { path, source: e });
                }
                Err(e) => return Err(e),
            }
        }
    }
    stats.print_summary("boxscore");
    Ok(stats)
}
