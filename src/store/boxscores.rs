//! Boxscore table writes.
//!
//! One parent table per entity kind carries the shared identifying columns;
//! each (kind, category) pair gets its own stat table keyed by the composite
//! boxscore id. Table and column names are generated from the fixed category
//! column lists, never from response data.

use rusqlite::{params, params_from_iter, Connection, ToSql};
use tracing::debug;

use super::{Database, Result};
use crate::endpoints::{EntityKind, StatCategory};
use crate::models::{BoxscoreMeta, CategoryRow};
use crate::normalize::category_columns;

/// SQL table name for one (kind, category) stat table.
pub fn category_table(kind: EntityKind, category: StatCategory) -> String {
    format!("{}_boxscore_{}", kind.slug(), category.slug())
}

fn parent_table(kind: EntityKind) -> String {
    format!("{}_boxscore", kind.slug())
}

pub(super) fn init_boxscore_schema(conn: &Connection) -> Result<()> {
    for kind in [EntityKind::Player, EntityKind::Team] {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                boxscore_id TEXT PRIMARY KEY,
                season_year TEXT NOT NULL,
                {} INTEGER NOT NULL,
                team_id INTEGER NOT NULL,
                game_id TEXT NOT NULL,
                game_date TEXT,
                matchup TEXT,
                win_loss TEXT,
                minutes REAL
            );",
            parent_table(kind),
            kind.id_column().to_lowercase(),
        ))?;

        for &category in kind.categories() {
            let columns: Vec<String> = category_columns(kind, category)
                .iter()
                .map(|c| format!("{} NUMERIC", c.to_lowercase()))
                .collect();
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    boxscore_id TEXT PRIMARY KEY,
                    {}
                );",
                category_table(kind, category),
                columns.join(",\n                    "),
            ))?;
        }
    }
    Ok(())
}

impl Database {
    /// Upsert one unit's boxscore rows in a single transaction: parent meta
    /// rows and the category's stat rows together. Non-key columns are
    /// overwritten so re-loading a unit converges on the latest fetch.
    pub fn upsert_boxscores(
        &mut self,
        kind: EntityKind,
        category: StatCategory,
        rows: &[(BoxscoreMeta, CategoryRow)],
    ) -> Result<usize> {
        let columns = category_columns(kind, category);
        let meta_sql = format!(
            "INSERT INTO {} (boxscore_id, season_year, {}, team_id, game_id,
                             game_date, matchup, win_loss, minutes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT (boxscore_id) DO UPDATE SET
                season_year = excluded.season_year,
                team_id = excluded.team_id,
                game_date = excluded.game_date,
                matchup = excluded.matchup,
                win_loss = excluded.win_loss,
                minutes = excluded.minutes",
            parent_table(kind),
            kind.id_column().to_lowercase(),
        );
        let stat_names: Vec<String> = columns.iter().map(|c| c.to_lowercase()).collect();
        let placeholders: Vec<String> = (0..=columns.len()).map(|i| format!("?{}", i + 1)).collect();
        let updates: Vec<String> = stat_names
            .iter()
            .map(|c| format!("{} = excluded.{}", c, c))
            .collect();
        let stats_sql = format!(
            "INSERT INTO {} (boxscore_id, {}) VALUES ({})
             ON CONFLICT (boxscore_id) DO UPDATE SET {}",
            category_table(kind, category),
            stat_names.join(", "),
            placeholders.join(", "),
            updates.join(", "),
        );

        let tx = self.conn.transaction()?;
        {
            let mut meta_stmt = tx.prepare_cached(&meta_sql)?;
            let mut stats_stmt = tx.prepare_cached(&stats_sql)?;
            for (meta, stats) in rows {
                meta_stmt.execute(params![
                    meta.boxscore_id,
                    meta.season_year,
                    meta.entity_id,
                    meta.team_id,
                    meta.game_id,
                    meta.game_date,
                    meta.matchup,
                    meta.win_loss,
                    meta.minutes,
                ])?;

                let mut values: Vec<&dyn ToSql> = Vec::with_capacity(stats.values.len() + 1);
                values.push(&stats.boxscore_id);
                for value in &stats.values {
                    values.push(value);
                }
                stats_stmt.execute(params_from_iter(values))?;
            }
        }
        tx.commit()?;
        debug!(
            table = %category_table(kind, category),
            batch = rows.len(),
            "boxscore batch committed"
        );
        Ok(rows.len())
    }
}
