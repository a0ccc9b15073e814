//! Player catalog extraction: one league-wide dump per run.

use console::style;
use serde_json::Value;
use tracing::info;

use super::{ExtractError, ExtractStats, Extractor};
use crate::client::StatsApi;
use crate::csvio;
use crate::endpoints::{player_bios_params, Endpoint};
use crate::models::{ResultSet, Season};

fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl<'a, A: StatsApi> Extractor<'a, A> {
    /// Extract the player bios catalog for one season and overwrite the
    /// single catalog file. The catalog is small, so there is no per-unit
    /// resume here; a re-run refetches it whole.
    pub async fn extract_bios(&self, season: Season) -> Result<ExtractStats, ExtractError> {
        let mut stats = ExtractStats::default();
        self.settings().ensure_directories()?;
        println!(
            "\n{} Extracting player bios ({})",
            style("→").cyan(),
            season
        );

        let body = match self
            .fetch_unit(Endpoint::PlayerBios, &player_bios_params(season))
            .await?
        {
            Some(body) => body,
            None => {
                stats.skipped += 1;
                stats.print_summary("player bios");
                return Ok(stats);
            }
        };
        let rs = match ResultSet::from_response(&body) {
            Ok(rs) => rs,
            Err(e) => {
                return Err(ExtractError::Fatal(format!(
                    "bios response unusable: {}",
                    e
                )))
            }
        };

        let rows: Vec<Vec<String>> = rs
            .rows
            .iter()
            .map(|row| row.iter().map(csv_cell).collect())
            .collect();
        let path = self.settings().bios_path();
        csvio::write_file(&path, &rs.headers, &rows)?;
        info!(path = %path.display(), players = rows.len(), "player bios extracted");
        stats.fetched += 1;
        stats.print_summary("player bios");
        Ok(stats)
    }
}
