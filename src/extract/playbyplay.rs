//! Per-game play-by-play extraction, driven by the game-log checkpoint.

use console::style;
use serde_json::Value;
use tracing::{info, warn};

use super::{progress_bar, ExtractError, ExtractStats, Extractor};
use crate::checkpoint::GameLogFile;
use crate::client::StatsApi;
use crate::csvio;
use crate::endpoints::{play_by_play_params, Endpoint};
use crate::models::{RawAction, SeasonType, ACTION_CSV_HEADERS};

fn parse_actions(body: &Value) -> Option<Vec<RawAction>> {
    let actions = body.get("game")?.get("actions")?.clone();
    serde_json::from_value(actions).ok()
}

impl<'a, A: StatsApi> Extractor<'a, A> {
    /// Extract play-by-play for every unprocessed game in each season
    /// type's game log. The checkpoint advances one game at a time, only
    /// after that game's file is durably written.
    pub async fn extract_play_by_play(
        &self,
        season_types: &[SeasonType],
    ) -> Result<ExtractStats, ExtractError> {
        let mut stats = ExtractStats::default();

        for &season_type in season_types {
            let mut log = GameLogFile::for_settings(self.settings(), season_type)?;
            let pending: Vec<(String, String)> = log
                .unprocessed()
                .map(|g| (g.game_id.clone(), g.season_year.clone()))
                .collect();
            let (done, total) = log.progress();
            println!(
                "\n{} Extracting play-by-play ({}): {} of {} games remaining",
                style("→").cyan(),
                season_type.slug(),
                pending.len(),
                total
            );
            if pending.is_empty() {
                continue;
            }
            let pb = progress_bar(total as u64);
            pb.set_position(done as u64);

            for (game_id, season_year) in pending {
                pb.set_message(game_id.clone());
                let body = match self
                    .fetch_unit(Endpoint::PlayByPlay, &play_by_play_params(&game_id))
                    .await
                {
                    Ok(Some(body)) => body,
                    Ok(None) => {
                        stats.skipped += 1;
                        pb.inc(1);
                        continue;
                    }
                    Err(e) => {
                        pb.abandon();
                        return Err(e);
                    }
                };
                let actions = match parse_actions(&body) {
                    Some(actions) => actions,
                    None => {
                        warn!(game_id, "response without game.actions, skipping");
                        stats.failed += 1;
                        pb.inc(1);
                        continue;
                    }
                };

                let path =
                    self.settings()
                        .play_by_play_path(&season_year, season_type, &game_id);
                let headers: Vec<String> =
                    ACTION_CSV_HEADERS.iter().map(|h| h.to_string()).collect();
                let rows: Vec<Vec<String>> =
                    actions.iter().map(RawAction::to_csv_row).collect();
                csvio::write_file(&path, &headers, &rows)?;

                // File is durable; now, and only now, advance the checkpoint.
                log.mark_processed(&game_id);
                log.flush()?;
                info!(game_id, actions = rows.len(), "play-by-play extracted");
                stats.fetched += 1;
                pb.inc(1);
            }
            pb.finish_and_clear();
        }
        stats.print_summary("play-by-play");
        Ok(stats)
    }
}
