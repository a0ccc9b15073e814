//! Extraction orchestrator: season game logs, per-game play-by-play,
//! per-category boxscores, and the player catalog.
//!
//! Units run strictly in order. One unit is fetched, written to its
//! intermediate file, and only then is the checkpoint advanced, so an abort
//! at any point re-extracts at most the in-flight unit. Fatal outcomes
//! (denial, timeout, server-side throttle) abort the whole run immediately;
//! other failures skip the unit and continue.

mod bios;
mod boxscores;
mod playbyplay;
mod seasons;

pub use seasons::merge_game_rows;

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::client::{FetchOutcome, StatsApi};
use crate::config::Settings;
use crate::endpoints::Endpoint;
use crate::rate_limit::{PacerConfig, RequestPacer};

/// Extraction error. `Fatal` carries the outcome that ended the run.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("fatal fetch outcome: {0}")]
    Fatal(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-run extraction counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractStats {
    pub fetched: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ExtractStats {
    pub fn print_summary(&self, what: &str) {
        println!("\n{} {} extraction complete:", style("✓").green(), what);
        println!("  Units fetched: {}", style(self.fetched).green());
        if self.skipped > 0 {
            println!("  Units skipped: {}", style(self.skipped).yellow());
        }
        if self.failed > 0 {
            println!("  Units failed:  {}", style(self.failed).red());
        }
    }
}

/// Extraction orchestrator, generic over the upstream seam.
pub struct Extractor<'a, A: StatsApi> {
    api: &'a A,
    pacer: RequestPacer,
    settings: &'a Settings,
}

impl<'a, A: StatsApi> Extractor<'a, A> {
    pub fn new(api: &'a A, settings: &'a Settings) -> Self {
        Self {
            api,
            pacer: RequestPacer::new(PacerConfig::from(settings)),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    /// Fetch one unit with pacing and bounded rate-limit retries.
    ///
    /// `Ok(Some(body))` on success, `Ok(None)` when the unit is skippable,
    /// `Err(Fatal)` when the run must stop: denial, timeout, server-side
    /// throttle, or retries exhausted.
    pub async fn fetch_unit(
        &self,
        endpoint: Endpoint,
        params: &[(String, String)],
    ) -> Result<Option<serde_json::Value>, ExtractError> {
        for attempt in 0..self.pacer.max_attempts() {
            self.pacer.pace().await;
            match self.api.fetch(endpoint, params).await {
                FetchOutcome::Success(body) => return Ok(Some(body)),
                FetchOutcome::RateLimited => {
                    let delay = self.pacer.backoff_delay(attempt);
                    warn!(
                        endpoint = endpoint.path(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                outcome if outcome.is_fatal() => {
                    return Err(ExtractError::Fatal(outcome.to_string()));
                }
                outcome => {
                    warn!(
                        endpoint = endpoint.path(),
                        outcome = %outcome,
                        "skipping unit"
                    );
                    return Ok(None);
                }
            }
        }
        info!(endpoint = endpoint.path(), "rate-limit retries exhausted");
        Err(ExtractError::Fatal("rate-limit retries exhausted".into()))
    }
}

pub(crate) fn progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
