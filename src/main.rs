//! courtline - basketball statistics extraction and loading pipeline.
//!
//! Fetches game logs, play-by-play, boxscores, and the player catalog from
//! the stats API into intermediate CSV files, then bulk-loads them into a
//! local SQLite database.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if courtline::cli::is_verbose() {
        "courtline=info"
    } else {
        "courtline=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    courtline::cli::run().await
}
