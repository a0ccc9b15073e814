//! Idempotent bulk loader: intermediate CSVs into the SQLite store.
//!
//! Loading is offline and re-runnable: every file is normalized and written
//! in its own transaction, and conflict policy per table guarantees the same
//! input converges on the same database state. A file that cannot be parsed
//! is skipped with a log line, never aborts the run.

mod bios;
mod boxscores;
mod games;
mod playbyplay;

pub use bios::load_bios;
pub use boxscores::load_boxscores;
pub use games::load_games;
pub use playbyplay::load_play_by_play;

use std::path::PathBuf;

use console::style;

use crate::store::StoreError;

/// Load-run error.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A batch transaction failed and was rolled back. Carries the file it
    /// came from so the batch can be re-run by hand.
    #[error("failed loading {}: {source}", .path.display())]
    Batch {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-run load counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadStats {
    /// Files successfully loaded.
    pub files: usize,
    /// Rows written (inserted or overwritten).
    pub rows: usize,
    /// Files skipped as unreadable or unparsable.
    pub skipped: usize,
}

impl LoadStats {
    pub fn print_summary(&self, what: &str) {
        println!("\n{} {} load complete:", style("✓").green(), what);
        println!("  Files loaded: {}", style(self.files).green());
        println!("  Rows written: {}", style(self.rows).green());
        if self.skipped > 0 {
            println!("  Files skipped: {}", style(self.skipped).yellow());
        }
    }
}
