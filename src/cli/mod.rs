//! Command-line interface for courtline.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use console::style;

use crate::client::StatsClient;
use crate::config::Settings;
use crate::endpoints::EntityKind;
use crate::extract::Extractor;
use crate::load;
use crate::models::{Season, SeasonType};
use crate::store::Database;

#[derive(Parser)]
#[command(name = "courtline", version, about = "Basketball statistics extraction and loading")]
pub struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base data directory for intermediate files and the database.
    #[arg(long, global = true, env = "COURTLINE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch data from the stats API into intermediate files.
    #[command(subcommand)]
    Extract(ExtractCommands),
    /// Load intermediate files into the database.
    #[command(subcommand)]
    Load(LoadCommands),
    /// Show extraction progress and database row counts.
    Status,
    /// Inspect or repair the extraction checkpoint.
    #[command(subcommand)]
    Checkpoint(CheckpointCommands),
}

#[derive(Args)]
pub struct SeasonRange {
    /// First season start year, e.g. 2020 for 2020-21.
    #[arg(long)]
    pub start: u16,
    /// Last season start year, inclusive. Defaults to the start year.
    #[arg(long)]
    pub end: Option<u16>,
}

impl SeasonRange {
    fn bounds(&self) -> anyhow::Result<(Season, Season)> {
        let end = self.end.unwrap_or(self.start);
        if end < self.start {
            bail!("--end {} precedes --start {}", end, self.start);
        }
        Ok((Season(self.start), Season(end)))
    }
}

fn parse_season_types(value: &Option<String>) -> anyhow::Result<Vec<SeasonType>> {
    match value {
        None => Ok(SeasonType::both().to_vec()),
        Some(s) => SeasonType::from_str(s)
            .map(|t| vec![t])
            .with_context(|| format!("unknown season type '{}'", s)),
    }
}

fn parse_kinds(value: &Option<String>) -> anyhow::Result<Vec<EntityKind>> {
    match value.as_deref() {
        None => Ok(vec![EntityKind::Player, EntityKind::Team]),
        Some("player") => Ok(vec![EntityKind::Player]),
        Some("team") => Ok(vec![EntityKind::Team]),
        Some(other) => bail!("unknown entity kind '{}' (expected player or team)", other),
    }
}

#[derive(Subcommand)]
pub enum ExtractCommands {
    /// Fetch season game logs and build the merged game-log files.
    Seasons {
        #[command(flatten)]
        range: SeasonRange,
        /// regular_season or playoffs; both when omitted.
        #[arg(long)]
        season_type: Option<String>,
    },
    /// Fetch play-by-play for every unprocessed game in the game logs.
    Playbyplay {
        /// regular_season or playoffs; both when omitted.
        #[arg(long)]
        season_type: Option<String>,
    },
    /// Fetch per-category boxscore dumps for a season range.
    Boxscores {
        #[command(flatten)]
        range: SeasonRange,
        /// player or team; both when omitted.
        #[arg(long)]
        kind: Option<String>,
        /// regular_season or playoffs; both when omitted.
        #[arg(long)]
        season_type: Option<String>,
    },
    /// Fetch the player bios catalog.
    Bios {
        /// Season start year the catalog is queried under.
        #[arg(long)]
        season: u16,
    },
}

#[derive(Subcommand)]
pub enum LoadCommands {
    /// Load the merged game logs into the game table.
    Games,
    /// Load per-game play-by-play files.
    Playbyplay,
    /// Load per-category boxscore dumps.
    Boxscores {
        /// player or team; both when omitted.
        #[arg(long)]
        kind: Option<String>,
    },
    /// Load the player bios catalog.
    Bios,
    /// Load everything in dependency order.
    All,
}

#[derive(Subcommand)]
pub enum CheckpointCommands {
    /// Clear every processed flag, forcing full re-extraction.
    Reset {
        /// regular_season or playoffs; both when omitted.
        #[arg(long)]
        season_type: Option<String>,
    },
    /// Rebuild the processed flags from the files actually on disk.
    Sync {
        /// regular_season or playoffs; both when omitted.
        #[arg(long)]
        season_type: Option<String>,
    },
}

/// Pre-parse scan for verbosity so logging can be configured before clap
/// runs (and before any clap error output).
pub fn is_verbose() -> bool {
    std::env::args().any(|a| a == "-v" || a == "--verbose")
}

impl Cli {
    fn settings(&self) -> Settings {
        match &self.data_dir {
            Some(dir) => Settings::with_data_dir(dir.clone()),
            None => Settings::default(),
        }
    }
}

/// Parse arguments and dispatch.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings();

    match &cli.command {
        Commands::Extract(cmd) => run_extract(cmd, &settings).await,
        Commands::Load(cmd) => run_load(cmd, &settings),
        Commands::Status => run_status(&settings),
        Commands::Checkpoint(cmd) => run_checkpoint(cmd, &settings),
    }
}

async fn run_extract(cmd: &ExtractCommands, settings: &Settings) -> anyhow::Result<()> {
    let client = StatsClient::new(settings).context("building HTTP client")?;
    let extractor = Extractor::new(&client, settings);

    match cmd {
        ExtractCommands::Seasons { range, season_type } => {
            let (start, end) = range.bounds()?;
            let types = parse_season_types(season_type)?;
            extractor.extract_game_logs(start, end, &types).await?;
        }
        ExtractCommands::Playbyplay { season_type } => {
            let types = parse_season_types(season_type)?;
            extractor.extract_play_by_play(&types).await?;
        }
        ExtractCommands::Boxscores {
            range,
            kind,
            season_type,
        } => {
            let (start, end) = range.bounds()?;
            let kinds = parse_kinds(kind)?;
            let types = parse_season_types(season_type)?;
            extractor
                .extract_boxscores(&kinds, start, end, &types)
                .await?;
        }
        ExtractCommands::Bios { season } => {
            extractor.extract_bios(Season(*season)).await?;
        }
    }
    Ok(())
}

fn run_load(cmd: &LoadCommands, settings: &Settings) -> anyhow::Result<()> {
    let mut db =
        Database::open(&settings.database_path()).context("opening database")?;

    match cmd {
        LoadCommands::Games => {
            load::load_games(&mut db, settings)?;
        }
        LoadCommands::Playbyplay => {
            load::load_play_by_play(&mut db, settings)?;
        }
        LoadCommands::Boxscores { kind } => {
            let kinds = parse_kinds(kind)?;
            load::load_boxscores(&mut db, settings, &kinds)?;
        }
        LoadCommands::Bios => {
            load::load_bios(&mut db, settings)?;
        }
        LoadCommands::All => {
            load::load_bios(&mut db, settings)?;
            load::load_games(&mut db, settings)?;
            load::load_play_by_play(&mut db, settings)?;
            load::load_boxscores(
                &mut db,
                settings,
                &[EntityKind::Player, EntityKind::Team],
            )?;
        }
    }
    Ok(())
}

/// Every table the loader can write, reference tables first.
fn status_tables() -> Vec<String> {
    let mut tables: Vec<String> = ["game", "team", "player", "play_by_play"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for kind in [EntityKind::Player, EntityKind::Team] {
        tables.push(format!("{}_boxscore", kind.slug()));
        for &category in kind.categories() {
            tables.push(crate::store::category_table(kind, category));
        }
    }
    tables
}

fn run_status(settings: &Settings) -> anyhow::Result<()> {
    println!(
        "{} Data directory: {}",
        style("→").cyan(),
        settings.data_dir.display()
    );

    for season_type in SeasonType::both() {
        let path = settings.game_log_path(season_type);
        if !path.exists() {
            println!("  {:<16} no game log", season_type.slug());
            continue;
        }
        let log = crate::checkpoint::GameLogFile::load(&path)?;
        let (done, total) = log.progress();
        println!(
            "  {:<16} {} / {} games extracted",
            season_type.slug(),
            style(done).green(),
            total
        );
    }

    let db_path = settings.database_path();
    if db_path.exists() {
        let db = Database::open(&db_path)?;
        println!("\n{} Database: {}", style("→").cyan(), db_path.display());
        for table in status_tables() {
            println!("  {:<28} {} rows", table, style(db.count(&table)?).green());
        }
    } else {
        println!("\n{} No database yet", style("!").yellow());
    }
    Ok(())
}

fn run_checkpoint(cmd: &CheckpointCommands, settings: &Settings) -> anyhow::Result<()> {
    let (season_type_arg, sync) = match cmd {
        CheckpointCommands::Reset { season_type } => (season_type, false),
        CheckpointCommands::Sync { season_type } => (season_type, true),
    };
    for season_type in parse_season_types(season_type_arg)? {
        let path = settings.game_log_path(season_type);
        if !path.exists() {
            continue;
        }
        let mut log = crate::checkpoint::GameLogFile::load(&path)?;
        let changed = if sync {
            log.sync_from_disk(settings, season_type)
        } else {
            log.reset()
        };
        log.flush()?;
        println!(
            "{} {}: {} games updated",
            style("✓").green(),
            season_type.slug(),
            changed
        );
    }
    Ok(())
}
