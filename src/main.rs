//! # Delver Command Line
//!
//! Generates a dungeon and prints it as JSON.

use clap::Parser;
use delver::{
    generate_dungeon, DelverError, DelverResult, EncounterCatalog, EncounterQuery,
    GenerationConfig, SizeTier, Theme,
};
use log::info;
use std::path::PathBuf;

/// Command line arguments for Delver.
#[derive(Parser, Debug)]
#[command(name = "delver")]
#[command(about = "Procedural hub-and-wing dungeons with level-appropriate encounters")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Canvas width in canvas units
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in canvas units
    #[arg(long)]
    height: Option<u32>,

    /// Dungeon size (small, medium, large)
    #[arg(long)]
    size: Option<SizeTier>,

    /// Dungeon theme (ruins, temple, dungeon, cave)
    #[arg(long)]
    theme: Option<Theme>,

    /// JSON generation config; command line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file holding an array of encounters
    #[arg(long)]
    encounters: Option<PathBuf>,

    /// Draw encounters authored for this level
    #[arg(long, default_value_t = 1, conflicts_with = "dungeon_id")]
    level: u32,

    /// Draw encounters authored for this dungeon instead of a level
    #[arg(long)]
    dungeon_id: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> DelverResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level)?;
    info!("Starting Delver v{}", delver::VERSION);

    let config = build_config(&args)?;
    let catalog = match &args.encounters {
        Some(path) => EncounterCatalog::from_json_file(path)?,
        None => EncounterCatalog::new(),
    };
    let query = match &args.dungeon_id {
        Some(id) => EncounterQuery::Dungeon(id.clone()),
        None => EncounterQuery::Level(args.level),
    };

    let dungeon = generate_dungeon(&config, catalog, query)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&dungeon)?
    } else {
        serde_json::to_string(&dungeon)?
    };
    println!("{json}");

    Ok(())
}

/// Initializes env_logger; `RUST_LOG` takes precedence over `--log-level`.
fn initialize_logging(log_level: &str) -> DelverResult<()> {
    let level = match log_level.to_lowercase().as_str() {
        "error" | "warn" | "info" | "debug" | "trace" | "off" => log_level.to_lowercase(),
        other => {
            return Err(DelverError::InvalidConfig(format!(
                "unknown log level '{other}'"
            )))
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_target(false)
        .target(env_logger::Target::Stderr)
        .init();

    Ok(())
}

/// Merges the optional config file with command line overrides.
fn build_config(args: &Args) -> DelverResult<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::from_json_file(path)?,
        None => GenerationConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.canvas_width = width;
    }
    if let Some(height) = args.height {
        config.canvas_height = height;
    }
    if let Some(size) = args.size {
        config.size = size;
    }
    if let Some(theme) = &args.theme {
        config.theme = theme.clone();
    }

    config.validate()?;
    Ok(config)
}
