use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gridprep_core::PipelineConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
use commands::inspect::{handle_inspect, InspectArgs};
use commands::run::{handle_run, RunArgs};

/// Prepare grid-transparency exports for analysis
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML file with loader and parsing settings (falls back to GRIDPREP_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show columns, missing values and the quality boundary of an upload
    Inspect(InspectArgs),
    /// Clean, resample and summarize an upload
    Run(RunArgs),
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    match cli.command {
        Command::Inspect(args) => handle_inspect(&args, &config),
        Command::Run(args) => handle_run(&args, &config),
    }
}

fn load_config(flag: Option<PathBuf>) -> Result<PipelineConfig> {
    let path = flag.or_else(|| std::env::var_os("GRIDPREP_CONFIG").map(PathBuf::from));
    match path {
        Some(path) => {
            let config = PipelineConfig::from_path(&path)
                .with_context(|| format!("failed to load config from {}", path.display()))?;
            info!(path = %path.display(), "configuration loaded");
            Ok(config)
        }
        None => Ok(PipelineConfig::default()),
    }
}

/// Reads an upload and hands back its bytes with the file name used for format detection.
pub(crate) fn read_upload(path: &Path) -> Result<(Vec<u8>, String)> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .with_context(|| format!("{} has no usable file name", path.display()))?;
    Ok((bytes, name))
}
