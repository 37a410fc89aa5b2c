//! Badge CLI
//!
//! Headless driver for the badge viewer:
//! - `badge catalog` lists the configured badges
//! - `badge simulate` replays a scripted viewing session and prints the
//!   composed transform per sampled frame
//! - `badge init` writes a default badge.toml

mod config;
mod simulate;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{BadgeConfig, CONFIG_FILE};
use crate::simulate::SimulateArgs;

#[derive(Parser)]
#[command(name = "badge")]
#[command(version, about = "Headless driver for the 3D badge viewer", long_about = None)]
struct Cli {
    /// Config file, or a directory containing badge.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the badges in the catalog
    Catalog,
    /// Simulate a viewing session and print sampled frames
    Simulate(SimulateArgs),
    /// Write a default badge.toml
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Overwrite an existing badge.toml
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Catalog => {
            let config = BadgeConfig::resolve(cli.config.as_deref())?;
            for (index, entry) in config.catalog()?.iter().enumerate() {
                println!("{index}  {:<12} {}", entry.display_name, entry.asset_path);
            }
        }
        Commands::Simulate(args) => {
            let config = BadgeConfig::resolve(cli.config.as_deref())?;
            let catalog = config.catalog()?;
            simulate::execute(&args, config.viewer, catalog, &config.assets.root)?;
        }
        Commands::Init { path, force } => init(&path, force)?,
    }

    Ok(())
}

fn init(dir: &Path, force: bool) -> Result<()> {
    let target = dir.join(CONFIG_FILE);
    if target.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            target.display()
        );
    }

    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    fs::write(&target, BadgeConfig::new().to_toml()?)
        .with_context(|| format!("Failed to write {}", target.display()))?;

    tracing::info!(path = %target.display(), "wrote default config");
    Ok(())
}
