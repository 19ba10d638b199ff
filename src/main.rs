use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

mod config;
mod core;
mod infrastructure;
mod normalize;

use crate::config::AppConfig;
use crate::core::categories::discover_categories;
use crate::core::layout::OutputLayout;
use crate::core::migration;

#[derive(Parser, Debug)]
#[command(
    name = "organize-pcb-dataset",
    version,
    about = "Materialize a train/test PCB defect dataset from raw source trees"
)]
struct Cli {
    /// Config file overriding the conventional source layout.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Consolidate the source trees into the train/test output tree.
    Organize {
        /// Root of the unorganized source dataset.
        #[arg(long)]
        base_dir: Option<PathBuf>,
        /// Root of the materialized output tree.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Clean up scraped file names in one directory before organizing.
    Normalize { dir: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    infrastructure::logging::setup_logging().context("failed to initialize logging")?;

    let command = cli.command.unwrap_or(Commands::Organize {
        base_dir: None,
        output: None,
    });

    match command {
        Commands::Organize { base_dir, output } => {
            let mut config = AppConfig::load(cli.config.as_deref());
            if let Some(base_dir) = base_dir {
                config.base_dir = base_dir;
            }
            if let Some(output) = output {
                config.output_dir = output;
            }
            run_organize(&config)?;
        }
        Commands::Normalize { dir } => {
            let renamed = normalize::normalize_extensions(&dir)
                .with_context(|| format!("failed to normalize file names under {:?}", dir))?;
            info!("Renamed {} files in {:?}", renamed, dir);
        }
    }

    Ok(())
}

fn run_organize(config: &AppConfig) -> anyhow::Result<()> {
    info!("Organizing dataset from {:?} into {:?}", config.base_dir, config.output_dir);

    let categories = discover_categories(&config.annotations_dir())
        .context("cannot organize without the annotation tree")?;

    let layout = OutputLayout::new(config.output_dir.clone());
    layout
        .build(&categories)
        .context("cannot prepare the output tree")?;

    let report = migration::run(&config.source_roots(), &layout, &categories);

    info!(
        "Dataset organization completed. {} moved, {} missing, {} collisions, {} failed",
        report.moved, report.skipped_missing, report.skipped_collision, report.failed
    );

    Ok(())
}
