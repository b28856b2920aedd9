//! CLI module for the experiment gate
//!
//! Provides subcommands for exercising configured experiments:
//! - `list`: show configured experiments and their parameter sets
//! - `render`: run one activation and print what would render

pub mod list;
pub mod render;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Experiment gate - enroll visitors and resolve experiment parameters
#[derive(Parser)]
#[command(name = "experiment-gate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to config/default and config/local)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List configured experiments
    List,

    /// Run one activation and print the rendered parameters
    Render(render::RenderArgs),
}

/// Load configuration and install logging
pub fn init(config_path: Option<&Path>) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = match config_path {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load().unwrap_or_default(),
    };

    logging::init_logging(&config.logging);
    Ok(config)
}
