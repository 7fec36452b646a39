//! CLI command implementations for NSAT tooling

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::error::CliResult;
use crate::workspace::Workspace;

pub mod init;
pub mod inspect;
pub mod params;
pub mod viz;
pub mod weights;

/// nsat - companion tooling for the NSAT spiking neural network engine
#[derive(Parser, Debug)]
#[command(
    name = "nsat",
    version,
    about = "Parameter files, weight matrices and spike rasters for the NSAT engine",
    long_about = "nsat prepares the inputs of an NSAT simulation and reads back its outputs: \
                  encode population parameter records, generate connectivity weight files, \
                  decode binary spike logs and render them as raster plots."
)]
pub struct NsatCli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workspace directory (defaults to current directory)
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a workspace with params/, results/ and nsat.toml
    #[command(alias = "new")]
    Init(init::InitCommand),

    /// Generate or inspect weight matrix files
    Weights(weights::WeightsCommand),

    /// Render spike logs as raster plots
    #[command(alias = "viz")]
    Raster(viz::RasterCommand),

    /// Encode or inspect population parameter records
    Params(params::ParamsCommand),

    /// Decode a spike log and summarize it
    Inspect(inspect::InspectCommand),
}

impl NsatCli {
    /// Execute the CLI command
    pub fn execute(self) -> CliResult<()> {
        let root = match self.workspace {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };

        let config = self.config.as_deref();

        match self.command {
            // init writes the config rather than reading it
            Commands::Init(cmd) => cmd.execute(Workspace::new(root)),
            Commands::Weights(cmd) => cmd.execute(&Workspace::open(root, config)?),
            Commands::Raster(cmd) => cmd.execute(&Workspace::open(root, config)?),
            Commands::Params(cmd) => cmd.execute(&Workspace::open(root, config)?),
            Commands::Inspect(cmd) => cmd.execute(&Workspace::open(root, config)?),
        }
    }
}
