//! Configuration management for the NSAT CLI
//!
//! Settings come from `nsat.toml`. Resolution order: the `--config` path,
//! then `nsat.toml` in the workspace, then the user config directory. A
//! missing file means defaults; every section and key is optional.

use clap::ValueEnum;
use nsat_storage::ByteOrder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// File name of the workspace configuration
pub const CONFIG_FILE_NAME: &str = "nsat.toml";

/// Global CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Directory layout
    pub workspace: WorkspaceSection,
    /// Spike-log decoding
    pub decode: DecodeSection,
    /// Weight matrix generation
    pub weights: WeightsSection,
    /// Raster rendering
    pub raster: RasterSection,
}

/// `[workspace]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSection {
    /// Where parameter records and weight files are written
    pub params_dir: PathBuf,
    /// Where the engine drops spike logs
    pub results_dir: PathBuf,
    /// Simulation name; `sim_<name>.dat` is skipped when scanning results
    pub sim_name: String,
}

impl Default for WorkspaceSection {
    fn default() -> Self {
        Self {
            params_dir: PathBuf::from("params"),
            results_dir: PathBuf::from("results"),
            sim_name: "test_spike_trains".to_string(),
        }
    }
}

/// `[decode]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeSection {
    /// Byte order of spike logs and parameter records
    pub byte_order: ByteOrder,
}

/// Weight file preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WeightPreset {
    /// Three projection files: inp_exc, exc_inh, inh_exc
    #[default]
    Connections,
    /// Visible/hidden layer matrices
    Matrix,
    /// Small three-layer integer matrices
    Simple,
}

/// `[weights]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightsSection {
    /// RNG seed; unset means a fresh seed per run
    pub seed: Option<u64>,
    /// Preset used when none is given on the command line
    pub preset: WeightPreset,
}

/// `[raster]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterSection {
    /// Half length of each spike tick in pixels
    pub marker_size: u32,
    /// Image width in pixels
    pub width: u32,
    /// Height of each panel in pixels
    pub height: u32,
}

impl Default for RasterSection {
    fn default() -> Self {
        Self {
            marker_size: 5,
            width: 800,
            height: 400,
        }
    }
}

impl CliConfig {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> CliResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| {
                CliError::config(format!("Invalid config file {}: {}", path.display(), e))
            })
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve and load the configuration for a workspace
    pub fn resolve(explicit: Option<&Path>, workspace: &Path) -> CliResult<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(CliError::missing_resource(format!(
                    "config file {}",
                    path.display()
                )));
            }
            debug!("Loading config from {}", path.display());
            return Self::load_from_file(path);
        }

        let local = workspace.join(CONFIG_FILE_NAME);
        if local.exists() {
            debug!("Loading config from {}", local.display());
            return Self::load_from_file(&local);
        }

        match Self::default_config_path() {
            Ok(user) if user.exists() => {
                debug!("Loading config from {}", user.display());
                Self::load_from_file(&user)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> CliResult<()> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Render as TOML text
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::config(format!("Failed to serialize config: {}", e)))
    }

    /// Get the user-level configuration file path
    pub fn default_config_path() -> CliResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::config("Could not determine config directory"))?;
        Ok(config_dir.join("nsat").join("config.toml"))
    }
}
