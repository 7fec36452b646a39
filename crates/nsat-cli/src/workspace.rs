//! Workspace management utilities

use nsat_storage::{ByteOrder, ResultsDir};
use std::path::{Path, PathBuf};

use crate::config::{CliConfig, CONFIG_FILE_NAME};
use crate::error::{CliError, CliResult};

/// A directory holding `params/`, `results/` and an optional `nsat.toml`
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Workspace root
    pub root: PathBuf,
    /// Resolved configuration
    pub config: CliConfig,
}

impl Workspace {
    /// Create a workspace with default configuration
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: CliConfig::default(),
        }
    }

    /// Open a workspace, resolving its configuration
    pub fn open(root: PathBuf, config_path: Option<&Path>) -> CliResult<Self> {
        let config = CliConfig::resolve(config_path, &root)?;
        Ok(Self { root, config })
    }

    /// Path of the workspace configuration file
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// Check if the workspace has been initialized
    pub fn is_initialized(&self) -> bool {
        self.config_path().exists()
    }

    /// Get the parameter directory
    pub fn params_dir(&self) -> PathBuf {
        self.resolve(&self.config.workspace.params_dir)
    }

    /// Get the results directory
    pub fn results_dir(&self) -> PathBuf {
        self.resolve(&self.config.workspace.results_dir)
    }

    /// Spike-log scanner over the results directory
    pub fn results(&self) -> ResultsDir {
        ResultsDir::new(self.results_dir())
    }

    /// Configured simulation name
    pub fn sim_name(&self) -> &str {
        &self.config.workspace.sim_name
    }

    /// Configured byte order
    pub fn byte_order(&self) -> ByteOrder {
        self.config.decode.byte_order
    }

    /// Make a user-supplied path relative to the workspace root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Ensure workspace directories exist
    pub fn ensure_directories(&self) -> CliResult<()> {
        for dir in [self.params_dir(), self.results_dir()] {
            if !dir.exists() {
                std::fs::create_dir_all(&dir).map_err(|e| {
                    CliError::workspace(format!(
                        "Failed to create directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }
        Ok(())
    }
}
