//! Workspace initialization command

use clap::Args;
use tracing::info;

use crate::error::{CliError, CliResult};
use crate::workspace::Workspace;

const NETWORK_TEMPLATE: &str = r#"# Example NSAT network description
# Encode with: nsat params encode params/network.toml

[[input]]
name = "input"
num_neurons = 50
destinations = ["excit"]

[input.params]
rate = 20.0
freq = 0.0
spk_at_zero = false
on_gpu = false

[[nsat]]
name = "excit"
num_neurons = 100
neuron_type = "excitatory_neuron"
destinations = ["inhib"]

[nsat.params]
alpha = 0.9
beta = 1.0
v_th = 1.0
v_reset = 0.0
tau_ref = 2.0
is_set = true

[[nsat]]
name = "inhib"
num_neurons = 20
neuron_type = "inhibitory_neuron"
destinations = ["excit"]

[nsat.params]
alpha = 0.8
v_th = 1.0
is_set = true
"#;

/// Initialize a workspace
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Overwrite an existing nsat.toml
    #[arg(long)]
    pub force: bool,

    /// Also write an example network description into params/
    #[arg(long)]
    pub example: bool,
}

impl InitCommand {
    pub fn execute(self, workspace: Workspace) -> CliResult<()> {
        info!("Initializing NSAT workspace at {}", workspace.root.display());

        let config_path = workspace.config_path();
        if config_path.exists() && !self.force {
            return Err(CliError::workspace(format!(
                "{} already exists (use --force to overwrite)",
                config_path.display()
            )));
        }

        workspace.ensure_directories()?;
        workspace.config.save_to_file(&config_path)?;
        info!("Wrote {}", config_path.display());

        if self.example {
            let network = workspace.params_dir().join("network.toml");
            std::fs::write(&network, NETWORK_TEMPLATE)?;
            info!("Wrote {}", network.display());
        }

        Ok(())
    }
}
