//! Spike-log inspection command

use clap::Args;
use nsat_storage::SpikeLog;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::info;

use crate::error::CliResult;
use crate::workspace::Workspace;

/// Decode a spike log and summarize it
#[derive(Args, Debug)]
pub struct InspectCommand {
    /// Spike log to decode
    pub file: PathBuf,

    /// Also print the first N spikes
    #[arg(long, default_value_t = 0)]
    pub head: usize,
}

impl InspectCommand {
    pub fn execute(self, workspace: &Workspace) -> CliResult<()> {
        let path = workspace.resolve(&self.file);
        info!("Inspecting {}", path.display());

        let log = SpikeLog::read(&path, workspace.byte_order())?;
        print!("{}", summarize(&log, self.head));
        Ok(())
    }
}

/// Header, spike count, and time and neuron ranges of a log
pub fn summarize(log: &SpikeLog, head: usize) -> String {
    let raster = log.raster();
    let mut out = String::new();

    let _ = writeln!(out, "header: {:?}", log.header);
    let _ = writeln!(out, "spikes: {}", log.spike_count());
    match (raster.time_range(), raster.neuron_range()) {
        (Some((t0, t1)), Some((n0, n1))) => {
            let _ = writeln!(out, "time: {}..={}", t0, t1);
            let _ = writeln!(out, "neurons: {}..={}", n0, n1);
        }
        _ => {
            let _ = writeln!(out, "time: -");
            let _ = writeln!(out, "neurons: -");
        }
    }

    for spike in log.spikes().take(head) {
        let _ = writeln!(out, "{} {}", spike.time, spike.neuron_id);
    }
    out
}
