//! Raster plots of decoded spike logs
//!
//! Each log becomes one panel stacked vertically in a single SVG: a black
//! tick per spike, x = time step, y = neuron id. The same data can be
//! exported as JSON instead.

use clap::{Args, ValueEnum};
use nsat_storage::{Raster, Spike, SpikeLog};
use plotters::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::RasterSection;
use crate::error::{CliError, CliResult};
use crate::workspace::Workspace;

/// Render spike logs as raster plots
#[derive(Args, Debug)]
pub struct RasterCommand {
    /// Spike logs to plot (defaults to every log in the results directory)
    pub files: Vec<PathBuf>,

    /// Simulation name whose `sim_<name>.dat` is skipped when scanning
    #[arg(long)]
    pub sim_name: Option<String>,

    /// Output file (defaults to raster.svg or raster.json in the results directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "svg")]
    pub format: RasterFormat,

    /// Half length of each spike tick in pixels
    #[arg(long)]
    pub marker_size: Option<u32>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RasterFormat {
    Svg,
    Json,
}

impl RasterFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Json => "json",
        }
    }
}

/// JSON export of one spike log
#[derive(Debug, Serialize)]
pub struct RasterExport {
    /// Source file
    pub file: String,
    /// Number of spikes
    pub spike_count: usize,
    /// Spikes in file order
    pub spikes: Vec<Spike>,
}

impl RasterCommand {
    pub fn execute(self, workspace: &Workspace) -> CliResult<()> {
        let order = workspace.byte_order();
        let paths = if self.files.is_empty() {
            let sim_name = self.sim_name.as_deref().unwrap_or(workspace.sim_name());
            workspace.results().spike_logs(sim_name)?
        } else {
            self.files.iter().map(|f| workspace.resolve(f)).collect()
        };

        if paths.is_empty() {
            return Err(CliError::missing_resource(format!(
                "no spike logs in {}",
                workspace.results_dir().display()
            )));
        }

        let mut logs = Vec::with_capacity(paths.len());
        for path in paths {
            let log = SpikeLog::read(&path, order)?;
            debug!("{}: {} spikes", path.display(), log.spike_count());
            logs.push((display_name(&path), log.raster()));
        }

        let output = match &self.output {
            Some(path) => workspace.resolve(path),
            None => workspace
                .results_dir()
                .join(format!("raster.{}", self.format.extension())),
        };
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }

        match self.format {
            RasterFormat::Svg => {
                let mut style = workspace.config.raster.clone();
                if let Some(size) = self.marker_size {
                    style.marker_size = size;
                }
                render_svg(&output, &logs, &style)?;
            }
            RasterFormat::Json => {
                if self.marker_size.is_some() {
                    warn!("--marker-size has no effect on JSON output");
                }
                let exports: Vec<_> = logs
                    .iter()
                    .map(|(file, raster)| RasterExport {
                        file: file.clone(),
                        spike_count: raster.len(),
                        spikes: raster.spikes().collect(),
                    })
                    .collect();
                let json = serde_json::to_string_pretty(&exports)?;
                std::fs::write(&output, json)?;
            }
        }

        info!("Wrote raster of {} logs to {}", logs.len(), output.display());
        Ok(())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Axis range covering every value with one unit of margin
fn axis_range(range: Option<(i32, i32)>) -> std::ops::Range<i32> {
    match range {
        Some((lo, hi)) => lo.saturating_sub(1)..hi.saturating_add(1),
        None => 0..1,
    }
}

/// Draw one panel per raster into an SVG file
pub fn render_svg(path: &Path, logs: &[(String, Raster)], style: &RasterSection) -> CliResult<()> {
    if logs.is_empty() {
        return Err(CliError::invalid_args("nothing to plot"));
    }

    let size = (style.width, style.height * logs.len() as u32);
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(CliError::render)?;

    let tick = style.marker_size as i32;
    let areas = root.split_evenly((logs.len(), 1));
    for ((name, raster), area) in logs.iter().zip(areas.iter()) {
        let mut chart = ChartBuilder::on(area)
            .caption(name, ("sans-serif", 16))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d(axis_range(raster.time_range()), axis_range(raster.neuron_range()))
            .map_err(CliError::render)?;

        chart
            .configure_mesh()
            .x_desc("Time (ms)")
            .y_desc("# Neuron")
            .draw()
            .map_err(CliError::render)?;

        chart
            .draw_series(raster.spikes().map(|s| {
                EmptyElement::at((s.time, s.neuron_id))
                    + PathElement::new(vec![(0, -tick), (0, tick)], BLACK.mix(0.7))
            }))
            .map_err(CliError::render)?;
    }

    root.present().map_err(CliError::render)?;
    Ok(())
}
