//! Weight matrix generation and inspection commands

use clap::{Args, Subcommand};
use nsat_storage::{TextFormat, WeightMatrix};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tracing::info;

use crate::config::WeightPreset;
use crate::error::CliResult;
use crate::workspace::Workspace;

/// Generate or inspect weight matrix files
#[derive(Args, Debug)]
pub struct WeightsCommand {
    #[command(subcommand)]
    pub sub: WeightsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum WeightsSubcommand {
    /// Write a preset set of random weight files
    Generate(WeightsGenerate),
    /// Print the shape and value range of a weight file
    Inspect(WeightsInspect),
}

#[derive(Args, Debug)]
pub struct WeightsGenerate {
    /// Preset to generate (defaults to [weights].preset)
    #[arg(short, long, value_enum)]
    pub preset: Option<WeightPreset>,

    /// RNG seed (defaults to [weights].seed, then a random seed)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Output directory (defaults to the workspace params directory)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct WeightsInspect {
    /// Weight file to read
    pub file: PathBuf,

    /// Expected shape as ROWSxCOLS
    #[arg(long, value_parser = parse_shape)]
    pub shape: Option<(usize, usize)>,
}

/// One file produced by a preset
#[derive(Debug, Clone)]
pub struct PresetFile {
    /// File stem; written as `<name>.dat`
    pub name: &'static str,
    /// Generated weights
    pub matrix: WeightMatrix,
    /// Text layout of the file
    pub format: TextFormat,
}

impl WeightsCommand {
    pub fn execute(self, workspace: &Workspace) -> CliResult<()> {
        match self.sub {
            WeightsSubcommand::Generate(cmd) => cmd.execute(workspace),
            WeightsSubcommand::Inspect(cmd) => cmd.execute(workspace),
        }
    }
}

impl WeightsGenerate {
    pub fn execute(self, workspace: &Workspace) -> CliResult<()> {
        let preset = self.preset.unwrap_or(workspace.config.weights.preset);
        let seed = self
            .seed
            .or(workspace.config.weights.seed)
            .unwrap_or_else(|| rand::thread_rng().gen());
        let out_dir = match self.out_dir {
            Some(dir) => workspace.resolve(&dir),
            None => workspace.params_dir(),
        };

        info!("Generating {:?} weights with seed {}", preset, seed);
        std::fs::create_dir_all(&out_dir)?;

        let mut rng = StdRng::seed_from_u64(seed);
        for file in generate_preset(preset, &mut rng) {
            let path = out_dir.join(format!("{}.dat", file.name));
            file.matrix.write_to_file(&path, file.format)?;
            info!(
                "Wrote {} ({}x{}, {} nonzero)",
                path.display(),
                file.matrix.rows(),
                file.matrix.cols(),
                file.matrix.nonzero_count()
            );
        }

        Ok(())
    }
}

impl WeightsInspect {
    pub fn execute(self, workspace: &Workspace) -> CliResult<()> {
        let path = workspace.resolve(&self.file);
        let matrix = match self.shape {
            Some((rows, cols)) => WeightMatrix::read_with_shape(&path, rows, cols)?,
            None => WeightMatrix::read_from_file(&path)?,
        };

        println!("file: {}", path.display());
        println!("shape: {}x{}", matrix.rows(), matrix.cols());
        println!("nonzero: {}", matrix.nonzero_count());
        if let Some((min, max)) = matrix.min_max() {
            println!("min: {}", min);
            println!("max: {}", max);
        }
        Ok(())
    }
}

/// Build the matrices of a preset
pub fn generate_preset<R: Rng + ?Sized>(preset: WeightPreset, rng: &mut R) -> Vec<PresetFile> {
    match preset {
        WeightPreset::Connections => {
            let specs = [
                ("inp_exc", 50, 100, 0.5),
                ("exc_inh", 100, 20, 0.8),
                ("inh_exc", 20, 100, 1.2),
            ];
            specs
                .iter()
                .map(|&(name, rows, cols, factor)| PresetFile {
                    name,
                    matrix: WeightMatrix::random_binary(rows, cols, factor, &mut *rng),
                    format: TextFormat::CONNECTIONS,
                })
                .collect()
        }
        WeightPreset::Matrix => {
            let (n, m) = (18, 46);
            let exc = WeightMatrix::random_diagonal(n, 1..5, rng);
            let inh = WeightMatrix::random_diagonal(n, 5..30, rng);
            let visible2hidden = WeightMatrix::random_integer(n, m, 1..10, rng);
            let hidden2visible = visible2hidden.transpose();
            let format = TextFormat::MATRIX;
            vec![
                PresetFile { name: "excinput2visible", matrix: exc, format },
                PresetFile { name: "inhinput2visible", matrix: inh, format },
                PresetFile { name: "visible2hidden", matrix: visible2hidden, format },
                PresetFile { name: "hidden2visible", matrix: hidden2visible, format },
            ]
        }
        WeightPreset::Simple => {
            let (n, m, k) = (5, 8, 2);
            let format = TextFormat::MATRIX;
            vec![
                PresetFile {
                    name: "inp_exc_",
                    matrix: WeightMatrix::random_integer(n, m, 0..10, rng),
                    format,
                },
                PresetFile {
                    name: "exc_inh_",
                    matrix: WeightMatrix::random_integer(m, k, 0..15, rng),
                    format,
                },
                PresetFile {
                    name: "inh_exc_",
                    matrix: WeightMatrix::random_integer(n, m, 0..20, rng),
                    format,
                },
            ]
        }
    }
}

fn parse_shape(s: &str) -> Result<(usize, usize), String> {
    let (rows, cols) = s
        .split_once(|c| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected ROWSxCOLS, got '{}'", s))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid dimension '{}': {}", v, e))
    };
    Ok((parse(rows)?, parse(cols)?))
}
