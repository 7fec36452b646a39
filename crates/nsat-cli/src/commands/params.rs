//! Parameter record encoding and inspection commands

use clap::{Args, Subcommand, ValueEnum};
use nsat_params::{
    BlankoutParams, NsatField, NsatParams, Population, PopulationSet, SpkgParams,
};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::CliResult;
use crate::network::NetworkFile;
use crate::workspace::Workspace;

/// File listing every `(source, target)` edge
pub const CONNECTIONS_FILE: &str = "connections.txt";

/// Encode or inspect population parameter records
#[derive(Args, Debug)]
pub struct ParamsCommand {
    #[command(subcommand)]
    pub sub: ParamsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ParamsSubcommand {
    /// Encode a TOML network description into engine records
    Encode(ParamsEncode),
    /// Decode a record file and print its fields
    Inspect(ParamsInspect),
}

#[derive(Args, Debug)]
pub struct ParamsEncode {
    /// Network description (TOML with [[nsat]] and [[input]] tables)
    pub network: PathBuf,

    /// Output directory (defaults to the workspace params directory)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ParamsInspect {
    /// Record file to decode
    pub file: PathBuf,

    /// Record variant (inferred from the extension when omitted)
    #[arg(short, long, value_enum)]
    pub kind: Option<RecordKind>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Nsat,
    Spkg,
    Blankout,
}

impl RecordKind {
    fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "nsat" => Some(Self::Nsat),
            "spkg" => Some(Self::Spkg),
            "blankout" => Some(Self::Blankout),
            _ => None,
        }
    }
}

impl ParamsCommand {
    pub fn execute(self, workspace: &Workspace) -> CliResult<()> {
        match self.sub {
            ParamsSubcommand::Encode(cmd) => cmd.execute(workspace),
            ParamsSubcommand::Inspect(cmd) => cmd.execute(workspace),
        }
    }
}

impl ParamsEncode {
    pub fn execute(self, workspace: &Workspace) -> CliResult<()> {
        let network = NetworkFile::load(&workspace.resolve(&self.network))?;
        for (name, ty) in network.neuron_types() {
            info!("Population '{}' has neuron type code {}", name, ty.code());
        }

        let mut set = network.into_population_set()?;
        let out_dir = match self.out_dir {
            Some(dir) => workspace.resolve(&dir),
            None => workspace.params_dir(),
        };

        let written = write_records(&mut set, &out_dir, workspace.byte_order())?;
        info!(
            "Encoded {} populations and {} connections into {}",
            written,
            set.connections().len(),
            out_dir.display()
        );
        Ok(())
    }
}

/// Push every population and write its record plus the connection list
///
/// Returns the number of record files written.
pub fn write_records(
    set: &mut PopulationSet,
    out_dir: &Path,
    order: nsat_params::ByteOrder,
) -> CliResult<usize> {
    std::fs::create_dir_all(out_dir)?;
    set.push_all(order);

    for pop in set.iter() {
        let path = out_dir.join(format!("{}.{}", pop.name(), pop.record_kind()));
        std::fs::write(&path, pop.buffer())?;
        info!("Wrote {} ({} neurons)", path.display(), pop.num_neurons());
    }

    let mut edges = String::new();
    for (source, target) in set.connections() {
        // Writing to a String cannot fail.
        let _ = writeln!(edges, "{} {}", source, target);
    }
    std::fs::write(out_dir.join(CONNECTIONS_FILE), edges)?;

    Ok(set.len())
}

impl ParamsInspect {
    pub fn execute(self, workspace: &Workspace) -> CliResult<()> {
        let path = workspace.resolve(&self.file);
        let kind = self
            .kind
            .or_else(|| RecordKind::from_extension(&path))
            .unwrap_or(RecordKind::Nsat);
        let bytes = std::fs::read(&path)?;
        let order = workspace.byte_order();

        println!("file: {} ({:?}, {} bytes)", path.display(), kind, bytes.len());
        print!("{}", describe_record(kind, &bytes, order)?);
        Ok(())
    }
}

/// Decode a record and list its fields one per line
pub fn describe_record(
    kind: RecordKind,
    bytes: &[u8],
    order: nsat_params::ByteOrder,
) -> CliResult<String> {
    let mut out = String::new();
    match kind {
        RecordKind::Nsat => {
            let params = NsatParams::decode(bytes, order)?;
            for field in NsatField::ALL {
                let _ = writeln!(
                    out,
                    "{:>14} @{:<2} = {}",
                    field.engine_name(),
                    field.offset(),
                    params.get(field)
                );
            }
        }
        RecordKind::Spkg => {
            let p = SpkgParams::decode(bytes, order)?;
            let _ = writeln!(out, "rate = {}", p.rate);
            let _ = writeln!(out, "freq = {}", p.freq);
            let _ = writeln!(out, "spk_at_zero = {}", p.spk_at_zero);
            let _ = writeln!(out, "on_gpu = {}", p.on_gpu);
        }
        RecordKind::Blankout => {
            let p = BlankoutParams::decode(bytes, order)?;
            let _ = writeln!(out, "alpha_s = {}", p.alpha_s);
            let _ = writeln!(out, "prob = {}", p.prob);
        }
    }
    Ok(out)
}
