//! NSAT CLI crate
//!
//! Purpose:
//! - Prepare the inputs of an NSAT simulation and read back its outputs from
//!   the command line.
//!
//! Major commands (see [commands]):
//! - init: create `params/`, `results/` and a default `nsat.toml`.
//! - weights: generate preset random weight files; inspect a weight file.
//! - raster: decode spike logs and render them as an SVG raster or JSON.
//! - params: encode a TOML network description into engine records plus a
//!   connection list; decode a record file.
//! - inspect: summarize a single spike log.
//!
//! Notes:
//! - The binary (src/main.rs) wires up logging and argument parsing, calling
//!   [`NsatCli::execute`].
//! - Library crates log through `log`; `tracing-subscriber` picks those
//!   records up through its `tracing-log` bridge.

pub mod commands;
pub mod config;
pub mod error;
pub mod network;
pub mod workspace;

pub use commands::NsatCli;
pub use error::{CliError, CliResult};
