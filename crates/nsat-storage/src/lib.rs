//! Storage layer and binary schemas for the NSAT engine tooling
//!
//! This crate holds everything that crosses a file boundary with the NSAT
//! engine: the fixed binary spike-log format written by the engine, the
//! delimited weight/connectivity matrices it reads, and the word-level
//! helpers shared with the parameter layout encoder.

#![deny(missing_docs)]
#![warn(clippy::all)]

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Spike event decoded from an engine spike log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spike {
    /// Simulation time step of the spike
    pub time: i32,
    /// Neuron that spiked
    pub neuron_id: i32,
}

impl Spike {
    /// Create a new spike
    pub const fn new(time: i32, neuron_id: i32) -> Self {
        Self { time, neuron_id }
    }
}

// Core modules
pub mod error;
pub mod schemas;

// File formats
pub mod file;
pub mod spikelog;
pub mod weights;

// Re-export essential types
pub use error::{StorageError, Result};
pub use schemas::{ByteOrder, WORD_SIZE};

pub use file::ResultsDir;
pub use spikelog::{decode, decode_with, extract_time_and_ids, Raster, SpikeLog, SpikeLogHeader};
pub use weights::{TextFormat, WeightMatrix};
