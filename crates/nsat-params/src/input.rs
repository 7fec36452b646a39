//! Input spike-generator population records

use crate::{
    error::Result,
    layout::{record_size, FieldReader, FieldWriter},
    network::Population,
};
use nsat_storage::ByteOrder;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Size of an encoded spike-generator record: 2 words, 2 flags, padded to 12 bytes
pub const SPKG_RECORD_SIZE: usize = record_size(2, 2);

/// Spike-generator settings
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpkgParams {
    /// Firing rate
    pub rate: f32,
    /// Frequency of periodic generators
    #[cfg_attr(feature = "serde", serde(alias = "frequency"))]
    pub freq: f32,
    /// Emit a spike at time zero
    pub spk_at_zero: bool,
    /// Place the generator on the GPU
    pub on_gpu: bool,
}

impl SpkgParams {
    /// Encode into the engine's spike-generator struct layout
    pub fn encode(&self, order: ByteOrder) -> [u8; SPKG_RECORD_SIZE] {
        let mut buf = [0u8; SPKG_RECORD_SIZE];
        FieldWriter::new(&mut buf, order)
            .f32(self.rate)
            .f32(self.freq)
            .flag(self.spk_at_zero)
            .flag(self.on_gpu);
        buf
    }

    /// Decode an encoded spike-generator record
    pub fn decode(data: &[u8], order: ByteOrder) -> Result<Self> {
        let mut r = FieldReader::new(data, SPKG_RECORD_SIZE, "SPKG", order)?;
        Ok(Self {
            rate: r.f32()?,
            freq: r.f32()?,
            spk_at_zero: r.flag()?,
            on_gpu: r.flag()?,
        })
    }
}

/// A population of input spike generators
#[derive(Debug, Clone, PartialEq)]
pub struct InputPopulation {
    /// Population name
    pub name: String,
    /// Number of generator neurons
    pub num_neurons: usize,
    /// Generator settings
    pub params: SpkgParams,
    /// Populations this one projects to, in connection order
    pub destinations: Vec<String>,
    buffer: [u8; SPKG_RECORD_SIZE],
}

impl InputPopulation {
    /// Create a generator population with zero rate and frequency
    pub fn new(name: impl Into<String>, num_neurons: usize) -> Self {
        Self {
            name: name.into(),
            num_neurons,
            params: SpkgParams::default(),
            destinations: Vec::new(),
            buffer: [0; SPKG_RECORD_SIZE],
        }
    }

    /// Create a generator population with the given settings
    pub fn with_params(name: impl Into<String>, num_neurons: usize, params: SpkgParams) -> Self {
        Self {
            params,
            ..Self::new(name, num_neurons)
        }
    }
}

impl Population for InputPopulation {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_neurons(&self) -> usize {
        self.num_neurons
    }

    fn destinations(&self) -> &[String] {
        &self.destinations
    }

    fn destinations_mut(&mut self) -> &mut Vec<String> {
        &mut self.destinations
    }

    fn push_with(&mut self, order: ByteOrder) {
        self.buffer = self.params.encode(order);
        log::debug!("pushed input population '{}'", self.name);
    }

    fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    fn record_kind(&self) -> &'static str {
        "spkg"
    }
}
