//! Blankout synapse records

use crate::{
    error::Result,
    layout::{record_size, FieldReader, FieldWriter},
};
use nsat_storage::ByteOrder;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Size of an encoded blankout record: two words, no padding
pub const BLANKOUT_RECORD_SIZE: usize = record_size(2, 0);

/// Stochastic synapse dropping
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BlankoutParams {
    /// Synaptic scale applied to surviving spikes
    #[cfg_attr(feature = "serde", serde(alias = "alphaS"))]
    pub alpha_s: f32,
    /// Probability that a spike is blanked out
    pub prob: f32,
}

impl BlankoutParams {
    /// Encode into the engine's blankout struct layout
    pub fn encode(&self, order: ByteOrder) -> [u8; BLANKOUT_RECORD_SIZE] {
        let mut buf = [0u8; BLANKOUT_RECORD_SIZE];
        FieldWriter::new(&mut buf, order)
            .f32(self.alpha_s)
            .f32(self.prob);
        buf
    }

    /// Decode an encoded blankout record
    pub fn decode(data: &[u8], order: ByteOrder) -> Result<Self> {
        let mut r = FieldReader::new(data, BLANKOUT_RECORD_SIZE, "blankout", order)?;
        Ok(Self {
            alpha_s: r.f32()?,
            prob: r.f32()?,
        })
    }
}
