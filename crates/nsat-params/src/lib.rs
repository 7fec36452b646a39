//! Population parameter records for the NSAT engine
//!
//! Populations are plain values: callers set fields freely, then `push()`
//! encodes them into the fixed binary layout the engine reads. No range
//! checks are performed on field values. Collections of populations live in
//! a caller-owned [`PopulationSet`].

#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export the storage types the records are built on
pub use nsat_storage::{ByteOrder, StorageError, WORD_SIZE};

pub mod error;
pub mod input;
pub mod layout;
pub mod network;
pub mod neuron;
pub mod synapse;
pub mod types;

pub use error::{ParamsError, Result};
pub use input::{InputPopulation, SpkgParams, SPKG_RECORD_SIZE};
pub use network::{Population, PopulationKind, PopulationSet};
pub use neuron::{NsatField, NsatParams, NsatPopulation, NSAT_RECORD_SIZE};
pub use synapse::{BlankoutParams, BLANKOUT_RECORD_SIZE};
pub use types::{NeuronType, StdpType};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_integration() {
        let mut set = PopulationSet::new();
        set.add_input(InputPopulation::new("input", 10))
            .connect(["excit"]);
        set.add_nsat(NsatPopulation::new("excit", 100))
            .set(NsatField::Alpha, 0.9)
            .set(NsatField::IsSet, 1.0);
        set.push_all(ByteOrder::default());

        let excit = set.get_nsat("excit").unwrap();
        assert_eq!(excit.buffer().len(), NSAT_RECORD_SIZE);
        assert_eq!(excit.buffer()[72], 1);
        assert_eq!(set.connections(), vec![("input", "excit")]);
    }
}
