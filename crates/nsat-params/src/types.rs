//! Engine neuron-type and STDP-type codes

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const POISSON: u32 = 1 << 0;
const EXCITATORY: u32 = (1 << 2) | (1 << 1);
const INHIBITORY: u32 = (1 << 3) | (1 << 4);
const DOPAMINERGIC: u32 = 1 << 5;

/// Code the engine uses for an unrecognised neuron type
pub const UNKNOWN_NEURON_CODE: u32 = 135;

/// Neuron type of a population, as a bit pattern understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NeuronType {
    /// Poisson input neuron
    PoissonNeuron,
    /// Excitatory neuron
    ExcitatoryNeuron,
    /// Inhibitory neuron
    InhibitoryNeuron,
    /// Dopaminergic (excitatory) neuron
    DopaminergicNeuron,
    /// Excitatory Poisson input
    ExcitatoryPoisson,
    /// Inhibitory Poisson input
    InhibitoryPoisson,
    /// Any name the engine does not know
    Unknown,
}

impl NeuronType {
    /// Parse a type name, ignoring case; unknown names give [`NeuronType::Unknown`]
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "poisson_neuron" => Self::PoissonNeuron,
            "excitatory_neuron" => Self::ExcitatoryNeuron,
            "inhibitory_neuron" => Self::InhibitoryNeuron,
            "dopaminergic_neuron" => Self::DopaminergicNeuron,
            "excitatory_poisson" => Self::ExcitatoryPoisson,
            "inhibitory_poisson" => Self::InhibitoryPoisson,
            _ => Self::Unknown,
        }
    }

    /// Engine bit pattern
    pub const fn code(self) -> u32 {
        match self {
            Self::PoissonNeuron => POISSON,
            Self::ExcitatoryNeuron => EXCITATORY,
            Self::InhibitoryNeuron => INHIBITORY,
            Self::DopaminergicNeuron => DOPAMINERGIC | EXCITATORY,
            Self::ExcitatoryPoisson => EXCITATORY | POISSON,
            Self::InhibitoryPoisson => INHIBITORY | POISSON,
            Self::Unknown => UNKNOWN_NEURON_CODE,
        }
    }

    /// Whether the type generates Poisson input spikes
    pub const fn is_poisson(self) -> bool {
        !matches!(self, Self::Unknown) && self.code() & POISSON != 0
    }
}

/// STDP rule variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StdpType {
    /// Plain pair-based STDP
    Standard,
    /// Dopamine-modulated STDP
    DaMod,
    /// Not a rule the engine knows
    Unknown,
}

impl StdpType {
    /// Parse a rule name, ignoring case; unknown names give [`StdpType::Unknown`]
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "standard" => Self::Standard,
            "da_mod" => Self::DaMod,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for StdpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Standard => "standard",
            Self::DaMod => "da_mod",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neuron_type_codes() {
        assert_eq!(NeuronType::from_name("poisson_neuron").code(), 1);
        assert_eq!(NeuronType::from_name("EXCITATORY_NEURON").code(), 6);
        assert_eq!(NeuronType::from_name("inhibitory_neuron").code(), 24);
        assert_eq!(NeuronType::from_name("dopaminergic_neuron").code(), 38);
        assert_eq!(NeuronType::from_name("excitatory_poisson").code(), 7);
        assert_eq!(NeuronType::from_name("Inhibitory_Poisson").code(), 25);
        assert_eq!(NeuronType::from_name("pyramidal").code(), 135);
    }

    #[test]
    fn test_poisson_flag() {
        assert!(NeuronType::ExcitatoryPoisson.is_poisson());
        assert!(!NeuronType::ExcitatoryNeuron.is_poisson());
        // 135 has the low bit set but is not a generator.
        assert!(!NeuronType::Unknown.is_poisson());
    }

    #[test]
    fn test_stdp_type() {
        assert_eq!(StdpType::from_name("Standard"), StdpType::Standard);
        assert_eq!(StdpType::from_name("DA_MOD"), StdpType::DaMod);
        assert_eq!(StdpType::from_name("hebbian"), StdpType::Unknown);
        assert_eq!(StdpType::DaMod.to_string(), "da_mod");
    }
}
