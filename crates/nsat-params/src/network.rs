//! Population trait and the caller-owned population collection

use crate::{input::InputPopulation, neuron::NsatPopulation};
use nsat_storage::ByteOrder;
use std::collections::HashSet;
use std::fmt;

/// Behaviour shared by every population variant
pub trait Population {
    /// Population name
    fn name(&self) -> &str;

    /// Number of neurons in the population
    fn num_neurons(&self) -> usize;

    /// Target population names, in connection order
    fn destinations(&self) -> &[String];

    /// Mutable access to the target list
    fn destinations_mut(&mut self) -> &mut Vec<String>;

    /// Encode the current fields into the record buffer
    fn push_with(&mut self, order: ByteOrder);

    /// Bytes of the last push; all zeros before any push
    fn buffer(&self) -> &[u8];

    /// Short tag naming the record variant, used as a file extension
    fn record_kind(&self) -> &'static str;

    /// Push in the engine's default (little-endian) byte order
    fn push(&mut self) {
        self.push_with(ByteOrder::default());
    }

    /// Append targets in call order; duplicates are kept
    fn connect<I, S>(&mut self, targets: I)
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.destinations_mut()
            .extend(targets.into_iter().map(Into::into));
    }
}

/// Population variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopulationKind {
    /// NSAT neuron population
    Nsat,
    /// Input spike generator population
    Input,
}

impl fmt::Display for PopulationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nsat => f.write_str("nsat"),
            Self::Input => f.write_str("input"),
        }
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Nsat(NsatPopulation),
    Input(InputPopulation),
}

impl Entry {
    fn kind(&self) -> PopulationKind {
        match self {
            Self::Nsat(_) => PopulationKind::Nsat,
            Self::Input(_) => PopulationKind::Input,
        }
    }

    fn as_dyn(&self) -> &dyn Population {
        match self {
            Self::Nsat(p) => p,
            Self::Input(p) => p,
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn Population {
        match self {
            Self::Nsat(p) => p,
            Self::Input(p) => p,
        }
    }
}

/// Caller-owned set of populations, kept in insertion order
///
/// Names are not required to be unique. Lookups by name return the first
/// match; [`PopulationSet::duplicate_names`] reports collisions.
#[derive(Debug, Clone, Default)]
pub struct PopulationSet {
    entries: Vec<Entry>,
}

impl PopulationSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an NSAT population and return it for further configuration
    pub fn add_nsat(&mut self, population: NsatPopulation) -> &mut NsatPopulation {
        self.entries.push(Entry::Nsat(population));
        match self.entries.last_mut() {
            Some(Entry::Nsat(p)) => p,
            _ => unreachable!("entry was just pushed"),
        }
    }

    /// Add an input population and return it for further configuration
    pub fn add_input(&mut self, population: InputPopulation) -> &mut InputPopulation {
        self.entries.push(Entry::Input(population));
        match self.entries.last_mut() {
            Some(Entry::Input(p)) => p,
            _ => unreachable!("entry was just pushed"),
        }
    }

    /// NSAT populations in insertion order
    pub fn nsat(&self) -> impl Iterator<Item = &NsatPopulation> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Nsat(p) => Some(p),
            Entry::Input(_) => None,
        })
    }

    /// Input populations in insertion order
    pub fn inputs(&self) -> impl Iterator<Item = &InputPopulation> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Input(p) => Some(p),
            Entry::Nsat(_) => None,
        })
    }

    /// Every population in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Population> {
        self.entries.iter().map(Entry::as_dyn)
    }

    /// Populations of one variant in insertion order
    pub fn of_kind(&self, kind: PopulationKind) -> impl Iterator<Item = &dyn Population> {
        self.entries
            .iter()
            .filter(move |e| e.kind() == kind)
            .map(Entry::as_dyn)
    }

    /// First NSAT population with the given name
    pub fn get_nsat(&self, name: &str) -> Option<&NsatPopulation> {
        self.nsat().find(|p| p.name == name)
    }

    /// First NSAT population with the given name, mutably
    pub fn get_nsat_mut(&mut self, name: &str) -> Option<&mut NsatPopulation> {
        self.entries.iter_mut().find_map(|e| match e {
            Entry::Nsat(p) if p.name == name => Some(p),
            _ => None,
        })
    }

    /// First input population with the given name
    pub fn get_input(&self, name: &str) -> Option<&InputPopulation> {
        self.inputs().find(|p| p.name == name)
    }

    /// First input population with the given name, mutably
    pub fn get_input_mut(&mut self, name: &str) -> Option<&mut InputPopulation> {
        self.entries.iter_mut().find_map(|e| match e {
            Entry::Input(p) if p.name == name => Some(p),
            _ => None,
        })
    }

    /// Push every population
    pub fn push_all(&mut self, order: ByteOrder) {
        for entry in &mut self.entries {
            entry.as_dyn_mut().push_with(order);
        }
        log::debug!("pushed {} populations", self.entries.len());
    }

    /// Every `(source, target)` edge, in population then destination order
    pub fn connections(&self) -> Vec<(&str, &str)> {
        self.iter()
            .flat_map(|p| {
                let source = p.name();
                p.destinations().iter().map(move |t| (source, t.as_str()))
            })
            .collect()
    }

    /// Names used by more than one population, each reported once
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut dups = Vec::new();
        for p in self.iter() {
            let name = p.name();
            if !seen.insert(name) && reported.insert(name) {
                dups.push(name);
            }
        }
        dups
    }

    /// Edges whose target names no population in the set
    pub fn dangling_destinations(&self) -> Vec<(&str, &str)> {
        let names: HashSet<&str> = self.iter().map(|p| p.name()).collect();
        self.connections()
            .into_iter()
            .filter(|(_, target)| !names.contains(target))
            .collect()
    }

    /// Number of populations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no populations
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
