//! TOML network descriptions
//!
//! ```toml
//! [[input]]
//! name = "input"
//! num_neurons = 50
//! destinations = ["excit"]
//! params = { rate = 20.0 }
//!
//! [[nsat]]
//! name = "excit"
//! num_neurons = 100
//! neuron_type = "excitatory_neuron"
//! params = { alpha = 0.9, v_th = 1.0, is_set = true }
//! ```
//!
//! Input populations are added before NSAT populations, each in file order.

use nsat_params::{
    InputPopulation, NeuronType, NsatPopulation, ParamsError, PopulationSet, SpkgParams,
};
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{CliError, CliResult};

/// A parsed network description
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkFile {
    /// `[[nsat]]` tables
    #[serde(default)]
    pub nsat: Vec<NsatEntry>,
    /// `[[input]]` tables
    #[serde(default)]
    pub input: Vec<InputEntry>,
}

/// One `[[nsat]]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NsatEntry {
    /// Population name
    pub name: String,
    /// Neuron count
    pub num_neurons: usize,
    /// Engine neuron type name
    #[serde(default)]
    pub neuron_type: Option<String>,
    /// Target population names
    #[serde(default)]
    pub destinations: Vec<String>,
    /// Field assignments, checked against the record layout
    #[serde(default)]
    pub params: BTreeMap<String, toml::Value>,
}

/// One `[[input]]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputEntry {
    /// Population name
    pub name: String,
    /// Generator count
    pub num_neurons: usize,
    /// Target population names
    #[serde(default)]
    pub destinations: Vec<String>,
    /// Generator settings
    #[serde(default)]
    pub params: SpkgParams,
}

impl NetworkFile {
    /// Read and parse a network description
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading network description {}", path.display()))?;
        let network = toml::from_str(&content)?;
        debug!("Parsed network description {}", path.display());
        Ok(network)
    }

    /// Neuron types declared for NSAT populations, in file order
    pub fn neuron_types(&self) -> Vec<(&str, NeuronType)> {
        self.nsat
            .iter()
            .filter_map(|e| {
                let ty = e.neuron_type.as_deref()?;
                Some((e.name.as_str(), NeuronType::from_name(ty)))
            })
            .collect()
    }

    /// Build the population set; names must be unique
    pub fn into_population_set(self) -> CliResult<PopulationSet> {
        let mut set = PopulationSet::new();

        for entry in self.input {
            let mut pop = InputPopulation::with_params(entry.name, entry.num_neurons, entry.params);
            pop.destinations = entry.destinations;
            set.add_input(pop);
        }

        for entry in self.nsat {
            let mut pop = NsatPopulation::new(entry.name, entry.num_neurons);
            for (field, value) in &entry.params {
                pop.set_by_name(field, field_value(field, value)?)?;
            }
            pop.destinations = entry.destinations;
            set.add_nsat(pop);
        }

        if let Some(name) = set.duplicate_names().first() {
            return Err(ParamsError::duplicate_population(*name).into());
        }

        for (source, target) in set.dangling_destinations() {
            warn!("Population '{}' projects to unknown population '{}'", source, target);
        }

        Ok(set)
    }
}

fn field_value(field: &str, value: &toml::Value) -> CliResult<f32> {
    match value {
        toml::Value::Float(v) => Ok(*v as f32),
        toml::Value::Integer(v) => Ok(*v as f32),
        toml::Value::Boolean(v) => Ok(if *v { 1.0 } else { 0.0 }),
        other => Err(CliError::invalid_args(format!(
            "field '{}' must be a number or boolean, got {}",
            field,
            other.type_str()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsat_params::{NsatField, Population};

    fn parse(text: &str) -> CliResult<PopulationSet> {
        let network: NetworkFile = toml::from_str(text)?;
        network.into_population_set()
    }

    #[test]
    fn test_build_population_set() {
        let set = parse(
            r#"
            [[nsat]]
            name = "excit"
            num_neurons = 100
            destinations = ["inhib"]
            params = { alpha = 0.5, is_set = true, dopamine_mode = 2 }

            [[nsat]]
            name = "inhib"
            num_neurons = 20

            [[input]]
            name = "input"
            num_neurons = 10
            destinations = ["excit", "inhib"]
            params = { rate = 5.0, on_gpu = true }
            "#,
        )
        .unwrap();

        let names: Vec<_> = set.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["input", "excit", "inhib"]);

        let excit = set.get_nsat("excit").unwrap();
        assert_eq!(excit.params.get(NsatField::Alpha), 0.5);
        assert!(excit.params.is_set);
        assert_eq!(excit.params.dopamine_mode, 2);

        let input = set.get_input("input").unwrap();
        assert!(input.params.on_gpu);
        assert_eq!(set.connections().len(), 3);
    }

    #[test]
    fn test_unknown_field() {
        let err = parse(
            r#"
            [[nsat]]
            name = "excit"
            num_neurons = 1
            params = { alpah = 0.5 }
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CliError::Params(ParamsError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_duplicate_names() {
        let err = parse(
            r#"
            [[nsat]]
            name = "a"
            num_neurons = 1

            [[input]]
            name = "a"
            num_neurons = 1
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CliError::Params(ParamsError::DuplicatePopulation { .. })
        ));
    }

    #[test]
    fn test_non_numeric_value() {
        let err = parse(
            r#"
            [[nsat]]
            name = "a"
            num_neurons = 1
            params = { alpha = "fast" }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgs(_)));
    }

    #[test]
    fn test_neuron_types() {
        let network: NetworkFile = toml::from_str(
            r#"
            [[nsat]]
            name = "a"
            num_neurons = 1
            neuron_type = "inhibitory_neuron"

            [[nsat]]
            name = "b"
            num_neurons = 1
            "#,
        )
        .unwrap();
        assert_eq!(
            network.neuron_types(),
            vec![("a", NeuronType::InhibitoryNeuron)]
        );
    }
}
