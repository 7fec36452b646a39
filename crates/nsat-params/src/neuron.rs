//! NSAT neuron population records

use crate::{
    error::{ParamsError, Result},
    layout::{record_size, FieldReader, FieldWriter},
    network::Population,
};
use nsat_storage::ByteOrder;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::str::FromStr;

/// Size of an encoded NSAT record: 18 words, one flag, padded to 76 bytes
pub const NSAT_RECORD_SIZE: usize = record_size(18, 1);

/// Coefficients of an NSAT neuron population, in engine layout order
///
/// Nothing here is range checked; the engine takes whatever it is given.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NsatParams {
    /// Membrane decay rate
    pub alpha: f32,
    /// Input integration gain
    pub beta: f32,
    /// Noise amplitude
    pub sigma: f32,
    /// Spiking threshold
    pub v_th: f32,
    /// Reset voltage
    pub v_reset: f32,
    /// Bias current
    pub b: f32,
    /// Refractory period
    pub tau_ref: f32,
    /// Dopamine modulation mode
    pub dopamine_mode: i32,
    /// STDP potentiation amplitude
    #[cfg_attr(feature = "serde", serde(alias = "alphaPlus"))]
    pub alpha_plus: f32,
    /// STDP potentiation time constant
    #[cfg_attr(feature = "serde", serde(alias = "tauPlus"))]
    pub tau_plus: f32,
    /// STDP depression amplitude
    #[cfg_attr(feature = "serde", serde(alias = "alphaMinus"))]
    pub alpha_minus: f32,
    /// STDP depression time constant
    #[cfg_attr(feature = "serde", serde(alias = "tauMinus"))]
    pub tau_minus: f32,
    /// Long-term potentiation scale
    #[cfg_attr(feature = "serde", serde(alias = "betaLTP"))]
    pub beta_ltp: f32,
    /// Long-term depression scale
    #[cfg_attr(feature = "serde", serde(alias = "betaLTD"))]
    pub beta_ltd: f32,
    /// Learning-rule lambda
    pub lambda: f32,
    /// Learning-rule delta
    pub delta: f32,
    /// Learning-rule gamma
    pub gamma: f32,
    /// STDP curve selector
    pub stdp_fun_type: i32,
    /// Marks the record as populated
    pub is_set: bool,
}

/// Named field of [`NsatParams`]
///
/// Variants follow the record fields one to one.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NsatField {
    Alpha,
    Beta,
    Sigma,
    VTh,
    VReset,
    B,
    TauRef,
    DopamineMode,
    AlphaPlus,
    TauPlus,
    AlphaMinus,
    TauMinus,
    BetaLtp,
    BetaLtd,
    Lambda,
    Delta,
    Gamma,
    StdpFunType,
    IsSet,
}

impl NsatField {
    /// Every field, in layout order
    pub const ALL: [NsatField; 19] = [
        Self::Alpha,
        Self::Beta,
        Self::Sigma,
        Self::VTh,
        Self::VReset,
        Self::B,
        Self::TauRef,
        Self::DopamineMode,
        Self::AlphaPlus,
        Self::TauPlus,
        Self::AlphaMinus,
        Self::TauMinus,
        Self::BetaLtp,
        Self::BetaLtd,
        Self::Lambda,
        Self::Delta,
        Self::Gamma,
        Self::StdpFunType,
        Self::IsSet,
    ];

    /// Field name as spelled in the engine's struct
    pub const fn engine_name(self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Sigma => "sigma",
            Self::VTh => "v_th",
            Self::VReset => "v_reset",
            Self::B => "b",
            Self::TauRef => "tau_ref",
            Self::DopamineMode => "dopamine_mode",
            Self::AlphaPlus => "alphaPlus",
            Self::TauPlus => "tauPlus",
            Self::AlphaMinus => "alphaMinus",
            Self::TauMinus => "tauMinus",
            Self::BetaLtp => "betaLTP",
            Self::BetaLtd => "betaLTD",
            Self::Lambda => "lambda",
            Self::Delta => "delta",
            Self::Gamma => "gamma",
            Self::StdpFunType => "stdp_fun_type",
            Self::IsSet => "is_set",
        }
    }

    /// Byte offset of the field in an encoded record
    pub fn offset(self) -> usize {
        // Variants are declared in layout order and every field before
        // `is_set` is one word wide.
        self as usize * nsat_storage::WORD_SIZE
    }
}

impl FromStr for NsatField {
    type Err = ParamsError;

    /// Accepts the engine spelling (`alphaPlus`) and snake case (`alpha_plus`)
    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s.chars().filter(|c| *c != '_').collect::<String>().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.engine_name().replace('_', "").to_ascii_lowercase() == wanted)
            .ok_or_else(|| ParamsError::unknown_field(s, "nsat"))
    }
}

impl NsatParams {
    /// Assign a field by name
    ///
    /// Integer fields take `value` truncated toward zero; `is_set` takes
    /// `value != 0`.
    pub fn set(&mut self, field: NsatField, value: f32) {
        match field {
            NsatField::Alpha => self.alpha = value,
            NsatField::Beta => self.beta = value,
            NsatField::Sigma => self.sigma = value,
            NsatField::VTh => self.v_th = value,
            NsatField::VReset => self.v_reset = value,
            NsatField::B => self.b = value,
            NsatField::TauRef => self.tau_ref = value,
            NsatField::DopamineMode => self.dopamine_mode = value as i32,
            NsatField::AlphaPlus => self.alpha_plus = value,
            NsatField::TauPlus => self.tau_plus = value,
            NsatField::AlphaMinus => self.alpha_minus = value,
            NsatField::TauMinus => self.tau_minus = value,
            NsatField::BetaLtp => self.beta_ltp = value,
            NsatField::BetaLtd => self.beta_ltd = value,
            NsatField::Lambda => self.lambda = value,
            NsatField::Delta => self.delta = value,
            NsatField::Gamma => self.gamma = value,
            NsatField::StdpFunType => self.stdp_fun_type = value as i32,
            NsatField::IsSet => self.is_set = value != 0.0,
        }
    }

    /// Read a field by name as a float
    pub fn get(&self, field: NsatField) -> f32 {
        match field {
            NsatField::Alpha => self.alpha,
            NsatField::Beta => self.beta,
            NsatField::Sigma => self.sigma,
            NsatField::VTh => self.v_th,
            NsatField::VReset => self.v_reset,
            NsatField::B => self.b,
            NsatField::TauRef => self.tau_ref,
            NsatField::DopamineMode => self.dopamine_mode as f32,
            NsatField::AlphaPlus => self.alpha_plus,
            NsatField::TauPlus => self.tau_plus,
            NsatField::AlphaMinus => self.alpha_minus,
            NsatField::TauMinus => self.tau_minus,
            NsatField::BetaLtp => self.beta_ltp,
            NsatField::BetaLtd => self.beta_ltd,
            NsatField::Lambda => self.lambda,
            NsatField::Delta => self.delta,
            NsatField::Gamma => self.gamma,
            NsatField::StdpFunType => self.stdp_fun_type as f32,
            NsatField::IsSet => f32::from(u8::from(self.is_set)),
        }
    }

    /// Encode into the engine's NSAT struct layout
    pub fn encode(&self, order: ByteOrder) -> [u8; NSAT_RECORD_SIZE] {
        let mut buf = [0u8; NSAT_RECORD_SIZE];
        FieldWriter::new(&mut buf, order)
            .f32(self.alpha)
            .f32(self.beta)
            .f32(self.sigma)
            .f32(self.v_th)
            .f32(self.v_reset)
            .f32(self.b)
            .f32(self.tau_ref)
            .i32(self.dopamine_mode)
            .f32(self.alpha_plus)
            .f32(self.tau_plus)
            .f32(self.alpha_minus)
            .f32(self.tau_minus)
            .f32(self.beta_ltp)
            .f32(self.beta_ltd)
            .f32(self.lambda)
            .f32(self.delta)
            .f32(self.gamma)
            .i32(self.stdp_fun_type)
            .flag(self.is_set);
        buf
    }

    /// Decode an encoded NSAT record
    pub fn decode(data: &[u8], order: ByteOrder) -> Result<Self> {
        let mut r = FieldReader::new(data, NSAT_RECORD_SIZE, "NSAT", order)?;
        Ok(Self {
            alpha: r.f32()?,
            beta: r.f32()?,
            sigma: r.f32()?,
            v_th: r.f32()?,
            v_reset: r.f32()?,
            b: r.f32()?,
            tau_ref: r.f32()?,
            dopamine_mode: r.i32()?,
            alpha_plus: r.f32()?,
            tau_plus: r.f32()?,
            alpha_minus: r.f32()?,
            tau_minus: r.f32()?,
            beta_ltp: r.f32()?,
            beta_ltd: r.f32()?,
            lambda: r.f32()?,
            delta: r.f32()?,
            gamma: r.f32()?,
            stdp_fun_type: r.i32()?,
            is_set: r.flag()?,
        })
    }
}

/// A population of NSAT neurons
#[derive(Debug, Clone, PartialEq)]
pub struct NsatPopulation {
    /// Population name, referenced by other populations' destinations
    pub name: String,
    /// Number of neurons
    pub num_neurons: usize,
    /// Simulation coefficients
    pub params: NsatParams,
    /// Populations this one projects to, in connection order
    pub destinations: Vec<String>,
    buffer: [u8; NSAT_RECORD_SIZE],
}

impl NsatPopulation {
    /// Create a population with every coefficient zeroed
    pub fn new(name: impl Into<String>, num_neurons: usize) -> Self {
        Self {
            name: name.into(),
            num_neurons,
            params: NsatParams::default(),
            destinations: Vec::new(),
            buffer: [0; NSAT_RECORD_SIZE],
        }
    }

    /// Create a population with the given coefficients
    pub fn with_params(name: impl Into<String>, num_neurons: usize, params: NsatParams) -> Self {
        Self {
            params,
            ..Self::new(name, num_neurons)
        }
    }

    /// Assign a coefficient by name
    pub fn set(&mut self, field: NsatField, value: f32) -> &mut Self {
        self.params.set(field, value);
        self
    }

    /// Parse a field name and assign it
    pub fn set_by_name(&mut self, field: &str, value: f32) -> Result<&mut Self> {
        let field = field.parse::<NsatField>()?;
        Ok(self.set(field, value))
    }

    /// Coefficients as last pushed
    pub fn pushed_params(&self, order: ByteOrder) -> Result<NsatParams> {
        NsatParams::decode(&self.buffer, order)
    }
}

impl Population for NsatPopulation {
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
        log::debug!("pushed NSAT population '{}'", self.name);
    }

    fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    fn record_kind(&self) -> &'static str {
        "nsat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsat_storage::WORD_SIZE;

    fn f32_at(buf: &[u8], offset: usize) -> f32 {
        f32::from_le_bytes(buf[offset..offset + WORD_SIZE].try_into().unwrap())
    }

    #[test]
    fn test_new_population_is_zeroed() {
        let pop = NsatPopulation::new("excit1", 100);
        assert_eq!(pop.name, "excit1");
        assert_eq!(pop.num_neurons, 100);
        assert_eq!(pop.params, NsatParams::default());
        assert!(pop.destinations.is_empty());
        assert!(pop.buffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_push_places_values_at_offsets() {
        let mut pop = NsatPopulation::new("excit1", 100);
        pop.params.alpha = 1.5;
        pop.params.v_th = -50.0;
        pop.params.lambda = 0.25;
        pop.params.stdp_fun_type = 2;
        pop.params.is_set = true;
        pop.push();

        let buf = pop.buffer();
        assert_eq!(buf.len(), 76);
        assert_eq!(f32_at(buf, 0), 1.5);
        assert_eq!(f32_at(buf, 12), -50.0);
        assert_eq!(f32_at(buf, 56), 0.25);
        assert_eq!(i32::from_le_bytes(buf[68..72].try_into().unwrap()), 2);
        assert_eq!(buf[72], 1);
        assert_eq!(&buf[73..], &[0, 0, 0]);
    }

    #[test]
    fn test_push_is_idempotent_and_last_value_wins() {
        let mut pop = NsatPopulation::new("excit2", 10);
        pop.params.alpha = 45.0;
        pop.push();
        let first = pop.buffer().to_vec();
        pop.push();
        assert_eq!(pop.buffer(), &first[..]);

        pop.params.alpha = 2.0;
        // Not visible until the next push.
        assert_eq!(f32_at(pop.buffer(), 0), 45.0);
        pop.push();
        assert_eq!(f32_at(pop.buffer(), 0), 2.0);
        assert_eq!(pop.params.alpha, 2.0);
    }

    #[test]
    fn test_encode_decode() {
        let mut params = NsatParams::default();
        for (i, field) in NsatField::ALL.iter().enumerate() {
            params.set(*field, i as f32 + 0.5);
        }
        for order in [ByteOrder::Little, ByteOrder::Big] {
            let bytes = params.encode(order);
            assert_eq!(NsatParams::decode(&bytes, order).unwrap(), params);
        }
        assert!(NsatParams::decode(&[0u8; 73], ByteOrder::Little).is_err());
    }

    #[test]
    fn test_field_names() {
        assert_eq!("alphaPlus".parse::<NsatField>().unwrap(), NsatField::AlphaPlus);
        assert_eq!("alpha_plus".parse::<NsatField>().unwrap(), NsatField::AlphaPlus);
        assert_eq!("betaLTD".parse::<NsatField>().unwrap(), NsatField::BetaLtd);
        assert_eq!("V_TH".parse::<NsatField>().unwrap(), NsatField::VTh);
        assert!(matches!(
            "l".parse::<NsatField>(),
            Err(ParamsError::UnknownField { .. })
        ));

        assert_eq!(NsatField::Lambda.offset(), 56);
        assert_eq!(NsatField::IsSet.offset(), 72);
    }

    #[test]
    fn test_set_accepts_any_value() {
        let mut pop = NsatPopulation::new("p", 1);
        pop.set(NsatField::TauRef, -1e30)
            .set(NsatField::DopamineMode, 3.9)
            .set(NsatField::IsSet, 1.0);
        pop.set_by_name("sigma", f32::NAN).unwrap();

        assert_eq!(pop.params.tau_ref, -1e30);
        assert_eq!(pop.params.dopamine_mode, 3);
        assert!(pop.params.is_set);
        assert!(pop.params.sigma.is_nan());
        assert_eq!(pop.params.get(NsatField::DopamineMode), 3.0);
        assert!(pop.set_by_name("nope", 1.0).is_err());
    }

    #[test]
    fn test_pushed_params() {
        let mut pop = NsatPopulation::new("p", 1);
        pop.params.gamma = 0.75;
        pop.push_with(ByteOrder::Big);
        assert_eq!(pop.pushed_params(ByteOrder::Big).unwrap().gamma, 0.75);
    }
}
