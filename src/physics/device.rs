// src/physics/device.rs
use crate::core::{ChargeConfiguration, QdotError, StateSpace};
use crate::physics::PhysicsEngine;
use std::fmt;

/// Capacitive coupling between two dots, entering the energy as
/// `energy * (c_a - n_a) * (c_b - n_b)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coupling {
    pub first: usize,
    pub second: usize,
    pub energy: f64,
}

impl Coupling {
    pub fn new(first: usize, second: usize, energy: f64) -> Self {
        Self { first, second, energy }
    }
}

/// Constant-interaction coefficients of a dot array.
///
/// Charging energies and lever arms are strictly positive for every
/// instance; the constructor and setters refuse anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceParameters {
    charging_energies: Vec<f64>,
    couplings: Vec<Coupling>,
    lever_arms: Vec<f64>,
}

impl DeviceParameters {
    /// Validates and builds a parameter set.
    ///
    /// # Returns
    /// * `Err(QdotError::InvalidArgument)` if there are no dots, the per-dot
    ///   lists differ in length, a coupling names an unknown dot or couples a
    ///   dot to itself, or any coefficient is non-finite / non-positive where
    ///   positivity is required.
    pub fn new(
        charging_energies: Vec<f64>,
        couplings: Vec<Coupling>,
        lever_arms: Vec<f64>,
    ) -> Result<Self, QdotError> {
        let num_dots = charging_energies.len();
        if num_dots == 0 {
            return Err(QdotError::invalid_argument("a device needs at least one dot"));
        }
        if lever_arms.len() != num_dots {
            return Err(QdotError::invalid_argument(format!(
                "{} charging energies but {} lever arms",
                num_dots,
                lever_arms.len()
            )));
        }
        for (dot, &e_c) in charging_energies.iter().enumerate() {
            check_positive("charging energy", dot, e_c)?;
        }
        for (dot, &alpha) in lever_arms.iter().enumerate() {
            check_positive("lever arm", dot, alpha)?;
        }
        for coupling in &couplings {
            if coupling.first >= num_dots || coupling.second >= num_dots || coupling.first == coupling.second {
                return Err(QdotError::invalid_argument(format!(
                    "coupling ({}, {}) is not a pair of distinct dots in a {}-dot device",
                    coupling.first, coupling.second, num_dots
                )));
            }
            if !coupling.energy.is_finite() {
                return Err(QdotError::invalid_argument(format!(
                    "coupling ({}, {}) energy must be finite",
                    coupling.first, coupling.second
                )));
            }
        }

        Ok(Self { charging_energies, couplings, lever_arms })
    }

    /// Builds a parameter set from values drawn out of already validated
    /// ranges (see `DeviceRanges::new`), skipping the checks in `new`.
    pub(crate) fn from_sampled(charging_energies: Vec<f64>, couplings: Vec<Coupling>, lever_arms: Vec<f64>) -> Self {
        Self { charging_energies, couplings, lever_arms }
    }

    pub fn num_dots(&self) -> usize {
        self.charging_energies.len()
    }

    pub fn charging_energies(&self) -> &[f64] {
        &self.charging_energies
    }

    pub fn couplings(&self) -> &[Coupling] {
        &self.couplings
    }

    pub fn lever_arms(&self) -> &[f64] {
        &self.lever_arms
    }

    /// Replaces one dot's lever arm, keeping the positivity invariant.
    pub fn set_lever_arm(&mut self, dot: usize, value: f64) -> Result<(), QdotError> {
        if dot >= self.num_dots() {
            return Err(QdotError::invalid_argument(format!(
                "dot {} does not exist in a {}-dot device",
                dot,
                self.num_dots()
            )));
        }
        check_positive("lever arm", dot, value)?;
        self.lever_arms[dot] = value;
        Ok(())
    }

    /// Gate-induced charge offsets `n_g[i] = voltage[i] * lever_arm[i]`.
    pub fn gate_offsets(&self, voltages: &[f64]) -> Result<Vec<f64>, QdotError> {
        if voltages.len() != self.num_dots() {
            return Err(QdotError::DimensionMismatch { expected: self.num_dots(), found: voltages.len() });
        }
        Ok(voltages.iter().zip(&self.lever_arms).map(|(v, alpha)| v * alpha).collect())
    }

    /// Electrostatic energy of `config` given precomputed gate offsets.
    ///
    /// Callers must pass a configuration and offsets of length `num_dots()`.
    pub(crate) fn energy_at_offsets(&self, config: &ChargeConfiguration, offsets: &[f64]) -> f64 {
        let deviation = |dot: usize| f64::from(config.occupations()[dot]) - offsets[dot];

        let self_energy: f64 = self
            .charging_energies
            .iter()
            .enumerate()
            .map(|(dot, e_c)| {
                let d = deviation(dot);
                e_c * d * d
            })
            .sum();
        let mutual_energy: f64 = self
            .couplings
            .iter()
            .map(|c| c.energy * deviation(c.first) * deviation(c.second))
            .sum();

        self_energy + mutual_energy
    }
}

fn check_positive(what: &str, dot: usize, value: f64) -> Result<(), QdotError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(QdotError::invalid_argument(format!(
            "{} of dot {} must be finite and strictly positive, got {}",
            what, dot, value
        )))
    }
}

impl fmt::Display for DeviceParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E_c={:.3?} alpha={:.4?}", self.charging_energies, self.lever_arms)?;
        for c in &self.couplings {
            write!(f, " E_m[{},{}]={:.3}", c.first, c.second, c.energy)?;
        }
        Ok(())
    }
}

/// A dot array under the constant-interaction model: device parameters plus
/// the enumerated set of configurations the solver searches.
#[derive(Debug, Clone, PartialEq)]
pub struct DotArray {
    parameters: DeviceParameters,
    states: StateSpace,
}

impl DotArray {
    /// Builds an array whose dots each hold `0..=max_occupation` electrons.
    ///
    /// # Returns
    /// * `Err(QdotError::InvalidArgument)` if the resulting state space is
    ///   larger than the solver's configuration limit.
    pub fn new(parameters: DeviceParameters, max_occupation: u32) -> Result<Self, QdotError> {
        let states = StateSpace::enumerate(parameters.num_dots(), max_occupation)?;
        Ok(Self { parameters, states })
    }

    /// Array for the built-in double and triple dots, whose sizes are constants.
    pub(crate) fn fixed(parameters: DeviceParameters, max_occupation: u32) -> Self {
        let states = StateSpace::enumerate_fixed(parameters.num_dots(), max_occupation);
        Self { parameters, states }
    }

    pub fn parameters(&self) -> &DeviceParameters {
        &self.parameters
    }

    pub fn states(&self) -> &StateSpace {
        &self.states
    }

    /// Mutable access to the parameters. The state space only depends on the
    /// dot count, which the parameter setters cannot change.
    pub(crate) fn parameters_mut(&mut self) -> &mut DeviceParameters {
        &mut self.parameters
    }

    /// Energy of an arbitrary configuration at the given voltages.
    pub fn energy(&self, config: &ChargeConfiguration, voltages: &[f64]) -> Result<f64, QdotError> {
        if config.num_dots() != self.num_dots() {
            return Err(QdotError::DimensionMismatch { expected: self.num_dots(), found: config.num_dots() });
        }
        let offsets = self.parameters.gate_offsets(voltages)?;
        Ok(self.parameters.energy_at_offsets(config, &offsets))
    }
}

impl PhysicsEngine for DotArray {
    fn num_dots(&self) -> usize {
        self.parameters.num_dots()
    }

    /// Exhaustive minimisation over the state space. A strict `<` keeps the
    /// earliest configuration on exact ties.
    ///
    /// NaN energies (from NaN or infinite voltages) never win against a
    /// number; if every energy is NaN the first configuration is returned.
    fn ground_state(&self, voltages: &[f64]) -> Result<ChargeConfiguration, QdotError> {
        let offsets = self.parameters.gate_offsets(voltages)?;

        let mut configs = self.states.iter();
        let mut best = configs
            .next()
            .ok_or_else(|| QdotError::invalid_argument("device has an empty state space"))?;
        let mut lowest = self.parameters.energy_at_offsets(best, &offsets);

        for config in configs {
            let energy = self.parameters.energy_at_offsets(config, &offsets);
            if energy < lowest || (lowest.is_nan() && !energy.is_nan()) {
                best = config;
                lowest = energy;
            }
        }

        Ok(best.clone())
    }
}
