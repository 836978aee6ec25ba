// src/physics/randomized.rs

//! Double quantum dot with domain randomization.
//!
//! Real devices differ from one cooldown to the next. Resampling the
//! capacitive coefficients at the start of every episode keeps anything
//! trained on this model from overfitting to a single device.

use crate::core::constants::device_ranges;
use crate::core::{ChargeConfiguration, QdotError};
use crate::physics::scan::{self, ScanConfig, ScanImage};
use crate::physics::{Coupling, DeviceParameters, DotArray, PhysicsEngine};
use rand::Rng;

/// Closed sampling intervals for the randomized double dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceRanges {
    charging_energy: (f64, f64),
    mutual_coupling: (f64, f64),
    lever_arm: (f64, f64),
}

impl DeviceRanges {
    /// # Returns
    /// * `Err(QdotError::InvalidArgument)` if an interval is reversed or not
    ///   finite, or if the charging-energy / lever-arm intervals reach zero.
    pub fn new(
        charging_energy: (f64, f64),
        mutual_coupling: (f64, f64),
        lever_arm: (f64, f64),
    ) -> Result<Self, QdotError> {
        check_interval("charging energy", charging_energy, true)?;
        check_interval("mutual coupling", mutual_coupling, false)?;
        check_interval("lever arm", lever_arm, true)?;
        Ok(Self { charging_energy, mutual_coupling, lever_arm })
    }

    pub fn charging_energy(&self) -> (f64, f64) {
        self.charging_energy
    }

    pub fn mutual_coupling(&self) -> (f64, f64) {
        self.mutual_coupling
    }

    pub fn lever_arm(&self) -> (f64, f64) {
        self.lever_arm
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DeviceParameters {
        let e_c1 = uniform(rng, self.charging_energy);
        let e_c2 = uniform(rng, self.charging_energy);
        let e_m = uniform(rng, self.mutual_coupling);
        let alpha_1 = uniform(rng, self.lever_arm);
        let alpha_2 = uniform(rng, self.lever_arm);

        DeviceParameters::from_sampled(vec![e_c1, e_c2], vec![Coupling::new(0, 1, e_m)], vec![alpha_1, alpha_2])
    }
}

impl Default for DeviceRanges {
    fn default() -> Self {
        Self {
            charging_energy: device_ranges::CHARGING_ENERGY,
            mutual_coupling: device_ranges::MUTUAL_COUPLING,
            lever_arm: device_ranges::LEVER_ARM,
        }
    }
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, (low, high): (f64, f64)) -> f64 {
    rng.random_range(low..=high)
}

fn check_interval(what: &str, (low, high): (f64, f64), strictly_positive: bool) -> Result<(), QdotError> {
    if !low.is_finite() || !high.is_finite() || low > high {
        return Err(QdotError::invalid_argument(format!(
            "{} range [{}, {}] is not a finite, ordered interval",
            what, low, high
        )));
    }
    if strictly_positive && low <= 0.0 {
        return Err(QdotError::invalid_argument(format!(
            "{} range must lie strictly above zero, got lower bound {}",
            what, low
        )));
    }
    Ok(())
}

/// Double-dot physics engine whose device is redrawn by [`randomize_device`].
///
/// Each dot holds 0 to 3 electrons.
///
/// [`randomize_device`]: RandomizedPhysics::randomize_device
#[derive(Debug, Clone, PartialEq)]
pub struct RandomizedPhysics {
    ranges: DeviceRanges,
    device: DotArray,
}

impl RandomizedPhysics {
    /// Creates an engine with the default ranges and an immediately sampled device.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_ranges(DeviceRanges::default(), rng)
    }

    /// Creates an engine sampling from custom ranges.
    pub fn with_ranges<R: Rng + ?Sized>(ranges: DeviceRanges, rng: &mut R) -> Self {
        let device = DotArray::fixed(ranges.sample(rng), device_ranges::MAX_OCCUPATION);
        Self { ranges, device }
    }

    /// Creates an engine pinned to known parameters (until the next
    /// `randomize_device`), for reproducing a specific device.
    ///
    /// # Returns
    /// * `Err(QdotError::InvalidArgument)` if `parameters` does not describe two dots.
    pub fn with_parameters(parameters: DeviceParameters) -> Result<Self, QdotError> {
        if parameters.num_dots() != 2 {
            return Err(QdotError::invalid_argument(format!(
                "the randomized model is a double dot, got {} dots",
                parameters.num_dots()
            )));
        }
        Ok(Self {
            ranges: DeviceRanges::default(),
            device: DotArray::fixed(parameters, device_ranges::MAX_OCCUPATION),
        })
    }

    /// Draws a fresh device: every charging energy, the mutual coupling and
    /// both lever arms are resampled independently and uniformly, and the
    /// state space is regenerated. Call at every episode reset.
    pub fn randomize_device<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.device = DotArray::fixed(self.ranges.sample(rng), device_ranges::MAX_OCCUPATION);
        log::debug!("Randomized double-dot device: {}", self.device.parameters());
    }

    pub fn parameters(&self) -> &DeviceParameters {
        self.device.parameters()
    }

    pub fn ranges(&self) -> &DeviceRanges {
        &self.ranges
    }

    /// The underlying array, e.g. for energy queries.
    pub fn device(&self) -> &DotArray {
        &self.device
    }

    /// Charge-sensor scan with the default 10 V window and 16x16 pixels.
    pub fn simulate_sensor_scan<R: Rng + ?Sized>(
        &self,
        center_v1: f64,
        center_v2: f64,
        noise_level: f64,
        rng: &mut R,
    ) -> Result<ScanImage, QdotError> {
        scan::simulate_sensor_scan(self, center_v1, center_v2, noise_level, &ScanConfig::default(), rng)
    }
}

impl PhysicsEngine for RandomizedPhysics {
    fn num_dots(&self) -> usize {
        self.device.num_dots()
    }

    fn ground_state(&self, voltages: &[f64]) -> Result<ChargeConfiguration, QdotError> {
        self.device.ground_state(voltages)
    }
}
