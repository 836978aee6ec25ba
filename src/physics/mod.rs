// src/physics/mod.rs

//! Constant-interaction electrostatics of gate-defined quantum-dot arrays.
//!
//! Every device model answers one question: which electron configuration
//! minimises the capacitive energy at a given set of plunger-gate voltages.
//! Models implement [`PhysicsEngine`], which is all the scan simulator and the
//! cross-talk calibrator need.

pub mod device;
pub mod randomized;
pub mod scan;
pub mod triple;

pub use device::{Coupling, DeviceParameters, DotArray};
pub use randomized::{DeviceRanges, RandomizedPhysics};
pub use scan::{simulate_sensor_scan, ScanConfig, ScanImage, SensorNoiseModel};
pub use triple::TripleDotPhysics;

use crate::core::{ChargeConfiguration, QdotError};

/// A device whose ground-state occupation can be queried at arbitrary voltages.
pub trait PhysicsEngine {
    /// Number of dots, and therefore the expected voltage vector length.
    fn num_dots(&self) -> usize;

    /// Occupation configuration minimising the electrostatic energy.
    ///
    /// Pure: identical voltages always give identical configurations.
    /// Voltages outside the nominal operating window are accepted and
    /// extrapolated; occupations saturate at the enumerated maximum.
    ///
    /// # Returns
    /// * `Err(QdotError::DimensionMismatch)` if `voltages.len() != self.num_dots()`.
    fn ground_state(&self, voltages: &[f64]) -> Result<ChargeConfiguration, QdotError>;
}
