// src/physics/triple.rs
use crate::core::constants::triple_dot;
use crate::core::{ChargeConfiguration, QdotError};
use crate::physics::{Coupling, DeviceParameters, DotArray, PhysicsEngine};

/// Linear triple quantum dot with fixed coefficients.
///
/// Nearest neighbours couple with 0.25, the outer pair with 0.05; each dot
/// holds 0 to 2 electrons. This is the device the cross-talk calibrator is
/// normally pointed at.
#[derive(Debug, Clone, PartialEq)]
pub struct TripleDotPhysics {
    device: DotArray,
}

impl TripleDotPhysics {
    pub fn new() -> Self {
        let couplings = triple_dot::COUPLINGS
            .iter()
            .map(|&(first, second, energy)| Coupling::new(first, second, energy))
            .collect();
        let parameters = DeviceParameters::from_sampled(
            triple_dot::CHARGING_ENERGIES.to_vec(),
            couplings,
            triple_dot::LEVER_ARMS.to_vec(),
        );
        Self { device: DotArray::fixed(parameters, triple_dot::MAX_OCCUPATION) }
    }

    pub fn parameters(&self) -> &DeviceParameters {
        self.device.parameters()
    }

    pub fn device(&self) -> &DotArray {
        &self.device
    }

    /// Retunes one plunger's lever arm, e.g. to study how gate efficiency
    /// moves the calibrated transition voltages.
    pub fn set_lever_arm(&mut self, dot: usize, value: f64) -> Result<(), QdotError> {
        self.device.parameters_mut().set_lever_arm(dot, value)
    }
}

impl Default for TripleDotPhysics {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsEngine for TripleDotPhysics {
    fn num_dots(&self) -> usize {
        3
    }

    fn ground_state(&self, voltages: &[f64]) -> Result<ChargeConfiguration, QdotError> {
        self.device.ground_state(voltages)
    }
}
