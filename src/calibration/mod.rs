// src/calibration/mod.rs

//! Automated cross-talk calibration.
//!
//! Every plunger gate couples capacitively to every dot, not just its own.
//! The calibrator measures that coupling the way an experimentalist would:
//! sweep one gate, watch one dot's occupation, and note where the first
//! electron loads. A transition close to 0 V means a strong lever; the
//! reciprocal of the transition voltage is used as the sensitivity. Rows are
//! normalised so each dot's own plunger has sensitivity 1, and the inverse
//! of the result defines the virtual gates.

mod matrix;

pub use matrix::{CrossTalkMatrix, VirtualGates};

use crate::core::constants::calibration as defaults;
use crate::core::QdotError;
use crate::physics::PhysicsEngine;
use crate::signal::{find_peaks, gradient, linspace};
use nalgebra::DMatrix;

/// Sweep and detection settings of the calibrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationConfig {
    /// First voltage of each sweep.
    pub sweep_start: f64,
    /// Last voltage of each sweep, inclusive.
    pub sweep_end: f64,
    /// Number of evenly spaced samples per sweep.
    pub sweep_samples: usize,
    /// Minimum derivative value counted as a charge transition.
    pub peak_height: f64,
    /// Sensitivity stored when a sweep has no usable transition.
    ///
    /// This is an approximation standing in for "negligible cross-talk",
    /// not a measured quantity.
    pub no_transition_sensitivity: f64,
}

impl CalibrationConfig {
    fn validate(&self) -> Result<(), QdotError> {
        if !self.sweep_start.is_finite() || !self.sweep_end.is_finite() {
            return Err(QdotError::invalid_argument(format!(
                "sweep range [{}, {}] must be finite",
                self.sweep_start, self.sweep_end
            )));
        }
        if self.sweep_samples < 2 {
            return Err(QdotError::invalid_argument(format!(
                "a sweep needs at least 2 samples, got {}",
                self.sweep_samples
            )));
        }
        if !self.peak_height.is_finite() {
            return Err(QdotError::invalid_argument("peak height threshold must be finite"));
        }
        if !self.no_transition_sensitivity.is_finite() || self.no_transition_sensitivity <= 0.0 {
            return Err(QdotError::invalid_argument(format!(
                "fallback sensitivity must be finite and positive, got {}",
                self.no_transition_sensitivity
            )));
        }
        Ok(())
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            sweep_start: defaults::SWEEP_START,
            sweep_end: defaults::SWEEP_END,
            sweep_samples: defaults::SWEEP_SAMPLES,
            peak_height: defaults::PEAK_HEIGHT,
            no_transition_sensitivity: defaults::NO_TRANSITION_SENSITIVITY,
        }
    }
}

/// Measures the cross-talk matrix of a device by 1D gate sweeps.
///
/// Borrows the device immutably: calibration observes a frozen snapshot of
/// the device and never changes it.
pub struct CrossTalkCalibrator<'a, P: PhysicsEngine + ?Sized> {
    physics: &'a P,
    config: CalibrationConfig,
}

impl<'a, P: PhysicsEngine + ?Sized> CrossTalkCalibrator<'a, P> {
    /// Calibrator with the default sweep (-20 V to 20 V, 200 samples, peak height 0.5).
    pub fn new(physics: &'a P) -> Self {
        Self { physics, config: CalibrationConfig::default() }
    }

    /// # Returns
    /// * `Err(QdotError::InvalidArgument)` if the configuration cannot produce a sweep.
    pub fn with_config(physics: &'a P, config: CalibrationConfig) -> Result<Self, QdotError> {
        config.validate()?;
        Ok(Self { physics, config })
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Voltages visited by every sweep.
    pub fn sweep_voltages(&self) -> Vec<f64> {
        linspace(self.config.sweep_start, self.config.sweep_end, self.config.sweep_samples)
    }

    /// Occupation of `dot` at each sweep voltage of `gate`, all other gates at 0 V.
    pub fn sweep(&self, dot: usize, gate: usize) -> Result<Vec<f64>, QdotError> {
        let n = self.physics.num_dots();
        if dot >= n || gate >= n {
            return Err(QdotError::invalid_argument(format!(
                "dot {} / gate {} out of range for a {}-dot device",
                dot, gate, n
            )));
        }

        let mut voltages = vec![0.0; n];
        self.sweep_voltages()
            .into_iter()
            .map(|v| {
                voltages[gate] = v;
                let state = self.physics.ground_state(&voltages)?;
                Ok(f64::from(state.occupations()[dot]))
            })
            .collect()
    }

    /// Voltage of the first charge transition seen on `dot` while sweeping `gate`.
    ///
    /// # Returns
    /// * `Err(QdotError::DegenerateCalibration)` when the occupation derivative
    ///   has no peak above the threshold, or the first peak sits at exactly 0 V.
    pub fn first_transition_voltage(&self, dot: usize, gate: usize) -> Result<f64, QdotError> {
        let readings = self.sweep(dot, gate)?;
        let peaks = find_peaks(&gradient(&readings), self.config.peak_height);

        match peaks.first() {
            Some(&index) => {
                let voltage = self.sweep_voltages()[index];
                if voltage == 0.0 {
                    Err(QdotError::DegenerateCalibration { dot, gate })
                } else {
                    Ok(voltage)
                }
            }
            None => Err(QdotError::DegenerateCalibration { dot, gate }),
        }
    }

    /// Raw (un-normalised) sensitivity of `dot` to `gate`: `1 / |V_transition|`,
    /// or the fallback sensitivity for a sweep without a transition.
    pub fn sensitivity(&self, dot: usize, gate: usize) -> Result<f64, QdotError> {
        match self.first_transition_voltage(dot, gate) {
            Ok(voltage) => Ok(1.0 / voltage.abs()),
            Err(QdotError::DegenerateCalibration { .. }) => {
                log::debug!(
                    "No transition on dot {} sweeping gate {}; using fallback sensitivity {}",
                    dot, gate, self.config.no_transition_sensitivity
                );
                Ok(self.config.no_transition_sensitivity)
            }
            Err(e) => Err(e),
        }
    }

    /// Sweeps every (dot, gate) pair and returns the row-normalised cross-talk
    /// matrix. Its diagonal is exactly 1.
    pub fn discover_matrix(&self) -> Result<CrossTalkMatrix, QdotError> {
        let n = self.physics.num_dots();
        log::info!(
            "Commencing automated cross-talk calibration: {} dots, sweep [{}, {}] V in {} samples",
            n, self.config.sweep_start, self.config.sweep_end, self.config.sweep_samples
        );

        let mut raw = DMatrix::zeros(n, n);
        for dot in 0..n {
            for gate in 0..n {
                let s = self.sensitivity(dot, gate)?;
                log::debug!("Raw sensitivity of dot {} to gate {}: {:.5}", dot, gate, s);
                raw[(dot, gate)] = s;
            }
        }

        let matrix = CrossTalkMatrix::from_sensitivities(raw)?;
        log::info!("Discovered virtual gate matrix M:\n{}", matrix);
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::TripleDotPhysics;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_own_gate_transition_near_ten_volts() -> Result<(), QdotError> {
        // alpha = 0.05: first electron loads once n_g passes 0.5, i.e. V > 10.
        let physics = TripleDotPhysics::new();
        let calibrator = CrossTalkCalibrator::new(&physics);
        let v = calibrator.first_transition_voltage(0, 0)?;
        assert_abs_diff_eq!(v, 10.0, epsilon = 0.25);
        assert!(v < 10.0, "The plateau midpoint sits on the last empty sample");
        Ok(())
    }

    #[test]
    fn test_no_transition_is_degenerate() {
        let physics = TripleDotPhysics::new();
        let calibrator = CrossTalkCalibrator::new(&physics);
        // Dot 0 never loads from gate 2 within +-20 V.
        assert_eq!(
            calibrator.first_transition_voltage(0, 2),
            Err(QdotError::DegenerateCalibration { dot: 0, gate: 2 })
        );
        assert_eq!(calibrator.sensitivity(0, 2), Ok(defaults::NO_TRANSITION_SENSITIVITY));
    }

    #[test]
    fn test_sweep_rejects_unknown_indices() {
        let physics = TripleDotPhysics::new();
        let calibrator = CrossTalkCalibrator::new(&physics);
        assert!(matches!(calibrator.sweep(3, 0), Err(QdotError::InvalidArgument { .. })));
        assert!(matches!(calibrator.sweep(0, 3), Err(QdotError::InvalidArgument { .. })));
    }

    #[test]
    fn test_sweep_is_monotone_staircase() -> Result<(), QdotError> {
        let physics = TripleDotPhysics::new();
        let trace = CrossTalkCalibrator::new(&physics).sweep(1, 1)?;
        assert_eq!(trace.len(), 200);
        assert_eq!(trace[0], 0.0);
        assert_eq!(trace[199], 1.0);
        assert!(trace.windows(2).all(|w| w[0] <= w[1]));
        Ok(())
    }

    #[test]
    fn test_config_validation() {
        let physics = TripleDotPhysics::new();
        let one_sample = CalibrationConfig { sweep_samples: 1, ..CalibrationConfig::default() };
        let zero_fallback = CalibrationConfig { no_transition_sensitivity: 0.0, ..CalibrationConfig::default() };
        assert!(CrossTalkCalibrator::with_config(&physics, one_sample).is_err());
        assert!(CrossTalkCalibrator::with_config(&physics, zero_fallback).is_err());
    }

    #[test]
    fn test_transition_at_zero_volts_is_degenerate() -> Result<(), QdotError> {
        let mut physics = TripleDotPhysics::new();
        physics.set_lever_arm(0, 0.3)?;
        let config = CalibrationConfig { sweep_start: -4.0, sweep_end: 4.0, sweep_samples: 5, ..CalibrationConfig::default() };
        let calibrator = CrossTalkCalibrator::with_config(&physics, config)?;
        // Samples -4, -2, 0, 2, 4 V: the electron loads between 0 V and 2 V,
        // so the derivative plateau starts on the 0 V sample.
        assert_eq!(calibrator.sweep(0, 0)?, vec![0.0, 0.0, 0.0, 1.0, 1.0]);
        assert_eq!(
            calibrator.first_transition_voltage(0, 0),
            Err(QdotError::DegenerateCalibration { dot: 0, gate: 0 })
        );
        Ok(())
    }

    #[test]
    fn test_rising_edge_at_sweep_end_is_not_a_peak() -> Result<(), QdotError> {
        let mut physics = TripleDotPhysics::new();
        physics.set_lever_arm(0, 0.25)?;
        let config = CalibrationConfig { sweep_start: -4.0, sweep_end: 4.0, sweep_samples: 5, ..CalibrationConfig::default() };
        let calibrator = CrossTalkCalibrator::with_config(&physics, config)?;
        // n_g reaches exactly 0.5 at 2 V, where the empty dot wins the tie.
        assert_eq!(calibrator.sweep(0, 0)?, vec![0.0, 0.0, 0.0, 0.0, 1.0]);
        assert!(calibrator.first_transition_voltage(0, 0).is_err());
        Ok(())
    }
}
