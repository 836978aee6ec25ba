//! Physical and numerical constants used by the device models and the calibrator.

/// Limits of the brute-force ground-state solver.
pub mod solver {
    /// Largest state space a device may enumerate. Every ground-state query
    /// visits each configuration once.
    pub const MAX_STATE_SPACE: usize = 1 << 20;
}

/// Parameter ranges for the randomized double-dot device (energies in meV-like
/// units, lever arms dimensionless).
pub mod device_ranges {
    /// Charging energy range, sampled per dot.
    pub const CHARGING_ENERGY: (f64, f64) = (0.8, 1.2);
    /// Mutual coupling energy range.
    pub const MUTUAL_COUPLING: (f64, f64) = (0.1, 0.4);
    /// Gate lever arm range, sampled per dot.
    pub const LEVER_ARM: (f64, f64) = (0.03, 0.08);
    /// Highest occupation enumerated on each dot of the double dot.
    pub const MAX_OCCUPATION: u32 = 3;
}

/// Fixed coefficients of the triple-dot device.
pub mod triple_dot {
    /// Charging energy of every dot.
    pub const CHARGING_ENERGIES: [f64; 3] = [1.0, 1.0, 1.0];
    /// Couplings as (dot a, dot b, energy): two nearest-neighbour pairs and
    /// the weaker outer pair.
    pub const COUPLINGS: [(usize, usize, f64); 3] = [(0, 1, 0.25), (1, 2, 0.25), (0, 2, 0.05)];
    /// Lever arm of every plunger gate.
    pub const LEVER_ARMS: [f64; 3] = [0.05, 0.05, 0.05];
    /// Highest occupation enumerated on each dot.
    pub const MAX_OCCUPATION: u32 = 2;
}

/// Defaults of the charge-sensor scan.
pub mod scan {
    /// Voltage span of each scan axis.
    pub const WINDOW: f64 = 10.0;
    /// Pixels per scan axis.
    pub const RESOLUTION: usize = 16;
    /// Noise level at zero integration time.
    pub const NOISE_AT_ZERO_INTEGRATION: f64 = 0.6;
    /// Noise reduction per unit of integration time.
    pub const NOISE_REDUCTION_PER_INTEGRATION: f64 = 0.55;
}

/// Defaults of the cross-talk calibration sweep.
pub mod calibration {
    /// First voltage of every sweep.
    pub const SWEEP_START: f64 = -20.0;
    /// Last voltage of every sweep (inclusive).
    pub const SWEEP_END: f64 = 20.0;
    /// Samples per sweep.
    pub const SWEEP_SAMPLES: usize = 200;
    /// Minimum derivative height accepted as a charge transition.
    pub const PEAK_HEIGHT: f64 = 0.5;
    /// Sensitivity recorded when a sweep shows no usable transition.
    /// Heuristic, not a calibrated quantity.
    pub const NO_TRANSITION_SENSITIVITY: f64 = 0.01;
}
