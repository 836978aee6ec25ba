// src/lib.rs

//! `autoqubit` - electrostatic simulation of few-electron quantum-dot arrays
//!
//! The crate models gate-defined dots with the constant-interaction picture:
//! each electron configuration carries a quadratic capacitive energy, and the
//! device sits in whichever configuration minimises it. On top of that sit a
//! synthetic charge-sensor scan (the images an autotuning agent looks at) and
//! an automated calibrator that measures gate cross-talk and derives virtual
//! gates from it.
//!
//! All randomness (device resampling, sensor noise) comes from an explicitly
//! passed [`rand::Rng`], so runs are reproducible under a fixed seed.

pub mod calibration;
pub mod core;
pub mod physics;
pub mod signal;

// Re-export the most common types for easier top-level use
pub use calibration::{CalibrationConfig, CrossTalkCalibrator, CrossTalkMatrix, VirtualGates};
pub use crate::core::{ChargeConfiguration, QdotError, StateSpace};
pub use physics::{
    simulate_sensor_scan, Coupling, DeviceParameters, DeviceRanges, DotArray, PhysicsEngine, RandomizedPhysics,
    ScanConfig, ScanImage, SensorNoiseModel, TripleDotPhysics,
};

// Example 1: Ground states of the fixed triple dot
// Far below every transition the array is empty; driving one plunger hard
// fills that dot up to the largest enumerated occupation.
/// ```
/// use autoqubit::{PhysicsEngine, QdotError, TripleDotPhysics};
///
/// let physics = TripleDotPhysics::new();
/// assert_eq!(physics.ground_state(&[0.0, 0.0, 0.0])?.occupations(), &[0, 0, 0]);
/// assert_eq!(physics.ground_state(&[100.0, 0.0, 0.0])?.occupation(0), Some(2));
/// # Ok::<(), QdotError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Calibrate cross-talk and step along a virtual gate
/// ```
/// use autoqubit::{CrossTalkCalibrator, QdotError, TripleDotPhysics};
///
/// let physics = TripleDotPhysics::new();
/// let matrix = CrossTalkCalibrator::new(&physics).discover_matrix()?;
/// for i in 0..3 {
///     assert_eq!(matrix.get(i, i), Some(1.0));
/// }
///
/// // Physical voltage step that moves only the middle dot.
/// let gates = matrix.virtual_gates()?;
/// let step = gates.to_physical(&[0.0, 2.0, 0.0])?;
/// assert_eq!(step.len(), 3);
/// # Ok::<(), QdotError>(())
/// ```
#[doc(hidden)]
const _: () = ();
