// src/physics/scan.rs

//! Synthetic charge-sensor measurements.
//!
//! A charge sensor next to the array responds to the total electron number.
//! Differentiating that response across a 2D plunger-voltage plane turns every
//! charge transition into a bright ridge: the familiar charge-stability
//! diagram. Measurement noise shrinks with longer integration time.

use crate::core::constants::scan as defaults;
use crate::core::QdotError;
use crate::physics::PhysicsEngine;
use crate::signal::{gradient_2d, linspace};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::fmt;

/// Geometry of a scan: a square voltage window sampled on a square grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanConfig {
    /// Voltage span of each axis, centred on the scan centre.
    pub window: f64,
    /// Pixels per axis.
    pub resolution: usize,
}

impl ScanConfig {
    pub fn new(window: f64, resolution: usize) -> Self {
        Self { window, resolution }
    }

    fn validate(&self) -> Result<(), QdotError> {
        if self.resolution == 0 {
            return Err(QdotError::invalid_argument("scan resolution must be at least 1"));
        }
        if !self.window.is_finite() || self.window <= 0.0 {
            return Err(QdotError::invalid_argument(format!(
                "scan window must be finite and positive, got {}",
                self.window
            )));
        }
        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { window: defaults::WINDOW, resolution: defaults::RESOLUTION }
    }
}

/// Square single-channel sensor image, row-major.
///
/// Row index follows the second gate, column index the first, so
/// `get(row, col)` is the pixel at `(v1[col], v2[row])`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanImage {
    resolution: usize,
    pixels: Vec<f32>,
}

impl ScanImage {
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.resolution && col < self.resolution {
            Some(self.pixels[row * self.resolution + col])
        } else {
            None
        }
    }

    /// Iterator over rows.
    pub fn rows(&self) -> std::slice::Chunks<'_, f32> {
        self.pixels.chunks(self.resolution)
    }

    pub fn into_pixels(self) -> Vec<f32> {
        self.pixels
    }
}

impl fmt::Display for ScanImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for (i, p) in row.iter().enumerate() {
                write!(f, "{}{:6.3}", if i > 0 { " " } else { "" }, p)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Maps sensor integration time to measurement noise:
/// `noise = at_zero - reduction * t`, with `t` clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorNoiseModel {
    pub at_zero: f64,
    pub reduction: f64,
}

impl SensorNoiseModel {
    pub fn noise_level(&self, integration_time: f64) -> f64 {
        let t = if integration_time.is_nan() { 0.0 } else { integration_time.clamp(0.0, 1.0) };
        self.at_zero - self.reduction * t
    }
}

impl Default for SensorNoiseModel {
    fn default() -> Self {
        Self {
            at_zero: defaults::NOISE_AT_ZERO_INTEGRATION,
            reduction: defaults::NOISE_REDUCTION_PER_INTEGRATION,
        }
    }
}

/// Simulates a charge-sensor derivative image around `(center_v1, center_v2)`.
///
/// 1. Builds a `resolution x resolution` grid spanning `window` on both of the
///    first two gates; any further gates are held at 0 V.
/// 2. Sums the ground-state occupations at every grid point.
/// 3. Takes the gradient magnitude of that charge map.
/// 4. Adds independent Gaussian noise of standard deviation `noise_level` to
///    every pixel. With `noise_level == 0` nothing is drawn from `rng` and the
///    image is exactly reproducible.
///
/// # Returns
/// * `Err(QdotError::InvalidArgument)` for a zero resolution, a non-positive
///   or non-finite window, a negative or non-finite noise level, or an engine
///   with fewer than two gates.
pub fn simulate_sensor_scan<P, R>(
    engine: &P,
    center_v1: f64,
    center_v2: f64,
    noise_level: f64,
    config: &ScanConfig,
    rng: &mut R,
) -> Result<ScanImage, QdotError>
where
    P: PhysicsEngine + ?Sized,
    R: Rng + ?Sized,
{
    config.validate()?;
    if !noise_level.is_finite() || noise_level < 0.0 {
        return Err(QdotError::invalid_argument(format!(
            "noise level must be finite and non-negative, got {}",
            noise_level
        )));
    }
    if engine.num_dots() < 2 {
        return Err(QdotError::invalid_argument("a 2D scan needs a device with at least two gates"));
    }

    let res = config.resolution;
    let half = config.window / 2.0;
    let v1_axis = linspace(center_v1 - half, center_v1 + half, res);
    let v2_axis = linspace(center_v2 - half, center_v2 + half, res);

    let mut voltages = vec![0.0; engine.num_dots()];
    let mut charge_map = Vec::with_capacity(res * res);
    for &v2 in &v2_axis {
        for &v1 in &v1_axis {
            voltages[0] = v1;
            voltages[1] = v2;
            charge_map.push(f64::from(engine.ground_state(&voltages)?.total_charge()));
        }
    }

    let (grad_y, grad_x) = gradient_2d(&charge_map, res, res);
    let mut signal: Vec<f64> = grad_x.iter().zip(&grad_y).map(|(gx, gy)| gx.hypot(*gy)).collect();

    if noise_level > 0.0 {
        let noise = Normal::new(0.0, noise_level)
            .map_err(|e| QdotError::invalid_argument(format!("noise distribution: {}", e)))?;
        for pixel in signal.iter_mut() {
            *pixel += noise.sample(rng);
        }
    }

    Ok(ScanImage {
        resolution: res,
        pixels: signal.into_iter().map(|p| p as f32).collect(),
    })
}
