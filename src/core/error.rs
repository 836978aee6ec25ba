// src/core/error.rs

//! Error handling logic

use std::fmt;

/// Failures raised by the physics engine and the cross-talk calibrator.
///
/// Voltages themselves are never rejected: driving a device far outside its
/// operating window is valid physics and simply extrapolates the energy model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QdotError {
    /// A scan, calibration or device argument is outside its valid domain
    /// (e.g. zero resolution, non-positive window, non-positive lever arm).
    InvalidArgument {
        /// InvalidArgument failure message
        message: String,
    },

    /// A voltage vector (or similar per-dot input) has the wrong length.
    DimensionMismatch {
        /// Number of dots the engine models
        expected: usize,
        /// Length that was supplied
        found: usize,
    },

    /// A calibration sweep crossed no usable charge transition.
    /// The calibrator recovers from this with its fallback sensitivity,
    /// so callers of `discover_matrix` never see it.
    DegenerateCalibration {
        /// Dot whose occupation was sensed
        dot: usize,
        /// Gate that was swept
        gate: usize,
    },

    /// The cross-talk matrix has no inverse, so no virtual gates exist.
    SingularMatrix {
        /// SingularMatrix failure message
        message: String,
    },
}

impl QdotError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        QdotError::InvalidArgument { message: message.into() }
    }
}

impl fmt::Display for QdotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QdotError::InvalidArgument { message } => write!(f, "Invalid Argument: {}", message),
            QdotError::DimensionMismatch { expected, found } => {
                write!(f, "Dimension Mismatch: expected {} values, found {}", expected, found)
            }
            QdotError::DegenerateCalibration { dot, gate } => write!(
                f,
                "Degenerate Calibration: no charge transition on dot {} while sweeping gate {}",
                dot, gate
            ),
            QdotError::SingularMatrix { message } => write!(f, "Singular Matrix: {}", message),
        }
    }
}

// Implement the standard Error trait to allow for easy integration with Rust error handling.
impl std::error::Error for QdotError {}
