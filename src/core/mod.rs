// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod state;

pub use error::QdotError;
pub use state::{ChargeConfiguration, StateSpace};

pub mod constants;
