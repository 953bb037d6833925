//! Multi-Level Wind Core Library
//!
//! Altitude- and time-dependent wind for flight simulation, built from a
//! small table of user-specified wind layers.
//!
//! ## Pipeline
//!
//! - [`LayerTable`]: ordered wind samples (altitude, speed, direction)
//! - [`MultiLevelWind`]: bracket lookup, linear speed and circular direction
//!   interpolation between the two nearest layers
//! - [`TurbulenceGenerator`]: adds gusting to the interpolated mean wind
//!   ([`PinkNoiseTurbulence`] or [`SteadyWind`])
//! - [`WindLayerConfig`]: editable level list that produces the table

// Core types and utilities
pub mod core_types;
pub mod error;

// Wind model
pub mod config;
pub mod interpolation;
pub mod layers;
pub mod turbulence;

// Re-export core types
pub use core_types::{Degrees, Meters, MetersPerSecond, Radians, Seconds, Vec3};
pub use error::WindError;

// Re-export wind model types
pub use config::{MultiLevelWindConfig, WindLayerConfig};
pub use interpolation::{Bracket, MeanWind, MultiLevelWind};
pub use layers::{LayerTable, WindLayerSample};
pub use turbulence::{
    PinkNoiseTurbulence, SteadyWind, TurbulenceGenerator, TurbulenceParameters, DEFAULT_SEED,
};
