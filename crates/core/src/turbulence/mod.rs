//! Turbulence generators
//!
//! A turbulence generator turns a deterministic mean wind (speed and
//! direction) into a velocity vector that fluctuates over time. The
//! interpolation engine owns exactly one generator and overwrites its mean
//! wind on every query, so the generator's internal noise process runs
//! continuously across queries at different altitudes.
//!
//! Two implementations are provided:
//! - [`PinkNoiseTurbulence`]: 1/f gusting on the mean speed
//! - [`SteadyWind`]: no gusting, returns the mean wind as-is

pub mod pink_noise;
pub mod steady;

pub use pink_noise::{PinkNoise, PinkNoiseTurbulence, DEFAULT_SEED};
pub use steady::SteadyWind;

use crate::core_types::units::{Meters, MetersPerSecond, Radians, Seconds};
use crate::core_types::vec3::Vec3;
use crate::error::WindError;
use serde::{Deserialize, Serialize};

/// Gust tuning held for the lifetime of a simulation run.
///
/// Both values are forwarded unchanged to the generator when the engine is
/// built: the standard deviation first, then the turbulence intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurbulenceParameters {
    /// Absolute wind speed variability
    pub standard_deviation: MetersPerSecond,
    /// Variability as a fraction of the mean speed (0.1 = 10%)
    pub turbulence_intensity: f64,
}

impl Default for TurbulenceParameters {
    fn default() -> Self {
        Self {
            standard_deviation: MetersPerSecond::new(0.2), // 10% of a 2 m/s breeze
            turbulence_intensity: 0.1,
        }
    }
}

/// Source of time- and altitude-indexed wind velocity.
///
/// Implementations may keep mutable state between calls (noise history,
/// last query time). Queries within one run are expected in non-decreasing
/// time order.
pub trait TurbulenceGenerator: Send {
    /// Set the deterministic mean wind speed
    fn set_mean_speed(&mut self, speed: MetersPerSecond);

    /// Set the deterministic mean wind direction (bearing the wind blows from)
    fn set_mean_direction(&mut self, direction: Radians);

    /// Set the absolute speed variability
    fn set_standard_deviation(&mut self, standard_deviation: MetersPerSecond);

    /// Set the speed variability relative to the mean speed
    fn set_turbulence_intensity(&mut self, intensity: f64);

    /// Wind velocity at `time` and `altitude`.
    ///
    /// # Errors
    ///
    /// Implementations that enforce time ordering return
    /// [`WindError::InvalidTime`] or [`WindError::NonMonotonicTime`].
    fn velocity(&mut self, time: Seconds, altitude: Meters) -> Result<Vec3, WindError>;
}

/// Horizontal velocity for a wind of `speed` from bearing `direction`.
#[inline]
pub(crate) fn horizontal_velocity(speed: f64, direction: Radians) -> Vec3 {
    Vec3::new(speed * direction.sin(), speed * direction.cos(), 0.0)
}
