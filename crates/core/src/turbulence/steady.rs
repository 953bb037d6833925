//! Gust-free generator.

use super::{horizontal_velocity, TurbulenceGenerator};
use crate::core_types::units::{Meters, MetersPerSecond, Radians, Seconds};
use crate::core_types::vec3::Vec3;
use crate::error::WindError;

/// Returns the mean wind unchanged, for calm runs and deterministic checks.
///
/// Variability settings are stored so they can be inspected but have no
/// effect on the output.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SteadyWind {
    mean_speed: MetersPerSecond,
    mean_direction: Radians,
    standard_deviation: MetersPerSecond,
    turbulence_intensity: f64,
}

impl SteadyWind {
    /// Create a steady wind with zero mean speed
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mean speed
    pub fn mean_speed(&self) -> MetersPerSecond {
        self.mean_speed
    }

    /// Current mean direction
    pub fn mean_direction(&self) -> Radians {
        self.mean_direction
    }

    /// Configured (unused) standard deviation
    pub fn standard_deviation(&self) -> MetersPerSecond {
        self.standard_deviation
    }

    /// Configured (unused) turbulence intensity
    pub fn turbulence_intensity(&self) -> f64 {
        self.turbulence_intensity
    }
}

impl TurbulenceGenerator for SteadyWind {
    fn set_mean_speed(&mut self, speed: MetersPerSecond) {
        self.mean_speed = speed;
    }

    fn set_mean_direction(&mut self, direction: Radians) {
        self.mean_direction = direction;
    }

    fn set_standard_deviation(&mut self, standard_deviation: MetersPerSecond) {
        self.standard_deviation = standard_deviation;
    }

    fn set_turbulence_intensity(&mut self, intensity: f64) {
        self.turbulence_intensity = intensity;
    }

    fn velocity(&mut self, _time: Seconds, _altitude: Meters) -> Result<Vec3, WindError> {
        Ok(horizontal_velocity(
            self.mean_speed.value(),
            self.mean_direction,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_east_wind_points_along_x() {
        let mut wind = SteadyWind::new();
        wind.set_mean_speed(MetersPerSecond::new(5.0));
        wind.set_mean_direction(Radians::new(FRAC_PI_2));

        let v = wind.velocity(Seconds::new(0.0), Meters::new(0.0)).unwrap();
        assert_abs_diff_eq!(v.x, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.y, 0.0, epsilon = 1e-12);
        assert_eq!(v.z, 0.0);
    }

    #[test]
    fn test_output_ignores_time_and_variability() {
        let mut wind = SteadyWind::new();
        wind.set_mean_speed(MetersPerSecond::new(3.0));
        wind.set_standard_deviation(MetersPerSecond::new(10.0));
        wind.set_turbulence_intensity(0.5);

        let a = wind.velocity(Seconds::new(1.0), Meters::new(0.0)).unwrap();
        let b = wind.velocity(Seconds::new(50.0), Meters::new(900.0)).unwrap();
        assert_eq!(a, b);
        assert_eq!(wind.turbulence_intensity(), 0.5);
    }
}
