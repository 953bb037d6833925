//! Pink-noise wind gusting
//!
//! Atmospheric turbulence has most of its energy at low frequencies, with a
//! spectrum close to 1/f. Gusts are generated by filtering white Gaussian
//! noise through an autoregressive 1/f^α filter and adding the result to the
//! mean wind speed.
//!
//! # References
//!
//! - Kasdin, N.J. (1995) "Discrete simulation of colored noise and stochastic
//!   processes and 1/f^α power law noise generation", Proc. IEEE 83(5)

use super::{horizontal_velocity, TurbulenceGenerator};
use crate::core_types::units::{Meters, MetersPerSecond, Radians, Seconds};
use crate::core_types::vec3::Vec3;
use crate::error::WindError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::warn;

/// Seed used when none is supplied
pub const DEFAULT_SEED: u64 = 10;

/// Spectral exponent (α = 1 is pink noise)
const ALPHA: f64 = 1.0;

/// Filter order
const POLES: usize = 2;

/// Empirical standard deviation of the 2-pole pink noise source
const NOISE_STDDEV: f64 = 2.252;

/// Time between noise samples (seconds)
const SAMPLE_INTERVAL: f64 = 0.05;

/// Largest number of samples drawn for a single query. The 2-pole filter
/// forgets its history within a few dozen samples, so a longer jump restarts
/// from fresh draws instead of stepping through every skipped sample.
const FAST_FORWARD_SAMPLES: u64 = 256;

/// Reported intensity when the mean speed is zero but gusting is not
const MAX_TURBULENCE_INTENSITY: f64 = 1000.0;

/// Autoregressive 1/f^α noise source.
#[derive(Debug, Clone)]
pub struct PinkNoise {
    multipliers: Vec<f64>,
    history: Vec<f64>,
    rng: StdRng,
}

impl PinkNoise {
    /// Create a noise source with spectral exponent `alpha` and `poles`
    /// filter taps, drawing white noise from `rng`.
    ///
    /// The filter history is warmed up before the first value is returned.
    pub fn new(alpha: f64, poles: usize, rng: StdRng) -> Self {
        let mut multipliers = Vec::with_capacity(poles);
        let mut a = 1.0;
        for i in 0..poles {
            let i = i as f64;
            a = (i - alpha / 2.0) * a / (i + 1.0);
            multipliers.push(a);
        }

        let mut noise = Self {
            multipliers,
            history: vec![0.0; poles],
            rng,
        };
        for _ in 0..5 * poles {
            noise.next_value();
        }
        noise
    }

    /// Pink noise with the default 2-pole filter seeded from `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::new(ALPHA, POLES, StdRng::seed_from_u64(seed))
    }

    /// Draw the next noise value
    pub fn next_value(&mut self) -> f64 {
        let mut x: f64 = self.rng.sample(StandardNormal);
        for (m, h) in self.multipliers.iter().zip(&self.history) {
            x -= m * h;
        }
        if !self.history.is_empty() {
            self.history.rotate_right(1);
            self.history[0] = x;
        }
        x
    }
}

/// How gust magnitude is derived from the mean speed.
///
/// Whichever setter ran last decides.
#[derive(Debug, Clone, Copy, PartialEq)]
enum GustScale {
    /// Fixed standard deviation in m/s
    Absolute(f64),
    /// Standard deviation proportional to the mean speed
    Relative(f64),
}

/// Wind generator adding pink-noise gusts to a steerable mean wind.
///
/// Noise samples are spaced 0.05 s apart and linearly interpolated in
/// between. Sample `k` sits at exactly `k * 0.05` s. A query more than
/// 256 samples past the previous one draws only the last 256 of them, so
/// the cost of a query is bounded whatever the time. Gusts act along the mean direction only; the vertical component
/// is always zero.
///
/// Queries must arrive in non-decreasing time order. A query earlier than
/// the previous one is rejected rather than silently restarting the noise
/// process; call [`PinkNoiseTurbulence::reset`] to start over explicitly.
#[derive(Debug, Clone)]
pub struct PinkNoiseTurbulence {
    mean_speed: f64,
    mean_direction: Radians,
    gust_scale: GustScale,
    seed: u64,
    source: PinkNoise,
    /// Grid index of `current_sample`
    sample_index: u64,
    current_sample: f64,
    next_sample: f64,
    last_query: Option<Seconds>,
}

impl Default for PinkNoiseTurbulence {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl PinkNoiseTurbulence {
    /// Create a generator with calm mean wind and no gusting
    pub fn with_seed(seed: u64) -> Self {
        let mut source = PinkNoise::with_seed(seed);
        let current_sample = source.next_value();
        let next_sample = source.next_value();
        Self {
            mean_speed: 0.0,
            mean_direction: Radians::new(0.0),
            gust_scale: GustScale::Absolute(0.0),
            seed,
            source,
            sample_index: 0,
            current_sample,
            next_sample,
            last_query: None,
        }
    }

    /// Restart the noise process from its seed.
    ///
    /// Mean wind and gust settings are kept.
    pub fn reset(&mut self) {
        let fresh = Self::with_seed(self.seed);
        self.source = fresh.source;
        self.sample_index = fresh.sample_index;
        self.current_sample = fresh.current_sample;
        self.next_sample = fresh.next_sample;
        self.last_query = None;
    }

    /// Seed of the noise process
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current mean speed
    pub fn mean_speed(&self) -> MetersPerSecond {
        MetersPerSecond::new(self.mean_speed)
    }

    /// Current mean direction
    pub fn mean_direction(&self) -> Radians {
        self.mean_direction
    }

    /// Effective gust standard deviation at the current mean speed
    pub fn standard_deviation(&self) -> MetersPerSecond {
        let sd = match self.gust_scale {
            GustScale::Absolute(sd) => sd,
            GustScale::Relative(intensity) => intensity * self.mean_speed,
        };
        MetersPerSecond::new(sd)
    }

    /// Gust standard deviation relative to the mean speed.
    ///
    /// With a zero mean speed this is 0 when there is no gusting and a large
    /// sentinel value otherwise.
    pub fn turbulence_intensity(&self) -> f64 {
        match self.gust_scale {
            GustScale::Relative(intensity) => intensity,
            GustScale::Absolute(sd) if self.mean_speed == 0.0 => {
                if sd == 0.0 {
                    0.0
                } else {
                    MAX_TURBULENCE_INTENSITY
                }
            }
            GustScale::Absolute(sd) => sd / self.mean_speed,
        }
    }

    /// Check the query time against the ordering precondition
    fn check_time(&self, time: Seconds) -> Result<(), WindError> {
        if !time.value().is_finite() || time.value() < 0.0 {
            warn!("Rejected wind query at invalid time {}", time);
            return Err(WindError::InvalidTime { time });
        }
        if let Some(previous) = self.last_query {
            if time.value() < previous.value() {
                warn!(
                    "Rejected wind query going back in time: {} after {}",
                    time, previous
                );
                return Err(WindError::NonMonotonicTime {
                    previous,
                    requested: time,
                });
            }
        }
        Ok(())
    }

    /// Interpolated noise value at `t`, advancing the source as needed
    fn noise_at(&mut self, t: f64) -> f64 {
        let position = t / SAMPLE_INTERVAL;
        let index = position.floor();
        let target = index as u64;

        let steps = target.saturating_sub(self.sample_index);
        for _ in 0..steps.min(FAST_FORWARD_SAMPLES) {
            self.current_sample = self.next_sample;
            self.next_sample = self.source.next_value();
        }
        self.sample_index = self.sample_index.max(target);

        // Past the range where f64 resolves the grid every time is a sample
        let fraction = position - index;
        let a = if fraction.is_finite() { fraction } else { 0.0 };
        self.current_sample * (1.0 - a) + self.next_sample * a
    }
}

impl TurbulenceGenerator for PinkNoiseTurbulence {
    /// Negative speeds clamp to zero. With a relative gust scale the
    /// standard deviation follows the new mean.
    fn set_mean_speed(&mut self, speed: MetersPerSecond) {
        self.mean_speed = speed.value().max(0.0);
    }

    fn set_mean_direction(&mut self, direction: Radians) {
        self.mean_direction = direction;
    }

    fn set_standard_deviation(&mut self, standard_deviation: MetersPerSecond) {
        self.gust_scale = GustScale::Absolute(standard_deviation.value().max(0.0));
    }

    fn set_turbulence_intensity(&mut self, intensity: f64) {
        self.gust_scale = GustScale::Relative(intensity.max(0.0));
    }

    fn velocity(&mut self, time: Seconds, _altitude: Meters) -> Result<Vec3, WindError> {
        self.check_time(time)?;
        let noise = self.noise_at(time.value());
        self.last_query = Some(time);

        let speed = self.mean_speed + noise * self.standard_deviation().value() / NOISE_STDDEV;
        Ok(horizontal_velocity(speed, self.mean_direction))
    }
}
