//! Multi-level wind interpolation
//!
//! Turns a sparse table of wind layers into a continuous wind field:
//!
//! 1. Find the pair of layers bracketing the query altitude
//! 2. Blend speed linearly and direction circularly between them
//! 3. Hand the blended mean wind to the turbulence generator and return its
//!    velocity
//!
//! Outside the configured range the nearest layer is used unchanged (no
//! extrapolation).
//!
//! # Circular interpolation
//!
//! Directions wrap at 2π, so blending the raw angles fails across north
//! (350° and 10° would average to 180°). Each direction is treated as a unit
//! vector, the vectors are blended with the same weight as the speed, and the
//! result is converted back to an angle:
//!
//! ```text
//! θ = atan2((1-a)·sin θ₁ + a·sin θ₂, (1-a)·cos θ₁ + a·cos θ₂)
//! ```
//!
//! Opposite directions at equal weight have no meaningful average. Rounding
//! leaves a tiny residual vector, so the result is an arbitrary but finite
//! bearing rather than an error.

use crate::core_types::units::{Meters, MetersPerSecond, Radians, Seconds};
use crate::core_types::vec3::Vec3;
use crate::error::WindError;
use crate::layers::{LayerTable, WindLayerSample};
use crate::turbulence::{PinkNoiseTurbulence, TurbulenceGenerator, TurbulenceParameters};
use std::fmt;
use tracing::{debug, info};

/// Linear interpolation from `v1` (weight 0) to `v2` (weight 1)
#[inline]
pub fn lerp(v1: f64, v2: f64, weight: f64) -> f64 {
    v1 + (v2 - v1) * weight
}

/// Blend two bearings through their unit vectors.
///
/// The result lies in `(-π, π]`.
#[inline]
pub fn circular_lerp(from: Radians, to: Radians, weight: f64) -> Radians {
    let sin_sum = (1.0 - weight) * from.sin() + weight * to.sin();
    let cos_sum = (1.0 - weight) * from.cos() + weight * to.cos();
    Radians::new(sin_sum.atan2(cos_sum))
}

/// Deterministic wind at one altitude, before turbulence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanWind {
    pub speed: MetersPerSecond,
    pub direction: Radians,
}

impl From<&WindLayerSample> for MeanWind {
    fn from(sample: &WindLayerSample) -> Self {
        Self {
            speed: sample.speed,
            direction: sample.direction,
        }
    }
}

/// Layers surrounding a query altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bracket<'a> {
    /// Query is at or below the first layer
    Below { upper: &'a WindLayerSample },
    /// Query lies above `lower` and at or below `upper`
    Between {
        lower: &'a WindLayerSample,
        upper: &'a WindLayerSample,
    },
    /// Query is above the last layer
    Above { lower: &'a WindLayerSample },
}

impl<'a> Bracket<'a> {
    /// Scan `layers` in order and stop at the first layer at or above
    /// `altitude`; the layer before it (if any) is the lower bound.
    pub fn search(layers: &'a LayerTable, altitude: Meters) -> Self {
        let mut lower: Option<&'a WindLayerSample> = None;
        for current in layers {
            if current.altitude.value() >= altitude.value() {
                return match lower {
                    None => Bracket::Below { upper: current },
                    Some(lower) => Bracket::Between {
                        lower,
                        upper: current,
                    },
                };
            }
            lower = Some(current);
        }
        Bracket::Above {
            lower: layers.highest(),
        }
    }

    /// Layer below the query, if any
    pub fn lower(&self) -> Option<&'a WindLayerSample> {
        match *self {
            Bracket::Below { .. } => None,
            Bracket::Between { lower, .. } | Bracket::Above { lower } => Some(lower),
        }
    }

    /// Layer at or above the query, if any
    pub fn upper(&self) -> Option<&'a WindLayerSample> {
        match *self {
            Bracket::Above { .. } => None,
            Bracket::Between { upper, .. } | Bracket::Below { upper } => Some(upper),
        }
    }

    /// Mean wind at `altitude` within this bracket.
    ///
    /// Boundary brackets return the boundary layer unchanged. The weight is
    /// not clamped, so an altitude outside the bracket extrapolates.
    ///
    /// # Errors
    ///
    /// Returns [`WindError::DegenerateLayerSpacing`] if both bracketing
    /// layers share the same altitude.
    pub fn blend(&self, altitude: Meters) -> Result<MeanWind, WindError> {
        match *self {
            Bracket::Below { upper } => Ok(MeanWind::from(upper)),
            Bracket::Above { lower } => Ok(MeanWind::from(lower)),
            Bracket::Between { lower, upper } => {
                let span = upper.altitude - lower.altitude;
                if span.value() == 0.0 {
                    return Err(WindError::DegenerateLayerSpacing {
                        altitude: lower.altitude,
                    });
                }
                let a = (altitude - lower.altitude) / span;
                Ok(MeanWind {
                    speed: MetersPerSecond::new(lerp(
                        lower.speed.value(),
                        upper.speed.value(),
                        a,
                    )),
                    direction: circular_lerp(lower.direction, upper.direction, a),
                })
            }
        }
    }
}

/// Log-friendly view of an optional bracket side
struct LayerLabel<'a>(Option<&'a WindLayerSample>);

impl fmt::Display for LayerLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(sample) => write!(f, "{sample}"),
            None => write!(f, "(none)"),
        }
    }
}

/// Altitude- and time-dependent wind built from a table of layers.
///
/// The engine owns its layer table and exactly one turbulence generator.
/// Every [`evaluate`](Self::evaluate) overwrites the generator's mean wind,
/// so consecutive calls are not independent: the generator's noise process
/// carries over from one query to the next. Calls therefore take `&mut self`
/// and must be issued in non-decreasing time order within a run.
///
/// Clone the engine to start an independent run from the same state.
#[derive(Debug, Clone)]
pub struct MultiLevelWind<T: TurbulenceGenerator = PinkNoiseTurbulence> {
    layers: LayerTable,
    parameters: TurbulenceParameters,
    turbulence: T,
}

impl MultiLevelWind<PinkNoiseTurbulence> {
    /// Engine with a pink-noise generator using the default seed
    pub fn with_pink_noise(layers: LayerTable, parameters: TurbulenceParameters) -> Self {
        Self::new(layers, parameters, PinkNoiseTurbulence::default())
    }
}

impl<T: TurbulenceGenerator> MultiLevelWind<T> {
    /// Create an engine from a layer table, gust parameters and a generator.
    ///
    /// The generator starts out with the lowest layer's wind, then receives
    /// the standard deviation and turbulence intensity in that order.
    pub fn new(layers: LayerTable, parameters: TurbulenceParameters, mut turbulence: T) -> Self {
        let lowest = *layers.lowest();
        turbulence.set_mean_speed(lowest.speed);
        turbulence.set_mean_direction(lowest.direction);
        turbulence.set_standard_deviation(parameters.standard_deviation);
        turbulence.set_turbulence_intensity(parameters.turbulence_intensity);

        info!(
            "Multi-level wind initialized: {} layers from {} to {}, std dev {}, intensity {:.3}",
            layers.len(),
            lowest.altitude,
            layers.highest().altitude,
            parameters.standard_deviation,
            parameters.turbulence_intensity
        );

        Self {
            layers,
            parameters,
            turbulence,
        }
    }

    /// Layer table
    pub fn layers(&self) -> &LayerTable {
        &self.layers
    }

    /// Gust parameters the generator was configured with
    pub fn parameters(&self) -> TurbulenceParameters {
        self.parameters
    }

    /// Turbulence generator
    pub fn turbulence(&self) -> &T {
        &self.turbulence
    }

    /// Layers surrounding `altitude`
    pub fn bracket(&self, altitude: Meters) -> Bracket<'_> {
        Bracket::search(&self.layers, altitude)
    }

    /// Mean wind at `altitude` without touching the generator.
    ///
    /// # Errors
    ///
    /// See [`Bracket::blend`].
    pub fn mean_wind(&self, altitude: Meters) -> Result<MeanWind, WindError> {
        self.bracket(altitude).blend(altitude)
    }

    /// Wind velocity at `time` and `altitude`.
    ///
    /// Sets the generator's mean wind to the interpolated layer wind and
    /// returns the generator's velocity unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`WindError::DegenerateLayerSpacing`] for a zero-width
    /// bracket, or whatever time-ordering error the generator raises.
    pub fn evaluate(&mut self, time: Seconds, altitude: Meters) -> Result<Vec3, WindError> {
        let bracket = Bracket::search(&self.layers, altitude);
        let mean = bracket.blend(altitude)?;

        self.turbulence.set_mean_speed(mean.speed);
        self.turbulence.set_mean_direction(mean.direction);
        let velocity = self.turbulence.velocity(time, altitude)?;

        debug!(
            "interpolating alt {} between layers {} and {} returning ({:.3}, {:.3}, {:.3})",
            altitude,
            LayerLabel(bracket.lower()),
            LayerLabel(bracket.upper()),
            velocity.x,
            velocity.y,
            velocity.z
        );
        Ok(velocity)
    }
}
