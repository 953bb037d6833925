//! Error type shared by the layer table, the interpolation engine and the
//! turbulence generators.

use crate::core_types::units::{Meters, Seconds};

/// Errors raised while building or evaluating a multi-level wind model.
///
/// None of these are transient: each one means the configuration or the
/// caller's query sequence is wrong and must be fixed before retrying.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindError {
    /// A layer table was built from zero samples
    EmptyLayerTable,
    /// The two layers bracketing `altitude` share the same altitude, so the
    /// interpolation weight is undefined
    DegenerateLayerSpacing {
        /// Altitude of both bracketing layers
        altitude: Meters,
    },
    /// Query time is negative or not finite
    InvalidTime {
        /// The rejected time
        time: Seconds,
    },
    /// Query time went backwards relative to the previous query
    NonMonotonicTime {
        /// Time of the previous accepted query
        previous: Seconds,
        /// The rejected time
        requested: Seconds,
    },
    /// A configuration edit addressed a level that does not exist
    LayerIndexOutOfRange {
        /// Requested level index
        index: usize,
        /// Number of configured levels
        len: usize,
    },
    /// Configured level `index` sits below its predecessor
    UnsortedLayers {
        /// Index of the first out-of-order level
        index: usize,
    },
}

impl std::fmt::Display for WindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindError::EmptyLayerTable => {
                write!(f, "Layer table requires at least one wind layer")
            }
            WindError::DegenerateLayerSpacing { altitude } => write!(
                f,
                "Bracketing wind layers share altitude {altitude}; interpolation weight is undefined"
            ),
            WindError::InvalidTime { time } => {
                write!(f, "Query time must be finite and non-negative, got {time}")
            }
            WindError::NonMonotonicTime {
                previous,
                requested,
            } => write!(
                f,
                "Query time went backwards: previous {previous}, requested {requested}"
            ),
            WindError::LayerIndexOutOfRange { index, len } => {
                write!(f, "Wind level {index} out of range (have {len} levels)")
            }
            WindError::UnsortedLayers { index } => write!(
                f,
                "Wind level {index} is below level {}; altitudes must be ascending",
                index.saturating_sub(1)
            ),
        }
    }
}

impl std::error::Error for WindError {}
