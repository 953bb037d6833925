//! Wind layer samples and the ordered table the interpolation engine scans.

use crate::core_types::units::{Meters, MetersPerSecond, Radians};
use crate::error::WindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wind defined at a single altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindLayerSample {
    /// Altitude at which this sample applies
    pub altitude: Meters,
    /// Mean horizontal wind speed (non-negative by convention, not enforced)
    pub speed: MetersPerSecond,
    /// Compass bearing the wind blows from, conventionally in `[0, 2π)`
    pub direction: Radians,
}

impl WindLayerSample {
    /// Create a new layer sample
    pub fn new(altitude: Meters, speed: MetersPerSecond, direction: Radians) -> Self {
        Self {
            altitude,
            speed,
            direction,
        }
    }
}

impl fmt::Display for WindLayerSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.0}m {:.0}° {:.0}m/s",
            self.altitude.value(),
            self.direction.to_degrees().value(),
            self.speed.value()
        )
    }
}

/// Ordered, immutable collection of wind layers.
///
/// Samples are expected in ascending altitude order. The order is not
/// checked here; bracket lookups behave like a linear scan that stops at the
/// first sample at or above the query altitude, so results are only
/// meaningful for sorted input. The table owns copies of its samples and
/// always holds at least one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerTable {
    samples: Vec<WindLayerSample>,
}

impl LayerTable {
    /// Build a table from an ordered list of samples.
    ///
    /// # Errors
    ///
    /// Returns [`WindError::EmptyLayerTable`] if `samples` is empty.
    pub fn new(samples: &[WindLayerSample]) -> Result<Self, WindError> {
        if samples.is_empty() {
            return Err(WindError::EmptyLayerTable);
        }
        Ok(Self {
            samples: samples.to_vec(),
        })
    }

    /// Iterate over the samples in table order
    pub fn iter(&self) -> std::slice::Iter<'_, WindLayerSample> {
        self.samples.iter()
    }

    /// All samples in table order
    pub fn as_slice(&self) -> &[WindLayerSample] {
        &self.samples
    }

    /// Number of samples (always at least one)
    #[allow(clippy::len_without_is_empty)] // never empty by construction
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Sample at `index`, if any
    pub fn get(&self, index: usize) -> Option<&WindLayerSample> {
        self.samples.get(index)
    }

    /// First sample in table order
    pub fn lowest(&self) -> &WindLayerSample {
        &self.samples[0]
    }

    /// Last sample in table order
    pub fn highest(&self) -> &WindLayerSample {
        &self.samples[self.samples.len() - 1]
    }
}

impl TryFrom<Vec<WindLayerSample>> for LayerTable {
    type Error = WindError;

    fn try_from(samples: Vec<WindLayerSample>) -> Result<Self, Self::Error> {
        if samples.is_empty() {
            return Err(WindError::EmptyLayerTable);
        }
        Ok(Self { samples })
    }
}

impl<'a> IntoIterator for &'a LayerTable {
    type Item = &'a WindLayerSample;
    type IntoIter = std::slice::Iter<'a, WindLayerSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(alt: f64, speed: f64, dir_deg: f64) -> WindLayerSample {
        WindLayerSample::new(
            Meters::new(alt),
            MetersPerSecond::new(speed),
            Radians::new(dir_deg.to_radians()),
        )
    }

    #[test]
    fn test_empty_table_rejected() {
        assert_eq!(LayerTable::new(&[]), Err(WindError::EmptyLayerTable));
        assert_eq!(
            LayerTable::try_from(Vec::new()),
            Err(WindError::EmptyLayerTable)
        );
    }

    #[test]
    fn test_table_copies_source() {
        let mut source = vec![sample(0.0, 2.0, 90.0), sample(500.0, 8.0, 120.0)];
        let table = LayerTable::new(&source).unwrap();

        source[0].speed = MetersPerSecond::new(99.0);
        source.clear();

        assert_eq!(table.len(), 2);
        assert_eq!(table.lowest().speed, MetersPerSecond::new(2.0));
        assert_eq!(table.highest().altitude, Meters::new(500.0));
    }

    #[test]
    fn test_iteration_preserves_order() {
        let table = LayerTable::new(&[
            sample(0.0, 1.0, 0.0),
            sample(100.0, 2.0, 0.0),
            sample(200.0, 3.0, 0.0),
        ])
        .unwrap();

        let speeds: Vec<f64> = table.iter().map(|s| s.speed.value()).collect();
        assert_eq!(speeds, vec![1.0, 2.0, 3.0]);
        assert_eq!(table.get(1).map(|s| s.altitude), Some(Meters::new(100.0)));
        assert!(table.get(3).is_none());
    }

    #[test]
    fn test_single_sample_is_both_ends() {
        let table = LayerTable::new(&[sample(250.0, 4.0, 45.0)]).unwrap();
        assert_eq!(table.lowest(), table.highest());
    }

    #[test]
    fn test_display_format() {
        let s = sample(304.8, 5.2, 270.0);
        assert_eq!(s.to_string(), "305m 270° 5m/s");
    }
}
