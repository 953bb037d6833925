//! Editable wind layer configuration.
//!
//! Levels are edited one at a time by index. Every edit is followed by a
//! normalization pass that propagates it to neighbouring levels, so a user
//! filling in a table from the ground up only has to touch the levels that
//! actually change.

use crate::core_types::units::{Meters, MetersPerSecond, Radians};
use crate::error::WindError;
use crate::interpolation::MultiLevelWind;
use crate::layers::{LayerTable, WindLayerSample};
use crate::turbulence::{PinkNoiseTurbulence, TurbulenceParameters, DEFAULT_SEED};
use serde::{Deserialize, Serialize};

/// Default level layout
pub mod defaults {
    /// Number of levels in the default configuration
    pub const LEVEL_COUNT: usize = 13;

    /// Levels specified in feet (the low, aviation-style part of the table)
    pub const FEET_LEVELS: [f64; 8] = [0.0, 1000.0, 2000.0, 2500.0, 3000.0, 5000.0, 6400.0, 9842.0];

    /// Levels specified in meters
    pub const METER_LEVELS: [f64; 5] = [4200.0, 5500.0, 7000.0, 9000.0, 10000.0];

    /// Maximum number of levels listed in the summary label
    pub const SUMMARY_LINES: usize = 5;
}

/// Altitudes of the default levels, lowest first
pub fn default_altitudes() -> [Meters; defaults::LEVEL_COUNT] {
    let mut altitudes = [Meters::new(0.0); defaults::LEVEL_COUNT];
    let feet = defaults::FEET_LEVELS.iter().map(|&ft| Meters::from_feet(ft));
    let meters = defaults::METER_LEVELS.iter().map(|&m| Meters::new(m));
    for (slot, altitude) in altitudes.iter_mut().zip(feet.chain(meters)) {
        *slot = altitude;
    }
    altitudes
}

/// What an edit changed, with the value it replaced
#[derive(Debug, Clone, Copy)]
enum LayerEdit {
    Speed { previous: MetersPerSecond },
    Altitude,
    Direction { previous: Radians },
}

/// Ordered list of editable wind levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindLayerConfig {
    levels: Vec<WindLayerSample>,
}

impl Default for WindLayerConfig {
    fn default() -> Self {
        Self::with_global_wind(MetersPerSecond::new(0.0), Radians::new(0.0))
    }
}

impl WindLayerConfig {
    /// Default level altitudes, each carrying the same global wind
    pub fn with_global_wind(speed: MetersPerSecond, direction: Radians) -> Self {
        let levels = default_altitudes()
            .into_iter()
            .map(|altitude| WindLayerSample::new(altitude, speed, direction))
            .collect();
        Self { levels }
    }

    /// Use `levels` as given; call [`validate`](Self::validate) before use
    pub fn from_levels(levels: Vec<WindLayerSample>) -> Self {
        Self { levels }
    }

    /// Configured levels in table order
    pub fn levels(&self) -> &[WindLayerSample] {
        &self.levels
    }

    /// Level at `index`, if present
    pub fn level(&self, index: usize) -> Option<&WindLayerSample> {
        self.levels.get(index)
    }

    /// Number of configured levels
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether no levels are configured
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    fn check_index(&self, index: usize) -> Result<(), WindError> {
        if index < self.levels.len() {
            Ok(())
        } else {
            Err(WindError::LayerIndexOutOfRange {
                index,
                len: self.levels.len(),
            })
        }
    }

    /// Set the speed of level `index`.
    ///
    /// Following levels at the same altitude, or still carrying the old
    /// speed, take the new speed too. Propagation stops at the first level
    /// that matches neither.
    ///
    /// # Errors
    ///
    /// Returns [`WindError::LayerIndexOutOfRange`] for an unknown level.
    pub fn set_speed(&mut self, index: usize, speed: MetersPerSecond) -> Result<(), WindError> {
        self.check_index(index)?;
        let previous = self.levels[index].speed;
        self.levels[index].speed = speed;
        self.normalize_after(index, LayerEdit::Speed { previous });
        Ok(())
    }

    /// Set the altitude of level `index`.
    ///
    /// Earlier levels above the new altitude and later levels below it are
    /// moved to it, so the list stays sorted.
    ///
    /// # Errors
    ///
    /// Returns [`WindError::LayerIndexOutOfRange`] for an unknown level.
    pub fn set_altitude(&mut self, index: usize, altitude: Meters) -> Result<(), WindError> {
        self.check_index(index)?;
        self.levels[index].altitude = altitude;
        self.normalize_after(index, LayerEdit::Altitude);
        Ok(())
    }

    /// Set the direction of level `index`.
    ///
    /// Following levels still carrying the old direction take the new one;
    /// propagation stops at the first level that differs.
    ///
    /// # Errors
    ///
    /// Returns [`WindError::LayerIndexOutOfRange`] for an unknown level.
    pub fn set_direction(&mut self, index: usize, direction: Radians) -> Result<(), WindError> {
        self.check_index(index)?;
        let previous = self.levels[index].direction;
        self.levels[index].direction = direction;
        self.normalize_after(index, LayerEdit::Direction { previous });
        Ok(())
    }

    /// Propagate the edit already written at `index` to the other levels
    fn normalize_after(&mut self, index: usize, edit: LayerEdit) {
        let edited = self.levels[index];
        match edit {
            LayerEdit::Speed { previous } => {
                for level in &mut self.levels[index + 1..] {
                    if level.altitude != edited.altitude && level.speed != previous {
                        break;
                    }
                    level.speed = edited.speed;
                }
            }
            LayerEdit::Altitude => {
                let h = edited.altitude.value();
                for (i, level) in self.levels.iter_mut().enumerate() {
                    let clamp = (i < index && level.altitude.value() > h)
                        || (i > index && level.altitude.value() < h);
                    if clamp {
                        level.altitude = edited.altitude;
                    }
                }
            }
            LayerEdit::Direction { previous } => {
                for level in &mut self.levels[index + 1..] {
                    if level.direction != previous {
                        break;
                    }
                    level.direction = edited.direction;
                }
            }
        }
    }

    /// Number of levels up to and including the last one that differs from
    /// its predecessor in speed or direction.
    ///
    /// Trailing copies of the level below add nothing to the profile.
    pub fn used_levels(&self) -> usize {
        if self.levels.is_empty() {
            return 0;
        }
        let mut last = self.levels.len() - 1;
        while last > 0 {
            let (below, level) = (self.levels[last - 1], self.levels[last]);
            if level.direction != below.direction || level.speed != below.speed {
                break;
            }
            last -= 1;
        }
        last + 1
    }

    /// Short multi-line label listing the first used levels in feet,
    /// degrees and miles per hour.
    pub fn summary(&self) -> String {
        let mut label = String::from("Multi Level Wind");
        let shown = self.used_levels().min(defaults::SUMMARY_LINES);
        for level in &self.levels[..shown] {
            label.push('\n');
            label.push_str(&format!(
                "{}ft {}° {}mph",
                level.altitude.to_feet().round() as i64,
                level.direction.to_degrees().value().round() as i64,
                level.speed.to_mph().round() as i64
            ));
        }
        label.push_str("...");
        label
    }

    /// Check the levels can form a layer table.
    ///
    /// # Errors
    ///
    /// Returns [`WindError::EmptyLayerTable`] with no levels, or
    /// [`WindError::UnsortedLayers`] at the first level below its
    /// predecessor.
    pub fn validate(&self) -> Result<(), WindError> {
        if self.levels.is_empty() {
            return Err(WindError::EmptyLayerTable);
        }
        for (i, pair) in self.levels.windows(2).enumerate() {
            if pair[1].altitude.value() < pair[0].altitude.value() {
                return Err(WindError::UnsortedLayers { index: i + 1 });
            }
        }
        Ok(())
    }

    /// Validated layer table for the interpolation engine.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn layer_table(&self) -> Result<LayerTable, WindError> {
        self.validate()?;
        LayerTable::new(&self.levels)
    }

    /// Build a pink-noise engine over these levels.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn build_model(
        &self,
        parameters: TurbulenceParameters,
        seed: u64,
    ) -> Result<MultiLevelWind<PinkNoiseTurbulence>, WindError> {
        Ok(MultiLevelWind::new(
            self.layer_table()?,
            parameters,
            PinkNoiseTurbulence::with_seed(seed),
        ))
    }
}

/// Everything needed to start a multi-level wind run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiLevelWindConfig {
    pub layers: WindLayerConfig,
    pub turbulence: TurbulenceParameters,
    pub seed: u64,
}

impl Default for MultiLevelWindConfig {
    fn default() -> Self {
        Self {
            layers: WindLayerConfig::default(),
            turbulence: TurbulenceParameters::default(),
            seed: DEFAULT_SEED,
        }
    }
}

impl MultiLevelWindConfig {
    /// # Errors
    ///
    /// See [`WindLayerConfig::validate`].
    pub fn build(&self) -> Result<MultiLevelWind<PinkNoiseTurbulence>, WindError> {
        self.layers.build_model(self.turbulence, self.seed)
    }
}
