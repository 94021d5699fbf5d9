//! World climate zone instances

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::climate::season::SeasonKey;
use crate::core::types::{PresetId, TempRange, ZoneId};

/// One weighted weather option inside a zone's season bucket
///
/// `chance` is a percentage (0-100) derived from template weights; across
/// the enabled entries of one bucket the chances sum to at most 100.
/// A zero weight always means `enabled = false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonePresetEntry {
    pub preset_id: PresetId,
    pub enabled: bool,
    pub chance: f64,
    /// Zone-level temperature clamp on top of the preset's own clamp
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
}

/// Per-zone overrides for the time-of-day color keyframes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorShift {
    pub dawn_hue: Option<f64>,
    pub midday_hue: Option<f64>,
    pub dusk_hue: Option<f64>,
    pub night_hue: Option<f64>,
    /// Width of the dawn/dusk blend windows, in calendar minutes
    pub transition_minutes: Option<f64>,
}

/// A world-defined climate zone
///
/// Created from a [`ClimateZoneTemplate`](crate::climate::template::ClimateZoneTemplate)
/// or authored by hand; persisted in world settings. One zone may be active
/// globally, and scenes may override it individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateZone {
    pub id: ZoneId,
    pub name: String,
    pub description: String,
    pub temperatures: AHashMap<SeasonKey, TempRange>,
    pub weather: AHashMap<SeasonKey, Vec<ZonePresetEntry>>,
    /// Extra brightness factor applied to every scene in this zone
    pub brightness_multiplier: Option<f64>,
    pub color_shift: Option<ColorShift>,
    /// Ambient hue overrides for the lit / dark lighting records
    pub environment_base_hue: Option<f64>,
    pub environment_dark_hue: Option<f64>,
}

impl ClimateZone {
    /// An empty hand-authored zone
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ZoneId::new(),
            name: name.into(),
            description: String::new(),
            temperatures: AHashMap::new(),
            weather: AHashMap::new(),
            brightness_multiplier: None,
            color_shift: None,
            environment_base_hue: None,
            environment_dark_hue: None,
        }
    }

    /// Temperature range for a season bucket, falling back to the default
    pub fn temperature_range(&self, season: SeasonKey) -> TempRange {
        self.temperatures
            .get(&season)
            .or_else(|| self.temperatures.get(&SeasonKey::Default))
            .copied()
            .unwrap_or(TempRange::new(0.0, 20.0))
    }

    /// Weather entries for a season bucket, falling back to the default
    pub fn entries(&self, season: SeasonKey) -> &[ZonePresetEntry] {
        self.weather
            .get(&season)
            .or_else(|| self.weather.get(&SeasonKey::Default))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Sum of chances over enabled entries for a bucket
    pub fn chance_sum(&self, season: SeasonKey) -> f64 {
        self.entries(season)
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.chance)
            .sum()
    }
}
