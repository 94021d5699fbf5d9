//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a world-defined climate zone instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub Uuid);

impl ZoneId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ZoneId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier for a weather preset. Built-in and custom presets share
/// one id space; the host client treats these as plain strings.
pub type PresetId = String;

/// Identifier for a scene document, owned by the host client
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneId(pub String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An inclusive temperature range in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempRange {
    pub min: f64,
    pub max: f64,
}

impl TempRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Intersect with an optional preset clamp; collapses to the lower
    /// bound when the ranges do not overlap.
    pub fn clamp_to(&self, min: Option<f64>, max: Option<f64>) -> Self {
        let lo = min.map_or(self.min, |m| self.min.max(m));
        let hi = max.map_or(self.max, |m| self.max.min(m));
        if lo > hi {
            Self { min: lo, max: lo }
        } else {
            Self { min: lo, max: hi }
        }
    }
}

/// Temperature display unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

/// Render a temperature with a degree symbol. Stored values are always
/// Celsius; conversion happens at display time.
pub fn format_temperature(value: f64, unit: TempUnit) -> String {
    match unit {
        TempUnit::Celsius => format!("{:.0}\u{b0}C", value),
        TempUnit::Fahrenheit => format!("{:.0}\u{b0}F", value * 9.0 / 5.0 + 32.0),
    }
}

/// Clamp a value into [0,1]. Every darkness/brightness stage passes
/// through this rather than rejecting out-of-range inputs.
pub fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}
