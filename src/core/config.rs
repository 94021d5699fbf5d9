//! Environment configuration with documented constants
//!
//! All tunable numbers for the weather/lighting simulation are collected
//! here with explanations of their purpose and how they interact.

use serde::{Deserialize, Serialize};

use crate::core::types::TempUnit;

/// Which scenes the synchronizer touches on each recompute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncScope {
    /// Only the currently active scene
    #[default]
    ActiveScene,
    /// Every scene whose darkness-sync flag is enabled
    AllSyncedScenes,
}

/// Configuration for the environmental simulation
///
/// Constructed once per world session and passed explicitly; there is no
/// global config instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    // === WEATHER GENERATION ===
    /// Bias toward repeating the previous day's weather category (0.0-1.0)
    ///
    /// At 0.0 every generation is an independent weighted draw. At 1.0 the
    /// previous category's entries get an extra weight equal to the whole
    /// bucket, so repeats dominate without being guaranteed.
    pub weather_inertia: f64,

    /// Probability (0-100) that an existing forecast entry is honored
    /// verbatim when weather is generated for its date.
    pub forecast_accuracy: f64,

    /// How many days ahead the forecast plan extends.
    pub forecast_days: u32,

    /// Whether a GM weather override clears the forecast entry for that
    /// date. Disabled worlds keep the stale forecast visible.
    pub override_clears_forecast: bool,

    // === HISTORY ===
    /// Maximum number of daily history records retained. Older entries are
    /// pruned lazily on write.
    pub history_retention_days: usize,

    // === LIGHTING ===
    /// World-default scene brightness multiplier, used when a scene does
    /// not carry its own flag.
    pub default_brightness: f64,

    /// Couple scene darkness to moon phases at night.
    pub moon_sync: bool,

    /// Couple scene darkness and ambient color to the current weather.
    pub weather_sync: bool,

    /// Enable the time-of-day ambient color blend.
    pub color_shift: bool,

    // === SYNCHRONIZATION ===
    /// Which scenes receive environment writes.
    pub sync_scope: SyncScope,

    // === DISPLAY ===
    /// Unit used by temperature formatting.
    pub temp_unit: TempUnit,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            weather_inertia: 0.3,
            forecast_accuracy: 70.0,
            forecast_days: 7,
            override_clears_forecast: true,
            history_retention_days: 365,
            default_brightness: 1.0,
            moon_sync: true,
            weather_sync: true,
            color_shift: true,
            sync_scope: SyncScope::ActiveScene,
            temp_unit: TempUnit::Celsius,
        }
    }
}

impl EnvironmentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.weather_inertia) {
            return Err(format!(
                "weather_inertia ({}) must be within 0.0..=1.0",
                self.weather_inertia
            ));
        }

        if !(0.0..=100.0).contains(&self.forecast_accuracy) {
            return Err(format!(
                "forecast_accuracy ({}) must be within 0..=100",
                self.forecast_accuracy
            ));
        }

        if self.history_retention_days == 0 {
            return Err("history_retention_days must be at least 1".into());
        }

        Ok(())
    }
}
