//! Current weather and forecast records

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;
use crate::climate::SeasonKey;
use crate::core::types::PresetId;
use crate::weather::preset::{Precipitation, WeatherCategory, WeatherPreset, Wind};

/// The weather in effect right now. Replaced wholesale on every set or
/// generate; cleared to `None` by `clear_weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherState {
    pub id: PresetId,
    pub label: String,
    pub icon: String,
    pub color: String,
    pub category: WeatherCategory,
    /// Degrees Celsius
    pub temperature: f64,
    pub wind: Wind,
    pub precipitation: Precipitation,
    pub darkness_penalty: f64,
    pub fx_preset: Option<String>,
    pub environment_base_hue: Option<f64>,
    pub environment_dark_hue: Option<f64>,
    /// Season bucket that was in effect at generation time
    pub season: SeasonKey,
}

impl WeatherState {
    pub fn from_preset(preset: &WeatherPreset, temperature: f64, season: SeasonKey) -> Self {
        Self {
            id: preset.id.clone(),
            label: preset.label.clone(),
            icon: preset.icon.clone(),
            color: preset.color.clone(),
            category: preset.category,
            temperature,
            wind: preset.wind,
            precipitation: preset.precipitation,
            darkness_penalty: preset.darkness_penalty,
            fx_preset: preset.fx_preset.clone(),
            environment_base_hue: preset.environment_base_hue,
            environment_dark_hue: preset.environment_dark_hue,
            season,
        }
    }
}

/// Caller-supplied ad-hoc weather, bypassing the preset registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomWeatherDefinition {
    pub label: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub category: Option<WeatherCategory>,
    pub temperature: Option<f64>,
    pub wind: Option<Wind>,
    pub precipitation: Option<Precipitation>,
    pub darkness_penalty: Option<f64>,
}

impl CustomWeatherDefinition {
    /// Ephemeral state with `id: "custom"`; always succeeds
    pub fn into_state(self, season: SeasonKey) -> WeatherState {
        WeatherState {
            id: "custom".into(),
            label: if self.label.trim().is_empty() {
                "Custom Weather".into()
            } else {
                self.label
            },
            icon: self.icon.unwrap_or_else(|| "cloud".into()),
            color: self.color.unwrap_or_else(|| "#cccccc".into()),
            category: self.category.unwrap_or(WeatherCategory::Clear),
            temperature: self.temperature.unwrap_or(15.0),
            wind: self.wind.unwrap_or_default(),
            precipitation: self.precipitation.unwrap_or_default(),
            darkness_penalty: self.darkness_penalty.unwrap_or(0.0).clamp(0.0, 1.0),
            fx_preset: None,
            environment_base_hue: None,
            environment_dark_hue: None,
            season,
        }
    }
}

/// Reduced preset view carried inside a forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPreset {
    pub id: PresetId,
    pub label: String,
    pub icon: String,
    pub color: String,
}

impl From<&WeatherPreset> for ForecastPreset {
    fn from(preset: &WeatherPreset) -> Self {
        Self {
            id: preset.id.clone(),
            label: preset.label.clone(),
            icon: preset.icon.clone(),
            color: preset.color.clone(),
        }
    }
}

/// One planned day of weather ahead of the current date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub date: CalendarDate,
    pub preset: ForecastPreset,
    pub temperature: f64,
}
