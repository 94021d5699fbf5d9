//! Weather presets - named archetypes with visual and physical attributes

use serde::{Deserialize, Serialize};

use crate::core::types::PresetId;

/// Coarse weather family, used for inertia matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCategory {
    Clear,
    Cloudy,
    Fog,
    Rain,
    Storm,
    Snow,
    Wind,
    Heat,
}

/// What is falling from the sky
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecipKind {
    #[default]
    None,
    Rain,
    Snow,
    Sleet,
    Hail,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Precipitation {
    pub kind: PrecipKind,
    /// 0.0 (none) to 1.0 (torrential)
    pub intensity: f64,
}

impl Precipitation {
    pub fn new(kind: PrecipKind, intensity: f64) -> Self {
        Self { kind, intensity }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wind {
    /// Speed in km/h
    pub speed: f64,
    /// Compass direction in degrees, 0 = north
    pub direction: f64,
}

impl Wind {
    pub fn new(speed: f64, direction: f64) -> Self {
        Self { speed, direction }
    }
}

/// A weather archetype. Built-ins are never mutated or deleted; custom
/// presets share the same id space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPreset {
    pub id: PresetId,
    pub label: String,
    pub icon: String,
    /// Display color as `#rrggbb`
    pub color: String,
    pub category: WeatherCategory,
    /// Clamp on the generated temperature, intersected with the zone range
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub precipitation: Precipitation,
    pub wind: Wind,
    /// Additive scene darkness for severe weather (0-1)
    pub darkness_penalty: f64,
    /// When set and the particle-effect integration is active, visual and
    /// darkness handling is deferred to the FX layer
    pub fx_preset: Option<String>,
    /// Ambient hue overrides for the lit / dark lighting records
    pub environment_base_hue: Option<f64>,
    pub environment_dark_hue: Option<f64>,
}

impl WeatherPreset {
    fn new(
        id: &str,
        label: &str,
        icon: &str,
        color: &str,
        category: WeatherCategory,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: icon.into(),
            color: color.into(),
            category,
            temp_min: None,
            temp_max: None,
            precipitation: Precipitation::default(),
            wind: Wind::new(5.0, 0.0),
            darkness_penalty: 0.0,
            fx_preset: None,
            environment_base_hue: None,
            environment_dark_hue: None,
        }
    }

    fn clamp(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.temp_min = min;
        self.temp_max = max;
        self
    }

    fn precip(mut self, kind: PrecipKind, intensity: f64) -> Self {
        self.precipitation = Precipitation::new(kind, intensity);
        self
    }

    fn wind(mut self, speed: f64) -> Self {
        self.wind.speed = speed;
        self
    }

    fn darkness(mut self, penalty: f64) -> Self {
        self.darkness_penalty = penalty;
        self
    }

    fn fx(mut self, preset: &str) -> Self {
        self.fx_preset = Some(preset.into());
        self
    }

    fn dark_hue(mut self, hue: f64) -> Self {
        self.environment_dark_hue = Some(hue);
        self
    }
}

/// The immutable built-in preset set
pub fn builtin_presets() -> Vec<WeatherPreset> {
    use WeatherCategory::*;
    vec![
        WeatherPreset::new("clear", "Clear Skies", "sun", "#f5d061", Clear),
        WeatherPreset::new("cloudy", "Scattered Clouds", "cloud-sun", "#c8d3dc", Cloudy),
        WeatherPreset::new("overcast", "Overcast", "cloud", "#9aa7b0", Cloudy)
            .darkness(0.05),
        WeatherPreset::new("fog", "Fog", "smog", "#b8bcbe", Fog)
            .clamp(Some(-5.0), Some(20.0))
            .darkness(0.1)
            .fx("fog"),
        WeatherPreset::new("rain", "Rain", "cloud-rain", "#5b7d9e", Rain)
            .clamp(Some(1.0), None)
            .precip(PrecipKind::Rain, 0.4)
            .wind(15.0)
            .darkness(0.1)
            .fx("rain"),
        WeatherPreset::new("downpour", "Downpour", "cloud-showers-heavy", "#3d5a78", Rain)
            .clamp(Some(2.0), None)
            .precip(PrecipKind::Rain, 0.9)
            .wind(25.0)
            .darkness(0.2)
            .fx("rainstorm"),
        WeatherPreset::new("thunderstorm", "Thunderstorm", "cloud-bolt", "#41455e", Storm)
            .clamp(Some(5.0), None)
            .precip(PrecipKind::Rain, 0.8)
            .wind(40.0)
            .darkness(0.3)
            .fx("storm")
            .dark_hue(250.0),
        WeatherPreset::new("snow", "Snowfall", "snowflake", "#e8f0f6", Snow)
            .clamp(None, Some(0.0))
            .precip(PrecipKind::Snow, 0.5)
            .darkness(0.05)
            .fx("snow"),
        WeatherPreset::new("blizzard", "Blizzard", "wind", "#d3e2ec", Snow)
            .clamp(None, Some(-5.0))
            .precip(PrecipKind::Snow, 1.0)
            .wind(55.0)
            .darkness(0.35)
            .fx("blizzard"),
        WeatherPreset::new("hail", "Hail", "cloud-meatball", "#aebfca", Storm)
            .clamp(Some(-2.0), Some(12.0))
            .precip(PrecipKind::Hail, 0.7)
            .wind(30.0)
            .darkness(0.2),
        WeatherPreset::new("sleet", "Sleet", "cloud-sleet", "#9fb4c2", Rain)
            .clamp(Some(-4.0), Some(3.0))
            .precip(PrecipKind::Sleet, 0.5)
            .wind(20.0)
            .darkness(0.15),
        WeatherPreset::new("windstorm", "Windstorm", "wind", "#c2beae", Wind)
            .wind(70.0)
            .darkness(0.1),
        WeatherPreset::new("heatwave", "Heatwave", "temperature-high", "#e8803c", Heat)
            .clamp(Some(30.0), None),
    ]
}
