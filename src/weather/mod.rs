//! Weather: presets, registry, generation, and history

pub mod generator;
pub mod history;
pub mod preset;
pub mod registry;
pub mod state;

pub use generator::{GenerateOptions, WeatherGenerator};
pub use history::{DayRecord, WeatherHistoryStore};
pub use preset::{builtin_presets, PrecipKind, Precipitation, WeatherCategory, WeatherPreset, Wind};
pub use registry::WeatherPresetRegistry;
pub use state::{CustomWeatherDefinition, ForecastEntry, ForecastPreset, WeatherState};
