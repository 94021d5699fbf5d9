//! World settings persistence
//!
//! The host client exposes arbitrary key-value world storage with its own
//! replication. The engine mirrors its state there so a reload (or another
//! client) can rehydrate. Values are JSON documents.

use ahash::AHashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::error::Result;

/// Stable setting keys
pub mod keys {
    pub const CURRENT_WEATHER: &str = "tempestry.currentWeather";
    pub const WEATHER_HISTORY: &str = "tempestry.weatherHistory";
    pub const FORECAST_PLAN: &str = "tempestry.forecastPlan";
    pub const CUSTOM_PRESETS: &str = "tempestry.customPresets";
    pub const ZONES: &str = "tempestry.zones";
    pub const ACTIVE_ZONE: &str = "tempestry.activeZone";
    pub const CONFIG: &str = "tempestry.config";
}

/// World-scoped key-value storage provided by the host
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<serde_json::Value>;
    fn set(&mut self, key: &str, value: serde_json::Value) -> Result<()>;
}

/// Deserialize a stored value, tolerating missing or malformed records
pub fn load<T: DeserializeOwned>(store: &dyn SettingsStore, key: &str) -> Option<T> {
    let value = store.get(key)?;
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring malformed setting");
            None
        }
    }
}

/// Serialize and store a value under a key
pub fn save<T: Serialize>(store: &mut dyn SettingsStore, key: &str, value: &T) -> Result<()> {
    store.set(key, serde_json::to_value(value)?)
}

/// In-memory settings for the demo binary and tests
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: AHashMap<String, serde_json::Value>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: serde_json::Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
