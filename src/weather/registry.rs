//! Preset registry - custom CRUD layered over the immutable built-ins

use ahash::AHashMap;

use crate::core::types::PresetId;
use crate::weather::preset::{builtin_presets, WeatherPreset};

/// Custom weather presets layered on the built-in set.
///
/// Built-ins are never mutated or deleted. Custom entries share the same id
/// space; creating one with a built-in id fails. Shape validation happens
/// here rather than trusting every caller.
#[derive(Debug, Clone)]
pub struct WeatherPresetRegistry {
    builtin: Vec<WeatherPreset>,
    custom: AHashMap<PresetId, WeatherPreset>,
    /// Insertion order of custom ids, so listing stays deterministic
    custom_order: Vec<PresetId>,
}

impl WeatherPresetRegistry {
    pub fn new() -> Self {
        Self {
            builtin: builtin_presets(),
            custom: AHashMap::new(),
            custom_order: Vec::new(),
        }
    }

    /// Rebuild from persisted custom presets, dropping invalid records
    pub fn with_custom(custom: Vec<WeatherPreset>) -> Self {
        let mut registry = Self::new();
        for preset in custom {
            if registry.add(preset.clone()).is_none() {
                tracing::warn!(id = %preset.id, "dropping persisted custom preset");
            }
        }
        registry
    }

    pub fn is_builtin(&self, id: &str) -> bool {
        self.builtin.iter().any(|p| p.id == id)
    }

    /// Custom presets shadow nothing: ids are disjoint, so order is cosmetic
    pub fn get(&self, id: &str) -> Option<&WeatherPreset> {
        self.custom
            .get(id)
            .or_else(|| self.builtin.iter().find(|p| p.id == id))
    }

    /// Add a custom preset. Fails on empty/duplicate-builtin ids or an
    /// empty label; replaces an existing custom preset with the same id.
    pub fn add(&mut self, preset: WeatherPreset) -> Option<WeatherPreset> {
        let preset = sanitize(preset)?;
        if self.is_builtin(&preset.id) {
            return None;
        }
        if !self.custom.contains_key(&preset.id) {
            self.custom_order.push(preset.id.clone());
        }
        self.custom.insert(preset.id.clone(), preset.clone());
        Some(preset)
    }

    /// Update an existing custom preset. Built-ins cannot be updated.
    pub fn update(&mut self, preset: WeatherPreset) -> bool {
        let Some(preset) = sanitize(preset) else {
            return false;
        };
        if !self.custom.contains_key(&preset.id) {
            return false;
        }
        self.custom.insert(preset.id.clone(), preset);
        true
    }

    /// Remove a custom preset. Built-ins cannot be removed.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.custom.remove(id).is_some() {
            self.custom_order.retain(|c| c != id);
            true
        } else {
            false
        }
    }

    /// Built-in then custom, each carrying at least id/label/icon/color/category
    pub fn list_all(&self) -> Vec<&WeatherPreset> {
        self.builtin
            .iter()
            .chain(self.custom_order.iter().filter_map(|id| self.custom.get(id)))
            .collect()
    }

    pub fn custom_presets(&self) -> Vec<&WeatherPreset> {
        self.custom_order
            .iter()
            .filter_map(|id| self.custom.get(id))
            .collect()
    }
}

impl Default for WeatherPresetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Boundary validation: reject unusable records, clamp the rest into shape
fn sanitize(mut preset: WeatherPreset) -> Option<WeatherPreset> {
    if preset.id.trim().is_empty() || preset.label.trim().is_empty() {
        return None;
    }
    preset.darkness_penalty = preset.darkness_penalty.clamp(0.0, 1.0);
    preset.precipitation.intensity = preset.precipitation.intensity.clamp(0.0, 1.0);
    if let (Some(min), Some(max)) = (preset.temp_min, preset.temp_max) {
        if min > max {
            preset.temp_min = Some(max);
            preset.temp_max = Some(min);
        }
    }
    Some(preset)
}
