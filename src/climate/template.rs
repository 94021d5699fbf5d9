//! Climate zone template catalog
//!
//! Static, immutable region profiles. World zones are instantiated as deep
//! copies so later template revisions never mutate existing worlds.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::climate::season::{normalize_season_name, SeasonKey};
use crate::climate::zone::{ClimateZone, ZonePresetEntry};
use crate::core::types::{PresetId, TempRange, ZoneId};

/// An immutable catalog entry describing a region's climate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateZoneTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Per-season temperature ranges; must contain [`SeasonKey::Default`]
    pub temperatures: AHashMap<SeasonKey, TempRange>,
    /// Per-season weather weight tables in declaration order; must contain
    /// [`SeasonKey::Default`]. Weights are relative, not percentages.
    pub weather: AHashMap<SeasonKey, Vec<(PresetId, f64)>>,
}

impl ClimateZoneTemplate {
    /// Temperature range for a season, falling back to the default bucket
    pub fn temperature_for(&self, season: SeasonKey) -> TempRange {
        self.temperatures
            .get(&season)
            .or_else(|| self.temperatures.get(&SeasonKey::Default))
            .copied()
            .unwrap_or(TempRange::new(0.0, 20.0))
    }

    fn weights_for(&self, season: SeasonKey) -> &[(PresetId, f64)] {
        self.weather
            .get(&season)
            .or_else(|| self.weather.get(&SeasonKey::Default))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every preset id referenced by any bucket, first-encountered order
    fn all_preset_ids(&self) -> Vec<PresetId> {
        let mut seen = Vec::new();
        for key in SeasonKey::ALL {
            if let Some(table) = self.weather.get(&key) {
                for (id, _) in table {
                    if !seen.contains(id) {
                        seen.push(id.clone());
                    }
                }
            }
        }
        seen
    }
}

/// The static template catalog
#[derive(Debug, Clone)]
pub struct ClimateZoneCatalog {
    templates: Vec<ClimateZoneTemplate>,
}

impl ClimateZoneCatalog {
    /// Catalog with the built-in templates only
    pub fn builtin() -> Self {
        Self {
            templates: builtin_templates(),
        }
    }

    /// Extend the catalog with extra templates (e.g. a loaded TOML pack).
    /// Later ids shadow earlier ones.
    pub fn extend(&mut self, extra: Vec<ClimateZoneTemplate>) {
        for template in extra {
            if let Some(slot) = self.templates.iter_mut().find(|t| t.id == template.id) {
                *slot = template;
            } else {
                self.templates.push(template);
            }
        }
    }

    pub fn get_template(&self, id: &str) -> Option<&ClimateZoneTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn list_template_ids(&self) -> Vec<String> {
        self.templates.iter().map(|t| t.id.clone()).collect()
    }

    pub fn templates(&self) -> &[ClimateZoneTemplate] {
        &self.templates
    }

    /// Build a world zone from a template, resolving the calendar's season
    /// names against the template's canonical buckets. Returns `None` for
    /// unknown template ids.
    pub fn instantiate(&self, template_id: &str, season_names: &[String]) -> Option<ClimateZone> {
        let template = self.get_template(template_id)?;

        let mut buckets: Vec<SeasonKey> = season_names
            .iter()
            .map(|n| normalize_season_name(n))
            .collect();
        if !buckets.contains(&SeasonKey::Default) {
            buckets.push(SeasonKey::Default);
        }

        let preset_ids = template.all_preset_ids();
        let mut temperatures = AHashMap::new();
        let mut weather = AHashMap::new();

        for &bucket in &buckets {
            temperatures.insert(bucket, template.temperature_for(bucket));

            let table = template.weights_for(bucket);
            let total: f64 = table.iter().map(|(_, w)| w.max(0.0)).sum();
            let mut entries: Vec<ZonePresetEntry> = preset_ids
                .iter()
                .map(|id| {
                    let weight = table
                        .iter()
                        .find(|(pid, _)| pid == id)
                        .map(|(_, w)| w.max(0.0))
                        .unwrap_or(0.0);
                    let chance = if total > 0.0 {
                        (weight / total * 10_000.0).round() / 100.0
                    } else {
                        0.0
                    };
                    ZonePresetEntry {
                        preset_id: id.clone(),
                        enabled: chance > 0.0,
                        chance,
                        temp_min: None,
                        temp_max: None,
                    }
                })
                .collect();

            // Per-entry rounding can overshoot the whole (six equal weights
            // round to 16.67 each); dock the excess from the largest share
            // so enabled chances never total more than 100
            let sum: f64 = entries.iter().map(|e| e.chance).sum();
            if sum > 100.0 {
                if let Some(largest) = entries
                    .iter_mut()
                    .max_by(|a, b| a.chance.total_cmp(&b.chance))
                {
                    largest.chance = (largest.chance - (sum - 100.0)).max(0.0);
                }
            }
            weather.insert(bucket, entries);
        }

        Some(ClimateZone {
            id: ZoneId::new(),
            name: template.name.clone(),
            description: template.description.clone(),
            temperatures,
            weather,
            brightness_multiplier: None,
            color_shift: None,
            environment_base_hue: None,
            environment_dark_hue: None,
        })
    }
}

fn table(entries: &[(&str, f64)]) -> Vec<(PresetId, f64)> {
    entries.iter().map(|(id, w)| (id.to_string(), *w)).collect()
}

fn builtin_templates() -> Vec<ClimateZoneTemplate> {
    vec![
        ClimateZoneTemplate {
            id: "temperate".into(),
            name: "Temperate".into(),
            description: "Mild seasons with regular rainfall".into(),
            temperatures: AHashMap::from_iter([
                (SeasonKey::Spring, TempRange::new(5.0, 18.0)),
                (SeasonKey::Summer, TempRange::new(15.0, 30.0)),
                (SeasonKey::Autumn, TempRange::new(4.0, 16.0)),
                (SeasonKey::Winter, TempRange::new(-8.0, 6.0)),
                (SeasonKey::Default, TempRange::new(0.0, 20.0)),
            ]),
            weather: AHashMap::from_iter([
                (
                    SeasonKey::Summer,
                    table(&[
                        ("clear", 40.0),
                        ("cloudy", 20.0),
                        ("rain", 15.0),
                        ("thunderstorm", 10.0),
                        ("heatwave", 5.0),
                        ("fog", 10.0),
                    ]),
                ),
                (
                    SeasonKey::Winter,
                    table(&[
                        ("clear", 20.0),
                        ("overcast", 25.0),
                        ("snow", 25.0),
                        ("blizzard", 10.0),
                        ("sleet", 10.0),
                        ("fog", 10.0),
                    ]),
                ),
                (
                    SeasonKey::Default,
                    table(&[
                        ("clear", 30.0),
                        ("cloudy", 25.0),
                        ("rain", 20.0),
                        ("overcast", 10.0),
                        ("fog", 10.0),
                        ("windstorm", 5.0),
                    ]),
                ),
            ]),
        },
        ClimateZoneTemplate {
            id: "tropical".into(),
            name: "Tropical".into(),
            description: "Hot and humid with heavy seasonal downpours".into(),
            temperatures: AHashMap::from_iter([
                (SeasonKey::Summer, TempRange::new(26.0, 40.0)),
                (SeasonKey::Winter, TempRange::new(20.0, 30.0)),
                (SeasonKey::Default, TempRange::new(22.0, 34.0)),
            ]),
            weather: AHashMap::from_iter([
                (
                    SeasonKey::Summer,
                    table(&[
                        ("clear", 25.0),
                        ("downpour", 25.0),
                        ("thunderstorm", 25.0),
                        ("rain", 15.0),
                        ("heatwave", 10.0),
                    ]),
                ),
                (
                    SeasonKey::Default,
                    table(&[
                        ("clear", 35.0),
                        ("rain", 25.0),
                        ("downpour", 15.0),
                        ("thunderstorm", 15.0),
                        ("cloudy", 10.0),
                    ]),
                ),
            ]),
        },
        ClimateZoneTemplate {
            id: "desert".into(),
            name: "Desert".into(),
            description: "Scorching days, cold nights, almost no rain".into(),
            temperatures: AHashMap::from_iter([
                (SeasonKey::Summer, TempRange::new(30.0, 48.0)),
                (SeasonKey::Winter, TempRange::new(2.0, 22.0)),
                (SeasonKey::Default, TempRange::new(15.0, 38.0)),
            ]),
            weather: AHashMap::from_iter([(
                SeasonKey::Default,
                table(&[
                    ("clear", 60.0),
                    ("heatwave", 15.0),
                    ("windstorm", 15.0),
                    ("cloudy", 8.0),
                    ("rain", 2.0),
                ]),
            )]),
        },
        ClimateZoneTemplate {
            id: "arctic".into(),
            name: "Arctic".into(),
            description: "Frozen wastes where summer barely thaws the ground".into(),
            temperatures: AHashMap::from_iter([
                (SeasonKey::Summer, TempRange::new(-5.0, 8.0)),
                (SeasonKey::Winter, TempRange::new(-40.0, -15.0)),
                (SeasonKey::Default, TempRange::new(-25.0, 0.0)),
            ]),
            weather: AHashMap::from_iter([(
                SeasonKey::Default,
                table(&[
                    ("clear", 25.0),
                    ("snow", 30.0),
                    ("blizzard", 20.0),
                    ("overcast", 15.0),
                    ("fog", 10.0),
                ]),
            )]),
        },
        ClimateZoneTemplate {
            id: "coastal".into(),
            name: "Coastal".into(),
            description: "Sea winds, fog banks, and sudden squalls".into(),
            temperatures: AHashMap::from_iter([
                (SeasonKey::Summer, TempRange::new(14.0, 26.0)),
                (SeasonKey::Winter, TempRange::new(0.0, 10.0)),
                (SeasonKey::Default, TempRange::new(6.0, 20.0)),
            ]),
            weather: AHashMap::from_iter([(
                SeasonKey::Default,
                table(&[
                    ("clear", 25.0),
                    ("fog", 20.0),
                    ("rain", 20.0),
                    ("windstorm", 15.0),
                    ("cloudy", 15.0),
                    ("thunderstorm", 5.0),
                ]),
            )]),
        },
        ClimateZoneTemplate {
            id: "highland".into(),
            name: "Highland".into(),
            description: "Thin air, fast-moving weather, snow above the treeline".into(),
            temperatures: AHashMap::from_iter([
                (SeasonKey::Summer, TempRange::new(4.0, 18.0)),
                (SeasonKey::Winter, TempRange::new(-20.0, -2.0)),
                (SeasonKey::Default, TempRange::new(-8.0, 12.0)),
            ]),
            weather: AHashMap::from_iter([(
                SeasonKey::Default,
                table(&[
                    ("clear", 25.0),
                    ("cloudy", 20.0),
                    ("windstorm", 15.0),
                    ("snow", 15.0),
                    ("rain", 10.0),
                    ("fog", 10.0),
                    ("hail", 5.0),
                ]),
            )]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_lookup() {
        let catalog = ClimateZoneCatalog::builtin();
        assert!(catalog.get_template("temperate").is_some());
        assert!(catalog.get_template("volcanic").is_none());
        assert_eq!(catalog.list_template_ids().len(), 6);
    }

    #[test]
    fn test_every_template_has_default_buckets() {
        let catalog = ClimateZoneCatalog::builtin();
        for template in catalog.templates() {
            assert!(
                template.temperatures.contains_key(&SeasonKey::Default),
                "{} missing default temperatures",
                template.id
            );
            assert!(
                template.weather.contains_key(&SeasonKey::Default),
                "{} missing default weather",
                template.id
            );
        }
    }

    #[test]
    fn test_instantiate_converts_weights_to_chances() {
        let catalog = ClimateZoneCatalog::builtin();
        let zone = catalog
            .instantiate("desert", &["Summer".into(), "Winter".into()])
            .unwrap();

        let entries = zone.entries(SeasonKey::Default);
        let sum: f64 = entries.iter().filter(|e| e.enabled).map(|e| e.chance).sum();
        assert!(sum <= 100.0 + 1e-9);
        assert!(sum > 99.0);

        // Disabled entries carry zero chance
        for entry in entries {
            if !entry.enabled {
                assert_eq!(entry.chance, 0.0);
            }
        }
    }

    #[test]
    fn test_instantiate_caps_rounding_overshoot() {
        // Six equal weights round to 16.67 each, 100.02 in total; the
        // overshoot must be docked so the sum stays at or under 100
        let mut catalog = ClimateZoneCatalog::builtin();
        catalog.extend(vec![ClimateZoneTemplate {
            id: "sixways".into(),
            name: "Six Ways".into(),
            description: String::new(),
            temperatures: AHashMap::from_iter([(SeasonKey::Default, TempRange::new(0.0, 20.0))]),
            weather: AHashMap::from_iter([(
                SeasonKey::Default,
                table(&[
                    ("clear", 1.0),
                    ("cloudy", 1.0),
                    ("fog", 1.0),
                    ("rain", 1.0),
                    ("snow", 1.0),
                    ("hail", 1.0),
                ]),
            )]),
        }]);

        let zone = catalog.instantiate("sixways", &[]).unwrap();
        let sum = zone.chance_sum(SeasonKey::Default);
        assert!(sum <= 100.0 + 1e-9, "chance sum {} exceeds 100", sum);
        assert!(sum > 99.9);

        // Only one entry absorbs the correction
        let docked: Vec<f64> = zone
            .entries(SeasonKey::Default)
            .iter()
            .filter(|e| e.enabled && (e.chance - 16.67).abs() > 1e-9)
            .map(|e| e.chance)
            .collect();
        assert_eq!(docked.len(), 1);
        assert!((docked[0] - 16.65).abs() < 1e-9);
    }

    #[test]
    fn test_instantiate_maps_free_text_seasons() {
        let catalog = ClimateZoneCatalog::builtin();
        let zone = catalog
            .instantiate("temperate", &["Vernal Thaw".into(), "The Long Winter".into()])
            .unwrap();

        // Spring has no dedicated temperate winter table, so the winter
        // bucket must exist and the spring bucket falls back where needed
        assert!(zone.temperatures.contains_key(&SeasonKey::Spring));
        assert!(zone.temperatures.contains_key(&SeasonKey::Winter));
        assert!(zone.temperatures.contains_key(&SeasonKey::Default));
    }

    #[test]
    fn test_instantiate_unknown_template() {
        let catalog = ClimateZoneCatalog::builtin();
        assert!(catalog.instantiate("atlantis", &[]).is_none());
    }

    #[test]
    fn test_instantiated_zone_is_a_copy() {
        let catalog = ClimateZoneCatalog::builtin();
        let a = catalog.instantiate("temperate", &[]).unwrap();
        let b = catalog.instantiate("temperate", &[]).unwrap();
        assert_ne!(a.id, b.id);
    }
}
