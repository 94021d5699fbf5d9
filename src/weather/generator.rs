//! Procedural weather generation with forecast planning and inertia

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::calendar::CalendarDate;
use crate::climate::{ClimateZone, SeasonKey, ZonePresetEntry};
use crate::core::types::TempRange;
use crate::weather::preset::{Precipitation, WeatherPreset, Wind};
use crate::weather::registry::WeatherPresetRegistry;
use crate::weather::state::{ForecastEntry, WeatherState};

/// Caller overrides that always win verbatim over generated values
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub temperature: Option<f64>,
    pub wind: Option<Wind>,
    pub precipitation: Option<Precipitation>,
}

/// Weighted weather generator. Owns the world RNG; same seed and call
/// sequence reproduce the same draws.
#[derive(Debug, Clone)]
pub struct WeatherGenerator {
    rng: ChaCha8Rng,
}

impl WeatherGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generate weather for the resolved season bucket of a zone.
    ///
    /// When `forecast` carries a plan for the target date, a roll against
    /// `forecast_accuracy` (0-100) decides whether the plan is honored
    /// verbatim instead of redrawing. `previous` feeds the inertia bias.
    pub fn generate(
        &mut self,
        season: SeasonKey,
        zone: &ClimateZone,
        registry: &WeatherPresetRegistry,
        previous: Option<&WeatherState>,
        forecast: Option<&ForecastEntry>,
        inertia: f64,
        forecast_accuracy: f64,
        options: &GenerateOptions,
    ) -> WeatherState {
        if let Some(entry) = forecast {
            let roll = self.rng.gen::<f64>() * 100.0;
            if roll < forecast_accuracy {
                if let Some(preset) = registry.get(&entry.preset.id) {
                    tracing::debug!(preset = %entry.preset.id, "honoring forecast entry");
                    let mut state =
                        WeatherState::from_preset(preset, entry.temperature, season);
                    apply_options(&mut state, options);
                    return state;
                }
            }
        }

        let (preset, zone_entry) = self.draw_preset(season, zone, registry, previous, inertia);
        let range = zone
            .temperature_range(season)
            .clamp_to(preset.temp_min, preset.temp_max)
            .clamp_to(
                zone_entry.as_ref().and_then(|e| e.temp_min),
                zone_entry.as_ref().and_then(|e| e.temp_max),
            );
        let temperature = self.draw_temperature(range);

        let mut state = WeatherState::from_preset(&preset, temperature, season);
        apply_options(&mut state, options);
        state
    }

    /// Weighted draw over the bucket's enabled entries, biased toward the
    /// previous day's category. Falls back to the "clear" built-in when the
    /// bucket is empty or references only unknown presets.
    fn draw_preset(
        &mut self,
        season: SeasonKey,
        zone: &ClimateZone,
        registry: &WeatherPresetRegistry,
        previous: Option<&WeatherState>,
        inertia: f64,
    ) -> (WeatherPreset, Option<ZonePresetEntry>) {
        let candidates: Vec<(&ZonePresetEntry, &WeatherPreset)> = zone
            .entries(season)
            .iter()
            .filter(|e| e.enabled && e.chance > 0.0)
            .filter_map(|e| registry.get(&e.preset_id).map(|p| (e, p)))
            .collect();

        if candidates.is_empty() {
            tracing::warn!(season = %season, zone = %zone.name, "no weighted entries; defaulting to clear");
            let fallback = registry
                .get("clear")
                .cloned()
                .unwrap_or_else(|| crate::weather::preset::builtin_presets().remove(0));
            return (fallback, None);
        }

        let total_chance: f64 = candidates.iter().map(|(e, _)| e.chance).sum();
        let boost = previous.map(|prev| (prev.category, inertia * total_chance));
        let weights: Vec<f64> = candidates
            .iter()
            .map(|(e, p)| match boost {
                Some((category, extra)) if p.category == category => e.chance + extra,
                _ => e.chance,
            })
            .collect();

        let total: f64 = weights.iter().sum();
        let roll = self.rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        for ((entry, preset), weight) in candidates.iter().zip(&weights) {
            cumulative += weight;
            if roll < cumulative {
                return ((*preset).clone(), Some((*entry).clone()));
            }
        }
        // Roll landed on the upper bound; first entry wins the tie
        let (entry, preset) = candidates[0];
        (preset.clone(), Some(entry.clone()))
    }

    /// Uniform draw within a range, rounded to one decimal
    fn draw_temperature(&mut self, range: TempRange) -> f64 {
        let t = if range.max > range.min {
            self.rng.gen_range(range.min..=range.max)
        } else {
            range.min
        };
        (t * 10.0).round() / 10.0
    }

    /// Manual preset selection (GM `setWeather`). Draws a temperature the
    /// same way generation does, then applies the caller's overrides.
    pub fn manual(
        &mut self,
        preset: &WeatherPreset,
        season: SeasonKey,
        zone: &ClimateZone,
        options: &GenerateOptions,
    ) -> WeatherState {
        let range = zone
            .temperature_range(season)
            .clamp_to(preset.temp_min, preset.temp_max);
        let temperature = self.draw_temperature(range);
        let mut state = WeatherState::from_preset(preset, temperature, season);
        apply_options(&mut state, options);
        state
    }

    /// Plan the forecast horizon: one chained draw per future date, each
    /// day's inertia anchored on the previous planned day.
    pub fn plan_forecast(
        &mut self,
        dates: &[CalendarDate],
        season: SeasonKey,
        zone: &ClimateZone,
        registry: &WeatherPresetRegistry,
        anchor: Option<&WeatherState>,
        inertia: f64,
    ) -> Vec<ForecastEntry> {
        let mut previous = anchor.cloned();
        let mut plan = Vec::with_capacity(dates.len());
        for &date in dates {
            let state = self.generate(
                season,
                zone,
                registry,
                previous.as_ref(),
                None,
                inertia,
                0.0,
                &GenerateOptions::default(),
            );
            if let Some(preset) = registry.get(&state.id) {
                plan.push(ForecastEntry {
                    date,
                    preset: preset.into(),
                    temperature: state.temperature,
                });
            }
            previous = Some(state);
        }
        plan
    }
}

fn apply_options(state: &mut WeatherState, options: &GenerateOptions) {
    if let Some(t) = options.temperature {
        state.temperature = t;
    }
    if let Some(w) = options.wind {
        state.wind = w;
    }
    if let Some(p) = options.precipitation {
        state.precipitation = p;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::ClimateZoneCatalog;

    fn zone() -> ClimateZone {
        ClimateZoneCatalog::builtin()
            .instantiate("temperate", &["Spring".into(), "Summer".into(), "Autumn".into(), "Winter".into()])
            .unwrap()
    }

    #[test]
    fn test_generate_stays_in_season_range() {
        let registry = WeatherPresetRegistry::new();
        let mut gen = WeatherGenerator::new(7);
        let zone = zone();
        let range = zone.temperature_range(SeasonKey::Summer);

        for _ in 0..8 {
            let state = gen.generate(
                SeasonKey::Summer,
                &zone,
                &registry,
                None,
                None,
                0.0,
                0.0,
                &GenerateOptions::default(),
            );
            assert!(state.temperature >= range.min - 15.0);
            assert!(state.temperature <= range.max + 15.0);
            assert_eq!(state.season, SeasonKey::Summer);
        }
    }

    #[test]
    fn test_generate_is_seed_deterministic() {
        let registry = WeatherPresetRegistry::new();
        let zone = zone();
        let run = |seed| {
            let mut gen = WeatherGenerator::new(seed);
            (0..5)
                .map(|_| {
                    gen.generate(
                        SeasonKey::Winter,
                        &zone,
                        &registry,
                        None,
                        None,
                        0.3,
                        0.0,
                        &GenerateOptions::default(),
                    )
                    .id
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_temperature_override_wins() {
        let registry = WeatherPresetRegistry::new();
        let mut gen = WeatherGenerator::new(1);
        let state = gen.generate(
            SeasonKey::Summer,
            &zone(),
            &registry,
            None,
            None,
            0.0,
            0.0,
            &GenerateOptions {
                temperature: Some(-40.0),
                ..Default::default()
            },
        );
        assert_eq!(state.temperature, -40.0);
    }

    #[test]
    fn test_forecast_honored_at_full_accuracy() {
        let registry = WeatherPresetRegistry::new();
        let mut gen = WeatherGenerator::new(3);
        let entry = ForecastEntry {
            date: CalendarDate::new(1, 1, 2),
            preset: registry.get("fog").unwrap().into(),
            temperature: 4.5,
        };
        let state = gen.generate(
            SeasonKey::Default,
            &zone(),
            &registry,
            None,
            Some(&entry),
            0.0,
            100.0,
            &GenerateOptions::default(),
        );
        assert_eq!(state.id, "fog");
        assert_eq!(state.temperature, 4.5);
    }

    #[test]
    fn test_forecast_ignored_at_zero_accuracy() {
        let registry = WeatherPresetRegistry::new();
        let zone = zone();
        // With accuracy 0 the plan must never be the reason fog appears:
        // compare against the identical seed with no forecast at all.
        let entry = ForecastEntry {
            date: CalendarDate::new(1, 1, 2),
            preset: registry.get("fog").unwrap().into(),
            temperature: 4.5,
        };
        let mut with_plan = WeatherGenerator::new(9);
        let a = with_plan.generate(
            SeasonKey::Default,
            &zone,
            &registry,
            None,
            Some(&entry),
            0.0,
            0.0,
            &GenerateOptions::default(),
        );
        assert!(!(a.id == "fog" && a.temperature == 4.5));
    }

    #[test]
    fn test_full_inertia_biases_toward_previous_category() {
        let registry = WeatherPresetRegistry::new();
        let zone = zone();
        let mut gen = WeatherGenerator::new(11);
        let previous = gen.manual(
            registry.get("snow").unwrap(),
            SeasonKey::Winter,
            &zone,
            &GenerateOptions::default(),
        );

        // Snow-category weight in the temperate winter bucket is 35 of 100.
        // At inertia 1.0 each matching entry gains the whole bucket weight,
        // so the category dominates the draw over a long run.
        let mut repeats = 0;
        for _ in 0..200 {
            let state = gen.generate(
                SeasonKey::Winter,
                &zone,
                &registry,
                Some(&previous),
                None,
                1.0,
                0.0,
                &GenerateOptions::default(),
            );
            if state.category == previous.category {
                repeats += 1;
            }
        }
        assert!(repeats > 100, "only {} of 200 repeats", repeats);
    }

    #[test]
    fn test_empty_bucket_degrades_to_clear() {
        let registry = WeatherPresetRegistry::new();
        let mut gen = WeatherGenerator::new(5);
        let empty = ClimateZone::new("Void");
        let state = gen.generate(
            SeasonKey::Summer,
            &empty,
            &registry,
            None,
            None,
            0.0,
            0.0,
            &GenerateOptions::default(),
        );
        assert_eq!(state.id, "clear");
    }

    #[test]
    fn test_plan_forecast_length_and_shape() {
        let registry = WeatherPresetRegistry::new();
        let mut gen = WeatherGenerator::new(13);
        let zone = zone();
        let dates: Vec<CalendarDate> =
            (2..=4).map(|d| CalendarDate::new(1, 1, d)).collect();
        let plan = gen.plan_forecast(&dates, SeasonKey::Spring, &zone, &registry, None, 0.3);
        assert_eq!(plan.len(), 3);
        for (entry, date) in plan.iter().zip(&dates) {
            assert_eq!(entry.date, *date);
            assert!(!entry.preset.label.is_empty());
        }
    }
}
