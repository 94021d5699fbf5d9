//! Environment engine - the facade the rest of the client talks to
//!
//! Binds the climate catalog, preset registry, generator, history, and
//! lighting math together, and mirrors every state mutation into the
//! injected world settings store. Persistence writes are fire-and-forget:
//! a failed write is logged, never propagated into game logic.

use crate::calendar::{CalendarDate, CalendarProvider};
use crate::climate::{
    normalize_season_name, ClimateZone, ClimateZoneCatalog, ClimateZoneTemplate, SeasonKey,
};
use crate::core::config::EnvironmentConfig;
use crate::core::error::Result;
use crate::core::types::{format_temperature, SceneId, ZoneId};
use crate::lighting::{adjust_darkness, base_darkness, compose_lighting, ComposeContext};
use crate::scene::{EnvironmentUpdate, SceneFlags, SceneStore};
use crate::store::{keys, load, save, SettingsStore};
use crate::weather::{
    CustomWeatherDefinition, DayRecord, ForecastEntry, GenerateOptions, WeatherGenerator,
    WeatherHistoryStore, WeatherPreset, WeatherPresetRegistry, WeatherState,
};

pub struct EnvironmentEngine {
    config: EnvironmentConfig,
    catalog: ClimateZoneCatalog,
    registry: WeatherPresetRegistry,
    generator: WeatherGenerator,
    history: WeatherHistoryStore,
    zones: Vec<ClimateZone>,
    active_zone: Option<ZoneId>,
    current: Option<WeatherState>,
    forecast: Vec<ForecastEntry>,
    settings: Box<dyn SettingsStore>,
}

impl EnvironmentEngine {
    /// Construct for a world session, rehydrating persisted state.
    /// Stored config wins over the provided default; missing or malformed
    /// records fall back with a warning.
    pub fn new(config: EnvironmentConfig, settings: Box<dyn SettingsStore>, seed: u64) -> Self {
        let config = load(settings.as_ref(), keys::CONFIG).unwrap_or(config);
        if let Err(reason) = config.validate() {
            tracing::warn!(%reason, "environment config failed validation; continuing clamped");
        }

        let custom = load(settings.as_ref(), keys::CUSTOM_PRESETS).unwrap_or_default();
        let history_records = load(settings.as_ref(), keys::WEATHER_HISTORY).unwrap_or_default();

        Self {
            registry: WeatherPresetRegistry::with_custom(custom),
            history: WeatherHistoryStore::from_records(
                history_records,
                config.history_retention_days,
            ),
            zones: load(settings.as_ref(), keys::ZONES).unwrap_or_default(),
            active_zone: load(settings.as_ref(), keys::ACTIVE_ZONE).unwrap_or_default(),
            current: load(settings.as_ref(), keys::CURRENT_WEATHER).unwrap_or_default(),
            forecast: load(settings.as_ref(), keys::FORECAST_PLAN).unwrap_or_default(),
            catalog: ClimateZoneCatalog::builtin(),
            generator: WeatherGenerator::new(seed),
            config,
            settings,
        }
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    pub fn catalog_mut(&mut self) -> &mut ClimateZoneCatalog {
        &mut self.catalog
    }

    // ========================================================================
    // Season and zone resolution
    // ========================================================================

    /// Current season bucket, via tolerant name normalization
    pub fn season_bucket(&self, cal: &dyn CalendarProvider) -> SeasonKey {
        cal.season_name()
            .map(|name| normalize_season_name(&name))
            .unwrap_or_default()
    }

    pub fn zone(&self, id: ZoneId) -> Option<&ClimateZone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn calendar_zones(&self) -> &[ClimateZone] {
        &self.zones
    }

    pub fn active_zone(&self) -> Option<&ClimateZone> {
        self.active_zone.and_then(|id| self.zone(id))
    }

    pub fn set_active_zone(&mut self, id: Option<ZoneId>) -> bool {
        if let Some(id) = id {
            if self.zone(id).is_none() {
                return false;
            }
        }
        self.active_zone = id;
        self.persist_zones();
        true
    }

    pub fn add_zone(&mut self, zone: ClimateZone) -> ZoneId {
        let id = zone.id;
        self.zones.push(zone);
        self.persist_zones();
        id
    }

    pub fn remove_zone(&mut self, id: ZoneId) -> bool {
        let before = self.zones.len();
        self.zones.retain(|z| z.id != id);
        if self.active_zone == Some(id) {
            self.active_zone = None;
        }
        let removed = self.zones.len() < before;
        if removed {
            self.persist_zones();
        }
        removed
    }

    /// Instantiate a catalog template against the calendar's season names
    pub fn create_zone_from_template(
        &mut self,
        template_id: &str,
        cal: &dyn CalendarProvider,
    ) -> Option<ZoneId> {
        let zone = self.catalog.instantiate(template_id, &cal.season_names())?;
        Some(self.add_zone(zone))
    }

    pub fn zone_templates(&self) -> &[ClimateZoneTemplate] {
        self.catalog.templates()
    }

    /// Scene override -> world active zone -> none
    pub fn effective_zone(&self, flags: &SceneFlags) -> Option<&ClimateZone> {
        flags
            .zone_override
            .and_then(|id| self.zone(id))
            .or_else(|| self.active_zone())
    }

    /// Validated write of a scene's climate-zone override
    pub fn set_scene_zone_override(
        &self,
        scenes: &mut dyn SceneStore,
        scene: &SceneId,
        zone: Option<ZoneId>,
    ) -> Result<()> {
        if let Some(id) = zone {
            if self.zone(id).is_none() {
                // Keep whatever override the scene already has
                tracing::warn!(%id, "ignoring override with unknown zone");
                return Ok(());
            }
        }
        scenes.set_zone_override(scene, zone)
    }

    /// The zone generation runs against: active zone, else an ephemeral
    /// temperate default so a bare world still gets plausible weather
    fn generation_zone(&self, cal: &dyn CalendarProvider) -> ClimateZone {
        if let Some(zone) = self.active_zone() {
            return zone.clone();
        }
        self.catalog
            .instantiate("temperate", &cal.season_names())
            .unwrap_or_else(|| ClimateZone::new("Fallback"))
    }

    // ========================================================================
    // Weather operations
    // ========================================================================

    pub fn current_weather(&self) -> Option<&WeatherState> {
        self.current.as_ref()
    }

    pub fn current_temperature(&self) -> Option<f64> {
        self.current.as_ref().map(|w| w.temperature)
    }

    pub fn format_temperature(&self, value: f64) -> String {
        format_temperature(value, self.config.temp_unit)
    }

    /// Generate today's weather and refresh the forecast horizon
    pub fn generate_weather(&mut self, cal: &dyn CalendarProvider) -> WeatherState {
        self.generate_weather_with(cal, &GenerateOptions::default())
    }

    pub fn generate_weather_with(
        &mut self,
        cal: &dyn CalendarProvider,
        options: &GenerateOptions,
    ) -> WeatherState {
        let today = cal.current_date();
        let season = self.season_bucket(cal);
        let zone = self.generation_zone(cal);

        let yesterday = cal.add_days(today, -1);
        let previous = self
            .history
            .get_for_date(yesterday.year, yesterday.month, yesterday.day)
            .map(|r| r.state.clone());
        let planned = self.forecast.iter().find(|f| f.date == today).cloned();

        let state = self.generator.generate(
            season,
            &zone,
            &self.registry,
            previous.as_ref(),
            planned.as_ref(),
            self.config.weather_inertia,
            self.config.forecast_accuracy,
            options,
        );

        self.current = Some(state.clone());
        self.history.record(today, state.clone(), false);
        self.refresh_forecast(cal, today, season, &zone);
        self.persist_weather();
        state
    }

    /// GM override to a known preset; `None` for unknown ids, current
    /// weather unchanged
    pub fn set_weather(
        &mut self,
        cal: &dyn CalendarProvider,
        id: &str,
        options: &GenerateOptions,
    ) -> Option<WeatherState> {
        let preset = self.registry.get(id)?.clone();
        let today = cal.current_date();
        let season = self.season_bucket(cal);
        let zone = self.generation_zone(cal);

        let state = self.generator.manual(&preset, season, &zone, options);
        self.current = Some(state.clone());
        self.history.record(today, state.clone(), true);
        if self.config.override_clears_forecast {
            self.forecast.retain(|f| f.date != today);
        }
        self.persist_weather();
        Some(state)
    }

    /// Ad-hoc weather bypassing the registry; always succeeds
    pub fn set_custom_weather(
        &mut self,
        cal: &dyn CalendarProvider,
        definition: CustomWeatherDefinition,
    ) -> WeatherState {
        let today = cal.current_date();
        let state = definition.into_state(self.season_bucket(cal));
        self.current = Some(state.clone());
        self.history.record(today, state.clone(), true);
        if self.config.override_clears_forecast {
            self.forecast.retain(|f| f.date != today);
        }
        self.persist_weather();
        state
    }

    pub fn clear_weather(&mut self) {
        self.current = None;
        self.persist_weather();
    }

    /// Upcoming forecast entries, at most `days` (default: configured horizon)
    pub fn weather_forecast(
        &self,
        cal: &dyn CalendarProvider,
        days: Option<u32>,
    ) -> Vec<ForecastEntry> {
        let today = cal.current_date();
        let limit = days.unwrap_or(self.config.forecast_days) as usize;
        self.forecast
            .iter()
            .filter(|f| f.date > today)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn weather_history(&self, year: Option<i32>) -> Vec<&DayRecord> {
        match year {
            Some(year) => self.history.query_year(year),
            None => self.history.all(),
        }
    }

    pub fn weather_for_date(&self, year: i32, month: u32, day: u32) -> Option<&DayRecord> {
        self.history.get_for_date(year, month, day)
    }

    /// Keep the plan covering today+1 ..= today+horizon
    fn refresh_forecast(
        &mut self,
        cal: &dyn CalendarProvider,
        today: CalendarDate,
        season: SeasonKey,
        zone: &ClimateZone,
    ) {
        self.forecast.retain(|f| f.date > today);

        let missing: Vec<CalendarDate> = (1..=self.config.forecast_days as i64)
            .map(|offset| cal.add_days(today, offset))
            .filter(|date| !self.forecast.iter().any(|f| f.date == *date))
            .collect();
        if missing.is_empty() {
            return;
        }

        let anchor = self.current.clone();
        let mut planned = self.generator.plan_forecast(
            &missing,
            season,
            zone,
            &self.registry,
            anchor.as_ref(),
            self.config.weather_inertia,
        );
        self.forecast.append(&mut planned);
        self.forecast.sort_by_key(|f| f.date);
    }

    // ========================================================================
    // Preset pass-through
    // ========================================================================

    pub fn get_preset(&self, id: &str) -> Option<&WeatherPreset> {
        self.registry.get(id)
    }

    pub fn weather_presets(&self) -> Vec<&WeatherPreset> {
        self.registry.list_all()
    }

    pub fn add_weather_preset(&mut self, preset: WeatherPreset) -> Option<WeatherPreset> {
        let added = self.registry.add(preset);
        if added.is_some() {
            self.persist_presets();
        }
        added
    }

    pub fn update_weather_preset(&mut self, preset: WeatherPreset) -> bool {
        let updated = self.registry.update(preset);
        if updated {
            self.persist_presets();
        }
        updated
    }

    pub fn remove_weather_preset(&mut self, id: &str) -> bool {
        let removed = self.registry.remove(id);
        if removed {
            self.persist_presets();
        }
        removed
    }

    // ========================================================================
    // Scene environment computation
    // ========================================================================

    /// Compute the environment values for one scene at the current instant
    pub fn compute_update(
        &self,
        cal: &dyn CalendarProvider,
        flags: &SceneFlags,
        fx_active: bool,
        animate: bool,
    ) -> EnvironmentUpdate {
        let time = cal.current_time();
        let base = base_darkness(
            time.hour,
            time.minute,
            cal.hours_per_day(),
            cal.minutes_per_hour(),
            cal.sunrise(),
            cal.sunset(),
        );
        let moons = cal.moons();
        let ctx = ComposeContext {
            base_darkness: base,
            scene_brightness: flags.brightness_multiplier,
            default_brightness: self.config.default_brightness,
            zone: self.effective_zone(flags),
            weather: self.current.as_ref(),
            moons: &moons,
            moon_sync: self.config.moon_sync,
            weather_sync: self.config.weather_sync,
            color_shift: self.config.color_shift,
            fx_active,
            hour: time.hour,
            minute: time.minute,
            hours_per_day: cal.hours_per_day(),
            minutes_per_hour: cal.minutes_per_hour(),
            sunrise: cal.sunrise(),
            sunset: cal.sunset(),
        };

        EnvironmentUpdate {
            darkness: adjust_darkness(&ctx),
            lighting: compose_lighting(&ctx),
            animate,
        }
    }

    // ========================================================================
    // Persistence mirroring
    // ========================================================================

    fn persist_weather(&mut self) {
        let history = self.history.to_records();
        Self::persist(&mut *self.settings, keys::CURRENT_WEATHER, &self.current);
        Self::persist(&mut *self.settings, keys::WEATHER_HISTORY, &history);
        Self::persist(&mut *self.settings, keys::FORECAST_PLAN, &self.forecast);
    }

    fn persist_presets(&mut self) {
        let custom: Vec<WeatherPreset> = self
            .registry
            .custom_presets()
            .into_iter()
            .cloned()
            .collect();
        Self::persist(&mut *self.settings, keys::CUSTOM_PRESETS, &custom);
    }

    fn persist_zones(&mut self) {
        let zones = self.zones.clone();
        Self::persist(&mut *self.settings, keys::ZONES, &zones);
        Self::persist(&mut *self.settings, keys::ACTIVE_ZONE, &self.active_zone);
    }

    fn persist<T: serde::Serialize>(store: &mut dyn SettingsStore, key: &str, value: &T) {
        if let Err(e) = save(store, key, value) {
            tracing::warn!(key, error = %e, "settings write failed");
        }
    }
}
