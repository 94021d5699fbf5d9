//! Scene synchronization
//!
//! Listens to world events (time advance, weather change, moon phase,
//! scene activation) and pushes recomputed environment values to the
//! eligible scenes. Only one connected client - the designated writer -
//! performs the writes, so every client can run the same event handling
//! without double-applying.

use crate::calendar::CalendarProvider;
use crate::core::config::SyncScope;
use crate::core::types::SceneId;
use crate::engine::EnvironmentEngine;
use crate::scene::SceneStore;

/// World events that can trigger a scene refresh
#[derive(Debug, Clone, PartialEq)]
pub enum EnvironmentEvent {
    /// Game time moved; `hour_changed` is false for sub-hour ticks
    TimeAdvanced { hour_changed: bool },
    WeatherChanged,
    MoonPhaseChanged,
    SceneActivated(SceneId),
}

/// Which client is allowed to write scene documents
pub trait SessionInfo {
    fn is_designated_writer(&self) -> bool;
}

/// A standalone or single-GM session: always the writer
pub struct PrimaryWriter;

impl SessionInfo for PrimaryWriter {
    fn is_designated_writer(&self) -> bool {
        true
    }
}

/// Bridge to an ambient-effects layer. When a weather effect is taken
/// over by FX, the darkness composer skips that preset's penalty.
pub trait FxIntegration {
    fn is_active(&self, fx_preset: &str) -> bool;
}

/// No effects layer installed
pub struct NoFx;

impl FxIntegration for NoFx {
    fn is_active(&self, _fx_preset: &str) -> bool {
        false
    }
}

/// Debounced event-to-scene-write pump
#[derive(Debug, Default)]
pub struct SceneSynchronizer {
    last_hour: Option<u32>,
    last_world_hours: Option<f64>,
}

impl SceneSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one event. Returns the number of scenes written.
    pub fn handle(
        &mut self,
        event: &EnvironmentEvent,
        engine: &EnvironmentEngine,
        cal: &dyn CalendarProvider,
        scenes: &mut dyn SceneStore,
        session: &dyn SessionInfo,
        fx: &dyn FxIntegration,
    ) -> usize {
        if !session.is_designated_writer() {
            return 0;
        }

        let hour = cal.current_time().hour;
        if let EnvironmentEvent::TimeAdvanced { hour_changed } = event {
            // Darkness is recomputed at hour granularity; minute ticks
            // inside the same hour are noise
            if !hour_changed && self.last_hour == Some(hour) {
                return 0;
            }
        }

        let world_hours = cal.world_time_hours();
        let animate = match self.last_world_hours {
            // Smooth transition when under an hour has passed, including a
            // paused clock (weather overrides with time standing still);
            // snap on the first write and on jumps or rewinds
            Some(last) => {
                let elapsed = world_hours - last;
                (0.0..1.0).contains(&elapsed)
            }
            None => false,
        };
        self.last_hour = Some(hour);
        self.last_world_hours = Some(world_hours);

        let targets = self.eligible_scenes(event, engine, scenes);
        let mut written = 0;
        for scene in targets {
            let flags = match scenes.flags(&scene) {
                Some(flags) if flags.darkness_sync => flags,
                _ => continue,
            };
            let fx_active = engine
                .current_weather()
                .and_then(|w| w.fx_preset.as_deref())
                .map(|preset| fx.is_active(preset))
                .unwrap_or(false);
            let update = engine.compute_update(cal, &flags, fx_active, animate);
            match scenes.apply_environment(&scene, &update) {
                Ok(()) => written += 1,
                // One broken scene must not stall the rest
                Err(e) => tracing::warn!(scene = %scene, error = %e, "scene update failed"),
            }
        }
        written
    }

    fn eligible_scenes(
        &self,
        event: &EnvironmentEvent,
        engine: &EnvironmentEngine,
        scenes: &dyn SceneStore,
    ) -> Vec<SceneId> {
        if let EnvironmentEvent::SceneActivated(id) = event {
            return vec![id.clone()];
        }
        match engine.config().sync_scope {
            SyncScope::ActiveScene => scenes.active_scene().into_iter().collect(),
            SyncScope::AllSyncedScenes => scenes.scene_ids(),
        }
    }
}
