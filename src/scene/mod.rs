//! Scene collaborator interface
//!
//! Scene documents live in the host client's persistence layer; the
//! simulation only reads a few flags and writes back environment values.
//! The write is fire-and-forget replication from the caller's perspective.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TempestryError};
use crate::core::types::{SceneId, ZoneId};
use crate::lighting::EnvironmentLighting;

/// Per-scene environment flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFlags {
    /// Whether this scene participates in darkness synchronization
    #[serde(default = "default_true")]
    pub darkness_sync: bool,
    /// Scene brightness multiplier; `None` uses the world default
    pub brightness_multiplier: Option<f64>,
    /// Climate zone override; `None` follows the world's active zone
    pub zone_override: Option<ZoneId>,
}

fn default_true() -> bool {
    true
}

impl Default for SceneFlags {
    fn default() -> Self {
        Self {
            darkness_sync: true,
            brightness_multiplier: None,
            zone_override: None,
        }
    }
}

/// Environment values written back to a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentUpdate {
    /// `environment.darknessLevel`, 0.0 lit to 1.0 dark
    pub darkness: f64,
    pub lighting: Option<EnvironmentLighting>,
    /// Request client-side animated interpolation instead of a snap
    pub animate: bool,
}

/// Access to the host's scene documents
pub trait SceneStore {
    fn scene_ids(&self) -> Vec<SceneId>;
    fn active_scene(&self) -> Option<SceneId>;
    fn flags(&self, id: &SceneId) -> Option<SceneFlags>;
    fn set_zone_override(&mut self, id: &SceneId, zone: Option<ZoneId>) -> Result<()>;
    fn apply_environment(&mut self, id: &SceneId, update: &EnvironmentUpdate) -> Result<()>;
}

/// In-memory scene store for the demo binary and tests
#[derive(Debug, Default)]
pub struct MemoryScenes {
    order: Vec<SceneId>,
    flags: AHashMap<SceneId, SceneFlags>,
    active: Option<SceneId>,
    applied: AHashMap<SceneId, EnvironmentUpdate>,
    failing: Vec<SceneId>,
}

impl MemoryScenes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_scene(&mut self, id: SceneId, flags: SceneFlags) {
        if !self.order.contains(&id) {
            self.order.push(id.clone());
        }
        self.flags.insert(id, flags);
    }

    pub fn activate(&mut self, id: SceneId) {
        self.active = Some(id);
    }

    /// Make every write to this scene fail, to exercise failure isolation
    pub fn fail_writes_for(&mut self, id: SceneId) {
        self.failing.push(id);
    }

    pub fn last_update(&self, id: &SceneId) -> Option<&EnvironmentUpdate> {
        self.applied.get(id)
    }
}

impl SceneStore for MemoryScenes {
    fn scene_ids(&self) -> Vec<SceneId> {
        self.order.clone()
    }

    fn active_scene(&self) -> Option<SceneId> {
        self.active.clone()
    }

    fn flags(&self, id: &SceneId) -> Option<SceneFlags> {
        self.flags.get(id).cloned()
    }

    fn set_zone_override(&mut self, id: &SceneId, zone: Option<ZoneId>) -> Result<()> {
        let flags = self
            .flags
            .get_mut(id)
            .ok_or_else(|| TempestryError::SceneNotFound(id.to_string()))?;
        flags.zone_override = zone;
        Ok(())
    }

    fn apply_environment(&mut self, id: &SceneId, update: &EnvironmentUpdate) -> Result<()> {
        if self.failing.contains(id) {
            return Err(TempestryError::SceneWriteFailed {
                scene: id.to_string(),
                reason: "simulated replication failure".into(),
            });
        }
        if !self.flags.contains_key(id) {
            return Err(TempestryError::SceneNotFound(id.to_string()));
        }
        self.applied.insert(id.clone(), update.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_scene_roundtrip() {
        let mut scenes = MemoryScenes::new();
        let id = SceneId::new("tavern");
        scenes.add_scene(id.clone(), SceneFlags::default());
        scenes.activate(id.clone());

        let update = EnvironmentUpdate {
            darkness: 0.4,
            lighting: None,
            animate: true,
        };
        scenes.apply_environment(&id, &update).unwrap();
        assert_eq!(scenes.last_update(&id), Some(&update));
        assert_eq!(scenes.active_scene(), Some(id));
    }

    #[test]
    fn test_unknown_scene_write_fails() {
        let mut scenes = MemoryScenes::new();
        let err = scenes.apply_environment(
            &SceneId::new("ghost"),
            &EnvironmentUpdate {
                darkness: 0.0,
                lighting: None,
                animate: false,
            },
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_zone_override_update() {
        let mut scenes = MemoryScenes::new();
        let id = SceneId::new("crypt");
        scenes.add_scene(id.clone(), SceneFlags::default());
        let zone = ZoneId::new();
        scenes.set_zone_override(&id, Some(zone)).unwrap();
        assert_eq!(scenes.flags(&id).unwrap().zone_override, Some(zone));
    }
}
