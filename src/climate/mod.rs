//! Climate zones: templates, world instances, and season normalization

pub mod loader;
pub mod season;
pub mod template;
pub mod zone;

pub use season::{normalize_season_name, SeasonKey};
pub use template::{ClimateZoneCatalog, ClimateZoneTemplate};
pub use zone::{ClimateZone, ColorShift, ZonePresetEntry};
