//! Load climate zone template packs from TOML files
//!
//! Worlds can ship extra templates alongside the built-in catalog. A pack is
//! a directory of `.toml` files, each holding one or more `[template.<id>]`
//! tables:
//!
//! ```toml
//! [template.volcanic]
//! name = "Volcanic"
//! description = "Ash clouds and scorched rock"
//!
//! [template.volcanic.temperatures]
//! default = { min = 10.0, max = 35.0 }
//! summer = { min = 18.0, max = 44.0 }
//!
//! [template.volcanic.weather.default]
//! clear = 30.0
//! overcast = 30.0
//! windstorm = 40.0
//! ```

use std::fs;
use std::path::Path;

use ahash::AHashMap;

use crate::climate::season::{normalize_season_name, SeasonKey};
use crate::climate::template::ClimateZoneTemplate;
use crate::core::types::TempRange;

/// Load every template from every `.toml` file in a directory.
///
/// Individual malformed templates are skipped with a warning; only an
/// unreadable directory is a hard error.
pub fn load_template_pack(dir: &Path) -> Result<Vec<ClimateZoneTemplate>, String> {
    let mut templates = Vec::new();

    let entries = fs::read_dir(dir)
        .map_err(|e| format!("Failed to read template pack {}: {}", dir.display(), e))?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().map_or(true, |ext| ext != "toml") {
            continue;
        }
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping unreadable template file");
                continue;
            }
        };
        match parse_template_toml(&content) {
            Ok(mut parsed) => templates.append(&mut parsed),
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping malformed template file");
            }
        }
    }

    Ok(templates)
}

/// Parse all `[template.<id>]` tables from one TOML document
pub fn parse_template_toml(content: &str) -> Result<Vec<ClimateZoneTemplate>, String> {
    let root: toml::Value = content.parse().map_err(|e| format!("Invalid TOML: {}", e))?;

    let Some(table) = root.get("template").and_then(|v| v.as_table()) else {
        return Ok(Vec::new());
    };

    let mut templates = Vec::new();
    for (id, body) in table {
        match parse_one_template(id, body) {
            Ok(template) => templates.push(template),
            Err(e) => {
                tracing::warn!(template = %id, error = %e, "skipping malformed template");
            }
        }
    }
    Ok(templates)
}

fn parse_one_template(id: &str, body: &toml::Value) -> Result<ClimateZoneTemplate, String> {
    let table = body
        .as_table()
        .ok_or_else(|| format!("template {} is not a table", id))?;

    let name = table
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or(id)
        .to_string();
    let description = table
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let mut temperatures = AHashMap::new();
    if let Some(temps) = table.get("temperatures").and_then(|v| v.as_table()) {
        for (season, range) in temps {
            let key = season_key(season);
            let min = range
                .get("min")
                .and_then(toml_number)
                .ok_or_else(|| format!("temperatures.{} missing min", season))?;
            let max = range
                .get("max")
                .and_then(toml_number)
                .ok_or_else(|| format!("temperatures.{} missing max", season))?;
            temperatures.insert(key, TempRange::new(min, max));
        }
    }
    if !temperatures.contains_key(&SeasonKey::Default) {
        return Err("missing default temperature range".into());
    }

    let mut weather = AHashMap::new();
    if let Some(buckets) = table.get("weather").and_then(|v| v.as_table()) {
        for (season, weights) in buckets {
            let key = season_key(season);
            let table = weights
                .as_table()
                .ok_or_else(|| format!("weather.{} is not a table", season))?;
            let mut entries = Vec::new();
            for (preset_id, weight) in table {
                let w = toml_number(weight)
                    .ok_or_else(|| format!("weather.{}.{} is not numeric", season, preset_id))?;
                entries.push((preset_id.clone(), w));
            }
            weather.insert(key, entries);
        }
    }
    if !weather.contains_key(&SeasonKey::Default) {
        return Err("missing default weather table".into());
    }

    Ok(ClimateZoneTemplate {
        id: id.to_string(),
        name,
        description,
        temperatures,
        weather,
    })
}

fn season_key(name: &str) -> SeasonKey {
    match name.to_lowercase().as_str() {
        "default" | "_default" => SeasonKey::Default,
        other => normalize_season_name(other),
    }
}

fn toml_number(value: &toml::Value) -> Option<f64> {
    value.as_float().or_else(|| value.as_integer().map(|i| i as f64))
}
