//! Season normalization
//!
//! Calendar authors name their seasons freely ("Vernal Equinox", "The Long
//! Winter", localized text). Zone tables are keyed by a small canonical set,
//! so free-text names are reduced to it by tolerant substring matching.

use serde::{Deserialize, Serialize};

/// Canonical season bucket used by zone temperature and weather tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeasonKey {
    Spring,
    Summer,
    Autumn,
    Winter,
    /// Fallback bucket when the season name matches nothing
    #[default]
    Default,
}

impl SeasonKey {
    pub const ALL: [SeasonKey; 5] = [
        SeasonKey::Spring,
        SeasonKey::Summer,
        SeasonKey::Autumn,
        SeasonKey::Winter,
        SeasonKey::Default,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonKey::Spring => "spring",
            SeasonKey::Summer => "summer",
            SeasonKey::Autumn => "autumn",
            SeasonKey::Winter => "winter",
            SeasonKey::Default => "default",
        }
    }
}

impl std::fmt::Display for SeasonKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a free-text season name onto a canonical bucket.
///
/// Substring matching tolerates prefixes/suffixes ("Early Spring") and the
/// common formal variants (vernal, estival, autumnal, hibernal, fall).
pub fn normalize_season_name(name: &str) -> SeasonKey {
    let lower = name.to_lowercase();
    const PATTERNS: [(&[&str], SeasonKey); 4] = [
        (&["spring", "vernal"], SeasonKey::Spring),
        (&["summer", "estival"], SeasonKey::Summer),
        (&["autumn", "fall", "autumnal"], SeasonKey::Autumn),
        (&["winter", "hibernal"], SeasonKey::Winter),
    ];
    for (needles, key) in PATTERNS {
        if needles.iter().any(|n| lower.contains(n)) {
            return key;
        }
    }
    SeasonKey::Default
}
