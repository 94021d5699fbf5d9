//! Environment composition: scene darkness and ambient color
//!
//! Takes the base darkness curve and layers scene, zone, weather, and moon
//! modifiers on top, then derives the ambient color records for the "lit"
//! and "dark" lighting states. Every stage clamps instead of rejecting, so
//! a buggy zone multiplier degrades gracefully.

use serde::{Deserialize, Serialize};

use crate::calendar::MoonSnapshot;
use crate::climate::ClimateZone;
use crate::core::types::clamp01;
use crate::lighting::color::{lerp, lerp_hue, parse_hex, weighted_circular_mean};
use crate::weather::WeatherState;

/// Total moon-light reduction is capped so even a sky full of moons never
/// turns night into day.
const MAX_MOON_REDUCTION: f64 = 0.3;

/// Default peak light contribution of a single full moon
const DEFAULT_MOON_BRIGHTNESS: f64 = 0.15;

/// One ambient lighting channel; `None` means "no override, use the
/// engine default".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LightingChannel {
    pub hue: Option<f64>,
    pub intensity: Option<f64>,
    pub luminosity: Option<f64>,
}

impl LightingChannel {
    pub fn is_empty(&self) -> bool {
        self.hue.is_none() && self.intensity.is_none() && self.luminosity.is_none()
    }
}

/// Ambient color for the lit and dark lighting states
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentLighting {
    pub base: LightingChannel,
    pub dark: LightingChannel,
}

/// Everything the composer needs about the current instant
#[derive(Debug, Clone)]
pub struct ComposeContext<'a> {
    /// Output of the base darkness curve, before modifiers
    pub base_darkness: f64,
    /// Scene brightness flag; `None` falls back to the world default
    pub scene_brightness: Option<f64>,
    pub default_brightness: f64,
    pub zone: Option<&'a ClimateZone>,
    pub weather: Option<&'a WeatherState>,
    pub moons: &'a [MoonSnapshot],
    pub moon_sync: bool,
    pub weather_sync: bool,
    pub color_shift: bool,
    /// Whether the particle-effect integration is currently handling the
    /// active weather's fx preset
    pub fx_active: bool,
    pub hour: u32,
    pub minute: u32,
    pub hours_per_day: u32,
    pub minutes_per_hour: u32,
    pub sunrise: Option<f64>,
    pub sunset: Option<f64>,
}

impl ComposeContext<'_> {
    fn decimal_hour(&self) -> f64 {
        self.hour as f64 + self.minute as f64 / self.minutes_per_hour.max(1) as f64
    }

    /// Weather defers its visual/darkness handling to the FX layer when an
    /// fx preset is attached and that integration is active
    fn weather_deferred_to_fx(&self, weather: &WeatherState) -> bool {
        weather.fx_preset.is_some() && self.fx_active
    }
}

/// Apply scene/zone/moon/weather modifiers to the base darkness
pub fn adjust_darkness(ctx: &ComposeContext<'_>) -> f64 {
    let base = clamp01(ctx.base_darkness);

    // Multipliers operate in brightness space
    let scene_mult = ctx.scene_brightness.unwrap_or(ctx.default_brightness);
    let zone_mult = ctx
        .zone
        .and_then(|z| z.brightness_multiplier)
        .unwrap_or(1.0);
    let brightness = clamp01((1.0 - base) * scene_mult * zone_mult);
    let mut darkness = clamp01(1.0 - brightness);

    if ctx.moon_sync {
        darkness = clamp01(darkness - moon_illumination_reduction(base, ctx.moons));
    }

    if ctx.weather_sync {
        if let Some(weather) = ctx.weather {
            if !ctx.weather_deferred_to_fx(weather) {
                darkness = clamp01(darkness + weather.darkness_penalty);
            }
        }
    }

    darkness
}

/// Light shed by the moons, as a darkness reduction.
///
/// Exactly 0 before the night half of the curve; above it, each moon
/// contributes its illuminated fraction scaled by its peak brightness and
/// by how deep into night we are. The sum is capped.
pub fn moon_illumination_reduction(base_darkness: f64, moons: &[MoonSnapshot]) -> f64 {
    if base_darkness < 0.5 {
        return 0.0;
    }
    let night_factor = (base_darkness - 0.5) / 0.5;
    let total: f64 = moons
        .iter()
        .map(|moon| {
            moon.illumination()
                * moon.brightness_max.unwrap_or(DEFAULT_MOON_BRIGHTNESS)
                * night_factor
        })
        .sum();
    total.min(MAX_MOON_REDUCTION)
}

/// Time-of-day color keyframe
#[derive(Debug, Clone, Copy, PartialEq)]
struct Keyframe {
    hue: f64,
    intensity: f64,
    luminosity: f64,
}

impl Keyframe {
    fn blend(self, to: Keyframe, t: f64) -> Keyframe {
        let t = clamp01(t);
        Keyframe {
            hue: lerp_hue(self.hue, to.hue, t),
            intensity: lerp(self.intensity, to.intensity, t),
            luminosity: lerp(self.luminosity, to.luminosity, t),
        }
    }

    fn channel(self) -> LightingChannel {
        LightingChannel {
            hue: Some(self.hue),
            intensity: Some(self.intensity),
            luminosity: Some(self.luminosity),
        }
    }
}

/// Compose the lit/dark ambient color records. `None` means nothing is
/// configured and the engine default should stand.
pub fn compose_lighting(ctx: &ComposeContext<'_>) -> Option<EnvironmentLighting> {
    let mut base = LightingChannel::default();
    let mut dark = LightingChannel::default();

    if ctx.color_shift {
        let keyframe = time_of_day_color(ctx);
        base = keyframe.channel();
        dark = keyframe.channel();
    }

    // Moonlight tints only the dark record, and only at night
    if ctx.moon_sync && ctx.base_darkness > 0.5 {
        if let Some(moon) = moon_color(ctx.moons) {
            dark.hue = Some(moon.hue);
            dark.intensity = Some(moon.intensity);
            if moon.luminosity > 0.0 {
                dark.luminosity = Some(dark.luminosity.unwrap_or(0.0) + moon.luminosity);
            }
        }
    }

    // Explicit hue overrides win over anything computed: zone first,
    // then active (non-FX-deferred) weather
    if let Some(zone) = ctx.zone {
        if let Some(hue) = zone.environment_base_hue {
            base.hue = Some(hue);
        }
        if let Some(hue) = zone.environment_dark_hue {
            dark.hue = Some(hue);
        }
    }
    if ctx.weather_sync {
        if let Some(weather) = ctx.weather {
            if !ctx.weather_deferred_to_fx(weather) {
                if let Some(hue) = weather.environment_base_hue {
                    base.hue = Some(hue);
                }
                if let Some(hue) = weather.environment_dark_hue {
                    dark.hue = Some(hue);
                }
            }
        }
    }

    if base.is_empty() && dark.is_empty() {
        None
    } else {
        Some(EnvironmentLighting { base, dark })
    }
}

/// Blend the four keyframes for the current time of day
fn time_of_day_color(ctx: &ComposeContext<'_>) -> Keyframe {
    let shift = ctx.zone.and_then(|z| z.color_shift.as_ref());
    let hue = |field: Option<f64>, default: f64| field.unwrap_or(default);

    let dawn = Keyframe {
        hue: hue(shift.and_then(|s| s.dawn_hue), 30.0),
        intensity: 0.25,
        luminosity: 0.05,
    };
    let midday = Keyframe {
        hue: hue(shift.and_then(|s| s.midday_hue), 45.0),
        intensity: 0.3,
        luminosity: 0.15,
    };
    let dusk = Keyframe {
        hue: hue(shift.and_then(|s| s.dusk_hue), 15.0),
        intensity: 0.25,
        luminosity: 0.0,
    };
    let night = Keyframe {
        hue: hue(shift.and_then(|s| s.night_hue), 220.0),
        intensity: 0.12,
        luminosity: -0.1,
    };

    let hpd = ctx.hours_per_day.max(1) as f64;
    let t = ctx.decimal_hour();

    // Without a sun cycle the blend regions are whole-day quarters
    let (sunrise, sunset, width) = match (ctx.sunrise, ctx.sunset) {
        (Some(rise), Some(set)) if set > rise && set <= hpd => {
            let minutes = shift.and_then(|s| s.transition_minutes).unwrap_or(60.0);
            let width = (minutes / ctx.minutes_per_hour.max(1) as f64).max(1.0 / 60.0);
            (rise, set, width)
        }
        _ => (hpd * 0.25, hpd * 0.75, hpd * 0.25),
    };
    let midpoint = (sunrise + sunset) / 2.0;

    if t < sunrise - width || t >= sunset + width {
        night
    } else if t < sunrise {
        night.blend(dawn, (t - (sunrise - width)) / width)
    } else if t < midpoint {
        dawn.blend(midday, (t - sunrise) / (midpoint - sunrise))
    } else if t < sunset {
        midday.blend(dusk, (t - midpoint) / (sunset - midpoint))
    } else {
        dusk.blend(night, (t - sunset) / width)
    }
}

struct MoonColor {
    hue: f64,
    intensity: f64,
    luminosity: f64,
}

/// Illumination-weighted blend of the colored moons. Colorless moons shed
/// light but contribute no hue.
fn moon_color(moons: &[MoonSnapshot]) -> Option<MoonColor> {
    let colored: Vec<(crate::lighting::color::Hsl, f64)> = moons
        .iter()
        .filter_map(|moon| {
            let hsl = parse_hex(moon.color.as_deref()?)?;
            let weight = moon.illumination();
            (weight > 0.0).then_some((hsl, weight))
        })
        .collect();

    let hue = weighted_circular_mean(
        &colored
            .iter()
            .map(|(hsl, w)| (hsl.hue, *w))
            .collect::<Vec<_>>(),
    )?;

    let total: f64 = colored.iter().map(|(_, w)| w).sum();
    let saturation: f64 =
        colored.iter().map(|(hsl, w)| hsl.saturation * w).sum::<f64>() / total;
    let luminosity: f64 =
        colored.iter().map(|(hsl, w)| (hsl.lightness - 0.5) * w).sum::<f64>() / total;

    Some(MoonColor {
        hue,
        intensity: saturation.min(0.55) * 0.5,
        luminosity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(base_darkness: f64, moons: &'a [MoonSnapshot]) -> ComposeContext<'a> {
        ComposeContext {
            base_darkness,
            scene_brightness: None,
            default_brightness: 1.0,
            zone: None,
            weather: None,
            moons,
            moon_sync: true,
            weather_sync: true,
            color_shift: true,
            fx_active: false,
            hour: 12,
            minute: 0,
            hours_per_day: 24,
            minutes_per_hour: 60,
            sunrise: Some(6.0),
            sunset: Some(18.0),
        }
    }

    fn full_moon(color: Option<&str>) -> MoonSnapshot {
        MoonSnapshot {
            name: "Moon".into(),
            phase_position: 0.5,
            color: color.map(String::from),
            brightness_max: None,
        }
    }

    #[test]
    fn test_moon_reduction_zero_by_day() {
        let moons = [full_moon(None)];
        assert_eq!(moon_illumination_reduction(0.49, &moons), 0.0);
        assert_eq!(moon_illumination_reduction(0.0, &moons), 0.0);
    }

    #[test]
    fn test_moon_reduction_monotone_in_darkness() {
        let moons = [full_moon(None)];
        let mut last = 0.0;
        for step in 0..=10 {
            let base = 0.5 + step as f64 * 0.05;
            let reduction = moon_illumination_reduction(base, &moons);
            assert!(reduction >= last, "not monotone at {}", base);
            last = reduction;
        }
        // A single full moon peaks at its default brightness
        assert!((last - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_moon_reduction_is_capped() {
        let moons: Vec<MoonSnapshot> = (0..5).map(|_| full_moon(None)).collect();
        assert_eq!(moon_illumination_reduction(1.0, &moons), 0.3);
    }

    #[test]
    fn test_adjust_clamps_pathological_multipliers() {
        let moons = [];
        for base in [0.0, 0.3, 0.7, 1.0] {
            for mult in [-2.0, 0.0, 0.5, 1.0, 10.0] {
                let mut c = ctx(base, &moons);
                c.scene_brightness = Some(mult);
                let d = adjust_darkness(&c);
                assert!((0.0..=1.0).contains(&d), "base {} mult {} -> {}", base, mult, d);
            }
        }
    }

    #[test]
    fn test_weather_penalty_applies_unless_fx_defers() {
        use crate::climate::SeasonKey;
        use crate::weather::builtin_presets;

        let storm = builtin_presets()
            .into_iter()
            .find(|p| p.id == "thunderstorm")
            .unwrap();
        let state = WeatherState::from_preset(&storm, 12.0, SeasonKey::Default);
        let moons = [];

        let mut c = ctx(0.2, &moons);
        c.weather = Some(&state);
        let with_penalty = adjust_darkness(&c);
        assert!((with_penalty - (0.2 + 0.3)).abs() < 1e-9);

        c.fx_active = true;
        let deferred = adjust_darkness(&c);
        assert!((deferred - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_compose_lighting_null_when_nothing_configured() {
        let moons = [];
        let mut c = ctx(0.2, &moons);
        c.color_shift = false;
        assert!(compose_lighting(&c).is_none());
    }

    #[test]
    fn test_midday_color_is_the_midday_keyframe() {
        let moons = [];
        let lighting = compose_lighting(&ctx(0.0, &moons)).unwrap();
        assert_eq!(lighting.base.hue, Some(45.0));
        assert_eq!(lighting.base.intensity, Some(0.3));
    }

    #[test]
    fn test_deep_night_color_is_the_night_keyframe() {
        let moons = [];
        let mut c = ctx(1.0, &moons);
        c.hour = 0;
        let lighting = compose_lighting(&c).unwrap();
        assert_eq!(lighting.base.hue, Some(220.0));
    }

    #[test]
    fn test_dawn_blend_is_between_night_and_dawn_hues() {
        let moons = [];
        let mut c = ctx(0.5, &moons);
        c.hour = 5;
        c.minute = 30;
        let lighting = compose_lighting(&c).unwrap();
        let hue = lighting.base.hue.unwrap();
        // Halfway along the short arc from 220 toward 30
        assert!(hue > 220.0 || hue < 30.0, "got {}", hue);
    }

    #[test]
    fn test_colored_moon_overrides_dark_channel_at_night() {
        let moons = [full_moon(Some("#ff4040"))];
        let mut c = ctx(0.9, &moons);
        c.hour = 0;
        let lighting = compose_lighting(&c).unwrap();
        let hue = lighting.dark.hue.unwrap();
        assert!(hue < 5.0 || hue > 355.0, "got {}", hue);
        assert!(lighting.dark.intensity.unwrap() <= 0.275 + 1e-9);
        // Base channel keeps the time-of-day color
        assert_eq!(lighting.base.hue, Some(220.0));
    }

    #[test]
    fn test_moon_ignored_during_day() {
        let moons = [full_moon(Some("#ff4040"))];
        let lighting = compose_lighting(&ctx(0.3, &moons)).unwrap();
        assert_eq!(lighting.dark.hue, Some(45.0));
    }

    #[test]
    fn test_zone_hue_override_wins_over_computed() {
        let moons = [];
        let mut zone = ClimateZone::new("Tinted");
        zone.environment_base_hue = Some(300.0);
        zone.environment_dark_hue = Some(10.0);
        let mut c = ctx(0.0, &moons);
        c.zone = Some(&zone);
        let lighting = compose_lighting(&c).unwrap();
        assert_eq!(lighting.base.hue, Some(300.0));
        assert_eq!(lighting.dark.hue, Some(10.0));
    }
}
