//! Base darkness curve: time of day -> darkness scalar
//!
//! The curve must be continuous as time advances, pauses, or jumps. Darkness
//! is 0.0 at the brightest point of the day and 1.0 at the darkest.

use std::f64::consts::TAU;

use crate::core::types::clamp01;

/// Base darkness for a time of day.
///
/// Without a sun cycle the whole day is one symmetric cosine: darkest at
/// hour 0, brightest at `hours_per_day / 2`. With known sunrise/sunset the
/// curve splits into two cosine halves that meet at exactly 0.5 at both
/// seams: daylight occupies [0, 0.5], night occupies [0.5, 1] with its
/// progress wrapping across midnight.
pub fn base_darkness(
    hour: u32,
    minute: u32,
    hours_per_day: u32,
    minutes_per_hour: u32,
    sunrise: Option<f64>,
    sunset: Option<f64>,
) -> f64 {
    let hours_per_day = hours_per_day.max(1) as f64;
    let t = hour as f64 + minute as f64 / minutes_per_hour.max(1) as f64;

    let (sunrise, sunset) = match (sunrise, sunset) {
        (Some(rise), Some(set)) if set > rise && set <= hours_per_day => (rise, set),
        _ => {
            return clamp01(((TAU * t / hours_per_day).cos() + 1.0) / 2.0);
        }
    };

    let daylight = sunset - sunrise;
    let night = hours_per_day - daylight;

    let d = if t >= sunrise && t < sunset {
        let p = (t - sunrise) / daylight;
        ((TAU * p).cos() + 1.0) / 4.0
    } else {
        let since_sunset = if t >= sunset {
            t - sunset
        } else {
            t + hours_per_day - sunset
        };
        let p = if night > 0.0 { since_sunset / night } else { 0.0 };
        0.5 + (1.0 - (TAU * p).cos()) / 4.0
    };

    clamp01(d)
}
