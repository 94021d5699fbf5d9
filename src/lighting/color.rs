//! Small HSL color toolkit for ambient lighting
//!
//! Hues live on a circle, so blending and averaging must be wrap-aware;
//! a naive average of 350 and 10 degrees would give green instead of red.

/// A color in HSL space. Hue in degrees [0,360), saturation and
/// lightness in [0,1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

/// Parse a `#rrggbb` (or `rrggbb`) hex color into HSL
pub fn parse_hex(color: &str) -> Option<Hsl> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f64 / 255.0;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f64 / 255.0;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;
    let delta = max - min;

    if delta < f64::EPSILON {
        return Some(Hsl {
            hue: 0.0,
            saturation: 0.0,
            lightness,
        });
    }

    let saturation = if lightness > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let hue = if (max - r).abs() < f64::EPSILON {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if (max - g).abs() < f64::EPSILON {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    Some(Hsl {
        hue: hue.rem_euclid(360.0),
        saturation,
        lightness,
    })
}

/// Blend two hues along the shortest circular arc
pub fn lerp_hue(from: f64, to: f64, t: f64) -> f64 {
    let mut delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    (from + delta * t).rem_euclid(360.0)
}

/// Plain linear blend for the non-circular channels
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Weight-averaged hue over the circle. `None` when every weight is zero.
pub fn weighted_circular_mean(hues: &[(f64, f64)]) -> Option<f64> {
    let mut x = 0.0;
    let mut y = 0.0;
    let mut total = 0.0;
    for &(hue, weight) in hues {
        if weight <= 0.0 {
            continue;
        }
        let rad = hue.to_radians();
        x += rad.cos() * weight;
        y += rad.sin() * weight;
        total += weight;
    }
    if total <= 0.0 {
        return None;
    }
    Some(y.atan2(x).to_degrees().rem_euclid(360.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_primaries() {
        let red = parse_hex("#ff0000").unwrap();
        assert!(red.hue.abs() < 0.01);
        assert!((red.saturation - 1.0).abs() < 0.01);
        assert!((red.lightness - 0.5).abs() < 0.01);

        let green = parse_hex("00ff00").unwrap();
        assert!((green.hue - 120.0).abs() < 0.01);

        let blue = parse_hex("#0000ff").unwrap();
        assert!((blue.hue - 240.0).abs() < 0.01);
    }

    #[test]
    fn test_parse_hex_grey_is_unsaturated() {
        let grey = parse_hex("#808080").unwrap();
        assert_eq!(grey.saturation, 0.0);
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex("#12345").is_none());
        assert!(parse_hex("not a color").is_none());
        assert!(parse_hex("#gggggg").is_none());
    }

    #[test]
    fn test_lerp_hue_takes_short_arc() {
        // 350 -> 10 should pass through 0, not 180
        let mid = lerp_hue(350.0, 10.0, 0.5);
        assert!(mid < 20.0 || mid > 340.0, "got {}", mid);
        assert!((lerp_hue(350.0, 10.0, 1.0) - 10.0).abs() < 0.01);

        // Plain case stays plain
        assert!((lerp_hue(30.0, 45.0, 0.5) - 37.5).abs() < 0.01);
    }

    #[test]
    fn test_weighted_circular_mean_wraps() {
        let mean = weighted_circular_mean(&[(350.0, 1.0), (10.0, 1.0)]).unwrap();
        assert!(mean < 1.0 || mean > 359.0, "got {}", mean);
    }

    #[test]
    fn test_weighted_circular_mean_respects_weights() {
        let mean = weighted_circular_mean(&[(0.0, 3.0), (90.0, 1.0)]).unwrap();
        assert!(mean > 0.0 && mean < 45.0, "got {}", mean);
    }

    #[test]
    fn test_weighted_circular_mean_empty() {
        assert!(weighted_circular_mean(&[]).is_none());
        assert!(weighted_circular_mean(&[(120.0, 0.0)]).is_none());
    }
}
