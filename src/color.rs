use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Diverging ramp for the correlation heatmap
// ---------------------------------------------------------------------------

const COLD: (f32, f32, f32) = (0.23, 0.42, 0.78);
const WARM: (f32, f32, f32) = (0.84, 0.24, 0.20);
const NEUTRAL: (f32, f32, f32) = (0.97, 0.97, 0.97);

/// Maps a correlation coefficient in [-1, 1] onto a blue–white–red ramp.
/// Values outside the interval are clamped.
pub fn diverging(value: f64) -> Color32 {
    let t = (value.clamp(-1.0, 1.0) as f32 + 1.0) / 2.0;
    let (from, to, f) = if t < 0.5 {
        (COLD, NEUTRAL, t * 2.0)
    } else {
        (NEUTRAL, WARM, (t - 0.5) * 2.0)
    };
    let lerp = |a: f32, b: f32| a + (b - a) * f;
    Color32::from_rgb(
        (lerp(from.0, to.0) * 255.0) as u8,
        (lerp(from.1, to.1) * 255.0) as u8,
        (lerp(from.2, to.2) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the unique values of a categorical column to distinct colours, so a
/// series keeps its colour across charts and interactions.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from a column's unique values.
    pub fn new(unique_values: &BTreeSet<String>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping: BTreeMap<String, Color32> = unique_values
            .iter()
            .cloned()
            .zip(palette.into_iter())
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Build a colour map from values in a given order (e.g. trend titles
    /// ranked by frequency).
    pub fn from_ordered(values: &[String]) -> Self {
        let palette = generate_palette(values.len());
        let mapping: BTreeMap<String, Color32> =
            values.iter().cloned().zip(palette.into_iter()).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given category value.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_produces_distinct_colors() {
        let palette = generate_palette(8);
        assert_eq!(palette.len(), 8);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn diverging_endpoints_and_midpoint() {
        let negative = diverging(-1.0);
        let positive = diverging(1.0);
        let neutral = diverging(0.0);
        assert!(negative.b() > negative.r());
        assert!(positive.r() > positive.b());
        assert!(neutral.r() > 200 && neutral.g() > 200 && neutral.b() > 200);
    }

    #[test]
    fn color_map_falls_back_for_unknown_values() {
        let values: BTreeSet<String> = ["EN", "SE"].iter().map(|s| s.to_string()).collect();
        let map = ColorMap::new(&values);
        assert_ne!(map.color_for("EN"), map.color_for("SE"));
        assert_eq!(map.color_for("??"), Color32::GRAY);
    }
}
