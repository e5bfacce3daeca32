use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

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
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Categorical mapping: product category → Color32
// ---------------------------------------------------------------------------

/// Maps the categories of a grouped summary to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from sorted category names.
    pub fn new<'a>(categories: impl ExactSizeIterator<Item = &'a String>) -> Self {
        let palette = generate_palette(categories.len());
        let mapping = categories
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given category.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Continuous scale: count → Color32
// ---------------------------------------------------------------------------

/// Anchor points of the Viridis colour scale, dark to bright.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Map `t` in `[0, 1]` onto the Viridis scale, interpolating in linear RGB.
pub fn viridis(t: f32) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (VIRIDIS.len() - 1) as f32;
    let lo = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - lo as f32;

    let anchor = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    };
    let mixed = anchor(VIRIDIS[lo]).mix(anchor(VIRIDIS[lo + 1]), frac);
    to_color32(Srgb::from_linear(mixed))
}

/// Colour for `value` on a scale spanning `min..=max`.
pub fn scale_color(value: f64, min: f64, max: f64) -> Color32 {
    let span = max - min;
    if span.abs() < f64::EPSILON {
        return viridis(1.0);
    }
    viridis(((value - min) / span) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        assert_ne!(p[0], p[1]);
    }

    #[test]
    fn unknown_category_falls_back_to_gray() {
        let cats = vec!["Beverage".to_string(), "Food".to_string()];
        let cm = ColorMap::new(cats.iter());
        assert_ne!(cm.color_for("Beverage"), Color32::GRAY);
        assert_ne!(cm.color_for("Beverage"), cm.color_for("Food"));
        assert_eq!(cm.color_for("Merchandise"), Color32::GRAY);
    }

    #[test]
    fn viridis_hits_its_endpoints() {
        assert_eq!(viridis(0.0), Color32::from_rgb(68, 1, 84));
        assert_eq!(viridis(1.0), Color32::from_rgb(253, 231, 37));
        assert_eq!(viridis(-3.0), viridis(0.0));
        assert_eq!(viridis(f32::NAN), viridis(0.0));
    }

    #[test]
    fn flat_scale_uses_top_colour() {
        assert_eq!(scale_color(3.0, 3.0, 3.0), viridis(1.0));
        assert_eq!(scale_color(0.0, 0.0, 10.0), viridis(0.0));
    }
}
