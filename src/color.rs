use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::selection::MAX_SERIES;

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

/// Colour of series slot `index`. Slots keep their colour when the series
/// count changes.
pub fn series_color(index: usize) -> Color32 {
    let palette = generate_palette(MAX_SERIES);
    palette[index % MAX_SERIES]
}
