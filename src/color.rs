use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::query::parse_number;

// ---------------------------------------------------------------------------
// Rating colour scale
// ---------------------------------------------------------------------------

const MAX_RATING: f32 = 5.0;

/// Colour for a rating cell: red at 0 through yellow to green at 5.
/// Cells that are not a number get no colour.
pub fn rating_color(cell: &str) -> Option<Color32> {
    let rating = parse_number(cell).ok()? as f32;
    let t = (rating / MAX_RATING).clamp(0.0, 1.0);

    let hsl = Hsl::new(t * 120.0, 0.65, 0.5);
    let rgb: Srgb = hsl.into_color();
    Some(Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    ))
}
