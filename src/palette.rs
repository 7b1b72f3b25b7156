//! Random palette generation for gradient stops.
//!
//! Hues are stepped by the golden-ratio conjugate from a random starting
//! point, which spreads them evenly around the wheel no matter how many
//! entries the palette ends up with. Saturation is shared across the
//! palette; lightness is drawn per entry.

use crate::color::Color;
use rand::Rng;

/// The golden ratio, `(1 + sqrt(5)) / 2`.
pub const PHI: f64 = 1.618_033_988_749_895;

const MIN_COLORS: usize = 4;
const MAX_COLORS: usize = 6;

/// Produces a fresh random palette of 4 to 6 opaque colors.
///
/// The result is never empty; callers may index it with any uniformly
/// drawn index.
pub fn random_palette<R: Rng>(rng: &mut R) -> Vec<Color> {
    let count = rng.gen_range(MIN_COLORS..=MAX_COLORS);
    let mut hue = rng.gen::<f64>();
    let saturation = 0.55 + rng.gen::<f64>() * 0.35;

    let mut colors = Vec::with_capacity(count);
    for _ in 0..count {
        let lightness = 0.35 + rng.gen::<f64>() * 0.35;
        colors.push(Color::from_hsl(
            (hue * 360.0) as f32,
            saturation as f32,
            lightness as f32,
        ));
        hue = (hue + (PHI - 1.0)).fract();
    }
    colors
}

/// Picks one palette entry uniformly at random.
///
/// Panics on an empty slice; `Scene` validates the palette before any pick.
pub(crate) fn pick<R: Rng>(palette: &[Color], rng: &mut R) -> Color {
    palette[rng.gen_range(0..palette.len())]
}
