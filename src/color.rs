/// Represents a color in RGBA format.
///
/// This struct encapsulates color information using red, green, blue, and alpha (opacity)
/// channels. Each channel is an 8-bit unsigned integer.
///
/// # Examples
///
/// Creating and manipulating colors:
///
/// ```
/// use tileblob::Color;
///
/// // Create a red color with full opacity
/// let red = Color::rgb(255, 0, 0);
///
/// // Blend it halfway toward black
/// let dim = red.mix(Color::BLACK, 0.5);
/// assert_eq!(dim, Color::rgb(128, 0, 0));
///
/// // Serialize to a hex string and back
/// assert_eq!(red.to_rgb_hex(), "#ff0000");
/// assert_eq!(Color::from_hex("#ff0000"), Some(red));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color(pub [u8; 4]);

impl Color {
    /// A transparent color.
    pub const TRANSPARENT: Self = Self([0, 0, 0, 0]);
    /// An opaque black color.
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    /// An opaque white color.
    pub const WHITE: Self = Self([255, 255, 255, 255]);

    /// Creates a new color with the specified RGB values and full opacity.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    /// Creates a new color with the specified RGBA values.
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Parses a `#rrggbb` hex string (leading `#` optional).
    ///
    /// Returns `None` for anything that is not six hex digits.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::rgb(r, g, b))
    }

    /// Creates an opaque color from hue, saturation and lightness.
    ///
    /// `hue` is in degrees (wrapped into [0, 360)), `saturation` and
    /// `lightness` are clamped to [0, 1].
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0);
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match (h / 60.0) as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self::rgb(
            ((r + m) * 255.0).round() as u8,
            ((g + m) * 255.0).round() as u8,
            ((b + m) * 255.0).round() as u8,
        )
    }

    /// Linearly interpolates every channel toward `other` by `amount` in [0, 1].
    ///
    /// `amount == 0.0` returns `self` unchanged, `amount == 1.0` returns `other`.
    pub fn mix(&self, other: Color, amount: f32) -> Self {
        let t = amount.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self([
            lerp(self.0[0], other.0[0]),
            lerp(self.0[1], other.0[1]),
            lerp(self.0[2], other.0[2]),
            lerp(self.0[3], other.0[3]),
        ])
    }

    /// Serializes the color as a lowercase `#rrggbb` string, discarding alpha.
    pub fn to_rgb_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }

    /// Returns the color as an array of 4 `u8` values.
    pub fn to_array(&self) -> [u8; 4] {
        self.0
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn mix_zero_amount_keeps_original() {
        let c = Color::rgb(10, 200, 30);
        assert_eq!(c.mix(Color::BLACK, 0.0), c);
    }

    #[test]
    fn mix_full_amount_returns_target() {
        let c = Color::rgb(10, 200, 30);
        assert_eq!(c.mix(Color::WHITE, 1.0), Color::WHITE);
    }

    #[test]
    fn mix_toward_black_darkens_channels() {
        let c = Color::rgb(200, 100, 50);
        assert_eq!(c.mix(Color::BLACK, 0.5), Color::rgb(100, 50, 25));
    }

    #[test]
    fn hex_round_trip() {
        let c = Color::rgb(0x12, 0xab, 0xef);
        assert_eq!(Color::from_hex(&c.to_rgb_hex()), Some(c));
    }

    #[test]
    fn from_hex_rejects_malformed_input() {
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("zzzzzz"), None);
        assert_eq!(Color::from_hex(""), None);
    }

    #[test]
    fn from_hex_accepts_bare_digits() {
        assert_eq!(Color::from_hex("ff8000"), Some(Color::rgb(255, 128, 0)));
    }

    #[test]
    fn from_hsl_primaries() {
        assert_eq!(Color::from_hsl(0.0, 1.0, 0.5), Color::rgb(255, 0, 0));
        assert_eq!(Color::from_hsl(120.0, 1.0, 0.5), Color::rgb(0, 255, 0));
        assert_eq!(Color::from_hsl(240.0, 1.0, 0.5), Color::rgb(0, 0, 255));
    }

    #[test]
    fn from_hsl_wraps_hue() {
        assert_eq!(Color::from_hsl(360.0, 1.0, 0.5), Color::from_hsl(0.0, 1.0, 0.5));
        assert_eq!(Color::from_hsl(-120.0, 1.0, 0.5), Color::from_hsl(240.0, 1.0, 0.5));
    }

    #[test]
    fn from_hsl_zero_saturation_is_gray() {
        let c = Color::from_hsl(57.0, 0.0, 0.5);
        assert_eq!(c.0[0], c.0[1]);
        assert_eq!(c.0[1], c.0[2]);
    }
}
