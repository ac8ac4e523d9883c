use rand::Rng;
use serde::{Deserialize, Serialize};

/// OKLCH lightness used for generated cursor colors.
const CURSOR_LIGHTNESS: f64 = 0.72;
/// OKLCH chroma used for generated cursor colors.
const CURSOR_CHROMA: f64 = 0.14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self { r, g, b, a: 255 })
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Self { r, g, b, a })
            }
            _ => None,
        }
    }

    /// Convert an OKLCH color (lightness 0-1, chroma, hue in degrees) to sRGB.
    ///
    /// Out-of-gamut channels are clamped.
    pub fn from_oklch(lightness: f64, chroma: f64, hue_degrees: f64) -> Self {
        let hue = hue_degrees.to_radians();
        let a = chroma * hue.cos();
        let b = chroma * hue.sin();

        let l_ = lightness + 0.396_337_777_4 * a + 0.215_803_757_3 * b;
        let m_ = lightness - 0.105_561_345_8 * a - 0.063_854_172_8 * b;
        let s_ = lightness - 0.089_484_177_5 * a - 1.291_485_548_0 * b;

        let l = l_ * l_ * l_;
        let m = m_ * m_ * m_;
        let s = s_ * s_ * s_;

        let r = 4.076_741_662_1 * l - 3.307_711_591_3 * m + 0.230_969_929_2 * s;
        let g = -1.268_438_004_6 * l + 2.609_757_401_1 * m - 0.341_319_396_5 * s;
        let bl = -0.004_196_086_3 * l - 0.703_418_614_7 * m + 1.707_614_701_0 * s;

        Self {
            r: encode_srgb(r),
            g: encode_srgb(g),
            b: encode_srgb(bl),
            a: 255,
        }
    }

    /// A cursor color with a random hue at fixed perceptual lightness and chroma,
    /// so every generated color reads equally well against the same background.
    pub fn random_cursor_color() -> Self {
        let hue = rand::thread_rng().gen_range(0.0..360.0);
        Self::from_oklch(CURSOR_LIGHTNESS, CURSOR_CHROMA, hue)
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_rgba_string(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// Linear-light channel to gamma-encoded 8-bit sRGB.
fn encode_srgb(linear: f64) -> u8 {
    let linear = linear.clamp(0.0, 1.0);
    let encoded = if linear <= 0.003_130_8 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round().clamp(0.0, 255.0) as u8
}
