//! Numeric conversions from the hue based notations to the sRGB color space.
//!
//! All conversions produce sRGB channels in `0..=255`, rounded to whole
//! numbers. Conversions only operate on the 3 color components; the alpha
//! component and flags are carried over untouched by the model methods.

use crate::color::{Component, Components};
use crate::{Hsl, Hwb, Srgb};

impl Hsl {
    /// Convert this color from the HSL notation to the sRGB color space.
    pub fn to_srgb(&self) -> Srgb {
        let Components(red, green, blue) = hsl_to_rgb(self.hue, self.saturation, self.lightness);
        Srgb {
            red,
            green,
            blue,
            alpha: self.alpha,
            flags: self.flags,
        }
    }
}

impl Hwb {
    /// Convert this color from the HWB notation to the sRGB color space.
    pub fn to_srgb(&self) -> Srgb {
        let Components(red, green, blue) = hwb_to_rgb(self.hue, self.whiteness, self.blackness);
        Srgb {
            red,
            green,
            blue,
            alpha: self.alpha,
            flags: self.flags,
        }
    }
}

/// Normalize an angle with the given unit to degrees in `0..360`. Returns
/// `None` for units that are not angles. A missing unit means degrees.
pub fn normalize_angle(value: Component, unit: &str) -> Option<Component> {
    let degrees = match unit.to_ascii_lowercase().as_str() {
        "" | "deg" => value,
        "grad" => value * 0.9,
        "rad" => value.to_degrees(),
        "turn" => value * 360.0,
        _ => return None,
    };

    Some(degrees.rem_euclid(360.0))
}

/// Convert from HSL notation to RGB notation.
///
/// `hue` is in degrees, `saturation` and `lightness` in `0..=1`.
pub fn hsl_to_rgb(hue: Component, saturation: Component, lightness: Component) -> Components {
    let hue = hue.rem_euclid(360.0);

    let i = hue / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (i % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;

    let (red, green, blue) = match (i.floor() as i64).rem_euclid(6) {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Components(red, green, blue).map(|v| (255.0 * (v + m)).round())
}

/// Convert from HWB notation to RGB notation.
///
/// `hue` is in degrees, `whiteness` and `blackness` in `0..=1`.
pub fn hwb_to_rgb(hue: Component, whiteness: Component, blackness: Component) -> Components {
    if whiteness + blackness >= 1.0 {
        let gray = (255.0 * whiteness / (whiteness + blackness)).round();
        return Components(gray, gray, gray);
    }

    let rgb = hsl_to_rgb(hue, 1.0, 0.5);
    let x = 1.0 - whiteness - blackness;
    let y = 255.0 * whiteness;
    rgb.map(|v| (x * v + y).round())
}
