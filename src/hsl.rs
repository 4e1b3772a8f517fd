//! Model a color with the HSL notation in the sRGB color space.

use crate::color::Component;
use crate::convert::normalize_angle;
use crate::error::ColorError;
use crate::rgb::{parse_alpha, split_alpha};
use crate::value::{Model, Value};

nightshade_macros::gen_model! {
    /// A color specified with the HSL notation in the sRGB color space.
    pub struct Hsl {
        /// The hue component of the color in degrees.
        hue: Component,
        /// The saturation component of the color in `0..=1`.
        saturation: Component,
        /// The lightness component of the color in `0..=1`.
        lightness: Component,
    }
}

impl Hsl {
    /// Build a color from the arguments of an `hsl()` or `hsla()` model.
    pub fn from_model(model: &Model) -> Result<Self, ColorError> {
        let (components, alpha) = split_alpha(model)?;

        let alpha = alpha
            .map(|alpha| parse_alpha(&model.name, alpha))
            .transpose()?;

        Ok(Hsl::new(
            parse_hue(&model.name, &components[0])?,
            parse_fraction(&model.name, &components[1])?,
            parse_fraction(&model.name, &components[2])?,
            alpha,
        ))
    }

    /// Convert the color back into an `hsl()` or `hsla()` value.
    pub fn to_value(&self) -> Value {
        hue_model("hsl", self.hue, self.saturation, self.lightness, self)
    }
}

/// Parse a hue argument with an optional angle unit into degrees.
pub(crate) fn parse_hue(name: &str, value: &Value) -> Result<Component, ColorError> {
    match value {
        Value::Number { value: v, unit } => {
            normalize_angle(*v, unit).ok_or_else(|| ColorError::argument(name, value))
        }
        Value::String(text) if text.eq_ignore_ascii_case("none") => Ok(0.0),
        _ => Err(ColorError::argument(name, value)),
    }
}

/// Parse a percentage argument into `0..=1`. Plain numbers are read as
/// percentages too.
pub(crate) fn parse_fraction(name: &str, value: &Value) -> Result<Component, ColorError> {
    match value {
        Value::Number { value, unit } if unit.is_empty() || unit == "%" => {
            Ok((*value / 100.0).clamp(0.0, 1.0))
        }
        Value::String(text) if text.eq_ignore_ascii_case("none") => Ok(0.0),
        _ => Err(ColorError::argument(name, value)),
    }
}

/// Build the model of a hue based notation.
pub(crate) fn hue_model(
    name: &str,
    hue: Component,
    c1: Component,
    c2: Component,
    model: &impl HasAlpha,
) -> Value {
    let round = |v: Component| (v * 100.0).round() / 100.0;

    let mut children = vec![
        Value::Number {
            value: round(hue),
            unit: String::new(),
        },
        Value::Number {
            value: round(c1 * 100.0),
            unit: "%".to_string(),
        },
        Value::Number {
            value: round(c2 * 100.0),
            unit: "%".to_string(),
        },
    ];

    let mut delimiters = vec![" ".to_string(), " ".to_string()];
    if let Some(alpha) = model.explicit_alpha() {
        children.push(Value::Number {
            value: (alpha * 1000.0).round() / 1000.0,
            unit: String::new(),
        });
        delimiters.push(" / ".to_string());
    }

    Value::Model(Model {
        name: name.to_string(),
        children,
        delimiters,
    })
}

/// Models that carry an alpha component that might have been omitted.
pub(crate) trait HasAlpha {
    fn explicit_alpha(&self) -> Option<Component>;
}

impl HasAlpha for Hsl {
    fn explicit_alpha(&self) -> Option<Component> {
        (!self.flags.contains(crate::Flags::IMPLICIT_ALPHA)).then_some(self.alpha)
    }
}
