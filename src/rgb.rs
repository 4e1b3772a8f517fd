//! Model a color in the sRGB color space with channels in `0..=255`.

use crate::color::{Component, Flags};
use crate::error::ColorError;
use crate::value::{Model, Value};

nightshade_macros::gen_model! {
    /// A color specified in the sRGB color space.
    pub struct Srgb {
        /// The red component of the color.
        red: Component,
        /// The green component of the color.
        green: Component,
        /// The blue component of the color.
        blue: Component,
    }
}

impl Srgb {
    /// Fully transparent black, the color every ill-shaped color degrades to.
    pub const TRANSPARENT: Srgb = Srgb {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        alpha: 0.0,
        flags: Flags::empty(),
    };

    /// Build a color from the arguments of an `rgb()` or `rgba()` model.
    /// Both the legacy comma separated and the modern space separated
    /// syntax are accepted.
    pub fn from_model(model: &Model) -> Result<Self, ColorError> {
        let (channels, alpha) = split_alpha(model)?;

        let channel = |value: &Value| -> Result<Component, ColorError> {
            let channel = match value {
                Value::Number { value, unit } if unit.is_empty() => *value,
                Value::Number { value, unit } if unit == "%" => *value * 255.0 / 100.0,
                Value::String(text) if text.eq_ignore_ascii_case("none") => 0.0,
                _ => return Err(ColorError::argument(&model.name, value)),
            };
            Ok(channel.clamp(0.0, 255.0))
        };

        let alpha = alpha
            .map(|alpha| parse_alpha(&model.name, alpha))
            .transpose()?;

        Ok(Srgb::new(
            channel(&channels[0])?,
            channel(&channels[1])?,
            channel(&channels[2])?,
            alpha,
        ))
    }

    /// Return the channels rounded to whole numbers.
    pub fn to_bytes(&self) -> [u8; 3] {
        let byte = |v: Component| v.round().clamp(0.0, 255.0) as u8;
        [byte(self.red), byte(self.green), byte(self.blue)]
    }

    /// Convert the color back into a value. Colors that were written as hex
    /// literals are written back as hex literals.
    pub fn to_value(&self) -> Value {
        let [red, green, blue] = self.to_bytes();
        let implicit = self.flags.contains(Flags::IMPLICIT_ALPHA);

        if self.flags.contains(Flags::HEX) {
            let mut hex = format!("#{red:02x}{green:02x}{blue:02x}");
            if !implicit {
                let alpha = (self.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
                hex.push_str(&format!("{alpha:02x}"));
            }
            return Value::String(hex);
        }

        let number = |value: Component| Value::Number {
            value,
            unit: String::new(),
        };

        let mut children = vec![
            number(red as Component),
            number(green as Component),
            number(blue as Component),
        ];
        if !implicit {
            children.push(number(
                (self.alpha.clamp(0.0, 1.0) * 1000.0).round() / 1000.0,
            ));
        }

        Value::Model(Model {
            name: if implicit { "rgb" } else { "rgba" }.to_string(),
            delimiters: vec![", ".to_string(); children.len() - 1],
            children,
        })
    }
}

/// Split the arguments of a color model into its three channels and the
/// optional alpha.
pub(crate) fn split_alpha(model: &Model) -> Result<(&[Value], Option<&Value>), ColorError> {
    match model.children.len() {
        3 => Ok((&model.children[..], None)),
        4 => Ok((&model.children[..3], Some(&model.children[3]))),
        found => Err(ColorError::Arity {
            name: model.name.clone(),
            found,
        }),
    }
}

/// Parse an alpha argument, either a number in `0..=1` or a percentage.
pub(crate) fn parse_alpha(name: &str, value: &Value) -> Result<Component, ColorError> {
    let alpha = match value {
        Value::Number { value, unit } if unit.is_empty() => *value,
        Value::Number { value, unit } if unit == "%" => *value / 100.0,
        Value::String(text) if text.eq_ignore_ascii_case("none") => 0.0,
        _ => return Err(ColorError::argument(name, value)),
    };
    Ok(alpha.clamp(0.0, 1.0))
}
