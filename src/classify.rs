//! Decide which kind of color, if any, a parsed value describes.

use crate::color::{Color, Flags, FunctionalKeyword, Variable};
use crate::delimiter::join_top_level;
use crate::error::ColorError;
use crate::gradient::{Gradient, GradientKind};
use crate::named::{is_system_color, named_color};
use crate::value::{Model, Value};
use crate::{Hsl, Hwb, Srgb};

const VENDOR_PREFIXES: [&str; 4] = ["-webkit-", "-moz-", "-o-", "-ms-"];

/// Remove a known vendor prefix from a function or property name.
pub fn strip_vendor_prefix(name: &str) -> &str {
    VENDOR_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}

/// The color models that are understood.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorModel {
    /// `rgb()` and `rgba()`
    Rgb,
    /// `hsl()` and `hsla()`
    Hsl,
    /// `hwb()`
    Hwb,
    /// `color-mix()`
    ColorMix,
}

/// What a function call describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelKind {
    /// A color model.
    Color(ColorModel),
    /// A gradient.
    Gradient {
        /// The gradient shape.
        kind: GradientKind,
        /// Set for the `repeating-` spellings.
        repeating: bool,
    },
    /// A `var()` reference.
    Variable,
    /// Anything else.
    Other,
}

impl ModelKind {
    /// Classify a function name, ignoring case and vendor prefixes.
    pub fn of(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        let name = strip_vendor_prefix(&name);

        let (name, repeating) = match name.strip_prefix("repeating-") {
            Some(name) => (name, true),
            None => (name, false),
        };

        let gradient = |kind| ModelKind::Gradient { kind, repeating };

        match name {
            "linear-gradient" => gradient(GradientKind::Linear),
            "radial-gradient" => gradient(GradientKind::Radial),
            "conic-gradient" => gradient(GradientKind::Conic),
            _ if repeating => ModelKind::Other,
            "rgb" | "rgba" => ModelKind::Color(ColorModel::Rgb),
            "hsl" | "hsla" => ModelKind::Color(ColorModel::Hsl),
            "hwb" => ModelKind::Color(ColorModel::Hwb),
            "color-mix" => ModelKind::Color(ColorModel::ColorMix),
            "var" => ModelKind::Variable,
            _ => ModelKind::Other,
        }
    }
}

/// Reinterpret a hex literal like `#f80` or `#ff880080` as an `rgb()` or
/// `rgba()` model. Returns `None` if the text is not a hex literal.
pub fn hex_to_model(text: &str) -> Option<Model> {
    let digits = text.strip_prefix('#')?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).map(|n| n * 17);
    let byte = |i: usize| u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16);

    let bytes = match digits.len() {
        3 | 4 => (0..digits.len()).map(nibble).collect::<Result<Vec<_>, _>>(),
        6 | 8 => (0..digits.len() / 2).map(byte).collect::<Result<Vec<_>, _>>(),
        _ => return None,
    }
    .ok()?;

    let mut children = bytes[..3]
        .iter()
        .map(|b| Value::number(*b as _))
        .collect::<Vec<_>>();

    let name = if let Some(alpha) = bytes.get(3) {
        children.push(Value::number(*alpha as crate::Component / 255.0));
        "rgba"
    } else {
        "rgb"
    };

    Some(Model::new(name, children, ", "))
}

impl Color {
    /// Parse value text into a color.
    pub fn parse(text: &str) -> Result<Color, ColorError> {
        Color::from_value(&Value::parse(text))
    }

    /// Classify a parsed value as a color.
    pub fn from_value(value: &Value) -> Result<Color, ColorError> {
        match value {
            Value::Number { .. } => Err(ColorError::NotAColor),
            Value::String(text) => Color::from_token(text),
            Value::Model(model) => Color::from_model(model),
        }
    }

    fn from_token(text: &str) -> Result<Color, ColorError> {
        if text.starts_with('#') {
            let model = hex_to_model(text).ok_or(ColorError::NotAColor)?;
            let mut srgb = Srgb::from_model(&model)?;
            srgb.flags |= Flags::HEX;
            return Ok(Color::Rgb(srgb));
        }

        if let Some(srgb) = named_color(text) {
            return Ok(Color::Rgb(srgb));
        }

        if let Some(keyword) = FunctionalKeyword::parse(text) {
            return Ok(Color::Keyword(keyword));
        }

        if is_system_color(text) {
            return Ok(Color::System(text.to_string()));
        }

        Err(ColorError::NotAColor)
    }

    /// Classify a function call as a color. Recognized color models with the
    /// wrong shape are errors other than [`ColorError::NotAColor`].
    pub fn from_model(model: &Model) -> Result<Color, ColorError> {
        match ModelKind::of(&model.name) {
            ModelKind::Color(ColorModel::Rgb) => Srgb::from_model(model).map(Color::Rgb),
            ModelKind::Color(ColorModel::Hsl) => Hsl::from_model(model).map(Color::Hsl),
            ModelKind::Color(ColorModel::Hwb) => Hwb::from_model(model).map(Color::Hwb),
            ModelKind::Color(ColorModel::ColorMix) => Ok(Color::Function(model.clone())),
            ModelKind::Gradient { kind, repeating } => Ok(Color::Gradient(Gradient::from_model(
                model, kind, repeating,
            ))),
            ModelKind::Variable => variable_from_model(model).map(Color::Variable),
            ModelKind::Other => Err(ColorError::NotAColor),
        }
    }
}

fn variable_from_model(model: &Model) -> Result<Variable, ColorError> {
    let name = match model.children.first() {
        Some(Value::String(name)) if name.starts_with("--") => name.clone(),
        Some(value) => return Err(ColorError::argument(&model.name, value)),
        None => {
            return Err(ColorError::Arity {
                name: model.name.clone(),
                found: 0,
            })
        }
    };

    let fallback = match model.children.len() {
        0 | 1 => None,
        2 => Some(model.children[1].clone()),
        _ => {
            let rest = model.children[1..]
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            let separators = model.delimiters.get(1..).unwrap_or_default();
            Some(Value::parse(&join_top_level(&rest, separators)))
        }
    };

    Ok(Variable {
        name,
        fallback: fallback.map(Box::new),
    })
}
