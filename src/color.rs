//! A [`Color`] represents any color-bearing CSS value the inversion engine
//! understands: literal colors, color functions, gradients, variable
//! references and keywords.

use bitflags::bitflags;

use crate::gradient::Gradient;
use crate::value::{Model, Value};
use crate::{Hsl, Hwb, Srgb};

#[cfg(not(feature = "f64"))]
/// A 32-bit floating point value that all components are stored as.
pub type Component = f32;

#[cfg(feature = "f64")]
/// A 64-bit floating point value that all components are stored as.
pub type Component = f64;

/// Represent the three components that describe any color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Components(pub Component, pub Component, pub Component);

impl Components {
    /// Return new components with each component mapped with the given
    /// function.
    pub fn map(&self, f: impl Fn(Component) -> Component) -> Self {
        Self(f(self.0), f(self.1), f(self.2))
    }

    /// The largest of the three components.
    pub fn max(&self) -> Component {
        self.0.max(self.1).max(self.2)
    }

    /// The smallest of the three components.
    pub fn min(&self) -> Component {
        self.0.min(self.1).min(self.2)
    }
}

bitflags! {
    /// Flags describing how a color was written.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Flags : u8 {
        /// Set when the alpha component was omitted. An omitted alpha is
        /// fully opaque and is not written back out.
        const IMPLICIT_ALPHA = 1 << 0;
        /// Set when the color was written as a hex literal.
        const HEX = 1 << 1;
    }
}

/// A struct that holds details about an alpha component passed to any of the
/// `new` functions for color models.
pub struct AlphaDetails {
    value: Component,
    is_none: bool,
}

impl AlphaDetails {
    /// Extract the value and set the given flag if the component is none.
    pub fn value_and_flag(&self, flags: &mut Flags, flag: Flags) -> Component {
        if self.is_none {
            *flags |= flag;
        }
        self.value
    }
}

impl From<Component> for AlphaDetails {
    fn from(value: Component) -> Self {
        Self {
            value,
            is_none: false,
        }
    }
}

impl From<Option<Component>> for AlphaDetails {
    fn from(value: Option<Component>) -> Self {
        if let Some(value) = value {
            Self::from(value)
        } else {
            Self {
                value: 1.0,
                is_none: true,
            }
        }
    }
}

/// Keywords that stand in for a color without naming one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionalKeyword {
    /// `currentcolor`
    CurrentColor,
    /// `transparent`
    Transparent,
    /// `inherit`
    Inherit,
    /// `initial`
    Initial,
    /// `unset`
    Unset,
    /// `revert`
    Revert,
    /// `revert-layer`
    RevertLayer,
}

impl FunctionalKeyword {
    /// Match a keyword case-insensitively.
    pub fn parse(text: &str) -> Option<Self> {
        use FunctionalKeyword as K;

        let keyword = match text.to_ascii_lowercase().as_str() {
            "currentcolor" => K::CurrentColor,
            "transparent" => K::Transparent,
            "inherit" => K::Inherit,
            "initial" => K::Initial,
            "unset" => K::Unset,
            "revert" => K::Revert,
            "revert-layer" => K::RevertLayer,
            _ => return None,
        };

        Some(keyword)
    }

    /// The canonical spelling of the keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CurrentColor => "currentcolor",
            Self::Transparent => "transparent",
            Self::Inherit => "inherit",
            Self::Initial => "initial",
            Self::Unset => "unset",
            Self::Revert => "revert",
            Self::RevertLayer => "revert-layer",
        }
    }
}

/// A `var()` reference. The referenced value is never resolved here.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    /// The custom property name, including the leading `--`.
    pub name: String,
    /// The fallback used when the custom property is not defined.
    pub fallback: Option<Box<Value>>,
}

impl Variable {
    /// Create a reference to the given custom property without a fallback.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fallback: None,
        }
    }

    /// Convert the reference back into a `var()` model.
    pub fn to_value(&self) -> Value {
        let mut children = vec![Value::String(self.name.clone())];
        let mut delimiters = vec![];
        if let Some(fallback) = &self.fallback {
            children.push(fallback.as_ref().clone());
            delimiters.push(", ".to_string());
        }

        Value::Model(Model {
            name: "var".to_string(),
            children,
            delimiters,
        })
    }
}

/// Every form of color the inversion engine dispatches on.
#[derive(Clone, Debug, PartialEq)]
pub enum Color {
    /// A color in the sRGB color space, from `rgb()`, `rgba()`, a hex
    /// literal or a named color.
    Rgb(Srgb),
    /// A color using the HSL notation.
    Hsl(Hsl),
    /// A color using the HWB notation.
    Hwb(Hwb),
    /// A color function whose arguments may themselves be colors, like
    /// `color-mix()`.
    Function(Model),
    /// A reference to a custom property.
    Variable(Variable),
    /// A linear, radial or conic gradient.
    Gradient(Gradient),
    /// A keyword like `currentcolor` or `transparent`.
    Keyword(FunctionalKeyword),
    /// A CSS system color like `Canvas`.
    System(String),
    /// A computed expression that is written out verbatim.
    Expression(Value),
}

impl Color {
    /// Return the color in the sRGB color space if it is a literal color.
    pub fn to_srgb(&self) -> Option<Srgb> {
        match self {
            Color::Rgb(srgb) => Some(*srgb),
            Color::Hsl(hsl) => Some(hsl.to_srgb()),
            Color::Hwb(hwb) => Some(hwb.to_srgb()),
            Color::Keyword(FunctionalKeyword::Transparent) => Some(Srgb::TRANSPARENT),
            _ => None,
        }
    }

    /// Convert the color back into a value that can be serialized.
    pub fn to_value(&self) -> Value {
        match self {
            Color::Rgb(srgb) => srgb.to_value(),
            Color::Hsl(hsl) => hsl.to_value(),
            Color::Hwb(hwb) => hwb.to_value(),
            Color::Function(model) => Value::Model(model.clone()),
            Color::Variable(variable) => variable.to_value(),
            Color::Gradient(gradient) => gradient.to_value(),
            Color::Keyword(keyword) => Value::String(keyword.as_str().to_string()),
            Color::System(name) => Value::String(name.clone()),
            Color::Expression(value) => value.clone(),
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.to_value(), f)
    }
}

impl From<Srgb> for Color {
    fn from(value: Srgb) -> Self {
        Color::Rgb(value)
    }
}

impl From<Hsl> for Color {
    fn from(value: Hsl) -> Self {
        Color::Hsl(value)
    }
}

impl From<Hwb> for Color {
    fn from(value: Hwb) -> Self {
        Color::Hwb(value)
    }
}
