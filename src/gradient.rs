//! Gradients and their color stops.

use crate::color::{Color, Component, Components};
use crate::delimiter::{join_top_level, split_top_level, Delimiters};
use crate::value::{Model, Value};
use crate::Srgb;

/// The shape of a gradient.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradientKind {
    /// `linear-gradient()`
    Linear,
    /// `radial-gradient()`
    Radial,
    /// `conic-gradient()`
    Conic,
}

/// A color with its position along the gradient line.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorStop {
    /// The stop color.
    pub color: Color,
    /// The position(s) as written, empty if omitted.
    pub position: String,
}

/// An argument of a gradient.
#[derive(Clone, Debug, PartialEq)]
pub enum GradientPart {
    /// A color stop.
    Stop(ColorStop),
    /// The geometry, a color hint or anything else that is kept verbatim.
    Other(Value),
}

/// A gradient with its arguments in their original order.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    /// The function name as written, including vendor prefixes.
    pub name: String,
    /// The gradient shape.
    pub kind: GradientKind,
    /// Set for the `repeating-` spellings.
    pub repeating: bool,
    /// The arguments.
    pub parts: Vec<GradientPart>,
    /// The separators between the arguments.
    pub delimiters: Vec<String>,
}

impl Gradient {
    /// Build a gradient from a model that was classified as one.
    pub fn from_model(model: &Model, kind: GradientKind, repeating: bool) -> Self {
        let parts = model.children.iter().map(GradientPart::from_value).collect();

        Self {
            name: model.name.clone(),
            kind,
            repeating,
            parts,
            delimiters: model.delimiters.clone(),
        }
    }

    /// The color stops in order.
    pub fn stops(&self) -> impl Iterator<Item = &ColorStop> {
        self.parts.iter().filter_map(|part| match part {
            GradientPart::Stop(stop) => Some(stop),
            GradientPart::Other(_) => None,
        })
    }

    /// Return a copy of the gradient with every stop color mapped. Stops keep
    /// their order and positions.
    pub fn map_stops(&self, mut f: impl FnMut(&Color) -> Color) -> Self {
        let parts = self
            .parts
            .iter()
            .map(|part| match part {
                GradientPart::Stop(stop) => GradientPart::Stop(ColorStop {
                    color: f(&stop.color),
                    position: stop.position.clone(),
                }),
                GradientPart::Other(value) => GradientPart::Other(value.clone()),
            })
            .collect();

        Self {
            name: self.name.clone(),
            kind: self.kind,
            repeating: self.repeating,
            parts,
            delimiters: self.delimiters.clone(),
        }
    }

    /// The mean of all stop colors that are literal colors. Returns `None`
    /// if no stop is.
    pub fn average(&self) -> Option<Srgb> {
        let colors = self
            .stops()
            .filter_map(|stop| stop.color.to_srgb())
            .collect::<Vec<_>>();

        if colors.is_empty() {
            return None;
        }

        let count = colors.len() as Component;
        let (mut sum, mut alpha) = (Components(0.0, 0.0, 0.0), 0.0);
        for color in &colors {
            sum = Components(sum.0 + color.red, sum.1 + color.green, sum.2 + color.blue);
            alpha += color.alpha;
        }

        Some(Srgb::new(
            sum.0 / count,
            sum.1 / count,
            sum.2 / count,
            alpha / count,
        ))
    }

    /// Convert the gradient back into a model.
    pub fn to_value(&self) -> Value {
        let children = self
            .parts
            .iter()
            .map(|part| match part {
                GradientPart::Stop(ColorStop { color, position }) if position.is_empty() => {
                    color.to_value()
                }
                GradientPart::Stop(ColorStop { color, position }) => {
                    Value::String(format!("{color} {position}"))
                }
                GradientPart::Other(value) => value.clone(),
            })
            .collect();

        Value::Model(Model {
            name: self.name.clone(),
            children,
            delimiters: self.delimiters.clone(),
        })
    }
}

impl GradientPart {
    fn from_value(value: &Value) -> Self {
        let text = value.to_string();
        let (words, separators) = split_top_level(&text, Delimiters::SPACE);

        let color = words
            .first()
            .map(|first| Color::parse(first))
            .and_then(Result::ok);

        match color {
            Some(color) if !matches!(color, Color::Gradient(_)) => {
                GradientPart::Stop(ColorStop {
                    color,
                    position: join_top_level(&words[1..], &separators[1.min(separators.len())..]),
                })
            }
            _ => GradientPart::Other(value.clone()),
        }
    }
}
