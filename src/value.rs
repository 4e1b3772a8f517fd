//! Parse CSS value text into a tree of [`Value`]s.
//!
//! The parser never fails. Anything that is not a number or a single
//! function call is kept as an opaque string token and written back out
//! exactly as it was read.

use crate::color::Component;
use crate::delimiter::{is_top_level_function_call, join_top_level, split_top_level, Delimiters};

/// A parsed unit of a CSS value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A number with an optional unit. The unit is empty for unitless
    /// numbers and `%` for percentages.
    Number {
        /// The numeric value.
        value: Component,
        /// The unit suffix.
        unit: String,
    },
    /// An opaque token.
    String(String),
    /// A function call.
    Model(Model),
}

/// A named function call like `rgb(0, 0, 0)` or `linear-gradient(...)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    /// The function name as written, including any vendor prefix.
    pub name: String,
    /// The arguments in their original order.
    pub children: Vec<Value>,
    /// The exact separators between the arguments. Holds one fewer item
    /// than `children` for a well formed model.
    pub delimiters: Vec<String>,
}

impl Model {
    /// Create a model with the same separator between every argument.
    pub fn new(name: impl Into<String>, children: Vec<Value>, separator: &str) -> Self {
        let delimiters = vec![separator.to_string(); children.len().saturating_sub(1)];
        Self {
            name: name.into(),
            children,
            delimiters,
        }
    }

    /// Return a copy of the model with every argument mapped, keeping the
    /// name and separators.
    pub fn map_children(&self, f: impl FnMut(&Value) -> Value) -> Self {
        Self {
            name: self.name.clone(),
            children: self.children.iter().map(f).collect(),
            delimiters: self.delimiters.clone(),
        }
    }
}

impl Value {
    /// Parse value text. See the module documentation for the grammar.
    pub fn parse(text: &str) -> Value {
        let text = text.trim();

        if let Some(number) = parse_number(text) {
            return number;
        }

        if let Some(model) = parse_model(text) {
            return Value::Model(model);
        }

        Value::String(text.to_string())
    }

    /// Create a unitless number.
    pub fn number(value: Component) -> Value {
        Value::Number {
            value,
            unit: String::new(),
        }
    }

    /// Return the model if this value is a function call.
    pub fn as_model(&self) -> Option<&Model> {
        match self {
            Value::Model(model) => Some(model),
            _ => None,
        }
    }
}

/// Parse value text into a tree of values. Shorthand for [`Value::parse`].
pub fn parse_value(text: &str) -> Value {
    Value::parse(text)
}

/// Match `[+-]? digits ('.' digits)? unit?` or `[+-]? '.' digits unit?`
/// where the unit is a run of letters or a single `%`.
fn parse_number(text: &str) -> Option<Value> {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let integer_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - integer_start;

    if bytes.get(end) == Some(&b'.') {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while bytes.get(fraction_end).is_some_and(u8::is_ascii_digit) {
            fraction_end += 1;
        }
        if fraction_end > fraction_start {
            digits += fraction_end - fraction_start;
            end = fraction_end;
        }
    }

    if digits == 0 {
        return None;
    }

    let unit = &text[end..];
    let unit_is_valid = unit == "%" || unit.bytes().all(|b| b.is_ascii_alphabetic());
    if !unit_is_valid {
        return None;
    }

    let value = text[..end]
        .parse::<Component>()
        .ok()
        .filter(|value| value.is_finite())?;

    Some(Value::Number {
        value,
        unit: unit.to_ascii_lowercase(),
    })
}

fn parse_model(text: &str) -> Option<Model> {
    if !is_top_level_function_call(text) {
        return None;
    }

    let open = text.find('(')?;
    let name = &text[..open];

    let is_ident = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !is_ident {
        return None;
    }

    let inner = &text[open + 1..text.len() - 1];
    if inner.trim().is_empty() {
        return Some(Model {
            name: name.to_string(),
            children: vec![],
            delimiters: vec![],
        });
    }

    let (parts, delimiters) = split_top_level(inner, Delimiters::for_function(name));

    Some(Model {
        name: name.to_string(),
        children: parts.iter().map(|part| Value::parse(part)).collect(),
        delimiters,
    })
}

/// Format a number the way CSS expects it: whole numbers without a decimal
/// point, everything else with at most 6 decimals.
pub(crate) fn format_number(value: Component) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }

    let text = format!("{value:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number { value, unit } => write!(f, "{}{}", format_number(*value), unit),
            Value::String(text) => f.write_str(text),
            Value::Model(model) => std::fmt::Display::fmt(model, f),
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let children = self
            .children
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        write!(
            f,
            "{}({})",
            self.name,
            join_top_level(&children, &self.delimiters)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn number(value: Component, unit: &str) -> Value {
        Value::Number {
            value,
            unit: unit.to_string(),
        }
    }

    #[test]
    fn numbers() {
        assert_eq!(Value::parse("12"), number(12.0, ""));
        assert_eq!(Value::parse("-3"), number(-3.0, ""));
        assert_eq!(Value::parse("0.5"), number(0.5, ""));
        assert_eq!(Value::parse(".5"), number(0.5, ""));
        assert_eq!(Value::parse("50%"), number(50.0, "%"));
        assert_eq!(Value::parse("1.5turn"), number(1.5, "turn"));
        assert_eq!(Value::parse("+10PX"), number(10.0, "px"));
    }

    #[test]
    fn not_numbers() {
        assert_eq!(Value::parse("1px2"), Value::String("1px2".to_string()));
        assert_eq!(Value::parse("-"), Value::String("-".to_string()));
        assert_eq!(Value::parse("5%%"), Value::String("5%%".to_string()));
    }

    #[test]
    fn overflowing_numbers_are_kept_as_written() {
        let text = format!("{}px", "1".repeat(400));
        assert_eq!(Value::parse(&text), Value::String(text.clone()));

        let shadow = format!("drop-shadow({text} 0 black)");
        let value = Value::parse(&shadow);
        assert_eq!(value.as_model().unwrap().children[0], Value::String(text));
        assert!(!value.to_string().contains("inf"));
    }

    #[test]
    fn function_calls() {
        let value = Value::parse("rgb(255, 0, 0)");
        let Value::Model(model) = &value else {
            panic!("expected a model");
        };
        assert_eq!(model.name, "rgb");
        assert_eq!(
            model.children,
            [number(255.0, ""), number(0.0, ""), number(0.0, "")]
        );
        assert_eq!(value.to_string(), "rgb(255, 0, 0)");
    }

    #[test]
    fn nested_calls() {
        let value = Value::parse("linear-gradient(to right, rgb(0 0 0 / 50%) 10%, #fff)");
        let model = value.as_model().unwrap();
        assert_eq!(model.children.len(), 3);
        assert_eq!(model.children[0], Value::String("to right".to_string()));
        assert_eq!(model.children[1], Value::String("rgb(0 0 0 / 50%) 10%".to_string()));
        assert_eq!(
            value.to_string(),
            "linear-gradient(to right, rgb(0 0 0 / 50%) 10%, #fff)"
        );
    }

    #[test]
    fn math_functions_are_not_split() {
        let value = Value::parse("calc(100% - 10px)");
        let model = value.as_model().unwrap();
        assert_eq!(model.children, [Value::String("100% - 10px".to_string())]);
        assert_eq!(value.to_string(), "calc(100% - 10px)");
    }

    #[test]
    fn empty_arguments() {
        let value = Value::parse("foo()");
        assert!(value.as_model().unwrap().children.is_empty());
        assert_eq!(value.to_string(), "foo()");
    }

    #[test]
    fn multiple_calls_are_a_string() {
        let text = "rgb(0,0,0) rgb(1,1,1)";
        assert_eq!(Value::parse(text), Value::String(text.to_string()));
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(255.0), "255");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.0 / 3.0), "0.333333");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-0.0000001), "0");
    }

    proptest! {
        #[test]
        fn unrecognized_text_round_trips(text in "[a-z][a-z #!-]{0,20}") {
            let text = text.trim().to_string();
            prop_assume!(!text.is_empty());
            let value = Value::parse(&text);
            prop_assert_eq!(&value, &Value::String(text.clone()));
            prop_assert_eq!(value.to_string(), text);
        }
    }
}
