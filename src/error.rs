//! Error types.

use thiserror::Error;

use crate::color::Component;
use crate::value::Value;

/// Reasons a value could not be read as a color.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ColorError {
    /// A color model was called with the wrong number of arguments.
    #[error("{name}() expects 3 or 4 arguments, found {found}")]
    Arity {
        /// The name of the color model.
        name: String,
        /// The number of arguments that was found.
        found: usize,
    },

    /// An argument of a color model is not a number or carries the wrong
    /// unit.
    #[error("invalid argument `{argument}` for {name}()")]
    Argument {
        /// The name of the color model.
        name: String,
        /// The offending argument as written.
        argument: String,
    },

    /// The value is not a recognized color at all.
    #[error("not a color")]
    NotAColor,
}

impl ColorError {
    /// Create an [`ColorError::Argument`] for the given argument.
    pub fn argument(name: &str, value: &Value) -> Self {
        Self::Argument {
            name: name.to_string(),
            argument: value.to_string(),
        }
    }

    /// A recognized color model that could not be read. Ill-shaped colors
    /// count as transparent black when aggregating, while values that are
    /// not colors at all count as nothing.
    pub fn is_ill_shaped(&self) -> bool {
        !matches!(self, Self::NotAColor)
    }
}

/// Errors produced while loading an [`InversionConfig`](crate::InversionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration is not valid TOML or has fields of the wrong type.
    #[error("could not parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A vibrancy bias is outside of `0..=1`.
    #[error("{name} must be in 0..=1, found {value}")]
    Bias {
        /// The name of the field.
        name: &'static str,
        /// The rejected value.
        value: Component,
    },

    /// A theme threshold is outside of `0..=1`.
    #[error("{name} must be in 0..=1, found {value}")]
    Threshold {
        /// The name of the field.
        name: &'static str,
        /// The rejected value.
        value: Component,
    },

    /// The spread prefix is not a usable custom property prefix.
    #[error("spread prefix `{0}` must start with `--` and name something")]
    Prefix(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let error = ColorError::Arity {
            name: "rgb".to_string(),
            found: 2,
        };
        assert_eq!(error.to_string(), "rgb() expects 3 or 4 arguments, found 2");

        let error = ColorError::argument("hsl", &Value::String("var(--h)".to_string()));
        assert_eq!(error.to_string(), "invalid argument `var(--h)` for hsl()");
        assert!(error.is_ill_shaped());
        assert!(!ColorError::NotAColor.is_ill_shaped());
    }
}
