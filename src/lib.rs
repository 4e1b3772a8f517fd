//! nightshade inverts the colors of CSS values between light and dark themes.
//!
//! Raw value text is parsed into a small expression tree, the colors inside it
//! are classified and inverted with a perceptual heuristic that keeps the hue
//! character of each color, and the result is serialized back to value text.
//! On top of that, a style tree walker decides which regions of a sheet were
//! light originally, so that only those are inverted and emitted as CSS.

#![warn(missing_docs)]

mod classify;
mod color;
mod config;
mod convert;
mod css;
mod delimiter;
mod error;
mod gradient;
mod heuristics;
mod hsl;
mod hwb;
mod invert;
mod math;
mod named;
mod rgb;
mod spread;
mod style;
mod value;


pub use classify::{hex_to_model, strip_vendor_prefix, ColorModel, ModelKind};
pub use color::{AlphaDetails, Color, Component, Components, Flags, FunctionalKeyword, Variable};
pub use config::{InversionConfig, ThemeEvaluator};
pub use convert::{hsl_to_rgb, hwb_to_rgb, normalize_angle};
pub use css::generate_css_from_styles;
pub use delimiter::{is_top_level_function_call, join_top_level, split_top_level, Delimiters};
pub use error::{ColorError, ConfigError};
pub use gradient::{ColorStop, Gradient, GradientKind, GradientPart};
pub use heuristics::{
    contrast_ratio, darkness_score, relative_luminance, vibrancy_score, vibrancy_z_score,
    BaselineStats, SampleStats,
};
pub use hsl::Hsl;
pub use hwb::Hwb;
pub use invert::{invert_color, invert_rgb, invert_rgba8, Inverter};
pub use math::Channels;
pub use named::{is_system_color, named_color};
pub use rgb::Srgb;
pub use spread::{derived_name, relative_inversion, Definition, VariableLibrary};
pub use style::{
    evaluate_theme, evaluate_theme_by_contrast, invert_styles, is_color_property,
    looks_like_color, ColorAggregate, ReferenceStats, Role, StyleEntry, StyleTree, Theme,
    ThemeAggregate, UseCount,
};
pub use value::{parse_value, Model, Value};
