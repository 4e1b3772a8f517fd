//! Invert colors from a light theme to a dark theme and back.
//!
//! The transform keeps the hue character of a color while remapping its
//! lightness. Saturated colors are first equalized toward their average,
//! scaled to the new brightness and then blended back toward the original
//! color in proportion to how vibrant the original is.

use crate::color::{Color, Component, Components};
use crate::config::InversionConfig;
use crate::delimiter::{join_top_level, split_top_level, Delimiters};
use crate::error::ColorError;
use crate::heuristics::vibrancy_score;
use crate::math::{from_channels, lerp, map_channels, to_channels, Channels};
use crate::spread::VariableLibrary;
use crate::value::{Model, Value};

/// The darkest value an inverted color is scaled to.
const DARKEST: Component = 6.0 / 85.0;

/// Invert a color with channels in `0..=255`.
///
/// With `darkened` set, colors that are already dark enough are returned
/// unchanged, black included. `bias` shifts the blend between the scaled and
/// the original color.
pub fn invert_rgb(rgb: Components, darkened: bool, bias: Component) -> Components {
    let rgb = rgb.map(Component::round);

    if rgb == Components(0.0, 0.0, 0.0) {
        return if darkened {
            rgb
        } else {
            Components(255.0, 255.0, 255.0)
        };
    }

    let (max, min) = (rgb.max(), rgb.min());
    let saturation = (max - min) / max;
    let equalizer = -0.1 + 1.1 * saturation.sqrt();
    let average = (rgb.0 + rgb.1 + rgb.2) / 3.0;

    let original = to_channels(rgb);
    let equalized = original.lerp(Channels::splat(average), equalizer);

    let equalized_value = equalized.x.max(equalized.y).max(equalized.z) / 255.0;
    let new_value = lerp(DARKEST, 1.0, 1.0 - equalized_value);

    if darkened && new_value > equalized_value {
        return rgb;
    }

    let scaler = new_value / equalized_value;
    let ratio = (vibrancy_score(rgb) + bias) / 2.0;

    let inverted = (equalized * scaler).lerp(original, ratio);
    from_channels(map_channels(inverted, |c| c.round().clamp(0.0, 255.0)))
}

/// Invert a single color with the default settings for CSS values.
pub fn invert_color(color: &Color, config: &InversionConfig) -> Color {
    Inverter::new(config).invert_color(color, false)
}

/// Invert a buffer of RGBA8 pixels in place, keeping the alpha channel.
pub fn invert_rgba8(pixels: &mut [u8], config: &InversionConfig) {
    for pixel in pixels.chunks_exact_mut(4) {
        let rgb = Components(pixel[0] as _, pixel[1] as _, pixel[2] as _);
        let Components(red, green, blue) = invert_rgb(rgb, false, config.bitmap_vibrancy_bias);
        pixel[0] = red as u8;
        pixel[1] = green as u8;
        pixel[2] = blue as u8;
    }
}

/// Inverts colors, values and value text for a single pass.
pub struct Inverter<'a> {
    pub(crate) config: &'a InversionConfig,
    pub(crate) variables: Option<&'a VariableLibrary>,
}

impl<'a> Inverter<'a> {
    /// Create an inverter that leaves variables it can not see alone.
    pub fn new(config: &'a InversionConfig) -> Self {
        Self {
            config,
            variables: None,
        }
    }

    /// Resolve and spread variables using the given definitions.
    pub fn with_variables(mut self, variables: &'a VariableLibrary) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Invert a color. The result has the same shape as the input: gradients
    /// keep their geometry and stop positions, functions keep their
    /// arguments that are not colors.
    pub fn invert_color(&self, color: &Color, darkened: bool) -> Color {
        let bias = self.config.css_vibrancy_bias;

        match color {
            Color::Rgb(srgb) => Color::Rgb(
                srgb.with_components(invert_rgb(srgb.to_components(), darkened, bias)),
            ),
            Color::Hsl(hsl) => self.invert_color(&Color::Rgb(hsl.to_srgb()), darkened),
            Color::Hwb(hwb) => self.invert_color(&Color::Rgb(hwb.to_srgb()), darkened),
            Color::Function(model) => Color::Function(
                self.invert_children(model, darkened)
                    .unwrap_or_else(|| model.clone()),
            ),
            Color::Variable(variable) => self.invert_variable(variable, darkened),
            Color::Gradient(gradient) => {
                Color::Gradient(gradient.map_stops(|stop| self.invert_color(stop, darkened)))
            }
            Color::Keyword(_) | Color::System(_) | Color::Expression(_) => color.clone(),
        }
    }

    /// Invert every color inside a value. Values that are not colors are
    /// searched for colors in their arguments or space separated parts.
    pub fn invert_value(&self, value: &Value, darkened: bool) -> Value {
        match Color::from_value(value) {
            Ok(color) => self.invert_color(&color, darkened).to_value(),
            Err(ColorError::NotAColor) => match value {
                Value::Model(model) => self
                    .invert_children(model, darkened)
                    .map_or_else(|| value.clone(), Value::Model),
                Value::String(text) => self
                    .invert_parts(text, darkened)
                    .map_or_else(|| value.clone(), Value::String),
                Value::Number { .. } => value.clone(),
            },
            Err(err) => {
                log::debug!("leaving `{value}` untouched: {err}");
                value.clone()
            }
        }
    }

    /// Invert every color in value text. Text without colors is returned
    /// trimmed but otherwise as is.
    pub fn invert_text(&self, text: &str, darkened: bool) -> String {
        let value = Value::parse(text);
        let inverted = self.invert_value(&value, darkened);
        if inverted == value {
            text.trim().to_string()
        } else {
            inverted.to_string()
        }
    }

    /// Invert the arguments of a function. Returns `None` if nothing changed
    /// or the function holds no colors by definition.
    fn invert_children(&self, model: &Model, darkened: bool) -> Option<Model> {
        let name = model.name.to_ascii_lowercase();
        if matches!(name.as_str(), "url" | "format" | "local" | "attr" | "src") {
            return None;
        }

        let inverted = model.map_children(|child| self.invert_value(child, darkened));
        (inverted != *model).then_some(inverted)
    }

    /// Invert each part of a compound value like `1px solid red`. Returns
    /// `None` if nothing changed. Parts that did not change are kept exactly
    /// as written.
    fn invert_parts(&self, text: &str, darkened: bool) -> Option<String> {
        let (parts, separators) = split_top_level(text, Delimiters::DEFAULT);
        if parts.len() < 2 {
            return None;
        }

        let mut changed = false;
        let parts = parts
            .iter()
            .map(|part| {
                let value = Value::parse(part);
                let inverted = self.invert_value(&value, darkened);
                if inverted == value {
                    part.clone()
                } else {
                    changed = true;
                    inverted.to_string()
                }
            })
            .collect::<Vec<_>>();

        changed.then(|| join_top_level(&parts, &separators))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_channels_eq;
    use crate::gradient::GradientPart;
    use crate::{Flags, Srgb};
    use proptest::prelude::*;

    const BIAS: Component = 0.49;

    #[test]
    fn black_and_white() {
        assert_eq!(
            invert_rgb(Components(0.0, 0.0, 0.0), false, BIAS),
            Components(255.0, 255.0, 255.0)
        );
        assert_eq!(
            invert_rgb(Components(0.0, 0.0, 0.0), true, BIAS),
            Components(0.0, 0.0, 0.0)
        );

        let Components(r, g, b) = invert_rgb(Components(255.0, 255.0, 255.0), false, BIAS);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert!(r < 128.0);
        assert_channels_eq!(
            invert_rgb(Components(255.0, 255.0, 255.0), false, BIAS),
            (93, 93, 93)
        );
    }

    #[test]
    fn darkened_keeps_dark_colors() {
        let navy = Components(0.0, 0.0, 50.0);
        assert_eq!(invert_rgb(navy, true, BIAS), navy);
        assert_ne!(invert_rgb(navy, false, BIAS), navy);
    }

    #[test]
    fn inverted_light_colors_get_darker() {
        let light = Components(230.0, 240.0, 250.0);
        let inverted = invert_rgb(light, false, BIAS);
        assert!(inverted.max() < light.min());
        assert_channels_eq!(inverted, (97, 101, 105));
        assert_channels_eq!(
            invert_rgb(Components(250.0, 250.0, 250.0), false, BIAS),
            (95, 95, 95)
        );
    }

    #[test]
    fn color_keeps_alpha_and_notation() {
        let config = InversionConfig::default();

        let Color::Rgb(srgb) = invert_color(&Color::parse("#fff").unwrap(), &config) else {
            panic!("expected an rgb color");
        };
        assert!(srgb.flags.contains(Flags::HEX));

        let Color::Rgb(srgb) =
            invert_color(&Color::parse("rgba(0, 0, 0, 0.3)").unwrap(), &config)
        else {
            panic!("expected an rgb color");
        };
        assert_eq!(srgb.to_components(), Components(255.0, 255.0, 255.0));
        assert_eq!(srgb.alpha, 0.3);

        let hsl = invert_color(&Color::parse("hsl(0, 0%, 0%)").unwrap(), &config);
        assert_eq!(hsl.to_string(), "rgb(255, 255, 255)");
    }

    #[test]
    fn gradient_keeps_stops() {
        let config = InversionConfig::default();
        let gradient = Color::parse("linear-gradient(to right, #000 10%, #fff 50%, red 90%)").unwrap();

        let Color::Gradient(inverted) = invert_color(&gradient, &config) else {
            panic!("expected a gradient");
        };
        assert_eq!(inverted.stops().count(), 3);
        assert!(matches!(&inverted.parts[0], GradientPart::Other(v) if v.to_string() == "to right"));

        let positions = inverted
            .stops()
            .map(|stop| stop.position.as_str())
            .collect::<Vec<_>>();
        assert_eq!(positions, ["10%", "50%", "90%"]);
        assert_eq!(inverted.to_value().to_string().matches("#ffffff 10%").count(), 1);
    }

    #[test]
    fn references_pass_through() {
        let config = InversionConfig::default();
        let inverter = Inverter::new(&config);

        for text in ["currentcolor", "Canvas", "var(--accent)", "inherit"] {
            assert_eq!(inverter.invert_text(text, false), text);
        }

        assert_eq!(
            inverter.invert_text("var(--accent, #000)", false),
            "var(--accent, #ffffff)"
        );
    }

    #[test]
    fn compound_values() {
        let config = InversionConfig::default();
        let inverter = Inverter::new(&config);

        assert_eq!(
            inverter.invert_text("1px solid   #000", false),
            "1px solid   #ffffff"
        );
        assert_eq!(
            inverter.invert_text("0 0 2px rgb(0, 0, 0), inset 0 1px #000", false),
            "0 0 2px rgb(255, 255, 255), inset 0 1px #ffffff"
        );
        assert_eq!(
            inverter.invert_text("drop-shadow(0 0 2px black)", false),
            "drop-shadow(0 0 2px rgb(255, 255, 255))"
        );
        assert_eq!(
            inverter.invert_text("color-mix(in srgb, black 40%, #000)", false),
            "color-mix(in srgb, rgb(255, 255, 255) 40%, #ffffff)"
        );
        assert_eq!(inverter.invert_text("url(black.png)", false), "url(black.png)");
        assert_eq!(inverter.invert_text("  none  ", false), "none");
    }

    #[test]
    fn ill_shaped_colors_are_left_alone() {
        let config = InversionConfig::default();
        let inverter = Inverter::new(&config);
        assert_eq!(inverter.invert_text("rgb(1, 2)", false), "rgb(1, 2)");
        assert_eq!(
            inverter.invert_text("rgb(var(--r), 0, 0)", false),
            "rgb(var(--r), 0, 0)"
        );
    }

    #[test]
    fn bitmap_inversion_keeps_alpha() {
        let config = InversionConfig::default();
        let mut pixels = [0, 0, 0, 255, 0, 0, 0, 7];
        invert_rgba8(&mut pixels, &config);
        assert_eq!(pixels, [255, 255, 255, 255, 255, 255, 255, 7]);

        let mut pixels = [200, 30, 30, 128];
        invert_rgba8(&mut pixels, &config);
        let expected = invert_rgb(Components(200.0, 30.0, 30.0), false, 0.55);
        assert_eq!(
            Srgb::from(expected).to_components(),
            Components(pixels[0] as _, pixels[1] as _, pixels[2] as _)
        );
        assert_eq!(pixels[3], 128);
    }

    proptest! {
        #[test]
        fn channels_stay_in_range(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let Components(r, g, b) = invert_rgb(
                Components(r as _, g as _, b as _),
                false,
                BIAS,
            );
            for c in [r, g, b] {
                prop_assert!((0.0..=255.0).contains(&c));
                prop_assert_eq!(c, c.round());
            }
        }

        #[test]
        fn channel_order_is_kept(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            // Hue drifts, but the ordering of the channels never flips.
            let input = [r as Component, g as Component, b as Component];
            let Components(ir, ig, ib) =
                invert_rgb(Components(input[0], input[1], input[2]), false, BIAS);
            let output = [ir, ig, ib];

            for i in 0..3 {
                for j in 0..3 {
                    if input[i] > input[j] {
                        prop_assert!(output[i] >= output[j]);
                    }
                }
            }
        }

        #[test]
        fn grays_stay_gray(v in 0u8..=255) {
            let Components(r, g, b) = invert_rgb(Components(v as _, v as _, v as _), false, BIAS);
            prop_assert_eq!(r, g);
            prop_assert_eq!(g, b);
        }
    }
}
