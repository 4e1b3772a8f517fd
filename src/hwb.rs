//! Model a color with the HWB notation in the sRGB color space.

use crate::color::Component;
use crate::error::ColorError;
use crate::hsl::{hue_model, parse_fraction, parse_hue, HasAlpha};
use crate::rgb::{parse_alpha, split_alpha};
use crate::value::{Model, Value};

nightshade_macros::gen_model! {
    /// A color specified with the HWB notation in the sRGB color space.
    pub struct Hwb {
        /// The hue component of the color in degrees.
        hue: Component,
        /// The whiteness component of the color in `0..=1`.
        whiteness: Component,
        /// The blackness component of the color in `0..=1`.
        blackness: Component,
    }
}

impl Hwb {
    /// Build a color from the arguments of an `hwb()` model.
    pub fn from_model(model: &Model) -> Result<Self, ColorError> {
        let (components, alpha) = split_alpha(model)?;

        let alpha = alpha
            .map(|alpha| parse_alpha(&model.name, alpha))
            .transpose()?;

        Ok(Hwb::new(
            parse_hue(&model.name, &components[0])?,
            parse_fraction(&model.name, &components[1])?,
            parse_fraction(&model.name, &components[2])?,
            alpha,
        ))
    }

    /// Convert the color back into an `hwb()` value.
    pub fn to_value(&self) -> Value {
        hue_model("hwb", self.hue, self.whiteness, self.blackness, self)
    }
}

impl HasAlpha for Hwb {
    fn explicit_alpha(&self) -> Option<Component> {
        (!self.flags.contains(crate::Flags::IMPLICIT_ALPHA)).then_some(self.alpha)
    }
}
