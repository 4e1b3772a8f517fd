//! Variable aware inversion.
//!
//! A `var()` reference can not be inverted without knowing what it refers
//! to. Variables with a single unconditional literal definition are resolved
//! and inverted directly. All others are spread: every definition site gets a
//! derived custom property holding the inverted value, and every use prefers
//! the derived property while falling back to the original one. The cascade
//! then picks the right inverted value at paint time.

use indexmap::IndexMap;

use crate::color::{Color, Component, Variable};
use crate::invert::Inverter;
use crate::style::{StyleEntry, StyleTree};
use crate::value::{format_number, Value};

/// A custom property definition and where it was found.
#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    /// The path of keys leading to the declaration: sheet, selectors and
    /// at-rules.
    pub context: Vec<String>,
    /// The raw value.
    pub value: String,
}

impl Definition {
    fn is_conditional(&self) -> bool {
        self.context.iter().any(|key| key.starts_with('@'))
    }
}

/// Every custom property definition found in a style tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VariableLibrary {
    prefix: String,
    definitions: IndexMap<String, Vec<Definition>>,
}

impl VariableLibrary {
    /// Index the custom property definitions of a style tree. Definitions of
    /// properties that carry the reserved `prefix` are skipped.
    pub fn from_tree(tree: &StyleTree, prefix: &str) -> Self {
        let mut library = Self {
            prefix: prefix.to_string(),
            definitions: IndexMap::new(),
        };
        library.visit(tree, &mut vec![]);
        library
    }

    fn visit(&mut self, tree: &StyleTree, context: &mut Vec<String>) {
        for (key, entry) in tree.iter() {
            match entry {
                StyleEntry::Block(block) => {
                    context.push(key.clone());
                    self.visit(block, context);
                    context.pop();
                }
                StyleEntry::Declaration(value) if key.starts_with("--") => {
                    if self.is_reserved(key) {
                        log::warn!(
                            "custom property `{key}` uses the reserved prefix `{}` and is ignored",
                            self.prefix
                        );
                        continue;
                    }
                    self.definitions
                        .entry(key.clone())
                        .or_default()
                        .push(Definition {
                            context: context.clone(),
                            value: value.clone(),
                        });
                }
                StyleEntry::Declaration(_) => {}
            }
        }
    }

    /// All definitions of a custom property in tree order.
    pub fn definitions(&self, name: &str) -> &[Definition] {
        self.definitions
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns true if the custom property is defined anywhere in the tree.
    pub fn is_defined(&self, name: &str) -> bool {
        !self.definitions(name).is_empty()
    }

    /// Returns true if the name carries the reserved prefix.
    pub fn is_reserved(&self, name: &str) -> bool {
        name.starts_with(&self.prefix)
    }

    /// The literal value of a custom property that has exactly one
    /// definition, outside of any at-rule, that is a literal color.
    pub fn static_value(&self, name: &str) -> Option<&str> {
        match self.definitions(name) {
            [definition]
                if !definition.is_conditional()
                    && !definition.value.contains("var(")
                    && resolve_literal(&definition.value).is_some() =>
            {
                Some(definition.value.as_str())
            }
            _ => None,
        }
    }

    /// The color a custom property statically resolves to.
    pub fn resolve_color(&self, name: &str) -> Option<Color> {
        self.static_value(name).and_then(resolve_literal)
    }

    /// The name of the derived property of a custom property. Returns `None`
    /// for names that already are derived.
    pub fn derived_name(&self, name: &str) -> Option<String> {
        derived_name(&self.prefix, name)
    }
}

fn resolve_literal(text: &str) -> Option<Color> {
    let color = Color::parse(text).ok()?;
    color.to_srgb().is_some().then_some(color)
}

/// The derived property name for a custom property: the prefix followed by
/// the name without its leading `--`. Depends on nothing but the name, so
/// repeated passes produce the same names.
pub fn derived_name(prefix: &str, name: &str) -> Option<String> {
    if name.starts_with(prefix) {
        return None;
    }
    Some(format!("{prefix}{}", name.trim_start_matches("--")))
}

/// Build a relative color that inverts `source` in the browser with the same
/// arithmetic as [`invert_rgb`](crate::invert_rgb).
pub fn relative_inversion(source: &Value, bias: Component) -> Value {
    let max = "max(r, g, b)";
    let min = "min(r, g, b)";
    let average = "(r + g + b) / 3";

    let equalizer = format!("(-0.1 + 1.1 * sqrt(({max} - {min}) / max({max}, 0.001)))");
    let equalize =
        |channel: &str| format!("({channel} * (1 - {equalizer}) + {average} * {equalizer})");

    let equalized_value = format!("({} / 255)", equalize(max));
    let new_value = format!("(6 / 85 + (1 - 6 / 85) * (1 - {equalized_value}))");
    let scaler = format!("({new_value} / max({equalized_value}, 0.001))");

    let vibrancy = "clamp(0, (0.006339594673 * max(r - g, g - r) + 0.1357803475 \
                    + 0.006733518277 * max(g - b, b - g) + 0.1787805054 \
                    + 0.005240646414 * max(b - r, r - b) + 0.1162090602) / 3, 1)";
    let ratio = format!("(({vibrancy} + {}) / 2)", format_number(bias));

    // Black has no equalized value to scale and turns white.
    let black = format!("255 * clamp(0, 1 - {max}, 1)");

    let channel = |c: &str| {
        format!(
            "clamp(0, {} * {scaler} * (1 - {ratio}) + {c} * {ratio} + {black}, 255)",
            equalize(c)
        )
    };

    Value::String(format!(
        "rgb(from {source} {} {} {} / alpha)",
        channel("r"),
        channel("g"),
        channel("b")
    ))
}

impl Inverter<'_> {
    /// Invert a `var()` reference. Resolvable variables are replaced by their
    /// inverted literal, others are spread when enabled. The fallback is
    /// always inverted.
    pub(crate) fn invert_variable(&self, variable: &Variable, darkened: bool) -> Color {
        let with_fallback = |darkened: bool| Variable {
            name: variable.name.clone(),
            fallback: variable
                .fallback
                .as_ref()
                .map(|fallback| Box::new(self.invert_value(fallback, darkened))),
        };

        let Some(library) = self.variables else {
            return Color::Variable(with_fallback(darkened));
        };

        if let Some(color) = library.resolve_color(&variable.name) {
            return self.invert_color(&color, darkened);
        }

        if !self.config.spread_variables {
            return Color::Variable(with_fallback(darkened));
        }

        let Some(derived) = library.derived_name(&variable.name) else {
            return Color::Variable(with_fallback(darkened));
        };

        let original = with_fallback(false);

        if library.is_defined(&variable.name) {
            Color::Variable(Variable {
                name: derived,
                fallback: Some(Box::new(original.to_value())),
            })
        } else {
            Color::Expression(relative_inversion(
                &original.to_value(),
                self.config.css_vibrancy_bias,
            ))
        }
    }

    /// The derived property a definition of `name` is spread to, if any.
    fn spread_name(&self, name: &str) -> Option<String> {
        let library = self.variables?;
        let spread = self.config.spread_variables
            && library.is_defined(name)
            && library.static_value(name).is_none();

        spread.then(|| library.derived_name(name)).flatten()
    }

    /// Invert the definition of a custom property. Returns the property name
    /// and value to emit, which is a derived property for spread variables.
    ///
    /// Returns `None` for properties with the reserved prefix and for
    /// statically resolved properties, whose uses already hold the inverted
    /// literal.
    pub fn invert_definition(
        &self,
        name: &str,
        value: &str,
        darkened: bool,
    ) -> Option<(String, String)> {
        let Some(library) = self.variables else {
            return Some((name.to_string(), self.invert_text(value, darkened)));
        };

        if library.is_reserved(name) || library.static_value(name).is_some() {
            return None;
        }

        let Some(derived) = self.spread_name(name) else {
            return Some((name.to_string(), self.invert_text(value, darkened)));
        };

        let inverted = match Color::parse(value) {
            Ok(Color::Variable(_)) => {
                let source = Variable::new(name).to_value();
                relative_inversion(&source, self.config.css_vibrancy_bias).to_string()
            }
            _ => self.invert_text(value, false),
        };

        Some((derived, inverted))
    }

    /// A derived property that points back at the original one. Emitted for
    /// definitions in regions that stay untouched, so uses there see the
    /// original value through the derived name.
    pub fn identity_definition(&self, name: &str) -> Option<(String, String)> {
        let derived = self.spread_name(name)?;
        Some((derived, Variable::new(name).to_value().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InversionConfig;

    fn tree() -> StyleTree {
        StyleTree::new().with_block(
            "sheet",
            StyleTree::new()
                .with_block(
                    ":root",
                    StyleTree::new()
                        .with_declaration("--static", "#000")
                        .with_declaration("--twice", "#000")
                        .with_declaration("--indirect", "var(--static)")
                        .with_declaration("--nightshade-own", "red"),
                )
                .with_block(
                    ".dark",
                    StyleTree::new().with_declaration("--twice", "#fff"),
                )
                .with_block(
                    "@media print",
                    StyleTree::new().with_block(
                        ":root",
                        StyleTree::new().with_declaration("--media", "#000"),
                    ),
                ),
        )
    }

    #[test]
    fn library() {
        let library = VariableLibrary::from_tree(&tree(), "--nightshade-");

        assert_eq!(library.definitions("--twice").len(), 2);
        assert_eq!(
            library.definitions("--media")[0].context,
            ["sheet", "@media print", ":root"]
        );
        assert!(!library.is_defined("--nightshade-own"));
        assert!(!library.is_defined("--missing"));

        assert_eq!(library.static_value("--static"), Some("#000"));
        assert_eq!(library.static_value("--twice"), None);
        assert_eq!(library.static_value("--indirect"), None);
        assert_eq!(library.static_value("--media"), None);
    }

    #[test]
    fn derived_names_are_stable() {
        assert_eq!(
            derived_name("--nightshade-", "--accent").as_deref(),
            Some("--nightshade-accent")
        );
        assert_eq!(derived_name("--nightshade-", "--nightshade-accent"), None);
    }

    #[test]
    fn resolve_mode() {
        let config = InversionConfig::default();
        let library = VariableLibrary::from_tree(&tree(), &config.spread_prefix);
        let inverter = Inverter::new(&config).with_variables(&library);

        assert_eq!(inverter.invert_text("var(--static)", false), "#ffffff");
        assert_eq!(inverter.invert_definition("--static", "#000", false), None);
        assert_eq!(inverter.identity_definition("--static"), None);
    }

    #[test]
    fn spread_mode() {
        let config = InversionConfig::default();
        let library = VariableLibrary::from_tree(&tree(), &config.spread_prefix);
        let inverter = Inverter::new(&config).with_variables(&library);

        assert_eq!(
            inverter.invert_text("var(--twice, #000)", true),
            "var(--nightshade-twice, var(--twice, #ffffff))"
        );
        assert_eq!(
            inverter.invert_definition("--twice", "#000", true),
            Some(("--nightshade-twice".to_string(), "#ffffff".to_string()))
        );

        let (name, value) = inverter
            .invert_definition("--indirect", "var(--static)", false)
            .unwrap();
        assert_eq!(name, "--nightshade-indirect");
        assert!(value.starts_with("rgb(from var(--indirect) "));

        assert_eq!(inverter.invert_definition("--nightshade-own", "red", false), None);

        assert_eq!(
            inverter.identity_definition("--twice"),
            Some(("--nightshade-twice".to_string(), "var(--twice)".to_string()))
        );
        assert_eq!(inverter.identity_definition("--missing"), None);
    }

    #[test]
    fn undefined_variables_invert_inline() {
        let config = InversionConfig::default();
        let library = VariableLibrary::from_tree(&tree(), &config.spread_prefix);
        let inverter = Inverter::new(&config).with_variables(&library);

        let text = inverter.invert_text("var(--missing)", false);
        assert!(text.starts_with("rgb(from var(--missing) clamp(0, "));
        assert!(text.ends_with(" / alpha)"));
        assert_eq!(text.matches('(').count(), text.matches(')').count());
    }

    #[test]
    fn spreading_can_be_disabled() {
        let config = InversionConfig {
            spread_variables: false,
            ..Default::default()
        };
        let library = VariableLibrary::from_tree(&tree(), &config.spread_prefix);
        let inverter = Inverter::new(&config).with_variables(&library);

        assert_eq!(inverter.invert_text("var(--twice)", false), "var(--twice)");
        assert_eq!(inverter.invert_text("var(--missing)", false), "var(--missing)");
        assert_eq!(
            inverter.invert_definition("--twice", "#000", false),
            Some(("--twice".to_string(), "#ffffff".to_string()))
        );
        assert_eq!(inverter.identity_definition("--twice"), None);
    }

    #[test]
    fn spreading_is_idempotent() {
        let config = InversionConfig::default();
        let library = VariableLibrary::from_tree(&tree(), &config.spread_prefix);
        let inverter = Inverter::new(&config).with_variables(&library);

        let first = inverter.invert_text("1px solid var(--twice)", false);
        let second = inverter.invert_text("1px solid var(--twice)", false);
        assert_eq!(first, second);
        assert_eq!(first, "1px solid var(--nightshade-twice, var(--twice))");
    }
}
