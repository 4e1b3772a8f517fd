//! Walk a style tree, invert every color-bearing declaration and keep only
//! the regions whose original theme was light.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::color::{Color, Component};
use crate::config::{InversionConfig, ThemeEvaluator};
use crate::delimiter::{split_top_level, Delimiters};
use crate::error::ColorError;
use crate::heuristics::{contrast_ratio, darkness_score, relative_luminance};
use crate::invert::Inverter;
use crate::spread::VariableLibrary;
use crate::Srgb;

/// Nested style rules: sheet name, then selectors and at-rules, down to
/// property and raw value. Keys keep their insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleTree(IndexMap<String, StyleEntry>);

/// A single entry of a [`StyleTree`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleEntry {
    /// A property with its raw value.
    Declaration(String),
    /// A nested sheet, selector or at-rule.
    Block(StyleTree),
}

impl StyleTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration.
    pub fn with_declaration(
        mut self,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.insert(property, StyleEntry::Declaration(value.into()));
        self
    }

    /// Add a nested block.
    pub fn with_block(mut self, key: impl Into<String>, block: StyleTree) -> Self {
        self.insert(key, StyleEntry::Block(block));
        self
    }

    /// Insert an entry, replacing an existing entry with the same key in
    /// place.
    pub fn insert(&mut self, key: impl Into<String>, entry: StyleEntry) {
        self.0.insert(key.into(), entry);
    }

    /// Look up an entry.
    pub fn get(&self, key: &str) -> Option<&StyleEntry> {
        self.0.get(key)
    }

    /// Iterate over the entries in order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, StyleEntry> {
        self.0.iter()
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Properties whose values may hold colors.
const COLOR_PROPERTIES: &[&str] = &[
    "accent-color",
    "background",
    "background-color",
    "background-image",
    "border",
    "border-block",
    "border-block-color",
    "border-block-end",
    "border-block-end-color",
    "border-block-start",
    "border-block-start-color",
    "border-bottom",
    "border-bottom-color",
    "border-color",
    "border-image",
    "border-image-source",
    "border-inline",
    "border-inline-color",
    "border-inline-end",
    "border-inline-end-color",
    "border-inline-start",
    "border-inline-start-color",
    "border-left",
    "border-left-color",
    "border-right",
    "border-right-color",
    "border-top",
    "border-top-color",
    "box-shadow",
    "caret-color",
    "color",
    "column-rule",
    "column-rule-color",
    "fill",
    "flood-color",
    "lighting-color",
    "list-style-image",
    "mask-image",
    "outline",
    "outline-color",
    "scrollbar-color",
    "stop-color",
    "stroke",
    "text-decoration",
    "text-decoration-color",
    "text-emphasis",
    "text-emphasis-color",
    "text-shadow",
];

/// Returns true if the property is known to carry colors. Vendor prefixes
/// are ignored.
pub fn is_color_property(property: &str) -> bool {
    let property = property.to_ascii_lowercase();
    let property = crate::classify::strip_vendor_prefix(&property);
    COLOR_PROPERTIES.contains(&property)
}

/// The first top-level part of a value that is a color, or an error if that
/// part is a color model with the wrong shape.
fn first_color(value: &str) -> Option<Result<Color, ColorError>> {
    let (parts, _) = split_top_level(value, Delimiters::DEFAULT);
    parts.iter().find_map(|part| match Color::parse(part) {
        Err(ColorError::NotAColor) => None,
        result => Some(result),
    })
}

/// Returns true if the value text contains something that reads as a color.
pub fn looks_like_color(value: &str) -> bool {
    first_color(value).is_some()
}

/// How often a custom property is used in each role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCount {
    /// Uses in background declarations.
    pub background: usize,
    /// Uses in text color declarations.
    pub text: usize,
}

/// Whether a color paints a background or text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// `background` and `background-color`.
    Background,
    /// `color`.
    Text,
}

impl Role {
    /// The role of a regular property, if it has one.
    pub fn of_property(property: &str) -> Option<Role> {
        match property.to_ascii_lowercase().as_str() {
            "background" | "background-color" => Some(Role::Background),
            "color" => Some(Role::Text),
            _ => None,
        }
    }
}

/// Use counts of custom properties, by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceStats(IndexMap<String, UseCount>);

impl ReferenceStats {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the `var()` uses in background and text declarations of a tree.
    pub fn from_tree(tree: &StyleTree) -> Self {
        let mut stats = Self::new();
        stats.visit(tree);
        stats
    }

    fn visit(&mut self, tree: &StyleTree) {
        for (property, entry) in tree.iter() {
            match entry {
                StyleEntry::Block(block) => self.visit(block),
                StyleEntry::Declaration(value) => {
                    if let Some(role) = Role::of_property(property) {
                        for name in referenced_variables(value) {
                            self.record(name, role);
                        }
                    }
                }
            }
        }
    }

    /// Count one use of a custom property.
    pub fn record(&mut self, name: impl Into<String>, role: Role) {
        let count = self.0.entry(name.into()).or_default();
        match role {
            Role::Background => count.background += 1,
            Role::Text => count.text += 1,
        }
    }

    /// The use counts of a custom property.
    pub fn get(&self, name: &str) -> UseCount {
        self.0.get(name).copied().unwrap_or_default()
    }

    /// The role a custom property is used in most. Ties have no role.
    pub fn role(&self, name: &str) -> Option<Role> {
        let count = self.get(name);
        match count.background.cmp(&count.text) {
            std::cmp::Ordering::Greater => Some(Role::Background),
            std::cmp::Ordering::Less => Some(Role::Text),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// The names of every custom property referenced with `var()`.
fn referenced_variables(value: &str) -> Vec<&str> {
    value
        .match_indices("var(")
        .filter_map(|(start, matched)| {
            let rest = value[start + matched.len()..].trim_start();
            let end = rest
                .find(|c: char| c == ',' || c == ')' || c.is_whitespace())
                .unwrap_or(rest.len());
            let name = &rest[..end];
            name.starts_with("--").then_some(name)
        })
        .collect()
}

/// The original theme of a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    /// Dark text on a light background.
    Light,
    /// Light text on a dark background.
    Dark,
}

/// Alpha weighted running sums of colors.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorAggregate {
    /// Sum of premultiplied red.
    pub red: Component,
    /// Sum of premultiplied green.
    pub green: Component,
    /// Sum of premultiplied blue.
    pub blue: Component,
    /// Sum of alpha.
    pub alpha: Component,
    /// Number of colors added.
    pub count: usize,
}

impl ColorAggregate {
    /// Add a color.
    pub fn add(&mut self, color: &Srgb) {
        self.red += color.red * color.alpha;
        self.green += color.green * color.alpha;
        self.blue += color.blue * color.alpha;
        self.alpha += color.alpha;
        self.count += 1;
    }

    /// Add all colors of another aggregate.
    pub fn merge(&mut self, other: &Self) {
        self.red += other.red;
        self.green += other.green;
        self.blue += other.blue;
        self.alpha += other.alpha;
        self.count += other.count;
    }

    /// The average color. Transparent black if nothing with any opacity was
    /// added.
    pub fn average(&self) -> Srgb {
        if self.alpha == 0.0 {
            return Srgb::TRANSPARENT;
        }

        Srgb::new(
            self.red / self.alpha,
            self.green / self.alpha,
            self.blue / self.alpha,
            self.alpha / self.count as Component,
        )
    }
}

/// Background and text aggregates of a region.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ThemeAggregate {
    /// Background colors.
    pub background: ColorAggregate,
    /// Text colors.
    pub text: ColorAggregate,
}

impl ThemeAggregate {
    /// Add a color in the given role.
    pub fn add(&mut self, role: Role, color: &Srgb) {
        match role {
            Role::Background => self.background.add(color),
            Role::Text => self.text.add(color),
        }
    }

    /// Add all colors of another aggregate.
    pub fn merge(&mut self, other: &Self) {
        self.background.merge(&other.background);
        self.text.merge(&other.text);
    }

    /// Returns true if any color with some opacity was added.
    pub fn has_weight(&self) -> bool {
        self.background.alpha > 0.0 || self.text.alpha > 0.0
    }

    /// Classify the region with the configured evaluator.
    pub fn evaluate(&self, config: &InversionConfig) -> Theme {
        let background = self.background.average();
        let text = self.text.average();

        match config.theme_evaluator {
            ThemeEvaluator::Heuristic => evaluate_theme(&background, &text, config),
            ThemeEvaluator::Contrast => evaluate_theme_by_contrast(&background, &text),
        }
    }
}

/// Decide whether a region with the given average background and text
/// colors has a light theme, using the fitted darkness score.
pub fn evaluate_theme(background: &Srgb, text: &Srgb, config: &InversionConfig) -> Theme {
    let background_darkness = darkness_score(background.to_components(), background.alpha);
    let text_darkness = darkness_score(text.to_components(), text.alpha);

    let light = if background.alpha == 0.0 && text_darkness > config.light_text_threshold {
        true
    } else if text.alpha == 0.0 && background_darkness < config.light_background_threshold {
        true
    } else {
        text_darkness > background_darkness
    };

    if light {
        Theme::Light
    } else {
        Theme::Dark
    }
}

/// Decide whether a region has a light theme by comparing WCAG relative
/// luminances. Colors are composited over white first. When the contrast is
/// too low to tell, the background alone decides.
pub fn evaluate_theme_by_contrast(background: &Srgb, text: &Srgb) -> Theme {
    let over_white = |color: &Srgb| {
        color
            .to_components()
            .map(|c| c * color.alpha + 255.0 * (1.0 - color.alpha))
    };

    let background = relative_luminance(over_white(background));
    let text = relative_luminance(over_white(text));

    let light = if contrast_ratio(background, text) < 1.5 {
        background > 0.18
    } else {
        background >= text
    };

    if light {
        Theme::Light
    } else {
        Theme::Dark
    }
}

/// Invert every color-bearing declaration of a style tree and return only the
/// inverted declarations of regions whose original theme was light. Custom
/// properties are resolved or spread using the definitions found in the tree
/// itself.
pub fn invert_styles(
    tree: &StyleTree,
    references: &ReferenceStats,
    config: &InversionConfig,
) -> StyleTree {
    let library = VariableLibrary::from_tree(tree, &config.spread_prefix);
    let walker = Walker {
        inverter: Inverter::new(config).with_variables(&library),
        library: &library,
        references,
        config,
    };

    walker.walk(tree).tree
}

struct Walker<'a> {
    inverter: Inverter<'a>,
    library: &'a VariableLibrary,
    references: &'a ReferenceStats,
    config: &'a InversionConfig,
}

struct Walked {
    tree: StyleTree,
    aggregate: ThemeAggregate,
    /// Set if the block itself holds a declaration with an opaque color.
    has_own_weight: bool,
}

impl Walker<'_> {
    fn walk(&self, tree: &StyleTree) -> Walked {
        let mut output = StyleTree::new();
        let mut own = ThemeAggregate::default();
        let mut aggregate = ThemeAggregate::default();

        for (key, entry) in tree.iter() {
            match entry {
                StyleEntry::Declaration(value) => {
                    log::trace!("visiting `{key}: {value}`");

                    let role = self.role(key);
                    if let Some(role) = role {
                        if let Some(color) = self.original_color(value) {
                            own.add(role, &color);
                        }
                    }

                    if let Some((property, inverted)) = self.invert_declaration(key, value, role) {
                        output.insert(property, StyleEntry::Declaration(inverted));
                    }
                }
                StyleEntry::Block(block) => {
                    let walked = self.walk(block);
                    aggregate.merge(&walked.aggregate);

                    if walked.tree.is_empty() {
                        continue;
                    }

                    // Blocks that only group other blocks were judged through
                    // their children already.
                    if walked.has_own_weight
                        && walked.aggregate.evaluate(self.config) == Theme::Dark
                    {
                        log::debug!("`{key}` was dark already, leaving it untouched");
                        let kept = self.definition_sites(block);
                        if !kept.is_empty() {
                            output.insert(key.clone(), StyleEntry::Block(kept));
                        }
                        continue;
                    }

                    output.insert(key.clone(), StyleEntry::Block(walked.tree));
                }
            }
        }

        aggregate.merge(&own);

        Walked {
            tree: output,
            aggregate,
            has_own_weight: own.has_weight(),
        }
    }

    /// The spread definitions inside a block left untouched, pointing back at
    /// the original properties. Without them the derived names would keep the
    /// inverted values of an outer scope.
    fn definition_sites(&self, tree: &StyleTree) -> StyleTree {
        let mut output = StyleTree::new();

        for (key, entry) in tree.iter() {
            match entry {
                StyleEntry::Declaration(value) => {
                    if !key.starts_with("--") || !looks_like_color(value) {
                        continue;
                    }
                    if let Some((name, identity)) = self.inverter.identity_definition(key) {
                        output.insert(name, StyleEntry::Declaration(identity));
                    }
                }
                StyleEntry::Block(block) => {
                    let kept = self.definition_sites(block);
                    if !kept.is_empty() {
                        output.insert(key.clone(), StyleEntry::Block(kept));
                    }
                }
            }
        }

        output
    }

    fn role(&self, property: &str) -> Option<Role> {
        if property.starts_with("--") {
            self.references.role(property)
        } else {
            Role::of_property(property)
        }
    }

    /// The color a declaration contributes to the aggregate, taken from its
    /// value before inversion.
    fn original_color(&self, value: &str) -> Option<Srgb> {
        match first_color(value)? {
            Ok(Color::Gradient(gradient)) => gradient.average(),
            Ok(Color::Variable(variable)) => self
                .library
                .resolve_color(&variable.name)
                .and_then(|color| color.to_srgb()),
            Ok(color) => color.to_srgb(),
            Err(err) => {
                log::debug!("`{value}` counts as transparent: {err}");
                Some(Srgb::TRANSPARENT)
            }
        }
    }

    /// The declaration to emit for a property, if it changed.
    fn invert_declaration(
        &self,
        property: &str,
        value: &str,
        role: Option<Role>,
    ) -> Option<(String, String)> {
        let darkened = self.config.darken_backgrounds && role == Some(Role::Background);

        if property.starts_with("--") {
            if !looks_like_color(value) {
                return None;
            }
            let (name, inverted) = self.inverter.invert_definition(property, value, darkened)?;
            return (name != property || inverted != value.trim()).then_some((name, inverted));
        }

        if !is_color_property(property) {
            return None;
        }

        let inverted = self.inverter.invert_text(value, darkened);
        (inverted != value.trim()).then(|| (property.to_string(), inverted))
    }
}
