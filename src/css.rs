//! Serialize a style tree back to CSS text.

use crate::classify::strip_vendor_prefix;
use crate::config::InversionConfig;
use crate::style::{StyleEntry, StyleTree};

/// At-rules that group other rules under a condition. Their content is
/// generated with the same wrapping rule as the top level of a sheet.
const CONDITIONAL_RULES: &[&str] = &["media", "supports", "container", "layer", "document"];

/// The name of an at-rule key, without the `@` and any vendor prefix.
fn at_rule_name(key: &str) -> Option<&str> {
    let rest = key.trim_start().strip_prefix('@')?;
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '(' || c == '{' || c == ';')
        .unwrap_or(rest.len());
    Some(strip_vendor_prefix(&rest[..end]))
}

fn is_conditional(key: &str) -> bool {
    at_rule_name(key).is_some_and(|name| {
        CONDITIONAL_RULES
            .iter()
            .any(|rule| name.eq_ignore_ascii_case(rule))
    })
}

/// Generate CSS text for a style tree. The top-level keys are sheet names and
/// are not emitted. Rule blocks are wrapped in the configured dark media
/// query, nested conditional at-rules are kept as they are.
pub fn generate_css_from_styles(tree: &StyleTree, config: &InversionConfig) -> String {
    let mut writer = CssWriter {
        output: String::new(),
        media_query: config.dark_media_query.trim(),
    };

    for (name, entry) in tree.iter() {
        match entry {
            StyleEntry::Block(sheet) => writer.rules(sheet, 0),
            StyleEntry::Declaration(_) => {
                log::debug!("`{name}` is not a sheet, skipping it");
            }
        }
    }

    writer.output
}

struct CssWriter<'a> {
    output: String,
    media_query: &'a str,
}

impl CssWriter<'_> {
    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.output.push_str("  ");
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    /// Emit the rules of one level. Consecutive rule blocks share a single
    /// media wrapper.
    fn rules(&mut self, tree: &StyleTree, depth: usize) {
        let mut run: Vec<(&String, &StyleTree)> = Vec::new();

        for (key, entry) in tree.iter() {
            match entry {
                StyleEntry::Block(block) if is_conditional(key) => {
                    self.wrapped(&run, depth);
                    run.clear();

                    self.line(depth, &format!("{} {{", key.trim()));
                    self.rules(block, depth + 1);
                    self.line(depth, "}");
                }
                StyleEntry::Block(block) => run.push((key, block)),
                StyleEntry::Declaration(value) => {
                    log::debug!("`{key}: {value}` has no selector, skipping it");
                }
            }
        }

        self.wrapped(&run, depth);
    }

    fn wrapped(&mut self, run: &[(&String, &StyleTree)], depth: usize) {
        if run.is_empty() {
            return;
        }

        if self.media_query.is_empty() {
            for (key, block) in run {
                self.block(key, block, depth);
            }
            return;
        }

        self.line(depth, &format!("@media {} {{", self.media_query));
        for (key, block) in run {
            self.block(key, block, depth + 1);
        }
        self.line(depth, "}");
    }

    /// Emit a block with everything inside it as is.
    fn block(&mut self, key: &str, tree: &StyleTree, depth: usize) {
        self.line(depth, &format!("{} {{", key.trim()));
        for (key, entry) in tree.iter() {
            match entry {
                StyleEntry::Declaration(value) => {
                    self.line(depth + 1, &format!("{}: {};", key, value.trim()));
                }
                StyleEntry::Block(block) => self.block(key, block, depth + 1),
            }
        }
        self.line(depth, "}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rules: StyleTree) -> StyleTree {
        StyleTree::new().with_block("main.css", rules)
    }

    #[test]
    fn at_rule_names() {
        assert_eq!(at_rule_name("@media (min-width: 10px)"), Some("media"));
        assert_eq!(at_rule_name("@-moz-document url-prefix()"), Some("document"));
        assert_eq!(at_rule_name("@keyframes fade"), Some("keyframes"));
        assert_eq!(at_rule_name("body"), None);

        assert!(is_conditional("@supports (display: grid)"));
        assert!(is_conditional("@MEDIA print"));
        assert!(!is_conditional("@font-face"));
    }

    #[test]
    fn empty_tree() {
        let config = InversionConfig::default();
        assert_eq!(generate_css_from_styles(&StyleTree::new(), &config), "");
        assert_eq!(
            generate_css_from_styles(&sheet(StyleTree::new()), &config),
            ""
        );
    }

    #[test]
    fn consecutive_rules_share_a_wrapper() {
        let tree = sheet(
            StyleTree::new()
                .with_block(
                    "body",
                    StyleTree::new()
                        .with_declaration("background", "#5d5d5d")
                        .with_declaration("color", "#ffffff"),
                )
                .with_block("a", StyleTree::new().with_declaration("color", "#8080ff")),
        );

        let css = generate_css_from_styles(&tree, &InversionConfig::default());
        assert_eq!(
            css,
            "@media (prefers-color-scheme: dark) {\n\
             \x20 body {\n\
             \x20   background: #5d5d5d;\n\
             \x20   color: #ffffff;\n\
             \x20 }\n\
             \x20 a {\n\
             \x20   color: #8080ff;\n\
             \x20 }\n\
             }\n"
        );
    }

    #[test]
    fn conditional_rules_are_kept_literally() {
        let tree = sheet(
            StyleTree::new()
                .with_block("p", StyleTree::new().with_declaration("color", "#fff"))
                .with_block(
                    "@media print",
                    StyleTree::new()
                        .with_block("p", StyleTree::new().with_declaration("color", "#000")),
                )
                .with_block("em", StyleTree::new().with_declaration("color", "#eee")),
        );

        let css = generate_css_from_styles(&tree, &InversionConfig::default());
        assert_eq!(
            css,
            "@media (prefers-color-scheme: dark) {\n\
             \x20 p {\n\
             \x20   color: #fff;\n\
             \x20 }\n\
             }\n\
             @media print {\n\
             \x20 @media (prefers-color-scheme: dark) {\n\
             \x20   p {\n\
             \x20     color: #000;\n\
             \x20   }\n\
             \x20 }\n\
             }\n\
             @media (prefers-color-scheme: dark) {\n\
             \x20 em {\n\
             \x20   color: #eee;\n\
             \x20 }\n\
             }\n"
        );
    }

    #[test]
    fn other_at_rules_are_wrapped_whole() {
        let tree = sheet(StyleTree::new().with_block(
            "@keyframes pulse",
            StyleTree::new()
                .with_block("from", StyleTree::new().with_declaration("color", "#111"))
                .with_block("to", StyleTree::new().with_declaration("color", "#222")),
        ));

        let css = generate_css_from_styles(&tree, &InversionConfig::default());
        assert_eq!(css.matches("@media").count(), 1);
        assert!(css.contains("  @keyframes pulse {\n    from {\n      color: #111;\n"));
    }

    #[test]
    fn without_media_query() {
        let config = InversionConfig {
            dark_media_query: String::new(),
            ..InversionConfig::default()
        };
        let tree = sheet(StyleTree::new().with_block(
            "body",
            StyleTree::new().with_declaration("color", "#fff"),
        ));

        assert_eq!(
            generate_css_from_styles(&tree, &config),
            "body {\n  color: #fff;\n}\n"
        );
    }
}
