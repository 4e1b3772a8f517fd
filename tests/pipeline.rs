use nightshade::{
    generate_css_from_styles, invert_styles, InversionConfig, ReferenceStats, StyleEntry,
    StyleTree, ThemeEvaluator,
};

fn load(json: &str) -> StyleTree {
    serde_json::from_str(json).unwrap()
}

fn run(tree: &StyleTree, config: &InversionConfig) -> String {
    let references = ReferenceStats::from_tree(tree);
    let inverted = invert_styles(tree, &references, config);
    generate_css_from_styles(&inverted, config)
}

const LIGHT: &str = r##"{
    "site.css": {
        "body": {
            "background-color": "#ffffff",
            "color": "#222222",
            "font-family": "serif"
        },
        "a": { "color": "#0645ad" },
        "@media print": {
            "body": { "color": "#000000", "margin": "0" }
        }
    }
}"##;

#[test]
fn light_sheet_is_inverted() {
    let config = InversionConfig::default();
    let css = run(&load(LIGHT), &config);

    assert!(css.starts_with("@media (prefers-color-scheme: dark) {\n"));
    assert!(css.contains("    background-color: #5d5d5d;\n"));
    assert!(css.contains("@media print {\n"));
    assert!(css.contains("      color: #ffffff;\n"));
    assert!(!css.contains("font-family"));
    assert!(!css.contains("margin"));
    assert!(!css.contains("site.css"));
}

#[test]
fn dark_sheet_is_left_alone() {
    let tree = load(
        r##"{
            "dark.css": {
                "body": { "background-color": "#111111", "color": "#eeeeee" },
                "pre": { "background": "#000000", "color": "#dddddd" }
            }
        }"##,
    );

    for theme_evaluator in [ThemeEvaluator::Heuristic, ThemeEvaluator::Contrast] {
        let config = InversionConfig {
            theme_evaluator,
            ..InversionConfig::default()
        };
        assert_eq!(run(&tree, &config), "");
    }
}

#[test]
fn spread_variables_across_media() {
    let tree = load(
        r##"{
            "vars.css": {
                ":root": { "--accent": "#ffffff" },
                "@media (min-width: 600px)": {
                    ":root": { "--accent": "#eeeeee" }
                },
                "a": { "color": "var(--accent)" }
            }
        }"##,
    );
    let config = InversionConfig::default();

    let references = ReferenceStats::from_tree(&tree);
    let inverted = invert_styles(&tree, &references, &config);

    let Some(StyleEntry::Block(sheet)) = inverted.get("vars.css") else {
        panic!("sheet was dropped");
    };
    let Some(StyleEntry::Block(root)) = sheet.get(":root") else {
        panic!("root was dropped");
    };
    assert_eq!(
        root.get("--nightshade-accent"),
        Some(&StyleEntry::Declaration("#5d5d5d".to_string()))
    );
    let Some(StyleEntry::Block(link)) = sheet.get("a") else {
        panic!("link was dropped");
    };
    assert_eq!(
        link.get("color"),
        Some(&StyleEntry::Declaration(
            "var(--nightshade-accent, var(--accent))".to_string()
        ))
    );

    let css = generate_css_from_styles(&inverted, &config);
    assert!(css.contains("@media (min-width: 600px) {\n"));
    assert_eq!(css.matches("--nightshade-accent:").count(), 2);
}

#[test]
fn repeated_runs_are_identical() {
    let config = InversionConfig::from_toml_str(
        r#"
        spread_prefix = "--night-"
        darken_backgrounds = true
        "#,
    )
    .unwrap();
    let tree = load(
        r##"{
            "mixed.css": {
                ":root": { "--bg": "var(--brand)", "--text": "#333" },
                "main": {
                    "background": "linear-gradient(var(--bg), #fafafa)",
                    "color": "var(--text)",
                    "border": "1px solid var(--missing, #ccc)"
                }
            }
        }"##,
    );

    let first = run(&tree, &config);
    let second = run(&tree, &config);
    assert!(!first.is_empty());
    assert_eq!(first, second);
    assert!(first.contains("--night-bg: rgb(from var(--bg) "));
    assert!(!first.contains("--night-night-"));
}
