//! Property tests for normalization and reference rewriting.

use std::collections::BTreeSet;
use std::fs;

use proptest::prelude::*;
use stylesync::{
    ColorStyle, Diagnostics, MatchMode, Migration, ProjectFiles, ReferenceRewriter, Rgba,
    StyleRecord, TextStyle, VariableCase,
};
use tempfile::TempDir;

fn text_style(point_size: f64, kerning: f64, line_height: f64) -> TextStyle {
    let color = ColorStyle::new("Ink", "C1", Rgba::from_rgb8(1, 2, 3, 1.0));
    TextStyle::new("Body", "T1", "Inter", point_size, kerning, line_height, color)
}

proptest! {
    #[test]
    fn rounding_is_idempotent(
        point_size in 1.0f64..200.0,
        kerning in -5.0f64..5.0,
        line_height in 1.0f64..300.0,
    ) {
        let once = text_style(point_size, kerning, line_height);
        let twice = text_style(once.point_size(), once.kerning(), once.line_height());
        prop_assert_eq!(&once, &twice);

        let json = serde_json::to_string(&once).unwrap();
        let back: TextStyle = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, once);
    }

    #[test]
    fn ratios_quantize_stably(red in 0.0f64..=1.0, green in 0.0f64..=1.0, blue in 0.0f64..=1.0, alpha in 0.0f64..=1.0) {
        let rgba = Rgba::from_ratios(red, green, blue, alpha);
        let again = Rgba::from_rgb8(rgba.red(), rgba.green(), rgba.blue(), rgba.alpha());
        prop_assert_eq!(rgba, again);
    }

    #[test]
    fn deprecating_twice_is_deprecating_once(name in "[A-Z][a-z]{0,8}( [A-Z][a-z]{0,8})?", id in "[A-Z][0-9]{1,4}") {
        let style = ColorStyle::new(name.clone(), id.clone(), Rgba::from_rgb8(9, 9, 9, 0.5));
        let once = StyleRecord::deprecated(&style);
        let twice = StyleRecord::deprecated(&once);

        prop_assert_eq!(&once, &twice);
        prop_assert!(once.is_deprecated());
        prop_assert_eq!(once.name(), name.as_str());
        prop_assert_eq!(once.identifier(), id.as_str());
        let deprecated = once.replaceable(VariableCase::Snake);
        let original = style.replaceable(VariableCase::Snake);
        prop_assert_eq!(deprecated.variable_name(), original.variable_name());
    }
}

fn migrations() -> impl Strategy<Value = Vec<Migration>> {
    prop::collection::btree_map("q[a-f]{1,5}", "z[g-p]{1,5}", 1..6).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(old, new)| Migration::new(old, new))
            .collect()
    })
}

/// Renames whose new name wraps the old one, like `red -> redDark`.
fn wrapping_migrations() -> impl Strategy<Value = Vec<Migration>> {
    prop::collection::btree_map("q[a-f]{1,5}", ("[g-p]{0,3}", "[g-p]{0,3}"), 1..6).prop_map(
        |pairs| {
            pairs
                .into_iter()
                .filter(|(_, (prefix, suffix))| !prefix.is_empty() || !suffix.is_empty())
                .map(|(old, (prefix, suffix))| {
                    let new = format!("{}{}{}", prefix, old, suffix);
                    Migration::new(old, new)
                })
                .collect()
        },
    )
}

fn contents() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-fqz .\n]{0,40}", 1..4)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn rewriting_twice_changes_nothing(migrations in migrations(), contents in contents(), seeds in prop::collection::vec(0usize..16, 0..8)) {
        let second = rewrite_twice(&migrations, &contents, &seeds);
        prop_assert!(second.is_empty());
    }

    #[test]
    fn rewriting_into_longer_names_twice_changes_nothing(migrations in wrapping_migrations(), contents in contents(), seeds in prop::collection::vec(0usize..16, 0..8)) {
        prop_assume!(!migrations.is_empty());
        let second = rewrite_twice(&migrations, &contents, &seeds);
        prop_assert!(second.is_empty());
    }
}

/// Writes one file per content, with seeded old names appended, and applies
/// the migrations twice. Returns the files the second pass changed.
fn rewrite_twice(migrations: &[Migration], contents: &[String], seeds: &[usize]) -> Vec<String> {
    let temp = TempDir::new().unwrap();
    for (i, content) in contents.iter().enumerate() {
        let mut content = content.clone();
        for seed in seeds {
            content.push_str(&migrations[seed % migrations.len()].old);
            content.push(' ');
        }
        fs::write(temp.path().join(format!("file{}.swift", i)), content).unwrap();
    }

    let extensions: BTreeSet<String> = ["swift".to_string()].into_iter().collect();
    let mut diagnostics = Diagnostics::new();
    let project = ProjectFiles::collect(temp.path(), &extensions, &[], &mut diagnostics).unwrap();
    let rewriter = ReferenceRewriter::new(MatchMode::Literal);

    rewriter.apply_migrations(&project, migrations, &mut diagnostics).unwrap();
    let second = rewriter.apply_migrations(&project, migrations, &mut diagnostics).unwrap();
    assert!(diagnostics.is_empty());
    second.iter().map(|p| project.relative_name(p)).collect()
}
