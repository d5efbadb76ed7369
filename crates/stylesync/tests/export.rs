//! End-to-end exports against a temporary project.

use std::fs;
use std::path::{Path, PathBuf};

use stylesync::{
    export_styles, ColorStyle, Config, DiagnosticKind, ExportReport, ExportSettings,
    JsonStyleSource, MatchMode, Migration, Rgba, SnapshotStore, StyleExporter, TextStyle, Version,
};
use stylesync_template::{CodeTemplate, TemplateFileName};
use tempfile::TempDir;

const COLOR_TEMPLATE: &str = "// Style set {{ version }}\n\
<color compact>\n\
@available(*, deprecated) {% deprecated=true %}\n\
static let {{ variableName }} = Color(hex: \"{{ hex }}\")\n\
</color>\n";

const TEXT_TEMPLATE: &str = "<textStyle compact>\n\
static let {{ variableName }} = Font(\"{{ fontName }}\", {{ pointSize }}, color: .{{ colorVariableName }})\n\
</textStyle>\n";

fn create_file(dir: &Path, relative_path: &str, content: &str) {
    let full_path = dir.join(relative_path);
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full_path, content).unwrap();
}

fn settings(root: &Path) -> ExportSettings {
    ExportSettings::new(
        root,
        CodeTemplate::parse(COLOR_TEMPLATE)
            .unwrap()
            .with_file_name(TemplateFileName::parse("Colors.swift-template.txt")),
        CodeTemplate::parse(TEXT_TEMPLATE)
            .unwrap()
            .with_file_name(TemplateFileName::parse("Fonts.swift-template.txt")),
    )
}

fn color(name: &str, identifier: &str, rgb: (u8, u8, u8)) -> ColorStyle {
    ColorStyle::new(name, identifier, Rgba::from_rgb8(rgb.0, rgb.1, rgb.2, 1.0))
}

fn red() -> ColorStyle {
    color("Red", "C1", (255, 0, 0))
}

fn text(name: &str, identifier: &str, color: &ColorStyle) -> TextStyle {
    TextStyle::new(name, identifier, "Inter-Bold", 24.0, 0.0, 30.0, color.clone())
}

fn read(root: &Path, relative_path: &str) -> String {
    fs::read_to_string(root.join(relative_path)).unwrap()
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect()
}

fn names(entries: &[stylesync::SummaryEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

// =============================================================================
// Additions
// =============================================================================

#[test]
fn test_added_text_style_bumps_minor() {
    let temp = TempDir::new().unwrap();
    let settings = settings(temp.path());
    let red = red();

    let first = export_styles(&settings, vec![red.clone()], vec![text("Heading", "T1", &red)]).unwrap();
    assert_eq!(first.version, Version::INITIAL);

    let second = export_styles(
        &settings,
        vec![red.clone()],
        vec![text("Heading", "T1", &red), text("Body", "T2", &red)],
    )
    .unwrap();

    assert_eq!(second.previous_version, Some(Version::new(1, 0)));
    assert_eq!(second.version, Version::new(1, 1));
    assert!(second.migrations.is_empty());
    assert!(second.summary.deprecated.is_empty());
    assert_eq!(names(&second.summary.added), vec!["Body"]);

    assert_eq!(
        read(temp.path(), "Colors.swift"),
        "// Style set 1.1\nstatic let red = Color(hex: \"#FF0000\")\n"
    );
    assert_eq!(
        read(temp.path(), "Fonts.swift"),
        "static let heading = Font(\"Inter-Bold\", 24, color: .red)\n\
         static let body = Font(\"Inter-Bold\", 24, color: .red)\n"
    );
}

#[test]
fn test_unchanged_export_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let settings = settings(temp.path());
    create_file(temp.path(), "App.swift", "let tint = Styles.red\n");
    let store = SnapshotStore::new(&settings.snapshot_dir);

    export_styles(&settings, vec![red()], vec![text("Heading", "T1", &red())]).unwrap();
    let colors = read(temp.path(), "Colors.swift");
    let snapshot = fs::read_to_string(store.color_path()).unwrap();

    let again = export_styles(&settings, vec![red()], vec![text("Heading", "T1", &red())]).unwrap();

    assert_eq!(again.version, Version::INITIAL);
    assert!(!again.version_changed());
    assert!(again.summary.is_empty());
    assert!(again.mutated_files.is_empty());
    assert_eq!(read(temp.path(), "Colors.swift"), colors);
    assert_eq!(fs::read_to_string(store.color_path()).unwrap(), snapshot);
    assert!(again.summary_log.contains("No style changes."));
}

// =============================================================================
// Renames
// =============================================================================

#[test]
fn test_rename_rewrites_references() {
    let temp = TempDir::new().unwrap();
    let settings = settings(temp.path());
    create_file(temp.path(), "Sources/App.swift", "label.textColor = .red\n");
    create_file(temp.path(), "Sources/notes.txt", "red stays red\n");

    export_styles(&settings, vec![red()], vec![]).unwrap();
    let report = export_styles(&settings, vec![color("Primary", "C1", (255, 0, 0))], vec![]).unwrap();

    assert_eq!(report.migrations, vec![Migration::new("red", "primary")]);
    assert_eq!(file_names(&report.mutated_files), vec!["App.swift"]);
    assert_eq!(read(temp.path(), "Sources/App.swift"), "label.textColor = .primary\n");
    assert_eq!(read(temp.path(), "Sources/notes.txt"), "red stays red\n");

    assert_eq!(report.version, Version::new(1, 1));
    assert_eq!(
        report.summary.updated[0].detail.as_deref(),
        Some("renamed from Red")
    );
    assert!(read(temp.path(), "Colors.swift").contains("static let primary"));
}

#[test]
fn test_rename_with_word_boundaries() {
    let temp = TempDir::new().unwrap();
    let mut settings = settings(temp.path());
    settings.match_mode = MatchMode::WordBoundary;
    create_file(temp.path(), "App.swift", "a = .red\nb = .redDark\n");

    let red_dark = color("Red Dark", "C2", (128, 0, 0));
    export_styles(&settings, vec![red(), red_dark.clone()], vec![]).unwrap();
    export_styles(
        &settings,
        vec![color("Primary", "C1", (255, 0, 0)), red_dark],
        vec![],
    )
    .unwrap();

    assert_eq!(read(temp.path(), "App.swift"), "a = .primary\nb = .redDark\n");
}

#[test]
fn test_dry_run_leaves_project_untouched() {
    let temp = TempDir::new().unwrap();
    let mut settings = settings(temp.path());
    create_file(temp.path(), "App.swift", "label.textColor = .red\n");
    export_styles(&settings, vec![red()], vec![]).unwrap();
    let colors = read(temp.path(), "Colors.swift");

    settings.dry_run = true;
    let report = export_styles(&settings, vec![color("Primary", "C1", (255, 0, 0))], vec![]).unwrap();

    assert!(report.dry_run);
    assert_eq!(report.version, Version::new(1, 1));
    assert_eq!(file_names(&report.mutated_files), vec!["App.swift"]);
    assert_eq!(read(temp.path(), "App.swift"), "label.textColor = .red\n");
    assert_eq!(read(temp.path(), "Colors.swift"), colors);

    let stored = SnapshotStore::new(&settings.snapshot_dir)
        .load(&mut stylesync::Diagnostics::new())
        .unwrap()
        .unwrap();
    assert_eq!(stored.version, Version::INITIAL);
}

#[test]
fn test_dry_run_sees_files_as_rewritten() {
    let temp = TempDir::new().unwrap();
    let mut settings = settings(temp.path());
    create_file(temp.path(), "App.swift", "label.textColor = .redDark\n");
    export_styles(&settings, vec![red(), color("Red Dark", "C2", (128, 0, 0))], vec![]).unwrap();
    let latest = || vec![color("Primary", "C2", (128, 0, 0))];

    settings.dry_run = true;
    let planned = export_styles(&settings, latest(), vec![]).unwrap();
    assert_eq!(read(temp.path(), "App.swift"), "label.textColor = .redDark\n");

    settings.dry_run = false;
    let written = export_styles(&settings, latest(), vec![]).unwrap();
    assert_eq!(read(temp.path(), "App.swift"), "label.textColor = .primary\n");

    assert_eq!(names(&planned.summary.removed), vec!["Red"]);
    assert!(planned.summary.deprecated.is_empty());
    assert_eq!(names(&planned.summary.removed), names(&written.summary.removed));
    assert_eq!(planned.version, written.version);
    assert_eq!(planned.generated_files, written.generated_files);
}

// =============================================================================
// Deprecation
// =============================================================================

#[test]
fn test_used_deprecated_styles_survive() {
    let temp = TempDir::new().unwrap();
    let settings = settings(temp.path());
    create_file(temp.path(), "App.swift", "view.backgroundColor = .blue\n");

    let blue = color("Blue", "C2", (0, 0, 255));
    let green = color("Green", "C3", (0, 255, 0));
    export_styles(&settings, vec![red(), blue, green], vec![]).unwrap();

    let report = export_styles(&settings, vec![red()], vec![]).unwrap();

    assert_eq!(report.version, Version::new(2, 0));
    assert_eq!(names(&report.summary.deprecated), vec!["Blue"]);
    assert_eq!(report.summary.deprecated[0].files, vec!["App.swift".to_string()]);
    assert_eq!(names(&report.summary.removed), vec!["Green"]);

    assert_eq!(
        read(temp.path(), "Colors.swift"),
        "// Style set 2.0\n\
         @available(*, deprecated)\n\
         static let blue = Color(hex: \"#0000FF\")\n\
         static let red = Color(hex: \"#FF0000\")\n"
    );

    let stored = SnapshotStore::new(&settings.snapshot_dir)
        .load(&mut stylesync::Diagnostics::new())
        .unwrap()
        .unwrap();
    assert_eq!(stored.styles.colors.len(), 2);
    assert!(stored.styles.colors[0].is_deprecated());
}

#[test]
fn test_deprecated_style_dropped_once_unused() {
    let temp = TempDir::new().unwrap();
    let settings = settings(temp.path());
    create_file(temp.path(), "App.swift", "view.backgroundColor = .blue\n");

    export_styles(&settings, vec![red(), color("Blue", "C2", (0, 0, 255))], vec![]).unwrap();
    let kept = export_styles(&settings, vec![red()], vec![]).unwrap();
    assert_eq!(kept.version, Version::new(2, 0));

    // Still referenced: nothing changes.
    let rerun = export_styles(&settings, vec![red()], vec![]).unwrap();
    assert_eq!(rerun.version, Version::new(2, 0));
    assert_eq!(names(&rerun.summary.deprecated), vec!["Blue"]);

    create_file(temp.path(), "App.swift", "view.backgroundColor = .red\n");
    let dropped = export_styles(&settings, vec![red()], vec![]).unwrap();
    assert_eq!(dropped.version, Version::new(3, 0));
    assert_eq!(names(&dropped.summary.removed), vec!["Blue"]);
    assert!(!read(temp.path(), "Colors.swift").contains("blue"));
}

#[test]
fn test_restored_style_is_an_update() {
    let temp = TempDir::new().unwrap();
    let settings = settings(temp.path());
    create_file(temp.path(), "App.swift", "view.backgroundColor = .blue\n");
    let blue = color("Blue", "C2", (0, 0, 255));

    export_styles(&settings, vec![red(), blue.clone()], vec![]).unwrap();
    export_styles(&settings, vec![red()], vec![]).unwrap();
    let restored = export_styles(&settings, vec![red(), blue], vec![]).unwrap();

    assert_eq!(restored.version, Version::new(2, 1));
    assert_eq!(restored.summary.updated[0].detail.as_deref(), Some("restored"));
    assert!(!read(temp.path(), "Colors.swift").contains("deprecated"));
}

#[test]
fn test_new_style_taking_deprecated_name_wins() {
    let temp = TempDir::new().unwrap();
    let settings = settings(temp.path());
    create_file(temp.path(), "App.swift", "view.backgroundColor = .blue\n");

    export_styles(&settings, vec![red(), color("Blue", "C2", (0, 0, 255))], vec![]).unwrap();
    let report = export_styles(
        &settings,
        vec![red(), color("Blue", "C9", (0, 0, 200))],
        vec![],
    )
    .unwrap();

    assert_eq!(names(&report.summary.removed), vec!["Blue"]);
    assert_eq!(names(&report.summary.added), vec!["Blue"]);
    assert_eq!(
        report
            .diagnostics
            .of_kind(DiagnosticKind::NamingCollision)
            .count(),
        1
    );
    assert_eq!(read(temp.path(), "Colors.swift").matches("static let blue").count(), 1);
}

#[test]
fn test_rename_target_taking_deprecated_name_wins() {
    let temp = TempDir::new().unwrap();
    let settings = settings(temp.path());
    create_file(temp.path(), "App.swift", "view.backgroundColor = .blue\n");

    export_styles(&settings, vec![red(), color("Blue", "C2", (0, 0, 255))], vec![]).unwrap();
    let report = export_styles(&settings, vec![color("Blue", "C1", (255, 0, 0))], vec![]).unwrap();

    assert_eq!(report.version, Version::new(2, 0));
    assert_eq!(report.migrations, vec![Migration::new("red", "blue")]);
    assert_eq!(names(&report.summary.removed), vec!["Blue"]);
    assert!(report.summary.deprecated.is_empty());
    assert_eq!(
        report
            .diagnostics
            .of_kind(DiagnosticKind::NamingCollision)
            .count(),
        1
    );
    assert_eq!(
        read(temp.path(), "Colors.swift"),
        "// Style set 2.0\nstatic let blue = Color(hex: \"#FF0000\")\n"
    );
}

// =============================================================================
// Configured runs
// =============================================================================

const STYLES_JSON: &str = r#"{
    "colors": [
        { "name": "Brand Red", "identifier": "C1", "red": 255, "green": 0, "blue": 0 }
    ],
    "textStyles": [
        {
            "name": "Title", "identifier": "T1", "fontName": "Inter-Bold",
            "pointSize": 32, "kerning": 0, "lineHeight": 40,
            "color": { "red": 255, "green": 0, "blue": 0 }
        }
    ]
}"#;

#[test]
fn test_configured_export_from_json() {
    let temp = TempDir::new().unwrap();
    create_file(temp.path(), "design/styles.json", STYLES_JSON);
    create_file(temp.path(), "templates/Palette.kt-template.txt", "<color compact>\nval {{ variableName }} = 0x{{ hex }}\n</color>\n");
    create_file(temp.path(), "templates/Type.kt-template.txt", TEXT_TEMPLATE);
    create_file(
        temp.path(),
        "stylesync.yaml",
        "latest_styles: design/styles.json\noutput_dir: generated\n",
    );

    let config = Config::discover(temp.path()).unwrap().unwrap().merge(Config {
        project_root: Some(temp.path().to_path_buf()),
        ..Config::default()
    });
    let settings = config.export_settings(false).unwrap();
    let source = JsonStyleSource::new(config.latest_styles());

    let report: ExportReport = StyleExporter::new(&settings, &source).run().unwrap();

    assert_eq!(report.version, Version::INITIAL);
    assert_eq!(
        read(temp.path(), "generated/Palette.kt"),
        "val brandRed = 0x#FF0000\n"
    );
    assert!(read(temp.path(), "generated/Type.kt").contains("static let title"));
    assert!(temp.path().join(".stylesync/text-styles.json").is_file());
}
