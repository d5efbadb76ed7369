use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use stylesync::{
    Config, Diagnostics, ExportReport, JsonStyleSource, SnapshotStore, StyleExporter,
    SummaryFormat,
};
use stylesync_publish::{GitPublisher, Publisher};
use stylesync_template::CodeTemplate;
use tracing_subscriber::EnvFilter;

use crate::output;

#[derive(Debug, Parser)]
#[command(name = "stylesync", version, about = "Sync shared design styles into code")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    /// Increase logging verbosity
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Cli {
    pub fn execute(self) -> Result<ExitCode> {
        setup_logging(self.verbose);
        self.command.execute()
    }
}

/// `RUST_LOG` applies unless `-v` is given; without either, logging is off
/// and only the styled report reaches the terminal.
fn setup_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    // A subscriber may already be installed when running in-process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export the latest styles: rewrite references, generate code, store the snapshot
    Export(ExportArgs),
    /// Print the version of the stored snapshot
    Version(ProjectArgs),
    /// Parse a template and list its declarations
    CheckTemplate(CheckTemplateArgs),
}

impl Command {
    pub fn execute(self) -> Result<ExitCode> {
        match self {
            Command::Export(args) => args.execute(),
            Command::Version(args) => args.print_version(),
            Command::CheckTemplate(args) => args.execute(),
        }
    }
}

/// Where to find the project and its configuration.
#[derive(Debug, Clone, Default, Args)]
pub struct ProjectArgs {
    /// Config file (default: stylesync.yaml in the project root)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Project root to rewrite and generate into
    #[arg(long)]
    pub project_root: Option<PathBuf>,
}

impl ProjectArgs {
    fn load_config(&self, overrides: Config) -> Result<Config> {
        let file = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => {
                let dir = self
                    .project_root
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("."));
                Config::discover(&dir)
                    .context("failed to load configuration")?
                    .unwrap_or_default()
            }
        };
        Ok(file.merge(Config {
            project_root: self.project_root.clone(),
            ..overrides
        }))
    }

    fn print_version(&self) -> Result<ExitCode> {
        let config = self.load_config(Config::default())?;
        let store = SnapshotStore::new(config.snapshot_dir());
        let mut diagnostics = Diagnostics::new();
        let snapshot = store
            .load(&mut diagnostics)
            .context("failed to read the stored snapshot")?;
        output::print_diagnostics(&diagnostics);

        match snapshot {
            Some(snapshot) => {
                println!("{}", snapshot.version);
                Ok(ExitCode::SUCCESS)
            }
            None => {
                output::print_notice(&format!(
                    "no snapshot in {}, nothing exported yet",
                    store.dir().display()
                ));
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
    /// JSON export of the design's styles
    #[arg(long)]
    pub styles: Option<PathBuf>,
    /// Report what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,
    /// Commit the exported files with git
    #[arg(long)]
    pub commit: bool,
    /// Print the summary as markdown
    #[arg(long)]
    pub markdown: bool,
}

impl ExportArgs {
    pub fn execute(self) -> Result<ExitCode> {
        let (config, report) = self.run()?;

        let format = if self.markdown {
            SummaryFormat::Markdown
        } else {
            SummaryFormat::Log
        };
        output::print_report(&report, format);
        output::print_diagnostics(&report.diagnostics);

        if report.dry_run {
            return Ok(ExitCode::SUCCESS);
        }

        let mut files = report.files_to_commit();
        if let Some(summary_file) = &config.summary_file {
            write_summary(summary_file, &report)?;
            files.push(summary_file.clone());
        }

        if config.commit() {
            GitPublisher::new(config.project_root())
                .publish(&files, &report.version.to_string())
                .context("failed to commit exported files")?;
            output::print_notice(&format!("committed styles {}", report.version));
        }
        Ok(ExitCode::SUCCESS)
    }

    /// Loads configuration and runs the export.
    pub fn run(&self) -> Result<(Config, ExportReport)> {
        let config = self.project.load_config(Config {
            latest_styles: self.styles.clone(),
            commit: self.commit.then_some(true),
            ..Config::default()
        })?;
        let settings = config
            .export_settings(self.dry_run)
            .context("invalid configuration")?;
        let source = JsonStyleSource::new(config.latest_styles());

        let report = StyleExporter::new(&settings, &source).run()?;
        Ok((config, report))
    }
}

fn write_summary(path: &Path, report: &ExportReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, &report.summary_markdown)
        .with_context(|| format!("failed to write summary to {}", path.display()))
}

#[derive(Debug, Clone, Args)]
pub struct CheckTemplateArgs {
    /// Template file to check
    pub path: PathBuf,
}

impl CheckTemplateArgs {
    pub fn execute(self) -> Result<ExitCode> {
        let template = CodeTemplate::load(&self.path)
            .with_context(|| format!("invalid template {}", self.path.display()))?;
        println!("{}", output::describe_template(&template));
        Ok(ExitCode::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_file(dir: &Path, relative_path: &str, content: &str) {
        let full_path = dir.join(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        create_file(
            temp.path(),
            "styles.json",
            r#"{ "colors": [{ "name": "Sky", "identifier": "C1", "red": 0, "green": 128, "blue": 255 }] }"#,
        );
        create_file(
            temp.path(),
            "templates/Colors.swift-template.txt",
            "<color>\nlet {{ variableName }} = \"{{ hex }}\"\n</color>\n",
        );
        create_file(
            temp.path(),
            "templates/Fonts.swift-template.txt",
            "<textStyle>\nlet {{ variableName }} = {{ pointSize }}\n</textStyle>\n",
        );
        temp
    }

    #[test]
    fn test_parse_export_flags() {
        let cli = Cli::try_parse_from([
            "stylesync",
            "export",
            "--project-root",
            "app",
            "--dry-run",
            "--markdown",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Export(args) => {
                assert_eq!(args.project.project_root, Some(PathBuf::from("app")));
                assert!(args.dry_run);
                assert!(args.markdown);
                assert!(!args.commit);
            }
            other => panic!("expected export, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_check_template() {
        let cli = Cli::try_parse_from(["stylesync", "check-template", "Colors.swift-template.txt"])
            .unwrap();
        assert!(matches!(cli.command, Command::CheckTemplate(_)));
    }

    #[test]
    fn test_check_template_requires_path() {
        assert!(Cli::try_parse_from(["stylesync", "check-template"]).is_err());
    }

    #[test]
    fn test_export_run() {
        let temp = project();
        let args = ExportArgs {
            project: ProjectArgs {
                project_root: Some(temp.path().to_path_buf()),
                ..ProjectArgs::default()
            },
            ..ExportArgs::default()
        };

        let (config, report) = args.run().unwrap();
        assert!(!config.commit());
        assert_eq!(report.version.to_string(), "1.0");
        assert_eq!(
            fs::read_to_string(temp.path().join("Colors.swift")).unwrap(),
            "let sky = \"#0080FF\"\n"
        );
    }

    #[test]
    fn test_export_writes_summary_file() {
        let temp = project();
        create_file(temp.path(), "stylesync.yaml", "summary_file: docs/STYLES.md\n");
        let args = ExportArgs {
            project: ProjectArgs {
                project_root: Some(temp.path().to_path_buf()),
                ..ProjectArgs::default()
            },
            ..ExportArgs::default()
        };

        assert_eq!(args.execute().unwrap(), ExitCode::SUCCESS);
        let summary = fs::read_to_string(temp.path().join("docs/STYLES.md")).unwrap();
        assert!(summary.contains("`Sky`"));
    }

    #[test]
    fn test_styles_flag_overrides_config() {
        let temp = project();
        create_file(temp.path(), "stylesync.yaml", "latest_styles: missing.json\n");
        let args = ExportArgs {
            project: ProjectArgs {
                project_root: Some(temp.path().to_path_buf()),
                ..ProjectArgs::default()
            },
            styles: Some(temp.path().join("styles.json")),
            ..ExportArgs::default()
        };

        assert!(args.run().is_ok());
    }

    #[test]
    fn test_missing_styles_fails() {
        let temp = project();
        fs::remove_file(temp.path().join("styles.json")).unwrap();
        let args = ExportArgs {
            project: ProjectArgs {
                project_root: Some(temp.path().to_path_buf()),
                ..ProjectArgs::default()
            },
            ..ExportArgs::default()
        };

        let err = args.run().unwrap_err();
        assert!(err.to_string().contains("extracting styles"));
    }
}
