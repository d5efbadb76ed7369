//! Terminal output.

use console::style;
use stylesync::{Diagnostics, ExportReport, Severity, SummaryFormat};
use stylesync_template::CodeTemplate;

pub fn print_report(report: &ExportReport, format: SummaryFormat) {
    let summary = match format {
        SummaryFormat::Log => &report.summary_log,
        SummaryFormat::Markdown => &report.summary_markdown,
    };
    print!("{}", summary);

    if report.dry_run {
        print_notice("dry run, nothing was written");
    }
    for path in &report.mutated_files {
        eprintln!("{} {}", style("rewrote").green(), path.display());
    }
}

/// Prints warnings and errors after the summary, one per line.
pub fn print_diagnostics(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics.records() {
        let label = match diagnostic.severity {
            Severity::Warning => style("warning:").yellow().bold(),
            Severity::Error => style("error:").red().bold(),
        };
        eprintln!("{} {}", label, diagnostic);
    }
}

pub fn print_notice(message: &str) {
    eprintln!("{} {}", style("note:").cyan().bold(), message);
}

pub fn describe_template(template: &CodeTemplate) -> String {
    let file_name = template.file_name();
    format!(
        "declarations: {}\noutput name: {}\noutput extension: {}",
        template.declaration_names().join(", "),
        file_name.base_name_or("(default)"),
        file_name.extension_or("(default)"),
    )
}
