//! Table output for diagnostic reports

use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};

use super::runner::HealthCheckReport;

/// Formats a report as a table followed by a summary
pub fn format_report(report: &HealthCheckReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Check", "Status", "Duration", "Message"]);

    for (name, result) in &report.results {
        builder.push_record([
            name.clone(),
            result.status.as_colored_str(),
            format!("{:.2?}", result.duration),
            result.message.clone(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    format!("{table}\n{}", format_summary(report))
}

fn format_summary(report: &HealthCheckReport) -> String {
    let mut lines = vec![
        String::new(),
        "Summary".bold().underline().to_string(),
        format!("  Total checks: {}", report.total()),
        format!("  {} Passed: {}", "✓".green(), report.passed),
    ];
    if report.warned > 0 {
        lines.push(format!("  {} Warned: {}", "⚠".yellow(), report.warned));
    }
    if report.failed > 0 {
        lines.push(format!("  {} Failed: {}", "✗".red(), report.failed));
    }

    let overall = if !report.is_healthy() {
        "Overall: UNHEALTHY".red().bold()
    } else if report.has_warnings() {
        "Overall: HEALTHY (with warnings)".yellow().bold()
    } else {
        "Overall: HEALTHY".green().bold()
    };
    lines.push(String::new());
    lines.push(format!("  {overall}"));
    lines.join("\n") + "\n"
}

/// Prints a report and the details of every check that has any
pub fn print_report(report: &HealthCheckReport) {
    println!("{}", format_report(report));

    for (name, result) in &report.results {
        if result.details.is_empty() {
            continue;
        }
        println!("\n{} Details:", name.bold());
        for line in &result.details {
            println!("  {line}");
        }
    }
}
