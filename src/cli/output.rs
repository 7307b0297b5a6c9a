use colored::*;

use crate::cleaner::CleanupReport;
use crate::common::format::{self, format_count, format_result};
use crate::manifest::Section;

/// Print a cleanup report in human-readable format
pub fn print_report(report: &CleanupReport, output_file: &std::path::Path) {
    println!();
    println!("{}  Host Cleanup Results", "🧹");
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  Finished in {}  •  {} ok  •  {} failed",
        format::format_duration(report.duration_secs).cyan(),
        report.succeeded().to_string().green(),
        if report.failed() > 0 {
            report.failed().to_string().red().bold()
        } else {
            report.failed().to_string().normal()
        }
    );
    println!("{}", "─".repeat(60).dimmed());
    println!();

    if report.records.is_empty() {
        println!("  {} Nothing to clean up.", "✨");
        println!();
        return;
    }

    for section in Section::ALL {
        let records: Vec<_> = report.for_section(section).collect();
        if records.is_empty() {
            continue;
        }
        println!("  {} ({})", section.as_str().bold(), format_count(records.len()));
        for record in records {
            println!(
                "    {:<7} {}",
                format_result(&record.result),
                format::truncate(&record.target, 70)
            );
        }
        println!();
    }

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        println!("  {} {} failures:", "⚠".yellow(), failures.len());
        for (i, record) in failures.iter().enumerate().take(10) {
            let reason = match &record.result {
                crate::cleaner::RemovalResult::Failure { reason } => reason.as_str(),
                crate::cleaner::RemovalResult::Success => "",
            };
            println!(
                "    {} {} {}: {}",
                format!("{}.", i + 1).dimmed(),
                record.section.as_str().dimmed(),
                record.target,
                reason.dimmed()
            );
        }
        if failures.len() > 10 {
            println!(
                "    ... and {} more",
                (failures.len() - 10).to_string().dimmed()
            );
        }
        println!();
    }

    println!("  {} Full log: {}", "📄", output_file.display().to_string().cyan());
    println!();
}

/// Print the report as JSON
pub fn print_report_json(report: &CleanupReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing report: {}", e),
    }
}

/// Print a minimal summary: ok, failed
pub fn print_report_quiet(report: &CleanupReport) {
    println!("{}  {}", report.succeeded(), report.failed());
}
