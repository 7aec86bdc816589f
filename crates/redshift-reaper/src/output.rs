use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use comfy_table::Table;
use redshift_reaper_core::{NukeReport, Outcome};
use serde::Serialize;

/// Print any serializable value as JSON or YAML
///
/// Table output has no generic rendering; callers that support it print
/// their own table and only delegate the structured formats here.
pub fn print_output<T: Serialize>(data: T, format: OutputFormat) -> Result<()> {
    let value = serde_json::to_value(data)?;
    match format {
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&value)?),
        OutputFormat::Json | OutputFormat::Table => {
            println!("{}", serde_json::to_string_pretty(&value)?)
        }
    }
    Ok(())
}

/// Render a nuke report in the requested format
pub fn print_report(report: &NukeReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Yaml => print_output(report, format),
        OutputFormat::Table => {
            println!("{}", report_table(report));
            println!();
            println!("{}", summary_table(report));
            Ok(())
        }
    }
}

fn report_table(report: &NukeReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["KIND", "IDENTIFIER", "STATUS", "DETAIL"]);

    for kind in &report.kinds {
        for item in &kind.items {
            let (status, detail) = match &item.outcome {
                Outcome::Deleted => ("deleted".green().to_string(), String::new()),
                Outcome::Skipped => ("skipped".yellow().to_string(), "dry run".to_string()),
                Outcome::Failed { error } => ("failed".red().to_string(), error.clone()),
            };
            table.add_row(vec![
                kind.kind.to_string(),
                item.identifier.clone(),
                status,
                detail,
            ]);
        }
        if let Some(error) = &kind.listing_error {
            table.add_row(vec![
                kind.kind.to_string(),
                "-".to_string(),
                "listing failed".red().to_string(),
                error.clone(),
            ]);
        }
    }

    table
}

fn summary_table(report: &NukeReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["KIND", "DELETED", "FAILED", "SKIPPED"]);
    for kind in &report.kinds {
        table.add_row(vec![
            kind.kind.to_string(),
            kind.deleted().to_string(),
            kind.failed().to_string(),
            kind.skipped().to_string(),
        ]);
    }
    table.add_row(vec![
        "total".bold().to_string(),
        report.deleted_count().to_string(),
        report.failed_count().to_string(),
        report.skipped_count().to_string(),
    ]);
    table
}
