use clap::Args;
use osm_cleaner::config::AppConfig;
use osm_cleaner::error::AppError;
use osm_cleaner::osm::OsmScanner;
use osm_cleaner::workflows::audit::{
    audit_phone_numbers, audit_street_names, PhoneAuditReport, StreetAuditReport,
};
use osm_cleaner::workflows::export::{export_map, ExportOptions, ExportSummary};
use osm_cleaner::workflows::phones::PhoneOutcome;
use osm_cleaner::workflows::streets::{AuditResult, ReferenceList};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct StreetAuditArgs {
    /// OSM XML export to scan (overrides OSM_FILE)
    #[arg(long)]
    pub(crate) osm: Option<PathBuf>,
    /// Official street name table, XML or CSV (overrides STREET_NAME_FILE)
    #[arg(long)]
    pub(crate) reference: Option<PathBuf>,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PhoneAuditArgs {
    /// OSM XML export to scan (overrides OSM_FILE)
    #[arg(long)]
    pub(crate) osm: Option<PathBuf>,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// OSM XML export to clean (overrides OSM_FILE)
    #[arg(long)]
    pub(crate) osm: Option<PathBuf>,
    /// Official street name table, XML or CSV (overrides STREET_NAME_FILE)
    #[arg(long)]
    pub(crate) reference: Option<PathBuf>,
    /// Directory for the CSV files (overrides OUTPUT_DIR)
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    /// Abort on the first element with invalid attributes
    #[arg(long)]
    pub(crate) validate: bool,
}

pub(crate) fn run_street_audit(args: StreetAuditArgs, config: AppConfig) -> Result<(), AppError> {
    let StreetAuditArgs {
        osm,
        reference,
        json,
    } = args;

    let reference = ReferenceList::from_path(
        reference.unwrap_or(config.inputs.street_name_file),
        &config.reference,
    )?;
    let scanner = OsmScanner::open(osm.unwrap_or(config.inputs.osm_file))?;
    let report = audit_street_names(scanner, &reference)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_street_report(&report);
    }
    Ok(())
}

pub(crate) fn run_phone_audit(args: PhoneAuditArgs, config: AppConfig) -> Result<(), AppError> {
    let PhoneAuditArgs { osm, json } = args;

    let scanner = OsmScanner::open(osm.unwrap_or(config.inputs.osm_file))?;
    let report = audit_phone_numbers(scanner)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_phone_report(&report);
    }
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs, config: AppConfig) -> Result<(), AppError> {
    let ExportArgs {
        osm,
        reference,
        output_dir,
        validate,
    } = args;

    let reference = ReferenceList::from_path(
        reference.unwrap_or(config.inputs.street_name_file),
        &config.reference,
    )?;
    let scanner = OsmScanner::open(osm.unwrap_or(config.inputs.osm_file))?;
    let options = ExportOptions {
        output_dir: output_dir.unwrap_or(config.output.directory),
        validate,
    };

    let summary = export_map(scanner, &reference, &options)?;
    render_export_summary(&summary, &options);
    Ok(())
}

fn render_street_report(report: &StreetAuditReport) {
    println!(
        "Street name audit: {} street ways scanned, {} flagged",
        report.streets_scanned,
        report.flagged.len()
    );

    for result in &report.flagged {
        render_audit_result(result);
    }

    println!("\nTally by status");
    for entry in &report.tally {
        println!("- {}: {}", entry.status_label, entry.count);
    }
}

fn render_audit_result(result: &AuditResult) {
    let tags = result
        .values
        .iter()
        .map(|(tag, value)| format!("{}=\"{}\"", tag.key(), value))
        .collect::<Vec<_>>()
        .join(" ");
    println!(
        "- {} {} [{}] {}",
        result.kind.label(),
        result.element_id,
        result.status.label(),
        tags
    );

    if !result.missing_tags.is_empty() {
        let missing = result
            .missing_tags
            .iter()
            .map(|tag| tag.key())
            .collect::<Vec<_>>()
            .join(", ");
        println!("    missing: {missing}");
    }
    if let Some(entry) = &result.reference {
        println!("    official: {} {}", entry.chinese, entry.english);
    }
    for discrepancy in &result.discrepancies {
        println!(
            "    {}: observed \"{}\", expected \"{}\"",
            discrepancy.tag.key(),
            discrepancy.observed,
            discrepancy.expected
        );
    }
}

fn render_phone_report(report: &PhoneAuditReport) {
    println!("Possible phone numbers");
    for entry in &report.entries {
        let outcome = match &entry.normalization.outcome {
            PhoneOutcome::Normalized { value, .. } => value.as_str(),
            PhoneOutcome::Flagged => "flagged for review",
        };
        println!(
            "- {} {} {}: \"{}\" -> {}",
            entry.kind.label(),
            entry.element_id,
            entry.key,
            entry.normalization.original,
            outcome
        );
    }

    println!("\nCounts of keys");
    for entry in &report.key_counts {
        println!("- {}: {}", entry.key, entry.count);
    }

    let characters: String = report.characters.iter().collect();
    println!("\nCharacters present in values");
    println!("{characters:?}");
    println!(
        "\n{} values, {} flagged",
        report.entries.len(),
        report.flagged().count()
    );
}

fn render_export_summary(summary: &ExportSummary, options: &ExportOptions) {
    println!("Export written to {}", options.output_dir.display());
    println!("- {} nodes, {} ways", summary.nodes, summary.ways);
    println!(
        "- {} tags written, {} skipped for problem characters",
        summary.tags_written, summary.tags_skipped
    );
    println!(
        "- {} phone updates, {} street name updates",
        summary.phones_updated, summary.names_updated
    );
    println!("- {} cleaned records", summary.cleaned_records);
}
