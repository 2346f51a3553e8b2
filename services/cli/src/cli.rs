use crate::commands::{
    run_export, run_phone_audit, run_street_audit, ExportArgs, PhoneAuditArgs, StreetAuditArgs,
};
use clap::{Parser, Subcommand};
use osm_cleaner::config::AppConfig;
use osm_cleaner::error::AppError;
use osm_cleaner::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "osm-cleaner",
    about = "Audit and clean the Hong Kong OpenStreetMap export",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List street ways whose bilingual name tags disagree with the official table
    AuditStreets(StreetAuditArgs),
    /// List phone-like tag values and how each would be normalized
    AuditPhones(PhoneAuditArgs),
    /// Clean the export and write CSV tables for a database import
    Export(ExportArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(command = ?cli.command, "dispatching command");

    match cli.command {
        Command::AuditStreets(args) => run_street_audit(args, config),
        Command::AuditPhones(args) => run_phone_audit(args, config),
        Command::Export(args) => run_export(args, config),
    }
}
