//! Command-line interface for fetching Geofabrik extracts and deriving way
//! geometry.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use geofab_core::LogDiagnostics;
use geofab_data::HttpArchiveSource;

mod error;
mod extract;

pub use error::CliError;
pub use extract::ExtractReport;

use extract::{ExtractArgs, ExtractConfig, execute};

pub(crate) const ARG_URL: &str = "url";
pub(crate) const ARG_DATA_DIR: &str = "data-dir";
pub(crate) const ARG_UPDATE: &str = "update";
pub(crate) const ARG_INSECURE: &str = "insecure";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_TAG_KEY: &str = "tag-key";
pub(crate) const ARG_TAG_VALUE: &str = "tag-value";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ENV_URL: &str = "GEOFAB_CMDS_EXTRACT_URL";
pub(crate) const ENV_OUTPUT: &str = "GEOFAB_CMDS_EXTRACT_OUTPUT";
pub(crate) const DEFAULT_DATA_DIR: &str = "earth_data";

/// Run the geofab CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] when argument parsing, configuration, download,
/// decoding, enrichment or output fails.
pub async fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Extract(args) => {
            let config = args.into_config()?;
            run_extract(&config).await?;
        }
    }
    Ok(())
}

async fn run_extract(config: &ExtractConfig) -> Result<ExtractReport, CliError> {
    let source =
        HttpArchiveSource::with_config(config.source_config()).map_err(CliError::BuildSource)?;
    execute(config, &source, &LogDiagnostics::default()).await
}

#[derive(Debug, Parser)]
#[command(
    name = "geofab",
    about = "Fetch Geofabrik OSM extracts and derive way geometry",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Download an extract if needed and write enriched ways as JSON.
    Extract(ExtractArgs),
}

#[cfg(test)]
mod tests;
