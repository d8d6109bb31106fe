//! Error types emitted by the geofab CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use geofab_core::EnrichError;
use geofab_data::{ArchiveError, OsmReadError, TransportError};
use thiserror::Error;

/// Errors emitted by the geofab CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// Tag values were supplied without a tag key.
    #[error("--tag-value requires --tag-key")]
    TagValueWithoutKey,
    /// The data directory path names an existing file.
    #[error("data directory {path} exists but is not a directory")]
    DataDirNotDirectory {
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// The data directory could not be inspected or created.
    #[error("failed to prepare data directory {path}: {source}")]
    PrepareDataDir {
        /// Data directory.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Constructing the HTTP archive source failed.
    #[error("failed to build archive source: {0}")]
    BuildSource(#[source] TransportError),
    /// Resolving the local archive failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    /// Decoding the archive failed.
    #[error(transparent)]
    Read(#[from] OsmReadError),
    /// Deriving geometry for the ways failed.
    #[error("failed to enrich ways: {0}")]
    Enrich(#[from] EnrichError),
    /// Serialising the enriched rows failed.
    #[error("failed to serialise enriched ways: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the output file failed.
    #[error("failed to write output to {path}: {source}")]
    WriteOutput {
        /// Output file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
