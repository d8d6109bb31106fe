//! Extract command implementation for the geofab CLI.

use std::{
    io::{self, BufWriter, Write},
    time::Duration,
};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use geofab_core::{Diagnostics, EnrichedWay, enrich_ways};
use geofab_data::{
    ArchiveCache, ArchiveSource, ArchiveUrl, FetchProgress, HttpArchiveSourceConfig, WayFilter,
    read_osm_tables,
};
use geofab_fs::{ensure_dir, ensure_parent_dir, file_is_file, open_dir_and_file};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATA_DIR, ARG_INSECURE, ARG_OUTPUT, ARG_TAG_KEY, ARG_TAG_VALUE, ARG_TIMEOUT_SECS,
    ARG_UPDATE, ARG_URL, CliError, DEFAULT_DATA_DIR, ENV_OUTPUT, ENV_URL,
};

/// CLI arguments for the `extract` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Ensure a Geofabrik extract is cached beneath the data \
                 directory, read the ways matching an optional tag filter, \
                 and write them as JSON rows with a representative lon/lat \
                 and a Web Mercator area.",
    about = "Derive way geometry from a Geofabrik extract"
)]
#[ortho_config(prefix = "GEOFAB")]
pub(crate) struct ExtractArgs {
    /// Download URL of the `.osm.pbf` extract.
    #[arg(long = ARG_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) url: Option<String>,
    /// Root directory for cached archives (defaults to `earth_data`).
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// Request a refresh of the cached archive.
    #[arg(long = ARG_UPDATE, num_args = 0..=1, default_missing_value = "true")]
    #[serde(default)]
    pub(crate) update: Option<bool>,
    /// Skip TLS certificate verification when downloading.
    #[arg(long = ARG_INSECURE, num_args = 0..=1, default_missing_value = "true")]
    #[serde(default)]
    pub(crate) insecure: Option<bool>,
    /// Total download timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Keep only ways carrying this tag key.
    #[arg(long = ARG_TAG_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) tag_key: Option<String>,
    /// Restrict the tag key to these values (repeatable).
    #[arg(long = ARG_TAG_VALUE, value_name = "value")]
    #[serde(default)]
    pub(crate) tag_value: Option<Vec<String>>,
    /// Destination for the JSON rows.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl ExtractArgs {
    pub(crate) fn into_config(self) -> Result<ExtractConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ExtractConfig::try_from(merged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExtractConfig {
    pub(crate) url: ArchiveUrl,
    pub(crate) data_dir: Utf8PathBuf,
    pub(crate) update: bool,
    pub(crate) insecure: bool,
    pub(crate) timeout: Option<Duration>,
    pub(crate) filter: WayFilter,
    pub(crate) output: Utf8PathBuf,
    pub(crate) progress: FetchProgress,
}

impl ExtractConfig {
    pub(crate) fn source_config(&self) -> HttpArchiveSourceConfig {
        let config = HttpArchiveSourceConfig::default().with_accept_invalid_certs(self.insecure);
        match self.timeout {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }

    pub(crate) fn prepare_data_dir(&self) -> Result<(), CliError> {
        let prepare = |source| CliError::PrepareDataDir {
            path: self.data_dir.clone(),
            source,
        };
        if file_is_file(&self.data_dir).map_err(prepare)? {
            return Err(CliError::DataDirNotDirectory {
                path: self.data_dir.clone(),
            });
        }
        ensure_dir(&self.data_dir).map_err(prepare)
    }
}

impl TryFrom<ExtractArgs> for ExtractConfig {
    type Error = CliError;

    fn try_from(args: ExtractArgs) -> Result<Self, Self::Error> {
        let url = args.url.ok_or(CliError::MissingArgument {
            field: ARG_URL,
            env: ENV_URL,
        })?;
        let output = args.output.ok_or(CliError::MissingArgument {
            field: ARG_OUTPUT,
            env: ENV_OUTPUT,
        })?;
        let values = args.tag_value.unwrap_or_default();
        let filter = match args.tag_key {
            Some(key) => WayFilter::key_values(key, values),
            None if values.is_empty() => WayFilter::All,
            None => return Err(CliError::TagValueWithoutKey),
        };
        Ok(Self {
            url: ArchiveUrl::new(url),
            data_dir: args
                .data_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATA_DIR)),
            update: args.update.unwrap_or(false),
            insecure: args.insecure.unwrap_or(false),
            timeout: args.timeout_secs.map(Duration::from_secs),
            filter,
            output,
            progress: FetchProgress::Bar,
        })
    }
}

/// Outcome of a successful `extract` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    /// Local path of the cached archive.
    pub archive: Utf8PathBuf,
    /// File the JSON rows were written to.
    pub output: Utf8PathBuf,
    /// Number of rows written.
    pub ways: usize,
}

pub(crate) async fn execute<S: ArchiveSource + ?Sized>(
    config: &ExtractConfig,
    source: &S,
    diagnostics: &dyn Diagnostics,
) -> Result<ExtractReport, CliError> {
    config.prepare_data_dir()?;
    if config.insecure {
        diagnostics.warn("TLS certificate verification is disabled");
    }
    let cache = ArchiveCache::new(config.data_dir.clone()).with_progress(config.progress);
    let archive = cache
        .ensure_local(source, &config.url, config.update, diagnostics)
        .await?;
    let tables = read_osm_tables(&archive, &config.filter, diagnostics)?;
    let enriched = enrich_ways(tables.ways, &tables.nodes, diagnostics)?;
    let rows: Vec<EnrichedWay<'_>> = enriched.rows().collect();
    write_rows(&config.output, &rows)?;
    diagnostics.info(&format!("wrote {} ways to {}", rows.len(), config.output));
    Ok(ExtractReport {
        archive,
        output: config.output.clone(),
        ways: rows.len(),
    })
}

fn write_rows(path: &Utf8Path, rows: &[EnrichedWay<'_>]) -> Result<(), CliError> {
    let write_error = |source: io::Error| CliError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };
    ensure_parent_dir(path).map_err(write_error)?;
    let (dir, name) = open_dir_and_file(path).map_err(write_error)?;
    let file = dir.create(&name).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, rows).map_err(CliError::SerializeOutput)?;
    writer.write_all(b"\n").map_err(write_error)?;
    writer.flush().map_err(write_error)
}
