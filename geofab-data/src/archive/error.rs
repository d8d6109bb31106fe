//! Error types produced while fetching or caching an archive.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors produced while resolving a local copy of an OSM archive.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArchiveError {
    /// The URL has no final path segment to use as a file name.
    #[error("archive URL {url} has no file name: {reason}")]
    InvalidUrl {
        /// URL as supplied by the caller.
        url: String,
        /// Why no file name could be derived.
        reason: String,
    },
    /// Preparing the archive directory failed.
    #[error("failed to create archive directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Checking the cache for an existing archive failed.
    #[error("failed to inspect cached archive {path}: {source}")]
    InspectCache {
        /// Path that was probed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Creating or flushing the destination file failed.
    #[error("failed to write archive to {path}: {source}")]
    WriteArchive {
        /// Destination file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Copying the response body to disk failed part-way.
    #[error("failed to stream {url} into {path}: {source}")]
    Stream {
        /// Archive URL.
        url: String,
        /// Destination file, removed after the failure.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The request could not be issued.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The server answered with a non-success status.
    #[error("{file_name} was not downloaded from {url}")]
    NotDownloaded {
        /// Archive URL.
        url: String,
        /// File name the archive would have been stored under.
        file_name: String,
    },
    /// The fetch stored the archive somewhere other than the cache path.
    #[error("archive stored at {actual} but expected {expected}")]
    PathMismatch {
        /// Path derived from the cache layout.
        expected: Utf8PathBuf,
        /// Path reported by the fetch.
        actual: Utf8PathBuf,
    },
}

/// Transport-level errors encountered while issuing HTTP requests.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// Error reported by `reqwest`.
        source: reqwest::Error,
    },
    /// The request failed before a status line arrived.
    #[error("network error contacting {url}: {source}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// I/O error reported by the transport.
        source: io::Error,
    },
}
