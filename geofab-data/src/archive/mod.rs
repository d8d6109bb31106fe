//! Fetching and caching Geofabrik OSM extracts.
//!
//! An [`ArchiveCache`] maps a download URL to `<data_dir>/pbf/<file name>`
//! and only contacts the [`ArchiveSource`] when that file is absent.
#![forbid(unsafe_code)]

mod cache;
mod error;
mod fetch;
mod progress;
mod source;
pub mod test_support;
mod types;
mod util;

pub use cache::{ARCHIVE_SUBDIRECTORY, ArchiveCache};
pub use error::{ArchiveError, TransportError};
pub use fetch::fetch_archive;
pub use progress::FetchProgress;
pub use source::{
    ArchiveBody, ArchiveResponse, ArchiveSource, DEFAULT_USER_AGENT, HttpArchiveSource,
    HttpArchiveSourceConfig,
};
pub use test_support::{StubArchiveSource, block_on_for_tests};
pub use types::{ArchiveFileName, ArchiveUrl};
