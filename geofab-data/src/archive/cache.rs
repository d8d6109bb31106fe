use camino::{Utf8Path, Utf8PathBuf};
use geofab_core::Diagnostics;
use geofab_fs::file_is_file;

use super::source::ArchiveSource;
use super::{ArchiveError, ArchiveUrl, FetchProgress, fetch_archive};

/// Directory beneath the data root that holds cached archives.
pub const ARCHIVE_SUBDIRECTORY: &str = "pbf";

/// Local cache of downloaded OSM archives rooted at a data directory.
///
/// Archives live at `<data_dir>/pbf/<file name>`, where the file name is the
/// final segment of the download URL. A file already present at that path is
/// reused without contacting the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveCache {
    data_dir: Utf8PathBuf,
    progress: FetchProgress,
}

impl ArchiveCache {
    /// Create a cache rooted at `data_dir`.
    pub fn new(data_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            progress: FetchProgress::default(),
        }
    }

    /// Choose how downloads report progress.
    #[must_use]
    pub const fn with_progress(mut self, progress: FetchProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Root data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Utf8Path {
        &self.data_dir
    }

    /// Directory holding cached archives.
    #[must_use]
    pub fn archive_dir(&self) -> Utf8PathBuf {
        self.data_dir.join(ARCHIVE_SUBDIRECTORY)
    }

    /// Cache path for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidUrl`] when no file name can be derived.
    pub fn archive_path(&self, url: &ArchiveUrl) -> Result<Utf8PathBuf, ArchiveError> {
        Ok(self.archive_dir().join(url.file_name()?.as_ref()))
    }

    /// Return a local path for `url`, downloading it first when absent.
    ///
    /// `update` is recorded in diagnostics but does not force a fresh
    /// download; remove the cached file to refresh it.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::NotDownloaded`] when the server refuses the
    /// request, [`ArchiveError::PathMismatch`] when the stored file is not at
    /// the cache path, and propagates failures from [`fetch_archive`].
    pub async fn ensure_local<S: ArchiveSource + ?Sized>(
        &self,
        source: &S,
        url: &ArchiveUrl,
        update: bool,
        diagnostics: &dyn Diagnostics,
    ) -> Result<Utf8PathBuf, ArchiveError> {
        let file_name = url.file_name()?;
        let expected = self.archive_dir().join(file_name.as_ref());

        let cached = file_is_file(&expected).map_err(|source| ArchiveError::InspectCache {
            path: expected.clone(),
            source,
        })?;
        if cached {
            diagnostics.debug(&format!("{file_name} exists in {}", self.archive_dir()));
            if update {
                diagnostics.debug(&format!(
                    "update requested; reusing cached {file_name}"
                ));
            }
            return Ok(expected);
        }

        let stored = fetch_archive(
            source,
            url,
            &self.archive_dir(),
            self.progress,
            diagnostics,
        )
        .await?;
        match stored {
            None => Err(ArchiveError::NotDownloaded {
                url: url.to_string(),
                file_name: file_name.to_string(),
            }),
            Some(actual) if actual != expected => {
                Err(ArchiveError::PathMismatch { expected, actual })
            }
            Some(actual) => Ok(actual),
        }
    }
}
