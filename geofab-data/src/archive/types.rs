//! Newtypes for archive URLs and the file names derived from them.

use std::{fmt, ops::Deref};

use url::Url;

use super::ArchiveError;

/// URL of a Geofabrik extract.
///
/// # Examples
/// ```
/// # use geofab_data::archive::ArchiveUrl;
/// let url = ArchiveUrl::new("https://download.geofabrik.de/africa/nigeria-latest.osm.pbf");
/// assert_eq!(url.file_name()?.as_ref(), "nigeria-latest.osm.pbf");
/// # Ok::<(), geofab_data::archive::ArchiveError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveUrl(String);

impl ArchiveUrl {
    /// Construct a new [`ArchiveUrl`] from an owned or borrowed string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Consume the wrapper and return the inner [`String`].
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Final path segment of the URL, used as the local file name.
    ///
    /// Query strings and fragments are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidUrl`] when the URL does not parse or
    /// ends in a slash.
    pub fn file_name(&self) -> Result<ArchiveFileName, ArchiveError> {
        let invalid = |reason: String| ArchiveError::InvalidUrl {
            url: self.0.clone(),
            reason,
        };
        let parsed = Url::parse(&self.0).map_err(|err| invalid(err.to_string()))?;
        let segment = parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default();
        if segment.is_empty() {
            return Err(invalid("path has no final segment".to_owned()));
        }
        Ok(ArchiveFileName::new(segment))
    }
}

impl From<&str> for ArchiveUrl {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ArchiveUrl {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for ArchiveUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ArchiveUrl {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for ArchiveUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Local file name of a cached archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveFileName(String);

impl ArchiveFileName {
    /// Construct a new [`ArchiveFileName`].
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl AsRef<str> for ArchiveFileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ArchiveFileName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for ArchiveFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
