use camino::{Utf8Path, Utf8PathBuf};
use geofab_core::Diagnostics;
use geofab_fs::{ensure_dir, remove_file_if_exists};
use tokio::{fs::File, io::AsyncWriteExt};

use super::source::ArchiveSource;
use super::{ArchiveError, ArchiveUrl, FetchProgress};

const HTTP_OK: u16 = 200;

/// Download `url` into `destination`, named after the URL's final segment.
///
/// Returns `Ok(None)` when the server answers with anything other than
/// `200`; an error diagnostic is emitted and no file is created. A transfer
/// that fails part-way removes the partial file before returning the error.
///
/// # Errors
///
/// Fails when the URL has no file name, the directory or file cannot be
/// created, the request cannot be issued, or the body stream breaks.
///
/// # Examples
/// ```
/// # use camino::Utf8PathBuf;
/// # use geofab_core::NoopDiagnostics;
/// # use geofab_data::archive::{
/// #     ArchiveUrl, FetchProgress, StubArchiveSource, block_on_for_tests, fetch_archive,
/// # };
/// let temp = tempfile::tempdir().expect("create temp directory");
/// let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("UTF-8 temp dir");
/// let source = StubArchiveSource::ok(b"pbf".to_vec());
/// let url = ArchiveUrl::new("https://example.test/europe/monaco-latest.osm.pbf");
/// let stored = block_on_for_tests(fetch_archive(
///     &source,
///     &url,
///     &dir,
///     FetchProgress::Hidden,
///     &NoopDiagnostics,
/// ))?;
/// assert_eq!(stored, Some(dir.join("monaco-latest.osm.pbf")));
/// # Ok::<(), geofab_data::archive::ArchiveError>(())
/// ```
pub async fn fetch_archive<S: ArchiveSource + ?Sized>(
    source: &S,
    url: &ArchiveUrl,
    destination: &Utf8Path,
    progress: FetchProgress,
    diagnostics: &dyn Diagnostics,
) -> Result<Option<Utf8PathBuf>, ArchiveError> {
    let file_name = url.file_name()?;
    let path = destination.join(file_name.as_ref());
    diagnostics.info(&format!("{file_name} downloading to {path}"));

    ensure_dir(destination).map_err(|source| ArchiveError::CreateDir {
        path: destination.to_path_buf(),
        source,
    })?;

    let response = source.request(url).await?;
    if response.status != HTTP_OK {
        diagnostics.error(&format!(
            "Error code: {}. File {file_name} not downloaded from {url}",
            response.status
        ));
        return Ok(None);
    }

    let mut file = File::create(&path)
        .await
        .map_err(|source| ArchiveError::WriteArchive {
            path: path.clone(),
            source,
        })?;
    let indicator = progress.indicator(response.content_length, &file_name);
    let mut body = indicator.wrap_async_read(response.body);
    let copied = tokio::io::copy(&mut body, &mut file).await;
    let flushed = match copied {
        Ok(bytes) => file.flush().await.map(|()| bytes),
        Err(err) => Err(err),
    };
    drop(file);
    indicator.finish_and_clear();

    match flushed {
        Ok(bytes) => {
            diagnostics.debug(&format!("wrote {bytes} bytes to {path}"));
            Ok(Some(path))
        }
        Err(source) => {
            if let Err(cleanup) = remove_file_if_exists(&path) {
                diagnostics.warn(&format!("failed to remove partial archive {path}: {cleanup}"));
            }
            Err(ArchiveError::Stream {
                url: url.to_string(),
                path,
                source,
            })
        }
    }
}
