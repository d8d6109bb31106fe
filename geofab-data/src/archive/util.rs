//! Shared helpers for archive sources.

use std::io;

use futures_util::TryStreamExt;
use tokio_util::io::StreamReader;

use super::ArchiveBody;

/// Convert an HTTP response into an asynchronous byte reader.
pub(crate) fn to_async_reader(response: reqwest::Response) -> ArchiveBody {
    let stream = response.bytes_stream().map_err(io::Error::other);
    Box::pin(StreamReader::new(stream))
}
