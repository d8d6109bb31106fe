//! In-memory archive source for tests and examples.
use std::{
    future::Future,
    io::{self, Cursor},
    pin::Pin,
    sync::atomic::{AtomicUsize, Ordering},
    task::{Context, Poll},
};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

use super::{ArchiveResponse, ArchiveSource, ArchiveUrl, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StubFailure {
    Connect,
    MidStream,
}

/// Stub [`ArchiveSource`] serving a fixed status and body.
///
/// Every call to [`ArchiveSource::request`] is counted so tests can assert
/// whether the cache reached the network.
#[derive(Debug)]
pub struct StubArchiveSource {
    status: u16,
    archive: Vec<u8>,
    advertise_length: bool,
    failure: Option<StubFailure>,
    requests: AtomicUsize,
}

impl StubArchiveSource {
    /// Answer every request with `status` and `archive`.
    #[must_use]
    pub const fn new(status: u16, archive: Vec<u8>) -> Self {
        Self {
            status,
            archive,
            advertise_length: true,
            failure: None,
            requests: AtomicUsize::new(0),
        }
    }

    /// Answer every request with `200` and `archive`.
    #[must_use]
    pub const fn ok(archive: Vec<u8>) -> Self {
        Self::new(200, archive)
    }

    /// Answer every request with `status` and an empty body.
    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self::new(status, Vec::new())
    }

    /// Fail before any status arrives.
    #[must_use]
    pub const fn unreachable() -> Self {
        let mut stub = Self::status(200);
        stub.failure = Some(StubFailure::Connect);
        stub
    }

    /// Send `200` and `archive`, then break the stream.
    #[must_use]
    pub const fn interrupted(archive: Vec<u8>) -> Self {
        let mut stub = Self::ok(archive);
        stub.failure = Some(StubFailure::MidStream);
        stub
    }

    /// Omit the content length from responses.
    #[must_use]
    pub const fn without_length(mut self) -> Self {
        self.advertise_length = false;
        self
    }

    /// Bytes served as the body.
    #[must_use]
    pub fn archive(&self) -> &[u8] {
        &self.archive
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait(?Send)]
impl ArchiveSource for StubArchiveSource {
    async fn request(&self, url: &ArchiveUrl) -> Result<ArchiveResponse, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let content_length = self
            .advertise_length
            .then(|| u64::try_from(self.archive.len()).ok())
            .flatten();
        let body = Cursor::new(self.archive.clone());
        let body: super::ArchiveBody = match self.failure {
            Some(StubFailure::Connect) => {
                return Err(TransportError::Network {
                    url: url.to_string(),
                    source: io::Error::new(io::ErrorKind::ConnectionRefused, "stub refused"),
                });
            }
            Some(StubFailure::MidStream) => Box::pin(body.chain(BrokenStream)),
            None => Box::pin(body),
        };
        Ok(ArchiveResponse {
            status: self.status,
            content_length,
            body,
        })
    }
}

#[derive(Debug)]
struct BrokenStream;

impl AsyncRead for BrokenStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "stub stream reset",
        )))
    }
}

/// Drive `future` to completion on a fresh current-thread runtime.
///
/// # Panics
///
/// Panics if the runtime cannot be created.
pub fn block_on_for_tests<F: Future>(future: F) -> F::Output {
    #[expect(clippy::expect_used, reason = "test helper has no error channel")]
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build test runtime");
    runtime.block_on(future)
}
