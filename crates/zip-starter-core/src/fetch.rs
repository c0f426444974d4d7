//! Optional retrieval of the remote document referenced by a payload's `"url"`.
//!
//! The fetched body is streamed straight into the archive as `<name>.html`.
//! Only `http` and `https` URLs are retrieved; anything else is skipped
//! without error.

use std::io::{self, Read, Seek, Write};
use std::time::Duration;

use url::Url;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{BoxError, StarterError};
use crate::name::ArchiveName;
use crate::payload::{string_field, Payload};

/// Payload key holding the remote document URL.
const URL_KEY: &str = "url";

/// Source of remote documents.
///
/// The returned reader is consumed by the archive and dropped once the copy
/// finishes or fails.
pub trait Fetcher: Send + Sync {
    /// Issues a GET for `url`. Fails only if no response could be obtained.
    fn get(&self, url: &Url) -> Result<Box<dyn Read + Send>, BoxError>;
}

/// Limits applied by [`HttpFetcher`]. Both are off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchConfig {
    /// Overall request timeout.
    pub timeout: Option<Duration>,
    /// Largest response body that will be embedded.
    pub max_body_bytes: Option<u64>,
}

/// What happened to the `"url"` field of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No string URL, a relative reference, or an unsupported scheme.
    Skipped,
    /// The response body was written to the HTML entry.
    Embedded { bytes: u64 },
}

impl FetchOutcome {
    pub fn attempted(&self) -> bool {
        matches!(self, FetchOutcome::Embedded { .. })
    }
}

/// Fetcher backed by a blocking `ureq` agent.
#[derive(Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
    max_body_bytes: Option<u64>,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            agent: builder.build(),
            max_body_bytes: config.max_body_bytes,
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &Url) -> Result<Box<dyn Read + Send>, BoxError> {
        // Error statuses still carry a body worth keeping.
        let response = match self.agent.get(url.as_str()).call() {
            Ok(response) | Err(ureq::Error::Status(_, response)) => response,
            Err(err) => return Err(Box::new(err)),
        };
        tracing::debug!(url = %url, status = response.status(), "fetched remote document");

        let reader = response.into_reader();
        let body: Box<dyn Read + Send> = match self.max_body_bytes {
            Some(limit) => Box::new(CappedBody::new(reader, limit)),
            None => reader,
        };
        Ok(body)
    }
}

/// Reader that errors once more than `limit` bytes have been read.
struct CappedBody<R> {
    inner: R,
    limit: u64,
    remaining: u64,
}

impl<R: Read> CappedBody<R> {
    fn new(inner: R, limit: u64) -> Self {
        Self {
            inner,
            limit,
            remaining: limit,
        }
    }
}

impl<R: Read> Read for CappedBody<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n as u64 > self.remaining {
            return Err(io::Error::other(format!(
                "response body exceeds {} bytes",
                self.limit
            )));
        }
        self.remaining -= n as u64;
        Ok(n)
    }
}

/// Parses the payload's URL, returning `None` when it should not be fetched.
fn fetchable_url(raw: &str) -> Result<Option<Url>, StarterError> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        // No scheme at all is the same as an unsupported one.
        Err(url::ParseError::RelativeUrlWithoutBase) => return Ok(None),
        Err(source) => {
            return Err(StarterError::Parse {
                url: raw.to_string(),
                source,
            })
        }
    };

    match url.scheme() {
        "http" | "https" => Ok(Some(url)),
        _ => Ok(None),
    }
}

/// Fetches the payload's `"url"` (if any) into `<name>.html` inside `zip`.
pub fn fetch_into<W: Write + Seek>(
    name: &ArchiveName,
    payload: &Payload,
    fetcher: &dyn Fetcher,
    zip: &mut ZipWriter<W>,
    options: SimpleFileOptions,
) -> Result<FetchOutcome, StarterError> {
    let Some(raw) = string_field(payload, URL_KEY) else {
        return Ok(FetchOutcome::Skipped);
    };

    let Some(url) = fetchable_url(raw)? else {
        tracing::debug!(url = raw, "skipping url with unsupported scheme");
        return Ok(FetchOutcome::Skipped);
    };

    let mut body = fetcher.get(&url).map_err(|source| StarterError::Transport {
        url: raw.to_string(),
        source,
    })?;

    zip.start_file(name.html_entry(), options)?;
    let bytes = io::copy(&mut body, zip).map_err(|source| StarterError::Copy {
        url: raw.to_string(),
        source,
    })?;

    Ok(FetchOutcome::Embedded { bytes })
}
