//! Streaming download of remote resources.
use crate::DatasetError;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use reqwest::blocking::Client;
use std::io::{Read, Write};

/// Archives are multi-gigabyte, so they are copied through a buffer of this
/// size instead of being held in memory.
pub const CHUNK_SIZE: usize = 10 * 1024 * 1024;

const PROGRESS_TEMPLATE: &str =
    "[{elapsed_precise}] [{wide_bar}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

/// Something able to copy the resource behind `url` into `dest`.
pub trait Fetch {
    /// Streams `url` into `dest` and returns the number of bytes written.
    ///
    /// Any failure means nothing usable was written; there is no retry and no
    /// resume.
    fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64, DatasetError>;
}

/// Blocking HTTP fetcher with an optional progress bar.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    progress: bool,
    chunk_size: usize,
}

/// Builder for [`HttpFetcher`].
#[derive(Debug)]
pub struct HttpFetcherBuilder {
    progress: bool,
    chunk_size: usize,
}

impl Default for HttpFetcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcherBuilder {
    /// Progress bar on, 10 MiB chunks.
    pub fn new() -> Self {
        Self {
            progress: true,
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Whether to draw a progress bar on stderr while downloading.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Size of the copy buffer.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Builds the fetcher and its HTTP client.
    pub fn build(self) -> Result<HttpFetcher, DatasetError> {
        // No request timeout: a download may legitimately take hours.
        let client = Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()?;
        Ok(HttpFetcher {
            client,
            progress: self.progress,
            chunk_size: self.chunk_size,
        })
    }
}

impl HttpFetcher {
    /// A fetcher with default settings.
    pub fn new() -> Result<Self, DatasetError> {
        HttpFetcherBuilder::new().build()
    }

    /// Starts a [`HttpFetcherBuilder`].
    pub fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder::new()
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
            bar.set_style(style);
        }
        bar
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64, DatasetError> {
        let mut response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(DatasetError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        // 0 stands for "unknown" when the server sends no content-length
        let total = response.content_length().unwrap_or(0);
        if total == 0 {
            warn!("{url} did not advertise its size");
        }
        info!("Downloading {url} ({total} bytes)");

        let bar = self.progress_bar(total);
        let mut buffer = vec![0u8; self.chunk_size];
        let mut written = 0u64;
        loop {
            let n = response.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            dest.write_all(&buffer[..n])?;
            written += n as u64;
            bar.inc(n as u64);
        }
        dest.flush()?;
        bar.finish_and_clear();
        Ok(written)
    }
}
