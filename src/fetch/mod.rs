//! Idempotent, crash-safe asset fetching.
//!
//! [`ContentFetcher::fetch`] makes sure the file for a locator exists under
//! the output root, downloading it only when absent:
//!
//! 1. Derive the local path from the locator's path component
//!    (see [`local_path`]).
//! 2. If anything already exists there, return
//!    [`DownloadOutcome::AlreadyPresent`] without touching the network.
//! 3. Otherwise GET the locator; a non-2xx status is
//!    [`NotOk`](ArchiveError::NotOk).
//! 4. Stream the body into a uniquely named `.part` sibling and rename it
//!    into place.
//!
//! Deduplication is by path only. Two locators with the same path are the
//! same file, and a changed asset behind a stable locator is never
//! re-fetched.
//!
//! There is no locking: two concurrent fetches of the same missing locator
//! both download into separate siblings and the later rename wins. Content
//! behind a locator is treated as immutable, so both renames install a
//! complete file.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatvault::config::FetchConfig;
//! use chatvault::fetch::{ContentFetcher, DownloadOutcome};
//!
//! let fetcher = ContentFetcher::with_config(FetchConfig::new().with_root("archive"))?;
//!
//! match fetcher.emoji("41771983429993937", false)? {
//!     DownloadOutcome::AlreadyPresent(path) => println!("have {}", path.display()),
//!     DownloadOutcome::Fetched { path, bytes } => println!("got {} ({bytes} bytes)", path.display()),
//! }
//! # Ok::<(), chatvault::ArchiveError>(())
//! ```

pub mod endpoints;
pub mod storage;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info};
use url::Url;

use crate::config::FetchConfig;
use crate::error::{ArchiveError, Result};
use crate::model::User;

pub use storage::PartFile;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// What a successful [`ContentFetcher::fetch`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The file was already on disk; no request was made.
    AlreadyPresent(PathBuf),
    /// The file was downloaded and renamed into place.
    Fetched {
        /// Final path of the file
        path: PathBuf,
        /// Body size in bytes
        bytes: u64,
    },
}

impl DownloadOutcome {
    /// Path of the file on disk.
    pub fn path(&self) -> &Path {
        match self {
            DownloadOutcome::AlreadyPresent(path) | DownloadOutcome::Fetched { path, .. } => path,
        }
    }

    /// Returns `true` if this call performed a download.
    pub fn was_fetched(&self) -> bool {
        matches!(self, DownloadOutcome::Fetched { .. })
    }
}

/// Derives the relative local path for a locator.
///
/// The path component is percent-decoded segment by segment and the
/// leading separator dropped; scheme, host and query do not take part.
/// Empty segments from doubled separators are skipped.
///
/// ```
/// use chatvault::fetch::local_path;
/// use std::path::Path;
///
/// let path = local_path("https://host/a/b/c.png?x=1")?;
/// assert_eq!(path, Path::new("a/b/c.png"));
/// # Ok::<(), chatvault::ArchiveError>(())
/// ```
pub fn local_path(locator: &str) -> Result<PathBuf> {
    let invalid = |reason: String| ArchiveError::invalid_locator(locator, reason);

    let url = Url::parse(locator).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    let segments = url
        .path_segments()
        .ok_or_else(|| invalid("locator has no path".to_string()))?;

    let mut path = PathBuf::new();
    let mut ends_with_separator = true;
    for raw in segments {
        ends_with_separator = raw.is_empty();
        if raw.is_empty() {
            continue;
        }
        let segment = urlencoding::decode(raw)
            .map_err(|e| invalid(format!("segment '{raw}' is not UTF-8: {e}")))?;
        if segment == "." || segment == ".." || segment.contains(['/', '\\', '\0']) {
            return Err(invalid(format!("unsafe path segment '{segment}'")));
        }
        path.push(&*segment);
    }

    if ends_with_separator || path.as_os_str().is_empty() {
        return Err(invalid("locator has no file name".to_string()));
    }
    Ok(path)
}

/// Downloads assets into a directory tree mirroring their locators.
///
/// Holds no mutable state; presence is re-checked on disk for every call,
/// so one fetcher can serve any number of threads.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: Client,
    config: FetchConfig,
}

impl ContentFetcher {
    /// Creates a fetcher with default configuration, rooted at the working directory.
    pub fn new() -> Result<Self> {
        Self::with_config(FetchConfig::default())
    }

    /// Creates a fetcher, building an HTTP client from `config`.
    ///
    /// Fails with [`InvalidConfig`](ArchiveError::InvalidConfig) for an
    /// unusable temp suffix and [`ClientBuild`](ArchiveError::ClientBuild)
    /// if the client cannot be constructed.
    pub fn with_config(config: FetchConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()
            .map_err(ArchiveError::ClientBuild)?;
        Self::with_client(client, config)
    }

    /// Creates a fetcher around an existing HTTP client.
    pub fn with_client(client: Client, config: FetchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { client, config })
    }

    /// The configuration this fetcher was built with.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Where `locator` lands on disk (root joined with [`local_path`]).
    pub fn target_path(&self, locator: &str) -> Result<PathBuf> {
        Ok(self.config.root.join(local_path(locator)?))
    }

    /// Ensures the file for `locator` exists, downloading it if absent.
    pub fn fetch(&self, locator: &str) -> Result<DownloadOutcome> {
        let target = self.target_path(locator)?;

        if fs::symlink_metadata(&target).is_ok() {
            debug!("already present: {}", target.display());
            return Ok(DownloadOutcome::AlreadyPresent(target));
        }

        info!("downloading {}", locator);

        let mut response = self
            .client
            .get(locator)
            .send()
            .map_err(|e| ArchiveError::http(locator, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArchiveError::not_ok(locator, status.as_u16()));
        }

        let mut part = PartFile::create(&target, &self.config.temp_suffix)?;
        let bytes = stream_body(&mut response, &mut part, locator)?;
        let path = part.commit()?;

        Ok(DownloadOutcome::Fetched { path, bytes })
    }

    /// Fetches `user`'s avatar.
    pub fn avatar(&self, user: &User) -> Result<DownloadOutcome> {
        self.fetch(&endpoints::avatar_url(
            &self.config.cdn_base,
            user,
            self.config.image_size,
        ))
    }

    /// Fetches a custom emoji, as GIF when `animated`.
    pub fn emoji(&self, emoji_id: &str, animated: bool) -> Result<DownloadOutcome> {
        self.fetch(&endpoints::emoji_url(
            &self.config.cdn_base,
            emoji_id,
            animated,
            self.config.image_size,
        ))
    }

    /// Fetches a guild icon.
    pub fn icon(&self, guild_id: &str, hash: &str) -> Result<DownloadOutcome> {
        self.fetch(&endpoints::icon_url(
            &self.config.cdn_base,
            guild_id,
            hash,
            self.config.image_size,
        ))
    }

    /// Fetches a guild splash.
    pub fn splash(&self, guild_id: &str, hash: &str) -> Result<DownloadOutcome> {
        self.fetch(&endpoints::splash_url(
            &self.config.cdn_base,
            guild_id,
            hash,
            self.config.image_size,
        ))
    }

    /// Fetches a message attachment; its locator is already absolute.
    pub fn attachment(&self, url: &str) -> Result<DownloadOutcome> {
        self.fetch(url)
    }
}

/// Copies `body` into `part`. Read failures are transport errors, write
/// failures storage errors.
fn stream_body<R: Read>(body: &mut R, part: &mut PartFile, locator: &str) -> Result<u64> {
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    loop {
        let n = match body.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ArchiveError::body_read(locator, e)),
        };
        part.write_all(&buf[..n])?;
    }
    Ok(part.written())
}
