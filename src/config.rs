//! Configuration types for the fetcher and the row sink.
//!
//! Plain structs with builder-style setters, usable from library code
//! without any CLI framework. Nothing here reads the environment.
//!
//! # Example
//!
//! ```rust
//! use chatvault::config::FetchConfig;
//!
//! let config = FetchConfig::new()
//!     .with_root("archive")
//!     .with_image_size(1024);
//!
//! assert_eq!(config.temp_suffix, ".part");
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ArchiveError, Result};

/// Default CDN base for derived asset locators.
pub const DEFAULT_CDN_BASE: &str = "https://cdn.discordapp.com/";

/// Default `size` query parameter for image assets.
pub const DEFAULT_IMAGE_SIZE: u32 = 2048;

/// Default suffix of the temporary sibling written before rename.
pub const DEFAULT_TEMP_SUFFIX: &str = ".part";

/// Configuration for [`ContentFetcher`](crate::fetch::ContentFetcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Directory local paths are resolved against (default: `.`)
    pub root: PathBuf,

    /// Base for avatar/emoji/icon/splash locators, with trailing slash
    pub cdn_base: String,

    /// Value of the `size` query parameter on image locators (default: 2048)
    pub image_size: u32,

    /// Suffix of the uniquely named temporary sibling; non-empty, no separators (default: `.part`)
    pub temp_suffix: String,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Whole-request timeout in seconds; `None` means no timeout (default)
    pub timeout_secs: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            cdn_base: DEFAULT_CDN_BASE.to_string(),
            image_size: DEFAULT_IMAGE_SIZE,
            temp_suffix: DEFAULT_TEMP_SUFFIX.to_string(),
            user_agent: concat!("chatvault/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
        }
    }
}

impl FetchConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output root directory.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Sets the CDN base. A trailing slash is added if missing.
    #[must_use]
    pub fn with_cdn_base(mut self, base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        self.cdn_base = base;
        self
    }

    /// Sets the image size parameter.
    #[must_use]
    pub fn with_image_size(mut self, size: u32) -> Self {
        self.image_size = size;
        self
    }

    /// Sets the temporary file suffix.
    #[must_use]
    pub fn with_temp_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.temp_suffix = suffix.into();
        self
    }

    /// Sets the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets a request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Checks settings that would break the write-then-rename protocol.
    pub fn validate(&self) -> Result<()> {
        check_temp_suffix(&self.temp_suffix)
    }
}

/// The temporary file must be a distinct sibling of its target: a non-empty
/// suffix with no path separator.
pub fn check_temp_suffix(suffix: &str) -> Result<()> {
    if suffix.is_empty() {
        return Err(ArchiveError::invalid_config("temp_suffix", "must not be empty"));
    }
    if suffix.contains(['/', '\\', '\0']) {
        return Err(ArchiveError::invalid_config(
            "temp_suffix",
            format!("'{}' must not contain a path separator", suffix.escape_debug()),
        ));
    }
    Ok(())
}

/// Configuration for [`RowWriter`](crate::output::RowWriter).
///
/// # Example
///
/// ```rust
/// use chatvault::config::RowWriterConfig;
///
/// let config = RowWriterConfig::new().with_delimiter(b',');
/// assert_eq!(config.delimiter, b',');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowWriterConfig {
    /// Field delimiter (default: tab)
    pub delimiter: u8,
}

impl Default for RowWriterConfig {
    fn default() -> Self {
        Self { delimiter: b'\t' }
    }
}

impl RowWriterConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}
