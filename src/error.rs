//! Unified error types for chatvault.
//!
//! A single [`ArchiveError`] enum covers both halves of the crate: the
//! content fetcher (locator, transport, status and storage failures) and the
//! row serializer (shape and channel-kind failures).
//!
//! Every variant carries enough structure for the caller to tell the kinds
//! apart without string matching. Nothing here is logged; errors are always
//! returned to the immediate caller.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatvault operations.
///
/// # Example
///
/// ```rust
/// use chatvault::error::Result;
///
/// fn my_function() -> Result<Vec<String>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// The error type for all chatvault operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArchiveError {
    /// The locator could not be parsed or does not map to a usable local path.
    ///
    /// Not retried; the input itself is wrong.
    #[error("Invalid locator '{locator}': {reason}")]
    InvalidLocator {
        /// The locator as supplied by the caller
        locator: String,
        /// What is wrong with it
        reason: String,
    },

    /// The resource could not be reached, or the body stream broke mid-read.
    #[error("Transport error fetching {locator}: {source}")]
    Transport {
        /// The locator being fetched
        locator: String,
        /// The underlying failure
        #[source]
        source: TransportErrorKind,
    },

    /// The server answered with a non-success status.
    ///
    /// The status is kept so callers can tell "missing" (404) from other
    /// failures.
    #[error("Non-success status {status} fetching {locator}")]
    NotOk {
        /// The locator being fetched
        locator: String,
        /// HTTP status code
        status: u16,
    },

    /// A filesystem step of the write-then-rename protocol failed.
    ///
    /// May leave an orphaned temporary file next to the target.
    #[error("Storage error ({op}) at {}: {source}", path.display())]
    Storage {
        /// Which step failed
        op: StorageOp,
        /// Path the step was operating on
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A configuration value that cannot be used as given.
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig {
        /// The offending setting
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// The HTTP client could not be constructed (e.g. TLS backend setup).
    #[cfg(feature = "fetch")]
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// A value tag outside the enumerated set of shapes.
    #[error("Unsupported shape '{tag}'")]
    UnsupportedShape {
        /// The tag that was not recognized
        tag: String,
    },

    /// A channel kind outside text, voice and category.
    #[error("Unrecognized channel kind {kind}")]
    UnrecognizedChannelKind {
        /// The raw kind value
        kind: u8,
    },

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An I/O error outside the fetch protocol (reading input, writing rows).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Kinds of transport failures.
#[derive(Debug, Error)]
pub enum TransportErrorKind {
    /// The request could not be sent or the client could not be built
    #[cfg(feature = "fetch")]
    #[error("{0}")]
    Http(#[source] reqwest::Error),
    /// Reading the response body failed part way through
    #[error("body read failed: {0}")]
    Body(#[source] io::Error),
}

/// The step of the write-then-rename protocol that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    /// Creating missing parent directories
    CreateDir,
    /// Creating the temporary sibling file
    CreateTemp,
    /// Writing (or flushing) the body into the temporary file
    Write,
    /// Renaming the temporary file onto the final path
    Rename,
}

impl fmt::Display for StorageOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageOp::CreateDir => "create dir",
            StorageOp::CreateTemp => "create temp file",
            StorageOp::Write => "write",
            StorageOp::Rename => "rename",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ArchiveError {
    /// Creates an invalid locator error.
    pub fn invalid_locator(locator: impl Into<String>, reason: impl Into<String>) -> Self {
        ArchiveError::InvalidLocator {
            locator: locator.into(),
            reason: reason.into(),
        }
    }

    /// Creates a non-success status error.
    pub fn not_ok(locator: impl Into<String>, status: u16) -> Self {
        ArchiveError::NotOk {
            locator: locator.into(),
            status,
        }
    }

    /// Creates a storage error for the given step and path.
    pub fn storage(op: StorageOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        ArchiveError::Storage {
            op,
            path: path.into(),
            source,
        }
    }

    /// Creates a transport error for a broken response body.
    pub fn body_read(locator: impl Into<String>, source: io::Error) -> Self {
        ArchiveError::Transport {
            locator: locator.into(),
            source: TransportErrorKind::Body(source),
        }
    }

    /// Creates a transport error from an HTTP client failure.
    #[cfg(feature = "fetch")]
    pub fn http(locator: impl Into<String>, source: reqwest::Error) -> Self {
        ArchiveError::Transport {
            locator: locator.into(),
            source: TransportErrorKind::Http(source),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        ArchiveError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Creates an unsupported shape error.
    pub fn unsupported_shape(tag: impl Into<String>) -> Self {
        ArchiveError::UnsupportedShape { tag: tag.into() }
    }

    /// Returns the HTTP status for [`NotOk`](ArchiveError::NotOk) errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ArchiveError::NotOk { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the server reported the resource as missing (404).
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if this is an invalid locator error.
    pub fn is_invalid_locator(&self) -> bool {
        matches!(self, ArchiveError::InvalidLocator { .. })
    }

    /// Returns `true` if this is a transport error.
    pub fn is_transport(&self) -> bool {
        matches!(self, ArchiveError::Transport { .. })
    }

    /// Returns `true` if this is a storage error.
    pub fn is_storage(&self) -> bool {
        matches!(self, ArchiveError::Storage { .. })
    }

    /// Returns `true` if this is a serializer programming error
    /// (unsupported shape or unrecognized channel kind).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ArchiveError::UnsupportedShape { .. } | ArchiveError::UnrecognizedChannelKind { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
