//! Error types for interface enumeration and reporting.

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

/// Result type alias for `lsdev` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort an enumeration or a report.
///
/// Missing optional fields (netmask, broadcast, hardware address) are never
/// errors, and neither is an address of an unknown family.
#[derive(Error, Debug)]
pub enum Error {
    /// The OS-level interface query failed. `reason` is the text supplied by
    /// the OS or the capture library.
    #[error("failed to enumerate network interfaces: {reason}")]
    Enumeration { reason: String },

    /// A buffer needed for the query could not be allocated.
    #[error("failed to allocate interface buffer: {0}")]
    Allocation(#[from] TryReserveError),

    /// The requested backend is not available in this build or on this target.
    #[error("backend not supported here: {0}")]
    Unsupported(&'static str),

    /// Writing the report failed.
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),

    /// Serializing the JSON report failed.
    #[error("failed to render JSON report: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an enumeration error carrying the given reason verbatim.
    pub fn enumeration<S: Into<String>>(reason: S) -> Self {
        Error::Enumeration {
            reason: reason.into(),
        }
    }

    /// Create an enumeration error from the calling thread's last OS error.
    pub(crate) fn last_os_error() -> Self {
        Error::enumeration(io::Error::last_os_error().to_string())
    }
}
