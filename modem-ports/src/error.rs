//! Common error types for modem-ports.
//!
//! This module provides a centralized Error enum using thiserror, plus the
//! typed open failure that [`crate::serial`] collapses into `None` for its
//! sentinel-returning functions.

use std::{io, path::PathBuf};
use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// Main error type for modem-ports operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The device directory could not be listed
    #[error("failed to scan {}: {source}", .dir.display())]
    Scan {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A serial device could not be opened
    #[error(transparent)]
    Open(#[from] OpenError),

    /// I/O errors outside of the scan, e.g. reading a config file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed configuration file
    #[error("Configuration parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a serial device failed to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum FailureKind {
    NotFound,
    PermissionDenied,
    /// Held open elsewhere, usually with an exclusive lock
    Busy,
    Other,
}

impl FailureKind {
    /// Map a serial library error onto a failure kind.
    pub fn classify(err: &tokio_serial::Error) -> Self {
        use io::ErrorKind as IO;
        use tokio_serial::ErrorKind as K;

        if is_busy(err) {
            return FailureKind::Busy;
        }

        match err.kind() {
            K::NoDevice | K::Io(IO::NotFound) => FailureKind::NotFound,
            K::Io(IO::PermissionDenied) => FailureKind::PermissionDenied,
            K::Io(IO::WouldBlock | IO::AddrInUse) => FailureKind::Busy,
            _ => FailureKind::Other,
        }
    }
}

/// Message the serial library uses when another handle holds the device's
/// advisory lock.
pub const LOCK_CONTENTION: &str = "Unable to acquire exclusive lock on serial port";

// Lock contention and EBUSY from TIOCEXCL both come back as NoDevice or
// Unknown; only the description tells them apart from a missing device.
fn is_busy(err: &tokio_serial::Error) -> bool {
    err.description.contains(LOCK_CONTENTION) || is_ebusy(err)
}

#[cfg(unix)]
fn is_ebusy(err: &tokio_serial::Error) -> bool {
    err.description == nix::errno::Errno::EBUSY.desc()
}

#[cfg(not(unix))]
fn is_ebusy(_err: &tokio_serial::Error) -> bool {
    false
}

/// A failed attempt to open a serial device.
#[derive(Error, Debug)]
#[error("failed to open {} ({kind}): {source}", .path.display())]
pub struct OpenError {
    pub path: PathBuf,
    pub kind: FailureKind,
    #[source]
    pub source: tokio_serial::Error,
}

impl OpenError {
    pub fn new(path: PathBuf, source: tokio_serial::Error) -> Self {
        Self {
            path,
            kind: FailureKind::classify(&source),
            source,
        }
    }
}
