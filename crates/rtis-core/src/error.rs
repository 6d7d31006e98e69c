//! Error types for rtis-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Host task errors
    /// Transfer length is outside the 1-4 byte range the command byte can encode
    InvalidLength,
    /// Responder did not signal data-ready within the poll budget
    Timeout,
    /// Response line was not driven where data was expected
    NoResponse,

    // Engine construction errors
    /// Requested strobe delay exceeds the delay line capacity
    DelayTooDeep,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength => write!(f, "transfer length must be 1-4 bytes"),
            Self::Timeout => write!(f, "responder not ready within poll budget"),
            Self::NoResponse => write!(f, "response line not driven"),
            Self::DelayTooDeep => write!(f, "strobe delay exceeds delay line capacity"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
