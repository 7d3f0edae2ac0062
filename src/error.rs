//! Error handling for the superhet library
//!
//! This module provides a unified error type for the fallible operations in
//! the library: reading capture files and validating runtime configuration.
//! Signal-quality conditions (no carrier, no stereo pilot) are ordinary
//! runtime states reported through the demodulator flags, never errors.

use std::fmt;
use std::io;

/// A specialized Result type for superhet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for superhet operations
#[derive(Debug)]
pub enum Error {
    /// I/O error (capture file operations)
    Io(io::Error),

    /// Invalid runtime configuration (rates, block sizes)
    Config(String),

    /// Invalid capture format or conversion error
    Format(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Config(msg) => write!(f, "Config error: {}", msg),
            Error::Format(msg) => write!(f, "Format error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

// Helper constructors for common error scenarios

impl Error {
    /// Create a config error with a custom message
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a format error with a custom message
    pub fn format<S: Into<String>>(msg: S) -> Self {
        Error::Format(msg.into())
    }
}
