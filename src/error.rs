//! Centralized error types for mboxpulse.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the mboxpulse library.
#[derive(Error, Debug)]
pub enum PulseError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// A raw message could not be decoded into a record.
    #[error("Cannot decode message #{sequence}: {reason}")]
    Decode { sequence: u64, reason: String },

    /// Neither the `Date:` header nor the `From ` separator carried a usable date.
    #[error("Message #{sequence} has no usable date")]
    MissingDate { sequence: u64 },

    /// A classifier pattern failed to compile.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    /// The contacts file could not be read as tabular text.
    #[error("Malformed contacts file '{path}': {source}")]
    Contacts { path: PathBuf, source: csv::Error },

    /// The character encoding is not supported.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// The calendar reported no business days for the reporting month.
    #[error("No business days in {year}-{month:02}; cannot compute ratios")]
    NoBusinessDays { year: i32, month: u32 },

    /// A message date resolved to a day outside the 31 span slots.
    #[error("Day {day} out of range for author '{author}'")]
    DayOutOfRange { author: String, day: u32 },

    /// A reporting month or holiday date could not be parsed.
    #[error("Invalid date '{0}'")]
    InvalidDate(String),
}

/// Convenience alias for `Result<T, PulseError>`.
pub type Result<T> = std::result::Result<T, PulseError>;

impl PulseError {
    /// Create an `Io` variant from a path and an `io::Error`.
    ///
    /// A missing file is reported as [`PulseError::FileNotFound`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::FileNotFound(path);
        }
        Self::Io { path, source }
    }
}

/// Allow `?` on `std::io::Error` when no path context is available
/// (rare; prefer `PulseError::io`).
impl From<std::io::Error> for PulseError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}
