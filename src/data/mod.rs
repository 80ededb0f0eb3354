//! Persisted formats for samples and environment records.
//!
//! Both writers emit plain comma-separated text with a single header row.
//! In append mode the header is, by default, emitted again before the new
//! rows (long-standing behavior some downstream tooling depends on); it can
//! be suppressed through [`CsvOptions::header_on_append`].

mod csv;

pub use csv::{
    read_samples_csv, write_environment_csv, write_samples_csv, ENVIRONMENT_CSV_HEADER,
    SAMPLES_CSV_HEADER,
};

use std::fmt;

/// Options controlling CSV emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Append to an existing file instead of truncating.
    pub append: bool,
    /// Emit the header row even when appending (default: true).
    pub header_on_append: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            append: false,
            header_on_append: true,
        }
    }
}

impl CsvOptions {
    /// Truncate-and-write options.
    pub fn truncate() -> Self {
        Self::default()
    }

    /// Append options with the historical repeated header.
    pub fn append() -> Self {
        Self {
            append: true,
            header_on_append: true,
        }
    }

    /// Append options without a repeated header.
    pub fn append_headerless() -> Self {
        Self {
            append: true,
            header_on_append: false,
        }
    }
}

/// Errors from reading or writing persisted benchmark data.
#[derive(Debug)]
pub enum DataError {
    /// IO error reading or writing a file.
    Io(std::io::Error),

    /// Malformed CSV structure at a specific line.
    Parse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Description of the parse error.
        message: String,
    },

    /// A field that failed to parse as a number.
    InvalidValue {
        /// Line number where the invalid value was found (1-indexed).
        line: usize,
        /// The offending field text.
        value: String,
    },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Io(e) => write!(f, "IO error: {}", e),
            DataError::Parse { line, message } => {
                write!(f, "Parse error at line {}: {}", line, message)
            }
            DataError::InvalidValue { line, value } => {
                write!(f, "Invalid value at line {}: '{}'", line, value)
            }
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DataError {
    fn from(e: std::io::Error) -> Self {
        DataError::Io(e)
    }
}
