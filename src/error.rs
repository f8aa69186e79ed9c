//! Error types for the dungeon archive extractor.
//!
//! This module defines the error hierarchy for every failure case during
//! extraction: I/O errors, archive index validation failures, and the
//! structural expectations of the script parser.

use thiserror::Error;

/// The main error type for archive extraction and script parsing.
///
/// This enum covers all error cases that can occur during extraction:
/// - File I/O and JSON serialization failures
/// - Malformed or truncated archive indexes
/// - Script header, spawn and block recovery failures
/// - Per-script wrapping applied by the pipeline driver
///
/// # Example
///
/// ```
/// use dungeon_extract::error::{ExtractError, Result};
///
/// fn example_operation() -> Result<()> {
///     Err(ExtractError::MissingBlockCount)
/// }
/// ```
#[derive(Error, Debug)]
pub enum ExtractError {
    /// An I/O error occurred while reading the archive or writing outputs.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A parsed script could not be serialized to JSON.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A name table slot is empty or unreadable.
    #[error("Malformed archive: script {index}: {reason}")]
    MalformedArchive {
        /// Index of the offending name table slot.
        index: usize,
        /// A description of what makes the slot invalid.
        reason: String,
    },

    /// The archive ended before the index could be read.
    ///
    /// This typically indicates a truncated archive file.
    #[error("Truncated archive: expected {expected} bytes, but only {available} available")]
    UnexpectedEof {
        /// The number of bytes that were expected to be available.
        expected: usize,
        /// The actual number of bytes available.
        available: usize,
    },

    /// The script holds no non-blank lines.
    #[error("Unexpected dungeon header: empty script")]
    EmptyScript,

    /// No line carrying a spawn count was found.
    #[error("Unexpected dungeon header: missing spawn count")]
    MissingSpawnCount,

    /// A spawn section line yielded fewer than two integer tokens.
    #[error("Malformed spawn line {index}: '{line}'")]
    MalformedSpawnLine {
        /// Zero-based index of the spawn being read.
        index: usize,
        /// The trimmed line text.
        line: String,
    },

    /// The script ended before a block count line was found.
    #[error("Missing block count")]
    MissingBlockCount,

    /// The block count line carries no digits.
    #[error("Malformed block count line: '{line}'")]
    MalformedBlockCountLine {
        /// The offending line text.
        line: String,
    },

    /// A block's fixed line sequence ran past the end of the script.
    #[error("Block {block} field '{field}' out of range: line {line} does not exist")]
    OutOfRange {
        /// Zero-based index of the block being read.
        block: usize,
        /// Name of the field being read.
        field: &'static str,
        /// Zero-based line index that was requested.
        line: usize,
    },

    /// A token expected to be an integer was not.
    #[error("Invalid integer literal: '{token}'")]
    IntegerParseFailure {
        /// The offending token.
        token: String,
    },

    /// A script failed to parse; wraps the cause with the script filename.
    #[error("Failed to parse script '{filename}': {source}")]
    Script {
        /// Output filename of the failing script (e.g. `ROOM01.dun`).
        filename: String,
        /// The underlying parse failure.
        source: Box<ExtractError>,
    },
}

impl ExtractError {
    /// Creates an `UnexpectedEof` error with the given sizes.
    ///
    /// # Arguments
    ///
    /// * `expected` - The number of bytes that were needed
    /// * `available` - The number of bytes actually available
    #[must_use]
    pub fn unexpected_eof(expected: usize, available: usize) -> Self {
        ExtractError::UnexpectedEof {
            expected,
            available,
        }
    }

    /// Creates an `IntegerParseFailure` error for the given token.
    #[must_use]
    pub fn integer_parse(token: &str) -> Self {
        ExtractError::IntegerParseFailure {
            token: token.to_string(),
        }
    }

    /// Wraps this error with the filename of the script that produced it.
    #[must_use]
    pub fn in_script(self, filename: impl Into<String>) -> Self {
        ExtractError::Script {
            filename: filename.into(),
            source: Box::new(self),
        }
    }
}

/// A specialized Result type for extraction operations.
///
/// This is a convenience alias that uses `ExtractError` as the error type.
pub type Result<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_display() {
        let err = ExtractError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert!(err.to_string().contains("I/O error"));

        let err = ExtractError::MalformedArchive {
            index: 3,
            reason: "empty script name".to_string(),
        };
        assert!(err.to_string().contains("script 3"));
        assert!(err.to_string().contains("empty script name"));

        let err = ExtractError::unexpected_eof(20, 16);
        assert!(err.to_string().contains("expected 20 bytes"));
        assert!(err.to_string().contains("16 available"));

        let err = ExtractError::MalformedSpawnLine {
            index: 1,
            line: "5".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed spawn line 1: '5'");
    }

    #[test]
    fn test_out_of_range_names_field() {
        let err = ExtractError::OutOfRange {
            block: 0,
            field: "countdown",
            line: 12,
        };
        let message = err.to_string();
        assert!(message.contains("Block 0"));
        assert!(message.contains("countdown"));
        assert!(message.contains("line 12"));
    }

    #[test]
    fn test_in_script_wraps_cause() {
        let err = ExtractError::MissingBlockCount.in_script("ROOM01.dun");
        assert_eq!(
            err.to_string(),
            "Failed to parse script 'ROOM01.dun': Missing block count"
        );
        match err {
            ExtractError::Script { filename, source } => {
                assert_eq!(filename, "ROOM01.dun");
                assert!(matches!(*source, ExtractError::MissingBlockCount));
            }
            _ => panic!("Expected Script variant"),
        }
    }

    #[test]
    fn test_integer_parse_helper() {
        let err = ExtractError::integer_parse("x1");
        assert!(matches!(err, ExtractError::IntegerParseFailure { ref token } if token == "x1"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExtractError>();
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "test error");
        let err: ExtractError = io_err.into();
        assert!(matches!(err, ExtractError::IoError(_)));
    }
}
