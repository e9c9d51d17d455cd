//! Error types for STL codec operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for STL codec operations.
pub type StlResult<T> = Result<T, StlError>;

/// Errors that can occur while decoding or encoding STL data.
///
/// All decode-time failures are non-recoverable: they stem from
/// malformed input, not transient conditions, so no retry is ever
/// appropriate.
#[derive(Debug, Error)]
pub enum StlError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// The stream is too short to classify as either binary or ASCII.
    ///
    /// Raised only when fewer bytes than a minimal binary header (84)
    /// are available and the stream does not open as ASCII. Callers
    /// must treat this as "insufficient data", not default to a form.
    #[error("cannot determine STL format: insufficient data")]
    FormatUndetermined,

    /// A binary stream ended before the declared facet count was read.
    #[error("truncated binary STL: declared {declared} facets, stream ended after {decoded}")]
    TruncatedRecord {
        /// Facet count declared in the length field.
        declared: u32,
        /// Complete facets decoded before the stream ended.
        decoded: u32,
    },

    /// An ASCII stream did not open with a `solid` line.
    #[error("malformed ASCII STL header: expected `solid`, found `{line}`")]
    MalformedHeader {
        /// The offending first line.
        line: String,
    },

    /// An ASCII line did not match the production expected at this
    /// point in the grammar.
    #[error("unexpected line {line_no} in ASCII STL: expected {expected}, found `{found}`")]
    UnexpectedToken {
        /// 1-based line number of the offending line.
        line_no: usize,
        /// The production the parser was expecting.
        expected: &'static str,
        /// The offending line, trimmed.
        found: String,
    },

    /// A token in a numeric position did not parse as a float.
    #[error("invalid number `{token}` on line {line_no} of ASCII STL")]
    NumberFormat {
        /// 1-based line number of the offending token.
        line_no: usize,
        /// The token that failed to parse.
        token: String,
        /// The underlying parse error.
        source: std::num::ParseFloatError,
    },

    /// I/O error from the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
