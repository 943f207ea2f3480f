//! Error types for the RTCM2 JSON decoder.
//!
//! Every failure maps to a stable, non-zero status code so that callers
//! speaking the numeric protocol (`0` = success) can tell failure kinds
//! apart without matching on the enum.

use thiserror::Error;

/// Result type alias for RTCM2 decoding operations.
pub type Result<T> = std::result::Result<T, Rtcm2Error>;

/// Errors that can occur while decoding an RTCM2 JSON message.
#[derive(Error, Debug)]
pub enum Rtcm2Error {
    /// The text is not a well-formed JSON object
    #[error("Malformed JSON: {0}")]
    Syntax(String),

    /// A field without a default value is absent from the object
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    /// An array holds more elements than its target can store
    #[error("Array '{field}' overflow: {found} elements, capacity {capacity}")]
    ArrayOverflow {
        field: &'static str,
        capacity: usize,
        found: usize,
    },

    /// A field is present but holds the wrong JSON kind or an out-of-range number
    #[error("Type mismatch in field '{field}': expected {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    /// The object carries an attribute the selected schema does not describe
    #[error("Unknown attribute '{0}'")]
    UnknownAttribute(String),

    /// A check-literal field does not carry the required literal
    #[error("Field '{field}' must be \"{expected}\", got \"{found}\"")]
    CheckFailed {
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    /// A fallback data token is not of the form `U\t0x<8 hex digits>\n`
    #[error("Malformed raw word at index {index}: {token:?}")]
    MalformedRawWord { index: usize, token: String },

    /// I/O error while reading an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file is not valid UTF-8
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Polars error while building a summary DataFrame
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// A schema violates its structural invariants
    #[error("Schema error: {0}")]
    Schema(String),
}

impl Rtcm2Error {
    /// Status code reported to numeric callers. Success is `0` and is never
    /// produced by an error.
    pub fn status(&self) -> i32 {
        match self {
            Rtcm2Error::Syntax(_) => 1,
            Rtcm2Error::MissingField(_) => 2,
            Rtcm2Error::ArrayOverflow { .. } => 3,
            Rtcm2Error::TypeMismatch { .. } => 4,
            Rtcm2Error::UnknownAttribute(_) => 5,
            Rtcm2Error::CheckFailed { .. } => 6,
            Rtcm2Error::MalformedRawWord { .. } => 7,
            Rtcm2Error::Io(_) => 8,
            Rtcm2Error::Utf8(_) => 9,
            Rtcm2Error::Polars(_) => 10,
            Rtcm2Error::Schema(_) => 11,
        }
    }

    /// True for failures raised by the structural (schema) pass.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Rtcm2Error::Syntax(_)
                | Rtcm2Error::MissingField(_)
                | Rtcm2Error::ArrayOverflow { .. }
                | Rtcm2Error::TypeMismatch { .. }
                | Rtcm2Error::UnknownAttribute(_)
                | Rtcm2Error::CheckFailed { .. }
        )
    }

    /// True when a fallback data token was unparseable.
    pub fn is_raw_word(&self) -> bool {
        matches!(self, Rtcm2Error::MalformedRawWord { .. })
    }
}

impl From<serde_json::Error> for Rtcm2Error {
    fn from(err: serde_json::Error) -> Self {
        Rtcm2Error::Syntax(err.to_string())
    }
}
