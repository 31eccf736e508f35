use core::fmt;

/// The category of a [`ParseError`], exposed separately from the variant
/// payload so callers can match on kind without needing every field
/// (message, offset) to be part of the match arm.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ParseFailure,
    TypeMismatch,
    Ambiguous,
    Incomplete,
    CycleDetected,
    DepthExceeded,
    ValidationFailed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::ParseFailure => "parse failure",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::Ambiguous => "ambiguous",
            ErrorKind::Incomplete => "incomplete",
            ErrorKind::CycleDetected => "cycle detected",
            ErrorKind::DepthExceeded => "depth exceeded",
            ErrorKind::ValidationFailed => "validation failed",
        };
        f.write_str(s)
    }
}

/// The error surface for [`crate::parse`]. A byte offset is carried when
/// one is known, but is never required — most failures (a whole schema
/// simply didn't fit the input) have no single blamable position.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ParseError {
    kind: ErrorKind,
    message: String,
    offset: Option<usize>,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ParseError {
            kind,
            message: message.into(),
            offset: None,
        }
    }

    #[must_use]
    pub fn at_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }
}

impl From<jsonish_coerce::CoerceError> for ParseError {
    fn from(err: jsonish_coerce::CoerceError) -> Self {
        let kind = match err.kind() {
            jsonish_coerce::ErrorKind::TypeMismatch => ErrorKind::TypeMismatch,
            jsonish_coerce::ErrorKind::Ambiguous => ErrorKind::Ambiguous,
            jsonish_coerce::ErrorKind::Incomplete => ErrorKind::Incomplete,
            jsonish_coerce::ErrorKind::CycleDetected => ErrorKind::CycleDetected,
            jsonish_coerce::ErrorKind::DepthExceeded => ErrorKind::DepthExceeded,
            jsonish_coerce::ErrorKind::ValidationFailed => ErrorKind::ValidationFailed,
            _ => ErrorKind::ParseFailure,
        };
        ParseError::new(kind, err.to_string())
    }
}
