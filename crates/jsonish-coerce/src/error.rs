use core::fmt;

/// Why a coercion attempt failed. Kept `#[non_exhaustive]` so new failure
/// modes can be added without a semver break.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
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

/// A coercion failure: what kind, and a human-readable message describing
/// the specific input that triggered it.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct CoerceError {
    kind: ErrorKind,
    message: String,
}

impl CoerceError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        CoerceError {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch, message)
    }

    pub fn ambiguous(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Ambiguous, message)
    }

    pub fn incomplete(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Incomplete, message)
    }

    pub fn cycle_detected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CycleDetected, message)
    }

    pub fn depth_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DepthExceeded, message)
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationFailed, message)
    }
}

impl From<jsonish_schema::ContextError> for CoerceError {
    fn from(err: jsonish_schema::ContextError) -> Self {
        match err {
            jsonish_schema::ContextError::DepthExceeded => {
                CoerceError::depth_exceeded("maximum recursion depth exceeded")
            }
            jsonish_schema::ContextError::CycleDetected => {
                CoerceError::cycle_detected("schema/value pair already visited")
            }
        }
    }
}

pub type CoerceResult<T> = Result<T, CoerceError>;
