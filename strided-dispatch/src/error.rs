use strided_view::StridedError;

/// Failure category, for callers that only care about the class of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An argument has the wrong kind (e.g. a number where an array is expected).
    Type,
    /// An argument is outside its numeric domain or a view overruns its buffer.
    Range,
    /// The call supplied the wrong number of arguments.
    Arity,
}

/// Errors raised by dtype resolution, dispatch table construction and
/// dispatched calls.
///
/// Every call-time error is raised before any output element is written.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error("insufficient arguments: expected {expected}, got {got}")]
    InsufficientArguments { expected: usize, got: usize },

    #[error("too many arguments: expected {expected}, got {got}")]
    TooManyArguments { expected: usize, got: usize },

    #[error("argument {index}: expected {expected}")]
    InvalidArgument { index: usize, expected: &'static str },

    #[error("argument {index}: output arrays must be passed mutably")]
    ReadOnlyOutput { index: usize },

    #[error("unknown data type: {0}")]
    UnknownDType(String),

    #[error("argument {index}: value {value} is out of range")]
    ArgumentOutOfRange { index: usize, value: i64 },

    #[error("argument {index}: offset must be non-negative, got {offset}")]
    NegativeOffset { index: usize, offset: i64 },

    #[error("argument {index}: view touches buffer indices [{min}, {max}] but the array has {len} elements")]
    InsufficientElements {
        index: usize,
        len: usize,
        min: isize,
        max: isize,
    },

    #[error("invalid dispatch table: {0}")]
    InvalidTable(String),

    #[error(transparent)]
    Strided(#[from] StridedError),
}

impl DispatchError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::InsufficientArguments { .. } | DispatchError::TooManyArguments { .. } => {
                ErrorKind::Arity
            }
            DispatchError::InvalidArgument { .. }
            | DispatchError::ReadOnlyOutput { .. }
            | DispatchError::UnknownDType(_)
            | DispatchError::InvalidTable(_) => ErrorKind::Type,
            DispatchError::ArgumentOutOfRange { .. }
            | DispatchError::NegativeOffset { .. }
            | DispatchError::InsufficientElements { .. }
            | DispatchError::Strided(_) => ErrorKind::Range,
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let arity = DispatchError::TooManyArguments {
            expected: 3,
            got: 4,
        };
        assert_eq!(arity.kind(), ErrorKind::Arity);
        let ty = DispatchError::InvalidArgument {
            index: 1,
            expected: "array",
        };
        assert_eq!(ty.kind(), ErrorKind::Type);
        let range: DispatchError = StridedError::OffsetOverflow.into();
        assert_eq!(range.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_messages() {
        let err = DispatchError::InsufficientArguments {
            expected: 5,
            got: 2,
        };
        assert_eq!(
            err.to_string(),
            "insufficient arguments: expected 5, got 2"
        );
        let err: DispatchError = StridedError::UnreachableIndex(3).into();
        assert_eq!(err.to_string(), "buffer index 3 is not reachable by the view");
    }
}
