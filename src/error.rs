//! Error types for pieceweave.

use std::fmt;

/// Result type alias for pieceweave operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for buffer operations.
///
/// Every variant is raised before any mutation takes place, so a failed call
/// never leaves a partially edited document behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// An external (user-visible) position lies past the end of the text.
    PositionOutOfBounds { position: usize, len: usize },
    /// A range whose start lies after its end, or whose end is out of bounds.
    InvalidRange { start: usize, end: usize, len: usize },
    /// An internal offset outside `0..=len` of a unit buffer.
    InvalidOffset { offset: usize, len: usize },
    /// A [`Document`](crate::Document) whose decoration models cannot seed a table.
    InvalidDocument(String),
}

impl Error {
    /// Whether this error rejects a caller-supplied argument.
    ///
    /// All public editing entry points fail this way; it corresponds to the
    /// "invalid argument" class of the editing API.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::PositionOutOfBounds { .. } | Self::InvalidRange { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PositionOutOfBounds { position, len } => {
                write!(f, "position {position} out of bounds for text of length {len}")
            }
            Self::InvalidRange { start, end, len } => {
                write!(
                    f,
                    "invalid range {start}..{end} for text of length {len}"
                )
            }
            Self::InvalidOffset { offset, len } => {
                write!(f, "internal offset {offset} out of bounds for buffer of length {len}")
            }
            Self::InvalidDocument(reason) => write!(f, "invalid document: {reason}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PositionOutOfBounds {
            position: 12,
            len: 9,
        };
        assert!(err.to_string().contains("position 12"));

        let err = Error::InvalidRange {
            start: 5,
            end: 2,
            len: 9,
        };
        assert!(err.to_string().contains("5..2"));

        let err = Error::InvalidDocument("overlapping models".to_string());
        assert!(err.to_string().contains("overlapping models"));
    }

    #[test]
    fn test_invalid_argument_class() {
        assert!(
            Error::PositionOutOfBounds {
                position: 1,
                len: 0
            }
            .is_invalid_argument()
        );
        assert!(!Error::InvalidOffset { offset: 3, len: 1 }.is_invalid_argument());
    }
}
