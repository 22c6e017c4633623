//! Error types for object-graph serialization and deserialization.
//!
//! Every failure the engine can report is a variant of [`Error`]. The variants
//! follow the lifecycle of a call:
//!
//! - **Declaration errors** are raised once, when a type's member model is
//!   extracted, and are cached by the [`Registry`](crate::Registry) so later
//!   calls fail the same way.
//! - **Reader errors** (malformed tokens, unexpected end, unknown members,
//!   missing members, overflow, type mismatch, unresolved class keys) carry an
//!   optional character [`Position`].
//! - **I/O errors** wrap failures of the caller-supplied stream.
//!
//! ## Examples
//!
//! ```rust
//! use serde_graph::{Error, ErrorKind, Position};
//!
//! let err = Error::malformed("unexpected character 'z'", Position::at(7));
//! assert_eq!(err.kind(), ErrorKind::MalformedToken);
//! assert!(err.to_string().contains("position 7"));
//! ```

use std::fmt;
use thiserror::Error;

/// 1-based character position of the offending input, if it was recorded.
///
/// Renders as `" at position N"` or as nothing, so it can be appended directly
/// to an error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position(pub Option<usize>);

impl Position {
    /// No position information.
    pub const NONE: Position = Position(None);

    /// A known position.
    #[must_use]
    pub const fn at(position: usize) -> Self {
        Position(Some(position))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(position) => write!(f, " at position {}", position),
            None => Ok(()),
        }
    }
}

/// Represents all possible errors raised while writing or reading an object graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Structurally invalid type declaration
    #[error("Declaration error in '{type_name}': {msg}")]
    Declaration { type_name: String, msg: String },

    /// Class key not known to the registry or to the polymorphic slot
    #[error("Unresolved class key '{key}'{pos}")]
    UnresolvedType { key: String, pos: Position },

    /// Unexpected character or token
    #[error("Malformed token: {msg}{pos}")]
    MalformedToken { msg: String, pos: Position },

    /// Input ended before the value was complete
    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEnd { expected: String },

    /// Tag not present in the target type
    #[error("Unknown member '{tag}' in '{type_name}'{pos}")]
    UnknownMember {
        tag: String,
        type_name: String,
        pos: Position,
    },

    /// A required member never appeared in the input
    #[error("Missing required member '{member}' of '{type_name}'")]
    MissingRequiredMember { member: String, type_name: String },

    /// Numeric literal does not fit the target width
    #[error("Value {literal} is out of range for {target}{pos}")]
    RangeOverflow {
        literal: String,
        target: String,
        pos: Position,
    },

    /// Wire value has the wrong shape for the target
    #[error("Type mismatch: expected {expected}, found {found}{pos}")]
    TypeMismatch {
        expected: String,
        found: String,
        pos: Position,
    },

    /// Delegate handler name not declared on the owning type
    #[error("Unknown handler '{name}' for '{type_name}'{pos}")]
    UnknownHandler {
        name: String,
        type_name: String,
        pos: Position,
    },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

/// Fieldless discriminant of [`Error`], used to compare failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    Declaration,
    UnresolvedType,
    MalformedToken,
    UnexpectedEnd,
    UnknownMember,
    MissingRequiredMember,
    RangeOverflow,
    TypeMismatch,
    UnknownHandler,
    Custom,
}

impl Error {
    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Declaration { .. } => ErrorKind::Declaration,
            Error::UnresolvedType { .. } => ErrorKind::UnresolvedType,
            Error::MalformedToken { .. } => ErrorKind::MalformedToken,
            Error::UnexpectedEnd { .. } => ErrorKind::UnexpectedEnd,
            Error::UnknownMember { .. } => ErrorKind::UnknownMember,
            Error::MissingRequiredMember { .. } => ErrorKind::MissingRequiredMember,
            Error::RangeOverflow { .. } => ErrorKind::RangeOverflow,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::UnknownHandler { .. } => ErrorKind::UnknownHandler,
            Error::Custom(_) => ErrorKind::Custom,
        }
    }

    /// Creates a declaration error for the named type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_graph::Error;
    ///
    /// let err = Error::declaration("Empty", "no serializable members");
    /// assert!(err.to_string().contains("'Empty'"));
    /// ```
    pub fn declaration(type_name: &str, msg: impl fmt::Display) -> Self {
        Error::Declaration {
            type_name: type_name.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates an unresolved class key error.
    pub fn unresolved_type(key: &str, pos: Position) -> Self {
        Error::UnresolvedType {
            key: key.to_string(),
            pos,
        }
    }

    /// Creates a malformed token error.
    pub fn malformed(msg: impl fmt::Display, pos: Position) -> Self {
        Error::MalformedToken {
            msg: msg.to_string(),
            pos,
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_end(expected: &str) -> Self {
        Error::UnexpectedEnd {
            expected: expected.to_string(),
        }
    }

    /// Creates an unknown member error.
    pub fn unknown_member(tag: &str, type_name: &str, pos: Position) -> Self {
        Error::UnknownMember {
            tag: tag.to_string(),
            type_name: type_name.to_string(),
            pos,
        }
    }

    /// Creates a missing required member error.
    pub fn missing_member(member: &str, type_name: &str) -> Self {
        Error::MissingRequiredMember {
            member: member.to_string(),
            type_name: type_name.to_string(),
        }
    }

    /// Creates a numeric range overflow error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_graph::{Error, Position};
    ///
    /// let err = Error::range_overflow("298", "u8", Position::NONE);
    /// assert_eq!(err.to_string(), "Value 298 is out of range for u8");
    /// ```
    pub fn range_overflow(literal: &str, target: &str, pos: Position) -> Self {
        Error::RangeOverflow {
            literal: literal.to_string(),
            target: target.to_string(),
            pos,
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: impl fmt::Display, found: impl fmt::Display, pos: Position) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
            pos,
        }
    }

    /// Creates an unknown delegate handler error.
    pub fn unknown_handler(name: &str, type_name: &str, pos: Position) -> Self {
        Error::UnknownHandler {
            name: name.to_string(),
            type_name: type_name.to_string(),
            pos,
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for stream failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_rendering() {
        assert_eq!(Position::NONE.to_string(), "");
        assert_eq!(Position::at(12).to_string(), " at position 12");
    }

    #[test]
    fn test_kinds_are_distinct_for_end_and_malformed() {
        let end = Error::unexpected_end("value");
        let bad = Error::malformed("unexpected ','", Position::NONE);
        assert_eq!(end.kind(), ErrorKind::UnexpectedEnd);
        assert_eq!(bad.kind(), ErrorKind::MalformedToken);
        assert_ne!(end.kind(), bad.kind());
    }

    #[test]
    fn test_messages_name_the_subject() {
        let err = Error::missing_member("X", "Sample1");
        assert!(err.to_string().contains("'X'"));

        let err = Error::unresolved_type("Q", Position::NONE);
        assert!(err.to_string().contains("'Q'"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err: Error = io.into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("disk gone"));
    }
}
