//! Pack/unpack error type.

use thiserror::Error;

/// Error type for descriptor parsing, decoding, and encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PackError {
    #[error("unexpected end of buffer at offset {offset}")]
    EndOfBuffer { offset: usize },
    #[error("invalid format char `{ch}` at byte {at}")]
    BadChar { ch: char, at: usize },
    #[error("missing size for format option `{0}`")]
    MissingSize(char),
    #[error("integral size {0} out of range 1..=8")]
    SizeOutOfRange(usize),
    #[error("format option `{0}` has no fixed size")]
    VariableSize(char),
    #[error("unterminated zero-string")]
    MissingTerminator,
    #[error("value count mismatch: expected {expected}, got {given}")]
    ArityMismatch { expected: usize, given: usize },
    #[error("value for option `{opt}` must be {expected}")]
    TypeMismatch { opt: char, expected: &'static str },
    #[error("integer does not fit format option `{0}`")]
    OutOfRange(char),
    #[error("byte string length {given} does not match `c{expected}`")]
    LengthMismatch { expected: usize, given: usize },
    #[error("byte string does not fit a {0}-byte length prefix")]
    LengthOverflow(usize),
    #[error("zero-string contains an interior zero byte")]
    InteriorZero,
    #[error("missing argument for placeholder `%{0}`")]
    MissingArg(char),
    #[error("argument for placeholder `%{0}` has the wrong type")]
    BadArg(char),
    #[error("unsupported placeholder `%{0}`")]
    BadPlaceholder(char),
    #[error("dangling `%` at end of descriptor template")]
    DanglingPercent,
}
