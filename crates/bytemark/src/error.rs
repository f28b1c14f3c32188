use thiserror::Error;

use bytemark_pack::PackError;

/// Errors raised by [`crate::Blob`] operations.
#[derive(Debug, Error)]
pub enum BlobError {
    /// A type name was not found in the instance or shared registry.
    #[error("unknown type `{0}`")]
    UnknownType(String),

    /// A named marker was referenced before being set.
    #[error("unknown marker `{0}`")]
    UnknownMarker(String),

    /// An anonymous marker was popped with none on the stack.
    #[error("marker stack is empty")]
    EmptyMarkerStack,

    /// A descriptor failed to parse, decode, or encode.
    #[error(transparent)]
    Decode(#[from] PackError),

    /// Reading a buffer from disk failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PartialEq for BlobError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UnknownType(a), Self::UnknownType(b)) => a == b,
            (Self::UnknownMarker(a), Self::UnknownMarker(b)) => a == b,
            (Self::EmptyMarkerStack, Self::EmptyMarkerStack) => true,
            (Self::Decode(a), Self::Decode(b)) => a == b,
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}
