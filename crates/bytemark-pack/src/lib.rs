//! Descriptor-driven packing and unpacking of binary primitives.
//!
//! A descriptor such as `"I2c4z"` describes a sequence of fixed-layout
//! items (integers, floats, raw bytes, delimited strings, padding); see
//! [`Descriptor`] for the grammar. [`decode`] turns bytes into [`Value`]s,
//! [`encode`] turns values back into bytes, and [`substitute`] expands
//! `%`-placeholder templates into descriptors.

mod decoder;
mod descriptor;
mod encoder;
mod error;
mod template;
mod value;

pub use decoder::{decode, decode_items};
pub use descriptor::{ByteOrder, Descriptor, Item};
pub use encoder::{encode, encode_items};
pub use error::PackError;
pub use template::{substitute, Arg};
pub use value::Value;

/// Total byte length of the layout described by `fmt`.
///
/// Fails with [`PackError::VariableSize`] when the descriptor contains a
/// variable-length item (`z` or `s`).
pub fn size_of(fmt: &str) -> Result<usize, PackError> {
    Descriptor::parse(fmt)?.static_size()
}
