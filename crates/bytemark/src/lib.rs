//! Stateful cursor over binary buffers.
//!
//! [`Blob`] wraps an immutable byte buffer and tracks a read position so
//! structured binary data can be walked without hand-maintained offsets.
//! Reads go through descriptor strings (the grammar lives in
//! `bytemark-pack`), positions are saved and restored through markers,
//! alignment padding is computed against arbitrary reference points, and
//! [`Blob::split`] branches independent sub-cursors over a shared buffer.
//!
//! ```
//! use bytemark::{Blob, BlobError, Value};
//!
//! fn main() -> Result<(), BlobError> {
//!     let mut blob = Blob::from_bytes(b"\x02\x00hi".as_slice());
//!     let n = blob.read_one("I2")?.as_uint().unwrap_or(0);
//!     let body = blob.read_with("c%d", &[(n as i64).into()])?;
//!     assert_eq!(body[0], Value::Bytes(b"hi".to_vec()));
//!     Ok(())
//! }
//! ```

mod blob;
mod error;
mod markers;
mod types;

pub use blob::{Blob, PadRef, PadSize};
pub use error::BlobError;
pub use types::{register_shared_type, TypeDef};

pub use bytemark_pack::{Arg, PackError, Value};
