//! Descriptor parsing: format strings in the `struct`-pack family.
//!
//! A descriptor is a sequence of single-char format options, little-endian
//! unless switched:
//!
//! | option  | meaning                                           |
//! |---------|---------------------------------------------------|
//! | `<`     | little-endian for following items (the default)   |
//! | `>`     | big-endian for following items                    |
//! | `b`/`B` | signed/unsigned 8-bit integer                     |
//! | `h`/`H` | signed/unsigned 16-bit integer                    |
//! | `i[n]`/`I[n]` | signed/unsigned `n`-byte integer, 1..=8, default 4 |
//! | `f`     | IEEE-754 binary32                                 |
//! | `d`     | IEEE-754 binary64                                 |
//! | `c<n>`  | exactly `n` raw bytes (`n` required)              |
//! | `z`     | zero-terminated byte string                       |
//! | `s[n]`  | byte string with `n`-byte length prefix, default 4 |
//! | `x`     | one padding byte, yields no value                 |
//! | space   | ignored                                           |

use crate::error::PackError;

/// Byte order of multi-byte items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// One parsed format item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    /// Signed integer of `size` bytes.
    Int { size: usize, order: ByteOrder },
    /// Unsigned integer of `size` bytes.
    Uint { size: usize, order: ByteOrder },
    /// 32-bit float.
    F32(ByteOrder),
    /// 64-bit float.
    F64(ByteOrder),
    /// Exactly `n` raw bytes.
    Raw(usize),
    /// Zero-terminated byte string; the terminator is consumed but excluded.
    Zstr,
    /// Byte string with an unsigned length prefix of `prefix` bytes.
    Lstr { prefix: usize, order: ByteOrder },
    /// One padding byte; skipped on decode, zero on encode, no value.
    Pad,
}

impl Item {
    /// Whether decoding this item produces a [`crate::Value`].
    pub fn yields_value(&self) -> bool {
        !matches!(self, Item::Pad)
    }
}

/// A parsed descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    items: Vec<Item>,
}

impl Descriptor {
    /// Parses a format string into a descriptor.
    pub fn parse(fmt: &str) -> Result<Self, PackError> {
        let bytes = fmt.as_bytes();
        let mut items = Vec::new();
        let mut order = ByteOrder::Little;
        let mut i = 0;
        while i < bytes.len() {
            let at = i;
            let ch = bytes[i] as char;
            i += 1;
            match ch {
                ' ' | '\t' => {}
                '<' => order = ByteOrder::Little,
                '>' => order = ByteOrder::Big,
                'b' => items.push(Item::Int { size: 1, order }),
                'B' => items.push(Item::Uint { size: 1, order }),
                'h' => items.push(Item::Int { size: 2, order }),
                'H' => items.push(Item::Uint { size: 2, order }),
                'i' => {
                    let size = scan_digits(bytes, &mut i).unwrap_or(4);
                    check_int_size(size)?;
                    items.push(Item::Int { size, order });
                }
                'I' => {
                    let size = scan_digits(bytes, &mut i).unwrap_or(4);
                    check_int_size(size)?;
                    items.push(Item::Uint { size, order });
                }
                'f' => items.push(Item::F32(order)),
                'd' => items.push(Item::F64(order)),
                'c' => {
                    let size = scan_digits(bytes, &mut i).ok_or(PackError::MissingSize('c'))?;
                    items.push(Item::Raw(size));
                }
                'z' => items.push(Item::Zstr),
                's' => {
                    let prefix = scan_digits(bytes, &mut i).unwrap_or(4);
                    check_int_size(prefix)?;
                    items.push(Item::Lstr { prefix, order });
                }
                'x' => items.push(Item::Pad),
                _ => return Err(PackError::BadChar { ch, at }),
            }
        }
        Ok(Self { items })
    }

    /// The parsed items in order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Total byte length of the described layout.
    ///
    /// Fails with [`PackError::VariableSize`] when the descriptor contains a
    /// `z` or `s` option, whose length depends on the data.
    pub fn static_size(&self) -> Result<usize, PackError> {
        let mut total = 0usize;
        for item in &self.items {
            let size = match item {
                Item::Int { size, .. } | Item::Uint { size, .. } => *size,
                Item::F32(_) => 4,
                Item::F64(_) => 8,
                Item::Raw(n) => *n,
                Item::Pad => 1,
                Item::Zstr => return Err(PackError::VariableSize('z')),
                Item::Lstr { .. } => return Err(PackError::VariableSize('s')),
            };
            total = total.saturating_add(size);
        }
        Ok(total)
    }

    /// How many values this descriptor decodes to (padding items yield none).
    pub fn value_arity(&self) -> usize {
        self.items.iter().filter(|i| i.yields_value()).count()
    }
}

/// Scans a run of ASCII digits at `*i`, advancing past it.
fn scan_digits(bytes: &[u8], i: &mut usize) -> Option<usize> {
    let start = *i;
    let mut n = 0usize;
    while *i < bytes.len() && bytes[*i].is_ascii_digit() {
        n = n
            .saturating_mul(10)
            .saturating_add((bytes[*i] - b'0') as usize);
        *i += 1;
    }
    (*i > start).then_some(n)
}

fn check_int_size(size: usize) -> Result<(), PackError> {
    if (1..=8).contains(&size) {
        Ok(())
    } else {
        Err(PackError::SizeOutOfRange(size))
    }
}
