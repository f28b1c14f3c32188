//! Encoding of values into binary data driven by a [`Descriptor`].

use crate::descriptor::{ByteOrder, Descriptor, Item};
use crate::error::PackError;
use crate::value::Value;

/// Encodes `values` according to `fmt`.
///
/// The number of values must match the descriptor's arity exactly; padding
/// items emit a zero byte and consume no value.
pub fn encode(fmt: &str, values: &[Value]) -> Result<Vec<u8>, PackError> {
    let desc = Descriptor::parse(fmt)?;
    encode_items(&desc, values)
}

/// Encodes `values` according to an already-parsed descriptor.
pub fn encode_items(desc: &Descriptor, values: &[Value]) -> Result<Vec<u8>, PackError> {
    let expected = desc.value_arity();
    if values.len() != expected {
        return Err(PackError::ArityMismatch {
            expected,
            given: values.len(),
        });
    }
    let mut out = Vec::new();
    let mut next = 0usize;
    for item in desc.items() {
        if item.yields_value() {
            encode_one(&mut out, item, &values[next])?;
            next += 1;
        } else {
            out.push(0);
        }
    }
    Ok(out)
}

fn encode_one(out: &mut Vec<u8>, item: &Item, value: &Value) -> Result<(), PackError> {
    match *item {
        Item::Int { size, order } => {
            let v = integral(value, 'i')?;
            let (min, max) = int_bounds(size);
            if v < min || v > max {
                return Err(PackError::OutOfRange('i'));
            }
            push_uint(out, size, order, v as u64);
        }
        Item::Uint { size, order } => {
            let v = integral(value, 'I')?;
            if v < 0 || v as u128 > uint_max(size) {
                return Err(PackError::OutOfRange('I'));
            }
            push_uint(out, size, order, v as u64);
        }
        Item::F32(order) => {
            let v = float(value, 'f')? as f32;
            match order {
                ByteOrder::Little => out.extend_from_slice(&v.to_le_bytes()),
                ByteOrder::Big => out.extend_from_slice(&v.to_be_bytes()),
            }
        }
        Item::F64(order) => {
            let v = float(value, 'd')?;
            match order {
                ByteOrder::Little => out.extend_from_slice(&v.to_le_bytes()),
                ByteOrder::Big => out.extend_from_slice(&v.to_be_bytes()),
            }
        }
        Item::Raw(n) => {
            let bytes = byte_string(value, 'c')?;
            if bytes.len() != n {
                return Err(PackError::LengthMismatch {
                    expected: n,
                    given: bytes.len(),
                });
            }
            out.extend_from_slice(bytes);
        }
        Item::Zstr => {
            let bytes = byte_string(value, 'z')?;
            if bytes.contains(&0) {
                return Err(PackError::InteriorZero);
            }
            out.extend_from_slice(bytes);
            out.push(0);
        }
        Item::Lstr { prefix, order } => {
            let bytes = byte_string(value, 's')?;
            if bytes.len() as u128 > uint_max(prefix) {
                return Err(PackError::LengthOverflow(prefix));
            }
            push_uint(out, prefix, order, bytes.len() as u64);
            out.extend_from_slice(bytes);
        }
        Item::Pad => out.push(0),
    }
    Ok(())
}

/// Appends the low `size` bytes of `raw` in the given byte order.
fn push_uint(out: &mut Vec<u8>, size: usize, order: ByteOrder, raw: u64) {
    match order {
        ByteOrder::Little => out.extend_from_slice(&raw.to_le_bytes()[..size]),
        ByteOrder::Big => out.extend_from_slice(&raw.to_be_bytes()[8 - size..]),
    }
}

fn integral(value: &Value, opt: char) -> Result<i128, PackError> {
    match value {
        Value::Int(v) => Ok(i128::from(*v)),
        Value::Uint(v) => Ok(i128::from(*v)),
        _ => Err(PackError::TypeMismatch {
            opt,
            expected: "an integer",
        }),
    }
}

fn float(value: &Value, opt: char) -> Result<f64, PackError> {
    match value {
        Value::Float(v) => Ok(*v),
        _ => Err(PackError::TypeMismatch {
            opt,
            expected: "a float",
        }),
    }
}

fn byte_string<'a>(value: &'a Value, opt: char) -> Result<&'a [u8], PackError> {
    match value {
        Value::Bytes(b) => Ok(b),
        _ => Err(PackError::TypeMismatch {
            opt,
            expected: "a byte string",
        }),
    }
}

fn int_bounds(size: usize) -> (i128, i128) {
    let max = (1i128 << (8 * size as u32 - 1)) - 1;
    (-max - 1, max)
}

fn uint_max(size: usize) -> u128 {
    (1u128 << (8 * size as u32)) - 1
}
