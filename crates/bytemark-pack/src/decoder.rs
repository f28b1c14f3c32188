//! Decoding of binary data driven by a [`Descriptor`].

use crate::descriptor::{ByteOrder, Descriptor, Item};
use crate::error::PackError;
use crate::value::Value;

/// Decodes `fmt` against `buf` starting at `offset`.
///
/// Returns the decoded values together with the number of bytes consumed.
/// Padding items consume a byte but yield no value. On error the buffer is
/// untouched and no partial values are returned.
pub fn decode(buf: &[u8], offset: usize, fmt: &str) -> Result<(Vec<Value>, usize), PackError> {
    let desc = Descriptor::parse(fmt)?;
    decode_items(buf, offset, &desc)
}

/// Decodes an already-parsed descriptor against `buf` starting at `offset`.
pub fn decode_items(
    buf: &[u8],
    offset: usize,
    desc: &Descriptor,
) -> Result<(Vec<Value>, usize), PackError> {
    let mut cur = Cur::new(buf, offset);
    let mut values = Vec::with_capacity(desc.value_arity());
    for item in desc.items() {
        match *item {
            Item::Int { size, order } => {
                let bytes = cur.take(size)?;
                values.push(Value::Int(int_from_bytes(bytes, order)));
            }
            Item::Uint { size, order } => {
                let bytes = cur.take(size)?;
                values.push(Value::Uint(uint_from_bytes(bytes, order)));
            }
            Item::F32(order) => {
                let bytes = cur.take(4)?;
                let raw = [bytes[0], bytes[1], bytes[2], bytes[3]];
                let v = match order {
                    ByteOrder::Little => f32::from_le_bytes(raw),
                    ByteOrder::Big => f32::from_be_bytes(raw),
                };
                values.push(Value::Float(f64::from(v)));
            }
            Item::F64(order) => {
                let bytes = cur.take(8)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(bytes);
                let v = match order {
                    ByteOrder::Little => f64::from_le_bytes(raw),
                    ByteOrder::Big => f64::from_be_bytes(raw),
                };
                values.push(Value::Float(v));
            }
            Item::Raw(n) => {
                let bytes = cur.take(n)?;
                values.push(Value::Bytes(bytes.to_vec()));
            }
            Item::Zstr => values.push(Value::Bytes(cur.take_zstr()?)),
            Item::Lstr { prefix, order } => {
                let bytes = cur.take(prefix)?;
                let len = uint_from_bytes(bytes, order);
                let len = usize::try_from(len)
                    .map_err(|_| PackError::EndOfBuffer { offset: cur.pos })?;
                let payload = cur.take(len)?;
                values.push(Value::Bytes(payload.to_vec()));
            }
            Item::Pad => {
                cur.take(1)?;
            }
        }
    }
    Ok((values, cur.pos - offset))
}

/// Byte scanner over a borrowed buffer.
struct Cur<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cur<'a> {
    fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    /// Takes the next `n` bytes, failing without moving when they are not
    /// all present.
    fn take(&mut self, n: usize) -> Result<&'a [u8], PackError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(PackError::EndOfBuffer { offset: self.pos })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Takes bytes up to the next zero byte, consuming but excluding it.
    fn take_zstr(&mut self) -> Result<Vec<u8>, PackError> {
        let tail = self
            .data
            .get(self.pos..)
            .ok_or(PackError::EndOfBuffer { offset: self.pos })?;
        let nul = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or(PackError::MissingTerminator)?;
        let bytes = tail[..nul].to_vec();
        self.pos += nul + 1;
        Ok(bytes)
    }
}

fn uint_from_bytes(bytes: &[u8], order: ByteOrder) -> u64 {
    match order {
        ByteOrder::Little => bytes
            .iter()
            .rev()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)),
        ByteOrder::Big => bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)),
    }
}

fn int_from_bytes(bytes: &[u8], order: ByteOrder) -> i64 {
    let raw = uint_from_bytes(bytes, order);
    sign_extend(raw, bytes.len())
}

/// Sign-extends a `size`-byte two's-complement value held in the low bytes.
fn sign_extend(raw: u64, size: usize) -> i64 {
    debug_assert!((1..=8).contains(&size));
    let shift = 64 - 8 * size as u32;
    ((raw << shift) as i64) >> shift
}
