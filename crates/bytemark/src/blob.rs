use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use bytemark_pack::{decode, decode_items, substitute, Arg, Descriptor, PackError, Value};

use crate::error::BlobError;
use crate::markers::Markers;
use crate::types::{self, TypeDef};

/// Reference point for [`Blob::pad_from`] alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadRef<'a> {
    /// Align relative to the start of this cursor's view (its base offset).
    Start,
    /// No alignment: advance by exactly the pad size.
    Absolute,
    /// Align relative to a logical position of this cursor.
    Position(usize),
    /// Align relative to a named marker of this cursor.
    Marker(&'a str),
}

/// Pad size for [`Blob::pad`]: a byte count, or a descriptor/type name
/// whose encoded byte length is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadSize<'a> {
    Bytes(usize),
    Of(&'a str),
}

impl From<usize> for PadSize<'static> {
    fn from(n: usize) -> Self {
        PadSize::Bytes(n)
    }
}

impl<'a> From<&'a str> for PadSize<'a> {
    fn from(s: &'a str) -> Self {
        PadSize::Of(s)
    }
}

/// A stateful cursor over an immutable byte buffer.
///
/// A `Blob` tracks a logical position relative to its own base offset,
/// decodes primitives through descriptor strings, saves and restores
/// positions through markers, aligns through [`Blob::pad`], and branches
/// independent sub-cursors through [`Blob::split`]. Positions are 0-based
/// and may point past the end of the buffer; only decoding past the end
/// fails.
#[derive(Debug, Clone)]
pub struct Blob {
    data: Arc<[u8]>,
    base: usize,
    pos: usize,
    markers: Markers,
    types: HashMap<String, TypeDef>,
}

impl Blob {
    /// A cursor over `data`, positioned at 0.
    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            data: data.into(),
            base: 0,
            pos: 0,
            markers: Markers::default(),
            types: HashMap::new(),
        }
    }

    /// A cursor over the contents of the file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BlobError> {
        let data = std::fs::read(path)?;
        Ok(Self::from_bytes(data))
    }

    // ------------------------------------------------------------ accessors

    /// Current logical position, relative to [`Blob::base_offset`].
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Byte offset of logical position 0 in the underlying buffer.
    /// Fixed at construction.
    pub fn base_offset(&self) -> usize {
        self.base
    }

    /// Length of the whole underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes between the absolute position and the buffer end.
    pub fn remaining(&self) -> usize {
        self.data
            .len()
            .saturating_sub(self.base.saturating_add(self.pos))
    }

    pub fn is_eof(&self) -> bool {
        self.remaining() == 0
    }

    /// The whole underlying buffer, including bytes before the base offset.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Depth of the anonymous marker stack.
    pub fn mark_count(&self) -> usize {
        self.markers.stack_len()
    }

    // ----------------------------------------------------- position/markers

    /// Moves the cursor to `pos`, unconditionally. No bounds check:
    /// positions past the end are legal until something decodes there.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Advances by `n` bytes, unconditionally, saturating at
    /// `usize::MAX`. Returns the new position.
    pub fn skip(&mut self, n: usize) -> usize {
        self.pos = self.pos.saturating_add(n);
        self.pos
    }

    /// Records the current position: named markers go to the marker map
    /// (overwriting), anonymous markers push onto the stack. Returns the
    /// recorded position.
    pub fn mark(&mut self, name: Option<&str>) -> usize {
        match name {
            Some(name) => self.markers.set(name, self.pos),
            None => self.markers.push(self.pos),
        }
        self.pos
    }

    /// Discards a marker without moving, returning its position. Named:
    /// removes from the map. Anonymous: pops the stack.
    pub fn drop_mark(&mut self, name: Option<&str>) -> Result<usize, BlobError> {
        match name {
            Some(name) => self
                .markers
                .remove(name)
                .ok_or_else(|| BlobError::UnknownMarker(name.to_owned())),
            None => self.markers.pop().ok_or(BlobError::EmptyMarkerStack),
        }
    }

    /// Moves the cursor back to a marker, returning the restored position.
    ///
    /// Named markers persist: restoring leaves the marker in place, so it
    /// can be restored again. Anonymous markers are one-shot: restoring
    /// pops the stack.
    pub fn restore(&mut self, name: Option<&str>) -> Result<usize, BlobError> {
        let pos = match name {
            Some(name) => self
                .markers
                .get(name)
                .ok_or_else(|| BlobError::UnknownMarker(name.to_owned()))?,
            None => self.markers.pop().ok_or(BlobError::EmptyMarkerStack)?,
        };
        self.pos = pos;
        Ok(pos)
    }

    // -------------------------------------------------------- types/reading

    /// Registers `def` under `name` for this cursor only, shadowing any
    /// shared entry of the same name. Not inherited by [`Blob::split`]
    /// children.
    pub fn register_type(&mut self, name: &str, def: TypeDef) {
        self.types.insert(name.to_owned(), def);
    }

    /// Resolves a registered type name to a descriptor, consulting the
    /// instance registry first and the shared registry second. `args` are
    /// passed to parametric entries and ignored by literal ones.
    pub fn resolve(&self, name: &str, args: &[Arg]) -> Result<String, BlobError> {
        let def = self
            .lookup(name)
            .ok_or_else(|| BlobError::UnknownType(name.to_owned()))?;
        Ok(def.expand(args)?)
    }

    fn lookup(&self, name: &str) -> Option<TypeDef> {
        self.types
            .get(name)
            .cloned()
            .or_else(|| types::lookup_shared(name))
    }

    /// Absolute byte offset of the cursor. Positions are unbounded, so a
    /// sum that does not fit in `usize` is necessarily past the end.
    fn abs_position(&self) -> Result<usize, PackError> {
        self.base
            .checked_add(self.pos)
            .ok_or(PackError::EndOfBuffer { offset: usize::MAX })
    }

    /// Decodes `fmt` at the current position and advances past the decoded
    /// bytes. Returns one value per value-yielding descriptor item. On
    /// failure the position does not move.
    pub fn read(&mut self, fmt: &str) -> Result<Vec<Value>, BlobError> {
        let (values, used) = decode(&self.data, self.abs_position()?, fmt)?;
        self.pos += used;
        Ok(values)
    }

    /// Like [`Blob::read`], after substituting `args` into the
    /// `%`-placeholders of `template`.
    pub fn read_with(&mut self, template: &str, args: &[Arg]) -> Result<Vec<Value>, BlobError> {
        let fmt = substitute(template, args)?;
        self.read(&fmt)
    }

    /// Reads a registered type: resolves `name` (passing `args` to its
    /// generator) and decodes the resulting descriptor.
    pub fn read_type(&mut self, name: &str, args: &[Arg]) -> Result<Vec<Value>, BlobError> {
        let fmt = self.resolve(name, args)?;
        self.read(&fmt)
    }

    /// Reads a descriptor expected to yield at least one value and returns
    /// the first. The cursor still advances past the whole descriptor.
    pub fn read_one(&mut self, fmt: &str) -> Result<Value, BlobError> {
        let desc = Descriptor::parse(fmt).map_err(BlobError::from)?;
        if desc.value_arity() == 0 {
            return Err(BlobError::Decode(PackError::ArityMismatch {
                expected: 1,
                given: 0,
            }));
        }
        let (mut values, used) = decode_items(&self.data, self.abs_position()?, &desc)?;
        self.pos += used;
        Ok(values.remove(0))
    }

    /// Total byte length of `fmt`. Never touches a cursor; named types are
    /// not resolved. Fails for variable-length descriptors (`z`/`s`).
    pub fn size_of(fmt: &str) -> Result<usize, BlobError> {
        Ok(bytemark_pack::size_of(fmt)?)
    }

    // -------------------------------------------------------------- arrays

    /// Runs `f` against this cursor exactly `count` times, strictly in
    /// sequence, collecting the results. A mid-way failure aborts the
    /// remaining iterations but keeps the movement of the completed ones.
    pub fn array<T, F>(&mut self, count: usize, mut f: F) -> Result<Vec<T>, BlobError>
    where
        F: FnMut(&mut Blob) -> Result<T, BlobError>,
    {
        // count may come straight from decoded data; grow as we go.
        let mut out = Vec::new();
        for _ in 0..count {
            out.push(f(self)?);
        }
        Ok(out)
    }

    /// Reads `fmt` `count` times, collecting each iteration's value tuple.
    pub fn array_of(&mut self, count: usize, fmt: &str) -> Result<Vec<Vec<Value>>, BlobError> {
        let desc = Descriptor::parse(fmt).map_err(BlobError::from)?;
        let mut out = Vec::new();
        for _ in 0..count {
            let (values, used) = decode_items(&self.data, self.abs_position()?, &desc)?;
            self.pos += used;
            out.push(values);
        }
        Ok(out)
    }

    /// [`Blob::array_of`] after template substitution.
    pub fn array_with(
        &mut self,
        count: usize,
        template: &str,
        args: &[Arg],
    ) -> Result<Vec<Vec<Value>>, BlobError> {
        let fmt = substitute(template, args)?;
        self.array_of(count, &fmt)
    }

    // ------------------------------------------------------------- padding

    /// Aligns the cursor relative to the start of its view; shorthand for
    /// `pad_from(size, PadRef::Start)`. Returns the new position.
    pub fn pad<'a>(&mut self, size: impl Into<PadSize<'a>>) -> Result<usize, BlobError> {
        self.pad_from(size, PadRef::Start)
    }

    /// Advances to the next position aligned to `size` bytes relative to
    /// `reference`, or (for [`PadRef::Absolute`]) by exactly `size`.
    ///
    /// A size of 0 or 1 is a no-op in alignment mode, and an already
    /// aligned cursor does not move. `size` may be a byte count or a
    /// descriptor/type-name string; registered names resolve through the
    /// instance-then-shared registries (parametric entries are expanded
    /// with no arguments), anything else is parsed as a raw descriptor.
    /// On failure the position does not move. Returns the new position.
    pub fn pad_from<'a>(
        &mut self,
        size: impl Into<PadSize<'a>>,
        reference: PadRef<'_>,
    ) -> Result<usize, BlobError> {
        let step = match size.into() {
            PadSize::Bytes(n) => n,
            PadSize::Of(unit) => self.pad_width(unit)?,
        };
        // Absolute positions can exceed usize; the congruence runs in i128.
        let reference = match reference {
            PadRef::Start => Some(self.base as i128),
            PadRef::Absolute => None,
            PadRef::Position(p) => Some(p as i128 + self.base as i128),
            PadRef::Marker(name) => {
                let pos = self
                    .markers
                    .get(name)
                    .ok_or_else(|| BlobError::UnknownMarker(name.to_owned()))?;
                Some(pos as i128 + self.base as i128)
            }
        };
        match reference {
            None => self.pos = self.pos.saturating_add(step),
            Some(r) if step > 1 => {
                // The reference may sit ahead of the cursor; rem_euclid
                // keeps the distance-to-alignment in 0..step either way.
                let p = self.base as i128 + self.pos as i128;
                let delta = (r - p).rem_euclid(step as i128) as usize;
                self.pos = self.pos.saturating_add(delta);
            }
            Some(_) => {}
        }
        Ok(self.pos)
    }

    /// Byte width of a pad size given as a string: a registered type name,
    /// or failing that a raw descriptor.
    fn pad_width(&self, unit: &str) -> Result<usize, BlobError> {
        let fmt = match self.lookup(unit) {
            Some(def) => def.expand(&[])?,
            None => unit.to_owned(),
        };
        Ok(bytemark_pack::size_of(&fmt)?)
    }

    // ----------------------------------------------------------- branching

    /// Branches an independent sub-cursor rooted at the current absolute
    /// position: same buffer, position 0, no markers, no instance types.
    ///
    /// With `length` given, this cursor advances past the branched region
    /// by exactly `length`; the child itself is never advanced and is not
    /// clamped to `length` (the buffer end is its only limit).
    pub fn split(&mut self, length: Option<usize>) -> Blob {
        let child = Blob {
            data: Arc::clone(&self.data),
            base: self.base.saturating_add(self.pos),
            pos: 0,
            markers: Markers::default(),
            types: HashMap::new(),
        };
        if let Some(n) = length {
            self.pos = self.pos.saturating_add(n);
        }
        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_advances() {
        let mut blob = Blob::from_bytes(b"\x01\x00\x02\x00".as_slice());
        assert_eq!(blob.read("H").unwrap(), vec![Value::Uint(1)]);
        assert_eq!(blob.position(), 2);
        assert_eq!(blob.read("H").unwrap(), vec![Value::Uint(2)]);
        assert_eq!(blob.position(), 4);
        assert!(blob.is_eof());
    }

    #[test]
    fn test_failed_read_keeps_position() {
        let mut blob = Blob::from_bytes(b"ab".as_slice());
        blob.seek(1);
        assert!(matches!(
            blob.read("I4"),
            Err(BlobError::Decode(PackError::EndOfBuffer { offset: 1 }))
        ));
        assert_eq!(blob.position(), 1);
    }

    #[test]
    fn test_seek_past_end_is_legal() {
        let mut blob = Blob::from_bytes(b"ab".as_slice());
        blob.seek(100);
        assert_eq!(blob.position(), 100);
        assert_eq!(blob.remaining(), 0);
        assert!(blob.read("B").is_err());
        assert_eq!(blob.position(), 100);
    }

    #[test]
    fn test_split_frames() {
        let mut parent = Blob::from_bytes(b"xkcdabcd".as_slice());
        parent.seek(2);
        let mut child = parent.split(None);
        assert_eq!(parent.position(), 2);
        assert_eq!(child.base_offset(), 2);
        assert_eq!(child.position(), 0);
        assert_eq!(child.read("c2").unwrap(), vec![Value::Bytes(b"cd".to_vec())]);
        assert_eq!(parent.position(), 2);
    }

    #[test]
    fn test_split_with_length_advances_parent() {
        let mut parent = Blob::from_bytes(b"xkcdabcd".as_slice());
        parent.seek(2);
        let child = parent.split(Some(3));
        assert_eq!(parent.position(), 5);
        assert_eq!(child.position(), 0);
        assert_eq!(child.base_offset(), 2);
    }

    #[test]
    fn test_instance_registry_shadows_shared() {
        let mut blob = Blob::from_bytes(b"abcd".as_slice());
        assert_eq!(blob.resolve("word", &[]).unwrap(), "c2");
        blob.register_type("word", TypeDef::literal("c1"));
        assert_eq!(blob.resolve("word", &[]).unwrap(), "c1");
        // Shadowing is per cursor; a fresh cursor still sees the default.
        let other = Blob::from_bytes(b"abcd".as_slice());
        assert_eq!(other.resolve("word", &[]).unwrap(), "c2");
    }

    #[test]
    fn test_pad_width_from_descriptor_and_name() {
        let mut blob = Blob::from_bytes(vec![0u8; 64]);
        blob.seek(1);
        assert_eq!(blob.pad("dword").unwrap(), 4);
        blob.seek(5);
        assert_eq!(blob.pad("I2 I2").unwrap(), 8);
        assert!(matches!(
            blob.pad("z"),
            Err(BlobError::Decode(PackError::VariableSize('z')))
        ));
        assert_eq!(blob.position(), 8);
    }

    #[test]
    fn test_pad_size_from_a_runtime_string() {
        let mut blob = Blob::from_bytes(vec![0u8; 64]);
        blob.seek(3);
        let unit = String::from("word");
        assert_eq!(blob.pad(unit.as_str()).unwrap(), 4);
        assert_eq!(blob.pad_from(unit.as_str(), PadRef::Start).unwrap(), 4);
    }

    #[test]
    fn test_read_one_multi_item_descriptor() {
        let mut blob = Blob::from_bytes(b"\x05\x07".as_slice());
        let v = blob.read_one("B B").unwrap();
        assert_eq!(v, Value::Uint(5));
        // Advances past the whole descriptor, not just the first item.
        assert_eq!(blob.position(), 2);
    }

    #[test]
    fn test_read_one_requires_a_value() {
        let mut blob = Blob::from_bytes(b"\x05\x07".as_slice());
        assert!(matches!(
            blob.read_one("x"),
            Err(BlobError::Decode(PackError::ArityMismatch {
                expected: 1,
                given: 0
            }))
        ));
        assert_eq!(blob.position(), 0);
    }
}
