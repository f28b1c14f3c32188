use std::collections::HashMap;

/// Saved positions: an anonymous LIFO stack plus a named map.
///
/// Anonymous markers are one-shot (popped when consumed); named markers
/// stay until explicitly dropped.
#[derive(Debug, Clone, Default)]
pub(crate) struct Markers {
    stack: Vec<usize>,
    named: HashMap<String, usize>,
}

impl Markers {
    pub(crate) fn push(&mut self, pos: usize) {
        self.stack.push(pos);
    }

    pub(crate) fn pop(&mut self) -> Option<usize> {
        self.stack.pop()
    }

    pub(crate) fn set(&mut self, name: &str, pos: usize) {
        self.named.insert(name.to_owned(), pos);
    }

    pub(crate) fn get(&self, name: &str) -> Option<usize> {
        self.named.get(name).copied()
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<usize> {
        self.named.remove(name)
    }

    pub(crate) fn stack_len(&self) -> usize {
        self.stack.len()
    }
}
