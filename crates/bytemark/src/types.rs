//! Named type descriptors and the process-wide shared registry.
//!
//! A type maps a symbolic name to a descriptor fragment, either verbatim
//! ([`TypeDef::Literal`]) or produced by a function of the call arguments
//! ([`TypeDef::Parametric`]). Every [`crate::Blob`] also carries its own
//! instance registry which shadows the shared one; see
//! [`crate::Blob::resolve`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

use bytemark_pack::{substitute, Arg, PackError};

/// A registered type: a descriptor, or a descriptor generator.
#[derive(Clone)]
pub enum TypeDef {
    /// A fixed descriptor fragment, e.g. `"I2"`.
    Literal(String),
    /// A generator invoked with the caller's arguments.
    Parametric(Arc<dyn Fn(&[Arg]) -> Result<String, PackError> + Send + Sync>),
}

impl TypeDef {
    /// A literal entry.
    pub fn literal(fmt: impl Into<String>) -> Self {
        TypeDef::Literal(fmt.into())
    }

    /// A parametric entry that expands a `%`-placeholder template,
    /// e.g. `TypeDef::template("c%d")`.
    pub fn template(tpl: impl Into<String>) -> Self {
        let tpl = tpl.into();
        TypeDef::Parametric(Arc::new(move |args| substitute(&tpl, args)))
    }

    /// A parametric entry backed by an arbitrary generator function.
    pub fn parametric<F>(f: F) -> Self
    where
        F: Fn(&[Arg]) -> Result<String, PackError> + Send + Sync + 'static,
    {
        TypeDef::Parametric(Arc::new(f))
    }

    /// Produces the descriptor for this entry. Literal entries ignore
    /// `args`; they exist to feed generators only.
    pub fn expand(&self, args: &[Arg]) -> Result<String, PackError> {
        match self {
            TypeDef::Literal(fmt) => Ok(fmt.clone()),
            TypeDef::Parametric(f) => f(args),
        }
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDef::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            TypeDef::Parametric(_) => f.write_str("Parametric(..)"),
        }
    }
}

static SHARED: OnceLock<RwLock<HashMap<String, TypeDef>>> = OnceLock::new();

fn shared() -> &'static RwLock<HashMap<String, TypeDef>> {
    SHARED.get_or_init(|| RwLock::new(defaults()))
}

fn defaults() -> HashMap<String, TypeDef> {
    let mut map = HashMap::new();
    map.insert("byte".to_owned(), TypeDef::literal("c1"));
    map.insert("word".to_owned(), TypeDef::literal("c2"));
    map.insert("dword".to_owned(), TypeDef::literal("c4"));
    map.insert("bytes".to_owned(), TypeDef::template("c%d"));
    map
}

/// Registers `def` under `name` for every cursor in the process.
///
/// Existing entries (including the built-in defaults) are overwritten.
/// Cursors consult the shared registry on every lookup, so a
/// registration is visible to cursors created before it.
pub fn register_shared_type(name: &str, def: TypeDef) {
    shared().write().unwrap().insert(name.to_owned(), def);
}

pub(crate) fn lookup_shared(name: &str) -> Option<TypeDef> {
    shared().read().unwrap().get(name).cloned()
}
