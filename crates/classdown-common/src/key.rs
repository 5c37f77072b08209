//! Property keys.
//!
//! Every member of a class is addressed by a `PropertyKey`: either a string
//! or a symbol. Computed keys are normalized into this form before the
//! method table is built, so nothing downstream special-cases string versus
//! symbolic keys.

use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Global counter for symbol identities. Zero is never handed out.
static NEXT_SYMBOL_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of a symbol.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SymbolId(pub u32);

impl SymbolId {
    /// Allocate a fresh, process-unique identity.
    pub fn fresh() -> Self {
        Self(NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A unique symbolic token with an optional description.
///
/// Two symbols are equal only if they share an identity; the description is
/// informational and never participates in comparisons.
#[derive(Clone, Debug)]
pub struct Symbol {
    id: SymbolId,
    description: Option<Arc<str>>,
}

impl Symbol {
    /// Create a new symbol with a fresh identity.
    pub fn new(description: Option<&str>) -> Self {
        Self {
            id: SymbolId::fresh(),
            description: description.map(Arc::from),
        }
    }

    pub const fn id(&self) -> SymbolId {
        self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description.as_deref().unwrap_or(""))
    }
}

/// A property key: either a string or a symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    String(Arc<str>),
    Symbol(Symbol),
}

impl PropertyKey {
    /// The key every method table reserves for its constructor back-reference.
    pub const CONSTRUCTOR: &'static str = "constructor";

    pub fn string(s: impl AsRef<str>) -> Self {
        Self::String(Arc::from(s.as_ref()))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Symbol(_) => None,
        }
    }

    pub const fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }

    /// Whether this is the string key `"constructor"`.
    pub fn is_constructor(&self) -> bool {
        self.as_str() == Some(Self::CONSTRUCTOR)
    }

    /// Whether the key can be written as a bare identifier (`obj.key`).
    pub fn is_identifier(&self) -> bool {
        let Some(text) = self.as_str() else {
            return false;
        };
        let mut chars = text.chars();
        match chars.next() {
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
            _ => return false,
        }
        chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Symbol(sym) => write!(f, "[{sym}]"),
        }
    }
}

impl Serialize for PropertyKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<Symbol> for PropertyKey {
    fn from(sym: Symbol) -> Self {
        Self::Symbol(sym)
    }
}

impl From<&PropertyKey> for PropertyKey {
    fn from(key: &PropertyKey) -> Self {
        key.clone()
    }
}

#[cfg(test)]
#[path = "../tests/key_tests.rs"]
mod tests;
