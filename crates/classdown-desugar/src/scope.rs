//! Lexical scopes.
//!
//! Scopes form a parent chain. A class gets its own child scope of the
//! enclosing scope; member bodies resolve names from there, which is where
//! the internal name of a named class expression lives.

use crate::class::{ClassInner, Constructible};
use crate::error::{Result, RuntimeError};
use crate::value::Value;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

#[derive(Clone)]
pub struct Scope(Rc<ScopeData>);

struct ScopeData {
    bindings: RefCell<FxHashMap<Rc<str>, Binding>>,
    parent: Option<Scope>,
}

struct Binding {
    slot: Slot,
    mutable: bool,
}

enum Slot {
    Value(Value),
    /// Declared but not yet initialized (temporal dead zone).
    Uninitialized,
    /// A class referring to itself. Weak so the class scope does not keep
    /// the class alive.
    Class(Weak<ClassInner>),
}

impl Scope {
    /// A scope with no parent.
    pub fn root() -> Self {
        Self(Rc::new(ScopeData {
            bindings: RefCell::new(FxHashMap::default()),
            parent: None,
        }))
    }

    /// A new scope nested in this one.
    pub fn child(&self) -> Self {
        Self(Rc::new(ScopeData {
            bindings: RefCell::new(FxHashMap::default()),
            parent: Some(self.clone()),
        }))
    }

    pub fn parent(&self) -> Option<&Scope> {
        self.0.parent.as_ref()
    }

    /// `let name = value`. Redeclaring replaces the binding.
    pub fn declare(&self, name: &str, value: impl Into<Value>) {
        self.insert(name, Slot::Value(value.into()), true);
    }

    /// `const name = value`
    pub fn declare_const(&self, name: &str, value: impl Into<Value>) {
        self.insert(name, Slot::Value(value.into()), false);
    }

    pub(crate) fn declare_uninitialized(&self, name: &str) {
        self.insert(name, Slot::Uninitialized, false);
    }

    /// Initialize a read-only self reference to a class.
    pub(crate) fn initialize_class(&self, name: &str, class: Weak<ClassInner>) {
        self.insert(name, Slot::Class(class), false);
    }

    fn insert(&self, name: &str, slot: Slot, mutable: bool) {
        self.0
            .bindings
            .borrow_mut()
            .insert(Rc::from(name), Binding { slot, mutable });
    }

    /// Whether this scope itself (not a parent) binds `name`.
    pub fn has_own(&self, name: &str) -> bool {
        self.0.bindings.borrow().contains_key(name)
    }

    /// Whether `name` resolves from this scope, initialized or not.
    pub fn is_bound(&self, name: &str) -> bool {
        let mut current = Some(self);
        while let Some(scope) = current {
            if scope.has_own(name) {
                return true;
            }
            current = scope.parent();
        }
        false
    }

    pub fn resolve(&self, name: &str) -> Result<Value> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if let Some(binding) = scope.0.bindings.borrow().get(name) {
                return match &binding.slot {
                    Slot::Value(value) => Ok(value.clone()),
                    Slot::Uninitialized => Err(RuntimeError::Uninitialized {
                        name: name.to_string(),
                    }),
                    Slot::Class(weak) => weak
                        .upgrade()
                        .map(|inner| Value::Class(Constructible(inner)))
                        .ok_or_else(|| RuntimeError::Reference {
                            name: name.to_string(),
                        }),
                };
            }
            current = scope.parent();
        }
        Err(RuntimeError::Reference {
            name: name.to_string(),
        })
    }

    pub fn assign(&self, name: &str, value: Value) -> Result<()> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if let Some(binding) = scope.0.bindings.borrow_mut().get_mut(name) {
                if matches!(binding.slot, Slot::Uninitialized) {
                    return Err(RuntimeError::Uninitialized {
                        name: name.to_string(),
                    });
                }
                if !binding.mutable {
                    return Err(RuntimeError::ConstAssignment {
                        name: name.to_string(),
                    });
                }
                binding.slot = Slot::Value(value);
                return Ok(());
            }
            current = scope.parent();
        }
        Err(RuntimeError::Reference {
            name: name.to_string(),
        })
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self
            .0
            .bindings
            .borrow()
            .keys()
            .map(|name| name.to_string())
            .collect();
        names.sort();
        f.debug_struct("Scope")
            .field("bindings", &names)
            .field("has_parent", &self.0.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/scope_tests.rs"]
mod tests;
