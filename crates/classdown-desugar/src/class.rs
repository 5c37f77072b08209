//! The Constructible: the built, immutable unit a class desugars into.

use crate::engine::DesugarOptions;
use crate::error::{Result, RuntimeError};
use crate::instantiate;
use crate::method_table::MethodTable;
use crate::scope::Scope;
use crate::value::{Function, Value};
use classdown_common::PropertyKey;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// How a class is being entered.
///
/// Both call paths funnel into [`Constructible::enter`], which checks this
/// flag before anything else runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallMode {
    /// The instantiation protocol (`new C(...)`).
    Construct,
    /// A plain call (`C(...)`). Always rejected.
    Call,
}

/// One field, initialized per instance in declaration order.
#[derive(Clone, Debug)]
pub struct FieldInitializer {
    pub(crate) key: PropertyKey,
    pub(crate) init: Option<Function>,
}

impl FieldInitializer {
    pub fn key(&self) -> &PropertyKey {
        &self.key
    }

    /// `None` when the field was declared without an initializer.
    pub fn initializer(&self) -> Option<&Function> {
        self.init.as_ref()
    }
}

pub(crate) struct ClassInner {
    /// Display name: the internal name, else the inferred binding name.
    pub(crate) name: Rc<str>,
    pub(crate) internal_name: Option<Rc<str>>,
    pub(crate) constructor: Function,
    pub(crate) fields: Vec<FieldInitializer>,
    pub(crate) table: Rc<MethodTable>,
    pub(crate) scope: Scope,
    pub(crate) options: DesugarOptions,
}

/// A desugared class: constructor body, field initializers and the shared
/// method table. Cheap to clone; clones are the same class.
#[derive(Clone)]
pub struct Constructible(pub(crate) Rc<ClassInner>);

impl Constructible {
    /// The name used in diagnostics. Empty for anonymous, unbound classes.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The name visible from member bodies, if the class was named.
    pub fn internal_name(&self) -> Option<&str> {
        self.0.internal_name.as_deref()
    }

    /// Declared constructor parameter count.
    pub fn length(&self) -> usize {
        self.0.constructor.length()
    }

    pub fn constructor_params(&self) -> impl Iterator<Item = &str> {
        self.0.constructor.params()
    }

    pub(crate) fn constructor_body(&self) -> &Function {
        &self.0.constructor
    }

    /// The shared method table. Every instance links to this exact table.
    pub fn method_table(&self) -> &Rc<MethodTable> {
        &self.0.table
    }

    pub fn field_initializers(&self) -> &[FieldInitializer] {
        &self.0.fields
    }

    /// The class scope member bodies resolve names from.
    pub fn scope(&self) -> &Scope {
        &self.0.scope
    }

    pub fn options(&self) -> DesugarOptions {
        self.0.options
    }

    /// Create an instance. The only sanctioned construction path.
    pub fn instantiate(&self, args: &[Value]) -> Result<Value> {
        self.enter(CallMode::Construct, args, 1)
    }

    /// Call the class like a plain function. Always fails.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        self.enter(CallMode::Call, args, 1)
    }

    pub(crate) fn enter(&self, mode: CallMode, args: &[Value], depth: u32) -> Result<Value> {
        match mode {
            CallMode::Construct => instantiate::instantiate_at(self, args, depth),
            CallMode::Call => {
                debug!(class = %self.name(), "direct call rejected by invocation guard");
                Err(RuntimeError::Invocation {
                    class_name: self.name().to_string(),
                })
            }
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Constructible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructible")
            .field("name", &self.name())
            .field("internal_name", &self.internal_name())
            .field("fields", &self.0.fields.len())
            .field("members", &self.0.table.len())
            .finish()
    }
}
