//! Desugaring Engine
//!
//! Turns one `ClassDescriptor` into one `Constructible`:
//!
//! 1. open the class scope (internal name declared, uninitialized)
//! 2. evaluate member keys in declaration order
//! 3. reject reserved and conflicting keys
//! 4. build the method table and the field list
//! 5. wire the constructor body and the back-reference from the table
//! 6. initialize the internal name
//!
//! Steps 1 to 6 run once, synchronously. If any of them fails no
//! `Constructible` exists; side effects of computed keys that already ran
//! are not undone.

use crate::class::{ClassInner, Constructible, FieldInitializer};
use crate::descriptor::{ClassDescriptor, Member, MemberKind};
use crate::error::{Result, RuntimeError};
use crate::keys::evaluate_keys;
use crate::method_table::MethodTableBuilder;
use crate::naming::{bind_internal_name, enter_class_scope};
use crate::scope::Scope;
use crate::value::{Body, Function, FunctionKind, Value, body};
use classdown_common::PropertyKey;
use classdown_common::limits::{MAX_CALL_DEPTH, MAX_GENERATOR_YIELDS};
use rustc_hash::{FxHashMap, FxHashSet};
use std::rc::{Rc, Weak};
use tracing::{Level, debug, span, trace};

/// Resource limits captured by every function a class owns.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DesugarOptions {
    /// Nested body invocations allowed before `CallDepthExceeded`.
    pub max_call_depth: u32,
    /// Values a single generator method call may yield.
    pub max_generator_yields: usize,
}

impl Default for DesugarOptions {
    fn default() -> Self {
        Self {
            max_call_depth: MAX_CALL_DEPTH,
            max_generator_yields: MAX_GENERATOR_YIELDS,
        }
    }
}

impl DesugarOptions {
    pub const fn with_max_call_depth(mut self, depth: u32) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub const fn with_max_generator_yields(mut self, limit: usize) -> Self {
        self.max_generator_yields = limit;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct Desugarer {
    options: DesugarOptions,
}

impl Desugarer {
    pub const fn new(options: DesugarOptions) -> Self {
        Self { options }
    }

    pub const fn options(&self) -> DesugarOptions {
        self.options
    }

    /// Elaborate a class expression. Nothing is bound in the enclosing scope.
    pub fn build(&self, descriptor: ClassDescriptor) -> Result<Constructible> {
        self.elaborate(descriptor, None)
    }

    /// Elaborate an anonymous class expression assigned to `hint`
    /// (`let Foo = class { ... }`). The hint only names the class for
    /// diagnostics; member bodies cannot resolve it through the class scope.
    pub fn build_named(&self, descriptor: ClassDescriptor, hint: &str) -> Result<Constructible> {
        self.elaborate(descriptor, Some(hint))
    }

    /// Elaborate a class declaration (`class Foo { ... }`) and bind its
    /// name in the enclosing scope.
    pub fn declare(&self, descriptor: ClassDescriptor) -> Result<Constructible> {
        let Some(name) = descriptor.name.clone() else {
            return Err(RuntimeError::type_error("A class declaration requires a name"));
        };
        let enclosing = descriptor.scope.clone();
        let class = self.elaborate(descriptor, None)?;
        enclosing.declare(&name, Value::Class(class.clone()));
        Ok(class)
    }

    fn elaborate(&self, descriptor: ClassDescriptor, hint: Option<&str>) -> Result<Constructible> {
        let ClassDescriptor {
            name,
            mut members,
            constructor,
            scope: enclosing,
        } = descriptor;
        members.sort_by_key(|member| member.position);

        let internal_name: Option<Rc<str>> = name.as_deref().map(Rc::from);
        let display_name: Rc<str> = internal_name
            .clone()
            .or_else(|| hint.map(Rc::from))
            .unwrap_or_else(|| Rc::from(""));

        let span = span!(Level::DEBUG, "desugar", class = %display_name);
        let _enter = span.enter();

        let scope = enter_class_scope(&enclosing, internal_name.as_deref());
        let keys = evaluate_keys(&members, &scope, self.options)?;
        check_members(&members, &keys)?;

        let options = self.options;
        let inner = Rc::new_cyclic(|weak: &Weak<ClassInner>| {
            let mut table = MethodTableBuilder::new();
            let mut fields = Vec::new();
            for (member, key) in members.iter().zip(&keys) {
                define_member(&mut table, &mut fields, member, key, &scope, options);
            }

            let (params, ctor_body) = match constructor {
                Some(ctor) => (ctor.params, ctor.body.unwrap_or_else(empty_body)),
                None => (Vec::new(), empty_body()),
            };
            let constructor = Function::member(
                &display_name,
                FunctionKind::Constructor,
                &params,
                ctor_body,
                &scope,
                options,
            );

            ClassInner {
                name: display_name.clone(),
                internal_name: internal_name.clone(),
                constructor,
                fields,
                table: Rc::new(table.finish(weak.clone())),
                scope: scope.clone(),
                options,
            }
        });

        if let Some(name) = &internal_name {
            bind_internal_name(&scope, name, Rc::downgrade(&inner));
        }

        let class = Constructible(inner);
        debug!(
            class = %class.name(),
            members = class.method_table().len(),
            fields = class.field_initializers().len(),
            "class desugared"
        );
        Ok(class)
    }
}

/// Elaborate a class expression with default options.
pub fn desugar(descriptor: ClassDescriptor) -> Result<Constructible> {
    Desugarer::default().build(descriptor)
}

fn empty_body() -> Body {
    body(|_| Ok(Value::Undefined))
}

/// `constructor` is reserved for the table's back-reference, and a key
/// cannot be both a per-instance field and a table entry.
fn check_members(members: &[Member], keys: &[PropertyKey]) -> Result<()> {
    let mut table_keys: FxHashSet<&PropertyKey> = FxHashSet::default();
    let mut field_keys: FxHashMap<&PropertyKey, usize> = FxHashMap::default();
    for (index, (member, key)) in members.iter().zip(keys).enumerate() {
        if key.is_constructor() {
            return Err(RuntimeError::ReservedConstructorKey { index });
        }
        if member.kind == MemberKind::Field {
            field_keys.entry(key).or_insert(index);
        } else {
            table_keys.insert(key);
        }
    }

    let mut conflicts: Vec<(usize, &PropertyKey)> = field_keys
        .into_iter()
        .filter(|(key, _)| table_keys.contains(key))
        .map(|(key, index)| (index, key))
        .collect();
    conflicts.sort_by_key(|(index, _)| *index);
    match conflicts.first() {
        Some((_, key)) => Err(RuntimeError::MemberConflict {
            key: (*key).clone(),
        }),
        None => Ok(()),
    }
}

fn define_member(
    table: &mut MethodTableBuilder,
    fields: &mut Vec<FieldInitializer>,
    member: &Member,
    key: &PropertyKey,
    scope: &Scope,
    options: DesugarOptions,
) {
    let name = function_name(key);
    let make = |kind: FunctionKind, name: &str, body: Body| {
        Function::member(name, kind, &member.params, body, scope, options)
    };
    if member.kind == MemberKind::Field {
        trace!(key = %key, "field");
        fields.push(FieldInitializer {
            key: key.clone(),
            init: member
                .body
                .clone()
                .map(|init| make(FunctionKind::FieldInitializer, &name, init)),
        });
        return;
    }

    // A bodiless method or accessor behaves as an empty one.
    let body = member.body.clone().unwrap_or_else(empty_body);
    match member.kind {
        MemberKind::Getter => {
            table.define_getter(key.clone(), make(FunctionKind::Getter, &format!("get {name}"), body));
        }
        MemberKind::Setter => {
            table.define_setter(key.clone(), make(FunctionKind::Setter, &format!("set {name}"), body));
        }
        _ => {
            let kind = if member.is_generator {
                FunctionKind::Generator
            } else {
                FunctionKind::Method
            };
            table.define_method(key.clone(), make(kind, &name, body));
        }
    }
}

/// The `name` a member function reports: symbol keys use their description
/// in brackets.
fn function_name(key: &PropertyKey) -> String {
    match key {
        PropertyKey::String(s) => s.to_string(),
        PropertyKey::Symbol(sym) => match sym.description() {
            Some(description) => format!("[{description}]"),
            None => String::new(),
        },
    }
}

#[cfg(test)]
#[path = "../tests/engine_tests.rs"]
mod tests;
