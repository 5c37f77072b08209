//! Class descriptors: the parsed, language-agnostic form of a class body.
//!
//! A parser (or an embedder writing classes by hand) produces one
//! `ClassDescriptor` per class construct. The engine consumes it once.
//!
//! ```ignore
//! let person = ClassDescriptor::builder(Some("Person"))
//!     .constructor(&["name"], |cx| {
//!         let name = cx.arg(0);
//!         cx.this_set("name", name)?;
//!         Ok(Value::Undefined)
//!     })
//!     .method("DigaOla", |cx| cx.this_get("name"))
//!     .build();
//! ```

use crate::activation::Activation;
use crate::error::Result;
use crate::scope::Scope;
use crate::value::{Body, Value};
use classdown_common::{PropertyKey, Symbol};
use std::fmt;
use std::rc::Rc;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MemberKind {
    Method,
    Getter,
    Setter,
    Field,
}

/// How a member is addressed.
#[derive(Clone)]
pub enum MemberKey {
    /// `name() {}`, `"quoted name"() {}`
    Literal(PropertyKey),
    /// `[expression]() {}`: evaluated once while the class is elaborated.
    Computed(Body),
}

impl MemberKey {
    pub fn computed(expr: impl Fn(&mut Activation<'_>) -> Result<Value> + 'static) -> Self {
        Self::Computed(Rc::new(expr))
    }

    pub const fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }
}

impl fmt::Debug for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(key) => write!(f, "{key}"),
            Self::Computed(_) => f.write_str("[<computed>]"),
        }
    }
}

impl From<&str> for MemberKey {
    fn from(s: &str) -> Self {
        Self::Literal(PropertyKey::from(s))
    }
}

impl From<String> for MemberKey {
    fn from(s: String) -> Self {
        Self::Literal(PropertyKey::from(s))
    }
}

impl From<Symbol> for MemberKey {
    fn from(sym: Symbol) -> Self {
        Self::Literal(PropertyKey::Symbol(sym))
    }
}

impl From<PropertyKey> for MemberKey {
    fn from(key: PropertyKey) -> Self {
        Self::Literal(key)
    }
}

#[derive(Clone)]
pub struct Member {
    pub kind: MemberKind,
    pub key: MemberKey,
    /// Methods only.
    pub is_generator: bool,
    /// Procedure, or initializer expression for fields. A field without one
    /// starts out `undefined`.
    pub body: Option<Body>,
    /// Parameter names, informational.
    pub params: Vec<String>,
    /// Source position. Orders key evaluation and field initialization.
    pub position: u32,
}

impl Member {
    fn new(kind: MemberKind, key: MemberKey, body: Option<Body>) -> Self {
        Self {
            kind,
            key,
            is_generator: false,
            body,
            params: Vec::new(),
            position: 0,
        }
    }

    pub fn method(
        key: impl Into<MemberKey>,
        body: impl Fn(&mut Activation<'_>) -> Result<Value> + 'static,
    ) -> Self {
        Self::new(MemberKind::Method, key.into(), Some(Rc::new(body)))
    }

    pub fn generator(
        key: impl Into<MemberKey>,
        body: impl Fn(&mut Activation<'_>) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            is_generator: true,
            ..Self::method(key, body)
        }
    }

    pub fn getter(
        key: impl Into<MemberKey>,
        body: impl Fn(&mut Activation<'_>) -> Result<Value> + 'static,
    ) -> Self {
        Self::new(MemberKind::Getter, key.into(), Some(Rc::new(body)))
    }

    pub fn setter(
        key: impl Into<MemberKey>,
        body: impl Fn(&mut Activation<'_>) -> Result<Value> + 'static,
    ) -> Self {
        Self::new(MemberKind::Setter, key.into(), Some(Rc::new(body)))
    }

    pub fn field(key: impl Into<MemberKey>, init: Option<Body>) -> Self {
        Self::new(MemberKind::Field, key.into(), init)
    }

    pub fn with_params(mut self, params: &[&str]) -> Self {
        self.params = params.iter().map(|p| p.to_string()).collect();
        self
    }

    pub const fn at(mut self, position: u32) -> Self {
        self.position = position;
        self
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("kind", &self.kind)
            .field("key", &self.key)
            .field("is_generator", &self.is_generator)
            .field("params", &self.params)
            .field("position", &self.position)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct ClassDescriptor {
    /// Present for named class expressions and declarations.
    pub name: Option<String>,
    pub members: Vec<Member>,
    /// The designated constructor. `None` synthesizes an empty one.
    pub constructor: Option<Member>,
    /// The scope enclosing the class construct.
    pub scope: Scope,
}

impl ClassDescriptor {
    pub fn new(name: Option<&str>, scope: &Scope) -> Self {
        Self {
            name: name.map(str::to_string),
            members: Vec::new(),
            constructor: None,
            scope: scope.clone(),
        }
    }

    pub fn builder(name: Option<&str>) -> ClassDescriptorBuilder {
        ClassDescriptorBuilder {
            descriptor: Self::new(name, &Scope::root()),
            next_position: 0,
        }
    }
}

/// Fluent construction of descriptors. Positions follow call order.
pub struct ClassDescriptorBuilder {
    descriptor: ClassDescriptor,
    next_position: u32,
}

impl ClassDescriptorBuilder {
    pub fn in_scope(mut self, scope: &Scope) -> Self {
        self.descriptor.scope = scope.clone();
        self
    }

    pub fn constructor(
        mut self,
        params: &[&str],
        body: impl Fn(&mut Activation<'_>) -> Result<Value> + 'static,
    ) -> Self {
        let position = self.bump();
        self.descriptor.constructor =
            Some(Member::method("constructor", body).with_params(params).at(position));
        self
    }

    pub fn member(mut self, member: Member) -> Self {
        let position = self.bump();
        self.descriptor.members.push(member.at(position));
        self
    }

    pub fn method(
        self,
        key: impl Into<MemberKey>,
        body: impl Fn(&mut Activation<'_>) -> Result<Value> + 'static,
    ) -> Self {
        self.member(Member::method(key, body))
    }

    pub fn generator(
        self,
        key: impl Into<MemberKey>,
        body: impl Fn(&mut Activation<'_>) -> Result<Value> + 'static,
    ) -> Self {
        self.member(Member::generator(key, body))
    }

    pub fn getter(
        self,
        key: impl Into<MemberKey>,
        body: impl Fn(&mut Activation<'_>) -> Result<Value> + 'static,
    ) -> Self {
        self.member(Member::getter(key, body))
    }

    pub fn setter(
        self,
        key: impl Into<MemberKey>,
        body: impl Fn(&mut Activation<'_>) -> Result<Value> + 'static,
    ) -> Self {
        self.member(Member::setter(key, body).with_params(&["value"]))
    }

    /// `key = init;`
    pub fn field(
        self,
        key: impl Into<MemberKey>,
        init: impl Fn(&mut Activation<'_>) -> Result<Value> + 'static,
    ) -> Self {
        self.member(Member::field(key, Some(Rc::new(init))))
    }

    /// `key;`
    pub fn bare_field(self, key: impl Into<MemberKey>) -> Self {
        self.member(Member::field(key, None))
    }

    pub fn build(self) -> ClassDescriptor {
        self.descriptor
    }

    fn bump(&mut self) -> u32 {
        let position = self.next_position;
        self.next_position += 1;
        position
    }
}

#[cfg(test)]
#[path = "../tests/descriptor_tests.rs"]
mod tests;
