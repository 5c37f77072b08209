//! Host values and native functions.
//!
//! The engine executes member bodies, so it needs a small value model to
//! pass receivers, arguments and results around. Composite values
//! (`Object`, `Class`, `Function`, `Generator`) are reference types: cloning
//! a `Value` clones a handle, never the underlying storage.

use crate::activation::Activation;
use crate::class::Constructible;
use crate::engine::DesugarOptions;
use crate::error::{Result, RuntimeError};
use crate::generator::Generator;
use crate::instance::Instance;
use crate::scope::Scope;
use classdown_common::Symbol;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// A native procedure: every method, accessor, constructor, field
/// initializer and computed key expression is one of these.
pub type Body = Rc<dyn Fn(&mut Activation<'_>) -> Result<Value>>;

/// Wrap a closure as a [`Body`].
pub fn body(f: impl Fn(&mut Activation<'_>) -> Result<Value> + 'static) -> Body {
    Rc::new(f)
}

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Symbol(Symbol),
    Object(Instance),
    Class(Constructible),
    Function(Function),
    Generator(Generator),
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Self::String(Rc::from(s.as_ref()))
    }

    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Composite values are the ones a constructor body may return in place
    /// of the freshly allocated instance.
    pub const fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::Object(_) | Self::Class(_) | Self::Function(_) | Self::Generator(_)
        )
    }

    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Object(_) | Self::Generator(_) => "object",
            Self::Class(_) | Self::Function(_) => "function",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub const fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Object(instance) => Some(instance),
            _ => None,
        }
    }

    pub const fn as_class(&self) -> Option<&Constructible> {
        match self {
            Self::Class(class) => Some(class),
            _ => None,
        }
    }

    pub const fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(function) => Some(function),
            _ => None,
        }
    }

    pub const fn as_generator(&self) -> Option<&Generator> {
        match self {
            Self::Generator(generator) => Some(generator),
            _ => None,
        }
    }

    /// `ToBoolean`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Strict equality (`===`): primitives by value, composites by identity.
    pub fn strict_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            (Self::Class(a), Self::Class(b)) => a.ptr_eq(b),
            (Self::Function(a), Self::Function(b)) => a.ptr_eq(b),
            (Self::Generator(a), Self::Generator(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

/// Number to string, the way a JavaScript host prints numbers.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        // Covers -0 as well.
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // `{:e}` already yields the shortest round-trip mantissa; only the
        // exponent sign differs (`1e21` vs `1e+21`).
        let text = format!("{n:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        }
    } else {
        format!("{n}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::String(s) => f.write_str(s),
            Self::Symbol(sym) => write!(f, "{sym}"),
            Self::Object(_) => f.write_str("[object Object]"),
            Self::Class(class) => write!(f, "class {}", class.name()),
            Self::Function(function) => {
                write!(f, "function {}() {{ [native code] }}", function.name())
            }
            Self::Generator(_) => f.write_str("[object Generator]"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Object(instance) => match instance.class() {
                Some(class) => write!(f, "[object {}]", class.name()),
                None => f.write_str("[object Object]"),
            },
            _ => fmt::Display::fmt(self, f),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(Rc::from(s))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Self::Symbol(sym)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Self::Object(instance)
    }
}

impl From<Constructible> for Value {
    fn from(class: Constructible) -> Self {
        Self::Class(class)
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Self::Function(function)
    }
}

// =============================================================================
// Functions
// =============================================================================

/// What a function was created for. Decides how it is invoked and named.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FunctionKind {
    /// A host function living in an ordinary scope.
    Normal,
    Method,
    Generator,
    Getter,
    Setter,
    Constructor,
    FieldInitializer,
    ComputedKey,
}

#[derive(Clone)]
pub struct Function(Rc<FunctionData>);

struct FunctionData {
    name: Rc<str>,
    kind: FunctionKind,
    params: Vec<Rc<str>>,
    body: Body,
    /// Home scope; `None` for host functions that never resolve names.
    scope: Option<Scope>,
    options: DesugarOptions,
}

impl Function {
    /// A host function, e.g. one a test or embedder places in a scope.
    pub fn native(
        name: &str,
        f: impl Fn(&mut Activation<'_>) -> Result<Value> + 'static,
    ) -> Self {
        Self(Rc::new(FunctionData {
            name: Rc::from(name),
            kind: FunctionKind::Normal,
            params: Vec::new(),
            body: Rc::new(f),
            scope: None,
            options: DesugarOptions::default(),
        }))
    }

    /// A function owned by a class: its home scope is the class scope.
    pub(crate) fn member(
        name: &str,
        kind: FunctionKind,
        params: &[String],
        body: Body,
        scope: &Scope,
        options: DesugarOptions,
    ) -> Self {
        Self(Rc::new(FunctionData {
            name: Rc::from(name),
            kind,
            params: params.iter().map(|p| Rc::from(p.as_str())).collect(),
            body,
            scope: Some(scope.clone()),
            options,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn kind(&self) -> FunctionKind {
        self.0.kind
    }

    pub fn is_generator(&self) -> bool {
        self.0.kind == FunctionKind::Generator
    }

    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.0.params.iter().map(|p| &**p)
    }

    /// Declared parameter count, like `Function.prototype.length`.
    pub fn length(&self) -> usize {
        self.0.params.len()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Call with an explicit receiver from outside any running body.
    pub fn call(&self, this: Value, args: &[Value]) -> Result<Value> {
        self.invoke(this, args, 1)
    }

    /// Run the body in a fresh frame at `depth`.
    pub(crate) fn invoke(&self, this: Value, args: &[Value], depth: u32) -> Result<Value> {
        let data = &*self.0;
        let limit = data.options.max_call_depth;
        if depth > limit {
            return Err(RuntimeError::CallDepthExceeded { limit });
        }
        trace!(function = %data.name, kind = ?data.kind, depth, "invoke");

        let scope = data.scope.clone().unwrap_or_else(Scope::root);
        if data.kind == FunctionKind::Generator {
            let mut yields = Vec::new();
            let completion = {
                let mut cx = Activation::new(self, this, args, scope, depth)
                    .with_yield_sink(&mut yields, data.options.max_generator_yields);
                (data.body)(&mut cx)?
            };
            return Ok(Value::Generator(Generator::completed(yields, completion)));
        }

        let mut cx = Activation::new(self, this, args, scope, depth);
        (data.body)(&mut cx)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.0.name)
            .field("kind", &self.0.kind)
            .field("length", &self.0.params.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/value_tests.rs"]
mod tests;
