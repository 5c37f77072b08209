//! The calling context handed to every native body.
//!
//! An `Activation` binds the receiver (`this`), the arguments and the home
//! scope of the running function. Everything a body does to other values
//! (property reads that may hit accessors, method calls, constructing
//! classes) goes through it so call depth is tracked across re-entry.

use crate::class::{CallMode, Constructible};
use crate::error::{Result, RuntimeError};
use crate::instance::Instance;
use crate::scope::Scope;
use crate::value::{Function, Value};
use classdown_common::PropertyKey;

pub struct Activation<'a> {
    callee: &'a Function,
    this: Value,
    args: &'a [Value],
    scope: Scope,
    depth: u32,
    yields: Option<YieldSink<'a>>,
}

struct YieldSink<'a> {
    buffer: &'a mut Vec<Value>,
    limit: usize,
}

impl<'a> Activation<'a> {
    pub(crate) fn new(
        callee: &'a Function,
        this: Value,
        args: &'a [Value],
        scope: Scope,
        depth: u32,
    ) -> Self {
        Self {
            callee,
            this,
            args,
            scope,
            depth,
            yields: None,
        }
    }

    pub(crate) fn with_yield_sink(mut self, buffer: &'a mut Vec<Value>, limit: usize) -> Self {
        self.yields = Some(YieldSink { buffer, limit });
        self
    }

    /// The receiver. `undefined` for plain function calls.
    pub fn this(&self) -> &Value {
        &self.this
    }

    /// The receiver as an instance, or a type error for any other receiver.
    pub fn this_instance(&self) -> Result<&Instance> {
        self.this.as_instance().ok_or_else(|| {
            RuntimeError::type_error(format!(
                "{} called on a {} receiver",
                self.callee.name(),
                self.this.type_name()
            ))
        })
    }

    pub fn args(&self) -> &[Value] {
        self.args
    }

    /// Argument `index`, or `undefined` when it was not passed.
    pub fn arg(&self, index: usize) -> Value {
        self.args.get(index).cloned().unwrap_or_default()
    }

    pub fn callee(&self) -> &Function {
        self.callee
    }

    pub const fn depth(&self) -> u32 {
        self.depth
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Resolve a name from the home scope outward.
    pub fn resolve(&self, name: &str) -> Result<Value> {
        self.scope.resolve(name)
    }

    /// Assign to an existing binding visible from the home scope.
    pub fn assign(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.scope.assign(name, value.into())
    }

    /// Property read. Runs getters.
    pub fn get(&self, target: &Value, key: impl Into<PropertyKey>) -> Result<Value> {
        get_property(target, &key.into(), self.depth + 1)
    }

    /// Property write. Runs setters.
    pub fn set(
        &self,
        target: &Value,
        key: impl Into<PropertyKey>,
        value: impl Into<Value>,
    ) -> Result<()> {
        set_property(target, key.into(), value.into(), self.depth + 1)
    }

    /// `this[key]`
    pub fn this_get(&self, key: impl Into<PropertyKey>) -> Result<Value> {
        self.get(&self.this, key)
    }

    /// `this[key] = value`
    pub fn this_set(&self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> Result<()> {
        self.set(&self.this, key, value)
    }

    /// `target[key](...args)` with `target` as the receiver.
    pub fn invoke(
        &self,
        target: &Value,
        key: impl Into<PropertyKey>,
        args: &[Value],
    ) -> Result<Value> {
        let key = key.into();
        let callee = get_property(target, &key, self.depth + 1)?;
        if !matches!(callee, Value::Function(_) | Value::Class(_)) {
            return Err(RuntimeError::type_error(format!("{key} is not a function")));
        }
        call_value(&callee, target.clone(), args, self.depth + 1)
    }

    /// `callee(...args)` with an `undefined` receiver.
    pub fn call(&self, callee: &Value, args: &[Value]) -> Result<Value> {
        call_value(callee, Value::Undefined, args, self.depth + 1)
    }

    /// `callee.call(this, ...args)`
    pub fn call_with_this(&self, callee: &Value, this: Value, args: &[Value]) -> Result<Value> {
        call_value(callee, this, args, self.depth + 1)
    }

    /// `new callee(...args)`
    pub fn construct(&self, callee: &Value, args: &[Value]) -> Result<Value> {
        match callee {
            Value::Class(class) => class.enter(CallMode::Construct, args, self.depth + 1),
            other => Err(RuntimeError::type_error(format!(
                "{other} is not a constructor"
            ))),
        }
    }

    /// Hand a value to the caller of the running generator method.
    pub fn yield_value(&mut self, value: impl Into<Value>) -> Result<()> {
        let Some(sink) = self.yields.as_mut() else {
            return Err(RuntimeError::type_error(format!(
                "yield used outside a generator ({})",
                self.callee.name()
            )));
        };
        if sink.buffer.len() >= sink.limit {
            return Err(RuntimeError::GeneratorOverflow { limit: sink.limit });
        }
        sink.buffer.push(value.into());
        Ok(())
    }
}

/// `throw value` from inside a body: `return Err(throw("boom"))`.
pub fn throw(value: impl Into<Value>) -> RuntimeError {
    RuntimeError::Thrown(value.into())
}

pub(crate) fn get_property(target: &Value, key: &PropertyKey, depth: u32) -> Result<Value> {
    match target {
        Value::Object(instance) => instance.get_at(key, depth),
        Value::Class(class) => Ok(class_property(class, key)),
        Value::Function(function) => Ok(match key.as_str() {
            Some("name") => Value::string(function.name()),
            Some("length") => Value::Number(function.length() as f64),
            _ => Value::Undefined,
        }),
        Value::String(s) if key.as_str() == Some("length") => {
            Ok(Value::Number(s.chars().count() as f64))
        }
        Value::Undefined | Value::Null => Err(RuntimeError::type_error(format!(
            "Cannot read properties of {target} (reading '{key}')"
        ))),
        _ => Ok(Value::Undefined),
    }
}

pub(crate) fn set_property(
    target: &Value,
    key: PropertyKey,
    value: Value,
    depth: u32,
) -> Result<()> {
    match target {
        Value::Object(instance) => instance.set_at(key, value, depth),
        other => Err(RuntimeError::type_error(format!(
            "Cannot set property '{key}' of {}",
            other.type_name()
        ))),
    }
}

pub(crate) fn call_value(callee: &Value, this: Value, args: &[Value], depth: u32) -> Result<Value> {
    match callee {
        Value::Function(function) => function.invoke(this, args, depth),
        // The invocation guard: a class reached through the call path.
        Value::Class(class) => class.enter(CallMode::Call, args, depth),
        other => Err(RuntimeError::type_error(format!(
            "{other} is not a function"
        ))),
    }
}

fn class_property(class: &Constructible, key: &PropertyKey) -> Value {
    match key.as_str() {
        Some("name") => Value::string(class.name()),
        Some("length") => Value::Number(class.length() as f64),
        _ => Value::Undefined,
    }
}
