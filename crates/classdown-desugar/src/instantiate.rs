//! Instantiation Protocol
//!
//! 1. allocate an instance owning a link to its class (and so the shared
//!    method table)
//! 2. run field initializers in declaration order, `this` bound
//! 3. run the constructor body, `this` bound
//! 4. return the instance, or the composite value the constructor returned
//!
//! Nothing here catches errors: a throwing initializer or constructor body
//! propagates unmodified and the half-built instance is dropped.

use crate::class::{CallMode, Constructible};
use crate::error::{Result, RuntimeError};
use crate::instance::Instance;
use crate::value::Value;
use tracing::{Level, span, trace};

/// `new class(...args)`
pub fn instantiate(class: &Constructible, args: &[Value]) -> Result<Value> {
    class.enter(CallMode::Construct, args, 1)
}

pub(crate) fn instantiate_at(class: &Constructible, args: &[Value], depth: u32) -> Result<Value> {
    let limit = class.options().max_call_depth;
    if depth > limit {
        return Err(RuntimeError::CallDepthExceeded { limit });
    }
    let span = span!(Level::DEBUG, "instantiate", class = %class.name(), depth);
    let _enter = span.enter();

    let instance = Instance::of_class(class);
    let this = Value::Object(instance.clone());

    for field in class.field_initializers() {
        let value = match field.initializer() {
            Some(init) => init.invoke(this.clone(), &[], depth + 1)?,
            None => Value::Undefined,
        };
        trace!(key = %field.key(), "initialize field");
        instance.define_field(field.key().clone(), value);
    }

    let result = class.constructor_body().invoke(this.clone(), args, depth + 1)?;
    if result.is_composite() {
        trace!("constructor returned a replacement object");
        return Ok(result);
    }
    Ok(this)
}

#[cfg(test)]
#[path = "../tests/instantiate_tests.rs"]
mod tests;
