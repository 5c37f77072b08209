//! Key Evaluator
//!
//! Computed member keys are evaluated exactly once, while the class is
//! being elaborated, in member declaration order. Fields take part in that
//! order too, so a field's computed key sees the side effects of a method's
//! computed key declared before it.

use crate::descriptor::{Member, MemberKey};
use crate::engine::DesugarOptions;
use crate::error::{Result, RuntimeError};
use crate::scope::Scope;
use crate::value::{Function, FunctionKind, Value, format_number};
use classdown_common::PropertyKey;
use tracing::trace;

/// Resolve the key of every member, in order.
///
/// The first failure aborts: later expressions are not evaluated, and the
/// error carries the index of the member whose key failed.
pub(crate) fn evaluate_keys(
    members: &[Member],
    scope: &Scope,
    options: DesugarOptions,
) -> Result<Vec<PropertyKey>> {
    members
        .iter()
        .enumerate()
        .map(|(index, member)| {
            evaluate_key(&member.key, scope, options).map_err(|cause| {
                RuntimeError::KeyEvaluation {
                    index,
                    cause: Box::new(cause),
                }
            })
        })
        .collect()
}

fn evaluate_key(key: &MemberKey, scope: &Scope, options: DesugarOptions) -> Result<PropertyKey> {
    match key {
        MemberKey::Literal(key) => Ok(key.clone()),
        MemberKey::Computed(expr) => {
            let function = Function::member(
                "",
                FunctionKind::ComputedKey,
                &[],
                expr.clone(),
                scope,
                options,
            );
            let value = function.invoke(Value::Undefined, &[], 1)?;
            let key = to_property_key(&value, 1)?;
            trace!(key = %key, "computed key");
            Ok(key)
        }
    }
}

/// `ToPropertyKey`: symbols stay symbols, everything else becomes a string.
pub fn to_property_key(value: &Value, depth: u32) -> Result<PropertyKey> {
    Ok(match value {
        Value::Symbol(sym) => PropertyKey::Symbol(sym.clone()),
        Value::String(s) => PropertyKey::from(&**s),
        Value::Number(n) => PropertyKey::from(format_number(*n)),
        Value::Object(instance) => {
            let has_to_string = instance
                .method_table()
                .is_some_and(|table| table.method(&PropertyKey::from("toString")).is_some())
                || instance.has_field("toString");
            if !has_to_string {
                return Ok(PropertyKey::from("[object Object]"));
            }
            let text = instance.get_at(&PropertyKey::from("toString"), depth)?;
            let Value::Function(to_string) = text else {
                return Ok(PropertyKey::from("[object Object]"));
            };
            match to_string.invoke(value.clone(), &[], depth + 1)? {
                Value::Symbol(sym) => PropertyKey::Symbol(sym),
                // A composite from `toString` is a type error in a full host.
                other if other.is_composite() => {
                    return Err(RuntimeError::type_error(
                        "Cannot convert object to primitive value",
                    ));
                }
                other => PropertyKey::from(other.to_string()),
            }
        }
        other => PropertyKey::from(other.to_string()),
    })
}

#[cfg(test)]
#[path = "../tests/keys_tests.rs"]
mod tests;
