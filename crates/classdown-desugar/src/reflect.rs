//! Generic enumeration and copying.
//!
//! These see own, enumerable properties only. Method table entries are
//! never enumerable, so copying an instance copies its fields and leaves
//! its methods behind.

use crate::class::Constructible;
use crate::error::Result;
use crate::instance::Instance;
use crate::method_table::MethodTable;
use crate::value::Value;
use classdown_common::PropertyKey;
use std::rc::Rc;

/// `Object.keys(value)`: enumerable own string keys.
pub fn keys(value: &Value) -> Vec<String> {
    match value {
        Value::Object(instance) => instance
            .field_keys()
            .iter()
            .filter_map(|key| key.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// `Object.getOwnPropertyNames(prototype)`: every string key of the table,
/// enumerable or not.
pub fn own_property_names(table: &MethodTable) -> Vec<String> {
    table
        .keys()
        .filter_map(|key| key.as_str().map(str::to_string))
        .collect()
}

/// `for (key in instance)`: own fields, then enumerable table keys.
pub fn for_in_keys(instance: &Instance) -> Vec<PropertyKey> {
    let mut keys: Vec<PropertyKey> = instance
        .field_keys()
        .into_iter()
        .filter(|key| !key.is_symbol())
        .collect();
    if let Some(table) = instance.method_table() {
        let inherited: Vec<PropertyKey> = table
            .enumerable_keys()
            .filter(|key| !key.is_symbol() && !keys.contains(key))
            .cloned()
            .collect();
        keys.extend(inherited);
    }
    keys
}

/// `Object.assign(target, source)`. Writes go through `target`'s setters.
pub fn assign(target: &Instance, source: &Value) -> Result<()> {
    let Value::Object(source) = source else {
        return Ok(());
    };
    for key in source.field_keys() {
        let value = source.field(key.clone()).unwrap_or_default();
        target.set_at(key, value, 1)?;
    }
    Ok(())
}

/// `value instanceof class`: the value's method table is the class's.
pub fn instance_of(value: &Value, class: &Constructible) -> bool {
    value
        .as_instance()
        .and_then(Instance::method_table)
        .is_some_and(|table| Rc::ptr_eq(&table, class.method_table()))
}

#[cfg(test)]
#[path = "../tests/reflect_tests.rs"]
mod tests;
