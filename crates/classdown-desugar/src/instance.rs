//! Instances: per-object field storage linked to a shared method table.
//!
//! Property reads look at the instance's own fields first and then at the
//! method table. Writes go to an accessor's setter when the table has one,
//! and otherwise land in field storage. Keys owned by the method table
//! (methods and the constructor back-reference) are never written into an
//! instance.

use crate::class::Constructible;
use crate::error::{AccessMode, Result, RuntimeError};
use crate::method_table::{FxIndexMap, MethodTable, TableEntry};
use crate::value::Value;
use classdown_common::PropertyKey;
use classdown_common::limits::INITIAL_FIELD_CAPACITY;
use rustc_hash::FxBuildHasher;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Clone)]
pub struct Instance(Rc<RefCell<InstanceData>>);

struct InstanceData {
    fields: FxIndexMap<PropertyKey, Value>,
    /// Owning link: an instance keeps its class (and so the table and the
    /// internal name) alive.
    class: Option<Constructible>,
}

impl Instance {
    /// An object with no class: fields only.
    pub fn plain() -> Self {
        Self::new(None)
    }

    pub(crate) fn of_class(class: &Constructible) -> Self {
        Self::new(Some(class.clone()))
    }

    fn new(class: Option<Constructible>) -> Self {
        Self(Rc::new(RefCell::new(InstanceData {
            fields: FxIndexMap::with_capacity_and_hasher(INITIAL_FIELD_CAPACITY, FxBuildHasher),
            class,
        })))
    }

    /// The linked method table. Shared, never copied.
    pub fn method_table(&self) -> Option<Rc<MethodTable>> {
        self.class().map(|class| Rc::clone(class.method_table()))
    }

    /// The class this instance was created from.
    pub fn class(&self) -> Option<Constructible> {
        self.0.borrow().class.clone()
    }

    /// An own field, bypassing the method table.
    pub fn field(&self, key: impl Into<PropertyKey>) -> Option<Value> {
        self.0.borrow().fields.get(&key.into()).cloned()
    }

    pub fn has_field(&self, key: impl Into<PropertyKey>) -> bool {
        self.0.borrow().fields.contains_key(&key.into())
    }

    /// Own field keys in creation order.
    pub fn field_keys(&self) -> Vec<PropertyKey> {
        self.0.borrow().fields.keys().cloned().collect()
    }

    pub fn field_count(&self) -> usize {
        self.0.borrow().fields.len()
    }

    /// Create or overwrite an own field without consulting setters.
    pub(crate) fn define_field(&self, key: PropertyKey, value: Value) {
        self.0.borrow_mut().fields.insert(key, value);
    }

    pub fn get(&self, key: impl Into<PropertyKey>) -> Result<Value> {
        self.get_at(&key.into(), 1)
    }

    pub fn set(&self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> Result<()> {
        self.set_at(key.into(), value.into(), 1)
    }

    /// Look up `key` and call it with this instance as the receiver.
    pub fn invoke(&self, key: impl Into<PropertyKey>, args: &[Value]) -> Result<Value> {
        let key = key.into();
        let callee = self.get_at(&key, 1)?;
        match callee {
            Value::Function(function) => function.invoke(Value::Object(self.clone()), args, 1),
            Value::Class(class) => Err(RuntimeError::Invocation {
                class_name: class.name().to_string(),
            }),
            _ => Err(RuntimeError::type_error(format!("{key} is not a function"))),
        }
    }

    pub(crate) fn get_at(&self, key: &PropertyKey, depth: u32) -> Result<Value> {
        // The borrow must end before a getter runs: getters may write fields.
        let (own, class) = {
            let data = self.0.borrow();
            (data.fields.get(key).cloned(), data.class.clone())
        };
        if let Some(value) = own {
            return Ok(value);
        }
        let Some(class) = class else {
            return Ok(Value::Undefined);
        };
        match class.method_table().lookup(key) {
            None => Ok(Value::Undefined),
            Some(TableEntry::Constructor) => Ok(Value::Class(class.clone())),
            Some(TableEntry::Method(function)) => Ok(Value::Function(function.clone())),
            Some(TableEntry::Accessor(pair)) => match pair.getter() {
                Some(getter) => getter.invoke(Value::Object(self.clone()), &[], depth),
                None => Err(RuntimeError::AccessorMissing {
                    key: key.clone(),
                    mode: AccessMode::Get,
                }),
            },
        }
    }

    pub(crate) fn set_at(&self, key: PropertyKey, value: Value, depth: u32) -> Result<()> {
        let class = {
            let mut data = self.0.borrow_mut();
            if let Some(slot) = data.fields.get_mut(&key) {
                *slot = value;
                return Ok(());
            }
            data.class.clone()
        };
        match class.as_ref().and_then(|class| class.method_table().lookup(&key)) {
            None => {
                self.define_field(key, value);
                Ok(())
            }
            Some(TableEntry::Accessor(pair)) => match pair.setter() {
                Some(setter) => setter
                    .invoke(Value::Object(self.clone()), &[value], depth)
                    .map(|_| ()),
                None => Err(RuntimeError::AccessorMissing {
                    key,
                    mode: AccessMode::Set,
                }),
            },
            Some(TableEntry::Method(_) | TableEntry::Constructor) => {
                Err(RuntimeError::ReadOnlyMember { key })
            }
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = self.class();
        let keys: Vec<String> = self.field_keys().iter().map(ToString::to_string).collect();
        f.debug_struct("Instance")
            .field("class", &class.as_ref().map(Constructible::name))
            .field("fields", &keys)
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/instance_tests.rs"]
mod tests;
