//! Method Table Builder
//!
//! The method table is the class's prototype: one shared, frozen map from key
//! to callable entry that every instance links to.
//!
//! ```javascript
//! class Person {
//!     get name() { ... }
//!     greet() { ... }
//!     set name(v) { ... }
//! }
//! ```
//!
//! builds one table with three entries, in first-declaration order:
//!
//! | key           | entry                      | flags                    |
//! |---------------|----------------------------|--------------------------|
//! | `constructor` | back-reference to the class | writable, configurable   |
//! | `name`        | accessor `{ get, set }`    | configurable             |
//! | `greet`       | method                     | writable, configurable   |
//!
//! No entry is ever enumerable. The getter and setter for `name` merge into
//! one entry even though `greet` sits between them.

use crate::class::{ClassInner, Constructible};
use crate::value::Function;
use bitflags::bitflags;
use classdown_common::PropertyKey;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::rc::Weak;
use tracing::trace;

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

bitflags! {
    /// Property attributes, as in an ES property descriptor.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u8 {
        const WRITABLE = 1;
        const ENUMERABLE = 1 << 1;
        const CONFIGURABLE = 1 << 2;
    }
}

impl PropertyFlags {
    /// Methods and the constructor back-reference.
    pub const METHOD: Self = Self::WRITABLE.union(Self::CONFIGURABLE);
    /// Accessor pairs have no writable bit.
    pub const ACCESSOR: Self = Self::CONFIGURABLE;
    /// Per-instance fields.
    pub const FIELD: Self = Self::all();

    pub const fn is_enumerable(self) -> bool {
        self.contains(Self::ENUMERABLE)
    }
}

/// A merged getter/setter pair. Either side may be missing.
#[derive(Clone, Debug, Default)]
pub struct AccessorPair {
    pub(crate) get: Option<Function>,
    pub(crate) set: Option<Function>,
}

impl AccessorPair {
    pub fn getter(&self) -> Option<&Function> {
        self.get.as_ref()
    }

    pub fn setter(&self) -> Option<&Function> {
        self.set.as_ref()
    }
}

#[derive(Clone, Debug)]
pub enum TableEntry {
    /// The `constructor` key: resolves to the class itself.
    Constructor,
    /// A plain or generator method.
    Method(Function),
    Accessor(AccessorPair),
}

#[derive(Clone, Debug)]
struct TableSlot {
    entry: TableEntry,
    flags: PropertyFlags,
}

pub struct MethodTable {
    slots: FxIndexMap<PropertyKey, TableSlot>,
    class: Weak<ClassInner>,
}

impl MethodTable {
    pub fn lookup(&self, key: &PropertyKey) -> Option<&TableEntry> {
        self.slots.get(key).map(|slot| &slot.entry)
    }

    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.slots.contains_key(key)
    }

    pub fn flags(&self, key: &PropertyKey) -> Option<PropertyFlags> {
        self.slots.get(key).map(|slot| slot.flags)
    }

    pub fn method(&self, key: &PropertyKey) -> Option<&Function> {
        match self.lookup(key)? {
            TableEntry::Method(function) => Some(function),
            _ => None,
        }
    }

    pub fn accessor(&self, key: &PropertyKey) -> Option<&AccessorPair> {
        match self.lookup(key)? {
            TableEntry::Accessor(pair) => Some(pair),
            _ => None,
        }
    }

    /// The class this table belongs to (the `constructor` entry).
    pub fn constructor(&self) -> Option<Constructible> {
        self.class.upgrade().map(Constructible)
    }

    /// Every key, enumerable or not, in first-declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &PropertyKey> {
        self.slots.keys()
    }

    /// Keys a generic enumeration or copy operation may see.
    pub fn enumerable_keys(&self) -> impl Iterator<Item = &PropertyKey> {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.flags.is_enumerable())
            .map(|(key, _)| key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&PropertyKey, &TableEntry, PropertyFlags)> {
        self.slots
            .iter()
            .map(|(key, slot)| (key, &slot.entry, slot.flags))
    }

    /// Entry count, including the constructor back-reference.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.slots.iter().map(|(key, slot)| (key.to_string(), &slot.entry)))
            .finish()
    }
}

/// Accumulates members in declaration order, then freezes into a table.
pub struct MethodTableBuilder {
    slots: FxIndexMap<PropertyKey, TableSlot>,
}

impl MethodTableBuilder {
    pub fn new() -> Self {
        let mut slots = FxIndexMap::default();
        slots.insert(
            PropertyKey::from(PropertyKey::CONSTRUCTOR),
            TableSlot {
                entry: TableEntry::Constructor,
                flags: PropertyFlags::METHOD,
            },
        );
        Self { slots }
    }

    /// Plain or generator method. A later declaration of the same key wins,
    /// including over an accessor.
    pub fn define_method(&mut self, key: PropertyKey, function: Function) -> &mut Self {
        trace!(key = %key, generator = function.is_generator(), "define method");
        self.slots.insert(
            key,
            TableSlot {
                entry: TableEntry::Method(function),
                flags: PropertyFlags::METHOD,
            },
        );
        self
    }

    pub fn define_getter(&mut self, key: PropertyKey, function: Function) -> &mut Self {
        trace!(key = %key, "define getter");
        self.update_accessor(key, |pair| pair.get = Some(function));
        self
    }

    pub fn define_setter(&mut self, key: PropertyKey, function: Function) -> &mut Self {
        trace!(key = %key, "define setter");
        self.update_accessor(key, |pair| pair.set = Some(function));
        self
    }

    /// Merge into the accessor pair for `key`. A non-accessor entry under
    /// the same key is replaced; an existing pair keeps its other side.
    fn update_accessor(&mut self, key: PropertyKey, update: impl FnOnce(&mut AccessorPair)) {
        let mut pair = match self.slots.get(&key).map(|slot| &slot.entry) {
            Some(TableEntry::Accessor(pair)) => pair.clone(),
            _ => AccessorPair::default(),
        };
        update(&mut pair);
        // `insert` keeps the original position of an existing key.
        self.slots.insert(
            key,
            TableSlot {
                entry: TableEntry::Accessor(pair),
                flags: PropertyFlags::ACCESSOR,
            },
        );
    }

    /// Freeze the table, linking its `constructor` entry to `class`.
    pub(crate) fn finish(self, class: Weak<ClassInner>) -> MethodTable {
        MethodTable {
            slots: self.slots,
            class,
        }
    }
}

impl Default for MethodTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/method_table_tests.rs"]
mod tests;
