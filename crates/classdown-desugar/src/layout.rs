//! Serializable summary of a desugared class.

use crate::class::Constructible;
use crate::method_table::{PropertyFlags, TableEntry};
use classdown_common::PropertyKey;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassLayout {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_name: Option<String>,
    pub constructor_params: Vec<String>,
    pub fields: Vec<FieldLayout>,
    pub members: Vec<MemberLayout>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldLayout {
    pub key: PropertyKey,
    pub has_initializer: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemberLayout {
    pub key: PropertyKey,
    pub kind: MemberLayoutKind,
    pub enumerable: bool,
    pub writable: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberLayoutKind {
    Constructor,
    Method,
    Generator,
    Accessor { get: bool, set: bool },
}

impl ClassLayout {
    pub fn of(class: &Constructible) -> Self {
        let members = class
            .method_table()
            .entries()
            .map(|(key, entry, flags)| MemberLayout {
                key: key.clone(),
                kind: match entry {
                    TableEntry::Constructor => MemberLayoutKind::Constructor,
                    TableEntry::Method(function) if function.is_generator() => {
                        MemberLayoutKind::Generator
                    }
                    TableEntry::Method(_) => MemberLayoutKind::Method,
                    TableEntry::Accessor(pair) => MemberLayoutKind::Accessor {
                        get: pair.getter().is_some(),
                        set: pair.setter().is_some(),
                    },
                },
                enumerable: flags.is_enumerable(),
                writable: flags.contains(PropertyFlags::WRITABLE),
            })
            .collect();

        Self {
            name: class.name().to_string(),
            internal_name: class.internal_name().map(str::to_string),
            constructor_params: class.constructor_params().map(str::to_string).collect(),
            fields: class
                .field_initializers()
                .iter()
                .map(|field| FieldLayout {
                    key: field.key().clone(),
                    has_initializer: field.initializer().is_some(),
                })
                .collect(),
            members,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
#[path = "../tests/layout_tests.rs"]
mod tests;
