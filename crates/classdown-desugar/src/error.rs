//! Error taxonomy for class elaboration and instantiation.
//!
//! A single enum covers both phases. Build-time variants
//! (`KeyEvaluation`, `MemberConflict`, `ReservedConstructorKey`) mean no
//! `Constructible` was produced. Every other variant is raised at use time
//! and leaves the class usable for later calls.

use crate::value::Value;
use classdown_common::PropertyKey;
use std::fmt;
use thiserror::Error;

/// Which side of an accessor was requested.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccessMode {
    Get,
    Set,
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("get"),
            Self::Set => f.write_str("set"),
        }
    }
}

#[derive(Clone, Debug, Error)]
pub enum RuntimeError {
    /// A computed member key threw while the class was being elaborated.
    #[error("computed key of member #{index} could not be evaluated: {cause}")]
    KeyEvaluation {
        index: usize,
        #[source]
        cause: Box<RuntimeError>,
    },

    /// The class was called directly instead of through instantiation.
    #[error("Class constructor {class_name} cannot be invoked without instantiation")]
    Invocation { class_name: String },

    /// Get on a setter-only accessor, or set on a getter-only accessor.
    #[error("Cannot {mode} '{key}': accessor has no {mode}ter")]
    AccessorMissing { key: PropertyKey, mode: AccessMode },

    /// A field shares its key with a method or accessor.
    #[error("'{key}' is declared both as a field and as a method or accessor")]
    MemberConflict { key: PropertyKey },

    /// A member other than the designated constructor evaluated to `"constructor"`.
    #[error("Class member #{index} may not be named 'constructor'")]
    ReservedConstructorKey { index: usize },

    /// An instance write targeted a key owned by the method table.
    #[error("Cannot assign to '{key}': it is a method of the class")]
    ReadOnlyMember { key: PropertyKey },

    #[error("{name} is not defined")]
    Reference { name: String },

    #[error("Cannot access '{name}' before initialization")]
    Uninitialized { name: String },

    #[error("Assignment to constant binding '{name}'")]
    ConstAssignment { name: String },

    #[error("{0}")]
    Type(String),

    #[error("Maximum call depth of {limit} exceeded")]
    CallDepthExceeded { limit: u32 },

    #[error("Generator yielded more than {limit} values")]
    GeneratorOverflow { limit: usize },

    /// A value thrown by a member body. Propagates unmodified.
    #[error("Uncaught {0}")]
    Thrown(Value),
}

impl RuntimeError {
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type(message.into())
    }

    /// The thrown value, if this error came from a body throwing.
    pub const fn thrown_value(&self) -> Option<&Value> {
        match self {
            Self::Thrown(value) => Some(value),
            _ => None,
        }
    }

    /// Whether this error was raised while elaborating a class rather than
    /// while using one.
    pub const fn is_build_error(&self) -> bool {
        matches!(
            self,
            Self::KeyEvaluation { .. }
                | Self::MemberConflict { .. }
                | Self::ReservedConstructorKey { .. }
        )
    }
}

pub type Result<T, E = RuntimeError> = std::result::Result<T, E>;
