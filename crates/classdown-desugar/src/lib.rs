//! Class desugaring.
//!
//! Lowers a declarative class body (constructor, methods, generator
//! methods, accessors, fields, computed keys, an optional name) into a
//! `Constructible`: a constructor body, an ordered list of field
//! initializers and one shared, read-only method table.
//!
//! The pipeline:
//! - [`descriptor`]: the input model, produced by a parser or by hand
//! - [`keys`]: computed keys, evaluated once at definition time
//! - [`method_table`]: the shared table every instance links to
//! - [`naming`]: the internal name visible only inside member bodies
//! - [`instantiate`]: the one sanctioned construction path
//! - [`engine`]: ties the above together
//!
//! Bodies are native Rust closures taking an [`Activation`]; the small
//! value model they operate on lives in [`value`], [`instance`],
//! [`scope`] and [`generator`].

pub mod activation;
pub mod class;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod es5;
pub mod generator;
pub mod instance;
pub mod instantiate;
pub mod keys;
pub mod layout;
pub mod method_table;
pub mod naming;
pub mod reflect;
pub mod scope;
pub mod value;

pub use activation::{Activation, throw};
pub use class::{CallMode, Constructible, FieldInitializer};
pub use descriptor::{ClassDescriptor, ClassDescriptorBuilder, Member, MemberKey, MemberKind};
pub use engine::{DesugarOptions, Desugarer, desugar};
pub use error::{AccessMode, Result, RuntimeError};
pub use es5::render_es5;
pub use generator::{Generator, IterResult};
pub use instance::Instance;
pub use instantiate::instantiate;
pub use keys::to_property_key;
pub use layout::{ClassLayout, FieldLayout, MemberLayout, MemberLayoutKind};
pub use method_table::{AccessorPair, MethodTable, MethodTableBuilder, PropertyFlags, TableEntry};
pub use scope::Scope;
pub use value::{Body, Function, FunctionKind, Value, body};

pub use classdown_common::{PropertyKey, Symbol};
