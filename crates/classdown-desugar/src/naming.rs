//! Name Binding Resolver
//!
//! A named class expression can refer to itself from inside its members,
//! but the name is not visible to the code around the class:
//!
//! ```javascript
//! let Pessoa = class Person {
//!     DigaOla() { return Person.name; }   // fine
//! };
//! Person;                                 // ReferenceError
//! ```
//!
//! The name lives in a class scope between the enclosing scope and the
//! member bodies. It is declared before computed keys run (so they see it
//! as uninitialized rather than falling through to an outer binding) and
//! initialized once the class exists.

use crate::class::ClassInner;
use crate::scope::Scope;
use std::rc::Weak;
use tracing::trace;

/// Open the class scope for a class with an optional internal name.
pub(crate) fn enter_class_scope(enclosing: &Scope, internal_name: Option<&str>) -> Scope {
    let scope = enclosing.child();
    if let Some(name) = internal_name {
        scope.declare_uninitialized(name);
    }
    scope
}

/// Point the internal name at the finished class. The binding is read-only.
pub(crate) fn bind_internal_name(scope: &Scope, name: &str, class: Weak<ClassInner>) {
    trace!(name, "bind internal class name");
    scope.initialize_class(name, class);
}

#[cfg(test)]
#[path = "../tests/naming_tests.rs"]
mod tests;
