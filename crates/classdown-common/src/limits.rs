//! Centralized limits and thresholds for the class desugaring engine.
//!
//! Member bodies are native closures that can re-enter the engine (a method
//! invoking another method, a getter reading another accessor). These limits
//! bound that re-entry so runaway class code fails with a diagnostic instead
//! of overflowing the native stack.
//!
//! Both values are defaults: `DesugarOptions` can override them per class.

/// Maximum nesting depth of body invocations.
///
/// Every method, accessor, field initializer, constructor body and computed
/// key expression runs one level deeper than its caller. When the depth
/// reaches this value the engine reports `CallDepthExceeded`.
///
/// # Example
///
/// ```javascript
/// class Loop {
///     get self() { return this.self; } // re-enters the getter forever
/// }
/// new Loop().self;
/// ```
pub const MAX_CALL_DEPTH: u32 = 256;

/// Maximum number of values a single generator method may yield.
///
/// Generator methods run to completion when invoked and buffer their yields,
/// so an unbounded generator would never return. Exceeding this count
/// reports `GeneratorOverflow`.
///
/// # Example
///
/// ```javascript
/// class Naturals {
///     *[Symbol.iterator]() { let n = 0; while (true) yield n++; }
/// }
/// ```
pub const MAX_GENERATOR_YIELDS: usize = 100_000;

/// Initial capacity for per-instance field storage.
///
/// Most classes declare only a handful of fields; starting with a small
/// capacity avoids a reallocation for the common case.
pub const INITIAL_FIELD_CAPACITY: usize = 4;
