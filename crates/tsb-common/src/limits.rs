//! Centralized limits and thresholds for the binder and resolver.
//!
//! The core does no cancellation of its own; these bound the recursive walks
//! that could otherwise run away on malformed or adversarial input.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum number of `extends` levels followed when resolving heritage or
/// looking up inherited members.
///
/// Cycles are detected separately; this bounds very long but acyclic chains.
///
/// # TypeScript example
///
/// ```typescript
/// interface A0 {}
/// interface A1 extends A0 {}
/// interface A2 extends A1 {}
/// // ... hundreds of levels ...
/// ```
pub const MAX_HERITAGE_DEPTH: u32 = 256;

/// Maximum number of enclosing declarations considered when building the
/// lexical scope path for a lookup.
///
/// # TypeScript example
///
/// ```typescript
/// module A { module B { module C { /* ... 128 levels ... */ var x: T; } } }
/// ```
pub const MAX_SCOPE_PATH_DEPTH: u32 = 128;

/// Maximum syntax nesting the declaration collector descends into.
///
/// Nodes below this depth are not collected; the collector reports one
/// warning diagnostic per unit at the first node it skips.
pub const MAX_COLLECT_DEPTH: u32 = 1_000;

/// Maximum number of alias hops followed for `import x = A.B` chains.
pub const MAX_ALIAS_RESOLUTION_DEPTH: u32 = 128;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Initial capacity of a session's symbol arena.
pub const INITIAL_SYMBOL_CAPACITY: usize = 256;
