//! Syntax tree interface for the tsb binder.
//!
//! The binder consumes an immutable tree produced by a parser that lives
//! outside this workspace. This crate fixes the shape of that tree:
//! - `base` - `NodeIndex` and `NodeList` handles
//! - `syntax_kind` - the `SyntaxKind` of every node the binder understands
//! - `flags` - `ModifierFlags` read directly from syntactic modifiers
//! - `node` - thin `Node` headers and their typed data records
//! - `arena` - `NodeArena`, the read-only storage with typed accessors
//! - `builder` - `TreeBuilder`, used by hosts and tests to construct trees

pub mod base;
pub use base::{NodeIndex, NodeList};

pub mod syntax_kind;
pub use syntax_kind::SyntaxKind;

pub mod flags;
pub use flags::ModifierFlags;

pub mod node;
pub use node::*;

pub mod arena;
pub use arena::NodeArena;

pub mod builder;
pub use builder::TreeBuilder;

#[cfg(test)]
#[path = "../tests/builder_tests.rs"]
mod builder_tests;
