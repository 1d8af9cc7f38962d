//! Semantic core for tsb: declarations, symbols and lazy resolution.
//!
//! Pipeline per unit:
//! - `collector` - syntax tree to `Decl` tree, plus node/decl maps
//! - `binder` - `Decl` tree to symbols, merging same-named declarations
//! - `resolver` - on-demand name and type resolution over the symbol graph
//!
//! Shared state:
//! - `symbols` / `links` - the symbol graph: identity-stable nodes and
//!   mirrored, typed edges
//! - `semantic_info` - per-unit bookkeeping and the chain of all units
//! - `session` - owner of the graph, the chain and the diagnostic log;
//!   incremental rebinding lives here

pub mod error;
pub use error::BindError;

pub mod options;
pub use options::BinderOptions;

pub mod links;
pub use links::{SymbolLink, SymbolLinkKind};

pub mod symbols;
pub use symbols::{Symbol, SymbolArena, SymbolFlags, SymbolId, SymbolKind};

pub mod decl;
pub use decl::{Decl, DeclFlags, DeclId, DeclKind, UnitId};

pub mod binding_context;
pub use binding_context::{BindingContext, CollectionContext, ScopeStack};

pub mod semantic_info;
pub use semantic_info::{Meaning, SemanticInfo, SemanticInfoChain};

pub mod well_known;
pub use well_known::WellKnownSymbols;

pub mod collector;
pub use collector::{collect, collect_with_limit};

pub mod binder;
pub use binder::bind_unit;

pub mod resolver;
pub use resolver::Resolver;

pub mod session;
pub use session::{EdgeSnapshot, GraphSnapshot, Session, SymbolSnapshot, ValidationError};

#[cfg(test)]
#[path = "../tests/symbol_graph_tests.rs"]
mod symbol_graph_tests;

#[cfg(test)]
#[path = "../tests/binding_context_tests.rs"]
mod binding_context_tests;

#[cfg(test)]
#[path = "../tests/collector_tests.rs"]
mod collector_tests;

#[cfg(test)]
#[path = "../tests/binder_tests.rs"]
mod binder_tests;

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod resolver_tests;

#[cfg(test)]
#[path = "../tests/session_tests.rs"]
mod session_tests;
