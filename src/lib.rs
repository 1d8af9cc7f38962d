//! tsb: declaration collection, symbol binding and lazy name resolution for
//! TypeScript programs.
//!
//! The work is split across three crates, re-exported here:
//!
//! - `tsb_common`: spans, diagnostics and shared limits
//! - `tsb_syntax`: the node arena the binder consumes, plus `TreeBuilder`
//! - `tsb_binder`: decl collection, binding, the symbol graph, the resolver
//!   and the incremental `Session`
//!
//! ```no_run
//! use tsb::{Meaning, ModifierFlags, Session, TreeBuilder};
//!
//! let mut b = TreeBuilder::new("a.ts");
//! let point = b.interface("Point", ModifierFlags::empty(), vec![], vec![]);
//! let root = b.source_file(vec![point]);
//! let (arena, root) = b.finish(root);
//!
//! let mut session = Session::new();
//! session.add_unit("a.ts", arena, root).unwrap();
//! assert!(session.find_symbol("Point", Meaning::Type).is_some());
//! ```

pub use tsb_binder as binder;
pub use tsb_common as common;
pub use tsb_syntax as syntax;

pub use tsb_binder::{
    BindError, BinderOptions, Decl, DeclFlags, DeclId, DeclKind, GraphSnapshot, Meaning,
    Resolver, SemanticInfo, SemanticInfoChain, Session, Symbol, SymbolArena, SymbolFlags,
    SymbolId, SymbolKind, SymbolLink, SymbolLinkKind, UnitId, ValidationError,
    WellKnownSymbols,
};
pub use tsb_common::{Diagnostic, DiagnosticCategory, Span, diagnostic_codes};
pub use tsb_syntax::{ModifierFlags, NodeArena, NodeIndex, SyntaxKind, TreeBuilder};

// Tracing subscriber setup for hosts embedding the binder
pub mod tracing_config;
