//! The declaration tree.
//!
//! One `Decl` per syntactic declaration site, nested the way the source is.
//! A unit's decls are stored flat in its `SemanticInfo`; `DeclId` carries the
//! unit so ids stay unambiguous across the whole chain.

use crate::symbols::SymbolId;
use bitflags::bitflags;
use serde::Serialize;
use tsb_common::Span;
use tsb_syntax::NodeIndex;

/// Identifies one compilation pass over one unit. A recompiled unit gets a
/// fresh id, so decls from the superseded pass can never be confused with
/// the new ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UnitId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeclId {
    pub unit: UnitId,
    pub index: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DeclKind {
    Script,
    Module,
    DynamicModule,
    Class,
    Interface,
    Function,
    Method,
    StaticMethod,
    Field,
    StaticField,
    Variable,
    Argument,
    Import,
    CallSignature,
    ConstructSignature,
    IndexSignature,
}

impl DeclKind {
    /// Kinds that become the current parent for their children.
    #[must_use]
    pub const fn is_scope(self) -> bool {
        matches!(
            self,
            Self::Script
                | Self::Module
                | Self::DynamicModule
                | Self::Class
                | Self::Interface
                | Self::Function
                | Self::Method
                | Self::StaticMethod
                | Self::CallSignature
                | Self::ConstructSignature
                | Self::IndexSignature
        )
    }

    /// Kinds that carry a parameter list and produce a signature.
    #[must_use]
    pub const fn is_signature_bearing(self) -> bool {
        matches!(
            self,
            Self::Function
                | Self::Method
                | Self::StaticMethod
                | Self::CallSignature
                | Self::ConstructSignature
                | Self::IndexSignature
        )
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct DeclFlags: u16 {
        const EXPORTED = 1 << 0;
        const AMBIENT = 1 << 1;
        const STATIC = 1 << 2;
        const PRIVATE = 1 << 3;
        const PUBLIC = 1 << 4;
        const OPTIONAL = 1 << 5;
        const CONSTRUCTOR = 1 << 6;
        const CALL = 1 << 7;
        const INDEX = 1 << 8;
        /// A function-like declaration without a body.
        const SIGNATURE = 1 << 9;
        const ACCESSOR = 1 << 10;
        /// A function-like declaration with a body.
        const IMPLEMENTATION = 1 << 11;
        /// `...rest` parameter.
        const REST = 1 << 12;
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Decl {
    pub id: DeclId,
    /// Empty for anonymous function expressions and signatures.
    pub name: String,
    pub kind: DeclKind,
    pub flags: DeclFlags,
    pub span: Span,
    pub parent: Option<DeclId>,
    /// Child declarations in syntactic order.
    pub children: Vec<DeclId>,
    /// The syntax node this decl was collected from.
    pub node: NodeIndex,
    symbol: Option<SymbolId>,
}

impl Decl {
    #[must_use]
    pub fn new(
        id: DeclId,
        name: String,
        kind: DeclKind,
        flags: DeclFlags,
        span: Span,
        parent: Option<DeclId>,
        node: NodeIndex,
    ) -> Self {
        Decl {
            id,
            name,
            kind,
            flags,
            span,
            parent,
            children: Vec::new(),
            node,
            symbol: None,
        }
    }

    #[must_use]
    pub const fn has_flag(&self, flag: DeclFlags) -> bool {
        self.flags.contains(flag)
    }

    /// The symbol this decl was bound to, once binding has run.
    #[must_use]
    pub const fn symbol(&self) -> Option<SymbolId> {
        self.symbol
    }

    /// Record the bound symbol. The back-link is written once; later calls
    /// leave it untouched and return `false`.
    pub fn set_symbol(&mut self, symbol: SymbolId) -> bool {
        if self.symbol.is_some() {
            return false;
        }
        self.symbol = Some(symbol);
        true
    }
}
