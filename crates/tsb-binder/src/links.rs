//! Typed, directed edges of the symbol graph.

use crate::symbols::SymbolId;
use serde::Serialize;

/// The relationship a `SymbolLink` expresses, read as "start *kind* end".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SymbolLinkKind {
    /// Variable, field, parameter or alias to its type (or alias target).
    TypedAs,
    ContextuallyTypedAs,
    /// Class (static side) to its instance side.
    InstanceType,
    /// Array specialization to its element type.
    ArrayOf,
    PublicProperty,
    PrivateProperty,
    StaticProperty,
    /// Member or local to its lexical container.
    ContainedBy,
    Extends,
    Implements,
    /// Signature to one of its parameters, in order.
    Parameter,
    ReturnType,
    CallSignature,
    ConstructSignature,
    IndexSignature,
}

impl SymbolLinkKind {
    /// Membership edges are always paired with a reverse `ContainedBy`.
    #[must_use]
    pub const fn is_membership(self) -> bool {
        matches!(
            self,
            Self::PublicProperty | Self::PrivateProperty | Self::StaticProperty
        )
    }

    /// Edges that a symbol has at most one of.
    #[must_use]
    pub const fn is_single_valued(self) -> bool {
        matches!(
            self,
            Self::TypedAs | Self::ContextuallyTypedAs | Self::InstanceType | Self::ReturnType
        )
    }

    /// Edges written by the resolver rather than the binder.
    #[must_use]
    pub const fn is_resolution(self) -> bool {
        matches!(
            self,
            Self::TypedAs
                | Self::ContextuallyTypedAs
                | Self::Extends
                | Self::Implements
                | Self::ReturnType
        )
    }

    #[must_use]
    pub const fn is_signature(self) -> bool {
        matches!(
            self,
            Self::CallSignature | Self::ConstructSignature | Self::IndexSignature
        )
    }
}

/// A directed edge `start --kind--> end`.
///
/// Each edge is stored twice: in the outgoing list of `start` and the
/// incoming list of `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SymbolLink {
    pub start: SymbolId,
    pub end: SymbolId,
    pub kind: SymbolLinkKind,
}

impl SymbolLink {
    #[must_use]
    pub const fn new(start: SymbolId, end: SymbolId, kind: SymbolLinkKind) -> Self {
        Self { start, end, kind }
    }
}
