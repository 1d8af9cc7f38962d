//! Thin node headers and typed data records.
//!
//! Every node is a small fixed-size header. Nodes that carry structure point
//! into a type-specific pool on the `NodeArena` through `data_index`.

use crate::base::{NodeIndex, NodeList};
use crate::flags::ModifierFlags;
use crate::syntax_kind::SyntaxKind;
use serde::Serialize;
use tsb_common::Span;

/// A syntax node header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: SyntaxKind,
    pub modifiers: ModifierFlags,
    /// Start position in source (byte offset)
    pub pos: u32,
    /// End position in source (byte offset)
    pub end: u32,
    /// Index into the type-specific storage pool (`u32::MAX` = no data)
    pub data_index: u32,
}

impl Node {
    pub const NO_DATA: u32 = u32::MAX;

    #[inline]
    #[must_use]
    pub const fn new(kind: SyntaxKind) -> Self {
        Self {
            kind,
            modifiers: ModifierFlags::empty(),
            pos: u32::MAX,
            end: u32::MAX,
            data_index: Self::NO_DATA,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_data(kind: SyntaxKind, data_index: u32) -> Self {
        Self {
            kind,
            modifiers: ModifierFlags::empty(),
            pos: u32::MAX,
            end: u32::MAX,
            data_index,
        }
    }

    #[inline]
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.data_index != Self::NO_DATA
    }

    #[inline]
    #[must_use]
    pub const fn span(&self) -> Span {
        Span::new(self.pos, self.end)
    }

    #[inline]
    #[must_use]
    pub const fn has_modifier(&self, flag: ModifierFlags) -> bool {
        self.modifiers.contains(flag)
    }
}

/// Identifier text
#[derive(Clone, Debug, Serialize)]
pub struct IdentifierData {
    pub text: String,
}

/// String literal text, without quotes
#[derive(Clone, Debug, Serialize)]
pub struct LiteralData {
    pub text: String,
}

/// `left.right`
#[derive(Clone, Debug, Serialize)]
pub struct QualifiedNameData {
    pub left: NodeIndex,
    pub right: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct SourceFileData {
    pub file_name: String,
    pub statements: NodeList,
}

/// `module A.B { ... }` or `declare module "m" { ... }`
#[derive(Clone, Debug, Serialize)]
pub struct ModuleData {
    /// Identifier, qualified name, or string literal
    pub name: NodeIndex,
    pub body: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct ClassData {
    pub name: NodeIndex,
    /// Type references in the `extends` clause
    pub extends_types: NodeList,
    /// Type references in the `implements` clause
    pub implements_types: NodeList,
    pub members: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct InterfaceData {
    pub name: NodeIndex,
    /// Type references in the `extends` clause
    pub extends_types: NodeList,
    pub members: NodeList,
}

/// Shared record for every function-like node: declarations, expressions,
/// methods, accessors, constructors, signatures and function types.
#[derive(Clone, Debug, Serialize)]
pub struct FunctionData {
    pub name: NodeIndex,
    pub parameters: NodeList,
    /// Return type annotation (the value type for index signatures)
    pub type_annotation: NodeIndex,
    /// `Block` body; `NONE` for overloads, signatures and ambient declarations
    pub body: NodeIndex,
}

/// Property declarations, property signatures and variable declarations.
#[derive(Clone, Debug, Serialize)]
pub struct PropertyData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct VariableStatementData {
    pub declarations: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct ParameterData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

/// `import name = A.B;` or `import name = require("m");`
#[derive(Clone, Debug, Serialize)]
pub struct ImportEqualsData {
    pub name: NodeIndex,
    /// Entity name, or an `ExternalModuleReference` whose data is a literal
    pub module_reference: NodeIndex,
}

/// Children of a statement or opaque expression, in source order.
#[derive(Clone, Debug, Serialize)]
pub struct StatementData {
    pub children: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeRefData {
    /// Identifier or qualified name
    pub type_name: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ArrayTypeData {
    pub element_type: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeLiteralData {
    pub members: NodeList,
}
