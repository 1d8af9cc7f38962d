//! Internal binder errors.
//!
//! These are invariant violations and host misuse, never user mistakes.
//! Unresolved names and bad heritage entries are diagnostics; see
//! `tsb_common::diagnostics`.

use crate::decl::{DeclId, UnitId};
use crate::symbols::SymbolId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindError {
    /// More than one `ArrayOf` specialization exists for one element type.
    DuplicateArraySpecialization {
        element: SymbolId,
        count: usize,
    },
    /// A class symbol has no instance type, or was given a second one.
    MissingInstanceType { class: SymbolId },
    DuplicateInstanceType { class: SymbolId },
    UnknownUnit { path: String },
    UnknownUnitId { unit: UnitId },
    UnknownDecl { decl: DeclId },
    UnknownSymbol { symbol: SymbolId },
}

impl std::fmt::Display for BindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindError::DuplicateArraySpecialization { element, count } => write!(
                f,
                "symbol {} has {count} array specializations, expected at most one",
                element.0
            ),
            BindError::MissingInstanceType { class } => {
                write!(f, "class symbol {} has no instance type", class.0)
            }
            BindError::DuplicateInstanceType { class } => {
                write!(f, "class symbol {} already has an instance type", class.0)
            }
            BindError::UnknownUnit { path } => write!(f, "no compilation unit named '{path}'"),
            BindError::UnknownUnitId { unit } => write!(f, "no compilation unit with id {}", unit.0),
            BindError::UnknownDecl { decl } => {
                write!(f, "no declaration {} in unit {}", decl.index, decl.unit.0)
            }
            BindError::UnknownSymbol { symbol } => write!(f, "no symbol with id {}", symbol.0),
        }
    }
}

impl std::error::Error for BindError {}
