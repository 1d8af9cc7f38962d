use crate::symbols::{SymbolArena, SymbolFlags, SymbolId, SymbolKind};
use tsb_syntax::SyntaxKind;

/// Primitive types and the error placeholder. Created once per session and
/// never invalidated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WellKnownSymbols {
    pub any: SymbolId,
    pub number: SymbolId,
    pub string: SymbolId,
    pub boolean: SymbolId,
    pub void: SymbolId,
    pub null: SymbolId,
    pub undefined: SymbolId,
    /// Substituted for references that cannot be resolved.
    pub error: SymbolId,
}

impl WellKnownSymbols {
    pub fn create(symbols: &mut SymbolArena) -> Self {
        let mut primitive =
            |name: &str| symbols.alloc(name, SymbolKind::Primitive, SymbolFlags::WELL_KNOWN);
        let any = primitive("any");
        let number = primitive("number");
        let string = primitive("string");
        let boolean = primitive("boolean");
        let void = primitive("void");
        let null = primitive("null");
        let undefined = primitive("undefined");
        let error = symbols.alloc("error", SymbolKind::Error, SymbolFlags::WELL_KNOWN);
        WellKnownSymbols {
            any,
            number,
            string,
            boolean,
            void,
            null,
            undefined,
            error,
        }
    }

    #[must_use]
    pub const fn for_keyword(&self, kind: SyntaxKind) -> Option<SymbolId> {
        match kind {
            SyntaxKind::AnyKeyword => Some(self.any),
            SyntaxKind::NumberKeyword => Some(self.number),
            SyntaxKind::StringKeyword => Some(self.string),
            SyntaxKind::BooleanKeyword => Some(self.boolean),
            SyntaxKind::VoidKeyword => Some(self.void),
            SyntaxKind::NullKeyword => Some(self.null),
            SyntaxKind::UndefinedKeyword => Some(self.undefined),
            _ => None,
        }
    }

    #[must_use]
    pub fn contains(&self, id: SymbolId) -> bool {
        [
            self.any,
            self.number,
            self.string,
            self.boolean,
            self.void,
            self.null,
            self.undefined,
            self.error,
        ]
        .contains(&id)
    }
}
