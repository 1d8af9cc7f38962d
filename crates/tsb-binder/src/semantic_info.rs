//! Per-unit semantic bookkeeping and the session-wide chain of units.

use crate::decl::{Decl, DeclId, UnitId};
use crate::links::SymbolLinkKind;
use crate::symbols::{SymbolArena, SymbolId, SymbolKind};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tsb_common::Diagnostic;
use tsb_syntax::{NodeArena, NodeIndex};

/// Which namespace a lookup targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Meaning {
    /// A name in a type position.
    Type,
    /// A qualifier: the `A` in `A.B`.
    Namespace,
    Value,
    Any,
}

impl Meaning {
    #[must_use]
    pub const fn admits(self, kind: SymbolKind) -> bool {
        match self {
            Meaning::Type => kind.is_type() || matches!(kind, SymbolKind::Alias),
            Meaning::Namespace => matches!(
                kind,
                SymbolKind::Module | SymbolKind::DynamicModule | SymbolKind::Alias
            ),
            Meaning::Value => matches!(
                kind,
                SymbolKind::Module
                    | SymbolKind::DynamicModule
                    | SymbolKind::Class
                    | SymbolKind::Function
                    | SymbolKind::Method
                    | SymbolKind::Field
                    | SymbolKind::Variable
                    | SymbolKind::Parameter
                    | SymbolKind::Alias
            ),
            Meaning::Any => true,
        }
    }
}

/// Everything the binder records for one compilation pass over one unit.
#[derive(Debug)]
pub struct SemanticInfo {
    pub unit: UnitId,
    pub path: String,
    pub arena: Arc<NodeArena>,
    pub root_node: NodeIndex,
    pub root_decl: DeclId,
    decls: Vec<Decl>,
    /// Node to innermost decl. The reverse direction is `Decl::node`.
    ast_to_decl: FxHashMap<NodeIndex, DeclId>,
    /// This unit's contribution to the global name table.
    top_level: IndexMap<String, Vec<SymbolId>>,
    /// Reported during collection, before the unit joins a session.
    diagnostics: Vec<Diagnostic>,
}

impl SemanticInfo {
    #[must_use]
    pub fn new(unit: UnitId, path: &str, arena: Arc<NodeArena>, root_node: NodeIndex) -> Self {
        SemanticInfo {
            unit,
            path: path.to_string(),
            arena,
            root_node,
            root_decl: DeclId { unit, index: 0 },
            decls: Vec::new(),
            ast_to_decl: FxHashMap::default(),
            top_level: IndexMap::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Diagnostics from collecting this unit, drained.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub(crate) fn push_decl(&mut self, decl: Decl) -> DeclId {
        let id = decl.id;
        self.decls.push(decl);
        id
    }

    #[must_use]
    pub(crate) fn next_decl_id(&self) -> DeclId {
        DeclId {
            unit: self.unit,
            index: self.decls.len() as u32,
        }
    }

    pub(crate) fn map_node(&mut self, node: NodeIndex, decl: DeclId) {
        self.ast_to_decl.insert(node, decl);
    }

    #[must_use]
    pub fn decl(&self, id: DeclId) -> Option<&Decl> {
        if id.unit != self.unit {
            return None;
        }
        self.decls.get(id.index as usize)
    }

    pub(crate) fn decl_mut(&mut self, id: DeclId) -> Option<&mut Decl> {
        if id.unit != self.unit {
            return None;
        }
        self.decls.get_mut(id.index as usize)
    }

    #[must_use]
    pub fn decls(&self) -> &[Decl] {
        &self.decls
    }

    #[must_use]
    pub fn get_decl_for_ast(&self, node: NodeIndex) -> Option<DeclId> {
        self.ast_to_decl.get(&node).copied()
    }

    #[must_use]
    pub fn get_ast_for_decl(&self, decl: DeclId) -> Option<NodeIndex> {
        self.decl(decl).map(|decl| decl.node)
    }

    /// Innermost decl whose span encloses `pos`. Decls with invalid spans
    /// are skipped.
    #[must_use]
    pub fn decl_at_position(&self, pos: u32) -> Option<DeclId> {
        let mut current = self.decl(self.root_decl)?;
        if !current.span.contains(pos) {
            return None;
        }
        'descend: loop {
            for &child in &current.children {
                if let Some(decl) = self.decl(child) {
                    if decl.span.contains(pos) {
                        current = decl;
                        continue 'descend;
                    }
                }
            }
            return Some(current.id);
        }
    }

    pub(crate) fn add_top_level(&mut self, name: &str, symbol: SymbolId) {
        let entry = self.top_level.entry(name.to_string()).or_default();
        if !entry.contains(&symbol) {
            entry.push(symbol);
        }
    }

    #[must_use]
    pub fn top_level_symbols(&self, name: &str) -> &[SymbolId] {
        self.top_level.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn top_level_names(&self) -> impl Iterator<Item = &str> {
        self.top_level.keys().map(String::as_str)
    }
}

/// Registry of every unit's semantic info, keyed by path in insertion order.
#[derive(Debug, Default)]
pub struct SemanticInfoChain {
    units: IndexMap<String, SemanticInfo>,
    paths_by_id: FxHashMap<UnitId, String>,
    next_unit: u32,
}

impl SemanticInfoChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn allocate_unit_id(&mut self) -> UnitId {
        let id = UnitId(self.next_unit);
        self.next_unit += 1;
        id
    }

    pub(crate) fn insert(&mut self, info: SemanticInfo) {
        self.paths_by_id.insert(info.unit, info.path.clone());
        self.units.insert(info.path.clone(), info);
    }

    pub(crate) fn remove(&mut self, path: &str) -> Option<SemanticInfo> {
        let info = self.units.shift_remove(path)?;
        self.paths_by_id.remove(&info.unit);
        Some(info)
    }

    pub(crate) fn clear(&mut self) {
        self.units.clear();
        self.paths_by_id.clear();
        self.next_unit = 0;
    }

    #[must_use]
    pub fn get_unit(&self, path: &str) -> Option<&SemanticInfo> {
        self.units.get(path)
    }

    #[must_use]
    pub fn get_unit_by_id(&self, unit: UnitId) -> Option<&SemanticInfo> {
        self.paths_by_id
            .get(&unit)
            .and_then(|path| self.units.get(path))
    }

    pub(crate) fn get_unit_by_id_mut(&mut self, unit: UnitId) -> Option<&mut SemanticInfo> {
        let path = self.paths_by_id.get(&unit)?;
        self.units.get_mut(path)
    }

    pub fn units(&self) -> impl Iterator<Item = &SemanticInfo> {
        self.units.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[must_use]
    pub fn decl(&self, id: DeclId) -> Option<&Decl> {
        self.get_unit_by_id(id.unit)?.decl(id)
    }

    pub(crate) fn decl_mut(&mut self, id: DeclId) -> Option<&mut Decl> {
        self.get_unit_by_id_mut(id.unit)?.decl_mut(id)
    }

    /// Top-level symbols called `name`, across all units in chain order.
    #[must_use]
    pub fn global_symbols(&self, name: &str) -> Vec<SymbolId> {
        let mut found: Vec<SymbolId> = Vec::new();
        for info in self.units.values() {
            for &symbol in info.top_level_symbols(name) {
                if !found.contains(&symbol) {
                    found.push(symbol);
                }
            }
        }
        found
    }

    /// Cross-unit lookup of a dotted path from the global table. Qualifiers
    /// must be modules and later segments must be exported from them; the
    /// last segment must satisfy `meaning`. Aliases are followed only if they
    /// have already been resolved.
    #[must_use]
    pub fn find_symbol(
        &self,
        symbols: &SymbolArena,
        segments: &[&str],
        meaning: Meaning,
    ) -> Option<SymbolId> {
        let (first, rest) = segments.split_first()?;
        let first_meaning = if rest.is_empty() { meaning } else { Meaning::Namespace };
        self.global_symbols(first)
            .into_iter()
            .filter(|&id| symbols.kind(id).is_some_and(|kind| first_meaning.admits(kind)))
            .find_map(|id| walk_resolved_path(symbols, id, rest, meaning))
    }
}

fn follow_resolved_alias(symbols: &SymbolArena, id: SymbolId) -> SymbolId {
    match symbols.get(id) {
        Some(sym) if sym.kind == SymbolKind::Alias => sym
            .first_target(SymbolLinkKind::TypedAs)
            .unwrap_or(id),
        _ => id,
    }
}

fn walk_resolved_path(
    symbols: &SymbolArena,
    start: SymbolId,
    rest: &[&str],
    meaning: Meaning,
) -> Option<SymbolId> {
    let mut current = start;
    for (i, segment) in rest.iter().enumerate() {
        let last = i + 1 == rest.len();
        let step_meaning = if last { meaning } else { Meaning::Namespace };
        let container = follow_resolved_alias(symbols, current);
        current = symbols
            .get_public_members(container)
            .iter()
            .copied()
            .find(|&child| {
                symbols.get(child).is_some_and(|sym| {
                    sym.name == *segment && step_meaning.admits(sym.kind)
                })
            })?;
    }
    Some(current)
}
