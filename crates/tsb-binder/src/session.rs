//! Session state.
//!
//! A `Session` owns everything that lives longer than one unit: the symbol
//! arena (and with it the identity counter), the semantic info chain, the
//! well-known symbols, options and the diagnostic log. Several sessions can
//! coexist in one process; `reset` is the teardown point.

use crate::binder::bind_unit;
use crate::collector::collect_with_limit;
use crate::decl::{DeclId, UnitId};
use crate::error::BindError;
use crate::links::SymbolLinkKind;
use crate::options::BinderOptions;
use crate::resolver::Resolver;
use crate::semantic_info::{Meaning, SemanticInfo, SemanticInfoChain};
use crate::symbols::{SymbolArena, SymbolFlags, SymbolId, SymbolKind};
use crate::well_known::WellKnownSymbols;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use tsb_common::{Diagnostic, diagnostic_codes};
use tsb_syntax::{NodeArena, NodeIndex};

/// Violations reported by [`Session::validate_symbol_graph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An edge recorded on one endpoint but not the other.
    MissingMirror {
        start: SymbolId,
        end: SymbolId,
        kind: SymbolLinkKind,
    },
    /// A membership edge without its `ContainedBy` pair.
    UnpairedMembership { container: SymbolId, member: SymbolId },
    /// A class whose instance side is missing, shared, or the class itself.
    BrokenClassDuality { class: SymbolId, name: String },
    DuplicateArraySpecialization { element: SymbolId, count: usize },
    /// A symbol that lost all declarations but is still linked.
    OrphanedSymbol { symbol: SymbolId, name: String },
    /// A declaration listed on a symbol that the chain does not know.
    BrokenDeclaration { symbol: SymbolId, decl: DeclId },
    /// A decl back-link to a symbol that does not list the decl.
    BrokenDeclBackLink { decl: DeclId, symbol: SymbolId },
}

/// Serializable view of the symbol graph.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSnapshot {
    pub units: Vec<String>,
    pub symbols: Vec<SymbolSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SymbolSnapshot {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    pub flags: SymbolFlags,
    pub declarations: usize,
    pub edges: Vec<EdgeSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeSnapshot {
    pub kind: SymbolLinkKind,
    pub target: SymbolId,
    pub target_name: String,
}

impl GraphSnapshot {
    /// Id-free description of the graph, one sorted line per symbol. Two
    /// bindings of the same program have equal shapes.
    #[must_use]
    pub fn shape(&self) -> Vec<String> {
        let by_id: rustc_hash::FxHashMap<SymbolId, &SymbolSnapshot> =
            self.symbols.iter().map(|sym| (sym.id, sym)).collect();
        let mut lines: Vec<String> = self
            .symbols
            .iter()
            .map(|sym| {
                let mut edges: Vec<String> = sym
                    .edges
                    .iter()
                    .map(|edge| {
                        let target_kind = by_id
                            .get(&edge.target)
                            .map_or_else(|| "?".to_string(), |t| format!("{:?}", t.kind));
                        format!("{:?}->{}:{}", edge.kind, target_kind, edge.target_name)
                    })
                    .collect();
                edges.sort();
                format!(
                    "{:?} {} {:?} decls={} [{}]",
                    sym.kind,
                    sym.name,
                    sym.flags,
                    sym.declarations,
                    edges.join(", ")
                )
            })
            .collect();
        lines.sort();
        lines
    }
}

#[derive(Debug)]
pub struct Session {
    symbols: SymbolArena,
    chain: SemanticInfoChain,
    well_known: WellKnownSymbols,
    options: BinderOptions,
    diagnostics: Vec<Diagnostic>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(BinderOptions::default())
    }

    #[must_use]
    pub fn with_options(options: BinderOptions) -> Self {
        let mut symbols = SymbolArena::new();
        let well_known = WellKnownSymbols::create(&mut symbols);
        Session {
            symbols,
            chain: SemanticInfoChain::new(),
            well_known,
            options,
            diagnostics: Vec::new(),
        }
    }

    // =========================================================================
    // Units
    // =========================================================================

    /// Collect and bind a unit. Adding a path that is already present
    /// replaces it as [`Session::update_unit`] does.
    #[instrument(level = "debug", skip(self, arena))]
    pub fn add_unit(
        &mut self,
        path: &str,
        arena: Arc<NodeArena>,
        root: NodeIndex,
    ) -> Result<UnitId, BindError> {
        if self.chain.get_unit(path).is_some() {
            return self.update_unit(path, arena, root);
        }
        self.attach_unit(path, arena, root)
    }

    /// Replace a unit with a new tree. Symbols the old tree contributed to
    /// lose those declarations and are invalidated; symbols left with no
    /// declarations are unlinked and whatever resolved through them is
    /// invalidated. Declarations of the new tree merge back into surviving
    /// symbols.
    #[instrument(level = "debug", skip(self, arena))]
    pub fn update_unit(
        &mut self,
        path: &str,
        arena: Arc<NodeArena>,
        root: NodeIndex,
    ) -> Result<UnitId, BindError> {
        self.detach_unit(path);
        self.attach_unit(path, arena, root)
    }

    pub fn remove_unit(&mut self, path: &str) -> Result<(), BindError> {
        if !self.detach_unit(path) {
            return Err(BindError::UnknownUnit {
                path: path.to_string(),
            });
        }
        info!(path, "removed unit");
        Ok(())
    }

    /// Session teardown: drops every unit and symbol and restarts identity
    /// numbering.
    pub fn reset(&mut self) {
        self.symbols = SymbolArena::new();
        self.chain.clear();
        self.well_known = WellKnownSymbols::create(&mut self.symbols);
        self.diagnostics.clear();
        info!("session reset");
    }

    fn attach_unit(
        &mut self,
        path: &str,
        arena: Arc<NodeArena>,
        root: NodeIndex,
    ) -> Result<UnitId, BindError> {
        let unit = self.chain.allocate_unit_id();
        let mut semantic_info = SemanticInfo::new(unit, path, arena, root);
        collect_with_limit(&mut semantic_info, self.options.max_collect_depth);
        self.diagnostics.extend(semantic_info.take_diagnostics());
        self.chain.insert(semantic_info);
        bind_unit(&mut self.symbols, &mut self.chain, unit)?;

        // A new unit may declare names that earlier lookups missed, or that
        // are now closer to a lookup than what it found.
        let declared: FxHashSet<&str> = self
            .symbols
            .iter()
            .filter(|sym| sym.declarations().iter().any(|decl| decl.unit == unit))
            .map(|sym| sym.name.as_str())
            .collect();
        let mut roots: Vec<SymbolId> = self
            .symbols
            .iter()
            .filter(|sym| declared.contains(sym.name.as_str()))
            .map(|sym| sym.id)
            .collect();
        let had_misses = !self.symbols.get_dependents(self.well_known.error).is_empty();
        roots.push(self.well_known.error);
        let retried = self.invalidate_resolved_through(roots);
        if had_misses {
            self.retract_lookup_misses();
        }
        info!(path, unit = unit.0, retried, "bound unit");
        Ok(unit)
    }

    /// Invalidate every symbol whose resolution went through one of
    /// `roots`, following synthesized types up to the symbols that hold
    /// them. Returns how many symbols were invalidated.
    fn invalidate_resolved_through(&mut self, roots: Vec<SymbolId>) -> usize {
        let mut expanded: FxHashSet<SymbolId> = roots.iter().copied().collect();
        let mut invalidated: FxHashSet<SymbolId> = FxHashSet::default();
        let mut worklist = roots;
        while let Some(id) = worklist.pop() {
            let dependents: Vec<SymbolId> = self
                .symbols
                .get(id)
                .map(|sym| {
                    sym.incoming()
                        .iter()
                        .filter(|l| l.kind.is_resolution() || l.kind == SymbolLinkKind::ArrayOf)
                        .map(|l| l.start)
                        .collect()
                })
                .unwrap_or_default();
            for dependent in dependents {
                if !invalidated.insert(dependent) {
                    continue;
                }
                self.invalidate_upward(dependent);
                // A field of a type literal or a parameter of a function
                // type belongs to a synthesized owner that has no
                // declaration to re-resolve from.
                let mut owner = Some(dependent);
                while let Some(current) = owner {
                    if self.is_synthesized(current) && expanded.insert(current) {
                        worklist.push(current);
                    }
                    owner = self.symbols.get_container(current);
                }
            }
        }
        invalidated.len()
    }

    fn is_synthesized(&self, id: SymbolId) -> bool {
        self.symbols.get(id).is_some_and(|sym| {
            sym.has_flag(SymbolFlags::SYNTHESIZED) && !sym.has_flag(SymbolFlags::WELL_KNOWN)
        })
    }

    /// Drop name-lookup failures. Every symbol behind one was just
    /// invalidated and reports it again if it still fails.
    fn retract_lookup_misses(&mut self) {
        self.diagnostics.retain(|diag| {
            diag.code != diagnostic_codes::CANNOT_FIND_NAME
                && diag.code != diagnostic_codes::CANNOT_FIND_NAMESPACE
        });
    }

    /// Remove a unit's contribution to the graph. Returns `false` if no
    /// unit has that path.
    fn detach_unit(&mut self, path: &str) -> bool {
        let Some(removed) = self.chain.remove(path) else {
            return false;
        };
        let unit = removed.unit;

        let ids: Vec<SymbolId> = self.symbols.iter().map(|sym| sym.id).collect();
        let mut touched = Vec::new();
        let mut dead: FxHashSet<SymbolId> = FxHashSet::default();
        let mut worklist = Vec::new();
        for id in ids {
            if self.symbols.retain_declarations(id, |decl| decl.unit != unit) == 0 {
                continue;
            }
            touched.push(id);
            let orphaned = self.symbols.get(id).is_some_and(|sym| {
                sym.declarations().is_empty()
                    && !sym.flags.intersects(SymbolFlags::WELL_KNOWN | SymbolFlags::SYNTHESIZED)
            });
            if orphaned && dead.insert(id) {
                worklist.push(id);
            }
        }

        // Synthesized types built over a dead symbol die with it; anything
        // else that pointed at it only needs re-resolving.
        let mut stale = Vec::new();
        while let Some(id) = worklist.pop() {
            if let Some(container) = self.symbols.get_container(id) {
                stale.push(container);
            }
            for dependent in self.symbols.get_dependents(id) {
                if dead.contains(&dependent) {
                    continue;
                }
                if self.is_synthesized(dependent) {
                    dead.insert(dependent);
                    worklist.push(dependent);
                } else {
                    stale.push(dependent);
                }
            }
        }

        for &id in &dead {
            self.symbols.unlink_all(id);
        }
        for id in touched.into_iter().chain(stale) {
            if !dead.contains(&id) {
                self.invalidate_upward(id);
            }
        }
        self.diagnostics.retain(|diag| diag.file != path);
        debug!(path, unlinked = dead.len(), "detached unit");
        true
    }

    /// Invalidate `id` and the symbols whose resolution state covers it: the
    /// other side of a class, and the signature and function owning a
    /// parameter.
    fn invalidate_upward(&mut self, id: SymbolId) {
        let mut seen = FxHashSet::default();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            self.symbols.invalidate(id);
            match self.symbols.kind(id) {
                Some(SymbolKind::InstanceType) => {
                    stack.extend(self.symbols.get_class_of_instance(id));
                }
                Some(SymbolKind::Class) => stack.extend(self.symbols.get_instance_type(id)),
                Some(SymbolKind::Parameter | SymbolKind::Signature) => {
                    stack.extend(self.symbols.get_container(id));
                }
                _ => {}
            }
        }
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// A resolver over this session's graph.
    pub fn resolver(&mut self) -> Resolver<'_> {
        Resolver::new(
            &mut self.symbols,
            &self.chain,
            &self.well_known,
            &self.options,
            &mut self.diagnostics,
        )
    }

    #[must_use]
    pub const fn symbols(&self) -> &SymbolArena {
        &self.symbols
    }

    #[must_use]
    pub const fn chain(&self) -> &SemanticInfoChain {
        &self.chain
    }

    #[must_use]
    pub const fn well_known(&self) -> &WellKnownSymbols {
        &self.well_known
    }

    #[must_use]
    pub const fn options(&self) -> &BinderOptions {
        &self.options
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Global lookup of a dotted name such as `"M.N.T"`.
    #[must_use]
    pub fn find_symbol(&self, dotted: &str, meaning: Meaning) -> Option<SymbolId> {
        let segments: Vec<&str> = dotted.split('.').collect();
        self.chain.find_symbol(&self.symbols, &segments, meaning)
    }

    #[must_use]
    pub fn get_decl_for_ast(&self, path: &str, node: NodeIndex) -> Option<DeclId> {
        self.chain.get_unit(path)?.get_decl_for_ast(node)
    }

    #[must_use]
    pub fn get_ast_for_decl(&self, decl: DeclId) -> Option<NodeIndex> {
        self.chain.get_unit_by_id(decl.unit)?.get_ast_for_decl(decl)
    }

    #[must_use]
    pub fn decl(&self, id: DeclId) -> Option<&crate::decl::Decl> {
        self.chain.decl(id)
    }

    // =========================================================================
    // Validation and snapshots
    // =========================================================================

    /// Check the structural invariants of the graph. An empty result means
    /// the graph is consistent.
    #[must_use]
    pub fn validate_symbol_graph(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for sym in self.symbols.iter() {
            for link in sym.outgoing() {
                let mirrored = self
                    .symbols
                    .get(link.end)
                    .is_some_and(|end| end.incoming().contains(link));
                if !mirrored {
                    errors.push(ValidationError::MissingMirror {
                        start: link.start,
                        end: link.end,
                        kind: link.kind,
                    });
                }
                if link.kind.is_membership() {
                    let paired = self.symbols.get(link.end).is_some_and(|member| {
                        member
                            .targets(SymbolLinkKind::ContainedBy)
                            .filter(|&c| c == sym.id)
                            .count()
                            == 1
                    });
                    if !paired {
                        errors.push(ValidationError::UnpairedMembership {
                            container: sym.id,
                            member: link.end,
                        });
                    }
                }
            }
            for link in sym.incoming() {
                let mirrored = self
                    .symbols
                    .get(link.start)
                    .is_some_and(|start| start.outgoing().contains(link));
                if !mirrored {
                    errors.push(ValidationError::MissingMirror {
                        start: link.start,
                        end: link.end,
                        kind: link.kind,
                    });
                }
            }

            if sym.kind == SymbolKind::Class && !sym.declarations().is_empty() {
                let instances: Vec<SymbolId> = sym.targets(SymbolLinkKind::InstanceType).collect();
                let valid = matches!(instances.as_slice(), [instance] if *instance != sym.id
                    && self.symbols.kind(*instance) == Some(SymbolKind::InstanceType));
                if !valid {
                    errors.push(ValidationError::BrokenClassDuality {
                        class: sym.id,
                        name: sym.name.clone(),
                    });
                }
            }

            let arrays = sym.sources(SymbolLinkKind::ArrayOf).count();
            if arrays > 1 {
                errors.push(ValidationError::DuplicateArraySpecialization {
                    element: sym.id,
                    count: arrays,
                });
            }

            let linked = !sym.outgoing().is_empty() || !sym.incoming().is_empty();
            if sym.declarations().is_empty()
                && linked
                && !sym.flags.intersects(SymbolFlags::WELL_KNOWN | SymbolFlags::SYNTHESIZED)
            {
                errors.push(ValidationError::OrphanedSymbol {
                    symbol: sym.id,
                    name: sym.name.clone(),
                });
            }

            for &decl in sym.declarations() {
                if self.chain.decl(decl).is_none() {
                    errors.push(ValidationError::BrokenDeclaration { symbol: sym.id, decl });
                }
            }
        }

        for info in self.chain.units() {
            for decl in info.decls() {
                let Some(symbol) = decl.symbol() else {
                    continue;
                };
                let listed = self
                    .symbols
                    .get(symbol)
                    .is_some_and(|sym| sym.declarations().contains(&decl.id));
                if !listed {
                    errors.push(ValidationError::BrokenDeclBackLink {
                        decl: decl.id,
                        symbol,
                    });
                }
            }
        }

        errors
    }

    /// The live part of the graph: symbols with declarations or edges, plus
    /// the well-known symbols.
    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot {
        let symbols = self
            .symbols
            .iter()
            .filter(|sym| {
                !sym.declarations().is_empty()
                    || !sym.outgoing().is_empty()
                    || sym.has_flag(SymbolFlags::WELL_KNOWN)
            })
            .map(|sym| SymbolSnapshot {
                id: sym.id,
                name: sym.name.clone(),
                kind: sym.kind,
                flags: sym.flags,
                declarations: sym.declarations().len(),
                edges: sym
                    .outgoing()
                    .iter()
                    .map(|link| EdgeSnapshot {
                        kind: link.kind,
                        target: link.end,
                        target_name: self.symbols.name(link.end).to_string(),
                    })
                    .collect(),
            })
            .collect();
        GraphSnapshot {
            units: self.chain.units().map(|info| info.path.clone()).collect(),
            symbols,
        }
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.snapshot())
    }
}
