//! The symbol graph.
//!
//! Symbols live in a `SymbolArena` and are addressed by `SymbolId`. Edges are
//! `SymbolLink`s stored on both endpoints, so "what does this point at" and
//! "who points at this" are both a list scan. Every derived list a symbol
//! exposes (members, signatures, heritage) is a lazily filled cache over its
//! edges; the edges are the only source of truth.

use crate::decl::DeclId;
use crate::error::BindError;
use crate::links::{SymbolLink, SymbolLinkKind};
use bitflags::bitflags;
use once_cell::unsync::OnceCell;
use rustc_hash::FxHashSet;
use serde::Serialize;
use smallvec::SmallVec;
use std::collections::VecDeque;
use tsb_common::limits;

/// Stable identity of a symbol within a session. Assigned monotonically and
/// never reused, so it is safe as a cache key across rebinding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SymbolKind {
    /// `any`, `number`, `string`, ...
    Primitive,
    /// Placeholder substituted for unresolved references.
    Error,
    Module,
    /// `declare module "name"`
    DynamicModule,
    /// The constructor (static) side of a class.
    Class,
    /// The instance side of a class.
    InstanceType,
    Interface,
    /// Anonymous object type from a `{ ... }` type literal.
    TypeLiteral,
    /// `T[]`
    Array,
    Function,
    Method,
    Signature,
    Field,
    Variable,
    Parameter,
    /// `import x = ...`
    Alias,
}

impl SymbolKind {
    /// Kinds that denote a type when named in a type position.
    #[must_use]
    pub const fn is_type(self) -> bool {
        matches!(
            self,
            Self::Primitive
                | Self::Error
                | Self::Class
                | Self::InstanceType
                | Self::Interface
                | Self::TypeLiteral
                | Self::Array
        )
    }

    /// Kinds that can hold named children.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::Module
                | Self::DynamicModule
                | Self::Class
                | Self::InstanceType
                | Self::Interface
                | Self::TypeLiteral
                | Self::Function
                | Self::Method
        )
    }

    /// Object types whose members participate in heritage.
    #[must_use]
    pub const fn is_object_type(self) -> bool {
        matches!(
            self,
            Self::InstanceType | Self::Interface | Self::TypeLiteral
        )
    }

    #[must_use]
    pub const fn is_function_like(self) -> bool {
        matches!(self, Self::Function | Self::Method)
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct SymbolFlags: u16 {
        const EXPORTED = 1 << 0;
        const AMBIENT = 1 << 1;
        const STATIC = 1 << 2;
        const PRIVATE = 1 << 3;
        const OPTIONAL = 1 << 4;
        /// Field backed by a get/set accessor pair.
        const ACCESSOR = 1 << 5;
        /// The implementation signature of a function or method.
        const DEFINITION = 1 << 6;
        /// Created by the resolver, not by a declaration.
        const SYNTHESIZED = 1 << 7;
        /// Session-lifetime primitive or the error placeholder.
        const WELL_KNOWN = 1 << 8;
        /// Signature contributed by a class constructor.
        const CONSTRUCTOR = 1 << 9;
    }
}

// =============================================================================
// Derived caches
// =============================================================================

#[derive(Debug, Default)]
struct TypeCaches {
    members: OnceCell<Vec<SymbolId>>,
    public_members: OnceCell<Vec<SymbolId>>,
    static_members: OnceCell<Vec<SymbolId>>,
    extended: OnceCell<Vec<SymbolId>>,
    implemented: OnceCell<Vec<SymbolId>>,
    call_signatures: OnceCell<Vec<SymbolId>>,
    construct_signatures: OnceCell<Vec<SymbolId>>,
    index_signatures: OnceCell<Vec<SymbolId>>,
}

#[derive(Debug, Default)]
struct FunctionCaches {
    /// Overloads in source order, definition last.
    signatures: OnceCell<Vec<SymbolId>>,
    definition: OnceCell<Option<SymbolId>>,
}

#[derive(Debug, Default)]
struct SignatureCaches {
    parameters: OnceCell<Vec<SymbolId>>,
    return_type: OnceCell<Option<SymbolId>>,
}

/// Kind-specific state. One tagged variant instead of a type hierarchy.
#[derive(Debug)]
enum SymbolDetails {
    Plain,
    Type(Box<TypeCaches>),
    Function(Box<FunctionCaches>),
    Signature(Box<SignatureCaches>),
}

impl SymbolDetails {
    fn for_kind(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Primitive
            | SymbolKind::Error
            | SymbolKind::Module
            | SymbolKind::DynamicModule
            | SymbolKind::Class
            | SymbolKind::InstanceType
            | SymbolKind::Interface
            | SymbolKind::TypeLiteral
            | SymbolKind::Array => SymbolDetails::Type(Box::default()),
            SymbolKind::Function | SymbolKind::Method => SymbolDetails::Function(Box::default()),
            SymbolKind::Signature => SymbolDetails::Signature(Box::default()),
            SymbolKind::Field | SymbolKind::Variable | SymbolKind::Parameter | SymbolKind::Alias => {
                SymbolDetails::Plain
            }
        }
    }
}

// =============================================================================
// Symbol
// =============================================================================

/// A named semantic entity. Several declarations may contribute to one
/// symbol (declaration merging).
#[derive(Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    pub flags: SymbolFlags,
    declarations: Vec<DeclId>,
    outgoing: SmallVec<[SymbolLink; 4]>,
    incoming: SmallVec<[SymbolLink; 4]>,
    resolved: bool,
    container: OnceCell<Option<SymbolId>>,
    type_cache: OnceCell<Option<SymbolId>>,
    details: SymbolDetails,
}

impl Symbol {
    fn new(id: SymbolId, name: String, kind: SymbolKind, flags: SymbolFlags) -> Self {
        Symbol {
            id,
            name,
            kind,
            flags,
            declarations: Vec::new(),
            outgoing: SmallVec::new(),
            incoming: SmallVec::new(),
            resolved: false,
            container: OnceCell::new(),
            type_cache: OnceCell::new(),
            details: SymbolDetails::for_kind(kind),
        }
    }

    /// Contributing declarations in the order they were bound.
    #[must_use]
    pub fn declarations(&self) -> &[DeclId] {
        &self.declarations
    }

    #[must_use]
    pub fn outgoing(&self) -> &[SymbolLink] {
        &self.outgoing
    }

    #[must_use]
    pub fn incoming(&self) -> &[SymbolLink] {
        &self.incoming
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    #[must_use]
    pub const fn has_flag(&self, flag: SymbolFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn targets(&self, kind: SymbolLinkKind) -> impl Iterator<Item = SymbolId> + '_ {
        self.outgoing
            .iter()
            .filter(move |link| link.kind == kind)
            .map(|link| link.end)
    }

    pub fn sources(&self, kind: SymbolLinkKind) -> impl Iterator<Item = SymbolId> + '_ {
        self.incoming
            .iter()
            .filter(move |link| link.kind == kind)
            .map(|link| link.start)
    }

    #[must_use]
    pub fn first_target(&self, kind: SymbolLinkKind) -> Option<SymbolId> {
        self.targets(kind).next()
    }

    fn clear_caches(&mut self) {
        self.container.take();
        self.type_cache.take();
        self.details = SymbolDetails::for_kind(self.kind);
    }

    fn has_link(&self, link: &SymbolLink) -> bool {
        self.outgoing.contains(link)
    }
}

// =============================================================================
// SymbolArena
// =============================================================================

/// Owner of every symbol in a session. Ids index directly into the arena.
#[derive(Debug)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl Default for SymbolArena {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolArena {
    #[must_use]
    pub fn new() -> Self {
        SymbolArena {
            symbols: Vec::with_capacity(limits::INITIAL_SYMBOL_CAPACITY),
        }
    }

    pub fn alloc(&mut self, name: impl Into<String>, kind: SymbolKind, flags: SymbolFlags) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol::new(id, name.into(), kind, flags));
        id
    }

    #[must_use]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    pub(crate) fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0 as usize)
    }

    fn expect_mut(&mut self, id: SymbolId) -> Result<&mut Symbol, BindError> {
        self.get_mut(id)
            .ok_or(BindError::UnknownSymbol { symbol: id })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    #[must_use]
    pub fn name(&self, id: SymbolId) -> &str {
        self.get(id).map_or("", |sym| sym.name.as_str())
    }

    #[must_use]
    pub fn kind(&self, id: SymbolId) -> Option<SymbolKind> {
        self.get(id).map(|sym| sym.kind)
    }

    pub(crate) fn add_declaration(&mut self, id: SymbolId, decl: DeclId) -> Result<(), BindError> {
        let sym = self.expect_mut(id)?;
        if !sym.declarations.contains(&decl) {
            sym.declarations.push(decl);
        }
        Ok(())
    }

    /// Drop every declaration matching `pred`. Returns how many were removed.
    pub(crate) fn retain_declarations(
        &mut self,
        id: SymbolId,
        mut keep: impl FnMut(&DeclId) -> bool,
    ) -> usize {
        let Some(sym) = self.get_mut(id) else {
            return 0;
        };
        let before = sym.declarations.len();
        sym.declarations.retain(|decl| keep(decl));
        before - sym.declarations.len()
    }

    pub(crate) fn set_resolved(&mut self, id: SymbolId, resolved: bool) {
        if let Some(sym) = self.get_mut(id) {
            sym.resolved = resolved;
        }
    }

    // =========================================================================
    // Edges
    // =========================================================================

    /// Add `start --kind--> end` and its mirror on `end`.
    ///
    /// Membership kinds also add `end --ContainedBy--> start` unless it is
    /// already present. Adding an edge that already exists is a no-op and
    /// returns `false`.
    pub fn add_outgoing_link(
        &mut self,
        start: SymbolId,
        end: SymbolId,
        kind: SymbolLinkKind,
    ) -> Result<bool, BindError> {
        if self.get(end).is_none() {
            return Err(BindError::UnknownSymbol { symbol: end });
        }
        if self.get(start).is_none() {
            return Err(BindError::UnknownSymbol { symbol: start });
        }
        let created = self.push_link(SymbolLink::new(start, end, kind));
        if kind.is_membership() {
            self.push_link(SymbolLink::new(end, start, SymbolLinkKind::ContainedBy));
        }
        Ok(created)
    }

    fn push_link(&mut self, link: SymbolLink) -> bool {
        let Some(start) = self.get_mut(link.start) else {
            return false;
        };
        if start.has_link(&link) {
            return false;
        }
        start.outgoing.push(link);
        start.clear_caches();
        if let Some(end) = self.get_mut(link.end) {
            end.incoming.push(link);
            end.clear_caches();
        }
        true
    }

    fn drop_link(&mut self, link: SymbolLink) -> bool {
        let mut removed = false;
        if let Some(start) = self.get_mut(link.start) {
            if let Some(pos) = start.outgoing.iter().position(|l| *l == link) {
                start.outgoing.remove(pos);
                start.clear_caches();
                removed = true;
            }
        }
        if let Some(end) = self.get_mut(link.end) {
            if let Some(pos) = end.incoming.iter().position(|l| *l == link) {
                end.incoming.remove(pos);
                end.clear_caches();
            }
        }
        removed
    }

    /// Remove `start --kind--> end` with its mirror. Removing a membership
    /// edge removes its `ContainedBy` pair and vice versa.
    pub fn remove_link(&mut self, start: SymbolId, end: SymbolId, kind: SymbolLinkKind) -> bool {
        let removed = self.drop_link(SymbolLink::new(start, end, kind));
        if !removed {
            return false;
        }
        if kind.is_membership() {
            let still_member = self
                .get(start)
                .is_some_and(|sym| sym.outgoing.iter().any(|l| l.end == end && l.kind.is_membership()));
            if !still_member {
                self.drop_link(SymbolLink::new(end, start, SymbolLinkKind::ContainedBy));
            }
        } else if kind == SymbolLinkKind::ContainedBy {
            let memberships: Vec<SymbolLink> = self
                .get(end)
                .map(|container| {
                    container
                        .outgoing
                        .iter()
                        .filter(|l| l.end == start && l.kind.is_membership())
                        .copied()
                        .collect()
                })
                .unwrap_or_default();
            for link in memberships {
                self.drop_link(link);
            }
        }
        true
    }

    /// Remove every outgoing edge of `kind` from `start`. Returns the old targets.
    pub fn remove_outgoing_links(&mut self, start: SymbolId, kind: SymbolLinkKind) -> Vec<SymbolId> {
        let targets: Vec<SymbolId> = self
            .get(start)
            .map(|sym| sym.targets(kind).collect())
            .unwrap_or_default();
        for &end in &targets {
            self.remove_link(start, end, kind);
        }
        targets
    }

    /// Point a single-valued edge kind at `end`, replacing any previous target.
    pub fn set_single_link(
        &mut self,
        start: SymbolId,
        end: SymbolId,
        kind: SymbolLinkKind,
    ) -> Result<(), BindError> {
        let current: Vec<SymbolId> = self
            .get(start)
            .ok_or(BindError::UnknownSymbol { symbol: start })?
            .targets(kind)
            .collect();
        for old in current.into_iter().filter(|&old| old != end) {
            self.remove_link(start, old, kind);
        }
        self.add_outgoing_link(start, end, kind)?;
        Ok(())
    }

    /// Remove every edge touching `id`, in both directions.
    pub fn unlink_all(&mut self, id: SymbolId) {
        let Some(sym) = self.get(id) else {
            return;
        };
        let links: Vec<SymbolLink> = sym.outgoing.iter().chain(sym.incoming.iter()).copied().collect();
        for link in links {
            self.remove_link(link.start, link.end, link.kind);
        }
    }

    /// Wire the instance side of a class. Allowed exactly once per class.
    pub fn set_instance_type(&mut self, class: SymbolId, instance: SymbolId) -> Result<(), BindError> {
        if self.get_instance_type(class).is_some() {
            return Err(BindError::DuplicateInstanceType { class });
        }
        self.add_outgoing_link(class, instance, SymbolLinkKind::InstanceType)?;
        Ok(())
    }

    /// Clear every cached value on the symbol, including the resolved flag.
    /// Edges are kept; the next query recomputes from them.
    pub fn invalidate(&mut self, id: SymbolId) {
        if let Some(sym) = self.get_mut(id) {
            if sym.has_flag(SymbolFlags::WELL_KNOWN) {
                return;
            }
            sym.resolved = false;
            sym.clear_caches();
        }
    }

    // =========================================================================
    // Derived queries
    // =========================================================================

    /// Lexical or structural owner: `ContainedBy` target, else the class of an
    /// instance side, else the owner of a signature or parameter.
    #[must_use]
    pub fn get_container(&self, id: SymbolId) -> Option<SymbolId> {
        let sym = self.get(id)?;
        *sym.container.get_or_init(|| {
            sym.first_target(SymbolLinkKind::ContainedBy)
                .or_else(|| sym.sources(SymbolLinkKind::InstanceType).next())
                .or_else(|| {
                    sym.incoming
                        .iter()
                        .find(|l| l.kind.is_signature() || l.kind == SymbolLinkKind::Parameter)
                        .map(|l| l.start)
                })
        })
    }

    /// The type a symbol denotes or is annotated with.
    #[must_use]
    pub fn get_type(&self, id: SymbolId) -> Option<SymbolId> {
        let sym = self.get(id)?;
        *sym.type_cache.get_or_init(|| {
            if let Some(ty) = sym.first_target(SymbolLinkKind::TypedAs) {
                return Some(ty);
            }
            match sym.kind {
                SymbolKind::Class => sym.first_target(SymbolLinkKind::InstanceType),
                kind if kind.is_type() || kind.is_function_like() => Some(id),
                _ => None,
            }
        })
    }

    #[must_use]
    pub fn get_instance_type(&self, id: SymbolId) -> Option<SymbolId> {
        self.get(id)?.first_target(SymbolLinkKind::InstanceType)
    }

    /// Inverse of `get_instance_type`.
    #[must_use]
    pub fn get_class_of_instance(&self, id: SymbolId) -> Option<SymbolId> {
        self.get(id)?.sources(SymbolLinkKind::InstanceType).next()
    }

    fn type_caches(&self, id: SymbolId) -> Option<(&Symbol, &TypeCaches)> {
        let sym = self.get(id)?;
        match &sym.details {
            SymbolDetails::Type(caches) => Some((sym, caches.as_ref())),
            _ => None,
        }
    }

    /// Declared members, in binding order. Base types are not included.
    #[must_use]
    pub fn get_members(&self, id: SymbolId) -> &[SymbolId] {
        match self.type_caches(id) {
            Some((sym, caches)) => caches.members.get_or_init(|| {
                sym.outgoing
                    .iter()
                    .filter(|l| l.kind.is_membership())
                    .map(|l| l.end)
                    .collect()
            }),
            None => &[],
        }
    }

    #[must_use]
    pub fn get_public_members(&self, id: SymbolId) -> &[SymbolId] {
        match self.type_caches(id) {
            Some((sym, caches)) => caches
                .public_members
                .get_or_init(|| sym.targets(SymbolLinkKind::PublicProperty).collect()),
            None => &[],
        }
    }

    #[must_use]
    pub fn get_static_members(&self, id: SymbolId) -> &[SymbolId] {
        match self.type_caches(id) {
            Some((sym, caches)) => caches
                .static_members
                .get_or_init(|| sym.targets(SymbolLinkKind::StaticProperty).collect()),
            None => &[],
        }
    }

    /// Resolved bases. A heritage entry that failed to resolve keeps an
    /// edge to the error symbol so it is retried, but is not listed here.
    #[must_use]
    pub fn get_extended_types(&self, id: SymbolId) -> &[SymbolId] {
        match self.type_caches(id) {
            Some((sym, caches)) => caches
                .extended
                .get_or_init(|| self.heritage_targets(sym, SymbolLinkKind::Extends)),
            None => &[],
        }
    }

    #[must_use]
    pub fn get_implemented_types(&self, id: SymbolId) -> &[SymbolId] {
        match self.type_caches(id) {
            Some((sym, caches)) => caches
                .implemented
                .get_or_init(|| self.heritage_targets(sym, SymbolLinkKind::Implements)),
            None => &[],
        }
    }

    fn heritage_targets(&self, sym: &Symbol, kind: SymbolLinkKind) -> Vec<SymbolId> {
        sym.targets(kind)
            .filter(|&ty| self.kind(ty) != Some(SymbolKind::Error))
            .collect()
    }

    fn ordered_signatures(&self, sym: &Symbol, kind: SymbolLinkKind) -> Vec<SymbolId> {
        let mut sigs: Vec<SymbolId> = sym.targets(kind).collect();
        sigs.sort_by_key(|&sig| self.is_definition_signature(sig));
        sigs
    }

    /// Call signatures. For functions and methods these are the overloads in
    /// source order followed by the definition signature.
    #[must_use]
    pub fn get_call_signatures(&self, id: SymbolId) -> &[SymbolId] {
        let Some(sym) = self.get(id) else {
            return &[];
        };
        match &sym.details {
            SymbolDetails::Type(caches) => caches
                .call_signatures
                .get_or_init(|| self.ordered_signatures(sym, SymbolLinkKind::CallSignature)),
            SymbolDetails::Function(caches) => caches
                .signatures
                .get_or_init(|| self.ordered_signatures(sym, SymbolLinkKind::CallSignature)),
            _ => &[],
        }
    }

    #[must_use]
    pub fn get_construct_signatures(&self, id: SymbolId) -> &[SymbolId] {
        match self.type_caches(id) {
            Some((sym, caches)) => caches
                .construct_signatures
                .get_or_init(|| self.ordered_signatures(sym, SymbolLinkKind::ConstructSignature)),
            None => &[],
        }
    }

    #[must_use]
    pub fn get_index_signatures(&self, id: SymbolId) -> &[SymbolId] {
        match self.type_caches(id) {
            Some((sym, caches)) => caches
                .index_signatures
                .get_or_init(|| sym.targets(SymbolLinkKind::IndexSignature).collect()),
            None => &[],
        }
    }

    /// The implementation signature of a function or method, if it has one.
    #[must_use]
    pub fn get_definition_signature(&self, id: SymbolId) -> Option<SymbolId> {
        let sym = self.get(id)?;
        match &sym.details {
            SymbolDetails::Function(caches) => *caches.definition.get_or_init(|| {
                sym.targets(SymbolLinkKind::CallSignature)
                    .find(|&sig| self.is_definition_signature(sig))
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_definition_signature(&self, id: SymbolId) -> bool {
        self.get(id)
            .is_some_and(|sig| sig.has_flag(SymbolFlags::DEFINITION))
    }

    #[must_use]
    pub fn get_parameters(&self, id: SymbolId) -> &[SymbolId] {
        let Some(sym) = self.get(id) else {
            return &[];
        };
        match &sym.details {
            SymbolDetails::Signature(caches) => caches
                .parameters
                .get_or_init(|| sym.targets(SymbolLinkKind::Parameter).collect()),
            _ => &[],
        }
    }

    #[must_use]
    pub fn get_return_type(&self, id: SymbolId) -> Option<SymbolId> {
        let sym = self.get(id)?;
        match &sym.details {
            SymbolDetails::Signature(caches) => *caches
                .return_type
                .get_or_init(|| sym.first_target(SymbolLinkKind::ReturnType)),
            _ => None,
        }
    }

    /// Element type of an array specialization.
    #[must_use]
    pub fn get_array_element_type(&self, id: SymbolId) -> Option<SymbolId> {
        self.get(id)?.first_target(SymbolLinkKind::ArrayOf)
    }

    /// Every `T[]` specialization recorded for `element`. More than one is a
    /// binder bug.
    #[must_use]
    pub fn get_array_specializations(&self, element: SymbolId) -> Vec<SymbolId> {
        self.get(element)
            .map(|sym| sym.sources(SymbolLinkKind::ArrayOf).collect())
            .unwrap_or_default()
    }

    /// Everything lexically contained by `id`: members and plain locals.
    #[must_use]
    pub fn get_children(&self, id: SymbolId) -> Vec<SymbolId> {
        self.get(id)
            .map(|sym| sym.sources(SymbolLinkKind::ContainedBy).collect())
            .unwrap_or_default()
    }

    /// Symbols with a non-containment edge into `id`.
    #[must_use]
    pub fn get_dependents(&self, id: SymbolId) -> Vec<SymbolId> {
        let mut seen = FxHashSet::default();
        self.get(id)
            .map(|sym| {
                sym.incoming
                    .iter()
                    .filter(|l| l.kind != SymbolLinkKind::ContainedBy)
                    .map(|l| l.start)
                    .filter(|start| seen.insert(*start))
                    .collect()
            })
            .unwrap_or_default()
    }

    // =========================================================================
    // Member lookup
    // =========================================================================

    /// Earliest-declared own member called `name`. For a class the instance
    /// side is searched before the static side.
    #[must_use]
    pub fn find_own_member(&self, id: SymbolId, name: &str) -> Option<SymbolId> {
        let sym = self.get(id)?;
        if sym.kind == SymbolKind::Class {
            return self
                .get_instance_type(id)
                .and_then(|instance| self.find_own_member(instance, name))
                .or_else(|| self.first_named(self.get_members(id), name));
        }
        self.first_named(self.get_members(id), name)
    }

    fn first_named(&self, ids: &[SymbolId], name: &str) -> Option<SymbolId> {
        ids.iter().copied().find(|&member| self.name(member) == name)
    }

    /// Member lookup through heritage: own members first, then base types
    /// breadth-first along `Extends` edges. Terminates on cyclic heritage.
    #[must_use]
    pub fn find_member(&self, id: SymbolId, name: &str) -> Option<SymbolId> {
        let sym = self.get(id)?;
        if sym.kind == SymbolKind::Class {
            return self
                .get_instance_type(id)
                .and_then(|instance| self.find_member(instance, name))
                .or_else(|| self.first_named(self.get_static_members(id), name));
        }
        let mut found = None;
        self.walk_heritage(id, |ty| {
            found = self.first_named(self.get_members(ty), name);
            found.is_some()
        });
        found
    }

    /// Own members plus inherited members not shadowed by name.
    #[must_use]
    pub fn get_all_members(&self, id: SymbolId) -> Vec<SymbolId> {
        let start = match self.kind(id) {
            Some(SymbolKind::Class) => match self.get_instance_type(id) {
                Some(instance) => instance,
                None => return Vec::new(),
            },
            Some(_) => id,
            None => return Vec::new(),
        };
        let mut names: FxHashSet<&str> = FxHashSet::default();
        let mut all = Vec::new();
        self.walk_heritage(start, |ty| {
            let level_names: Vec<&str> = self
                .get_members(ty)
                .iter()
                .filter(|&&member| !names.contains(self.name(member)))
                .map(|&member| {
                    all.push(member);
                    self.name(member)
                })
                .collect();
            names.extend(level_names);
            false
        });
        all
    }

    /// Visit `start` and its `Extends` ancestors breadth-first, each once,
    /// until `visit` returns true.
    pub fn walk_heritage(&self, start: SymbolId, visit: impl FnMut(SymbolId) -> bool) {
        self.walk_heritage_limited(start, limits::MAX_HERITAGE_DEPTH, visit);
    }

    /// `walk_heritage` that stops descending after `max_depth` levels.
    pub fn walk_heritage_limited(
        &self,
        start: SymbolId,
        max_depth: u32,
        mut visit: impl FnMut(SymbolId) -> bool,
    ) {
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::from([(start, 0u32)]);
        while let Some((ty, depth)) = queue.pop_front() {
            if !visited.insert(ty) {
                continue;
            }
            if visit(ty) {
                return;
            }
            if depth >= max_depth {
                continue;
            }
            for &base in self.get_extended_types(ty) {
                queue.push_back((base, depth + 1));
            }
        }
    }

    /// Whether `target` is `from` or one of its `Extends` ancestors.
    #[must_use]
    pub fn extends_transitively(&self, from: SymbolId, target: SymbolId) -> bool {
        let mut found = false;
        self.walk_heritage(from, |ty| {
            found = ty == target;
            found
        });
        found
    }
}
