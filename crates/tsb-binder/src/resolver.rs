//! Pull-based name and type resolution.
//!
//! Nothing is resolved until asked for. A request walks the scope search,
//! writes the resulting `TypedAs` / `ReturnType` / `Extends` / `Implements`
//! edges and marks the symbol resolved; later requests are answered from the
//! graph until the symbol is invalidated.
//!
//! Scope search order for a dotted path:
//! 1. the caller-supplied lookup context, innermost symbol first;
//! 2. the lexically enclosing declarations, innermost first;
//! 3. the global table of every unit in the chain.
//!
//! The first hit wins. A miss in all three is reported as a diagnostic and
//! answered with the error symbol, so one bad reference never stops the
//! resolution of its siblings.

use crate::decl::{Decl, DeclFlags, DeclId, UnitId};
use crate::error::BindError;
use crate::links::SymbolLinkKind;
use crate::options::BinderOptions;
use crate::semantic_info::{Meaning, SemanticInfoChain};
use crate::symbols::{SymbolArena, SymbolFlags, SymbolId, SymbolKind};
use crate::well_known::WellKnownSymbols;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};
use tsb_common::diagnostics::diagnostic_codes;
use tsb_common::limits::MAX_ALIAS_RESOLUTION_DEPTH;
use tsb_common::{Diagnostic, Span};
use tsb_syntax::{NodeArena, NodeIndex, SyntaxKind};

/// A decl together with the tree it came from.
struct DeclSite {
    decl: Decl,
    arena: Arc<NodeArena>,
    file: String,
}

pub struct Resolver<'a> {
    symbols: &'a mut SymbolArena,
    chain: &'a SemanticInfoChain,
    well_known: &'a WellKnownSymbols,
    options: &'a BinderOptions,
    diagnostics: &'a mut Vec<Diagnostic>,
    alias_depth: u32,
}

impl<'a> Resolver<'a> {
    pub fn new(
        symbols: &'a mut SymbolArena,
        chain: &'a SemanticInfoChain,
        well_known: &'a WellKnownSymbols,
        options: &'a BinderOptions,
        diagnostics: &'a mut Vec<Diagnostic>,
    ) -> Self {
        Resolver {
            symbols,
            chain,
            well_known,
            options,
            diagnostics,
            alias_depth: 0,
        }
    }

    #[must_use]
    pub fn symbols(&self) -> &SymbolArena {
        self.symbols
    }

    #[must_use]
    pub const fn well_known(&self) -> &WellKnownSymbols {
        self.well_known
    }

    fn site(&self, id: DeclId) -> Result<DeclSite, BindError> {
        let info = self
            .chain
            .get_unit_by_id(id.unit)
            .ok_or(BindError::UnknownUnitId { unit: id.unit })?;
        let decl = info.decl(id).cloned().ok_or(BindError::UnknownDecl { decl: id })?;
        Ok(DeclSite {
            decl,
            arena: Arc::clone(&info.arena),
            file: info.path.clone(),
        })
    }

    fn first_site(&self, symbol: SymbolId) -> Result<Option<DeclSite>, BindError> {
        let first = self
            .symbols
            .get(symbol)
            .ok_or(BindError::UnknownSymbol { symbol })?
            .declarations()
            .first()
            .copied();
        first.map(|decl| self.site(decl)).transpose()
    }

    fn declarations_of(&self, symbol: SymbolId) -> Result<Vec<DeclId>, BindError> {
        Ok(self
            .symbols
            .get(symbol)
            .ok_or(BindError::UnknownSymbol { symbol })?
            .declarations()
            .to_vec())
    }

    fn report(&mut self, file: &str, span: Span, code: u32, args: &[&str]) {
        trace!(code, file, "diagnostic");
        self.push_diagnostic(Diagnostic::from_code(file, span, code, args));
    }

    /// Re-resolving an invalidated symbol reports the same problems again;
    /// keep one copy.
    fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
    }

    /// Mark resolved and report whether this call should do the work.
    fn begin(&mut self, symbol: SymbolId) -> Result<bool, BindError> {
        let sym = self
            .symbols
            .get(symbol)
            .ok_or(BindError::UnknownSymbol { symbol })?;
        if sym.is_resolved() {
            return Ok(false);
        }
        self.symbols.set_resolved(symbol, true);
        Ok(true)
    }

    // =========================================================================
    // Scope search
    // =========================================================================

    /// Find the symbol a dotted path names, as seen from `enclosing`.
    pub fn find_symbol_for_path(
        &mut self,
        segments: &[&str],
        enclosing: Option<DeclId>,
        meaning: Meaning,
    ) -> Result<Option<SymbolId>, BindError> {
        self.find_symbol_for_path_in_context(segments, &[], enclosing, meaning)
    }

    /// `find_symbol_for_path` with an explicit lookup context searched first.
    /// `context` lists symbols innermost first.
    #[instrument(level = "trace", skip(self, context))]
    pub fn find_symbol_for_path_in_context(
        &mut self,
        segments: &[&str],
        context: &[SymbolId],
        enclosing: Option<DeclId>,
        meaning: Meaning,
    ) -> Result<Option<SymbolId>, BindError> {
        if segments.is_empty() {
            return Ok(None);
        }
        for &anchor in context {
            if let Some(found) = self.lookup_from(anchor, segments, meaning)? {
                trace!(anchor = anchor.0, found = found.0, "found in lookup context");
                return Ok(Some(found));
            }
        }
        for anchor in self.lexical_scopes(enclosing) {
            if let Some(found) = self.lookup_from(anchor, segments, meaning)? {
                trace!(anchor = anchor.0, found = found.0, "found in enclosing scope");
                return Ok(Some(found));
            }
        }
        let found = self.lookup_global(segments, meaning)?;
        if let Some(found) = found {
            trace!(found = found.0, "found in global table");
        }
        Ok(found)
    }

    /// Symbols of the declarations enclosing `enclosing` (inclusive),
    /// innermost first.
    fn lexical_scopes(&self, enclosing: Option<DeclId>) -> Vec<SymbolId> {
        let mut scopes = Vec::new();
        let mut current = enclosing;
        let mut depth = 0;
        while let Some(id) = current {
            if depth >= self.options.max_scope_path_depth {
                warn!(decl = id.index, "scope path too deep, outer scopes not searched");
                break;
            }
            let Some(decl) = self.chain.decl(id) else {
                break;
            };
            if let Some(symbol) = decl.symbol() {
                if !scopes.contains(&symbol) {
                    scopes.push(symbol);
                }
            }
            current = decl.parent;
            depth += 1;
        }
        scopes
    }

    /// Names visible directly inside `anchor`. A class scope also sees its
    /// instance members.
    fn scope_children(&self, anchor: SymbolId) -> Vec<SymbolId> {
        let mut children = self.symbols.get_children(anchor);
        if let Some(instance) = self.symbols.get_instance_type(anchor) {
            children.extend(self.symbols.get_children(instance));
        }
        children
    }

    fn admits(&self, symbol: SymbolId, name: &str, meaning: Meaning) -> bool {
        self.symbols.get(symbol).is_some_and(|sym| {
            sym.name == name && !sym.declarations().is_empty() && meaning.admits(sym.kind)
        })
    }

    fn lookup_from(
        &mut self,
        anchor: SymbolId,
        segments: &[&str],
        meaning: Meaning,
    ) -> Result<Option<SymbolId>, BindError> {
        let Some((first, rest)) = segments.split_first() else {
            return Ok(None);
        };
        let first_meaning = if rest.is_empty() { meaning } else { Meaning::Namespace };
        let candidates: Vec<SymbolId> = self
            .scope_children(anchor)
            .into_iter()
            .filter(|&child| self.admits(child, first, first_meaning))
            .collect();
        for candidate in candidates {
            if let Some(found) = self.walk_qualified(candidate, rest, meaning)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    fn lookup_global(&mut self, segments: &[&str], meaning: Meaning) -> Result<Option<SymbolId>, BindError> {
        let Some((first, rest)) = segments.split_first() else {
            return Ok(None);
        };
        let first_meaning = if rest.is_empty() { meaning } else { Meaning::Namespace };
        let candidates: Vec<SymbolId> = self
            .chain
            .global_symbols(first)
            .into_iter()
            .filter(|&sym| self.admits(sym, first, first_meaning))
            .collect();
        for candidate in candidates {
            if let Some(found) = self.walk_qualified(candidate, rest, meaning)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Follow `rest` through exported members, starting at `start`.
    fn walk_qualified(
        &mut self,
        start: SymbolId,
        rest: &[&str],
        meaning: Meaning,
    ) -> Result<Option<SymbolId>, BindError> {
        let mut current = start;
        for (i, segment) in rest.iter().enumerate() {
            let step_meaning = if i + 1 == rest.len() { meaning } else { Meaning::Namespace };
            let container = if self.symbols.kind(current) == Some(SymbolKind::Alias) {
                self.alias_target(current)?
            } else {
                current
            };
            let next = self
                .symbols
                .get_public_members(container)
                .iter()
                .copied()
                .find(|&member| self.admits(member, segment, step_meaning));
            match next {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    // =========================================================================
    // Type references
    // =========================================================================

    /// Resolve a type node of `unit` as seen from `enclosing`. Never fails
    /// for user errors: unresolved names yield the error symbol and a
    /// diagnostic.
    pub fn resolve_type_reference(
        &mut self,
        unit: UnitId,
        type_node: NodeIndex,
        enclosing: Option<DeclId>,
    ) -> Result<SymbolId, BindError> {
        self.resolve_type_reference_in_context(unit, type_node, &[], enclosing)
    }

    #[instrument(level = "debug", skip(self, context), fields(unit = unit.0, node = type_node.0))]
    pub fn resolve_type_reference_in_context(
        &mut self,
        unit: UnitId,
        type_node: NodeIndex,
        context: &[SymbolId],
        enclosing: Option<DeclId>,
    ) -> Result<SymbolId, BindError> {
        let info = self
            .chain
            .get_unit_by_id(unit)
            .ok_or(BindError::UnknownUnitId { unit })?;
        let arena = Arc::clone(&info.arena);
        let file = info.path.clone();
        self.resolve_type_node(&arena, &file, type_node, context, enclosing)
    }

    fn resolve_type_node(
        &mut self,
        arena: &NodeArena,
        file: &str,
        idx: NodeIndex,
        context: &[SymbolId],
        enclosing: Option<DeclId>,
    ) -> Result<SymbolId, BindError> {
        let Some(node) = arena.get(idx) else {
            return Ok(self.well_known.any);
        };
        match node.kind {
            kind if kind.is_keyword_type() => {
                Ok(self.well_known.for_keyword(kind).unwrap_or(self.well_known.any))
            }
            SyntaxKind::TypeReference => {
                let type_name = arena.get_type_ref(node).map_or(NodeIndex::NONE, |r| r.type_name);
                self.resolve_entity_type(arena, file, type_name, idx, context, enclosing)
            }
            SyntaxKind::Identifier | SyntaxKind::QualifiedName => {
                self.resolve_entity_type(arena, file, idx, idx, context, enclosing)
            }
            SyntaxKind::ArrayType => {
                let element_node = arena
                    .get_array_type(node)
                    .map_or(NodeIndex::NONE, |a| a.element_type);
                let element = self.resolve_type_node(arena, file, element_node, context, enclosing)?;
                self.get_or_create_array(element)
            }
            SyntaxKind::FunctionType => {
                let function = self
                    .symbols
                    .alloc("", SymbolKind::Function, SymbolFlags::SYNTHESIZED);
                let signature = self.synthesize_signature(arena, file, idx, context, enclosing)?;
                self.symbols
                    .add_outgoing_link(function, signature, SymbolLinkKind::CallSignature)?;
                self.symbols.set_resolved(function, true);
                Ok(function)
            }
            SyntaxKind::ConstructorType => {
                let literal = self
                    .symbols
                    .alloc("", SymbolKind::TypeLiteral, SymbolFlags::SYNTHESIZED);
                let signature = self.synthesize_signature(arena, file, idx, context, enclosing)?;
                self.symbols
                    .add_outgoing_link(literal, signature, SymbolLinkKind::ConstructSignature)?;
                self.symbols.set_resolved(literal, true);
                Ok(literal)
            }
            SyntaxKind::TypeLiteral => self.synthesize_type_literal(arena, file, idx, context, enclosing),
            _ => Ok(self.well_known.any),
        }
    }

    fn resolve_entity_type(
        &mut self,
        arena: &NodeArena,
        file: &str,
        name_node: NodeIndex,
        report_node: NodeIndex,
        context: &[SymbolId],
        enclosing: Option<DeclId>,
    ) -> Result<SymbolId, BindError> {
        let segments = arena.entity_name_segments(name_node);
        let dotted = segments.join(".");
        let refs: Vec<&str> = segments.iter().map(String::as_str).collect();
        let found = self.find_symbol_for_path_in_context(&refs, context, enclosing, Meaning::Type)?;
        if let Some(found) = found {
            let ty = self.as_type(found)?;
            if self.symbols.kind(ty).is_some_and(SymbolKind::is_type) {
                return Ok(ty);
            }
        }
        debug!(name = %dotted, "unresolved type reference");
        self.report(
            file,
            arena.span(report_node),
            diagnostic_codes::CANNOT_FIND_NAME,
            &[&dotted],
        );
        Ok(self.well_known.error)
    }

    /// The type a named symbol denotes: a class's instance side, an alias's
    /// target, or the symbol itself.
    fn as_type(&mut self, symbol: SymbolId) -> Result<SymbolId, BindError> {
        match self.symbols.kind(symbol) {
            Some(SymbolKind::Alias) => {
                let target = self.alias_target(symbol)?;
                if self.symbols.kind(target) == Some(SymbolKind::Alias) {
                    return Ok(self.well_known.error);
                }
                self.as_type(target)
            }
            Some(SymbolKind::Class) => self
                .symbols
                .get_instance_type(symbol)
                .ok_or(BindError::MissingInstanceType { class: symbol }),
            Some(_) => Ok(symbol),
            None => Err(BindError::UnknownSymbol { symbol }),
        }
    }

    /// The single `element[]` specialization, created on first request.
    pub fn get_or_create_array(&mut self, element: SymbolId) -> Result<SymbolId, BindError> {
        let existing = self.symbols.get_array_specializations(element);
        match existing.as_slice() {
            [] => {
                let name = format!("{}[]", self.symbols.name(element));
                let array = self
                    .symbols
                    .alloc(name, SymbolKind::Array, SymbolFlags::SYNTHESIZED);
                self.symbols
                    .add_outgoing_link(array, element, SymbolLinkKind::ArrayOf)?;
                self.symbols.set_resolved(array, true);
                trace!(element = element.0, array = array.0, "created array specialization");
                Ok(array)
            }
            [array] => Ok(*array),
            many => Err(BindError::DuplicateArraySpecialization {
                element,
                count: many.len(),
            }),
        }
    }

    /// A signature for a function-like type node: parameters typed from
    /// their annotations, `any` where omitted.
    fn synthesize_signature(
        &mut self,
        arena: &NodeArena,
        file: &str,
        idx: NodeIndex,
        context: &[SymbolId],
        enclosing: Option<DeclId>,
    ) -> Result<SymbolId, BindError> {
        let (parameters, return_node): (Vec<NodeIndex>, NodeIndex) = arena
            .get(idx)
            .and_then(|node| arena.get_function(node))
            .map_or((Vec::new(), NodeIndex::NONE), |func| {
                (func.parameters.iter().collect(), func.type_annotation)
            });

        let signature = self
            .symbols
            .alloc("", SymbolKind::Signature, SymbolFlags::SYNTHESIZED);
        for param_idx in parameters {
            let Some(param_node) = arena.get(param_idx) else {
                continue;
            };
            let Some(param) = arena.get_parameter(param_node) else {
                continue;
            };
            let name = arena.get_identifier_text(param.name).unwrap_or_default().to_string();
            let annotation = param.type_annotation;
            let mut flags = SymbolFlags::SYNTHESIZED;
            if param_node.has_modifier(tsb_syntax::ModifierFlags::OPTIONAL) {
                flags |= SymbolFlags::OPTIONAL;
            }
            let parameter = self.symbols.alloc(name, SymbolKind::Parameter, flags);
            self.symbols
                .add_outgoing_link(signature, parameter, SymbolLinkKind::Parameter)?;
            let ty = self.resolve_type_node(arena, file, annotation, context, enclosing)?;
            self.symbols
                .set_single_link(parameter, ty, SymbolLinkKind::TypedAs)?;
            self.symbols.set_resolved(parameter, true);
        }
        let ret = self.resolve_type_node(arena, file, return_node, context, enclosing)?;
        self.symbols
            .set_single_link(signature, ret, SymbolLinkKind::ReturnType)?;
        self.symbols.set_resolved(signature, true);
        Ok(signature)
    }

    /// An anonymous object type with one member per member of the literal.
    fn synthesize_type_literal(
        &mut self,
        arena: &NodeArena,
        file: &str,
        idx: NodeIndex,
        context: &[SymbolId],
        enclosing: Option<DeclId>,
    ) -> Result<SymbolId, BindError> {
        let members: Vec<NodeIndex> = arena
            .get(idx)
            .and_then(|node| arena.get_type_literal(node))
            .map(|lit| lit.members.iter().collect())
            .unwrap_or_default();
        let literal = self
            .symbols
            .alloc("", SymbolKind::TypeLiteral, SymbolFlags::SYNTHESIZED);
        self.symbols.set_resolved(literal, true);

        for member_idx in members {
            let Some(member) = arena.get(member_idx).copied() else {
                continue;
            };
            match member.kind {
                SyntaxKind::PropertySignature => {
                    let Some(prop) = arena.get_property(&member) else {
                        continue;
                    };
                    let name = arena.get_identifier_text(prop.name).unwrap_or_default().to_string();
                    let annotation = prop.type_annotation;
                    let mut flags = SymbolFlags::SYNTHESIZED;
                    if member.has_modifier(tsb_syntax::ModifierFlags::OPTIONAL) {
                        flags |= SymbolFlags::OPTIONAL;
                    }
                    let field = self.symbols.alloc(name, SymbolKind::Field, flags);
                    self.symbols
                        .add_outgoing_link(literal, field, SymbolLinkKind::PublicProperty)?;
                    let ty = self.resolve_type_node(arena, file, annotation, context, enclosing)?;
                    self.symbols.set_single_link(field, ty, SymbolLinkKind::TypedAs)?;
                    self.symbols.set_resolved(field, true);
                }
                SyntaxKind::MethodSignature => {
                    let name = arena
                        .get_function(&member)
                        .and_then(|func| arena.get_identifier_text(func.name))
                        .unwrap_or_default()
                        .to_string();
                    let existing = self
                        .symbols
                        .get_members(literal)
                        .iter()
                        .copied()
                        .find(|&m| {
                            self.symbols.name(m) == name
                                && self.symbols.kind(m) == Some(SymbolKind::Method)
                        });
                    let method = match existing {
                        Some(method) => method,
                        None => {
                            let method =
                                self.symbols
                                    .alloc(name, SymbolKind::Method, SymbolFlags::SYNTHESIZED);
                            self.symbols.add_outgoing_link(
                                literal,
                                method,
                                SymbolLinkKind::PublicProperty,
                            )?;
                            self.symbols.set_resolved(method, true);
                            method
                        }
                    };
                    let signature =
                        self.synthesize_signature(arena, file, member_idx, context, enclosing)?;
                    self.symbols
                        .add_outgoing_link(method, signature, SymbolLinkKind::CallSignature)?;
                }
                SyntaxKind::CallSignature | SyntaxKind::ConstructSignature | SyntaxKind::IndexSignature => {
                    let link = match member.kind {
                        SyntaxKind::CallSignature => SymbolLinkKind::CallSignature,
                        SyntaxKind::ConstructSignature => SymbolLinkKind::ConstructSignature,
                        _ => SymbolLinkKind::IndexSignature,
                    };
                    let signature =
                        self.synthesize_signature(arena, file, member_idx, context, enclosing)?;
                    self.symbols.add_outgoing_link(literal, signature, link)?;
                }
                _ => {}
            }
        }
        Ok(literal)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Resolve whatever `symbol` needs: heritage for types, signatures for
    /// functions, annotations for values, targets for aliases.
    #[instrument(level = "debug", skip(self), fields(symbol = symbol.0))]
    pub fn resolve_symbol(&mut self, symbol: SymbolId) -> Result<SymbolId, BindError> {
        let kind = self
            .symbols
            .kind(symbol)
            .ok_or(BindError::UnknownSymbol { symbol })?;
        match kind {
            SymbolKind::Module | SymbolKind::DynamicModule => self.resolve_module_declaration(symbol),
            SymbolKind::Class => self.resolve_class_declaration(symbol),
            SymbolKind::InstanceType => {
                if let Some(class) = self.symbols.get_class_of_instance(symbol) {
                    self.resolve_class_declaration(class)?;
                }
                Ok(symbol)
            }
            SymbolKind::Interface => self.resolve_interface_declaration(symbol),
            SymbolKind::Function | SymbolKind::Method => self.resolve_function_declaration(symbol),
            SymbolKind::Signature => self.resolve_signature(symbol),
            SymbolKind::Variable | SymbolKind::Field | SymbolKind::Parameter => {
                self.resolve_variable_declaration(symbol)
            }
            SymbolKind::Alias => {
                self.resolve_alias(symbol)?;
                Ok(symbol)
            }
            SymbolKind::Primitive | SymbolKind::Error | SymbolKind::TypeLiteral | SymbolKind::Array => {
                self.symbols.set_resolved(symbol, true);
                Ok(symbol)
            }
        }
    }

    pub fn resolve_module_declaration(&mut self, module: SymbolId) -> Result<SymbolId, BindError> {
        if self.begin(module)? {
            self.check_member_collisions(module)?;
        }
        Ok(module)
    }

    /// Resolve a class's heritage. `extends` targets are linked from the
    /// instance side to the base's instance side; `implements` targets from
    /// the instance side to the interface.
    pub fn resolve_class_declaration(&mut self, class: SymbolId) -> Result<SymbolId, BindError> {
        if !self.begin(class)? {
            return Ok(class);
        }
        let instance = self
            .symbols
            .get_instance_type(class)
            .ok_or(BindError::MissingInstanceType { class })?;
        self.symbols.set_resolved(instance, true);
        self.symbols
            .remove_outgoing_links(instance, SymbolLinkKind::Extends);
        self.symbols
            .remove_outgoing_links(instance, SymbolLinkKind::Implements);

        for decl in self.declarations_of(class)? {
            let site = self.site(decl)?;
            let Some((extends, implements)) = site
                .arena
                .get(site.decl.node)
                .and_then(|node| site.arena.get_class(node))
                .map(|class| {
                    (
                        class.extends_types.iter().collect::<Vec<_>>(),
                        class.implements_types.iter().collect::<Vec<_>>(),
                    )
                })
            else {
                continue;
            };
            for entry in extends {
                let target = self.resolve_heritage_entry(
                    &site,
                    entry,
                    diagnostic_codes::CLASS_CAN_ONLY_IMPLEMENT_OBJECT_TYPE,
                )?;
                if let Some(target) = target {
                    self.link_extends(instance, target, &site, entry)?;
                }
            }
            for entry in implements {
                let target = self.resolve_heritage_entry(
                    &site,
                    entry,
                    diagnostic_codes::CLASS_CAN_ONLY_IMPLEMENT_OBJECT_TYPE,
                )?;
                if let Some(target) = target {
                    self.symbols
                        .add_outgoing_link(instance, target, SymbolLinkKind::Implements)?;
                }
            }
        }

        self.check_member_collisions(instance)?;
        self.check_member_collisions(class)?;
        debug!(name = %self.symbols.name(class), "resolved class");
        Ok(class)
    }

    pub fn resolve_interface_declaration(&mut self, interface: SymbolId) -> Result<SymbolId, BindError> {
        if !self.begin(interface)? {
            return Ok(interface);
        }
        self.symbols
            .remove_outgoing_links(interface, SymbolLinkKind::Extends);

        for decl in self.declarations_of(interface)? {
            let site = self.site(decl)?;
            let extends: Vec<NodeIndex> = site
                .arena
                .get(site.decl.node)
                .and_then(|node| site.arena.get_interface(node))
                .map(|iface| iface.extends_types.iter().collect())
                .unwrap_or_default();
            for entry in extends {
                let target = self.resolve_heritage_entry(
                    &site,
                    entry,
                    diagnostic_codes::INTERFACE_CAN_ONLY_EXTEND_OBJECT_TYPE,
                )?;
                if let Some(target) = target {
                    self.link_extends(interface, target, &site, entry)?;
                }
            }
        }

        self.check_member_collisions(interface)?;
        debug!(name = %self.symbols.name(interface), "resolved interface");
        Ok(interface)
    }

    /// Resolve one heritage entry in the scope *enclosing* the declaration,
    /// so a type's own name is looked up from outside its body. Returns the
    /// object type to link, the error symbol for a name that was not found,
    /// or `None` after reporting a non-object base.
    fn resolve_heritage_entry(
        &mut self,
        site: &DeclSite,
        entry: NodeIndex,
        non_type_code: u32,
    ) -> Result<Option<SymbolId>, BindError> {
        let name_node = site
            .arena
            .get(entry)
            .and_then(|node| site.arena.get_type_ref(node))
            .map_or(entry, |type_ref| type_ref.type_name);
        let segments = site.arena.entity_name_segments(name_node);
        let dotted = segments.join(".");
        let refs: Vec<&str> = segments.iter().map(String::as_str).collect();
        let enclosing = site.decl.parent;
        let span = site.arena.span(entry);

        let found = match self.find_symbol_for_path(&refs, enclosing, Meaning::Type)? {
            Some(found) => Some(found),
            None => self.find_symbol_for_path(&refs, enclosing, Meaning::Any)?,
        };
        let Some(found) = found else {
            self.report(&site.file, span, diagnostic_codes::CANNOT_FIND_NAME, &[&dotted]);
            return Ok(Some(self.well_known.error));
        };
        let ty = self.as_type(found)?;
        match self.symbols.kind(ty) {
            Some(kind) if kind.is_object_type() => Ok(Some(ty)),
            Some(SymbolKind::Error) => Ok(Some(ty)),
            _ => {
                self.report(&site.file, span, non_type_code, &[]);
                Ok(None)
            }
        }
    }

    /// Add `child --Extends--> base` unless it would close a heritage cycle.
    fn link_extends(
        &mut self,
        child: SymbolId,
        base: SymbolId,
        site: &DeclSite,
        entry: NodeIndex,
    ) -> Result<(), BindError> {
        // Pull the base's own heritage so the cycle check sees its edges.
        match self.symbols.kind(base) {
            Some(SymbolKind::InstanceType) => {
                if let Some(class) = self.symbols.get_class_of_instance(base) {
                    self.resolve_class_declaration(class)?;
                }
            }
            Some(SymbolKind::Interface) => {
                self.resolve_interface_declaration(base)?;
            }
            _ => {}
        }

        if self.options.detect_heritage_cycles && self.reaches_through_extends(base, child) {
            let name = self.symbols.name(child).to_string();
            warn!(name = %name, "heritage cycle, base not linked");
            self.report(
                &site.file,
                site.arena.span(entry),
                diagnostic_codes::TYPE_RECURSIVELY_REFERENCES_ITSELF_AS_BASE,
                &[&name],
            );
            return Ok(());
        }
        self.symbols
            .add_outgoing_link(child, base, SymbolLinkKind::Extends)?;
        Ok(())
    }

    fn reaches_through_extends(&self, from: SymbolId, target: SymbolId) -> bool {
        let mut found = false;
        self.symbols
            .walk_heritage_limited(from, self.options.max_heritage_depth, |ty| {
                found = ty == target;
                found
            });
        found
    }

    /// Resolve every signature of a function or method. A second
    /// implementation is reported here.
    pub fn resolve_function_declaration(&mut self, function: SymbolId) -> Result<SymbolId, BindError> {
        if !self.begin(function)? {
            return Ok(function);
        }
        let signatures = self.symbols.get_call_signatures(function).to_vec();
        for signature in signatures {
            self.resolve_signature(signature)?;
        }

        let mut implementations = 0;
        for decl in self.declarations_of(function)? {
            let site = self.site(decl)?;
            if site.decl.has_flag(DeclFlags::IMPLEMENTATION) {
                implementations += 1;
                if implementations > 1 {
                    warn!(name = %site.decl.name, "duplicate function implementation");
                    self.report(
                        &site.file,
                        site.decl.span,
                        diagnostic_codes::DUPLICATE_FUNCTION_IMPLEMENTATION,
                        &[],
                    );
                }
            }
        }
        Ok(function)
    }

    /// Type each parameter and the return type of a declared signature.
    /// Omitted annotations resolve to `any`; constructors return their
    /// class's instance side.
    pub fn resolve_signature(&mut self, signature: SymbolId) -> Result<SymbolId, BindError> {
        if !self.begin(signature)? {
            return Ok(signature);
        }
        for parameter in self.symbols.get_parameters(signature).to_vec() {
            self.resolve_variable_declaration(parameter)?;
        }
        let Some(site) = self.first_site(signature)? else {
            return Ok(signature);
        };
        let annotation = site
            .arena
            .get(site.decl.node)
            .and_then(|node| site.arena.get_function(node))
            .map_or(NodeIndex::NONE, |func| func.type_annotation);

        let is_constructor = self
            .symbols
            .get(signature)
            .is_some_and(|sig| sig.has_flag(SymbolFlags::CONSTRUCTOR));
        let ret = if annotation.is_none() && is_constructor {
            match self
                .symbols
                .get_container(signature)
                .and_then(|owner| self.symbols.get_instance_type(owner))
            {
                Some(instance) => instance,
                None => self.well_known.any,
            }
        } else {
            self.resolve_type_node(&site.arena, &site.file, annotation, &[], Some(site.decl.id))?
        };
        self.symbols
            .set_single_link(signature, ret, SymbolLinkKind::ReturnType)?;
        Ok(signature)
    }

    /// Type a variable, field or parameter from its annotation. Accessor
    /// fields take the getter's return annotation, else the setter's
    /// parameter annotation.
    pub fn resolve_variable_declaration(&mut self, variable: SymbolId) -> Result<SymbolId, BindError> {
        if !self.begin(variable)? {
            return Ok(variable);
        }
        let mut chosen: Option<(DeclSite, NodeIndex)> = None;
        for decl in self.declarations_of(variable)? {
            let site = self.site(decl)?;
            let Some(node) = site.arena.get(site.decl.node).copied() else {
                continue;
            };
            let annotation = match node.kind {
                SyntaxKind::VariableDeclaration
                | SyntaxKind::PropertyDeclaration
                | SyntaxKind::PropertySignature => site
                    .arena
                    .get_property(&node)
                    .map_or(NodeIndex::NONE, |p| p.type_annotation),
                SyntaxKind::Parameter => site
                    .arena
                    .get_parameter(&node)
                    .map_or(NodeIndex::NONE, |p| p.type_annotation),
                SyntaxKind::GetAccessor => site
                    .arena
                    .get_function(&node)
                    .map_or(NodeIndex::NONE, |f| f.type_annotation),
                SyntaxKind::SetAccessor => site
                    .arena
                    .get_function(&node)
                    .and_then(|f| f.parameters.iter().next())
                    .and_then(|p| site.arena.get(p))
                    .and_then(|p| site.arena.get_parameter(p))
                    .map_or(NodeIndex::NONE, |p| p.type_annotation),
                _ => NodeIndex::NONE,
            };
            let prefer = node.kind == SyntaxKind::GetAccessor && annotation.is_some();
            if chosen.is_none() || prefer {
                chosen = Some((site, annotation));
            }
            if prefer {
                break;
            }
        }
        let ty = match chosen {
            Some((site, annotation)) if annotation.is_some() => {
                let enclosing = site.decl.parent;
                self.resolve_type_node(&site.arena, &site.file, annotation, &[], enclosing)?
            }
            _ => self.well_known.any,
        };
        self.symbols
            .set_single_link(variable, ty, SymbolLinkKind::TypedAs)?;
        Ok(variable)
    }

    /// Resolve an `import x = ...` alias and link it to its target.
    pub fn resolve_alias(&mut self, alias: SymbolId) -> Result<SymbolId, BindError> {
        if !self.begin(alias)? {
            return self.alias_target(alias);
        }
        if self.alias_depth >= MAX_ALIAS_RESOLUTION_DEPTH {
            warn!(alias = alias.0, "alias chain too deep");
            self.symbols
                .set_single_link(alias, self.well_known.error, SymbolLinkKind::TypedAs)?;
            return Ok(self.well_known.error);
        }
        self.alias_depth += 1;
        let result = self.resolve_alias_target(alias);
        self.alias_depth -= 1;
        let target = result?;
        self.symbols
            .set_single_link(alias, target, SymbolLinkKind::TypedAs)?;
        Ok(target)
    }

    fn resolve_alias_target(&mut self, alias: SymbolId) -> Result<SymbolId, BindError> {
        let Some(site) = self.first_site(alias)? else {
            return Ok(self.well_known.error);
        };
        let Some(reference) = site
            .arena
            .get(site.decl.node)
            .and_then(|node| site.arena.get_import_equals(node))
            .map(|import| import.module_reference)
        else {
            return Ok(self.well_known.error);
        };
        let span = site.arena.span(reference);

        if site.arena.kind(reference) == Some(SyntaxKind::ExternalModuleReference) {
            let module_name = site
                .arena
                .get_identifier_text(reference)
                .unwrap_or_default()
                .to_string();
            let target = self
                .chain
                .global_symbols(&module_name)
                .into_iter()
                .find(|&sym| self.symbols.kind(sym) == Some(SymbolKind::DynamicModule));
            return Ok(match target {
                Some(target) => target,
                None => {
                    let quoted = format!("\"{module_name}\"");
                    self.report(&site.file, span, diagnostic_codes::CANNOT_FIND_NAME, &[&quoted]);
                    self.well_known.error
                }
            });
        }

        let segments = site.arena.entity_name_segments(reference);
        let refs: Vec<&str> = segments.iter().map(String::as_str).collect();
        let found = self.find_symbol_for_path(&refs, site.decl.parent, Meaning::Any)?;
        match found {
            Some(found) if found != alias => {
                if self.symbols.kind(found) == Some(SymbolKind::Alias) {
                    self.resolve_alias(found)
                } else {
                    Ok(found)
                }
            }
            _ => {
                let code = if segments.len() > 1 {
                    diagnostic_codes::CANNOT_FIND_NAMESPACE
                } else {
                    diagnostic_codes::CANNOT_FIND_NAME
                };
                let dotted = segments.join(".");
                self.report(&site.file, span, code, &[&dotted]);
                Ok(self.well_known.error)
            }
        }
    }

    /// Target of an alias, resolving it first if needed.
    pub fn alias_target(&mut self, alias: SymbolId) -> Result<SymbolId, BindError> {
        let resolved = self
            .symbols
            .get(alias)
            .is_some_and(|sym| sym.is_resolved());
        if !resolved {
            return self.resolve_alias(alias);
        }
        Ok(self
            .symbols
            .get(alias)
            .and_then(|sym| sym.first_target(SymbolLinkKind::TypedAs))
            .unwrap_or(self.well_known.error))
    }

    /// Report a field and a method that share a name in one container, once
    /// per pair.
    fn check_member_collisions(&mut self, container: SymbolId) -> Result<(), BindError> {
        if !self.options.report_member_collisions {
            return Ok(());
        }
        let members = self.symbols.get_members(container).to_vec();
        let mut reported: FxHashSet<(SymbolId, SymbolId)> = FxHashSet::default();
        for (i, &later) in members.iter().enumerate() {
            for &earlier in &members[..i] {
                let (Some(a), Some(b)) = (self.symbols.get(earlier), self.symbols.get(later)) else {
                    continue;
                };
                let collides = a.name == b.name
                    && a.kind != b.kind
                    && matches!(
                        (a.kind, b.kind),
                        (SymbolKind::Field, SymbolKind::Method) | (SymbolKind::Method, SymbolKind::Field)
                    );
                if !collides || !reported.insert((earlier, later)) {
                    continue;
                }
                let name = b.name.clone();
                let Some(site) = self.first_site(later)? else {
                    continue;
                };
                let mut diag = Diagnostic::from_code(
                    &site.file,
                    site.decl.span,
                    diagnostic_codes::DUPLICATE_IDENTIFIER,
                    &[&name],
                );
                if let Some(first) = self.first_site(earlier)? {
                    let start = if first.decl.span.is_valid() { first.decl.span.start } else { 0 };
                    diag = diag.with_related(
                        first.file.clone(),
                        start,
                        first.decl.span.len(),
                        format!("'{name}' was also declared here."),
                    );
                }
                self.push_diagnostic(diag);
            }
        }
        Ok(())
    }
}
