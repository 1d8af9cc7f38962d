//! Symbol binding.
//!
//! Walks a unit's decl tree in syntactic order, creating or reusing symbols
//! and wiring membership, containment, instance-type and signature edges.
//! Type annotations and heritage clauses are left for the resolver.

use crate::binding_context::BindingContext;
use crate::decl::{Decl, DeclFlags, DeclId, DeclKind, UnitId};
use crate::error::BindError;
use crate::links::SymbolLinkKind;
use crate::semantic_info::SemanticInfoChain;
use crate::symbols::{SymbolArena, SymbolFlags, SymbolId, SymbolKind};
use tracing::{debug, instrument, trace};

/// Map declaration flags onto the symbol flags a new symbol starts with.
#[must_use]
pub fn decl_symbol_flags(flags: DeclFlags) -> SymbolFlags {
    let mut out = SymbolFlags::empty();
    if flags.contains(DeclFlags::EXPORTED) {
        out |= SymbolFlags::EXPORTED;
    }
    if flags.contains(DeclFlags::AMBIENT) {
        out |= SymbolFlags::AMBIENT;
    }
    if flags.contains(DeclFlags::STATIC) {
        out |= SymbolFlags::STATIC;
    }
    if flags.contains(DeclFlags::PRIVATE) {
        out |= SymbolFlags::PRIVATE;
    }
    if flags.contains(DeclFlags::OPTIONAL) {
        out |= SymbolFlags::OPTIONAL;
    }
    if flags.contains(DeclFlags::ACCESSOR) {
        out |= SymbolFlags::ACCESSOR;
    }
    out
}

pub struct Binder<'a> {
    symbols: &'a mut SymbolArena,
    chain: &'a mut SemanticInfoChain,
    unit: UnitId,
    context: BindingContext,
}

/// Bind every declaration of `unit`, which must already be collected and
/// registered in `chain`.
#[instrument(level = "debug", skip(symbols, chain), fields(unit = unit.0))]
pub fn bind_unit(
    symbols: &mut SymbolArena,
    chain: &mut SemanticInfoChain,
    unit: UnitId,
) -> Result<(), BindError> {
    let root = chain
        .get_unit_by_id(unit)
        .ok_or(BindError::UnknownUnitId { unit })?
        .root_decl;
    let before = symbols.len();
    let mut binder = Binder {
        symbols,
        chain,
        unit,
        context: BindingContext::new(),
    };
    binder.bind(root)?;
    debug!(created = binder.symbols.len() - before, "bound unit");
    Ok(())
}

impl Binder<'_> {
    fn decl(&self, id: DeclId) -> Result<Decl, BindError> {
        self.chain
            .decl(id)
            .cloned()
            .ok_or(BindError::UnknownDecl { decl: id })
    }

    fn record(&mut self, decl: DeclId, symbol: SymbolId) -> Result<(), BindError> {
        self.symbols.add_declaration(symbol, decl)?;
        let back_link = self
            .chain
            .decl_mut(decl)
            .ok_or(BindError::UnknownDecl { decl })?;
        back_link.set_symbol(symbol);
        Ok(())
    }

    /// Bind one decl and its subtree.
    pub fn bind(&mut self, id: DeclId) -> Result<(), BindError> {
        let decl = self.decl(id)?;
        trace!(name = %decl.name, kind = ?decl.kind, "bind");
        match decl.kind {
            DeclKind::Script => self.bind_children(&decl),
            DeclKind::Module => self.bind_mergeable_container(&decl, SymbolKind::Module),
            DeclKind::DynamicModule => {
                self.bind_mergeable_container(&decl, SymbolKind::DynamicModule)
            }
            DeclKind::Interface => self.bind_mergeable_container(&decl, SymbolKind::Interface),
            DeclKind::Class => self.bind_class(&decl),
            DeclKind::Function | DeclKind::Method | DeclKind::StaticMethod => {
                if decl.has_flag(DeclFlags::CONSTRUCTOR) {
                    self.bind_constructor(&decl)
                } else {
                    self.bind_function(&decl)
                }
            }
            DeclKind::Field | DeclKind::StaticField if decl.has_flag(DeclFlags::ACCESSOR) => {
                self.bind_accessor(&decl)
            }
            DeclKind::Field | DeclKind::StaticField => self.bind_variable(&decl, SymbolKind::Field),
            DeclKind::Variable => self.bind_variable(&decl, SymbolKind::Variable),
            DeclKind::Import => self.bind_import(&decl),
            DeclKind::CallSignature | DeclKind::ConstructSignature | DeclKind::IndexSignature => {
                self.bind_signature_member(&decl)
            }
            // Parameters are bound with their signature.
            DeclKind::Argument => Ok(()),
        }
    }

    fn bind_children(&mut self, decl: &Decl) -> Result<(), BindError> {
        for &child in &decl.children {
            self.bind(child)?;
        }
        Ok(())
    }

    fn bind_scope(&mut self, decl: &Decl, symbol: SymbolId) -> Result<(), BindError> {
        self.context.push(symbol, &decl.name);
        let result = self.bind_children(decl);
        self.context.pop();
        result
    }

    // =========================================================================
    // Placement
    // =========================================================================

    /// The symbol a decl attaches to: the current scope, except that
    /// non-static class members go to the class's instance side.
    fn effective_parent(&self, decl: &Decl) -> Result<Option<SymbolId>, BindError> {
        let Some(parent) = self.context.current() else {
            return Ok(None);
        };
        let is_instance_member = !decl.has_flag(DeclFlags::STATIC)
            && match decl.kind {
                DeclKind::Method | DeclKind::Field => !decl.name.is_empty(),
                DeclKind::CallSignature | DeclKind::IndexSignature => true,
                _ => false,
            };
        if is_instance_member && self.symbols.kind(parent) == Some(SymbolKind::Class) {
            return self
                .symbols
                .get_instance_type(parent)
                .map(Some)
                .ok_or(BindError::MissingInstanceType { class: parent });
        }
        Ok(Some(parent))
    }

    /// Which membership edge a decl gets from `parent`. `None` means the
    /// symbol is a plain local and only gets `ContainedBy`.
    fn member_link_kind(&self, parent: SymbolId, decl: &Decl) -> Option<SymbolLinkKind> {
        if decl.name.is_empty() {
            return None;
        }
        match self.symbols.kind(parent)? {
            SymbolKind::Class => Some(SymbolLinkKind::StaticProperty),
            SymbolKind::InstanceType | SymbolKind::Interface | SymbolKind::TypeLiteral => {
                if decl.has_flag(DeclFlags::PRIVATE) {
                    Some(SymbolLinkKind::PrivateProperty)
                } else {
                    Some(SymbolLinkKind::PublicProperty)
                }
            }
            SymbolKind::Module | SymbolKind::DynamicModule => {
                if decl.has_flag(DeclFlags::EXPORTED) {
                    Some(SymbolLinkKind::PublicProperty)
                } else if matches!(
                    decl.kind,
                    DeclKind::Module | DeclKind::DynamicModule | DeclKind::Class | DeclKind::Interface
                ) {
                    Some(SymbolLinkKind::PrivateProperty)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Register a freshly created symbol in its scope.
    fn attach(&mut self, parent: Option<SymbolId>, symbol: SymbolId, decl: &Decl) -> Result<(), BindError> {
        match parent {
            None => {
                if !decl.name.is_empty() {
                    self.add_top_level(&decl.name, symbol);
                }
            }
            Some(parent) => match self.member_link_kind(parent, decl) {
                Some(kind) => {
                    self.symbols.add_outgoing_link(parent, symbol, kind)?;
                }
                None => {
                    self.symbols
                        .add_outgoing_link(symbol, parent, SymbolLinkKind::ContainedBy)?;
                }
            },
        }
        Ok(())
    }

    fn add_top_level(&mut self, name: &str, symbol: SymbolId) {
        if let Some(info) = self.chain.get_unit_by_id_mut(self.unit) {
            info.add_top_level(name, symbol);
        }
    }

    /// An existing symbol with this name and kind in the same scope.
    fn find_mergeable(
        &self,
        parent: Option<SymbolId>,
        name: &str,
        accept: impl Fn(SymbolKind, SymbolFlags) -> bool,
    ) -> Option<SymbolId> {
        if name.is_empty() {
            return None;
        }
        let candidates = match parent {
            Some(parent) => self.symbols.get_children(parent),
            None => self.chain.global_symbols(name),
        };
        candidates.into_iter().find(|&id| {
            self.symbols.get(id).is_some_and(|sym| {
                sym.name == name && !sym.declarations().is_empty() && accept(sym.kind, sym.flags)
            })
        })
    }

    /// Reuse a same-named symbol of `kind` in scope, or create and attach one.
    fn merge_or_create(
        &mut self,
        decl: &Decl,
        kind: SymbolKind,
        accept: impl Fn(SymbolKind, SymbolFlags) -> bool,
    ) -> Result<SymbolId, BindError> {
        let parent = self.effective_parent(decl)?;
        if let Some(existing) = self.find_mergeable(parent, &decl.name, accept) {
            debug!(name = %decl.name, ?kind, symbol = existing.0, "merged declaration");
            if parent.is_none() {
                self.add_top_level(&decl.name, existing);
            }
            return Ok(existing);
        }
        let symbol = self
            .symbols
            .alloc(decl.name.clone(), kind, decl_symbol_flags(decl.flags));
        self.attach(parent, symbol, decl)?;
        trace!(name = %decl.name, ?kind, symbol = symbol.0, "created symbol");
        Ok(symbol)
    }

    // =========================================================================
    // Per-kind binding
    // =========================================================================

    /// Modules, dynamic modules and interfaces merge with a same-kind symbol
    /// in the same scope.
    fn bind_mergeable_container(&mut self, decl: &Decl, kind: SymbolKind) -> Result<(), BindError> {
        let symbol = self.merge_or_create(decl, kind, |k, _| k == kind)?;
        self.record(decl.id, symbol)?;
        self.bind_scope(decl, symbol)
    }

    /// Classes never merge: every class decl gets a fresh static side and
    /// instance side.
    fn bind_class(&mut self, decl: &Decl) -> Result<(), BindError> {
        let parent = self.effective_parent(decl)?;
        let flags = decl_symbol_flags(decl.flags);
        let class = self.symbols.alloc(decl.name.clone(), SymbolKind::Class, flags);
        let instance = self
            .symbols
            .alloc(decl.name.clone(), SymbolKind::InstanceType, flags);
        self.symbols.set_instance_type(class, instance)?;
        self.symbols.add_declaration(instance, decl.id)?;
        self.attach(parent, class, decl)?;
        self.record(decl.id, class)?;
        debug!(name = %decl.name, class = class.0, instance = instance.0, "bound class");
        self.bind_scope(decl, class)
    }

    /// Functions and methods merge by name and kind; each decl contributes
    /// one signature.
    fn bind_function(&mut self, decl: &Decl) -> Result<(), BindError> {
        let kind = match decl.kind {
            DeclKind::Method | DeclKind::StaticMethod => SymbolKind::Method,
            _ => SymbolKind::Function,
        };
        let function = self.merge_or_create(decl, kind, |k, _| k == kind)?;
        self.record(decl.id, function)?;

        let mut sig_flags = SymbolFlags::empty();
        if decl.has_flag(DeclFlags::IMPLEMENTATION) {
            if self.symbols.get_definition_signature(function).is_none() {
                sig_flags |= SymbolFlags::DEFINITION;
            } else {
                debug!(name = %decl.name, "second implementation recorded as overload");
            }
        }
        let signature = self.build_signature(decl, sig_flags, None)?;
        self.symbols
            .add_outgoing_link(function, signature, SymbolLinkKind::CallSignature)?;
        self.bind_scope(decl, function)
    }

    /// A class constructor adds a construct signature to the class.
    /// `public`/`private` parameters also become instance fields.
    fn bind_constructor(&mut self, decl: &Decl) -> Result<(), BindError> {
        let parent = self.context.current();
        let instance = match parent {
            Some(class) if self.symbols.kind(class) == Some(SymbolKind::Class) => Some(
                self.symbols
                    .get_instance_type(class)
                    .ok_or(BindError::MissingInstanceType { class })?,
            ),
            _ => None,
        };
        let mut flags = SymbolFlags::CONSTRUCTOR;
        if decl.has_flag(DeclFlags::IMPLEMENTATION) {
            flags |= SymbolFlags::DEFINITION;
        }
        let signature = self.build_signature(decl, flags, instance)?;
        if let Some(parent) = parent {
            self.symbols
                .add_outgoing_link(parent, signature, SymbolLinkKind::ConstructSignature)?;
        }
        self.record(decl.id, signature)?;
        self.bind_scope(decl, signature)
    }

    /// Call, construct and index signatures declared as members.
    fn bind_signature_member(&mut self, decl: &Decl) -> Result<(), BindError> {
        let (link, flags) = match decl.kind {
            DeclKind::ConstructSignature => (SymbolLinkKind::ConstructSignature, SymbolFlags::CONSTRUCTOR),
            DeclKind::IndexSignature => (SymbolLinkKind::IndexSignature, SymbolFlags::empty()),
            _ => (SymbolLinkKind::CallSignature, SymbolFlags::empty()),
        };
        let parent = match link {
            SymbolLinkKind::ConstructSignature => self.context.current(),
            _ => self.effective_parent(decl)?,
        };
        let signature = self.build_signature(decl, flags, None)?;
        if let Some(parent) = parent {
            self.symbols.add_outgoing_link(parent, signature, link)?;
        }
        self.record(decl.id, signature)?;
        Ok(())
    }

    /// A fresh signature symbol with one parameter symbol per `Argument`
    /// child, in order. With `parameter_properties` set, `public`/`private`
    /// parameters also bind a field there.
    fn build_signature(
        &mut self,
        decl: &Decl,
        flags: SymbolFlags,
        parameter_properties: Option<SymbolId>,
    ) -> Result<SymbolId, BindError> {
        let signature = self
            .symbols
            .alloc(decl.name.clone(), SymbolKind::Signature, flags);
        self.symbols.add_declaration(signature, decl.id)?;

        for &child in &decl.children {
            let arg = self.decl(child)?;
            if arg.kind != DeclKind::Argument {
                continue;
            }
            let param = self.symbols.alloc(
                arg.name.clone(),
                SymbolKind::Parameter,
                decl_symbol_flags(arg.flags & DeclFlags::OPTIONAL),
            );
            self.record(arg.id, param)?;
            self.symbols
                .add_outgoing_link(signature, param, SymbolLinkKind::Parameter)?;

            if let Some(instance) = parameter_properties {
                if arg.flags.intersects(DeclFlags::PUBLIC | DeclFlags::PRIVATE) {
                    let field = self.symbols.alloc(
                        arg.name.clone(),
                        SymbolKind::Field,
                        decl_symbol_flags(arg.flags),
                    );
                    self.symbols.add_declaration(field, arg.id)?;
                    let kind = if arg.has_flag(DeclFlags::PRIVATE) {
                        SymbolLinkKind::PrivateProperty
                    } else {
                        SymbolLinkKind::PublicProperty
                    };
                    self.symbols.add_outgoing_link(instance, field, kind)?;
                    debug!(name = %arg.name, "bound parameter property");
                }
            }
        }
        Ok(signature)
    }

    /// Variables and fields never merge.
    fn bind_variable(&mut self, decl: &Decl, kind: SymbolKind) -> Result<(), BindError> {
        let parent = self.effective_parent(decl)?;
        let symbol = self
            .symbols
            .alloc(decl.name.clone(), kind, decl_symbol_flags(decl.flags));
        self.attach(parent, symbol, decl)?;
        self.record(decl.id, symbol)?;
        Ok(())
    }

    /// A get/set pair shares one accessor field.
    fn bind_accessor(&mut self, decl: &Decl) -> Result<(), BindError> {
        let symbol = self.merge_or_create(decl, SymbolKind::Field, |k, flags| {
            k == SymbolKind::Field && flags.contains(SymbolFlags::ACCESSOR)
        })?;
        self.record(decl.id, symbol)?;
        self.bind_scope(decl, symbol)
    }

    fn bind_import(&mut self, decl: &Decl) -> Result<(), BindError> {
        let parent = self.effective_parent(decl)?;
        let symbol = self.symbols.alloc(
            decl.name.clone(),
            SymbolKind::Alias,
            decl_symbol_flags(decl.flags),
        );
        self.attach(parent, symbol, decl)?;
        self.record(decl.id, symbol)?;
        Ok(())
    }
}
