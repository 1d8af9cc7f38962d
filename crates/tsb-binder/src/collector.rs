//! Declaration collection.
//!
//! One top-down pass over a unit's syntax tree that produces its `Decl` tree
//! and fills the node/decl maps of its `SemanticInfo`. Statements that do not
//! declare anything are walked through without a decl of their own.

use crate::binding_context::CollectionContext;
use crate::decl::{Decl, DeclFlags, DeclId, DeclKind};
use crate::semantic_info::SemanticInfo;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use tsb_common::limits::MAX_COLLECT_DEPTH;
use tsb_common::{Diagnostic, diagnostic_codes};
use tsb_syntax::{ModifierFlags, NodeArena, NodeIndex, SyntaxKind};

/// Map syntactic modifiers onto declaration flags.
#[must_use]
pub fn modifier_decl_flags(modifiers: ModifierFlags) -> DeclFlags {
    let mut flags = DeclFlags::empty();
    if modifiers.contains(ModifierFlags::EXPORT) {
        flags |= DeclFlags::EXPORTED;
    }
    if modifiers.contains(ModifierFlags::AMBIENT) {
        flags |= DeclFlags::AMBIENT;
    }
    if modifiers.contains(ModifierFlags::STATIC) {
        flags |= DeclFlags::STATIC;
    }
    if modifiers.contains(ModifierFlags::PRIVATE) {
        flags |= DeclFlags::PRIVATE;
    }
    if modifiers.contains(ModifierFlags::PUBLIC) {
        flags |= DeclFlags::PUBLIC;
    }
    if modifiers.contains(ModifierFlags::OPTIONAL) {
        flags |= DeclFlags::OPTIONAL;
    }
    if modifiers.contains(ModifierFlags::REST) {
        flags |= DeclFlags::REST;
    }
    flags
}

pub struct DeclCollector<'a> {
    info: &'a mut SemanticInfo,
    arena: Arc<NodeArena>,
    context: CollectionContext,
    depth: u32,
    max_depth: u32,
    truncated: bool,
}

/// Build the decl tree for `info`'s syntax tree and return the root decl.
pub fn collect(info: &mut SemanticInfo) -> DeclId {
    collect_with_limit(info, MAX_COLLECT_DEPTH)
}

/// `collect` that stops descending `max_depth` nodes below the root. The
/// first skipped node is reported on `info`.
#[instrument(level = "debug", skip(info), fields(unit = %info.path))]
pub fn collect_with_limit(info: &mut SemanticInfo, max_depth: u32) -> DeclId {
    let arena = Arc::clone(&info.arena);
    let root = info.root_node;
    let mut collector = DeclCollector {
        info,
        arena,
        context: CollectionContext::new(),
        depth: 0,
        max_depth,
        truncated: false,
    };
    let root_decl = if collector.arena.kind(root) == Some(SyntaxKind::SourceFile) {
        let root_decl = collector.info.next_decl_id();
        collector.visit(root);
        root_decl
    } else {
        // A bare fragment still gets a Script decl to hang from.
        let path = collector.info.path.clone();
        let script = collector.add_decl(root, path, DeclKind::Script, DeclFlags::empty());
        collector.push_scope(script);
        collector.visit(root);
        collector.context.pop();
        script
    };
    collector.info.root_decl = root_decl;
    debug!(decls = collector.info.decls().len(), "collected declarations");
    root_decl
}

impl DeclCollector<'_> {
    fn add_decl(&mut self, node: NodeIndex, name: String, kind: DeclKind, flags: DeclFlags) -> DeclId {
        let id = self.info.next_decl_id();
        let parent = self.context.current();
        let span = self.arena.span(node);
        self.info
            .push_decl(Decl::new(id, name, kind, flags, span, parent, node));
        if let Some(parent) = parent.and_then(|p| self.info.decl_mut(p)) {
            parent.children.push(id);
        }
        self.info.map_node(node, id);
        id
    }

    fn push_scope(&mut self, decl: DeclId) {
        let name = self
            .info
            .decl(decl)
            .map(|d| d.name.clone())
            .unwrap_or_default();
        self.context.push(decl, &name);
    }

    fn name_text(&self, name: NodeIndex) -> String {
        self.arena
            .get_identifier_text(name)
            .map(str::to_string)
            .unwrap_or_default()
    }

    fn visit(&mut self, idx: NodeIndex) {
        let Some(node) = self.arena.get(idx).copied() else {
            return;
        };
        if self.depth >= self.max_depth {
            if !self.truncated {
                self.truncated = true;
                warn!(node = idx.0, "syntax nesting too deep, declarations below are not collected");
                let limit = self.max_depth.to_string();
                let diagnostic = Diagnostic::from_code(
                    &self.info.path,
                    self.arena.span(idx),
                    diagnostic_codes::DECLARATIONS_NESTED_TOO_DEEPLY,
                    &[&limit],
                );
                self.info.report(diagnostic);
            }
            return;
        }
        self.depth += 1;

        let flags = modifier_decl_flags(node.modifiers);
        match node.kind {
            SyntaxKind::SourceFile => {
                let name = self.info.path.clone();
                let decl = self.add_decl(idx, name, DeclKind::Script, DeclFlags::empty());
                self.push_scope(decl);
                self.visit_children(idx);
                self.context.pop();
            }
            SyntaxKind::ModuleDeclaration => self.visit_module(idx, flags),
            SyntaxKind::ClassDeclaration => {
                if let Some(class) = self.arena.get_class(&node) {
                    let name = self.name_text(class.name);
                    let members: Vec<NodeIndex> = class.members.iter().collect();
                    let decl = self.add_decl(idx, name, DeclKind::Class, flags);
                    self.visit_scope(decl, &members);
                }
            }
            SyntaxKind::InterfaceDeclaration => {
                if let Some(iface) = self.arena.get_interface(&node) {
                    let name = self.name_text(iface.name);
                    let members: Vec<NodeIndex> = iface.members.iter().collect();
                    let decl = self.add_decl(idx, name, DeclKind::Interface, flags);
                    self.visit_scope(decl, &members);
                }
            }
            SyntaxKind::FunctionDeclaration
            | SyntaxKind::FunctionExpression
            | SyntaxKind::ArrowFunction => self.visit_function_like(idx, DeclKind::Function, flags),
            SyntaxKind::MethodDeclaration | SyntaxKind::MethodSignature => {
                let kind = if flags.contains(DeclFlags::STATIC) {
                    DeclKind::StaticMethod
                } else {
                    DeclKind::Method
                };
                self.visit_function_like(idx, kind, flags);
            }
            SyntaxKind::Constructor => {
                self.visit_function_like(idx, DeclKind::Method, flags | DeclFlags::CONSTRUCTOR);
            }
            SyntaxKind::CallSignature => {
                self.visit_function_like(idx, DeclKind::CallSignature, flags | DeclFlags::CALL);
            }
            SyntaxKind::ConstructSignature => self.visit_function_like(
                idx,
                DeclKind::ConstructSignature,
                flags | DeclFlags::CONSTRUCTOR,
            ),
            SyntaxKind::IndexSignature => {
                self.visit_function_like(idx, DeclKind::IndexSignature, flags | DeclFlags::INDEX);
            }
            SyntaxKind::GetAccessor | SyntaxKind::SetAccessor => self.visit_accessor(idx, flags),
            SyntaxKind::PropertyDeclaration | SyntaxKind::PropertySignature => {
                if let Some(prop) = self.arena.get_property(&node) {
                    let name = self.name_text(prop.name);
                    let initializer = prop.initializer;
                    let kind = if flags.contains(DeclFlags::STATIC) {
                        DeclKind::StaticField
                    } else {
                        DeclKind::Field
                    };
                    self.add_decl(idx, name, kind, flags);
                    self.visit(initializer);
                }
            }
            SyntaxKind::VariableStatement => {
                if let Some(stmt) = self.arena.get_variable_statement(&node) {
                    let declarations: Vec<NodeIndex> = stmt.declarations.iter().collect();
                    for declaration in declarations {
                        self.visit_variable(declaration, flags);
                    }
                }
            }
            SyntaxKind::VariableDeclaration => self.visit_variable(idx, flags),
            SyntaxKind::ImportEqualsDeclaration => {
                if let Some(import) = self.arena.get_import_equals(&node) {
                    let name = self.name_text(import.name);
                    self.add_decl(idx, name, DeclKind::Import, flags);
                }
            }
            // Type positions declare nothing; the resolver reads them directly.
            SyntaxKind::TypeReference
            | SyntaxKind::ArrayType
            | SyntaxKind::FunctionType
            | SyntaxKind::ConstructorType
            | SyntaxKind::TypeLiteral
            | SyntaxKind::Identifier
            | SyntaxKind::StringLiteral
            | SyntaxKind::QualifiedName => {}
            kind if kind.is_keyword_type() => {}
            _ => self.visit_children(idx),
        }

        self.depth -= 1;
    }

    fn visit_children(&mut self, idx: NodeIndex) {
        for child in self.arena.get_children(idx) {
            self.visit(child);
        }
    }

    fn visit_scope(&mut self, decl: DeclId, nodes: &[NodeIndex]) {
        self.push_scope(decl);
        for &node in nodes {
            self.visit(node);
        }
        self.context.pop();
    }

    /// `module A.B.C { }` becomes three nested decls; the inner ones are
    /// implicitly exported from their outer module.
    fn visit_module(&mut self, idx: NodeIndex, flags: DeclFlags) {
        let Some(node) = self.arena.get(idx).copied() else {
            return;
        };
        let Some(module) = self.arena.get_module(&node) else {
            return;
        };
        let body: Vec<NodeIndex> = module.body.iter().collect();
        let name_node = module.name;

        if self.arena.kind(name_node) == Some(SyntaxKind::StringLiteral) {
            let name = self.name_text(name_node);
            let decl = self.add_decl(idx, name, DeclKind::DynamicModule, flags);
            self.visit_scope(decl, &body);
            return;
        }

        let mut segments = self.arena.entity_name_segments(name_node);
        if segments.is_empty() {
            segments.push(String::new());
        }
        let mut pushed = 0;
        for (i, segment) in segments.into_iter().enumerate() {
            let segment_flags = if i == 0 {
                flags
            } else {
                DeclFlags::EXPORTED | (flags & DeclFlags::AMBIENT)
            };
            let decl = self.add_decl(idx, segment, DeclKind::Module, segment_flags);
            self.push_scope(decl);
            pushed += 1;
        }
        for node in body {
            self.visit(node);
        }
        for _ in 0..pushed {
            self.context.pop();
        }
    }

    fn visit_function_like(&mut self, idx: NodeIndex, kind: DeclKind, flags: DeclFlags) {
        let Some(node) = self.arena.get(idx).copied() else {
            return;
        };
        let Some(func) = self.arena.get_function(&node) else {
            return;
        };
        let mut flags = flags;
        if func.body.is_some() {
            flags |= DeclFlags::IMPLEMENTATION;
        } else {
            flags |= DeclFlags::SIGNATURE;
        }
        let name = if node.kind == SyntaxKind::Constructor {
            "constructor".to_string()
        } else {
            self.name_text(func.name)
        };
        let parameters: Vec<NodeIndex> = func.parameters.iter().collect();
        let body = func.body;

        let decl = self.add_decl(idx, name, kind, flags);
        self.push_scope(decl);
        for param in parameters {
            self.visit_parameter(param);
        }
        self.visit(body);
        self.context.pop();
    }

    fn visit_parameter(&mut self, idx: NodeIndex) {
        let Some(node) = self.arena.get(idx).copied() else {
            return;
        };
        let Some(param) = self.arena.get_parameter(&node) else {
            return;
        };
        let name = self.name_text(param.name);
        let initializer = param.initializer;
        self.add_decl(idx, name, DeclKind::Argument, modifier_decl_flags(node.modifiers));
        self.visit(initializer);
    }

    /// Accessors collect as fields. A get/set pair yields two decls that the
    /// binder merges into one symbol.
    fn visit_accessor(&mut self, idx: NodeIndex, flags: DeclFlags) {
        let Some(node) = self.arena.get(idx).copied() else {
            return;
        };
        let Some(func) = self.arena.get_function(&node) else {
            return;
        };
        let name = self.name_text(func.name);
        let body = func.body;
        let kind = if flags.contains(DeclFlags::STATIC) {
            DeclKind::StaticField
        } else {
            DeclKind::Field
        };
        let decl = self.add_decl(idx, name, kind, flags | DeclFlags::ACCESSOR);
        self.push_scope(decl);
        self.visit(body);
        self.context.pop();
    }

    fn visit_variable(&mut self, idx: NodeIndex, flags: DeclFlags) {
        let Some(node) = self.arena.get(idx).copied() else {
            return;
        };
        let Some(var) = self.arena.get_property(&node) else {
            return;
        };
        let name = self.name_text(var.name);
        let initializer = var.initializer;
        self.add_decl(idx, name, DeclKind::Variable, flags);
        self.visit(initializer);
    }
}
