//! Programmatic construction of syntax trees.
//!
//! Children are created before their parents, so building reads bottom-up:
//!
//! ```ignore
//! let mut b = TreeBuilder::new("a.ts");
//! let x = b.property_signature("x", ModifierFlags::empty(), b_number);
//! let foo = b.interface("Foo", ModifierFlags::EXPORT, vec![], vec![x]);
//! let root = b.source_file(vec![foo]);
//! let (arena, root) = b.finish(root);
//! ```
//!
//! `finish` assigns parent links and synthetic, properly nested source spans
//! in syntactic order, so span-based queries behave as they would on a parsed
//! file.

use crate::arena::NodeArena;
use crate::base::{NodeIndex, NodeList};
use crate::flags::ModifierFlags;
use crate::node::*;
use crate::syntax_kind::SyntaxKind;
use std::sync::Arc;

pub struct TreeBuilder {
    arena: NodeArena,
    file_name: String,
    /// Nodes whose span is forced to `Span::INVALID` after layout.
    invalid_spans: Vec<NodeIndex>,
}

impl TreeBuilder {
    #[must_use]
    pub fn new(file_name: &str) -> Self {
        Self {
            arena: NodeArena::new(),
            file_name: file_name.to_string(),
            invalid_spans: Vec::new(),
        }
    }

    fn push(&mut self, kind: SyntaxKind, modifiers: ModifierFlags, data_index: usize) -> NodeIndex {
        let mut node = Node::with_data(kind, data_index as u32);
        node.modifiers = modifiers;
        self.arena.add(node)
    }

    // =========================================================================
    // Names
    // =========================================================================

    pub fn ident(&mut self, text: &str) -> NodeIndex {
        let data_index = self.arena.identifiers.len();
        self.arena.identifiers.push(IdentifierData {
            text: text.to_string(),
        });
        self.push(SyntaxKind::Identifier, ModifierFlags::empty(), data_index)
    }

    pub fn string_literal(&mut self, text: &str) -> NodeIndex {
        let data_index = self.arena.literals.len();
        self.arena.literals.push(LiteralData {
            text: text.to_string(),
        });
        self.push(SyntaxKind::StringLiteral, ModifierFlags::empty(), data_index)
    }

    /// `A` or `A.B.C` as an identifier / left-nested qualified name.
    pub fn entity_name(&mut self, dotted: &str) -> NodeIndex {
        let mut parts = dotted.split('.');
        let first = parts.next().unwrap_or_default();
        let mut left = self.ident(first);
        for part in parts {
            let right = self.ident(part);
            let data_index = self.arena.qualified_names.len();
            self.arena
                .qualified_names
                .push(QualifiedNameData { left, right });
            left = self.push(
                SyntaxKind::QualifiedName,
                ModifierFlags::empty(),
                data_index,
            );
        }
        left
    }

    // =========================================================================
    // Types
    // =========================================================================

    pub fn keyword_type(&mut self, kind: SyntaxKind) -> NodeIndex {
        debug_assert!(kind.is_keyword_type());
        self.arena.add(Node::new(kind))
    }

    pub fn any_type(&mut self) -> NodeIndex {
        self.keyword_type(SyntaxKind::AnyKeyword)
    }

    pub fn number_type(&mut self) -> NodeIndex {
        self.keyword_type(SyntaxKind::NumberKeyword)
    }

    pub fn string_type(&mut self) -> NodeIndex {
        self.keyword_type(SyntaxKind::StringKeyword)
    }

    pub fn boolean_type(&mut self) -> NodeIndex {
        self.keyword_type(SyntaxKind::BooleanKeyword)
    }

    pub fn void_type(&mut self) -> NodeIndex {
        self.keyword_type(SyntaxKind::VoidKeyword)
    }

    /// A reference to a named type: `Foo` or `M.N.Foo`.
    pub fn type_ref(&mut self, dotted: &str) -> NodeIndex {
        let type_name = self.entity_name(dotted);
        let data_index = self.arena.type_refs.len();
        self.arena.type_refs.push(TypeRefData { type_name });
        self.push(SyntaxKind::TypeReference, ModifierFlags::empty(), data_index)
    }

    /// `element[]`
    pub fn array_type(&mut self, element_type: NodeIndex) -> NodeIndex {
        let data_index = self.arena.array_types.len();
        self.arena.array_types.push(ArrayTypeData { element_type });
        self.push(SyntaxKind::ArrayType, ModifierFlags::empty(), data_index)
    }

    /// `(params) => ret`
    pub fn function_type(&mut self, parameters: Vec<NodeIndex>, ret: NodeIndex) -> NodeIndex {
        self.function_like(
            SyntaxKind::FunctionType,
            ModifierFlags::empty(),
            NodeIndex::NONE,
            parameters,
            ret,
            NodeIndex::NONE,
        )
    }

    /// `new (params) => ret`
    pub fn constructor_type(&mut self, parameters: Vec<NodeIndex>, ret: NodeIndex) -> NodeIndex {
        self.function_like(
            SyntaxKind::ConstructorType,
            ModifierFlags::empty(),
            NodeIndex::NONE,
            parameters,
            ret,
            NodeIndex::NONE,
        )
    }

    /// `{ members }` in type position
    pub fn type_literal(&mut self, members: Vec<NodeIndex>) -> NodeIndex {
        let data_index = self.arena.type_literals.len();
        self.arena.type_literals.push(TypeLiteralData {
            members: NodeList::from(members),
        });
        self.push(SyntaxKind::TypeLiteral, ModifierFlags::empty(), data_index)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn source_file(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        let data_index = self.arena.source_files.len();
        self.arena.source_files.push(SourceFileData {
            file_name: self.file_name.clone(),
            statements: NodeList::from(statements),
        });
        self.push(SyntaxKind::SourceFile, ModifierFlags::empty(), data_index)
    }

    /// `module A.B { body }`
    pub fn module(
        &mut self,
        dotted_name: &str,
        modifiers: ModifierFlags,
        body: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = self.entity_name(dotted_name);
        self.module_with_name(name, modifiers, body)
    }

    /// `declare module "name" { body }`
    pub fn dynamic_module(&mut self, name: &str, body: Vec<NodeIndex>) -> NodeIndex {
        let name = self.string_literal(name);
        self.module_with_name(name, ModifierFlags::AMBIENT, body)
    }

    fn module_with_name(
        &mut self,
        name: NodeIndex,
        modifiers: ModifierFlags,
        body: Vec<NodeIndex>,
    ) -> NodeIndex {
        let data_index = self.arena.modules.len();
        self.arena.modules.push(ModuleData {
            name,
            body: NodeList::from(body),
        });
        self.push(SyntaxKind::ModuleDeclaration, modifiers, data_index)
    }

    pub fn class(
        &mut self,
        name: &str,
        modifiers: ModifierFlags,
        extends_types: Vec<NodeIndex>,
        implements_types: Vec<NodeIndex>,
        members: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = self.ident(name);
        let data_index = self.arena.classes.len();
        self.arena.classes.push(ClassData {
            name,
            extends_types: NodeList::from(extends_types),
            implements_types: NodeList::from(implements_types),
            members: NodeList::from(members),
        });
        self.push(SyntaxKind::ClassDeclaration, modifiers, data_index)
    }

    pub fn interface(
        &mut self,
        name: &str,
        modifiers: ModifierFlags,
        extends_types: Vec<NodeIndex>,
        members: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = self.ident(name);
        let data_index = self.arena.interfaces.len();
        self.arena.interfaces.push(InterfaceData {
            name,
            extends_types: NodeList::from(extends_types),
            members: NodeList::from(members),
        });
        self.push(SyntaxKind::InterfaceDeclaration, modifiers, data_index)
    }

    fn function_like(
        &mut self,
        kind: SyntaxKind,
        modifiers: ModifierFlags,
        name: NodeIndex,
        parameters: Vec<NodeIndex>,
        type_annotation: NodeIndex,
        body: NodeIndex,
    ) -> NodeIndex {
        let data_index = self.arena.functions.len();
        self.arena.functions.push(FunctionData {
            name,
            parameters: NodeList::from(parameters),
            type_annotation,
            body,
        });
        self.push(kind, modifiers, data_index)
    }

    fn optional_body(&mut self, body: Option<Vec<NodeIndex>>) -> NodeIndex {
        match body {
            Some(statements) => self.block(statements),
            None => NodeIndex::NONE,
        }
    }

    /// `function name(params): ret { body }`; `body: None` declares an overload.
    pub fn function(
        &mut self,
        name: &str,
        modifiers: ModifierFlags,
        parameters: Vec<NodeIndex>,
        ret: NodeIndex,
        body: Option<Vec<NodeIndex>>,
    ) -> NodeIndex {
        let name = self.ident(name);
        let body = self.optional_body(body);
        self.function_like(
            SyntaxKind::FunctionDeclaration,
            modifiers,
            name,
            parameters,
            ret,
            body,
        )
    }

    /// `function [name](params) { body }` in expression position.
    pub fn function_expression(
        &mut self,
        name: Option<&str>,
        parameters: Vec<NodeIndex>,
        ret: NodeIndex,
        body: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = match name {
            Some(name) => self.ident(name),
            None => NodeIndex::NONE,
        };
        let body = self.block(body);
        self.function_like(
            SyntaxKind::FunctionExpression,
            ModifierFlags::empty(),
            name,
            parameters,
            ret,
            body,
        )
    }

    /// `(params) => { body }`
    pub fn arrow_function(
        &mut self,
        parameters: Vec<NodeIndex>,
        ret: NodeIndex,
        body: Vec<NodeIndex>,
    ) -> NodeIndex {
        let body = self.block(body);
        self.function_like(
            SyntaxKind::ArrowFunction,
            ModifierFlags::empty(),
            NodeIndex::NONE,
            parameters,
            ret,
            body,
        )
    }

    /// Class method; `body: None` declares an overload.
    pub fn method(
        &mut self,
        name: &str,
        modifiers: ModifierFlags,
        parameters: Vec<NodeIndex>,
        ret: NodeIndex,
        body: Option<Vec<NodeIndex>>,
    ) -> NodeIndex {
        let name = self.ident(name);
        let body = self.optional_body(body);
        self.function_like(
            SyntaxKind::MethodDeclaration,
            modifiers,
            name,
            parameters,
            ret,
            body,
        )
    }

    /// Interface or type-literal method signature.
    pub fn method_signature(
        &mut self,
        name: &str,
        modifiers: ModifierFlags,
        parameters: Vec<NodeIndex>,
        ret: NodeIndex,
    ) -> NodeIndex {
        let name = self.ident(name);
        self.function_like(
            SyntaxKind::MethodSignature,
            modifiers,
            name,
            parameters,
            ret,
            NodeIndex::NONE,
        )
    }

    /// `constructor(params) { body }`; `body: None` declares an overload.
    pub fn constructor(
        &mut self,
        modifiers: ModifierFlags,
        parameters: Vec<NodeIndex>,
        body: Option<Vec<NodeIndex>>,
    ) -> NodeIndex {
        let body = self.optional_body(body);
        self.function_like(
            SyntaxKind::Constructor,
            modifiers,
            NodeIndex::NONE,
            parameters,
            NodeIndex::NONE,
            body,
        )
    }

    pub fn get_accessor(
        &mut self,
        name: &str,
        modifiers: ModifierFlags,
        ret: NodeIndex,
        body: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = self.ident(name);
        let body = self.block(body);
        self.function_like(
            SyntaxKind::GetAccessor,
            modifiers,
            name,
            Vec::new(),
            ret,
            body,
        )
    }

    pub fn set_accessor(
        &mut self,
        name: &str,
        modifiers: ModifierFlags,
        parameter: NodeIndex,
        body: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = self.ident(name);
        let body = self.block(body);
        self.function_like(
            SyntaxKind::SetAccessor,
            modifiers,
            name,
            vec![parameter],
            NodeIndex::NONE,
            body,
        )
    }

    /// `(params): ret` inside an interface or type literal.
    pub fn call_signature(&mut self, parameters: Vec<NodeIndex>, ret: NodeIndex) -> NodeIndex {
        self.function_like(
            SyntaxKind::CallSignature,
            ModifierFlags::empty(),
            NodeIndex::NONE,
            parameters,
            ret,
            NodeIndex::NONE,
        )
    }

    /// `new (params): ret` inside an interface or type literal.
    pub fn construct_signature(&mut self, parameters: Vec<NodeIndex>, ret: NodeIndex) -> NodeIndex {
        self.function_like(
            SyntaxKind::ConstructSignature,
            ModifierFlags::empty(),
            NodeIndex::NONE,
            parameters,
            ret,
            NodeIndex::NONE,
        )
    }

    /// `[param]: value_type`
    pub fn index_signature(&mut self, parameter: NodeIndex, value_type: NodeIndex) -> NodeIndex {
        self.function_like(
            SyntaxKind::IndexSignature,
            ModifierFlags::empty(),
            NodeIndex::NONE,
            vec![parameter],
            value_type,
            NodeIndex::NONE,
        )
    }

    fn property_like(
        &mut self,
        kind: SyntaxKind,
        name: &str,
        modifiers: ModifierFlags,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
    ) -> NodeIndex {
        let name = self.ident(name);
        let data_index = self.arena.properties.len();
        self.arena.properties.push(PropertyData {
            name,
            type_annotation,
            initializer,
        });
        self.push(kind, modifiers, data_index)
    }

    /// Class property declaration.
    pub fn property(
        &mut self,
        name: &str,
        modifiers: ModifierFlags,
        type_annotation: NodeIndex,
    ) -> NodeIndex {
        self.property_like(
            SyntaxKind::PropertyDeclaration,
            name,
            modifiers,
            type_annotation,
            NodeIndex::NONE,
        )
    }

    /// Interface or type-literal property signature.
    pub fn property_signature(
        &mut self,
        name: &str,
        modifiers: ModifierFlags,
        type_annotation: NodeIndex,
    ) -> NodeIndex {
        self.property_like(
            SyntaxKind::PropertySignature,
            name,
            modifiers,
            type_annotation,
            NodeIndex::NONE,
        )
    }

    /// A single variable declaration (`x: T = init`) for use in `var_statement`.
    pub fn var_declaration(
        &mut self,
        name: &str,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
    ) -> NodeIndex {
        self.property_like(
            SyntaxKind::VariableDeclaration,
            name,
            ModifierFlags::empty(),
            type_annotation,
            initializer,
        )
    }

    /// `[export] var a, b, ...;`
    pub fn var_statement(
        &mut self,
        modifiers: ModifierFlags,
        declarations: Vec<NodeIndex>,
    ) -> NodeIndex {
        let data_index = self.arena.variable_statements.len();
        self.arena.variable_statements.push(VariableStatementData {
            declarations: NodeList::from(declarations),
        });
        self.push(SyntaxKind::VariableStatement, modifiers, data_index)
    }

    /// `[export] var name: T;`
    pub fn var(&mut self, name: &str, modifiers: ModifierFlags, ty: NodeIndex) -> NodeIndex {
        let decl = self.var_declaration(name, ty, NodeIndex::NONE);
        self.var_statement(modifiers, vec![decl])
    }

    /// `[var] name: T = init;` with an initializer expression.
    pub fn var_with_initializer(
        &mut self,
        name: &str,
        modifiers: ModifierFlags,
        ty: NodeIndex,
        initializer: NodeIndex,
    ) -> NodeIndex {
        let decl = self.var_declaration(name, ty, initializer);
        self.var_statement(modifiers, vec![decl])
    }

    pub fn param(&mut self, name: &str, type_annotation: NodeIndex) -> NodeIndex {
        self.param_with(name, ModifierFlags::empty(), type_annotation)
    }

    /// Parameter with modifiers (`public`/`private` parameter properties, `?`, `...`).
    pub fn param_with(
        &mut self,
        name: &str,
        modifiers: ModifierFlags,
        type_annotation: NodeIndex,
    ) -> NodeIndex {
        let name = self.ident(name);
        let data_index = self.arena.parameters.len();
        self.arena.parameters.push(ParameterData {
            name,
            type_annotation,
            initializer: NodeIndex::NONE,
        });
        self.push(SyntaxKind::Parameter, modifiers, data_index)
    }

    /// `import name = A.B;`
    pub fn import_equals(
        &mut self,
        name: &str,
        modifiers: ModifierFlags,
        dotted_target: &str,
    ) -> NodeIndex {
        let name = self.ident(name);
        let module_reference = self.entity_name(dotted_target);
        self.import_with_reference(name, modifiers, module_reference)
    }

    /// `import name = require("module");`
    pub fn import_require(&mut self, name: &str, module: &str) -> NodeIndex {
        let name = self.ident(name);
        let data_index = self.arena.literals.len();
        self.arena.literals.push(LiteralData {
            text: module.to_string(),
        });
        let module_reference = self.push(
            SyntaxKind::ExternalModuleReference,
            ModifierFlags::empty(),
            data_index,
        );
        self.import_with_reference(name, ModifierFlags::empty(), module_reference)
    }

    fn import_with_reference(
        &mut self,
        name: NodeIndex,
        modifiers: ModifierFlags,
        module_reference: NodeIndex,
    ) -> NodeIndex {
        let data_index = self.arena.import_equals.len();
        self.arena.import_equals.push(ImportEqualsData {
            name,
            module_reference,
        });
        self.push(SyntaxKind::ImportEqualsDeclaration, modifiers, data_index)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn statement(&mut self, kind: SyntaxKind, children: Vec<NodeIndex>) -> NodeIndex {
        let data_index = self.arena.statements.len();
        self.arena.statements.push(StatementData {
            children: children.into_iter().filter(|c| c.is_some()).collect(),
        });
        self.push(kind, ModifierFlags::empty(), data_index)
    }

    pub fn block(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.statement(SyntaxKind::Block, statements)
    }

    pub fn if_statement(&mut self, then_statement: NodeIndex, else_statement: NodeIndex) -> NodeIndex {
        let condition = self.expression(Vec::new());
        self.statement(
            SyntaxKind::IfStatement,
            vec![condition, then_statement, else_statement],
        )
    }

    pub fn while_statement(&mut self, body: NodeIndex) -> NodeIndex {
        let condition = self.expression(Vec::new());
        self.statement(SyntaxKind::WhileStatement, vec![condition, body])
    }

    pub fn for_statement(&mut self, initializer: NodeIndex, body: NodeIndex) -> NodeIndex {
        self.statement(SyntaxKind::ForStatement, vec![initializer, body])
    }

    pub fn expression_statement(&mut self, expression: NodeIndex) -> NodeIndex {
        self.statement(SyntaxKind::ExpressionStatement, vec![expression])
    }

    pub fn return_statement(&mut self, expression: NodeIndex) -> NodeIndex {
        self.statement(SyntaxKind::ReturnStatement, vec![expression])
    }

    /// An opaque expression (call, binary, ...) wrapping the given children.
    pub fn expression(&mut self, children: Vec<NodeIndex>) -> NodeIndex {
        self.statement(SyntaxKind::Expression, children)
    }

    // =========================================================================
    // Finishing
    // =========================================================================

    /// Force a node's span to `Span::INVALID` (a malformed tree).
    pub fn mark_invalid_span(&mut self, node: NodeIndex) {
        self.invalid_spans.push(node);
    }

    /// Assign parents and spans below `root` and return the immutable arena.
    #[must_use]
    pub fn finish(mut self, root: NodeIndex) -> (Arc<NodeArena>, NodeIndex) {
        let mut pos = 0;
        self.layout(root, NodeIndex::NONE, &mut pos);
        for idx in std::mem::take(&mut self.invalid_spans) {
            if let Some(node) = self.arena.nodes.get_mut(idx.0 as usize) {
                node.pos = u32::MAX;
                node.end = u32::MAX;
            }
        }
        (Arc::new(self.arena), root)
    }

    fn layout(&mut self, idx: NodeIndex, parent: NodeIndex, pos: &mut u32) {
        let Some(node) = self.arena.get(idx).copied() else {
            return;
        };
        if let Some(slot) = self.arena.parents.get_mut(idx.0 as usize) {
            *slot = parent;
        }
        let start = *pos;
        let width = match node.kind {
            SyntaxKind::Identifier | SyntaxKind::StringLiteral => self
                .arena
                .get_identifier_text(idx)
                .map_or(1, |text| text.len() as u32 + 1),
            kind => kind.keyword_text().map_or(1, |text| text.len() as u32 + 1),
        };
        *pos += width;
        for child in self.arena.get_children(idx) {
            self.layout(child, idx, pos);
        }
        *pos += 1;
        if let Some(slot) = self.arena.nodes.get_mut(idx.0 as usize) {
            slot.pos = start;
            slot.end = *pos;
        }
    }
}
