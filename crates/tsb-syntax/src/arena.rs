//! Node arena for syntax tree storage.
//!
//! Nodes are stored contiguously and referenced by `NodeIndex`. The arena is
//! immutable once built; the binder only reads it.

use crate::base::NodeIndex;
use crate::node::*;
use crate::syntax_kind::SyntaxKind;
use serde::Serialize;
use tsb_common::Span;

/// Arena for thin nodes with typed data pools.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NodeArena {
    /// The thin node headers
    pub nodes: Vec<Node>,
    /// Parent of each node, parallel to `nodes` (`NONE` for the root)
    pub parents: Vec<NodeIndex>,

    // ==========================================================================
    // Typed data pools
    // ==========================================================================

    // Names and literals
    pub identifiers: Vec<IdentifierData>,
    pub literals: Vec<LiteralData>,
    pub qualified_names: Vec<QualifiedNameData>,

    // Declarations
    pub source_files: Vec<SourceFileData>,
    pub modules: Vec<ModuleData>,
    pub classes: Vec<ClassData>,
    pub interfaces: Vec<InterfaceData>,
    pub functions: Vec<FunctionData>,
    pub properties: Vec<PropertyData>,
    pub variable_statements: Vec<VariableStatementData>,
    pub parameters: Vec<ParameterData>,
    pub import_equals: Vec<ImportEqualsData>,

    // Statements and opaque expressions
    pub statements: Vec<StatementData>,

    // Types
    pub type_refs: Vec<TypeRefData>,
    pub array_types: Vec<ArrayTypeData>,
    pub type_literals: Vec<TypeLiteralData>,
}

impl NodeArena {
    #[must_use]
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Add a node header and return its index.
    pub fn add(&mut self, node: Node) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        self.parents.push(NodeIndex::NONE);
        NodeIndex(index)
    }

    /// Get a node by index
    #[inline]
    #[must_use]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn kind(&self, index: NodeIndex) -> Option<SyntaxKind> {
        self.get(index).map(|n| n.kind)
    }

    /// Source span of a node. `Span::INVALID` for unknown indices.
    #[must_use]
    pub fn span(&self, index: NodeIndex) -> Span {
        self.get(index).map_or(Span::INVALID, Node::span)
    }

    #[must_use]
    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        if index.is_none() {
            return NodeIndex::NONE;
        }
        self.parents
            .get(index.0 as usize)
            .copied()
            .unwrap_or(NodeIndex::NONE)
    }

    // ==========================================================================
    // Typed accessors
    // ==========================================================================

    #[inline]
    #[must_use]
    pub fn get_identifier(&self, node: &Node) -> Option<&IdentifierData> {
        if node.has_data() && node.kind == SyntaxKind::Identifier {
            self.identifiers.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub fn get_literal(&self, node: &Node) -> Option<&LiteralData> {
        if node.has_data()
            && matches!(
                node.kind,
                SyntaxKind::StringLiteral | SyntaxKind::ExternalModuleReference
            )
        {
            self.literals.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub fn get_qualified_name(&self, node: &Node) -> Option<&QualifiedNameData> {
        if node.has_data() && node.kind == SyntaxKind::QualifiedName {
            self.qualified_names.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub fn get_source_file(&self, node: &Node) -> Option<&SourceFileData> {
        if node.has_data() && node.kind == SyntaxKind::SourceFile {
            self.source_files.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub fn get_module(&self, node: &Node) -> Option<&ModuleData> {
        if node.has_data() && node.kind == SyntaxKind::ModuleDeclaration {
            self.modules.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub fn get_class(&self, node: &Node) -> Option<&ClassData> {
        if node.has_data() && node.kind == SyntaxKind::ClassDeclaration {
            self.classes.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub fn get_interface(&self, node: &Node) -> Option<&InterfaceData> {
        if node.has_data() && node.kind == SyntaxKind::InterfaceDeclaration {
            self.interfaces.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Function data for any function-like node (see `SyntaxKind::is_function_like`).
    #[inline]
    #[must_use]
    pub fn get_function(&self, node: &Node) -> Option<&FunctionData> {
        if node.has_data() && node.kind.is_function_like() {
            self.functions.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Property data for property declarations/signatures and variable declarations.
    #[inline]
    #[must_use]
    pub fn get_property(&self, node: &Node) -> Option<&PropertyData> {
        if node.has_data()
            && matches!(
                node.kind,
                SyntaxKind::PropertyDeclaration
                    | SyntaxKind::PropertySignature
                    | SyntaxKind::VariableDeclaration
            )
        {
            self.properties.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub fn get_variable_statement(&self, node: &Node) -> Option<&VariableStatementData> {
        if node.has_data() && node.kind == SyntaxKind::VariableStatement {
            self.variable_statements.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub fn get_parameter(&self, node: &Node) -> Option<&ParameterData> {
        if node.has_data() && node.kind == SyntaxKind::Parameter {
            self.parameters.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub fn get_import_equals(&self, node: &Node) -> Option<&ImportEqualsData> {
        if node.has_data() && node.kind == SyntaxKind::ImportEqualsDeclaration {
            self.import_equals.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub fn get_statement(&self, node: &Node) -> Option<&StatementData> {
        if node.has_data() && node.kind.is_transparent() {
            self.statements.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub fn get_type_ref(&self, node: &Node) -> Option<&TypeRefData> {
        if node.has_data() && node.kind == SyntaxKind::TypeReference {
            self.type_refs.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub fn get_array_type(&self, node: &Node) -> Option<&ArrayTypeData> {
        if node.has_data() && node.kind == SyntaxKind::ArrayType {
            self.array_types.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub fn get_type_literal(&self, node: &Node) -> Option<&TypeLiteralData> {
        if node.has_data() && node.kind == SyntaxKind::TypeLiteral {
            self.type_literals.get(node.data_index as usize)
        } else {
            None
        }
    }

    // ==========================================================================
    // Name helpers
    // ==========================================================================

    /// Text of an identifier or string literal node.
    #[must_use]
    pub fn get_identifier_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        if let Some(ident) = self.get_identifier(node) {
            return Some(&ident.text);
        }
        self.get_literal(node).map(|lit| lit.text.as_str())
    }

    /// Segments of an entity name, outermost first: `A.B.C` -> `["A", "B", "C"]`.
    ///
    /// Returns an empty vector when the node is not an identifier or a
    /// qualified name made of identifiers.
    #[must_use]
    pub fn entity_name_segments(&self, index: NodeIndex) -> Vec<String> {
        let mut segments = Vec::new();
        if !self.collect_entity_name(index, &mut segments) {
            segments.clear();
        }
        segments
    }

    fn collect_entity_name(&self, index: NodeIndex, out: &mut Vec<String>) -> bool {
        let Some(node) = self.get(index) else {
            return false;
        };
        match node.kind {
            SyntaxKind::Identifier => match self.get_identifier(node) {
                Some(ident) => {
                    out.push(ident.text.clone());
                    true
                }
                None => false,
            },
            SyntaxKind::QualifiedName => match self.get_qualified_name(node) {
                Some(qn) => {
                    self.collect_entity_name(qn.left, out) && self.collect_entity_name(qn.right, out)
                }
                None => false,
            },
            _ => false,
        }
    }

    // ==========================================================================
    // Traversal
    // ==========================================================================

    /// Direct children of a node in source order.
    #[must_use]
    pub fn get_children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let Some(node) = self.get(index) else {
            return Vec::new();
        };

        let add_opt = |children: &mut Vec<NodeIndex>, idx: NodeIndex| {
            if idx.is_some() {
                children.push(idx);
            }
        };

        let mut children = Vec::new();
        match node.kind {
            SyntaxKind::QualifiedName => {
                if let Some(qn) = self.get_qualified_name(node) {
                    add_opt(&mut children, qn.left);
                    add_opt(&mut children, qn.right);
                }
            }
            SyntaxKind::SourceFile => {
                if let Some(sf) = self.get_source_file(node) {
                    children.extend(sf.statements.iter());
                }
            }
            SyntaxKind::ModuleDeclaration => {
                if let Some(module) = self.get_module(node) {
                    add_opt(&mut children, module.name);
                    children.extend(module.body.iter());
                }
            }
            SyntaxKind::ClassDeclaration => {
                if let Some(class) = self.get_class(node) {
                    add_opt(&mut children, class.name);
                    children.extend(class.extends_types.iter());
                    children.extend(class.implements_types.iter());
                    children.extend(class.members.iter());
                }
            }
            SyntaxKind::InterfaceDeclaration => {
                if let Some(iface) = self.get_interface(node) {
                    add_opt(&mut children, iface.name);
                    children.extend(iface.extends_types.iter());
                    children.extend(iface.members.iter());
                }
            }
            SyntaxKind::PropertyDeclaration
            | SyntaxKind::PropertySignature
            | SyntaxKind::VariableDeclaration => {
                if let Some(prop) = self.get_property(node) {
                    add_opt(&mut children, prop.name);
                    add_opt(&mut children, prop.type_annotation);
                    add_opt(&mut children, prop.initializer);
                }
            }
            SyntaxKind::VariableStatement => {
                if let Some(stmt) = self.get_variable_statement(node) {
                    children.extend(stmt.declarations.iter());
                }
            }
            SyntaxKind::Parameter => {
                if let Some(param) = self.get_parameter(node) {
                    add_opt(&mut children, param.name);
                    add_opt(&mut children, param.type_annotation);
                    add_opt(&mut children, param.initializer);
                }
            }
            SyntaxKind::ImportEqualsDeclaration => {
                if let Some(import) = self.get_import_equals(node) {
                    add_opt(&mut children, import.name);
                    add_opt(&mut children, import.module_reference);
                }
            }
            SyntaxKind::TypeReference => {
                if let Some(type_ref) = self.get_type_ref(node) {
                    add_opt(&mut children, type_ref.type_name);
                }
            }
            SyntaxKind::ArrayType => {
                if let Some(array) = self.get_array_type(node) {
                    add_opt(&mut children, array.element_type);
                }
            }
            SyntaxKind::TypeLiteral => {
                if let Some(lit) = self.get_type_literal(node) {
                    children.extend(lit.members.iter());
                }
            }
            kind if kind.is_function_like() => {
                if let Some(func) = self.get_function(node) {
                    add_opt(&mut children, func.name);
                    children.extend(func.parameters.iter());
                    add_opt(&mut children, func.type_annotation);
                    add_opt(&mut children, func.body);
                }
            }
            kind if kind.is_transparent() => {
                if let Some(stmt) = self.get_statement(node) {
                    children.extend(stmt.children.iter());
                }
            }
            // Identifiers, literals and keyword types have no children
            _ => {}
        }
        children
    }
}
