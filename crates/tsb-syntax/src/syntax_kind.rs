//! Node kinds understood by the binder.

use serde::Serialize;

/// The kind of a syntax node.
///
/// Only declaration-bearing constructs, the statements the collector walks
/// through and the type nodes the resolver reads are distinguished. Any other
/// expression is an opaque `Expression` whose children are still visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum SyntaxKind {
    Unknown = 0,

    // Names and literals
    Identifier,
    StringLiteral,
    QualifiedName,

    // Top level
    SourceFile,

    // Declarations
    ModuleDeclaration,
    ClassDeclaration,
    InterfaceDeclaration,
    FunctionDeclaration,
    VariableStatement,
    VariableDeclaration,
    ImportEqualsDeclaration,
    ExternalModuleReference,
    Parameter,

    // Class and interface members
    PropertyDeclaration,
    PropertySignature,
    MethodDeclaration,
    MethodSignature,
    Constructor,
    GetAccessor,
    SetAccessor,
    CallSignature,
    ConstructSignature,
    IndexSignature,

    // Function-like expressions
    FunctionExpression,
    ArrowFunction,

    // Statements the collector walks through
    Block,
    IfStatement,
    WhileStatement,
    ForStatement,
    ExpressionStatement,
    ReturnStatement,
    Expression,

    // Type nodes
    TypeReference,
    ArrayType,
    FunctionType,
    ConstructorType,
    TypeLiteral,
    AnyKeyword,
    NumberKeyword,
    StringKeyword,
    BooleanKeyword,
    VoidKeyword,
    NullKeyword,
    UndefinedKeyword,
}

impl SyntaxKind {
    /// Keyword type nodes (`any`, `number`, ...).
    #[must_use]
    pub const fn is_keyword_type(self) -> bool {
        matches!(
            self,
            Self::AnyKeyword
                | Self::NumberKeyword
                | Self::StringKeyword
                | Self::BooleanKeyword
                | Self::VoidKeyword
                | Self::NullKeyword
                | Self::UndefinedKeyword
        )
    }

    /// The source spelling of a keyword type.
    #[must_use]
    pub const fn keyword_text(self) -> Option<&'static str> {
        match self {
            Self::AnyKeyword => Some("any"),
            Self::NumberKeyword => Some("number"),
            Self::StringKeyword => Some("string"),
            Self::BooleanKeyword => Some("boolean"),
            Self::VoidKeyword => Some("void"),
            Self::NullKeyword => Some("null"),
            Self::UndefinedKeyword => Some("undefined"),
            _ => None,
        }
    }

    /// Nodes whose data is a `FunctionData` record.
    #[must_use]
    pub const fn is_function_like(self) -> bool {
        matches!(
            self,
            Self::FunctionDeclaration
                | Self::FunctionExpression
                | Self::ArrowFunction
                | Self::MethodDeclaration
                | Self::MethodSignature
                | Self::Constructor
                | Self::GetAccessor
                | Self::SetAccessor
                | Self::CallSignature
                | Self::ConstructSignature
                | Self::IndexSignature
                | Self::FunctionType
                | Self::ConstructorType
        )
    }

    /// Statements and expressions that introduce no name of their own.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        matches!(
            self,
            Self::Block
                | Self::IfStatement
                | Self::WhileStatement
                | Self::ForStatement
                | Self::ExpressionStatement
                | Self::ReturnStatement
                | Self::Expression
        )
    }
}
