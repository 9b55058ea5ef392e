//! Syntax kinds for the nodes the resolver inspects.
//!
//! Only the declaration, type, and restricted-expression surface is listed.
//! Statements inside function bodies never reach the resolver.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyntaxKind {
    // Names and literals
    Identifier,
    QualifiedName,
    ComputedPropertyName,
    StringLiteral,
    NumericLiteral,
    TrueKeyword,
    FalseKeyword,
    NullKeyword,

    // Keywords used as heritage tokens
    ExtendsKeyword,
    ImplementsKeyword,

    // Top level
    SourceFile,
    ModuleDeclaration,
    ModuleBlock,

    // Declarations
    ClassDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    EnumMember,
    TypeAliasDeclaration,
    FunctionDeclaration,
    VariableStatement,
    VariableDeclaration,
    ImportEqualsDeclaration,
    ExportDeclaration,
    ExportSpecifier,
    ExportAssignment,

    // Class and type members
    Parameter,
    TypeParameter,
    PropertyDeclaration,
    PropertySignature,
    MethodDeclaration,
    MethodSignature,
    Constructor,
    GetAccessor,
    SetAccessor,
    IndexSignature,
    CallSignature,
    ConstructSignature,
    HeritageClause,
    ExpressionWithTypeArguments,
    Decorator,

    // Binding patterns
    ObjectBindingPattern,
    ArrayBindingPattern,
    BindingElement,

    // Type nodes
    TypeReference,
    ArrayType,
    TupleType,
    UnionType,
    IntersectionType,
    TypeLiteral,
    FunctionType,
    ConstructorType,
    TypeQuery,
    ParenthesizedType,
    LiteralType,
    AnyKeyword,
    StringKeyword,
    NumberKeyword,
    BooleanKeyword,
    VoidKeyword,
    SymbolKeyword,
    UndefinedKeyword,
    NeverKeyword,
    UnknownKeyword,
    ObjectKeyword,

    // Expressions
    ObjectLiteralExpression,
    PropertyAssignment,
    ShorthandPropertyAssignment,
    ArrayLiteralExpression,
    CallExpression,
    NewExpression,
    PropertyAccessExpression,
    ClassExpression,
    FunctionExpression,
    ArrowFunction,
    ParenthesizedExpression,
    PrefixUnaryExpression,
    BinaryExpression,
    TemplateExpression,
}

impl SyntaxKind {
    /// Nodes whose data is a `FunctionData` signature.
    pub fn is_function_like(self) -> bool {
        matches!(
            self,
            SyntaxKind::FunctionDeclaration
                | SyntaxKind::FunctionExpression
                | SyntaxKind::ArrowFunction
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::MethodSignature
                | SyntaxKind::Constructor
                | SyntaxKind::GetAccessor
                | SyntaxKind::SetAccessor
                | SyntaxKind::CallSignature
                | SyntaxKind::ConstructSignature
                | SyntaxKind::FunctionType
                | SyntaxKind::ConstructorType
        )
    }

    pub fn is_class_like(self) -> bool {
        matches!(
            self,
            SyntaxKind::ClassDeclaration | SyntaxKind::ClassExpression
        )
    }

    pub fn is_binding_pattern(self) -> bool {
        matches!(
            self,
            SyntaxKind::ObjectBindingPattern | SyntaxKind::ArrayBindingPattern
        )
    }

    /// Keyword type nodes (`string`, `number`, ...).
    pub fn is_keyword_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::AnyKeyword
                | SyntaxKind::StringKeyword
                | SyntaxKind::NumberKeyword
                | SyntaxKind::BooleanKeyword
                | SyntaxKind::VoidKeyword
                | SyntaxKind::SymbolKeyword
                | SyntaxKind::UndefinedKeyword
                | SyntaxKind::NeverKeyword
                | SyntaxKind::UnknownKeyword
                | SyntaxKind::ObjectKeyword
                | SyntaxKind::NullKeyword
        )
    }
}
