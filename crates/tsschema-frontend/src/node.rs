//! Syntax node storage.
//!
//! A `Node` carries its kind, flags, modifiers and parent link plus a typed
//! payload (`NodeData`). Payload structs mirror the shapes the resolver
//! reads; fields that hold child nodes use `NodeIndex::NONE` when absent.

use bitflags::bitflags;

use crate::base::NodeIndex;
use crate::syntax_kind::SyntaxKind;

/// Node flags (stored on `VariableStatement` and `ModuleDeclaration` nodes).
pub mod node_flags {
    pub const NONE: u16 = 0;
    /// `const` variable statement.
    pub const CONST: u16 = 1 << 0;
    /// `let` variable statement.
    pub const LET: u16 = 1 << 1;
    /// `namespace X {}` (as opposed to `module X {}`).
    pub const NAMESPACE: u16 = 1 << 2;
    /// `declare global {}`.
    pub const GLOBAL_AUGMENTATION: u16 = 1 << 3;
}

bitflags! {
    /// Modifier keywords written on a declaration or member.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModifierFlags: u32 {
        const EXPORT = 1 << 0;
        const DECLARE = 1 << 1;
        const DEFAULT = 1 << 2;
        const ABSTRACT = 1 << 3;
        const STATIC = 1 << 4;
        const READONLY = 1 << 5;
        const PUBLIC = 1 << 6;
        const PRIVATE = 1 << 7;
        const PROTECTED = 1 << 8;
        const ASYNC = 1 << 9;

        /// Modifiers that turn a constructor parameter into a property.
        const PARAMETER_PROPERTY = Self::PUBLIC.bits()
            | Self::PRIVATE.bits()
            | Self::PROTECTED.bits()
            | Self::READONLY.bits();
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: SyntaxKind,
    pub flags: u16,
    pub modifiers: ModifierFlags,
    pub parent: NodeIndex,
    pub data: NodeData,
}

impl Node {
    #[inline]
    pub fn has_modifier(&self, modifier: ModifierFlags) -> bool {
        self.modifiers.contains(modifier)
    }
}

#[derive(Clone, Debug)]
pub enum NodeData {
    /// Keyword types and literal keywords.
    Token,
    SourceFile(SourceFileData),
    Identifier(IdentifierData),
    QualifiedName(QualifiedNameData),
    ComputedProperty(ComputedPropertyData),
    Literal(LiteralData),
    Module(ModuleData),
    ModuleBlock(ModuleBlockData),
    Class(ClassData),
    Interface(InterfaceData),
    Enum(EnumData),
    EnumMember(EnumMemberData),
    TypeAlias(TypeAliasData),
    Function(FunctionData),
    VariableStatement(VariableStatementData),
    VariableDeclaration(VariableDeclarationData),
    ImportEquals(ImportEqualsData),
    ExportDecl(ExportDeclData),
    Specifier(SpecifierData),
    ExportAssignment(ExportAssignmentData),
    Parameter(ParameterData),
    TypeParameter(TypeParameterData),
    Property(PropertyData),
    IndexSignature(IndexSignatureData),
    Heritage(HeritageData),
    ExprWithTypeArgs(ExprWithTypeArgsData),
    Decorator(DecoratorData),
    BindingPattern(BindingPatternData),
    BindingElement(BindingElementData),
    TypeRef(TypeRefData),
    ArrayType(ArrayTypeData),
    /// Tuple, union and intersection type nodes.
    CompositeType(CompositeTypeData),
    TypeLiteral(TypeLiteralData),
    TypeQuery(TypeQueryData),
    /// Parenthesized type/expression and literal type nodes.
    Wrapped(WrappedData),
    ObjectLiteral(ObjectLiteralData),
    PropertyAssignment(PropertyAssignmentData),
    ArrayLiteral(ArrayLiteralData),
    Call(CallExprData),
    Access(AccessExprData),
    /// Expressions the resolver never looks inside (binary, template, ...).
    Opaque(OpaqueData),
}

#[derive(Clone, Debug)]
pub struct SourceFileData {
    pub file_name: String,
    pub statements: Vec<NodeIndex>,
    pub is_declaration_file: bool,
}

#[derive(Clone, Debug)]
pub struct IdentifierData {
    pub escaped_text: String,
}

#[derive(Clone, Debug)]
pub struct QualifiedNameData {
    pub left: NodeIndex,
    pub right: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ComputedPropertyData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct LiteralData {
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct ModuleData {
    /// Identifier, or string literal for ambient modules.
    pub name: NodeIndex,
    /// `ModuleBlock`, or a nested `ModuleDeclaration` for `namespace a.b`.
    pub body: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ModuleBlockData {
    pub statements: Vec<NodeIndex>,
}

/// Class declarations and class expressions.
#[derive(Clone, Debug)]
pub struct ClassData {
    pub name: NodeIndex,
    pub type_parameters: Vec<NodeIndex>,
    pub heritage_clauses: Vec<NodeIndex>,
    pub members: Vec<NodeIndex>,
    pub decorators: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct InterfaceData {
    pub name: NodeIndex,
    pub type_parameters: Vec<NodeIndex>,
    pub heritage_clauses: Vec<NodeIndex>,
    pub members: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct EnumData {
    pub name: NodeIndex,
    pub members: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct EnumMemberData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TypeAliasData {
    pub name: NodeIndex,
    pub type_parameters: Vec<NodeIndex>,
    pub type_node: NodeIndex,
}

/// Every signature-bearing node: function declarations and expressions,
/// methods, constructors, accessors, call/construct signatures and
/// function/constructor type nodes.
#[derive(Clone, Debug)]
pub struct FunctionData {
    pub name: NodeIndex,
    pub type_parameters: Vec<NodeIndex>,
    pub parameters: Vec<NodeIndex>,
    pub type_annotation: NodeIndex,
    pub decorators: Vec<NodeIndex>,
    pub question_token: bool,
    /// Set for implementations (`{ ... }` present); overload and ambient
    /// signatures have no body.
    pub has_body: bool,
}

#[derive(Clone, Debug)]
pub struct VariableStatementData {
    pub declarations: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct VariableDeclarationData {
    /// Identifier or binding pattern.
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ImportEqualsData {
    pub name: NodeIndex,
    pub module_reference: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ExportDeclData {
    /// `None` for `export * from "x"`.
    pub export_clause: Option<Vec<NodeIndex>>,
    pub module_specifier: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct SpecifierData {
    pub property_name: NodeIndex,
    pub name: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ExportAssignmentData {
    pub is_export_equals: bool,
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ParameterData {
    /// Identifier or binding pattern.
    pub name: NodeIndex,
    pub question_token: bool,
    pub dot_dot_dot_token: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
    pub decorators: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct TypeParameterData {
    pub name: NodeIndex,
    pub constraint: NodeIndex,
    pub default: NodeIndex,
}

/// Property declarations (classes) and property signatures (interfaces,
/// type literals).
#[derive(Clone, Debug)]
pub struct PropertyData {
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
    pub decorators: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct IndexSignatureData {
    pub parameters: Vec<NodeIndex>,
    pub type_annotation: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct HeritageData {
    /// `ExtendsKeyword` or `ImplementsKeyword`.
    pub token: SyntaxKind,
    pub types: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct ExprWithTypeArgsData {
    pub expression: NodeIndex,
    pub type_arguments: Option<Vec<NodeIndex>>,
}

#[derive(Clone, Debug)]
pub struct DecoratorData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct BindingPatternData {
    pub elements: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct BindingElementData {
    pub property_name: NodeIndex,
    /// Identifier or nested binding pattern.
    pub name: NodeIndex,
    pub initializer: NodeIndex,
    pub dot_dot_dot_token: bool,
}

#[derive(Clone, Debug)]
pub struct TypeRefData {
    /// Identifier or qualified name.
    pub type_name: NodeIndex,
    pub type_arguments: Option<Vec<NodeIndex>>,
}

#[derive(Clone, Debug)]
pub struct ArrayTypeData {
    pub element_type: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct CompositeTypeData {
    pub types: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct TypeLiteralData {
    pub members: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct TypeQueryData {
    pub expr_name: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct WrappedData {
    pub inner: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ObjectLiteralData {
    pub properties: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct PropertyAssignmentData {
    pub name: NodeIndex,
    /// `NONE` for shorthand assignments.
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ArrayLiteralData {
    pub elements: Vec<NodeIndex>,
}

/// Call and `new` expressions.
#[derive(Clone, Debug)]
pub struct CallExprData {
    pub expression: NodeIndex,
    pub arguments: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    pub name: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct OpaqueData {
    pub children: Vec<NodeIndex>,
    pub text: String,
}
