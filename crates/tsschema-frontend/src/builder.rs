//! `ProgramBuilder`: assemble a bound, checked `Program` by hand.
//!
//! Every builder method creates one syntax node (plus whatever identifiers it
//! needs), binds it to a symbol where the binder would, and records the
//! checked type the checker would report for it. Nodes are created bottom-up,
//! so children are always passed in already built.
//!
//! Types that depend on declarations not yet seen (a variable referenced
//! before its declaration, for example) are recorded as deferred and settled
//! in `build`.

use rustc_hash::FxHashMap;

use crate::base::{CheckedTypeId, NodeIndex, SymbolId};
use crate::checked_types::{CheckedType, TypeCategory};
use crate::node::*;
use crate::node_arena::NodeArena;
use crate::program::Program;
use crate::symbols::{Symbol, SymbolArena, SymbolTable, symbol_flags};
use crate::syntax_kind::SyntaxKind;

/// Name of the synthetic symbol that carries `export * from` declarations.
pub const EXPORT_STAR_SYMBOL: &str = "__export";
/// Name of the synthetic symbol that carries `export =` / `export default`.
pub const EXPORT_EQUALS_SYMBOL: &str = "export=";

/// Type parameters, parameters and return type of a signature.
#[derive(Clone, Debug)]
pub struct SignatureParts {
    pub type_parameters: Vec<NodeIndex>,
    pub parameters: Vec<NodeIndex>,
    pub return_type: NodeIndex,
    pub has_body: bool,
}

impl SignatureParts {
    pub fn new(parameters: Vec<NodeIndex>, return_type: NodeIndex) -> SignatureParts {
        SignatureParts {
            type_parameters: Vec::new(),
            parameters,
            return_type,
            has_body: false,
        }
    }

    /// Mark the signature as an implementation with a body.
    pub fn with_body(mut self) -> SignatureParts {
        self.has_body = true;
        self
    }

    pub fn with_type_parameters(mut self, type_parameters: Vec<NodeIndex>) -> SignatureParts {
        self.type_parameters = type_parameters;
        self
    }
}

impl Default for SignatureParts {
    fn default() -> SignatureParts {
        SignatureParts::new(Vec::new(), NodeIndex::NONE)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ClassParts {
    pub type_parameters: Vec<NodeIndex>,
    pub heritage_clauses: Vec<NodeIndex>,
    pub members: Vec<NodeIndex>,
    pub decorators: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct ParameterSpec {
    pub name: String,
    /// Binding pattern that replaces `name` when set.
    pub pattern: NodeIndex,
    pub type_node: NodeIndex,
    pub initializer: NodeIndex,
    pub optional: bool,
    pub rest: bool,
    pub modifiers: ModifierFlags,
    pub decorators: Vec<NodeIndex>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, type_node: NodeIndex) -> ParameterSpec {
        ParameterSpec {
            name: name.into(),
            pattern: NodeIndex::NONE,
            type_node,
            initializer: NodeIndex::NONE,
            optional: false,
            rest: false,
            modifiers: ModifierFlags::empty(),
            decorators: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PropertySpec {
    pub name: String,
    pub modifiers: ModifierFlags,
    pub type_node: NodeIndex,
    pub initializer: NodeIndex,
    pub optional: bool,
    pub decorators: Vec<NodeIndex>,
}

impl PropertySpec {
    pub fn new(name: impl Into<String>, type_node: NodeIndex) -> PropertySpec {
        PropertySpec {
            name: name.into(),
            modifiers: ModifierFlags::empty(),
            type_node,
            initializer: NodeIndex::NONE,
            optional: false,
            decorators: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Deferred {
    /// `node` has the value type of `symbol`.
    ValueOf { node: NodeIndex, symbol: SymbolId },
    /// `node` has the type of `source`.
    SameAs { node: NodeIndex, source: NodeIndex },
    /// Variable `symbol` (declared by `declaration`) has the type of `source`.
    Variable {
        symbol: SymbolId,
        declaration: NodeIndex,
        source: NodeIndex,
    },
}

#[derive(Debug, Default)]
pub struct ProgramBuilder {
    arena: NodeArena,
    symbols: SymbolArena,
    types: Vec<CheckedType>,
    source_files: Vec<NodeIndex>,
    node_symbols: FxHashMap<NodeIndex, SymbolId>,
    node_types: FxHashMap<NodeIndex, CheckedTypeId>,
    return_types: FxHashMap<NodeIndex, CheckedTypeId>,
    file_locals: FxHashMap<NodeIndex, SymbolTable>,
    intrinsic_types: FxHashMap<TypeCategory, CheckedTypeId>,
    declared_types: FxHashMap<SymbolId, CheckedTypeId>,
    value_types: FxHashMap<SymbolId, CheckedTypeId>,
    module_symbols: FxHashMap<String, SymbolId>,
    array_symbol: Option<SymbolId>,
    array_type: Option<CheckedTypeId>,
    deferred: Vec<Deferred>,
}

impl ProgramBuilder {
    pub fn new() -> ProgramBuilder {
        ProgramBuilder::default()
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    // ============================================================================
    // Symbols
    // ============================================================================

    pub fn symbol(&mut self, name: &str, flags: u32) -> SymbolId {
        self.symbols.alloc(Symbol::new(name, flags))
    }

    pub fn alias(&mut self, name: &str, target: SymbolId) -> SymbolId {
        let id = self.symbol(name, symbol_flags::ALIAS);
        if let Some(sym) = self.symbols.get_mut(id) {
            sym.alias_target = target;
        }
        id
    }

    /// Module symbol of the source file named `file_name`, created on first
    /// use so files can reference each other in any build order.
    pub fn module_symbol(&mut self, file_name: &str) -> SymbolId {
        if let Some(&id) = self.module_symbols.get(file_name) {
            return id;
        }
        let id = self.symbol(&format!("\"{file_name}\""), symbol_flags::VALUE_MODULE);
        self.module_symbols.insert(file_name.to_string(), id);
        id
    }

    pub fn add_export(&mut self, container: SymbolId, name: &str, symbol: SymbolId) {
        if let Some(sym) = self.symbols.get_mut(container) {
            sym.exports
                .get_or_insert_with(SymbolTable::default)
                .entry(name.to_string())
                .or_insert(symbol);
        }
        if let Some(member) = self.symbols.get_mut(symbol)
            && member.parent.is_none()
        {
            member.parent = container;
        }
    }

    /// Symbol of the global `Array` interface.
    pub fn array_symbol(&mut self) -> SymbolId {
        if let Some(id) = self.array_symbol {
            return id;
        }
        let id = self.symbol("Array", symbol_flags::INTERFACE);
        self.array_symbol = Some(id);
        id
    }

    // ============================================================================
    // Names and literals
    // ============================================================================

    pub fn identifier(&mut self, text: &str) -> NodeIndex {
        self.arena.add_node(
            SyntaxKind::Identifier,
            NodeData::Identifier(IdentifierData {
                escaped_text: text.to_string(),
            }),
        )
    }

    /// Identifier the binder resolved to `symbol`.
    pub fn bound_identifier(&mut self, text: &str, symbol: SymbolId) -> NodeIndex {
        let idx = self.identifier(text);
        if symbol.is_some() {
            self.node_symbols.insert(idx, symbol);
        }
        idx
    }

    pub fn string_literal(&mut self, text: &str) -> NodeIndex {
        let idx = self.arena.add_node(
            SyntaxKind::StringLiteral,
            NodeData::Literal(LiteralData {
                text: text.to_string(),
            }),
        );
        let ty = self.intrinsic(TypeCategory::StringLiteral);
        self.node_types.insert(idx, ty);
        idx
    }

    pub fn numeric_literal(&mut self, text: &str) -> NodeIndex {
        let idx = self.arena.add_node(
            SyntaxKind::NumericLiteral,
            NodeData::Literal(LiteralData {
                text: text.to_string(),
            }),
        );
        let ty = self.intrinsic(TypeCategory::NumberLiteral);
        self.node_types.insert(idx, ty);
        idx
    }

    pub fn boolean_literal(&mut self, value: bool) -> NodeIndex {
        let kind = if value {
            SyntaxKind::TrueKeyword
        } else {
            SyntaxKind::FalseKeyword
        };
        let idx = self.arena.add_node(kind, NodeData::Token);
        let ty = self.intrinsic(TypeCategory::BooleanLiteral);
        self.node_types.insert(idx, ty);
        idx
    }

    /// `[expression]` property name.
    pub fn computed_name(&mut self, expression: NodeIndex) -> NodeIndex {
        self.arena.add_node(
            SyntaxKind::ComputedPropertyName,
            NodeData::ComputedProperty(ComputedPropertyData { expression }),
        )
    }

    /// Left-nested qualified name for `a.b.c`; each segment is bound to its
    /// symbol and the whole name to the last one.
    pub fn entity_name(&mut self, path: &[(&str, SymbolId)]) -> NodeIndex {
        let mut result = NodeIndex::NONE;
        for &(text, symbol) in path {
            let right = self.bound_identifier(text, symbol);
            if result.is_none() {
                result = right;
                continue;
            }
            result = self.arena.add_node(
                SyntaxKind::QualifiedName,
                NodeData::QualifiedName(QualifiedNameData {
                    left: result,
                    right,
                }),
            );
            if symbol.is_some() {
                self.node_symbols.insert(result, symbol);
            }
        }
        result
    }

    // ============================================================================
    // Type nodes
    // ============================================================================

    /// Keyword type node such as `string` or `void`.
    pub fn keyword(&mut self, kind: SyntaxKind) -> NodeIndex {
        let idx = self.arena.add_node(kind, NodeData::Token);
        let category = match kind {
            SyntaxKind::StringKeyword => TypeCategory::String,
            SyntaxKind::NumberKeyword => TypeCategory::Number,
            SyntaxKind::BooleanKeyword => TypeCategory::Boolean,
            SyntaxKind::VoidKeyword => TypeCategory::Void,
            SyntaxKind::SymbolKeyword => TypeCategory::ESSymbol,
            SyntaxKind::UndefinedKeyword => TypeCategory::Undefined,
            SyntaxKind::NullKeyword => TypeCategory::Null,
            SyntaxKind::NeverKeyword => TypeCategory::Never,
            SyntaxKind::UnknownKeyword => TypeCategory::Unknown,
            SyntaxKind::ObjectKeyword => TypeCategory::NonPrimitive,
            _ => TypeCategory::Any,
        };
        let ty = self.intrinsic(category);
        self.node_types.insert(idx, ty);
        idx
    }

    pub fn type_ref(
        &mut self,
        name: &str,
        symbol: SymbolId,
        type_arguments: Vec<NodeIndex>,
    ) -> NodeIndex {
        self.qualified_type_ref(&[(name, symbol)], type_arguments)
    }

    /// Type reference through a namespace path (`Shapes.Circle<T>`).
    pub fn qualified_type_ref(
        &mut self,
        path: &[(&str, SymbolId)],
        type_arguments: Vec<NodeIndex>,
    ) -> NodeIndex {
        let type_name = self.entity_name(path);
        let symbol = path.last().map(|&(_, sym)| sym).unwrap_or(SymbolId::NONE);
        let ty = self.referenced_type(symbol, &type_arguments);
        let idx = self.arena.add_node(
            SyntaxKind::TypeReference,
            NodeData::TypeRef(TypeRefData {
                type_name,
                type_arguments: (!type_arguments.is_empty()).then_some(type_arguments),
            }),
        );
        if let Some(ty) = ty {
            self.node_types.insert(idx, ty);
            self.node_types.insert(type_name, ty);
        }
        idx
    }

    /// `T[]`.
    pub fn array_type(&mut self, element_type: NodeIndex) -> NodeIndex {
        let idx = self.arena.add_node(
            SyntaxKind::ArrayType,
            NodeData::ArrayType(ArrayTypeData { element_type }),
        );
        let element = self.type_or_any(element_type);
        let ty = self.array_of(element);
        self.node_types.insert(idx, ty);
        idx
    }

    pub fn union_type(&mut self, types: Vec<NodeIndex>) -> NodeIndex {
        self.composite_type(SyntaxKind::UnionType, TypeCategory::Union, types)
    }

    pub fn intersection_type(&mut self, types: Vec<NodeIndex>) -> NodeIndex {
        self.composite_type(
            SyntaxKind::IntersectionType,
            TypeCategory::Intersection,
            types,
        )
    }

    pub fn tuple_type(&mut self, types: Vec<NodeIndex>) -> NodeIndex {
        self.composite_type(SyntaxKind::TupleType, TypeCategory::Tuple, types)
    }

    fn composite_type(
        &mut self,
        kind: SyntaxKind,
        category: TypeCategory,
        types: Vec<NodeIndex>,
    ) -> NodeIndex {
        let elements: Vec<CheckedTypeId> = types.iter().map(|&t| self.type_or_any(t)).collect();
        let idx = self
            .arena
            .add_node(kind, NodeData::CompositeType(CompositeTypeData { types }));
        let mut checked = CheckedType::new(category);
        checked.elements = elements;
        let ty = self.new_type(checked);
        self.node_types.insert(idx, ty);
        idx
    }

    /// `{ ... }` object type.
    pub fn type_literal(&mut self, members: Vec<NodeIndex>) -> NodeIndex {
        let idx = self.arena.add_node(
            SyntaxKind::TypeLiteral,
            NodeData::TypeLiteral(TypeLiteralData { members }),
        );
        self.anonymous_type(idx, "__type", symbol_flags::TYPE_LITERAL);
        idx
    }

    /// `(a: A) => R`.
    pub fn function_type(&mut self, parts: SignatureParts) -> NodeIndex {
        let idx = self.signature_node(SyntaxKind::FunctionType, NodeIndex::NONE, parts, Vec::new());
        self.anonymous_type(idx, "__type", symbol_flags::TYPE_LITERAL);
        idx
    }

    /// `new (a: A) => R`.
    pub fn constructor_type(&mut self, parts: SignatureParts) -> NodeIndex {
        let idx = self.signature_node(
            SyntaxKind::ConstructorType,
            NodeIndex::NONE,
            parts,
            Vec::new(),
        );
        self.anonymous_type(idx, "__type", symbol_flags::TYPE_LITERAL);
        idx
    }

    /// `typeof a.b`.
    pub fn type_query(&mut self, path: &[(&str, SymbolId)]) -> NodeIndex {
        let expr_name = self.entity_name(path);
        let idx = self.arena.add_node(
            SyntaxKind::TypeQuery,
            NodeData::TypeQuery(TypeQueryData { expr_name }),
        );
        if let Some(&(_, symbol)) = path.last() {
            self.bind_value_type(idx, symbol);
        }
        idx
    }

    /// Literal type node (`"a"`, `1`, `true`) around an already built literal.
    pub fn literal_type(&mut self, literal: NodeIndex) -> NodeIndex {
        let idx = self.arena.add_node(
            SyntaxKind::LiteralType,
            NodeData::Wrapped(WrappedData { inner: literal }),
        );
        self.copy_type(idx, literal);
        idx
    }

    pub fn parenthesized_type(&mut self, inner: NodeIndex) -> NodeIndex {
        let idx = self.arena.add_node(
            SyntaxKind::ParenthesizedType,
            NodeData::Wrapped(WrappedData { inner }),
        );
        self.copy_type(idx, inner);
        idx
    }

    // ============================================================================
    // Signature pieces
    // ============================================================================

    pub fn type_parameter(
        &mut self,
        name: &str,
        symbol: SymbolId,
        constraint: NodeIndex,
    ) -> NodeIndex {
        let name_node = self.identifier(name);
        let idx = self.arena.add_node(
            SyntaxKind::TypeParameter,
            NodeData::TypeParameter(TypeParameterData {
                name: name_node,
                constraint,
                default: NodeIndex::NONE,
            }),
        );
        self.declare(symbol, idx, name_node);
        let ty = self.declared_type(symbol);
        self.node_types.insert(idx, ty);
        idx
    }

    /// Plain `name: type` parameter.
    pub fn parameter(&mut self, name: &str, type_node: NodeIndex) -> NodeIndex {
        self.parameter_with(ParameterSpec::new(name, type_node))
    }

    pub fn parameter_with(&mut self, spec: ParameterSpec) -> NodeIndex {
        let name = if spec.pattern.is_some() {
            spec.pattern
        } else {
            self.identifier(&spec.name)
        };
        let idx = self.arena.add_node(
            SyntaxKind::Parameter,
            NodeData::Parameter(ParameterData {
                name,
                question_token: spec.optional,
                dot_dot_dot_token: spec.rest,
                type_annotation: spec.type_node,
                initializer: spec.initializer,
                decorators: spec.decorators,
            }),
        );
        self.arena.set_modifiers(idx, spec.modifiers);
        if spec.pattern.is_none() {
            let mut flags = symbol_flags::FUNCTION_SCOPED_VARIABLE;
            if spec.modifiers.intersects(ModifierFlags::PARAMETER_PROPERTY) {
                flags |= symbol_flags::PROPERTY;
            }
            let symbol = self.symbol(&spec.name, flags);
            self.declare(symbol, idx, name);
        }
        self.annotated_type(idx, spec.type_node, spec.initializer);
        idx
    }

    pub fn object_binding_pattern(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.arena.add_node(
            SyntaxKind::ObjectBindingPattern,
            NodeData::BindingPattern(BindingPatternData { elements }),
        )
    }

    pub fn array_binding_pattern(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.arena.add_node(
            SyntaxKind::ArrayBindingPattern,
            NodeData::BindingPattern(BindingPatternData { elements }),
        )
    }

    /// Binding element `name` bound to `symbol`, typed by `type_node` when set.
    pub fn binding_element(
        &mut self,
        name: &str,
        symbol: SymbolId,
        type_node: NodeIndex,
    ) -> NodeIndex {
        let name_node = self.identifier(name);
        let idx = self.arena.add_node(
            SyntaxKind::BindingElement,
            NodeData::BindingElement(BindingElementData {
                property_name: NodeIndex::NONE,
                name: name_node,
                initializer: NodeIndex::NONE,
                dot_dot_dot_token: false,
            }),
        );
        self.declare(symbol, idx, name_node);
        if let Some(ty) = self.node_types.get(&type_node).copied() {
            self.node_types.insert(idx, ty);
            self.value_types.insert(symbol, ty);
        }
        idx
    }

    pub fn heritage_clause(&mut self, token: SyntaxKind, types: Vec<NodeIndex>) -> NodeIndex {
        self.arena.add_node(
            SyntaxKind::HeritageClause,
            NodeData::Heritage(HeritageData { token, types }),
        )
    }

    /// `Base<T>` in a heritage clause; `path` names the base entity.
    pub fn heritage_type(
        &mut self,
        path: &[(&str, SymbolId)],
        type_arguments: Vec<NodeIndex>,
    ) -> NodeIndex {
        let mut expression = NodeIndex::NONE;
        for &(text, symbol) in path {
            expression = if expression.is_none() {
                self.identifier_expr(text, symbol)
            } else {
                self.property_access(expression, text, symbol)
            };
        }
        let symbol = path.last().map(|&(_, sym)| sym).unwrap_or(SymbolId::NONE);
        let ty = self.referenced_type(symbol, &type_arguments);
        let idx = self.arena.add_node(
            SyntaxKind::ExpressionWithTypeArguments,
            NodeData::ExprWithTypeArgs(ExprWithTypeArgsData {
                expression,
                type_arguments: (!type_arguments.is_empty()).then_some(type_arguments),
            }),
        );
        if let Some(ty) = ty {
            self.node_types.insert(idx, ty);
        }
        idx
    }

    pub fn decorator(&mut self, expression: NodeIndex) -> NodeIndex {
        self.arena.add_node(
            SyntaxKind::Decorator,
            NodeData::Decorator(DecoratorData { expression }),
        )
    }

    // ============================================================================
    // Members
    // ============================================================================

    pub fn property_signature(
        &mut self,
        name: &str,
        type_node: NodeIndex,
        optional: bool,
    ) -> NodeIndex {
        let mut spec = PropertySpec::new(name, type_node);
        spec.optional = optional;
        self.property_node(SyntaxKind::PropertySignature, spec)
    }

    pub fn property_declaration(&mut self, spec: PropertySpec) -> NodeIndex {
        self.property_node(SyntaxKind::PropertyDeclaration, spec)
    }

    fn property_node(&mut self, kind: SyntaxKind, spec: PropertySpec) -> NodeIndex {
        let name = self.identifier(&spec.name);
        let idx = self.arena.add_node(
            kind,
            NodeData::Property(PropertyData {
                name,
                question_token: spec.optional,
                type_annotation: spec.type_node,
                initializer: spec.initializer,
                decorators: spec.decorators,
            }),
        );
        self.arena.set_modifiers(idx, spec.modifiers);
        let symbol = self.symbol(&spec.name, symbol_flags::PROPERTY);
        self.declare(symbol, idx, name);
        self.annotated_type(idx, spec.type_node, spec.initializer);
        idx
    }

    pub fn method_signature(&mut self, name: &str, parts: SignatureParts) -> NodeIndex {
        self.method_node(
            SyntaxKind::MethodSignature,
            name,
            ModifierFlags::empty(),
            parts,
            Vec::new(),
        )
    }

    pub fn method_declaration(
        &mut self,
        name: &str,
        modifiers: ModifierFlags,
        parts: SignatureParts,
        decorators: Vec<NodeIndex>,
    ) -> NodeIndex {
        self.method_node(
            SyntaxKind::MethodDeclaration,
            name,
            modifiers,
            parts,
            decorators,
        )
    }

    fn method_node(
        &mut self,
        kind: SyntaxKind,
        name: &str,
        modifiers: ModifierFlags,
        parts: SignatureParts,
        decorators: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name_node = self.identifier(name);
        let idx = self.signature_node(kind, name_node, parts, decorators);
        self.arena.set_modifiers(idx, modifiers);
        let symbol = self.symbol(name, symbol_flags::METHOD);
        self.declare(symbol, idx, name_node);
        let ty = self.new_type(CheckedType::with_symbol(TypeCategory::Anonymous, symbol));
        self.node_types.insert(idx, ty);
        self.value_types.insert(symbol, ty);
        idx
    }

    /// Constructor; its return type is set when the owning class is built.
    pub fn constructor(&mut self, parameters: Vec<NodeIndex>) -> NodeIndex {
        self.signature_node(
            SyntaxKind::Constructor,
            NodeIndex::NONE,
            SignatureParts::new(parameters, NodeIndex::NONE),
            Vec::new(),
        )
    }

    pub fn get_accessor(
        &mut self,
        name: &str,
        modifiers: ModifierFlags,
        return_type: NodeIndex,
    ) -> NodeIndex {
        let name_node = self.identifier(name);
        let idx = self.signature_node(
            SyntaxKind::GetAccessor,
            name_node,
            SignatureParts::new(Vec::new(), return_type),
            Vec::new(),
        );
        self.arena.set_modifiers(idx, modifiers);
        let symbol = self.symbol(name, symbol_flags::GET_ACCESSOR);
        self.declare(symbol, idx, name_node);
        let ty = self.type_or_any(return_type);
        self.node_types.insert(idx, ty);
        idx
    }

    pub fn set_accessor(
        &mut self,
        name: &str,
        modifiers: ModifierFlags,
        parameter: NodeIndex,
    ) -> NodeIndex {
        let name_node = self.identifier(name);
        let idx = self.signature_node(
            SyntaxKind::SetAccessor,
            name_node,
            SignatureParts::new(vec![parameter], NodeIndex::NONE),
            Vec::new(),
        );
        self.arena.set_modifiers(idx, modifiers);
        let symbol = self.symbol(name, symbol_flags::SET_ACCESSOR);
        self.declare(symbol, idx, name_node);
        self.copy_type(idx, parameter);
        idx
    }

    /// `[key: string]: value`.
    pub fn index_signature(
        &mut self,
        key_name: &str,
        key_type: NodeIndex,
        value_type: NodeIndex,
    ) -> NodeIndex {
        let key = self.parameter(key_name, key_type);
        let idx = self.arena.add_node(
            SyntaxKind::IndexSignature,
            NodeData::IndexSignature(IndexSignatureData {
                parameters: vec![key],
                type_annotation: value_type,
            }),
        );
        self.copy_type(idx, value_type);
        idx
    }

    pub fn call_signature(&mut self, parts: SignatureParts) -> NodeIndex {
        self.signature_node(SyntaxKind::CallSignature, NodeIndex::NONE, parts, Vec::new())
    }

    pub fn construct_signature(&mut self, parts: SignatureParts) -> NodeIndex {
        self.signature_node(
            SyntaxKind::ConstructSignature,
            NodeIndex::NONE,
            parts,
            Vec::new(),
        )
    }

    fn signature_node(
        &mut self,
        kind: SyntaxKind,
        name: NodeIndex,
        parts: SignatureParts,
        decorators: Vec<NodeIndex>,
    ) -> NodeIndex {
        let return_type = parts.return_type;
        let idx = self.arena.add_node(
            kind,
            NodeData::Function(FunctionData {
                name,
                type_parameters: parts.type_parameters,
                parameters: parts.parameters,
                type_annotation: return_type,
                decorators,
                question_token: false,
                has_body: parts.has_body,
            }),
        );
        if let Some(ty) = self.node_types.get(&return_type).copied() {
            self.return_types.insert(idx, ty);
        } else if return_type.is_none() && kind != SyntaxKind::Constructor {
            let ty = self.intrinsic(TypeCategory::Void);
            self.return_types.insert(idx, ty);
        }
        idx
    }

    // ============================================================================
    // Declarations
    // ============================================================================

    pub fn class_declaration(
        &mut self,
        symbol: SymbolId,
        modifiers: ModifierFlags,
        parts: ClassParts,
    ) -> NodeIndex {
        let name = self.symbol_name(symbol);
        let name_node = self.identifier(&name);
        let type_parameters = parts.type_parameters.clone();
        let members = parts.members.clone();
        let idx = self.arena.add_node(
            SyntaxKind::ClassDeclaration,
            NodeData::Class(ClassData {
                name: name_node,
                type_parameters: parts.type_parameters,
                heritage_clauses: parts.heritage_clauses,
                members: parts.members,
                decorators: parts.decorators,
            }),
        );
        self.arena.set_modifiers(idx, modifiers);
        self.declare(symbol, idx, name_node);
        let instance = self.declared_type(symbol);
        self.set_type_parameters(instance, &type_parameters);
        for member in members {
            if self.arena.kind(member) == Some(SyntaxKind::Constructor) {
                self.return_types.insert(member, instance);
            }
        }
        self.bind_value_type(idx, symbol);
        idx
    }

    pub fn interface_declaration(
        &mut self,
        symbol: SymbolId,
        modifiers: ModifierFlags,
        type_parameters: Vec<NodeIndex>,
        heritage_clauses: Vec<NodeIndex>,
        members: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = self.symbol_name(symbol);
        let name_node = self.identifier(&name);
        let declared = self.declared_type(symbol);
        self.set_type_parameters(declared, &type_parameters);
        let idx = self.arena.add_node(
            SyntaxKind::InterfaceDeclaration,
            NodeData::Interface(InterfaceData {
                name: name_node,
                type_parameters,
                heritage_clauses,
                members,
            }),
        );
        self.arena.set_modifiers(idx, modifiers);
        self.declare(symbol, idx, name_node);
        self.node_types.insert(idx, declared);
        idx
    }

    pub fn enum_member(
        &mut self,
        name: &str,
        symbol: SymbolId,
        initializer: NodeIndex,
    ) -> NodeIndex {
        let name_node = self.identifier(name);
        let idx = self.arena.add_node(
            SyntaxKind::EnumMember,
            NodeData::EnumMember(EnumMemberData {
                name: name_node,
                initializer,
            }),
        );
        self.declare(symbol, idx, name_node);
        idx
    }

    pub fn enum_declaration(
        &mut self,
        symbol: SymbolId,
        modifiers: ModifierFlags,
        members: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = self.symbol_name(symbol);
        let name_node = self.identifier(&name);
        for &member in &members {
            if let Some(&member_symbol) = self.node_symbols.get(&member) {
                let member_name = self.symbol_name(member_symbol);
                self.add_export(symbol, &member_name, member_symbol);
            }
        }
        let idx = self.arena.add_node(
            SyntaxKind::EnumDeclaration,
            NodeData::Enum(EnumData {
                name: name_node,
                members,
            }),
        );
        self.arena.set_modifiers(idx, modifiers);
        self.declare(symbol, idx, name_node);
        let ty = self.declared_type(symbol);
        self.node_types.insert(idx, ty);
        idx
    }

    pub fn type_alias_declaration(
        &mut self,
        symbol: SymbolId,
        modifiers: ModifierFlags,
        type_parameters: Vec<NodeIndex>,
        type_node: NodeIndex,
    ) -> NodeIndex {
        let name = self.symbol_name(symbol);
        let name_node = self.identifier(&name);
        let idx = self.arena.add_node(
            SyntaxKind::TypeAliasDeclaration,
            NodeData::TypeAlias(TypeAliasData {
                name: name_node,
                type_parameters,
                type_node,
            }),
        );
        self.arena.set_modifiers(idx, modifiers);
        self.declare(symbol, idx, name_node);
        if let Some(ty) = self.node_types.get(&type_node).copied() {
            self.declared_types.entry(symbol).or_insert(ty);
            self.node_types.insert(idx, ty);
        }
        idx
    }

    pub fn function_declaration(
        &mut self,
        symbol: SymbolId,
        modifiers: ModifierFlags,
        parts: SignatureParts,
    ) -> NodeIndex {
        let name = self.symbol_name(symbol);
        let name_node = self.identifier(&name);
        let idx = self.signature_node(SyntaxKind::FunctionDeclaration, name_node, parts, Vec::new());
        self.arena.set_modifiers(idx, modifiers);
        self.declare(symbol, idx, name_node);
        self.bind_value_type(idx, symbol);
        idx
    }

    pub fn variable_declaration(
        &mut self,
        symbol: SymbolId,
        type_node: NodeIndex,
        initializer: NodeIndex,
    ) -> NodeIndex {
        let name = self.symbol_name(symbol);
        let name_node = self.identifier(&name);
        let idx = self.arena.add_node(
            SyntaxKind::VariableDeclaration,
            NodeData::VariableDeclaration(VariableDeclarationData {
                name: name_node,
                type_annotation: type_node,
                initializer,
            }),
        );
        self.declare(symbol, idx, name_node);
        let source = if type_node.is_some() {
            type_node
        } else {
            initializer
        };
        self.deferred.push(Deferred::Variable {
            symbol,
            declaration: idx,
            source,
        });
        idx
    }

    /// `const { a, b }: T = init`.
    pub fn destructuring_declaration(
        &mut self,
        pattern: NodeIndex,
        type_node: NodeIndex,
        initializer: NodeIndex,
    ) -> NodeIndex {
        let idx = self.arena.add_node(
            SyntaxKind::VariableDeclaration,
            NodeData::VariableDeclaration(VariableDeclarationData {
                name: pattern,
                type_annotation: type_node,
                initializer,
            }),
        );
        self.annotated_type(idx, type_node, initializer);
        idx
    }

    /// `flags` is `node_flags::CONST`, `node_flags::LET` or `NONE` for `var`.
    pub fn variable_statement(
        &mut self,
        modifiers: ModifierFlags,
        flags: u16,
        declarations: Vec<NodeIndex>,
    ) -> NodeIndex {
        let idx = self.arena.add_node(
            SyntaxKind::VariableStatement,
            NodeData::VariableStatement(VariableStatementData { declarations }),
        );
        self.arena.set_modifiers(idx, modifiers);
        self.arena.set_flags(idx, flags);
        idx
    }

    /// `namespace X { ... }`; exported statements join the symbol's exports.
    pub fn namespace_declaration(
        &mut self,
        symbol: SymbolId,
        modifiers: ModifierFlags,
        statements: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = self.symbol_name(symbol);
        let name_node = self.identifier(&name);
        self.module_node(symbol, modifiers, node_flags::NAMESPACE, name_node, statements)
    }

    /// `declare module "name" { ... }`; the symbol name carries the quotes.
    pub fn ambient_module_declaration(
        &mut self,
        symbol: SymbolId,
        modifiers: ModifierFlags,
        statements: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = self
            .symbols
            .get(symbol)
            .map(|sym| sym.unquoted_name().unwrap_or(&sym.escaped_name).to_string())
            .unwrap_or_default();
        let name_node = self.string_literal(&name);
        self.module_node(symbol, modifiers, node_flags::NONE, name_node, statements)
    }

    /// `declare global { ... }` inside an external module.
    pub fn global_augmentation(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        let symbol = self.symbol("global", symbol_flags::NAMESPACE_MODULE);
        let name_node = self.identifier("global");
        self.module_node(
            symbol,
            ModifierFlags::DECLARE,
            node_flags::GLOBAL_AUGMENTATION,
            name_node,
            statements,
        )
    }

    fn module_node(
        &mut self,
        symbol: SymbolId,
        modifiers: ModifierFlags,
        flags: u16,
        name_node: NodeIndex,
        statements: Vec<NodeIndex>,
    ) -> NodeIndex {
        let exported: Vec<(String, SymbolId)> = self.exported_symbols(&statements);
        let body = self.arena.add_node(
            SyntaxKind::ModuleBlock,
            NodeData::ModuleBlock(ModuleBlockData { statements }),
        );
        let idx = self.arena.add_node(
            SyntaxKind::ModuleDeclaration,
            NodeData::Module(ModuleData {
                name: name_node,
                body,
            }),
        );
        self.arena.set_modifiers(idx, modifiers);
        self.arena.set_flags(idx, flags);
        self.declare(symbol, idx, name_node);
        for (name, member) in exported {
            self.add_export(symbol, &name, member);
        }
        self.bind_value_type(idx, symbol);
        idx
    }

    /// Module specifier string literal bound to the module of `target_file`.
    pub fn module_specifier(&mut self, text: &str, target_file: &str) -> NodeIndex {
        let idx = self.string_literal(text);
        let module = self.module_symbol(target_file);
        self.node_symbols.insert(idx, module);
        idx
    }

    /// `export { ... } from "x"`, `export { ... }` or `export * from "x"`
    /// (when `clause` is `None`).
    pub fn export_declaration(
        &mut self,
        clause: Option<Vec<NodeIndex>>,
        module_specifier: NodeIndex,
    ) -> NodeIndex {
        self.arena.add_node(
            SyntaxKind::ExportDeclaration,
            NodeData::ExportDecl(ExportDeclData {
                export_clause: clause,
                module_specifier,
            }),
        )
    }

    /// `target as name` inside an export clause; `property_name` is the local
    /// name when it differs from `name`.
    pub fn export_specifier(
        &mut self,
        name: &str,
        property_name: Option<&str>,
        target: SymbolId,
    ) -> NodeIndex {
        let property = match property_name {
            Some(text) => self.bound_identifier(text, target),
            None => NodeIndex::NONE,
        };
        let name_node = self.identifier(name);
        let idx = self.arena.add_node(
            SyntaxKind::ExportSpecifier,
            NodeData::Specifier(SpecifierData {
                property_name: property,
                name: name_node,
            }),
        );
        let alias = self.alias(name, target);
        self.declare(alias, idx, name_node);
        idx
    }

    /// `export = expression` or `export default expression`.
    pub fn export_assignment(&mut self, expression: NodeIndex, is_export_equals: bool) -> NodeIndex {
        self.arena.add_node(
            SyntaxKind::ExportAssignment,
            NodeData::ExportAssignment(ExportAssignmentData {
                is_export_equals,
                expression,
            }),
        )
    }

    pub fn source_file(&mut self, file_name: &str, statements: Vec<NodeIndex>) -> NodeIndex {
        let locals = self.local_symbols(&statements);
        let exported = self.exported_symbols(&statements);
        let idx = self.arena.add_node(
            SyntaxKind::SourceFile,
            NodeData::SourceFile(SourceFileData {
                file_name: file_name.to_string(),
                is_declaration_file: file_name.ends_with(".d.ts"),
                statements,
            }),
        );
        let module = self.module_symbol(file_name);
        if let Some(sym) = self.symbols.get_mut(module) {
            sym.declarations.push(idx);
            sym.value_declaration = idx;
        }
        self.node_symbols.insert(idx, module);
        for (name, member) in exported {
            self.add_export(module, &name, member);
        }
        self.file_locals.insert(idx, locals);
        self.source_files.push(idx);
        idx
    }

    // ============================================================================
    // Expressions
    // ============================================================================

    pub fn identifier_expr(&mut self, name: &str, symbol: SymbolId) -> NodeIndex {
        let idx = self.bound_identifier(name, symbol);
        if symbol.is_some() {
            self.bind_value_type(idx, symbol);
        }
        idx
    }

    /// `expression.name`, with `name` bound to `symbol`.
    pub fn property_access(
        &mut self,
        expression: NodeIndex,
        name: &str,
        symbol: SymbolId,
    ) -> NodeIndex {
        let name_node = self.bound_identifier(name, symbol);
        let idx = self.arena.add_node(
            SyntaxKind::PropertyAccessExpression,
            NodeData::Access(AccessExprData {
                expression,
                name: name_node,
            }),
        );
        if symbol.is_some() {
            self.node_symbols.insert(idx, symbol);
            self.bind_value_type(idx, symbol);
            self.bind_value_type(name_node, symbol);
        }
        idx
    }

    pub fn call(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.call_like(SyntaxKind::CallExpression, callee, arguments)
    }

    pub fn new_expr(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.call_like(SyntaxKind::NewExpression, callee, arguments)
    }

    fn call_like(
        &mut self,
        kind: SyntaxKind,
        expression: NodeIndex,
        arguments: Vec<NodeIndex>,
    ) -> NodeIndex {
        let idx = self.arena.add_node(
            kind,
            NodeData::Call(CallExprData {
                expression,
                arguments,
            }),
        );
        let ty = self.intrinsic(TypeCategory::Any);
        self.node_types.insert(idx, ty);
        idx
    }

    pub fn object_literal(&mut self, properties: Vec<NodeIndex>) -> NodeIndex {
        let idx = self.arena.add_node(
            SyntaxKind::ObjectLiteralExpression,
            NodeData::ObjectLiteral(ObjectLiteralData { properties }),
        );
        self.anonymous_type(idx, "__object", symbol_flags::OBJECT_LITERAL);
        idx
    }

    pub fn property_assignment(&mut self, name: &str, initializer: NodeIndex) -> NodeIndex {
        let name_node = self.identifier(name);
        let idx = self.arena.add_node(
            SyntaxKind::PropertyAssignment,
            NodeData::PropertyAssignment(PropertyAssignmentData {
                name: name_node,
                initializer,
            }),
        );
        let symbol = self.symbol(name, symbol_flags::PROPERTY);
        self.declare(symbol, idx, name_node);
        self.copy_type(idx, initializer);
        idx
    }

    pub fn array_literal(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        let element = match elements.first() {
            Some(&first) => self.type_or_any(first),
            None => self.intrinsic(TypeCategory::Any),
        };
        let idx = self.arena.add_node(
            SyntaxKind::ArrayLiteralExpression,
            NodeData::ArrayLiteral(ArrayLiteralData { elements }),
        );
        let ty = self.array_of(element);
        self.node_types.insert(idx, ty);
        idx
    }

    pub fn class_expression(&mut self, parts: ClassParts) -> NodeIndex {
        let idx = self.arena.add_node(
            SyntaxKind::ClassExpression,
            NodeData::Class(ClassData {
                name: NodeIndex::NONE,
                type_parameters: parts.type_parameters,
                heritage_clauses: parts.heritage_clauses,
                members: parts.members,
                decorators: parts.decorators,
            }),
        );
        self.anonymous_type(idx, "__class", symbol_flags::CLASS);
        idx
    }

    pub fn function_expression(&mut self, parts: SignatureParts) -> NodeIndex {
        let idx = self.signature_node(
            SyntaxKind::FunctionExpression,
            NodeIndex::NONE,
            parts,
            Vec::new(),
        );
        self.anonymous_type(idx, "__function", symbol_flags::FUNCTION);
        idx
    }

    pub fn arrow_function(&mut self, parts: SignatureParts) -> NodeIndex {
        let idx = self.signature_node(SyntaxKind::ArrowFunction, NodeIndex::NONE, parts, Vec::new());
        self.anonymous_type(idx, "__function", symbol_flags::FUNCTION);
        idx
    }

    pub fn parenthesized_expr(&mut self, inner: NodeIndex) -> NodeIndex {
        let idx = self.arena.add_node(
            SyntaxKind::ParenthesizedExpression,
            NodeData::Wrapped(WrappedData { inner }),
        );
        self.copy_type(idx, inner);
        idx
    }

    /// Expression whose structure the resolver never inspects.
    pub fn opaque_expr(&mut self, kind: SyntaxKind, text: &str) -> NodeIndex {
        let idx = self.arena.add_node(
            kind,
            NodeData::Opaque(OpaqueData {
                children: Vec::new(),
                text: text.to_string(),
            }),
        );
        let ty = self.intrinsic(TypeCategory::Any);
        self.node_types.insert(idx, ty);
        idx
    }

    // ============================================================================
    // Build
    // ============================================================================

    pub fn build(mut self) -> Program {
        self.settle_deferred();
        Program {
            arena: self.arena,
            symbols: self.symbols,
            types: self.types,
            source_files: self.source_files,
            node_symbols: self.node_symbols,
            node_types: self.node_types,
            return_types: self.return_types,
            file_locals: self.file_locals,
            array_type: self.array_type,
        }
    }

    /// Settle deferred types until nothing changes; leftovers become `any`.
    fn settle_deferred(&mut self) {
        let mut pending = std::mem::take(&mut self.deferred);
        loop {
            let before = pending.len();
            pending.retain(|&item| !self.try_settle(item));
            if pending.is_empty() || pending.len() == before {
                break;
            }
        }
        if !pending.is_empty() {
            tracing::debug!(unsettled = pending.len(), "deferred types fall back to any");
        }
        let any = self.intrinsic(TypeCategory::Any);
        for item in pending {
            match item {
                Deferred::ValueOf { node, .. } | Deferred::SameAs { node, .. } => {
                    self.node_types.entry(node).or_insert(any);
                }
                Deferred::Variable {
                    symbol,
                    declaration,
                    ..
                } => {
                    self.node_types.entry(declaration).or_insert(any);
                    self.value_types.entry(symbol).or_insert(any);
                }
            }
        }
    }

    fn try_settle(&mut self, item: Deferred) -> bool {
        match item {
            Deferred::ValueOf { node, symbol } => match self.value_type(symbol) {
                Some(ty) => {
                    self.node_types.insert(node, ty);
                    true
                }
                None => false,
            },
            Deferred::SameAs { node, source } => match self.node_types.get(&source).copied() {
                Some(ty) => {
                    self.node_types.insert(node, ty);
                    true
                }
                None => false,
            },
            Deferred::Variable {
                symbol,
                declaration,
                source,
            } => {
                let ty = if source.is_none() {
                    Some(self.intrinsic(TypeCategory::Any))
                } else {
                    self.node_types.get(&source).copied()
                };
                match ty {
                    Some(ty) => {
                        self.node_types.insert(declaration, ty);
                        self.value_types.insert(symbol, ty);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    // ============================================================================
    // Helpers
    // ============================================================================

    fn new_type(&mut self, ty: CheckedType) -> CheckedTypeId {
        let id = CheckedTypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    /// Shared symbol-less type of a category (`string`, literal types, ...).
    fn intrinsic(&mut self, category: TypeCategory) -> CheckedTypeId {
        if let Some(&id) = self.intrinsic_types.get(&category) {
            return id;
        }
        let id = self.new_type(CheckedType::new(category));
        self.intrinsic_types.insert(category, id);
        id
    }

    fn type_or_any(&mut self, node: NodeIndex) -> CheckedTypeId {
        match self.node_types.get(&node).copied() {
            Some(ty) => ty,
            None => self.intrinsic(TypeCategory::Any),
        }
    }

    fn symbol_name(&self, symbol: SymbolId) -> String {
        self.symbols
            .get(symbol)
            .map(|sym| sym.escaped_name.clone())
            .unwrap_or_default()
    }

    fn declare(&mut self, symbol: SymbolId, declaration: NodeIndex, name: NodeIndex) {
        let kind = self.arena.kind(declaration);
        let Some(sym) = self.symbols.get_mut(symbol) else {
            return;
        };
        sym.declarations.push(declaration);
        let is_type_only = matches!(
            kind,
            Some(
                SyntaxKind::InterfaceDeclaration
                    | SyntaxKind::TypeAliasDeclaration
                    | SyntaxKind::TypeParameter
            )
        );
        if !is_type_only && sym.value_declaration.is_none() {
            sym.value_declaration = declaration;
        }
        self.node_symbols.insert(declaration, symbol);
        if name.is_some() {
            self.node_symbols.insert(name, symbol);
        }
    }

    /// Declared type of a class, interface, enum or type parameter symbol.
    fn declared_type(&mut self, symbol: SymbolId) -> CheckedTypeId {
        if let Some(&id) = self.declared_types.get(&symbol) {
            return id;
        }
        let flags = self.symbols.get(symbol).map(|sym| sym.flags).unwrap_or(0);
        let category = if flags & symbol_flags::CLASS != 0 {
            TypeCategory::Class
        } else if flags & symbol_flags::INTERFACE != 0 {
            TypeCategory::Interface
        } else if flags & symbol_flags::ENUM != 0 {
            TypeCategory::Enum
        } else if flags & symbol_flags::TYPE_PARAMETER != 0 {
            TypeCategory::TypeParameter
        } else {
            TypeCategory::Anonymous
        };
        let id = self.new_type(CheckedType::with_symbol(category, symbol));
        self.declared_types.insert(symbol, id);
        id
    }

    fn set_type_parameters(&mut self, declared: CheckedTypeId, type_parameters: &[NodeIndex]) {
        let params: Vec<CheckedTypeId> = type_parameters
            .iter()
            .filter_map(|tp| self.node_types.get(tp).copied())
            .collect();
        if let Some(ty) = self.types.get_mut(declared.0 as usize)
            && !params.is_empty()
        {
            ty.type_parameters = params;
        }
    }

    /// Type the checker reports for the value named by `symbol`, when it can
    /// be known yet.
    fn value_type(&mut self, symbol: SymbolId) -> Option<CheckedTypeId> {
        if let Some(&id) = self.value_types.get(&symbol) {
            return Some(id);
        }
        let sym = self.symbols.get(symbol)?;
        let flags = sym.flags;
        let alias_target = sym.alias_target;
        let id = if flags & symbol_flags::ALIAS != 0 {
            return self.value_type(alias_target);
        } else if flags & (symbol_flags::FUNCTION | symbol_flags::CLASS | symbol_flags::MODULE) != 0
        {
            self.new_type(CheckedType::with_symbol(TypeCategory::Anonymous, symbol))
        } else if flags & symbol_flags::ENUM != 0 {
            self.declared_type(symbol)
        } else if flags & symbol_flags::ENUM_MEMBER != 0 {
            self.new_type(CheckedType::with_symbol(TypeCategory::EnumLiteral, symbol))
        } else {
            return None;
        };
        self.value_types.insert(symbol, id);
        Some(id)
    }

    fn bind_value_type(&mut self, node: NodeIndex, symbol: SymbolId) {
        match self.value_type(symbol) {
            Some(ty) => {
                self.node_types.insert(node, ty);
            }
            None => self.deferred.push(Deferred::ValueOf { node, symbol }),
        }
    }

    fn copy_type(&mut self, node: NodeIndex, source: NodeIndex) {
        if source.is_none() {
            return;
        }
        match self.node_types.get(&source).copied() {
            Some(ty) => {
                self.node_types.insert(node, ty);
            }
            None => self.deferred.push(Deferred::SameAs { node, source }),
        }
    }

    /// Annotation type, else initializer type, else `any`.
    fn annotated_type(&mut self, node: NodeIndex, type_node: NodeIndex, initializer: NodeIndex) {
        if type_node.is_some()
            && let Some(ty) = self.node_types.get(&type_node).copied()
        {
            self.node_types.insert(node, ty);
        } else if initializer.is_some() {
            self.copy_type(node, initializer);
        } else {
            let ty = self.intrinsic(TypeCategory::Any);
            self.node_types.insert(node, ty);
        }
    }

    /// Anonymous object type declared by `node` under a fresh symbol.
    fn anonymous_type(&mut self, node: NodeIndex, name: &str, flags: u32) -> CheckedTypeId {
        let symbol = self.symbol(name, flags);
        self.declare(symbol, node, NodeIndex::NONE);
        let ty = self.new_type(CheckedType::with_symbol(TypeCategory::Anonymous, symbol));
        self.value_types.insert(symbol, ty);
        self.node_types.insert(node, ty);
        ty
    }

    /// Type of a reference to `symbol` with the given type argument nodes.
    fn referenced_type(
        &mut self,
        symbol: SymbolId,
        type_arguments: &[NodeIndex],
    ) -> Option<CheckedTypeId> {
        let flags = self.symbols.get(symbol)?.flags;
        if flags & symbol_flags::TYPE_ALIAS != 0 {
            return self.declared_types.get(&symbol).copied();
        }
        if flags & symbol_flags::ENUM_MEMBER != 0 {
            return self.value_type(symbol);
        }
        let declared_kinds = symbol_flags::CLASS
            | symbol_flags::INTERFACE
            | symbol_flags::ENUM
            | symbol_flags::TYPE_PARAMETER;
        if flags & declared_kinds == 0 {
            return None;
        }
        let target = self.declared_type(symbol);
        if type_arguments.is_empty() {
            return Some(target);
        }
        let arguments: Vec<CheckedTypeId> =
            type_arguments.iter().map(|&a| self.type_or_any(a)).collect();
        let mut reference = CheckedType::with_symbol(TypeCategory::Reference, symbol);
        reference.target = Some(target);
        reference.type_arguments = arguments;
        Some(self.new_type(reference))
    }

    /// `Array<element>` instantiation of the global array type.
    fn array_of(&mut self, element: CheckedTypeId) -> CheckedTypeId {
        let target = self.array_target();
        let symbol = self.array_symbol();
        let mut reference = CheckedType::with_symbol(TypeCategory::Reference, symbol);
        reference.target = Some(target);
        reference.type_arguments = vec![element];
        self.new_type(reference)
    }

    fn array_target(&mut self) -> CheckedTypeId {
        if let Some(id) = self.array_type {
            return id;
        }
        let symbol = self.array_symbol();
        let target = self.declared_type(symbol);
        let has_params = self
            .types
            .get(target.0 as usize)
            .is_some_and(CheckedType::is_generic);
        if !has_params {
            let element = self.symbol("T", symbol_flags::TYPE_PARAMETER);
            let element_type = self.declared_type(element);
            if let Some(ty) = self.types.get_mut(target.0 as usize) {
                ty.type_parameters = vec![element_type];
            }
        }
        self.array_type = Some(target);
        target
    }

    /// File-scope declarations of a statement list.
    fn local_symbols(&self, statements: &[NodeIndex]) -> SymbolTable {
        let mut locals = SymbolTable::default();
        for &stmt in statements {
            for symbol in self.declared_symbols(stmt) {
                if let Some(sym) = self.symbols.get(symbol) {
                    locals.entry(sym.escaped_name.clone()).or_insert(symbol);
                }
            }
        }
        locals
    }

    fn declared_symbols(&self, stmt: NodeIndex) -> Vec<SymbolId> {
        match self.arena.get(stmt).map(|node| &node.data) {
            Some(NodeData::VariableStatement(data)) => data
                .declarations
                .iter()
                .flat_map(|&decl| {
                    let name = self.arena.declaration_name(decl);
                    let mut found = Vec::new();
                    self.binding_symbols(name, &mut found);
                    found
                })
                .collect(),
            Some(
                NodeData::ExportDecl(_) | NodeData::ExportAssignment(_) | NodeData::ImportEquals(_),
            ) => Vec::new(),
            _ => self.node_symbols.get(&stmt).copied().into_iter().collect(),
        }
    }

    fn binding_symbols(&self, name: NodeIndex, out: &mut Vec<SymbolId>) {
        match self.arena.get(name).map(|node| &node.data) {
            Some(NodeData::BindingPattern(pattern)) => {
                for &element in &pattern.elements {
                    let inner = self.arena.declaration_name(element);
                    if self.arena.get_binding_pattern(inner).is_some() {
                        self.binding_symbols(inner, out);
                    } else if let Some(&sym) = self.node_symbols.get(&element) {
                        out.push(sym);
                    }
                }
            }
            Some(_) => out.extend(self.node_symbols.get(&name).copied()),
            None => {}
        }
    }

    /// Exports contributed by a statement list, by exported name.
    fn exported_symbols(&mut self, statements: &[NodeIndex]) -> Vec<(String, SymbolId)> {
        let mut exported = Vec::new();
        let mut export_star = SymbolId::NONE;
        for &stmt in statements {
            match self.arena.get(stmt).map(|node| node.data.clone()) {
                Some(NodeData::ExportDecl(data)) => match data.export_clause {
                    Some(specifiers) => {
                        for spec in specifiers {
                            if let Some(&alias) = self.node_symbols.get(&spec) {
                                exported.push((self.symbol_name(alias), alias));
                            }
                        }
                    }
                    None => {
                        if export_star.is_none() {
                            export_star = self.symbol(EXPORT_STAR_SYMBOL, symbol_flags::ALIAS);
                            exported.push((EXPORT_STAR_SYMBOL.to_string(), export_star));
                        }
                        if let Some(sym) = self.symbols.get_mut(export_star) {
                            sym.declarations.push(stmt);
                        }
                    }
                },
                Some(NodeData::ExportAssignment(data)) => {
                    let target = self
                        .node_symbols
                        .get(&data.expression)
                        .copied()
                        .unwrap_or(SymbolId::NONE);
                    let name = if data.is_export_equals {
                        EXPORT_EQUALS_SYMBOL
                    } else {
                        "default"
                    };
                    let alias = self.alias(name, target);
                    if let Some(sym) = self.symbols.get_mut(alias) {
                        sym.declarations.push(stmt);
                    }
                    self.node_symbols.insert(stmt, alias);
                    exported.push((name.to_string(), alias));
                }
                Some(_) if self.arena.modifiers(stmt).contains(ModifierFlags::EXPORT) => {
                    let is_default = self.arena.modifiers(stmt).contains(ModifierFlags::DEFAULT);
                    for symbol in self.declared_symbols(stmt) {
                        let name = if is_default {
                            "default".to_string()
                        } else {
                            self.symbol_name(symbol)
                        };
                        exported.push((name, symbol));
                    }
                }
                _ => {}
            }
        }
        exported
    }
}

#[cfg(test)]
#[path = "../tests/builder_tests.rs"]
mod tests;
