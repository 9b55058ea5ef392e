//! Type Materializer: checked types and type syntax to `SchemaType`.
//!
//! Two entry points:
//! - `materialize_node` starts from syntax, which keeps information the
//!   checked type loses (written type arguments, alias names, `typeof`)
//! - `materialize_type` dispatches on the checked type's category
//!
//! Named declarations always materialize to references into the registry,
//! never inline, which is what stops recursion on cyclic types.

use tsschema_frontend::{
    CheckedTypeId, FrontEnd, NodeIndex, SymbolId, SyntaxKind, TypeCategory, symbol_flags,
};
use tsschema_model::{
    CompositeType, Member, PrimitiveKind, Reference, SchemaType, TypeQueryTarget, TypeReference,
};

use crate::error::{Result, SchemaError};
use crate::scope::TypeScope;
use crate::state::ResolverState;

impl<'a, F: FrontEnd + ?Sized> ResolverState<'a, F> {
    // =========================================================================
    // Node path
    // =========================================================================

    pub(crate) fn materialize_node(
        &mut self,
        node: NodeIndex,
        scope: &TypeScope,
    ) -> Result<SchemaType> {
        self.guarded(node, |state| state.materialize_node_inner(node, scope))
    }

    fn materialize_node_inner(&mut self, node: NodeIndex, scope: &TypeScope) -> Result<SchemaType> {
        let arena = self.arena();
        match self.kind(node) {
            Some(SyntaxKind::TypeQuery) => return self.materialize_type_query(node, scope),
            Some(SyntaxKind::ParenthesizedType) => {
                if let Some(wrapped) = arena.get_wrapped(node) {
                    return self.materialize_node(wrapped.inner, scope);
                }
            }
            Some(SyntaxKind::ArrayType) => {
                if let Some(array) = arena.get_array_type(node) {
                    let element = self.materialize_node(array.element_type, scope)?;
                    return self.array_reference(element);
                }
            }
            Some(SyntaxKind::TypeReference) => {
                if let Some(reference) = arena.get_type_ref(node) {
                    let name_symbol = self
                        .fe
                        .symbol_at(reference.type_name)
                        .map(|sym| self.fe.aliased_symbol(sym));
                    if let Some(symbol) = name_symbol
                        && self.symbol_has_flags(symbol, symbol_flags::TYPE_ALIAS)
                    {
                        let constructor = self.resolve_constructor(symbol, node)?;
                        return match &reference.type_arguments {
                            Some(arguments) => {
                                self.parameterized(constructor, arguments, scope)
                            }
                            None => Ok(self.close_reference(constructor)),
                        };
                    }
                    if let Some(arguments) = &reference.type_arguments {
                        return self.materialize_written_arguments(
                            node,
                            reference.type_name,
                            arguments,
                            scope,
                        );
                    }
                }
            }
            Some(SyntaxKind::ExpressionWithTypeArguments) => {
                if let Some(heritage) = arena.get_expr_with_type_args(node) {
                    if let Some(arguments) = &heritage.type_arguments {
                        return self.materialize_written_arguments(
                            node,
                            heritage.expression,
                            arguments,
                            scope,
                        );
                    }
                    if self.fe.type_at(node).is_none() {
                        return self.materialize_node(heritage.expression, scope);
                    }
                }
            }
            _ => {}
        }

        let checked = self.fe.type_at(node);
        let node_symbol = self.fe.symbol_at(node);
        let type_has_symbol = checked
            .and_then(|ty| self.checked(ty))
            .is_some_and(|ty| ty.symbol.is_some());

        if !type_has_symbol
            && let Some(symbol) = node_symbol
            && let Some(result) = self.materialize_by_symbol(symbol, node, scope)
        {
            return result;
        }
        match checked {
            Some(ty) => self.materialize_type_at(ty, node, scope),
            None => Err(SchemaError::MissingType {
                text: self.text(node),
            }),
        }
    }

    /// Fallback for nodes whose checked type carries no symbol.
    fn materialize_by_symbol(
        &mut self,
        symbol: SymbolId,
        node: NodeIndex,
        scope: &TypeScope,
    ) -> Option<Result<SchemaType>> {
        let symbol = self.fe.aliased_symbol(symbol);
        let declaration = *self.symbol(symbol)?.declarations.first()?;
        match self.kind(declaration)? {
            SyntaxKind::PropertyAssignment => {
                let initializer = self.arena().get_property_assignment(declaration)?.initializer;
                if initializer.is_none() {
                    return None;
                }
                Some(self.materialize_node(initializer, scope))
            }
            SyntaxKind::ClassDeclaration
            | SyntaxKind::InterfaceDeclaration
            | SyntaxKind::TypeAliasDeclaration => Some(
                self.resolve_constructor(symbol, node)
                    .map(|id| self.close_reference(id)),
            ),
            _ => None,
        }
    }

    /// `Name<A, B>` as written: the constructor the name resolves to, with
    /// each argument materialized from its syntax.
    fn materialize_written_arguments(
        &mut self,
        node: NodeIndex,
        name: NodeIndex,
        arguments: &[NodeIndex],
        scope: &TypeScope,
    ) -> Result<SchemaType> {
        if let Some(ty) = self.fe.type_at(node)
            && self.fe.is_array_type(ty)
            && let Some(&element) = arguments.first()
        {
            let element = self.materialize_node(element, scope)?;
            return self.array_reference(element);
        }
        let Some(symbol) = self.fe.symbol_at(name) else {
            return Err(SchemaError::MissingType {
                text: self.text(node),
            });
        };
        let constructor = self.resolve_constructor(symbol, node)?;
        self.parameterized(constructor, arguments, scope)
    }

    fn parameterized(
        &mut self,
        constructor: tsschema_model::ConstructorId,
        arguments: &[NodeIndex],
        scope: &TypeScope,
    ) -> Result<SchemaType> {
        let mut type_arguments = Vec::with_capacity(arguments.len());
        for &argument in arguments {
            type_arguments.push(self.materialize_node(argument, scope)?);
        }
        Ok(SchemaType::Reference(TypeReference {
            constructor,
            type_arguments,
        }))
    }

    /// `typeof X`.
    fn materialize_type_query(&mut self, node: NodeIndex, scope: &TypeScope) -> Result<SchemaType> {
        let unresolved = || SchemaType::TypeQuery(Box::new(TypeQueryTarget::Unresolved));
        let Some(query) = self.arena().get_type_query(node) else {
            return Ok(unresolved());
        };
        let Some(symbol) = self.fe.symbol_at(query.expr_name) else {
            return Ok(unresolved());
        };
        let symbol = self.fe.aliased_symbol(symbol);
        let Some(&declaration) = self.symbol(symbol).and_then(|sym| sym.declarations.first())
        else {
            return Ok(unresolved());
        };

        let target = match self.kind(declaration) {
            Some(SyntaxKind::ModuleDeclaration) => {
                query_target(self.resolve_symbol(symbol, true)?)
            }
            Some(
                SyntaxKind::VariableDeclaration
                | SyntaxKind::FunctionDeclaration
                | SyntaxKind::BindingElement,
            ) => query_target(self.resolve_declaration(declaration, false)?),
            Some(SyntaxKind::ClassDeclaration) => query_target(self.resolve_symbol(symbol, false)?),
            Some(SyntaxKind::EnumDeclaration) => TypeQueryTarget::Type {
                target: SchemaType::Enum {
                    id: self.resolve_enum(symbol, node)?,
                },
            },
            _ => {
                let type_symbol = self
                    .fe
                    .type_at(node)
                    .and_then(|ty| self.checked(ty))
                    .map(|ty| ty.symbol)
                    .filter(|sym| sym.is_some());
                match type_symbol {
                    None => query_target(self.resolve_symbol(symbol, false)?),
                    Some(type_symbol) if self.declares_module(type_symbol) => {
                        query_target(self.resolve_symbol(type_symbol, true)?)
                    }
                    Some(_) => {
                        let ty = self.fe.type_at(node).ok_or_else(|| SchemaError::MissingType {
                            text: self.text(node),
                        })?;
                        TypeQueryTarget::Type {
                            target: self.materialize_type_at(ty, node, scope)?,
                        }
                    }
                }
            }
        };
        Ok(SchemaType::TypeQuery(Box::new(target)))
    }

    fn declares_module(&self, symbol: SymbolId) -> bool {
        self.symbol(symbol)
            .and_then(|sym| sym.declarations.first())
            .is_some_and(|&decl| self.kind(decl) == Some(SyntaxKind::ModuleDeclaration))
    }

    // =========================================================================
    // Type path
    // =========================================================================

    pub(crate) fn materialize_type(
        &mut self,
        ty: CheckedTypeId,
        scope: &TypeScope,
    ) -> Result<SchemaType> {
        self.materialize_type_at(ty, NodeIndex::NONE, scope)
    }

    /// `origin` is only used for diagnostics.
    pub(crate) fn materialize_type_at(
        &mut self,
        ty: CheckedTypeId,
        origin: NodeIndex,
        scope: &TypeScope,
    ) -> Result<SchemaType> {
        self.guarded(origin, |state| state.materialize_type_inner(ty, origin, scope))
    }

    fn materialize_type_inner(
        &mut self,
        ty: CheckedTypeId,
        origin: NodeIndex,
        scope: &TypeScope,
    ) -> Result<SchemaType> {
        let Some(checked) = self.checked(ty) else {
            return Err(SchemaError::MissingType {
                text: self.text(origin),
            });
        };
        let primitive = |kind| -> Result<SchemaType> { Ok(SchemaType::primitive(kind)) };

        match checked.category {
            TypeCategory::Any => primitive(PrimitiveKind::Any),
            TypeCategory::String | TypeCategory::StringLiteral => primitive(PrimitiveKind::String),
            TypeCategory::Number | TypeCategory::NumberLiteral => primitive(PrimitiveKind::Number),
            TypeCategory::Boolean | TypeCategory::BooleanLiteral => {
                primitive(PrimitiveKind::Boolean)
            }
            TypeCategory::Void => primitive(PrimitiveKind::Void),
            TypeCategory::ESSymbol => primitive(PrimitiveKind::Symbol),
            TypeCategory::Enum => Ok(SchemaType::Enum {
                id: self.resolve_enum(checked.symbol, origin)?,
            }),
            TypeCategory::EnumLiteral => {
                let parent = self
                    .symbol(checked.symbol)
                    .map(|sym| sym.parent)
                    .unwrap_or(SymbolId::NONE);
                Ok(SchemaType::Enum {
                    id: self.resolve_enum(parent, origin)?,
                })
            }
            TypeCategory::Class | TypeCategory::Interface => {
                let constructor = self.resolve_constructor(checked.symbol, origin)?;
                Ok(self.close_reference(constructor))
            }
            TypeCategory::Reference => {
                if self.fe.is_array_type(ty) {
                    let element = match checked.type_arguments.first() {
                        Some(&argument) => self.materialize_type_at(argument, origin, scope)?,
                        None => SchemaType::any(),
                    };
                    return self.array_reference(element);
                }
                let target_symbol = checked
                    .target
                    .and_then(|target| self.checked(target))
                    .map(|target| target.symbol)
                    .filter(|sym| sym.is_some())
                    .unwrap_or(checked.symbol);
                let constructor = self.resolve_constructor(target_symbol, origin)?;
                if checked.type_arguments.is_empty() {
                    return Ok(self.close_reference(constructor));
                }
                let mut type_arguments = Vec::with_capacity(checked.type_arguments.len());
                for &argument in &checked.type_arguments {
                    type_arguments.push(self.materialize_type_at(argument, origin, scope)?);
                }
                Ok(SchemaType::Reference(TypeReference {
                    constructor,
                    type_arguments,
                }))
            }
            TypeCategory::TypeParameter => {
                let name = self
                    .symbol(checked.symbol)
                    .map(|sym| sym.escaped_name.as_str())
                    .unwrap_or_default();
                match scope.lookup(name) {
                    Some(binding) => Ok(SchemaType::TypeParameter(binding.clone())),
                    None => Err(SchemaError::TypeParameterNotFound {
                        name: name.to_string(),
                    }),
                }
            }
            TypeCategory::Tuple => Ok(SchemaType::Tuple {
                elements: self.materialize_types(&checked.elements, origin, scope)?,
            }),
            TypeCategory::Union => Ok(SchemaType::Union {
                types: self.materialize_types(&checked.elements, origin, scope)?,
            }),
            TypeCategory::Intersection => Ok(SchemaType::Intersection {
                types: self.materialize_types(&checked.elements, origin, scope)?,
            }),
            TypeCategory::Anonymous => self.materialize_anonymous(checked.symbol, origin, scope),
            category => Err(SchemaError::UnrecognisedType {
                category,
                text: self.text(origin),
            }),
        }
    }

    fn materialize_types(
        &mut self,
        types: &[CheckedTypeId],
        origin: NodeIndex,
        scope: &TypeScope,
    ) -> Result<Vec<SchemaType>> {
        let mut out = Vec::with_capacity(types.len());
        for &ty in types {
            out.push(self.materialize_type_at(ty, origin, scope)?);
        }
        Ok(out)
    }

    /// Structural types, dispatched on the declaration that introduced them.
    fn materialize_anonymous(
        &mut self,
        symbol: SymbolId,
        origin: NodeIndex,
        scope: &TypeScope,
    ) -> Result<SchemaType> {
        let declaration = self
            .symbol(symbol)
            .and_then(|sym| sym.declarations.first().copied())
            .unwrap_or(NodeIndex::NONE);
        let arena = self.arena();

        match self.kind(declaration) {
            Some(SyntaxKind::FunctionDeclaration) => {
                let value = self.resolve_declaration(declaration, false)?;
                Ok(SchemaType::TypeQuery(Box::new(query_target(value))))
            }
            Some(
                SyntaxKind::FunctionExpression
                | SyntaxKind::ArrowFunction
                | SyntaxKind::FunctionType
                | SyntaxKind::ConstructorType
                | SyntaxKind::MethodSignature
                | SyntaxKind::CallSignature
                | SyntaxKind::ConstructSignature,
            ) => Ok(SchemaType::Function(Box::new(
                self.signature(declaration, false, scope)?,
            ))),
            Some(SyntaxKind::MethodDeclaration) => Ok(SchemaType::Function(Box::new(
                self.signature(declaration, true, scope)?,
            ))),
            Some(SyntaxKind::ClassDeclaration | SyntaxKind::Constructor) => {
                let constructor = self.resolve_constructor(symbol, origin)?;
                Ok(self.close_reference(constructor))
            }
            Some(SyntaxKind::ModuleDeclaration | SyntaxKind::SourceFile) => {
                let container = self.resolve_symbol(symbol, true)?;
                Ok(SchemaType::TypeQuery(Box::new(query_target(container))))
            }
            Some(SyntaxKind::EnumDeclaration) => Ok(SchemaType::Enum {
                id: self.resolve_enum(symbol, origin)?,
            }),
            Some(SyntaxKind::ObjectLiteralExpression) => {
                let mut composite = CompositeType::default();
                if let Some(literal) = arena.get_object_literal(declaration) {
                    for &property in &literal.properties {
                        let Some(name) = arena.declaration_name_text(property) else {
                            continue;
                        };
                        let ty = self.materialize_node(property, scope)?;
                        composite.members.insert(name, Member::new(ty));
                    }
                }
                Ok(SchemaType::Composite(Box::new(composite)))
            }
            Some(SyntaxKind::TypeLiteral) => {
                let members = arena
                    .get_type_literal(declaration)
                    .map(|literal| literal.members.as_slice())
                    .unwrap_or_default();
                let composite = self.populate_members(members, false, scope)?;
                Ok(SchemaType::Composite(Box::new(composite)))
            }
            _ => Err(SchemaError::UnrecognisedType {
                category: TypeCategory::Anonymous,
                text: if declaration.is_some() {
                    self.text(declaration)
                } else {
                    self.text(origin)
                },
            }),
        }
    }
}

pub(crate) fn query_target(reference: Reference) -> TypeQueryTarget {
    match reference {
        Reference::Value(id) => TypeQueryTarget::Value { id },
        Reference::Container(id) => TypeQueryTarget::Container { id },
        Reference::Constructor(id) => TypeQueryTarget::Constructor { id },
        Reference::Enum(id) => TypeQueryTarget::Type {
            target: SchemaType::Enum { id },
        },
    }
}

#[cfg(test)]
#[path = "../tests/materialize_tests.rs"]
mod tests;
