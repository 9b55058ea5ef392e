//! Expression Materializer: initializers and decorator arguments.
//!
//! Only a literal/reference subset is modeled. Every other shape becomes an
//! opaque `any` expression rather than an error; structural failures inside
//! a modeled shape (a bad type in an inline function, say) still propagate.

use indexmap::IndexMap;
use tracing::debug;
use tsschema_frontend::{FrontEnd, NodeIndex, SyntaxKind, TypeCategory, symbol_flags};
use tsschema_model::{
    ClassExpression, Decorator, DecoratorTarget, Expression, Reference, TypeParameterOwner,
};

use crate::error::{Result, SchemaError};
use crate::scope::TypeScope;
use crate::state::ResolverState;

impl<'a, F: FrontEnd + ?Sized> ResolverState<'a, F> {
    /// `Some(expression)` for a present initializer node.
    pub(crate) fn initializer(
        &mut self,
        node: NodeIndex,
        scope: &TypeScope,
    ) -> Result<Option<Expression>> {
        if node.is_none() {
            return Ok(None);
        }
        self.expression(node, scope).map(Some)
    }

    pub(crate) fn expression(&mut self, node: NodeIndex, scope: &TypeScope) -> Result<Expression> {
        match self.expression_guarded(|state| state.expression_inner(node, scope)) {
            Some(result) => result,
            None => {
                debug!(expression = %self.text(node), "expression nesting too deep, using any");
                Ok(Expression::opaque())
            }
        }
    }

    fn expression_inner(&mut self, node: NodeIndex, scope: &TypeScope) -> Result<Expression> {
        let arena = self.arena();
        let Some(kind) = self.kind(node) else {
            return Ok(Expression::opaque());
        };

        let expression = match kind {
            SyntaxKind::StringLiteral => arena
                .get_literal(node)
                .map(|lit| Expression::string(lit.text.as_str())),
            SyntaxKind::NumericLiteral => arena
                .get_literal(node)
                .and_then(|lit| parse_numeric_literal(&lit.text))
                .map(Expression::number),
            SyntaxKind::TrueKeyword => Some(Expression::boolean(true)),
            SyntaxKind::FalseKeyword => Some(Expression::boolean(false)),
            SyntaxKind::Identifier => self.identifier_expression(node)?,
            SyntaxKind::ParenthesizedExpression => match arena.get_wrapped(node) {
                Some(wrapped) => Some(self.expression(wrapped.inner, scope)?),
                None => None,
            },
            SyntaxKind::PropertyAccessExpression => self.property_access_expression(node)?,
            SyntaxKind::CallExpression => match arena.get_call(node) {
                Some(call) => {
                    let function = self.expression(call.expression, scope)?;
                    let mut arguments = Vec::with_capacity(call.arguments.len());
                    for &argument in &call.arguments {
                        arguments.push(self.expression(argument, scope)?);
                    }
                    Some(Expression::Call {
                        function: Box::new(function),
                        arguments,
                    })
                }
                None => None,
            },
            SyntaxKind::ObjectLiteralExpression => match arena.get_object_literal(node) {
                Some(literal) => {
                    let mut properties = IndexMap::new();
                    for &property in &literal.properties {
                        let Some(name) = arena.declaration_name_text(property) else {
                            continue;
                        };
                        let value = match self.kind(property) {
                            Some(SyntaxKind::PropertyAssignment) => {
                                let initializer = arena
                                    .get_property_assignment(property)
                                    .map(|pa| pa.initializer)
                                    .unwrap_or(NodeIndex::NONE);
                                self.expression(initializer, scope)?
                            }
                            Some(SyntaxKind::ShorthandPropertyAssignment) => self
                                .identifier_expression(arena.declaration_name(property))?
                                .unwrap_or_else(Expression::opaque),
                            _ => Expression::opaque(),
                        };
                        properties.insert(name, value);
                    }
                    Some(Expression::Object { properties })
                }
                None => None,
            },
            SyntaxKind::ArrayLiteralExpression => match arena.get_array_literal(node) {
                Some(literal) => {
                    let mut elements = Vec::with_capacity(literal.elements.len());
                    for &element in &literal.elements {
                        elements.push(self.expression(element, scope)?);
                    }
                    Some(Expression::Array { elements })
                }
                None => None,
            },
            SyntaxKind::ClassExpression => Some(self.class_expression(node, scope)?),
            SyntaxKind::FunctionExpression | SyntaxKind::ArrowFunction => Some(
                Expression::Function(Box::new(self.signature(node, false, scope)?)),
            ),
            _ => None,
        };

        Ok(expression.unwrap_or_else(|| {
            debug!(kind = ?kind, expression = %self.text(node), "unsupported expression, using any");
            Expression::opaque()
        }))
    }

    /// A name in value position: variables and functions become value
    /// references, classes become class references.
    fn identifier_expression(&mut self, node: NodeIndex) -> Result<Option<Expression>> {
        let Some(symbol) = self.fe.symbol_at(node) else {
            return Ok(None);
        };
        let symbol = self.fe.aliased_symbol(symbol);
        let Some(declaration) = self
            .symbol(symbol)
            .map(|sym| sym.value_declaration)
            .filter(|decl| decl.is_some())
        else {
            return Ok(None);
        };
        match self.kind(declaration) {
            Some(
                SyntaxKind::VariableDeclaration
                | SyntaxKind::FunctionDeclaration
                | SyntaxKind::BindingElement,
            ) => Ok(Some(Expression::Value {
                id: self.resolve_value(declaration)?,
            })),
            Some(SyntaxKind::ClassDeclaration) => Ok(Some(Expression::ClassReference {
                id: self.resolve_constructor(symbol, node)?,
            })),
            _ => Ok(None),
        }
    }

    /// `Enum.Member`, or a qualified value such as `ns.helper`.
    fn property_access_expression(&mut self, node: NodeIndex) -> Result<Option<Expression>> {
        let Some(access) = self.arena().get_access(node) else {
            return Ok(None);
        };
        let symbol = self
            .fe
            .symbol_at(access.name)
            .or_else(|| self.fe.symbol_at(node))
            .map(|sym| self.fe.aliased_symbol(sym));

        let is_enum_literal = self
            .fe
            .type_at(node)
            .and_then(|ty| self.checked(ty))
            .is_some_and(|ty| ty.category == TypeCategory::EnumLiteral);
        if let Some(member) = symbol
            && (self.symbol_has_flags(member, symbol_flags::ENUM_MEMBER) || is_enum_literal)
            && let Some(sym) = self.symbol(member)
            && sym.parent.is_some()
        {
            let id = self.resolve_enum(sym.parent, node)?;
            let name = sym.unquoted_name().unwrap_or(&sym.escaped_name).to_string();
            return Ok(Some(Expression::EnumMember { id, member: name }));
        }
        self.identifier_expression(access.name)
    }

    fn class_expression(&mut self, node: NodeIndex, scope: &TypeScope) -> Result<Expression> {
        let arena = self.arena();
        let Some(class) = arena.get_class(node) else {
            return Ok(Expression::opaque());
        };
        let names = class
            .type_parameters
            .iter()
            .filter_map(|&tp| arena.declaration_name_text(tp));
        let scope = scope.extend(TypeParameterOwner::Signature, names);
        let (instance_type, static_type) = self.class_members(&class.members, &scope)?;
        Ok(Expression::Class(Box::new(ClassExpression {
            instance_type,
            static_type,
        })))
    }

    // =========================================================================
    // Decorators
    // =========================================================================

    pub(crate) fn decorators(
        &mut self,
        nodes: &[NodeIndex],
        scope: &TypeScope,
    ) -> Result<Vec<Decorator>> {
        let mut decorators = Vec::with_capacity(nodes.len());
        for &node in nodes {
            decorators.push(self.decorator(node, scope)?);
        }
        Ok(decorators)
    }

    /// `@target` or `@target(args...)`.
    fn decorator(&mut self, node: NodeIndex, scope: &TypeScope) -> Result<Decorator> {
        let arena = self.arena();
        let expression = arena
            .get_decorator(node)
            .map(|dec| dec.expression)
            .unwrap_or(NodeIndex::NONE);

        let (callee, arguments) = match arena.get_call(expression) {
            Some(call) if self.kind(expression) == Some(SyntaxKind::CallExpression) => {
                let mut arguments = Vec::with_capacity(call.arguments.len());
                for &argument in &call.arguments {
                    arguments.push(self.expression(argument, scope)?);
                }
                (call.expression, Some(arguments))
            }
            _ => (expression, None),
        };

        let target = self.decorator_target(callee)?;
        Ok(Decorator { target, arguments })
    }

    fn decorator_target(&mut self, callee: NodeIndex) -> Result<DecoratorTarget> {
        let not_resolved = |state: &Self| SchemaError::DecoratorNotResolved {
            text: state.text(callee),
        };
        let Some(symbol) = self.fe.symbol_at(callee) else {
            return Err(not_resolved(self));
        };
        let symbol = self.fe.aliased_symbol(symbol);
        let declaration = self
            .symbol(symbol)
            .map(|sym| sym.value_declaration)
            .unwrap_or(NodeIndex::NONE);
        match self.kind(declaration) {
            Some(SyntaxKind::ClassDeclaration) => match self.resolve_symbol(symbol, false)? {
                Reference::Constructor(id) => Ok(DecoratorTarget::Class { id }),
                _ => Err(not_resolved(self)),
            },
            Some(
                SyntaxKind::FunctionDeclaration
                | SyntaxKind::VariableDeclaration
                | SyntaxKind::BindingElement,
            ) => Ok(DecoratorTarget::Value {
                id: self.resolve_value(declaration)?,
            }),
            _ => Err(not_resolved(self)),
        }
    }
}

/// Value of a numeric literal as written: `_` separators and `0x`/`0o`/`0b`
/// prefixes are accepted.
fn parse_numeric_literal(text: &str) -> Option<f64> {
    let digits = text.replace('_', "");
    let radix = match digits.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return digits.parse::<f64>().ok(),
    };
    u128::from_str_radix(&digits[2..], radix)
        .ok()
        .map(|value| value as f64)
}

#[cfg(test)]
#[path = "../tests/expressions_tests.rs"]
mod tests;
