//! Function signatures and type-parameter binding.

use tsschema_frontend::{FrontEnd, NodeIndex};
use tsschema_model::{
    ConstructorId, FunctionType, Parameter, SchemaType, TypeParameter, TypeParameterOwner,
};

use crate::error::Result;
use crate::scope::TypeScope;
use crate::state::ResolverState;

impl<'a, F: FrontEnd + ?Sized> ResolverState<'a, F> {
    /// Signature of any function-like declaration. `decorable` signatures
    /// (class methods and constructors) keep their parameter decorators.
    pub(crate) fn signature(
        &mut self,
        declaration: NodeIndex,
        decorable: bool,
        scope: &TypeScope,
    ) -> Result<FunctionType> {
        let arena = self.arena();
        let Some(function) = arena.get_function(declaration) else {
            return Ok(FunctionType {
                type_parameters: Vec::new(),
                parameters: Vec::new(),
                return_type: SchemaType::any(),
            });
        };

        let names: Vec<String> = function
            .type_parameters
            .iter()
            .filter_map(|&tp| arena.declaration_name_text(tp))
            .collect();
        let scope = scope.extend(TypeParameterOwner::Signature, names.iter().cloned());
        let mut type_parameters = Vec::with_capacity(names.len());
        for (&node, name) in function.type_parameters.iter().zip(names) {
            type_parameters.push(TypeParameter {
                name,
                constraint: self.type_parameter_constraint(node, &scope)?,
            });
        }

        let mut parameters = Vec::with_capacity(function.parameters.len());
        for (index, &parameter) in function.parameters.iter().enumerate() {
            parameters.push(self.parameter(parameter, index, decorable, &scope)?);
        }

        let return_type = if function.type_annotation.is_some() {
            self.materialize_node(function.type_annotation, &scope)?
        } else if let Some(ty) = self.fe.signature_return_type(declaration) {
            self.materialize_type_at(ty, declaration, &scope)?
        } else {
            SchemaType::any()
        };

        Ok(FunctionType {
            type_parameters,
            parameters,
            return_type,
        })
    }

    fn parameter(
        &mut self,
        node: NodeIndex,
        index: usize,
        decorable: bool,
        scope: &TypeScope,
    ) -> Result<Parameter> {
        let arena = self.arena();
        let Some(data) = arena.get_parameter(node) else {
            return Ok(Parameter {
                name: format!("__{index}"),
                optional: false,
                rest: false,
                ty: SchemaType::any(),
                initializer: None,
                decorators: Vec::new(),
            });
        };
        // Destructured parameters have no usable name.
        let name = arena
            .identifier_text(data.name)
            .map(str::to_string)
            .unwrap_or_else(|| format!("__{index}"));
        let ty = self.annotated_type(data.type_annotation, node, scope)?;
        let initializer = self.initializer(data.initializer, scope)?;
        let decorators = if decorable {
            self.decorators(&data.decorators, scope)?
        } else {
            Vec::new()
        };
        Ok(Parameter {
            name,
            optional: data.question_token,
            rest: data.dot_dot_dot_token,
            ty,
            initializer,
            decorators,
        })
    }

    /// Type of a declaration that may carry an annotation: the written type
    /// when present, else whatever the checker inferred, else `any`.
    pub(crate) fn annotated_type(
        &mut self,
        annotation: NodeIndex,
        declaration: NodeIndex,
        scope: &TypeScope,
    ) -> Result<SchemaType> {
        if annotation.is_some() {
            return self.materialize_node(annotation, scope);
        }
        match self.fe.type_at(declaration) {
            Some(ty) => self.materialize_type_at(ty, declaration, scope),
            None => Ok(SchemaType::any()),
        }
    }

    fn type_parameter_constraint(
        &mut self,
        node: NodeIndex,
        scope: &TypeScope,
    ) -> Result<Option<SchemaType>> {
        let constraint = self
            .arena()
            .get_type_parameter(node)
            .map(|tp| tp.constraint)
            .unwrap_or(NodeIndex::NONE);
        if constraint.is_none() {
            return Ok(None);
        }
        self.materialize_node(constraint, scope).map(Some)
    }

    /// Bind the type parameters of a class, interface or alias declaration
    /// and merge them into the constructor. Parameters already recorded are
    /// matched by position; constraints fill in only where still missing.
    pub(crate) fn constructor_scope(
        &mut self,
        constructor: ConstructorId,
        nodes: &[NodeIndex],
    ) -> Result<TypeScope> {
        let arena = self.arena();
        let names: Vec<String> = nodes
            .iter()
            .filter_map(|&tp| arena.declaration_name_text(tp))
            .collect();
        let scope = TypeScope::new().extend(
            TypeParameterOwner::Constructor { id: constructor },
            names.iter().cloned(),
        );

        for (index, (&node, name)) in nodes.iter().zip(names).enumerate() {
            let constraint = self.type_parameter_constraint(node, &scope)?;
            let existing = &mut self
                .registry
                .schema_mut()
                .constructor_mut(constructor)
                .type_parameters;
            match existing.get_mut(index) {
                Some(param) => {
                    if param.constraint.is_none() {
                        param.constraint = constraint;
                    }
                }
                None => existing.push(TypeParameter { name, constraint }),
            }
        }
        Ok(scope)
    }
}

#[cfg(test)]
#[path = "../tests/signatures_tests.rs"]
mod tests;
