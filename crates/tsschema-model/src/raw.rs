//! Flattened, string-reference interchange form.
//!
//! Every reference is rendered as `{ kind, module, path }` so the form can
//! be persisted and filtered without the arena. `Schema::to_raw` flattens a
//! linked schema; `RawSchema::to_schema` rebuilds a linked graph, creating
//! stubs for references that point outside the raw modules.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::containers::{ConstructorKind, EnumMember, Reference, ValueKind};
use crate::expressions::{ClassExpression, Expression, PrimitiveValue};
use crate::ids::{ConstructorId, ContainerId};
use crate::schema::Schema;
use crate::types::{
    CompositeType, Decorator, DecoratorTarget, FunctionType, IndexKeyKind, IndexSignature, Member,
    Parameter, PrimitiveKind, SchemaType, TypeParameter, TypeParameterOwner, TypeParameterRef,
    TypeQueryTarget, TypeReference,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RawSchemaError {
    #[error("reference to {kind:?} in module '{module}' has an empty path")]
    EmptyPath { kind: RawRefKind, module: String },
    #[error("expected a {expected} reference, found {found:?} '{name}'")]
    WrongReferenceKind {
        expected: &'static str,
        found: RawRefKind,
        name: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawRefKind {
    Container,
    Class,
    Interface,
    TypeAlias,
    Enum,
    Value,
}

/// `path` holds namespace names then, for entries, the entry name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRef {
    pub kind: RawRefKind,
    pub module: String,
    #[serde(default)]
    pub path: Vec<String>,
}

impl RawRef {
    fn display_name(&self) -> String {
        let mut name = self.module.clone();
        for segment in &self.path {
            name.push(':');
            name.push_str(segment);
        }
        name
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "typeKind", rename_all = "camelCase")]
pub enum RawType {
    Primitive {
        kind: PrimitiveKind,
    },
    Reference {
        target: RawRef,
        #[serde(default)]
        type_arguments: Vec<RawType>,
    },
    Enum {
        target: RawRef,
    },
    TypeParameter {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        owner: Option<RawRef>,
        name: String,
    },
    Composite(Box<RawComposite>),
    Tuple {
        elements: Vec<RawType>,
    },
    Union {
        types: Vec<RawType>,
    },
    Intersection {
        types: Vec<RawType>,
    },
    Function(Box<RawFunction>),
    TypeQuery {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reference: Option<RawRef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<Box<RawType>>,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComposite {
    #[serde(default)]
    pub members: IndexMap<String, RawMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<RawIndex>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calls: Vec<RawFunction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructs: Vec<RawFunction>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIndex {
    pub key: IndexKeyKind,
    pub value: RawType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMember {
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(rename = "type")]
    pub ty: RawType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<RawExpression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<RawDecorator>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFunction {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<RawTypeParameter>,
    #[serde(default)]
    pub parameters: Vec<RawParameter>,
    pub return_type: RawType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawParameter {
    pub name: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub rest: bool,
    #[serde(rename = "type")]
    pub ty: RawType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<RawExpression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<RawDecorator>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTypeParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<RawType>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDecorator {
    pub target: RawRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<RawExpression>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expressionKind", rename_all = "camelCase")]
pub enum RawExpression {
    Primitive {
        kind: PrimitiveKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<PrimitiveValue>,
    },
    Value {
        target: RawRef,
    },
    ClassReference {
        target: RawRef,
    },
    EnumMember {
        target: RawRef,
        member: String,
    },
    Call {
        function: Box<RawExpression>,
        #[serde(default)]
        arguments: Vec<RawExpression>,
    },
    Object {
        properties: IndexMap<String, RawExpression>,
    },
    Array {
        elements: Vec<RawExpression>,
    },
    Class {
        instance_type: RawComposite,
        static_type: RawComposite,
    },
    Function(Box<RawFunction>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConstructor {
    #[serde(default)]
    pub type_parameters: Vec<RawTypeParameter>,
    #[serde(default)]
    pub instance_type: RawComposite,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_type: Option<RawComposite>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<RawType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<RawType>,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<RawDecorator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliased_type: Option<RawType>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnum {
    #[serde(default)]
    pub members: IndexMap<String, Option<RawExpression>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_kind: Option<ValueKind>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<RawType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<RawExpression>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContainer {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub class_constructors: IndexMap<String, RawConstructor>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub interface_constructors: IndexMap<String, RawConstructor>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub type_alias_constructors: IndexMap<String, RawConstructor>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub enums: IndexMap<String, RawEnum>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub values: IndexMap<String, RawValue>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub namespaces: IndexMap<String, RawContainer>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub reexports: IndexMap<String, RawRef>,
}

impl RawContainer {
    fn constructors(&self, kind: ConstructorKind) -> &IndexMap<String, RawConstructor> {
        match kind {
            ConstructorKind::Class => &self.class_constructors,
            ConstructorKind::Interface => &self.interface_constructors,
            ConstructorKind::TypeAlias => &self.type_alias_constructors,
        }
    }

    fn constructors_mut(&mut self, kind: ConstructorKind) -> &mut IndexMap<String, RawConstructor> {
        match kind {
            ConstructorKind::Class => &mut self.class_constructors,
            ConstructorKind::Interface => &mut self.interface_constructors,
            ConstructorKind::TypeAlias => &mut self.type_alias_constructors,
        }
    }
}

const CONSTRUCTOR_KINDS: [ConstructorKind; 3] = [
    ConstructorKind::Class,
    ConstructorKind::Interface,
    ConstructorKind::TypeAlias,
];

/// Canonical module name -> raw container.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSchema {
    pub modules: IndexMap<String, RawContainer>,
}

impl RawSchema {
    /// Keep only the modules whose canonical name satisfies `predicate`.
    pub fn filter_modules(mut self, mut predicate: impl FnMut(&str) -> bool) -> RawSchema {
        self.modules.retain(|name, _| predicate(name));
        self
    }

    /// Keep modules whose name starts with any of `prefixes`.
    pub fn retain_prefixes<S: AsRef<str>>(self, prefixes: &[S]) -> RawSchema {
        self.filter_modules(|name| {
            prefixes
                .iter()
                .any(|prefix| name.starts_with(prefix.as_ref()))
        })
    }

    /// Rebuild a linked `Schema`.
    pub fn to_schema(&self) -> Result<Schema, RawSchemaError> {
        let mut linker = RawLinker {
            schema: Schema::new(),
        };
        let mut roots = Vec::with_capacity(self.modules.len());
        for (name, raw) in &self.modules {
            let (id, _) = linker.schema.ensure_module(name);
            linker.declare(id, raw);
            roots.push((id, raw));
        }
        for (id, raw) in roots {
            linker.fill(id, raw)?;
        }
        Ok(linker.schema)
    }
}

// =============================================================================
// Linked -> raw
// =============================================================================

impl Schema {
    /// Flatten into the string-reference form.
    pub fn to_raw(&self) -> RawSchema {
        let writer = RawWriter { schema: self };
        let modules = self
            .modules()
            .map(|(name, id)| (name.to_string(), writer.container(id)))
            .collect();
        RawSchema { modules }
    }

    /// Rebuild a linked graph from the string-reference form.
    pub fn from_raw(raw: &RawSchema) -> Result<Schema, RawSchemaError> {
        raw.to_schema()
    }
}

struct RawWriter<'s> {
    schema: &'s Schema,
}

impl RawWriter<'_> {
    fn container(&self, id: ContainerId) -> RawContainer {
        let container = self.schema.container(id);
        let mut raw = RawContainer::default();
        for kind in CONSTRUCTOR_KINDS {
            for (name, &ctor) in container.constructors(kind) {
                raw.constructors_mut(kind)
                    .insert(name.clone(), self.constructor(ctor));
            }
        }
        for (name, &enum_id) in &container.enums {
            let members = self
                .schema
                .enum_def(enum_id)
                .members
                .iter()
                .map(|(member, def)| {
                    (
                        member.clone(),
                        def.initializer.as_ref().map(|e| self.expression(e)),
                    )
                })
                .collect();
            raw.enums.insert(name.clone(), RawEnum { members });
        }
        for (name, &value_id) in &container.values {
            let value = self.schema.value(value_id);
            raw.values.insert(
                name.clone(),
                RawValue {
                    value_kind: value.value_kind,
                    ty: value.ty.as_ref().map(|t| self.ty(t)),
                    initializer: value.initializer.as_ref().map(|e| self.expression(e)),
                },
            );
        }
        for (name, &ns) in &container.namespaces {
            raw.namespaces.insert(name.clone(), self.container(ns));
        }
        for (name, &reference) in &container.reexports {
            raw.reexports.insert(name.clone(), self.reference(reference));
        }
        raw
    }

    fn constructor(&self, id: ConstructorId) -> RawConstructor {
        let ctor = self.schema.constructor(id);
        RawConstructor {
            type_parameters: self.type_parameters(&ctor.type_parameters),
            instance_type: self.composite(&ctor.instance_type),
            static_type: ctor.static_type.as_ref().map(|s| self.composite(s)),
            extends: ctor.extends.iter().map(|t| self.ty(t)).collect(),
            implements: ctor.implements.iter().map(|t| self.ty(t)).collect(),
            is_abstract: ctor.is_abstract,
            decorators: self.decorators(&ctor.decorators),
            aliased_type: ctor.aliased_type.as_ref().map(|t| self.ty(t)),
        }
    }

    fn reference(&self, reference: Reference) -> RawRef {
        match reference {
            Reference::Container(id) => {
                let (module, path) = self.schema.container_path(id);
                RawRef {
                    kind: RawRefKind::Container,
                    module,
                    path,
                }
            }
            Reference::Constructor(id) => {
                let ctor = self.schema.constructor(id);
                let kind = match ctor.kind {
                    ConstructorKind::Class => RawRefKind::Class,
                    ConstructorKind::Interface => RawRefKind::Interface,
                    ConstructorKind::TypeAlias => RawRefKind::TypeAlias,
                };
                self.entry_ref(kind, ctor.container, &ctor.name)
            }
            Reference::Enum(id) => {
                let def = self.schema.enum_def(id);
                self.entry_ref(RawRefKind::Enum, def.container, &def.name)
            }
            Reference::Value(id) => {
                let def = self.schema.value(id);
                self.entry_ref(RawRefKind::Value, def.container, &def.name)
            }
        }
    }

    fn entry_ref(&self, kind: RawRefKind, container: ContainerId, name: &str) -> RawRef {
        let (module, mut path) = self.schema.container_path(container);
        path.push(name.to_string());
        RawRef { kind, module, path }
    }

    fn ty(&self, ty: &SchemaType) -> RawType {
        match ty {
            SchemaType::Primitive { kind } => RawType::Primitive { kind: *kind },
            SchemaType::Reference(reference) => RawType::Reference {
                target: self.reference(Reference::Constructor(reference.constructor)),
                type_arguments: reference.type_arguments.iter().map(|t| self.ty(t)).collect(),
            },
            SchemaType::Enum { id } => RawType::Enum {
                target: self.reference(Reference::Enum(*id)),
            },
            SchemaType::TypeParameter(tp) => RawType::TypeParameter {
                owner: match tp.owner {
                    TypeParameterOwner::Constructor { id } => {
                        Some(self.reference(Reference::Constructor(id)))
                    }
                    TypeParameterOwner::Signature => None,
                },
                name: tp.name.clone(),
            },
            SchemaType::Composite(composite) => {
                RawType::Composite(Box::new(self.composite(composite)))
            }
            SchemaType::Tuple { elements } => RawType::Tuple {
                elements: elements.iter().map(|t| self.ty(t)).collect(),
            },
            SchemaType::Union { types } => RawType::Union {
                types: types.iter().map(|t| self.ty(t)).collect(),
            },
            SchemaType::Intersection { types } => RawType::Intersection {
                types: types.iter().map(|t| self.ty(t)).collect(),
            },
            SchemaType::Function(function) => RawType::Function(Box::new(self.function(function))),
            SchemaType::TypeQuery(query) => match query.as_ref() {
                TypeQueryTarget::Value { id } => RawType::TypeQuery {
                    reference: Some(self.reference(Reference::Value(*id))),
                    target: None,
                },
                TypeQueryTarget::Container { id } => RawType::TypeQuery {
                    reference: Some(self.reference(Reference::Container(*id))),
                    target: None,
                },
                TypeQueryTarget::Constructor { id } => RawType::TypeQuery {
                    reference: Some(self.reference(Reference::Constructor(*id))),
                    target: None,
                },
                TypeQueryTarget::Type { target } => RawType::TypeQuery {
                    reference: None,
                    target: Some(Box::new(self.ty(target))),
                },
                TypeQueryTarget::Unresolved => RawType::TypeQuery {
                    reference: None,
                    target: None,
                },
            },
        }
    }

    fn composite(&self, composite: &CompositeType) -> RawComposite {
        RawComposite {
            members: composite
                .members
                .iter()
                .map(|(name, member)| {
                    (
                        name.clone(),
                        RawMember {
                            optional: member.optional,
                            readonly: member.readonly,
                            ty: self.ty(&member.ty),
                            initializer: member.initializer.as_ref().map(|e| self.expression(e)),
                            decorators: self.decorators(&member.decorators),
                        },
                    )
                })
                .collect(),
            index: composite.index.as_ref().map(|index| RawIndex {
                key: index.key,
                value: self.ty(&index.value),
            }),
            calls: composite.calls.iter().map(|f| self.function(f)).collect(),
            constructs: composite.constructs.iter().map(|f| self.function(f)).collect(),
        }
    }

    fn function(&self, function: &FunctionType) -> RawFunction {
        RawFunction {
            type_parameters: self.type_parameters(&function.type_parameters),
            parameters: function
                .parameters
                .iter()
                .map(|p| RawParameter {
                    name: p.name.clone(),
                    optional: p.optional,
                    rest: p.rest,
                    ty: self.ty(&p.ty),
                    initializer: p.initializer.as_ref().map(|e| self.expression(e)),
                    decorators: self.decorators(&p.decorators),
                })
                .collect(),
            return_type: self.ty(&function.return_type),
        }
    }

    fn type_parameters(&self, params: &[TypeParameter]) -> Vec<RawTypeParameter> {
        params
            .iter()
            .map(|tp| RawTypeParameter {
                name: tp.name.clone(),
                constraint: tp.constraint.as_ref().map(|c| self.ty(c)),
            })
            .collect()
    }

    fn decorators(&self, decorators: &[Decorator]) -> Vec<RawDecorator> {
        decorators
            .iter()
            .map(|d| RawDecorator {
                target: match d.target {
                    DecoratorTarget::Value { id } => self.reference(Reference::Value(id)),
                    DecoratorTarget::Class { id } => self.reference(Reference::Constructor(id)),
                },
                arguments: d
                    .arguments
                    .as_ref()
                    .map(|args| args.iter().map(|a| self.expression(a)).collect()),
            })
            .collect()
    }

    fn expression(&self, expression: &Expression) -> RawExpression {
        match expression {
            Expression::Primitive { kind, value } => RawExpression::Primitive {
                kind: *kind,
                value: value.clone(),
            },
            Expression::Value { id } => RawExpression::Value {
                target: self.reference(Reference::Value(*id)),
            },
            Expression::ClassReference { id } => RawExpression::ClassReference {
                target: self.reference(Reference::Constructor(*id)),
            },
            Expression::EnumMember { id, member } => RawExpression::EnumMember {
                target: self.reference(Reference::Enum(*id)),
                member: member.clone(),
            },
            Expression::Call {
                function,
                arguments,
            } => RawExpression::Call {
                function: Box::new(self.expression(function)),
                arguments: arguments.iter().map(|a| self.expression(a)).collect(),
            },
            Expression::Object { properties } => RawExpression::Object {
                properties: properties
                    .iter()
                    .map(|(k, v)| (k.clone(), self.expression(v)))
                    .collect(),
            },
            Expression::Array { elements } => RawExpression::Array {
                elements: elements.iter().map(|e| self.expression(e)).collect(),
            },
            Expression::Class(class) => RawExpression::Class {
                instance_type: self.composite(&class.instance_type),
                static_type: self.composite(&class.static_type),
            },
            Expression::Function(function) => {
                RawExpression::Function(Box::new(self.function(function)))
            }
        }
    }
}

// =============================================================================
// Raw -> linked
// =============================================================================

struct RawLinker {
    schema: Schema,
}

impl RawLinker {
    /// Create every entry and nested namespace so that declaration order in
    /// the raw form is the order in the linked form.
    fn declare(&mut self, id: ContainerId, raw: &RawContainer) {
        for kind in CONSTRUCTOR_KINDS {
            for name in raw.constructors(kind).keys() {
                self.schema.ensure_constructor(id, kind, name);
            }
        }
        for name in raw.enums.keys() {
            self.schema.ensure_enum(id, name);
        }
        for name in raw.values.keys() {
            self.schema.ensure_value(id, name);
        }
        for (name, nested) in &raw.namespaces {
            let (ns, _) = self.schema.ensure_namespace(id, name);
            self.declare(ns, nested);
        }
    }

    fn fill(&mut self, id: ContainerId, raw: &RawContainer) -> Result<(), RawSchemaError> {
        for kind in CONSTRUCTOR_KINDS {
            for (name, raw_ctor) in raw.constructors(kind) {
                let (ctor, _) = self.schema.ensure_constructor(id, kind, name);
                self.fill_constructor(ctor, raw_ctor)?;
            }
        }
        for (name, raw_enum) in &raw.enums {
            let (enum_id, _) = self.schema.ensure_enum(id, name);
            for (member, initializer) in &raw_enum.members {
                let initializer = match initializer {
                    Some(e) => Some(self.expression(e)?),
                    None => None,
                };
                self.schema
                    .enum_def_mut(enum_id)
                    .members
                    .insert(member.clone(), EnumMember { initializer });
            }
        }
        for (name, raw_value) in &raw.values {
            let (value_id, _) = self.schema.ensure_value(id, name);
            let ty = match &raw_value.ty {
                Some(t) => Some(self.ty(t)?),
                None => None,
            };
            let initializer = match &raw_value.initializer {
                Some(e) => Some(self.expression(e)?),
                None => None,
            };
            let value = self.schema.value_mut(value_id);
            value.value_kind = raw_value.value_kind;
            value.ty = ty;
            value.initializer = initializer;
        }
        for (name, nested) in &raw.namespaces {
            let (ns, _) = self.schema.ensure_namespace(id, name);
            self.fill(ns, nested)?;
        }
        for (name, target) in &raw.reexports {
            let reference = self.resolve(target)?;
            self.schema.add_reexport(id, name, reference);
        }
        Ok(())
    }

    fn fill_constructor(
        &mut self,
        ctor: ConstructorId,
        raw: &RawConstructor,
    ) -> Result<(), RawSchemaError> {
        let type_parameters = self.type_parameters(&raw.type_parameters)?;
        let instance_type = self.composite(&raw.instance_type)?;
        let static_type = match &raw.static_type {
            Some(s) => Some(self.composite(s)?),
            None => None,
        };
        let extends = self.types(&raw.extends)?;
        let implements = self.types(&raw.implements)?;
        let decorators = self.decorators(&raw.decorators)?;
        let aliased_type = match &raw.aliased_type {
            Some(t) => Some(self.ty(t)?),
            None => None,
        };

        let target = self.schema.constructor_mut(ctor);
        target.type_parameters = type_parameters;
        target.instance_type = instance_type;
        if static_type.is_some() {
            target.static_type = static_type;
        }
        target.extends = extends;
        target.implements = implements;
        target.is_abstract = raw.is_abstract;
        target.decorators = decorators;
        target.aliased_type = aliased_type;
        Ok(())
    }

    fn container_at(&mut self, module: &str, namespaces: &[String]) -> ContainerId {
        let (mut id, created) = self.schema.ensure_module(module);
        if created {
            trace!(module, "raw reference created external module");
        }
        for name in namespaces {
            id = self.schema.ensure_namespace(id, name).0;
        }
        id
    }

    fn resolve(&mut self, raw: &RawRef) -> Result<Reference, RawSchemaError> {
        if raw.kind == RawRefKind::Container {
            return Ok(Reference::Container(
                self.container_at(&raw.module, &raw.path),
            ));
        }
        let Some((name, namespaces)) = raw.path.split_last() else {
            return Err(RawSchemaError::EmptyPath {
                kind: raw.kind,
                module: raw.module.clone(),
            });
        };
        let container = self.container_at(&raw.module, namespaces);
        Ok(match raw.kind {
            RawRefKind::Class => Reference::Constructor(
                self.schema
                    .ensure_constructor(container, ConstructorKind::Class, name)
                    .0,
            ),
            RawRefKind::Interface => Reference::Constructor(
                self.schema
                    .ensure_constructor(container, ConstructorKind::Interface, name)
                    .0,
            ),
            RawRefKind::TypeAlias => Reference::Constructor(
                self.schema
                    .ensure_constructor(container, ConstructorKind::TypeAlias, name)
                    .0,
            ),
            RawRefKind::Enum => Reference::Enum(self.schema.ensure_enum(container, name).0),
            RawRefKind::Value => Reference::Value(self.schema.ensure_value(container, name).0),
            RawRefKind::Container => Reference::Container(container),
        })
    }

    fn resolve_constructor(&mut self, raw: &RawRef) -> Result<ConstructorId, RawSchemaError> {
        match self.resolve(raw)? {
            Reference::Constructor(id) => Ok(id),
            _ => Err(self.wrong_kind("constructor", raw)),
        }
    }

    fn wrong_kind(&self, expected: &'static str, raw: &RawRef) -> RawSchemaError {
        RawSchemaError::WrongReferenceKind {
            expected,
            found: raw.kind,
            name: raw.display_name(),
        }
    }

    fn types(&mut self, types: &[RawType]) -> Result<Vec<SchemaType>, RawSchemaError> {
        types.iter().map(|t| self.ty(t)).collect()
    }

    fn ty(&mut self, raw: &RawType) -> Result<SchemaType, RawSchemaError> {
        Ok(match raw {
            RawType::Primitive { kind } => SchemaType::primitive(*kind),
            RawType::Reference {
                target,
                type_arguments,
            } => {
                let constructor = self.resolve_constructor(target)?;
                SchemaType::Reference(TypeReference {
                    constructor,
                    type_arguments: self.types(type_arguments)?,
                })
            }
            RawType::Enum { target } => match self.resolve(target)? {
                Reference::Enum(id) => SchemaType::Enum { id },
                _ => return Err(self.wrong_kind("enum", target)),
            },
            RawType::TypeParameter { owner, name } => {
                let owner = match owner {
                    Some(owner) => TypeParameterOwner::Constructor {
                        id: self.resolve_constructor(owner)?,
                    },
                    None => TypeParameterOwner::Signature,
                };
                SchemaType::TypeParameter(TypeParameterRef {
                    owner,
                    name: name.clone(),
                })
            }
            RawType::Composite(composite) => {
                SchemaType::Composite(Box::new(self.composite(composite)?))
            }
            RawType::Tuple { elements } => SchemaType::Tuple {
                elements: self.types(elements)?,
            },
            RawType::Union { types } => SchemaType::Union {
                types: self.types(types)?,
            },
            RawType::Intersection { types } => SchemaType::Intersection {
                types: self.types(types)?,
            },
            RawType::Function(function) => SchemaType::Function(Box::new(self.function(function)?)),
            RawType::TypeQuery { reference, target } => {
                let query = match (reference, target) {
                    (Some(reference), _) => match self.resolve(reference)? {
                        Reference::Value(id) => TypeQueryTarget::Value { id },
                        Reference::Container(id) => TypeQueryTarget::Container { id },
                        Reference::Constructor(id) => TypeQueryTarget::Constructor { id },
                        Reference::Enum(id) => TypeQueryTarget::Type {
                            target: SchemaType::Enum { id },
                        },
                    },
                    (None, Some(target)) => TypeQueryTarget::Type {
                        target: self.ty(target)?,
                    },
                    (None, None) => TypeQueryTarget::Unresolved,
                };
                SchemaType::TypeQuery(Box::new(query))
            }
        })
    }

    fn composite(&mut self, raw: &RawComposite) -> Result<CompositeType, RawSchemaError> {
        let mut composite = CompositeType::default();
        for (name, member) in &raw.members {
            let ty = self.ty(&member.ty)?;
            let initializer = match &member.initializer {
                Some(e) => Some(self.expression(e)?),
                None => None,
            };
            composite.members.insert(
                name.clone(),
                Member {
                    optional: member.optional,
                    readonly: member.readonly,
                    ty,
                    initializer,
                    decorators: self.decorators(&member.decorators)?,
                },
            );
        }
        if let Some(index) = &raw.index {
            composite.index = Some(IndexSignature {
                key: index.key,
                value: self.ty(&index.value)?,
            });
        }
        for call in &raw.calls {
            composite.calls.push(self.function(call)?);
        }
        for construct in &raw.constructs {
            composite.constructs.push(self.function(construct)?);
        }
        Ok(composite)
    }

    fn function(&mut self, raw: &RawFunction) -> Result<FunctionType, RawSchemaError> {
        let type_parameters = self.type_parameters(&raw.type_parameters)?;
        let mut parameters = Vec::with_capacity(raw.parameters.len());
        for p in &raw.parameters {
            let initializer = match &p.initializer {
                Some(e) => Some(self.expression(e)?),
                None => None,
            };
            parameters.push(Parameter {
                name: p.name.clone(),
                optional: p.optional,
                rest: p.rest,
                ty: self.ty(&p.ty)?,
                initializer,
                decorators: self.decorators(&p.decorators)?,
            });
        }
        Ok(FunctionType {
            type_parameters,
            parameters,
            return_type: self.ty(&raw.return_type)?,
        })
    }

    fn type_parameters(
        &mut self,
        raw: &[RawTypeParameter],
    ) -> Result<Vec<TypeParameter>, RawSchemaError> {
        let mut out = Vec::with_capacity(raw.len());
        for tp in raw {
            let constraint = match &tp.constraint {
                Some(c) => Some(self.ty(c)?),
                None => None,
            };
            out.push(TypeParameter {
                name: tp.name.clone(),
                constraint,
            });
        }
        Ok(out)
    }

    fn decorators(&mut self, raw: &[RawDecorator]) -> Result<Vec<Decorator>, RawSchemaError> {
        let mut out = Vec::with_capacity(raw.len());
        for d in raw {
            let target = match self.resolve(&d.target)? {
                Reference::Value(id) => DecoratorTarget::Value { id },
                Reference::Constructor(id) => DecoratorTarget::Class { id },
                _ => return Err(self.wrong_kind("decorator", &d.target)),
            };
            let arguments = match &d.arguments {
                Some(args) => Some(
                    args.iter()
                        .map(|a| self.expression(a))
                        .collect::<Result<Vec<_>, _>>()?,
                ),
                None => None,
            };
            out.push(Decorator { target, arguments });
        }
        Ok(out)
    }

    fn expression(&mut self, raw: &RawExpression) -> Result<Expression, RawSchemaError> {
        Ok(match raw {
            RawExpression::Primitive { kind, value } => Expression::Primitive {
                kind: *kind,
                value: value.clone(),
            },
            RawExpression::Value { target } => match self.resolve(target)? {
                Reference::Value(id) => Expression::Value { id },
                _ => return Err(self.wrong_kind("value", target)),
            },
            RawExpression::ClassReference { target } => Expression::ClassReference {
                id: self.resolve_constructor(target)?,
            },
            RawExpression::EnumMember { target, member } => match self.resolve(target)? {
                Reference::Enum(id) => Expression::EnumMember {
                    id,
                    member: member.clone(),
                },
                _ => return Err(self.wrong_kind("enum", target)),
            },
            RawExpression::Call {
                function,
                arguments,
            } => Expression::Call {
                function: Box::new(self.expression(function)?),
                arguments: arguments
                    .iter()
                    .map(|a| self.expression(a))
                    .collect::<Result<Vec<_>, _>>()?,
            },
            RawExpression::Object { properties } => {
                let mut out = IndexMap::new();
                for (name, value) in properties {
                    out.insert(name.clone(), self.expression(value)?);
                }
                Expression::Object { properties: out }
            }
            RawExpression::Array { elements } => Expression::Array {
                elements: elements
                    .iter()
                    .map(|e| self.expression(e))
                    .collect::<Result<Vec<_>, _>>()?,
            },
            RawExpression::Class {
                instance_type,
                static_type,
            } => Expression::Class(Box::new(ClassExpression {
                instance_type: self.composite(instance_type)?,
                static_type: self.composite(static_type)?,
            })),
            RawExpression::Function(function) => {
                Expression::Function(Box::new(self.function(function)?))
            }
        })
    }
}

#[cfg(test)]
#[path = "../tests/raw_tests.rs"]
mod tests;
