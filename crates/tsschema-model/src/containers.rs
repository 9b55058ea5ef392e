//! Containers (modules and namespaces) and the entries they hold.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::expressions::Expression;
use crate::ids::{ConstructorId, ContainerId, EnumId, ValueId};
use crate::types::{CompositeType, Decorator, SchemaType, TypeParameter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerKind {
    Module,
    Namespace,
}

/// A module or namespace scope.
///
/// Entry maps are keyed by local name. `reexports` holds names that this
/// container exports but whose declarations live elsewhere.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub kind: ContainerKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ContainerId>,
    #[serde(default)]
    pub class_constructors: IndexMap<String, ConstructorId>,
    #[serde(default)]
    pub interface_constructors: IndexMap<String, ConstructorId>,
    #[serde(default)]
    pub type_alias_constructors: IndexMap<String, ConstructorId>,
    #[serde(default)]
    pub enums: IndexMap<String, EnumId>,
    #[serde(default)]
    pub values: IndexMap<String, ValueId>,
    #[serde(default)]
    pub namespaces: IndexMap<String, ContainerId>,
    #[serde(default)]
    pub reexports: IndexMap<String, Reference>,
}

impl Container {
    pub fn new(kind: ContainerKind, name: impl Into<String>, parent: Option<ContainerId>) -> Self {
        Container {
            kind,
            name: name.into(),
            parent,
            class_constructors: IndexMap::new(),
            interface_constructors: IndexMap::new(),
            type_alias_constructors: IndexMap::new(),
            enums: IndexMap::new(),
            values: IndexMap::new(),
            namespaces: IndexMap::new(),
            reexports: IndexMap::new(),
        }
    }

    pub fn constructors(&self, kind: ConstructorKind) -> &IndexMap<String, ConstructorId> {
        match kind {
            ConstructorKind::Class => &self.class_constructors,
            ConstructorKind::Interface => &self.interface_constructors,
            ConstructorKind::TypeAlias => &self.type_alias_constructors,
        }
    }

    pub fn constructors_mut(
        &mut self,
        kind: ConstructorKind,
    ) -> &mut IndexMap<String, ConstructorId> {
        match kind {
            ConstructorKind::Class => &mut self.class_constructors,
            ConstructorKind::Interface => &mut self.interface_constructors,
            ConstructorKind::TypeAlias => &mut self.type_alias_constructors,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.class_constructors.is_empty()
            && self.interface_constructors.is_empty()
            && self.type_alias_constructors.is_empty()
            && self.enums.is_empty()
            && self.values.is_empty()
            && self.namespaces.is_empty()
            && self.reexports.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstructorKind {
    Class,
    Interface,
    TypeAlias,
}

/// Schema node for a class, interface, or type alias.
///
/// Created empty as a stub, then populated in place. Type parameter names
/// are recorded at creation so that references closed before population
/// still get one argument per parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeConstructor {
    pub kind: ConstructorKind,
    pub name: String,
    pub container: ContainerId,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(default)]
    pub instance_type: CompositeType,
    /// Classes only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_type: Option<CompositeType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<SchemaType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<SchemaType>,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<Decorator>,
    /// Type aliases only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliased_type: Option<SchemaType>,
}

impl TypeConstructor {
    pub fn new(kind: ConstructorKind, name: impl Into<String>, container: ContainerId) -> Self {
        TypeConstructor {
            kind,
            name: name.into(),
            container,
            type_parameters: Vec::new(),
            instance_type: CompositeType::default(),
            static_type: match kind {
                ConstructorKind::Class => Some(CompositeType::default()),
                _ => None,
            },
            extends: Vec::new(),
            implements: Vec::new(),
            is_abstract: false,
            decorators: Vec::new(),
            aliased_type: None,
        }
    }

    pub fn type_parameter(&self, name: &str) -> Option<&TypeParameter> {
        self.type_parameters.iter().find(|tp| tp.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDef {
    pub name: String,
    pub container: ContainerId,
    #[serde(default)]
    pub members: IndexMap<String, EnumMember>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumMember {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<Expression>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    Function,
    Const,
    Let,
    Var,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueDef {
    pub name: String,
    pub container: ContainerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_kind: Option<ValueKind>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<SchemaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<Expression>,
}

/// A resolved pointer into the schema graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "referenceKind", content = "id", rename_all = "camelCase")]
pub enum Reference {
    Container(ContainerId),
    Constructor(ConstructorId),
    Enum(EnumId),
    Value(ValueId),
}
