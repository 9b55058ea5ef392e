//! The schema type algebra.
//!
//! `SchemaType` is closed: every type occurrence in a resolved program maps
//! onto one of these variants, and anything else is a resolution error.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::expressions::Expression;
use crate::ids::{ConstructorId, ContainerId, EnumId, ValueId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrimitiveKind {
    Any,
    String,
    Number,
    Boolean,
    Void,
    Symbol,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "typeKind", rename_all = "camelCase")]
pub enum SchemaType {
    Primitive {
        kind: PrimitiveKind,
    },
    /// A class, interface, or type-alias constructor closed over its type
    /// arguments.
    Reference(TypeReference),
    Enum {
        id: EnumId,
    },
    TypeParameter(TypeParameterRef),
    Composite(Box<CompositeType>),
    Tuple {
        elements: Vec<SchemaType>,
    },
    Union {
        types: Vec<SchemaType>,
    },
    Intersection {
        types: Vec<SchemaType>,
    },
    Function(Box<FunctionType>),
    /// `typeof X`.
    TypeQuery(Box<TypeQueryTarget>),
}

impl SchemaType {
    pub const fn primitive(kind: PrimitiveKind) -> SchemaType {
        SchemaType::Primitive { kind }
    }

    pub const fn any() -> SchemaType {
        SchemaType::Primitive {
            kind: PrimitiveKind::Any,
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            SchemaType::Primitive { kind } => Some(*kind),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&TypeReference> {
        match self {
            SchemaType::Reference(reference) => Some(reference),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeReference {
    pub constructor: ConstructorId,
    #[serde(default)]
    pub type_arguments: Vec<SchemaType>,
}

/// Where a type parameter was bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "ownerKind", rename_all = "camelCase")]
pub enum TypeParameterOwner {
    Constructor { id: ConstructorId },
    /// Bound by an inline function signature.
    Signature,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeParameterRef {
    pub owner: TypeParameterOwner,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<SchemaType>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexKeyKind {
    String,
    Number,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSignature {
    pub key: IndexKeyKind,
    pub value: SchemaType,
}

/// Inline structural type: members plus optional index, call and construct
/// signatures.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeType {
    #[serde(default)]
    pub members: IndexMap<String, Member>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<IndexSignature>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calls: Vec<FunctionType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructs: Vec<FunctionType>,
}

impl CompositeType {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
            && self.index.is_none()
            && self.calls.is_empty()
            && self.constructs.is_empty()
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(rename = "type")]
    pub ty: SchemaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<Expression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<Decorator>,
}

impl Member {
    pub fn new(ty: SchemaType) -> Member {
        Member {
            optional: false,
            readonly: false,
            ty,
            initializer: None,
            decorators: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionType {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub return_type: SchemaType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub rest: bool,
    #[serde(rename = "type")]
    pub ty: SchemaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<Expression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<Decorator>,
}

/// What a decorator expression resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "targetKind", rename_all = "camelCase")]
pub enum DecoratorTarget {
    Value { id: ValueId },
    Class { id: ConstructorId },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decorator {
    pub target: DecoratorTarget,
    /// `None` for `@dec`, `Some` for `@dec(...)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<Expression>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "queryKind", rename_all = "camelCase")]
pub enum TypeQueryTarget {
    Value { id: ValueId },
    Container { id: ContainerId },
    Constructor { id: ConstructorId },
    Type { target: SchemaType },
    /// The queried name had no declaration.
    Unresolved,
}
