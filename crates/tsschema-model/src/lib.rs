//! Schema model for tsschema.
//!
//! - Type algebra (`SchemaType`, `CompositeType`, `FunctionType`, ...)
//! - Restricted expressions for initializers and decorator arguments
//! - Containers (modules and namespaces) and their entries
//! - The `Schema` arena that owns one resolution pass
//! - The flattened string-reference form (`RawSchema`)

pub mod ids;
pub use ids::{ConstructorId, ContainerId, EnumId, ValueId};

pub mod types;
pub use types::{
    CompositeType, Decorator, DecoratorTarget, FunctionType, IndexKeyKind, IndexSignature, Member,
    Parameter, PrimitiveKind, SchemaType, TypeParameter, TypeParameterOwner, TypeParameterRef,
    TypeQueryTarget, TypeReference,
};

pub mod expressions;
pub use expressions::{ClassExpression, Expression, PrimitiveValue};

pub mod containers;
pub use containers::{
    ConstructorKind, Container, ContainerKind, EnumDef, EnumMember, Reference, TypeConstructor,
    ValueDef, ValueKind,
};

pub mod schema;
pub use schema::Schema;

pub mod raw;
pub use raw::{RawContainer, RawRef, RawRefKind, RawSchema, RawSchemaError, RawType};
