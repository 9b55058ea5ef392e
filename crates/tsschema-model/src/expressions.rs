//! Restricted expression nodes for initializers and decorator arguments.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ids::{ConstructorId, EnumId, ValueId};
use crate::types::{CompositeType, FunctionType, PrimitiveKind};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimitiveValue {
    Boolean(bool),
    Number(f64),
    String(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expressionKind", rename_all = "camelCase")]
pub enum Expression {
    /// A literal, or an opaque `any` expression when `value` is `None`.
    Primitive {
        kind: PrimitiveKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<PrimitiveValue>,
    },
    Value {
        id: ValueId,
    },
    ClassReference {
        id: ConstructorId,
    },
    EnumMember {
        id: EnumId,
        member: String,
    },
    Call {
        function: Box<Expression>,
        #[serde(default)]
        arguments: Vec<Expression>,
    },
    Object {
        properties: IndexMap<String, Expression>,
    },
    Array {
        elements: Vec<Expression>,
    },
    Class(Box<ClassExpression>),
    Function(Box<FunctionType>),
}

impl Expression {
    /// The permissive fallback for shapes outside the modeled subset.
    pub const fn opaque() -> Expression {
        Expression::Primitive {
            kind: PrimitiveKind::Any,
            value: None,
        }
    }

    pub fn string(value: impl Into<String>) -> Expression {
        Expression::Primitive {
            kind: PrimitiveKind::String,
            value: Some(PrimitiveValue::String(value.into())),
        }
    }

    pub const fn number(value: f64) -> Expression {
        Expression::Primitive {
            kind: PrimitiveKind::Number,
            value: Some(PrimitiveValue::Number(value)),
        }
    }

    pub const fn boolean(value: bool) -> Expression {
        Expression::Primitive {
            kind: PrimitiveKind::Boolean,
            value: Some(PrimitiveValue::Boolean(value)),
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(
            self,
            Expression::Primitive {
                kind: PrimitiveKind::Any,
                value: None
            }
        )
    }
}

/// An inline anonymous class.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassExpression {
    pub instance_type: CompositeType,
    pub static_type: CompositeType,
}
