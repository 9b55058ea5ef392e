//! Structural resolution errors.
//!
//! Every variant aborts the whole pass: the input uses a construct the
//! schema algebra cannot represent. Unsupported *expressions* never end up
//! here; they degrade to an opaque `any` expression instead.

use thiserror::Error;
use tsschema_frontend::{SyntaxKind, TypeCategory};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unrecognised declaration kind {kind:?}: {text}")]
    UnrecognisedDeclaration { kind: SyntaxKind, text: String },

    #[error("unrecognised type {category:?}: {text}")]
    UnrecognisedType { category: TypeCategory, text: String },

    #[error("no checked type for {text}")]
    MissingType { text: String },

    #[error("symbol `{name}` has no declaration")]
    MissingDeclaration { name: String },

    #[error("heritage clause `{text}` of `{owner}` does not resolve to a reference")]
    HeritageNotReference { text: String, owner: String },

    #[error("class `{class}` extends {count} types, expected exactly one")]
    InvalidExtends { class: String, count: usize },

    #[error("decorator `{text}` does not resolve to a value or class")]
    DecoratorNotResolved { text: String },

    #[error("type parameter not found: {name}")]
    TypeParameterNotFound { name: String },

    #[error("index signature key `{text}` must be string or number")]
    InvalidIndexKey { text: String },

    #[error("`{text}` resolved to a {found}, expected a {expected}")]
    UnexpectedReference {
        text: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("nesting limit exceeded at {text}")]
    RecursionLimit { text: String },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
