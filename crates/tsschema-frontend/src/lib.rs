//! Front-end contract for the tsschema resolver.
//!
//! The resolver never parses or type-checks; it reads a program that some
//! front-end already bound and checked. This crate defines what it reads:
//! - Syntax nodes in a flat arena (`NodeArena`, `Node`, `SyntaxKind`)
//! - Symbols and symbol tables (`Symbol`, `symbol_flags`)
//! - Checked types (`CheckedType`, `TypeCategory`)
//! - The oracle trait tying them together (`FrontEnd`)
//!
//! `Program` and `ProgramBuilder` provide an in-memory front-end used by
//! tests, benches and embedders that produce their own tables.

pub mod base;
pub use base::{CheckedTypeId, NodeIndex, SymbolId};

pub mod syntax_kind;
pub use syntax_kind::SyntaxKind;

pub mod node;
pub use node::{ModifierFlags, Node, NodeData, node_flags};

pub mod node_arena;
pub use node_arena::NodeArena;

pub mod symbols;
pub use symbols::{Symbol, SymbolArena, SymbolTable, symbol_flags};

pub mod checked_types;
pub use checked_types::{CheckedType, TypeCategory};

// Oracle queries consumed by the resolver
pub mod oracle;
pub use oracle::FrontEnd;

// In-memory front-end
pub mod program;
pub use program::Program;

pub mod builder;
pub use builder::{
    ClassParts, EXPORT_EQUALS_SYMBOL, EXPORT_STAR_SYMBOL, ParameterSpec, ProgramBuilder,
    PropertySpec, SignatureParts,
};
