//! Schema resolution engine.
//!
//! Turns a bound, type-checked program (any `FrontEnd`) into a `Schema`:
//! every exported declaration is placed in its canonical container, and
//! every type occurrence becomes a `SchemaType` whose named parts point at
//! shared stubs.
//!
//! The pass is split into mutually recursive parts over one
//! `ResolverState`:
//! - `registry`: containers and stubs, keyed by canonical name
//! - `reference`: symbol/declaration to stub, including canonical homes
//! - `materialize` and `signatures`: checked types and type syntax
//! - `populate`: filling stubs from their declarations
//! - `expressions`: initializers and decorators
//! - `driver`: export traversal and the worklist

pub mod error;
pub use error::{Result, SchemaError};

pub mod scope;
pub use scope::TypeScope;

pub mod globals;
pub use globals::GlobalScope;

pub mod registry;
pub use registry::ContainerRegistry;

pub mod state;
pub use state::ResolverState;

mod driver;
mod expressions;
mod materialize;
mod namespace_modules;
mod populate;
mod reference;
mod signatures;

use tsschema_common::ResolverOptions;
use tsschema_frontend::FrontEnd;
use tsschema_model::Schema;

/// Resolve every source file of `frontend` into a fresh schema.
///
/// Any structural error aborts the pass; nothing partial is returned.
#[tracing::instrument(level = "debug", skip_all, fields(files = frontend.source_files().len()))]
pub fn resolve_program<F: FrontEnd + ?Sized>(
    frontend: &F,
    options: &ResolverOptions,
) -> Result<Schema> {
    let mut state = ResolverState::new(frontend, options);
    state.process_program()?;
    let schema = state.into_schema();
    tracing::debug!(
        modules = schema.module_count(),
        constructors = schema.constructor_count(),
        "resolution finished"
    );
    Ok(schema)
}

#[cfg(test)]
#[path = "../tests/resolve_tests.rs"]
mod tests;
