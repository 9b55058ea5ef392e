//! tsschema: structural type schemas for type-checked TypeScript programs.
//!
//! The engine lives in the workspace crates and is re-exported here:
//! - `common`: module naming, options, limits
//! - `frontend`: the `FrontEnd` contract and the in-memory `Program`
//! - `model`: the `Schema` graph and its flattened `RawSchema` form
//! - `resolver`: the resolution pass
//!
//! ```no_run
//! use tsschema::{ProgramBuilder, ResolverOptions};
//!
//! let program = ProgramBuilder::new().build();
//! let raw = tsschema::generate_raw_schema(&program, &ResolverOptions::default(), &[] as &[&str])?;
//! println!("{}", serde_json::to_string_pretty(&raw)?);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub use tsschema_common as common;
pub use tsschema_frontend as frontend;
pub use tsschema_model as model;
pub use tsschema_resolver as resolver;

pub use tsschema_common::{GLOBAL_MODULE_NAME, RelativePrefix, ResolverOptions};
pub use tsschema_frontend::{FrontEnd, Program, ProgramBuilder};
pub use tsschema_model::{RawSchema, Schema};
pub use tsschema_resolver::{SchemaError, resolve_program};

pub mod config;
pub use config::{SchemaConfig, load_schema_config, resolve_options};

pub mod tracing_config;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Resolve `frontend` into a linked schema.
pub fn generate_schema<F: FrontEnd + ?Sized>(
    frontend: &F,
    options: &ResolverOptions,
) -> Result<Schema> {
    let schema = resolve_program(frontend, options).context("schema resolution failed")?;
    info!(
        modules = schema.module_count(),
        constructors = schema.constructor_count(),
        "schema generated"
    );
    Ok(schema)
}

/// Resolve `frontend` and flatten the result, keeping only modules whose
/// name starts with one of `include_modules`. An empty list keeps all.
pub fn generate_raw_schema<F, S>(
    frontend: &F,
    options: &ResolverOptions,
    include_modules: &[S],
) -> Result<RawSchema>
where
    F: FrontEnd + ?Sized,
    S: AsRef<str>,
{
    let raw = generate_schema(frontend, options)?.to_raw();
    if include_modules.is_empty() {
        return Ok(raw);
    }
    Ok(raw.retain_prefixes(include_modules))
}

/// Like `generate_raw_schema`, driven by a loaded configuration. A relative
/// `rootDir` is anchored at `base_dir` when one is given.
pub fn generate_from_config<F: FrontEnd + ?Sized>(
    frontend: &F,
    config: &SchemaConfig,
    base_dir: Option<&Path>,
) -> Result<RawSchema> {
    let options = resolve_options(config, base_dir);
    generate_raw_schema(frontend, &options, config::include_modules(config))
}

/// Load `config_path` and generate from it, anchoring a relative `rootDir`
/// at the directory holding the file.
pub fn generate_from_config_file<F: FrontEnd + ?Sized>(
    frontend: &F,
    config_path: &Path,
) -> Result<RawSchema> {
    let config = load_schema_config(config_path)?;
    generate_from_config(frontend, &config, config_path.parent())
}

/// Write `raw` as pretty-printed JSON to `path`.
pub fn write_raw_schema(raw: &RawSchema, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(raw).context("failed to serialize schema")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write schema: {}", path.display()))?;
    info!(path = %path.display(), modules = raw.modules.len(), "schema written");
    Ok(())
}
