//! `tsschema.json` loading.

use std::path::Path;

use anyhow::{Context, Result, bail};

use tsschema_common::ResolverOptions;
pub use tsschema_common::options::{SchemaConfig, parse_schema_config};

/// Read and parse a configuration file.
pub fn load_schema_config(path: &Path) -> Result<SchemaConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema config: {}", path.display()))?;
    let config = parse_schema_config(&source)
        .with_context(|| format!("failed to parse schema config: {}", path.display()))?;
    validate(&config).with_context(|| format!("invalid schema config: {}", path.display()))?;
    Ok(config)
}

fn validate(config: &SchemaConfig) -> Result<()> {
    if config.root_dir.as_deref() == Some("") {
        bail!("rootDir must not be empty");
    }
    if config.lib_file_name.as_deref() == Some("") {
        bail!("libFileName must not be empty");
    }
    Ok(())
}

/// Options for a pass driven by `config`. A relative `rootDir` is taken
/// relative to `base_dir`, normally the directory holding the config file.
pub fn resolve_options(config: &SchemaConfig, base_dir: Option<&Path>) -> ResolverOptions {
    let mut options = ResolverOptions::from_config(config);
    if let Some(base) = base_dir
        && let Some(root) = &config.root_dir
        && Path::new(root).is_relative()
    {
        options.root_dir = base.join(root).to_string_lossy().replace('\\', "/");
    }
    options
}

/// Module prefixes kept in the output; empty keeps everything.
pub fn include_modules(config: &SchemaConfig) -> &[String] {
    config.include_modules.as_deref().unwrap_or_default()
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod tests;
