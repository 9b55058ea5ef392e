//! Resolver options and their serialized configuration form.

use serde::{Deserialize, Serialize};

use crate::module_name::RelativePrefix;

/// Default suffix identifying the built-in declaration file that supplies
/// the global scope snapshot.
pub const DEFAULT_LIB_FILE_NAME: &str = "lib.d.ts";

/// On-disk configuration (`tsschema.json`). Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaConfig {
    #[serde(default)]
    pub root_dir: Option<String>,
    #[serde(default)]
    pub relative_prefix: Option<String>,
    #[serde(default)]
    pub lib_file_name: Option<String>,
    /// Module-name prefixes kept when the schema is filtered for output.
    #[serde(default)]
    pub include_modules: Option<Vec<String>>,
}

/// Parse a `tsschema.json` document.
pub fn parse_schema_config(source: &str) -> serde_json::Result<SchemaConfig> {
    serde_json::from_str(source)
}

/// Options for one resolution pass.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Package root used to relativize absolute file names.
    pub root_dir: String,
    /// File name suffix of the built-in declaration file.
    pub lib_file_name: String,
    pub relative_prefix: Option<RelativePrefix>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        ResolverOptions {
            root_dir: ".".to_string(),
            lib_file_name: DEFAULT_LIB_FILE_NAME.to_string(),
            relative_prefix: None,
        }
    }
}

impl ResolverOptions {
    pub fn new(root_dir: impl Into<String>) -> Self {
        ResolverOptions {
            root_dir: root_dir.into(),
            ..ResolverOptions::default()
        }
    }

    pub fn with_relative_prefix(mut self, prefix: RelativePrefix) -> Self {
        self.relative_prefix = Some(prefix);
        self
    }

    /// Build options from a parsed configuration, falling back to defaults.
    pub fn from_config(config: &SchemaConfig) -> Self {
        let mut options = ResolverOptions::default();
        if let Some(root_dir) = &config.root_dir {
            options.root_dir = root_dir.clone();
        }
        if let Some(lib) = &config.lib_file_name {
            options.lib_file_name = lib.clone();
        }
        if let Some(prefix) = &config.relative_prefix {
            options.relative_prefix = Some(RelativePrefix::Static(prefix.clone()));
        }
        options
    }

    /// Whether `file_name` is the built-in declaration file.
    pub fn is_lib_file(&self, file_name: &str) -> bool {
        let normalized = file_name.replace('\\', "/");
        normalized == self.lib_file_name
            || normalized.ends_with(&format!("/{}", self.lib_file_name))
    }

    pub fn module_name_for(&self, file_name: &str) -> String {
        crate::module_name::file_name_to_module_name(
            file_name,
            &self.root_dir,
            self.relative_prefix.as_ref(),
        )
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
