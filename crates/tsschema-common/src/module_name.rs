//! Mapping from source file paths to canonical module names.
//!
//! A module's canonical name is a pure function of its file path, the
//! package root, and an optional relative-prefix rewrite:
//!
//! - `/pkg/src/a.d.ts` under root `/pkg` becomes `./src/a`
//! - with `RelativePrefix::Static("my-pkg")` it becomes `my-pkg/src/a`
//! - with a callback the caller decides, given the file and the bare name

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

type PrefixFn = dyn Fn(&str, &str) -> String + Send + Sync;

/// Rewrites intra-package relative module names into package-qualified names.
#[derive(Clone)]
pub enum RelativePrefix {
    /// Joined POSIX-style in front of the relative name.
    Static(String),
    /// Called with `(file_name, relative_module_name)`.
    Callback(Arc<PrefixFn>),
}

impl RelativePrefix {
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        RelativePrefix::Callback(Arc::new(f))
    }

    /// Apply the rewrite to `module_name`, which was derived from `file_name`.
    pub fn apply(&self, file_name: &str, module_name: &str) -> String {
        match self {
            RelativePrefix::Static(prefix) => posix_join(prefix, module_name),
            RelativePrefix::Callback(f) => f(file_name, module_name),
        }
    }
}

impl fmt::Debug for RelativePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativePrefix::Static(prefix) => f.debug_tuple("Static").field(prefix).finish(),
            RelativePrefix::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Compute the canonical module name of `file_name`.
///
/// Absolute paths are made relative to `root_dir`, which is itself taken
/// relative to the current directory when not absolute. Separators are normalized
/// to `/` and the `.d.ts`, `.ts`, `.tsx` or `.js` extension is dropped.
pub fn file_name_to_module_name(
    file_name: &str,
    root_dir: &str,
    relative_prefix: Option<&RelativePrefix>,
) -> String {
    let mut module_name = if Path::new(file_name).is_absolute() || file_name.starts_with('/') {
        relative_path(root_dir, file_name)
    } else {
        file_name.to_string()
    };

    module_name = module_name.replace('\\', "/");
    module_name = strip_source_extension(&module_name).to_string();

    match relative_prefix {
        Some(prefix) => prefix.apply(file_name, &module_name),
        None => {
            if !module_name.starts_with("./") {
                module_name.insert_str(0, "./");
            }
            module_name
        }
    }
}

fn strip_source_extension(name: &str) -> &str {
    for ext in [".d.ts", ".tsx", ".ts", ".js"] {
        if let Some(stripped) = name.strip_suffix(ext) {
            return stripped;
        }
    }
    name
}

/// Join two POSIX paths and normalize the result (`.` and `..` segments
/// resolved lexically, duplicate separators collapsed).
pub fn posix_join(base: &str, tail: &str) -> String {
    let joined = if base.is_empty() {
        tail.to_string()
    } else if tail.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{tail}")
    };
    posix_normalize(&joined)
}

fn posix_normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(last) if *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }
    let body = parts.join("/");
    match (absolute, body.is_empty()) {
        (true, _) => format!("/{body}"),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

/// Equivalent of `path.relative(from, to)`. A relative `from` is resolved
/// against the current directory first; the rest is lexical.
fn relative_path(from: &str, to: &str) -> String {
    let from = normalized_components(&absolutize(Path::new(from)));
    let to = normalized_components(Path::new(to));

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from.len() {
        parts.push("..".to_string());
    }
    parts.extend(to[common..].iter().cloned());
    parts.join("/")
}

fn absolutize(path: &Path) -> PathBuf {
    if path.has_root() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

fn normalized_components(path: &Path) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => {
                out.push(prefix.as_os_str().to_string_lossy().into_owned());
            }
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part.to_string_lossy().into_owned()),
        }
    }
    out
}

#[cfg(test)]
#[path = "../tests/module_name_tests.rs"]
mod tests;
