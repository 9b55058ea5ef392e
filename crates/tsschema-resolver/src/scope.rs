//! Type-parameter scopes.
//!
//! A scope is an explicit value threaded through every materialization
//! call. Inner bindings shadow outer ones of the same name.

use smallvec::SmallVec;
use tsschema_model::{TypeParameterOwner, TypeParameterRef};

#[derive(Clone, Debug, Default)]
pub struct TypeScope {
    bindings: SmallVec<[TypeParameterRef; 4]>,
}

impl TypeScope {
    pub fn new() -> TypeScope {
        TypeScope::default()
    }

    /// Innermost binding named `name`.
    pub fn lookup(&self, name: &str) -> Option<&TypeParameterRef> {
        self.bindings.iter().rev().find(|binding| binding.name == name)
    }

    /// Child scope with `names` bound to `owner`.
    pub fn extend<I, S>(&self, owner: TypeParameterOwner, names: I) -> TypeScope
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut child = self.clone();
        child.bindings.extend(names.into_iter().map(|name| TypeParameterRef {
            owner,
            name: name.into(),
        }));
        child
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/scope_tests.rs"]
mod tests;
