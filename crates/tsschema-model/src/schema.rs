//! `Schema`: the arena that owns every container and entry of one pass.
//!
//! All `ensure_*` operations are idempotent lookups-or-inserts keyed by exact
//! name. They return the handle plus whether it was created by this call.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::containers::{
    Container, ConstructorKind, ContainerKind, EnumDef, Reference, TypeConstructor, ValueDef,
};
use crate::ids::{ConstructorId, ContainerId, EnumId, ValueId};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    modules: IndexMap<String, ContainerId>,
    containers: Vec<Container>,
    constructors: Vec<TypeConstructor>,
    enums: Vec<EnumDef>,
    values: Vec<ValueDef>,
}

impl Schema {
    pub fn new() -> Schema {
        Schema::default()
    }

    // =========================================================================
    // Lookup-or-insert
    // =========================================================================

    pub fn ensure_module(&mut self, name: &str) -> (ContainerId, bool) {
        if let Some(&id) = self.modules.get(name) {
            return (id, false);
        }
        let id = ContainerId(self.containers.len() as u32);
        self.containers
            .push(Container::new(ContainerKind::Module, name, None));
        self.modules.insert(name.to_string(), id);
        (id, true)
    }

    pub fn ensure_namespace(&mut self, parent: ContainerId, name: &str) -> (ContainerId, bool) {
        if let Some(&id) = self.containers[parent.index()].namespaces.get(name) {
            return (id, false);
        }
        let id = ContainerId(self.containers.len() as u32);
        self.containers
            .push(Container::new(ContainerKind::Namespace, name, Some(parent)));
        self.containers[parent.index()]
            .namespaces
            .insert(name.to_string(), id);
        (id, true)
    }

    pub fn ensure_constructor(
        &mut self,
        container: ContainerId,
        kind: ConstructorKind,
        name: &str,
    ) -> (ConstructorId, bool) {
        if let Some(&id) = self.containers[container.index()]
            .constructors(kind)
            .get(name)
        {
            return (id, false);
        }
        let id = ConstructorId(self.constructors.len() as u32);
        self.constructors
            .push(TypeConstructor::new(kind, name, container));
        self.containers[container.index()]
            .constructors_mut(kind)
            .insert(name.to_string(), id);
        (id, true)
    }

    pub fn ensure_enum(&mut self, container: ContainerId, name: &str) -> (EnumId, bool) {
        if let Some(&id) = self.containers[container.index()].enums.get(name) {
            return (id, false);
        }
        let id = EnumId(self.enums.len() as u32);
        self.enums.push(EnumDef {
            name: name.to_string(),
            container,
            members: IndexMap::new(),
        });
        self.containers[container.index()]
            .enums
            .insert(name.to_string(), id);
        (id, true)
    }

    pub fn ensure_value(&mut self, container: ContainerId, name: &str) -> (ValueId, bool) {
        if let Some(&id) = self.containers[container.index()].values.get(name) {
            return (id, false);
        }
        let id = ValueId(self.values.len() as u32);
        self.values.push(ValueDef {
            name: name.to_string(),
            container,
            value_kind: None,
            ty: None,
            initializer: None,
        });
        self.containers[container.index()]
            .values
            .insert(name.to_string(), id);
        (id, true)
    }

    /// Record `name` in `container` as a re-export of `target`. The first
    /// recorded target wins.
    pub fn add_reexport(&mut self, container: ContainerId, name: &str, target: Reference) {
        self.containers[container.index()]
            .reexports
            .entry(name.to_string())
            .or_insert(target);
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn modules(&self) -> impl Iterator<Item = (&str, ContainerId)> + '_ {
        self.modules.iter().map(|(name, &id)| (name.as_str(), id))
    }

    pub fn module(&self, name: &str) -> Option<ContainerId> {
        self.modules.get(name).copied()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn container(&self, id: ContainerId) -> &Container {
        &self.containers[id.index()]
    }

    pub fn container_mut(&mut self, id: ContainerId) -> &mut Container {
        &mut self.containers[id.index()]
    }

    pub fn constructor(&self, id: ConstructorId) -> &TypeConstructor {
        &self.constructors[id.index()]
    }

    pub fn constructor_mut(&mut self, id: ConstructorId) -> &mut TypeConstructor {
        &mut self.constructors[id.index()]
    }

    pub fn constructor_count(&self) -> usize {
        self.constructors.len()
    }

    pub fn enum_def(&self, id: EnumId) -> &EnumDef {
        &self.enums[id.index()]
    }

    pub fn enum_def_mut(&mut self, id: EnumId) -> &mut EnumDef {
        &mut self.enums[id.index()]
    }

    pub fn value(&self, id: ValueId) -> &ValueDef {
        &self.values[id.index()]
    }

    pub fn value_mut(&mut self, id: ValueId) -> &mut ValueDef {
        &mut self.values[id.index()]
    }

    /// The container that directly holds `reference`.
    pub fn parent_of(&self, reference: Reference) -> Option<ContainerId> {
        match reference {
            Reference::Container(id) => self.container(id).parent,
            Reference::Constructor(id) => Some(self.constructor(id).container),
            Reference::Enum(id) => Some(self.enum_def(id).container),
            Reference::Value(id) => Some(self.value(id).container),
        }
    }

    /// Owning module name and namespace path (outermost first).
    pub fn container_path(&self, id: ContainerId) -> (String, Vec<String>) {
        let mut namespaces = Vec::new();
        let mut current = id;
        loop {
            let container = self.container(current);
            match container.parent {
                Some(parent) => {
                    namespaces.push(container.name.clone());
                    current = parent;
                }
                None => {
                    namespaces.reverse();
                    return (container.name.clone(), namespaces);
                }
            }
        }
    }

    /// Walk `module` then each namespace in `path`.
    pub fn find_container(&self, module: &str, path: &[&str]) -> Option<ContainerId> {
        let mut current = self.module(module)?;
        for segment in path {
            current = *self.container(current).namespaces.get(*segment)?;
        }
        Some(current)
    }

    pub fn find_constructor(
        &self,
        container: ContainerId,
        kind: ConstructorKind,
        name: &str,
    ) -> Option<ConstructorId> {
        self.container(container).constructors(kind).get(name).copied()
    }

    pub fn find_class(&self, container: ContainerId, name: &str) -> Option<&TypeConstructor> {
        self.find_constructor(container, ConstructorKind::Class, name)
            .map(|id| self.constructor(id))
    }

    pub fn find_interface(&self, container: ContainerId, name: &str) -> Option<&TypeConstructor> {
        self.find_constructor(container, ConstructorKind::Interface, name)
            .map(|id| self.constructor(id))
    }

    pub fn find_type_alias(&self, container: ContainerId, name: &str) -> Option<&TypeConstructor> {
        self.find_constructor(container, ConstructorKind::TypeAlias, name)
            .map(|id| self.constructor(id))
    }

    pub fn find_enum(&self, container: ContainerId, name: &str) -> Option<EnumId> {
        self.container(container).enums.get(name).copied()
    }

    pub fn find_value(&self, container: ContainerId, name: &str) -> Option<ValueId> {
        self.container(container).values.get(name).copied()
    }
}

#[cfg(test)]
#[path = "../tests/schema_tests.rs"]
mod tests;
