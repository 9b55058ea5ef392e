//! Container Registry: idempotent get-or-create over the schema arena.

use tracing::trace;
use tsschema_model::{
    ConstructorId, ConstructorKind, ContainerId, EnumId, Reference, Schema, TypeParameter, ValueId,
};

#[derive(Debug, Default)]
pub struct ContainerRegistry {
    schema: Schema,
}

impl ContainerRegistry {
    pub fn new() -> ContainerRegistry {
        ContainerRegistry::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn schema_mut(&mut self) -> &mut Schema {
        &mut self.schema
    }

    pub fn into_schema(self) -> Schema {
        self.schema
    }

    pub fn get_or_create_module(&mut self, name: &str) -> ContainerId {
        let (id, created) = self.schema.ensure_module(name);
        if created {
            trace!(module = %name, ?id, "created module");
        }
        id
    }

    pub fn get_or_create_namespace(&mut self, parent: ContainerId, name: &str) -> ContainerId {
        let (id, created) = self.schema.ensure_namespace(parent, name);
        if created {
            trace!(namespace = %name, ?parent, ?id, "created namespace");
        }
        id
    }

    /// Stub for a class, interface or type alias. `type_parameters` names
    /// the declared parameters and is only used when the stub is new.
    pub fn get_or_create_constructor(
        &mut self,
        container: ContainerId,
        kind: ConstructorKind,
        name: &str,
        type_parameters: Vec<String>,
    ) -> (ConstructorId, bool) {
        let (id, created) = self.schema.ensure_constructor(container, kind, name);
        if created {
            trace!(?kind, name = %name, ?container, "created constructor stub");
            let ctor = self.schema.constructor_mut(id);
            ctor.type_parameters = type_parameters
                .into_iter()
                .map(|name| TypeParameter {
                    name,
                    constraint: None,
                })
                .collect();
        }
        (id, created)
    }

    pub fn get_or_create_enum(&mut self, container: ContainerId, name: &str) -> (EnumId, bool) {
        let (id, created) = self.schema.ensure_enum(container, name);
        if created {
            trace!(name = %name, ?container, "created enum stub");
        }
        (id, created)
    }

    pub fn get_or_create_value(&mut self, container: ContainerId, name: &str) -> (ValueId, bool) {
        let (id, created) = self.schema.ensure_value(container, name);
        if created {
            trace!(name = %name, ?container, "created value stub");
        }
        (id, created)
    }

    /// Record `name` in `container` as pointing at `target`, unless
    /// `target` already lives there under that name.
    pub fn add_entry(&mut self, container: ContainerId, name: &str, target: Reference) {
        if self.schema.parent_of(target) == Some(container) && self.entry_name(target) == name {
            return;
        }
        trace!(name = %name, ?container, ?target, "added re-export");
        self.schema.add_reexport(container, name, target);
    }

    fn entry_name(&self, target: Reference) -> &str {
        match target {
            Reference::Container(id) => &self.schema.container(id).name,
            Reference::Constructor(id) => &self.schema.constructor(id).name,
            Reference::Enum(id) => &self.schema.enum_def(id).name,
            Reference::Value(id) => &self.schema.value(id).name,
        }
    }
}

#[cfg(test)]
#[path = "../tests/registry_tests.rs"]
mod tests;
