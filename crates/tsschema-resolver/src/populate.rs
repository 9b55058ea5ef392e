//! Declaration Populator: fills the stubs created by reference resolution.
//!
//! Each declaration node is populated once. Merged declarations (interface
//! merging, function overloads, namespace re-opening) add to the same stub:
//! - members: first declaration of a name wins, except function members
//!   which accumulate into an intersection of signatures
//! - heritage: appended, duplicates skipped
//! - enum members: first initializer wins
//! - an implementation signature next to bodiless overloads is dropped
//! - type parameters: matched by position, see `constructor_scope`
//! - an interface merged into a class fills the class stub; its bases
//!   become `implements`

use tracing::trace;
use tsschema_frontend::{FrontEnd, ModifierFlags, NodeIndex, SyntaxKind, node_flags};
use tsschema_model::{
    CompositeType, ConstructorId, ConstructorKind, IndexKeyKind, IndexSignature, Member,
    PrimitiveKind, Reference, SchemaType, ValueKind,
};

use crate::error::{Result, SchemaError};
use crate::scope::TypeScope;
use crate::state::ResolverState;

impl<'a, F: FrontEnd + ?Sized> ResolverState<'a, F> {
    /// Populate one declaration (or every declaration of a variable
    /// statement). Kinds with nothing to populate are skipped.
    pub(crate) fn populate_declaration(&mut self, node: NodeIndex) -> Result<()> {
        match self.kind(node) {
            Some(SyntaxKind::ClassDeclaration) => self.populate_class(node),
            Some(SyntaxKind::InterfaceDeclaration) => self.populate_interface(node),
            Some(SyntaxKind::EnumDeclaration) => self.populate_enum(node),
            Some(SyntaxKind::TypeAliasDeclaration) => self.populate_type_alias(node),
            Some(SyntaxKind::FunctionDeclaration) => self.populate_function(node),
            Some(SyntaxKind::VariableStatement) => {
                let declarations = self
                    .arena()
                    .get_variable_statement(node)
                    .map(|stmt| stmt.declarations.as_slice())
                    .unwrap_or_default();
                for &declaration in declarations {
                    self.populate_variable(declaration)?;
                }
                Ok(())
            }
            Some(SyntaxKind::VariableDeclaration) => self.populate_variable(node),
            Some(SyntaxKind::BindingElement) => self.populate_binding_element(node),
            Some(SyntaxKind::ModuleDeclaration) => {
                // Reached through the worklist, e.g. the namespace half of a
                // class/namespace merge.
                let declared = self.is_ambient(node);
                self.enter_namespace(node, declared)
            }
            other => {
                trace!(kind = ?other, node = ?node, "nothing to populate");
                Ok(())
            }
        }
    }

    fn constructor_of(&mut self, declaration: NodeIndex) -> Result<ConstructorId> {
        match self.resolve_declaration(declaration, false)? {
            Reference::Constructor(id) => Ok(id),
            other => Err(self.unexpected(declaration, "type constructor", other)),
        }
    }

    // =========================================================================
    // Type constructors
    // =========================================================================

    fn populate_interface(&mut self, node: NodeIndex) -> Result<()> {
        if !self.begin_populate(node) {
            return Ok(());
        }
        let arena = self.arena();
        let Some(interface) = arena.get_interface(node) else {
            return Ok(());
        };
        let id = self.constructor_of(node)?;
        let owner = self.text(interface.name);
        trace!(interface = %owner, "populating interface");
        let scope = self.constructor_scope(id, &interface.type_parameters)?;

        let mut extends = Vec::new();
        for &clause in &interface.heritage_clauses {
            let Some(heritage) = arena.get_heritage(clause) else {
                continue;
            };
            if heritage.token == SyntaxKind::ExtendsKeyword {
                for &ty in &heritage.types {
                    extends.push(self.heritage_reference(ty, &owner, &scope)?);
                }
            }
        }
        let members = self.populate_members(&interface.members, false, &scope)?;

        let constructor = self.registry.schema_mut().constructor_mut(id);
        if constructor.kind == ConstructorKind::Class {
            // Bases of an interface merged into a class are implemented.
            append_unique(&mut constructor.implements, extends);
        } else {
            append_unique(&mut constructor.extends, extends);
        }
        merge_composite(&mut constructor.instance_type, members);
        Ok(())
    }

    fn populate_class(&mut self, node: NodeIndex) -> Result<()> {
        if !self.begin_populate(node) {
            return Ok(());
        }
        let arena = self.arena();
        let Some(class) = arena.get_class(node) else {
            return Ok(());
        };
        let id = self.constructor_of(node)?;
        let owner = self.text(class.name);
        trace!(class = %owner, "populating class");
        let scope = self.constructor_scope(id, &class.type_parameters)?;
        let decorators = self.decorators(&class.decorators, &scope)?;

        let mut extends = Vec::new();
        let mut implements = Vec::new();
        for &clause in &class.heritage_clauses {
            let Some(heritage) = arena.get_heritage(clause) else {
                continue;
            };
            if heritage.token == SyntaxKind::ExtendsKeyword {
                if heritage.types.len() != 1 {
                    return Err(SchemaError::InvalidExtends {
                        class: owner,
                        count: heritage.types.len(),
                    });
                }
                extends.push(self.heritage_reference(heritage.types[0], &owner, &scope)?);
            } else {
                for &ty in &heritage.types {
                    implements.push(self.heritage_reference(ty, &owner, &scope)?);
                }
            }
        }
        let (instance, statics) = self.class_members(&class.members, &scope)?;

        let is_abstract = self.has_modifier(node, ModifierFlags::ABSTRACT);
        let constructor = self.registry.schema_mut().constructor_mut(id);
        constructor.is_abstract |= is_abstract;
        constructor.decorators.extend(decorators);
        append_unique(&mut constructor.extends, extends);
        append_unique(&mut constructor.implements, implements);
        merge_composite(&mut constructor.instance_type, instance);
        merge_composite(
            constructor.static_type.get_or_insert_with(CompositeType::default),
            statics,
        );
        Ok(())
    }

    fn populate_type_alias(&mut self, node: NodeIndex) -> Result<()> {
        if !self.begin_populate(node) {
            return Ok(());
        }
        let Some(alias) = self.arena().get_type_alias(node) else {
            return Ok(());
        };
        let id = self.constructor_of(node)?;
        let scope = self.constructor_scope(id, &alias.type_parameters)?;
        let aliased = self.materialize_node(alias.type_node, &scope)?;
        let constructor = self.registry.schema_mut().constructor_mut(id);
        if constructor.aliased_type.is_none() {
            constructor.aliased_type = Some(aliased);
        }
        Ok(())
    }

    /// Heritage entries must name a class or interface.
    fn heritage_reference(
        &mut self,
        node: NodeIndex,
        owner: &str,
        scope: &TypeScope,
    ) -> Result<SchemaType> {
        match self.materialize_node(node, scope)? {
            reference @ SchemaType::Reference(_) => Ok(reference),
            _ => Err(SchemaError::HeritageNotReference {
                text: self.heritage_text(node),
                owner: owner.to_string(),
            }),
        }
    }

    fn heritage_text(&self, node: NodeIndex) -> String {
        match self.arena().get_expr_with_type_args(node) {
            Some(heritage) => self.text(heritage.expression),
            None => self.text(node),
        }
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Interface and type-literal bodies.
    pub(crate) fn populate_members(
        &mut self,
        members: &[NodeIndex],
        decorable: bool,
        scope: &TypeScope,
    ) -> Result<CompositeType> {
        let mut composite = CompositeType::default();
        for &member in members {
            self.add_member(&mut composite, member, decorable, scope)?;
        }
        Ok(composite)
    }

    /// Class bodies, split into instance and static sides. Constructors
    /// become static call signatures; their parameter properties become
    /// instance members.
    pub(crate) fn class_members(
        &mut self,
        members: &[NodeIndex],
        scope: &TypeScope,
    ) -> Result<(CompositeType, CompositeType)> {
        let mut instance = CompositeType::default();
        let mut statics = CompositeType::default();
        for &member in members {
            if self.is_overload_implementation(member, members) {
                continue;
            }
            if self.kind(member) == Some(SyntaxKind::Constructor) {
                statics.calls.push(self.signature(member, true, scope)?);
                self.add_parameter_properties(&mut instance, member, scope)?;
            } else if self.has_modifier(member, ModifierFlags::STATIC) {
                self.add_member(&mut statics, member, true, scope)?;
            } else {
                self.add_member(&mut instance, member, true, scope)?;
            }
        }
        Ok((instance, statics))
    }

    /// An implementation signature is hidden when bodiless overloads of the
    /// same name and kind sit next to it.
    fn is_overload_implementation(&self, member: NodeIndex, siblings: &[NodeIndex]) -> bool {
        let arena = self.arena();
        let Some(function) = arena.get_function(member) else {
            return false;
        };
        if !function.has_body {
            return false;
        }
        let kind = self.kind(member);
        let name = arena.property_name_text(function.name);
        let is_static = self.has_modifier(member, ModifierFlags::STATIC);
        siblings.iter().any(|&other| {
            other != member
                && self.kind(other) == kind
                && self.has_modifier(other, ModifierFlags::STATIC) == is_static
                && arena.get_function(other).is_some_and(|sibling| {
                    !sibling.has_body && arena.property_name_text(sibling.name) == name
                })
        })
    }

    fn add_parameter_properties(
        &mut self,
        instance: &mut CompositeType,
        constructor: NodeIndex,
        scope: &TypeScope,
    ) -> Result<()> {
        let arena = self.arena();
        let Some(function) = arena.get_function(constructor) else {
            return Ok(());
        };
        for &parameter in &function.parameters {
            let modifiers = arena.modifiers(parameter);
            if !modifiers.intersects(ModifierFlags::PARAMETER_PROPERTY) {
                continue;
            }
            let Some(data) = arena.get_parameter(parameter) else {
                continue;
            };
            let Some(name) = arena.identifier_text(data.name) else {
                continue;
            };
            if instance.members.contains_key(name) {
                continue;
            }
            let mut member = Member::new(self.annotated_type(data.type_annotation, parameter, scope)?);
            member.optional = data.question_token;
            member.readonly = modifiers.contains(ModifierFlags::READONLY);
            member.decorators = self.decorators(&data.decorators, scope)?;
            instance.members.insert(name.to_string(), member);
        }
        Ok(())
    }

    fn add_member(
        &mut self,
        composite: &mut CompositeType,
        member: NodeIndex,
        decorable: bool,
        scope: &TypeScope,
    ) -> Result<()> {
        let arena = self.arena();
        let kind = self.kind(member);
        match kind {
            Some(SyntaxKind::IndexSignature) => {
                let index = self.index_signature(member, scope)?;
                if composite.index.is_none() {
                    composite.index = Some(index);
                }
            }
            Some(SyntaxKind::CallSignature) => {
                composite.calls.push(self.signature(member, false, scope)?);
            }
            Some(SyntaxKind::ConstructSignature) => {
                composite.constructs.push(self.signature(member, false, scope)?);
            }
            Some(SyntaxKind::PropertySignature | SyntaxKind::PropertyDeclaration) => {
                let Some(property) = arena.get_property(member) else {
                    return Ok(());
                };
                let Some(name) = arena.property_name_text(property.name) else {
                    return Ok(());
                };
                if composite.members.contains_key(&name) {
                    return Ok(());
                }
                let mut entry =
                    Member::new(self.annotated_type(property.type_annotation, member, scope)?);
                entry.optional = property.question_token;
                entry.readonly = self.has_modifier(member, ModifierFlags::READONLY);
                entry.initializer = self.initializer(property.initializer, scope)?;
                if decorable {
                    entry.decorators = self.decorators(&property.decorators, scope)?;
                }
                composite.members.insert(name, entry);
            }
            Some(SyntaxKind::GetAccessor | SyntaxKind::SetAccessor) => {
                self.add_accessor(composite, member, decorable, scope)?;
            }
            Some(SyntaxKind::MethodDeclaration | SyntaxKind::MethodSignature) => {
                let Some(function) = arena.get_function(member) else {
                    return Ok(());
                };
                let Some(name) = arena.property_name_text(function.name) else {
                    return Ok(());
                };
                let ty = self.materialize_node(member, scope)?;
                let decorators = if decorable {
                    self.decorators(&function.decorators, scope)?
                } else {
                    Vec::new()
                };
                match composite.members.get_mut(&name) {
                    Some(existing) => {
                        add_overload(&mut existing.ty, ty);
                        existing.decorators.extend(decorators);
                    }
                    None => {
                        let mut entry = Member::new(ty);
                        entry.optional = function.question_token;
                        entry.decorators = decorators;
                        composite.members.insert(name, entry);
                    }
                }
            }
            other => {
                return Err(SchemaError::UnrecognisedDeclaration {
                    kind: other.unwrap_or(SyntaxKind::Identifier),
                    text: self.text(member),
                });
            }
        }
        Ok(())
    }

    /// `get`/`set` pairs collapse into one member, readonly when only the
    /// getter exists.
    fn add_accessor(
        &mut self,
        composite: &mut CompositeType,
        member: NodeIndex,
        decorable: bool,
        scope: &TypeScope,
    ) -> Result<()> {
        let arena = self.arena();
        let Some(function) = arena.get_function(member) else {
            return Ok(());
        };
        let Some(name) = arena.property_name_text(function.name) else {
            return Ok(());
        };
        let is_getter = self.kind(member) == Some(SyntaxKind::GetAccessor);

        if let Some(existing) = composite.members.get_mut(&name) {
            existing.readonly = false;
            return Ok(());
        }

        let ty = if is_getter {
            self.annotated_type(function.type_annotation, member, scope)?
        } else {
            let parameter = function
                .parameters
                .first()
                .copied()
                .unwrap_or(NodeIndex::NONE);
            let annotation = arena
                .get_parameter(parameter)
                .map(|p| p.type_annotation)
                .unwrap_or(NodeIndex::NONE);
            self.annotated_type(annotation, member, scope)?
        };
        let mut entry = Member::new(ty);
        entry.readonly = is_getter;
        if decorable {
            entry.decorators = self.decorators(&function.decorators, scope)?;
        }
        composite.members.insert(name, entry);
        Ok(())
    }

    /// Index signature keys must be `string` or `number`.
    fn index_signature(&mut self, member: NodeIndex, scope: &TypeScope) -> Result<IndexSignature> {
        let arena = self.arena();
        let Some(index) = arena.get_index_signature(member) else {
            return Err(SchemaError::InvalidIndexKey {
                text: self.text(member),
            });
        };
        let key_node = index
            .parameters
            .first()
            .and_then(|&p| arena.get_parameter(p))
            .map(|p| p.type_annotation)
            .unwrap_or(NodeIndex::NONE);
        let key = match self.annotated_type(key_node, NodeIndex::NONE, scope)? {
            SchemaType::Primitive {
                kind: PrimitiveKind::String,
            } => IndexKeyKind::String,
            SchemaType::Primitive {
                kind: PrimitiveKind::Number,
            } => IndexKeyKind::Number,
            _ => {
                return Err(SchemaError::InvalidIndexKey {
                    text: self.text(key_node),
                });
            }
        };
        let value = self.annotated_type(index.type_annotation, member, scope)?;
        Ok(IndexSignature { key, value })
    }

    // =========================================================================
    // Enums and values
    // =========================================================================

    fn populate_enum(&mut self, node: NodeIndex) -> Result<()> {
        if !self.begin_populate(node) {
            return Ok(());
        }
        let arena = self.arena();
        let Some(data) = arena.get_enum(node) else {
            return Ok(());
        };
        let id = match self.resolve_declaration(node, false)? {
            Reference::Enum(id) => id,
            other => return Err(self.unexpected(node, "enum", other)),
        };
        let scope = TypeScope::new();
        for &member in &data.members {
            let Some(name) = arena.declaration_name_text(member) else {
                continue;
            };
            let initializer_node = arena
                .get_enum_member(member)
                .map(|m| m.initializer)
                .unwrap_or(NodeIndex::NONE);
            let initializer = self.initializer(initializer_node, &scope)?;
            let entry = self
                .registry
                .schema_mut()
                .enum_def_mut(id)
                .members
                .entry(name)
                .or_default();
            if entry.initializer.is_none() {
                entry.initializer = initializer;
            }
        }
        Ok(())
    }

    fn populate_function(&mut self, node: NodeIndex) -> Result<()> {
        if !self.begin_populate(node) {
            return Ok(());
        }
        let id = self.resolve_value(node)?;
        let declarations = self
            .fe
            .symbol_at(node)
            .and_then(|sym| self.symbol(sym))
            .map(|sym| sym.declarations.as_slice())
            .unwrap_or_default();
        if self.is_overload_implementation(node, declarations) {
            trace!(function = %self.text(node), "skipping overload implementation");
            return Ok(());
        }
        let signature = self.signature(node, false, &TypeScope::new())?;
        let value = self.registry.schema_mut().value_mut(id);
        value.value_kind = Some(ValueKind::Function);
        match value.ty.as_mut() {
            Some(existing) => add_overload(existing, SchemaType::Function(Box::new(signature))),
            None => value.ty = Some(SchemaType::Function(Box::new(signature))),
        }
        Ok(())
    }

    fn populate_variable(&mut self, node: NodeIndex) -> Result<()> {
        if !self.begin_populate(node) {
            return Ok(());
        }
        let arena = self.arena();
        let Some(declaration) = arena.get_variable_declaration(node) else {
            return Ok(());
        };
        if self.kind(declaration.name).is_some_and(SyntaxKind::is_binding_pattern) {
            return self.populate_binding_pattern(declaration.name);
        }

        let id = self.resolve_value(node)?;
        let scope = TypeScope::new();
        let ty = self.annotated_type(declaration.type_annotation, node, &scope)?;
        let initializer = self.initializer(declaration.initializer, &scope)?;
        let kind = self.value_kind(node);
        let value = self.registry.schema_mut().value_mut(id);
        value.value_kind.get_or_insert(kind);
        value.ty.get_or_insert(ty);
        if value.initializer.is_none() {
            value.initializer = initializer;
        }
        Ok(())
    }

    /// Destructuring declarations are flattened: each bound name becomes a
    /// value of its own.
    fn populate_binding_pattern(&mut self, pattern: NodeIndex) -> Result<()> {
        let elements = self
            .arena()
            .get_binding_pattern(pattern)
            .map(|p| p.elements.as_slice())
            .unwrap_or_default();
        for &element in elements {
            self.populate_binding_element(element)?;
        }
        Ok(())
    }

    fn populate_binding_element(&mut self, node: NodeIndex) -> Result<()> {
        if !self.begin_populate(node) {
            return Ok(());
        }
        let arena = self.arena();
        let Some(element) = arena.get_binding_element(node) else {
            return Ok(());
        };
        if self.kind(element.name).is_some_and(SyntaxKind::is_binding_pattern) {
            return self.populate_binding_pattern(element.name);
        }

        let id = self.resolve_value(node)?;
        let scope = TypeScope::new();
        let ty = self.annotated_type(NodeIndex::NONE, node, &scope)?;
        let initializer = self.initializer(element.initializer, &scope)?;
        let kind = self.value_kind(node);
        let value = self.registry.schema_mut().value_mut(id);
        value.value_kind.get_or_insert(kind);
        value.ty.get_or_insert(ty);
        if value.initializer.is_none() {
            value.initializer = initializer;
        }
        Ok(())
    }

    /// `const`/`let`/`var`, read from the enclosing variable statement.
    fn value_kind(&self, node: NodeIndex) -> ValueKind {
        let arena = self.arena();
        let mut current = arena.parent(node);
        let mut hops = 0u32;
        while let Some(parent) = arena.get(current) {
            if parent.kind == SyntaxKind::VariableStatement {
                return if parent.flags & node_flags::CONST != 0 {
                    ValueKind::Const
                } else if parent.flags & node_flags::LET != 0 {
                    ValueKind::Let
                } else {
                    ValueKind::Var
                };
            }
            hops += 1;
            if hops > tsschema_common::limits::MAX_ANCESTOR_WALK {
                break;
            }
            current = parent.parent;
        }
        ValueKind::Var
    }

    // =========================================================================
    // Namespaces
    // =========================================================================

    /// Inside `declare` or a declaration file.
    pub(crate) fn is_ambient(&self, node: NodeIndex) -> bool {
        let arena = self.arena();
        let file = arena.source_file_of(node);
        if arena
            .get_source_file(file)
            .is_some_and(|sf| sf.is_declaration_file)
        {
            return true;
        }
        let mut current = node;
        let mut hops = 0u32;
        while let Some(n) = arena.get(current) {
            if n.has_modifier(ModifierFlags::DECLARE) {
                return true;
            }
            hops += 1;
            if n.kind == SyntaxKind::SourceFile || hops > tsschema_common::limits::MAX_ANCESTOR_WALK
            {
                break;
            }
            current = n.parent;
        }
        false
    }
}

/// Merge `from` into `into`: missing members, index and signatures are
/// added; existing members are kept.
pub(crate) fn merge_composite(into: &mut CompositeType, from: CompositeType) {
    for (name, member) in from.members {
        match into.members.get_mut(&name) {
            Some(existing) if is_function_like(&existing.ty) && is_function_like(&member.ty) => {
                add_overload(&mut existing.ty, member.ty);
            }
            Some(_) => {}
            None => {
                into.members.insert(name, member);
            }
        }
    }
    if into.index.is_none() {
        into.index = from.index;
    }
    into.calls.extend(from.calls);
    into.constructs.extend(from.constructs);
}

fn is_function_like(ty: &SchemaType) -> bool {
    match ty {
        SchemaType::Function(_) => true,
        SchemaType::Intersection { types } => types.iter().all(is_function_like),
        _ => false,
    }
}

/// Overloads accumulate as an intersection of signatures.
fn add_overload(existing: &mut SchemaType, signature: SchemaType) {
    match existing {
        SchemaType::Intersection { types } => types.push(signature),
        _ => {
            let first = std::mem::replace(existing, SchemaType::any());
            *existing = SchemaType::Intersection {
                types: vec![first, signature],
            };
        }
    }
}

fn append_unique(into: &mut Vec<SchemaType>, from: Vec<SchemaType>) {
    for ty in from {
        if !into.contains(&ty) {
            into.push(ty);
        }
    }
}

#[cfg(test)]
#[path = "../tests/populate_tests.rs"]
mod tests;
