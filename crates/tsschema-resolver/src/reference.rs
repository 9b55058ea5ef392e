//! Reference Resolver: maps a symbol or declaration to its canonical stub.
//!
//! The canonical home of a declaration depends only on where it is declared:
//! - a global (lib) type lives in the global module `""`
//! - otherwise the owning file's module, or the ambient module / exported
//!   namespace that encloses it
//! - nested namespaces become nested containers under that module
//!
//! Stubs are created on first sight and queued for population, so the same
//! declaration always resolves to the same id, including inside cycles.

use tracing::trace;
use tsschema_common::GLOBAL_MODULE_NAME;
use tsschema_common::limits::MAX_ANCESTOR_WALK;
use tsschema_frontend::{FrontEnd, NodeIndex, SymbolId, SyntaxKind, node_flags, symbol_flags};
use tsschema_model::{
    ConstructorId, ConstructorKind, ContainerId, EnumId, Reference, SchemaType, TypeReference,
    ValueId,
};

use crate::error::{Result, SchemaError};
use crate::state::ResolverState;

impl<'a, F: FrontEnd + ?Sized> ResolverState<'a, F> {
    // =========================================================================
    // Entry points
    // =========================================================================

    /// Resolve a symbol. Aliases are followed first; the representative
    /// declaration is the first one that is not a variable or function,
    /// when there is one.
    #[tracing::instrument(level = "trace", skip(self), fields(symbol = ?symbol))]
    pub(crate) fn resolve_symbol(&mut self, symbol: SymbolId, is_module: bool) -> Result<Reference> {
        let target = self.fe.aliased_symbol(symbol);
        let Some(sym) = self.symbol(target) else {
            return Err(SchemaError::MissingDeclaration {
                name: format!("{symbol:?}"),
            });
        };
        let Some(declaration) = self.representative_declaration(&sym.declarations) else {
            return Err(SchemaError::MissingDeclaration {
                name: sym.escaped_name.clone(),
            });
        };
        let name = sym
            .unquoted_name()
            .unwrap_or(&sym.escaped_name)
            .to_string();
        let is_global = !is_module && self.globals.type_symbol(&name) == Some(target);
        self.resolve_at(declaration, &name, is_global, is_module)
    }

    /// Resolve a declaration node directly.
    #[tracing::instrument(level = "trace", skip(self), fields(declaration = ?declaration))]
    pub(crate) fn resolve_declaration(
        &mut self,
        declaration: NodeIndex,
        is_module: bool,
    ) -> Result<Reference> {
        let name = self
            .arena()
            .declaration_name_text(declaration)
            .unwrap_or_default();
        let is_global = !is_module
            && self
                .globals
                .type_symbol(&name)
                .and_then(|global| self.symbol(global))
                .and_then(|global| global.declarations.first())
                .is_some_and(|&first| first == declaration);
        self.resolve_at(declaration, &name, is_global, is_module)
    }

    fn representative_declaration(&self, declarations: &[NodeIndex]) -> Option<NodeIndex> {
        let mut index = 0;
        while index + 1 < declarations.len()
            && matches!(
                self.kind(declarations[index]),
                Some(SyntaxKind::VariableDeclaration | SyntaxKind::FunctionDeclaration)
            )
        {
            index += 1;
        }
        declarations.get(index).copied()
    }

    fn resolve_at(
        &mut self,
        declaration: NodeIndex,
        name: &str,
        is_global: bool,
        is_module: bool,
    ) -> Result<Reference> {
        let kind = self.kind(declaration);
        let is_module = is_module
            || matches!(
                kind,
                Some(SyntaxKind::ModuleDeclaration | SyntaxKind::SourceFile)
            );

        let container = if is_global {
            self.global_module()
        } else {
            self.home_container(declaration, is_module)?
        };
        if is_module {
            return Ok(Reference::Container(container));
        }

        let (reference, created) = match kind {
            Some(SyntaxKind::ClassDeclaration) => {
                self.constructor_stub(container, ConstructorKind::Class, name, declaration)
            }
            Some(SyntaxKind::InterfaceDeclaration) => {
                let kind = if self.merges_with_class(declaration) {
                    ConstructorKind::Class
                } else {
                    ConstructorKind::Interface
                };
                self.constructor_stub(container, kind, name, declaration)
            }
            Some(SyntaxKind::TypeAliasDeclaration) => {
                self.constructor_stub(container, ConstructorKind::TypeAlias, name, declaration)
            }
            Some(SyntaxKind::EnumDeclaration) => {
                let (id, created) = self.registry.get_or_create_enum(container, name);
                (Reference::Enum(id), created)
            }
            Some(
                SyntaxKind::FunctionDeclaration
                | SyntaxKind::VariableDeclaration
                | SyntaxKind::BindingElement,
            ) => {
                let (id, created) = self.registry.get_or_create_value(container, name);
                (Reference::Value(id), created)
            }
            other => {
                return Err(SchemaError::UnrecognisedDeclaration {
                    kind: other.unwrap_or(SyntaxKind::Identifier),
                    text: self.text(declaration),
                });
            }
        };

        if created {
            self.schedule(declaration);
        }
        trace!(name = %name, ?reference, created, "resolved reference");
        Ok(reference)
    }

    fn constructor_stub(
        &mut self,
        container: ContainerId,
        kind: ConstructorKind,
        name: &str,
        declaration: NodeIndex,
    ) -> (Reference, bool) {
        let type_parameters = self.declared_type_parameter_names(declaration);
        let (id, created) =
            self.registry
                .get_or_create_constructor(container, kind, name, type_parameters);
        (Reference::Constructor(id), created)
    }

    /// Whether the symbol declared by `declaration` also has a class
    /// declaration. Interface halves of such a merge share the class stub.
    pub(crate) fn merges_with_class(&self, declaration: NodeIndex) -> bool {
        self.fe
            .symbol_at(declaration)
            .and_then(|sym| self.symbol(sym))
            .is_some_and(|sym| {
                sym.declarations
                    .iter()
                    .any(|&d| self.kind(d) == Some(SyntaxKind::ClassDeclaration))
            })
    }

    fn declared_type_parameter_names(&self, declaration: NodeIndex) -> Vec<String> {
        let arena = self.arena();
        let nodes: &[NodeIndex] = if let Some(class) = arena.get_class(declaration) {
            &class.type_parameters
        } else if let Some(interface) = arena.get_interface(declaration) {
            &interface.type_parameters
        } else if let Some(alias) = arena.get_type_alias(declaration) {
            &alias.type_parameters
        } else {
            &[]
        };
        nodes
            .iter()
            .filter_map(|&tp| arena.declaration_name_text(tp))
            .collect()
    }

    // =========================================================================
    // Canonical homes
    // =========================================================================

    /// Container a declaration lives in. For module targets the walk starts
    /// at the declaration itself, so a namespace resolves to its own
    /// container.
    fn home_container(&mut self, declaration: NodeIndex, is_module: bool) -> Result<ContainerId> {
        let arena = self.arena();
        let file = arena.source_file_of(declaration);

        let mut names: Vec<String> = Vec::new();
        let mut outermost = SymbolId::NONE;
        let mut module_name: Option<String> = None;
        let mut current = if is_module {
            declaration
        } else {
            arena.parent(declaration)
        };
        let mut hops = 0u32;

        while let Some(node) = arena.get(current) {
            if node.kind == SyntaxKind::SourceFile {
                break;
            }
            hops += 1;
            if hops > MAX_ANCESTOR_WALK {
                return Err(SchemaError::RecursionLimit {
                    text: self.text(declaration),
                });
            }
            if let Some(module) = arena.get_module(current) {
                if node.flags & node_flags::GLOBAL_AUGMENTATION != 0 {
                    module_name = Some(GLOBAL_MODULE_NAME.to_string());
                    break;
                }
                let symbol = self.fe.symbol_at(current).unwrap_or(SymbolId::NONE);
                if let Some(name) = self.namespace_modules.get(&symbol) {
                    module_name = Some(name.clone());
                    break;
                }
                let text = arena.identifier_text(module.name).unwrap_or_default();
                let at_file_scope = arena.kind(node.parent) == Some(SyntaxKind::SourceFile);
                let is_string_name = arena.kind(module.name) == Some(SyntaxKind::StringLiteral);
                if at_file_scope && (is_string_name || self.globals.is_ambient_module(text)) {
                    module_name = Some(self.ambient_module_name(file, text));
                    break;
                }
                names.push(text.to_string());
                outermost = symbol;
            }
            current = node.parent;
        }
        names.reverse();

        let module_name = match module_name {
            Some(name) => name,
            None => self.file_module_name(file, names.first(), outermost),
        };
        let mut container = self.registry.get_or_create_module(&module_name);
        for name in &names {
            container = self.registry.get_or_create_namespace(container, name);
        }
        Ok(container)
    }

    /// Module name for declarations owned directly by `file`.
    fn file_module_name(
        &mut self,
        file: NodeIndex,
        outermost_name: Option<&String>,
        outermost: SymbolId,
    ) -> String {
        let file_name = self.file_name(file);
        let is_global_namespace = outermost_name.is_some_and(|name| {
            outermost.is_some() && self.globals.namespace_symbol(name) == Some(outermost)
        });
        if self.options.is_lib_file(file_name)
            || !self.is_external_module(file)
            || is_global_namespace
        {
            GLOBAL_MODULE_NAME.to_string()
        } else {
            self.options.module_name_for(file_name)
        }
    }

    /// Name of an ambient `declare module "x"`; relative names are rewritten
    /// with the configured prefix.
    pub(crate) fn ambient_module_name(&self, file: NodeIndex, text: &str) -> String {
        match &self.options.relative_prefix {
            Some(prefix) if text.starts_with("./") => prefix.apply(self.file_name(file), text),
            _ => text.to_string(),
        }
    }

    // =========================================================================
    // Typed helpers
    // =========================================================================

    pub(crate) fn resolve_constructor(
        &mut self,
        symbol: SymbolId,
        at: NodeIndex,
    ) -> Result<ConstructorId> {
        match self.resolve_symbol(symbol, false)? {
            Reference::Constructor(id) => Ok(id),
            other => Err(self.unexpected(at, "type constructor", other)),
        }
    }

    pub(crate) fn resolve_enum(&mut self, symbol: SymbolId, at: NodeIndex) -> Result<EnumId> {
        match self.resolve_symbol(symbol, false)? {
            Reference::Enum(id) => Ok(id),
            other => Err(self.unexpected(at, "enum", other)),
        }
    }

    pub(crate) fn resolve_value(&mut self, declaration: NodeIndex) -> Result<ValueId> {
        match self.resolve_declaration(declaration, false)? {
            Reference::Value(id) => Ok(id),
            other => Err(self.unexpected(declaration, "value", other)),
        }
    }

    pub(crate) fn unexpected(
        &self,
        at: NodeIndex,
        expected: &'static str,
        found: Reference,
    ) -> SchemaError {
        SchemaError::UnexpectedReference {
            text: self.text(at),
            expected,
            found: reference_kind(found),
        }
    }

    /// Reference with one `any` argument per declared type parameter.
    pub(crate) fn close_reference(&self, constructor: ConstructorId) -> SchemaType {
        let arity = self
            .registry
            .schema()
            .constructor(constructor)
            .type_parameters
            .len();
        SchemaType::Reference(TypeReference {
            constructor,
            type_arguments: vec![SchemaType::any(); arity],
        })
    }

    /// `Array<element>` against the global `Array` interface.
    pub(crate) fn array_reference(&mut self, element: SchemaType) -> Result<SchemaType> {
        let constructor = match self.globals.type_symbol("Array") {
            Some(symbol) if self.symbol_has_flags(symbol, symbol_flags::INTERFACE) => {
                self.resolve_constructor(symbol, NodeIndex::NONE)?
            }
            _ => {
                let global = self.global_module();
                let (id, _) = self.registry.get_or_create_constructor(
                    global,
                    ConstructorKind::Interface,
                    "Array",
                    vec!["T".to_string()],
                );
                id
            }
        };
        Ok(SchemaType::Reference(TypeReference {
            constructor,
            type_arguments: vec![element],
        }))
    }

    pub(crate) fn symbol_has_flags(&self, symbol: SymbolId, flags: u32) -> bool {
        self.symbol(symbol).is_some_and(|sym| sym.has_any_flags(flags))
    }
}

pub(crate) fn reference_kind(reference: Reference) -> &'static str {
    match reference {
        Reference::Container(_) => "container",
        Reference::Constructor(_) => "type constructor",
        Reference::Enum(_) => "enum",
        Reference::Value(_) => "value",
    }
}

#[cfg(test)]
#[path = "../tests/reference_tests.rs"]
mod tests;
