//! Traversal driver: walks every source file's exports into the schema.
//!
//! - External modules contribute their exported declarations; script files
//!   contribute everything to the global module `""`.
//! - `declare module "x"` blocks at global scope become modules of their own.
//! - Namespaces become nested containers; declared-ness is inherited.
//! - Export clauses, `export *` and `export =` are followed through the
//!   front-end's export tables.
//!
//! Stubs first seen by reference are populated from the worklist after
//! each file.

use tracing::{debug, trace};
use tsschema_common::GLOBAL_MODULE_NAME;
use tsschema_frontend::{
    EXPORT_EQUALS_SYMBOL, EXPORT_STAR_SYMBOL, FrontEnd, ModifierFlags, NodeIndex, SymbolId,
    SyntaxKind, node_flags, symbol_flags,
};
use tsschema_model::{ContainerId, Reference};

use crate::error::Result;
use crate::state::ResolverState;

impl<'a, F: FrontEnd + ?Sized> ResolverState<'a, F> {
    pub(crate) fn process_program(&mut self) -> Result<()> {
        let fe = self.fe;
        for &file in fe.source_files() {
            self.process_source_file(file)?;
        }
        self.drain_pending()
    }

    pub(crate) fn process_source_file(&mut self, file: NodeIndex) -> Result<()> {
        let file_name = self.file_name(file);
        let (container, declared) = if self.is_external_module(file) {
            let module_name = self.options.module_name_for(file_name);
            (self.registry.get_or_create_module(&module_name), false)
        } else {
            (self.global_module(), true)
        };
        debug!(file = %file_name, ?container, declared, "processing source file");

        let statements = self
            .arena()
            .get_source_file(file)
            .map(|sf| sf.statements.as_slice())
            .unwrap_or_default();
        self.process_statements(container, statements, declared)?;
        self.drain_pending()
    }

    /// Statements of a file or module block. Non-exported declarations are
    /// only taken in declared contexts and in the global module.
    fn process_statements(
        &mut self,
        container: ContainerId,
        statements: &[NodeIndex],
        declared: bool,
    ) -> Result<()> {
        let is_global = self.schema().module(GLOBAL_MODULE_NAME) == Some(container);
        for &statement in statements {
            match self.kind(statement) {
                Some(SyntaxKind::ExportAssignment) => {
                    self.process_export_assignment(container, statement)?;
                }
                Some(SyntaxKind::ExportDeclaration) => {
                    self.process_export_declaration(container, statement)?;
                }
                Some(kind) => {
                    let exported = self.has_modifier(statement, ModifierFlags::EXPORT)
                        || self.arena().flags(statement) & node_flags::GLOBAL_AUGMENTATION != 0;
                    if !(declared || is_global || exported) {
                        continue;
                    }
                    match kind {
                        SyntaxKind::ModuleDeclaration => {
                            self.process_module_declaration(statement, declared)?;
                        }
                        SyntaxKind::ImportEqualsDeclaration => {
                            self.process_import_equals(container, statement)?;
                        }
                        _ => {
                            self.populate_declaration(statement)?;
                            if self.has_modifier(statement, ModifierFlags::DEFAULT) {
                                self.add_default_entry(container, statement)?;
                            }
                        }
                    }
                }
                None => {}
            }
        }
        Ok(())
    }

    fn process_module_declaration(&mut self, declaration: NodeIndex, declared: bool) -> Result<()> {
        let arena = self.arena();
        let Some(module) = arena.get_module(declaration) else {
            return Ok(());
        };

        if arena.flags(declaration) & node_flags::GLOBAL_AUGMENTATION != 0 {
            let global = self.global_module();
            debug!("processing global augmentation");
            return self.process_module_body(global, declaration, true);
        }

        if self.kind(module.name) == Some(SyntaxKind::StringLiteral) {
            let text = arena.identifier_text(module.name).unwrap_or_default();
            let file = arena.source_file_of(declaration);
            let name = self.ambient_module_name(file, text);
            let container = self.registry.get_or_create_module(&name);
            debug!(module = %name, "processing ambient module");
            return self.process_module_body(container, declaration, true);
        }

        let declared = declared || self.has_modifier(declaration, ModifierFlags::DECLARE);
        self.enter_namespace(declaration, declared)
    }

    /// Populate a namespace declaration into its container, once.
    pub(crate) fn enter_namespace(&mut self, declaration: NodeIndex, declared: bool) -> Result<()> {
        if !self.begin_populate(declaration) {
            return Ok(());
        }
        let container = match self.resolve_declaration(declaration, true)? {
            Reference::Container(id) => id,
            other => return Err(self.unexpected(declaration, "container", other)),
        };
        trace!(namespace = %self.text(declaration), ?container, declared, "entering namespace");
        self.process_module_body(container, declaration, declared)
    }

    /// `namespace a.b {}` nests its body as a module declaration.
    fn process_module_body(
        &mut self,
        container: ContainerId,
        declaration: NodeIndex,
        declared: bool,
    ) -> Result<()> {
        let arena = self.arena();
        let body = arena
            .get_module(declaration)
            .map(|module| module.body)
            .unwrap_or(NodeIndex::NONE);
        match self.kind(body) {
            Some(SyntaxKind::ModuleBlock) => {
                let statements = arena
                    .get_module_block(body)
                    .map(|block| block.statements.as_slice())
                    .unwrap_or_default();
                self.process_statements(container, statements, declared)
            }
            Some(SyntaxKind::ModuleDeclaration) => self.enter_namespace(body, declared),
            _ => Ok(()),
        }
    }

    // =========================================================================
    // Exports
    // =========================================================================

    /// `export = X` expands X's exports into `container`; `export default X`
    /// records a `default` entry.
    fn process_export_assignment(&mut self, container: ContainerId, statement: NodeIndex) -> Result<()> {
        let Some(assignment) = self.arena().get_export_assignment(statement) else {
            return Ok(());
        };
        let expression = assignment.expression;

        if assignment.is_export_equals {
            let entries = self.export_table_of(expression);
            return self.process_symbol_table(container, entries);
        }

        let Some(symbol) = self.fe.symbol_at(expression) else {
            debug!(expression = %self.text(expression), "default export of an expression, skipped");
            return Ok(());
        };
        let target = self.fe.aliased_symbol(symbol);
        let reference = self.resolve_symbol(target, self.is_module_symbol(target))?;
        self.registry.add_entry(container, "default", reference);
        Ok(())
    }

    /// `export default class X {}` and friends: the declaration keeps its
    /// own name and is also listed as `default`.
    fn add_default_entry(&mut self, container: ContainerId, statement: NodeIndex) -> Result<()> {
        if !matches!(
            self.kind(statement),
            Some(
                SyntaxKind::ClassDeclaration
                    | SyntaxKind::InterfaceDeclaration
                    | SyntaxKind::FunctionDeclaration
            )
        ) {
            return Ok(());
        }
        let reference = self.resolve_declaration(statement, false)?;
        self.registry.add_entry(container, "default", reference);
        Ok(())
    }

    fn export_table_of(&self, expression: NodeIndex) -> Vec<(String, SymbolId)> {
        let from_type = self
            .fe
            .type_at(expression)
            .and_then(|ty| self.checked(ty))
            .map(|ty| ty.symbol)
            .filter(|sym| sym.is_some());
        let from_symbol = self
            .fe
            .symbol_at(expression)
            .map(|sym| self.fe.aliased_symbol(sym));

        [from_type, from_symbol]
            .into_iter()
            .flatten()
            .find_map(|sym| self.symbol(sym).and_then(|s| s.exports.as_ref()))
            .map(|exports| {
                exports
                    .iter()
                    .map(|(name, &sym)| (name.clone(), sym))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `export { a, b as c } [from "m"]` and `export * from "m"`. A star
    /// export never forwards `default`.
    fn process_export_declaration(
        &mut self,
        container: ContainerId,
        statement: NodeIndex,
    ) -> Result<()> {
        let arena = self.arena();
        let Some(export) = arena.get_export_decl(statement) else {
            return Ok(());
        };

        let Some(specifiers) = &export.export_clause else {
            let Some(module) = self.fe.symbol_at(export.module_specifier) else {
                debug!(statement = %self.text(statement), "unresolved export *, skipped");
                return Ok(());
            };
            let module = self.fe.aliased_symbol(module);
            if !self.expanded_exports.insert((container, module)) {
                return Ok(());
            }
            let entries = self
                .symbol(module)
                .and_then(|sym| sym.exports.as_ref())
                .map(|exports| {
                    exports
                        .iter()
                        .filter(|(name, _)| name.as_str() != "default")
                        .map(|(name, &sym)| (name.clone(), sym))
                        .collect()
                })
                .unwrap_or_default();
            return self.process_symbol_table(container, entries);
        };

        for &specifier in specifiers {
            let Some(name) = arena.declaration_name_text(specifier) else {
                continue;
            };
            let Some(alias) = self.fe.symbol_at(specifier) else {
                continue;
            };
            let target = self.fe.aliased_symbol(alias);
            if target == alias {
                debug!(name = %name, "unresolved export specifier, skipped");
                continue;
            }
            let reference = self.resolve_symbol(target, self.is_module_symbol(target))?;
            self.registry.add_entry(container, &name, reference);
        }
        Ok(())
    }

    /// `export import X = ns.Y`.
    fn process_import_equals(&mut self, container: ContainerId, statement: NodeIndex) -> Result<()> {
        let Some(name) = self.arena().declaration_name_text(statement) else {
            return Ok(());
        };
        let Some(alias) = self.fe.symbol_at(statement) else {
            return Ok(());
        };
        let target = self.fe.aliased_symbol(alias);
        if target == alias {
            return Ok(());
        }
        let reference = self.resolve_symbol(target, self.is_module_symbol(target))?;
        self.registry.add_entry(container, &name, reference);
        Ok(())
    }

    /// Walk an export table into `container`. Declarations whose canonical
    /// home is `container` are populated there; everything else is recorded
    /// as a re-export.
    fn process_symbol_table(
        &mut self,
        container: ContainerId,
        entries: Vec<(String, SymbolId)>,
    ) -> Result<()> {
        for (name, symbol) in entries {
            let Some(sym) = self.symbol(symbol) else {
                continue;
            };
            let is_synthetic = name == EXPORT_STAR_SYMBOL || name == EXPORT_EQUALS_SYMBOL;
            if sym.has_any_flags(symbol_flags::ALIAS) && !is_synthetic {
                let target = self.fe.aliased_symbol(symbol);
                if target == symbol {
                    continue;
                }
                let reference = self.resolve_symbol(target, self.is_module_symbol(target))?;
                self.registry.add_entry(container, &name, reference);
                continue;
            }

            for &declaration in &sym.declarations {
                match self.kind(declaration) {
                    Some(SyntaxKind::ExportDeclaration) => {
                        self.process_export_declaration(container, declaration)?;
                    }
                    Some(SyntaxKind::ExportAssignment) => {
                        self.process_export_assignment(container, declaration)?;
                    }
                    Some(SyntaxKind::CallSignature) | None => {}
                    Some(kind) => {
                        let is_module = kind == SyntaxKind::ModuleDeclaration;
                        let reference = self.resolve_declaration(declaration, is_module)?;
                        if self.schema().parent_of(reference) == Some(container) {
                            if is_module {
                                self.enter_namespace(declaration, true)?;
                            } else {
                                self.populate_declaration(declaration)?;
                            }
                        } else {
                            self.registry.add_entry(container, &name, reference);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn is_module_symbol(&self, symbol: SymbolId) -> bool {
        self.symbol(symbol)
            .and_then(|sym| sym.declarations.first())
            .is_some_and(|&decl| {
                matches!(
                    self.kind(decl),
                    Some(SyntaxKind::ModuleDeclaration | SyntaxKind::SourceFile)
                )
            })
    }
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod tests;
