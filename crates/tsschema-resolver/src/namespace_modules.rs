//! Namespace-as-module pre-pass.
//!
//! `declare namespace NS { ... } export = NS` makes `NS` the module of its
//! file. Every file is scanned before resolution starts so that references
//! into `NS` land in the same module no matter which file is visited first.

use tracing::debug;
use tsschema_frontend::{FrontEnd, SyntaxKind};

use crate::state::ResolverState;

impl<'a, F: FrontEnd + ?Sized> ResolverState<'a, F> {
    pub(crate) fn collect_namespace_modules(&mut self) {
        let fe = self.fe;
        let arena = fe.arena();
        for &file in fe.source_files() {
            let Some(source) = arena.get_source_file(file) else {
                continue;
            };
            for &stmt in &source.statements {
                let Some(assignment) = arena
                    .get_export_assignment(stmt)
                    .filter(|assignment| assignment.is_export_equals)
                else {
                    continue;
                };
                let Some(symbol) = fe.symbol_at(assignment.expression) else {
                    continue;
                };
                let symbol = fe.aliased_symbol(symbol);
                let is_namespace = fe
                    .symbol(symbol)
                    .and_then(|sym| sym.declarations.first())
                    .is_some_and(|&decl| arena.kind(decl) == Some(SyntaxKind::ModuleDeclaration));
                if !is_namespace || self.namespace_modules.contains_key(&symbol) {
                    continue;
                }
                let module_name = self.options.module_name_for(&source.file_name);
                debug!(module = %module_name, ?symbol, "namespace exported as module");
                self.namespace_modules.insert(symbol, module_name);
            }
        }
    }
}
