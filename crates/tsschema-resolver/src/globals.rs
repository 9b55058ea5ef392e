//! The global scope snapshot.
//!
//! Captured once from the lib file before resolution starts:
//! - `types`: every type-meaning symbol declared at lib file scope
//! - `modules`: ambient string modules (`declare module "fs"`), unquoted
//! - `namespaces`: ambient namespaces (`declare namespace NodeJS`)

use rustc_hash::FxHashMap;
use tracing::debug;
use tsschema_common::ResolverOptions;
use tsschema_frontend::{FrontEnd, NodeIndex, SymbolId, symbol_flags};

#[derive(Clone, Debug, Default)]
pub struct GlobalScope {
    types: FxHashMap<String, SymbolId>,
    modules: FxHashMap<String, SymbolId>,
    namespaces: FxHashMap<String, SymbolId>,
}

impl GlobalScope {
    pub fn capture<F: FrontEnd + ?Sized>(frontend: &F, options: &ResolverOptions) -> GlobalScope {
        let mut globals = GlobalScope::default();
        let lib_files: Vec<NodeIndex> = frontend
            .source_files()
            .iter()
            .copied()
            .filter(|&file| {
                frontend
                    .file_name(file)
                    .is_some_and(|name| options.is_lib_file(name))
            })
            .collect();

        for file in lib_files {
            for symbol in frontend.symbols_in_scope(file, symbol_flags::TYPE) {
                if let Some(sym) = frontend.symbol(symbol) {
                    globals
                        .types
                        .entry(sym.escaped_name.clone())
                        .or_insert(symbol);
                }
            }
            for symbol in frontend.symbols_in_scope(file, symbol_flags::MODULE) {
                let Some(sym) = frontend.symbol(symbol) else {
                    continue;
                };
                match sym.unquoted_name() {
                    Some(unquoted) => {
                        globals.modules.entry(unquoted.to_string()).or_insert(symbol);
                    }
                    None => {
                        globals
                            .namespaces
                            .entry(sym.escaped_name.clone())
                            .or_insert(symbol);
                    }
                }
            }
        }

        debug!(
            types = globals.types.len(),
            modules = globals.modules.len(),
            namespaces = globals.namespaces.len(),
            "captured global scope"
        );
        globals
    }

    pub fn type_symbol(&self, name: &str) -> Option<SymbolId> {
        self.types.get(name).copied()
    }

    pub fn is_ambient_module(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn namespace_symbol(&self, name: &str) -> Option<SymbolId> {
        self.namespaces.get(name).copied()
    }
}
