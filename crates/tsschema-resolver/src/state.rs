//! Resolver state: the single context every resolution step runs against.
//!
//! Reference resolution, type materialization, declaration population and
//! expression materialization are mutually recursive. Each lives in its own
//! file as an `impl ResolverState` block; this file holds the shared fields
//! and small helpers used by all of them.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;
use tsschema_common::limits::{MAX_EXPRESSION_DEPTH, MAX_MATERIALIZE_DEPTH};
use tsschema_common::{GLOBAL_MODULE_NAME, ResolverOptions};
use tsschema_frontend::{
    CheckedType, CheckedTypeId, FrontEnd, ModifierFlags, NodeArena, NodeIndex, Symbol, SymbolId,
    SyntaxKind,
};
use tsschema_model::{ContainerId, Schema};

use crate::error::{Result, SchemaError};
use crate::globals::GlobalScope;
use crate::registry::ContainerRegistry;

pub struct ResolverState<'a, F: FrontEnd + ?Sized> {
    pub(crate) fe: &'a F,
    pub(crate) options: &'a ResolverOptions,
    pub(crate) registry: ContainerRegistry,
    pub(crate) globals: GlobalScope,
    /// Namespace symbol -> module name, for `export = NS` files.
    pub(crate) namespace_modules: FxHashMap<SymbolId, String>,
    /// Declarations already populated into their stubs.
    pub(crate) populated: FxHashSet<NodeIndex>,
    /// Declarations whose stubs were created but not yet populated.
    pub(crate) pending: VecDeque<NodeIndex>,
    /// `export *` targets already expanded, per container.
    pub(crate) expanded_exports: FxHashSet<(ContainerId, SymbolId)>,
    external_modules: FxHashMap<NodeIndex, bool>,
    depth: u32,
    expression_depth: u32,
}

impl<'a, F: FrontEnd + ?Sized> ResolverState<'a, F> {
    pub fn new(fe: &'a F, options: &'a ResolverOptions) -> ResolverState<'a, F> {
        let globals = GlobalScope::capture(fe, options);
        let mut state = ResolverState {
            fe,
            options,
            registry: ContainerRegistry::new(),
            globals,
            namespace_modules: FxHashMap::default(),
            populated: FxHashSet::default(),
            pending: VecDeque::new(),
            expanded_exports: FxHashSet::default(),
            external_modules: FxHashMap::default(),
            depth: 0,
            expression_depth: 0,
        };
        state.collect_namespace_modules();
        state
    }

    pub fn into_schema(self) -> Schema {
        self.registry.into_schema()
    }

    pub fn schema(&self) -> &Schema {
        self.registry.schema()
    }

    // =========================================================================
    // Front-end access
    // =========================================================================

    #[inline]
    pub(crate) fn arena(&self) -> &'a NodeArena {
        self.fe.arena()
    }

    #[inline]
    pub(crate) fn kind(&self, node: NodeIndex) -> Option<SyntaxKind> {
        self.arena().kind(node)
    }

    #[inline]
    pub(crate) fn symbol(&self, id: SymbolId) -> Option<&'a Symbol> {
        self.fe.symbol(id)
    }

    #[inline]
    pub(crate) fn checked(&self, id: CheckedTypeId) -> Option<&'a CheckedType> {
        self.fe.checked_type(id)
    }

    pub(crate) fn has_modifier(&self, node: NodeIndex, modifier: ModifierFlags) -> bool {
        self.arena().modifiers(node).contains(modifier)
    }

    pub(crate) fn text(&self, node: NodeIndex) -> String {
        self.arena().node_text(node)
    }

    pub(crate) fn file_name(&self, file: NodeIndex) -> &'a str {
        self.fe.file_name(file).unwrap_or_default()
    }

    pub(crate) fn global_module(&mut self) -> ContainerId {
        self.registry.get_or_create_module(GLOBAL_MODULE_NAME)
    }

    /// A file is an external module when any top-level statement exports.
    pub(crate) fn is_external_module(&mut self, file: NodeIndex) -> bool {
        if let Some(&known) = self.external_modules.get(&file) {
            return known;
        }
        let arena = self.arena();
        let external = arena.get_source_file(file).is_some_and(|sf| {
            sf.statements.iter().any(|&stmt| {
                matches!(
                    arena.kind(stmt),
                    Some(SyntaxKind::ExportAssignment | SyntaxKind::ExportDeclaration)
                ) || arena.modifiers(stmt).contains(ModifierFlags::EXPORT)
            })
        });
        self.external_modules.insert(file, external);
        external
    }

    // =========================================================================
    // Recursion guards
    // =========================================================================

    /// Run `f` one materialization level deeper.
    pub(crate) fn guarded<T>(
        &mut self,
        node: NodeIndex,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        if self.depth >= MAX_MATERIALIZE_DEPTH {
            return Err(SchemaError::RecursionLimit {
                text: self.text(node),
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Like `guarded`, for expressions. Returns `None` past the limit so the
    /// caller can fall back to an opaque expression.
    pub(crate) fn expression_guarded<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Option<Result<T>> {
        if self.expression_depth >= MAX_EXPRESSION_DEPTH {
            return None;
        }
        self.expression_depth += 1;
        let result = f(self);
        self.expression_depth -= 1;
        Some(result)
    }

    // =========================================================================
    // Worklist
    // =========================================================================

    /// Queue every declaration of the symbol declared by `declaration`.
    pub(crate) fn schedule(&mut self, declaration: NodeIndex) {
        let declarations = self
            .fe
            .symbol_at(declaration)
            .and_then(|sym| self.symbol(sym))
            .map(|sym| sym.declarations.as_slice())
            .filter(|decls| !decls.is_empty());
        match declarations {
            Some(decls) => self.pending.extend(decls.iter().copied()),
            None => self.pending.push_back(declaration),
        }
    }

    /// Whether `declaration` still needs populating; marks it as done.
    pub(crate) fn begin_populate(&mut self, declaration: NodeIndex) -> bool {
        self.populated.insert(declaration)
    }

    pub(crate) fn drain_pending(&mut self) -> Result<()> {
        while let Some(declaration) = self.pending.pop_front() {
            if self.populated.contains(&declaration) {
                continue;
            }
            trace!(declaration = ?declaration, "populating queued declaration");
            self.populate_declaration(declaration)?;
        }
        Ok(())
    }
}
