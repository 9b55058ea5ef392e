//! The front-end contract.
//!
//! The resolver only talks to the front-end through `FrontEnd`: syntax
//! traversal through the arena, plus the checker's oracle queries. Every
//! query is a pure read; the resolver never mutates front-end state.

use crate::base::{CheckedTypeId, NodeIndex, SymbolId};
use crate::checked_types::CheckedType;
use crate::node_arena::NodeArena;
use crate::symbols::Symbol;

pub trait FrontEnd {
    fn arena(&self) -> &NodeArena;

    /// Parsed source files, in program order.
    fn source_files(&self) -> &[NodeIndex];

    fn symbol(&self, id: SymbolId) -> Option<&Symbol>;

    fn checked_type(&self, id: CheckedTypeId) -> Option<&CheckedType>;

    /// Symbol an identifier, name, or declaration resolves to.
    fn symbol_at(&self, node: NodeIndex) -> Option<SymbolId>;

    /// Checked type of a type node, expression, or declaration.
    fn type_at(&self, node: NodeIndex) -> Option<CheckedTypeId>;

    /// Follow an alias chain to its target; non-aliases return themselves.
    fn aliased_symbol(&self, symbol: SymbolId) -> SymbolId;

    /// Return type of the signature declared by `declaration`.
    fn signature_return_type(&self, declaration: NodeIndex) -> Option<CheckedTypeId>;

    /// Symbols visible at file scope in `file` that match `flags`.
    fn symbols_in_scope(&self, file: NodeIndex, flags: u32) -> Vec<SymbolId>;

    /// Whether `ty` is the checker's global array type (`T[]` / `Array<T>`).
    fn is_array_type(&self, ty: CheckedTypeId) -> bool;

    fn for_each_source_file(&self, visit: &mut dyn FnMut(NodeIndex)) {
        for &file in self.source_files() {
            visit(file);
        }
    }

    fn for_each_child(&self, node: NodeIndex, visit: &mut dyn FnMut(NodeIndex)) {
        self.arena().for_each_child(node, |child| visit(child));
    }

    fn file_name(&self, file: NodeIndex) -> Option<&str> {
        self.arena()
            .get_source_file(file)
            .map(|sf| sf.file_name.as_str())
    }
}
