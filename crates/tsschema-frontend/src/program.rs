//! In-memory `Program`: a fully bound and checked program held in tables.
//!
//! Built with `ProgramBuilder`. Implements `FrontEnd` so the resolver can run
//! without a parser or checker in the loop.

use rustc_hash::FxHashMap;

use crate::base::{CheckedTypeId, NodeIndex, SymbolId};
use crate::checked_types::CheckedType;
use crate::node_arena::NodeArena;
use crate::oracle::FrontEnd;
use crate::symbols::{Symbol, SymbolArena, SymbolTable, symbol_flags};
use tsschema_common::limits::MAX_ANCESTOR_WALK;

#[derive(Clone, Debug, Default)]
pub struct Program {
    pub(crate) arena: NodeArena,
    pub(crate) symbols: SymbolArena,
    pub(crate) types: Vec<CheckedType>,
    pub(crate) source_files: Vec<NodeIndex>,
    pub(crate) node_symbols: FxHashMap<NodeIndex, SymbolId>,
    pub(crate) node_types: FxHashMap<NodeIndex, CheckedTypeId>,
    pub(crate) return_types: FxHashMap<NodeIndex, CheckedTypeId>,
    pub(crate) file_locals: FxHashMap<NodeIndex, SymbolTable>,
    pub(crate) array_type: Option<CheckedTypeId>,
}

impl Program {
    pub fn symbols(&self) -> &SymbolArena {
        &self.symbols
    }

    /// File-scope symbols of `file`.
    pub fn file_locals(&self, file: NodeIndex) -> Option<&SymbolTable> {
        self.file_locals.get(&file)
    }

    /// Source file whose name is exactly `file_name`.
    pub fn source_file_named(&self, file_name: &str) -> Option<NodeIndex> {
        self.source_files.iter().copied().find(|&file| {
            self.arena
                .get_source_file(file)
                .is_some_and(|sf| sf.file_name == file_name)
        })
    }
}

impl FrontEnd for Program {
    fn arena(&self) -> &NodeArena {
        &self.arena
    }

    fn source_files(&self) -> &[NodeIndex] {
        &self.source_files
    }

    fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    fn checked_type(&self, id: CheckedTypeId) -> Option<&CheckedType> {
        self.types.get(id.0 as usize)
    }

    fn symbol_at(&self, node: NodeIndex) -> Option<SymbolId> {
        self.node_symbols.get(&node).copied()
    }

    fn type_at(&self, node: NodeIndex) -> Option<CheckedTypeId> {
        self.node_types.get(&node).copied()
    }

    fn aliased_symbol(&self, symbol: SymbolId) -> SymbolId {
        let mut current = symbol;
        for _ in 0..MAX_ANCESTOR_WALK {
            match self.symbols.get(current) {
                Some(sym)
                    if sym.flags & symbol_flags::ALIAS != 0 && sym.alias_target.is_some() =>
                {
                    current = sym.alias_target;
                }
                _ => return current,
            }
        }
        current
    }

    fn signature_return_type(&self, declaration: NodeIndex) -> Option<CheckedTypeId> {
        self.return_types.get(&declaration).copied()
    }

    fn symbols_in_scope(&self, file: NodeIndex, flags: u32) -> Vec<SymbolId> {
        let Some(locals) = self.file_locals.get(&file) else {
            return Vec::new();
        };
        locals
            .values()
            .copied()
            .filter(|&id| {
                self.symbols
                    .get(id)
                    .is_some_and(|sym| sym.flags & flags != 0)
            })
            .collect()
    }

    fn is_array_type(&self, ty: CheckedTypeId) -> bool {
        let Some(array) = self.array_type else {
            return false;
        };
        ty == array || self.types.get(ty.0 as usize).is_some_and(|t| t.target == Some(array))
    }
}
