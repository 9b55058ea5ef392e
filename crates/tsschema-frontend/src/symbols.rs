//! Symbols: the front-end's resolved identity for a name.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::base::{NodeIndex, SymbolId};

/// Symbol flags, using the checker's bit layout.
pub mod symbol_flags {
    pub const NONE: u32 = 0;
    pub const FUNCTION_SCOPED_VARIABLE: u32 = 1 << 0;
    pub const BLOCK_SCOPED_VARIABLE: u32 = 1 << 1;
    pub const PROPERTY: u32 = 1 << 2;
    pub const ENUM_MEMBER: u32 = 1 << 3;
    pub const FUNCTION: u32 = 1 << 4;
    pub const CLASS: u32 = 1 << 5;
    pub const INTERFACE: u32 = 1 << 6;
    pub const CONST_ENUM: u32 = 1 << 7;
    pub const REGULAR_ENUM: u32 = 1 << 8;
    pub const VALUE_MODULE: u32 = 1 << 9;
    pub const NAMESPACE_MODULE: u32 = 1 << 10;
    pub const TYPE_LITERAL: u32 = 1 << 11;
    pub const OBJECT_LITERAL: u32 = 1 << 12;
    pub const METHOD: u32 = 1 << 13;
    pub const CONSTRUCTOR: u32 = 1 << 14;
    pub const GET_ACCESSOR: u32 = 1 << 15;
    pub const SET_ACCESSOR: u32 = 1 << 16;
    pub const SIGNATURE: u32 = 1 << 17;
    pub const TYPE_PARAMETER: u32 = 1 << 18;
    pub const TYPE_ALIAS: u32 = 1 << 19;
    pub const ALIAS: u32 = 1 << 21;

    pub const ENUM: u32 = REGULAR_ENUM | CONST_ENUM;
    pub const VARIABLE: u32 = FUNCTION_SCOPED_VARIABLE | BLOCK_SCOPED_VARIABLE;
    pub const VALUE: u32 = VARIABLE
        | PROPERTY
        | ENUM_MEMBER
        | OBJECT_LITERAL
        | FUNCTION
        | CLASS
        | ENUM
        | VALUE_MODULE
        | METHOD
        | GET_ACCESSOR
        | SET_ACCESSOR;
    pub const TYPE: u32 =
        CLASS | INTERFACE | ENUM | ENUM_MEMBER | TYPE_LITERAL | TYPE_PARAMETER | TYPE_ALIAS;
    pub const NAMESPACE: u32 = VALUE_MODULE | NAMESPACE_MODULE | ENUM;
    pub const MODULE: u32 = VALUE_MODULE | NAMESPACE_MODULE;
}

/// Name -> symbol, in declaration order.
pub type SymbolTable = IndexMap<String, SymbolId, FxBuildHasher>;

#[derive(Clone, Debug)]
pub struct Symbol {
    /// Ambient string modules keep their quotes (`"fs"`).
    pub escaped_name: String,
    pub flags: u32,
    pub declarations: Vec<NodeIndex>,
    pub value_declaration: NodeIndex,
    pub parent: SymbolId,
    pub exports: Option<SymbolTable>,
    /// Target of an `ALIAS` symbol.
    pub alias_target: SymbolId,
}

impl Symbol {
    pub fn new(escaped_name: impl Into<String>, flags: u32) -> Symbol {
        Symbol {
            escaped_name: escaped_name.into(),
            flags,
            declarations: Vec::new(),
            value_declaration: NodeIndex::NONE,
            parent: SymbolId::NONE,
            exports: None,
            alias_target: SymbolId::NONE,
        }
    }

    #[inline]
    pub fn has_any_flags(&self, flags: u32) -> bool {
        self.flags & flags != 0
    }

    /// Name with surrounding quotes removed, when it is a quoted module name.
    pub fn unquoted_name(&self) -> Option<&str> {
        let name = self.escaped_name.as_str();
        let quoted = (name.starts_with('"') && name.ends_with('"'))
            || (name.starts_with('\'') && name.ends_with('\''));
        if quoted && name.len() >= 2 {
            Some(&name[1..name.len() - 1])
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> SymbolArena {
        SymbolArena::default()
    }

    pub fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    #[inline]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        if id.is_none() {
            return None;
        }
        self.symbols.get(id.0 as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        if id.is_none() {
            return None;
        }
        self.symbols.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
