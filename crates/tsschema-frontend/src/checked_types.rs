//! Checked types as produced by the type checker.

use crate::base::{CheckedTypeId, SymbolId};

/// The checker's classification of a type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Any,
    String,
    Number,
    Boolean,
    Void,
    ESSymbol,
    StringLiteral,
    NumberLiteral,
    BooleanLiteral,
    Undefined,
    Null,
    Never,
    Unknown,
    /// The `object` keyword type.
    NonPrimitive,
    BigInt,
    Enum,
    /// Type of a single enum member; its symbol's parent is the enum.
    EnumLiteral,
    /// Declared type of a class.
    Class,
    /// Declared type of an interface.
    Interface,
    /// Instantiation of a generic class or interface (`target` + arguments).
    Reference,
    TypeParameter,
    Tuple,
    Union,
    Intersection,
    /// Structural type; its symbol's first declaration says where it came from.
    Anonymous,
    Index,
    IndexedAccess,
    Conditional,
}

#[derive(Clone, Debug)]
pub struct CheckedType {
    pub category: TypeCategory,
    pub symbol: SymbolId,
    /// Own type parameters of a generic declared type.
    pub type_parameters: Vec<CheckedTypeId>,
    /// Generic target of a `Reference`.
    pub target: Option<CheckedTypeId>,
    pub type_arguments: Vec<CheckedTypeId>,
    /// Tuple elements, or union / intersection constituents.
    pub elements: Vec<CheckedTypeId>,
}

impl CheckedType {
    pub fn new(category: TypeCategory) -> CheckedType {
        CheckedType {
            category,
            symbol: SymbolId::NONE,
            type_parameters: Vec::new(),
            target: None,
            type_arguments: Vec::new(),
            elements: Vec::new(),
        }
    }

    pub fn with_symbol(category: TypeCategory, symbol: SymbolId) -> CheckedType {
        CheckedType {
            symbol,
            ..CheckedType::new(category)
        }
    }

    /// Generic declared types carry their own type parameter list.
    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }
}
