//! Class-scope and subroutine-scope symbol tables.
//!
//! Shape mirrors `assembler::symbol_table`'s name-to-record map, but a Jack
//! symbol table tracks four independently-counted kinds rather than a single
//! variable address space, and two instances (class, subroutine) coexist at
//! once.

use std::collections::HashMap;

use crate::errors::JackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    Static,
    Field,
    Argument,
    Local,
}

impl VarKind {
    /// The VM memory segment a symbol of this kind is addressed through.
    /// `field` is the one kind whose segment name differs from its kind
    /// name: fields live in the `this` segment.
    #[must_use]
    pub fn segment(self) -> &'static str {
        match self {
            VarKind::Static => "static",
            VarKind::Field => "this",
            VarKind::Argument => "argument",
            VarKind::Local => "local",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SymbolRecord {
    pub type_name: String,
    pub kind: VarKind,
    pub index: u16,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, SymbolRecord>,
    counters: HashMap<VarKind, u16>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns [`JackError::DuplicateSymbol`] if `name` is already declared
    /// in this table.
    pub fn add(&mut self, name: &str, type_name: &str, kind: VarKind) -> Result<u16, JackError> {
        if self.symbols.contains_key(name) {
            return Err(JackError::DuplicateSymbol(name.to_string()));
        }
        let index = *self.counters.get(&kind).unwrap_or(&0);
        self.symbols.insert(
            name.to_string(),
            SymbolRecord {
                type_name: type_name.to_string(),
                kind,
                index,
            },
        );
        self.counters.insert(kind, index + 1);
        Ok(index)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SymbolRecord> {
        self.symbols.get(name)
    }

    #[must_use]
    pub fn count(&self, kind: VarKind) -> u16 {
        *self.counters.get(&kind).unwrap_or(&0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_independent_per_kind() {
        let mut table = SymbolTable::new();
        table.add("a", "int", VarKind::Local).unwrap();
        table.add("b", "int", VarKind::Argument).unwrap();
        table.add("c", "int", VarKind::Local).unwrap();
        assert_eq!(table.count(VarKind::Local), 2);
        assert_eq!(table.count(VarKind::Argument), 1);
    }

    #[test]
    fn redeclaring_a_name_in_the_same_table_is_an_error() {
        let mut table = SymbolTable::new();
        table.add("x", "int", VarKind::Local).unwrap();
        let err = table.add("x", "int", VarKind::Local).unwrap_err();
        assert!(matches!(err, JackError::DuplicateSymbol(name) if name == "x"));
    }

    #[test]
    fn field_segment_is_this() {
        assert_eq!(VarKind::Field.segment(), "this");
        assert_eq!(VarKind::Static.segment(), "static");
    }
}
