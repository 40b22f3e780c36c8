use std::collections::HashMap;

use crate::error::CompileError;
use crate::ir::Operand;

/// The operand last stored into an assigned variable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub value: Operand,
}

/// Variables live for the whole compilation run, so the table only ever grows.
#[derive(Debug)]
pub struct SymbolTable {
    symbol_table: HashMap<String, Symbol>,
    capacity: usize,
}

impl SymbolTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            symbol_table: HashMap::new(),
            capacity,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.symbol_table.get(name).copied()
    }

    /// Records `value` as the latest value of `name`. Returns `true` when this
    /// is the first assignment, i.e. the caller still has to allocate storage.
    pub fn assoc(&mut self, name: &str, value: Operand) -> Result<bool, CompileError> {
        if let Some(symbol) = self.symbol_table.get_mut(name) {
            symbol.value = value;
            return Ok(false);
        }
        if self.symbol_table.len() >= self.capacity {
            return Err(CompileError::ResourceExhausted {
                limit: self.capacity,
            });
        }
        self.symbol_table.insert(name.to_string(), Symbol { value });
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.symbol_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbol_table.is_empty()
    }
}
