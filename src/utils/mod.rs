mod chain;
mod symbol_table;

pub use chain::{Chain, NodeId};
pub use symbol_table::{Symbol, SymbolTable};
