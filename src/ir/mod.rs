mod gen;
mod instructions;
mod interpret;
mod structs;

pub use self::gen::gen_expr;
pub use self::instructions::{BinaryOperator, Instruction};
pub use self::interpret::{evaluate, interpret, InterpretError};
pub use self::structs::{Module, Operand, VirtualRegister, MODULE_EPILOGUE, MODULE_PROLOGUE};
