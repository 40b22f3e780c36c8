//! Compiles a line-oriented integer expression language into LLVM-style
//! textual IR.
//!
//! Every line goes through the same stages:
//! - `frontend::tokenize` builds the token chain for the line,
//! - `frontend::check_assignment` / `frontend::check_expression` validate it,
//! - `frontend::desugar` folds call syntax into infix operators and loads variables,
//! - `ir::gen_expr` reduces the chain by precedence, emitting instructions.
//!
//! [`Compiler`] threads the state shared between lines (symbol table and
//! register counter) through those stages.

pub mod driver;
pub mod error;
pub mod frontend;
pub mod ir;
pub mod utils;

pub use driver::{compile_lines, compile_source, Compiler, CompilerOptions, DEFAULT_MAX_VARIABLES};
pub use error::{CompileError, Diagnostic};
