use log::{debug, trace, warn};

use crate::error::{CompileError, Diagnostic};
use crate::frontend::{check_assignment, check_expression, desugar, tokenize, LexedLine, TokenKind};
use crate::ir::{gen_expr, Instruction, Module, Operand};
use crate::utils::SymbolTable;

pub const DEFAULT_MAX_VARIABLES: usize = 128;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CompilerOptions {
    pub max_variables: usize,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            max_variables: DEFAULT_MAX_VARIABLES,
        }
    }
}

/// State of one compilation run. Lines are compiled one at a time, in order,
/// into a single module.
#[derive(Debug)]
pub struct Compiler {
    module: Module,
    symbols: SymbolTable,
    line: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::with_options(CompilerOptions::default())
    }

    pub fn with_options(options: CompilerOptions) -> Self {
        Compiler {
            module: Module::new(),
            symbols: SymbolTable::with_capacity(options.max_variables),
            line: 0,
            diagnostics: vec![],
        }
    }

    /// Number of the last line handed to the compiler (1-based).
    pub fn line_number(&self) -> usize {
        self.line
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Compiles the next source line. If it fails, whatever it emitted is
    /// dropped again and the session can carry on with the following line.
    pub fn compile_line(&mut self, line: &str) -> Result<(), CompileError> {
        self.line += 1;
        let checkpoint = self.module.len();
        let result = self.gen_line(line);
        if result.is_err() {
            self.module.truncate(checkpoint);
        } else {
            debug!(
                "line {}: {} instructions",
                self.line,
                self.module.len() - checkpoint
            );
        }
        result
    }

    /// Like [`Compiler::compile_line`], but records the failure as a
    /// diagnostic instead of returning it.
    pub fn feed(&mut self, line: &str) -> bool {
        match self.compile_line(line) {
            Ok(()) => true,
            Err(error) => {
                let diagnostic = Diagnostic {
                    line: self.line,
                    error,
                };
                warn!("{diagnostic}");
                self.diagnostics.push(diagnostic);
                false
            }
        }
    }

    /// The finished module, or every diagnostic if any line failed.
    pub fn finish(self) -> Result<Module, Vec<Diagnostic>> {
        if self.diagnostics.is_empty() {
            Ok(self.module)
        } else {
            Err(self.diagnostics)
        }
    }

    fn gen_line(&mut self, line: &str) -> Result<(), CompileError> {
        let LexedLine { mut chain, equals } = tokenize(line)?;
        trace!("line {}: {}", self.line, chain);

        match equals {
            Some(equals) => {
                let rhs = check_assignment(&chain, equals)?;
                let rhs = desugar(&mut chain, rhs, &self.symbols, &mut self.module)?;
                let value = gen_expr(&mut chain, rhs, &mut self.module)?;
                let target = chain.head().ok_or(CompileError::InvalidAssignment)?;
                let name = chain[target].text.clone();
                self.assign(name, value)
            }
            None => {
                let head = chain.head().ok_or(CompileError::MalformedExpression)?;
                check_expression(&chain, head)?;
                if chain[head].kind == TokenKind::EndOfLine {
                    return Ok(());
                }
                let head = desugar(&mut chain, head, &self.symbols, &mut self.module)?;
                let value = gen_expr(&mut chain, head, &mut self.module)?;
                self.module.push(Instruction::Print { value });
                Ok(())
            }
        }
    }

    fn assign(&mut self, name: String, value: Operand) -> Result<(), CompileError> {
        if self.symbols.assoc(&name, value)? {
            debug!("allocating storage for `{name}`");
            self.module.push(Instruction::Alloca { var: name.clone() });
        }
        self.module.push(Instruction::Store { value, var: name });
        Ok(())
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

pub fn compile_lines<'a>(
    lines: impl IntoIterator<Item = &'a str>,
    options: CompilerOptions,
) -> Result<Module, Vec<Diagnostic>> {
    let mut compiler = Compiler::with_options(options);
    for line in lines {
        compiler.feed(line);
    }
    compiler.finish()
}

pub fn compile_source(source: &str) -> Result<Module, Vec<Diagnostic>> {
    compile_lines(source.lines(), CompilerOptions::default())
}
