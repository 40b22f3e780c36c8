use std::fmt::{self, Display, Formatter};

use super::instructions::Instruction;

pub const MODULE_PROLOGUE: &str = "; ModuleID = 'advcalc2ir'
declare i32 @printf(i8*, ...)
@print.str = constant [4 x i8] c\"%d\\0A\\00\"

define i32 @main() {
";

pub const MODULE_EPILOGUE: &str = "\n\tret i32 0\n}\n";

/// Output of a whole compilation run. The register counter lives here so that
/// register names are unique across every line of the run.
#[derive(Debug)]
pub struct Module {
    reg_counter: u32,
    pub instructions: Vec<Instruction>,
}

impl Module {
    pub fn new() -> Self {
        Module {
            reg_counter: 0,
            instructions: vec![],
        }
    }

    pub fn new_reg(&mut self) -> VirtualRegister {
        self.reg_counter += 1;
        VirtualRegister {
            index: self.reg_counter,
        }
    }

    pub fn push(&mut self, inst: Instruction) {
        self.instructions.push(inst);
    }

    /// Drops instructions emitted after `len`. Allocated registers are not
    /// handed out again.
    pub fn truncate(&mut self, len: usize) {
        self.instructions.truncate(len);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl Default for Module {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Module {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(MODULE_PROLOGUE)?;
        for inst in &self.instructions {
            writeln!(f, "\t{inst}")?;
        }
        f.write_str(MODULE_EPILOGUE)
    }
}

#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, PartialOrd, Ord)]
pub struct VirtualRegister {
    index: u32,
}

impl VirtualRegister {
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl Display for VirtualRegister {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "%reg{}", self.index)
    }
}

/// Either a named intermediate or an inline constant.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operand {
    Register(VirtualRegister),
    Immediate(i32),
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(reg) => reg.fmt(f),
            Operand::Immediate(value) => value.fmt(f),
        }
    }
}

impl From<VirtualRegister> for Operand {
    fn from(reg: VirtualRegister) -> Self {
        Operand::Register(reg)
    }
}
