use std::fmt::{self, Display, Formatter};

use super::structs::{Operand, VirtualRegister};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    SDiv,
    SRem,
    And,
    Or,
    Xor,
    Shl,
    AShr,
    LShr,
}

impl BinaryOperator {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "add",
            BinaryOperator::Sub => "sub",
            BinaryOperator::Mul => "mul",
            BinaryOperator::SDiv => "sdiv",
            BinaryOperator::SRem => "srem",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Xor => "xor",
            BinaryOperator::Shl => "shl",
            BinaryOperator::AShr => "ashr",
            BinaryOperator::LShr => "lshr",
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Alloca {
        var: String,
    },
    Load {
        var: String,
        out: VirtualRegister,
    },
    Store {
        value: Operand,
        var: String,
    },
    BinaryOperation {
        operator: BinaryOperator,
        arg1: Operand,
        arg2: Operand,
        out: VirtualRegister,
    },
    Print {
        value: Operand,
    },
}

impl Instruction {
    /// Register defined by this instruction, if any.
    pub fn out(&self) -> Option<VirtualRegister> {
        match self {
            Instruction::Load { out, .. } | Instruction::BinaryOperation { out, .. } => Some(*out),
            Instruction::Alloca { .. } | Instruction::Store { .. } | Instruction::Print { .. } => {
                None
            }
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Alloca { var } => write!(f, "%{var} = alloca i32"),
            Instruction::Load { var, out } => write!(f, "{out} = load i32, i32* %{var}"),
            Instruction::Store { value, var } => write!(f, "store i32 {value}, i32* %{var}"),
            Instruction::BinaryOperation {
                operator,
                arg1,
                arg2,
                out,
            } => write!(f, "{out} = {operator} i32 {arg1}, {arg2}"),
            Instruction::Print { value } => write!(
                f,
                "call i32 (i8*, ...) @printf(i8* getelementptr ([4 x i8], [4 x i8]* @print.str, i32 0, i32 0), i32 {value})"
            ),
        }
    }
}
