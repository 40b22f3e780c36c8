use std::collections::HashMap;

use thiserror::Error;

use super::instructions::{BinaryOperator, Instruction};
use super::structs::{Module, Operand, VirtualRegister};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpretError {
    #[error("`%{0}` is used without being allocated")]
    UnallocatedVariable(String),

    #[error("{0} is read before it is defined")]
    UndefinedRegister(VirtualRegister),

    #[error("`{operator} i32 {lhs}, {rhs}` has undefined behaviour")]
    UndefinedBehaviour {
        operator: BinaryOperator,
        lhs: i32,
        rhs: i32,
    },
}

/// Applies `operator` with 32-bit wraparound semantics.
///
/// Shift amounts outside `0..32` shift every bit out. That is a modelling
/// choice of this interpreter: the emitted `shl`/`ashr`/`lshr` produce poison
/// for such amounts, so compiled programs relying on it are not portable.
pub fn evaluate(operator: BinaryOperator, lhs: i32, rhs: i32) -> Result<i32, InterpretError> {
    let undefined = || InterpretError::UndefinedBehaviour { operator, lhs, rhs };
    let amount = u32::try_from(rhs).ok().filter(|&amount| amount < 32);
    Ok(match operator {
        BinaryOperator::Add => lhs.wrapping_add(rhs),
        BinaryOperator::Sub => lhs.wrapping_sub(rhs),
        BinaryOperator::Mul => lhs.wrapping_mul(rhs),
        BinaryOperator::SDiv => lhs.checked_div(rhs).ok_or_else(undefined)?,
        BinaryOperator::SRem => lhs.checked_rem(rhs).ok_or_else(undefined)?,
        BinaryOperator::And => lhs & rhs,
        BinaryOperator::Or => lhs | rhs,
        BinaryOperator::Xor => lhs ^ rhs,
        BinaryOperator::Shl => amount.map_or(0, |amount| lhs << amount),
        BinaryOperator::AShr => lhs >> amount.unwrap_or(31),
        BinaryOperator::LShr => amount.map_or(0, |amount| ((lhs as u32) >> amount) as i32),
    })
}

/// Runs the instructions of `module` in order and returns every printed value.
pub fn interpret(module: &Module) -> Result<Vec<i32>, InterpretError> {
    let mut memory: HashMap<&str, i32> = HashMap::new();
    let mut registers: HashMap<VirtualRegister, i32> = HashMap::new();
    let mut printed = vec![];

    let read = |registers: &HashMap<VirtualRegister, i32>, operand: &Operand| match *operand {
        Operand::Immediate(value) => Ok(value),
        Operand::Register(reg) => registers
            .get(&reg)
            .copied()
            .ok_or(InterpretError::UndefinedRegister(reg)),
    };

    for inst in &module.instructions {
        match inst {
            Instruction::Alloca { var } => {
                memory.insert(var.as_str(), 0);
            }
            Instruction::Load { var, out } => {
                let value = *memory
                    .get(var.as_str())
                    .ok_or_else(|| InterpretError::UnallocatedVariable(var.clone()))?;
                registers.insert(*out, value);
            }
            Instruction::Store { value, var } => {
                let value = read(&registers, value)?;
                let slot = memory
                    .get_mut(var.as_str())
                    .ok_or_else(|| InterpretError::UnallocatedVariable(var.clone()))?;
                *slot = value;
            }
            Instruction::BinaryOperation {
                operator,
                arg1,
                arg2,
                out,
            } => {
                let value = evaluate(*operator, read(&registers, arg1)?, read(&registers, arg2)?)?;
                registers.insert(*out, value);
            }
            Instruction::Print { value } => printed.push(read(&registers, value)?),
        }
    }

    Ok(printed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_wraps() {
        assert_eq!(evaluate(BinaryOperator::Add, i32::MAX, 1), Ok(i32::MIN));
        assert_eq!(evaluate(BinaryOperator::Mul, 65536, 65536), Ok(0));
        assert_eq!(evaluate(BinaryOperator::SDiv, 7, 2), Ok(3));
        assert_eq!(evaluate(BinaryOperator::SDiv, -7, 2), Ok(-3));
        assert_eq!(evaluate(BinaryOperator::SRem, -7, 2), Ok(-1));
    }

    #[test]
    fn division_by_zero_is_reported() {
        assert!(matches!(
            evaluate(BinaryOperator::SDiv, 1, 0),
            Err(InterpretError::UndefinedBehaviour { .. })
        ));
        assert!(evaluate(BinaryOperator::SRem, i32::MIN, -1).is_err());
    }

    #[test]
    fn shifts_distinguish_arithmetic_and_logical() {
        assert_eq!(evaluate(BinaryOperator::AShr, -8, 1), Ok(-4));
        assert_eq!(evaluate(BinaryOperator::LShr, -8, 28), Ok(15));
        assert_eq!(evaluate(BinaryOperator::Shl, 1, 31), Ok(i32::MIN));
        assert_eq!(evaluate(BinaryOperator::LShr, -1, 32), Ok(0));
        assert_eq!(evaluate(BinaryOperator::Shl, -1, 40), Ok(0));
        assert_eq!(evaluate(BinaryOperator::AShr, -5, 32), Ok(-1));
        assert_eq!(evaluate(BinaryOperator::AShr, 5, -1), Ok(0));
    }

    #[test]
    fn runs_loads_and_stores() {
        let mut module = Module::new();
        let loaded = module.new_reg();
        let sum = module.new_reg();
        module.push(Instruction::Alloca { var: "a".into() });
        module.push(Instruction::Store {
            value: Operand::Immediate(40),
            var: "a".into(),
        });
        module.push(Instruction::Load {
            var: "a".into(),
            out: loaded,
        });
        module.push(Instruction::BinaryOperation {
            operator: BinaryOperator::Add,
            arg1: loaded.into(),
            arg2: Operand::Immediate(2),
            out: sum,
        });
        module.push(Instruction::Print { value: sum.into() });
        assert_eq!(interpret(&module), Ok(vec![42]));
    }

    #[test]
    fn unallocated_slots_are_errors() {
        let mut module = Module::new();
        let out = module.new_reg();
        module.push(Instruction::Load {
            var: "z".into(),
            out,
        });
        assert_eq!(
            interpret(&module),
            Err(InterpretError::UnallocatedVariable("z".to_string()))
        );
    }
}
