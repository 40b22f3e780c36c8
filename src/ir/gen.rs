use super::instructions::{BinaryOperator, Instruction};
use super::structs::{Module, Operand, VirtualRegister};
use crate::error::CompileError;
use crate::frontend::{TokenChain, TokenKind};
use crate::utils::NodeId;

/// Operators applied at each level, tightest first. Parenthesised groups are
/// reduced before any of these.
const PRECEDENCE: [&[TokenKind]; 5] = [
    &[TokenKind::Mul, TokenKind::Div, TokenKind::Mod],
    &[TokenKind::Add, TokenKind::Sub],
    &[TokenKind::And],
    &[TokenKind::Or],
    &[
        TokenKind::Xor,
        TokenKind::ShiftLeft,
        TokenKind::ShiftRight,
        TokenKind::RotateLeft,
        TokenKind::RotateRight,
    ],
];

/// A parenthesised group whose closing `)` has not been reached yet.
#[derive(Copy, Clone, Debug)]
struct Group {
    /// The `(` that receives the group's value; `None` for the whole line.
    open: Option<NodeId>,
    /// The `not` marker in front of `open`, if any.
    not: Option<NodeId>,
    head: NodeId,
}

/// Reduces the desugared run starting at `start` to a single value, emitting
/// instructions into `module` along the way. Nested groups are tracked on an
/// explicit stack, so nesting depth is not limited by the call stack.
pub fn gen_expr(
    chain: &mut TokenChain,
    start: NodeId,
    module: &mut Module,
) -> Result<Operand, CompileError> {
    let mut groups = vec![Group {
        open: None,
        not: None,
        head: start,
    }];
    let mut cursor = start;

    loop {
        match chain[cursor].kind {
            TokenKind::LeftParen => {
                let head = chain.next(cursor).ok_or(CompileError::MalformedExpression)?;
                groups.push(Group {
                    open: Some(cursor),
                    not: None,
                    head,
                });
                cursor = head;
            }
            TokenKind::Not => {
                let open = chain.next(cursor).ok_or(CompileError::MalformedExpression)?;
                if chain[open].kind != TokenKind::LeftParen {
                    return Err(CompileError::MalformedExpression);
                }
                let head = chain.next(open).ok_or(CompileError::MalformedExpression)?;
                groups.push(Group {
                    open: Some(open),
                    not: Some(cursor),
                    head,
                });
                cursor = head;
            }
            TokenKind::RightParen | TokenKind::EndOfLine => {
                let group = groups.pop().ok_or(CompileError::MalformedExpression)?;
                let result = reduce_flat(chain, group.head, module)?;
                if chain.next(result) != Some(cursor) {
                    return Err(CompileError::MalformedExpression);
                }
                let Some(open) = group.open else {
                    if chain[cursor].kind != TokenKind::EndOfLine || !groups.is_empty() {
                        return Err(CompileError::MalformedExpression);
                    }
                    return operand(chain, result);
                };
                if chain[cursor].kind != TokenKind::RightParen {
                    return Err(CompileError::MalformedExpression);
                }
                collapse_into(chain, open, result, cursor, group.not, module)?;
                if let (Some(not), Some(parent)) = (group.not, groups.last_mut()) {
                    if parent.head == not {
                        parent.head = open;
                    }
                }
                cursor = chain.next(open).ok_or(CompileError::MalformedExpression)?;
            }
            _ => cursor = chain.next(cursor).ok_or(CompileError::MalformedExpression)?,
        }
    }
}

fn ends_group(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::RightParen | TokenKind::EndOfLine)
}

fn operand(chain: &TokenChain, id: NodeId) -> Result<Operand, CompileError> {
    let token = &chain[id];
    match (token.kind, token.value) {
        (TokenKind::Integer, Some(value)) => Ok(value),
        _ => Err(CompileError::MalformedExpression),
    }
}

fn materialise(chain: &mut TokenChain, id: NodeId, reg: VirtualRegister) {
    let token = &mut chain[id];
    token.kind = TokenKind::Integer;
    token.text = reg.to_string();
    token.value = Some(reg.into());
}

/// Applies every operator between `head` and the next `)` or end of line,
/// which must contain no groups any more. Returns the node holding the value.
fn reduce_flat(
    chain: &mut TokenChain,
    head: NodeId,
    module: &mut Module,
) -> Result<NodeId, CompileError> {
    for level in PRECEDENCE {
        let mut cursor = head;
        while !ends_group(chain[cursor].kind) {
            let resolved = if level.contains(&chain[cursor].kind) {
                apply_operator(chain, cursor, module)?
            } else {
                cursor
            };
            cursor = chain.next(resolved).ok_or(CompileError::MalformedExpression)?;
        }
    }
    Ok(head)
}

/// Moves the value of `result` into `open`, complementing it when the group
/// was written `not(...)`, and splices out `result`, `close` and the marker.
fn collapse_into(
    chain: &mut TokenChain,
    open: NodeId,
    result: NodeId,
    close: NodeId,
    not: Option<NodeId>,
    module: &mut Module,
) -> Result<(), CompileError> {
    let value = operand(chain, result)?;
    chain[open] = chain[result].clone();
    chain.unlink(result);
    chain.unlink(close);
    if let Some(not) = not {
        let out = emit(module, BinaryOperator::Xor, Operand::Immediate(-1), value);
        materialise(chain, open, out);
        chain.unlink(not);
    }
    Ok(())
}

/// Applies the operator at `op` to its neighbours; the result replaces the
/// left operand, whose node is returned.
fn apply_operator(
    chain: &mut TokenChain,
    op: NodeId,
    module: &mut Module,
) -> Result<NodeId, CompileError> {
    let left = chain.prev(op).ok_or(CompileError::MalformedExpression)?;
    let right = chain.next(op).ok_or(CompileError::MalformedExpression)?;
    let arg1 = operand(chain, left)?;
    let arg2 = operand(chain, right)?;

    let out = match chain[op].kind {
        TokenKind::Mul => emit(module, BinaryOperator::Mul, arg1, arg2),
        TokenKind::Div => emit(module, BinaryOperator::SDiv, arg1, arg2),
        TokenKind::Mod => emit(module, BinaryOperator::SRem, arg1, arg2),
        TokenKind::Add => emit(module, BinaryOperator::Add, arg1, arg2),
        TokenKind::Sub => emit(module, BinaryOperator::Sub, arg1, arg2),
        TokenKind::And => emit(module, BinaryOperator::And, arg1, arg2),
        TokenKind::Or => emit(module, BinaryOperator::Or, arg1, arg2),
        TokenKind::Xor => emit(module, BinaryOperator::Xor, arg1, arg2),
        TokenKind::ShiftLeft => emit(module, BinaryOperator::Shl, arg1, arg2),
        TokenKind::ShiftRight => emit(module, BinaryOperator::AShr, arg1, arg2),
        TokenKind::RotateLeft => {
            emit_rotate(module, BinaryOperator::Shl, BinaryOperator::LShr, arg1, arg2)
        }
        TokenKind::RotateRight => {
            emit_rotate(module, BinaryOperator::LShr, BinaryOperator::Shl, arg1, arg2)
        }
        _ => return Err(CompileError::MalformedExpression),
    };

    materialise(chain, left, out);
    chain.unlink(op);
    chain.unlink(right);
    Ok(left)
}

fn emit(
    module: &mut Module,
    operator: BinaryOperator,
    arg1: Operand,
    arg2: Operand,
) -> VirtualRegister {
    let out = module.new_reg();
    module.push(Instruction::BinaryOperation {
        operator,
        arg1,
        arg2,
        out,
    });
    out
}

// (value toward amount) | (value away-from (32 - amount))
fn emit_rotate(
    module: &mut Module,
    toward: BinaryOperator,
    away: BinaryOperator,
    value: Operand,
    amount: Operand,
) -> VirtualRegister {
    let shifted = emit(module, toward, value, amount);
    let remaining = emit(module, BinaryOperator::Sub, Operand::Immediate(32), amount);
    let wrapped = emit(module, away, value, remaining.into());
    emit(module, BinaryOperator::Or, shifted.into(), wrapped.into())
}
