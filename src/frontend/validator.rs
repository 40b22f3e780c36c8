use super::lexer::{TokenChain, TokenKind};
use crate::error::CompileError;
use crate::utils::NodeId;

/// Snapshot taken when a call keyword is seen: how many parentheses were open
/// before its own `(`, and how many calls were still waiting for their comma
/// (this one included).
#[derive(Copy, Clone, Debug)]
struct CallFrame {
    paren_depth: usize,
    func_depth: usize,
}

fn may_follow(kind: TokenKind, next: TokenKind) -> bool {
    use TokenKind::*;
    let ends_operand = next.is_infix() || matches!(next, RightParen | Comma | EndOfLine);
    match kind {
        Variable | Integer | RightParen => ends_operand,
        LeftParen | Comma | Add | Sub | Mul | Div | Mod | And | Or => next.starts_operand(),
        Xor | ShiftLeft | ShiftRight | RotateLeft | RotateRight | Not => next == LeftParen,
        Equals | EndOfLine => false,
    }
}

/// Checks the run of tokens from `start` to the end of the line.
pub fn check_expression(chain: &TokenChain, start: NodeId) -> Result<(), CompileError> {
    let first = chain[start].kind;
    if first != TokenKind::EndOfLine && !first.starts_operand() {
        return Err(CompileError::MalformedExpression);
    }

    let mut paren_depth = 0usize;
    let mut func_depth = 0usize;
    let mut calls: Vec<CallFrame> = vec![];

    for id in chain.walk_from(start) {
        let kind = chain[id].kind;
        if kind == TokenKind::EndOfLine {
            break;
        }
        let next = chain
            .next(id)
            .map(|next| chain[next].kind)
            .ok_or(CompileError::UnbalancedStructure)?;
        if !may_follow(kind, next) {
            return Err(CompileError::MalformedExpression);
        }

        match kind {
            TokenKind::LeftParen => paren_depth += 1,
            TokenKind::RightParen => {
                if let Some(call) = calls.last() {
                    // this parenthesis closes the argument list of the innermost call
                    if call.paren_depth + 1 == paren_depth {
                        if call.func_depth != func_depth + 1 {
                            return Err(CompileError::UnbalancedStructure);
                        }
                        calls.pop();
                    }
                }
                paren_depth = paren_depth
                    .checked_sub(1)
                    .ok_or(CompileError::UnbalancedStructure)?;
            }
            TokenKind::Comma => {
                let call = calls.last().ok_or(CompileError::MisplacedComma)?;
                if call.paren_depth + 1 != paren_depth || call.func_depth != func_depth {
                    return Err(CompileError::MisplacedComma);
                }
                func_depth -= 1;
            }
            kind if kind.is_function() => {
                func_depth += 1;
                calls.push(CallFrame {
                    paren_depth,
                    func_depth,
                });
            }
            _ => {}
        }
    }

    if paren_depth != 0 || func_depth != 0 || !calls.is_empty() {
        return Err(CompileError::UnbalancedStructure);
    }
    Ok(())
}

/// Checks `variable = expression` and returns the first token of the
/// right-hand side.
pub fn check_assignment(chain: &TokenChain, equals: NodeId) -> Result<NodeId, CompileError> {
    let head = chain.head().ok_or(CompileError::InvalidAssignment)?;
    if chain[head].kind != TokenKind::Variable || chain.next(head) != Some(equals) {
        return Err(CompileError::InvalidAssignment);
    }
    let rhs = chain
        .next(equals)
        .ok_or(CompileError::InvalidAssignment)?;
    if chain[rhs].kind == TokenKind::EndOfLine {
        return Err(CompileError::InvalidAssignment);
    }
    check_expression(chain, rhs)?;
    Ok(rhs)
}
