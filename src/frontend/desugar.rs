use log::trace;

use super::lexer::{TokenChain, TokenKind};
use crate::error::CompileError;
use crate::ir::{Instruction, Module};
use crate::utils::{NodeId, SymbolTable};

/// Rewrites call syntax into infix form and replaces variable reads with
/// loads, in place. `f(a, b)` becomes `(a f b)`: the comma takes over the
/// call's operator and the keyword is spliced out, leaving the argument list
/// as a parenthesised group.
///
/// Returns the (possibly new) first token of the rewritten run.
pub fn desugar(
    chain: &mut TokenChain,
    start: NodeId,
    symbols: &SymbolTable,
    module: &mut Module,
) -> Result<NodeId, CompileError> {
    let mut first = start;
    let mut pending_calls = vec![];
    let mut cursor = Some(start);

    while let Some(id) = cursor {
        cursor = chain.next(id);
        match chain[id].kind {
            TokenKind::EndOfLine => break,
            kind if kind.is_function() => pending_calls.push(id),
            TokenKind::Comma => {
                let call = pending_calls.pop().ok_or(CompileError::UnresolvedCall)?;
                if call == first {
                    first = chain.next(call).ok_or(CompileError::UnresolvedCall)?;
                }
                let keyword = chain[call].clone();
                let comma = &mut chain[id];
                comma.kind = keyword.kind;
                comma.text = keyword.text;
                chain.unlink(call);
            }
            TokenKind::Variable => {
                let name = chain[id].text.clone();
                let symbol = symbols
                    .lookup(&name)
                    .ok_or_else(|| CompileError::UndefinedVariable(name.clone()))?;
                let out = module.new_reg();
                module.push(Instruction::Load { var: name, out });
                let token = &mut chain[id];
                token.kind = TokenKind::Integer;
                token.text = symbol.value.to_string();
                token.value = Some(out.into());
            }
            _ => {}
        }
    }

    if !pending_calls.is_empty() {
        return Err(CompileError::UnresolvedCall);
    }
    trace!("desugared: {}", chain);
    Ok(first)
}
