use std::fmt::{self, Display, Formatter};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),

    #[error("a line may contain at most one assignment")]
    DuplicateAssignment,

    #[error("integer literal {0} does not fit in 32 bits")]
    IntegerOutOfRange(String),

    #[error("assignments must have the form `variable = expression`")]
    InvalidAssignment,

    #[error("malformed expression")]
    MalformedExpression,

    #[error("comma does not belong to the enclosing function call")]
    MisplacedComma,

    #[error("unbalanced parentheses or function call")]
    UnbalancedStructure,

    #[error("variable `{0}` is used before it is assigned")]
    UndefinedVariable(String),

    #[error("function call was never matched with its argument separator")]
    UnresolvedCall,

    #[error("too many variables (limit is {limit})")]
    ResourceExhausted { limit: usize },
}

/// A failure tied to the 1-based source line that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub error: CompileError,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Error on line {}: {}", self.line, self.error)
    }
}

impl std::error::Error for Diagnostic {}
