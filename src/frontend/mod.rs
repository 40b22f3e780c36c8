mod desugar;
mod lexer;
mod validator;

pub use self::desugar::desugar;
pub use self::lexer::{tokenize, LexedLine, Token, TokenChain, TokenKind};
pub use self::validator::{check_assignment, check_expression};
