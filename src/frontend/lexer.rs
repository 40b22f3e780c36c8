use std::fmt::{self, Display, Formatter};
use std::iter::Peekable;

use crate::error::CompileError;
use crate::ir::Operand;
use crate::utils::{Chain, NodeId};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Variable,
    Integer,
    LeftParen,
    RightParen,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Xor,
    ShiftLeft,
    ShiftRight,
    RotateLeft,
    RotateRight,
    Not,
    Equals,
    Comma,
    EndOfLine,
}

impl TokenKind {
    pub fn is_value(self) -> bool {
        matches!(self, TokenKind::Variable | TokenKind::Integer)
    }

    /// Binary operators spelled as a two-argument call, e.g. `xor(a, b)`.
    pub fn is_function(self) -> bool {
        matches!(
            self,
            TokenKind::Xor
                | TokenKind::ShiftLeft
                | TokenKind::ShiftRight
                | TokenKind::RotateLeft
                | TokenKind::RotateRight
        )
    }

    /// Binary operators spelled infix.
    pub fn is_infix(self) -> bool {
        matches!(
            self,
            TokenKind::Add
                | TokenKind::Sub
                | TokenKind::Mul
                | TokenKind::Div
                | TokenKind::Mod
                | TokenKind::And
                | TokenKind::Or
        )
    }

    pub fn starts_operand(self) -> bool {
        self.is_value()
            || self.is_function()
            || matches!(self, TokenKind::LeftParen | TokenKind::Not)
    }

    fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "xor" => TokenKind::Xor,
            "ls" => TokenKind::ShiftLeft,
            "rs" => TokenKind::ShiftRight,
            "lr" => TokenKind::RotateLeft,
            "rr" => TokenKind::RotateRight,
            "not" => TokenKind::Not,
            _ => return None,
        })
    }

    fn from_sign(c: char) -> Option<Self> {
        Some(match c {
            '=' => TokenKind::Equals,
            '+' => TokenKind::Add,
            '-' => TokenKind::Sub,
            '*' => TokenKind::Mul,
            '/' => TokenKind::Div,
            '%' => TokenKind::Mod,
            '&' => TokenKind::And,
            '|' => TokenKind::Or,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Set for integer literals, and for any token whose value has been
    /// materialised into a register.
    pub value: Option<Operand>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
            value: None,
        }
    }

    fn integer(text: String) -> Result<Self, CompileError> {
        let value = text
            .parse::<i32>()
            .map_err(|_| CompileError::IntegerOutOfRange(text.clone()))?;
        Ok(Token {
            kind: TokenKind::Integer,
            text,
            value: Some(Operand::Immediate(value)),
        })
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfLine => write!(f, "<EOL>"),
            _ => write!(f, "{}", self.text),
        }
    }
}

pub type TokenChain = Chain<Token>;

/// Tokens of one source line. The chain always ends with a single
/// `EndOfLine` token.
#[derive(Debug)]
pub struct LexedLine {
    pub chain: TokenChain,
    pub equals: Option<NodeId>,
}

fn take_run(
    stream: &mut Peekable<impl Iterator<Item = char>>,
    pred: impl Fn(char) -> bool,
) -> String {
    let mut s = String::new();
    while let Some(&d) = stream.peek() {
        if !pred(d) {
            break;
        }
        s.push(d);
        stream.next();
    }
    s
}

pub fn tokenize(line: &str) -> Result<LexedLine, CompileError> {
    let mut stream = line.chars().peekable();
    let mut chain = TokenChain::new();
    let mut equals = None;

    loop {
        match stream.peek() {
            None | Some(&'\n') => break,
            Some(d) if d.is_whitespace() => {
                stream.next();
            }
            Some(d) if d.is_ascii_alphabetic() => {
                let word = take_run(&mut stream, |c| c.is_ascii_alphabetic());
                let kind = TokenKind::from_keyword(&word).unwrap_or(TokenKind::Variable);
                chain.push_back(Token::new(kind, word));
            }
            Some(d) if d.is_ascii_digit() => {
                let digits = take_run(&mut stream, |c| c.is_ascii_digit());
                chain.push_back(Token::integer(digits)?);
            }
            Some(&d) => {
                let kind = TokenKind::from_sign(d).ok_or(CompileError::InvalidCharacter(d))?;
                stream.next();
                let id = chain.push_back(Token::new(kind, d));
                if kind == TokenKind::Equals {
                    if equals.is_some() {
                        return Err(CompileError::DuplicateAssignment);
                    }
                    equals = Some(id);
                }
            }
        }
    }

    chain.push_back(Token::new(TokenKind::EndOfLine, ""));
    Ok(LexedLine { chain, equals })
}
