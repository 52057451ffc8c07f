pub mod err;
pub mod kind;
pub mod lexer;

pub use err::LexError;
pub use kind::TokenKind;
pub use lexer::{tokenize, tokenize_script};

use serde::Serialize;

/// One lexed token. `begin`/`end` are byte offsets into the source; for
/// string literals they cover the text between the quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub begin: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, begin: usize, end: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            begin,
            end,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:?})@{}..{}", self.kind, self.lexeme, self.begin, self.end)
    }
}
