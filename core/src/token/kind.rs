//! file: core/src/token/kind.rs
//! description: the closed set of token kinds produced by the lexer.
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    String,
    Integer,
    Identifier,
    Plus,
    Minus,
    Multiply,
    Divide,
    Less,
    Equal,
    LeftParen,
    RightParen,
    LeftCurly,
    RightCurly,
    Semicolon,
    Comma,
    If,
    Else,
    Let,
    While,
    Func,
}

use std::fmt;

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::String => "String",
            TokenKind::Integer => "Integer",
            TokenKind::Identifier => "Identifier",
            TokenKind::Plus => "Plus",
            TokenKind::Minus => "Minus",
            TokenKind::Multiply => "Multiply",
            TokenKind::Divide => "Divide",
            TokenKind::Less => "Less",
            TokenKind::Equal => "Equal",
            TokenKind::LeftParen => "LeftParen",
            TokenKind::RightParen => "RightParen",
            TokenKind::LeftCurly => "LeftCurly",
            TokenKind::RightCurly => "RightCurly",
            TokenKind::Semicolon => "Semicolon",
            TokenKind::Comma => "Comma",
            TokenKind::If => "If",
            TokenKind::Else => "Else",
            TokenKind::Let => "Let",
            TokenKind::While => "While",
            TokenKind::Func => "Func",
        };
        write!(f, "{}", name)
    }
}
