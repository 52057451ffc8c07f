//! file: core/src/token/lexer.rs
//! description: turns source text into the token stream the parser consumes.
//!
//! The character-level work is done by the pest grammar in `tokens.pest`;
//! this module walks the resulting pairs and maps each grammar rule onto a
//! `TokenKind`.
use log::debug;
use pest::Parser;
use pest_derive::Parser;

use super::{LexError, Token, TokenKind};
use crate::script::Script;

#[derive(Parser)]
#[grammar = "tokens.pest"]
pub struct TokenGrammar;

fn kind_for(rule: Rule) -> Option<TokenKind> {
    let kind = match rule {
        Rule::string => TokenKind::String,
        Rule::integer => TokenKind::Integer,
        Rule::identifier => TokenKind::Identifier,
        Rule::kw_func => TokenKind::Func,
        Rule::kw_while => TokenKind::While,
        Rule::kw_let => TokenKind::Let,
        Rule::kw_if => TokenKind::If,
        Rule::kw_else => TokenKind::Else,
        Rule::plus => TokenKind::Plus,
        Rule::minus => TokenKind::Minus,
        Rule::multiply => TokenKind::Multiply,
        Rule::divide => TokenKind::Divide,
        Rule::less => TokenKind::Less,
        Rule::equal => TokenKind::Equal,
        Rule::left_paren => TokenKind::LeftParen,
        Rule::right_paren => TokenKind::RightParen,
        Rule::left_curly => TokenKind::LeftCurly,
        Rule::right_curly => TokenKind::RightCurly,
        Rule::semicolon => TokenKind::Semicolon,
        Rule::comma => TokenKind::Comma,
        _ => return None,
    };
    Some(kind)
}

/// Tokenize anonymous source text.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    lex("<input>", source)
}

/// Tokenize a script; lex errors carry the script's name in their location.
pub fn tokenize_script(script: &Script) -> Result<Vec<Token>, LexError> {
    lex(&script.name, &script.content)
}

fn lex(file: &str, source: &str) -> Result<Vec<Token>, LexError> {
    let mut pairs = TokenGrammar::parse(Rule::program, source)
        .map_err(|e| LexError::from_pest(file, source, &e))?;

    let mut tokens = Vec::new();
    let Some(program) = pairs.next() else {
        return Ok(tokens);
    };

    for pair in program.into_inner() {
        let Some(kind) = kind_for(pair.as_rule()) else {
            // EOI
            continue;
        };
        // string tokens expose only the text between their quotes
        let pair = match kind {
            TokenKind::String => match pair.into_inner().next() {
                Some(content) => content,
                None => continue,
            },
            _ => pair,
        };
        let span = pair.as_span();
        tokens.push(Token::new(kind, span.as_str(), span.start(), span.end()));
    }

    debug!("lexed {} token(s) from {}", tokens.len(), file);
    Ok(tokens)
}
