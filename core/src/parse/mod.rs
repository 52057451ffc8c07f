pub mod combinator;
pub mod err;
pub mod grammar;

pub use combinator::{MAX_DEPTH, Parser, Pos};
pub use err::SyntaxError;
pub use grammar::Rule;

use crate::ast::AstNode;
use crate::token::Token;

/// Parse a whole program (`Program` root).
pub fn parse(tokens: &[Token]) -> Result<AstNode, SyntaxError> {
    parse_rule(tokens, Rule::Program)
}

/// Parse the whole token slice with any grammar rule as the root.
pub fn parse_rule(tokens: &[Token], rule: Rule) -> Result<AstNode, SyntaxError> {
    Parser::new(tokens).parse_root(rule)
}
