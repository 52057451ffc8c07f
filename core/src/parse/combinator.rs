//! file: core/src/parse/combinator.rs
//! description: memoizing PEG evaluator over a token slice.
//!
//! Grammar rules are data (`Expr` trees, see `grammar.rs`) and this module
//! interprets them. Positions are plain token indices passed by value; a
//! failed attempt simply returns `None` and the caller keeps its own
//! position, so backtracking needs no undo step. Successful rule results
//! are cached per `(Rule, Pos)`. Failures are not cached and are retried
//! on every attempt.
use std::collections::HashMap;

use log::{debug, trace};

use super::err::SyntaxError;
use super::grammar::{GRAMMAR, Rule};
use crate::ast::AstNode;
use crate::token::{Token, TokenKind};

/// Index into the token slice. Always `0 <= pos <= tokens.len()`.
pub type Pos = usize;

/// Deepest nesting of rule evaluations before the parse is abandoned.
/// Right-recursive rules nest once per operator or statement.
pub const MAX_DEPTH: usize = 2048;

/// Builds a composite node from the ordered sub-results of a sequence or
/// repetition. Literal tokens contribute `None` placeholders.
pub type Merger = fn(Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError>;

/// Builds a leaf node from a single consumed token.
pub type LeafBuilder = fn(&Token, Pos) -> Result<AstNode, SyntaxError>;

pub enum Expr {
    /// Exactly one token of the kind; produces no node.
    Token(TokenKind),
    /// Exactly one token of the kind, turned into a node.
    Leaf(TokenKind, LeafBuilder),
    /// A named, memoized rule.
    Rule(Rule),
    /// Ordered, committed choice.
    Select(Vec<Expr>),
    /// Sequence; all or nothing.
    Concat(Merger, Vec<Expr>),
    /// Zero or more; never fails.
    Many(Merger, Box<Expr>),
}

/// Where a successful attempt stopped and what it built.
pub type Match = (Pos, Option<AstNode>);

/// `Ok(None)` is an ordinary failed alternative; `Err` aborts the parse.
pub type Outcome = Result<Option<Match>, SyntaxError>;

pub struct Parser<'t> {
    tokens: &'t [Token],
    cache: HashMap<(Rule, Pos), Match>,
    evaluations: HashMap<(Rule, Pos), usize>,
    cache_hits: usize,
    furthest: Pos,
    depth: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Parser {
            tokens,
            cache: HashMap::new(),
            evaluations: HashMap::new(),
            cache_hits: 0,
            furthest: 0,
            depth: 0,
        }
    }

    /// Parse the whole token slice with `rule` as the root.
    pub fn parse_root(&mut self, rule: Rule) -> Result<AstNode, SyntaxError> {
        let outcome = self.cached_call(rule, 0)?;
        debug!(
            "parsed {} token(s) as {:?}: {} rule evaluation(s), {} cache hit(s)",
            self.tokens.len(),
            rule,
            self.evaluations.values().sum::<usize>(),
            self.cache_hits
        );

        match outcome {
            Some((end, Some(node))) if end == self.tokens.len() => Ok(node),
            Some((end, _)) if end == self.tokens.len() => Err(SyntaxError::malformed(format!(
                "Rule {:?} matched without producing a node.",
                rule
            ))),
            Some((end, _)) => Err(SyntaxError::trailing_tokens(self.furthest.max(end))),
            None if self.furthest >= self.tokens.len() => Err(SyntaxError::unexpected_end(self.furthest)),
            None => Err(SyntaxError::no_alternative(self.furthest)),
        }
    }

    /// Match one token of `kind` at `at`.
    pub fn consume(&mut self, kind: TokenKind, at: Pos) -> Option<&'t Token> {
        self.furthest = self.furthest.max(at);
        let tokens = self.tokens;
        match tokens.get(at) {
            Some(token) if token.kind == kind => Some(token),
            _ => None,
        }
    }

    /// Evaluate a named rule through the packrat cache.
    pub fn cached_call(&mut self, rule: Rule, at: Pos) -> Outcome {
        if let Some(hit) = self.cache.get(&(rule, at)) {
            self.cache_hits += 1;
            return Ok(Some(hit.clone()));
        }

        *self.evaluations.entry((rule, at)).or_insert(0) += 1;
        trace!("evaluating {:?} at {}", rule, at);

        if self.depth >= MAX_DEPTH {
            return Err(SyntaxError::too_deep(at));
        }
        self.depth += 1;
        let outcome = self.eval(GRAMMAR.definition(rule), at);
        self.depth -= 1;

        let outcome = outcome?;
        if let Some(found) = &outcome {
            self.cache.insert((rule, at), found.clone());
        }
        Ok(outcome)
    }

    pub fn eval(&mut self, expr: &'static Expr, at: Pos) -> Outcome {
        match expr {
            Expr::Token(kind) => Ok(self.consume(*kind, at).map(|_| (at + 1, None))),
            Expr::Leaf(kind, build) => match self.consume(*kind, at) {
                Some(token) => Ok(Some((at + 1, Some(build(token, at)?)))),
                None => Ok(None),
            },
            Expr::Rule(rule) => self.cached_call(*rule, at),
            Expr::Select(cands) => self.select(cands, at),
            Expr::Concat(merge, cands) => self.concat(*merge, cands, at),
            Expr::Many(merge, cand) => self.many(*merge, cand, at),
        }
    }

    /// First alternative that matches from `at` wins; later ones are never tried.
    pub fn select(&mut self, cands: &'static [Expr], at: Pos) -> Outcome {
        for cand in cands {
            if let Some(found) = self.eval(cand, at)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Every candidate must match, each starting where the previous stopped.
    pub fn concat(&mut self, merge: Merger, cands: &'static [Expr], at: Pos) -> Outcome {
        let mut parts = Vec::with_capacity(cands.len());
        let mut next = at;
        for cand in cands {
            match self.eval(cand, next)? {
                Some((after, node)) => {
                    next = after;
                    parts.push(node);
                }
                None => return Ok(None),
            }
        }
        let node = merge(parts).map_err(|e| e.with_position(at))?;
        Ok(Some((next, Some(node))))
    }

    /// Apply `cand` until it fails (or stops making progress).
    pub fn many(&mut self, merge: Merger, cand: &'static Expr, at: Pos) -> Outcome {
        let mut parts = Vec::new();
        let mut next = at;
        while let Some((after, node)) = self.eval(cand, next)? {
            if after == next {
                break;
            }
            next = after;
            parts.push(node);
        }
        let node = merge(parts).map_err(|e| e.with_position(at))?;
        Ok(Some((next, Some(node))))
    }

    /// How many times the definition of `rule` actually ran at `at`.
    pub fn evaluations(&self, rule: Rule, at: Pos) -> usize {
        self.evaluations.get(&(rule, at)).copied().unwrap_or(0)
    }

    /// Lookups answered from the cache.
    pub fn cache_hits(&self) -> usize {
        self.cache_hits
    }

    /// Furthest token index any attempt examined.
    pub fn furthest(&self) -> Pos {
        self.furthest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme, 0, 0)
    }

    #[test]
    fn consume_matches_only_the_requested_kind() {
        let tokens = vec![tok(TokenKind::Integer, "1")];
        let mut parser = Parser::new(&tokens);
        assert!(parser.consume(TokenKind::Plus, 0).is_none());
        assert!(parser.consume(TokenKind::Integer, 0).is_some());
        assert!(parser.consume(TokenKind::Integer, 1).is_none());
        assert_eq!(parser.furthest(), 1);
    }

    #[test]
    fn failed_sequence_leaves_no_cache_entry() {
        // `1 +` : ArithExpr falls back to Term, Condition to ArithExpr
        let tokens = vec![tok(TokenKind::Integer, "1"), tok(TokenKind::Plus, "+")];
        let mut parser = Parser::new(&tokens);
        let outcome = parser.cached_call(Rule::Comparison, 0).unwrap();
        assert!(outcome.is_none());
        assert!(parser.cached_call(Rule::Comparison, 0).unwrap().is_none());
        assert_eq!(parser.evaluations(Rule::Comparison, 0), 2);
        assert_eq!(parser.evaluations(Rule::ArithExpr, 0), 1);
    }

    #[test]
    fn many_accepts_zero_matches() {
        let tokens: Vec<Token> = Vec::new();
        let mut parser = Parser::new(&tokens);
        let outcome = parser.cached_call(Rule::ArgList, 0).unwrap();
        assert_eq!(outcome, Some((0, Some(AstNode::Args { values: vec![] }))));
    }
}
