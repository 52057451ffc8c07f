//! file: core/src/parse/grammar.rs
//! description: the language's PEG, expressed as `Expr` tables.
//!
//! ```text
//! Program     := FunctionDef*
//! FunctionDef := 'func' FuncName '(' ParamList ')' '{' Block '}'
//! ParamList   := (Param ',')*
//! Block       := Statement ';' Block | Statement
//! Statement   := WhileStmt | LetStmt | AssignStmt | Condition | Value
//! WhileStmt   := 'while' Condition '{' Block '}'
//! LetStmt     := 'let' Ident '=' Condition
//! AssignStmt  := Ident '=' Condition
//! Condition   := Comparison | ArithExpr
//! Comparison  := ArithExpr '<' Condition | ArithExpr '=' '=' Condition
//! ArithExpr   := Term '+' ArithExpr | Term '-' ArithExpr | Term
//! Term        := Value '*' Term | Value '/' Term | Value
//! Value       := Call | IfExpr | '(' Condition ')' | Ident | IntLit | StrLit
//! Call        := FuncName '(' ArgList ')'
//! ArgList     := (Condition ',')*
//! IfExpr      := 'if' Block '{' Block '}' 'else' '{' Block '}'
//! ```
//!
//! Alternative order is significant: it fixes precedence and the right
//! associativity of every binary operator.
use std::str::FromStr;

use lazy_static::lazy_static;

use super::combinator::{Expr, LeafBuilder, Merger, Pos};
use super::err::SyntaxError;
use crate::ast::{AstNode, BinaryOperator};
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Program,
    FunctionDef,
    FuncName,
    ParamList,
    Param,
    Block,
    Statement,
    WhileStmt,
    LetStmt,
    AssignStmt,
    Condition,
    Comparison,
    ArithExpr,
    Term,
    Value,
    Call,
    ArgList,
    IfExpr,
    Ident,
    IntLit,
    StrLit,
}

impl Rule {
    /// Every rule, in declaration order.
    pub const ALL: [Rule; 21] = [
        Rule::Program,
        Rule::FunctionDef,
        Rule::FuncName,
        Rule::ParamList,
        Rule::Param,
        Rule::Block,
        Rule::Statement,
        Rule::WhileStmt,
        Rule::LetStmt,
        Rule::AssignStmt,
        Rule::Condition,
        Rule::Comparison,
        Rule::ArithExpr,
        Rule::Term,
        Rule::Value,
        Rule::Call,
        Rule::ArgList,
        Rule::IfExpr,
        Rule::Ident,
        Rule::IntLit,
        Rule::StrLit,
    ];
}

impl FromStr for Rule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::ALL
            .iter()
            .copied()
            .find(|rule| format!("{:?}", rule).eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown grammar rule '{}'", s))
    }
}

pub struct Grammar {
    definitions: Vec<Expr>,
}

impl Grammar {
    fn build() -> Self {
        Grammar {
            definitions: Rule::ALL.iter().map(|rule| define(*rule)).collect(),
        }
    }

    pub fn definition(&self, rule: Rule) -> &Expr {
        &self.definitions[rule as usize]
    }
}

lazy_static! {
    pub static ref GRAMMAR: Grammar = Grammar::build();
}

fn tok(kind: TokenKind) -> Expr {
    Expr::Token(kind)
}

fn rule(rule: Rule) -> Expr {
    Expr::Rule(rule)
}

fn leaf(kind: TokenKind, build: LeafBuilder) -> Expr {
    Expr::Leaf(kind, build)
}

fn select(cands: Vec<Expr>) -> Expr {
    Expr::Select(cands)
}

fn concat(merge: Merger, cands: Vec<Expr>) -> Expr {
    Expr::Concat(merge, cands)
}

fn many(merge: Merger, cand: Expr) -> Expr {
    Expr::Many(merge, Box::new(cand))
}

fn define(r: Rule) -> Expr {
    use TokenKind as K;
    match r {
        Rule::Program => many(merge_definitions, rule(Rule::FunctionDef)),
        Rule::FunctionDef => concat(
            merge_func,
            vec![
                tok(K::Func),
                rule(Rule::FuncName),
                tok(K::LeftParen),
                rule(Rule::ParamList),
                tok(K::RightParen),
                tok(K::LeftCurly),
                rule(Rule::Block),
                tok(K::RightCurly),
            ],
        ),
        Rule::FuncName => leaf(K::Identifier, build_func_name),
        Rule::ParamList => many(merge_params, concat(merge_single, vec![rule(Rule::Param), tok(K::Comma)])),
        Rule::Param => leaf(K::Identifier, build_param),
        Rule::Block => select(vec![
            concat(merge_sequence, vec![rule(Rule::Statement), tok(K::Semicolon), rule(Rule::Block)]),
            rule(Rule::Statement),
        ]),
        Rule::Statement => select(vec![
            rule(Rule::WhileStmt),
            rule(Rule::LetStmt),
            rule(Rule::AssignStmt),
            rule(Rule::Condition),
            rule(Rule::Value),
        ]),
        Rule::WhileStmt => concat(
            merge_while,
            vec![
                tok(K::While),
                rule(Rule::Condition),
                tok(K::LeftCurly),
                rule(Rule::Block),
                tok(K::RightCurly),
            ],
        ),
        Rule::LetStmt => concat(
            merge_let,
            vec![tok(K::Let), rule(Rule::Ident), tok(K::Equal), rule(Rule::Condition)],
        ),
        Rule::AssignStmt => concat(merge_assign, vec![rule(Rule::Ident), tok(K::Equal), rule(Rule::Condition)]),
        Rule::Condition => select(vec![rule(Rule::Comparison), rule(Rule::ArithExpr)]),
        Rule::Comparison => select(vec![
            concat(merge_less, vec![rule(Rule::ArithExpr), tok(K::Less), rule(Rule::Condition)]),
            concat(
                merge_equal,
                vec![rule(Rule::ArithExpr), tok(K::Equal), tok(K::Equal), rule(Rule::Condition)],
            ),
        ]),
        Rule::ArithExpr => select(vec![
            concat(merge_add, vec![rule(Rule::Term), tok(K::Plus), rule(Rule::ArithExpr)]),
            concat(merge_sub, vec![rule(Rule::Term), tok(K::Minus), rule(Rule::ArithExpr)]),
            rule(Rule::Term),
        ]),
        Rule::Term => select(vec![
            concat(merge_mul, vec![rule(Rule::Value), tok(K::Multiply), rule(Rule::Term)]),
            concat(merge_div, vec![rule(Rule::Value), tok(K::Divide), rule(Rule::Term)]),
            rule(Rule::Value),
        ]),
        Rule::Value => select(vec![
            rule(Rule::Call),
            rule(Rule::IfExpr),
            concat(merge_single, vec![tok(K::LeftParen), rule(Rule::Condition), tok(K::RightParen)]),
            rule(Rule::Ident),
            rule(Rule::IntLit),
            rule(Rule::StrLit),
        ]),
        Rule::Call => concat(
            merge_call,
            vec![rule(Rule::FuncName), tok(K::LeftParen), rule(Rule::ArgList), tok(K::RightParen)],
        ),
        Rule::ArgList => many(merge_args, concat(merge_single, vec![rule(Rule::Condition), tok(K::Comma)])),
        Rule::IfExpr => concat(
            merge_if,
            vec![
                tok(K::If),
                rule(Rule::Block),
                tok(K::LeftCurly),
                rule(Rule::Block),
                tok(K::RightCurly),
                tok(K::Else),
                tok(K::LeftCurly),
                rule(Rule::Block),
                tok(K::RightCurly),
            ],
        ),
        Rule::Ident => leaf(K::Identifier, build_variable),
        Rule::IntLit => leaf(K::Integer, build_integer),
        Rule::StrLit => leaf(K::String, build_string),
    }
}

// ------- leaves

fn build_variable(token: &Token, _at: Pos) -> Result<AstNode, SyntaxError> {
    Ok(AstNode::variable(token.lexeme.clone()))
}

fn build_func_name(token: &Token, _at: Pos) -> Result<AstNode, SyntaxError> {
    Ok(AstNode::FuncName { name: token.lexeme.clone() })
}

fn build_param(token: &Token, _at: Pos) -> Result<AstNode, SyntaxError> {
    Ok(AstNode::Param { name: token.lexeme.clone() })
}

fn build_integer(token: &Token, at: Pos) -> Result<AstNode, SyntaxError> {
    token.lexeme.parse::<i32>().map(AstNode::integer).map_err(|_| {
        SyntaxError::at(
            at,
            format!("Integer literal {} does not fit in 32 bits.", token.lexeme),
            "ssalang.parse.integer",
        )
    })
}

fn build_string(token: &Token, _at: Pos) -> Result<AstNode, SyntaxError> {
    Ok(AstNode::string(unescape(&token.lexeme)))
}

/// Decode backslash escapes. Unknown escapes stand for the escaped character.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

// ------- merges

fn nodes<const N: usize>(parts: Vec<Option<AstNode>>, what: &str) -> Result<[AstNode; N], SyntaxError> {
    let nodes: Vec<AstNode> = parts.into_iter().flatten().collect();
    let found = nodes.len();
    <[AstNode; N]>::try_from(nodes)
        .map_err(|_| SyntaxError::malformed(format!("{} expects {} children, got {}.", what, N, found)))
}

fn merge_single(parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    let [node] = nodes(parts, "group")?;
    Ok(node)
}

fn merge_definitions(parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    Ok(AstNode::definitions(parts.into_iter().flatten().collect()))
}

fn merge_params(parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    Ok(AstNode::Params {
        params: parts.into_iter().flatten().collect(),
    })
}

fn merge_args(parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    Ok(AstNode::Args {
        values: parts.into_iter().flatten().collect(),
    })
}

fn merge_func(parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    let [name, params, body] = nodes(parts, "function definition")?;
    Ok(AstNode::Func {
        name: Box::new(name),
        params: Box::new(params),
        body: Box::new(body),
    })
}

fn merge_call(parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    let [func, args] = nodes(parts, "call")?;
    Ok(AstNode::Call {
        func: Box::new(func),
        args: Box::new(args),
    })
}

fn merge_sequence(parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    let [first, rest] = nodes(parts, "sequence")?;
    Ok(AstNode::sequence(first, rest))
}

fn merge_while(parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    let [cond, body] = nodes(parts, "while")?;
    Ok(AstNode::while_loop(cond, body))
}

fn merge_if(parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    let [cond, then, otherwise] = nodes(parts, "if")?;
    Ok(AstNode::if_else(cond, then, otherwise))
}

fn target_name(node: AstNode) -> Result<String, SyntaxError> {
    match node {
        AstNode::Variable { name } => Ok(name),
        other => Err(SyntaxError::malformed(format!(
            "Binding target must be a variable, got {}.",
            other.kind_name()
        ))),
    }
}

fn merge_let(parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    let [target, value] = nodes(parts, "let")?;
    Ok(AstNode::let_binding(target_name(target)?, value))
}

fn merge_assign(parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    let [target, value] = nodes(parts, "assignment")?;
    Ok(AstNode::assign(target_name(target)?, value))
}

fn binary(op: BinaryOperator, parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    let [lhs, rhs] = nodes(parts, op.node_name())?;
    Ok(AstNode::binary(op, lhs, rhs))
}

fn merge_add(parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    binary(BinaryOperator::Add, parts)
}

fn merge_sub(parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    binary(BinaryOperator::Sub, parts)
}

fn merge_mul(parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    binary(BinaryOperator::Mul, parts)
}

fn merge_div(parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    binary(BinaryOperator::Div, parts)
}

fn merge_less(parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    binary(BinaryOperator::Lt, parts)
}

fn merge_equal(parts: Vec<Option<AstNode>>) -> Result<AstNode, SyntaxError> {
    binary(BinaryOperator::Eq, parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_table_follows_declaration_order() {
        for (i, rule) in Rule::ALL.iter().enumerate() {
            assert_eq!(*rule as usize, i);
        }
    }

    #[test]
    fn rules_parse_from_names() {
        assert_eq!("ArithExpr".parse::<Rule>(), Ok(Rule::ArithExpr));
        assert_eq!("block".parse::<Rule>(), Ok(Rule::Block));
        assert!("Nope".parse::<Rule>().is_err());
    }

    #[test]
    fn escapes_decode() {
        assert_eq!(unescape(r#"a\nb\"c\\d\q"#), "a\nb\"c\\dq");
    }
}
