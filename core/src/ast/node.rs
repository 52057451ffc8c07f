//! file: core/src/ast/node.rs
//! description: the closed set of syntax tree nodes.
//!
//! Nodes are plain immutable values. Lowering never writes back into a node;
//! it returns what it computed instead.
use serde::Serialize;

use super::kind::BinaryOperator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum AstNode {
    Integer { value: i32 },
    String { value: String },
    Variable { name: String },

    BinaryOp { op: BinaryOperator, lhs: Box<AstNode>, rhs: Box<AstNode> },

    Let { name: String, value: Box<AstNode> },
    Assign { name: String, value: Box<AstNode> },
    Sequence { first: Box<AstNode>, rest: Box<AstNode> },

    If { cond: Box<AstNode>, then: Box<AstNode>, otherwise: Box<AstNode> },
    While { cond: Box<AstNode>, body: Box<AstNode> },

    FuncName { name: String },
    Param { name: String },
    Params { params: Vec<AstNode> },
    Args { values: Vec<AstNode> },
    Call { func: Box<AstNode>, args: Box<AstNode> },
    Func { name: Box<AstNode>, params: Box<AstNode>, body: Box<AstNode> },
    Definitions { defs: Vec<AstNode> },
}

impl AstNode {
    pub fn integer(value: i32) -> Self {
        AstNode::Integer { value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        AstNode::String { value: value.into() }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        AstNode::Variable { name: name.into() }
    }

    pub fn binary(op: BinaryOperator, lhs: AstNode, rhs: AstNode) -> Self {
        AstNode::BinaryOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn add(lhs: AstNode, rhs: AstNode) -> Self {
        Self::binary(BinaryOperator::Add, lhs, rhs)
    }

    pub fn sub(lhs: AstNode, rhs: AstNode) -> Self {
        Self::binary(BinaryOperator::Sub, lhs, rhs)
    }

    pub fn mul(lhs: AstNode, rhs: AstNode) -> Self {
        Self::binary(BinaryOperator::Mul, lhs, rhs)
    }

    pub fn div(lhs: AstNode, rhs: AstNode) -> Self {
        Self::binary(BinaryOperator::Div, lhs, rhs)
    }

    pub fn less(lhs: AstNode, rhs: AstNode) -> Self {
        Self::binary(BinaryOperator::Lt, lhs, rhs)
    }

    pub fn equal(lhs: AstNode, rhs: AstNode) -> Self {
        Self::binary(BinaryOperator::Eq, lhs, rhs)
    }

    pub fn let_binding(name: impl Into<String>, value: AstNode) -> Self {
        AstNode::Let {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn assign(name: impl Into<String>, value: AstNode) -> Self {
        AstNode::Assign {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn sequence(first: AstNode, rest: AstNode) -> Self {
        AstNode::Sequence {
            first: Box::new(first),
            rest: Box::new(rest),
        }
    }

    pub fn if_else(cond: AstNode, then: AstNode, otherwise: AstNode) -> Self {
        AstNode::If {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn while_loop(cond: AstNode, body: AstNode) -> Self {
        AstNode::While {
            cond: Box::new(cond),
            body: Box::new(body),
        }
    }

    /// `name(values...)`, wrapping the callee in `FuncName` and the values in `Args`.
    pub fn call(name: impl Into<String>, values: Vec<AstNode>) -> Self {
        AstNode::Call {
            func: Box::new(AstNode::FuncName { name: name.into() }),
            args: Box::new(AstNode::Args { values }),
        }
    }

    /// `func name(params...) { body }`.
    pub fn func(name: impl Into<String>, params: &[&str], body: AstNode) -> Self {
        let params = params
            .iter()
            .map(|p| AstNode::Param { name: p.to_string() })
            .collect();
        AstNode::Func {
            name: Box::new(AstNode::FuncName { name: name.into() }),
            params: Box::new(AstNode::Params { params }),
            body: Box::new(body),
        }
    }

    pub fn definitions(defs: Vec<AstNode>) -> Self {
        AstNode::Definitions { defs }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            AstNode::Integer { .. } => "Integer",
            AstNode::String { .. } => "String",
            AstNode::Variable { .. } => "Variable",
            AstNode::BinaryOp { op, .. } => op.node_name(),
            AstNode::Let { .. } => "Let",
            AstNode::Assign { .. } => "Assign",
            AstNode::Sequence { .. } => "Sequence",
            AstNode::If { .. } => "If",
            AstNode::While { .. } => "While",
            AstNode::FuncName { .. } => "FuncName",
            AstNode::Param { .. } => "Param",
            AstNode::Params { .. } => "Params",
            AstNode::Args { .. } => "Args",
            AstNode::Call { .. } => "Call",
            AstNode::Func { .. } => "Func",
            AstNode::Definitions { .. } => "Definitions",
        }
    }

    /// Serialize the tree as pretty JSON (used by `--dump ast`).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

use std::fmt;

fn write_list(f: &mut fmt::Formatter<'_>, nodes: &[AstNode]) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", node)?;
    }
    Ok(())
}

/// Compact constructor-style rendering, e.g. `Add(1, Mul(2, x))`.
impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNode::Integer { value } => write!(f, "{}", value),
            AstNode::String { value } => write!(f, "{:?}", value),
            AstNode::Variable { name } | AstNode::FuncName { name } | AstNode::Param { name } => {
                write!(f, "{}", name)
            }
            AstNode::BinaryOp { op, lhs, rhs } => write!(f, "{}({}, {})", op.node_name(), lhs, rhs),
            AstNode::Let { name, value } => write!(f, "Let({}, {})", name, value),
            AstNode::Assign { name, value } => write!(f, "Assign({}, {})", name, value),
            AstNode::Sequence { first, rest } => write!(f, "Sequence({}, {})", first, rest),
            AstNode::If { cond, then, otherwise } => write!(f, "If({}, {}, {})", cond, then, otherwise),
            AstNode::While { cond, body } => write!(f, "While({}, {})", cond, body),
            AstNode::Params { params } => {
                write!(f, "Params(")?;
                write_list(f, params)?;
                write!(f, ")")
            }
            AstNode::Args { values } => {
                write!(f, "Args(")?;
                write_list(f, values)?;
                write!(f, ")")
            }
            AstNode::Call { func, args } => write!(f, "Call({}, {})", func, args),
            AstNode::Func { name, params, body } => write!(f, "Func({}, {}, {})", name, params, body),
            AstNode::Definitions { defs } => {
                write!(f, "Definitions(")?;
                write_list(f, defs)?;
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_constructor_style() {
        let node = AstNode::add(AstNode::integer(1), AstNode::mul(AstNode::integer(2), AstNode::variable("x")));
        assert_eq!(node.to_string(), "Add(1, Mul(2, x))");
    }

    #[test]
    fn call_helper_wraps_name_and_args() {
        let node = AstNode::call("f", vec![AstNode::integer(1)]);
        assert_eq!(node.to_string(), "Call(f, Args(1))");
    }

    #[test]
    fn json_is_tagged_by_kind() {
        let json = AstNode::less(AstNode::integer(1), AstNode::integer(2)).to_json().unwrap();
        assert!(json.contains("\"kind\": \"BinaryOp\""), "{}", json);
        assert!(json.contains("\"op\": \"Lt\""), "{}", json);
    }
}
