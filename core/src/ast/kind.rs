//! file: core/src/ast/kind.rs
//! description: operator enums shared by parsing and lowering.
use serde::Serialize;

/// Binary operators. Arithmetic operators produce an i32 directly; the two
/// comparisons produce an i1 that lowering widens back to i32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOperator {
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Lt,  // <
    Eq,  // ==
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        matches!(self, BinaryOperator::Lt | BinaryOperator::Eq)
    }

    /// Node-kind name used when printing trees.
    pub fn node_name(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "Add",
            BinaryOperator::Sub => "Sub",
            BinaryOperator::Mul => "Mul",
            BinaryOperator::Div => "Div",
            BinaryOperator::Lt => "Less",
            BinaryOperator::Eq => "Equal",
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Lt => "<",
            BinaryOperator::Eq => "==",
        };
        write!(f, "{}", symbol)
    }
}
