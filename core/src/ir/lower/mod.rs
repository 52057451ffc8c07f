//! file: core/src/ir/lower/mod.rs
//! description: AST to IR lowering.
//!
//! Lowering is a pure function of the node and the context: every node
//! returns a `Lowered` carrying its code, the operand holding its value and
//! the label of the block that value becomes available in. Parents splice
//! their children's code in order. Nodes themselves are never mutated.
pub mod declare_builtins;
pub mod err;
pub mod function_builder;
pub mod lower_expr;
pub mod lower_func;
pub mod lower_stmt;
pub mod lowering_context;

pub use err::{LoweringError, LoweringErrorKind};
pub use function_builder::{FunctionBuilder, StorageClass};
pub use lowering_context::LoweringContext;

use crate::ast::AstNode;
use crate::ir::op::IROp;
use crate::ir::value::{IrType, Label, Value};

/// The result of lowering one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lowered {
    pub code: Vec<IROp>,
    pub value: Value,
    pub label: Label,
}

impl Lowered {
    /// A node that emits no code and yields `value` in the current block.
    pub fn value(value: Value, ctx: &LoweringContext) -> Self {
        Lowered { code: Vec::new(), value, label: ctx.current_label() }
    }

    /// The value as an i32 operand. Strings are only valid as call arguments.
    pub fn int_value(&self) -> Result<Value, LoweringError> {
        match self.value.ty() {
            IrType::I32 => Ok(self.value.clone()),
            IrType::I8Ptr => Err(LoweringError::with(LoweringErrorKind::StringValue)),
        }
    }

    /// Call-site rendering of the value, e.g. `i32 %3`.
    pub fn argument(&self) -> String {
        self.value.as_argument()
    }
}

/// Lower any expression or statement node.
pub fn lower_node(node: &AstNode, ctx: &mut LoweringContext) -> Result<Lowered, LoweringError> {
    match node {
        AstNode::Integer { value } => Ok(lower_expr::lower_integer(*value, ctx)),
        AstNode::String { value } => Ok(lower_expr::lower_string(value, ctx)),
        AstNode::Variable { name } => lower_expr::lower_variable(name, ctx),
        AstNode::BinaryOp { op, lhs, rhs } => lower_expr::lower_binary(*op, lhs, rhs, ctx),
        AstNode::Call { func, args } => lower_expr::lower_call(func, args, ctx),
        AstNode::Let { name, value } => lower_stmt::lower_let(name, value, ctx),
        AstNode::Assign { name, value } => lower_stmt::lower_assign(name, value, ctx),
        AstNode::Sequence { first, rest } => lower_stmt::lower_sequence(first, rest, ctx),
        AstNode::If { cond, then, otherwise } => lower_stmt::lower_if(cond, then, otherwise, ctx),
        AstNode::While { cond, body } => lower_stmt::lower_while(cond, body, ctx),
        AstNode::FuncName { .. }
        | AstNode::Param { .. }
        | AstNode::Params { .. }
        | AstNode::Args { .. }
        | AstNode::Func { .. }
        | AstNode::Definitions { .. } => {
            Err(LoweringError::with(LoweringErrorKind::UnexpectedNode(node.kind_name())))
        }
    }
}
