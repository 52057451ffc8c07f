//! file: core/src/ir/lower/lower_expr.rs
//! description: lowering of literals, variables, arithmetic and calls.
use super::err::{LoweringError, LoweringErrorKind};
use super::function_builder::{StorageClass, slot_name};
use super::{Lowered, LoweringContext, lower_node};
use crate::ast::{AstNode, BinaryOperator};
use crate::ir::op::{Cond, IROp};
use crate::ir::value::{IrType, Value};

pub fn lower_integer(value: i32, ctx: &LoweringContext) -> Lowered {
    Lowered::value(Value::Const(value), ctx)
}

/// Declare a string constant; the node's value is a pointer to its first byte.
pub fn lower_string(value: &str, ctx: &mut LoweringContext) -> Lowered {
    let (id, len) = ctx.gen_header(value.as_bytes());
    Lowered::value(Value::Str { id, len }, ctx)
}

pub fn lower_variable(name: &str, ctx: &mut LoweringContext) -> Result<Lowered, LoweringError> {
    match ctx.lookup_variable(name)? {
        StorageClass::ValueRegister => Ok(Lowered::value(Value::Param(name.to_string()), ctx)),
        StorageClass::StackSlotPointer => {
            let dest = ctx.next_reg();
            Ok(Lowered {
                code: vec![IROp::Load { dest, slot: slot_name(name) }],
                value: Value::Reg(dest),
                label: ctx.current_label(),
            })
        }
    }
}

pub fn lower_binary(
    op: BinaryOperator,
    lhs: &AstNode,
    rhs: &AstNode,
    ctx: &mut LoweringContext,
) -> Result<Lowered, LoweringError> {
    let left = lower_node(lhs, ctx)?;
    let right = lower_node(rhs, ctx)?;
    let (lv, rv) = (left.int_value()?, right.int_value()?);

    let mut code = left.code;
    code.extend(right.code);

    let dest = if op.is_comparison() {
        let cond = match op {
            BinaryOperator::Lt => Cond::Slt,
            _ => Cond::Eq,
        };
        let flag = ctx.next_reg();
        let dest = ctx.next_reg();
        code.push(IROp::Icmp { dest: flag, cond, lhs: lv, rhs: rv });
        code.push(IROp::Zext { dest, src: flag });
        dest
    } else {
        let dest = ctx.next_reg();
        code.push(match op {
            BinaryOperator::Add => IROp::Add { dest, lhs: lv, rhs: rv },
            BinaryOperator::Sub => IROp::Sub { dest, lhs: lv, rhs: rv },
            BinaryOperator::Mul => IROp::Mul { dest, lhs: lv, rhs: rv },
            _ => IROp::SDiv { dest, lhs: lv, rhs: rv },
        });
        dest
    };

    Ok(Lowered { code, value: Value::Reg(dest), label: right.label })
}

/// Lower a call. The callee must already be registered; this is checked
/// before any argument is lowered.
pub fn lower_call(func: &AstNode, args: &AstNode, ctx: &mut LoweringContext) -> Result<Lowered, LoweringError> {
    let name = match func {
        AstNode::FuncName { name } => name,
        other => return Err(LoweringError::with(LoweringErrorKind::UnexpectedNode(other.kind_name()))),
    };
    let expected = ctx.lookup_function(name)?.to_vec();

    let (mut code, values) = lower_args(args, ctx)?;
    let found: Vec<IrType> = values.iter().map(Value::ty).collect();
    if found != expected {
        return Err(LoweringError::with(LoweringErrorKind::SignatureMismatch {
            name: name.clone(),
            expected,
            found,
        }));
    }

    let dest = ctx.next_reg();
    code.push(IROp::Call { dest, callee: name.clone(), args: values });
    Ok(Lowered { code, value: Value::Reg(dest), label: ctx.current_label() })
}

/// Lower call arguments left to right. Strings are allowed here.
pub fn lower_args(args: &AstNode, ctx: &mut LoweringContext) -> Result<(Vec<IROp>, Vec<Value>), LoweringError> {
    let nodes = match args {
        AstNode::Args { values } => values,
        other => return Err(LoweringError::with(LoweringErrorKind::UnexpectedNode(other.kind_name()))),
    };
    let mut code = Vec::new();
    let mut values = Vec::with_capacity(nodes.len());
    for node in nodes {
        let lowered = lower_node(node, ctx)?;
        code.extend(lowered.code);
        values.push(lowered.value);
    }
    Ok((code, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::lower::declare_builtins::declare_builtin_functions;
    use crate::ir::value::Label;

    fn context() -> LoweringContext {
        let mut ctx = LoweringContext::new();
        declare_builtin_functions(&mut ctx).unwrap();
        ctx
    }

    #[test]
    fn integer_emits_no_code() {
        let ctx = context();
        let lowered = lower_integer(42, &ctx);
        assert!(lowered.code.is_empty());
        assert_eq!(lowered.value, Value::Const(42));
        assert_eq!(lowered.argument(), "i32 42");
    }

    #[test]
    fn comparison_widens_to_i32() {
        let mut ctx = context();
        let lowered = lower_node(&AstNode::less(AstNode::integer(1), AstNode::integer(2)), &mut ctx).unwrap();
        assert_eq!(
            lowered.code,
            vec![
                IROp::Icmp { dest: 0, cond: Cond::Slt, lhs: Value::Const(1), rhs: Value::Const(2) },
                IROp::Zext { dest: 1, src: 0 },
            ]
        );
        assert_eq!(lowered.value, Value::Reg(1));
    }

    #[test]
    fn division_is_signed() {
        let mut ctx = context();
        let lowered = lower_node(&AstNode::div(AstNode::integer(7), AstNode::integer(2)), &mut ctx).unwrap();
        assert!(matches!(lowered.code.as_slice(), [IROp::SDiv { dest: 0, .. }]));
    }

    #[test]
    fn operands_are_numbered_before_result() {
        let mut ctx = context();
        ctx.register_variable("x", StorageClass::StackSlotPointer);
        let node = AstNode::add(AstNode::variable("x"), AstNode::variable("x"));
        let lowered = lower_node(&node, &mut ctx).unwrap();
        assert_eq!(
            lowered.code,
            vec![
                IROp::Load { dest: 0, slot: "x.slot".into() },
                IROp::Load { dest: 1, slot: "x.slot".into() },
                IROp::Add { dest: 2, lhs: Value::Reg(0), rhs: Value::Reg(1) },
            ]
        );
        assert_eq!(lowered.label, Label(0));
    }

    #[test]
    fn unregistered_call_fails_before_arguments() {
        let mut ctx = context();
        let node = AstNode::call("missing", vec![AstNode::string("abc")]);
        let err = lower_node(&node, &mut ctx).unwrap_err();
        assert_eq!(err.kind(), &LoweringErrorKind::UnregisteredFunction("missing".into()));
        assert!(ctx.globals().is_empty());
        assert_eq!(ctx.func.reg_count(), 0);
    }

    #[test]
    fn string_argument_to_puts() {
        let mut ctx = context();
        let lowered = lower_node(&AstNode::call("puts", vec![AstNode::string("hi")]), &mut ctx).unwrap();
        assert_eq!(
            lowered.code[0].to_string(),
            "  %0 = call i32 @puts(i8* getelementptr inbounds ([3 x i8], [3 x i8]* @.str.0, i64 0, i64 0))"
        );
    }

    #[test]
    fn wrong_argument_count_is_rejected() {
        let mut ctx = context();
        let err = lower_node(&AstNode::call("print", vec![]), &mut ctx).unwrap_err();
        assert!(matches!(err.kind(), LoweringErrorKind::SignatureMismatch { .. }));
    }

    #[test]
    fn string_operand_is_rejected() {
        let mut ctx = context();
        let err = lower_node(&AstNode::add(AstNode::string("a"), AstNode::integer(1)), &mut ctx).unwrap_err();
        assert_eq!(err.kind(), &LoweringErrorKind::StringValue);
    }
}
