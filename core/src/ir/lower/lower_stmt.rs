//! Lowering of bindings, sequencing and control flow.
//!
//! Register and label numbers are handed out in exactly the order their
//! definitions appear in the emitted text, which the IR requires.
use super::err::{LoweringError, LoweringErrorKind};
use super::function_builder::{StorageClass, slot_name};
use super::{Lowered, LoweringContext, lower_node};
use crate::ast::AstNode;
use crate::ir::op::{Cond, IROp};
use crate::ir::value::Value;

/// `let name = value`: store into the variable's stack slot and reload it.
/// The slot is declared once per function and hoisted into the entry block.
pub fn lower_let(name: &str, value: &AstNode, ctx: &mut LoweringContext) -> Result<Lowered, LoweringError> {
    let rhs = lower_node(value, ctx)?;
    let src = rhs.int_value()?;

    ctx.func.declare_slot(name);
    ctx.register_variable(name, StorageClass::StackSlotPointer);

    Ok(store_and_reload(name, rhs, src, ctx))
}

pub fn lower_assign(name: &str, value: &AstNode, ctx: &mut LoweringContext) -> Result<Lowered, LoweringError> {
    if ctx.lookup_variable(name)? == StorageClass::ValueRegister {
        return Err(LoweringError::with(LoweringErrorKind::StorageClass(name.to_string())));
    }
    let rhs = lower_node(value, ctx)?;
    let src = rhs.int_value()?;
    Ok(store_and_reload(name, rhs, src, ctx))
}

fn store_and_reload(name: &str, rhs: Lowered, src: Value, ctx: &mut LoweringContext) -> Lowered {
    let slot = slot_name(name);
    let dest = ctx.next_reg();
    let mut code = rhs.code;
    code.push(IROp::Store { src, slot: slot.clone() });
    code.push(IROp::Load { dest, slot });
    Lowered { code, value: Value::Reg(dest), label: rhs.label }
}

/// `first; rest`: both parts run, the value is the value of `rest`.
pub fn lower_sequence(first: &AstNode, rest: &AstNode, ctx: &mut LoweringContext) -> Result<Lowered, LoweringError> {
    let head = lower_node(first, ctx)?;
    let tail = lower_node(rest, ctx)?;
    let mut code = head.code;
    code.extend(tail.code);
    Ok(Lowered { code, value: tail.value, label: tail.label })
}

/// `if c { t } else { e }` lowers to a diamond joined by a phi.
pub fn lower_if(
    cond: &AstNode,
    then: &AstNode,
    otherwise: &AstNode,
    ctx: &mut LoweringContext,
) -> Result<Lowered, LoweringError> {
    let test = lower_node(cond, ctx)?;
    let test_value = test.int_value()?;
    let flag = ctx.next_reg();

    let then_label = ctx.next_label();
    ctx.enter_label(then_label);
    let then_arm = lower_node(then, ctx)?;
    let then_value = then_arm.int_value()?;

    let else_label = ctx.next_label();
    ctx.enter_label(else_label);
    let else_arm = lower_node(otherwise, ctx)?;
    let else_value = else_arm.int_value()?;

    let join_label = ctx.next_label();
    ctx.enter_label(join_label);
    let dest = ctx.next_reg();

    let mut code = test.code;
    code.push(IROp::Icmp { dest: flag, cond: Cond::Ne, lhs: test_value, rhs: Value::Const(0) });
    code.push(IROp::CondBr { cond: flag, then: then_label, otherwise: else_label });
    code.push(IROp::Label { label: then_label });
    code.extend(then_arm.code);
    code.push(IROp::Br { target: join_label });
    code.push(IROp::Label { label: else_label });
    code.extend(else_arm.code);
    code.push(IROp::Br { target: join_label });
    code.push(IROp::Label { label: join_label });
    code.push(IROp::Phi {
        dest,
        incoming: vec![(then_value, then_arm.label), (else_value, else_arm.label)],
    });

    Ok(Lowered { code, value: Value::Reg(dest), label: join_label })
}

/// `while c { b }` lowers to a header block holding the loop's value.
///
/// The header phi yields 0 on entry and the body's value on every back
/// edge, so the loop evaluates to 0 when the body never runs.
pub fn lower_while(cond: &AstNode, body: &AstNode, ctx: &mut LoweringContext) -> Result<Lowered, LoweringError> {
    let entry_label = ctx.current_label();
    let head_label = ctx.next_label();
    let result = ctx.next_reg();
    ctx.enter_label(head_label);

    let test = lower_node(cond, ctx)?;
    let test_value = test.int_value()?;
    let flag = ctx.next_reg();

    let body_label = ctx.next_label();
    ctx.enter_label(body_label);
    let looped = lower_node(body, ctx)?;
    let body_value = looped.int_value()?;

    let end_label = ctx.next_label();
    ctx.enter_label(end_label);

    let mut code = vec![
        IROp::Br { target: head_label },
        IROp::Label { label: head_label },
        IROp::Phi {
            dest: result,
            incoming: vec![(Value::Const(0), entry_label), (body_value, looped.label)],
        },
    ];
    code.extend(test.code);
    code.push(IROp::Icmp { dest: flag, cond: Cond::Ne, lhs: test_value, rhs: Value::Const(0) });
    code.push(IROp::CondBr { cond: flag, then: body_label, otherwise: end_label });
    code.push(IROp::Label { label: body_label });
    code.extend(looped.code);
    code.push(IROp::Br { target: head_label });
    code.push(IROp::Label { label: end_label });

    Ok(Lowered { code, value: Value::Reg(result), label: end_label })
}
