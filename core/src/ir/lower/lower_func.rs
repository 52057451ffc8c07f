//! file: core/src/ir/lower/lower_func.rs
//! description: lowering of function definitions and whole programs.
//!
//! Every user function is registered before any body is lowered, so calls
//! may refer to functions defined later in the file.
use log::debug;

use super::err::{LoweringError, LoweringErrorKind};
use super::function_builder::StorageClass;
use super::{LoweringContext, lower_node};
use crate::ast::AstNode;
use crate::ir::module::IrFunction;
use crate::ir::op::IROp;
use crate::ir::value::IrType;

pub fn lower_program(ast: &AstNode, ctx: &mut LoweringContext) -> Result<Vec<IrFunction>, LoweringError> {
    let defs = match ast {
        AstNode::Definitions { defs } => defs,
        other => return Err(LoweringError::with(LoweringErrorKind::UnexpectedNode(other.kind_name()))),
    };

    for def in defs {
        let (name, params, _) = signature(def)?;
        ctx.register_function(name, vec![IrType::I32; params.len()])
            .map_err(|e| e.in_function(name))?;
    }

    defs.iter().map(|def| lower_function(def, ctx)).collect()
}

/// Lower one `Func` node with fresh register and label numbering.
pub fn lower_function(def: &AstNode, ctx: &mut LoweringContext) -> Result<IrFunction, LoweringError> {
    let (name, params, body) = signature(def)?;
    debug!("lowering function {} with {} parameter(s)", name, params.len());

    ctx.begin_function();
    let entry = ctx.next_label();
    ctx.enter_label(entry);

    let mut names: Vec<String> = Vec::with_capacity(params.len());
    for param in params {
        if names.iter().any(|n| n == param) {
            return Err(LoweringError::with(LoweringErrorKind::DuplicateParameter(param.to_string())).in_function(name));
        }
        ctx.register_variable(param, StorageClass::ValueRegister);
        names.push(param.to_string());
    }

    let lowered = lower_node(body, ctx).map_err(|e| e.in_function(name))?;
    let result = lowered.int_value().map_err(|e| e.in_function(name))?;

    let mut ops = vec![IROp::Label { label: entry }];
    ops.extend(ctx.func.slots().iter().map(|slot| IROp::Alloca { slot: slot.clone() }));
    ops.extend(lowered.code);
    ops.push(IROp::Ret { src: result });

    Ok(IrFunction { name: name.to_string(), params: names, body: ops })
}

fn signature(def: &AstNode) -> Result<(&str, Vec<&str>, &AstNode), LoweringError> {
    let unexpected = |node: &AstNode| LoweringError::with(LoweringErrorKind::UnexpectedNode(node.kind_name()));
    let AstNode::Func { name, params, body } = def else {
        return Err(unexpected(def));
    };
    let AstNode::FuncName { name } = name.as_ref() else {
        return Err(unexpected(name));
    };
    let AstNode::Params { params } = params.as_ref() else {
        return Err(unexpected(params));
    };
    let params = params
        .iter()
        .map(|p| match p {
            AstNode::Param { name } => Ok(name.as_str()),
            other => Err(unexpected(other)),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((name.as_str(), params, body.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::lower::declare_builtins::declare_builtin_functions;

    fn context() -> LoweringContext {
        let mut ctx = LoweringContext::new();
        declare_builtin_functions(&mut ctx).unwrap();
        ctx
    }

    #[test]
    fn allocas_are_hoisted_into_entry_block() {
        let mut ctx = context();
        let body = AstNode::if_else(
            AstNode::variable("a"),
            AstNode::let_binding("x", AstNode::integer(1)),
            AstNode::integer(0),
        );
        let func = lower_function(&AstNode::func("main", &["a"], body), &mut ctx).unwrap();
        assert_eq!(func.body[1], IROp::Alloca { slot: "x.slot".into() });
        assert_eq!(func.params, vec!["a".to_string()]);
    }

    #[test]
    fn functions_may_call_later_definitions() {
        let mut ctx = context();
        let program = AstNode::definitions(vec![
            AstNode::func("main", &[], AstNode::call("helper", vec![AstNode::integer(1)])),
            AstNode::func("helper", &["n"], AstNode::variable("n")),
        ]);
        let funcs = lower_program(&program, &mut ctx).unwrap();
        assert_eq!(funcs.len(), 2);
    }

    #[test]
    fn redefining_an_intrinsic_is_rejected() {
        let mut ctx = context();
        let program = AstNode::definitions(vec![AstNode::func("print", &["v"], AstNode::variable("v"))]);
        let err = lower_program(&program, &mut ctx).unwrap_err();
        assert_eq!(err.kind(), &LoweringErrorKind::DuplicateFunction("print".into()));
    }

    #[test]
    fn runtime_libc_names_are_reserved() {
        for name in ["printf", "scanf"] {
            let mut ctx = context();
            let program = AstNode::definitions(vec![
                AstNode::func(name, &["a"], AstNode::variable("a")),
                AstNode::func("main", &[], AstNode::integer(0)),
            ]);
            let err = lower_program(&program, &mut ctx).unwrap_err();
            assert_eq!(err.kind(), &LoweringErrorKind::DuplicateFunction(name.into()));
        }
    }

    #[test]
    fn libc_names_are_not_callable() {
        let mut ctx = context();
        let program = AstNode::definitions(vec![AstNode::func(
            "main",
            &[],
            AstNode::call("printf", vec![AstNode::string("%d")]),
        )]);
        let err = lower_program(&program, &mut ctx).unwrap_err();
        assert_eq!(err.kind(), &LoweringErrorKind::UnregisteredFunction("printf".into()));
    }

    #[test]
    fn repeated_parameter_is_rejected() {
        let mut ctx = context();
        let err = lower_function(&AstNode::func("f", &["a", "a"], AstNode::integer(0)), &mut ctx).unwrap_err();
        assert_eq!(err.kind(), &LoweringErrorKind::DuplicateParameter("a".into()));
        assert_eq!(err.function(), Some("f"));
    }

    #[test]
    fn string_result_is_rejected() {
        let mut ctx = context();
        let err = lower_function(&AstNode::func("f", &[], AstNode::string("s")), &mut ctx).unwrap_err();
        assert_eq!(err.kind(), &LoweringErrorKind::StringValue);
    }
}
