pub mod lower;
pub mod module;
pub mod op;
pub mod value;

pub use self::lower::{LoweringError, LoweringErrorKind};
pub use self::module::{IrFunction, IrGlobal, IrModule};

use self::lower::LoweringContext;
use self::lower::declare_builtins::{RUNTIME_PREAMBLE, declare_builtin_functions};
use crate::CompileOptions;

/// Lower a `Definitions` tree to an IR module.
pub fn lower_ast_to_ir(ast: &crate::ast::AstNode, options: &CompileOptions) -> Result<IrModule, LoweringError> {
    let mut ctx = LoweringContext::new();
    declare_builtin_functions(&mut ctx)?;

    let functions = lower::lower_func::lower_program(ast, &mut ctx)?;
    let globals = ctx.take_globals();
    log::debug!("lowered {} function(s), {} string constant(s)", functions.len(), globals.len());

    Ok(IrModule {
        preamble: options.runtime.then(|| RUNTIME_PREAMBLE.to_string()),
        globals,
        functions,
    })
}
