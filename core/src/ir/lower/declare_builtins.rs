//! file: core/src/ir/lower/declare_builtins.rs
//! description: intrinsic functions and the runtime that implements them.
//!
//! `print`, `read` and `puts` are callable from every program. `print` and
//! `read` are defined by `RUNTIME_PREAMBLE` on top of the C library;
//! `puts` is the C function itself. `printf` and `scanf` are declared by the
//! runtime but not callable, so their names are reserved.
use crate::ir::lower::{LoweringContext, LoweringError};
use crate::ir::value::IrType;

pub const BUILTINS: &[(&str, &[IrType])] = &[
    ("print", &[IrType::I32]),
    ("read", &[]),
    ("puts", &[IrType::I8Ptr]),
];

pub const RESERVED_SYMBOLS: &[&str] = &["printf", "scanf"];

pub const RUNTIME_PREAMBLE: &str = r#"@.intfmt = private unnamed_addr constant [4 x i8] c"%d\0A\00", align 1
@.readfmt = private unnamed_addr constant [3 x i8] c"%d\00", align 1

declare i32 @printf(i8*, ...)
declare i32 @scanf(i8*, ...)
declare i32 @puts(i8*)

define i32 @print(i32 %value) {
  %1 = call i32 (i8*, ...) @printf(i8* getelementptr inbounds ([4 x i8], [4 x i8]* @.intfmt, i64 0, i64 0), i32 %value)
  ret i32 %value
}

define i32 @read() {
  %slot = alloca i32, align 4
  %1 = call i32 (i8*, ...) @scanf(i8* getelementptr inbounds ([3 x i8], [3 x i8]* @.readfmt, i64 0, i64 0), i32* %slot)
  %2 = load i32, i32* %slot, align 4
  ret i32 %2
}
"#;

/// Register the intrinsics and reserve the runtime's libc symbols. This
/// runs on a fresh context whether or not the preamble is emitted.
pub(crate) fn declare_builtin_functions(ctx: &mut LoweringContext) -> Result<(), LoweringError> {
    for (name, params) in BUILTINS {
        ctx.register_function(name, params.to_vec())?;
    }
    for name in RESERVED_SYMBOLS {
        ctx.reserve_symbol(name)?;
    }
    Ok(())
}
