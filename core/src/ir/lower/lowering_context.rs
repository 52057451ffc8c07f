//! file: core/src/ir/lower/lowering_context.rs
//! description: state shared by every lowering pass.
//!
//! `LoweringContext` owns what outlives a single function: the signature
//! table and the string constants hoisted to module scope. The state of the
//! function currently being lowered lives in its `FunctionBuilder`.

use std::collections::{HashMap, HashSet};

use super::err::{LoweringError, LoweringErrorKind};
use super::function_builder::{FunctionBuilder, StorageClass};
use crate::ir::module::IrGlobal;
use crate::ir::value::{IrType, Label, Register};

#[derive(Debug, Clone, Default)]
pub struct LoweringContext {
    functions: HashMap<String, Vec<IrType>>,
    reserved: HashSet<String>,
    next_constant: u32,
    globals: Vec<IrGlobal>,
    pub func: FunctionBuilder,
}

impl LoweringContext {
    /// Create an empty lowering context with no registered functions.
    pub fn new() -> Self {
        LoweringContext::default()
    }

    /// Reset per-function state. The constant counter is module-wide and is
    /// never reset.
    pub fn begin_function(&mut self) {
        self.func = FunctionBuilder::new();
    }

    pub fn next_reg(&mut self) -> Register {
        self.func.alloc_reg()
    }

    pub fn next_label(&mut self) -> Label {
        self.func.alloc_label()
    }

    pub fn current_label(&self) -> Label {
        self.func.current_label()
    }

    pub fn enter_label(&mut self, label: Label) {
        self.func.enter_label(label);
    }

    /// Claim a module-level symbol that is not callable from programs.
    pub fn reserve_symbol(&mut self, name: &str) -> Result<(), LoweringError> {
        if self.is_taken(name) {
            return Err(LoweringError::with(LoweringErrorKind::DuplicateFunction(name.to_string())));
        }
        self.reserved.insert(name.to_string());
        Ok(())
    }

    fn is_taken(&self, name: &str) -> bool {
        self.functions.contains_key(name) || self.reserved.contains(name)
    }

    pub fn register_function(&mut self, name: &str, params: Vec<IrType>) -> Result<(), LoweringError> {
        if self.is_taken(name) {
            return Err(LoweringError::with(LoweringErrorKind::DuplicateFunction(name.to_string())));
        }
        self.functions.insert(name.to_string(), params);
        Ok(())
    }

    pub fn lookup_function(&self, name: &str) -> Result<&[IrType], LoweringError> {
        self.functions
            .get(name)
            .map(|params| params.as_slice())
            .ok_or_else(|| LoweringError::with(LoweringErrorKind::UnregisteredFunction(name.to_string())))
    }

    pub fn register_variable(&mut self, name: &str, class: StorageClass) {
        self.func.bind(name, class);
    }

    pub fn lookup_variable(&self, name: &str) -> Result<StorageClass, LoweringError> {
        self.func
            .lookup(name)
            .ok_or_else(|| LoweringError::with(LoweringErrorKind::UnboundVariable(name.to_string())))
    }

    /// Declare a new string constant and return its id and array length.
    pub fn gen_header(&mut self, bytes: &[u8]) -> (u32, usize) {
        let id = self.next_constant;
        self.next_constant += 1;
        let global = IrGlobal { id, bytes: bytes.to_vec() };
        let len = global.array_len();
        log::trace!("declared string constant @.str.{} ({} bytes)", id, len);
        self.globals.push(global);
        (id, len)
    }

    pub fn globals(&self) -> &[IrGlobal] {
        &self.globals
    }

    pub fn take_globals(&mut self) -> Vec<IrGlobal> {
        std::mem::take(&mut self.globals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_function_is_rejected() {
        let mut ctx = LoweringContext::new();
        ctx.register_function("f", vec![IrType::I32]).unwrap();
        let err = ctx.register_function("f", vec![]).unwrap_err();
        assert_eq!(err.kind(), &LoweringErrorKind::DuplicateFunction("f".into()));
        assert_eq!(ctx.lookup_function("f").unwrap(), &[IrType::I32]);
    }

    #[test]
    fn reserved_symbol_cannot_be_registered_or_called() {
        let mut ctx = LoweringContext::new();
        ctx.reserve_symbol("printf").unwrap();
        let err = ctx.register_function("printf", vec![IrType::I32]).unwrap_err();
        assert_eq!(err.kind(), &LoweringErrorKind::DuplicateFunction("printf".into()));
        let err = ctx.lookup_function("printf").unwrap_err();
        assert_eq!(err.kind(), &LoweringErrorKind::UnregisteredFunction("printf".into()));
    }

    #[test]
    fn constant_ids_survive_function_reset() {
        let mut ctx = LoweringContext::new();
        assert_eq!(ctx.gen_header(b"ab"), (0, 3));
        ctx.begin_function();
        assert_eq!(ctx.gen_header(b""), (1, 1));
        assert_eq!(ctx.take_globals().len(), 2);
    }

    #[test]
    fn begin_function_clears_bindings() {
        let mut ctx = LoweringContext::new();
        ctx.register_variable("x", StorageClass::StackSlotPointer);
        ctx.next_reg();
        ctx.begin_function();
        assert!(ctx.lookup_variable("x").is_err());
        assert_eq!(ctx.next_reg(), 0);
    }
}
