use std::collections::HashMap;

use crate::ir::value::{Label, Register};

/// How a name is bound inside a function body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    /// A by-value parameter, read directly as `%name`.
    ValueRegister,
    /// A `let` binding living in stack slot `%name.slot`.
    StackSlotPointer,
}

/// Per-function lowering state: register and label counters, the label of
/// the block currently being filled, and the variable bindings. A fresh
/// builder is created for every function definition.
#[derive(Debug, Clone)]
pub struct FunctionBuilder {
    next_reg: Register,
    next_label: u32,
    current_label: Label,
    variables: HashMap<String, StorageClass>,
    slots: Vec<String>,
}

impl Default for FunctionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionBuilder {
    pub fn new() -> Self {
        FunctionBuilder {
            next_reg: 0,
            next_label: 0,
            current_label: Label(0),
            variables: HashMap::new(),
            slots: Vec::new(),
        }
    }

    pub fn alloc_reg(&mut self) -> Register {
        let r = self.next_reg;
        self.next_reg += 1;
        r
    }

    pub fn alloc_label(&mut self) -> Label {
        let l = Label(self.next_label);
        self.next_label += 1;
        l
    }

    /// Registers handed out so far.
    pub fn reg_count(&self) -> u32 {
        self.next_reg
    }

    pub fn current_label(&self) -> Label {
        self.current_label
    }

    /// Mark `label` as the block subsequent code is emitted into.
    pub fn enter_label(&mut self, label: Label) {
        self.current_label = label;
    }

    pub fn bind(&mut self, name: &str, class: StorageClass) {
        self.variables.insert(name.to_string(), class);
    }

    pub fn lookup(&self, name: &str) -> Option<StorageClass> {
        self.variables.get(name).copied()
    }

    /// Reserve the stack slot for `name`. Returns false if it already exists.
    pub fn declare_slot(&mut self, name: &str) -> bool {
        let slot = slot_name(name);
        if self.slots.contains(&slot) {
            return false;
        }
        self.slots.push(slot);
        true
    }

    /// Slots declared so far, in declaration order.
    pub fn slots(&self) -> &[String] {
        &self.slots
    }
}

/// Name of the stack slot backing `let` variable `name`.
pub fn slot_name(name: &str) -> String {
    format!("{}.slot", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_sequential() {
        let mut fb = FunctionBuilder::new();
        assert_eq!(fb.alloc_reg(), 0);
        assert_eq!(fb.alloc_reg(), 1);
        assert_eq!(fb.alloc_label(), Label(0));
        assert_eq!(fb.alloc_label(), Label(1));
        assert_eq!(fb.reg_count(), 2);
    }

    #[test]
    fn slots_are_declared_once() {
        let mut fb = FunctionBuilder::new();
        assert!(fb.declare_slot("x"));
        assert!(!fb.declare_slot("x"));
        assert!(fb.declare_slot("y"));
        assert_eq!(fb.slots(), ["x.slot".to_string(), "y.slot".to_string()]);
    }
}
