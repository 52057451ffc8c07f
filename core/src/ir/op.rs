use super::value::{Label, Register, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    Slt,
    Eq,
    Ne,
}

impl std::fmt::Display for Cond {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cond::Slt => write!(f, "slt"),
            Cond::Eq => write!(f, "eq"),
            Cond::Ne => write!(f, "ne"),
        }
    }
}

/// One line of a function body. Every integer is i32; only `icmp` yields i1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IROp {
    Label { label: Label },

    Alloca { slot: String },
    Store { src: Value, slot: String },
    Load { dest: Register, slot: String },

    Add { dest: Register, lhs: Value, rhs: Value },
    Sub { dest: Register, lhs: Value, rhs: Value },
    Mul { dest: Register, lhs: Value, rhs: Value },
    SDiv { dest: Register, lhs: Value, rhs: Value },

    Icmp { dest: Register, cond: Cond, lhs: Value, rhs: Value },
    Zext { dest: Register, src: Register },

    Br { target: Label },
    CondBr { cond: Register, then: Label, otherwise: Label },
    Phi { dest: Register, incoming: Vec<(Value, Label)> },

    Call { dest: Register, callee: String, args: Vec<Value> },
    Ret { src: Value },
}

impl IROp {
    /// Whether this op ends a basic block.
    pub fn is_terminator(&self) -> bool {
        matches!(self, IROp::Br { .. } | IROp::CondBr { .. } | IROp::Ret { .. })
    }
}

impl std::fmt::Display for IROp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IROp::Label { label } => write!(f, "{}:", label),
            IROp::Alloca { slot } => write!(f, "  %{} = alloca i32, align 4", slot),
            IROp::Store { src, slot } => write!(f, "  store i32 {}, i32* %{}, align 4", src, slot),
            IROp::Load { dest, slot } => write!(f, "  %{} = load i32, i32* %{}, align 4", dest, slot),
            IROp::Add { dest, lhs, rhs } => write!(f, "  %{} = add i32 {}, {}", dest, lhs, rhs),
            IROp::Sub { dest, lhs, rhs } => write!(f, "  %{} = sub i32 {}, {}", dest, lhs, rhs),
            IROp::Mul { dest, lhs, rhs } => write!(f, "  %{} = mul i32 {}, {}", dest, lhs, rhs),
            IROp::SDiv { dest, lhs, rhs } => write!(f, "  %{} = sdiv i32 {}, {}", dest, lhs, rhs),
            IROp::Icmp { dest, cond, lhs, rhs } => {
                write!(f, "  %{} = icmp {} i32 {}, {}", dest, cond, lhs, rhs)
            }
            IROp::Zext { dest, src } => write!(f, "  %{} = zext i1 %{} to i32", dest, src),
            IROp::Br { target } => write!(f, "  br label %{}", target),
            IROp::CondBr { cond, then, otherwise } => {
                write!(f, "  br i1 %{}, label %{}, label %{}", cond, then, otherwise)
            }
            IROp::Phi { dest, incoming } => {
                write!(f, "  %{} = phi i32 ", dest)?;
                for (i, (value, label)) in incoming.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "[ {}, %{} ]", value, label)?;
                }
                Ok(())
            }
            IROp::Call { dest, callee, args } => {
                write!(f, "  %{} = call i32 @{}(", dest, callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg.as_argument())?;
                }
                write!(f, ")")
            }
            IROp::Ret { src } => write!(f, "  ret i32 {}", src),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_and_widening() {
        let cmp = IROp::Icmp { dest: 2, cond: Cond::Slt, lhs: Value::Reg(0), rhs: Value::Const(5) };
        let ext = IROp::Zext { dest: 3, src: 2 };
        assert_eq!(cmp.to_string(), "  %2 = icmp slt i32 %0, 5");
        assert_eq!(ext.to_string(), "  %3 = zext i1 %2 to i32");
    }

    #[test]
    fn phi_lists_every_incoming_edge() {
        let phi = IROp::Phi {
            dest: 7,
            incoming: vec![(Value::Const(0), Label(0)), (Value::Reg(6), Label(2))],
        };
        assert_eq!(phi.to_string(), "  %7 = phi i32 [ 0, %label.0 ], [ %6, %label.2 ]");
    }

    #[test]
    fn call_renders_typed_arguments() {
        let call = IROp::Call {
            dest: 1,
            callee: "f".into(),
            args: vec![Value::Const(1), Value::Param("a".into())],
        };
        assert_eq!(call.to_string(), "  %1 = call i32 @f(i32 1, i32 %a)");
    }

    #[test]
    fn stack_slot_traffic() {
        assert_eq!(IROp::Alloca { slot: "x.slot".into() }.to_string(), "  %x.slot = alloca i32, align 4");
        assert_eq!(
            IROp::Store { src: Value::Const(10), slot: "x.slot".into() }.to_string(),
            "  store i32 10, i32* %x.slot, align 4"
        );
        assert!(IROp::Ret { src: Value::Const(0) }.is_terminator());
        assert!(!IROp::Label { label: Label(1) }.is_terminator());
    }
}
