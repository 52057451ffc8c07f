//! file: core/src/ir/value.rs
//! description: operands, labels and the two IR value types.

/// Number of a virtual register (`%N`), unique within one function.
pub type Register = u32;

/// A basic-block label, printed `label.N`, unique within one function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub u32);

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "label.{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrType {
    I32,
    I8Ptr,
}

impl std::fmt::Display for IrType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IrType::I32 => write!(f, "i32"),
            IrType::I8Ptr => write!(f, "i8*"),
        }
    }
}

/// An instruction operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Result of an earlier instruction.
    Reg(Register),
    /// A by-value function parameter, bound at entry.
    Param(String),
    /// Immediate integer.
    Const(i32),
    /// Pointer to the first byte of string constant `@.str.<id>`, which
    /// holds `len` bytes including the terminating null.
    Str { id: u32, len: usize },
}

impl Value {
    pub fn ty(&self) -> IrType {
        match self {
            Value::Str { .. } => IrType::I8Ptr,
            _ => IrType::I32,
        }
    }

    /// Render as a call-site operand: type tag followed by the value.
    pub fn as_argument(&self) -> String {
        format!("{} {}", self.ty(), self)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Reg(r) => write!(f, "%{}", r),
            Value::Param(name) => write!(f, "%{}", name),
            Value::Const(v) => write!(f, "{}", v),
            Value::Str { id, len } => write!(
                f,
                "getelementptr inbounds ([{len} x i8], [{len} x i8]* @.str.{id}, i64 0, i64 0)",
                len = len,
                id = id
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_carry_their_type() {
        assert_eq!(Value::Reg(3).as_argument(), "i32 %3");
        assert_eq!(Value::Const(-7).as_argument(), "i32 -7");
        assert_eq!(Value::Param("n".into()).as_argument(), "i32 %n");
        assert_eq!(
            Value::Str { id: 2, len: 4 }.as_argument(),
            "i8* getelementptr inbounds ([4 x i8], [4 x i8]* @.str.2, i64 0, i64 0)"
        );
    }
}
