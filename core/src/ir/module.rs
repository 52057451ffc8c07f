//! file: core/src/ir/module.rs
//! description: lowered program and its textual assembly.
//!
//! `IrModule`'s `Display` is the program assembler: runtime preamble first,
//! then the hoisted string constants, then every function body.
use super::op::IROp;

/// A private string constant `@.str.<id>`, null-terminated on output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrGlobal {
    pub id: u32,
    pub bytes: Vec<u8>,
}

impl IrGlobal {
    /// Size of the constant array, terminator included.
    pub fn array_len(&self) -> usize {
        self.bytes.len() + 1
    }
}

fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for b in bytes {
        match b {
            b'"' | b'\\' => out.push_str(&format!("\\{:02X}", b)),
            0x20..=0x7e => out.push(*b as char),
            _ => out.push_str(&format!("\\{:02X}", b)),
        }
    }
    out
}

impl std::fmt::Display for IrGlobal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "@.str.{} = private unnamed_addr constant [{} x i8] c\"{}\\00\", align 1",
            self.id,
            self.array_len(),
            escape_bytes(&self.bytes)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrFunction {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<IROp>,
}

impl std::fmt::Display for IrFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self
            .params
            .iter()
            .map(|p| format!("i32 %{}", p))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "define i32 @{}({}) {{", self.name, params)?;
        for op in &self.body {
            writeln!(f, "{}", op)?;
        }
        write!(f, "}}")
    }
}

#[derive(Debug, Clone, Default)]
pub struct IrModule {
    pub preamble: Option<String>,
    pub globals: Vec<IrGlobal>,
    pub functions: Vec<IrFunction>,
}

impl IrModule {
    pub fn function(&self, name: &str) -> Option<&IrFunction> {
        self.functions.iter().find(|func| func.name == name)
    }

    /// Every op of every function, in output order.
    pub fn ops(&self) -> impl Iterator<Item = &IROp> {
        self.functions.iter().flat_map(|func| func.body.iter())
    }

    pub fn count_ops(&self, pred: impl Fn(&IROp) -> bool) -> usize {
        self.ops().filter(|op| pred(op)).count()
    }
}

impl std::fmt::Display for IrModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(preamble) = &self.preamble {
            writeln!(f, "{}", preamble.trim_end())?;
            writeln!(f)?;
        }
        if !self.globals.is_empty() {
            for global in &self.globals {
                writeln!(f, "{}", global)?;
            }
            writeln!(f)?;
        }
        for func in &self.functions {
            writeln!(f, "{}", func)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
