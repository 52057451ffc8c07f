//! file: core/src/ir/lower/err.rs
//! description: fatal errors raised while lowering the AST to IR.
use crate::error::{CompileErrorExt, Level};
use crate::ir::value::IrType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoweringErrorKind {
    UnboundVariable(String),
    UnregisteredFunction(String),
    /// Assignment to something that has no stack slot (a parameter).
    StorageClass(String),
    SignatureMismatch { name: String, expected: Vec<IrType>, found: Vec<IrType> },
    DuplicateFunction(String),
    DuplicateParameter(String),
    /// A string constant used where an i32 is required.
    StringValue,
    UnexpectedNode(&'static str),
}

fn type_list(types: &[IrType]) -> String {
    types.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
}

impl std::fmt::Display for LoweringErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoweringErrorKind::UnboundVariable(name) => write!(f, "Variable '{}' is not bound.", name),
            LoweringErrorKind::UnregisteredFunction(name) => {
                write!(f, "Function '{}' is not registered.", name)
            }
            LoweringErrorKind::StorageClass(name) => {
                write!(f, "Cannot assign to '{}': it is a parameter, not a stack slot.", name)
            }
            LoweringErrorKind::SignatureMismatch { name, expected, found } => write!(
                f,
                "Call to '{}' expects ({}) but got ({}).",
                name,
                type_list(expected),
                type_list(found)
            ),
            LoweringErrorKind::DuplicateFunction(name) => {
                write!(f, "Function '{}' is already defined.", name)
            }
            LoweringErrorKind::DuplicateParameter(name) => {
                write!(f, "Parameter '{}' is declared more than once.", name)
            }
            LoweringErrorKind::StringValue => {
                write!(f, "String constants may only be passed as call arguments.")
            }
            LoweringErrorKind::UnexpectedNode(kind) => {
                write!(f, "Unexpected {} node in this position.", kind)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoweringError {
    kind: LoweringErrorKind,
    level: Level,
    issuer: String,
    function: Option<String>,
}

impl LoweringError {
    pub fn with(kind: LoweringErrorKind) -> Self {
        Self { kind, level: Level::Error, issuer: "ssalang.ir.lower".into(), function: None }
    }

    /// Attach the name of the function being lowered when the error occurred.
    pub fn in_function(mut self, name: &str) -> Self {
        if self.function.is_none() {
            self.function = Some(name.to_string());
        }
        self
    }

    pub fn kind(&self) -> &LoweringErrorKind {
        &self.kind
    }

    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }
}

impl CompileErrorExt for LoweringError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        match &self.function {
            Some(func) => format!("In function '{}': {}", func, self.kind),
            None => self.kind.to_string(),
        }
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn span(&self) -> Option<crate::location::Span> {
        None
    }

    fn location(&self) -> Option<crate::location::Location> {
        None
    }
}

impl std::fmt::Display for LoweringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for LoweringError {}
