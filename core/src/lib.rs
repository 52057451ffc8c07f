pub mod ast;
pub mod error;
pub mod ir;
pub mod location;
pub mod parse;
pub mod script;
pub mod token;

pub use ast::AstNode;
pub use error::{CompileErrorExt, Level};
pub use ir::{IrModule, lower_ast_to_ir};
pub use location::{Location, Span};
pub use parse::{Rule, SyntaxError, parse, parse_rule};
pub use script::Script;
pub use token::{Token, TokenKind, tokenize};

use error::boxed;

/// Knobs for a single compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Emit the runtime preamble (format strings, libc declarations and the
    /// `print`/`read` definitions) ahead of the program.
    pub runtime: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions { runtime: true }
    }
}

pub fn generate_error_report<E: CompileErrorExt + ?Sized>(error: &E) -> String {
    let level = error.level();
    let location = match error.location() {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    };
    let message = error.message();

    format!("SSALANG | {} | {} | {}", level, location, message)
}

/// Attach a source location to a syntax error from the token it stopped at.
fn locate_syntax_error(error: SyntaxError, tokens: &[Token], script: &Script) -> SyntaxError {
    let offset = tokens
        .get(error.position())
        .map(|t| t.begin)
        .unwrap_or(script.content.len());
    let location = script.location_of(offset);
    error.with_location(location)
}

/// Tokenize and parse a script into its `Definitions` tree.
pub fn generate_ast_from_source(script: &Script) -> Result<AstNode, Box<dyn CompileErrorExt>> {
    let tokens = token::tokenize_script(script).map_err(boxed)?;
    parse::parse(&tokens).map_err(|e| boxed(locate_syntax_error(e, &tokens, script)))
}

pub fn compile_source_to_ir(script: &Script, options: &CompileOptions) -> Result<String, Box<dyn CompileErrorExt>> {
    let ast = generate_ast_from_source(script)?;
    let module = lower_ast_to_ir(&ast, options).map_err(boxed)?;
    Ok(module.to_string())
}

/// Compile program text to IR text.
pub fn compile(source: &str, options: &CompileOptions) -> Result<String, Box<dyn CompileErrorExt>> {
    compile_source_to_ir(&Script::from_source("<input>", source), options)
}
