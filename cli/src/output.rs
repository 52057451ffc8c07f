/// cli/src/output.rs
/// Output utilities for the CLI
/// description: console styling, the stderr logger, token tables and the
/// JSON envelope for AST dumps.
use std::io::Write;

use comfy_table::{Table, presets::UTF8_FULL};
use console::Style;
use log::{LevelFilter, Log, Metadata, Record};
use serde::Serialize;
use ssalang_core::{AstNode, CompileErrorExt, Token, generate_error_report};

/// Styles for different output elements
pub struct FormatStyle {
    pub title: Style,
    pub info: Style,
    pub warning: Style,
    pub error: Style,
    pub trace: Style,
}

impl Default for FormatStyle {
    fn default() -> Self {
        FormatStyle {
            title: Style::new().for_stderr().bold().underlined(),
            info: Style::new().for_stderr().cyan(),
            warning: Style::new().for_stderr().yellow(),
            error: Style::new().for_stderr().red().bold(),
            trace: Style::new().for_stderr().dim(),
        }
    }
}

/// ====================================================================
/// Logger

/// `log` backend writing styled records to stderr.
pub struct ConsoleLogger {
    level: LevelFilter,
    formatting: FormatStyle,
}

impl ConsoleLogger {
    pub fn new(level: LevelFilter) -> Self {
        ConsoleLogger { level, formatting: FormatStyle::default() }
    }

    fn style_for(&self, level: log::Level) -> &Style {
        match level {
            log::Level::Error => &self.formatting.error,
            log::Level::Warn => &self.formatting.warning,
            log::Level::Info => &self.formatting.info,
            log::Level::Debug | log::Level::Trace => &self.formatting.trace,
        }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = format!("[{:<5}]", record.level());
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{} {}", self.style_for(record.level()).apply_to(tag), record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Map the number of `-v` flags to a level filter.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init_logger(verbosity: u8) {
    let level = level_for(verbosity);
    if log::set_boxed_logger(Box::new(ConsoleLogger::new(level))).is_ok() {
        log::set_max_level(level);
    }
}

/// ====================================================================
/// Dumps

/// One row per token: index, kind, lexeme and byte range.
pub fn render_token_table(tokens: &[Token]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Kind", "Lexeme", "Begin", "End"]);
    for (i, token) in tokens.iter().enumerate() {
        table.add_row(vec![
            i.to_string(),
            token.kind.to_string(),
            format!("{:?}", token.lexeme),
            token.begin.to_string(),
            token.end.to_string(),
        ]);
    }
    table.to_string()
}

#[derive(Serialize)]
pub struct AstDump<'a> {
    pub file: &'a str,
    pub rule: String,
    pub ast: &'a AstNode,
}

impl AstDump<'_> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// ====================================================================
/// Errors

pub fn print_error(error: &dyn CompileErrorExt) {
    let style = FormatStyle::default();
    eprintln!("{}", style.error.apply_to(generate_error_report(error)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssalang_core::tokenize;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(1), LevelFilter::Debug);
        assert_eq!(level_for(5), LevelFilter::Trace);
    }

    #[test]
    fn token_table_lists_every_token() {
        let tokens = tokenize("let x = 1").unwrap();
        let table = render_token_table(&tokens);
        assert!(table.contains("Kind"));
        assert!(table.contains("\"x\""));
        assert_eq!(table.matches("Integer").count(), 1);
    }

    #[test]
    fn ast_dump_carries_the_tree() {
        let ast = AstNode::integer(3);
        let dump = AstDump { file: "t.sl", rule: "IntLit".into(), ast: &ast };
        let json: serde_json::Value = serde_json::from_str(&dump.to_json().unwrap()).unwrap();
        assert_eq!(json["ast"]["kind"], "Integer");
        assert_eq!(json["ast"]["value"], 3);
        assert_eq!(json["rule"], "IntLit");
    }
}
