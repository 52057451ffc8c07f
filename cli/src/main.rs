mod output;

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{debug, info};
use ssalang_core::error::boxed;
use ssalang_core::ir::lower_ast_to_ir;
use ssalang_core::location::{Location, Span};
use ssalang_core::token::tokenize_script;
use ssalang_core::{CompileErrorExt, CompileOptions, Level, Rule, Script, generate_ast_from_source, parse_rule};

use crate::output::{AstDump, init_logger, print_error, render_token_table};

/// Parsing and lowering recurse once per nesting level; the compiler thread
/// gets enough stack for the parser's depth bound.
const COMPILER_STACK_SIZE: usize = 64 * 1024 * 1024;

fn main() -> ExitCode {
    let cli = Command::new("ssalang")
        .version("0.1.0")
        .about("Compile ssalang programs to SSA intermediate representation");

    let cli = setup_cli(cli);
    let matches = cli.get_matches();
    init_logger(matches.get_count("verbose"));

    let worker = std::thread::Builder::new()
        .name("compiler".into())
        .stack_size(COMPILER_STACK_SIZE)
        .spawn(move || match dispatch_commands(&matches) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                print_error(e.as_ref());
                ExitCode::FAILURE
            }
        });

    match worker {
        Ok(handle) => handle.join().unwrap_or(ExitCode::FAILURE),
        Err(e) => {
            print_error(&CliError::new(format!("Failed to start compiler thread: {}", e)));
            ExitCode::FAILURE
        }
    }
}

/// Sets up the CLI with its subcommands and arguments.
fn setup_cli(cli: Command) -> Command {
    cli.arg(
        Arg::new("verbose")
            .help("Raise log verbosity (-v debug, -vv trace)")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .global(true),
    )
    .subcommand(
        Command::new("build")
            .about("Compile the specified source file")
            .arg(
                Arg::new("file")
                    .help("The source file to compile, or - for stdin")
                    .required(true)
                    .index(1),
            )
            .arg(
                Arg::new("dump")
                    .help("Stage to print instead of the default IR")
                    .short('d')
                    .long("dump")
                    .value_parser(["tokens", "ast", "ir"])
                    .default_value("ir")
                    .value_name("STAGE"),
            )
            .arg(
                Arg::new("rule")
                    .help("Grammar rule used as the parse root for --dump ast")
                    .long("rule")
                    .value_parser(clap::value_parser!(String))
                    .value_name("RULE"),
            )
            .arg(
                Arg::new("no-runtime")
                    .help("Leave out the runtime preamble")
                    .long("no-runtime")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("output")
                    .help("Write the result to FILE instead of stdout")
                    .short('o')
                    .long("output")
                    .value_parser(clap::value_parser!(PathBuf))
                    .value_name("FILE"),
            ),
    )
}

/// Dispatches the command based on the parsed arguments.
fn dispatch_commands(matches: &ArgMatches) -> Result<(), Box<dyn CompileErrorExt>> {
    match matches.subcommand() {
        Some(("build", sub_m)) => build(sub_m),
        _ => Err(boxed(CliError::new("No valid subcommand was used. Use --help for more information."))),
    }
}

fn build(sub_m: &ArgMatches) -> Result<(), Box<dyn CompileErrorExt>> {
    let file = sub_m
        .get_one::<String>("file")
        .ok_or_else(|| boxed(CliError::new("Missing source file.")))?;
    let script = load_script(file)?;
    debug!("loaded {} ({} bytes)", script.name, script.content.len());

    let stage = sub_m.get_one::<String>("dump").map(String::as_str).unwrap_or("ir");
    let rule = match sub_m.get_one::<String>("rule") {
        Some(name) if stage != "ast" => {
            return Err(boxed(CliError::new(format!("--rule {} only applies to --dump ast.", name))));
        }
        Some(name) => Some(name.parse::<Rule>().map_err(|e| boxed(CliError::new(e)))?),
        None => None,
    };
    let options = CompileOptions { runtime: !sub_m.get_flag("no-runtime") };

    let text = match stage {
        "tokens" => render_token_table(&tokenize_script(&script).map_err(boxed)?),
        "ast" => dump_ast(&script, rule)?,
        _ => {
            let ast = generate_ast_from_source(&script)?;
            lower_ast_to_ir(&ast, &options).map_err(boxed)?.to_string()
        }
    };

    match sub_m.get_one::<PathBuf>("output") {
        Some(path) => {
            fs::write(path, text)
                .map_err(|e| boxed(CliError::new(format!("Failed to write {}: {}", path.display(), e))))?;
            info!("wrote {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn load_script(file: &str) -> Result<Script, Box<dyn CompileErrorExt>> {
    if file == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| boxed(CliError::new(format!("Failed to read stdin: {}", e))))?;
        return Ok(Script::from_source("<stdin>", content));
    }
    Script::new(PathBuf::from(file))
}

fn dump_ast(script: &Script, rule: Option<Rule>) -> Result<String, Box<dyn CompileErrorExt>> {
    let (rule, ast) = match rule {
        None | Some(Rule::Program) => (Rule::Program, generate_ast_from_source(script)?),
        Some(rule) => {
            let tokens = tokenize_script(script).map_err(boxed)?;
            (rule, parse_rule(&tokens, rule).map_err(boxed)?)
        }
    };
    let dump = AstDump { file: &script.name, rule: format!("{:?}", rule), ast: &ast };
    let mut json = dump
        .to_json()
        .map_err(|e| boxed(CliError::new(format!("Failed to serialize AST: {}", e))))?;
    json.push('\n');
    Ok(json)
}

/// Failures of the command line driver itself (arguments, I/O).
#[derive(Debug, Clone)]
struct CliError {
    message: String,
}

impl CliError {
    fn new(message: impl Into<String>) -> Self {
        CliError { message: message.into() }
    }
}

impl CompileErrorExt for CliError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        "ssalang.cli".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        None
    }
}
