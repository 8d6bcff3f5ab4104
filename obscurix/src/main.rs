mod cli;
mod rlpl;
mod rppl;

use std::{path::PathBuf, process::ExitCode, rc::Rc, time::Instant};

use clap::{Args, CommandFactory, Parser, Subcommand};
use cli::{print_error, print_failed, print_finished, print_running, ConsoleLogger, ConsoleWarningEmitter};
use obscurix_core::{
    eval::prelude::{DEFAULT_MAX_CALL_DEPTH, MAX_CALL_DEPTH_LIMIT},
    lexer::prelude::tokenize,
    parser::prelude::{ParseError, ParseErrorType},
    runtime::{Runtime, RuntimeConfig},
    utils::prelude::Error
};

/// Interpreter for the Obscurix glyph language
#[derive(Parser)]
#[command(version, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args)]
struct RunArgs {
    /// Path of source file
    path: Option<PathBuf>,
    /// Print lexer, parser and evaluator traces to stderr
    #[arg(short, long, default_value_t = false)]
    debug: bool,
    /// Maximum depth of nested function calls, at most 512
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_CALL_DEPTH, value_parser = parse_max_depth)]
    max_depth: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Prints the token stream of a source file
    Tokens {
        /// Path of source file
        path: PathBuf,
    },
    /// Parses a source file and prints it back
    Ast {
        /// Path of source file
        path: PathBuf,
        /// Print the syntax tree instead of the formatted source
        #[arg(long, default_value_t = false)]
        debug_tree: bool,
    },
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl
}

fn parse_max_depth(arg: &str) -> Result<usize, String> {
    let depth: usize = arg.parse().map_err(|err| format!("{err}"))?;

    if (1..=MAX_CALL_DEPTH_LIMIT).contains(&depth) {
        Ok(depth)
    } else {
        Err(format!("must be between 1 and {MAX_CALL_DEPTH_LIMIT}"))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => match cli.run.path.clone() {
            Some(path) => run(path, cli.run),
            None => {
                let _ = Cli::command().print_help();
                return ExitCode::FAILURE;
            }
        },
        Some(Command::Tokens { path }) => {
            ConsoleLogger::init(false);
            print_tokens(path)
        },
        Some(Command::Ast { path, debug_tree }) => {
            ConsoleLogger::init(false);
            print_ast(path, debug_tree)
        },
        Some(Command::Rlpl) => rlpl::start().map_err(Error::from),
        Some(Command::Rppl) => rppl::start().map_err(Error::from),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            print_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(path: PathBuf, args: RunArgs) -> Result<(), Error> {
    ConsoleLogger::init(args.debug);

    let config = RuntimeConfig {
        debug: args.debug,
        max_call_depth: args.max_depth
    };

    let runtime = Runtime::with_config(path, config)
        .with_warnings(Rc::new(ConsoleWarningEmitter));

    print_running(&runtime.path().display().to_string());
    let start = Instant::now();

    let result = runtime.run();

    match result {
        Ok(()) => print_finished(start.elapsed()),
        Err(_) => print_failed(start.elapsed())
    }

    result
}

fn print_tokens(path: PathBuf) -> Result<(), Error> {
    let runtime = Runtime::new(path, false);
    let src = runtime.read_source()?;

    match tokenize(&src) {
        Ok(tokens) => {
            for (start, token, end) in tokens {
                println!("{start}..{end} {token:?}");
            }

            Ok(())
        },
        Err(error) => {
            let location = error.location;

            Err(Error::Parse {
                path: runtime.path().to_path_buf(),
                src,
                error: ParseError {
                    error: ParseErrorType::LexError { error },
                    span: location
                }
            })
        }
    }
}

fn print_ast(path: PathBuf, debug_tree: bool) -> Result<(), Error> {
    let runtime = Runtime::new(path, false)
        .with_warnings(Rc::new(ConsoleWarningEmitter));

    let src = runtime.read_source()?;
    let parsed = runtime.check(&src)?;

    if debug_tree {
        println!("{:#?}", parsed.module.program);
    } else {
        println!("{}", parsed.module.program);
    }

    Ok(())
}
