//! # gorb
//!
//! The command-line driver for the gorb interpreter: reads a `.gorb` file
//! (or drops straight into the REPL), lexes, parses, and evaluates it.
extern crate gorb;

mod cli;
mod repl;

use std::fs;
use std::path::Path;

use cli::Cli;
use log::{debug, error};

use gorb::environment::Environment;
use gorb::value::Value;
use gorb::{lexer::Lexer, parser};

fn main() {
    let cli = Cli::init();
    simple_logger::init_with_level(cli.log_level()).ok();

    match cli.target.as_deref() {
        Some("version") => {
            println!("gorb {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Some("help") => {
            use clap::CommandFactory;
            let _ = Cli::command().print_long_help();
            println!();
            return;
        }
        _ => {}
    }

    let env = Environment::new();

    if let Some(target) = cli.target.as_deref() {
        if let Err(code) = run_file(target, &cli, &env) {
            std::process::exit(code);
        }
    } else if !cli.interactive {
        error!("no file given; pass a .gorb file or -i to start the REPL");
        std::process::exit(1);
    }

    if cli.interactive {
        repl::run(&env);
    }
}

/// Run a single `.gorb` file. Returns `Err(exit_code)` only for host-level
/// failures (bad extension, unreadable file) — parse/eval errors are
/// reported to the user and the process still exits 0, matching the CLI's
/// exit-code contract.
fn run_file(target: &str, cli: &Cli, env: &gorb::value::Env) -> Result<(), i32> {
    let path = Path::new(target);

    if path.extension().and_then(|e| e.to_str()) != Some("gorb") {
        error!("'{target}' is not a .gorb file");
        return Err(1);
    }

    let source = fs::read_to_string(path).map_err(|e| {
        error!("could not read '{target}': {e}");
        1
    })?;

    if cli.tokens {
        let tokens = Lexer::new(&source, Some(target.into())).tokenize();
        debug!("tokens: {tokens:#?}");
    }

    let ast = match parser::parse(&source, Some(target.into())) {
        Ok(ast) => ast,
        Err(errors) => {
            for error in errors {
                eprintln!("{error}");
            }
            return Ok(());
        }
    };

    if cli.ast {
        debug!("ast:\n{ast}");
    }

    let mut stdout = std::io::stdout();
    let result = gorb::evaluator::eval_program(&ast, env, &mut stdout);
    if let Value::Error { .. } = result {
        eprintln!("{}", result.inspect());
    }

    Ok(())
}
