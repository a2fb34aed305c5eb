//! # Cli
//!
//! This module contains everything needed for parsing the CLI arguments for gorb.

use clap::Parser;

/// Struct containing the CLI configuration for gorb.
///
/// `version` and `help` are handled as the two literal values the bare
/// positional argument can take, rather than `clap` subcommands: gorb's
/// everyday invocation is `gorb some/script.gorb`, and layering a
/// subcommand enum on top of that same positional slot just to special-case
/// two keywords produces more clap-derive ceremony than it saves.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// A `.gorb` source file to run, or the literal words `version`/`help`.
    #[arg(index = 1)]
    pub target: Option<String>,

    /// Drop into the REPL after running the file, sharing its environment.
    #[arg(short, long)]
    pub interactive: bool,

    /// Dump the lexer's token stream before parsing.
    #[arg(short, long)]
    pub tokens: bool,

    /// Dump the printed AST before evaluation.
    #[arg(short, long)]
    pub ast: bool,

    /// Specify the log level of the interpreter. Repeat for more detail (-v, -vv, -vvv, ...).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }

    pub fn log_level(&self) -> log::Level {
        match self.verbose {
            0 => log::Level::Error,
            1 => log::Level::Warn,
            2 => log::Level::Info,
            3 => log::Level::Debug,
            _ => log::Level::Trace,
        }
    }
}
