//! Lexer, Pratt parser, AST, and tree-walking evaluator for the gorb
//! scripting language. The `gorb` binary (`src/bin/gorb.rs`) is the only
//! consumer that touches files, stdio, or CLI flags — everything in this
//! crate works against `&str` in and `Value`/`Write` out.
pub mod ast;
pub mod builtins;
pub mod diagnostics;
pub mod environment;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod value;

use std::io::Write;
use std::rc::Rc;

use value::Env;

/// Lex, parse, and evaluate one source unit against `env`, writing any
/// `puts` output to `out`. Returns either the program's result or a
/// newline-joined dump of parser errors (parse errors short-circuit
/// evaluation entirely, matching the two-layer error model: accumulated
/// parser errors vs. a single first-class evaluator `Value::Error`).
pub fn run(source: &str, file: Option<Rc<str>>, env: &Env, out: &mut dyn Write) -> Result<value::Value, Vec<String>> {
    let ast = parser::parse(source, file)?;
    Ok(evaluator::eval_program(&ast, env, out))
}
