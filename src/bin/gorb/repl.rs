//! The interactive loop: read a line, evaluate it against a persistent
//! environment, print its result. No history, no completion — gorb's
//! core only promises something that yields lines (a real line editor is
//! scoped out), so stdin line reads are the whole story here.
use std::io::{self, BufRead, Write};

use gorb::ast::Node;
use gorb::value::{Env, Value};
use gorb::{evaluator, parser};

const PROMPT: &str = "> ";

/// A bare `so x = 1;` line legitimately evaluates to `Null` and that
/// result stays silent; any other line that happens to evaluate to `Null`
/// (e.g. `if (false) { 1 }`) still prints it.
fn is_bare_declaration(ast: &Node) -> bool {
    matches!(ast, Node::Block { statements, .. } if matches!(statements.last(), Some(Node::Declaration { .. })))
}

pub fn run(env: &Env) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{PROMPT}");
        let _ = stdout.flush();

        let Some(Ok(line)) = lines.next() else { break };
        let line = line.trim_end();

        if line.is_empty() {
            continue;
        }
        if line == "exit" {
            break;
        }

        let ast = match parser::parse(line, None) {
            Ok(ast) => ast,
            Err(errors) => {
                for error in errors {
                    eprintln!("{error}");
                }
                continue;
            }
        };

        let suppress_null = is_bare_declaration(&ast);
        match evaluator::eval_program(&ast, env, &mut stdout) {
            Value::Null if suppress_null => {}
            value => println!("{}", value.inspect()),
        }
    }
}
