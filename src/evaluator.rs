//! Walks the AST against an [`Environment`], producing a [`Value`].
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::ast::Node;
use crate::builtins;
use crate::environment::Environment;
use crate::token::{Token, TokenKind};
use crate::value::{Env, HashKey, Value};

fn error(message: impl Into<String>, token: &Token) -> Value {
    Value::Error {
        message: message.into(),
        token: token.clone(),
    }
}

/// Evaluate a whole program (the parser's root `Block`): statements run in
/// order, and a top-level `return` unwraps to its inner value before
/// reaching the host.
pub fn eval_program(root: &Node, env: &Env, out: &mut dyn Write) -> Value {
    let Node::Block { statements, .. } = root else {
        panic!("eval_program expects the parser's root Block node");
    };

    let mut result = Value::Null;
    for statement in statements {
        result = eval(statement, env, out);
        match result {
            Value::Error { .. } => return result,
            Value::ReturnValue(inner) => return *inner,
            _ => {}
        }
    }
    result
}

pub fn eval(node: &Node, env: &Env, out: &mut dyn Write) -> Value {
    match node {
        Node::Block { statements, .. } => eval_block(statements, env, out),
        Node::Return { value, .. } => {
            let value = eval(value, env, out);
            if value.is_error() {
                value
            } else {
                Value::ReturnValue(Box::new(value))
            }
        }
        Node::Declaration { name, value, token } => eval_declaration(name, value, token, env, out),
        Node::If {
            condition,
            consequence,
            alternative,
            ..
        } => eval_if(condition, consequence, alternative.as_deref(), env, out),
        Node::Index { left, index, token } => eval_index(left, index, token, env, out),
        Node::Call { callee, args, token } => eval_call(callee, args, token, env, out),
        Node::Unary { op, right, token } => eval_unary(op, right, token, env, out),
        Node::Binary { left, op, right, token } => eval_binary(left, op, right, token, env, out),
        Node::Identifier { name, token } => eval_identifier(name, token, env),
        Node::BooleanLiteral { value, .. } => Value::Boolean(*value),
        Node::IntegerLiteral { value, .. } => Value::Integer(*value),
        Node::StringLiteral { value, .. } => Value::String(Rc::from(value.as_str())),
        Node::ArrayLiteral { elements, .. } => eval_array_literal(elements, env, out),
        Node::HashLiteral { pairs, token } => eval_hash_literal(pairs, token, env, out),
        Node::FunctionLiteral { params, body, .. } => Value::Function {
            params: Rc::new(params.clone()),
            body: Rc::new((**body).clone()),
            env: Rc::clone(env),
        },
    }
}

/// Evaluate a nested block: preserves `ReturnValue`/`Error` instead of
/// unwrapping, so they keep propagating through enclosing blocks.
fn eval_block(statements: &[Node], env: &Env, out: &mut dyn Write) -> Value {
    let mut result = Value::Null;
    for statement in statements {
        result = eval(statement, env, out);
        if matches!(result, Value::Error { .. } | Value::ReturnValue(_)) {
            return result;
        }
    }
    result
}

fn eval_declaration(name: &Node, value: &Node, _token: &Token, env: &Env, out: &mut dyn Write) -> Value {
    let Node::Identifier { name, .. } = name else {
        unreachable!("parser only produces Identifier declaration targets");
    };

    let value = eval(value, env, out);
    if value.is_error() {
        return value;
    }

    env.borrow_mut().set(name.clone(), value);
    Value::Null
}

fn eval_if(condition: &Node, consequence: &Node, alternative: Option<&Node>, env: &Env, out: &mut dyn Write) -> Value {
    let condition = eval(condition, env, out);
    if condition.is_error() {
        return condition;
    }

    if condition.truthy() {
        eval(consequence, env, out)
    } else if let Some(alternative) = alternative {
        eval(alternative, env, out)
    } else {
        Value::Null
    }
}

fn eval_unary(op: &Token, right: &Node, token: &Token, env: &Env, out: &mut dyn Write) -> Value {
    let right = eval(right, env, out);
    if right.is_error() {
        return right;
    }

    match op.kind {
        TokenKind::Minus => match right {
            Value::Integer(i) => Value::Integer(i.wrapping_neg()),
            other => error(format!("unknown operation: -{}", other.stringify()), token),
        },
        TokenKind::Bang => Value::Boolean(!right.truthy()),
        _ => unreachable!("parser only produces Bang/Minus unary operators"),
    }
}

fn eval_binary(left: &Node, op: &Token, right: &Node, token: &Token, env: &Env, out: &mut dyn Write) -> Value {
    let left = eval(left, env, out);
    if left.is_error() {
        return left;
    }
    let right = eval(right, env, out);
    if right.is_error() {
        return right;
    }

    match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => eval_integer_binary(*a, op, *b, token),
        (Value::String(a), Value::String(b)) => eval_string_binary(a, op, b, token),
        _ => eval_generic_binary(left, op, right, token),
    }
}

fn eval_integer_binary(a: i32, op: &Token, b: i32, token: &Token) -> Value {
    match op.kind {
        TokenKind::Plus => Value::Integer(a.wrapping_add(b)),
        TokenKind::Minus => Value::Integer(a.wrapping_sub(b)),
        TokenKind::Asterisk => Value::Integer(a.wrapping_mul(b)),
        // Division by zero is deliberately undefined: wrap to avoid a
        // host-level panic rather than pick an observable result.
        TokenKind::Slash => Value::Integer(if b == 0 { 0 } else { a.wrapping_div(b) }),
        TokenKind::Lt => Value::Boolean(a < b),
        TokenKind::Gt => Value::Boolean(a > b),
        TokenKind::Eq => Value::Boolean(a == b),
        TokenKind::NotEq => Value::Boolean(a != b),
        _ => unreachable!("parser only produces binary operator tokens"),
    }
}

fn eval_string_binary(a: &Rc<str>, op: &Token, b: &Rc<str>, token: &Token) -> Value {
    match op.kind {
        TokenKind::Plus => Value::String(Rc::from(format!("{a}{b}"))),
        // Only `+` is defined for two strings; `==`/`!=` on strings are not
        // a fallback to structural equality, they're simply unsupported.
        _ => error(
            format!("unknown operation: [string] {} [string]", op.literal),
            token,
        ),
    }
}

fn eval_generic_binary(left: Value, op: &Token, right: Value, token: &Token) -> Value {
    match op.kind {
        TokenKind::Eq => Value::Boolean(left.structurally_equal(&right)),
        TokenKind::NotEq => Value::Boolean(!left.structurally_equal(&right)),
        _ => {
            if std::mem::discriminant(&left) == std::mem::discriminant(&right) {
                error(
                    format!("unknown operation: {} {} {}", left.stringify(), op.literal, right.stringify()),
                    token,
                )
            } else {
                error(
                    format!("type mismatch: {} {} {}", left.stringify(), op.literal, right.stringify()),
                    token,
                )
            }
        }
    }
}

fn eval_index(left: &Node, index: &Node, token: &Token, env: &Env, out: &mut dyn Write) -> Value {
    let left = eval(left, env, out);
    if left.is_error() {
        return left;
    }
    let index = eval(index, env, out);
    if index.is_error() {
        return index;
    }

    match &left {
        Value::Array(items) => match index {
            Value::Integer(i) => {
                if i < 0 || i as usize >= items.len() {
                    Value::Null
                } else {
                    items[i as usize].clone()
                }
            }
            other => error(format!("index operator is not supported on {}", other.stringify()), token),
        },
        Value::Hash(map) => {
            let Some(key) = HashKey::of(&index) else {
                return error(format!("{} is unusable as hash key", index.stringify()), token);
            };
            match map.get(&key) {
                Some((_, value)) => value.clone(),
                None => Value::Null,
            }
        }
        other => error(format!("index operator is not supported on {}", other.stringify()), token),
    }
}

fn eval_call(callee: &Node, args: &[Node], token: &Token, env: &Env, out: &mut dyn Write) -> Value {
    let callee = eval(callee, env, out);
    if callee.is_error() {
        return callee;
    }

    let mut evaluated_args = Vec::with_capacity(args.len());
    for arg in args {
        let value = eval(arg, env, out);
        if value.is_error() {
            return value;
        }
        evaluated_args.push(value);
    }

    apply_function(callee, &evaluated_args, token, out)
}

fn apply_function(callee: Value, args: &[Value], token: &Token, out: &mut dyn Write) -> Value {
    match callee {
        Value::Function { params, body, env } => {
            if params.len() != args.len() {
                return error(
                    format!(
                        "expected {} argument{}, got {}",
                        params.len(),
                        if params.len() == 1 { "" } else { "s" },
                        args.len()
                    ),
                    token,
                );
            }

            let call_env = Environment::enclosed(&env);
            for (param, arg) in params.iter().zip(args.iter()) {
                call_env.borrow_mut().set(param.clone(), arg.clone());
            }

            match eval(&body, &call_env, out) {
                Value::ReturnValue(inner) => *inner,
                other => other,
            }
        }
        Value::Builtin(f) => f(args, token, out),
        other => error(format!("{} is not a function", other.stringify()), token),
    }
}

fn eval_identifier(name: &str, token: &Token, env: &Env) -> Value {
    if let Some(value) = env.borrow().get(name) {
        return value;
    }
    if let Some(builtin) = builtins::lookup(name) {
        return Value::Builtin(builtin);
    }
    error(format!("identifier '{name}' not found"), token)
}

fn eval_array_literal(elements: &[Node], env: &Env, out: &mut dyn Write) -> Value {
    let mut values = Vec::with_capacity(elements.len());
    for element in elements {
        let value = eval(element, env, out);
        if value.is_error() {
            return value;
        }
        values.push(value);
    }
    Value::Array(Rc::new(values))
}

fn eval_hash_literal(pairs: &[(Node, Node)], token: &Token, env: &Env, out: &mut dyn Write) -> Value {
    let mut map = HashMap::new();
    for (key_node, value_node) in pairs {
        let key = eval(key_node, env, out);
        if key.is_error() {
            return key;
        }

        let Some(hash_key) = HashKey::of(&key) else {
            return error(format!("{} is unusable as hash key", key.stringify()), token);
        };

        let value = eval(value_node, env, out);
        if value.is_error() {
            return value;
        }

        // Duplicate hash-keys overwrite earlier entries (last-wins).
        map.insert(hash_key, (key, value));
    }
    Value::Hash(Rc::new(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;

    fn run(src: &str) -> Value {
        let ast = crate::parser::parse(src, None).unwrap_or_else(|errs| panic!("parse errors: {errs:?}"));
        let env = Environment::new();
        let mut sink = Vec::new();
        eval_program(&ast, &env, &mut sink)
    }

    #[test]
    fn arithmetic_precedence_and_negation() {
        assert_eq!(run("(5 + 10 * 2 + 15 / 3) * 2 + -10").inspect(), "50");
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(run(r#""Hello" + " " + "World!""#).inspect(), "Hello World!");
    }

    #[test]
    fn closures_capture_their_environment() {
        assert_eq!(
            run("so newAdder = fn(x) { fn(y) { x + y } }; so addTwo = newAdder(2); addTwo(2);").inspect(),
            "4"
        );
    }

    #[test]
    fn nested_return_short_circuits_enclosing_block() {
        assert_eq!(
            run("if (10 > 1) { if (10 > 1) { return 10; } return 1; }").inspect(),
            "10"
        );
    }

    #[test]
    fn len_counts_utf8_bytes_not_codepoints() {
        assert_eq!(run(r#"len("йцукен")"#).inspect(), "12");
    }

    #[test]
    fn hash_literal_lookup() {
        assert_eq!(run(r#"{"one": 10 - 9, "two": 1 + 1}["two"]"#).inspect(), "2");
    }

    #[test]
    fn type_mismatch_is_a_first_class_error() {
        let result = run("5 + true;");
        assert!(matches!(result, Value::Error { ref message, .. } if message.contains("type mismatch: [integer] + [boolean]")));
    }

    #[test]
    fn string_equality_is_unknown_operation_not_a_comparison() {
        let result = run(r#""a" == "a""#);
        assert!(
            matches!(result, Value::Error { ref message, .. } if message.contains("unknown operation: [string] == [string]"))
        );
    }

    #[test]
    fn function_as_hash_key_is_an_error() {
        let result = run(r#"{"name": "M"}[fn(x){x}]"#);
        assert!(matches!(result, Value::Error { ref message, .. } if message.contains("[function] is unusable as hash key")));
    }

    #[test]
    fn array_index_out_of_bounds_is_null_not_error() {
        assert_eq!(run("[1, 2, 3][3]").inspect(), "null");
        assert_eq!(run("[1, 2, 3][-1]").inspect(), "null");
    }

    #[test]
    fn duplicate_hash_keys_last_wins() {
        assert_eq!(run(r#"{"a": 1, "a": 2}["a"]"#).inspect(), "2");
    }

    #[test]
    fn empty_array_and_hash_literals_evaluate() {
        assert_eq!(run("len([])").inspect(), "0");
        assert_eq!(run("[][0]").inspect(), "null");
    }

    #[test]
    fn bang_always_yields_a_boolean() {
        assert_eq!(run("!5").inspect(), "false");
        assert_eq!(run("!!5").inspect(), "true");
        assert_eq!(run("!!0").inspect(), "true");
    }

    #[test]
    fn declarations_are_local_and_fresh_each_time() {
        // Nothing leaks a binding out of a function body back to the caller.
        let result = run("fn() { so x = 1; }(); x");
        assert!(matches!(result, Value::Error { ref message, .. } if message == "identifier 'x' not found"));
    }

    #[test]
    fn array_builtins_roundtrip() {
        assert_eq!(run("push(rest([1,2,3]), 9)").inspect(), "[2, 3, 9]");
        assert_eq!(run("first([])").inspect(), "null");
    }

    #[test]
    fn puts_writes_to_the_supplied_sink() {
        let ast = crate::parser::parse(r#"puts("hi", 1)"#, None).unwrap();
        let env = Environment::new();
        let mut sink = Vec::new();
        eval_program(&ast, &env, &mut sink);
        assert_eq!(String::from_utf8(sink).unwrap(), "hi\n1\n");
    }
}
