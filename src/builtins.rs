//! The fixed `len`/`first`/`last`/`rest`/`push`/`puts` builtin table.
use std::collections::HashMap;
use std::io::Write;

use once_cell::sync::Lazy;

use crate::token::Token;
use crate::value::{BuiltinFn, Value};

static BUILTINS: Lazy<HashMap<&'static str, BuiltinFn>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, BuiltinFn> = HashMap::new();
    m.insert("len", len);
    m.insert("first", first);
    m.insert("last", last);
    m.insert("rest", rest);
    m.insert("push", push);
    m.insert("puts", puts);
    m
});

pub fn lookup(name: &str) -> Option<BuiltinFn> {
    BUILTINS.get(name).copied()
}

fn arity_error(expected: usize, got: usize, token: &Token) -> Value {
    let plural = if expected == 1 { "" } else { "s" };
    Value::Error {
        message: format!("expected {expected} argument{plural}, got {got}"),
        token: token.clone(),
    }
}

fn len(args: &[Value], token: &Token, _out: &mut dyn Write) -> Value {
    if args.len() != 1 {
        return arity_error(1, args.len(), token);
    }
    match &args[0] {
        Value::String(s) => Value::Integer(s.len() as i32),
        Value::Array(items) => Value::Integer(items.len() as i32),
        other => Value::Error {
            message: format!("'len' does not support {}", other.stringify()),
            token: token.clone(),
        },
    }
}

fn first(args: &[Value], token: &Token, _out: &mut dyn Write) -> Value {
    if args.len() != 1 {
        return arity_error(1, args.len(), token);
    }
    match &args[0] {
        Value::Array(items) => items.first().cloned().unwrap_or(Value::Null),
        other => Value::Error {
            message: format!("'first' does not support {}", other.stringify()),
            token: token.clone(),
        },
    }
}

fn last(args: &[Value], token: &Token, _out: &mut dyn Write) -> Value {
    if args.len() != 1 {
        return arity_error(1, args.len(), token);
    }
    match &args[0] {
        Value::Array(items) => items.last().cloned().unwrap_or(Value::Null),
        other => Value::Error {
            message: format!("'last' does not support {}", other.stringify()),
            token: token.clone(),
        },
    }
}

fn rest(args: &[Value], token: &Token, _out: &mut dyn Write) -> Value {
    if args.len() != 1 {
        return arity_error(1, args.len(), token);
    }
    match &args[0] {
        Value::Array(items) => {
            if items.is_empty() {
                Value::Null
            } else {
                Value::Array(std::rc::Rc::new(items[1..].to_vec()))
            }
        }
        other => Value::Error {
            message: format!("'rest' does not support {}", other.stringify()),
            token: token.clone(),
        },
    }
}

fn push(args: &[Value], token: &Token, _out: &mut dyn Write) -> Value {
    if args.len() != 2 {
        return arity_error(2, args.len(), token);
    }
    match &args[0] {
        Value::Array(items) => {
            let mut new_items = (**items).clone();
            new_items.push(args[1].clone());
            Value::Array(std::rc::Rc::new(new_items))
        }
        other => Value::Error {
            message: format!("'push' does not support {}", other.stringify()),
            token: token.clone(),
        },
    }
}

/// Prints each argument's inspection text, one per line, to the host's
/// output channel. gorb has no string-formatting builtin, so `puts` is the
/// only way a program produces visible output.
fn puts(args: &[Value], _token: &Token, out: &mut dyn Write) -> Value {
    for arg in args {
        let _ = writeln!(out, "{}", arg.inspect());
    }
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok() -> Token {
        Token::new(crate::token::TokenKind::Ident, "puts", (1, 1), "", None)
    }

    #[test]
    fn len_supports_strings_and_arrays() {
        let mut sink = Vec::new();
        assert!(matches!(len(&[Value::String("abc".into())], &tok(), &mut sink), Value::Integer(3)));
        assert!(matches!(
            len(
                &[Value::Array(std::rc::Rc::new(vec![Value::Integer(1), Value::Integer(2)]))],
                &tok(),
                &mut sink
            ),
            Value::Integer(2)
        ));
    }

    #[test]
    fn len_rejects_unsupported_type() {
        let mut sink = Vec::new();
        let result = len(&[Value::Integer(1)], &tok(), &mut sink);
        assert!(matches!(result, Value::Error { ref message, .. } if message.contains("'len' does not support [integer]")));
    }

    #[test]
    fn first_and_last_on_empty_array_are_null() {
        let mut sink = Vec::new();
        let empty = Value::Array(std::rc::Rc::new(vec![]));
        assert!(matches!(first(&[empty.clone()], &tok(), &mut sink), Value::Null));
        assert!(matches!(last(&[empty], &tok(), &mut sink), Value::Null));
    }

    #[test]
    fn rest_on_empty_is_null_otherwise_drops_head() {
        let mut sink = Vec::new();
        let arr = Value::Array(std::rc::Rc::new(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]));
        let Value::Array(tail) = rest(&[arr], &tok(), &mut sink) else {
            panic!("expected array");
        };
        assert_eq!(tail.len(), 2);
    }

    #[test]
    fn push_does_not_mutate_original() {
        let mut sink = Vec::new();
        let original = std::rc::Rc::new(vec![Value::Integer(1)]);
        let arr = Value::Array(original.clone());
        let Value::Array(pushed) = push(&[arr, Value::Integer(2)], &tok(), &mut sink) else {
            panic!("expected array");
        };
        assert_eq!(original.len(), 1);
        assert_eq!(pushed.len(), 2);
    }

    #[test]
    fn arity_mismatch_pluralizes_correctly() {
        let mut sink = Vec::new();
        let result = len(&[], &tok(), &mut sink);
        assert!(matches!(result, Value::Error { ref message, .. } if message == "expected 1 argument, got 0"));

        let result = push(&[Value::Integer(1)], &tok(), &mut sink);
        assert!(matches!(result, Value::Error { ref message, .. } if message == "expected 2 arguments, got 1"));
    }

    #[test]
    fn puts_writes_each_argument_inspection_on_its_own_line() {
        let mut sink = Vec::new();
        puts(&[Value::Integer(1), Value::String("hi".into())], &tok(), &mut sink);
        assert_eq!(String::from_utf8(sink).unwrap(), "1\nhi\n");
    }
}
