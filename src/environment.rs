//! Lexically scoped name -> value bindings, chained for closures.
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::{Env, Value};

pub struct Environment {
    store: HashMap<String, Value>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new() -> Env {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: None,
        }))
    }

    /// A fresh environment enclosed over `outer`, used for function-call
    /// scopes and block scopes.
    pub fn enclosed(outer: &Env) -> Env {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: Some(Rc::clone(outer)),
        }))
    }

    /// Walk `outer` on miss.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.store.get(name) {
            return Some(value.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.borrow().get(name))
    }

    /// Bind `name` in the current scope only. There is no assignment
    /// operator in the language — only fresh binding.
    pub fn set(&mut self, name: String, value: Value) {
        self.store.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_outer_scopes() {
        let outer = Environment::new();
        outer.borrow_mut().set("x".into(), Value::Integer(1));

        let inner = Environment::enclosed(&outer);
        assert!(matches!(inner.borrow().get("x"), Some(Value::Integer(1))));
    }

    #[test]
    fn local_binding_does_not_leak_outward() {
        let outer = Environment::new();
        let inner = Environment::enclosed(&outer);
        inner.borrow_mut().set("y".into(), Value::Integer(2));

        assert!(outer.borrow().get("y").is_none());
    }

    #[test]
    fn inner_binding_shadows_outer() {
        let outer = Environment::new();
        outer.borrow_mut().set("x".into(), Value::Integer(1));

        let inner = Environment::enclosed(&outer);
        inner.borrow_mut().set("x".into(), Value::Integer(2));

        assert!(matches!(inner.borrow().get("x"), Some(Value::Integer(2))));
        assert!(matches!(outer.borrow().get("x"), Some(Value::Integer(1))));
    }
}
