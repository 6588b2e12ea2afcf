// ABOUTME: Frame-based lexical environment keyed by interned symbols

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::EvalError;
use crate::symbol::Symbol;
use crate::value::Value;

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<Symbol, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new global environment with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a child environment extending `parent` with one frame.
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Defines a binding in this frame only, overwriting any existing
    /// binding of the same name in this frame. Does not walk the parent
    /// chain.
    pub fn define(&self, name: Symbol, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Looks up `name`, walking from this frame outward.
    pub fn get(&self, name: &Symbol) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|p| p.get(name))
    }

    /// Mutates an existing binding, walking from this frame outward. Fails
    /// if `name` is bound nowhere in the chain.
    pub fn set(&self, name: &Symbol, value: Value) -> Result<(), EvalError> {
        if self.bindings.borrow().contains_key(name) {
            self.bindings.borrow_mut().insert(name.clone(), value);
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.set(name, value),
            None => Err(EvalError::UnboundVariable(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolTable;

    #[test]
    fn define_and_get() {
        let table = SymbolTable::new();
        let env = Environment::new();
        let x = table.intern("x");
        env.define(x.clone(), Value::Fixnum(42));
        assert!(matches!(env.get(&x), Some(Value::Fixnum(42))));
    }

    #[test]
    fn unbound_symbol_is_none() {
        let table = SymbolTable::new();
        let env = Environment::new();
        assert!(env.get(&table.intern("nope")).is_none());
    }

    #[test]
    fn child_shadows_parent() {
        let table = SymbolTable::new();
        let x = table.intern("x");
        let parent = Environment::new();
        parent.define(x.clone(), Value::Fixnum(1));
        let child = Environment::with_parent(parent.clone());
        child.define(x.clone(), Value::Fixnum(2));
        assert!(matches!(child.get(&x), Some(Value::Fixnum(2))));
        assert!(matches!(parent.get(&x), Some(Value::Fixnum(1))));
    }

    #[test]
    fn set_walks_to_the_defining_frame() {
        let table = SymbolTable::new();
        let x = table.intern("x");
        let parent = Environment::new();
        parent.define(x.clone(), Value::Fixnum(1));
        let child = Environment::with_parent(parent.clone());
        child.set(&x, Value::Fixnum(99)).unwrap();
        assert!(matches!(parent.get(&x), Some(Value::Fixnum(99))));
    }

    #[test]
    fn set_unbound_is_an_error() {
        let table = SymbolTable::new();
        let env = Environment::new();
        assert!(env.set(&table.intern("x"), Value::Fixnum(1)).is_err());
    }

    #[test]
    fn define_only_touches_innermost_frame() {
        let table = SymbolTable::new();
        let x = table.intern("x");
        let parent = Environment::new();
        parent.define(x.clone(), Value::Fixnum(1));
        let child = Environment::with_parent(parent.clone());
        child.define(x.clone(), Value::Fixnum(2));
        // Parent's own binding is untouched.
        assert!(matches!(parent.get(&x), Some(Value::Fixnum(1))));
    }
}
