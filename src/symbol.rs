// ABOUTME: Interned symbol type and the process-wide symbol table

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// An interned symbol. Two symbols are `eq?` iff they point at the same
/// allocation, so equality and hashing both go through the `Rc` address
/// rather than the spelling.
#[derive(Clone)]
pub struct Symbol(Rc<str>);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as *const () as usize).hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process-global-equivalent symbol table. One instance lives on the
/// `Interpreter`; every `Symbol` it hands out compares by pointer identity
/// as long as it was interned through the same table.
#[derive(Default)]
pub struct SymbolTable {
    symbols: RefCell<HashMap<Box<str>, Symbol>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the existing symbol for `name` if one was already interned,
    /// otherwise allocates and registers a new one.
    pub fn intern(&self, name: &str) -> Symbol {
        if let Some(sym) = self.symbols.borrow().get(name) {
            return sym.clone();
        }
        let sym = Symbol(Rc::from(name));
        self.symbols
            .borrow_mut()
            .insert(Box::from(name), sym.clone());
        sym
    }
}
