// ABOUTME: The tagged Value type shared by every stage of the interpreter

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::ports::{InputPort, OutputPort};
use crate::symbol::Symbol;

/// A host function implementing a primitive procedure. Receives its
/// arguments already evaluated, left-to-right, as a slice.
pub type PrimitiveFn = fn(&mut crate::interpreter::Interpreter, &[Value]) -> Result<Value, EvalError>;

pub struct Primitive {
    pub name: &'static str,
    pub func: PrimitiveFn,
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<primitive-procedure {}>", self.name)
    }
}

/// A user-defined procedure created by `lambda`. `params` may be a single
/// symbol (variadic), a proper list of symbols, or an improper list ending
/// in a symbol (fixed parameters plus a rest parameter), as bound by
/// `eval::bind_params`.
#[derive(Debug)]
pub struct CompoundProcData {
    pub params: Value,
    pub body: Vec<Value>,
    pub env: Rc<Environment>,
}

/// The cons cell backing every pair and, by chaining, every list.
pub type PairCell = Rc<RefCell<(Value, Value)>>;

#[derive(Debug, Clone)]
pub enum Value {
    EmptyList,
    Boolean(bool),
    Fixnum(i64),
    Character(u8),
    Str(Rc<str>),
    Symbol(Symbol),
    Pair(PairCell),
    PrimitiveProc(Rc<Primitive>),
    CompoundProc(Rc<CompoundProcData>),
    InputPort(InputPort),
    OutputPort(OutputPort),
    Eof,
    Environment(Rc<Environment>),
}

impl Value {
    pub fn cons(car: Value, cdr: Value) -> Value {
        Value::Pair(Rc::new(RefCell::new((car, cdr))))
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Value::Boolean(false))
    }

    pub fn is_true(&self) -> bool {
        !self.is_false()
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, Value::Pair(_))
    }

    /// Name used in type-mismatch diagnostics and by the `procedure?`-style
    /// predicates' error paths.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::EmptyList => "empty-list",
            Value::Boolean(_) => "boolean",
            Value::Fixnum(_) => "fixnum",
            Value::Character(_) => "character",
            Value::Str(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Pair(_) => "pair",
            Value::PrimitiveProc(_) => "primitive-procedure",
            Value::CompoundProc(_) => "compound-procedure",
            Value::InputPort(_) => "input-port",
            Value::OutputPort(_) => "output-port",
            Value::Eof => "eof",
            Value::Environment(_) => "environment",
        }
    }

    pub fn as_fixnum(&self) -> Option<i64> {
        match self {
            Value::Fixnum(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str_value(&self) -> Option<&Rc<str>> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_environment(&self) -> Option<&Rc<Environment>> {
        match self {
            Value::Environment(e) => Some(e),
            _ => None,
        }
    }

    pub fn car(&self) -> Option<Value> {
        match self {
            Value::Pair(cell) => Some(cell.borrow().0.clone()),
            _ => None,
        }
    }

    pub fn cdr(&self) -> Option<Value> {
        match self {
            Value::Pair(cell) => Some(cell.borrow().1.clone()),
            _ => None,
        }
    }

    pub fn set_car(&self, value: Value) -> bool {
        match self {
            Value::Pair(cell) => {
                cell.borrow_mut().0 = value;
                true
            }
            _ => false,
        }
    }

    pub fn set_cdr(&self, value: Value) -> bool {
        match self {
            Value::Pair(cell) => {
                cell.borrow_mut().1 = value;
                true
            }
            _ => false,
        }
    }

    /// Builds a proper list from the given values.
    pub fn list(items: Vec<Value>) -> Value {
        items
            .into_iter()
            .rev()
            .fold(Value::EmptyList, |tail, item| Value::cons(item, tail))
    }

    /// Walks a proper list into a `Vec`. Returns `None` if the chain is
    /// improper (does not end in `EmptyList`).
    pub fn to_vec(&self) -> Option<Vec<Value>> {
        let mut out = Vec::new();
        let mut cur = self.clone();
        loop {
            match cur {
                Value::EmptyList => return Some(out),
                Value::Pair(cell) => {
                    let (car, cdr) = cell.borrow().clone();
                    out.push(car);
                    cur = cdr;
                }
                _ => return None,
            }
        }
    }

    /// `eq?`: identity for everything except the scalar-ish types
    /// (fixnum, character, string), which compare by value.
    pub fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::EmptyList, Value::EmptyList) => true,
            (Value::Eof, Value::Eof) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Fixnum(a), Value::Fixnum(b)) => a == b,
            (Value::Character(a), Value::Character(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Pair(a), Value::Pair(b)) => Rc::ptr_eq(a, b),
            (Value::PrimitiveProc(a), Value::PrimitiveProc(b)) => Rc::ptr_eq(a, b),
            (Value::CompoundProc(a), Value::CompoundProc(b)) => Rc::ptr_eq(a, b),
            (Value::InputPort(a), Value::InputPort(b)) => a == b,
            (Value::OutputPort(a), Value::OutputPort(b)) => a == b,
            (Value::Environment(a), Value::Environment(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_is_everything_but_false() {
        assert!(Value::Boolean(true).is_true());
        assert!(Value::Fixnum(0).is_true());
        assert!(Value::EmptyList.is_true());
        assert!(Value::Boolean(false).is_false());
    }

    #[test]
    fn list_round_trips_through_to_vec() {
        let v = Value::list(vec![Value::Fixnum(1), Value::Fixnum(2), Value::Fixnum(3)]);
        let back = v.to_vec().unwrap();
        assert_eq!(back.len(), 3);
        assert!(matches!(back[0], Value::Fixnum(1)));
    }

    #[test]
    fn improper_list_has_no_to_vec() {
        let v = Value::cons(Value::Fixnum(1), Value::Fixnum(2));
        assert!(v.to_vec().is_none());
    }

    #[test]
    fn eq_is_value_equality_for_fixnums_and_strings() {
        assert!(Value::Fixnum(7).eq(&Value::Fixnum(7)));
        assert!(Value::Str(Rc::from("hi")).eq(&Value::Str(Rc::from("hi"))));
    }

    #[test]
    fn eq_is_identity_for_pairs() {
        let a = Value::cons(Value::Fixnum(1), Value::EmptyList);
        let b = Value::cons(Value::Fixnum(1), Value::EmptyList);
        assert!(!a.eq(&b));
        assert!(a.eq(&a.clone()));
    }

    #[test]
    fn set_car_and_set_cdr_mutate_in_place() {
        let p = Value::cons(Value::Fixnum(1), Value::Fixnum(2));
        assert!(p.set_car(Value::Fixnum(9)));
        assert!(p.set_cdr(Value::Fixnum(8)));
        assert!(matches!(p.car(), Some(Value::Fixnum(9))));
        assert!(matches!(p.cdr(), Some(Value::Fixnum(8))));
    }
}
