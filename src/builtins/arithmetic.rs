// ABOUTME: Fixnum arithmetic and ordering

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::interpreter::Interpreter;
use crate::value::Value;

fn fixnum(name: &'static str, position: usize, v: &Value) -> Result<i64, EvalError> {
    v.as_fixnum()
        .ok_or_else(|| EvalError::type_mismatch(name, "fixnum", v.type_name(), position))
}

fn add(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    let mut sum: i64 = 0;
    for (pos, a) in args.iter().enumerate() {
        sum = sum.wrapping_add(fixnum("+", pos, a)?);
    }
    Ok(Value::Fixnum(sum))
}

/// `(- n)` negates; `(- a b c...)` left-folds subtraction from `a`.
fn sub(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [] => Err(EvalError::arity("-", "at least 1", 0)),
        [only] => Ok(Value::Fixnum(fixnum("-", 0, only)?.wrapping_neg())),
        [first, rest @ ..] => {
            let mut acc = fixnum("-", 0, first)?;
            for (pos, a) in rest.iter().enumerate() {
                acc = acc.wrapping_sub(fixnum("-", pos + 1, a)?);
            }
            Ok(Value::Fixnum(acc))
        }
    }
}

fn mul(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    let mut product: i64 = 1;
    for (pos, a) in args.iter().enumerate() {
        product = product.wrapping_mul(fixnum("*", pos, a)?);
    }
    Ok(Value::Fixnum(product))
}

fn quotient(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [a, b] => {
            let (a, b) = (fixnum("quotient", 0, a)?, fixnum("quotient", 1, b)?);
            if b == 0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Value::Fixnum(a.wrapping_div(b)))
        }
        _ => Err(EvalError::arity("quotient", "2", args.len())),
    }
}

fn remainder(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [a, b] => {
            let (a, b) = (fixnum("remainder", 0, a)?, fixnum("remainder", 1, b)?);
            if b == 0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Value::Fixnum(a.wrapping_rem(b)))
        }
        _ => Err(EvalError::arity("remainder", "2", args.len())),
    }
}

fn number_equal(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    chain(args, "=", |a, b| a == b)
}

fn less_than(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    chain(args, "<", |a, b| a < b)
}

fn greater_than(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    chain(args, ">", |a, b| a > b)
}

/// Every adjacent pair must satisfy `cmp`; an empty or single-argument call
/// is trivially true.
fn chain(args: &[Value], name: &'static str, cmp: fn(i64, i64) -> bool) -> Result<Value, EvalError> {
    let mut prev = match args.first() {
        Some(v) => fixnum(name, 0, v)?,
        None => return Ok(Value::Boolean(true)),
    };
    for (pos, v) in args[1..].iter().enumerate() {
        let n = fixnum(name, pos + 1, v)?;
        if !cmp(prev, n) {
            return Ok(Value::Boolean(false));
        }
        prev = n;
    }
    Ok(Value::Boolean(true))
}

pub fn register(interp: &Interpreter, env: &Rc<Environment>) {
    interp.define_primitive(env, "+", add);
    interp.define_primitive(env, "-", sub);
    interp.define_primitive(env, "*", mul);
    interp.define_primitive(env, "quotient", quotient);
    interp.define_primitive(env, "remainder", remainder);
    interp.define_primitive(env, "=", number_equal);
    interp.define_primitive(env, "<", less_than);
    interp.define_primitive(env, ">", greater_than);
}
