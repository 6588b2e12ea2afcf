// ABOUTME: Pair construction, access, and in-place mutation

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::interpreter::Interpreter;
use crate::value::Value;

fn cons(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [car, cdr] => Ok(Value::cons(car.clone(), cdr.clone())),
        _ => Err(EvalError::arity("cons", "2", args.len())),
    }
}

fn car(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [v] => v
            .car()
            .ok_or_else(|| EvalError::type_mismatch("car", "pair", v.type_name(), 0)),
        _ => Err(EvalError::arity("car", "1", args.len())),
    }
}

fn cdr(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [v] => v
            .cdr()
            .ok_or_else(|| EvalError::type_mismatch("cdr", "pair", v.type_name(), 0)),
        _ => Err(EvalError::arity("cdr", "1", args.len())),
    }
}

fn set_car(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [pair, value] if pair.is_pair() => {
            pair.set_car(value.clone());
            Ok(Value::Symbol(_i.intern("ok")))
        }
        [other, _] => Err(EvalError::type_mismatch("set-car!", "pair", other.type_name(), 0)),
        _ => Err(EvalError::arity("set-car!", "2", args.len())),
    }
}

fn set_cdr(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [pair, value] if pair.is_pair() => {
            pair.set_cdr(value.clone());
            Ok(Value::Symbol(_i.intern("ok")))
        }
        [other, _] => Err(EvalError::type_mismatch("set-cdr!", "pair", other.type_name(), 0)),
        _ => Err(EvalError::arity("set-cdr!", "2", args.len())),
    }
}

fn list(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::list(args.to_vec()))
}

pub fn register(interp: &Interpreter, env: &Rc<Environment>) {
    interp.define_primitive(env, "cons", cons);
    interp.define_primitive(env, "car", car);
    interp.define_primitive(env, "cdr", cdr);
    interp.define_primitive(env, "set-car!", set_car);
    interp.define_primitive(env, "set-cdr!", set_cdr);
    interp.define_primitive(env, "list", list);
}
