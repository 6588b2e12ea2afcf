// ABOUTME: Type and equality predicates

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::interpreter::Interpreter;
use crate::value::Value;

fn arity1(name: &str, args: &[Value]) -> Result<&Value, EvalError> {
    match args {
        [v] => Ok(v),
        _ => Err(EvalError::arity(name, "1", args.len())),
    }
}

fn null_p(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Boolean(matches!(arity1("null?", args)?, Value::EmptyList)))
}

fn boolean_p(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Boolean(matches!(arity1("boolean?", args)?, Value::Boolean(_))))
}

fn symbol_p(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Boolean(matches!(arity1("symbol?", args)?, Value::Symbol(_))))
}

fn integer_p(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Boolean(matches!(arity1("integer?", args)?, Value::Fixnum(_))))
}

fn char_p(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Boolean(matches!(arity1("char?", args)?, Value::Character(_))))
}

fn string_p(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Boolean(matches!(arity1("string?", args)?, Value::Str(_))))
}

fn pair_p(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Boolean(matches!(arity1("pair?", args)?, Value::Pair(_))))
}

fn procedure_p(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Boolean(matches!(
        arity1("procedure?", args)?,
        Value::PrimitiveProc(_) | Value::CompoundProc(_)
    )))
}

fn input_port_p(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Boolean(matches!(arity1("input-port?", args)?, Value::InputPort(_))))
}

fn output_port_p(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Boolean(matches!(arity1("output-port?", args)?, Value::OutputPort(_))))
}

fn eof_object_p(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Boolean(matches!(arity1("eof-object?", args)?, Value::Eof)))
}

fn eq_p(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [a, b] => Ok(Value::Boolean(a.eq(b))),
        _ => Err(EvalError::arity("eq?", "2", args.len())),
    }
}

pub fn register(interp: &Interpreter, env: &Rc<Environment>) {
    interp.define_primitive(env, "null?", null_p);
    interp.define_primitive(env, "boolean?", boolean_p);
    interp.define_primitive(env, "symbol?", symbol_p);
    interp.define_primitive(env, "integer?", integer_p);
    interp.define_primitive(env, "char?", char_p);
    interp.define_primitive(env, "string?", string_p);
    interp.define_primitive(env, "pair?", pair_p);
    interp.define_primitive(env, "procedure?", procedure_p);
    interp.define_primitive(env, "eq?", eq_p);
    interp.define_primitive(env, "input-port?", input_port_p);
    interp.define_primitive(env, "output-port?", output_port_p);
    interp.define_primitive(env, "eof-object?", eof_object_p);
}
