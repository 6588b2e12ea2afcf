// ABOUTME: Conversions between the scalar value types

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::interpreter::Interpreter;
use crate::value::Value;

fn char_to_integer(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::Character(c)] => Ok(Value::Fixnum(*c as i64)),
        [other] => Err(EvalError::type_mismatch("char->integer", "character", other.type_name(), 0)),
        _ => Err(EvalError::arity("char->integer", "1", args.len())),
    }
}

fn integer_to_char(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::Fixnum(n)] if (0..=255).contains(n) => Ok(Value::Character(*n as u8)),
        [Value::Fixnum(_)] => Err(EvalError::type_mismatch(
            "integer->char",
            "integer in 0..255",
            "out-of-range fixnum",
            0,
        )),
        [other] => Err(EvalError::type_mismatch("integer->char", "fixnum", other.type_name(), 0)),
        _ => Err(EvalError::arity("integer->char", "1", args.len())),
    }
}

fn number_to_string(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::Fixnum(n)] => Ok(Value::Str(n.to_string().into())),
        [other] => Err(EvalError::type_mismatch("number->string", "fixnum", other.type_name(), 0)),
        _ => Err(EvalError::arity("number->string", "1", args.len())),
    }
}

/// Returns `#f` rather than an error when `s` doesn't parse, matching the
/// reference's treatment of malformed input as a predicate failure.
fn string_to_number(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::Str(s)] => Ok(s
            .parse::<i64>()
            .map(Value::Fixnum)
            .unwrap_or(Value::Boolean(false))),
        [other] => Err(EvalError::type_mismatch("string->number", "string", other.type_name(), 0)),
        _ => Err(EvalError::arity("string->number", "1", args.len())),
    }
}

fn symbol_to_string(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::Symbol(s)] => Ok(Value::Str(s.as_str().into())),
        [other] => Err(EvalError::type_mismatch("symbol->string", "symbol", other.type_name(), 0)),
        _ => Err(EvalError::arity("symbol->string", "1", args.len())),
    }
}

fn string_to_symbol(interp: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::Str(s)] => Ok(Value::Symbol(interp.intern(s))),
        [other] => Err(EvalError::type_mismatch("string->symbol", "string", other.type_name(), 0)),
        _ => Err(EvalError::arity("string->symbol", "1", args.len())),
    }
}

pub fn register(interp: &Interpreter, env: &Rc<Environment>) {
    interp.define_primitive(env, "char->integer", char_to_integer);
    interp.define_primitive(env, "integer->char", integer_to_char);
    interp.define_primitive(env, "number->string", number_to_string);
    interp.define_primitive(env, "string->number", string_to_number);
    interp.define_primitive(env, "symbol->string", symbol_to_string);
    interp.define_primitive(env, "string->symbol", string_to_symbol);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn eval_one(interp: &mut Interpreter, src: &str) -> Value {
        let mut reader = crate::reader::Reader::new(Cursor::new(src.as_bytes().to_vec()));
        let expr = reader.read(interp).unwrap().unwrap();
        let env = interp.global_env.clone();
        interp.eval(expr, env).unwrap()
    }

    #[test]
    fn char_integer_round_trip() {
        let mut interp = Interpreter::new();
        assert!(matches!(
            eval_one(&mut interp, "(integer->char (char->integer #\\a))"),
            Value::Character(b'a')
        ));
    }

    #[test]
    fn number_string_round_trip() {
        let mut interp = Interpreter::new();
        assert!(matches!(
            eval_one(&mut interp, "(string->number (number->string 42))"),
            Value::Fixnum(42)
        ));
    }

    #[test]
    fn string_to_number_failure_is_false_not_an_error() {
        let mut interp = Interpreter::new();
        assert!(matches!(
            eval_one(&mut interp, "(string->number \"not-a-number\")"),
            Value::Boolean(false)
        ));
    }

    #[test]
    fn string_and_symbol_interning_round_trip() {
        let mut interp = Interpreter::new();
        let v = eval_one(&mut interp, "(eq? (string->symbol \"foo\") 'foo)");
        assert!(matches!(v, Value::Boolean(true)));
    }
}
