// ABOUTME: The `error` primitive, which aborts the current top-level form

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::interpreter::Interpreter;
use crate::value::Value;

/// Joins its arguments space-separated and raises them as a recoverable
/// error, unwinding to the nearest `load` call or the REPL prompt rather
/// than exiting the process.
fn error(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    let msg = args
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    Err(EvalError::User(msg))
}

pub fn register(interp: &Interpreter, env: &Rc<Environment>) {
    interp.define_primitive(env, "error", error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn error_unwinds_with_the_joined_message() {
        let mut interp = Interpreter::new();
        let mut reader = crate::reader::Reader::new(Cursor::new(b"(error \"bad\" 1 2)".to_vec()));
        let expr = reader.read(&interp).unwrap().unwrap();
        let env = interp.global_env.clone();
        match interp.eval(expr, env) {
            Err(EvalError::User(msg)) => assert_eq!(msg, "\"bad\" 1 2"),
            other => panic!("expected a user error, got {:?}", other),
        }
    }
}
