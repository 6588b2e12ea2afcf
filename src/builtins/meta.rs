// ABOUTME: Stand-ins for eval/apply and the environment-accessor primitives

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::interpreter::Interpreter;
use crate::value::Value;

// `eval` and `apply` are registered directly in `Interpreter::new` so their
// `Rc<Primitive>` identity is available to the evaluator's tail-position
// dispatch (see `eval.rs`). The evaluator always intercepts a call whose
// operator is `Rc::ptr_eq` to one of those two primitives, so these bodies
// are unreachable in practice; they exist only to give `eval`/`apply` a
// callable value before any expression has invoked them.
pub fn eval_marker(_interp: &mut Interpreter, _args: &[Value]) -> Result<Value, EvalError> {
    Err(EvalError::UnknownProcedureType)
}

pub fn apply_marker(_interp: &mut Interpreter, _args: &[Value]) -> Result<Value, EvalError> {
    Err(EvalError::UnknownProcedureType)
}

/// Returns the global environment itself, so top-level definitions made
/// through `eval` there are visible to the REPL and vice versa.
fn interaction_environment(interp: &mut Interpreter, _args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Environment(interp.global_env.clone()))
}

/// Returns a brand-new, empty environment with no parent and no bindings,
/// not even the primitives.
fn null_environment(_interp: &mut Interpreter, _args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Environment(Environment::new()))
}

/// Returns a freshly built environment populated with every primitive
/// procedure, independent of (and sharing no bindings with) the global one.
fn environment(interp: &mut Interpreter, _args: &[Value]) -> Result<Value, EvalError> {
    let env = Environment::new();
    interp.populate(&env);
    Ok(Value::Environment(env))
}

pub fn register(interp: &Interpreter, env: &Rc<Environment>) {
    interp.define_primitive(env, "interaction-environment", interaction_environment);
    interp.define_primitive(env, "null-environment", null_environment);
    interp.define_primitive(env, "environment", environment);
}
