// ABOUTME: Tree-walking evaluator with an explicit tail-call loop

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::interpreter::Interpreter;
use crate::value::{CompoundProcData, Value};

enum Apply {
    Value(Value),
    Tail(Value, Rc<Environment>),
}

impl Interpreter {
    /// Evaluates `expr` in `env`. Special forms whose last action is in tail
    /// position (the chosen branch of `if`, the last expression of `begin`,
    /// the desugared body of `cond`/`let`, the last test of `and`/`or`, and a
    /// compound procedure's body) are handled by rebinding `expr`/`env` and
    /// looping, rather than by recursing, so none of them grow the Rust call
    /// stack.
    pub fn eval(&mut self, mut expr: Value, mut env: Rc<Environment>) -> Result<Value, EvalError> {
        loop {
            match &expr {
                Value::Boolean(_)
                | Value::Fixnum(_)
                | Value::Character(_)
                | Value::Str(_)
                | Value::EmptyList
                | Value::PrimitiveProc(_)
                | Value::CompoundProc(_)
                | Value::InputPort(_)
                | Value::OutputPort(_)
                | Value::Eof
                | Value::Environment(_) => return Ok(expr),

                Value::Symbol(sym) => {
                    return env
                        .get(sym)
                        .ok_or_else(|| EvalError::UnboundVariable(sym.to_string()))
                }

                Value::Pair(_) => {
                    let head = expr.car().unwrap();

                    if let Value::Symbol(sym) = &head {
                        let wk = &self.well_known;
                        if *sym == wk.quote {
                            return Ok(expr.cdr().unwrap().car().unwrap());
                        }
                        if *sym == wk.set {
                            let rest = expr.cdr().unwrap();
                            let var = rest.car().unwrap();
                            let valexpr = rest.cdr().unwrap().car().unwrap();
                            let val = self.eval(valexpr, env.clone())?;
                            let var_sym = var
                                .as_symbol()
                                .cloned()
                                .ok_or(EvalError::UnknownExpressionType)?;
                            env.set(&var_sym, val)?;
                            return Ok(Value::Symbol(self.well_known.ok.clone()));
                        }
                        if *sym == wk.define {
                            return self.eval_define(expr.cdr().unwrap(), &env);
                        }
                        if *sym == wk.if_ {
                            let rest = expr.cdr().unwrap();
                            let pred = rest.car().unwrap();
                            let rest2 = rest.cdr().unwrap();
                            let consequent = rest2.car().unwrap();
                            let alternative = rest2.cdr().unwrap();
                            let test = self.eval(pred, env.clone())?;
                            expr = if test.is_true() {
                                consequent
                            } else {
                                match alternative {
                                    Value::EmptyList => return Ok(Value::Boolean(false)),
                                    other => other.car().unwrap(),
                                }
                            };
                            continue;
                        }
                        if *sym == wk.lambda {
                            let rest = expr.cdr().unwrap();
                            let params = rest.car().unwrap();
                            let body = rest
                                .cdr()
                                .unwrap()
                                .to_vec()
                                .ok_or(EvalError::UnknownExpressionType)?;
                            return Ok(Value::CompoundProc(Rc::new(CompoundProcData {
                                params,
                                body,
                                env: env.clone(),
                            })));
                        }
                        if *sym == wk.begin {
                            let mut actions = expr.cdr().unwrap();
                            loop {
                                let action = actions.car().ok_or(EvalError::UnknownExpressionType)?;
                                let rest = actions.cdr().unwrap();
                                if matches!(rest, Value::EmptyList) {
                                    expr = action;
                                    break;
                                }
                                self.eval(action, env.clone())?;
                                actions = rest;
                            }
                            continue;
                        }
                        if *sym == wk.cond {
                            expr = self.cond_to_if(expr.cdr().unwrap())?;
                            continue;
                        }
                        if *sym == wk.let_ {
                            expr = self.let_to_application(&expr)?;
                            continue;
                        }
                        if *sym == wk.and {
                            let mut tests = expr.cdr().unwrap();
                            if matches!(tests, Value::EmptyList) {
                                return Ok(Value::Boolean(true));
                            }
                            loop {
                                let test = tests.car().unwrap();
                                let rest = tests.cdr().unwrap();
                                if matches!(rest, Value::EmptyList) {
                                    expr = test;
                                    break;
                                }
                                if self.eval(test, env.clone())?.is_false() {
                                    return Ok(Value::Boolean(false));
                                }
                                tests = rest;
                            }
                            continue;
                        }
                        if *sym == wk.or {
                            let mut tests = expr.cdr().unwrap();
                            if matches!(tests, Value::EmptyList) {
                                return Ok(Value::Boolean(false));
                            }
                            loop {
                                let test = tests.car().unwrap();
                                let rest = tests.cdr().unwrap();
                                if matches!(rest, Value::EmptyList) {
                                    expr = test;
                                    break;
                                }
                                let v = self.eval(test, env.clone())?;
                                if v.is_true() {
                                    return Ok(v);
                                }
                                tests = rest;
                            }
                            continue;
                        }
                    }

                    // Application: evaluate operator, then operands left-to-right.
                    let mut operator = self.eval(head, env.clone())?;
                    let operand_exprs = expr
                        .cdr()
                        .unwrap()
                        .to_vec()
                        .ok_or(EvalError::ImproperArgumentList)?;
                    let mut args = Vec::with_capacity(operand_exprs.len());
                    for oe in operand_exprs {
                        args.push(self.eval(oe, env.clone())?);
                    }

                    if let Value::PrimitiveProc(p) = &operator {
                        if Rc::ptr_eq(p, &self.eval_primitive) {
                            if args.len() != 2 {
                                return Err(EvalError::arity("eval", "2", args.len()));
                            }
                            let env_arg = args.pop().unwrap();
                            let next_env = env_arg
                                .as_environment()
                                .cloned()
                                .ok_or_else(|| {
                                    EvalError::type_mismatch(
                                        "eval",
                                        "environment",
                                        env_arg.type_name(),
                                        1,
                                    )
                                })?;
                            expr = args.pop().unwrap();
                            env = next_env;
                            continue;
                        }
                        if Rc::ptr_eq(p, &self.apply_primitive) {
                            if args.is_empty() {
                                return Err(EvalError::arity("apply", "at least 1", 0));
                            }
                            let proc = args.remove(0);
                            let final_args = if args.is_empty() {
                                Vec::new()
                            } else {
                                let last = args.pop().unwrap();
                                let mut spread =
                                    last.to_vec().ok_or(EvalError::ImproperArgumentList)?;
                                let mut full = args;
                                full.append(&mut spread);
                                full
                            };
                            operator = proc;
                            args = final_args;
                        }
                    }

                    match self.apply_procedure(operator, args)? {
                        Apply::Value(v) => return Ok(v),
                        Apply::Tail(next_expr, next_env) => {
                            expr = next_expr;
                            env = next_env;
                        }
                    }
                }
            }
        }
    }

    fn apply_procedure(&mut self, operator: Value, args: Vec<Value>) -> Result<Apply, EvalError> {
        match operator {
            Value::PrimitiveProc(p) => Ok(Apply::Value((p.func)(self, &args)?)),
            Value::CompoundProc(proc) => {
                let new_env = Environment::with_parent(proc.env.clone());
                bind_params(&proc.params, &args, &new_env)?;
                let body = make_begin(&proc.body, &self.well_known.begin);
                Ok(Apply::Tail(body, new_env))
            }
            _ => Err(EvalError::UnknownProcedureType),
        }
    }

    fn eval_define(&mut self, rest: Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
        let target = rest.car().unwrap();
        let (name, value) = if let Value::Pair(_) = &target {
            // (define (name . params) body...) => (define name (lambda params body...))
            let name = target
                .car()
                .unwrap()
                .as_symbol()
                .cloned()
                .ok_or(EvalError::UnknownExpressionType)?;
            let params = target.cdr().unwrap();
            let body = rest.cdr().unwrap();
            let lambda_expr = Value::cons(
                Value::Symbol(self.well_known.lambda.clone()),
                Value::cons(params, body),
            );
            let proc = self.eval(lambda_expr, env.clone())?;
            (name, proc)
        } else {
            let name = target
                .as_symbol()
                .cloned()
                .ok_or(EvalError::UnknownExpressionType)?;
            let valexpr = rest.cdr().unwrap().car().unwrap();
            let value = self.eval(valexpr, env.clone())?;
            (name, value)
        };
        env.define(name, value);
        Ok(Value::Symbol(self.well_known.ok.clone()))
    }

    fn cond_to_if(&self, clauses: Value) -> Result<Value, EvalError> {
        match clauses {
            Value::EmptyList => Ok(Value::Boolean(false)),
            Value::Pair(_) => {
                let clause = clauses.car().unwrap();
                let rest = clauses.cdr().unwrap();
                let predicate = clause.car().unwrap();
                let actions = clause.cdr().unwrap();

                let is_else =
                    matches!(&predicate, Value::Symbol(s) if *s == self.well_known.else_);
                if is_else {
                    if !matches!(rest, Value::EmptyList) {
                        return Err(EvalError::ElseNotLast);
                    }
                    return self.sequence_to_exp(actions);
                }

                let consequent = self.sequence_to_exp(actions)?;
                let alternative = self.cond_to_if(rest)?;
                Ok(Value::list(vec![
                    Value::Symbol(self.well_known.if_.clone()),
                    predicate,
                    consequent,
                    alternative,
                ]))
            }
            _ => Err(EvalError::UnknownExpressionType),
        }
    }

    fn sequence_to_exp(&self, seq: Value) -> Result<Value, EvalError> {
        match &seq {
            Value::EmptyList => Ok(seq),
            _ if matches!(seq.cdr(), Some(Value::EmptyList)) => Ok(seq.car().unwrap()),
            Value::Pair(_) => Ok(make_begin(
                &seq.to_vec().ok_or(EvalError::UnknownExpressionType)?,
                &self.well_known.begin,
            )),
            _ => Err(EvalError::UnknownExpressionType),
        }
    }

    fn let_to_application(&self, expr: &Value) -> Result<Value, EvalError> {
        let bindings = expr.cdr().unwrap().car().unwrap();
        let body = expr.cdr().unwrap().cdr().unwrap();

        let mut params = Vec::new();
        let mut args = Vec::new();
        let mut cur = bindings;
        loop {
            match cur {
                Value::EmptyList => break,
                Value::Pair(_) => {
                    let binding = cur.car().unwrap();
                    params.push(binding.car().unwrap());
                    args.push(binding.cdr().unwrap().car().unwrap());
                    cur = cur.cdr().unwrap();
                }
                _ => return Err(EvalError::UnknownExpressionType),
            }
        }

        let lambda_expr = Value::cons(
            Value::Symbol(self.well_known.lambda.clone()),
            Value::cons(Value::list(params), body),
        );
        Ok(Value::cons(lambda_expr, Value::list(args)))
    }
}

/// Wraps a compound procedure's body (or a `cond`/`let` clause's action
/// list) in a synthetic `(begin ...)` so it can re-enter the tail loop the
/// same way a literal `begin` form would.
fn make_begin(body: &[Value], begin_sym: &crate::symbol::Symbol) -> Value {
    Value::cons(Value::Symbol(begin_sym.clone()), Value::list(body.to_vec()))
}

/// Binds `args` against a lambda parameter spec: a bare symbol (all args
/// collected into one variadic list), a proper list of symbols (exact
/// arity), or an improper list ending in a symbol (fixed parameters plus a
/// rest parameter).
fn bind_params(params: &Value, args: &[Value], env: &Rc<Environment>) -> Result<(), EvalError> {
    match params {
        Value::Symbol(s) => {
            env.define(s.clone(), Value::list(args.to_vec()));
            Ok(())
        }
        Value::EmptyList => {
            if !args.is_empty() {
                return Err(EvalError::arity("#<compound-procedure>", "0", args.len()));
            }
            Ok(())
        }
        Value::Pair(_) => {
            let mut cur = params.clone();
            let mut i = 0;
            loop {
                match cur {
                    Value::Pair(_) => {
                        let sym = cur
                            .car()
                            .unwrap()
                            .as_symbol()
                            .cloned()
                            .ok_or(EvalError::UnknownExpressionType)?;
                        let arg = args.get(i).cloned().ok_or_else(|| {
                            EvalError::arity("#<compound-procedure>", "more", args.len())
                        })?;
                        env.define(sym, arg);
                        i += 1;
                        cur = cur.cdr().unwrap();
                    }
                    Value::Symbol(rest_sym) => {
                        env.define(rest_sym, Value::list(args[i..].to_vec()));
                        return Ok(());
                    }
                    Value::EmptyList => {
                        if i != args.len() {
                            return Err(EvalError::arity(
                                "#<compound-procedure>",
                                i.to_string(),
                                args.len(),
                            ));
                        }
                        return Ok(());
                    }
                    _ => return Err(EvalError::UnknownExpressionType),
                }
            }
        }
        _ => Err(EvalError::UnknownExpressionType),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn eval_str(interp: &mut Interpreter, src: &str) -> Value {
        let mut reader = crate::reader::Reader::new(Cursor::new(src.as_bytes().to_vec()));
        let expr = reader.read(interp).unwrap().unwrap();
        let env = interp.global_env.clone();
        interp.eval(expr, env).unwrap()
    }

    #[test]
    fn self_evaluating_values_return_unchanged() {
        let mut interp = Interpreter::new();
        assert!(matches!(eval_str(&mut interp, "42"), Value::Fixnum(42)));
        assert!(matches!(eval_str(&mut interp, "#t"), Value::Boolean(true)));
    }

    #[test]
    fn quote_returns_the_datum_unevaluated() {
        let mut interp = Interpreter::new();
        let v = eval_str(&mut interp, "(quote (a b))");
        let items = v.to_vec().unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn arithmetic_application() {
        let mut interp = Interpreter::new();
        assert!(matches!(eval_str(&mut interp, "(+ 1 2 3)"), Value::Fixnum(6)));
    }

    #[test]
    fn if_with_missing_alternative_is_false() {
        let mut interp = Interpreter::new();
        assert!(matches!(
            eval_str(&mut interp, "(if #f 1)"),
            Value::Boolean(false)
        ));
    }

    #[test]
    fn if_truthiness_accepts_any_non_false_value() {
        let mut interp = Interpreter::new();
        assert!(matches!(
            eval_str(&mut interp, "(if 0 'yes 'no)"),
            Value::Symbol(_)
        ));
    }

    #[test]
    fn define_then_reference() {
        let mut interp = Interpreter::new();
        eval_str(&mut interp, "(define x 10)");
        assert!(matches!(eval_str(&mut interp, "x"), Value::Fixnum(10)));
    }

    #[test]
    fn define_function_shorthand() {
        let mut interp = Interpreter::new();
        eval_str(&mut interp, "(define (square x) (* x x))");
        assert!(matches!(
            eval_str(&mut interp, "(square 6)"),
            Value::Fixnum(36)
        ));
    }

    #[test]
    fn set_mutates_an_existing_binding() {
        let mut interp = Interpreter::new();
        eval_str(&mut interp, "(define x 1)");
        eval_str(&mut interp, "(set! x 2)");
        assert!(matches!(eval_str(&mut interp, "x"), Value::Fixnum(2)));
    }

    #[test]
    fn lambda_application_and_closures() {
        let mut interp = Interpreter::new();
        assert!(matches!(
            eval_str(&mut interp, "((lambda (x y) (* x y)) 6 7)"),
            Value::Fixnum(42)
        ));
    }

    #[test]
    fn variadic_lambda_collects_all_args() {
        let mut interp = Interpreter::new();
        eval_str(&mut interp, "(define f (lambda args args))");
        let v = eval_str(&mut interp, "(f 1 2 3)");
        assert_eq!(v.to_vec().unwrap().len(), 3);
    }

    #[test]
    fn rest_param_lambda() {
        let mut interp = Interpreter::new();
        eval_str(&mut interp, "(define f (lambda (a . rest) rest))");
        let v = eval_str(&mut interp, "(f 1 2 3)");
        assert_eq!(v.to_vec().unwrap().len(), 2);
    }

    #[test]
    fn wrong_arity_is_an_error() {
        let mut interp = Interpreter::new();
        eval_str(&mut interp, "(define f (lambda (a b) a))");
        let mut reader = crate::reader::Reader::new(Cursor::new(b"(f 1)".to_vec()));
        let expr = reader.read(&interp).unwrap().unwrap();
        let env = interp.global_env.clone();
        assert!(interp.eval(expr, env).is_err());
    }

    #[test]
    fn begin_returns_the_last_expression() {
        let mut interp = Interpreter::new();
        assert!(matches!(eval_str(&mut interp, "(begin 1 2 3)"), Value::Fixnum(3)));
    }

    #[test]
    fn cond_dispatches_to_the_matching_clause() {
        let mut interp = Interpreter::new();
        let v = eval_str(&mut interp, "(cond ((= 1 2) 'a) ((= 2 2) 'b) (else 'c))");
        assert_eq!(v.as_symbol().unwrap().as_str(), "b");
    }

    #[test]
    fn cond_else_not_last_is_an_error() {
        let mut interp = Interpreter::new();
        let mut reader = crate::reader::Reader::new(Cursor::new(b"(cond (else 1) (#t 2))".to_vec()));
        let expr = reader.read(&interp).unwrap().unwrap();
        let env = interp.global_env.clone();
        assert!(interp.eval(expr, env).is_err());
    }

    #[test]
    fn let_desugars_and_scopes_correctly() {
        let mut interp = Interpreter::new();
        let v = eval_str(&mut interp, "(let ((x 10) (y 20)) (+ x y))");
        assert!(matches!(v, Value::Fixnum(30)));
    }

    #[test]
    fn let_bindings_do_not_see_each_other() {
        let mut interp = Interpreter::new();
        eval_str(&mut interp, "(define x 1)");
        let v = eval_str(&mut interp, "(let ((y x) (x 2)) y)");
        assert!(matches!(v, Value::Fixnum(1)));
    }

    #[test]
    fn nested_let_shadows_and_restores() {
        let mut interp = Interpreter::new();
        let v = eval_str(&mut interp, "(let ((x 1)) (let ((x 2)) x))");
        assert!(matches!(v, Value::Fixnum(2)));
    }

    #[test]
    fn and_short_circuits_on_first_false() {
        let mut interp = Interpreter::new();
        assert!(matches!(
            eval_str(&mut interp, "(and 1 2 #f 3)"),
            Value::Boolean(false)
        ));
    }

    #[test]
    fn and_of_no_tests_is_true() {
        let mut interp = Interpreter::new();
        assert!(matches!(eval_str(&mut interp, "(and)"), Value::Boolean(true)));
    }

    #[test]
    fn or_returns_first_true_value() {
        let mut interp = Interpreter::new();
        assert!(matches!(eval_str(&mut interp, "(or #f #f 7)"), Value::Fixnum(7)));
    }

    #[test]
    fn or_of_no_tests_is_false() {
        let mut interp = Interpreter::new();
        assert!(matches!(eval_str(&mut interp, "(or)"), Value::Boolean(false)));
    }

    #[test]
    fn tail_recursive_loop_does_not_grow_the_stack() {
        let mut interp = Interpreter::new();
        eval_str(
            &mut interp,
            "(define (loop n acc) (if (= n 0) acc (loop (- n 1) (+ acc 1))))",
        );
        let v = eval_str(&mut interp, "(loop 200000 0)");
        assert!(matches!(v, Value::Fixnum(200000)));
    }

    #[test]
    fn apply_spreads_the_final_list_argument() {
        let mut interp = Interpreter::new();
        let v = eval_str(&mut interp, "(apply + 1 2 (list 3 4))");
        assert!(matches!(v, Value::Fixnum(10)));
    }

    #[test]
    fn eval_primitive_reevaluates_a_quoted_form_in_a_given_environment() {
        let mut interp = Interpreter::new();
        let v = eval_str(
            &mut interp,
            "(eval (list '+ 1 2) (interaction-environment))",
        );
        assert!(matches!(v, Value::Fixnum(3)));
    }

    #[test]
    fn eval_with_the_wrong_number_of_arguments_is_an_error() {
        let mut interp = Interpreter::new();
        let mut reader =
            crate::reader::Reader::new(Cursor::new(b"(eval '(+ 1 2))".to_vec()));
        let expr = reader.read(&interp).unwrap().unwrap();
        let env = interp.global_env.clone();
        assert!(interp.eval(expr, env).is_err());
    }

    #[test]
    fn eval_rejects_a_non_environment_second_argument() {
        let mut interp = Interpreter::new();
        let mut reader = crate::reader::Reader::new(Cursor::new(b"(eval '(+ 1 2) 5)".to_vec()));
        let expr = reader.read(&interp).unwrap().unwrap();
        let env = interp.global_env.clone();
        assert!(interp.eval(expr, env).is_err());
    }

    #[test]
    fn unbound_variable_is_an_error() {
        let mut interp = Interpreter::new();
        let mut reader = crate::reader::Reader::new(Cursor::new(b"totally-unbound".to_vec()));
        let expr = reader.read(&interp).unwrap().unwrap();
        let env = interp.global_env.clone();
        assert!(interp.eval(expr, env).is_err());
    }
}
