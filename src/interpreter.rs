// ABOUTME: Interpreter context bundling the symbol table, global environment, and special-form symbols

use std::rc::Rc;

use crate::builtins;
use crate::env::Environment;
use crate::ports::{InputPort, OutputPort};
use crate::symbol::{Symbol, SymbolTable};
use crate::value::{Primitive, Value};

/// Symbols pre-interned at startup so the evaluator's special-form dispatch
/// can compare by identity instead of re-hashing a string on every call.
pub struct WellKnownSymbols {
    pub quote: Symbol,
    pub define: Symbol,
    pub set: Symbol,
    pub ok: Symbol,
    pub if_: Symbol,
    pub lambda: Symbol,
    pub begin: Symbol,
    pub cond: Symbol,
    pub else_: Symbol,
    pub let_: Symbol,
    pub and: Symbol,
    pub or: Symbol,
    pub eval: Symbol,
    pub apply: Symbol,
}

/// Holds every piece of what the reference implementation keeps as mutable
/// globals: the symbol table, the global environment, and the well-known
/// symbols the evaluator dispatches on. One instance is created per REPL or
/// script run.
pub struct Interpreter {
    pub symbols: SymbolTable,
    pub global_env: Rc<Environment>,
    pub well_known: WellKnownSymbols,
    /// Identity markers for the two primitives the evaluator must special-case
    /// to keep `eval`/`apply` calls in tail position (see `eval.rs`).
    pub eval_primitive: Rc<Primitive>,
    pub apply_primitive: Rc<Primitive>,
    /// Default ports the I/O primitives fall back to when called without an
    /// explicit port argument.
    pub stdin: InputPort,
    pub stdout: OutputPort,
}

impl Interpreter {
    pub fn new() -> Self {
        let symbols = SymbolTable::new();
        let well_known = WellKnownSymbols {
            quote: symbols.intern("quote"),
            define: symbols.intern("define"),
            set: symbols.intern("set!"),
            ok: symbols.intern("ok"),
            if_: symbols.intern("if"),
            lambda: symbols.intern("lambda"),
            begin: symbols.intern("begin"),
            cond: symbols.intern("cond"),
            else_: symbols.intern("else"),
            let_: symbols.intern("let"),
            and: symbols.intern("and"),
            or: symbols.intern("or"),
            eval: symbols.intern("eval"),
            apply: symbols.intern("apply"),
        };
        let global_env = Environment::new();

        let eval_primitive = Rc::new(Primitive {
            name: "eval",
            func: builtins::meta::eval_marker,
        });
        let apply_primitive = Rc::new(Primitive {
            name: "apply",
            func: builtins::meta::apply_marker,
        });

        let mut interp = Interpreter {
            symbols,
            global_env,
            well_known,
            eval_primitive,
            apply_primitive,
            stdin: InputPort::new(Box::new(std::io::stdin())),
            stdout: OutputPort::new(Box::new(std::io::stdout())),
        };
        interp.register_builtins();
        interp
    }

    fn register_builtins(&mut self) {
        let global = self.global_env.clone();
        self.populate(&global);
    }

    /// Defines `eval`/`apply` and every primitive procedure into `env`. Used
    /// both to set up the global environment at startup and by the
    /// `environment` primitive, which hands back a fresh, independently
    /// populated environment rather than sharing the global one.
    pub fn populate(&self, env: &Rc<Environment>) {
        let eval_sym = self.intern("eval");
        let apply_sym = self.intern("apply");
        env.define(eval_sym, Value::PrimitiveProc(self.eval_primitive.clone()));
        env.define(
            apply_sym,
            Value::PrimitiveProc(self.apply_primitive.clone()),
        );
        builtins::register_all(self, env);
    }

    pub fn intern(&self, name: &str) -> Symbol {
        self.symbols.intern(name)
    }

    pub fn define_primitive(
        &self,
        env: &Rc<Environment>,
        name: &'static str,
        func: crate::value::PrimitiveFn,
    ) {
        let sym = self.intern(name);
        env.define(sym, Value::PrimitiveProc(Rc::new(Primitive { name, func })));
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_symbols_are_interned_through_the_shared_table() {
        let interp = Interpreter::new();
        assert_eq!(interp.well_known.quote, interp.intern("quote"));
    }

    #[test]
    fn eval_and_apply_are_registered_as_primitives() {
        let interp = Interpreter::new();
        let eval_sym = interp.intern("eval");
        assert!(matches!(
            interp.global_env.get(&eval_sym),
            Some(Value::PrimitiveProc(_))
        ));
    }
}
