// ABOUTME: Registers every primitive procedure into a given environment

use std::rc::Rc;

use crate::env::Environment;
use crate::interpreter::Interpreter;

pub mod arithmetic;
pub mod conversions;
pub mod errors;
pub mod io;
pub mod meta;
pub mod pairs;
pub mod predicates;

pub fn register_all(interp: &Interpreter, env: &Rc<Environment>) {
    predicates::register(interp, env);
    conversions::register(interp, env);
    arithmetic::register(interp, env);
    pairs::register(interp, env);
    meta::register(interp, env);
    io::register(interp, env);
    errors::register(interp, env);
}
