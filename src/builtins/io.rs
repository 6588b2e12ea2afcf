// ABOUTME: Ports, reading, writing, and file loading

use std::fs::File;
use std::rc::Rc;

use crate::env::Environment;
use crate::error::{EvalError, PortError};
use crate::interpreter::Interpreter;
use crate::ports::{InputPort, OutputPort};
use crate::reader::Reader;
use crate::value::Value;
use crate::writer::write_value;

fn input_port_arg(interp: &Interpreter, args: &[Value], name: &'static str) -> Result<InputPort, EvalError> {
    match args {
        [] => Ok(interp.stdin.clone()),
        [Value::InputPort(p)] => Ok(p.clone()),
        [other] => Err(EvalError::type_mismatch(name, "input-port", other.type_name(), 0)),
        _ => Err(EvalError::arity(name, "0 or 1", args.len())),
    }
}

fn output_port_arg(interp: &Interpreter, args: &[Value], name: &'static str) -> Result<OutputPort, EvalError> {
    match args {
        [] => Ok(interp.stdout.clone()),
        [Value::OutputPort(p)] => Ok(p.clone()),
        [other] => Err(EvalError::type_mismatch(name, "output-port", other.type_name(), 0)),
        _ => Err(EvalError::arity(name, "0 or 1", args.len())),
    }
}

fn path_arg(args: &[Value], name: &'static str) -> Result<String, EvalError> {
    match args {
        [Value::Str(s)] => Ok(s.to_string()),
        [other] => Err(EvalError::type_mismatch(name, "string", other.type_name(), 0)),
        _ => Err(EvalError::arity(name, "1", args.len())),
    }
}

fn open_input_port(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    let path = path_arg(args, "open-input-port")?;
    let file = File::open(&path).map_err(|e| PortError::OpenFailed {
        path,
        source: e.to_string(),
    })?;
    Ok(Value::InputPort(InputPort::new(Box::new(file))))
}

fn close_input_port(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::InputPort(p)] => {
            p.close()?;
            Ok(Value::Symbol(_i.intern("ok")))
        }
        [other] => Err(EvalError::type_mismatch("close-input-port", "input-port", other.type_name(), 0)),
        _ => Err(EvalError::arity("close-input-port", "1", args.len())),
    }
}

fn read(interp: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    let port = input_port_arg(interp, args, "read")?;
    let mut reader = Reader::new(PortReader(port));
    match reader.read(interp)? {
        Some(v) => Ok(v),
        None => Ok(Value::Eof),
    }
}

fn read_char(interp: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    let port = input_port_arg(interp, args, "read-char")?;
    match port.read_byte()? {
        Some(b) => Ok(Value::Character(b)),
        None => Ok(Value::Eof),
    }
}

fn peek_char(interp: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    let port = input_port_arg(interp, args, "peek-char")?;
    match port.peek_byte()? {
        Some(b) => Ok(Value::Character(b)),
        None => Ok(Value::Eof),
    }
}

fn open_output_port(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    let path = path_arg(args, "open-output-port")?;
    let file = File::create(&path).map_err(|e| PortError::OpenFailed {
        path,
        source: e.to_string(),
    })?;
    Ok(Value::OutputPort(OutputPort::new(Box::new(file))))
}

fn close_output_port(_i: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::OutputPort(p)] => {
            p.close()?;
            Ok(Value::Symbol(_i.intern("ok")))
        }
        [other] => Err(EvalError::type_mismatch("close-output-port", "output-port", other.type_name(), 0)),
        _ => Err(EvalError::arity("close-output-port", "1", args.len())),
    }
}

fn write_char(interp: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    let (ch, rest) = match args {
        [Value::Character(c), rest @ ..] => (*c, rest),
        [other, ..] => return Err(EvalError::type_mismatch("write-char", "character", other.type_name(), 0)),
        [] => return Err(EvalError::arity("write-char", "at least 1", 0)),
    };
    let port = output_port_arg(interp, rest, "write-char")?;
    port.write_bytes(&[ch])?;
    Ok(Value::Symbol(interp.intern("ok")))
}

fn write(interp: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    let (value, rest) = match args {
        [value, rest @ ..] => (value, rest),
        [] => return Err(EvalError::arity("write", "at least 1", 0)),
    };
    let port = output_port_arg(interp, rest, "write")?;
    let mut buf = Vec::new();
    write_value(value, &mut buf).map_err(|e| PortError::Io(e.to_string()))?;
    port.write_bytes(&buf)?;
    Ok(Value::Symbol(interp.intern("ok")))
}

/// Evaluates every top-level form in `path`, returning the value of the
/// last one (or the `ok` symbol if the file held none).
fn load(interp: &mut Interpreter, args: &[Value]) -> Result<Value, EvalError> {
    let path = path_arg(args, "load")?;
    let file = File::open(&path).map_err(|e| PortError::OpenFailed {
        path,
        source: e.to_string(),
    })?;
    let mut reader = Reader::new(file);
    let mut result = Value::Symbol(interp.intern("ok"));
    while let Some(expr) = reader.read(interp)? {
        result = interp.eval(expr, interp.global_env.clone())?;
    }
    Ok(result)
}

/// Adapts an `InputPort` to `std::io::Read` so `Reader` can stream directly
/// from a port's pushback-aware byte source.
struct PortReader(InputPort);

impl std::io::Read for PortReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.0.read_byte() {
            Ok(Some(b)) => {
                buf[0] = b;
                Ok(1)
            }
            Ok(None) => Ok(0),
            Err(e) => Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())),
        }
    }
}

pub fn register(interp: &Interpreter, env: &Rc<Environment>) {
    interp.define_primitive(env, "load", load);
    interp.define_primitive(env, "open-input-port", open_input_port);
    interp.define_primitive(env, "close-input-port", close_input_port);
    interp.define_primitive(env, "read", read);
    interp.define_primitive(env, "read-char", read_char);
    interp.define_primitive(env, "peek-char", peek_char);
    interp.define_primitive(env, "open-output-port", open_output_port);
    interp.define_primitive(env, "close-output-port", close_output_port);
    interp.define_primitive(env, "write-char", write_char);
    interp.define_primitive(env, "write", write);
}
