// ABOUTME: Prints values in a form the reader can read back

use std::fmt;
use std::io::{self, Write};

use crate::value::Value;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::EmptyList => write!(f, "()"),
            Value::Boolean(b) => write!(f, "{}", if *b { "#t" } else { "#f" }),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::Fixnum(n) => write!(f, "{}", n),
            Value::Character(c) => match c {
                b'\n' => write!(f, "#\\newline"),
                b' ' => write!(f, "#\\space"),
                c => write!(f, "#\\{}", *c as char),
            },
            Value::Str(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '\n' => write!(f, "\\n")?,
                        '\\' => write!(f, "\\\\")?,
                        '"' => write!(f, "\\\"")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                write!(f, "\"")
            }
            Value::Pair(_) => {
                write!(f, "(")?;
                write_pair(f, self)?;
                write!(f, ")")
            }
            Value::PrimitiveProc(_) => write!(f, "#<primitive-procedure>"),
            Value::CompoundProc(_) => write!(f, "#<compound-procedure>"),
            Value::InputPort(_) => write!(f, "#<input-port>"),
            Value::OutputPort(_) => write!(f, "#<output-port>"),
            Value::Eof => write!(f, "#<eof>"),
            Value::Environment(_) => write!(f, "#<environment>"),
        }
    }
}

fn write_pair(f: &mut fmt::Formatter<'_>, pair: &Value) -> fmt::Result {
    let car = pair.car().expect("write_pair called on a non-pair");
    let cdr = pair.cdr().expect("write_pair called on a non-pair");
    write!(f, "{}", car)?;
    match cdr {
        Value::Pair(_) => {
            write!(f, " ")?;
            write_pair(f, &cdr)
        }
        Value::EmptyList => Ok(()),
        other => write!(f, " . {}", other),
    }
}

/// Entry point shared by the `write`/`write-char` primitives so stdout and
/// ports render through one code path.
pub fn write_value(value: &Value, out: &mut dyn Write) -> io::Result<()> {
    write!(out, "{}", value)
}
