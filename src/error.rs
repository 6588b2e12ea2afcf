// ABOUTME: Error taxonomy for the reader, evaluator, and port primitives

use thiserror::Error;

/// Errors raised while turning a byte stream into a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("non-terminated string literal")]
    UnterminatedString,
    #[error("string literal exceeds maximum length")]
    StringTooLong,
    #[error("character literal not followed by delimiter")]
    CharLiteralNotDelimited,
    #[error("number not followed by delimiter")]
    NumberNotDelimited,
    #[error("symbol not followed by delimiter")]
    SymbolNotDelimited,
    #[error("symbol exceeds maximum length")]
    SymbolTooLong,
    #[error("missing trailing right paren")]
    UnclosedList,
    #[error("dot not followed by delimiter")]
    MisplacedDot,
    #[error("unexpected end of input")]
    UnexpectedEof,
}

/// Errors raised while evaluating an expression.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("unbound variable: {0}")]
    UnboundVariable(String),
    #[error("unknown expression type")]
    UnknownExpressionType,
    #[error("unknown procedure type")]
    UnknownProcedureType,
    #[error("else clause isn't last in cond")]
    ElseNotLast,
    #[error("{function}: expected {expected} argument{}, got {actual}", if expected == "1" { "" } else { "s" })]
    ArityMismatch {
        function: String,
        expected: String,
        actual: usize,
    },
    #[error("{function}: expected {expected}, got {actual} (argument {position})")]
    TypeMismatch {
        function: &'static str,
        expected: &'static str,
        actual: &'static str,
        position: usize,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("apply: final argument must be a proper list")]
    ImproperArgumentList,
    #[error(transparent)]
    Port(#[from] PortError),
    #[error("{0}")]
    User(String),
}

impl EvalError {
    pub fn arity(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        EvalError::ArityMismatch {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    pub fn type_mismatch(
        function: &'static str,
        expected: &'static str,
        actual: &'static str,
        position: usize,
    ) -> Self {
        EvalError::TypeMismatch {
            function,
            expected,
            actual,
            position,
        }
    }
}

/// Errors raised by port operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PortError {
    #[error("could not open {path}: {source}")]
    OpenFailed { path: String, source: String },
    #[error("port already closed")]
    AlreadyClosed,
    #[error("port is closed")]
    Closed,
    #[error("i/o error: {0}")]
    Io(String),
}

/// The single error type threaded through every public entry point.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InterpreterError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Port(#[from] PortError),
    #[error("{0}")]
    User(String),
}
