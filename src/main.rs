use std::io::Cursor;
use std::path::PathBuf;
use std::process::ExitCode;

use bootstrap_scheme::config;
use bootstrap_scheme::error::{InterpreterError, ReadError};
use bootstrap_scheme::interpreter::Interpreter;
use bootstrap_scheme::reader::Reader;
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// A tree-walking Scheme-flavored Lisp interpreter.
#[derive(Parser, Debug)]
#[command(name = "bootstrap-scheme")]
#[command(version = config::VERSION)]
#[command(about = "A tree-walking Scheme-flavored Lisp interpreter")]
struct CliArgs {
    /// Script file to run. Starts an interactive REPL if omitted.
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Suppress the startup banner in REPL mode.
    #[arg(long = "no-banner")]
    no_banner: bool,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let mut interp = Interpreter::new();

    let result = match args.script {
        Some(path) => run_script(&mut interp, &path),
        None => run_repl(&mut interp, args.no_banner),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_script(interp: &mut Interpreter, path: &PathBuf) -> Result<(), InterpreterError> {
    let file = std::fs::File::open(path)
        .map_err(|e| InterpreterError::User(format!("cannot read {}: {}", path.display(), e)))?;
    let mut reader = Reader::new(file);
    while let Some(expr) = reader.read(interp)? {
        interp.eval(expr, interp.global_env.clone())?;
    }
    Ok(())
}

fn run_repl(interp: &mut Interpreter, no_banner: bool) -> Result<(), InterpreterError> {
    if !no_banner {
        println!("{}", config::BANNER);
    }

    let mut rl = DefaultEditor::new()
        .map_err(|e| InterpreterError::User(format!("could not start the line editor: {}", e)))?;
    let mut pending = String::new();

    loop {
        let prompt = if pending.is_empty() { config::PROMPT } else { "" };
        match rl.readline(prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                pending.push_str(&line);
                pending.push('\n');
                drain_and_eval(interp, &mut pending);
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}", e);
                break;
            }
        }
    }

    println!("{}", config::GOODBYE);
    Ok(())
}

/// Evaluates every complete expression currently buffered in `pending`,
/// leaving a trailing partial expression (if any) for the next line. A
/// partial expression at end of input is not an error; a read/eval error
/// prints and discards the buffered line instead of crashing the session.
fn drain_and_eval(interp: &mut Interpreter, pending: &mut String) {
    loop {
        let mut cursor = Cursor::new(pending.as_bytes().to_vec());
        let mut reader = Reader::new(&mut cursor);
        match reader.read(interp) {
            Ok(Some(expr)) => {
                let consumed = cursor.position() as usize;
                pending.drain(..consumed);
                match interp.eval(expr, interp.global_env.clone()) {
                    Ok(value) => println!("{}", value),
                    Err(e) => eprintln!("{}", e),
                }
            }
            Ok(None) => {
                pending.clear();
                return;
            }
            Err(ReadError::UnexpectedEof) => return,
            Err(e) => {
                eprintln!("{}", e);
                pending.clear();
                return;
            }
        }
    }
}
