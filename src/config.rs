// ABOUTME: Fixed strings and version info shared by the REPL and CLI

pub const VERSION: &str = "1.0.0";
pub const BANNER: &str = "Welcome to Bootstrap Scheme. Use ctrl-c to exit.";
pub const PROMPT: &str = "> ";
pub const GOODBYE: &str = "Goodbye";
