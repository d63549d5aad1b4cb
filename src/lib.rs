//! minipy — a tree-walking interpreter for a small indentation-delimited,
//! Python-flavored scripting language.
//!
//! Pipeline: [`scanner::Scanner`] → token stream → [`parser::Parser`] →
//! top-level statement list → [`interpreter::Interpreter`].  The sole
//! runtime representation is text ([`value::Value`]); indentation tokens
//! are the only block delimiter.

pub mod ast;
pub mod environment;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;

use std::io::Write;

use log::debug;

use crate::error::{MinipyError, Result};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::scanner::Scanner;
use crate::token::Token;

/// Execute `source` as a program, writing `print` output to `out` and
/// diagnostics to stderr.
///
/// Scan errors are reported and the offending bytes skipped, so the whole
/// file is still scanned and parsed for further diagnostics.  If scanning
/// or parsing produced errors they are all reported and the program is not
/// executed; the first such error is returned.  The first runtime failure
/// is returned after whatever output precedes it has been written.
pub fn run_source<W: Write>(source: &[u8], out: &mut W) -> Result<()> {
    let mut tokens: Vec<Token<'_>> = Vec::new();
    let mut scan_errors: Vec<MinipyError> = Vec::new();

    for item in Scanner::new(source) {
        match item {
            Ok(token) => tokens.push(token),

            Err(e) => {
                eprintln!("{}", e);

                scan_errors.push(e);
            }
        }
    }

    let mut parser = Parser::new(&tokens);
    let (statements, errors) = parser.parse();

    for e in &errors {
        eprintln!("{}", e);
    }

    if let Some(first) = scan_errors.into_iter().chain(errors).next() {
        debug!("Skipping execution after scan/parse errors");

        return Err(first);
    }

    let mut interpreter = Interpreter::new(out);

    interpreter.interpret(&statements)
}
