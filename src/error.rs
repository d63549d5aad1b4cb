//! Centralised error hierarchy for the **minipy interpreter**.
//!
//! All subsystems (scanner, parser, runtime, CLI) convert their failure modes
//! into one of the variants defined here. This enables a uniform `Result<T>`
//! alias throughout the crate and ergonomic inter-operation with `anyhow`,
//! while preserving the source line of every diagnostic.
//!
//! The module does **not** print diagnostics itself.

use std::io;
use thiserror::Error;

use log::info;

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MinipyError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human-readable description.
        message: String,

        /// 1-based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.
    #[error("[line {line}] Error: {message}")]
    Parse { message: String, line: usize },

    /// Runtime evaluation failure. Type errors and unresolved names share
    /// this variant; the first one aborts the remaining program.
    #[error("[line {line}] Runtime error: {message}")]
    Runtime { message: String, line: usize },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl MinipyError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        MinipyError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", line, message);

        MinipyError::Parse { message, line }
    }

    /// Helper constructor for the **evaluator**.
    pub fn runtime<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Runtime error: line={}, msg={}", line, message);

        MinipyError::Runtime { message, line }
    }

    /// The source line this error refers to, if it carries one.
    pub fn line(&self) -> Option<usize> {
        match self {
            MinipyError::Lex { line, .. }
            | MinipyError::Parse { line, .. }
            | MinipyError::Runtime { line, .. } => Some(*line),
            MinipyError::Io(_) => None,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MinipyError>;
