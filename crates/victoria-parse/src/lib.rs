#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

mod lexer;
mod parser;
mod token;

pub use lexer::Lexer;
pub use parser::{precedence_of, Parser, Precedence};
pub use token::{Token, TokenKind};

use victoria_ast::ast::Program;
use victoria_diagnostics::Diagnostic;

/// A program that did not parse. Carries every error found in the pass, as
/// text and as diagnostics, in source order.
#[derive(Debug, thiserror::Error)]
#[error("{count} parse error(s); first: {first}", count = .errors.len(), first = first_error(.errors))]
pub struct ParseFailure {
    pub errors: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

fn first_error(errors: &[String]) -> &str {
    errors.first().map(String::as_str).unwrap_or("")
}

pub fn parse_str(file: &str, src: &str) -> Result<Program, ParseFailure> {
    let mut parser = Parser::new(file, src);
    let program = parser.parse_program();
    tracing::debug!(
        file,
        statements = program.statements.len(),
        errors = parser.errors().len(),
        "parsed program"
    );
    let (errors, diagnostics) = parser.into_diagnostics();
    if errors.is_empty() {
        Ok(program)
    } else {
        Err(ParseFailure {
            errors,
            diagnostics,
        })
    }
}
