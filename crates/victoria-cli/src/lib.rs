//! The Victoria interpreter: runtime values, environments, the evaluator and
//! the built-in library. The `victoria` binary is a thin driver over
//! [`Interpreter::run_source`].

#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

mod analysis;
pub mod builtins;
pub mod config;
pub mod environment;
pub mod eval;
pub mod modules;
pub mod object;
pub mod typecheck;

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use victoria_diagnostics::Diagnostic;
use victoria_parse::ParseFailure;

pub use config::InterpreterConfig;
pub use eval::{ControlFlow, EvalResult, Interpreter, RuntimeError};
pub use object::Object;

/// Why a run stopped before producing a value.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Parse(#[from] ParseFailure),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl RunError {
    /// The diagnostics to report, in source order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            RunError::Parse(failure) => failure.diagnostics.clone(),
            RunError::Runtime(err) => vec![err.diagnostic.clone()],
        }
    }
}

/// In-memory output sink. Clones share the buffer, so a test can hand one
/// clone to the interpreter and read the other.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput(Rc<RefCell<Vec<u8>>>);

impl CapturedOutput {
    /// Everything written so far, decoded lossily.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
