//! Diagnostic reporting for Victoria.
//!
//! A [`Diagnostic`] is a structured record (kind, code, message, labels,
//! notes, help). The [`catalog`] module holds one constructor per error code;
//! each attaches the context-specific notes and help for its situation.
//! Rendering lives in [`render`] and is the only place output varies between
//! runs (the optional joke line).
//!
//! # Error codes
//!
//! - **E0001-E0021**: runtime and operator errors
//! - **E0030-E0038**: type-annotation errors
//! - **E0040-E0050**: data-structure and algorithm errors
//! - **E0100-E0104**: lexer and parser errors
//! - **W0001-W0005**: warnings
//! - **N0001**: notes

#![forbid(unsafe_code)]
#![deny(unused_must_use)]

pub mod catalog;
mod code;
mod diagnostic;
pub mod render;
mod suggestions;

pub use code::ErrorCode;
pub use diagnostic::{Diagnostic, DiagnosticKind, Label};
pub use render::{JokePolicy, Renderer};
pub use suggestions::suggestion_for;
