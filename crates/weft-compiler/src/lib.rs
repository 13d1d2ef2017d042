//! Weft rule compiler: turns pattern-rule sources into backend calls.
//!
//! This crate provides the compilation pipeline for Weft rule files:
//! - `scan` - cursor-based scanning helpers (identifiers, strings, regexes,
//!   numbers, keyword lists)
//! - `backend` - the capability traits the compiler emits against (lexer,
//!   feeder, matcher) plus recording implementations
//! - `compiler` - the recursive-descent rule compiler
//! - `diagnostics` - error and warning collection
//!
//! The compiler never executes patterns; it drives the abstract backends,
//! which own storage and matching.

pub mod backend;
pub mod compiler;
pub mod diagnostics;
mod error;
pub mod scan;

#[cfg(test)]
mod diagnostics_tests;
#[cfg(test)]
pub mod test_utils;

pub use compiler::{Range, RuleCompiler, TokenSource};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{CompileError, ErrorClass};
