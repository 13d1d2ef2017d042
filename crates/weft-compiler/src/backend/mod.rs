//! Capability traits the rule compiler emits against.
//!
//! The compiler drives exactly one token source (a regex lexer, or a feeder
//! of externally-produced terms) and one pattern matcher. Storage, automaton
//! construction, and matching live behind these traits; the compiler only
//! issues registration calls in parse order.

use std::fmt;

use thiserror::Error;
use weft_core::NameId;

pub mod recording;

pub use recording::{
    FeederCall, LexerCall, MatcherCall, RecordingFeeder, RecordingLexer, RecordingMatcher,
};

/// Failure reported by a backend. Carries the backend's own message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BackendError(String);

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type BackendResult = Result<(), BackendError>;

/// Where a lexeme match binds its ordinal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionBind {
    /// At the matched content itself.
    #[default]
    Content,
    /// At the position of the successor token.
    Succ,
    /// At the position of the predecessor token.
    Pred,
}

/// The join combinators of the rule language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinOperation {
    Sequence,
    SequenceImm,
    SequenceStruct,
    Within,
    WithinStruct,
    Any,
    And,
}

impl JoinOperation {
    /// Keyword spellings, ordered to match `from_index`.
    pub(crate) const KEYWORDS: [&'static str; 7] = [
        "sequence",
        "sequence_imm",
        "sequence_struct",
        "within",
        "within_struct",
        "any",
        "and",
    ];

    pub(crate) fn from_keyword(ident: &str) -> Option<Self> {
        Self::KEYWORDS
            .iter()
            .position(|kw| kw.eq_ignore_ascii_case(ident))
            .map(Self::from_index)
    }

    pub(crate) fn from_index(idx: usize) -> Self {
        match idx {
            0 => JoinOperation::Sequence,
            1 => JoinOperation::SequenceImm,
            2 => JoinOperation::SequenceStruct,
            3 => JoinOperation::Within,
            4 => JoinOperation::WithinStruct,
            5 => JoinOperation::Any,
            6 => JoinOperation::And,
            _ => unreachable!("join operation index out of range"),
        }
    }

    pub fn name(self) -> &'static str {
        Self::KEYWORDS[self as usize]
    }

    /// Operand 0 is a structural delimiter, excluded from range accumulation.
    pub fn is_struct(self) -> bool {
        matches!(
            self,
            JoinOperation::SequenceStruct | JoinOperation::WithinStruct
        )
    }

    /// Choice-style joins: ranges spread (min of mins, max of maxes)
    /// instead of summing.
    pub fn is_choice(self) -> bool {
        matches!(self, JoinOperation::Any | JoinOperation::And)
    }
}

impl fmt::Display for JoinOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A regex-driven scanner engine.
pub trait LexerBackend {
    /// Register a lexeme-type name. Called once per name, on its first
    /// definition.
    fn define_lexem_name(&mut self, id: NameId, name: &str) -> BackendResult;

    /// Register one regex alternative for a lexeme type.
    fn define_lexem(
        &mut self,
        id: NameId,
        regex: &str,
        result_index: u32,
        level: u32,
        edit_distance: u32,
        bind: PositionBind,
    ) -> BackendResult;

    /// Register a literal symbol scoped to a lexeme type.
    fn define_symbol(&mut self, symbol_id: u32, lexem_id: NameId, text: &str) -> BackendResult;

    /// Set a named scanner option.
    fn define_option(&mut self, name: &str, value: f64) -> BackendResult;

    /// Finalize; after this no further definitions arrive.
    fn compile(&mut self) -> BackendResult;
}

/// A source of externally-produced terms (no regexes involved).
pub trait FeederBackend {
    /// Declare an externally-produced term type as an input lexeme.
    fn define_lexem(&mut self, id: NameId, name: &str) -> BackendResult;

    /// Register a literal symbol scoped to a term type.
    fn define_symbol(&mut self, symbol_id: u32, lexem_id: NameId, text: &str) -> BackendResult;
}

/// A structural pattern-matching engine. Expressions arrive bottom-up as a
/// push stream: terminals and sub-expressions first, then the join node
/// consuming them.
pub trait MatcherBackend {
    /// Declare a named pattern over the pushed expression. Called once per
    /// rule alternative.
    fn define_pattern(&mut self, name: &str, visible: bool) -> BackendResult;

    /// Push a terminal reference (lexeme-type id or symbol id).
    fn push_term(&mut self, id: u32) -> BackendResult;

    /// Push a reference to a named pattern.
    fn push_pattern(&mut self, name: &str) -> BackendResult;

    /// Push a join node over the last `argc` pushed operands.
    fn push_expression(
        &mut self,
        op: JoinOperation,
        argc: usize,
        range: u32,
        cardinality: u32,
    ) -> BackendResult;

    /// Attach a variable name to the most recently pushed node.
    fn attach_variable(&mut self, name: &str) -> BackendResult;

    /// Set a named numeric matcher option.
    fn define_option(&mut self, name: &str, value: f64) -> BackendResult;

    /// Finalize; after this no further definitions arrive.
    fn compile(&mut self) -> BackendResult;
}
