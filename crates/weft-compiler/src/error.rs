//! Error types for rule compilation.
//!
//! Recursive-descent routines return `Result` and propagate with `?`; the
//! `load()`/`compile()` boundary converts any error into a diagnostic plus a
//! boolean failure. Nothing escapes those two entry points.

use thiserror::Error;

use crate::backend::BackendError;
use crate::scan::ScanError;

/// Coarse classification used in reported messages: grammar violations
/// versus rule-level constraint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Syntax,
    Semantic,
}

impl ErrorClass {
    pub fn label(self) -> &'static str {
        match self {
            ErrorClass::Syntax => "syntax error",
            ErrorClass::Semantic => "semantic error",
        }
    }
}

/// Any failure raised while parsing or emitting rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("expected {0}")]
    Expected(&'static str),

    #[error("unknown join operation '{0}'")]
    UnknownJoinOperation(String),

    #[error("'.' visibility marker is not allowed before a lexeme declaration")]
    InvisibleLexeme,

    #[error("match level '^' is only allowed on lexeme declarations")]
    LevelOnPattern,

    #[error("position binding declared as both predecessor and successor")]
    ConflictingPositionBind,

    #[error("%{0} options require a {1} backend, but none was configured")]
    MissingBackend(&'static str, &'static str),

    #[error("lexeme '{0}' declares a regex, but no lexer backend was configured")]
    LexemeWithoutLexer(String),

    #[error("undefined lexeme or term type '{0}'")]
    UndefinedType(String),

    #[error("proximity range {given} is smaller than the minimum span {min} of the expression")]
    RangeTooSmall { given: u32, min: u32 },

    #[error("proximity range of the expression is zero")]
    ZeroRange,

    #[error("too many distinct lexeme and pattern names")]
    TooManyNames,
}

impl CompileError {
    /// Classify for message composition at the load/compile boundary.
    pub fn class(&self) -> ErrorClass {
        match self {
            CompileError::Scan(ScanError::DuplicateKeyword(_))
            | CompileError::Scan(ScanError::KeywordCapacity(_)) => ErrorClass::Semantic,
            CompileError::Scan(_)
            | CompileError::Expected(_)
            | CompileError::UnknownJoinOperation(_) => ErrorClass::Syntax,
            _ => ErrorClass::Semantic,
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, CompileError>;
