//! Test helpers for driving the compiler against recording backends.

use crate::backend::{RecordingFeeder, RecordingLexer, RecordingMatcher};
use crate::compiler::{RuleCompiler, TokenSource};
use crate::diagnostics::Diagnostics;

/// Outcome of compiling one source fragment with a lexer-bound compiler.
pub struct LexerRun {
    pub lexer: RecordingLexer,
    pub matcher: RecordingMatcher,
    pub diagnostics: Diagnostics,
    pub loaded: bool,
    pub compiled: bool,
}

/// Load one fragment with (lexer, matcher) backends; `compile()` runs only
/// when the load succeeded.
pub fn run_with_lexer(source: &str) -> LexerRun {
    let mut lexer = RecordingLexer::default();
    let mut matcher = RecordingMatcher::default();
    let mut diagnostics = Diagnostics::new();
    let (loaded, compiled) = {
        let mut compiler = RuleCompiler::new(
            TokenSource::Lexer(&mut lexer),
            &mut matcher,
            &mut diagnostics,
        );
        let loaded = compiler.load(source);
        let compiled = loaded && compiler.compile();
        (loaded, compiled)
    };
    LexerRun {
        lexer,
        matcher,
        diagnostics,
        loaded,
        compiled,
    }
}

/// Outcome of compiling one source fragment with a feeder-bound compiler.
pub struct FeederRun {
    pub feeder: RecordingFeeder,
    pub matcher: RecordingMatcher,
    pub diagnostics: Diagnostics,
    pub loaded: bool,
    pub compiled: bool,
}

/// Load one fragment with (feeder, matcher) backends; `compile()` runs only
/// when the load succeeded.
pub fn run_with_feeder(source: &str) -> FeederRun {
    let mut feeder = RecordingFeeder::default();
    let mut matcher = RecordingMatcher::default();
    let mut diagnostics = Diagnostics::new();
    let (loaded, compiled) = {
        let mut compiler = RuleCompiler::new(
            TokenSource::Feeder(&mut feeder),
            &mut matcher,
            &mut diagnostics,
        );
        let loaded = compiler.load(source);
        let compiled = loaded && compiler.compile();
        (loaded, compiled)
    };
    FeederRun {
        feeder,
        matcher,
        diagnostics,
        loaded,
        compiled,
    }
}
