//! Shared compilation pipeline for check and dump.
//!
//! Drives one compiler instance with recording backends over all source
//! fragments, keeping track of which fragment each diagnostic came from.

use weft_compiler::backend::{RecordingLexer, RecordingMatcher};
use weft_compiler::{Diagnostics, RuleCompiler, TokenSource};

use super::source_loader::RuleSource;

pub struct PipelineOutcome {
    pub lexer: RecordingLexer,
    pub matcher: RecordingMatcher,
    pub diagnostics: Diagnostics,
    pub ok: bool,
    /// Source name for each diagnostic, by index. `None` marks entries
    /// produced at compile time rather than while loading a fragment.
    pub origins: Vec<Option<String>>,
}

/// Load every fragment in order, then finalize. Load failures do not stop
/// later fragments from being parsed; `compile()` refuses on its own when
/// any of them failed.
pub fn compile_sources(sources: &[RuleSource]) -> PipelineOutcome {
    let mut lexer = RecordingLexer::default();
    let mut matcher = RecordingMatcher::default();
    let mut diagnostics = Diagnostics::new();
    let mut origins = Vec::new();

    let ok = {
        let mut compiler = RuleCompiler::new(
            TokenSource::Lexer(&mut lexer),
            &mut matcher,
            &mut diagnostics,
        );
        let mut ok = true;
        for source in sources {
            if !compiler.load(&source.text) {
                ok = false;
            }
            while origins.len() < compiler.diagnostics().len() {
                origins.push(Some(source.name.clone()));
            }
        }
        ok & compiler.compile()
    };
    while origins.len() < diagnostics.len() {
        origins.push(None);
    }

    PipelineOutcome {
        lexer,
        matcher,
        diagnostics,
        ok,
        origins,
    }
}
