//! Recording backends that capture every call for inspection.
//!
//! Used by the CLI `dump` command and the test suite. Each call becomes a
//! serializable event; the `Display` impls render one call per line in
//! arrival order.

use std::fmt;

use weft_core::NameId;

use super::{
    BackendResult, FeederBackend, JoinOperation, LexerBackend, MatcherBackend, PositionBind,
};

/// One recorded lexer-backend call.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum LexerCall {
    DefineLexemName {
        id: u32,
        name: String,
    },
    DefineLexem {
        id: u32,
        regex: String,
        result_index: u32,
        level: u32,
        edit_distance: u32,
        bind: PositionBind,
    },
    DefineSymbol {
        symbol_id: u32,
        lexem_id: u32,
        text: String,
    },
    DefineOption {
        name: String,
        value: f64,
    },
    Compile,
}

impl fmt::Display for LexerCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexerCall::DefineLexemName { id, name } => write!(f, "lexem_name {id} {name}"),
            LexerCall::DefineLexem {
                id,
                regex,
                result_index,
                level,
                edit_distance,
                bind,
            } => write!(
                f,
                "lexem {id} /{regex}/ index={result_index} level={level} edit={edit_distance} bind={bind:?}"
            ),
            LexerCall::DefineSymbol {
                symbol_id,
                lexem_id,
                text,
            } => write!(f, "symbol {symbol_id} type={lexem_id} \"{text}\""),
            LexerCall::DefineOption { name, value } => write!(f, "option {name}={value}"),
            LexerCall::Compile => write!(f, "compile"),
        }
    }
}

/// One recorded feeder-backend call.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum FeederCall {
    DefineLexem {
        id: u32,
        name: String,
    },
    DefineSymbol {
        symbol_id: u32,
        lexem_id: u32,
        text: String,
    },
}

impl fmt::Display for FeederCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeederCall::DefineLexem { id, name } => write!(f, "lexem {id} {name}"),
            FeederCall::DefineSymbol {
                symbol_id,
                lexem_id,
                text,
            } => write!(f, "symbol {symbol_id} type={lexem_id} \"{text}\""),
        }
    }
}

/// One recorded matcher-backend call.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum MatcherCall {
    DefinePattern {
        name: String,
        visible: bool,
    },
    PushTerm {
        id: u32,
    },
    PushPattern {
        name: String,
    },
    PushExpression {
        op: JoinOperation,
        argc: usize,
        range: u32,
        cardinality: u32,
    },
    AttachVariable {
        name: String,
    },
    DefineOption {
        name: String,
        value: f64,
    },
    Compile,
}

impl fmt::Display for MatcherCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatcherCall::DefinePattern { name, visible } => {
                let vis = if *visible { "visible" } else { "invisible" };
                write!(f, "pattern {name} {vis}")
            }
            MatcherCall::PushTerm { id } => write!(f, "term {id}"),
            MatcherCall::PushPattern { name } => write!(f, "ref {name}"),
            MatcherCall::PushExpression {
                op,
                argc,
                range,
                cardinality,
            } => write!(f, "join {op} argc={argc} range={range} cardinality={cardinality}"),
            MatcherCall::AttachVariable { name } => write!(f, "var {name}"),
            MatcherCall::DefineOption { name, value } => write!(f, "option {name}={value}"),
            MatcherCall::Compile => write!(f, "compile"),
        }
    }
}

/// Lexer backend that records calls and always succeeds.
#[derive(Debug, Clone, Default)]
pub struct RecordingLexer {
    pub calls: Vec<LexerCall>,
}

impl LexerBackend for RecordingLexer {
    fn define_lexem_name(&mut self, id: NameId, name: &str) -> BackendResult {
        self.calls.push(LexerCall::DefineLexemName {
            id: id.as_u32(),
            name: name.to_string(),
        });
        Ok(())
    }

    fn define_lexem(
        &mut self,
        id: NameId,
        regex: &str,
        result_index: u32,
        level: u32,
        edit_distance: u32,
        bind: PositionBind,
    ) -> BackendResult {
        self.calls.push(LexerCall::DefineLexem {
            id: id.as_u32(),
            regex: regex.to_string(),
            result_index,
            level,
            edit_distance,
            bind,
        });
        Ok(())
    }

    fn define_symbol(&mut self, symbol_id: u32, lexem_id: NameId, text: &str) -> BackendResult {
        self.calls.push(LexerCall::DefineSymbol {
            symbol_id,
            lexem_id: lexem_id.as_u32(),
            text: text.to_string(),
        });
        Ok(())
    }

    fn define_option(&mut self, name: &str, value: f64) -> BackendResult {
        self.calls.push(LexerCall::DefineOption {
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    fn compile(&mut self) -> BackendResult {
        self.calls.push(LexerCall::Compile);
        Ok(())
    }
}

impl fmt::Display for RecordingLexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for call in &self.calls {
            writeln!(f, "{call}")?;
        }
        Ok(())
    }
}

/// Feeder backend that records calls and always succeeds.
#[derive(Debug, Clone, Default)]
pub struct RecordingFeeder {
    pub calls: Vec<FeederCall>,
}

impl FeederBackend for RecordingFeeder {
    fn define_lexem(&mut self, id: NameId, name: &str) -> BackendResult {
        self.calls.push(FeederCall::DefineLexem {
            id: id.as_u32(),
            name: name.to_string(),
        });
        Ok(())
    }

    fn define_symbol(&mut self, symbol_id: u32, lexem_id: NameId, text: &str) -> BackendResult {
        self.calls.push(FeederCall::DefineSymbol {
            symbol_id,
            lexem_id: lexem_id.as_u32(),
            text: text.to_string(),
        });
        Ok(())
    }
}

impl fmt::Display for RecordingFeeder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for call in &self.calls {
            writeln!(f, "{call}")?;
        }
        Ok(())
    }
}

/// Matcher backend that records calls and always succeeds.
#[derive(Debug, Clone, Default)]
pub struct RecordingMatcher {
    pub calls: Vec<MatcherCall>,
}

impl MatcherBackend for RecordingMatcher {
    fn define_pattern(&mut self, name: &str, visible: bool) -> BackendResult {
        self.calls.push(MatcherCall::DefinePattern {
            name: name.to_string(),
            visible,
        });
        Ok(())
    }

    fn push_term(&mut self, id: u32) -> BackendResult {
        self.calls.push(MatcherCall::PushTerm { id });
        Ok(())
    }

    fn push_pattern(&mut self, name: &str) -> BackendResult {
        self.calls.push(MatcherCall::PushPattern {
            name: name.to_string(),
        });
        Ok(())
    }

    fn push_expression(
        &mut self,
        op: JoinOperation,
        argc: usize,
        range: u32,
        cardinality: u32,
    ) -> BackendResult {
        self.calls.push(MatcherCall::PushExpression {
            op,
            argc,
            range,
            cardinality,
        });
        Ok(())
    }

    fn attach_variable(&mut self, name: &str) -> BackendResult {
        self.calls.push(MatcherCall::AttachVariable {
            name: name.to_string(),
        });
        Ok(())
    }

    fn define_option(&mut self, name: &str, value: f64) -> BackendResult {
        self.calls.push(MatcherCall::DefineOption {
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    fn compile(&mut self) -> BackendResult {
        self.calls.push(MatcherCall::Compile);
        Ok(())
    }
}

impl fmt::Display for RecordingMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for call in &self.calls {
            writeln!(f, "{call}")?;
        }
        Ok(())
    }
}
