//! The rule compiler.
//!
//! Consumes scanner tokens from a `Cursor`, drives three interning tables
//! (lexeme-type names, pattern names, literal symbols), and emits backend
//! calls incrementally while parsing. `load()` may be called repeatedly to
//! append source fragments into the same tables; `compile()` finalizes.
//!
//! # Module organization
//!
//! - `mod.rs` - compiler state, `load`/`compile`, option blocks, lexeme rules
//! - `expressions` - pattern rules, join expressions, range inference

mod expressions;

#[cfg(test)]
mod expressions_tests;

use indexmap::{IndexMap, IndexSet};
use weft_core::{MAX_PATTERN_TERM_NAME_ID, NameId, NameTable, symbol_id, symbol_key};

use crate::backend::{FeederBackend, LexerBackend, MatcherBackend, PositionBind};
use crate::diagnostics::Diagnostics;
use crate::error::{CompileError, Result};
use crate::scan::{Cursor, KeywordMask};

/// How many unresolved pattern names are reported individually at
/// `compile()` time.
const MAX_UNRESOLVED_REPORTED: usize = 10;

/// Span of ordinal token positions an expression can cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub min: u32,
    pub max: u32,
}

impl Range {
    /// Bootstrap range of a referenced-but-undefined pattern.
    pub(crate) const ZERO: Range = Range { min: 0, max: 0 };
    /// Range of a single terminal.
    pub(crate) const TERMINAL: Range = Range { min: 1, max: 1 };

    /// Sequential accumulation: spans add up.
    pub(crate) fn sum(self, other: Range) -> Range {
        Range {
            min: self.min.saturating_add(other.min),
            max: self.max.saturating_add(other.max),
        }
    }

    /// Choice accumulation: the widest alternative wins on both ends.
    pub(crate) fn spread(self, other: Range) -> Range {
        Range {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Elementwise maximum, used to combine a pattern's alternatives.
    pub(crate) fn merged_max(self, other: Range) -> Range {
        Range {
            min: self.min.max(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// The token source a compiler instance is bound to: either a regex lexer
/// or a feeder of externally-produced terms. There is no "neither" variant;
/// a compiler without a concrete token source cannot be constructed.
pub enum TokenSource<'a> {
    Lexer(&'a mut dyn LexerBackend),
    Feeder(&'a mut dyn FeederBackend),
}

/// Compiles rule sources into calls against one token source and one
/// matcher. All tables are owned by the instance and accumulate across
/// `load()` calls.
pub struct RuleCompiler<'a> {
    source: TokenSource<'a>,
    matcher: &'a mut dyn MatcherBackend,
    diagnostics: &'a mut Diagnostics,
    lexem_names: NameTable,
    pattern_names: NameTable,
    symbols: NameTable,
    /// Per-pattern span, elementwise max over all parsed alternatives.
    pattern_ranges: IndexMap<NameId, Range>,
    /// Patterns whose defining rule has been seen.
    defined_patterns: IndexSet<NameId>,
    /// Folded name -> first-seen spelling of patterns referenced before
    /// (or without) a definition, in reference order.
    unresolved: IndexMap<String, String>,
}

impl<'a> RuleCompiler<'a> {
    pub fn new(
        source: TokenSource<'a>,
        matcher: &'a mut dyn MatcherBackend,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            source,
            matcher,
            diagnostics,
            lexem_names: NameTable::new(),
            pattern_names: NameTable::new(),
            symbols: NameTable::new(),
            pattern_ranges: IndexMap::new(),
            defined_patterns: IndexSet::new(),
            unresolved: IndexMap::new(),
        }
    }

    /// Parse one source fragment, emitting backend calls as rules are
    /// recognized. On error the offending line/column and a short snippet
    /// of the unparsed remainder are reported to the diagnostics collector;
    /// the error never propagates past this boundary.
    pub fn load(&mut self, source: &str) -> bool {
        let mut cur = Cursor::new(source);
        match self.parse_program(&mut cur) {
            Ok(()) => true,
            Err(err) => {
                let (line, column) = cur.line_col(cur.pos());
                let snippet = cur.snippet();
                self.diagnostics.error_at(
                    format!(
                        "failed to load rule source ({} at \"{snippet}\"): {err}",
                        err.class().label()
                    ),
                    line,
                    column,
                );
                false
            }
        }
    }

    /// Finalize the program: warn about unresolved pattern references, then
    /// compile the matcher and, if present, the lexer. Fails immediately if
    /// a previous `load()` already failed.
    pub fn compile(&mut self) -> bool {
        if self.diagnostics.has_errors() {
            self.diagnostics
                .error("cannot compile rule program due to previous errors");
            return false;
        }

        for name in self.unresolved.values().take(MAX_UNRESOLVED_REPORTED) {
            self.diagnostics
                .warning(format!("pattern '{name}' is referenced but never defined"));
        }
        if self.unresolved.len() > MAX_UNRESOLVED_REPORTED {
            self.diagnostics.warning(format!(
                "... and {} more unresolved pattern references",
                self.unresolved.len() - MAX_UNRESOLVED_REPORTED
            ));
        }

        let mut ok = true;
        if let Err(err) = self.matcher.compile() {
            self.diagnostics
                .error(format!("matcher backend failed to compile: {err}"));
            ok = false;
        }
        if let TokenSource::Lexer(lexer) = &mut self.source {
            if let Err(err) = lexer.compile() {
                self.diagnostics
                    .error(format!("lexer backend failed to compile: {err}"));
                ok = false;
            }
        }
        ok
    }

    /// The injected diagnostics collector.
    pub fn diagnostics(&self) -> &Diagnostics {
        self.diagnostics
    }

    /// Interned lexeme-type names.
    pub fn lexem_names(&self) -> &NameTable {
        &self.lexem_names
    }

    /// Interned pattern names.
    pub fn pattern_names(&self) -> &NameTable {
        &self.pattern_names
    }

    /// Stored span of a named pattern, if any alternative has been parsed.
    pub fn pattern_range(&self, name: &str) -> Option<Range> {
        let id = self.pattern_names.get(name);
        self.pattern_ranges.get(&id).copied()
    }

    /// Pattern names referenced but not (yet) defined, in reference order.
    pub fn unresolved_names(&self) -> impl Iterator<Item = &str> {
        self.unresolved.values().map(|s| s.as_str())
    }

    fn parse_program(&mut self, cur: &mut Cursor<'_>) -> Result<()> {
        cur.skip_spaces();
        while !cur.at_eof() {
            if cur.eat('%') {
                self.parse_option_block(cur)?;
            } else {
                self.parse_rule(cur)?;
            }
            cur.skip_spaces();
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Option blocks
    // ------------------------------------------------------------------

    fn parse_option_block(&mut self, cur: &mut Cursor<'_>) -> Result<()> {
        const BACKENDS: [&str; 3] = ["LEXER", "MATCHER", "FEEDER"];
        cur.skip_spaces();
        let which = cur.parse_keyword(&BACKENDS)?;
        match which {
            0 if !matches!(self.source, TokenSource::Lexer(_)) => {
                return Err(CompileError::MissingBackend("LEXER", "lexer"));
            }
            2 if !matches!(self.source, TokenSource::Feeder(_)) => {
                return Err(CompileError::MissingBackend("FEEDER", "feeder"));
            }
            _ => {}
        }
        loop {
            cur.skip_spaces();
            match which {
                0 => self.parse_lexer_option(cur)?,
                1 => self.parse_matcher_option(cur)?,
                _ => self.parse_feeder_option(cur)?,
            }
            cur.skip_spaces();
            if !cur.eat(',') {
                break;
            }
        }
        if !cur.eat(';') {
            return Err(CompileError::Expected("';' at end of option block"));
        }
        Ok(())
    }

    fn parse_lexer_option(&mut self, cur: &mut Cursor<'_>) -> Result<()> {
        let name = cur
            .parse_identifier()
            .ok_or(CompileError::Expected("option name"))?;
        cur.skip_spaces();
        let value = parse_option_value(cur)?;
        let TokenSource::Lexer(lexer) = &mut self.source else {
            unreachable!("option block checks the backend before dispatch");
        };
        lexer.define_option(name, value)?;
        Ok(())
    }

    fn parse_matcher_option(&mut self, cur: &mut Cursor<'_>) -> Result<()> {
        let name = cur
            .parse_identifier()
            .ok_or(CompileError::Expected("option name"))?;
        cur.skip_spaces();
        let value = parse_option_value(cur)?;
        self.matcher.define_option(name, value)?;
        Ok(())
    }

    fn parse_feeder_option(&mut self, cur: &mut Cursor<'_>) -> Result<()> {
        cur.parse_keyword(&["lexem"])?;
        cur.skip_spaces();
        let name = cur
            .parse_identifier()
            .ok_or(CompileError::Expected("term type name"))?;
        let (id, created) = self.intern_name(NameTableSlot::Lexem, name)?;
        if created {
            let TokenSource::Feeder(feeder) = &mut self.source else {
                unreachable!("option block checks the backend before dispatch");
            };
            feeder.define_lexem(id, name)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------

    fn parse_rule(&mut self, cur: &mut Cursor<'_>) -> Result<()> {
        let invisible = cur.eat('.');
        cur.skip_spaces();
        let name = cur
            .parse_identifier()
            .ok_or(CompileError::Expected("rule name"))?;
        cur.skip_spaces();

        let mut level = None;
        if cur.eat('^') {
            cur.skip_spaces();
            level = Some(cur.parse_unsigned()?);
            cur.skip_spaces();
        }

        if cur.eat(':') {
            if invisible {
                return Err(CompileError::InvisibleLexeme);
            }
            self.parse_lexeme_rule(cur, name, level.unwrap_or(0))?;
        } else if cur.eat('=') {
            if level.is_some() {
                return Err(CompileError::LevelOnPattern);
            }
            self.parse_pattern_rule(cur, name, !invisible)?;
        } else {
            return Err(CompileError::Expected("':' or '=' after rule name"));
        }

        cur.skip_spaces();
        if !cur.eat(';') {
            return Err(CompileError::Expected("';' at end of rule"));
        }
        Ok(())
    }

    fn parse_lexeme_rule(&mut self, cur: &mut Cursor<'_>, name: &str, level: u32) -> Result<()> {
        if matches!(self.source, TokenSource::Feeder(_)) {
            return Err(CompileError::LexemeWithoutLexer(name.to_string()));
        }
        let (id, created) = self.intern_name(NameTableSlot::Lexem, name)?;
        if created {
            let TokenSource::Lexer(lexer) = &mut self.source else {
                unreachable!("feeder rejected above");
            };
            lexer.define_lexem_name(id, name)?;
        }

        loop {
            cur.skip_spaces();
            if !matches!(cur.peek(), Some('"') | Some('\'')) {
                return Err(CompileError::Expected("regex string"));
            }
            let regex = cur.parse_regex()?;
            let alt = parse_lexeme_alt_options(cur)?;

            let TokenSource::Lexer(lexer) = &mut self.source else {
                unreachable!("feeder rejected above");
            };
            lexer.define_lexem(
                id,
                &regex,
                alt.result_index,
                level,
                alt.edit_distance,
                alt.bind,
            )?;

            cur.skip_spaces();
            if !cur.eat('|') {
                break;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Interning
    // ------------------------------------------------------------------

    /// Intern into the lexem or pattern table, enforcing the id boundary
    /// below the symbol range.
    pub(super) fn intern_name(
        &mut self,
        slot: NameTableSlot,
        name: &str,
    ) -> Result<(NameId, bool)> {
        let table = match slot {
            NameTableSlot::Lexem => &mut self.lexem_names,
            NameTableSlot::Pattern => &mut self.pattern_names,
        };
        let (id, created) = table.get_or_create(name);
        if id.as_u32() >= MAX_PATTERN_TERM_NAME_ID {
            return Err(CompileError::TooManyNames);
        }
        Ok((id, created))
    }

    /// Intern a literal symbol scoped to `type_id`, registering it with the
    /// token source on first creation. Returns the shifted symbol id.
    pub(super) fn intern_symbol(&mut self, type_id: NameId, text: &str) -> Result<u32> {
        let key = symbol_key(type_id, text);
        let (dense, created) = self.symbols.get_or_create(&key);
        if dense.as_u32() >= MAX_PATTERN_TERM_NAME_ID {
            return Err(CompileError::TooManyNames);
        }
        let id = symbol_id(dense);
        if created {
            match &mut self.source {
                TokenSource::Lexer(lexer) => lexer.define_symbol(id, type_id, text)?,
                TokenSource::Feeder(feeder) => feeder.define_symbol(id, type_id, text)?,
            }
        }
        Ok(id)
    }
}

/// Which of the two name tables `intern_name` targets.
#[derive(Clone, Copy)]
pub(super) enum NameTableSlot {
    Lexem,
    Pattern,
}

/// Per-alternative lexeme modifiers with their defaults.
#[derive(Default)]
struct LexemeAlt {
    result_index: u32,
    edit_distance: u32,
    bind: PositionBind,
}

/// `{ 'index' N | 'pred' | 'succ' } ['~' N]` after a regex alternative.
fn parse_lexeme_alt_options(cur: &mut Cursor<'_>) -> Result<LexemeAlt> {
    const ALT_OPTIONS: [&str; 3] = ["index", "pred", "succ"];
    let mut mask = KeywordMask::new();
    let mut alt = LexemeAlt::default();
    loop {
        cur.skip_spaces();
        if !matches!(cur.peek(), Some(c) if c.is_alphabetic() || c == '_') {
            break;
        }
        match cur.parse_keyword_tracked(&mut mask, &ALT_OPTIONS)? {
            0 => {
                cur.skip_spaces();
                alt.result_index = cur.parse_unsigned()?;
            }
            1 => alt.bind = PositionBind::Pred,
            _ => alt.bind = PositionBind::Succ,
        }
        if mask.is_set(1) && mask.is_set(2) {
            return Err(CompileError::ConflictingPositionBind);
        }
    }
    if cur.eat('~') {
        cur.skip_spaces();
        alt.edit_distance = cur.parse_unsigned()?;
    }
    Ok(alt)
}

/// Optional numeric option value; absent means 0.
fn parse_option_value(cur: &mut Cursor<'_>) -> Result<f64> {
    match cur.peek() {
        Some(c) if c.is_ascii_digit() || c == '-' => Ok(cur.parse_float()?),
        _ => Ok(0.0),
    }
}
