//! Pattern rules, join expressions, and range inference.
//!
//! Expressions are emitted bottom-up while parsing: operands are pushed to
//! the matcher first, then the join node consuming them. Range inference
//! runs alongside so the emitted join carries a span consistent with the
//! runtime semantics of its operator.

use crate::backend::JoinOperation;
use crate::error::{CompileError, Result};
use crate::scan::Cursor;

use super::{NameTableSlot, Range, RuleCompiler};

impl RuleCompiler<'_> {
    /// One `name = expr {'|' expr} ;` rule. Each alternative is pushed and
    /// registered separately; the pattern's stored range is the elementwise
    /// max across alternatives, updated as each one is parsed.
    pub(super) fn parse_pattern_rule(
        &mut self,
        cur: &mut Cursor<'_>,
        name: &str,
        visible: bool,
    ) -> Result<()> {
        let (id, _) = self.intern_name(NameTableSlot::Pattern, name)?;
        self.defined_patterns.insert(id);
        self.unresolved.shift_remove(&name.to_lowercase());

        loop {
            cur.skip_spaces();
            let range = self.parse_alternative(cur)?;
            let slot = self.pattern_ranges.entry(id).or_insert(Range::ZERO);
            *slot = slot.merged_max(range);
            self.matcher.define_pattern(name, visible)?;

            cur.skip_spaces();
            if !cur.eat('|') {
                break;
            }
        }
        Ok(())
    }

    /// `expr ['|' range] ['^' cardinality]`. A modifier at rule level wraps
    /// the expression in a one-operand sequence node carrying it.
    ///
    /// The `'|'` here is ambiguous with the alternative separator; it is a
    /// range modifier only when a digit follows.
    fn parse_alternative(&mut self, cur: &mut Cursor<'_>) -> Result<Range> {
        let acc = self.parse_expression(cur)?;
        cur.skip_spaces();

        let mut explicit = None;
        let mut cardinality = None;

        let mut probe = cur.clone();
        if probe.eat('|') {
            probe.skip_spaces();
            if probe.peek().is_some_and(|c| c.is_ascii_digit()) {
                explicit = Some(probe.parse_unsigned()?);
                probe.skip_spaces();
                *cur = probe;
            }
        }
        if cur.eat('^') {
            cur.skip_spaces();
            cardinality = Some(cur.parse_unsigned()?);
            cur.skip_spaces();
        }

        if explicit.is_none() && cardinality.is_none() {
            return Ok(acc);
        }

        let (emitted, result) = resolve_range(JoinOperation::Sequence, acc, explicit)?;
        self.matcher.push_expression(
            JoinOperation::Sequence,
            1,
            emitted,
            cardinality.unwrap_or(0),
        )?;
        Ok(result)
    }

    /// `[name '='] (call | terminal)`. A variable binding attaches to the
    /// node the inner expression pushes last.
    pub(super) fn parse_expression(&mut self, cur: &mut Cursor<'_>) -> Result<Range> {
        cur.skip_spaces();
        let ident = cur
            .parse_identifier()
            .ok_or(CompileError::Expected("expression"))?;
        cur.skip_spaces();

        if cur.eat('=') {
            cur.skip_spaces();
            let inner = cur
                .parse_identifier()
                .ok_or(CompileError::Expected("expression after variable assignment"))?;
            cur.skip_spaces();
            let range = self.parse_operand(cur, inner)?;
            self.matcher.attach_variable(ident)?;
            return Ok(range);
        }
        self.parse_operand(cur, ident)
    }

    fn parse_operand(&mut self, cur: &mut Cursor<'_>, ident: &str) -> Result<Range> {
        if cur.peek() == Some('(') {
            self.parse_join(cur, ident)
        } else {
            self.parse_terminal(cur, ident)
        }
    }

    /// `joinop '(' [expr {',' expr} ['|' range] ['^' cardinality]] ')'`.
    fn parse_join(&mut self, cur: &mut Cursor<'_>, ident: &str) -> Result<Range> {
        let op = JoinOperation::from_keyword(ident)
            .ok_or_else(|| CompileError::UnknownJoinOperation(ident.to_string()))?;
        cur.eat('(');
        cur.skip_spaces();

        let mut argc = 0usize;
        let mut acc: Option<Range> = None;
        let mut explicit = None;
        let mut cardinality = 0;

        if !cur.eat(')') {
            loop {
                let operand = self.parse_expression(cur)?;
                // Operand 0 of a struct join is the delimiter; it does not
                // contribute to the span.
                if !(op.is_struct() && argc == 0) {
                    acc = Some(match acc {
                        None => operand,
                        Some(a) if op.is_choice() => a.spread(operand),
                        Some(a) => a.sum(operand),
                    });
                }
                argc += 1;
                cur.skip_spaces();
                if cur.eat(',') {
                    cur.skip_spaces();
                    continue;
                }
                break;
            }
            if cur.eat('|') {
                cur.skip_spaces();
                explicit = Some(cur.parse_unsigned()?);
                cur.skip_spaces();
            }
            if cur.eat('^') {
                cur.skip_spaces();
                cardinality = cur.parse_unsigned()?;
                cur.skip_spaces();
            }
            if !cur.eat(')') {
                return Err(CompileError::Expected("',' or ')' in join expression"));
            }
        }

        let (emitted, result) = resolve_range(op, acc.unwrap_or(Range::ZERO), explicit)?;
        self.matcher.push_expression(op, argc, emitted, cardinality)?;
        Ok(result)
    }

    /// `identifier` (lexeme type or pattern reference) or
    /// `identifier string` (literal symbol scoped to a lexeme/term type).
    fn parse_terminal(&mut self, cur: &mut Cursor<'_>, ident: &str) -> Result<Range> {
        if matches!(cur.peek(), Some('"') | Some('\'')) {
            let text = cur.parse_string()?;
            let type_id = self.lexem_names.get(ident);
            if type_id.is_none() {
                return Err(CompileError::UndefinedType(ident.to_string()));
            }
            let id = self.intern_symbol(type_id, &text)?;
            self.matcher.push_term(id)?;
            return Ok(Range::TERMINAL);
        }

        let lexem = self.lexem_names.get(ident);
        if !lexem.is_none() {
            self.matcher.push_term(lexem.as_u32())?;
            return Ok(Range::TERMINAL);
        }

        // Pattern reference. A name with no definition yet contributes an
        // optimistic (0,0) span; uses parsed before the definition keep the
        // bootstrap value they computed here.
        let (id, _) = self.intern_name(NameTableSlot::Pattern, ident)?;
        self.matcher.push_pattern(ident)?;
        if self.defined_patterns.contains(&id) {
            Ok(self.pattern_ranges.get(&id).copied().unwrap_or(Range::ZERO))
        } else {
            self.unresolved
                .entry(ident.to_lowercase())
                .or_insert_with(|| ident.to_string());
            Ok(Range::ZERO)
        }
    }
}

/// Decide the emitted range and the resulting span pair of a join.
///
/// An explicit range must cover the accumulated minimum. Without one, the
/// emitted range is the accumulated maximum, except for `sequence_imm`
/// where immediate adjacency forces it down to the accumulated minimum.
fn resolve_range(op: JoinOperation, acc: Range, explicit: Option<u32>) -> Result<(u32, Range)> {
    if acc.max == 0 && explicit.unwrap_or(0) == 0 {
        return Err(CompileError::ZeroRange);
    }
    match explicit {
        Some(given) => {
            if given < acc.min {
                return Err(CompileError::RangeTooSmall {
                    given,
                    min: acc.min,
                });
            }
            Ok((given, Range { min: acc.min, max: given }))
        }
        None => {
            let emitted = if op == JoinOperation::SequenceImm {
                acc.min
            } else {
                acc.max
            };
            Ok((emitted, Range { min: acc.min, max: emitted }))
        }
    }
}
