//! Tests for pattern rules: range inference, forward references, symbols.

use indoc::indoc;
use weft_core::MAX_PATTERN_TERM_NAME_ID;

use crate::backend::{
    FeederCall, JoinOperation, LexerCall, MatcherCall, RecordingLexer, RecordingMatcher,
};
use crate::compiler::{Range, RuleCompiler, TokenSource};
use crate::diagnostics::Diagnostics;
use crate::test_utils::{run_with_feeder, run_with_lexer};

/// `t` is a terminal with span (1,1); `q` carries span (2,4) via an
/// explicit range so min and max differ.
const PRELUDE: &str = "t: \"x\";\nq = sequence(t, t | 4);\n";

fn last_join(matcher: &RecordingMatcher) -> &MatcherCall {
    matcher
        .calls
        .iter()
        .rev()
        .find(|c| matches!(c, MatcherCall::PushExpression { .. }))
        .expect("no join was pushed")
}

fn join_of(source: &str) -> MatcherCall {
    let run = run_with_lexer(&format!("{PRELUDE}{source}"));
    assert!(run.loaded, "{:?}", run.diagnostics);
    last_join(&run.matcher).clone()
}

#[test]
fn sequence_sums_operand_spans() {
    assert_eq!(
        join_of("p = sequence(t, t, t);"),
        MatcherCall::PushExpression {
            op: JoinOperation::Sequence,
            argc: 3,
            range: 3,
            cardinality: 0
        }
    );
}

#[test]
fn sequence_accepts_explicit_range_at_or_above_minimum() {
    assert_eq!(
        join_of("p = sequence(t, t, t | 5);"),
        MatcherCall::PushExpression {
            op: JoinOperation::Sequence,
            argc: 3,
            range: 5,
            cardinality: 0
        }
    );
}

#[test]
fn sequence_imm_forces_range_to_accumulated_minimum() {
    // q spans (2,4), t spans (1,1): accumulated (3,5), emitted 3
    assert_eq!(
        join_of("p = sequence_imm(q, t);"),
        MatcherCall::PushExpression {
            op: JoinOperation::SequenceImm,
            argc: 2,
            range: 3,
            cardinality: 0
        }
    );
}

#[test]
fn sequence_imm_explicit_range_wins() {
    assert_eq!(
        join_of("p = sequence_imm(q, t | 7);"),
        MatcherCall::PushExpression {
            op: JoinOperation::SequenceImm,
            argc: 2,
            range: 7,
            cardinality: 0
        }
    );
}

#[test]
fn sequence_struct_excludes_the_delimiter_operand() {
    // operand 0 (the delimiter) is excluded: accumulated (2,2), not (3,3)
    assert_eq!(
        join_of("p = sequence_struct(t, t, t);"),
        MatcherCall::PushExpression {
            op: JoinOperation::SequenceStruct,
            argc: 3,
            range: 2,
            cardinality: 0
        }
    );
}

#[test]
fn within_sums_like_sequence() {
    assert_eq!(
        join_of("p = within(t, q);"),
        MatcherCall::PushExpression {
            op: JoinOperation::Within,
            argc: 2,
            range: 5,
            cardinality: 0
        }
    );
}

#[test]
fn within_struct_excludes_the_delimiter_operand() {
    assert_eq!(
        join_of("p = within_struct(t, q, t);"),
        MatcherCall::PushExpression {
            op: JoinOperation::WithinStruct,
            argc: 3,
            range: 5,
            cardinality: 0
        }
    );
}

#[test]
fn any_spreads_operand_spans() {
    // q spans (2,4), t spans (1,1): spread is (1,4), emitted 4
    assert_eq!(
        join_of("p = any(q, t);"),
        MatcherCall::PushExpression {
            op: JoinOperation::Any,
            argc: 2,
            range: 4,
            cardinality: 0
        }
    );
}

#[test]
fn and_spreads_operand_spans() {
    assert_eq!(
        join_of("p = and(t, q);"),
        MatcherCall::PushExpression {
            op: JoinOperation::And,
            argc: 2,
            range: 4,
            cardinality: 0
        }
    );
}

#[test]
fn nested_joins_propagate_inferred_spans() {
    let run = run_with_lexer(&format!("{PRELUDE}p = sequence(any(t, q), t | 9);"));
    assert!(run.loaded, "{:?}", run.diagnostics);
    let joins: Vec<&MatcherCall> = run
        .matcher
        .calls
        .iter()
        .filter(|c| matches!(c, MatcherCall::PushExpression { .. }))
        .collect();
    // q's own join, the inner any, the outer sequence
    assert_eq!(joins.len(), 3);
    assert_eq!(
        *joins[1],
        MatcherCall::PushExpression {
            op: JoinOperation::Any,
            argc: 2,
            range: 4,
            cardinality: 0
        }
    );
    assert_eq!(
        *joins[2],
        MatcherCall::PushExpression {
            op: JoinOperation::Sequence,
            argc: 2,
            range: 9,
            cardinality: 0
        }
    );
}

#[test]
fn explicit_range_below_minimum_is_rejected() {
    let run = run_with_lexer("t: \"x\";\np = sequence(t, t | 1);");
    assert!(!run.loaded);
    let message = run.diagnostics.iter().next().unwrap().to_string();
    assert!(message.contains("smaller than"), "{message}");
}

#[test]
fn zero_span_without_explicit_range_is_rejected() {
    let run = run_with_lexer("p = sequence(ghost1, ghost2);");
    assert!(!run.loaded);
    let message = run.diagnostics.iter().next().unwrap().to_string();
    assert!(message.contains("zero"), "{message}");
}

#[test]
fn unknown_join_operation_is_rejected() {
    let run = run_with_lexer("p = shuffle(a, b);");
    assert!(!run.loaded);
    let message = run.diagnostics.iter().next().unwrap().to_string();
    assert!(message.contains("shuffle"), "{message}");
}

#[test]
fn pattern_range_is_elementwise_max_over_alternatives() {
    let mut lexer = RecordingLexer::default();
    let mut matcher = RecordingMatcher::default();
    let mut diagnostics = Diagnostics::new();
    let mut compiler = RuleCompiler::new(
        TokenSource::Lexer(&mut lexer),
        &mut matcher,
        &mut diagnostics,
    );

    assert!(compiler.load(PRELUDE));
    assert!(compiler.load("a = q | t;\nuse_a = sequence(a, t);"));

    assert_eq!(compiler.pattern_range("a"), Some(Range { min: 2, max: 4 }));
    drop(compiler);

    // the reference to `a` contributed (2,4): accumulated (3,5), emitted 5
    assert_eq!(
        *last_join(&matcher),
        MatcherCall::PushExpression {
            op: JoinOperation::Sequence,
            argc: 2,
            range: 5,
            cardinality: 0
        }
    );
}

#[test]
fn forward_reference_resolved_later_leaves_no_warnings() {
    let source = indoc! {r#"
        word: "[a-z]+";
        p = sequence(word, later | 5);
        later = word;
    "#};
    let run = run_with_lexer(source);
    assert!(run.loaded, "{:?}", run.diagnostics);
    assert!(run.compiled);
    assert_eq!(run.diagnostics.warning_count(), 0);
}

#[test]
fn never_defined_reference_warns_exactly_once() {
    let source = indoc! {r#"
        word: "[a-z]+";
        p = sequence(word, Ghost | 5);
        q = sequence(word, Ghost | 5);
    "#};
    let run = run_with_lexer(source);
    assert!(run.compiled);
    assert_eq!(run.diagnostics.warning_count(), 1);
    let message = run.diagnostics.iter().next().unwrap().to_string();
    assert!(message.contains("Ghost"), "{message}");
}

#[test]
fn at_most_ten_unresolved_names_reported_individually() {
    let args: Vec<String> = (1..=12).map(|i| format!("miss{i}")).collect();
    let source = format!("p = sequence({} | 1);", args.join(", "));
    let run = run_with_lexer(&source);
    assert!(run.compiled, "{:?}", run.diagnostics);
    // ten individual warnings plus one summarizing the remainder
    assert_eq!(run.diagnostics.warning_count(), 11);
}

#[test]
fn optimistic_zero_range_for_unresolved_forward_references() {
    // `a` and `b` are undefined at first use: they contribute (0,0), the
    // explicit range 3 is accepted against minimum 0, and the stored span
    // of `seq` stays (0,3) even though a later definition of `a`/`b` would
    // widen it. This asymmetry is deliberate.
    let mut lexer = RecordingLexer::default();
    let mut matcher = RecordingMatcher::default();
    let mut diagnostics = Diagnostics::new();
    let mut compiler = RuleCompiler::new(
        TokenSource::Lexer(&mut lexer),
        &mut matcher,
        &mut diagnostics,
    );

    assert!(compiler.load("seq = sequence(a, b | 3);"));
    let unresolved: Vec<&str> = compiler.unresolved_names().collect();
    assert_eq!(unresolved, vec!["a", "b"]);
    assert_eq!(compiler.pattern_range("seq"), Some(Range { min: 0, max: 3 }));

    assert!(compiler.load("t: \"x\";\na = sequence(t, t);"));
    let unresolved: Vec<&str> = compiler.unresolved_names().collect();
    assert_eq!(unresolved, vec!["b"]);
    assert_eq!(compiler.pattern_range("a"), Some(Range { min: 2, max: 2 }));
    assert_eq!(compiler.pattern_range("seq"), Some(Range { min: 0, max: 3 }));
}

#[test]
fn recursive_pattern_does_not_warn() {
    let run = run_with_lexer("t: \"x\";\nlist = sequence(t, list | 8) | t;");
    assert!(run.compiled, "{:?}", run.diagnostics);
    assert_eq!(run.diagnostics.warning_count(), 0);
}

#[test]
fn identical_literals_under_different_types_get_distinct_symbols() {
    let source = indoc! {r#"
        word: "[a-z]+";
        num: "[0-9]+";
        p = sequence(word "go", num "go" | 2);
        q = word "go";
    "#};
    let run = run_with_lexer(source);
    assert!(run.loaded, "{:?}", run.diagnostics);

    let symbols: Vec<&LexerCall> = run
        .lexer
        .calls
        .iter()
        .filter(|c| matches!(c, LexerCall::DefineSymbol { .. }))
        .collect();
    assert_eq!(
        symbols,
        vec![
            &LexerCall::DefineSymbol {
                symbol_id: MAX_PATTERN_TERM_NAME_ID + 1,
                lexem_id: 1,
                text: "go".to_string()
            },
            &LexerCall::DefineSymbol {
                symbol_id: MAX_PATTERN_TERM_NAME_ID + 2,
                lexem_id: 2,
                text: "go".to_string()
            },
        ]
    );

    // q reuses the first symbol id without re-registering it
    assert!(
        run.matcher
            .calls
            .contains(&MatcherCall::PushTerm {
                id: MAX_PATTERN_TERM_NAME_ID + 1
            })
    );
}

#[test]
fn symbol_under_unknown_type_is_rejected() {
    let run = run_with_lexer(r#"p = ghost "lit";"#);
    assert!(!run.loaded);
    let message = run.diagnostics.iter().next().unwrap().to_string();
    assert!(message.contains("ghost"), "{message}");
}

#[test]
fn feeder_terms_support_symbols() {
    let source = "%FEEDER lexem word;\np = word \"hello\";";
    let run = run_with_feeder(source);
    assert!(run.loaded, "{:?}", run.diagnostics);
    assert!(
        run.feeder
            .calls
            .iter()
            .any(|c| matches!(c, FeederCall::DefineSymbol { text, .. } if text == "hello"))
    );
}

#[test]
fn lexeme_type_names_are_case_insensitive() {
    let run = run_with_lexer("Foo: \"x\";\np = foo;");
    assert!(run.loaded, "{:?}", run.diagnostics);
    assert!(run.matcher.calls.contains(&MatcherCall::PushTerm { id: 1 }));
}

#[test]
fn first_seen_spelling_is_canonical() {
    let mut lexer = RecordingLexer::default();
    let mut matcher = RecordingMatcher::default();
    let mut diagnostics = Diagnostics::new();
    let mut compiler = RuleCompiler::new(
        TokenSource::Lexer(&mut lexer),
        &mut matcher,
        &mut diagnostics,
    );

    assert!(compiler.load("Foo: \"x\";\np = FOO;"));
    let id = compiler.lexem_names().get("foo");
    assert_eq!(compiler.lexem_names().key(id), Some("Foo"));
}

#[test]
fn variable_bindings_attach_to_the_last_pushed_node() {
    let run = run_with_lexer("t: \"x\";\np = sequence(v = t, w = any(t, t) | 6);");
    assert!(run.loaded, "{:?}", run.diagnostics);

    let trace: Vec<String> = run.matcher.calls.iter().map(|c| c.to_string()).collect();
    assert_eq!(
        trace,
        vec![
            "term 1",
            "var v",
            "term 1",
            "term 1",
            "join any argc=2 range=1 cardinality=0",
            "var w",
            "join sequence argc=2 range=6 cardinality=0",
            "pattern p visible",
            "compile",
        ]
    );
}

#[test]
fn dotted_pattern_is_invisible() {
    let run = run_with_lexer("t: \"x\";\n.helper = t;");
    assert!(run.loaded, "{:?}", run.diagnostics);
    assert!(
        run.matcher.calls.contains(&MatcherCall::DefinePattern {
            name: "helper".to_string(),
            visible: false
        })
    );
}

#[test]
fn empty_join_is_rejected() {
    let run = run_with_lexer("p = any();");
    assert!(!run.loaded);
}
