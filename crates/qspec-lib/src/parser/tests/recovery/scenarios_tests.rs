use indoc::indoc;
use qspec_core::Position;

use crate::Error;
use crate::diagnostics::DiagnosticKind;
use crate::parser::ast::SetupBody;
use crate::parser::lexer::LexError;
use crate::parser::tests::outline;
use crate::parser::{ParseOptions, parse, parse_recovering, parse_strict};

#[test]
fn unterminated_test_block() {
    let input = "Q {\n    test \"x\" {\n";

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Q (recovered; skipped {)
        Test "x" (recovered; skipped {)
    ---
    Q0002 at 1:3-1:4: missing closing `}` for scope `Q`
    Q0002 at 2:14-2:15: missing closing `}` for test "x"
    "#);

    let Err(Error::Syntax(err)) = parse_strict(input) else {
        panic!("strict mode must fail on the open test");
    };
    assert_eq!(err.kind, DiagnosticKind::UnclosedBlock);
    assert_eq!(err.message, r#"missing closing `}` for test "x""#);

    let strict = parse(input, &ParseOptions::strict());
    assert!(strict.suite().scopes.is_empty());
    assert_eq!(strict.diagnostics().len(), 1);
}

#[test]
fn trailing_dot_in_setup_call() {
    let input = "setup fixtures.";

    insta::assert_snapshot!(outline(input), @r"
    Suite
      SetupClause setup call (recovered)
        SetupCall fixtures.() (recovered)
    ---
    Q0014 at 1:16-1:16: expected a callee name after `.`, found end of input
    ");

    let parse = parse_recovering(input);
    let setup = parse.suite().setup.as_ref().unwrap();
    assert!(setup.meta.is_recovered());
    let SetupBody::Call(call) = &setup.body else {
        panic!("expected a call body");
    };
    assert_eq!(call.module.as_deref(), Some("fixtures"));
    assert_eq!(call.name, "");
    assert!(call.meta.is_recovered());
}

#[test]
fn lex_error_after_valid_queries() {
    let input = indoc! {r#"
    query A `x`
    query B `y`
    query Broken `incomplete
    "#};

    let parse = parse_recovering(input);
    let names: Vec<&str> = parse
        .suite()
        .queries
        .iter()
        .map(|q| q.name.as_str())
        .collect();
    assert_eq!(names, vec!["A", "B"]);

    assert_eq!(parse.diagnostics().len(), 1);
    let diagnostic = parse.diagnostics().first().unwrap();
    assert_eq!(diagnostic.kind, DiagnosticKind::InvalidToken);
    assert_eq!(diagnostic.message, "unterminated raw string");

    assert_eq!(
        parse.error(),
        Some(&Error::Lex(LexError::UnterminatedRawString {
            position: Position::new(3, 14, 37),
        }))
    );
}

#[test]
fn lex_error_is_fatal_in_both_modes() {
    let input = "query A `x`\nquery B \"open\n";

    let strict = parse(input, &ParseOptions::strict());
    let recovering = parse(input, &ParseOptions::recovering());
    for parse in [&strict, &recovering] {
        assert!(matches!(
            parse.error(),
            Some(Error::Lex(LexError::NewlineInString { .. }))
        ));
        assert_eq!(parse.suite().queries.len(), 1);
        assert_eq!(parse.diagnostics().len(), 1);
    }
}

#[test]
fn valid_prefix_survives_broken_tail() {
    let declarations = [r#"import "a.qs""#, "query A `a`", "query B `b`"];
    for k in 0..=declarations.len() {
        let mut source = declarations[..k].join("\n");
        source.push_str("\nquery Broken\n");

        let parse = parse_recovering(&source);
        let suite = parse.suite();
        assert_eq!(suite.imports.len() + suite.queries.len(), k, "k = {k}");
        assert!(
            suite.queries.iter().all(|q| !q.body.is_empty()),
            "k = {k}"
        );
        assert_eq!(parse.diagnostics().len(), 1, "k = {k}");
        assert!(parse.error().is_none());
    }
}

#[test]
fn reparse_is_identical() {
    let input = indoc! {r#"
    query Users `MATCH (u) RETURN u`
    Users {
        setup fixtures.users(
        test "a" { $id: 1 }
        test "b" { assert { rows.length == } }
    }
    "#};

    let first = parse_recovering(input);
    let second = parse_recovering(input);
    assert_eq!(first.suite(), second.suite());
    assert_eq!(first.diagnostics(), second.diagnostics());
}

#[test]
fn strict_and_recovering_agree_on_valid_input() {
    let input = indoc! {r#"
    import "lib.qs"
    query Users `MATCH (u) RETURN u`
    Users {
        test "a" {
            $id: 1
            assert { rows.length == 1 }
        }
    }
    "#};

    let strict = parse_strict(input).unwrap();
    let recovering = parse_recovering(input);
    assert!(recovering.is_valid());
    assert_eq!(&strict, recovering.suite());

    let (suite, diagnostics) = recovering.into_result().unwrap();
    assert_eq!(suite, strict);
    assert!(diagnostics.is_empty());
}

#[test]
fn into_result_reports_the_abort() {
    let parse = parse("query A `x", &ParseOptions::recovering());
    assert!(matches!(parse.into_result(), Err(Error::Lex(_))));
}
