use indoc::indoc;

use crate::parser::ast::{Item, Statement, ValueKind};
use crate::parser::literals::NumberValue;
use crate::parser::parse_strict;
use crate::parser::tests::outline;

fn statements(body: &str) -> Vec<Statement> {
    let source = format!("Q {{\n test \"t\" {{\n{body}\n }}\n}}");
    let mut suite = parse_strict(&source).unwrap();
    match suite.scopes.remove(0).items.remove(0) {
        Item::Test(test) => test.statements,
        Item::Group(_) => panic!("expected a test"),
    }
}

#[test]
fn every_value_kind() {
    let input = indoc! {r#"
    Users {
        test "values" {
            a: null
            b: true
            c: -2.5
            d: 0xff
            e: "x\ty"
            f: ['a', 1, [false]]
            g: {name: "Ann", "two words": 2,}
        }
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        Test "values"
          Statement a: null
          Statement b: true
          Statement c: -2.5
          Statement d: 255
          Statement e: "x\ty"
          Statement f: ["a", 1, [false]]
          Statement g: {name: "Ann", two words: 2}
    "#);
}

#[test]
fn signed_numbers_keep_their_text() {
    let statements = statements("a: -2.5\nb: +7\nc: -0x10");
    let numbers: Vec<(String, NumberValue)> = statements
        .iter()
        .map(|s| match &s.value.kind {
            ValueKind::Number(n) => (n.text.clone(), n.value),
            other => panic!("expected a number, got {other:?}"),
        })
        .collect();
    assert_eq!(
        numbers,
        vec![
            ("-2.5".to_string(), NumberValue::Float(-2.5)),
            ("+7".to_string(), NumberValue::Int(7)),
            ("-0x10".to_string(), NumberValue::Int(-16)),
        ]
    );
}

#[test]
fn value_spans_cover_signs() {
    let statements = statements("a: - 1");
    let span = statements[0].value.span;
    assert_eq!(span.start.column, 4);
    assert_eq!(span.end.column, 7);
}

#[test]
fn number_out_of_range() {
    let input = indoc! {r#"
    Users {
        test "big" {
            n: 9223372036854775808
        }
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        Test "big" (recovered; skipped n : 9223372036854775808)
    ---
    Q0023 at 3:12-3:31: number does not fit in 64 bits: `9223372036854775808`
    "#);
}

#[test]
fn bare_identifier_is_not_a_value() {
    let input = indoc! {r#"
    Users {
        test "t" {
            a: nope
        }
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        Test "t" (recovered; skipped a : nope)
    ---
    Q0015 at 3:12-3:16: expected `null`, a boolean, a number, a string, a map or a list, found identifier
    "#);
}

#[test]
fn unterminated_list() {
    let input = indoc! {r#"
    Users {
        test "t" {
            a: [1, 2
        }
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        Test "t" (recovered; skipped a : [ 1 , 2)
    ---
    Q0020 at 4:5-4:6: expected `,` or `]`, found `}`
    "#);
}
