use indoc::indoc;

use crate::parser::ast::{AssertTarget, Item};
use crate::parser::parse_strict;
use crate::parser::tests::outline;

/// Every assertion expression of `body`, placed in an assert block.
fn exprs(body: &str) -> Vec<String> {
    let source = format!("Q {{\n test \"t\" {{\n  assert {{\n{body}\n  }}\n }}\n}}");
    let suite = parse_strict(&source).unwrap();
    let Item::Test(test) = &suite.scopes[0].items[0] else {
        panic!("expected a test");
    };
    test.asserts[0]
        .exprs
        .iter()
        .map(|e| e.expr.to_string())
        .collect()
}

#[test]
fn precedence() {
    assert_eq!(
        exprs("a + b * c == d && !e || f"),
        vec!["(|| (&& (== (+ a (* b c)) d) (! e)) f)"]
    );
    assert_eq!(exprs("a - b - c"), vec!["(- (- a b) c)"]);
    assert_eq!(exprs("(a || b) && c"), vec!["(&& (|| a b) c)"]);
    assert_eq!(exprs("a % b / c"), vec!["(/ (% a b) c)"]);
}

#[test]
fn postfix_operators() {
    assert_eq!(
        exprs(r#"rows[0].name == "Ann"; count(rows, 1) > -1"#),
        vec![
            r#"(== (. (index rows 0) name) "Ann")"#,
            "(> (call count rows 1) (- 1))",
        ]
    );
}

#[test]
fn literals_and_lists() {
    assert_eq!(
        exprs(r#"x == null; y != [1, "a", true]; z =~ "^A""#),
        vec![
            "(== x null)",
            r#"(!= y [1, "a", true])"#,
            r#"(=~ z "^A")"#,
        ]
    );
}

#[test]
fn newline_starts_a_new_expression() {
    assert_eq!(exprs("a\n[1, 2]"), vec!["a", "[1, 2]"]);
    assert_eq!(exprs("f\n(x)"), vec!["f", "x"]);
    assert_eq!(exprs("a\n.b"), vec!["(. a b)"]);
}

#[test]
fn assert_targets() {
    let input = indoc! {r#"
    Users {
        test "t" {
            assert `MATCH (n) RETURN count(n) AS c` { c == 1 }
            assert Users($id: 1) { rows.length == 1 }
            assert Other { true }
        }
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        Test "t"
          Assert
            AssertQuery inline
            AssertExpr (== c 1)
          Assert
            AssertQuery call
              SetupCall Users($id: 1)
            AssertExpr (== (. rows length) 1)
          Assert
            AssertQuery call
              SetupCall Other()
            AssertExpr true
    "#);

    let suite = parse_strict(input).unwrap();
    let Item::Test(test) = &suite.scopes[0].items[0] else {
        panic!("expected a test");
    };
    let target = &test.asserts[0].query.as_ref().unwrap().target;
    assert_eq!(
        target,
        &AssertTarget::Inline("MATCH (n) RETURN count(n) AS c".to_string())
    );
}

#[test]
fn missing_operand() {
    let input = indoc! {r#"
    Users {
        test "t" {
            assert { a == }
        }
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        Test "t"
          Assert (recovered; skipped a ==)
    ---
    Q0016 at 3:23-3:24: expected an expression, found `}`
    "#);
}

#[test]
fn unclosed_assert_block() {
    let input = indoc! {r#"
    Users {
        test "t" {
            assert { a
            assert { b }
        }
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        Test "t"
          Assert (recovered; skipped {)
            AssertExpr a
          Assert
            AssertExpr b
    ---
    Q0002 at 3:16-3:17: missing closing `}` for `assert` block
    "#);
}
