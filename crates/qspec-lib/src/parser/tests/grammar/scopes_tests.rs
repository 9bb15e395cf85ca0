use indoc::indoc;

use crate::parser::ast::{Item, ValueKind};
use crate::parser::literals::NumberValue;
use crate::parser::parse_strict;
use crate::parser::tests::outline;

#[test]
fn statements() {
    let input = indoc! {r#"
    Users {
        test "finds one" {
            $id: 1
            user.name: "Ann"
        }
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        Test "finds one"
          Statement $id: 1
          Statement user.name: "Ann"
    "#);

    let suite = parse_strict(input).unwrap();
    let Item::Test(test) = &suite.scopes[0].items[0] else {
        panic!("expected a test");
    };
    let id = &test.statements[0];
    assert_eq!(id.key, "$id");
    assert!(id.is_param());
    let ValueKind::Number(number) = &id.value.kind else {
        panic!("expected a number");
    };
    assert_eq!(number.value, NumberValue::Int(1));

    let name = &test.statements[1];
    assert!(!name.is_param());
    assert_eq!(name.path().collect::<Vec<_>>(), vec!["user", "name"]);
}

#[test]
fn groups_nest() {
    let input = indoc! {r#"
    Users {
        setup `CREATE (:User)`
        group "admins" {
            teardown `MATCH (n) DELETE n`
            group "nested" {
                test "deep" {}
            }
            test "shallow" {}
        }
        test "top" {}
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        SetupClause setup inline
        Group "admins"
          SetupClause teardown inline
          Group "nested"
            Test "deep"
          Test "shallow"
        Test "top"
    "#);
}

#[test]
fn several_scopes() {
    let input = indoc! {r#"
    query A `a`
    query B `b`
    A { test "a" {} }
    B { test "b" {} }
    "#};

    let suite = parse_strict(input).unwrap();
    assert_eq!(suite.scopes.len(), 2);
    let b = suite.scope("B").unwrap();
    assert_eq!(b.items[0].name(), "b");
    assert!(suite.scope("C").is_none());
}

#[test]
fn test_names_are_cooked() {
    let suite = parse_strict(r#"Q { test 'it\'s "fine"' {} }"#).unwrap();
    assert_eq!(suite.scopes[0].items[0].name(), r#"it's "fine""#);
}

#[test]
fn missing_colon() {
    let input = indoc! {r#"
    Users {
        test "t" {
            n 1
        }
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        Test "t" (recovered; skipped n 1)
    ---
    Q0017 at 3:11-3:12: expected `:` after `n`, found number
    "#);
}

#[test]
fn unexpected_token_in_test() {
    let input = indoc! {r#"
    Users {
        test "t" {
            42
            assert { ok }
        }
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        Test "t" (recovered; skipped 42)
          Assert
            AssertExpr ok
    ---
    Q0020 at 3:9-3:11: expected a statement, `assert` or `}`, found number
    "#);
}
