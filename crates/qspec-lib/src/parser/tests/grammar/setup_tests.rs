use indoc::indoc;

use crate::parser::ast::{ClauseKind, SetupBody};
use crate::parser::parse_strict;
use crate::parser::tests::outline;

#[test]
fn setup_forms() {
    let input = indoc! {r#"
    setup `CREATE (:User)`
    teardown `MATCH (n) DETACH DELETE n`
    Users {
        setup fixtures.users(3, admin: true)
        teardown {
            `MATCH (n) DETACH DELETE n`
            cleanup()
        }
        test "a" {}
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      SetupClause setup inline
      SetupClause teardown inline
      Scope Users
        SetupClause setup call
          SetupCall fixtures.users(3, admin: true)
        SetupClause teardown block
          SetupItem inline
          SetupItem call
            SetupCall cleanup()
        Test "a"
    "#);

    let suite = parse_strict(input).unwrap();
    let setup = suite.setup.as_ref().unwrap();
    assert_eq!(setup.kind, ClauseKind::Setup);
    assert_eq!(setup.body, SetupBody::Inline("CREATE (:User)".to_string()));
}

#[test]
fn call_arguments() {
    let input = indoc! {r#"
    Users {
        test "a" {
            setup seed(users: [1, 2], opts: {fast: true}, "plain")
        }
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        Test "a"
          SetupClause setup call
            SetupCall seed(users: [1, 2], opts: {fast: true}, "plain")
    "#);
}

#[test]
fn call_needs_parentheses() {
    let input = indoc! {r#"
    Users {
        setup fixtures.users
        test "a" {}
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        SetupClause setup call (recovered)
          SetupCall fixtures.users() (recovered)
        Test "a"
    ---
    Q0020 at 3:5-3:9: expected `(` to start the arguments, found `test`
    "#);
}

#[test]
fn missing_body() {
    let input = indoc! {r#"
    Users {
        setup
        test "a" {}
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        SetupClause setup missing (recovered)
        Test "a"
    ---
    Q0013 at 3:5-3:9: expected a backtick body, a call or `{`, found `test`
    "#);
}

#[test]
fn unparseable_body() {
    let input = indoc! {r#"
    setup 42
    query A `x`
    "#};

    insta::assert_snapshot!(outline(input), @r"
    Suite
      Query A
      SetupClause setup missing (recovered; skipped 42)
    ---
    Q0013 at 1:7-1:9: expected a backtick body, a call or `{`, found number
    Q0021 at 2:1-2:12: `query` after setup or scopes is not allowed here
    ");
}

#[test]
fn garbage_in_block() {
    let input = indoc! {r#"
    setup {
        `a`
        42
        b()
    }
    "#};

    insta::assert_snapshot!(outline(input), @r"
    Suite
      SetupClause setup block (recovered; skipped 42 b ( ))
        SetupItem inline
    ---
    Q0013 at 3:5-3:7: expected a backtick body, a call or `}`, found number
    ");
}

#[test]
fn broken_call_in_block() {
    let input = indoc! {r#"
    setup {
        fixtures.users(1
        `b`
    }
    "#};

    insta::assert_snapshot!(outline(input), @r"
    Suite
      SetupClause setup block
        SetupItem call
          SetupCall fixtures.users() (recovered; skipped 1 `b`)
    ---
    Q0020 at 3:5-3:8: expected `,` or `)`, found raw string
    ");
}

#[test]
fn unclosed_arguments() {
    let input = indoc! {r#"
    Users {
        setup fixtures.users(1,
        test "t" {}
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        SetupClause setup call (recovered)
          SetupCall fixtures.users() (recovered; skipped 1 ,)
        Test "t"
    ---
    Q0003 at 2:25-2:26: missing closing `)` for call arguments
    "#);
}
