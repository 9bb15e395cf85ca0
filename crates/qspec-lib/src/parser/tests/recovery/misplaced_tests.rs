use indoc::indoc;

use crate::parser::tests::outline;

#[test]
fn teardown_inside_test() {
    let input = indoc! {r#"
    Users {
        test "t" {
            teardown `x`
            $id: 1
        }
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        Test "t" (recovered; skipped teardown `x`)
          Statement $id: 1
    ---
    Q0021 at 3:9-3:21: `teardown` inside a test is not allowed here
    "#);
}

#[test]
fn duplicate_setup() {
    let input = indoc! {r#"
    Users {
        setup `a`
        setup `b`
        test "t" {}
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users (recovered; skipped setup `b`)
        SetupClause setup inline
        Test "t"
    ---
    Q0022 at 3:5-3:14: duplicate `setup` clause (related: first `setup` clause here at 2:5-2:14)
    "#);
}

#[test]
fn setup_after_tests() {
    let input = indoc! {r#"
    Users {
        test "t" {}
        setup `a`
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        SetupClause setup inline
        Test "t"
    ---
    Q0021 at 3:5-3:14: `setup` after tests is not allowed here
    "#);
}

#[test]
fn statement_after_assert() {
    let input = indoc! {r#"
    Users {
        test "t" {
            assert { ok }
            $id: 1
        }
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        Test "t"
          Statement $id: 1
          Assert
            AssertExpr ok
    ---
    Q0021 at 4:9-4:15: a statement after `assert` is not allowed here
    "#);
}

#[test]
fn test_outside_scope() {
    let input = indoc! {r#"
    test "x" { }
    query A `x`
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite (recovered; skipped test "x" { })
      Query A
    ---
    Q0021 at 1:1-1:13: `test` outside of a query scope is not allowed here
    "#);
}

#[test]
fn assert_outside_test() {
    let input = indoc! {r#"
    Users {
        assert { ok }
        test "t" {}
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users (recovered; skipped assert { ok })
        Test "t"
    ---
    Q0021 at 2:5-2:18: `assert` outside of a test is not allowed here
    "#);
}
