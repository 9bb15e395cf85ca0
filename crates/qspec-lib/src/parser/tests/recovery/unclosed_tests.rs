use indoc::indoc;

use crate::parser::tests::outline;

#[test]
fn scope_interrupted_by_query() {
    let input = indoc! {r#"
    Users {
        test "a" {}
    query B `y`
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Query B
      Scope Users (recovered; skipped {)
        Test "a"
    ---
    Q0002 at 1:7-1:8: missing closing `}` for scope `Users`
    Q0021 at 3:1-3:12: `query` after setup or scopes is not allowed here
    "#);
}

#[test]
fn test_interrupted_by_next_test() {
    let input = indoc! {r#"
    Users {
        test "a" {
            $id: 1
        test "b" {}
    }
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users
        Test "a" (recovered; skipped {)
          Statement $id: 1
        Test "b"
    ---
    Q0002 at 2:14-2:15: missing closing `}` for test "a"
    "#);
}

#[test]
fn nested_group_at_end_of_input() {
    let input = indoc! {r#"
    Users {
        group "g" {
            test "a" {}
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Scope Users (recovered; skipped {)
        Group "g" (recovered; skipped {)
          Test "a"
    ---
    Q0002 at 1:7-1:8: missing closing `}` for scope `Users`
    Q0002 at 2:15-2:16: missing closing `}` for group "g"
    "#);
}

#[test]
fn setup_block_interrupted_by_keyword() {
    let input = indoc! {r#"
    setup {
        `a`
    teardown `b`
    "#};

    insta::assert_snapshot!(outline(input), @r"
    Suite
      SetupClause setup block (recovered; skipped {)
        SetupItem inline
      SetupClause teardown inline
    ---
    Q0002 at 1:7-1:8: missing closing `}` for `setup` block
    ");
}

#[test]
fn scope_without_brace() {
    let input = indoc! {r#"
    Users
    query A `x`
    "#};

    insta::assert_snapshot!(outline(input), @r"
    Suite (recovered; skipped Users)
      Query A
    ---
    Q0020 at 2:1-2:6: expected `{` after the scope name, found `query`
    ");
}
