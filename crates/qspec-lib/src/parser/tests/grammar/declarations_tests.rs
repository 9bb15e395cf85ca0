use indoc::indoc;

use crate::parser::tests::outline;
use crate::parser::{ParseOptions, parse, parse_strict};

#[test]
fn query_declaration() {
    let parse = parse("query Q `MATCH (n) RETURN n`", &ParseOptions::default());
    assert!(parse.is_valid());

    let suite = parse.suite();
    assert_eq!(suite.queries.len(), 1);
    assert_eq!(suite.queries[0].name, "Q");
    assert_eq!(suite.queries[0].body, "MATCH (n) RETURN n");
    assert_eq!(suite.query("Q"), Some(&suite.queries[0]));
    assert!(suite.query("R").is_none());
}

#[test]
fn multiline_query_body() {
    let input = indoc! {r#"
    query Users `
        MATCH (u:User)
        RETURN u
    `
    "#};
    let suite = parse_strict(input).unwrap();
    assert_eq!(
        suite.queries[0].body,
        "\n    MATCH (u:User)\n    RETURN u\n"
    );
}

#[test]
fn imports() {
    let input = indoc! {r#"
    import "lib/common.qs"
    import fx "fixtures.qs"
    query A `x`
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Import "lib/common.qs"
      Import fx "fixtures.qs"
      Query A
    "#);

    let suite = parse_strict(input).unwrap();
    assert_eq!(suite.imports[1].alias.as_deref(), Some("fx"));
    assert_eq!(suite.imports[1].path, "fixtures.qs");
}

#[test]
fn empty_document() {
    let suite = parse_strict("").unwrap();
    assert!(suite.imports.is_empty());
    assert!(suite.queries.is_empty());
    assert!(suite.scopes.is_empty());
    assert!(suite.meta.span.is_empty());
}

#[test]
fn only_comments() {
    insta::assert_snapshot!(outline("// nothing here\n"), @"Suite");
}

#[test]
fn import_after_query_is_kept() {
    let input = indoc! {r#"
    query A `x`
    import "late.qs"
    "#};

    insta::assert_snapshot!(outline(input), @r#"
    Suite
      Import "late.qs"
      Query A
    ---
    Q0021 at 2:1-2:17: `import` after other declarations is not allowed here
    "#);
}

#[test]
fn query_without_body() {
    let input = indoc! {r#"
    query A
    query B `y`
    "#};

    insta::assert_snapshot!(outline(input), @r"
    Suite (recovered; skipped query A)
      Query B
    ---
    Q0012 at 2:1-2:6: expected a backtick query body, found `query`
    ");
}

#[test]
fn stray_closing_brace() {
    let input = indoc! {r#"
    }
    query A `x`
    "#};

    insta::assert_snapshot!(outline(input), @r"
    Suite (recovered; skipped })
      Query A
    ---
    Q0020 at 1:1-1:2: expected a declaration, found `}`
    ");
}
