use crate::Error;
use crate::parser::{ParseOptions, parse};

#[test]
fn diagnostic_budget() {
    let options = ParseOptions::recovering().with_max_diagnostics(2);
    let parse = parse("} } }", &options);

    assert_eq!(parse.error(), Some(&Error::TooManyErrors { limit: 2 }));
    assert_eq!(parse.diagnostics().len(), 2);
}

#[test]
fn budget_not_reached() {
    let options = ParseOptions::recovering().with_max_diagnostics(3);
    let parse = parse("} } }", &options);

    assert!(parse.error().is_none());
    assert_eq!(parse.diagnostics().len(), 3);
}

#[test]
fn strict_mode_stops_at_first_error() {
    let parse = parse("} } }", &ParseOptions::strict());

    let Some(Error::Syntax(err)) = parse.error() else {
        panic!("expected a syntax error, got {:?}", parse.error());
    };
    assert_eq!(err.message, "expected a declaration, found `}`");
    assert_eq!(parse.diagnostics().len(), 1);
}

#[test]
fn deeply_nested_value() {
    let options = ParseOptions::recovering().with_max_depth(8);
    let value = format!("{}1{}", "[".repeat(10), "]".repeat(10));
    let source = format!("Q {{ test \"t\" {{ a: {value} }} }}");

    let parse = parse(&source, &options);
    assert_eq!(parse.error(), Some(&Error::RecursionLimitExceeded));
    assert!(parse.suite().scopes.is_empty());

    let shallow = format!("Q {{ test \"t\" {{ a: {} }} }}", "[[1]]");
    assert!(parse_ok(&shallow, &options));
}

#[test]
fn deeply_nested_groups() {
    let options = ParseOptions::recovering().with_max_depth(8);
    let nested = |depth: usize| {
        format!(
            "Q {{ {} test \"t\" {{}} {} }}",
            "group \"g\" {".repeat(depth),
            "}".repeat(depth)
        )
    };

    assert!(parse_ok(&nested(4), &options));

    let parse = parse(&nested(12), &options);
    assert_eq!(parse.error(), Some(&Error::RecursionLimitExceeded));
}

#[test]
fn deeply_nested_expression() {
    let options = ParseOptions::recovering().with_max_depth(16);
    let source = format!(
        "Q {{ test \"t\" {{ assert {{ {}x{} }} }} }}",
        "(".repeat(20),
        ")".repeat(20)
    );

    let parse = parse(&source, &options);
    assert_eq!(parse.error(), Some(&Error::RecursionLimitExceeded));
}

#[test]
fn default_limits() {
    let options = ParseOptions::default();
    assert_eq!(options.max_depth, ParseOptions::DEFAULT_MAX_DEPTH);
    assert_eq!(options.max_diagnostics, ParseOptions::DEFAULT_MAX_DIAGNOSTICS);
}

fn parse_ok(source: &str, options: &ParseOptions) -> bool {
    parse(source, options).is_valid()
}
