use indoc::indoc;

use super::node::{NodeRef, calls};
use super::{Suite, parse_strict};

fn fixture() -> Suite {
    let input = indoc! {r#"
    setup fixtures.users(2)
    Users {
        teardown cleanup()
        test "a" {
            setup `CREATE (n)`
            $id: 1
            assert Users($id: 1) { rows.length == 1 }
        }
    }
    "#};
    parse_strict(input).unwrap()
}

#[test]
fn outline() {
    insta::assert_snapshot!(fixture().printer().dump(), @r#"
    Suite
      SetupClause setup call
        SetupCall fixtures.users(2)
      Scope Users
        SetupClause teardown call
          SetupCall cleanup()
        Test "a"
          SetupClause setup inline
          Statement $id: 1
          Assert
            AssertQuery call
              SetupCall Users($id: 1)
            AssertExpr (== (. rows length) 1)
    "#);
}

#[test]
fn outline_with_spans() {
    let suite = parse_strict("query Q `x`").unwrap();
    insta::assert_snapshot!(suite.printer().with_spans(true).dump(), @r"
    Suite [1:1-1:12]
      Query [1:1-1:12] Q
    ");
}

#[test]
fn descendants_in_source_order() {
    let suite = fixture();
    let kinds: Vec<&str> = suite
        .as_node()
        .descendants()
        .into_iter()
        .map(NodeRef::kind_name)
        .collect();
    assert_eq!(
        kinds,
        vec![
            "Suite",
            "SetupClause",
            "SetupCall",
            "Scope",
            "SetupClause",
            "SetupCall",
            "Test",
            "SetupClause",
            "Statement",
            "Assert",
            "AssertQuery",
            "SetupCall",
            "AssertExpr",
        ]
    );
}

#[test]
fn every_call_is_reachable() {
    let suite = fixture();
    let names: Vec<&str> = calls(&suite).iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["users", "cleanup", "Users"]);
}

#[test]
fn metas_below_the_root() {
    let mut suite = fixture();
    let count = suite.as_node().descendants().len();
    assert_eq!(suite.metas_mut().len(), count - 1);
}

#[test]
fn node_ref_accessors() {
    let suite = fixture();
    let scope = NodeRef::Scope(&suite.scopes[0]);
    assert_eq!(scope.kind_name(), "Scope");
    assert_eq!(scope.span(), suite.scopes[0].meta.span);
    assert!(!scope.is_recovered());
    assert_eq!(scope.children().len(), 2);
    assert_eq!(NodeRef::from(&suite).kind_name(), "Suite");
}
