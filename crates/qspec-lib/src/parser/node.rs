//! Closed view over every node kind.
//!
//! [`NodeRef`] is what position queries hand back. Matching on it is
//! exhaustive, so adding a node kind forces every consumer to handle it.

use qspec_core::Span;

use super::ast::{
    Assert, AssertExpr, AssertQuery, AssertTarget, Group, Import, Item, NodeMeta, Query, Scope,
    SetupBody, SetupCall, SetupClause, SetupItem, SetupStep, Statement, Suite, Test,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Suite(&'a Suite),
    Import(&'a Import),
    Query(&'a Query),
    Scope(&'a Scope),
    Group(&'a Group),
    Test(&'a Test),
    SetupClause(&'a SetupClause),
    SetupItem(&'a SetupItem),
    SetupCall(&'a SetupCall),
    Statement(&'a Statement),
    Assert(&'a Assert),
    AssertQuery(&'a AssertQuery),
    AssertExpr(&'a AssertExpr),
}

impl<'a> NodeRef<'a> {
    pub fn meta(self) -> &'a NodeMeta {
        match self {
            NodeRef::Suite(n) => &n.meta,
            NodeRef::Import(n) => &n.meta,
            NodeRef::Query(n) => &n.meta,
            NodeRef::Scope(n) => &n.meta,
            NodeRef::Group(n) => &n.meta,
            NodeRef::Test(n) => &n.meta,
            NodeRef::SetupClause(n) => &n.meta,
            NodeRef::SetupItem(n) => &n.meta,
            NodeRef::SetupCall(n) => &n.meta,
            NodeRef::Statement(n) => &n.meta,
            NodeRef::Assert(n) => &n.meta,
            NodeRef::AssertQuery(n) => &n.meta,
            NodeRef::AssertExpr(n) => &n.meta,
        }
    }

    pub fn span(self) -> Span {
        self.meta().span
    }

    pub fn is_recovered(self) -> bool {
        self.meta().is_recovered()
    }

    pub fn kind_name(self) -> &'static str {
        match self {
            NodeRef::Suite(_) => "Suite",
            NodeRef::Import(_) => "Import",
            NodeRef::Query(_) => "Query",
            NodeRef::Scope(_) => "Scope",
            NodeRef::Group(_) => "Group",
            NodeRef::Test(_) => "Test",
            NodeRef::SetupClause(_) => "SetupClause",
            NodeRef::SetupItem(_) => "SetupItem",
            NodeRef::SetupCall(_) => "SetupCall",
            NodeRef::Statement(_) => "Statement",
            NodeRef::Assert(_) => "Assert",
            NodeRef::AssertQuery(_) => "AssertQuery",
            NodeRef::AssertExpr(_) => "AssertExpr",
        }
    }

    /// Direct children, in the order position queries should visit them.
    pub fn children(self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        match self {
            NodeRef::Suite(suite) => {
                out.extend(suite.imports.iter().map(NodeRef::Import));
                out.extend(suite.queries.iter().map(NodeRef::Query));
                out.extend(suite.setup.iter().map(NodeRef::SetupClause));
                out.extend(suite.teardown.iter().map(NodeRef::SetupClause));
                out.extend(suite.scopes.iter().map(NodeRef::Scope));
            }
            NodeRef::Scope(scope) => {
                out.extend(scope.setup.iter().map(NodeRef::SetupClause));
                out.extend(scope.teardown.iter().map(NodeRef::SetupClause));
                out.extend(scope.items.iter().map(NodeRef::from));
            }
            NodeRef::Group(group) => {
                out.extend(group.setup.iter().map(NodeRef::SetupClause));
                out.extend(group.teardown.iter().map(NodeRef::SetupClause));
                out.extend(group.items.iter().map(NodeRef::from));
            }
            NodeRef::Test(test) => {
                out.extend(test.setup.iter().map(NodeRef::SetupClause));
                out.extend(test.statements.iter().map(NodeRef::Statement));
                out.extend(test.asserts.iter().map(NodeRef::Assert));
            }
            NodeRef::SetupClause(clause) => match &clause.body {
                SetupBody::Call(call) => out.push(NodeRef::SetupCall(call)),
                SetupBody::Block(items) => out.extend(items.iter().map(NodeRef::SetupItem)),
                SetupBody::Inline(_) | SetupBody::Missing => {}
            },
            NodeRef::SetupItem(item) => {
                if let SetupStep::Call(call) = &item.step {
                    out.push(NodeRef::SetupCall(call));
                }
            }
            NodeRef::Assert(assert) => {
                out.extend(assert.query.iter().map(NodeRef::AssertQuery));
                out.extend(assert.exprs.iter().map(NodeRef::AssertExpr));
            }
            NodeRef::AssertQuery(query) => {
                if let AssertTarget::Call(call) = &query.target {
                    out.push(NodeRef::SetupCall(call));
                }
            }
            NodeRef::Import(_)
            | NodeRef::Query(_)
            | NodeRef::SetupCall(_)
            | NodeRef::Statement(_)
            | NodeRef::AssertExpr(_) => {}
        }
        out
    }

    /// Pre-order walk in source order. Ancestors come before descendants
    /// that start at the same position.
    pub fn descendants(self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        collect_preorder(self, &mut out);
        out.sort_by_key(|node| node.span().start.offset);
        out
    }
}

fn collect_preorder<'a>(node: NodeRef<'a>, out: &mut Vec<NodeRef<'a>>) {
    out.push(node);
    for child in node.children() {
        collect_preorder(child, out);
    }
}

impl<'a> From<&'a Item> for NodeRef<'a> {
    fn from(item: &'a Item) -> Self {
        match item {
            Item::Test(test) => NodeRef::Test(test),
            Item::Group(group) => NodeRef::Group(group),
        }
    }
}

impl<'a> From<&'a Suite> for NodeRef<'a> {
    fn from(suite: &'a Suite) -> Self {
        NodeRef::Suite(suite)
    }
}

impl Suite {
    pub fn as_node(&self) -> NodeRef<'_> {
        NodeRef::Suite(self)
    }

    /// Mutable access to the metadata of every node below the root, in
    /// source order (ancestors first on ties).
    pub(crate) fn metas_mut(&mut self) -> Vec<&mut NodeMeta> {
        let Suite {
            imports,
            queries,
            setup,
            teardown,
            scopes,
            ..
        } = self;

        let mut out: Vec<&mut NodeMeta> = Vec::new();
        out.extend(imports.iter_mut().map(|n| &mut n.meta));
        out.extend(queries.iter_mut().map(|n| &mut n.meta));
        for clause in setup.iter_mut().chain(teardown.iter_mut()) {
            clause_metas(clause, &mut out);
        }
        for scope in scopes {
            let Scope {
                meta,
                setup,
                teardown,
                items,
                ..
            } = scope;
            out.push(meta);
            for clause in setup.iter_mut().chain(teardown.iter_mut()) {
                clause_metas(clause, &mut out);
            }
            item_metas(items, &mut out);
        }
        out.sort_by_key(|meta| meta.span.start.offset);
        out
    }
}

fn item_metas<'a>(items: &'a mut [Item], out: &mut Vec<&'a mut NodeMeta>) {
    for item in items {
        match item {
            Item::Group(group) => {
                let Group {
                    meta,
                    setup,
                    teardown,
                    items,
                    ..
                } = group;
                out.push(meta);
                for clause in setup.iter_mut().chain(teardown.iter_mut()) {
                    clause_metas(clause, out);
                }
                item_metas(items, out);
            }
            Item::Test(test) => {
                let Test {
                    meta,
                    setup,
                    statements,
                    asserts,
                    ..
                } = test;
                out.push(meta);
                for clause in setup.iter_mut() {
                    clause_metas(clause, out);
                }
                out.extend(statements.iter_mut().map(|n| &mut n.meta));
                for assert in asserts {
                    let Assert { meta, query, exprs } = assert;
                    out.push(meta);
                    if let Some(AssertQuery { meta, target }) = query {
                        out.push(meta);
                        if let AssertTarget::Call(call) = target {
                            out.push(&mut call.meta);
                        }
                    }
                    out.extend(exprs.iter_mut().map(|n| &mut n.meta));
                }
            }
        }
    }
}

fn clause_metas<'a>(clause: &'a mut SetupClause, out: &mut Vec<&'a mut NodeMeta>) {
    let SetupClause { meta, body, .. } = clause;
    out.push(meta);
    match body {
        SetupBody::Call(call) => out.push(&mut call.meta),
        SetupBody::Block(items) => {
            for SetupItem { meta, step } in items {
                out.push(meta);
                if let SetupStep::Call(call) = step {
                    out.push(&mut call.meta);
                }
            }
        }
        SetupBody::Inline(_) | SetupBody::Missing => {}
    }
}

/// Read-only pre-order over a suite's calls, for callers that only need them.
pub fn calls(suite: &Suite) -> Vec<&SetupCall> {
    suite
        .as_node()
        .descendants()
        .into_iter()
        .filter_map(|node| match node {
            NodeRef::SetupCall(call) => Some(call),
            _ => None,
        })
        .collect()
}
