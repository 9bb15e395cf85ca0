//! Syntax tree for test suites.
//!
//! Nodes are plain owned data. Every node embeds a [`NodeMeta`] with its
//! span, the range of suite tokens it was built from, attached comments, and
//! recovery information when error recovery synthesized (part of) it.
//!
//! A node whose [`NodeMeta::is_recovered`] is true may have empty or partial
//! fields (for example a setup call without a callee name). Consumers must
//! check the flag before treating such a node as meaningful.

use qspec_core::Span;
use serde::Serialize;

use super::literals::NumberValue;
use super::token::{Token, Trivia};

/// Half-open index range into [`Suite::tokens`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TokenRange {
    pub start: usize,
    pub end: usize,
}

impl TokenRange {
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "TokenRange: start {start} after end {end}");
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn contains_range(&self, other: &TokenRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &TokenRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Where and what error recovery had to make up.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Recovery {
    /// Region of source the recovery covered.
    pub span: Span,
    /// Tokens discarded while resynchronizing. Kept for rendering only.
    pub skipped: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NodeMeta {
    pub span: Span,
    pub tokens: TokenRange,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<Trivia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_comment: Option<Trivia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery: Option<Recovery>,
}

impl NodeMeta {
    pub fn new(span: Span, tokens: TokenRange) -> Self {
        Self {
            span,
            tokens,
            ..Self::default()
        }
    }

    pub fn is_recovered(&self) -> bool {
        self.recovery.is_some()
    }

    pub fn skipped(&self) -> &[Token] {
        self.recovery.as_ref().map_or(&[], |r| &r.skipped)
    }

    /// Flags the node as recovered, widening the recovered region to `span`.
    pub fn mark_recovered(&mut self, span: Span) {
        match &mut self.recovery {
            Some(recovery) => recovery.span = recovery.span.cover(span),
            None => {
                self.recovery = Some(Recovery {
                    span,
                    skipped: Vec::new(),
                })
            }
        }
    }

    /// Records discarded tokens and flags the node as recovered.
    pub fn record_skipped(&mut self, tokens: Vec<Token>) {
        let Some(span) = span_of_tokens(&tokens) else {
            return;
        };
        self.mark_recovered(span);
        if let Some(recovery) = &mut self.recovery {
            recovery.skipped.extend(tokens);
        }
    }

    pub(crate) fn clear_comments(&mut self) {
        self.leading_comments.clear();
        self.trailing_comment = None;
    }
}

pub(crate) fn span_of_tokens(tokens: &[Token]) -> Option<Span> {
    let first = tokens.first()?;
    let last = tokens.last()?;
    Some(Span::new(first.start, last.end()))
}

/// Root of a parsed document.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Suite {
    pub meta: NodeMeta,
    pub imports: Vec<Import>,
    pub queries: Vec<Query>,
    pub setup: Option<SetupClause>,
    pub teardown: Option<SetupClause>,
    pub scopes: Vec<Scope>,
    /// Every token of the document, whitespace and comments included.
    #[serde(skip)]
    pub tokens: Vec<Token>,
    /// Comments that belong to no node (separated by blank lines, or dangling
    /// before a closing brace).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub detached_comments: Vec<Trivia>,
}

impl Suite {
    /// The tokens `meta`'s node was built from, including interior trivia.
    pub fn tokens_of(&self, meta: &NodeMeta) -> &[Token] {
        let end = meta.tokens.end.min(self.tokens.len());
        let start = meta.tokens.start.min(end);
        &self.tokens[start..end]
    }

    pub fn query(&self, name: &str) -> Option<&Query> {
        self.queries.iter().find(|q| q.name == name)
    }

    pub fn scope(&self, name: &str) -> Option<&Scope> {
        self.scopes.iter().find(|s| s.name == name)
    }
}

/// `import [alias] "path"`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Import {
    pub meta: NodeMeta,
    pub alias: Option<String>,
    pub path: String,
}

/// ``query Name `body` ``
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub meta: NodeMeta,
    pub name: String,
    pub body: String,
}

/// `Name { ... }`: tests bound to the query declared as `Name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scope {
    pub meta: NodeMeta,
    pub name: String,
    pub setup: Option<SetupClause>,
    pub teardown: Option<SetupClause>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Item {
    Test(Test),
    Group(Group),
}

impl Item {
    pub fn meta(&self) -> &NodeMeta {
        match self {
            Item::Test(test) => &test.meta,
            Item::Group(group) => &group.meta,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Item::Test(test) => &test.name,
            Item::Group(group) => &group.name,
        }
    }
}

/// `group "name" { ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub meta: NodeMeta,
    pub name: String,
    pub setup: Option<SetupClause>,
    pub teardown: Option<SetupClause>,
    pub items: Vec<Item>,
}

/// `test "name" { ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Test {
    pub meta: NodeMeta,
    pub name: String,
    pub setup: Option<SetupClause>,
    pub statements: Vec<Statement>,
    pub asserts: Vec<Assert>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClauseKind {
    Setup,
    Teardown,
}

impl ClauseKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ClauseKind::Setup => "setup",
            ClauseKind::Teardown => "teardown",
        }
    }
}

/// `setup <body>` or `teardown <body>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupClause {
    pub meta: NodeMeta,
    pub kind: ClauseKind,
    pub body: SetupBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SetupBody {
    /// `` `CREATE (:User)` ``
    Inline(String),
    /// `fixtures.users(3)`
    Call(SetupCall),
    /// `{ ... }` of inline bodies and calls.
    Block(Vec<SetupItem>),
    /// Synthesized by recovery: the body could not be read.
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupItem {
    pub meta: NodeMeta,
    pub step: SetupStep,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SetupStep {
    Inline(String),
    Call(SetupCall),
}

/// `[module.]name(params...)`
///
/// A recovered call may have an empty `name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupCall {
    pub meta: NodeMeta,
    pub module: Option<String>,
    pub name: String,
    pub params: Vec<Param>,
}

/// `value` or `name: value` inside a call's parentheses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub span: Span,
    pub name: Option<String>,
    pub value: Value,
}

/// `assert [query] { expr; ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assert {
    pub meta: NodeMeta,
    pub query: Option<AssertQuery>,
    pub exprs: Vec<AssertExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssertQuery {
    pub meta: NodeMeta,
    pub target: AssertTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AssertTarget {
    /// `` assert `MATCH (n) RETURN count(n) AS c` { ... } ``
    Inline(String),
    /// `assert OtherQuery($id: 1) { ... }`
    Call(SetupCall),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssertExpr {
    pub meta: NodeMeta,
    pub expr: Expr,
}

/// `$param: value` or `field.path: value`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub meta: NodeMeta,
    pub key: String,
    pub value: Value,
}

impl Statement {
    pub fn is_param(&self) -> bool {
        self.key.starts_with('$')
    }

    pub fn path(&self) -> impl Iterator<Item = &str> {
        self.key.split('.')
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Value {
    pub span: Span,
    pub kind: ValueKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ValueKind {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Map(Vec<MapEntry>),
    List(Vec<Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Number {
    /// Source text, sign and separators included.
    pub text: String,
    pub value: NumberValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapEntry {
    pub span: Span,
    pub key: String,
    pub value: Value,
}

/// Assertion expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    Literal(Value),
    Name(String),
    Member { object: Box<Expr>, field: String },
    Index { object: Box<Expr>, index: Box<Expr> },
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary { op: BinaryOp, lhs: Box<Expr>, rhs: Box<Expr> },
    List(Vec<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Match,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Match => "=~",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}
