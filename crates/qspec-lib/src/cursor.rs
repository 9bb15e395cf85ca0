//! Position queries over a parsed suite.
//!
//! All queries take a 1-based [`LineCol`]. Editor coordinates are 0-based
//! and must go through [`LineCol::from_zero_based`] first.
//!
//! Tokens are matched half-open (`start <= at < end`). Nodes are matched
//! with the end included, so a cursor right after `fixtures.` still sits in
//! the setup clause being typed.

use qspec_core::LineCol;

use crate::parser::ast::Suite;
use crate::parser::node::NodeRef;
use crate::parser::token::{Token, TokenKind};

/// Everything a completion or hover provider needs to know about a cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CursorContext<'a> {
    /// Token under the cursor, trivia included.
    pub token: Option<&'a Token>,
    /// Closest non-trivia token ending at or before the cursor.
    pub previous_token: Option<&'a Token>,
    /// Deepest node containing the cursor.
    pub node: Option<NodeRef<'a>>,
    pub in_setup: bool,
    pub in_test: bool,
    pub in_group: bool,
    pub in_assert: bool,
    /// Name of the enclosing query scope.
    pub scope: Option<&'a str>,
}

/// The token whose half-open span contains `at`.
pub fn token_at(suite: &Suite, at: LineCol) -> Option<&Token> {
    suite
        .tokens
        .iter()
        .filter(|token| token.kind != TokenKind::Eof)
        .find(|token| token.span().contains(at))
}

/// The non-trivia token with the latest end at or before `at`.
pub fn previous_token(suite: &Suite, at: LineCol) -> Option<&Token> {
    suite
        .tokens
        .iter()
        .filter(|token| !token.is_trivia() && token.kind != TokenKind::Eof)
        .filter(|token| token.end().line_col() <= at)
        .max_by_key(|token| token.end().offset)
}

/// The deepest node whose span contains `at`, end included.
pub fn node_at(suite: &Suite, at: LineCol) -> Option<NodeRef<'_>> {
    path_at(suite, at).pop()
}

/// Nodes containing `at`, from the suite down to the deepest one.
///
/// At each level the first child in [`NodeRef::children`] order wins, so
/// clauses are preferred over items and statements over assertions.
pub fn path_at(suite: &Suite, at: LineCol) -> Vec<NodeRef<'_>> {
    let mut path = Vec::new();
    let root = suite.as_node();
    if !root.span().touches(at) {
        return path;
    }
    let mut current = root;
    loop {
        path.push(current);
        match current
            .children()
            .into_iter()
            .find(|child| child.span().touches(at))
        {
            Some(child) => current = child,
            None => return path,
        }
    }
}

pub fn context_at(suite: &Suite, at: LineCol) -> CursorContext<'_> {
    let path = path_at(suite, at);
    let mut context = CursorContext {
        token: token_at(suite, at),
        previous_token: previous_token(suite, at),
        node: path.last().copied(),
        ..CursorContext::default()
    };
    for node in path {
        match node {
            NodeRef::Scope(scope) => context.scope = Some(&scope.name),
            NodeRef::Group(_) => context.in_group = true,
            NodeRef::Test(_) => context.in_test = true,
            NodeRef::SetupClause(_) => context.in_setup = true,
            NodeRef::Assert(_) => context.in_assert = true,
            _ => {}
        }
    }
    context
}
