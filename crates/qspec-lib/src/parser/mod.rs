//! Parser infrastructure for the test language.
//!
//! # Architecture
//!
//! Source text goes through three stages, all inside [`parse`]:
//!
//! 1. [`lexer::lex`] produces every token (whitespace and comments included)
//!    plus a side list of comments. Each call builds a fresh lexer.
//! 2. The grammar walks the tokens and builds a [`Suite`] of plain data
//!    nodes. Each node records its span and the range of tokens it owns.
//! 3. [`attach_comments`](crate::trivia::attach_comments) assigns the side
//!    list of comments to nodes.
//!
//! # Recovery Strategy
//!
//! In [`ParseMode::Recovering`] the parser always produces a tree:
//!
//! 1. Productions never report. A failed production hands its error to the
//!    nearest recovery point (top level, block bodies, setup clauses).
//! 2. The recovery point reports it and applies exactly one strategy:
//!    setup/call recovery, delimiter-aware synchronisation or a single
//!    token skip. Each strategy proves in its return type that it either
//!    moved the cursor or stopped on a boundary.
//! 3. Nodes built or completed by recovery are flagged, and the tokens
//!    thrown away are kept on the enclosing node.
//!
//! Lex errors, the diagnostic budget and the nesting limit abort the parse
//! outright; declarations completed before the abort are still returned.

pub mod ast;
pub mod lexer;
pub mod literals;
pub mod node;
pub mod printer;
pub mod token;

mod core;
mod grammar;
mod invariants;
mod options;
mod recovery;

#[cfg(test)]
mod node_tests;
#[cfg(test)]
mod tests;

pub use ast::{
    Assert, AssertExpr, AssertQuery, AssertTarget, BinaryOp, ClauseKind, Expr, ExprKind, Group,
    Import, Item, MapEntry, NodeMeta, Number, Param, Query, Recovery, Scope, SetupBody, SetupCall,
    SetupClause, SetupItem, SetupStep, Statement, Suite, Test, TokenRange, UnaryOp, Value,
    ValueKind,
};
pub use core::SyntaxError;
pub use lexer::{LexError, Lexed, Lexer, lex};
pub use literals::NumberValue;
pub use node::NodeRef;
pub use options::{ParseMode, ParseOptions};
pub use printer::SuitePrinter;
pub use token::{Token, TokenKind, Trivia};

use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::trivia::attach_comments;
use crate::{Error, Result};
use core::Parser;

/// Outcome of a parse.
///
/// The suite is always present. When `error` is set the parse stopped early
/// and the suite holds only what was completed before that point.
#[derive(Debug, Clone)]
pub struct Parse {
    suite: Suite,
    diagnostics: Diagnostics,
    error: Option<Error>,
}

impl Parse {
    pub fn suite(&self) -> &Suite {
        &self.suite
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Why the parse stopped early, if it did.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// No diagnostics and no abort.
    pub fn is_valid(&self) -> bool {
        self.error.is_none() && self.diagnostics.is_empty()
    }

    /// The suite and its diagnostics, unless the parse aborted.
    pub fn into_result(self) -> Result<(Suite, Diagnostics)> {
        match self.error {
            Some(err) => Err(err),
            None => Ok((self.suite, self.diagnostics)),
        }
    }

    pub fn into_parts(self) -> (Suite, Diagnostics, Option<Error>) {
        (self.suite, self.diagnostics, self.error)
    }
}

/// Main entry point.
pub fn parse(source: &str, options: &ParseOptions) -> Parse {
    debug!(len = source.len(), mode = ?options.mode, "parse");

    let mut lexed = lex(source);
    let trivia = std::mem::take(&mut lexed.trivia);

    let mut parser = Parser::new(lexed, *options);
    let (mut suite, error) = parser.parse_suite();
    let (tokens, diagnostics) = parser.into_parts();

    suite.tokens = tokens;
    attach_comments(&mut suite, &trivia);

    debug!(
        diagnostics = diagnostics.len(),
        aborted = error.is_some(),
        "parse finished"
    );
    Parse {
        suite,
        diagnostics,
        error,
    }
}

/// Stops at the first lex or grammar error.
pub fn parse_strict(source: &str) -> Result<Suite> {
    let (suite, _, error) = parse(source, &ParseOptions::strict()).into_parts();
    match error {
        Some(err) => Err(err),
        None => Ok(suite),
    }
}

/// Recovers from grammar errors with the default diagnostic budget.
pub fn parse_recovering(source: &str) -> Parse {
    parse(source, &ParseOptions::recovering())
}
