//! Grammar productions.
//!
//! Productions return `PResult<T>` and never report on their own: a
//! `ParseError::Syntax` travels up to the nearest recovery point, which
//! reports it and applies exactly one recovery strategy. Recovery points are
//! the top-level loop, every block body and every setup clause.

mod asserts;
mod items;
mod setup;
mod values;

use qspec_core::Span;
use tracing::debug;

use super::ast::{ClauseKind, Import, Item, NodeMeta, Query, SetupClause, Suite, TokenRange};
use super::core::{PResult, ParseError, Parser};
use super::literals;
use super::recovery::Recovered;
use super::token::{Token, TokenKind};
use crate::Error;
use crate::diagnostics::DiagnosticKind;

impl Parser {
    /// Parses a whole document.
    ///
    /// On abort the construct in progress is dropped; everything completed
    /// before it stays in the returned suite.
    pub(crate) fn parse_suite(&mut self) -> (Suite, Option<Error>) {
        let mut suite = Suite::default();
        let mut skipped = Vec::new();

        let error = match self.suite_items(&mut suite, &mut skipped) {
            Ok(()) => self.finish_input(),
            Err(ParseError::Abort(err)) => Some(err),
            Err(ParseError::Syntax(err)) => Some(Error::Syntax(err)),
        };
        if let Some(err) = &error {
            debug!(error = %err, "parse aborted");
        }

        let first = self.tokens[0].start;
        let last = self.tokens[self.tokens.len() - 1].end();
        suite.meta = NodeMeta::new(
            Span::new(first, last),
            TokenRange::new(0, self.tokens.len()),
        );
        suite.meta.record_skipped(skipped);
        (suite, error)
    }

    fn suite_items(&mut self, suite: &mut Suite, skipped: &mut Vec<Token>) -> PResult<()> {
        loop {
            let from = self.pos;
            match self.current() {
                TokenKind::Eof => return Ok(()),
                TokenKind::KwImport => {
                    let result = self.import();
                    let Some(import) = self.or_recover(from, result, skipped)? else {
                        continue;
                    };
                    if !suite.queries.is_empty() || has_bodies(suite) {
                        self.misplaced(import.meta.span, "`import` after other declarations")?;
                    }
                    suite.imports.push(import);
                }
                TokenKind::KwQuery => {
                    let result = self.query();
                    let Some(query) = self.or_recover(from, result, skipped)? else {
                        continue;
                    };
                    if has_bodies(suite) {
                        self.misplaced(query.meta.span, "`query` after setup or scopes")?;
                    }
                    suite.queries.push(query);
                }
                TokenKind::KwSetup | TokenKind::KwTeardown => {
                    let clause = self.setup_clause()?;
                    if !suite.scopes.is_empty() {
                        let what = format!("`{}` after scopes", clause.kind.keyword());
                        self.misplaced(clause.meta.span, &what)?;
                    }
                    let slot = match clause.kind {
                        ClauseKind::Setup => &mut suite.setup,
                        ClauseKind::Teardown => &mut suite.teardown,
                    };
                    if let Some(clause) = self.fill_slot(slot, clause)? {
                        skipped.extend(self.consumed_since(clause.meta.tokens.start));
                    }
                }
                TokenKind::Ident => {
                    let result = self.scope();
                    if let Some(scope) = self.or_recover(from, result, skipped)? {
                        suite.scopes.push(scope);
                    }
                }
                TokenKind::KwTest | TokenKind::KwGroup => {
                    let result = self.item();
                    if let Some(item) = self.or_recover(from, result, skipped)? {
                        let keyword = match item {
                            Item::Test(_) => "`test` outside of a query scope",
                            Item::Group(_) => "`group` outside of a query scope",
                        };
                        self.misplaced(item.meta().span, keyword)?;
                        skipped.extend(self.consumed_since(from));
                    }
                }
                TokenKind::KwAssert => {
                    let result = self.assert();
                    if let Some(assert) = self.or_recover(from, result, skipped)? {
                        self.misplaced(assert.meta.span, "`assert` outside of a test")?;
                        skipped.extend(self.consumed_since(from));
                    }
                }
                TokenKind::BraceClose => {
                    let err = self.unexpected(DiagnosticKind::UnexpectedToken, "a declaration");
                    self.report(err)?;
                    skipped.extend(self.skip_token(from).value().unwrap_or_default());
                }
                _ => {
                    let err = self.unexpected(
                        DiagnosticKind::UnexpectedToken,
                        "`import`, `query`, `setup`, `teardown` or a scope name",
                    );
                    self.report(err)?;
                    skipped.extend(self.recover_in_block(from));
                }
            }
        }
    }

    /// `import [alias] "path"`
    fn import(&mut self) -> PResult<Import> {
        self.assert_current(TokenKind::KwImport);
        let start = self.pos;
        self.bump();
        let alias = self.eat(TokenKind::Ident).map(|t| t.text);
        let path = self.expect(
            TokenKind::Str,
            DiagnosticKind::ExpectedString,
            "a quoted import path",
        )?;
        Ok(Import {
            meta: self.meta(start),
            alias,
            path: literals::string_value(&path.text),
        })
    }

    /// ``query Name `body` ``
    fn query(&mut self) -> PResult<Query> {
        self.assert_current(TokenKind::KwQuery);
        let start = self.pos;
        self.bump();
        let name = self.expect(TokenKind::Ident, DiagnosticKind::ExpectedName, "a query name")?;
        let body = self.expect(
            TokenKind::RawString,
            DiagnosticKind::ExpectedQueryBody,
            "a backtick query body",
        )?;
        Ok(Query {
            meta: self.meta(start),
            name: name.text,
            body: literals::raw_string_value(&body.text).to_string(),
        })
    }

    /// Turns a failed production into a reported error plus skipped tokens.
    ///
    /// `from` is where the production started. Tokens it consumed before
    /// failing are skipped along with whatever synchronisation discards.
    pub(super) fn or_recover<T>(
        &mut self,
        from: usize,
        result: PResult<T>,
        skipped: &mut Vec<Token>,
    ) -> PResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(ParseError::Syntax(err)) => {
                self.report(err)?;
                skipped.extend(self.recover_in_block(from));
                Ok(None)
            }
            Err(abort) => Err(abort),
        }
    }

    /// Synchronisation, falling back to a single-token skip.
    pub(super) fn recover_in_block(&mut self, from: usize) -> Vec<Token> {
        match self.synchronize(from) {
            Recovered::Advanced(skipped, progress) => {
                debug!(consumed = progress.consumed(), "recovered");
                skipped
            }
            Recovered::Boundary(skipped, boundary) => {
                debug!(at = ?boundary.kind(), "recovered at boundary");
                skipped
            }
            Recovered::NoMatch => self.skip_token(from).value().unwrap_or_default(),
        }
    }

    /// Reports a construct that parsed fine but sits where it is not allowed.
    pub(super) fn misplaced(&mut self, span: Span, what: &str) -> PResult<()> {
        let err = self.error_at(DiagnosticKind::MisplacedClause, span, Some(what));
        self.report(err)
    }

    /// Stores `clause` in an empty slot. A second clause of the same kind is
    /// reported and handed back so the caller can skip its tokens.
    pub(super) fn fill_slot(
        &mut self,
        slot: &mut Option<SetupClause>,
        clause: SetupClause,
    ) -> PResult<Option<SetupClause>> {
        let Some(first) = slot.as_ref() else {
            *slot = Some(clause);
            return Ok(None);
        };
        let what = format!("`{}` clause", clause.kind.keyword());
        let err = self
            .error_at(DiagnosticKind::DuplicateClause, clause.meta.span, Some(&what))
            .related_to(format!("first {what} here"), first.meta.span);
        self.report(err)?;
        Ok(Some(clause))
    }

    /// Reports a block that reached end of input, or a keyword it cannot
    /// host, before its closing brace.
    pub(super) fn unclosed(&mut self, open: &Token, what: &str) -> PResult<()> {
        let err = self.error_at(DiagnosticKind::UnclosedBlock, open.span(), Some(what));
        self.report(err)
    }
}

fn has_bodies(suite: &Suite) -> bool {
    suite.setup.is_some() || suite.teardown.is_some() || !suite.scopes.is_empty()
}
