//! Error recovery strategies.
//!
//! A strategy runs right after an error has been reported. Its outcome is a
//! [`Recovered`], and the two success variants each carry a proof value that
//! only this module can construct:
//!
//! - [`Progress`]: the cursor moved strictly forward.
//! - [`Boundary`]: the cursor did not move but rests on end of input, `}` or
//!   a structural keyword, all of which every block loop consumes or exits on.
//!
//! A strategy that neither advanced nor stopped at a boundary can only say
//! [`Recovered::NoMatch`], so a recovery loop can never spin in place.
//!
//! Strategies, in the order recovery points try them:
//! 1. setup/call recovery ([`Parser::recover_setup_body`])
//! 2. delimiter-aware synchronisation ([`Parser::synchronize`])
//! 3. single-token skip ([`Parser::skip_token`])

use tracing::debug;

use super::ast::{SetupBody, SetupCall};
use super::core::{Checkpoint, Parser};
use super::token::{SYNC_SET, Token, TokenKind};

/// Proof that the cursor advanced past `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Progress {
    from: usize,
    to: usize,
}

impl Progress {
    pub(crate) fn consumed(&self) -> usize {
        self.to - self.from
    }
}

/// Proof that the cursor rests on a synchronisation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Boundary {
    kind: TokenKind,
}

impl Boundary {
    pub(crate) fn kind(&self) -> TokenKind {
        self.kind
    }
}

#[derive(Debug)]
pub(crate) enum Recovered<T> {
    Advanced(T, Progress),
    Boundary(T, Boundary),
    NoMatch,
}

impl<T> Recovered<T> {
    pub(crate) fn value(self) -> Option<T> {
        match self {
            Recovered::Advanced(value, _) | Recovered::Boundary(value, _) => Some(value),
            Recovered::NoMatch => None,
        }
    }
}

impl Parser {
    fn progress_since(&self, from: usize) -> Option<Progress> {
        (self.pos > from).then_some(Progress { from, to: self.pos })
    }

    fn boundary(&self) -> Option<Boundary> {
        let kind = self.current();
        SYNC_SET.contains(kind).then_some(Boundary { kind })
    }

    /// Wraps `value` in whichever proof the cursor supports.
    fn outcome<T>(&self, from: usize, value: T) -> Recovered<T> {
        if let Some(progress) = self.progress_since(from) {
            return Recovered::Advanced(value, progress);
        }
        match self.boundary() {
            Some(boundary) => Recovered::Boundary(value, boundary),
            None => Recovered::NoMatch,
        }
    }

    /// Setup/call recovery for a clause whose body failed to parse.
    ///
    /// `body` points at the first token after the `setup`/`teardown`
    /// keyword; the failed attempt is rewound. A body that never started
    /// (the keyword is followed by end of input, `}` or another keyword)
    /// becomes [`SetupBody::Missing`]. A body that starts with an identifier
    /// is re-read greedily as a call.
    pub(super) fn recover_setup_body(&mut self, body: Checkpoint) -> Recovered<SetupBody> {
        self.rewind(body);
        if self.boundary().is_some() {
            debug!(at = %self.current_token().start, "setup body missing");
            return self.outcome(body.pos(), SetupBody::Missing);
        }
        if !self.at(TokenKind::Ident) {
            return Recovered::NoMatch;
        }
        let call = self.recover_call();
        debug!(
            module = ?call.module,
            name = %call.name,
            "setup call recovered"
        );
        self.outcome(body.pos(), SetupBody::Call(call))
    }

    /// Greedily consumes `ident ('.' ident)? ('(' ... ')')?`.
    ///
    /// A missing dot is tolerated when the second identifier sits on the
    /// same line; a missing callee or `)` leaves the call partial. The
    /// result is always flagged as recovered.
    pub(super) fn recover_call(&mut self) -> SetupCall {
        let start = self.pos;
        let first = self.bump();

        let mut module = None;
        let mut name = String::new();
        if self.eat(TokenKind::Dot).is_some() {
            module = Some(first.text);
            if let Some(callee) = self.eat(TokenKind::Ident) {
                name = callee.text;
            }
        } else if self.at(TokenKind::Ident) && self.on_previous_line() {
            module = Some(first.text);
            name = self.bump().text;
        } else {
            name = first.text;
        }

        let mut skipped = Vec::new();
        if self.at(TokenKind::ParenOpen) {
            self.bump();
            skipped = self.skip_balanced(Some(TokenKind::ParenClose));
            if self.eat(TokenKind::ParenClose).is_none() {
                debug!(name = %name, "call arguments left open");
            }
        }

        let mut meta = self.meta(start);
        meta.mark_recovered(meta.span);
        meta.record_skipped(skipped);
        SetupCall {
            meta,
            module,
            name,
            params: Vec::new(),
        }
    }

    /// Delimiter-aware synchronisation.
    ///
    /// Skips tokens until a keyword, `}` or end of input at nesting depth
    /// zero. `{ ... }` and `( ... )` runs are skipped whole so an inner `}`
    /// does not end the skip early. `from` is where the failed production
    /// started; tokens it consumed count as skipped too.
    pub(super) fn synchronize(&mut self, from: usize) -> Recovered<Vec<Token>> {
        self.skip_balanced(None);
        let skipped = self.consumed_since(from);
        if !skipped.is_empty() {
            debug!(count = skipped.len(), to = ?self.current(), "synchronized");
        }
        self.outcome(from, skipped)
    }

    /// Skips exactly one token, for boundaries the current loop cannot host.
    pub(super) fn skip_token(&mut self, from: usize) -> Recovered<Vec<Token>> {
        self.bump();
        self.outcome(from, self.consumed_since(from))
    }

    /// Skips until a synchronisation token at depth zero, or until `close`
    /// at depth zero.
    fn skip_balanced(&mut self, close: Option<TokenKind>) -> Vec<Token> {
        let mut skipped = Vec::new();
        let mut braces = 0usize;
        let mut parens = 0usize;
        loop {
            let kind = self.current();
            let nested = braces > 0 || parens > 0;
            match kind {
                TokenKind::Eof => break,
                k if Some(k) == close && !nested => break,
                k if SYNC_SET.contains(k) && !nested => break,
                TokenKind::BraceOpen => braces += 1,
                TokenKind::BraceClose => braces = braces.saturating_sub(1),
                TokenKind::ParenOpen => parens += 1,
                TokenKind::ParenClose => parens = parens.saturating_sub(1),
                _ => {}
            }
            skipped.push(self.bump());
        }
        skipped
    }
}
