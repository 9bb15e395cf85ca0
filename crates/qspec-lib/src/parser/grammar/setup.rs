use crate::diagnostics::DiagnosticKind;
use crate::parser::ast::{
    ClauseKind, Param, SetupBody, SetupCall, SetupClause, SetupItem, SetupStep,
};
use crate::parser::core::{PResult, ParseError, Parser};
use crate::parser::literals;
use crate::parser::recovery::Recovered;
use crate::parser::token::{KEYWORD_SET, Token, TokenKind};

impl Parser {
    /// `setup <body>` or `teardown <body>`, positioned on the keyword.
    ///
    /// This is a recovery point: a broken body is reported here and the
    /// clause comes back flagged as recovered. Only aborts propagate.
    pub(super) fn setup_clause(&mut self) -> PResult<SetupClause> {
        let start = self.pos;
        let keyword = self.bump();
        let kind = match keyword.kind {
            TokenKind::KwTeardown => ClauseKind::Teardown,
            _ => ClauseKind::Setup,
        };

        let body_at = self.checkpoint();
        let mut skipped = Vec::new();
        let mut recovered = false;

        let body = match self.setup_body(kind, &mut skipped) {
            Ok(body) => body,
            Err(ParseError::Syntax(err)) => {
                self.report(err)?;
                recovered = true;
                match self.recover_setup_body(body_at) {
                    Recovered::Advanced(body, _) | Recovered::Boundary(body, _) => body,
                    Recovered::NoMatch => {
                        skipped.extend(self.recover_in_block(body_at.pos()));
                        SetupBody::Missing
                    }
                }
            }
            Err(abort) => return Err(abort),
        };

        let mut meta = self.meta(start);
        if recovered {
            meta.mark_recovered(meta.span);
        }
        meta.record_skipped(skipped);
        Ok(SetupClause { meta, kind, body })
    }

    fn setup_body(&mut self, kind: ClauseKind, skipped: &mut Vec<Token>) -> PResult<SetupBody> {
        match self.current() {
            TokenKind::RawString => {
                let body = self.bump();
                Ok(SetupBody::Inline(raw_body(&body)))
            }
            TokenKind::Ident => Ok(SetupBody::Call(self.call(true)?)),
            TokenKind::BraceOpen => self.setup_block(kind, skipped).map(SetupBody::Block),
            _ => Err(self
                .unexpected(
                    DiagnosticKind::ExpectedSetupBody,
                    "a backtick body, a call or `{`",
                )
                .into()),
        }
    }

    /// `{ (rawstring | call)* }`
    fn setup_block(
        &mut self,
        kind: ClauseKind,
        skipped: &mut Vec<Token>,
    ) -> PResult<Vec<SetupItem>> {
        let open = self.bump();
        let mut items = Vec::new();
        loop {
            let from = self.pos;
            match self.current() {
                TokenKind::BraceClose => {
                    self.bump();
                    break;
                }
                k if k == TokenKind::Eof || KEYWORD_SET.contains(k) => {
                    self.unclosed(&open, &format!("`{}` block", kind.keyword()))?;
                    skipped.insert(0, open.clone());
                    break;
                }
                TokenKind::RawString => {
                    let body = self.bump();
                    items.push(SetupItem {
                        meta: self.meta(from),
                        step: SetupStep::Inline(raw_body(&body)),
                    });
                }
                TokenKind::Ident => {
                    let at = self.checkpoint();
                    let call = match self.call(true) {
                        Ok(call) => call,
                        Err(ParseError::Syntax(err)) => {
                            self.report(err)?;
                            match self.recover_setup_body(at) {
                                Recovered::Advanced(SetupBody::Call(call), _) => call,
                                _ => {
                                    skipped.extend(self.recover_in_block(from));
                                    continue;
                                }
                            }
                        }
                        Err(abort) => return Err(abort),
                    };
                    items.push(SetupItem {
                        meta: self.meta(from),
                        step: SetupStep::Call(call),
                    });
                }
                _ => {
                    let err = self.unexpected(
                        DiagnosticKind::ExpectedSetupBody,
                        "a backtick body, a call or `}`",
                    );
                    self.report(err)?;
                    skipped.extend(self.recover_in_block(from));
                }
            }
        }
        Ok(items)
    }

    /// `[module.]name(params)`. With `require_parens` unset the argument
    /// list may be left out entirely.
    pub(super) fn call(&mut self, require_parens: bool) -> PResult<SetupCall> {
        let start = self.pos;
        let first = self.expect(
            TokenKind::Ident,
            DiagnosticKind::ExpectedCallee,
            "a callee name",
        )?;
        let (module, name) = if self.eat(TokenKind::Dot).is_some() {
            let callee = self.expect(
                TokenKind::Ident,
                DiagnosticKind::ExpectedCallee,
                "a callee name after `.`",
            )?;
            (Some(first.text), callee.text)
        } else {
            (None, first.text)
        };

        let params = if require_parens || self.at(TokenKind::ParenOpen) {
            self.params()?
        } else {
            Vec::new()
        };

        Ok(SetupCall {
            meta: self.meta(start),
            module,
            name,
            params,
        })
    }

    fn params(&mut self) -> PResult<Vec<Param>> {
        let open = self.expect(
            TokenKind::ParenOpen,
            DiagnosticKind::UnexpectedToken,
            "`(` to start the arguments",
        )?;
        let mut params = Vec::new();
        loop {
            if self.eat(TokenKind::ParenClose).is_some() {
                return Ok(params);
            }
            if self.at_eof() || self.at(TokenKind::BraceClose) || self.at_any(KEYWORD_SET) {
                return Err(self
                    .error_at(
                        DiagnosticKind::UnclosedParen,
                        open.span(),
                        Some("call arguments"),
                    )
                    .into());
            }
            params.push(self.param()?);
            if self.eat(TokenKind::Comma).is_none() && !self.at(TokenKind::ParenClose) {
                return Err(self
                    .unexpected(DiagnosticKind::UnexpectedToken, "`,` or `)`")
                    .into());
            }
        }
    }

    /// `value` or `name: value`
    fn param(&mut self) -> PResult<Param> {
        let start = self.pos;
        let name = if self.at(TokenKind::Ident) && self.nth(1) == TokenKind::Colon {
            let name = self.bump();
            self.bump();
            Some(name.text)
        } else {
            None
        };
        let value = self.value()?;
        Ok(Param {
            span: self.span_from(start),
            name,
            value,
        })
    }
}

fn raw_body(token: &Token) -> String {
    literals::raw_string_value(&token.text).to_string()
}
