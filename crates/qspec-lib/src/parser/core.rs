//! Parser state machine and low-level operations.

use qspec_core::Span;
use tracing::{debug, trace};

use super::ast::{NodeMeta, TokenRange};
use super::lexer::{LexError, Lexed};
use super::options::{ParseMode, ParseOptions};
use super::token::{Token, TokenKind, TokenSet};
use crate::Error;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, RelatedInfo};

/// A grammar error that has not been reported yet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize)]
#[error("{message} at {}", span.start)]
pub struct SyntaxError {
    pub kind: DiagnosticKind,
    pub span: Span,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<RelatedInfo>,
}

impl SyntaxError {
    pub(super) fn related_to(mut self, message: impl Into<String>, span: Span) -> Self {
        self.related.push(RelatedInfo {
            span,
            message: message.into(),
        });
        self
    }

    pub(crate) fn to_diagnostic(&self) -> Diagnostic {
        let mut diagnostic = Diagnostic::new(self.kind, self.span, self.message.clone());
        diagnostic.related = self.related.clone();
        diagnostic
    }
}

/// Why a production stopped.
///
/// `Syntax` still has to be reported by the nearest recovery point.
/// `Abort` was already accounted for and unwinds to the top level.
#[derive(Debug)]
pub(crate) enum ParseError {
    Syntax(SyntaxError),
    Abort(Error),
}

impl From<SyntaxError> for ParseError {
    fn from(err: SyntaxError) -> Self {
        ParseError::Syntax(err)
    }
}

pub(crate) type PResult<T> = std::result::Result<T, ParseError>;

/// Saved cursor for backtracking.
#[derive(Debug, Clone, Copy)]
pub(super) struct Checkpoint {
    pos: usize,
    last_end: usize,
}

impl Checkpoint {
    pub(super) fn pos(self) -> usize {
        self.pos
    }
}

/// Cursor over the lexed tokens. Whitespace and comments stay in `tokens`
/// but `pos` always rests on a non-trivia token.
pub(crate) struct Parser {
    pub(super) tokens: Vec<Token>,
    pub(super) pos: usize,
    /// Index just past the last consumed token.
    pub(super) last_end: usize,
    lex_error: Option<LexError>,
    options: ParseOptions,
    diagnostics: Diagnostics,
    depth: u32,
}

impl Parser {
    pub(crate) fn new(lexed: Lexed, options: ParseOptions) -> Self {
        let mut parser = Self {
            tokens: lexed.tokens,
            pos: 0,
            last_end: 0,
            lex_error: lexed.error,
            options,
            diagnostics: Diagnostics::new(),
            depth: 0,
        };
        parser.skip_trivia();
        parser
    }

    pub(crate) fn into_parts(mut self) -> (Vec<Token>, Diagnostics) {
        self.diagnostics.sort_by_position();
        (self.tokens, self.diagnostics)
    }

    fn skip_trivia(&mut self) {
        while self.pos + 1 < self.tokens.len() && self.tokens[self.pos].is_trivia() {
            self.pos += 1;
        }
    }

    pub(super) fn current(&self) -> TokenKind {
        self.tokens.get(self.pos).map_or(TokenKind::Eof, |t| t.kind)
    }

    pub(super) fn current_token(&self) -> &Token {
        // `lex` always ends the stream with an `Eof` token and `pos` never
        // moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(super) fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    pub(super) fn at_any(&self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    pub(super) fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    /// LL(k) lookahead past trivia.
    pub(super) fn nth(&self, n: usize) -> TokenKind {
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.is_trivia())
            .nth(n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Whether the current token starts on the line the previous consumed
    /// token ended on.
    pub(super) fn on_previous_line(&self) -> bool {
        match self.last_end.checked_sub(1) {
            Some(prev) => self.tokens[prev].end().line == self.current_token().start.line,
            None => false,
        }
    }

    /// Consumes the current token. At end of input nothing moves.
    pub(super) fn bump(&mut self) -> Token {
        let token = self.current_token().clone();
        if token.kind == TokenKind::Eof {
            return token;
        }
        trace!(kind = ?token.kind, at = %token.start, "bump");
        self.pos += 1;
        self.last_end = self.pos;
        self.skip_trivia();
        token
    }

    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        self.at(kind).then(|| self.bump())
    }

    /// Consumes a token of `kind` or fails with `error` describing what was
    /// expected. On mismatch nothing is consumed.
    pub(super) fn expect(
        &mut self,
        kind: TokenKind,
        error: DiagnosticKind,
        what: &str,
    ) -> PResult<Token> {
        match self.eat(kind) {
            Some(token) => Ok(token),
            None => Err(self.unexpected(error, what).into()),
        }
    }

    /// `expected {what}, found {current}` at the current token.
    pub(super) fn unexpected(&self, kind: DiagnosticKind, what: &str) -> SyntaxError {
        let token = self.current_token();
        SyntaxError {
            kind,
            span: token.span(),
            message: format!("expected {what}, found {}", token.kind.describe()),
            related: Vec::new(),
        }
    }

    pub(super) fn error_at(
        &self,
        kind: DiagnosticKind,
        span: Span,
        detail: Option<&str>,
    ) -> SyntaxError {
        SyntaxError {
            kind,
            span,
            message: kind.message(detail),
            related: Vec::new(),
        }
    }

    pub(super) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            last_end: self.last_end,
        }
    }

    pub(super) fn rewind(&mut self, checkpoint: Checkpoint) {
        trace!(from = self.pos, to = checkpoint.pos, "rewind");
        self.pos = checkpoint.pos;
        self.last_end = checkpoint.last_end;
    }

    /// Metadata for a node whose first token is at `start`, ending at the
    /// last consumed token.
    pub(super) fn meta(&self, start: usize) -> NodeMeta {
        let end = self.last_end.max(start);
        let span = if end > start {
            Span::new(self.tokens[start].start, self.tokens[end - 1].end())
        } else {
            let at = start.min(self.tokens.len() - 1);
            Span::empty(self.tokens[at].start)
        };
        NodeMeta::new(span, TokenRange::new(start, end))
    }

    /// Span from the token at `start` through the last consumed token.
    pub(super) fn span_from(&self, start: usize) -> Span {
        self.meta(start).span
    }

    /// Non-trivia tokens consumed since `start`.
    pub(super) fn consumed_since(&self, start: usize) -> Vec<Token> {
        let end = self.last_end.max(start);
        self.tokens[start..end]
            .iter()
            .filter(|t| !t.is_trivia())
            .cloned()
            .collect()
    }

    /// Reports a grammar error.
    ///
    /// Returns `Err(Abort)` when parsing must stop: strict mode, the
    /// diagnostic budget is spent, or the error is only a symptom of a lex
    /// error at the cursor.
    pub(super) fn report(&mut self, err: SyntaxError) -> PResult<()> {
        if self.at_eof()
            && let Some(lex) = self.lex_error.clone()
        {
            return Err(ParseError::Abort(self.lex_abort(lex)));
        }

        if self.diagnostics.len() >= self.options.max_diagnostics {
            let limit = self.options.max_diagnostics;
            debug!(limit, "diagnostic budget exhausted");
            return Err(ParseError::Abort(Error::TooManyErrors { limit }));
        }

        debug!(code = err.kind.code(), at = %err.span.start, message = %err.message, "syntax error");
        self.diagnostics.push(err.to_diagnostic());

        match self.options.mode {
            ParseMode::Strict => Err(ParseError::Abort(Error::Syntax(err))),
            ParseMode::Recovering => Ok(()),
        }
    }

    /// Called once the grammar is done with the token stream.
    pub(super) fn finish_input(&mut self) -> Option<Error> {
        let lex = self.lex_error.clone()?;
        Some(self.lex_abort(lex))
    }

    /// Records `lex` as the final diagnostic.
    fn lex_abort(&mut self, lex: LexError) -> Error {
        if !self.diagnostics.has_kind(DiagnosticKind::InvalidToken) {
            debug!(error = %lex, "lex error");
            let at = lex.position();
            self.diagnostics
                .report(DiagnosticKind::InvalidToken, Span::empty(at))
                .message(lex_message(&lex))
                .emit();
        }
        Error::Lex(lex)
    }

    /// Runs `f` one nesting level deeper.
    pub(super) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= self.options.max_depth {
            debug!(depth = self.depth, "recursion limit exceeded");
            return Err(ParseError::Abort(Error::RecursionLimitExceeded));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

fn lex_message(err: &LexError) -> String {
    match err {
        LexError::UnterminatedRawString { .. } => "unterminated raw string".to_string(),
        LexError::UnterminatedString { .. } => "unterminated string".to_string(),
        LexError::NewlineInString { .. } => "line break inside string literal".to_string(),
        LexError::InvalidEscape { ch, .. } => format!("invalid escape sequence `\\{ch}`"),
        LexError::InvalidNumber { text, .. } => format!("malformed number `{text}`"),
        LexError::IllegalCharacter { ch, .. } => format!("illegal character {ch:?}"),
    }
}
