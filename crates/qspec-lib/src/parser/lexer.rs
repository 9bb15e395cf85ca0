//! Lexer for the test language.
//!
//! Logos classifies the first character(s) of each lexeme; literal bodies are
//! scanned by hand over the remaining input. Positions advance one code point
//! at a time, so columns are character columns, not byte columns.
//!
//! Comments appear twice: as `LineComment` tokens in the stream (for tooling)
//! and as [`Trivia`] on a side list that the comment attacher consumes.
//! Each call to [`lex`] builds its own lexer, so trivia from one document can
//! never end up in another document's result.

use logos::Logos;
use qspec_core::{Position, Span};

use super::literals::{self, EscapeError};
use super::token::{Token, TokenKind, Trivia, keyword_kind};

/// Failures while tokenizing. Always fatal to the token stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize)]
pub enum LexError {
    #[error("unterminated raw string starting at {position}")]
    UnterminatedRawString { position: Position },

    #[error("unterminated string starting at {position}")]
    UnterminatedString { position: Position },

    #[error("line break inside string literal at {position}")]
    NewlineInString { position: Position },

    #[error("invalid escape sequence `\\{ch}` at {position}")]
    InvalidEscape { position: Position, ch: char },

    #[error("malformed number `{text}` at {position}")]
    InvalidNumber { position: Position, text: String },

    #[error("illegal character {ch:?} at {position}")]
    IllegalCharacter { position: Position, ch: char },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            Self::UnterminatedRawString { position }
            | Self::UnterminatedString { position }
            | Self::NewlineInString { position }
            | Self::InvalidEscape { position, .. }
            | Self::InvalidNumber { position, .. }
            | Self::IllegalCharacter { position, .. } => *position,
        }
    }
}

/// Pull-based tokenizer over one source text.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    position: Position,
    trivia: Vec<Trivia>,
    blank_line_pending: bool,
    failed: Option<LexError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            position: Position::START,
            trivia: Vec::new(),
            blank_line_pending: false,
            failed: None,
        }
    }

    /// Position of the next character to be scanned.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the next token, or an `Eof` token once input is exhausted.
    ///
    /// After an error the lexer is stuck: every later call returns that error.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        match self.scan() {
            Ok(token) => Ok(token),
            Err(err) => {
                self.failed = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Comments collected so far.
    pub fn trivia(&self) -> &[Trivia] {
        &self.trivia
    }

    pub fn into_trivia(self) -> Vec<Trivia> {
        self.trivia
    }

    fn scan(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let kind = match self.inner.next() {
            None => return Ok(Token::new(TokenKind::Eof, "", start)),
            Some(Ok(kind)) => kind,
            Some(Err(())) => {
                let ch = self.inner.slice().chars().next().unwrap_or('\u{FFFD}');
                return Err(LexError::IllegalCharacter {
                    position: start,
                    ch,
                });
            }
        };

        let kind = match kind {
            TokenKind::RawString => {
                self.scan_raw_string(start)?;
                kind
            }
            TokenKind::Str => {
                self.scan_quoted(start)?;
                kind
            }
            TokenKind::Number => {
                self.scan_number(start)?;
                kind
            }
            TokenKind::Ident => keyword_kind(self.inner.slice()).unwrap_or(kind),
            _ => kind,
        };

        let text = self.inner.slice();
        self.position.advance_str(text);

        match kind {
            TokenKind::Whitespace => {
                self.blank_line_pending = text.matches('\n').count() >= 2;
            }
            TokenKind::LineComment => {
                self.trivia.push(Trivia {
                    text: text.to_string(),
                    span: Span::new(start, self.position),
                    blank_line_before: self.blank_line_pending,
                });
                self.blank_line_pending = false;
            }
            _ => self.blank_line_pending = false,
        }

        Ok(Token::new(kind, text, start))
    }

    /// Backtick strings run to the next backtick, newlines included.
    fn scan_raw_string(&mut self, start: Position) -> Result<(), LexError> {
        match self.inner.remainder().find('`') {
            Some(end) => {
                self.inner.bump(end + 1);
                Ok(())
            }
            None => Err(LexError::UnterminatedRawString { position: start }),
        }
    }

    fn scan_quoted(&mut self, start: Position) -> Result<(), LexError> {
        let quote = self.inner.slice().chars().next().unwrap_or('"');
        let body_start = start.after(self.inner.slice());
        let rest = self.inner.remainder();
        let mut chars = rest.chars();

        while let Some(ch) = chars.next() {
            let consumed = rest.len() - chars.as_str().len();
            let at = || body_start.after(&rest[..consumed - ch.len_utf8()]);
            match ch {
                '\n' => return Err(LexError::NewlineInString { position: at() }),
                '\\' => match read_escape_checked(&mut chars) {
                    Ok(()) => {}
                    Err(EscapeError::Truncated) => {
                        return Err(LexError::UnterminatedString { position: start });
                    }
                    Err(EscapeError::Invalid('\n')) => {
                        return Err(LexError::NewlineInString { position: at() });
                    }
                    Err(EscapeError::Invalid(ch)) => {
                        return Err(LexError::InvalidEscape { position: at(), ch });
                    }
                },
                c if c == quote => {
                    self.inner.bump(consumed);
                    return Ok(());
                }
                _ => {}
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn scan_number(&mut self, start: Position) -> Result<(), LexError> {
        let first = self.inner.slice().chars().next().unwrap_or('0');
        match literals::scan_number(first, self.inner.remainder()) {
            Ok(len) => {
                self.inner.bump(len);
                Ok(())
            }
            Err(len) => {
                self.inner.bump(len);
                Err(LexError::InvalidNumber {
                    position: start,
                    text: self.inner.slice().to_string(),
                })
            }
        }
    }
}

fn read_escape_checked(chars: &mut std::str::Chars<'_>) -> Result<(), EscapeError> {
    literals::read_escape(chars).map(|_| ())
}

/// Output of lexing a whole document.
#[derive(Debug, Clone)]
pub struct Lexed {
    /// Every token including whitespace and comments. Always ends with an
    /// `Eof` token; after a lex error that token sits where the bad lexeme began.
    pub tokens: Vec<Token>,
    pub trivia: Vec<Trivia>,
    pub error: Option<LexError>,
}

/// Tokenizes `source` with a fresh lexer.
pub fn lex(source: &str) -> Lexed {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    let error = loop {
        match lexer.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => {
                tokens.push(token);
                break None;
            }
            Ok(token) => tokens.push(token),
            Err(err) => {
                tokens.push(Token::new(TokenKind::Eof, "", lexer.position()));
                break Some(err);
            }
        }
    };

    Lexed {
        tokens,
        trivia: lexer.into_trivia(),
        error,
    }
}
