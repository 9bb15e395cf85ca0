//! Token kinds and token sets for the test language.
//!
//! `TokenKind` is recognised by Logos, but only the *start* of literals is
//! matched there: raw strings, quoted strings and numbers are scanned by hand
//! in [`lexer`](super::lexer) so that unterminated input and malformed
//! escapes produce precise errors instead of a generic mismatch.

use logos::Logos;
use qspec_core::{Position, Span};

#[derive(
    Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
)]
#[repr(u8)]
pub enum TokenKind {
    #[token("{")]
    BraceOpen = 0,

    #[token("}")]
    BraceClose,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(".")]
    Dot,

    // Multi-character operators. Logos picks the longest match, so these win
    // over their single-character prefixes.
    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("&&")]
    AndAnd,

    #[token("||")]
    OrOr,

    /// Regex match: `name =~ "^a"`
    #[token("=~")]
    Tilde,

    #[token("->")]
    Arrow,

    #[token("=")]
    Eq,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("!")]
    Bang,

    /// Opening backtick; the body is scanned by the lexer.
    #[token("`")]
    RawString,

    /// Opening quote (`"` or `'`); the body is scanned by the lexer.
    #[token("\"")]
    #[token("'")]
    Str,

    /// First digit; the rest of the literal is scanned by the lexer.
    #[regex("[0-9]")]
    Number,

    /// Identifier, `$param`, or a keyword before reclassification.
    #[regex(r"\$?[\p{L}_][\p{L}\p{N}_]*")]
    Ident,

    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    // Keywords are never produced by Logos directly: identifiers are
    // reclassified after scanning, see `keyword_kind`.
    KwImport,
    KwQuery,
    KwSetup,
    KwTeardown,
    KwTest,
    KwGroup,
    KwAssert,

    Eof,
}

use TokenKind::*;

const KEYWORDS: [(&str, TokenKind); 7] = [
    ("import", KwImport),
    ("query", KwQuery),
    ("setup", KwSetup),
    ("teardown", KwTeardown),
    ("test", KwTest),
    ("group", KwGroup),
    ("assert", KwAssert),
];

/// Reclassifies a scanned identifier. `$`-prefixed names are never keywords.
pub fn keyword_kind(ident: &str) -> Option<TokenKind> {
    if ident.starts_with('$') {
        return None;
    }
    KEYWORDS
        .iter()
        .find(|(text, _)| *text == ident)
        .map(|(_, kind)| *kind)
}

impl TokenKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | LineComment)
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        KEYWORD_SET.contains(self)
    }

    #[inline]
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            EqEq | NotEq
                | LtEq
                | GtEq
                | AndAnd
                | OrOr
                | Tilde
                | Arrow
                | Eq
                | Lt
                | Gt
                | Plus
                | Minus
                | Star
                | Slash
                | Percent
                | Bang
        )
    }

    /// Human-readable name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            BraceOpen => "`{`",
            BraceClose => "`}`",
            ParenOpen => "`(`",
            ParenClose => "`)`",
            BracketOpen => "`[`",
            BracketClose => "`]`",
            Comma => "`,`",
            Colon => "`:`",
            Semicolon => "`;`",
            Dot => "`.`",
            RawString => "raw string",
            Str => "string",
            Number => "number",
            Ident => "identifier",
            Whitespace => "whitespace",
            LineComment => "comment",
            KwImport => "`import`",
            KwQuery => "`query`",
            KwSetup => "`setup`",
            KwTeardown => "`teardown`",
            KwTest => "`test`",
            KwGroup => "`group`",
            KwAssert => "`assert`",
            Eof => "end of input",
            _ => "operator",
        }
    }
}

/// A lexed token. `text` is the exact source slice, quotes included.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, start: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
        }
    }

    /// Position just past the last character. Raw strings and whitespace may
    /// span lines, so this walks the text.
    pub fn end(&self) -> Position {
        self.start.after(&self.text)
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end())
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    /// Whitespace holding two or more line breaks separates paragraphs.
    pub fn is_blank_line(&self) -> bool {
        self.kind == Whitespace && self.text.matches('\n').count() >= 2
    }
}

/// A comment collected on the lexer's side channel.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Trivia {
    pub text: String,
    pub span: Span,
    /// The whitespace right before this comment contains a blank line.
    pub blank_line_before: bool,
}

/// 64-bit bitset of `TokenKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Panics at compile time if any kind's discriminant >= 64.
    pub const fn new(kinds: &[TokenKind]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u8;
            assert!(kind < 64, "TokenKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn contains(&self, kind: TokenKind) -> bool {
        let kind = kind as u8;
        if kind >= 64 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for i in 0..=Eof as u8 {
            if self.0 & (1 << i) != 0 {
                // SAFETY: `i` is within the discriminant range of the repr(u8) enum.
                let kind: TokenKind = unsafe { std::mem::transmute::<u8, TokenKind>(i) };
                list.entry(&kind);
            }
        }
        list.finish()
    }
}

/// Structural keywords; also the generic synchronisation points.
pub const KEYWORD_SET: TokenSet = TokenSet::new(&[
    KwImport, KwQuery, KwSetup, KwTeardown, KwTest, KwGroup, KwAssert,
]);

/// Generic recovery stops here: any keyword, a closing brace, or end of input.
pub const SYNC_SET: TokenSet = KEYWORD_SET.union(TokenSet::new(&[BraceClose, Eof]));

/// Tokens that can begin a literal value.
pub const VALUE_FIRST: TokenSet = TokenSet::new(&[
    Str, Number, Minus, Plus, BraceOpen, BracketOpen, Ident,
]);

/// Tokens that can begin an assertion expression.
pub const EXPR_FIRST: TokenSet = TokenSet::new(&[
    Str, Number, Minus, Bang, ParenOpen, BracketOpen, Ident,
]);
