use qspec_core::Span;
use serde::Serialize;

/// Every diagnostic the front end can produce.
///
/// Codes are stable: tooling matches on them, so variants may be added but an
/// existing variant keeps its code forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DiagnosticKind {
    // Lexical failures; always the last diagnostic of a parse.
    InvalidToken,

    // A `{` or `(` that never closed.
    UnclosedBlock,
    UnclosedParen,

    // Something required is missing.
    ExpectedName,
    ExpectedString,
    ExpectedQueryBody,
    ExpectedSetupBody,
    ExpectedCallee,
    ExpectedValue,
    ExpectedExpression,
    ExpectedColon,

    // Something present that does not belong.
    UnexpectedToken,
    MisplacedClause,
    DuplicateClause,
    NumberOutOfRange,
}

impl DiagnosticKind {
    /// Short identifier shown next to the message, e.g. `Q0002`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidToken => "Q0001",
            Self::UnclosedBlock => "Q0002",
            Self::UnclosedParen => "Q0003",
            Self::ExpectedName => "Q0010",
            Self::ExpectedString => "Q0011",
            Self::ExpectedQueryBody => "Q0012",
            Self::ExpectedSetupBody => "Q0013",
            Self::ExpectedCallee => "Q0014",
            Self::ExpectedValue => "Q0015",
            Self::ExpectedExpression => "Q0016",
            Self::ExpectedColon => "Q0017",
            Self::UnexpectedToken => "Q0020",
            Self::MisplacedClause => "Q0021",
            Self::DuplicateClause => "Q0022",
            Self::NumberOutOfRange => "Q0023",
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::InvalidToken => "invalid token",
            Self::UnclosedBlock => "missing closing `}`",
            Self::UnclosedParen => "missing closing `)`",
            Self::ExpectedName => "expected a name",
            Self::ExpectedString => "expected a quoted string",
            Self::ExpectedQueryBody => "expected a backtick query body",
            Self::ExpectedSetupBody => "expected a setup body",
            Self::ExpectedCallee => "expected a callee name",
            Self::ExpectedValue => "expected a value",
            Self::ExpectedExpression => "expected an expression",
            Self::ExpectedColon => "expected `:`",
            Self::UnexpectedToken => "unexpected token",
            Self::MisplacedClause => "not allowed here",
            Self::DuplicateClause => "duplicate clause",
            Self::NumberOutOfRange => "number does not fit in 64 bits",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::InvalidToken | Self::UnexpectedToken => "{}".to_string(),
            Self::UnclosedBlock | Self::UnclosedParen => {
                format!("{} for {{}}", self.fallback_message())
            }
            Self::MisplacedClause => "{} is not allowed here".to_string(),
            Self::DuplicateClause => "duplicate {}".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedInfo {
    pub span: Span,
    pub message: String,
}

/// One reported problem. Diagnostics carry no severity: everything the
/// front end reports is an error in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: &'static str,
    pub span: Span,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<RelatedInfo>,
}

impl Diagnostic {
    pub(crate) fn new(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: kind.code(),
            span,
            message: message.into(),
            related: Vec::new(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, span: Span) -> Self {
        Self::new(kind, span, kind.fallback_message())
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}: {}", self.code, self.span, self.message)?;
        for related in &self.related {
            write!(f, " (related: {} at {})", related.message, related.span)?;
        }
        Ok(())
    }
}
