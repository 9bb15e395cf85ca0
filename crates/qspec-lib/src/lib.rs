//! qspec: front end for a declarative query-testing language.
//!
//! Turns test suite source into a typed syntax tree, tolerating errors so
//! editors and linters keep working on broken files.
//!
//! # Example
//!
//! ```
//! use qspec_lib::parser::{ParseOptions, parse};
//!
//! let source = r#"
//!     query Users `MATCH (u:User) RETURN u`
//!
//!     Users {
//!         test "finds nobody" {
//!             assert { rows.length == 0 }
//!         }
//!     }
//! "#;
//!
//! let parse = parse(source, &ParseOptions::default());
//! assert!(parse.is_valid());
//! eprintln!("{}", parse.diagnostics().render(source));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod cursor;
pub mod diagnostics;
pub mod parser;
pub mod trivia;


pub use cursor::{CursorContext, context_at, node_at, previous_token, token_at};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, DiagnosticsPrinter};
pub use parser::{Parse, ParseMode, ParseOptions, parse, parse_recovering, parse_strict};
pub use qspec_core::{LineCol, Position, Span};

use parser::{LexError, SyntaxError};

/// Reasons a parse stopped before the end of input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The token stream could not be built past this point.
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    /// First grammar error in strict mode.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// Recovering mode gave up after collecting `limit` diagnostics.
    #[error("too many errors (limit {limit})")]
    TooManyErrors { limit: usize },

    /// Input nested too deeply.
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,
}

/// Result type for parse operations.
pub type Result<T> = std::result::Result<T, Error>;
