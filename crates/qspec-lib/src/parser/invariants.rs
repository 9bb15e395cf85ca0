//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use super::core::Parser;
use super::token::TokenKind;

impl Parser {
    /// Productions start on their leading keyword; the caller dispatched on it.
    #[inline]
    pub(super) fn assert_current(&self, expected: TokenKind) {
        let current = self.current();
        assert_eq!(
            current, expected,
            "broken parser invariant: production entered on {current:?}, expected {expected:?}"
        );
    }
}
