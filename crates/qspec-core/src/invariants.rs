//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::Span;

impl Span {
    #[inline]
    pub(crate) fn ensure_ordered(&self) {
        assert!(
            self.start <= self.end,
            "Span: end {} is before start {} (caller built positions out of order)",
            self.end,
            self.start,
        );
    }
}
