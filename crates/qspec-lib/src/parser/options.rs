/// How the parser reacts to a grammar error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Stop at the first error.
    Strict,
    /// Report, recover and keep going until the diagnostic budget runs out.
    #[default]
    Recovering,
}

/// Limits and mode for a single parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub mode: ParseMode,
    /// Recovering mode aborts once another diagnostic would exceed this.
    pub max_diagnostics: usize,
    /// Nesting depth of groups, values and expressions.
    pub max_depth: u32,
}

impl ParseOptions {
    pub const DEFAULT_MAX_DIAGNOSTICS: usize = 50;
    pub const DEFAULT_MAX_DEPTH: u32 = 256;

    pub fn new() -> Self {
        Self {
            mode: ParseMode::default(),
            max_diagnostics: Self::DEFAULT_MAX_DIAGNOSTICS,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    pub fn strict() -> Self {
        Self::new().with_mode(ParseMode::Strict)
    }

    pub fn recovering() -> Self {
        Self::new().with_mode(ParseMode::Recovering)
    }

    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_diagnostics(mut self, limit: usize) -> Self {
        self.max_diagnostics = limit;
        self
    }

    pub fn with_max_depth(mut self, limit: u32) -> Self {
        self.max_depth = limit;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}
