//! Configuration for the Earley parser

/// Configuration options for the Earley parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarleyConfig {
    /// Tell the token source when only a closing `>` of a type argument list
    /// can follow, so that `>>` is split into two tokens
    pub type_context_detection: bool,

    /// Log the size of every column at trace level
    pub trace_columns: bool,
}

impl Default for EarleyConfig {
    fn default() -> Self {
        Self {
            type_context_detection: true,
            trace_columns: false,
        }
    }
}

impl EarleyConfig {
    /// Create a new configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable type context detection
    #[must_use]
    pub const fn with_type_context_detection(mut self, enabled: bool) -> Self {
        self.type_context_detection = enabled;
        self
    }

    /// Enable or disable per column tracing
    #[must_use]
    pub const fn with_trace_columns(mut self, enabled: bool) -> Self {
        self.trace_columns = enabled;
        self
    }
}
