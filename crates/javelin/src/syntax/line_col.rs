//! Line and column positions attached to tokens, tree nodes and diagnostics.

use std::fmt;

/// A line and column position in source text.
///
/// Both values are one-based, the way compiler diagnostics print them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ParsePosition {
    /// One-based line number
    pub line: u32,
    /// One-based column number (in characters)
    pub column: u32,
}

impl ParsePosition {
    /// Create a new position
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The position of the first character of a source text
    #[must_use]
    pub const fn start() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for ParsePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_order_by_line_then_column() {
        assert!(ParsePosition::new(1, 9) < ParsePosition::new(2, 1));
        assert!(ParsePosition::new(3, 2) < ParsePosition::new(3, 4));
        assert_eq!(ParsePosition::start().to_string(), "1:1");
    }
}
