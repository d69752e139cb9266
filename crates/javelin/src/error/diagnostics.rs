//! # Diagnostics
//!
//! Per file problems are reported to a [`DiagnosticCollector`]. Files are parsed
//! concurrently, so collectors take `&self` and must tolerate reports arriving in
//! any order; [`CompilerDiagnostics::diagnostics`] sorts its output by origin and
//! position so the result does not depend on scheduling.

use crate::error::ParseError;
use crate::syntax::ParsePosition;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Note => "note",
        })
    }
}

/// A problem found while processing a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file the problem was found in, if it is tied to one
    pub origin: Option<PathBuf>,
    /// Where in the file the problem was found
    pub position: Option<ParsePosition>,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    /// Create an error diagnostic
    #[must_use]
    pub fn error(origin: Option<&Path>, position: Option<ParsePosition>, message: impl Into<String>) -> Self {
        Self {
            origin: origin.map(Path::to_path_buf),
            position,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Create a warning diagnostic
    #[must_use]
    pub fn warning(origin: Option<&Path>, position: Option<ParsePosition>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(origin, position, message)
        }
    }

    /// Convert a parse failure of the file at `origin`
    #[must_use]
    pub fn from_parse_error(origin: &Path, error: &ParseError) -> Self {
        Self::error(Some(origin), error.position(), error.to_string())
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(origin) = &self.origin {
            write!(f, "{}:", origin.display())?;
            if let Some(position) = self.position {
                write!(f, "{position}:")?;
            }
            f.write_str(" ")?;
        }
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Receives diagnostics from every stage of the pipeline
pub trait DiagnosticCollector: Send + Sync {
    /// Record a diagnostic
    fn report(&self, diagnostic: Diagnostic);

    /// Whether any error (not warning) has been reported
    fn has_error(&self) -> bool;
}

/// Thread safe collector that keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct CompilerDiagnostics {
    diagnostics: Mutex<Vec<Diagnostic>>,
    has_error: AtomicBool,
    error_count: AtomicUsize,
}

impl CompilerDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of error diagnostics reported so far
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Acquire)
    }

    /// All diagnostics, ordered by origin, position and message
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = match self.diagnostics.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        diagnostics.sort_by(|a, b| {
            (&a.origin, a.position, &a.message).cmp(&(&b.origin, b.position, &b.message))
        });
        diagnostics
    }
}

impl DiagnosticCollector for CompilerDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.has_error.store(true, Ordering::Release);
            self.error_count.fetch_add(1, Ordering::AcqRel);
        }
        match self.diagnostics.lock() {
            Ok(mut guard) => guard.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }

    fn has_error(&self) -> bool {
        self.has_error.load(Ordering::Acquire)
    }
}
