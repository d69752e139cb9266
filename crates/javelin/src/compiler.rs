//! # Compilation Pipeline
//!
//! The [`Compiler`] runs the front end over a set of source paths:
//!
//! 1. **setup sources**: discover and read the source files
//! 2. **parse**: parse every file into a [`SyntaxTree`]
//!
//! Problems with individual files are reported to a [`DiagnosticCollector`]
//! and do not stop the other files of the same stage. After each stage the
//! collector is asked whether an error was reported, and if so the pipeline
//! stops with [`CompileError::StageFailed`]. A grammar/tree builder mismatch
//! stops it immediately with [`CompileError::Internal`].

use crate::earley::EarleyConfig;
use crate::error::{CompileError, Diagnostic, DiagnosticCollector, ParseError};
use crate::parser::source::SourceProvider;
use crate::parser::{ParallelConfig, ParallelParser, ParseBatch, Parser, aggregate_results};
use crate::syntax::SyntaxTree;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Settings of one compiler run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompilationSettings {
    /// Source files and directories to compile
    pub sources: Vec<PathBuf>,
    /// Log the duration of every stage at info level
    pub report_time: bool,
    /// Log every syntax tree at debug level
    pub debug: bool,
    pub parallel: ParallelConfig,
    pub parser: EarleyConfig,
}

impl CompilationSettings {
    #[must_use]
    pub fn new(sources: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_report_time(mut self, report_time: bool) -> Self {
        self.report_time = report_time;
        self
    }

    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn with_parser(mut self, parser: EarleyConfig) -> Self {
        self.parser = parser;
        self
    }
}

const SETUP_SOURCES: &str = "setup sources";
const PARSE: &str = "parse";

pub struct Compiler<'d> {
    settings: CompilationSettings,
    diagnostics: &'d dyn DiagnosticCollector,
    parser: Arc<Parser>,
}

impl<'d> Compiler<'d> {
    /// A compiler for whole compilation units
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Grammar`] if the bundled grammar does not validate.
    pub fn new(settings: CompilationSettings, diagnostics: &'d dyn DiagnosticCollector) -> Result<Self, CompileError> {
        let parser = Parser::java()?.with_config(settings.parser.clone());
        Ok(Self::with_parser(settings, diagnostics, Arc::new(parser)))
    }

    /// A compiler using an already built parser; `settings.parser` is ignored
    #[must_use]
    pub fn with_parser(
        settings: CompilationSettings,
        diagnostics: &'d dyn DiagnosticCollector,
        parser: Arc<Parser>,
    ) -> Self {
        Self {
            settings,
            diagnostics,
            parser,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &CompilationSettings {
        &self.settings
    }

    /// Run every stage.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::StageFailed`] if a stage reported an error,
    /// [`CompileError::Internal`] on a grammar/tree builder mismatch and
    /// [`CompileError::ThreadPool`] if the parse pool cannot be built.
    pub fn compile(&self) -> Result<Vec<SyntaxTree>, CompileError> {
        let (batch, failures) = self.stage(SETUP_SOURCES, || self.setup_sources());
        self.check(SETUP_SOURCES, failures)?;

        let (trees, failures) = self.stage(PARSE, || self.parse(&batch))?;
        self.check(PARSE, failures)?;

        if self.settings.debug {
            for tree in &trees {
                log::debug!("{}: {:#?}", tree.origin().display(), tree.root());
            }
        }
        Ok(trees)
    }

    fn setup_sources(&self) -> (ParseBatch, usize) {
        let discovered = SourceProvider::new(self.settings.sources.iter().cloned()).discover();
        let mut failures = 0;
        for error in discovered.errors {
            failures += 1;
            self.report_io(&error);
        }

        let mut batch = ParseBatch::new();
        for path in &discovered.files {
            if let Err(error) = batch.read(path) {
                failures += 1;
                self.report_io(&error);
            }
        }
        if batch.is_empty() && failures == 0 {
            self.diagnostics.report(Diagnostic::warning(None, None, "no source files"));
        }
        (batch, failures)
    }

    fn report_io(&self, error: &CompileError) {
        let origin = match error {
            CompileError::Io { path, .. } => Some(path.as_path()),
            _ => None,
        };
        self.diagnostics.report(Diagnostic::error(origin, None, error.to_string()));
    }

    fn parse(&self, batch: &ParseBatch) -> Result<(Vec<SyntaxTree>, usize), CompileError> {
        let parser = ParallelParser::with_config(Arc::clone(&self.parser), self.settings.parallel.clone());
        let results = parser.parse_batch(batch)?;
        let summary = aggregate_results(&results);
        log::debug!(
            "{} of {} files parsed, {} errors",
            summary.successful,
            summary.total_files,
            summary.total_errors
        );

        let mut trees = Vec::with_capacity(results.len());
        for result in results {
            for error in result.errors {
                if let ParseError::Internal(source) = error {
                    return Err(CompileError::Internal {
                        origin: result.origin,
                        source,
                    });
                }
                self.diagnostics
                    .report(Diagnostic::from_parse_error(&result.origin, &error));
            }
            trees.extend(result.tree);
        }
        Ok((trees, summary.failed))
    }

    fn stage<T>(&self, name: &'static str, run: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let result = run();
        if self.settings.report_time {
            log::info!("{name}: {:?}", started.elapsed());
        } else {
            log::debug!("{name}: {:?}", started.elapsed());
        }
        result
    }

    fn check(&self, stage: &'static str, errors: usize) -> Result<(), CompileError> {
        if self.diagnostics.has_error() {
            log::warn!("{stage} failed with {errors} error(s)");
            return Err(CompileError::StageFailed { stage, errors });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompilerDiagnostics;

    #[test]
    fn settings_builders() {
        let settings = CompilationSettings::new(["src"])
            .with_report_time(true)
            .with_parallel(ParallelConfig::new().with_fail_fast(true));
        assert_eq!(settings.sources, [PathBuf::from("src")]);
        assert!(settings.report_time);
        assert!(!settings.debug);
        assert!(settings.parallel.fail_fast);
        assert!(settings.parser.type_context_detection);
    }

    #[test]
    fn nothing_to_compile_is_only_a_warning() {
        let dir = tempfile::tempdir().expect("temp dir");
        let diagnostics = CompilerDiagnostics::new();
        let compiler = Compiler::new(CompilationSettings::new([dir.path()]), &diagnostics).expect("compiler");
        let trees = compiler.compile().expect("no errors");
        assert!(trees.is_empty());
        assert!(!diagnostics.has_error());
        assert_eq!(diagnostics.diagnostics().len(), 1);
    }

    #[test]
    fn unreadable_sources_stop_before_parsing() {
        let diagnostics = CompilerDiagnostics::new();
        let compiler = Compiler::new(CompilationSettings::new(["no/such/dir"]), &diagnostics).expect("compiler");
        let error = compiler.compile().expect_err("missing sources");
        assert!(matches!(
            error,
            CompileError::StageFailed { stage: "setup sources", errors: 1 }
        ));
        assert!(diagnostics.has_error());
    }
}
