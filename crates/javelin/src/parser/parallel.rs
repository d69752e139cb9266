//! # Parallel Parsing Support
//!
//! Parsing distinct files shares nothing but the read-only [`Parser`], so a
//! batch is parsed one task per file.
//!
//! ## Overview
//!
//! - [`ParseBatch`]: the in-memory sources to parse
//! - [`ParallelParser`]: parses a batch, on a rayon pool with the `parallel`
//!   feature and sequentially without it
//! - [`aggregate_results`]: counts and timings for a finished batch
//!
//! Results come back in batch order whatever order the files finished in.

use crate::error::{CompileError, ParseError};
use crate::parser::Parser;
use crate::syntax::SyntaxTree;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of parsing a single file
#[derive(Debug)]
pub struct FileParseResult {
    /// Where the source came from
    pub origin: PathBuf,
    /// The parsed syntax tree (if successful)
    pub tree: Option<SyntaxTree>,
    pub errors: Vec<ParseError>,
    pub duration: Duration,
}

impl FileParseResult {
    #[must_use]
    pub fn success(tree: SyntaxTree, duration: Duration) -> Self {
        Self {
            origin: tree.origin().to_path_buf(),
            tree: Some(tree),
            errors: Vec::new(),
            duration,
        }
    }

    #[must_use]
    pub fn failure(origin: PathBuf, error: ParseError, duration: Duration) -> Self {
        Self {
            origin,
            tree: None,
            errors: vec![error],
            duration,
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.tree.is_some() && self.errors.is_empty()
    }

    /// Whether the failure is a grammar/tree builder mismatch
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.errors.iter().any(ParseError::is_internal)
    }
}

/// A batch of files to parse
#[derive(Debug, Clone, Default)]
pub struct ParseBatch {
    /// Files to parse: (origin, content)
    pub files: Vec<(PathBuf, String)>,
}

impl ParseBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an in-memory source
    pub fn add(&mut self, origin: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.push((origin.into(), content.into()));
    }

    /// Read the file at `path` into the batch
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Io`] if the file cannot be read; the batch is unchanged.
    pub fn read(&mut self, path: &Path) -> Result<(), CompileError> {
        let content = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.add(path, content);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Configuration for parallel parsing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParallelConfig {
    /// Number of threads to use (0 = rayon's default)
    pub num_threads: usize,
    /// Stop scheduling files once one has failed
    pub fail_fast: bool,
}

impl ParallelConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

/// Progress callback: (files done, files total)
pub type ProgressCallback<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

/// Parser for batches of independent files
#[derive(Debug, Clone)]
pub struct ParallelParser {
    parser: Arc<Parser>,
    config: ParallelConfig,
}

impl ParallelParser {
    #[must_use]
    pub fn new(parser: Arc<Parser>) -> Self {
        Self::with_config(parser, ParallelConfig::default())
    }

    #[must_use]
    pub const fn with_config(parser: Arc<Parser>, config: ParallelConfig) -> Self {
        Self { parser, config }
    }

    #[must_use]
    pub fn parser(&self) -> &Arc<Parser> {
        &self.parser
    }

    #[must_use]
    pub const fn config(&self) -> &ParallelConfig {
        &self.config
    }

    /// Parse one source
    #[must_use]
    pub fn parse_file(&self, origin: &Path, content: &str) -> FileParseResult {
        let start = Instant::now();
        match self.parser.parse_source(origin, content) {
            Ok(tree) => FileParseResult::success(tree, start.elapsed()),
            Err(error) => FileParseResult::failure(origin.to_path_buf(), error, start.elapsed()),
        }
    }

    /// Parse every file of `batch`.
    ///
    /// With `fail_fast`, files not yet started when a failure is seen are
    /// left out of the result. An internal error always stops the batch.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::ThreadPool`] if a dedicated pool was requested
    /// and could not be built.
    pub fn parse_batch(&self, batch: &ParseBatch) -> Result<Vec<FileParseResult>, CompileError> {
        self.parse_batch_with_progress(batch, &|_, _| {})
    }

    /// [`parse_batch`](Self::parse_batch), calling `progress` after each file
    ///
    /// # Errors
    ///
    /// See [`parse_batch`](Self::parse_batch).
    pub fn parse_batch_with_progress(
        &self,
        batch: &ParseBatch,
        progress: ProgressCallback<'_>,
    ) -> Result<Vec<FileParseResult>, CompileError> {
        let total = batch.len();
        let completed = AtomicUsize::new(0);
        let stop = AtomicBool::new(false);

        let task = |(origin, content): &(PathBuf, String)| {
            if stop.load(Ordering::Acquire) {
                return None;
            }
            let result = self.parse_file(origin, content);
            if result.is_internal() || (self.config.fail_fast && !result.is_ok()) {
                stop.store(true, Ordering::Release);
            }
            let done = completed.fetch_add(1, Ordering::AcqRel) + 1;
            progress(done, total);
            Some(result)
        };

        let results = self.run(batch, task)?;
        log::debug!("parsed {} of {total} files", results.len());
        Ok(results)
    }

    #[cfg(feature = "parallel")]
    fn run<F>(&self, batch: &ParseBatch, task: F) -> Result<Vec<FileParseResult>, CompileError>
    where
        F: Fn(&(PathBuf, String)) -> Option<FileParseResult> + Send + Sync,
    {
        let parse_all = || -> Vec<FileParseResult> { batch.files.par_iter().filter_map(&task).collect() };
        if self.config.num_threads == 0 {
            return Ok(parse_all());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.num_threads)
            .build()
            .map_err(|error| CompileError::ThreadPool(error.to_string()))?;
        Ok(pool.install(parse_all))
    }

    /// Sequential fallback when the parallel feature is disabled
    #[cfg(not(feature = "parallel"))]
    fn run<F>(&self, batch: &ParseBatch, task: F) -> Result<Vec<FileParseResult>, CompileError>
    where
        F: Fn(&(PathBuf, String)) -> Option<FileParseResult>,
    {
        Ok(batch.files.iter().filter_map(task).collect())
    }
}

/// Aggregate results from batch parsing
#[must_use]
pub fn aggregate_results(results: &[FileParseResult]) -> ParseSummary {
    let total_files = results.len();
    let successful = results.iter().filter(|r| r.is_ok()).count();
    let total_errors = results.iter().map(|r| r.errors.len()).sum();
    let total_duration: Duration = results.iter().map(|r| r.duration).sum();
    let avg_duration = u32::try_from(total_files)
        .ok()
        .filter(|&files| files > 0)
        .map_or(Duration::ZERO, |files| total_duration / files);

    ParseSummary {
        total_files,
        successful,
        failed: total_files - successful,
        total_errors,
        total_duration,
        avg_duration,
    }
}

/// Summary of batch parsing results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSummary {
    pub total_files: usize,
    pub successful: usize,
    pub failed: usize,
    /// Total number of errors across all files
    pub total_errors: usize,
    /// Sum of the per file durations
    pub total_duration: Duration,
    pub avg_duration: Duration,
}

impl ParseSummary {
    /// Get the success rate as a percentage
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            100.0
        } else {
            (self.successful as f64 / self.total_files as f64) * 100.0
        }
    }
}
