//! Batch pipeline: resolve, load, extract and aggregate every input file.
//!
//! Failures are isolated per file; a failing file contributes nothing to the
//! aggregates and is listed in [`BatchResult::failures`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use grades_core::config::ReportConfig;
use grades_core::error::{GradesError, Result};
use grades_core::models::{DuplicatePolicy, FileIdentity, ResultCounts};
use tracing::{debug, info, warn};

use crate::aggregator::{AggregateSet, ResultsAggregator};
use crate::extractor::{ExtractionWarning, GradeExtractor};
use crate::metadata::MetadataResolver;
use crate::reader::PeriodFiles;
use crate::sheet::SheetLoader;

// ── Public types ──────────────────────────────────────────────────────────────

/// A file that was extracted and aggregated.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub path: PathBuf,
    pub identity: FileIdentity,
    pub counts: ResultCounts,
    pub warnings: Vec<ExtractionWarning>,
    /// A later file with the same identity replaced these counts in the
    /// aggregates.
    pub superseded: bool,
}

/// A file that contributed nothing, with the reason.
#[derive(Debug)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: GradesError,
}

/// The complete output of [`run_batch`].
#[derive(Debug)]
pub struct BatchResult {
    pub aggregates: AggregateSet,
    /// Successful files in processing order.
    pub processed: Vec<ProcessedFile>,
    pub failures: Vec<FailedFile>,
    pub generated_at: DateTime<Local>,
}

impl BatchResult {
    /// Files of one period whose counts are in the aggregates, in
    /// processing order.
    pub fn processed_in<'a>(
        &'a self,
        call_period: &'a str,
    ) -> impl Iterator<Item = &'a ProcessedFile> + 'a {
        self.processed
            .iter()
            .filter(move |f| !f.superseded && f.identity.call_period == call_period)
    }

    /// Files whose counts were replaced by a later duplicate.
    pub fn superseded(&self) -> impl Iterator<Item = &ProcessedFile> + '_ {
        self.processed.iter().filter(|f| f.superseded)
    }

    /// Total number of files attempted.
    pub fn files_seen(&self) -> usize {
        self.processed.len() + self.failures.len()
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the pipeline over `inputs`, period by period, file by file.
///
/// The order of `inputs` fixes the merge order, which decides the surviving
/// group under [`DuplicatePolicy::Overwrite`].
pub fn run_batch(
    config: &ReportConfig,
    loader: &dyn SheetLoader,
    inputs: &[PeriodFiles],
    policy: DuplicatePolicy,
) -> BatchResult {
    let resolver = MetadataResolver::new(config);
    let extractor = GradeExtractor::from_config(config);
    let mut aggregator = ResultsAggregator::new(config, policy);

    let mut processed = Vec::new();
    let mut failures = Vec::new();

    for period in inputs {
        info!(
            "Processing period {} ({} files)",
            period.period_key,
            period.files.len()
        );

        for path in &period.files {
            let outcome = process_file(&resolver, &extractor, loader, path).and_then(|file| {
                aggregator
                    .merge(&file.identity, &file.counts)
                    .map(|replaced| (file, replaced.is_some()))
            });

            match outcome {
                Ok((file, replaced)) => {
                    if replaced {
                        mark_superseded(&mut processed, &file);
                    }
                    debug!(
                        "{}_{}: {} students",
                        file.identity.subject_code,
                        file.identity.group,
                        file.counts.total()
                    );
                    processed.push(file);
                }
                Err(error) => {
                    warn!("Error processing {}: {}", path.display(), error);
                    failures.push(FailedFile {
                        path: path.clone(),
                        error,
                    });
                }
            }
        }
    }

    info!(
        "Processed {} files, {} failed",
        processed.len(),
        failures.len()
    );

    BatchResult {
        aggregates: aggregator.finish(),
        processed,
        failures,
        generated_at: Local::now(),
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn mark_superseded(processed: &mut [ProcessedFile], replacement: &ProcessedFile) {
    if let Some(previous) = processed
        .iter_mut()
        .find(|p| !p.superseded && p.identity == replacement.identity)
    {
        warn!(
            "{} superseded by {}",
            previous.path.display(),
            replacement.path.display()
        );
        previous.superseded = true;
    }
}

fn process_file(
    resolver: &MetadataResolver<'_>,
    extractor: &GradeExtractor,
    loader: &dyn SheetLoader,
    path: &Path,
) -> Result<ProcessedFile> {
    let identity = resolver.resolve(path)?;
    let grid = loader.load(path)?;
    let extraction = extractor.extract(&grid)?;

    for warning in &extraction.warnings {
        warn!("{}: {}", path.display(), warning);
    }

    Ok(ProcessedFile {
        path: path.to_path_buf(),
        identity,
        counts: extraction.counts,
        warnings: extraction.warnings,
        superseded: false,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
