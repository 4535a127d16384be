//! Report data assembly.
//!
//! Turns aggregates into ordered, read-only rows for the chart and document
//! renderers. Rows are recomputed on every call; nothing here is cached.

use grades_core::config::ReportConfig;
use grades_core::models::{Group, Percentages, ResultCounts};
use grades_data::aggregator::{AggregateSet, SubjectAggregate};
use grades_data::analysis::BatchResult;
use grades_data::metadata::MetadataResolver;

// ── Period tables ─────────────────────────────────────────────────────────────

/// One subject line of a period table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub subject_code: String,
    pub subject_name: String,
    /// `"<code> - <name>"`, plus `" (<groups>)"` when several groups contributed.
    pub label: String,
    /// Sorted concatenation of contributing groups, e.g. `"AB"`.
    pub groups: String,
    /// All groups summed.
    pub counts: ResultCounts,
    pub percentages: Percentages,
    pub total: u64,
}

impl ReportRow {
    fn from_subject(subject: &SubjectAggregate) -> Self {
        let counts = subject.combined();
        let groups = subject.group_letters();
        let mut label = format!("{} - {}", subject.subject_code, subject.subject_name);
        if subject.groups.len() > 1 {
            label.push_str(&format!(" ({})", groups));
        }
        Self {
            subject_code: subject.subject_code.clone(),
            subject_name: subject.subject_name.clone(),
            label,
            groups,
            percentages: counts.percentages(),
            total: counts.total(),
            counts,
        }
    }
}

/// All rows of one non-empty period, in ascending subject-code order.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodReport {
    pub call_period: String,
    pub display_name: String,
    pub rows: Vec<ReportRow>,
}

/// Assemble one [`PeriodReport`] per non-empty period, in period order.
pub fn assemble(aggregates: &AggregateSet) -> Vec<PeriodReport> {
    aggregates
        .non_empty()
        .map(|period| PeriodReport {
            call_period: period.call_period.clone(),
            display_name: period.display_name.clone(),
            rows: period
                .subjects
                .values()
                .map(ReportRow::from_subject)
                .collect(),
        })
        .collect()
}

// ── Per-file detail ───────────────────────────────────────────────────────────

/// One processed file, as shown in the detailed report.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub call_period: String,
    pub subject_code: String,
    pub subject_name: String,
    pub group: Group,
    pub call_number: String,
    /// `"<code> - <name> - Grup <g> - Convocatòria <n>"`.
    pub title: String,
    /// Source file name without extension; used to name chart artifacts.
    pub stem: String,
    pub counts: ResultCounts,
    pub total: u64,
}

/// Processed files of one non-empty period, in processing order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePeriodReport {
    pub call_period: String,
    pub display_name: String,
    pub files: Vec<FileReport>,
}

/// Assemble the per-file view of `batch`, following the aggregate period order.
pub fn assemble_files(batch: &BatchResult, config: &ReportConfig) -> Vec<FilePeriodReport> {
    let resolver = MetadataResolver::new(config);
    batch
        .aggregates
        .non_empty()
        .map(|period| FilePeriodReport {
            call_period: period.call_period.clone(),
            display_name: period.display_name.clone(),
            files: batch
                .processed_in(&period.call_period)
                .map(|file| FileReport {
                    call_period: period.call_period.clone(),
                    subject_code: file.identity.subject_code.clone(),
                    subject_name: resolver.subject_name(&file.identity.subject_code).to_string(),
                    group: file.identity.group,
                    call_number: file.identity.call_number.clone(),
                    title: resolver.title(&file.identity),
                    stem: file
                        .path
                        .file_stem()
                        .map(|s| s.to_string_lossy().to_string())
                        .unwrap_or_else(|| file.identity.subject_code.clone()),
                    total: file.counts.total(),
                    counts: file.counts.clone(),
                })
                .collect(),
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
