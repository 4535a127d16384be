//! Grade column extraction.
//!
//! Grades sit in a single designated column (M by default). The first cell of
//! that column equal to the marker value is the header; every row below it
//! holds one student's grade label.

use std::fmt;

use grades_core::config::ReportConfig;
use grades_core::error::{GradesError, Result};
use grades_core::labels::{Classification, LabelTable};
use grades_core::models::ResultCounts;

use crate::sheet::Grid;

/// Non-fatal irregularity found while extracting one sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionWarning {
    /// The marker never appeared; the whole column was scanned.
    MissingMarker { marker: String },
    /// A cell matched no known grade label and was not counted.
    /// `row` is one-based, as shown by spreadsheet applications.
    UnclassifiedLabel { row: usize, text: String },
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::MissingMarker { marker } => {
                write!(f, "marker {:?} not found; scanned from the first row", marker)
            }
            ExtractionWarning::UnclassifiedLabel { row, text } => {
                write!(f, "unknown label {:?} in row {}", text, row)
            }
        }
    }
}

/// Counts of one sheet plus the warnings raised while reading it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extraction {
    pub counts: ResultCounts,
    pub warnings: Vec<ExtractionWarning>,
}

/// Classifies the results column of a sheet into [`ResultCounts`].
#[derive(Debug, Clone)]
pub struct GradeExtractor {
    labels: LabelTable,
    marker: String,
    column: usize,
}

impl GradeExtractor {
    pub fn new(labels: LabelTable, marker: impl Into<String>, column: usize) -> Self {
        Self {
            labels,
            marker: marker.into(),
            column,
        }
    }

    /// Extractor using the configured labels, marker and results column.
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(
            LabelTable::from_config(config),
            config.marker.clone(),
            config.results_column,
        )
    }

    /// Count the grades of `grid`.
    ///
    /// An empty grid yields all-zero counts. A non-empty grid without the
    /// results column is a [`GradesError::FileFormat`].
    pub fn extract(&self, grid: &Grid) -> Result<Extraction> {
        if grid.is_empty() {
            return Ok(Extraction::default());
        }
        if grid.width() <= self.column {
            return Err(GradesError::FileFormat {
                columns: grid.width(),
                required: self.column + 1,
            });
        }

        let mut extraction = Extraction::default();
        let start = match self.find_marker(grid) {
            Some(header) => header + 1,
            None => {
                extraction.warnings.push(ExtractionWarning::MissingMarker {
                    marker: self.marker.clone(),
                });
                0
            }
        };

        for (row, cell) in grid.column(self.column).enumerate().skip(start) {
            match self.labels.classify(&cell.text()) {
                Classification::Category(category) => extraction.counts.increment(category),
                Classification::Skip => {}
                Classification::Unknown(text) => {
                    extraction
                        .warnings
                        .push(ExtractionWarning::UnclassifiedLabel { row: row + 1, text });
                }
            }
        }

        Ok(extraction)
    }

    /// Index of the first row whose results cell equals the marker.
    fn find_marker(&self, grid: &Grid) -> Option<usize> {
        grid.column(self.column)
            .position(|cell| cell.text().trim() == self.marker)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
