//! Spreadsheet discovery.
//!
//! Input files live in one folder per configured period:
//! `<input>/<period key>/<subject>_<group>_<suffix>.xls`.

use std::path::{Path, PathBuf};

use grades_core::config::ReportConfig;
use tracing::{debug, warn};

/// Files found for one configured period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodFiles {
    pub period_key: String,
    /// Sorted by path.
    pub files: Vec<PathBuf>,
}

/// Find the spreadsheets of every configured period, in configuration order.
///
/// Periods whose folder is missing or empty are returned with no files.
pub fn find_period_files(input_dir: &Path, config: &ReportConfig) -> Vec<PeriodFiles> {
    config
        .periods
        .iter()
        .map(|period| {
            let folder = input_dir.join(&period.key);
            let files = find_spreadsheets(&folder, &config.extensions);
            if files.is_empty() {
                warn!("No spreadsheets found in {}", folder.display());
            } else {
                debug!("{} spreadsheets in {}", files.len(), folder.display());
            }
            PeriodFiles {
                period_key: period.key.clone(),
                files,
            }
        })
        .collect()
}

/// Spreadsheet files directly inside `folder` (no recursion), sorted by path.
pub fn find_spreadsheets(folder: &Path, extensions: &[String]) -> Vec<PathBuf> {
    if !folder.is_dir() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && has_extension(entry.path(), extensions))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    // Spreadsheet lock files ("~$name.xls") are not workbooks.
    let is_lock_file = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with("~$"))
        .unwrap_or(false);
    !is_lock_file && extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
