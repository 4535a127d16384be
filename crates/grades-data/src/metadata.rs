//! File identity from naming conventions.
//!
//! `excels/1Q2/34154_A_1Q2.xls` → subject `34154`, group `A`, period `1Q2`,
//! call number from the period table.

use std::path::Path;

use grades_core::config::ReportConfig;
use grades_core::error::{GradesError, Result};
use grades_core::models::{FileIdentity, Group};
use regex::Regex;

/// Call number used when the period folder is not configured.
pub const DEFAULT_CALL_NUMBER: &str = "1";

/// Resolves [`FileIdentity`] values from file paths.
#[derive(Debug, Clone)]
pub struct MetadataResolver<'a> {
    config: &'a ReportConfig,
    subject_re: Regex,
    group_re: Regex,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self {
            config,
            // A run of exactly five digits.
            subject_re: Regex::new(r"(?:^|[^0-9])([0-9]{5})(?:[^0-9]|$)")
                .expect("subject pattern is valid"),
            // `_<letter>_<suffix>.<ext>`; the suffix may contain dots and the
            // leftmost `_<letter>_` wins.
            group_re: Regex::new(r"_([A-Za-z])_.*\.[^.]+$").expect("group pattern is valid"),
        }
    }

    /// Derive subject, group, period and call number from `path`.
    ///
    /// Only a missing subject code is an error; an absent group becomes
    /// [`Group::Unresolved`] and an unknown folder gets call number `"1"`.
    pub fn resolve(&self, path: &Path) -> Result<FileIdentity> {
        let text = path.to_string_lossy();

        let subject_code = self
            .subject_re
            .captures(&text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| GradesError::Metadata(path.to_path_buf()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let group = self
            .group_re
            .captures(&file_name)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().chars().next())
            .map(Group::Letter)
            .unwrap_or(Group::Unresolved);

        let call_period = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let call_number = match self.config.period(&call_period) {
            Some(period) => period.call_number.clone(),
            None => {
                tracing::debug!(
                    "folder {:?} of {} is not a configured period; assuming call {}",
                    call_period,
                    path.display(),
                    DEFAULT_CALL_NUMBER
                );
                DEFAULT_CALL_NUMBER.to_string()
            }
        };

        Ok(FileIdentity {
            subject_code,
            group,
            call_period,
            call_number,
        })
    }

    /// Subject name for `code`, or the unknown-subject placeholder.
    pub fn subject_name(&self, code: &str) -> &'a str {
        self.config.subject_name(code)
    }

    /// Chart/table title of a single file:
    /// `"<code> - <name> - Grup <g> - Convocatòria <n>"`.
    pub fn title(&self, identity: &FileIdentity) -> String {
        format!(
            "{} - {} - {} {} - {} {}",
            identity.subject_code,
            self.subject_name(&identity.subject_code),
            self.config.texts.group,
            identity.group,
            self.config.texts.call,
            identity.call_number
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn resolve(path: &str) -> Result<FileIdentity> {
        let config = ReportConfig::default();
        MetadataResolver::new(&config).resolve(&PathBuf::from(path))
    }

    #[test]
    fn test_resolve_standard_path() {
        let identity = resolve("excels/1Q2/34154_A_1Q2.xls").expect("resolve");
        assert_eq!(identity.subject_code, "34154");
        assert_eq!(identity.group, Group::Letter('A'));
        assert_eq!(identity.call_period, "1Q2");
        assert_eq!(identity.call_number, "2");
    }

    #[test]
    fn test_first_call_period() {
        let identity = resolve("excels/2Q1/34164_B_2Q1.xls").expect("resolve");
        assert_eq!(identity.group, Group::Letter('B'));
        assert_eq!(identity.call_number, "1");
    }

    #[test]
    fn test_group_with_longer_suffix() {
        let identity = resolve("excels/A2/34242_B_A2_definitiu.xlsx").expect("resolve");
        assert_eq!(identity.subject_code, "34242");
        assert_eq!(identity.group, Group::Letter('B'));
        assert_eq!(identity.call_period, "A2");
        assert_eq!(identity.call_number, "2");
    }

    #[test]
    fn test_group_suffix_with_dots() {
        let identity = resolve("excels/1Q2/34154_A_1Q2.v2.xls").expect("resolve");
        assert_eq!(identity.group, Group::Letter('A'));

        let identity = resolve("excels/1Q2/34154_B_acta 1.1.xlsx").expect("resolve");
        assert_eq!(identity.group, Group::Letter('B'));

        let identity = resolve("excels/1Q2/34154_A_B_1Q2.xls").expect("resolve");
        assert_eq!(identity.group, Group::Letter('A'));
    }

    #[test]
    fn test_missing_group_is_unresolved() {
        let identity = resolve("excels/1Q1/34154.xls").expect("resolve");
        assert_eq!(identity.group, Group::Unresolved);
    }

    #[test]
    fn test_missing_subject_code_is_metadata_error() {
        let err = resolve("excels/1Q1/actes_A_1Q1.xls").unwrap_err();
        assert!(matches!(err, GradesError::Metadata(_)));
    }

    #[test]
    fn test_longer_digit_runs_are_not_subject_codes() {
        let err = resolve("excels/1Q1/123456_A_1Q1.xls").unwrap_err();
        assert!(matches!(err, GradesError::Metadata(_)));

        let identity = resolve("excels/1Q1/2024123_34170_A_1Q1.xls").expect("resolve");
        assert_eq!(identity.subject_code, "34170");
    }

    #[test]
    fn test_unknown_folder_defaults_to_first_call() {
        let identity = resolve("archive/34154_A_x.xls").expect("resolve");
        assert_eq!(identity.call_period, "archive");
        assert_eq!(identity.call_number, "1");
    }

    #[test]
    fn test_subject_name_placeholder() {
        let config = ReportConfig::default();
        let resolver = MetadataResolver::new(&config);
        assert_eq!(resolver.subject_name("34154"), "Programació matemàtica");
        assert_eq!(resolver.subject_name("00000"), "Assignatura desconeguda");
    }

    #[test]
    fn test_title() {
        let config = ReportConfig::default();
        let resolver = MetadataResolver::new(&config);
        let identity = resolver
            .resolve(&PathBuf::from("excels/1Q2/34154_A_1Q2.xls"))
            .expect("resolve");
        assert_eq!(
            resolver.title(&identity),
            "34154 - Programació matemàtica - Grup A - Convocatòria 2"
        );
    }
}
