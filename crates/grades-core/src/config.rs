//! Course configuration: subject names, period folders, category labels and
//! the spelling variants accepted for each grade.
//!
//! Loaded once per run from JSON (or the built-in defaults) and shared
//! read-only by every pipeline stage.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GradesError, Result};
use crate::models::Category;

/// Marker value that precedes the first grade row in the results column.
pub const DEFAULT_MARKER: &str = "DSP_NOMID1";

/// Zero-based index of spreadsheet column M.
pub const DEFAULT_RESULTS_COLUMN: usize = 12;

// ── Config types ──────────────────────────────────────────────────────────────

/// One configured teaching period (input folder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodConfig {
    /// Folder name, e.g. `"1Q1"`.
    pub key: String,
    /// Section title used in reports.
    pub name: String,
    /// Examination call, `"1"` or `"2"`.
    pub call_number: String,
}

/// Display data and accepted spellings for one [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub code: Category,
    pub label: String,
    /// Chart colour as `#rrggbb`.
    pub color: String,
    /// Exact cell texts that classify as this category.
    pub variants: Vec<String>,
}

/// Fixed strings rendered into reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportTexts {
    pub title: String,
    pub result: String,
    pub students: String,
    pub percentage: String,
    pub total: String,
    pub group: String,
    pub call: String,
    pub subject: String,
    pub percentages_caption: String,
    pub distribution_caption: String,
    pub students_axis: String,
    pub summary: String,
    pub subjects_count: String,
    pub students_count: String,
    pub failed_files: String,
    pub superseded_files: String,
}

impl Default for ReportTexts {
    fn default() -> Self {
        Self {
            title: "Informe de Resultats Acadèmics".to_string(),
            result: "Resultat".to_string(),
            students: "Estudiants".to_string(),
            percentage: "Percentatge".to_string(),
            total: "Total".to_string(),
            group: "Grup".to_string(),
            call: "Convocatòria".to_string(),
            subject: "Assignatura".to_string(),
            percentages_caption: "Resultats en percentatges".to_string(),
            distribution_caption: "Distribució de resultats".to_string(),
            students_axis: "Percentatge d'estudiants (%)".to_string(),
            summary: "RESUM".to_string(),
            subjects_count: "assignatures".to_string(),
            students_count: "estudiants".to_string(),
            failed_files: "Error processant".to_string(),
            superseded_files: "Substituït per un fitxer posterior".to_string(),
        }
    }
}

/// Complete run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub course: String,
    pub author: String,
    pub degrees: Vec<String>,
    /// Subject code → subject name.
    pub subjects: BTreeMap<String, String>,
    /// Periods in report order.
    pub periods: Vec<PeriodConfig>,
    /// Categories; every [`Category`] must appear exactly once.
    pub categories: Vec<CategoryConfig>,
    pub marker: String,
    pub results_column: usize,
    /// Spreadsheet file extensions picked up during discovery.
    pub extensions: Vec<String>,
    pub unknown_subject: String,
    pub texts: ReportTexts,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let subjects = [
            ("34154", "Programació matemàtica"),
            ("34155", "Àlgebra lineal i geometria II"),
            ("34156", "Anàlisi matemàtica II"),
            ("34161", "Mètodes numèrics per a l'àlgebra lineal"),
            ("34164", "Topologia"),
            ("34168", "Estructures algebraiques"),
            ("34170", "Equacions diferencials ordinàries"),
            ("34242", "Mecànica I"),
            ("34245", "Termodinàmica"),
            ("34251", "Laboratori de termodinàmica"),
            ("34651", "Ètica. Legislació i professió"),
            ("34670", "Estructures de dades i algorismes"),
            ("34879", "Empresa"),
            ("34885", "Arquitectura de xarxes de computadors"),
            ("36586", "Anàlisi Matemàtica II F-M"),
            ("36587", "Àlgebra Lineal i Geometria II F-M"),
            ("36588", "Equacions Diferencials Ordinàries F-M"),
            ("36589", "Mètodes Numèrics"),
        ]
        .into_iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect();

        let periods = [
            ("1Q1", "Primer Quadrimestre - Primera Convocatòria", "1"),
            ("1Q2", "Primer Quadrimestre - Segona Convocatòria", "2"),
            ("2Q1", "Segon Quadrimestre - Primera Convocatòria", "1"),
            ("2Q2", "Segon Quadrimestre - Segona Convocatòria", "2"),
            ("A1", "Assignatures Anuals - Primera Convocatòria", "1"),
            ("A2", "Assignatures Anuals - Segona Convocatòria", "2"),
        ]
        .into_iter()
        .map(|(key, name, call)| PeriodConfig {
            key: key.to_string(),
            name: name.to_string(),
            call_number: call.to_string(),
        })
        .collect();

        let categories = [
            (
                Category::NotPresented,
                "No presentat",
                "#ff99cc",
                &["No presentat", "No presentado"][..],
            ),
            (Category::Failed, "Suspès", "#ff0000", &["Suspès", "Suspenso"][..]),
            (Category::Passed, "Aprovat", "#ffff00", &["Aprovat", "Aprobado"][..]),
            (Category::Good, "Notable", "#00ff00", &["Notable"][..]),
            (
                Category::Excellent,
                "Excel·lent",
                "#0000ff",
                &["Excel·lent", "Excelente", "Sobresaliente"][..],
            ),
            (
                Category::Honors,
                "Matrícula d'Honor",
                "#800080",
                &[
                    "Matrícula d'honor",
                    "Matrícula d'Honor",
                    "Matrícula de Honor",
                    "Matrícula de honor",
                ][..],
            ),
        ]
        .into_iter()
        .map(|(code, label, color, variants)| CategoryConfig {
            code,
            label: label.to_string(),
            color: color.to_string(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
        })
        .collect();

        Self {
            course: "2o curs".to_string(),
            author: "Coordinació 2o curs".to_string(),
            degrees: vec![
                "Grau en Matemàtiques".to_string(),
                "Doble Grau en Matemàtiques i en Enginyeria Telemàtica".to_string(),
                "Doble Grau en Matemàtiques i en Enginyeria Informàtica".to_string(),
                "Doble Grau en Física i Matemàtiques".to_string(),
            ],
            subjects,
            periods,
            categories,
            marker: DEFAULT_MARKER.to_string(),
            results_column: DEFAULT_RESULTS_COLUMN,
            extensions: vec!["xls".to_string(), "xlsx".to_string()],
            unknown_subject: "Assignatura desconeguda".to_string(),
            texts: ReportTexts::default(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl ReportConfig {
    /// Default user config location: `~/.grades-report/config.json`.
    pub fn default_path() -> PathBuf {
        Self::default_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir` (used for testing).
    pub fn default_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".grades-report").join("config.json")
    }

    /// Load and validate a config file. Unlisted fields keep their defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| GradesError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ReportConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Pick the configuration for this run.
    ///
    /// An explicit path must load. Otherwise `fallback` is used when it
    /// exists, and the built-in tables when it does not.
    pub fn resolve(explicit: Option<&Path>, fallback: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!("loading configuration from {}", path.display());
            return Self::load_from(path);
        }
        if fallback.exists() {
            tracing::debug!("loading configuration from {}", fallback.display());
            return Self::load_from(fallback);
        }
        tracing::debug!("using built-in configuration");
        Ok(Self::default())
    }

    /// Reject tables the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for category in &self.categories {
            if !seen.insert(category.code) {
                return Err(GradesError::Config(format!(
                    "category {} is declared more than once",
                    category.code
                )));
            }
        }
        if let Some(missing) = Category::ALL.into_iter().find(|c| !seen.contains(c)) {
            return Err(GradesError::Config(format!("missing category {}", missing)));
        }

        let mut keys = BTreeSet::new();
        for period in &self.periods {
            if !keys.insert(period.key.as_str()) {
                return Err(GradesError::Config(format!(
                    "period {} is declared more than once",
                    period.key
                )));
            }
            if period.call_number != "1" && period.call_number != "2" {
                return Err(GradesError::Config(format!(
                    "period {} has invalid call number {:?}",
                    period.key, period.call_number
                )));
            }
        }

        if self.marker.trim().is_empty() {
            return Err(GradesError::Config("marker must not be empty".to_string()));
        }
        Ok(())
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn period(&self, key: &str) -> Option<&PeriodConfig> {
        self.periods.iter().find(|p| p.key == key)
    }

    /// Subject name, or the unknown-subject placeholder.
    pub fn subject_name(&self, code: &str) -> &str {
        self.subjects
            .get(code)
            .map(String::as_str)
            .unwrap_or(&self.unknown_subject)
    }

    pub fn category(&self, category: Category) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.code == category)
    }

    /// Display label for `category`, falling back to its code.
    pub fn category_label(&self, category: Category) -> &str {
        self.category(category)
            .map(|c| c.label.as_str())
            .unwrap_or_else(|| category.code())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = ReportConfig::default();
        config.validate().expect("default config must validate");
        assert_eq!(config.periods.len(), 6);
        assert_eq!(config.subjects.len(), 18);
        assert_eq!(config.marker, "DSP_NOMID1");
        assert_eq!(config.results_column, 12);
    }

    #[test]
    fn test_period_order_follows_configuration() {
        let config = ReportConfig::default();
        let keys: Vec<&str> = config.periods.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["1Q1", "1Q2", "2Q1", "2Q2", "A1", "A2"]);
    }

    #[test]
    fn test_subject_name_lookup_and_placeholder() {
        let config = ReportConfig::default();
        assert_eq!(config.subject_name("34154"), "Programació matemàtica");
        assert_eq!(config.subject_name("99999"), "Assignatura desconeguda");
    }

    #[test]
    fn test_category_label() {
        let config = ReportConfig::default();
        assert_eq!(config.category_label(Category::Honors), "Matrícula d'Honor");
        assert_eq!(config.category_label(Category::NotPresented), "No presentat");
    }

    #[test]
    fn test_validate_rejects_missing_category() {
        let mut config = ReportConfig::default();
        config.categories.retain(|c| c.code != Category::Honors);
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: missing category MH");
    }

    #[test]
    fn test_validate_rejects_duplicate_category() {
        let mut config = ReportConfig::default();
        let dup = config.categories[0].clone();
        config.categories.push(dup);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_call_number() {
        let mut config = ReportConfig::default();
        config.periods[0].call_number = "3".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_json_keeps_defaults() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "course": "3r curs", "subjects": { "11111": "Geometria" } }"#,
        )
        .expect("write");

        let config = ReportConfig::load_from(&path).expect("load");
        assert_eq!(config.course, "3r curs");
        assert_eq!(config.subject_name("11111"), "Geometria");
        assert_eq!(config.subject_name("34154"), "Assignatura desconeguda");
        assert_eq!(config.periods.len(), 6);
    }

    #[test]
    fn test_load_invalid_json_is_error() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{ not json").expect("write");
        assert!(matches!(
            ReportConfig::load_from(&path),
            Err(GradesError::JsonParse(_))
        ));
    }

    #[test]
    fn test_resolve_prefers_explicit_path() {
        let tmp = TempDir::new().expect("tempdir");
        let explicit = tmp.path().join("explicit.json");
        std::fs::write(&explicit, r#"{ "course": "explicit" }"#).expect("write");
        let fallback = ReportConfig::default_path_in(tmp.path());

        let config = ReportConfig::resolve(Some(&explicit), &fallback).expect("resolve");
        assert_eq!(config.course, "explicit");
    }

    #[test]
    fn test_resolve_explicit_missing_is_error() {
        let tmp = TempDir::new().expect("tempdir");
        let missing = tmp.path().join("missing.json");
        let fallback = ReportConfig::default_path_in(tmp.path());
        assert!(matches!(
            ReportConfig::resolve(Some(&missing), &fallback),
            Err(GradesError::FileRead { .. })
        ));
    }

    #[test]
    fn test_resolve_uses_fallback_then_default() {
        let tmp = TempDir::new().expect("tempdir");
        let fallback = ReportConfig::default_path_in(tmp.path());

        let config = ReportConfig::resolve(None, &fallback).expect("resolve");
        assert_eq!(config, ReportConfig::default());

        std::fs::create_dir_all(fallback.parent().unwrap()).expect("mkdir");
        std::fs::write(&fallback, r#"{ "author": "Coordinació" }"#).expect("write");
        let config = ReportConfig::resolve(None, &fallback).expect("resolve");
        assert_eq!(config.author, "Coordinació");
    }
}
