//! Grade label normalisation.
//!
//! Maps the free-text grade written in a spreadsheet cell to one of the six
//! [`Category`] values using the spelling variants from the configuration.

use std::collections::HashMap;

use crate::config::ReportConfig;
use crate::models::Category;

/// Outcome of classifying one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A recognised grade.
    Category(Category),
    /// Blank or not-a-number cell; carries no student.
    Skip,
    /// Non-empty text that matches no known variant (trimmed).
    Unknown(String),
}

/// Texts treated like an empty cell.
const NOT_A_NUMBER: [&str; 2] = ["nan", "NaN"];

/// Exact-match lookup table from spelling variant to category.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    variants: HashMap<String, Category>,
}

impl LabelTable {
    /// Build the table from the configured category variants.
    ///
    /// A variant listed under two categories keeps the first one.
    pub fn from_config(config: &ReportConfig) -> Self {
        let mut variants = HashMap::new();
        for category in &config.categories {
            for variant in &category.variants {
                let key = variant.trim().to_string();
                if let Some(existing) = variants.get(&key) {
                    tracing::warn!(
                        "label {:?} listed for both {} and {}; keeping {}",
                        key,
                        existing,
                        category.code,
                        existing
                    );
                    continue;
                }
                variants.insert(key, category.code);
            }
        }
        Self { variants }
    }

    /// Classify raw cell text. Matching is case- and accent-sensitive.
    pub fn classify(&self, raw: &str) -> Classification {
        let text = raw.trim();
        if text.is_empty() || NOT_A_NUMBER.contains(&text) {
            return Classification::Skip;
        }
        match self.variants.get(text) {
            Some(category) => Classification::Category(*category),
            None => Classification::Unknown(text.to_string()),
        }
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}
