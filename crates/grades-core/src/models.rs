use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Outcome category of a single student record.
///
/// Declaration order is the canonical report order (`NP, SU, AP, NO, EX, MH`);
/// the derived `Ord` relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Did not sit the exam.
    #[serde(rename = "NP")]
    NotPresented,
    /// Failed.
    #[serde(rename = "SU")]
    Failed,
    /// Passed.
    #[serde(rename = "AP")]
    Passed,
    /// Good ("notable").
    #[serde(rename = "NO")]
    Good,
    /// Excellent.
    #[serde(rename = "EX")]
    Excellent,
    /// Honours ("matrícula d'honor").
    #[serde(rename = "MH")]
    Honors,
}

impl Category {
    /// All six categories in canonical order.
    pub const ALL: [Category; 6] = [
        Category::NotPresented,
        Category::Failed,
        Category::Passed,
        Category::Good,
        Category::Excellent,
        Category::Honors,
    ];

    /// Two-letter internal code.
    pub fn code(self) -> &'static str {
        match self {
            Category::NotPresented => "NP",
            Category::Failed => "SU",
            Category::Passed => "AP",
            Category::Good => "NO",
            Category::Excellent => "EX",
            Category::Honors => "MH",
        }
    }

    /// Parse a two-letter internal code.
    pub fn from_code(code: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ── ResultCounts ──────────────────────────────────────────────────────────────

/// Per-category student tally for one file, group, subject or period.
///
/// Always holds exactly the six categories; missing ones are zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultCounts {
    counts: BTreeMap<Category, u64>,
}

impl Default for ResultCounts {
    fn default() -> Self {
        Self {
            counts: Category::ALL.into_iter().map(|c| (c, 0)).collect(),
        }
    }
}

impl ResultCounts {
    /// All-zero counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build counts from `(category, count)` pairs; unlisted categories stay zero.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Category, u64)>) -> Self {
        let mut counts = Self::default();
        for (category, n) in pairs {
            counts.add(category, n);
        }
        counts
    }

    pub fn get(&self, category: Category) -> u64 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Record one more student in `category`.
    pub fn increment(&mut self, category: Category) {
        self.add(category, 1);
    }

    pub fn add(&mut self, category: Category, n: u64) {
        *self.counts.entry(category).or_insert(0) += n;
    }

    /// Add every category of `other` into `self`.
    pub fn merge(&mut self, other: &ResultCounts) {
        for (category, n) in other.iter() {
            self.add(category, n);
        }
    }

    /// Number of classified students.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate `(category, count)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u64)> + '_ {
        self.counts.iter().map(|(c, n)| (*c, *n))
    }

    /// Share of each category in percent of [`total`](Self::total).
    ///
    /// All zero when there are no students.
    pub fn percentages(&self) -> Percentages {
        let total = self.total();
        let values = Category::ALL
            .into_iter()
            .map(|c| {
                let pct = if total == 0 {
                    0.0
                } else {
                    self.get(c) as f64 / total as f64 * 100.0
                };
                (c, pct)
            })
            .collect();
        Percentages { values }
    }
}

/// Percentage view of a [`ResultCounts`], one value per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Percentages {
    values: BTreeMap<Category, f64>,
}

impl Percentages {
    pub fn get(&self, category: Category) -> f64 {
        self.values.get(&category).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.values.iter().map(|(c, v)| (*c, *v))
    }

    pub fn sum(&self) -> f64 {
        self.values.values().sum()
    }
}

// ── Group / FileIdentity ──────────────────────────────────────────────────────

/// Student group a file belongs to.
///
/// `Unresolved` sorts after every letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    Letter(char),
    /// File name carried no `_<letter>_` group segment.
    Unresolved,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Letter(c) => write!(f, "{}", c),
            Group::Unresolved => f.write_str("?"),
        }
    }
}

/// Identity of one input file, derived purely from its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIdentity {
    /// Five-digit subject code.
    pub subject_code: String,
    pub group: Group,
    /// Name of the enclosing period folder, e.g. `"1Q2"`.
    pub call_period: String,
    /// Examination call, `"1"` or `"2"`.
    pub call_number: String,
}

// ── DuplicatePolicy ───────────────────────────────────────────────────────────

/// What to do when a second file maps to an already stored
/// (period, subject, group) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Replace the stored counts with the later file's counts.
    #[default]
    Overwrite,
    /// Reject the later file.
    Fail,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
