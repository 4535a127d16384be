//! Results aggregation by period, subject and group.
//!
//! Per-file counts are folded into a [`PeriodAggregate`] per call period,
//! a [`SubjectAggregate`] per subject code and one [`ResultCounts`] per group.

use std::collections::BTreeMap;

use grades_core::config::ReportConfig;
use grades_core::error::{GradesError, Result};
use grades_core::models::{DuplicatePolicy, FileIdentity, Group, ResultCounts};

// ── SubjectAggregate ──────────────────────────────────────────────────────────

/// All groups of one subject within one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAggregate {
    pub subject_code: String,
    pub subject_name: String,
    /// Counts per group, letters first, then the unresolved group.
    pub groups: BTreeMap<Group, ResultCounts>,
}

impl SubjectAggregate {
    fn new(subject_code: impl Into<String>, subject_name: impl Into<String>) -> Self {
        Self {
            subject_code: subject_code.into(),
            subject_name: subject_name.into(),
            groups: BTreeMap::new(),
        }
    }

    /// Sum of every group's counts.
    pub fn combined(&self) -> ResultCounts {
        let mut totals = ResultCounts::new();
        for counts in self.groups.values() {
            totals.merge(counts);
        }
        totals
    }

    /// Number of students across all groups.
    pub fn total(&self) -> u64 {
        self.groups.values().map(ResultCounts::total).sum()
    }

    /// Sorted concatenation of the contributing groups, e.g. `"AB"`.
    pub fn group_letters(&self) -> String {
        self.groups.keys().map(|g| g.to_string()).collect()
    }
}

// ── PeriodAggregate ───────────────────────────────────────────────────────────

/// All subjects of one call period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodAggregate {
    pub call_period: String,
    pub display_name: String,
    /// Keyed by subject code; iterates in ascending code order.
    pub subjects: BTreeMap<String, SubjectAggregate>,
}

impl PeriodAggregate {
    fn new(call_period: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            call_period: call_period.into(),
            display_name: display_name.into(),
            subjects: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Sum over every subject and group of the period.
    pub fn combined(&self) -> ResultCounts {
        let mut totals = ResultCounts::new();
        for subject in self.subjects.values() {
            totals.merge(&subject.combined());
        }
        totals
    }
}

// ── AggregateSet ──────────────────────────────────────────────────────────────

/// Every period of a run, in report order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregateSet {
    periods: Vec<PeriodAggregate>,
}

impl AggregateSet {
    /// Periods in configuration order, then unconfigured ones by key.
    pub fn periods(&self) -> &[PeriodAggregate] {
        &self.periods
    }

    pub fn get(&self, call_period: &str) -> Option<&PeriodAggregate> {
        self.periods.iter().find(|p| p.call_period == call_period)
    }

    /// Periods holding at least one subject.
    pub fn non_empty(&self) -> impl Iterator<Item = &PeriodAggregate> + '_ {
        self.periods.iter().filter(|p| !p.is_empty())
    }
}

// ── ResultsAggregator ─────────────────────────────────────────────────────────

/// Folds `(FileIdentity, ResultCounts)` pairs into an [`AggregateSet`].
///
/// Configured periods exist from the start, even when no file reaches them.
#[derive(Debug, Clone)]
pub struct ResultsAggregator<'a> {
    config: &'a ReportConfig,
    policy: DuplicatePolicy,
    configured: Vec<PeriodAggregate>,
    extra: BTreeMap<String, PeriodAggregate>,
}

impl<'a> ResultsAggregator<'a> {
    pub fn new(config: &'a ReportConfig, policy: DuplicatePolicy) -> Self {
        let configured = config
            .periods
            .iter()
            .map(|p| PeriodAggregate::new(p.key.clone(), p.name.clone()))
            .collect();
        Self {
            config,
            policy,
            configured,
            extra: BTreeMap::new(),
        }
    }

    /// Aggregate a whole sequence in order.
    pub fn merge_all<'i>(
        config: &'a ReportConfig,
        policy: DuplicatePolicy,
        pairs: impl IntoIterator<Item = (&'i FileIdentity, &'i ResultCounts)>,
    ) -> Result<AggregateSet> {
        let mut aggregator = Self::new(config, policy);
        for (identity, counts) in pairs {
            aggregator.merge(identity, counts)?;
        }
        Ok(aggregator.finish())
    }

    /// Store `counts` under the period, subject and group of `identity`.
    ///
    /// Returns the counts that were replaced, if the group was already stored.
    /// With [`DuplicatePolicy::Fail`] an already stored group is left
    /// untouched and [`GradesError::DuplicateGroup`] is returned.
    pub fn merge(
        &mut self,
        identity: &FileIdentity,
        counts: &ResultCounts,
    ) -> Result<Option<ResultCounts>> {
        let config = self.config;
        let policy = self.policy;
        let period = self.period_mut(&identity.call_period);

        let subject = period
            .subjects
            .entry(identity.subject_code.clone())
            .or_insert_with(|| {
                if !config.subjects.contains_key(&identity.subject_code) {
                    tracing::warn!(
                        "subject {} is not configured; reporting it as {:?}",
                        identity.subject_code,
                        config.unknown_subject
                    );
                }
                SubjectAggregate::new(
                    identity.subject_code.clone(),
                    config.subject_name(&identity.subject_code),
                )
            });

        if subject.groups.contains_key(&identity.group) {
            match policy {
                DuplicatePolicy::Fail => {
                    return Err(GradesError::DuplicateGroup {
                        call_period: identity.call_period.clone(),
                        subject_code: identity.subject_code.clone(),
                        group: identity.group.to_string(),
                    });
                }
                DuplicatePolicy::Overwrite => {
                    tracing::warn!(
                        "overwriting results of subject {} group {} in period {}",
                        identity.subject_code,
                        identity.group,
                        identity.call_period
                    );
                }
            }
        }

        Ok(subject.groups.insert(identity.group, counts.clone()))
    }

    /// Finish aggregation.
    pub fn finish(self) -> AggregateSet {
        let mut periods = self.configured;
        periods.extend(self.extra.into_values());
        AggregateSet { periods }
    }

    fn period_mut(&mut self, key: &str) -> &mut PeriodAggregate {
        if let Some(index) = self.configured.iter().position(|p| p.call_period == key) {
            return &mut self.configured[index];
        }
        self.extra
            .entry(key.to_string())
            .or_insert_with(|| PeriodAggregate::new(key, key))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
