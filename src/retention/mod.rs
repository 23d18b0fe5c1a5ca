//! Retention policy evaluation for date-suffixed index names.
//!
//! Index names follow the convention `<prefix>YYYY.MM.DD`, e.g.
//! `logstash-logs-2024.01.31`. The date embedded in the name is the only
//! input to the eligibility decision; no cluster metadata is consulted.
//! Evaluation is pure: the clock is read once at the process boundary and
//! the cutoff is passed in.

use chrono::{Days, NaiveDate};

/// Date format embedded in index names (`2024.01.31`).
const INDEX_DATE_FORMAT: &str = "%Y.%m.%d";

/// Extract the calendar date embedded in an index name.
///
/// The date is the segment after the last `-`. Returns `None` when the name
/// contains no `-` or when the segment does not parse as `YYYY.MM.DD`.
/// The zero-padded form is required; the parsed date must format back to
/// the exact suffix, so `2024.1.1` is rejected.
pub fn parse_index_date(name: &str) -> Option<NaiveDate> {
    let (_, suffix) = name.rsplit_once('-')?;
    let date = NaiveDate::parse_from_str(suffix, INDEX_DATE_FORMAT).ok()?;
    if date.format(INDEX_DATE_FORMAT).to_string() != suffix {
        return None;
    }
    Some(date)
}

/// Retention policy for one prune run: a naming-convention prefix and an
/// immutable cutoff date.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    prefix: String,
    cutoff: NaiveDate,
}

impl RetentionPolicy {
    /// Create a policy with an explicit cutoff date.
    pub fn new(prefix: impl Into<String>, cutoff: NaiveDate) -> Self {
        Self {
            prefix: prefix.into(),
            cutoff,
        }
    }

    /// Create a policy whose cutoff is `today - age_limit_days`.
    pub fn with_age_limit(
        prefix: impl Into<String>,
        today: NaiveDate,
        age_limit_days: u32,
    ) -> Self {
        let cutoff = today
            .checked_sub_days(Days::new(u64::from(age_limit_days)))
            .unwrap_or(NaiveDate::MIN);
        Self::new(prefix, cutoff)
    }

    /// The boundary date. Indices dated strictly before it are eligible.
    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    /// The naming-convention prefix this policy applies to.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether an index name matches the naming convention at all.
    pub fn matches_prefix(&self, name: &str) -> bool {
        name.starts_with(&self.prefix)
    }

    /// Whether an index is eligible for deletion under this policy.
    ///
    /// True iff the embedded date is strictly before the cutoff; an index
    /// dated exactly on the cutoff day is retained. A name whose suffix does
    /// not parse is never eligible. Only a suffix that exists but fails to
    /// parse is worth a diagnostic; a name without `-` has no date segment
    /// at all.
    pub fn should_delete(&self, name: &str) -> bool {
        if !name.contains('-') {
            return false;
        }
        match parse_index_date(name) {
            Some(date) => date < self.cutoff,
            None => {
                tracing::warn!(index = name, "Failed to parse date from index name suffix, retaining");
                false
            }
        }
    }

    /// Partition index names into the counts and candidates for one run.
    ///
    /// Names that do not match the prefix are ignored entirely. Candidate
    /// order follows the input order.
    pub fn plan(&self, names: impl IntoIterator<Item = String>) -> RetentionPlan {
        let mut plan = RetentionPlan::default();
        for name in names {
            if !self.matches_prefix(&name) {
                continue;
            }
            plan.total_matching += 1;
            if self.should_delete(&name) {
                plan.candidates.push(name);
            }
        }
        plan
    }
}

/// Outcome of evaluating a listing against a [`RetentionPolicy`].
#[derive(Debug, Default)]
pub struct RetentionPlan {
    /// Number of indices matching the naming convention, eligible or not.
    pub total_matching: usize,
    /// Names eligible for deletion, in listing order.
    pub candidates: Vec<String>,
}
