//! Client-side filtering and ordering of report lists.
//!
//! Both functions are pure: they return a new `Vec` and leave the input alone.

use std::cmp::Reverse;
use std::str::FromStr;

use api::{Report, ReportStatus};

/// A select-box value: either the `"All"` sentinel or one concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Choice<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Choice<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

impl<T: FromStr> FromStr for Choice<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "All" {
            Ok(Choice::All)
        } else {
            s.parse().map(Choice::Only)
        }
    }
}

/// Criteria of the public listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Case-insensitive substring of the full name.
    pub name_query: Option<String>,
    /// Exact last-seen location.
    pub location: Choice<String>,
    pub status: Choice<ReportStatus>,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        let name_ok = match &self.name_query {
            Some(query) => report
                .full_name
                .to_lowercase()
                .contains(&query.to_lowercase()),
            None => true,
        };
        name_ok
            && self.location.admits(&report.last_seen_location)
            && self.status.admits(&report.status)
    }
}

/// The records matching `criteria`, in their original relative order.
pub fn filter(records: &[Report], criteria: &ReportFilter) -> Vec<Report> {
    records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect()
}

/// A copy of `records` sorted by `created_at`, newest first.
///
/// The sort is stable. Records without a readable timestamp go last.
pub fn newest_first(records: &[Report]) -> Vec<Report> {
    let mut sorted = records.to_vec();
    sorted.sort_by_cached_key(|r| {
        let created = r.created_at_utc();
        (created.is_none(), Reverse(created))
    });
    sorted
}
