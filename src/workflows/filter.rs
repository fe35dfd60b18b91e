use std::fmt;

use crate::workflows::types::{Record, RecordStatus};

/// Search and status filter over a list of records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    search: String,
    status: Option<RecordStatus>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into().trim().to_lowercase();
        self
    }

    pub fn with_status(mut self, status: Option<RecordStatus>) -> Self {
        self.status = status;
        self
    }

    /// A record matches when its status equals the filter status (if any) and
    /// the search text appears, case-insensitively, in one of its technology,
    /// course, resource center, resource type or package id.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(status) = &self.status {
            if &record.status != status {
                return false;
            }
        }

        if self.search.is_empty() {
            return true;
        }

        [
            record.tech_name(),
            record.course_name(),
            record.center_name(),
            record.resources.as_deref(),
            record.package_id.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&self.search))
    }

    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}

/// "Showing N of M" counts for a filtered listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    pub shown: usize,
    pub total: usize,
}

impl fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {} of {} total record(s).", self.shown, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::types::{Course, ResourceCenter, Technology};

    fn sample() -> Vec<Record> {
        let mut rust = Record::new(1, 20);
        rust.technology = Some(Technology { id: 1, tech_name: Some("Rust".into()) });
        rust.course = Some(Course { id: 1, course_name: Some("Systems Programming".into()) });
        rust.package_id = Some("PKG-001".into());

        let mut web = Record::new(2, 15)
            .with_status(RecordStatus::Verified)
            .with_verified_count(15);
        web.resource_center = Some(ResourceCenter {
            id: 9,
            name: Some("Northside Center".into()),
            technology: None,
            center_type: None,
        });
        web.resources = Some("Workshop".into());

        vec![rust, web, Record::new(3, 5)]
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let records = sample();
        assert_eq!(RecordFilter::new().apply(&records).len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let records = sample();

        let ids = |filter: RecordFilter| -> Vec<u64> {
            filter.apply(&records).iter().map(|r| r.id).collect()
        };

        assert_eq!(ids(RecordFilter::new().with_search("RUST")), vec![1]);
        assert_eq!(ids(RecordFilter::new().with_search("systems")), vec![1]);
        assert_eq!(ids(RecordFilter::new().with_search("northside")), vec![2]);
        assert_eq!(ids(RecordFilter::new().with_search("workshop")), vec![2]);
        assert_eq!(ids(RecordFilter::new().with_search("pkg-0")), vec![1]);
        assert!(ids(RecordFilter::new().with_search("cobol")).is_empty());
    }

    #[test]
    fn test_status_filter_combines_with_search() {
        let records = sample();
        let filter = RecordFilter::new().with_status(Some(RecordStatus::Entered));
        assert_eq!(filter.apply(&records).len(), 2);

        let filter = filter.with_search("northside");
        assert!(filter.apply(&records).is_empty());
    }

    #[test]
    fn test_summary_display() {
        let summary = FilterSummary { shown: 2, total: 5 };
        assert_eq!(summary.to_string(), "Showing 2 of 5 total record(s).");
    }
}
