//! # Listing Filters
//!
//! Composable filters for listing students. Every criterion is optional;
//! the ones present compose with logical AND, and an empty filter matches
//! the whole store. Results always preserve store (insertion) order.

use crate::types::{IdType, Student};
use chrono::NaiveDate;

/// Filter over the student collection.
///
/// - `name`: case-insensitive substring match on the student name
/// - `id_type` / `identifier`: exact match
/// - `registered_from` / `registered_to`: inclusive registration-date range
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub name: Option<String>,
    pub id_type: Option<IdType>,
    pub identifier: Option<String>,
    pub registered_from: Option<NaiveDate>,
    pub registered_to: Option<NaiveDate>,
}

impl StudentFilter {
    /// Filter that matches every student.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Whether a student satisfies every present criterion.
    #[must_use]
    pub fn matches(&self, student: &Student) -> bool {
        if let Some(needle) = &self.name {
            let haystack = student.name.to_lowercase();
            if !haystack.contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if let Some(id_type) = self.id_type {
            if student.id_type != id_type {
                return false;
            }
        }
        if let Some(identifier) = &self.identifier {
            if &student.identifier != identifier {
                return false;
            }
        }
        if let Some(from) = self.registered_from {
            if student.registration_date < from {
                return false;
            }
        }
        if let Some(to) = self.registered_to {
            if student.registration_date > to {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StudentId;

    fn student(name: &str, id_type: IdType, identifier: &str, date: &str) -> Student {
        Student {
            id: StudentId::generate(),
            name: name.to_string(),
            id_type,
            identifier: identifier.to_string(),
            registration_date: crate::dates::parse(date).expect("date"),
            subjects: Vec::new(),
        }
    }

    #[test]
    fn empty_filter_matches_everyone() {
        let ana = student("Ana", IdType::NationalId, "123", "2025-01-10");
        assert!(StudentFilter::all().matches(&ana));
    }

    #[test]
    fn name_match_is_case_insensitive_substring() {
        let ana = student("Ana Beatriz", IdType::NationalId, "123", "2025-01-10");
        let filter = StudentFilter {
            name: Some("beatriz".into()),
            ..StudentFilter::default()
        };
        assert!(filter.matches(&ana));

        let miss = StudentFilter {
            name: Some("carlos".into()),
            ..StudentFilter::default()
        };
        assert!(!miss.matches(&ana));
    }

    #[test]
    fn identifier_match_is_exact() {
        let ana = student("Ana", IdType::NationalId, "123", "2025-01-10");
        let filter = StudentFilter {
            identifier: Some("12".into()),
            ..StudentFilter::default()
        };
        assert!(!filter.matches(&ana));
    }

    #[test]
    fn date_range_is_inclusive_and_composes() {
        let ana = student("Ana", IdType::NationalId, "123", "2025-01-10");
        let filter = StudentFilter {
            name: Some("an".into()),
            registered_from: crate::dates::parse("2025-01-10").ok(),
            registered_to: crate::dates::parse("2025-01-10").ok(),
            ..StudentFilter::default()
        };
        assert!(filter.matches(&ana));

        let before = StudentFilter {
            registered_to: crate::dates::parse("2025-01-09").ok(),
            ..StudentFilter::default()
        };
        assert!(!before.matches(&ana));
    }
}
