// ClassDesk - core/roster.rs
//
// Student search, filter, and sort.
// A single linear predicate pass followed by a stable comparator sort.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::Student;
use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;

/// Enrolment-date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinedWithin {
    #[default]
    Any,
    /// Joined in the last N days.
    LastDays(i64),
    /// Joined more than N days ago.
    OlderThan(i64),
}

impl JoinedWithin {
    /// Presets offered in the filter combo box.
    pub fn presets() -> &'static [JoinedWithin] {
        &[
            JoinedWithin::Any,
            JoinedWithin::LastDays(7),
            JoinedWithin::LastDays(30),
            JoinedWithin::OlderThan(30),
        ]
    }

    pub fn label(&self) -> String {
        match self {
            Self::Any => "Any time".to_string(),
            Self::LastDays(d) => format!("Last {d} days"),
            Self::OlderThan(d) => format!("Over {d} days ago"),
        }
    }

    fn matches(&self, joined: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match (self, joined) {
            (Self::Any, _) => true,
            (Self::LastDays(d), Some(t)) => t >= now - Duration::days(*d),
            (Self::OlderThan(d), Some(t)) => t < now - Duration::days(*d),
            // No enrolment date: only the unfiltered view includes it.
            (_, None) => false,
        }
    }
}

/// Column the roster is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Email,
    RollNumber,
    JoinedAt,
}

impl SortKey {
    pub fn all() -> &'static [SortKey] {
        &[
            SortKey::Name,
            SortKey::Email,
            SortKey::RollNumber,
            SortKey::JoinedAt,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::RollNumber => "Roll number",
            Self::JoinedAt => "Joined",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Ascending => "\u{2191}",
            Self::Descending => "\u{2193}",
        }
    }
}

/// Complete roster view state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterFilter {
    /// Case-insensitive substring over name, email and roll number.
    pub search: String,
    pub joined: JoinedWithin,
    pub sort_key: SortKey,
    pub direction: SortDirection,
}

impl RosterFilter {
    /// True when no predicate is active (sorting does not count).
    pub fn is_unfiltered(&self) -> bool {
        self.search.trim().is_empty() && self.joined == JoinedWithin::Any
    }

    /// Click on a column header: same key flips direction, new key resets
    /// to ascending.
    pub fn sort_by(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.direction = self.direction.toggled();
        } else {
            self.sort_key = key;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Apply the filter to `students`, returning indices in display order.
///
/// Indices point into the original slice so the caller can keep one copy of
/// the roster. The sort is stable: students that compare equal keep their
/// fetch order regardless of direction.
pub fn apply(students: &[Student], filter: &RosterFilter, now: DateTime<Utc>) -> Vec<usize> {
    let needle = filter.search.trim().to_lowercase();

    let mut indices: Vec<usize> = students
        .iter()
        .enumerate()
        .filter(|(_, s)| matches_search(s, &needle) && filter.joined.matches(s.created_at, now))
        .map(|(idx, _)| idx)
        .collect();

    indices.sort_by(|&a, &b| {
        let ord = compare(&students[a], &students[b], filter.sort_key);
        match filter.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });

    indices
}

fn matches_search(student: &Student, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    student.name.to_lowercase().contains(needle)
        || student.email.to_lowercase().contains(needle)
        || student.roll_number.to_lowercase().contains(needle)
}

fn compare(a: &Student, b: &Student, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => compare_text(&a.name, &b.name),
        SortKey::Email => compare_text(&a.email, &b.email),
        SortKey::RollNumber => compare_roll(&a.roll_number, &b.roll_number),
        SortKey::JoinedAt => match (a.created_at, b.created_at) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Numeric roll numbers first in numeric order ("9" < "10"), then the rest
/// as text. Keeps the ordering total for mixed rosters.
fn compare_roll(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => compare_text(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap()
    }

    fn make_student(id: &str, name: &str, email: &str, roll: &str, days_ago: Option<i64>) -> Student {
        Student {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            roll_number: roll.to_string(),
            created_at: days_ago.map(|d| now() - Duration::days(d)),
        }
    }

    fn roster() -> Vec<Student> {
        vec![
            make_student("1", "charlie", "c@school.org", "10", Some(40)),
            make_student("2", "Alice", "alice@school.org", "9", Some(2)),
            make_student("3", "bob", "bob@other.org", "B-7", None),
            make_student("4", "alice", "alice2@school.org", "11", Some(10)),
        ]
    }

    #[test]
    fn test_empty_filter_returns_all_sorted_by_name() {
        let students = roster();
        let result = apply(&students, &RosterFilter::default(), now());
        // "Alice" and "alice" tie; fetch order keeps index 1 before 3.
        assert_eq!(result, vec![1, 3, 2, 0]);
    }

    #[test]
    fn test_search_matches_name_email_and_roll_case_insensitive() {
        let students = roster();
        let mut filter = RosterFilter {
            search: "  ALICE ".to_string(),
            ..Default::default()
        };
        assert_eq!(apply(&students, &filter, now()), vec![1, 3]);

        filter.search = "other.org".to_string();
        assert_eq!(apply(&students, &filter, now()), vec![2]);

        filter.search = "b-7".to_string();
        assert_eq!(apply(&students, &filter, now()), vec![2]);
    }

    #[test]
    fn test_joined_within_excludes_undated() {
        let students = roster();
        let filter = RosterFilter {
            joined: JoinedWithin::LastDays(30),
            ..Default::default()
        };
        assert_eq!(apply(&students, &filter, now()), vec![1, 3]);

        let filter = RosterFilter {
            joined: JoinedWithin::OlderThan(30),
            ..Default::default()
        };
        assert_eq!(apply(&students, &filter, now()), vec![0]);
    }

    #[test]
    fn test_roll_numbers_sort_numerically() {
        let students = roster();
        let filter = RosterFilter {
            sort_key: SortKey::RollNumber,
            ..Default::default()
        };
        // 9 < 10 < 11 numerically; non-numeric "B-7" sorts after all numbers.
        assert_eq!(apply(&students, &filter, now()), vec![1, 0, 3, 2]);
    }

    #[test]
    fn test_descending_keeps_ties_in_fetch_order() {
        let students = roster();
        let filter = RosterFilter {
            direction: SortDirection::Descending,
            ..Default::default()
        };
        assert_eq!(apply(&students, &filter, now()), vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_joined_sort_puts_undated_last() {
        let students = roster();
        let filter = RosterFilter {
            sort_key: SortKey::JoinedAt,
            ..Default::default()
        };
        assert_eq!(apply(&students, &filter, now()), vec![0, 3, 1, 2]);
    }

    #[test]
    fn test_sort_by_toggles_direction() {
        let mut filter = RosterFilter::default();
        filter.sort_by(SortKey::Name);
        assert_eq!(filter.direction, SortDirection::Descending);
        filter.sort_by(SortKey::Email);
        assert_eq!(filter.sort_key, SortKey::Email);
        assert_eq!(filter.direction, SortDirection::Ascending);
    }
}
