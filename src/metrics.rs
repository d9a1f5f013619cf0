//! Pure transforms from fetched performance records to presentation views.
//!
//! Everything here is a function of its input slice; nothing is cached or
//! mutated behind the caller's back. The controller recomputes these on every
//! data change and the UI only formats the results.

use std::collections::HashMap;

use crate::backend::SortDirection;
use crate::model::PerformanceRecord;

/// Mean entrance rate of one content group, scaled to a percentage.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupAggregate {
    /// Group name.
    pub content_group: String,
    /// Arithmetic mean of the group's entrance rates, in `[0, 100]`.
    pub average_entrance_rate: f64,
}

/// Summary statistics over a non-empty record collection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    /// Number of records.
    pub record_count: usize,
    /// Sum of impressions.
    pub total_impressions: u64,
    /// Mean attention rate as a percentage.
    pub average_attention_rate: f64,
    /// Mean entrance rate as a percentage.
    pub average_entrance_rate: f64,
}

/// Field the leaderboard table can be ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    /// Order by content id.
    ContentId,
    /// Order by title.
    Title,
    /// Order by content group.
    ContentGroup,
    /// Order by total impressions.
    TotalImpressions,
    /// Order by attention rate.
    AttentionRate,
    /// Order by entrance rate.
    EntranceRate,
    /// Order by grade rank (S highest).
    PerformanceGrade,
}

impl SortKey {
    /// Column header shown in the table.
    pub fn column_title(self) -> &'static str {
        match self {
            Self::ContentId => "Content ID",
            Self::Title => "Title",
            Self::ContentGroup => "Group",
            Self::TotalImpressions => "Impressions",
            Self::AttentionRate => "Attention",
            Self::EntranceRate => "Entrance",
            Self::PerformanceGrade => "Grade",
        }
    }

    /// All sortable columns in table order.
    pub const ALL: [SortKey; 7] = [
        SortKey::ContentId,
        SortKey::Title,
        SortKey::ContentGroup,
        SortKey::TotalImpressions,
        SortKey::AttentionRate,
        SortKey::EntranceRate,
        SortKey::PerformanceGrade,
    ];
}

/// Group records by `content_group` and average each group's entrance rate.
///
/// Output is sorted descending by the percentage-scaled mean; equal means
/// fall back to group name ascending so the chart order is deterministic.
pub fn group_and_average(records: &[PerformanceRecord]) -> Vec<GroupAggregate> {
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for record in records {
        let entry = sums.entry(record.content_group.as_str()).or_insert((0.0, 0));
        entry.0 += record.entrance_rate;
        entry.1 += 1;
    }

    let mut aggregates: Vec<GroupAggregate> = sums
        .into_iter()
        .map(|(group, (sum, count))| GroupAggregate {
            content_group: group.to_string(),
            average_entrance_rate: sum / count as f64 * 100.0,
        })
        .collect();
    aggregates.sort_by(|a, b| {
        b.average_entrance_rate
            .total_cmp(&a.average_entrance_rate)
            .then_with(|| a.content_group.cmp(&b.content_group))
    });
    aggregates
}

/// Sort records in place by the requested key.
///
/// Stable, so rows with equal keys keep their fetched order; applying the
/// same key and direction twice leaves the order unchanged.
pub fn sort_records(records: &mut [PerformanceRecord], key: SortKey, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = match key {
            SortKey::ContentId => a.content_id.cmp(&b.content_id),
            SortKey::Title => a.title.cmp(&b.title),
            SortKey::ContentGroup => a.content_group.cmp(&b.content_group),
            SortKey::TotalImpressions => a.total_impressions.cmp(&b.total_impressions),
            SortKey::AttentionRate => a.attention_rate.total_cmp(&b.attention_rate),
            SortKey::EntranceRate => a.entrance_rate.total_cmp(&b.entrance_rate),
            SortKey::PerformanceGrade => a
                .performance_grade
                .rank()
                .cmp(&b.performance_grade.rank()),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Summary statistics over the whole collection.
///
/// Returns `None` for empty input; rate averages are only defined over at
/// least one record, and callers render placeholders instead of NaN.
pub fn summary(records: &[PerformanceRecord]) -> Option<Summary> {
    if records.is_empty() {
        return None;
    }
    let count = records.len();
    let total_impressions = records.iter().map(|r| r.total_impressions).sum();
    let attention_sum: f64 = records.iter().map(|r| r.attention_rate).sum();
    let entrance_sum: f64 = records.iter().map(|r| r.entrance_rate).sum();
    Some(Summary {
        record_count: count,
        total_impressions,
        average_attention_rate: attention_sum / count as f64 * 100.0,
        average_entrance_rate: entrance_sum / count as f64 * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Grade;

    fn record(
        id: &str,
        group: &str,
        impressions: u64,
        attention: f64,
        entrance: f64,
        grade: Grade,
    ) -> PerformanceRecord {
        PerformanceRecord {
            content_id: id.to_string(),
            title: format!("title-{id}"),
            content_group: group.to_string(),
            total_impressions: impressions,
            attention_rate: attention,
            entrance_rate: entrance,
            performance_grade: grade,
        }
    }

    #[test]
    fn group_and_average_scales_and_sorts_descending() {
        let records = vec![
            record("a", "Lobby", 10, 0.5, 0.20, Grade::B),
            record("b", "Lobby", 10, 0.5, 0.40, Grade::B),
            record("c", "Exit", 10, 0.5, 0.50, Grade::A),
        ];
        let aggregates = group_and_average(&records);
        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].content_group, "Exit");
        assert!((aggregates[0].average_entrance_rate - 50.0).abs() < 1e-9);
        assert!((aggregates[1].average_entrance_rate - 30.0).abs() < 1e-9);
    }

    #[test]
    fn group_and_average_output_is_non_increasing() {
        let records = vec![
            record("a", "G1", 1, 0.1, 0.9, Grade::S),
            record("b", "G2", 1, 0.1, 0.3, Grade::C),
            record("c", "G3", 1, 0.1, 0.6, Grade::B),
            record("d", "G2", 1, 0.1, 0.5, Grade::B),
        ];
        let aggregates = group_and_average(&records);
        assert!(aggregates.len() <= 3);
        for pair in aggregates.windows(2) {
            assert!(pair[0].average_entrance_rate >= pair[1].average_entrance_rate);
        }
    }

    #[test]
    fn singleton_group_average_equals_rate_times_hundred() {
        let records = vec![record("a", "Solo", 1, 0.2, 0.37, Grade::C)];
        let aggregates = group_and_average(&records);
        assert_eq!(aggregates[0].average_entrance_rate, 0.37 * 100.0);
    }

    #[test]
    fn equal_averages_break_ties_by_group_name() {
        let records = vec![
            record("a", "Zeta", 1, 0.1, 0.4, Grade::B),
            record("b", "Alpha", 1, 0.1, 0.4, Grade::B),
        ];
        let aggregates = group_and_average(&records);
        assert_eq!(aggregates[0].content_group, "Alpha");
        assert_eq!(aggregates[1].content_group, "Zeta");
    }

    #[test]
    fn grade_sort_descending_puts_s_before_d() {
        let mut records = vec![
            record("a", "G", 1, 0.1, 0.1, Grade::D),
            record("b", "G", 1, 0.1, 0.1, Grade::S),
            record("c", "G", 1, 0.1, 0.1, Grade::B),
            record("d", "G", 1, 0.1, 0.1, Grade::S),
        ];
        sort_records(&mut records, SortKey::PerformanceGrade, SortDirection::Descending);
        let grades: Vec<Grade> = records.iter().map(|r| r.performance_grade).collect();
        assert_eq!(grades, vec![Grade::S, Grade::S, Grade::B, Grade::D]);
        let last_s = grades.iter().rposition(|g| *g == Grade::S).unwrap();
        let first_d = grades.iter().position(|g| *g == Grade::D).unwrap();
        assert!(last_s < first_d);
    }

    #[test]
    fn sorting_twice_is_idempotent() {
        let mut records = vec![
            record("b", "G", 5, 0.2, 0.1, Grade::A),
            record("a", "G", 9, 0.1, 0.2, Grade::B),
            record("c", "G", 5, 0.3, 0.3, Grade::A),
        ];
        sort_records(&mut records, SortKey::TotalImpressions, SortDirection::Descending);
        let once = records.to_vec();
        sort_records(&mut records, SortKey::TotalImpressions, SortDirection::Descending);
        assert_eq!(records.to_vec(), once);
    }

    #[test]
    fn stable_sort_keeps_fetched_order_for_equal_keys() {
        let mut records = vec![
            record("first", "G", 5, 0.2, 0.1, Grade::A),
            record("second", "G", 5, 0.1, 0.2, Grade::B),
        ];
        sort_records(&mut records, SortKey::TotalImpressions, SortDirection::Ascending);
        assert_eq!(records[0].content_id, "first");
        assert_eq!(records[1].content_id, "second");
    }

    #[test]
    fn summary_sums_impressions() {
        let records = vec![
            record("a", "G", 10, 0.5, 0.5, Grade::A),
            record("b", "G", 25, 0.5, 0.5, Grade::A),
        ];
        assert_eq!(summary(&records).unwrap().total_impressions, 35);
    }

    #[test]
    fn summary_averages_attention_as_percentage() {
        let records = vec![
            record("a", "G", 1, 0.5, 0.1, Grade::A),
            record("b", "G", 1, 0.3, 0.1, Grade::A),
        ];
        let summary = summary(&records).unwrap();
        assert!((summary.average_attention_rate - 40.0).abs() < 1e-9);
    }

    #[test]
    fn summary_of_empty_collection_is_none() {
        assert_eq!(summary(&[]), None);
    }
}
