//! Domain and wire types shared by the backend client, metrics, and UI.

use serde::{Deserialize, Serialize};

/// Performance grade bucket computed upstream, S best through D worst.
///
/// The set is closed: unknown grade strings on the wire are a decode error,
/// and every lookup over grades is a total `match` so a new variant fails to
/// compile rather than falling back silently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// Exceptional performance.
    S,
    /// Strong performance.
    A,
    /// Average performance.
    B,
    /// Below average performance.
    C,
    /// Weak performance.
    D,
}

impl Grade {
    /// Ordinal rank used for sorting, S highest.
    pub fn rank(self) -> u8 {
        match self {
            Self::S => 5,
            Self::A => 4,
            Self::B => 3,
            Self::C => 2,
            Self::D => 1,
        }
    }

    /// Wire/display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    /// All grades in rank order, best first.
    pub const ALL: [Grade; 5] = [Grade::S, Grade::A, Grade::B, Grade::C, Grade::D];
}

/// One advertisement's observed KPI record, immutable once fetched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    /// Unique content key.
    pub content_id: String,
    /// Human-readable content title.
    pub title: String,
    /// Group the content belongs to (campaign, venue, ...).
    pub content_group: String,
    /// Total observed impressions.
    pub total_impressions: u64,
    /// Fraction of viewers who looked at the content, in `[0, 1]`.
    pub attention_rate: f64,
    /// Fraction of viewers who proceeded past the content, in `[0, 1]`.
    pub entrance_rate: f64,
    /// Grade bucket computed by the backend.
    pub performance_grade: Grade,
}

/// Per-group KPI row as served by `/api/performance/group`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupKpi {
    /// Group name.
    pub content_group: String,
    /// Number of content items in the group.
    pub content_count: u64,
    /// Impressions summed over the group.
    pub total_impressions: u64,
    /// Mean attention rate over the group, in `[0, 1]`.
    pub attention_rate: f64,
    /// Mean entrance rate over the group, in `[0, 1]`.
    pub entrance_rate: f64,
}

/// Result of a dataset upload as reported by the backend.
///
/// Wire field names are camelCase; `errors` preserves backend order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    /// Rows found in the uploaded file.
    pub total_records: u64,
    /// Rows accepted into processing.
    pub records_processed: u64,
    /// Rows present in the database after the upload.
    pub database_records: u64,
    /// Per-row processing errors, when any occurred.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// Backend timestamp of the dataset after this upload (RFC3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<String>,
}

impl UploadReport {
    /// True when the upload succeeded but some rows were rejected.
    pub fn has_row_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }
}

/// Current state of one named dataset, fetched for display only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatus {
    /// Rows currently stored for the dataset.
    pub records_count: u64,
    /// Timestamp of the last successful upload (RFC3339), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<String>,
}

/// The two CSV datasets the backend accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    /// Per-content performance export.
    ContentPerformance,
    /// Per-player playback history export.
    PlayerHistory,
}

impl DatasetKind {
    /// Dataset name used in the status query string.
    pub fn dataset_name(self) -> &'static str {
        match self {
            Self::ContentPerformance => "content-perf",
            Self::PlayerHistory => "player-history",
        }
    }

    /// Upload endpoint path for this dataset.
    pub fn upload_path(self) -> &'static str {
        match self {
            Self::ContentPerformance => "/api/process-csv/content-perf",
            Self::PlayerHistory => "/api/process-csv/player-history",
        }
    }

    /// Card/header title shown in the UI.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::ContentPerformance => "Content performance",
            Self::PlayerHistory => "Player history",
        }
    }

    /// Both dataset kinds, in display order.
    pub const ALL: [DatasetKind; 2] = [DatasetKind::ContentPerformance, DatasetKind::PlayerHistory];
}

/// Upload semantics requested from the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UploadMode {
    /// Clear prior rows before inserting the new file.
    #[default]
    Replace,
    /// Add the new file's rows to what is already stored.
    Append,
}

impl UploadMode {
    /// Value sent in the multipart `mode` field.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Append => "append",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_rank_is_strictly_decreasing_over_all() {
        let ranks: Vec<u8> = Grade::ALL.iter().map(|grade| grade.rank()).collect();
        assert_eq!(ranks, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn grade_rejects_unknown_wire_value() {
        let parsed: Result<Grade, _> = serde_json::from_str("\"F\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn performance_record_decodes_from_backend_shape() {
        let json = r#"{
            "content_id": "c-101",
            "title": "Spring promo",
            "content_group": "Lobby",
            "total_impressions": 1200,
            "attention_rate": 0.42,
            "entrance_rate": 0.18,
            "performance_grade": "A"
        }"#;
        let record: PerformanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.performance_grade, Grade::A);
        assert_eq!(record.total_impressions, 1200);
    }

    #[test]
    fn upload_report_decodes_camel_case_and_optional_fields() {
        let json = r#"{"totalRecords": 10, "recordsProcessed": 9, "databaseRecords": 9,
                       "errors": ["row 4: bad rate"]}"#;
        let report: UploadReport = serde_json::from_str(json).unwrap();
        assert!(report.has_row_errors());
        assert_eq!(report.last_updated_at, None);
    }
}
