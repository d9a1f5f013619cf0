//! Shared state types for the egui UI.
//!
//! Owned by the controller; the renderer reads these and reports intents
//! back. Nothing here touches the network.

use crate::backend::SortDirection;
use crate::metrics::SortKey;
use crate::model::{DatasetKind, DatasetStatus, UploadMode};

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    /// Status bar contents.
    pub status: StatusBarState,
    /// Whether the upload cards are shown. Defaults to true; flipped off once
    /// performance data is available and back on when it goes away.
    pub show_upload_cards: bool,
    /// Leaderboard ordering selection.
    pub sort: TableSort,
    /// Upload card state, one per dataset, in display order.
    pub uploads: [UploadCardState; 2],
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
            show_upload_cards: true,
            sort: TableSort::default(),
            uploads: [
                UploadCardState::new(DatasetKind::ContentPerformance),
                UploadCardState::new(DatasetKind::PlayerHistory),
            ],
        }
    }
}

impl UiState {
    /// Mutable upload card state for one dataset.
    pub fn upload_mut(&mut self, kind: DatasetKind) -> &mut UploadCardState {
        let index = self
            .uploads
            .iter()
            .position(|card| card.kind == kind)
            .expect("a card exists for every dataset kind");
        &mut self.uploads[index]
    }

    /// Apply a header click: same column flips direction, a new column starts
    /// over in its default direction.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort.key == key {
            self.sort.direction = self.sort.direction.flipped();
        } else {
            self.sort = TableSort {
                key,
                direction: SortDirection::default(),
            };
        }
    }
}

/// Current leaderboard ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableSort {
    /// Column the table is ordered by.
    pub key: SortKey,
    /// Direction of the ordering.
    pub direction: SortDirection,
}

impl Default for TableSort {
    fn default() -> Self {
        Self {
            key: SortKey::TotalImpressions,
            direction: SortDirection::Descending,
        }
    }
}

/// Severity tone of the status badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    /// Nothing happening.
    Idle,
    /// A request is in flight.
    Busy,
    /// Last action succeeded.
    Ok,
    /// Last action failed.
    Error,
}

/// Badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    /// Message text.
    pub text: String,
    /// Tone driving the badge color and label.
    pub tone: StatusTone,
}

impl StatusBarState {
    /// Initial footer contents.
    pub fn idle() -> Self {
        Self {
            text: "Waiting for KPI data".to_string(),
            tone: StatusTone::Idle,
        }
    }

    /// Replace the footer with a new message and tone.
    pub fn set(&mut self, tone: StatusTone, text: impl Into<String>) {
        self.tone = tone;
        self.text = text.into();
    }
}

/// Feedback line shown on an upload card after an attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum UploadFeedback {
    /// Every row was processed.
    Success(String),
    /// Upload succeeded, some rows were rejected.
    Warning {
        /// One-line summary with counts.
        summary: String,
        /// Per-row backend messages, in backend order.
        row_errors: Vec<String>,
    },
    /// Upload failed entirely.
    Failure(String),
}

/// State of one dataset's upload card.
#[derive(Clone, Debug)]
pub struct UploadCardState {
    /// Dataset this card uploads to.
    pub kind: DatasetKind,
    /// Mode the next upload will use.
    pub mode: UploadMode,
    /// True while an upload worker is running.
    pub in_flight: bool,
    /// Outcome of the most recent attempt, if any.
    pub feedback: Option<UploadFeedback>,
    /// Last fetched dataset status.
    pub dataset_status: Option<DatasetStatus>,
    /// True while a status request is running.
    pub status_loading: bool,
    /// True when the last status fetch failed; rendered as "unavailable".
    pub status_unavailable: bool,
}

impl UploadCardState {
    fn new(kind: DatasetKind) -> Self {
        Self {
            kind,
            mode: UploadMode::default(),
            in_flight: false,
            feedback: None,
            dataset_status: None,
            status_loading: false,
            status_unavailable: false,
        }
    }
}
