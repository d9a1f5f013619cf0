//! Controller owning all mutable dashboard state.
//!
//! The renderer calls [`EguiController::ensure_data`] and
//! [`EguiController::poll_background_jobs`] once per frame and forwards user
//! intents (refresh, sort, upload) here. Network work runs on spawned worker
//! threads; each sends exactly one [`JobMessage`] back.

use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use tracing::{info, warn};

use crate::backend::{
    self, FetchError, GroupQuery, PerformanceQuery, SortField, UploadOutcome,
};
use crate::config::Config;
use crate::metrics::{self, GroupAggregate, Summary};
use crate::model::{DatasetKind, GroupKpi, PerformanceRecord, UploadMode};
use crate::query_cache::{FetchPlan, FetchState, QueryCache};

use super::jobs::{JobChannel, JobMessage};
use super::state::{StatusTone, UiState, UploadFeedback};

/// Shared controller state driving the egui renderer.
pub struct EguiController {
    config: Config,
    /// View state read directly by the renderer.
    pub ui: UiState,
    performance: QueryCache<PerformanceQuery, Vec<PerformanceRecord>>,
    groups: QueryCache<GroupQuery, Vec<GroupKpi>>,
    active_performance: PerformanceQuery,
    active_groups: GroupQuery,
    jobs: JobChannel,
}

impl EguiController {
    /// Create a controller around the startup configuration.
    pub fn new(config: Config) -> Self {
        let active_performance = PerformanceQuery {
            sort_by: Some(SortField::TotalImpressions),
            order: None,
            grade: None,
            limit: Some(200),
            offset: None,
        };
        Self {
            config,
            ui: UiState::default(),
            performance: QueryCache::default(),
            groups: QueryCache::default(),
            active_performance,
            active_groups: GroupQuery::default(),
            jobs: JobChannel::new(),
        }
    }

    /// Make sure the data behind the current view is fetched or fetching.
    ///
    /// Serves fresh cache hits without a request; failed entries stay failed
    /// until the user refreshes or an upload invalidates them.
    pub fn ensure_data(&mut self, now: Instant) {
        match self.performance.plan_fetch(&self.active_performance, now) {
            FetchPlan::Spawn { generation } => {
                self.spawn_performance_fetch(self.active_performance.clone(), generation);
            }
            FetchPlan::UseCached | FetchPlan::AlreadyLoading | FetchPlan::HoldError => {}
        }
        match self.groups.plan_fetch(&self.active_groups, now) {
            FetchPlan::Spawn { generation } => {
                self.spawn_group_fetch(self.active_groups.clone(), generation);
            }
            FetchPlan::UseCached | FetchPlan::AlreadyLoading | FetchPlan::HoldError => {}
        }

        for kind in DatasetKind::ALL {
            let card = self.ui.upload_mut(kind);
            let never_fetched =
                card.dataset_status.is_none() && !card.status_unavailable && !card.status_loading;
            if never_fetched {
                self.spawn_status_fetch(kind);
            }
        }
    }

    /// Manual refresh: refetch everything, including failed queries.
    pub fn refresh(&mut self, now: Instant) {
        self.performance.invalidate_all();
        self.groups.invalidate_all();
        for kind in DatasetKind::ALL {
            if !self.ui.upload_mut(kind).status_loading {
                self.spawn_status_fetch(kind);
            }
        }
        self.ui.status.set(StatusTone::Busy, "Refreshing KPI data");
        self.ensure_data(now);
    }

    /// Start an upload for one dataset card.
    ///
    /// Validation of the file name happens in the worker before any request;
    /// a second click while an upload runs is ignored.
    pub fn start_upload(&mut self, kind: DatasetKind, file: PathBuf) {
        let card = self.ui.upload_mut(kind);
        if card.in_flight {
            return;
        }
        card.in_flight = true;
        card.feedback = None;
        let mode = card.mode;
        self.ui.status.set(
            StatusTone::Busy,
            format!("Uploading {}", kind.display_name().to_lowercase()),
        );

        let config = self.config.clone();
        let sender = self.jobs.sender();
        thread::spawn(move || {
            let result = backend::upload_dataset(&config, kind, &file, mode);
            let _ = sender.send(JobMessage::UploadFinished { kind, mode, result });
        });
    }

    /// Drain finished background jobs and fold them into the UI state.
    pub fn poll_background_jobs(&mut self, now: Instant) {
        while let Ok(message) = self.jobs.try_recv() {
            match message {
                JobMessage::PerformanceFetched {
                    query,
                    generation,
                    result,
                } => self.apply_performance(query, generation, result, now),
                JobMessage::GroupsFetched {
                    query,
                    generation,
                    result,
                } => self.apply_groups(query, generation, result, now),
                JobMessage::StatusFetched { kind, result } => self.apply_status(kind, result),
                JobMessage::UploadFinished { kind, mode, result } => {
                    self.apply_upload(kind, mode, result)
                }
            }
        }
    }

    /// True while any fetch or upload worker is outstanding.
    pub fn has_pending_work(&self) -> bool {
        self.performance.is_loading(&self.active_performance)
            || self.groups.is_loading(&self.active_groups)
            || self
                .ui
                .uploads
                .iter()
                .any(|card| card.in_flight || card.status_loading)
    }

    /// Fetched performance records, if any.
    pub fn records(&self) -> Option<&Vec<PerformanceRecord>> {
        self.performance.value(&self.active_performance)
    }

    /// Records ordered by the current table sort; empty when nothing loaded.
    pub fn sorted_records(&self) -> Vec<PerformanceRecord> {
        let mut rows = self.records().cloned().unwrap_or_default();
        metrics::sort_records(&mut rows, self.ui.sort.key, self.ui.sort.direction);
        rows
    }

    /// Per-group entrance averages for the bar chart.
    pub fn group_chart(&self) -> Vec<GroupAggregate> {
        self.records()
            .map(|records| metrics::group_and_average(records))
            .unwrap_or_default()
    }

    /// Summary statistics, `None` until non-empty data is loaded.
    pub fn summary(&self) -> Option<Summary> {
        self.records().and_then(|records| metrics::summary(records))
    }

    /// Backend-computed group KPI rows, if fetched.
    pub fn group_rows(&self) -> Option<&Vec<GroupKpi>> {
        self.groups.value(&self.active_groups)
    }

    /// Current fetch state of the performance query.
    pub fn performance_state(&self) -> FetchState {
        self.performance.state(&self.active_performance)
    }

    fn spawn_performance_fetch(&self, query: PerformanceQuery, generation: u64) {
        let config = self.config.clone();
        let sender = self.jobs.sender();
        thread::spawn(move || {
            let result = backend::fetch_performance(&config, &query);
            let _ = sender.send(JobMessage::PerformanceFetched {
                query,
                generation,
                result,
            });
        });
    }

    fn spawn_group_fetch(&self, query: GroupQuery, generation: u64) {
        let config = self.config.clone();
        let sender = self.jobs.sender();
        thread::spawn(move || {
            let result = backend::fetch_group_performance(&config, &query);
            let _ = sender.send(JobMessage::GroupsFetched {
                query,
                generation,
                result,
            });
        });
    }

    fn spawn_status_fetch(&mut self, kind: DatasetKind) {
        self.ui.upload_mut(kind).status_loading = true;
        let config = self.config.clone();
        let sender = self.jobs.sender();
        thread::spawn(move || {
            let result = backend::fetch_dataset_status(&config, kind);
            let _ = sender.send(JobMessage::StatusFetched { kind, result });
        });
    }

    fn apply_performance(
        &mut self,
        query: PerformanceQuery,
        generation: u64,
        result: Result<Vec<PerformanceRecord>, FetchError>,
        now: Instant,
    ) {
        let outcome = result.map_err(|err| err.to_string());
        if !self
            .performance
            .complete(&query, generation, outcome, now)
        {
            return;
        }
        match self.performance.state(&query) {
            FetchState::Success => {
                let count = self.performance.value(&query).map_or(0, Vec::len);
                info!(count, "Performance records loaded");
                self.ui
                    .status
                    .set(StatusTone::Ok, format!("Loaded {count} performance records"));
            }
            FetchState::Error(message) => {
                warn!(%message, "Performance fetch failed");
                self.ui.status.set(StatusTone::Error, message);
            }
            FetchState::Idle | FetchState::Loading => {}
        }
        if query == self.active_performance {
            let has_data = self
                .records()
                .is_some_and(|records| !records.is_empty());
            self.ui.show_upload_cards = !has_data;
        }
    }

    fn apply_groups(
        &mut self,
        query: GroupQuery,
        generation: u64,
        result: Result<Vec<GroupKpi>, FetchError>,
        now: Instant,
    ) {
        let outcome = result.map_err(|err| err.to_string());
        if !self.groups.complete(&query, generation, outcome, now) {
            return;
        }
        if let FetchState::Error(message) = self.groups.state(&query) {
            warn!(%message, "Group KPI fetch failed");
            self.ui.status.set(StatusTone::Error, message);
        }
    }

    fn apply_status(
        &mut self,
        kind: DatasetKind,
        result: Result<crate::model::DatasetStatus, FetchError>,
    ) {
        let card = self.ui.upload_mut(kind);
        card.status_loading = false;
        match result {
            Ok(status) => {
                card.dataset_status = Some(status);
                card.status_unavailable = false;
            }
            Err(err) => {
                // Display-only data; keep the rest of the UI working.
                warn!(dataset = kind.dataset_name(), error = %err, "Dataset status unavailable");
                card.status_unavailable = true;
            }
        }
    }

    fn apply_upload(
        &mut self,
        kind: DatasetKind,
        mode: UploadMode,
        result: Result<UploadOutcome, backend::UploadError>,
    ) {
        let feedback = match &result {
            Ok(UploadOutcome::Complete(report)) => {
                info!(
                    dataset = kind.dataset_name(),
                    mode = mode.wire_name(),
                    processed = report.records_processed,
                    "Upload complete"
                );
                UploadFeedback::Success(format!(
                    "Processed {} of {} rows; {} rows stored",
                    report.records_processed, report.total_records, report.database_records
                ))
            }
            Ok(UploadOutcome::Partial(report)) => {
                let row_errors = report.errors.clone().unwrap_or_default();
                warn!(
                    dataset = kind.dataset_name(),
                    rejected = row_errors.len(),
                    "Upload finished with row errors"
                );
                UploadFeedback::Warning {
                    summary: format!(
                        "Processed {} of {} rows; {} rows rejected",
                        report.records_processed,
                        report.total_records,
                        row_errors.len()
                    ),
                    row_errors,
                }
            }
            Err(err) => {
                warn!(dataset = kind.dataset_name(), error = %err, "Upload failed");
                UploadFeedback::Failure(err.to_string())
            }
        };

        let succeeded = result.is_ok();
        let card = self.ui.upload_mut(kind);
        card.in_flight = false;
        card.feedback = Some(feedback);

        if succeeded {
            // Invalidate both read queries exactly once; the next frame's
            // ensure_data refetches past the freshness window.
            self.performance.invalidate_all();
            self.groups.invalidate_all();
            if !self.ui.upload_mut(kind).status_loading {
                self.spawn_status_fetch(kind);
            }
            self.ui.status.set(
                StatusTone::Ok,
                format!("{} dataset updated", kind.display_name()),
            );
        } else {
            self.ui.status.set(
                StatusTone::Error,
                format!("{} upload failed", kind.display_name()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DatasetStatus, Grade, UploadReport};
    use std::time::Duration;

    fn controller() -> EguiController {
        EguiController::new(Config::with_base_url("http://127.0.0.1:9").unwrap())
    }

    fn record(id: &str, group: &str) -> PerformanceRecord {
        PerformanceRecord {
            content_id: id.to_string(),
            title: id.to_string(),
            content_group: group.to_string(),
            total_impressions: 10,
            attention_rate: 0.4,
            entrance_rate: 0.2,
            performance_grade: Grade::B,
        }
    }

    /// Feed a successful performance fetch through the cache without a worker.
    fn load_records(controller: &mut EguiController, records: Vec<PerformanceRecord>, now: Instant) {
        let query = controller.active_performance.clone();
        let generation = match controller.performance.plan_fetch(&query, now) {
            FetchPlan::Spawn { generation } => generation,
            other => panic!("expected spawn, got {other:?}"),
        };
        controller.apply_performance(query, generation, Ok(records), now);
    }

    #[test]
    fn upload_cards_hide_once_data_arrives_and_return_when_it_goes() {
        let mut controller = controller();
        let now = Instant::now();
        assert!(controller.ui.show_upload_cards);

        load_records(&mut controller, vec![record("a", "G")], now);
        assert!(!controller.ui.show_upload_cards);

        controller.performance.invalidate_all();
        load_records(&mut controller, Vec::new(), now + Duration::from_secs(1));
        assert!(controller.ui.show_upload_cards);
    }

    #[test]
    fn upload_success_invalidates_both_read_queries() {
        let mut controller = controller();
        let now = Instant::now();
        load_records(&mut controller, vec![record("a", "G")], now);
        assert_eq!(
            controller.performance.plan_fetch(&controller.active_performance.clone(), now),
            FetchPlan::UseCached
        );

        let report = UploadReport {
            total_records: 3,
            records_processed: 3,
            database_records: 3,
            errors: None,
            last_updated_at: None,
        };
        controller.apply_upload(
            DatasetKind::ContentPerformance,
            UploadMode::Replace,
            Ok(UploadOutcome::Complete(report)),
        );

        // Within the freshness window, yet both queries refetch.
        let plan = controller
            .performance
            .plan_fetch(&controller.active_performance.clone(), now + Duration::from_secs(1));
        assert!(matches!(plan, FetchPlan::Spawn { .. }));
        let plan = controller
            .groups
            .plan_fetch(&controller.active_groups.clone(), now + Duration::from_secs(1));
        assert!(matches!(plan, FetchPlan::Spawn { .. }));
    }

    #[test]
    fn partial_upload_surfaces_warning_not_failure() {
        let mut controller = controller();
        let report = UploadReport {
            total_records: 5,
            records_processed: 4,
            database_records: 4,
            errors: Some(vec!["row 3: bad entrance_rate".to_string()]),
            last_updated_at: None,
        };
        controller.apply_upload(
            DatasetKind::PlayerHistory,
            UploadMode::Append,
            Ok(UploadOutcome::Partial(report)),
        );
        let card = controller.ui.upload_mut(DatasetKind::PlayerHistory);
        match card.feedback.clone() {
            Some(UploadFeedback::Warning { row_errors, .. }) => {
                assert_eq!(row_errors.len(), 1);
            }
            other => panic!("expected warning feedback, got {other:?}"),
        }
        assert_eq!(controller.ui.status.tone, StatusTone::Ok);
    }

    #[test]
    fn failed_upload_keeps_cache_untouched() {
        let mut controller = controller();
        let now = Instant::now();
        load_records(&mut controller, vec![record("a", "G")], now);
        controller.apply_upload(
            DatasetKind::ContentPerformance,
            UploadMode::Replace,
            Err(backend::UploadError::Validation(
                "'notes.txt' is not a CSV file; expected a .csv extension".to_string(),
            )),
        );
        assert_eq!(
            controller.performance.plan_fetch(&controller.active_performance.clone(), now),
            FetchPlan::UseCached
        );
        assert_eq!(controller.ui.status.tone, StatusTone::Error);
    }

    #[test]
    fn status_failure_marks_card_unavailable_only() {
        let mut controller = controller();
        controller.apply_status(
            DatasetKind::ContentPerformance,
            Err(FetchError::Transport("connection refused".to_string())),
        );
        let card = controller.ui.upload_mut(DatasetKind::ContentPerformance);
        assert!(card.status_unavailable);
        assert!(card.dataset_status.is_none());

        controller.apply_status(
            DatasetKind::ContentPerformance,
            Ok(DatasetStatus {
                records_count: 42,
                last_updated_at: Some("2025-06-01T10:00:00Z".to_string()),
            }),
        );
        let card = controller.ui.upload_mut(DatasetKind::ContentPerformance);
        assert!(!card.status_unavailable);
        assert_eq!(card.dataset_status.as_ref().unwrap().records_count, 42);
    }

    #[test]
    fn fetch_error_is_reported_and_held() {
        let mut controller = controller();
        let now = Instant::now();
        let query = controller.active_performance.clone();
        let generation = match controller.performance.plan_fetch(&query, now) {
            FetchPlan::Spawn { generation } => generation,
            other => panic!("expected spawn, got {other:?}"),
        };
        controller.apply_performance(query.clone(), generation, Err(FetchError::Timeout), now);
        assert_eq!(controller.ui.status.tone, StatusTone::Error);
        assert!(controller.ui.status.text.contains("timed out"));
        assert_eq!(
            controller.performance.plan_fetch(&query, now),
            FetchPlan::HoldError
        );
    }
}
