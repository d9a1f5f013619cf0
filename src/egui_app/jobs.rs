//! Messages sent from background workers to the controller.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

use crate::backend::{FetchError, GroupQuery, PerformanceQuery, UploadError, UploadOutcome};
use crate::model::{DatasetKind, DatasetStatus, GroupKpi, PerformanceRecord, UploadMode};

/// One completed background job.
pub(crate) enum JobMessage {
    /// A `/api/performance` fetch finished.
    PerformanceFetched {
        query: PerformanceQuery,
        generation: u64,
        result: Result<Vec<PerformanceRecord>, FetchError>,
    },
    /// A `/api/performance/group` fetch finished.
    GroupsFetched {
        query: GroupQuery,
        generation: u64,
        result: Result<Vec<GroupKpi>, FetchError>,
    },
    /// A dataset-status fetch finished.
    StatusFetched {
        kind: DatasetKind,
        result: Result<DatasetStatus, FetchError>,
    },
    /// A CSV upload finished.
    UploadFinished {
        kind: DatasetKind,
        mode: UploadMode,
        result: Result<UploadOutcome, UploadError>,
    },
}

/// Channel pair connecting workers to the controller's poll loop.
pub(crate) struct JobChannel {
    sender: Sender<JobMessage>,
    receiver: Receiver<JobMessage>,
}

impl JobChannel {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Sender handle for a worker thread.
    pub(crate) fn sender(&self) -> Sender<JobMessage> {
        self.sender.clone()
    }

    pub(crate) fn try_recv(&self) -> Result<JobMessage, TryRecvError> {
        self.receiver.try_recv()
    }
}
