//! Read endpoints: performance records, group KPIs, dataset status.

use url::Url;

use crate::config::Config;
use crate::http_client;
use crate::model::{DatasetKind, DatasetStatus, Grade, GroupKpi, PerformanceRecord};

use super::{Envelope, FetchError, MAX_RESPONSE_BYTES, transport_is_timeout};

/// Server-side sort field accepted by the read endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Sort by total impressions.
    TotalImpressions,
    /// Sort by attention rate.
    AttentionRate,
    /// Sort by entrance rate.
    EntranceRate,
    /// Sort by content id.
    ContentId,
    /// Sort by title.
    Title,
}

impl SortField {
    /// Value sent in the `sortBy` query parameter.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::TotalImpressions => "total_impressions",
            Self::AttentionRate => "attention_rate",
            Self::EntranceRate => "entrance_rate",
            Self::ContentId => "content_id",
            Self::Title => "title",
        }
    }
}

/// Sort direction for server- and client-side ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest (or worst grade) first.
    Ascending,
    /// Largest (or best grade) first.
    #[default]
    Descending,
}

impl SortDirection {
    /// Value sent in the `order` query parameter.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Parameters for `GET /api/performance`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PerformanceQuery {
    /// Server-side sort field.
    pub sort_by: Option<SortField>,
    /// Server-side sort direction.
    pub order: Option<SortDirection>,
    /// Restrict results to one grade.
    pub grade: Option<Grade>,
    /// Maximum number of rows.
    pub limit: Option<u32>,
    /// Rows to skip.
    pub offset: Option<u32>,
}

/// Parameters for `GET /api/performance/group`; no grade filter exists there.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GroupQuery {
    /// Server-side sort field.
    pub sort_by: Option<SortField>,
    /// Server-side sort direction.
    pub order: Option<SortDirection>,
    /// Maximum number of rows.
    pub limit: Option<u32>,
    /// Rows to skip.
    pub offset: Option<u32>,
}

/// Fetch performance records matching `query`.
pub fn fetch_performance(
    config: &Config,
    query: &PerformanceQuery,
) -> Result<Vec<PerformanceRecord>, FetchError> {
    let mut url = config.endpoint("/api/performance");
    {
        let mut pairs = url.query_pairs_mut();
        if let Some(sort_by) = query.sort_by {
            pairs.append_pair("sortBy", sort_by.wire_name());
        }
        if let Some(order) = query.order {
            pairs.append_pair("order", order.wire_name());
        }
        if let Some(grade) = query.grade {
            pairs.append_pair("grade", grade.label());
        }
        if let Some(limit) = query.limit {
            pairs.append_pair("limit", &limit.to_string());
        }
        if let Some(offset) = query.offset {
            pairs.append_pair("offset", &offset.to_string());
        }
    }
    if url.query() == Some("") {
        url.set_query(None);
    }
    get_enveloped(&url)
}

/// Fetch per-group KPI rows matching `query`.
pub fn fetch_group_performance(
    config: &Config,
    query: &GroupQuery,
) -> Result<Vec<GroupKpi>, FetchError> {
    let mut url = config.endpoint("/api/performance/group");
    {
        let mut pairs = url.query_pairs_mut();
        if let Some(sort_by) = query.sort_by {
            pairs.append_pair("sortBy", sort_by.wire_name());
        }
        if let Some(order) = query.order {
            pairs.append_pair("order", order.wire_name());
        }
        if let Some(limit) = query.limit {
            pairs.append_pair("limit", &limit.to_string());
        }
        if let Some(offset) = query.offset {
            pairs.append_pair("offset", &offset.to_string());
        }
    }
    if url.query() == Some("") {
        url.set_query(None);
    }
    get_enveloped(&url)
}

/// Fetch the stored-row count and last-upload time for one dataset.
///
/// Display-only; callers treat failure as "status unknown" rather than an
/// error worth interrupting the rest of the UI for.
pub fn fetch_dataset_status(
    config: &Config,
    kind: DatasetKind,
) -> Result<DatasetStatus, FetchError> {
    let mut url = config.endpoint("/api/dataset-status");
    url.query_pairs_mut()
        .append_pair("dataset", kind.dataset_name());
    get_enveloped(&url)
}

/// Issue a GET and unwrap the envelope into its typed payload.
fn get_enveloped<T>(url: &Url) -> Result<T, FetchError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let response = match http_client::agent().get(url.as_str()).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            return Err(status_error(code, response));
        }
        Err(ureq::Error::Transport(err)) => {
            return Err(if transport_is_timeout(&err) {
                FetchError::Timeout
            } else {
                FetchError::Transport(err.to_string())
            });
        }
    };

    let body = http_client::read_response_text(response, MAX_RESPONSE_BYTES)
        .map_err(|err| FetchError::Decode(err.to_string()))?;
    Envelope::<T>::parse(&body)?.into_data()
}

/// Map a non-2xx response to a backend error, preserving the envelope message
/// when the body carries one.
fn status_error(code: u16, response: ureq::Response) -> FetchError {
    let body = http_client::read_response_text(response, MAX_RESPONSE_BYTES).unwrap_or_default();
    let message = Envelope::<serde_json::Value>::parse(&body)
        .ok()
        .and_then(Envelope::failure_message)
        .unwrap_or_else(|| format!("HTTP {code}"));
    FetchError::Backend {
        status: Some(code),
        message,
    }
}
