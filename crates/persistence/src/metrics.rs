//! Invitation store query timings.
//!
//! Each PostgreSQL round trip made by the invitation repository lands in the
//! `invitation_store_query_duration_seconds` histogram, labelled with the
//! query and its outcome (`ok` or `error`).

use metrics::histogram;
use std::time::Instant;

const QUERY_DURATION_METRIC: &str = "invitation_store_query_duration_seconds";

/// Queries issued against the `invitations` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreQuery {
    List,
    FindById,
    Filter,
    Insert,
    Update,
    Delete,
}

impl StoreQuery {
    pub fn label(self) -> &'static str {
        match self {
            StoreQuery::List => "list_invitations",
            StoreQuery::FindById => "find_invitation_by_id",
            StoreQuery::Filter => "filter_invitations",
            StoreQuery::Insert => "insert_invitation",
            StoreQuery::Update => "update_invitation",
            StoreQuery::Delete => "delete_invitation",
        }
    }
}

fn outcome_label(succeeded: bool) -> &'static str {
    if succeeded {
        "ok"
    } else {
        "error"
    }
}

pub fn record_query_duration(query: StoreQuery, succeeded: bool, duration_secs: f64) {
    histogram!(
        QUERY_DURATION_METRIC,
        "query" => query.label(),
        "outcome" => outcome_label(succeeded)
    )
    .record(duration_secs);
}

/// Started right before a store query and finished with its result.
///
/// ```ignore
/// let timer = QueryTimer::start(StoreQuery::FindById);
/// let result = sqlx::query_as::<_, InvitationEntity>(...).fetch_optional(&pool).await;
/// timer.finish(&result);
/// ```
pub struct QueryTimer {
    query: StoreQuery,
    started: Instant,
}

impl QueryTimer {
    pub fn start(query: StoreQuery) -> Self {
        Self {
            query,
            started: Instant::now(),
        }
    }

    pub fn finish<T, E>(self, result: &Result<T, E>) {
        record_query_duration(
            self.query,
            result.is_ok(),
            self.started.elapsed().as_secs_f64(),
        );
    }
}
