use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::ApiError;

/// Per-query status machine: `Idle → Loading → Success | Error`, and back to
/// `Loading` whenever the entry is refetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Where a cache entry stands with respect to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Nothing cached and nothing requested.
    Absent,
    /// First fetch in flight, no data yet.
    Loading,
    /// Data younger than the stale time and not invalidated.
    Fresh,
    /// Data (or an error) that the next trigger will refetch.
    Stale,
}

/// Why a revalidation was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Mount,
    Focus,
    Reconnect,
    Invalidate,
}

/// What a consumer sees for one key.
#[derive(Debug)]
pub struct QueryState<T> {
    /// Last successfully fetched value. Kept while refetching and after a
    /// failed refetch.
    pub data: Option<Arc<T>>,
    pub error: Option<ApiError>,
    pub status: QueryStatus,
    /// Whether a request for this key is in flight.
    pub is_fetching: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> QueryState<T> {
    /// Loading with nothing to show yet. Pages render their skeleton here.
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading && self.data.is_none()
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            status: QueryStatus::Idle,
            is_fetching: false,
            updated_at: None,
        }
    }
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            error: self.error.clone(),
            status: self.status,
            is_fetching: self.is_fetching,
            updated_at: self.updated_at,
        }
    }
}

impl<T> QueryState<T> {
    /// The part of the state a page renders: the data, or the status and
    /// error while there is no data. Fetch flags and timestamps are dropped,
    /// so starting or settling a refetch that returns the same data leaves
    /// the projection unchanged.
    pub fn rendered(&self) -> Self {
        match &self.data {
            Some(data) => Self {
                data: Some(data.clone()),
                status: QueryStatus::Success,
                ..Self::default()
            },
            None => Self {
                data: None,
                error: self.error.clone().filter(|_| self.is_error()),
                status: self.status,
                ..Self::default()
            },
        }
    }
}

impl<T: PartialEq> PartialEq for QueryState<T> {
    /// Data is compared by pointer first, then by value, so a refetch that
    /// returns an identical payload compares equal.
    fn eq(&self, other: &Self) -> bool {
        let same_data = match (&self.data, &other.data) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a == b,
            (None, None) => true,
            _ => false,
        };
        same_data
            && self.error == other.error
            && self.status == other.status
            && self.is_fetching == other.is_fetching
            && self.updated_at == other.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled(data: Vec<&str>) -> QueryState<Vec<String>> {
        QueryState {
            data: Some(Arc::new(data.into_iter().map(String::from).collect())),
            status: QueryStatus::Success,
            updated_at: Some(Utc::now()),
            ..QueryState::default()
        }
    }

    #[test]
    fn refetch_flags_do_not_change_what_is_rendered() {
        let before = settled(vec!["t1", "t2"]);
        let refetching = QueryState {
            status: QueryStatus::Loading,
            is_fetching: true,
            ..before.clone()
        };
        assert_ne!(before, refetching);
        assert_eq!(before.rendered(), refetching.rendered());

        // Same payload in a new allocation, as after a background refetch.
        let refetched = settled(vec!["t1", "t2"]);
        assert_eq!(before.rendered(), refetched.rendered());

        let changed = settled(vec!["t1", "t2", "t3"]);
        assert_ne!(before.rendered(), changed.rendered());
    }

    #[test]
    fn failed_refetch_keeps_rendering_data() {
        let before = settled(vec!["t1"]);
        let failed = QueryState {
            status: QueryStatus::Error,
            error: Some(ApiError::Network("offline".into())),
            ..before.clone()
        };
        assert_eq!(before.rendered(), failed.rendered());
        assert!(failed.rendered().error.is_none());
    }

    #[test]
    fn first_load_error_is_rendered() {
        let failed: QueryState<Vec<String>> = QueryState {
            status: QueryStatus::Error,
            error: Some(ApiError::Network("offline".into())),
            ..QueryState::default()
        };
        let rendered = failed.rendered();
        assert!(rendered.is_error());
        assert_eq!(rendered.error, failed.error);
    }
}
