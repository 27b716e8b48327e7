//! Render contract for data-bound lists.
//!
//! Every page that shows a fetched collection goes through
//! `CollectionView::classify`, so the states are the same everywhere:
//! a skeleton while the first load runs, a dedicated empty state with a call
//! to action, the populated list, or an error state when the first load
//! failed. Once data exists it is always shown, also while refetching and
//! after a failed refetch.

use std::collections::HashMap;
use std::hash::Hash;

use leptos::prelude::*;

use crate::error::FALLBACK_ERROR_MESSAGE;
use crate::query::QueryState;
use crate::web::route::AppRoute;
use crate::web::router::Link;

#[derive(Debug, PartialEq)]
pub enum CollectionView<'a, T> {
    Skeleton,
    Empty,
    Populated(&'a [T]),
    /// First load failed; carries the message to show.
    Failed(String),
}

impl<'a, T> CollectionView<'a, T> {
    pub fn classify(state: &'a QueryState<Vec<T>>) -> Self {
        match &state.data {
            Some(items) if items.is_empty() => Self::Empty,
            Some(items) => Self::Populated(items.as_slice()),
            None if state.is_error() => Self::Failed(
                state
                    .error
                    .as_ref()
                    .map(|e| e.user_message())
                    .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string()),
            ),
            None => Self::Skeleton,
        }
    }
}

/// The branch of the contract a collection is in, without its items.
///
/// Pages whose rows keep local UI state (an open thread, a draft, an inline
/// edit) switch on this and render the items with a keyed `<For>`, so a data
/// refresh diffs rows instead of rebuilding the whole list.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionShape {
    Skeleton,
    Empty,
    Populated,
    Failed(String),
}

impl CollectionShape {
    pub fn of<T>(state: &QueryState<Vec<T>>) -> Self {
        match CollectionView::classify(state) {
            CollectionView::Skeleton => Self::Skeleton,
            CollectionView::Empty => Self::Empty,
            CollectionView::Populated(_) => Self::Populated,
            CollectionView::Failed(message) => Self::Failed(message),
        }
    }
}

/// Tracks only the shape of `state`; items changing within the populated
/// branch do not notify.
pub fn use_collection_shape<T>(state: Memo<QueryState<Vec<T>>>) -> Memo<CollectionShape>
where
    T: PartialEq + Send + Sync + 'static,
{
    Memo::new(move |_| state.with(|s| CollectionShape::of(s)))
}

/// Items of a settled collection, or nothing while there is no data.
pub fn collection_items<T: Clone>(state: &QueryState<Vec<T>>) -> Vec<T> {
    state.data.as_deref().cloned().unwrap_or_default()
}

/// Keys `items` for a `<For>`, in order. The second half of each key counts
/// the earlier items with the same row key, so duplicates still get one row
/// each.
pub fn keyed_rows<T, K, F>(items: Vec<T>, row_key: F) -> Vec<((K, usize), T)>
where
    K: Hash + Eq + Clone,
    F: Fn(&T) -> K,
{
    let mut seen: HashMap<K, usize> = HashMap::new();
    items
        .into_iter()
        .map(|item| {
            let key = row_key(&item);
            let count = seen.entry(key.clone()).or_default();
            let occurrence = *count;
            *count += 1;
            ((key, occurrence), item)
        })
        .collect()
}

/// `render_collection` over a `CollectionShape`.
pub fn render_shape<S, E, P>(shape: CollectionShape, skeleton: S, empty: E, populated: P) -> AnyView
where
    S: FnOnce() -> AnyView,
    E: FnOnce() -> AnyView,
    P: FnOnce() -> AnyView,
{
    match shape {
        CollectionShape::Skeleton => skeleton(),
        CollectionShape::Empty => empty(),
        CollectionShape::Populated => populated(),
        CollectionShape::Failed(message) => view! { <ErrorState message=message /> }.into_any(),
    }
}

/// Picks the view for `state` according to `CollectionView::classify`.
pub fn render_collection<T, S, E, P>(
    state: &QueryState<Vec<T>>,
    skeleton: S,
    empty: E,
    populated: P,
) -> AnyView
where
    S: FnOnce() -> AnyView,
    E: FnOnce() -> AnyView,
    P: FnOnce(&[T]) -> AnyView,
{
    match CollectionView::classify(state) {
        CollectionView::Skeleton => skeleton(),
        CollectionView::Empty => empty(),
        CollectionView::Populated(items) => populated(items),
        CollectionView::Failed(message) => view! { <ErrorState message=message /> }.into_any(),
    }
}

/// Same contract for a single record: skeleton, error, or the record.
pub fn render_record<T, S, P>(state: &QueryState<T>, skeleton: S, populated: P) -> AnyView
where
    S: FnOnce() -> AnyView,
    P: FnOnce(&T) -> AnyView,
{
    match (&state.data, &state.error) {
        (Some(data), _) => populated(data),
        (None, Some(error)) if state.is_error() => {
            view! { <ErrorState message=error.user_message() /> }.into_any()
        }
        _ => skeleton(),
    }
}

// =========================================================
// State views
// =========================================================

/// Placeholder cards shaped like course cards.
#[component]
pub fn SkeletonGrid(#[prop(default = 6)] count: usize) -> impl IntoView {
    view! {
        <div class="grid gap-6 sm:grid-cols-2 lg:grid-cols-3">
            {(0..count)
                .map(|_| {
                    view! {
                        <div class="card bg-base-100 shadow">
                            <div class="skeleton h-40 w-full rounded-b-none"></div>
                            <div class="card-body gap-3">
                                <div class="skeleton h-5 w-3/4"></div>
                                <div class="skeleton h-4 w-1/2"></div>
                                <div class="skeleton h-4 w-1/4"></div>
                            </div>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// Placeholder rows for tables and lists.
#[component]
pub fn SkeletonList(#[prop(default = 4)] rows: usize) -> impl IntoView {
    view! {
        <div class="space-y-3">
            {(0..rows)
                .map(|_| view! { <div class="skeleton h-16 w-full"></div> })
                .collect_view()}
        </div>
    }
}

#[component]
pub fn EmptyState(
    #[prop(into)] title: String,
    #[prop(into)] message: String,
    /// Call to action, as `(label, route)`.
    #[prop(optional)]
    action: Option<(&'static str, AppRoute)>,
) -> impl IntoView {
    view! {
        <div class="card bg-base-100 border border-dashed border-base-300">
            <div class="card-body items-center text-center py-12">
                <h3 class="card-title">{title}</h3>
                <p class="text-base-content/70 max-w-md">{message}</p>
                {action
                    .map(|(label, to)| {
                        view! {
                            <div class="card-actions mt-4">
                                <Link to=to class="btn btn-primary">{label}</Link>
                            </div>
                        }
                    })}
            </div>
        </div>
    }
}

#[component]
pub fn ErrorState(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div role="alert" class="alert alert-error">
            <span>{message}</span>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::query::QueryStatus;
    use std::sync::Arc;

    fn state(data: Option<Vec<u32>>, status: QueryStatus, error: Option<ApiError>) -> QueryState<Vec<u32>> {
        QueryState {
            data: data.map(Arc::new),
            error,
            status,
            is_fetching: status == QueryStatus::Loading,
            updated_at: None,
        }
    }

    #[test]
    fn loading_without_data_is_a_skeleton() {
        let s = state(None, QueryStatus::Loading, None);
        assert_eq!(CollectionView::classify(&s), CollectionView::Skeleton);
        let idle = state(None, QueryStatus::Idle, None);
        assert_eq!(CollectionView::classify(&idle), CollectionView::Skeleton);
    }

    #[test]
    fn empty_collection_is_empty_even_while_refetching() {
        let s = state(Some(vec![]), QueryStatus::Loading, None);
        assert_eq!(CollectionView::classify(&s), CollectionView::Empty);
    }

    #[test]
    fn populated_keeps_every_item_in_order() {
        let s = state(Some(vec![3, 1, 2]), QueryStatus::Success, None);
        assert_eq!(CollectionView::classify(&s), CollectionView::Populated(&[3, 1, 2][..]));

        // A failed refetch still shows the cached items.
        let failed = state(
            Some(vec![7]),
            QueryStatus::Error,
            Some(ApiError::Network("offline".into())),
        );
        assert_eq!(CollectionView::classify(&failed), CollectionView::Populated(&[7][..]));
    }

    #[test]
    fn shape_ignores_which_items_are_shown() {
        let before = state(Some(vec![1, 2]), QueryStatus::Success, None);
        let refetching = state(Some(vec![1, 2]), QueryStatus::Loading, None);
        let grown = state(Some(vec![1, 2, 3]), QueryStatus::Success, None);
        assert_eq!(CollectionShape::of(&before), CollectionShape::Populated);
        assert_eq!(CollectionShape::of(&refetching), CollectionShape::Populated);
        assert_eq!(CollectionShape::of(&grown), CollectionShape::Populated);
        assert_eq!(collection_items(&grown), vec![1, 2, 3]);

        let emptied = state(Some(vec![]), QueryStatus::Success, None);
        assert_eq!(CollectionShape::of(&emptied), CollectionShape::Empty);
        let first_load = state(None, QueryStatus::Loading, None);
        assert_eq!(CollectionShape::of(&first_load), CollectionShape::Skeleton);
        assert!(collection_items(&first_load).is_empty());
    }

    #[test]
    fn keyed_rows_keep_duplicates_and_order() {
        let rows = keyed_rows(vec!["a", "b", "a"], |s| s.to_string());
        let keys: Vec<_> = rows.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(
            keys,
            vec![("a".to_string(), 0), ("b".to_string(), 0), ("a".to_string(), 1)]
        );
        let items: Vec<_> = rows.into_iter().map(|(_, item)| item).collect();
        assert_eq!(items, vec!["a", "b", "a"]);
    }

    #[test]
    fn failed_first_load_carries_user_message() {
        let s = state(
            None,
            QueryStatus::Error,
            Some(ApiError::from_status(403, r#"{"message":"Tenant desconocido"}"#)),
        );
        assert_eq!(
            CollectionView::classify(&s),
            CollectionView::Failed("Tenant desconocido".to_string())
        );

        let opaque = state(None, QueryStatus::Error, Some(ApiError::Network("x".into())));
        assert_eq!(
            CollectionView::classify(&opaque),
            CollectionView::Failed(FALLBACK_ERROR_MESSAGE.to_string())
        );
    }
}
