use super::*;
use crate::api::ApiClient;
use crate::query::{keys, run_mutation};
use crate::state::MemoryStore;
use crate::transport::MockTransport;
use aula_shared::HttpMethod;
use aula_shared::models::{DiscussionTopic, Notification, NotificationFilter};
use aula_shared::protocol::{CreateTopic, DeleteTopic, ListNotifications, ListTopics};
use futures::channel::oneshot;
use serde_json::json;
use std::collections::VecDeque;
use tokio::task::LocalSet;

// =========================================================
// Shared Test Harness
// =========================================================

struct Harness {
    cache: QueryCache,
    api: ApiClient,
    transport: Rc<MockTransport>,
}

fn tokio_spawner() -> Spawner {
    Rc::new(|fut: LocalBoxFuture<'static, ()>| {
        tokio::task::spawn_local(fut);
    })
}

fn harness(config: CacheConfig) -> Harness {
    let transport = Rc::new(MockTransport::new());
    let api = ApiClient::new(
        "http://localhost:3000",
        "localhost",
        Rc::new(MemoryStore::new()),
        transport.clone(),
    );
    Harness {
        cache: QueryCache::new(config, tokio_spawner()),
        api,
        transport,
    }
}

/// Lets every spawned fetch run to completion.
async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

fn topic(id: &str) -> serde_json::Value {
    json!({ "id": id, "courseId": "c1", "title": format!("Topic {id}"), "content": "..." })
}

fn topics_fetcher(api: &ApiClient, course_id: &str) -> Fetcher {
    let api = api.clone();
    let course_id = course_id.to_string();
    fetcher(move || {
        let api = api.clone();
        let req = ListTopics {
            course_id: course_id.clone(),
        };
        async move { api.send(&req).await }
    })
}

fn notifications_fetcher(api: &ApiClient, filter: NotificationFilter) -> Fetcher {
    let api = api.clone();
    fetcher(move || {
        let api = api.clone();
        async move { api.send(&ListNotifications { filter }).await }
    })
}

fn counter(hits: &Rc<Cell<usize>>) -> Listener {
    let hits = hits.clone();
    Rc::new(move || hits.set(hits.get() + 1))
}

fn noop() -> Listener {
    Rc::new(|| {})
}

type Script = Rc<RefCell<VecDeque<oneshot::Receiver<ApiResult<String>>>>>;

/// A fetcher whose responses are released by hand, in any order.
fn scripted(script: Script) -> Fetcher {
    fetcher(move || {
        let next = script.borrow_mut().pop_front();
        async move {
            match next {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(ApiError::Network("dropped".to_string()))),
                None => Err(ApiError::Network("no scripted response".to_string())),
            }
        }
    })
}

// =========================================================
// De-duplication
// =========================================================

#[tokio::test]
async fn simultaneous_observers_share_one_request() {
    LocalSet::new()
        .run_until(async {
            let h = harness(CacheConfig::default());
            h.transport.mock_response(
                HttpMethod::Get,
                "/discussions/course/c1",
                200,
                json!([topic("t1")]),
            );
            let key = keys::topics("c1");
            let hits = Rc::new(Cell::new(0));

            let _first = h.cache.observe(key.clone(), topics_fetcher(&h.api, "c1"), counter(&hits));
            let _second = h.cache.observe(key.clone(), topics_fetcher(&h.api, "c1"), counter(&hits));
            assert_eq!(h.cache.entry_state(&key), EntryState::Loading);
            assert!(h.cache.snapshot::<Vec<DiscussionTopic>>(&key).is_loading());

            settle().await;

            assert_eq!(h.transport.count("/discussions/course/c1"), 1);
            let state = h.cache.snapshot::<Vec<DiscussionTopic>>(&key);
            assert_eq!(state.status, QueryStatus::Success);
            assert!(!state.is_fetching);
            assert_eq!(state.data.map(|topics| topics.len()), Some(1));
            assert_eq!(h.cache.observer_count(&key), 2);
            // Both consumers heard the result.
            assert!(hits.get() >= 2);
        })
        .await;
}

#[tokio::test]
async fn concurrent_fetches_join_the_in_flight_request() {
    LocalSet::new()
        .run_until(async {
            let h = harness(CacheConfig::default());
            h.transport.mock_response(
                HttpMethod::Get,
                "/discussions/course/c1",
                200,
                json!([topic("t1"), topic("t2")]),
            );
            let key = keys::topics("c1");

            let a = h.cache.fetch(&key, topics_fetcher(&h.api, "c1"));
            let b = h.cache.fetch(&key, topics_fetcher(&h.api, "c1"));
            let (a, b) = futures::join!(a, b);

            let a = a.unwrap();
            let b = b.unwrap();
            assert!(Arc::ptr_eq(&a, &b));
            assert_eq!(h.transport.count("/discussions/course/c1"), 1);
        })
        .await;
}

// =========================================================
// Invalidation & revalidation
// =========================================================

#[tokio::test]
async fn successful_mutation_refetches_observed_topics() {
    LocalSet::new()
        .run_until(async {
            let h = harness(CacheConfig::default());
            h.transport.mock_response(
                HttpMethod::Get,
                "/discussions/course/c1",
                200,
                json!([topic("t1")]),
            );
            h.transport.mock_response(
                HttpMethod::Get,
                "/discussions/course/c1",
                200,
                json!([topic("t1"), topic("t2")]),
            );
            h.transport
                .mock_response(HttpMethod::Post, "/discussions/topic", 201, topic("t2"));
            let key = keys::topics("c1");

            let _observer = h.cache.observe(key.clone(), topics_fetcher(&h.api, "c1"), noop());
            settle().await;
            let before = h.cache.snapshot::<Vec<DiscussionTopic>>(&key);
            assert_eq!(before.data.as_ref().map(|t| t.len()), Some(1));

            let req = CreateTopic {
                course_id: "c1".to_string(),
                title: "Topic t2".to_string(),
                content: "...".to_string(),
                lesson_id: None,
            };
            let created = run_mutation(&h.cache, h.api.send(&req), &[keys::topics("c1")])
                .await
                .unwrap();
            assert_eq!(created.id, "t2");

            // Old data stays visible while the refetch runs.
            let during = h.cache.snapshot::<Vec<DiscussionTopic>>(&key);
            assert!(during.is_fetching);
            assert!(!during.is_loading());
            assert_eq!(during.data.as_ref().map(|t| t.len()), Some(1));

            settle().await;
            assert_eq!(h.transport.count("/discussions/course/c1"), 2);
            let after = h.cache.snapshot::<Vec<DiscussionTopic>>(&key);
            assert_eq!(after.data.as_ref().map(|t| t.len()), Some(2));
        })
        .await;
}

#[tokio::test]
async fn failed_mutation_invalidates_nothing() {
    LocalSet::new()
        .run_until(async {
            let h = harness(CacheConfig::default());
            h.transport.mock_response(
                HttpMethod::Get,
                "/discussions/course/c1",
                200,
                json!([topic("t1")]),
            );
            h.transport.mock_response(
                HttpMethod::Post,
                "/discussions/topic",
                400,
                json!({ "message": ["title should not be empty"] }),
            );
            let key = keys::topics("c1");
            let _observer = h.cache.observe(key.clone(), topics_fetcher(&h.api, "c1"), noop());
            settle().await;

            let req = CreateTopic {
                course_id: "c1".to_string(),
                title: String::new(),
                content: String::new(),
                lesson_id: None,
            };
            let err = run_mutation(&h.cache, h.api.send(&req), &[key.clone()])
                .await
                .unwrap_err();
            assert_eq!(err.user_message(), "title should not be empty");

            settle().await;
            assert_eq!(h.transport.count("/discussions/course/c1"), 1);
        })
        .await;
}

#[tokio::test]
async fn delete_answered_with_a_record_still_invalidates() {
    LocalSet::new()
        .run_until(async {
            let h = harness(CacheConfig::default());
            h.transport.mock_response(
                HttpMethod::Get,
                "/discussions/course/c1",
                200,
                json!([topic("t1"), topic("t2")]),
            );
            h.transport.mock_response(
                HttpMethod::Get,
                "/discussions/course/c1",
                200,
                json!([topic("t2")]),
            );
            h.transport.mock_response(
                HttpMethod::Delete,
                "/discussions/topic/t1",
                200,
                json!({ "id": "t1", "courseId": "c1" }),
            );
            let key = keys::topics("c1");
            let _observer = h.cache.observe(key.clone(), topics_fetcher(&h.api, "c1"), noop());
            settle().await;

            let req = DeleteTopic {
                id: "t1".to_string(),
            };
            run_mutation(&h.cache, h.api.send(&req), &[key.clone()])
                .await
                .unwrap();

            settle().await;
            assert_eq!(h.transport.count("/discussions/course/c1"), 2);
            let state = h.cache.snapshot::<Vec<DiscussionTopic>>(&key);
            let ids: Vec<_> = state.data.iter().flat_map(|t| t.iter().map(|t| t.id.clone())).collect();
            assert_eq!(ids, ["t2"]);
        })
        .await;
}

#[tokio::test]
async fn prefix_invalidation_reaches_every_filter() {
    LocalSet::new()
        .run_until(async {
            let h = harness(CacheConfig::default());
            h.transport.mock_response(HttpMethod::Get, "/notifications", 200, json!([]));
            let all = keys::notifications_filtered(NotificationFilter::All);
            let unread = keys::notifications_filtered(NotificationFilter::Unread);

            let _all = h.cache.observe(
                all.clone(),
                notifications_fetcher(&h.api, NotificationFilter::All),
                noop(),
            );
            let _unread = h.cache.observe(
                unread.clone(),
                notifications_fetcher(&h.api, NotificationFilter::Unread),
                noop(),
            );
            settle().await;
            assert_eq!(h.transport.count("/notifications"), 2);

            assert_eq!(h.cache.invalidate(&keys::notifications()), 2);
            assert_eq!(h.cache.invalidate(&keys::topics("c1")), 0);
            settle().await;

            assert_eq!(h.transport.count("/notifications"), 4);
            let state = h.cache.snapshot::<Vec<Notification>>(&unread);
            assert_eq!(state.status, QueryStatus::Success);
        })
        .await;
}

#[tokio::test]
async fn unobserved_entries_are_marked_stale_without_refetching() {
    LocalSet::new()
        .run_until(async {
            let h = harness(CacheConfig::default());
            h.transport.mock_response(
                HttpMethod::Get,
                "/discussions/course/c1",
                200,
                json!([topic("t1")]),
            );
            let key = keys::topics("c1");
            let hits = Rc::new(Cell::new(0));

            let observer = h.cache.observe(key.clone(), topics_fetcher(&h.api, "c1"), counter(&hits));
            settle().await;
            drop(observer);
            let heard = hits.get();

            assert_eq!(h.cache.invalidate(&key), 1);
            settle().await;
            assert_eq!(h.transport.count("/discussions/course/c1"), 1);
            assert_eq!(h.cache.entry_state(&key), EntryState::Stale);
            assert_eq!(hits.get(), heard);

            // Remounting shows the cached topics at once and revalidates.
            let _again = h.cache.observe(key.clone(), topics_fetcher(&h.api, "c1"), noop());
            let state = h.cache.snapshot::<Vec<DiscussionTopic>>(&key);
            assert!(state.data.is_some());
            assert!(state.is_fetching);
            assert!(!state.is_loading());
            settle().await;
            assert_eq!(h.transport.count("/discussions/course/c1"), 2);
        })
        .await;
}

#[tokio::test]
async fn focus_revalidates_only_observed_stale_entries() {
    LocalSet::new()
        .run_until(async {
            let h = harness(CacheConfig::default());
            h.transport.mock_response(HttpMethod::Get, "/discussions/course/c1", 200, json!([]));
            h.transport.mock_response(HttpMethod::Get, "/discussions/course/c2", 200, json!([]));

            let _observer =
                h.cache
                    .observe(keys::topics("c1"), topics_fetcher(&h.api, "c1"), noop());
            h.cache
                .fetch(&keys::topics("c2"), topics_fetcher(&h.api, "c2"))
                .await
                .unwrap();
            settle().await;

            assert_eq!(h.cache.revalidate(Trigger::Focus), 1);
            settle().await;
            assert_eq!(h.transport.count("/discussions/course/c1"), 2);
            assert_eq!(h.transport.count("/discussions/course/c2"), 1);
        })
        .await;
}

#[tokio::test]
async fn fresh_entries_are_served_from_cache() {
    LocalSet::new()
        .run_until(async {
            let h = harness(CacheConfig {
                stale_time: Duration::from_secs(300),
            });
            h.transport.mock_response(HttpMethod::Get, "/discussions/course/c1", 200, json!([]));
            let key = keys::topics("c1");

            let first = h.cache.observe(key.clone(), topics_fetcher(&h.api, "c1"), noop());
            settle().await;
            assert_eq!(h.cache.entry_state(&key), EntryState::Fresh);
            drop(first);

            let _second = h.cache.observe(key.clone(), topics_fetcher(&h.api, "c1"), noop());
            assert_eq!(h.cache.revalidate(Trigger::Reconnect), 0);
            settle().await;
            assert_eq!(h.transport.count("/discussions/course/c1"), 1);

            // Explicit invalidation overrides freshness.
            h.cache.invalidate(&key);
            settle().await;
            assert_eq!(h.transport.count("/discussions/course/c1"), 2);
            assert_eq!(h.cache.entry_state(&key), EntryState::Fresh);
        })
        .await;
}

// =========================================================
// Stale responses & failures
// =========================================================

#[tokio::test]
async fn superseded_response_never_overwrites_newer_data() {
    LocalSet::new()
        .run_until(async {
            let h = harness(CacheConfig::default());
            let script: Script = Rc::new(RefCell::new(VecDeque::new()));
            let (old_tx, old_rx) = oneshot::channel();
            let (new_tx, new_rx) = oneshot::channel();
            script.borrow_mut().extend([old_rx, new_rx]);
            let key = QueryKey::from(["greeting"]);

            let _observer = h.cache.observe(key.clone(), scripted(script.clone()), noop());
            // Invalidating while the first request is in flight supersedes it.
            h.cache.invalidate(&key);

            new_tx.send(Ok("new".to_string())).unwrap();
            settle().await;
            old_tx.send(Ok("old".to_string())).unwrap();
            settle().await;

            let state = h.cache.snapshot::<String>(&key);
            assert_eq!(state.data.as_deref().map(String::as_str), Some("new"));
            assert_eq!(state.status, QueryStatus::Success);
            assert!(!state.is_fetching);
        })
        .await;
}

#[tokio::test]
async fn failed_refetch_keeps_previous_data() {
    LocalSet::new()
        .run_until(async {
            let h = harness(CacheConfig::default());
            h.transport.mock_response(
                HttpMethod::Get,
                "/discussions/course/c1",
                200,
                json!([topic("t1")]),
            );
            h.transport.mock_response(
                HttpMethod::Get,
                "/discussions/course/c1",
                500,
                json!({ "message": "Internal server error" }),
            );
            let key = keys::topics("c1");

            let _observer = h.cache.observe(key.clone(), topics_fetcher(&h.api, "c1"), noop());
            settle().await;
            h.cache.invalidate(&key);
            settle().await;

            let state = h.cache.snapshot::<Vec<DiscussionTopic>>(&key);
            assert!(state.is_error());
            assert_eq!(state.error.as_ref().and_then(ApiError::status), Some(500));
            assert_eq!(state.data.map(|t| t.len()), Some(1));
        })
        .await;
}

#[tokio::test]
async fn failed_first_load_has_no_data() {
    LocalSet::new()
        .run_until(async {
            let h = harness(CacheConfig::default());
            let key = keys::topics("missing");

            let _observer =
                h.cache
                    .observe(key.clone(), topics_fetcher(&h.api, "missing"), noop());
            settle().await;

            let state = h.cache.snapshot::<Vec<DiscussionTopic>>(&key);
            assert!(state.is_error());
            assert!(!state.is_loading());
            assert!(state.data.is_none());
            assert_eq!(state.error.map(|e| e.user_message()), Some("Not Found".to_string()));
        })
        .await;
}

// =========================================================
// Session reset
// =========================================================

#[tokio::test]
async fn reset_hides_data_from_the_previous_session() {
    LocalSet::new()
        .run_until(async {
            let h = harness(CacheConfig::default());
            let script: Script = Rc::new(RefCell::new(VecDeque::new()));
            let (alice_tx, alice_rx) = oneshot::channel();
            let (bob_tx, bob_rx) = oneshot::channel();
            script.borrow_mut().extend([alice_rx, bob_rx]);
            let key = keys::my_courses();

            let first = h.cache.observe(key.clone(), scripted(script.clone()), noop());
            alice_tx.send(Ok("alice".to_string())).unwrap();
            settle().await;
            drop(first);

            assert_eq!(h.cache.reset(&QueryKey::root()), 1);
            assert_eq!(h.cache.entry_state(&key), EntryState::Absent);

            let _second = h.cache.observe(key.clone(), scripted(script.clone()), noop());
            let mounted = h.cache.snapshot::<String>(&key);
            assert!(mounted.data.is_none());
            assert!(mounted.is_loading());

            bob_tx.send(Ok("bob".to_string())).unwrap();
            settle().await;
            let state = h.cache.snapshot::<String>(&key);
            assert_eq!(state.data.as_deref().map(String::as_str), Some("bob"));
        })
        .await;
}

#[tokio::test]
async fn reset_supersedes_a_request_in_flight() {
    LocalSet::new()
        .run_until(async {
            let h = harness(CacheConfig::default());
            let script: Script = Rc::new(RefCell::new(VecDeque::new()));
            let (old_tx, old_rx) = oneshot::channel();
            let (new_tx, new_rx) = oneshot::channel();
            script.borrow_mut().extend([old_rx, new_rx]);
            let key = keys::notifications();
            let hits = Rc::new(Cell::new(0));

            let _observer = h.cache.observe(key.clone(), scripted(script.clone()), counter(&hits));
            h.cache.reset(&QueryKey::root());
            assert!(h.cache.snapshot::<String>(&key).is_loading());

            old_tx.send(Ok("previous user".to_string())).unwrap();
            settle().await;
            assert!(h.cache.snapshot::<String>(&key).data.is_none());

            new_tx.send(Ok("current user".to_string())).unwrap();
            settle().await;
            let state = h.cache.snapshot::<String>(&key);
            assert_eq!(state.data.as_deref().map(String::as_str), Some("current user"));
            assert!(hits.get() >= 3);
        })
        .await;
}

#[test]
fn snapshot_of_unknown_key_is_idle() {
    let cache = QueryCache::new(
        CacheConfig::default(),
        Rc::new(|_: LocalBoxFuture<'static, ()>| {}),
    );
    let state = cache.snapshot::<Vec<DiscussionTopic>>(&keys::courses());
    assert_eq!(state.status, QueryStatus::Idle);
    assert_eq!(cache.entry_state(&keys::courses()), EntryState::Absent);
}
