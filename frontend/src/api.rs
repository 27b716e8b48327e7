//! Tenant-aware API client.
//!
//! Every request gets two additions on top of the endpoint's own path and
//! body: the `X-Tenant-Id` header, resolved from the hostname (or the stored
//! override on local hosts), and `Authorization: Bearer <token>` when a token
//! is stored. Both are read per request, so signing in or switching tenant
//! takes effect without rebuilding the client.
//!
//! There is no retry, timeout or backoff policy; failures go straight back to
//! the caller.

use std::rc::Rc;

use aula_shared::protocol::encode_component;
use aula_shared::{
    ApiRequest, HEADER_AUTHORIZATION, HEADER_TENANT_ID, resolve_tenant, storage_keys,
};
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::state::KeyValueStore;
use crate::transport::{HttpRequest, HttpTransport};

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    hostname: String,
    store: Rc<dyn KeyValueStore>,
    transport: Rc<dyn HttpTransport>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        hostname: &str,
        store: Rc<dyn KeyValueStore>,
        transport: Rc<dyn HttpTransport>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            hostname: hostname.to_string(),
            store,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The tenant the next request will be sent for.
    pub fn tenant_id(&self) -> String {
        let local_override = self.store.get(storage_keys::TENANT_ID);
        resolve_tenant(&self.hostname, local_override.as_deref())
    }

    fn bearer_token(&self) -> Option<String> {
        self.store
            .get(storage_keys::TOKEN)
            .filter(|token| !token.is_empty())
    }

    fn url(&self, path: &str, query: &[(&'static str, String)]) -> String {
        let mut url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };

        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&encode_component(key));
            url.push('=');
            url.push_str(&encode_component(value));
        }
        url
    }

    /// Resolves `req` into a wire request without sending it.
    pub fn build<R: ApiRequest>(&self, req: &R) -> ApiResult<HttpRequest> {
        let url = self.url(&req.path(), &req.query());
        let mut http = HttpRequest::new(&url, R::METHOD)
            .with_header(HEADER_TENANT_ID, &self.tenant_id());

        if let Some(token) = self.bearer_token() {
            http = http.with_header(HEADER_AUTHORIZATION, &format!("Bearer {token}"));
        }

        if R::METHOD.has_body() {
            let value =
                serde_json::to_value(req).map_err(|e| ApiError::Request(e.to_string()))?;
            // Unit requests serialize to `null`, which is not a valid JSON body.
            if !value.is_null() {
                http = http
                    .with_header("Content-Type", "application/json")
                    .with_body(value.to_string());
            }
        }

        Ok(http)
    }

    /// Sends `req` and decodes its response.
    pub async fn send<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let http = self.build(req)?;
        let method = http.method;
        let path = req.path();
        debug!(method = method.as_str(), %path, tenant = ?http.header(HEADER_TENANT_ID), "api request");

        let res = self.transport.send(http).await.inspect_err(|e| {
            warn!(method = method.as_str(), %path, error = %e, "api request failed");
        })?;

        if !res.ok() {
            let err = ApiError::from_status(res.status, &res.body);
            warn!(method = method.as_str(), %path, status = res.status, "api request rejected");
            return Err(err);
        }

        // 204 and empty 200 bodies decode as `null`, which `Ack` accepts.
        let body = if res.body.trim().is_empty() {
            "null"
        } else {
            res.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| {
            warn!(method = method.as_str(), %path, error = %e, "api response did not match schema");
            ApiError::Decode(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStore;
    use crate::transport::MockTransport;
    use aula_shared::HttpMethod;
    use aula_shared::models::NotificationFilter;
    use aula_shared::protocol::{
        Ack, DeleteTopic, ListCourses, ListNotifications, MarkAllNotificationsRead, UpdateTopic,
    };
    use serde_json::json;

    fn client(hostname: &str, store: Rc<MemoryStore>) -> (ApiClient, Rc<MockTransport>) {
        let transport = Rc::new(MockTransport::new());
        let api = ApiClient::new("http://localhost:3000/", hostname, store, transport.clone());
        (api, transport)
    }

    #[test]
    fn local_host_uses_stored_tenant_and_token() {
        let store = Rc::new(MemoryStore::with_entries([
            (storage_keys::TENANT_ID, "acme"),
            (storage_keys::TOKEN, "jwt-1"),
        ]));
        let (api, _) = client("localhost", store);

        let req = api.build(&ListCourses).unwrap();
        assert_eq!(req.url, "http://localhost:3000/courses");
        assert_eq!(req.header(HEADER_TENANT_ID), Some("acme"));
        assert_eq!(req.header(HEADER_AUTHORIZATION), Some("Bearer jwt-1"));
        assert_eq!(req.body, None);
    }

    #[test]
    fn remote_host_uses_subdomain_and_omits_missing_token() {
        let (api, _) = client("globex.aula.example.com", Rc::new(MemoryStore::new()));

        let req = api.build(&ListCourses).unwrap();
        assert_eq!(req.header(HEADER_TENANT_ID), Some("globex"));
        assert_eq!(req.header(HEADER_AUTHORIZATION), None);
    }

    #[test]
    fn tenant_and_token_are_read_per_request() {
        let store = Rc::new(MemoryStore::new());
        let (api, _) = client("localhost", store.clone());
        assert_eq!(api.tenant_id(), "demo");

        store.set(storage_keys::TENANT_ID, "initech");
        store.set(storage_keys::TOKEN, "t");
        let req = api.build(&ListCourses).unwrap();
        assert_eq!(req.header(HEADER_TENANT_ID), Some("initech"));
        assert_eq!(req.header(HEADER_AUTHORIZATION), Some("Bearer t"));
    }

    #[test]
    fn patch_sends_json_body_and_query_is_encoded() {
        let (api, _) = client("localhost", Rc::new(MemoryStore::new()));

        let patch = api
            .build(&UpdateTopic {
                id: "t1".to_string(),
                is_resolved: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(patch.method, HttpMethod::Patch);
        assert_eq!(patch.header("Content-Type"), Some("application/json"));
        assert_eq!(patch.body.as_deref(), Some(r#"{"isResolved":true}"#));

        let list = api
            .build(&ListNotifications {
                filter: NotificationFilter::Unread,
            })
            .unwrap();
        assert_eq!(list.url, "http://localhost:3000/notifications?filter=unread");

        let read_all = api.build(&MarkAllNotificationsRead).unwrap();
        assert_eq!(read_all.body, None);
    }

    #[test]
    fn query_values_and_path_ids_are_encoded() {
        assert_eq!(encode_component("a b&c=d"), "a%20b%26c%3Dd");

        let (api, _) = client("localhost", Rc::new(MemoryStore::new()));
        let req = api
            .build(&DeleteTopic {
                id: "t/1?x".to_string(),
            })
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/discussions/topic/t%2F1%3Fx");
    }

    #[tokio::test]
    async fn send_decodes_success_and_empty_bodies() {
        let (api, transport) = client("localhost", Rc::new(MemoryStore::new()));
        transport.mock_response(
            HttpMethod::Get,
            "/courses",
            200,
            json!([{ "id": "c1", "title": "Rust", "slug": "rust", "price": 10 }]),
        );
        transport.mock_response(HttpMethod::Delete, "/discussions/topic/t1", 204, json!(null));

        let courses = api.send(&ListCourses).await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].slug, "rust");

        api.send(&DeleteTopic {
            id: "t1".to_string(),
        })
        .await
        .unwrap();
        assert_eq!(transport.count("/discussions/topic/t1"), 1);
        let last = transport.last_request().unwrap();
        assert_eq!(last.method, HttpMethod::Delete);
        assert_eq!(last.header(HEADER_TENANT_ID), Some("demo"));
    }

    #[tokio::test]
    async fn acknowledgements_accept_json_bodies() {
        let (api, transport) = client("localhost", Rc::new(MemoryStore::new()));
        transport.mock_response(
            HttpMethod::Delete,
            "/discussions/topic/t1",
            200,
            json!({ "id": "t1", "courseId": "c1" }),
        );
        transport.mock_response(
            HttpMethod::Post,
            "/notifications/read-all",
            201,
            json!({ "count": 3 }),
        );

        let delete = DeleteTopic {
            id: "t1".to_string(),
        };
        let deleted = api.send(&delete);
        assert_eq!(deleted.await, Ok(Ack));
        assert_eq!(api.send(&MarkAllNotificationsRead).await, Ok(Ack));
    }

    #[tokio::test]
    async fn send_maps_error_status_with_server_message() {
        let (api, transport) = client("localhost", Rc::new(MemoryStore::new()));
        transport.mock_response(
            HttpMethod::Get,
            "/courses",
            403,
            json!({ "statusCode": 403, "message": "Sin acceso a este tenant" }),
        );

        let err = api.send(&ListCourses).await.unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.user_message(), "Sin acceso a este tenant");
        // No retry.
        assert_eq!(transport.count("/courses"), 1);
    }

    #[tokio::test]
    async fn send_reports_schema_mismatch() {
        let (api, transport) = client("localhost", Rc::new(MemoryStore::new()));
        transport.mock_response(HttpMethod::Get, "/courses", 200, json!({ "unexpected": true }));

        let err = api.send(&ListCourses).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
