use crate::models::{
    AuthResponse, Coupon, Course, CourseDetail, DiscussionPost, DiscussionTopic, Enrollment,
    Notification, NotificationFilter, ReportKind, Resource, ResourceKind, RosterEntry,
    StudioAnalytics, StudioFinances, StudioReport, UserProfile,
};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned, de::IgnoredAny};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Whether requests with this method carry the serialized request as body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// The request value itself is the JSON body for methods that carry one; path
/// parameters are skipped during serialization.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned + 'static;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path, relative to the API base URL.
    fn path(&self) -> String;
    /// Query string parameters.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Response of endpoints whose body carries nothing the client reads.
///
/// Accepts any JSON value (the affected record, a `{"count": n}` summary or
/// `null` for an empty body) and discards it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ack;

impl<'de> Deserialize<'de> for Ack {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer).map(|_| Ack)
    }
}

/// Percent-encodes everything outside the RFC 3986 unreserved set, for path
/// segments and query values alike.
pub fn encode_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

// =========================================================
// Courses
// =========================================================

/// List the tenant's course catalog
#[derive(Debug, Serialize, Deserialize)]
pub struct ListCourses;

impl ApiRequest for ListCourses {
    type Response = Vec<Course>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/courses".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetCourse {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for GetCourse {
    type Response = CourseDetail;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/courses/{}", encode_component(&self.id))
    }
}

// =========================================================
// Enrollments
// =========================================================

/// The signed-in student's enrollments
#[derive(Debug, Serialize, Deserialize)]
pub struct MyEnrollments;

impl ApiRequest for MyEnrollments {
    type Response = Vec<Enrollment>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/enrollments/my".to_string()
    }
}

/// Students enrolled in a course (studio roster)
#[derive(Debug, Serialize, Deserialize)]
pub struct CourseRoster {
    #[serde(skip)]
    pub course_id: String,
}

impl ApiRequest for CourseRoster {
    type Response = Vec<RosterEntry>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/enrollments/course/{}", encode_component(&self.course_id))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollInCourse {
    pub course_id: String,
}

impl ApiRequest for EnrollInCourse {
    type Response = Enrollment;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/enrollments/course".to_string()
    }
}

// =========================================================
// Discussions
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListTopics {
    #[serde(skip)]
    pub course_id: String,
}

impl ApiRequest for ListTopics {
    type Response = Vec<DiscussionTopic>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/discussions/course/{}", encode_component(&self.course_id))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopic {
    pub course_id: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<String>,
}

impl ApiRequest for CreateTopic {
    type Response = DiscussionTopic;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/discussions/topic".to_string()
    }
}

/// Partial update of a topic; only the fields that are `Some` are sent.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTopic {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_resolved: Option<bool>,
}

impl ApiRequest for UpdateTopic {
    type Response = DiscussionTopic;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/discussions/topic/{}", encode_component(&self.id))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTopic {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for DeleteTopic {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/discussions/topic/{}", encode_component(&self.id))
    }
}

/// Reply to a topic, optionally nested under another post
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    pub topic_id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl ApiRequest for CreatePost {
    type Response = DiscussionPost;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/discussions/post".to_string()
    }
}

// =========================================================
// Notifications
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListNotifications {
    #[serde(skip)]
    pub filter: NotificationFilter,
}

impl ApiRequest for ListNotifications {
    type Response = Vec<Notification>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/notifications".to_string()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("filter", self.filter.as_str().to_string())]
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkNotificationRead {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for MarkNotificationRead {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/notifications/{}/read", encode_component(&self.id))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkAllNotificationsRead;

impl ApiRequest for MarkAllNotificationsRead {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/notifications/read-all".to_string()
    }
}

// =========================================================
// Studio: coupons, analytics, finances, reports
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListCoupons;

impl ApiRequest for ListCoupons {
    type Response = Vec<Coupon>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/coupons".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoupon {
    pub code: String,
    pub discount_percent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
}

impl ApiRequest for CreateCoupon {
    type Response = Coupon;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/coupons".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StudioAnalyticsRequest;

impl ApiRequest for StudioAnalyticsRequest {
    type Response = StudioAnalytics;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/analytics/studio".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StudioFinancesRequest;

impl ApiRequest for StudioFinancesRequest {
    type Response = StudioFinances;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/finances/studio".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StudioReportRequest {
    #[serde(skip)]
    pub kind: ReportKind,
}

impl ApiRequest for StudioReportRequest {
    type Response = StudioReport;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/reports/studio/{}", self.kind.as_str())
    }
}

// =========================================================
// Course resources
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResources {
    #[serde(skip)]
    pub course_id: String,
}

impl ApiRequest for ListResources {
    type Response = Vec<Resource>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/resources/course/{}", encode_component(&self.course_id))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResource {
    #[serde(skip)]
    pub course_id: String,
    pub title: String,
    pub kind: ResourceKind,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<String>,
}

impl ApiRequest for CreateResource {
    type Response = Resource;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/resources/course/{}", encode_component(&self.course_id))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResource {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ApiRequest for UpdateResource {
    type Response = Resource;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/resources/{}", encode_component(&self.id))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResource {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for DeleteResource {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/resources/{}", encode_component(&self.id))
    }
}

// =========================================================
// Users & auth
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct GetProfile;

impl ApiRequest for GetProfile {
    type Response = UserProfile;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/users/profile".to_string()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ApiRequest for UpdateProfile {
    type Response = UserProfile;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        "/users/profile".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Signup {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl ApiRequest for Signup {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/signup".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

impl ApiRequest for Login {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/login".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_parameters_are_not_serialized() {
        let req = UpdateTopic {
            id: "t1".to_string(),
            is_pinned: Some(true),
            ..Default::default()
        };
        assert_eq!(req.path(), "/discussions/topic/t1");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({ "isPinned": true })
        );
    }

    #[test]
    fn notifications_filter_goes_to_query() {
        let req = ListNotifications {
            filter: NotificationFilter::Unread,
        };
        assert_eq!(req.path(), "/notifications");
        assert_eq!(req.query(), vec![("filter", "unread".to_string())]);
    }

    #[test]
    fn resource_create_posts_to_course_path() {
        let req = CreateResource {
            course_id: "c9".to_string(),
            title: "Slides".to_string(),
            kind: ResourceKind::Link,
            url: "https://example.com/s.pdf".to_string(),
            lesson_id: None,
        };
        assert_eq!(req.path(), "/resources/course/c9");
        assert_eq!(CreateResource::METHOD, HttpMethod::Post);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({ "title": "Slides", "kind": "LINK", "url": "https://example.com/s.pdf" })
        );
    }

    #[test]
    fn report_kinds_map_to_subpaths() {
        let paths: Vec<String> = ReportKind::ALL
            .iter()
            .map(|kind| StudioReportRequest { kind: *kind }.path())
            .collect();
        assert_eq!(
            paths,
            vec![
                "/reports/studio/sales",
                "/reports/studio/students",
                "/reports/studio/courses"
            ]
        );
    }

    #[test]
    fn ack_accepts_any_body() {
        for body in ["null", r#"{"id":"t1","courseId":"c1"}"#, r#"{"count":3}"#, "[]", "true"] {
            assert_eq!(serde_json::from_str::<Ack>(body).unwrap(), Ack, "body {body}");
        }
        assert!(serde_json::from_str::<Ack>("").is_err());
    }

    #[test]
    fn path_ids_are_encoded() {
        let req = DeleteResource {
            id: "r 1/../x".to_string(),
        };
        assert_eq!(req.path(), "/resources/r%201%2F..%2Fx");
        assert_eq!(GetCourse { id: "c-9_ok".to_string() }.path(), "/courses/c-9_ok");
        assert_eq!(encode_component("ñ"), "%C3%B1");
    }

    #[test]
    fn only_write_methods_carry_a_body() {
        assert!(!HttpMethod::Get.has_body());
        assert!(!HttpMethod::Delete.has_body());
        assert!(HttpMethod::Patch.has_body());
    }
}
