//! Query keys used by the pages.
//!
//! Keys that share a first part are invalidated together: `notifications()`
//! reaches both notification filters, `studio()` every studio screen.

use aula_shared::models::{NotificationFilter, ReportKind};

use super::QueryKey;

pub fn courses() -> QueryKey {
    QueryKey::from(["courses"])
}

pub fn course(id: &str) -> QueryKey {
    QueryKey::from(["course", id])
}

pub fn my_courses() -> QueryKey {
    QueryKey::from(["my-courses"])
}

pub fn topics(course_id: &str) -> QueryKey {
    QueryKey::from(["topics", course_id])
}

pub fn notifications() -> QueryKey {
    QueryKey::from(["notifications"])
}

pub fn notifications_filtered(filter: NotificationFilter) -> QueryKey {
    QueryKey::from(["notifications", filter.as_str()])
}

pub fn profile() -> QueryKey {
    QueryKey::from(["profile"])
}

pub fn studio() -> QueryKey {
    QueryKey::from(["studio"])
}

pub fn analytics() -> QueryKey {
    QueryKey::from(["studio", "analytics"])
}

pub fn finances() -> QueryKey {
    QueryKey::from(["studio", "finances"])
}

pub fn report(kind: ReportKind) -> QueryKey {
    QueryKey::from(["studio", "reports", kind.as_str()])
}

pub fn coupons() -> QueryKey {
    QueryKey::from(["coupons"])
}

pub fn roster(course_id: &str) -> QueryKey {
    QueryKey::from(["roster", course_id])
}

pub fn resources(course_id: &str) -> QueryKey {
    QueryKey::from(["resources", course_id])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_prefixes_cover_their_members() {
        assert!(notifications_filtered(NotificationFilter::Unread).starts_with(&notifications()));
        assert!(notifications_filtered(NotificationFilter::All).starts_with(&notifications()));
        assert!(report(ReportKind::Students).starts_with(&studio()));
        assert!(!topics("c1").starts_with(&topics("c2")));
        assert!(!course("c1").starts_with(&courses()));
    }
}
