//! Route table: every page of the app, its path and its guard rules.
//!
//! Pure logic with no DOM access, so it is tested natively.

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// Home page.
    #[default]
    Catalog,
    CourseDetail { id: String },
    Discussions { course_id: String },
    Cart,
    Checkout,
    Login,
    Signup,
    MyCourses,
    Notifications,
    Profile,
    /// Instructor studio dashboard.
    Studio,
    StudioCoupons,
    StudioFinances,
    StudioReports,
    /// Students enrolled in one course.
    StudioRoster { course_id: String },
    StudioResources { course_id: String },
    NotFound,
}

impl AppRoute {
    /// Ignores the query string, the fragment and trailing slashes.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Catalog,
            ["courses", id] => Self::CourseDetail { id: id.to_string() },
            ["courses", id, "discussions"] => Self::Discussions {
                course_id: id.to_string(),
            },
            ["cart"] => Self::Cart,
            ["checkout"] => Self::Checkout,
            ["login"] => Self::Login,
            ["signup"] => Self::Signup,
            ["my-courses"] => Self::MyCourses,
            ["notifications"] => Self::Notifications,
            ["profile"] => Self::Profile,
            ["studio"] => Self::Studio,
            ["studio", "coupons"] => Self::StudioCoupons,
            ["studio", "finances"] => Self::StudioFinances,
            ["studio", "reports"] => Self::StudioReports,
            ["studio", "courses", id, "students"] => Self::StudioRoster {
                course_id: id.to_string(),
            },
            ["studio", "courses", id, "resources"] => Self::StudioResources {
                course_id: id.to_string(),
            },
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Self::Catalog => "/".to_string(),
            Self::CourseDetail { id } => format!("/courses/{id}"),
            Self::Discussions { course_id } => format!("/courses/{course_id}/discussions"),
            Self::Cart => "/cart".to_string(),
            Self::Checkout => "/checkout".to_string(),
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::MyCourses => "/my-courses".to_string(),
            Self::Notifications => "/notifications".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::Studio => "/studio".to_string(),
            Self::StudioCoupons => "/studio/coupons".to_string(),
            Self::StudioFinances => "/studio/finances".to_string(),
            Self::StudioReports => "/studio/reports".to_string(),
            Self::StudioRoster { course_id } => format!("/studio/courses/{course_id}/students"),
            Self::StudioResources { course_id } => {
                format!("/studio/courses/{course_id}/resources")
            }
            Self::NotFound => "/404".to_string(),
        }
    }

    /// Catalog, course detail and cart are open to guests; every other page
    /// needs a session.
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Self::Catalog
                | Self::CourseDetail { .. }
                | Self::Cart
                | Self::Login
                | Self::Signup
                | Self::NotFound
        )
    }

    /// Pages a signed-in user is sent away from.
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Signup)
    }

    /// For the navbar highlight.
    pub fn is_studio(&self) -> bool {
        matches!(
            self,
            Self::Studio
                | Self::StudioCoupons
                | Self::StudioFinances
                | Self::StudioReports
                | Self::StudioRoster { .. }
                | Self::StudioResources { .. }
        )
    }

    /// `Ok` with the route to load, or `Err` with where to redirect instead.
    pub fn guard(self, is_authenticated: bool) -> Result<Self, Self> {
        if self.requires_auth() && !is_authenticated {
            return Err(Self::auth_failure_redirect());
        }
        if self.should_redirect_when_authenticated() && is_authenticated {
            return Err(Self::auth_success_redirect());
        }
        Ok(self)
    }

    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// Where the login and signup pages send a signed-in user.
    pub fn auth_success_redirect() -> Self {
        Self::MyCourses
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_round_trips_through_its_path() {
        let routes = [
            AppRoute::Catalog,
            AppRoute::CourseDetail { id: "c1".into() },
            AppRoute::Discussions {
                course_id: "c1".into(),
            },
            AppRoute::Cart,
            AppRoute::Checkout,
            AppRoute::Login,
            AppRoute::Signup,
            AppRoute::MyCourses,
            AppRoute::Notifications,
            AppRoute::Profile,
            AppRoute::Studio,
            AppRoute::StudioCoupons,
            AppRoute::StudioFinances,
            AppRoute::StudioReports,
            AppRoute::StudioRoster {
                course_id: "c9".into(),
            },
            AppRoute::StudioResources {
                course_id: "c9".into(),
            },
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn parsing_ignores_query_and_trailing_slash() {
        assert_eq!(
            AppRoute::from_path("/courses/abc/?ref=home"),
            AppRoute::CourseDetail { id: "abc".into() }
        );
        assert_eq!(AppRoute::from_path("/cart#top"), AppRoute::Cart);
        assert_eq!(AppRoute::from_path(""), AppRoute::Catalog);
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(AppRoute::from_path("/courses"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/studio/courses/c1"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/dashboard"), AppRoute::NotFound);
    }

    #[test]
    fn guard_covers_private_pages_only() {
        assert!(!AppRoute::Catalog.requires_auth());
        assert!(!AppRoute::CourseDetail { id: "c1".into() }.requires_auth());
        assert!(!AppRoute::Cart.requires_auth());
        assert!(AppRoute::Checkout.requires_auth());
        assert!(AppRoute::MyCourses.requires_auth());
        assert!(
            AppRoute::Discussions {
                course_id: "c1".into()
            }
            .requires_auth()
        );
        assert!(AppRoute::StudioReports.requires_auth());

        assert!(AppRoute::Login.should_redirect_when_authenticated());
        assert!(AppRoute::Signup.should_redirect_when_authenticated());
        assert!(!AppRoute::Cart.should_redirect_when_authenticated());
        assert_eq!(AppRoute::auth_failure_redirect(), AppRoute::Login);
        assert_eq!(AppRoute::auth_success_redirect(), AppRoute::MyCourses);
    }

    #[test]
    fn guard_redirects_in_both_directions() {
        assert_eq!(AppRoute::Profile.guard(false), Err(AppRoute::Login));
        assert_eq!(AppRoute::Profile.guard(true), Ok(AppRoute::Profile));
        assert_eq!(AppRoute::Login.guard(true), Err(AppRoute::MyCourses));
        assert_eq!(AppRoute::Signup.guard(false), Ok(AppRoute::Signup));
        assert_eq!(AppRoute::Cart.guard(false), Ok(AppRoute::Cart));
    }
}
