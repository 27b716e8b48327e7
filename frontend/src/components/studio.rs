//! Instructor studio: analytics dashboard plus coupon, finance, report,
//! roster and resource screens.

mod coupons;
mod finances;
mod reports;
mod resources;
mod roster;

pub use coupons::CouponsPage;
pub use finances::FinancesPage;
pub use reports::ReportsPage;
pub use resources::ResourcesPage;
pub use roster::RosterPage;

use aula_shared::models::{Course, MonthlyPoint, Role, UserProfile};
use aula_shared::protocol::{ListCourses, StudioAnalyticsRequest};
use leptos::prelude::*;

use crate::auth::use_auth;
use crate::components::collection::{EmptyState, SkeletonGrid, SkeletonList, render_collection, render_record};
use crate::components::format;
use crate::components::layout::PageHeader;
use crate::query::{keys, use_api_query};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// Courses the user manages: all of them for admins, their own otherwise.
pub fn managed_courses<'a>(courses: &'a [Course], user: Option<&UserProfile>) -> Vec<&'a Course> {
    let Some(user) = user else {
        return Vec::new();
    };
    courses
        .iter()
        .filter(|c| {
            user.role == Role::Admin || c.instructor.as_ref().is_some_and(|i| i.id == user.id)
        })
        .collect()
}

/// Bar heights as a percentage of the largest value.
pub fn bar_heights(points: &[MonthlyPoint]) -> Vec<f64> {
    let max = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    points
        .iter()
        .map(|p| if max > 0.0 { p.value / max * 100.0 } else { 0.0 })
        .collect()
}

#[component]
pub fn StudioNav() -> impl IntoView {
    let router = use_router();
    let tabs = [
        (AppRoute::Studio, "Resumen"),
        (AppRoute::StudioCoupons, "Cupones"),
        (AppRoute::StudioFinances, "Finanzas"),
        (AppRoute::StudioReports, "Reportes"),
    ];

    view! {
        <div role="tablist" class="tabs tabs-bordered">
            {tabs
                .into_iter()
                .map(|(route, label)| {
                    let target = route.clone();
                    let active = move || router.current_route().with(|r| *r == target);
                    view! {
                        <Link to=route class="tab">
                            <span class:font-bold=active>{label}</span>
                        </Link>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
pub fn StudioPage() -> impl IntoView {
    let analytics = use_api_query(keys::analytics(), || StudioAnalyticsRequest);

    view! {
        <PageHeader title="Studio" subtitle="Gestiona tus cursos y estudiantes." />
        <StudioNav />
        {move || {
            let state = analytics.get();
            render_record(
                &state,
                || view! { <SkeletonGrid count=4 /> }.into_any(),
                |a| {
                    let heights = bar_heights(&a.enrollments_by_month);
                    let months = a.enrollments_by_month.clone();
                    view! {
                        <div class="stats stats-vertical md:stats-horizontal shadow w-full">
                            <Stat title="Estudiantes" value=a.total_students.to_string() />
                            <Stat title="Cursos" value=a.total_courses.to_string() />
                            <Stat title="Ingresos" value=format::money(a.total_revenue) />
                            <Stat title="Progreso medio" value=format::percent(a.average_progress) />
                        </div>
                        {(!months.is_empty())
                            .then(|| {
                                view! {
                                    <div class="card bg-base-100 shadow">
                                        <div class="card-body">
                                            <h2 class="card-title text-lg">"Inscripciones por mes"</h2>
                                            <div class="flex items-end gap-2 h-40">
                                                {months
                                                    .into_iter()
                                                    .zip(heights)
                                                    .map(|(p, h)| {
                                                        view! {
                                                            <div class="flex-1 flex flex-col items-center gap-1 h-full justify-end">
                                                                <div
                                                                    class="bg-primary w-full rounded-t"
                                                                    style=format!("height: {h:.0}%")
                                                                    title=p.value.to_string()
                                                                ></div>
                                                                <span class="text-xs opacity-70">{p.month}</span>
                                                            </div>
                                                        }
                                                    })
                                                    .collect_view()}
                                            </div>
                                        </div>
                                    </div>
                                }
                            })}
                    }
                        .into_any()
                },
            )
        }}
        <ManagedCourses />
    }
}

#[component]
fn Stat(title: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="stat">
            <div class="stat-title">{title}</div>
            <div class="stat-value text-2xl">{value}</div>
        </div>
    }
}

#[component]
fn ManagedCourses() -> impl IntoView {
    let auth = use_auth();
    let courses = use_api_query(keys::courses(), || ListCourses);

    view! {
        <h2 class="text-xl font-semibold">"Mis cursos como instructor"</h2>
        {move || {
            let state = courses.get();
            render_collection(
                &state,
                || view! { <SkeletonList rows=3 /> }.into_any(),
                || {
                    view! {
                        <EmptyState
                            title="No hay cursos"
                            message="Los cursos que publiques aparecerán aquí."
                        />
                    }
                        .into_any()
                },
                |all| {
                    let mine: Vec<Course> = auth
                        .state
                        .with(|s| managed_courses(all, s.user.as_ref()))
                        .into_iter()
                        .cloned()
                        .collect();
                    if mine.is_empty() {
                        return view! {
                            <EmptyState
                                title="Aún no enseñas ningún curso"
                                message="Cuando tengas cursos asignados podrás ver sus estudiantes y recursos."
                            />
                        }
                            .into_any();
                    }
                    view! {
                        <div class="overflow-x-auto bg-base-100 rounded-box shadow">
                            <table class="table">
                                <thead>
                                    <tr>
                                        <th>"Curso"</th>
                                        <th>"Precio"</th>
                                        <th>"Estado"</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {mine
                                        .into_iter()
                                        .map(|c| {
                                            let roster = AppRoute::StudioRoster {
                                                course_id: c.id.clone(),
                                            };
                                            let resources = AppRoute::StudioResources {
                                                course_id: c.id.clone(),
                                            };
                                            view! {
                                                <tr>
                                                    <td class="font-medium">{c.title}</td>
                                                    <td>{format::price(c.price)}</td>
                                                    <td>
                                                        {if c.is_published {
                                                            view! { <span class="badge badge-success">"Publicado"</span> }.into_any()
                                                        } else {
                                                            view! { <span class="badge badge-ghost">"Borrador"</span> }.into_any()
                                                        }}
                                                    </td>
                                                    <td class="flex gap-2 justify-end">
                                                        <Link to=roster class="btn btn-ghost btn-xs">
                                                            "Estudiantes"
                                                        </Link>
                                                        <Link to=resources class="btn btn-ghost btn-xs">
                                                            "Recursos"
                                                        </Link>
                                                    </td>
                                                </tr>
                                            }
                                        })
                                        .collect_view()}
                                </tbody>
                            </table>
                        </div>
                    }
                        .into_any()
                },
            )
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(id: &str, role: Role) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            email: format!("{id}@aula.test"),
            name: id.to_string(),
            avatar_url: None,
            bio: None,
            role,
        }
    }

    #[test]
    fn instructors_manage_their_own_courses() {
        let courses: Vec<Course> = serde_json::from_value(json!([
            { "id": "1", "title": "A", "slug": "a", "price": 0, "instructor": { "id": "u1", "name": "Ana" } },
            { "id": "2", "title": "B", "slug": "b", "price": 0, "instructor": { "id": "u2", "name": "Beto" } },
            { "id": "3", "title": "C", "slug": "c", "price": 0 }
        ]))
        .unwrap();

        let ids = |list: Vec<&Course>| list.into_iter().map(|c| c.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(managed_courses(&courses, Some(&user("u1", Role::Instructor)))), ["1"]);
        assert_eq!(ids(managed_courses(&courses, Some(&user("x", Role::Admin)))), ["1", "2", "3"]);
        assert!(managed_courses(&courses, None).is_empty());
    }

    #[test]
    fn bars_scale_to_the_busiest_month() {
        let points = vec![
            MonthlyPoint { month: "Ene".into(), value: 5.0 },
            MonthlyPoint { month: "Feb".into(), value: 20.0 },
            MonthlyPoint { month: "Mar".into(), value: 0.0 },
        ];
        assert_eq!(bar_heights(&points), vec![25.0, 100.0, 0.0]);
        let flat = vec![MonthlyPoint { month: "Ene".into(), value: 0.0 }];
        assert_eq!(bar_heights(&flat), vec![0.0]);
    }
}
