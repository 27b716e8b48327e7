use aula_shared::models::Enrollment;
use aula_shared::protocol::MyEnrollments;
use leptos::prelude::*;

use crate::components::collection::{EmptyState, SkeletonGrid, render_collection};
use crate::components::format;
use crate::components::layout::PageHeader;
use crate::query::{keys, use_api_query};
use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
pub fn MyCoursesPage() -> impl IntoView {
    let enrollments = use_api_query(keys::my_courses(), || MyEnrollments);

    view! {
        <PageHeader title="Mis cursos" />
        {move || {
            let state = enrollments.get();
            render_collection(
                &state,
                || view! { <SkeletonGrid count=3 /> }.into_any(),
                || {
                    view! {
                        <EmptyState
                            title="Todavía no estás inscrito en ningún curso"
                            message="Cuando te inscribas, tus cursos y tu progreso aparecerán aquí."
                            action=("Explorar cursos", AppRoute::Catalog)
                        />
                    }
                        .into_any()
                },
                |items| {
                    view! {
                        <div class="grid gap-6 sm:grid-cols-2 lg:grid-cols-3">
                            {items
                                .iter()
                                .cloned()
                                .map(|enrollment| view! { <EnrollmentCard enrollment=enrollment /> })
                                .collect_view()}
                        </div>
                    }
                        .into_any()
                },
            )
        }}
    }
}

#[component]
fn EnrollmentCard(enrollment: Enrollment) -> impl IntoView {
    let completed = enrollment.is_completed();
    let title = enrollment
        .course
        .as_ref()
        .map(|c| c.title.clone())
        .unwrap_or_else(|| "Curso".to_string());
    let forum = AppRoute::Discussions {
        course_id: enrollment.course_id.clone(),
    };
    let detail = AppRoute::CourseDetail {
        id: enrollment.course_id.clone(),
    };

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body gap-3">
                <h2 class="card-title">{title}</h2>
                <p class="text-sm text-base-content/70">
                    "Inscrito el " {format::date(enrollment.created_at)}
                </p>
                <div class="flex items-center gap-3">
                    <progress
                        class="progress progress-primary flex-1"
                        value=enrollment.progress.clamp(0.0, 100.0)
                        max="100"
                    ></progress>
                    <span class="text-sm">{format::percent(enrollment.progress)}</span>
                </div>
                {completed.then(|| view! { <span class="badge badge-success">"Completado"</span> })}
                <div class="card-actions justify-end">
                    <Link to=forum class="btn btn-ghost btn-sm">
                        "Foro"
                    </Link>
                    <Link to=detail class="btn btn-primary btn-sm">
                        "Continuar"
                    </Link>
                </div>
            </div>
        </div>
    }
}
