use aula_shared::models::{CourseDetail, CourseModule, Lesson};
use aula_shared::protocol::{EnrollInCourse, GetCourse, MyEnrollments};
use leptos::prelude::*;

use crate::auth::use_auth;
use crate::components::collection::{SkeletonList, render_record};
use crate::components::feedback::PENDING_LABEL;
use crate::components::format;
use crate::context::use_app;
use crate::query::{keys, use_api_query};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
pub fn CourseDetailPage(id: String) -> impl IntoView {
    let app = use_app();
    let auth = use_auth();
    let router = use_router();

    let course = {
        let id = id.clone();
        use_api_query(keys::course(&id), move || GetCourse { id: id.clone() })
    };

    // Only signed-in users have enrollments to check against.
    let enrollments = auth
        .state
        .get_untracked()
        .is_authenticated
        .then(|| use_api_query(keys::my_courses(), || MyEnrollments));
    let is_enrolled = {
        let id = id.clone();
        move || {
            enrollments.is_some_and(|e| {
                e.with(|s| {
                    s.data
                        .as_ref()
                        .is_some_and(|list| list.iter().any(|en| en.course_id == id))
                })
            })
        }
    };

    let in_cart = app.in_cart(&id);
    let enrolling = RwSignal::new(false);

    let enroll = {
        let id = id.clone();
        move |_| {
            if !auth.state.get_untracked().is_authenticated {
                router.navigate_to(AppRoute::auth_failure_redirect());
                return;
            }
            app.mutate(
                enrolling,
                EnrollInCourse {
                    course_id: id.clone(),
                },
                vec![keys::my_courses(), keys::studio()],
                app.report("¡Inscripción completada!"),
            );
        }
    };

    view! {
        {move || {
            let state = course.get();
            let enroll = enroll.clone();
            let is_enrolled = is_enrolled.clone();
            render_record(
                &state,
                || view! { <SkeletonList rows=5 /> }.into_any(),
                move |detail: &CourseDetail| {
                    let c = &detail.course;
                    let item = c.to_cart_item();
                    let is_free = c.price <= 0.0;
                    let discussions = AppRoute::Discussions {
                        course_id: c.id.clone(),
                    };
                    view! {
                        <div class="grid gap-8 lg:grid-cols-3">
                            <div class="lg:col-span-2 space-y-6">
                                <div>
                                    <h1 class="text-3xl font-bold">{c.title.clone()}</h1>
                                    {c.instructor
                                        .as_ref()
                                        .map(|i| {
                                            view! {
                                                <p class="text-base-content/70 mt-1">
                                                    "Por " {i.name.clone()}
                                                </p>
                                            }
                                        })}
                                </div>
                                {c.description
                                    .clone()
                                    .map(|d| view! { <p class="leading-relaxed">{d}</p> })}
                                <Syllabus
                                    modules=detail.modules.clone()
                                    loose=detail.lessons.clone()
                                />
                            </div>

                            <div class="card bg-base-100 shadow h-fit">
                                <div class="card-body gap-4">
                                    <span class="text-3xl font-bold">{format::price(c.price)}</span>
                                    <p class="text-sm text-base-content/70">
                                        {detail.lesson_count()} " lecciones · "
                                        {detail.total_minutes()} " min"
                                    </p>
                                    <Show
                                        when=is_enrolled.clone()
                                        fallback=move || {
                                            let item = item.clone();
                                            let enroll = enroll.clone();
                                            if is_free {
                                                view! {
                                                    <button
                                                        class="btn btn-primary"
                                                        disabled=move || enrolling.get()
                                                        on:click=enroll
                                                    >
                                                        {move || {
                                                            if enrolling.get() {
                                                                PENDING_LABEL
                                                            } else {
                                                                "Inscribirme gratis"
                                                            }
                                                        }}
                                                    </button>
                                                }
                                                    .into_any()
                                            } else {
                                                view! {
                                                    <button
                                                        class="btn btn-primary"
                                                        disabled=move || in_cart.get()
                                                        on:click=move |_| {
                                                            if app.add_to_cart(item.clone()) {
                                                                app.notify("Curso agregado al carrito");
                                                            }
                                                        }
                                                    >
                                                        {move || {
                                                            if in_cart.get() {
                                                                "En el carrito"
                                                            } else {
                                                                "Agregar al carrito"
                                                            }
                                                        }}
                                                    </button>
                                                }
                                                    .into_any()
                                            }
                                        }
                                    >
                                        <div class="badge badge-success p-3">"Ya estás inscrito"</div>
                                    </Show>
                                    <Link to=discussions class="btn btn-outline">
                                        "Foro del curso"
                                    </Link>
                                </div>
                            </div>
                        </div>
                    }
                        .into_any()
                },
            )
        }}
    }
}

#[component]
fn Syllabus(modules: Vec<CourseModule>, loose: Vec<Lesson>) -> impl IntoView {
    if modules.is_empty() && loose.is_empty() {
        return view! {
            <p class="text-base-content/60">"El temario se publicará pronto."</p>
        }
            .into_any();
    }

    view! {
        <div class="space-y-3">
            <h2 class="text-xl font-semibold">"Temario"</h2>
            {modules
                .into_iter()
                .map(|m| {
                    view! {
                        <div class="collapse collapse-arrow bg-base-100 border border-base-300">
                            <input type="checkbox" />
                            <div class="collapse-title font-medium">
                                {m.title} " (" {m.lessons.len()} ")"
                            </div>
                            <div class="collapse-content">
                                <LessonList lessons=m.lessons />
                            </div>
                        </div>
                    }
                })
                .collect_view()}
            {(!loose.is_empty()).then(|| view! { <LessonList lessons=loose /> })}
        </div>
    }
        .into_any()
}

#[component]
fn LessonList(lessons: Vec<Lesson>) -> impl IntoView {
    view! {
        <ul class="menu bg-base-100 rounded-box">
            {lessons
                .into_iter()
                .map(|l| {
                    view! {
                        <li>
                            <span class="flex justify-between">
                                {l.title}
                                {l.duration_minutes.map(|m| view! { <span class="opacity-60">{m} " min"</span> })}
                            </span>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
}
