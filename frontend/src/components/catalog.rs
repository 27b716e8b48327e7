use std::collections::BTreeSet;

use aula_shared::models::Course;
use aula_shared::protocol::ListCourses;
use leptos::prelude::*;

use crate::components::collection::{EmptyState, SkeletonGrid, render_collection};
use crate::components::format;
use crate::components::layout::PageHeader;
use crate::query::{keys, use_api_query};
use crate::web::route::AppRoute;
use crate::web::router::Link;

/// Courses whose title, description or instructor contain `search`
/// (case-insensitive) and whose category equals `category` when one is set.
/// Order is preserved.
pub fn filter_courses<'a>(courses: &'a [Course], search: &str, category: Option<&str>) -> Vec<&'a Course> {
    let needle = search.trim().to_lowercase();
    courses
        .iter()
        .filter(|c| category.is_none_or(|cat| c.category.as_deref() == Some(cat)))
        .filter(|c| {
            needle.is_empty()
                || c.title.to_lowercase().contains(&needle)
                || c.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
                || c.instructor
                    .as_ref()
                    .is_some_and(|i| i.name.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Distinct categories, sorted.
pub fn categories(courses: &[Course]) -> Vec<String> {
    courses
        .iter()
        .filter_map(|c| c.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[component]
pub fn CatalogPage() -> impl IntoView {
    let courses = use_api_query(keys::courses(), || ListCourses);
    let (search, set_search) = signal(String::new());
    let (category, set_category) = signal(Option::<String>::None);

    let category_options = move || {
        courses
            .with(|s| s.data.as_deref().map(|c| categories(c)))
            .unwrap_or_default()
    };

    view! {
        <PageHeader title="Catálogo de cursos" subtitle="Aprende a tu ritmo con nuestros instructores." />

        <div class="flex flex-col md:flex-row gap-3">
            <input
                type="search"
                class="input input-bordered w-full md:max-w-sm"
                placeholder="Buscar cursos…"
                prop:value=search
                on:input=move |ev| set_search.set(event_target_value(&ev))
            />
            <select
                class="select select-bordered"
                on:change=move |ev| {
                    let value = event_target_value(&ev);
                    set_category.set((!value.is_empty()).then_some(value));
                }
            >
                <option value="" selected=move || category.with(Option::is_none)>
                    "Todas las categorías"
                </option>
                {move || {
                    category_options()
                        .into_iter()
                        .map(|cat| {
                            let selected = category.get().as_deref() == Some(cat.as_str());
                            view! {
                                <option value=cat.clone() selected=selected>
                                    {cat.clone()}
                                </option>
                            }
                        })
                        .collect_view()
                }}
            </select>
        </div>

        {move || {
            let state = courses.get();
            render_collection(
                &state,
                || view! { <SkeletonGrid /> }.into_any(),
                || {
                    view! {
                        <EmptyState
                            title="Aún no hay cursos"
                            message="Este espacio todavía no publicó cursos. Vuelve pronto."
                        />
                    }
                        .into_any()
                },
                |all| {
                    let matching = search
                        .with(|q| category.with(|cat| filter_courses(all, q, cat.as_deref())))
                        .into_iter()
                        .cloned()
                        .collect::<Vec<_>>();
                    if matching.is_empty() {
                        return view! {
                            <EmptyState
                                title="Sin resultados"
                                message="Ningún curso coincide con tu búsqueda."
                            />
                        }
                            .into_any();
                    }
                    view! {
                        <div class="grid gap-6 sm:grid-cols-2 lg:grid-cols-3">
                            {matching
                                .into_iter()
                                .map(|course| view! { <CourseCard course=course /> })
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
pub fn CourseCard(course: Course) -> impl IntoView {
    let instructor = course.instructor.as_ref().map(|i| i.name.clone());
    let detail = AppRoute::CourseDetail {
        id: course.id.clone(),
    };
    view! {
        <div class="card bg-base-100 shadow hover:shadow-lg transition-shadow">
            {course
                .thumbnail
                .clone()
                .map(|src| {
                    view! {
                        <figure>
                            <img src=src alt=course.title.clone() class="h-40 w-full object-cover" />
                        </figure>
                    }
                })}
            <div class="card-body">
                <h2 class="card-title">{course.title.clone()}</h2>
                {instructor.map(|name| view! { <p class="text-sm text-base-content/70">{name}</p> })}
                {course
                    .category
                    .clone()
                    .map(|c| view! { <span class="badge badge-outline">{c}</span> })}
                <div class="card-actions items-center justify-between mt-2">
                    <span class="text-lg font-semibold">{format::price(course.price)}</span>
                    <Link to=detail class="btn btn-primary btn-sm">
                        "Ver curso"
                    </Link>
                </div>
            </div>
        </div>
    }
}
