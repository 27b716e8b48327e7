use aula_shared::protocol::CourseRoster;
use leptos::prelude::*;

use super::StudioNav;
use crate::components::collection::{EmptyState, SkeletonList, render_collection};
use crate::components::format;
use crate::components::layout::PageHeader;
use crate::query::{keys, use_api_query};

#[component]
pub fn RosterPage(course_id: String) -> impl IntoView {
    let roster = use_api_query(keys::roster(&course_id), move || CourseRoster {
        course_id: course_id.clone(),
    });

    view! {
        <PageHeader title="Estudiantes del curso" />
        <StudioNav />
        {move || {
            let state = roster.get();
            render_collection(
                &state,
                || view! { <SkeletonList /> }.into_any(),
                || {
                    view! {
                        <EmptyState
                            title="Sin estudiantes"
                            message="Nadie se ha inscrito en este curso todavía."
                        />
                    }
                        .into_any()
                },
                |entries| {
                    view! {
                        <div class="overflow-x-auto bg-base-100 rounded-box shadow">
                            <table class="table">
                                <thead>
                                    <tr>
                                        <th>"Estudiante"</th>
                                        <th>"Correo"</th>
                                        <th>"Inscrito"</th>
                                        <th>"Progreso"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {entries
                                        .iter()
                                        .map(|e| {
                                            view! {
                                                <tr>
                                                    <td>{e.student.name.clone()}</td>
                                                    <td>{e.student.email.clone().unwrap_or_default()}</td>
                                                    <td>{format::date(e.created_at)}</td>
                                                    <td>{format::percent(e.progress)}</td>
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
