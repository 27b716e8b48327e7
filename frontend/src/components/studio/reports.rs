use aula_shared::models::ReportKind;
use aula_shared::protocol::StudioReportRequest;
use leptos::prelude::*;

use super::StudioNav;
use crate::components::collection::{EmptyState, SkeletonList, render_record};
use crate::components::layout::PageHeader;
use crate::query::{keys, use_api_query};

fn label(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Sales => "Ventas",
        ReportKind::Students => "Estudiantes",
        ReportKind::Courses => "Cursos",
    }
}

#[component]
pub fn ReportsPage() -> impl IntoView {
    let (kind, set_kind) = signal(ReportKind::default());

    view! {
        <PageHeader title="Reportes" />
        <StudioNav />
        <div role="tablist" class="tabs tabs-boxed w-fit">
            {ReportKind::ALL
                .into_iter()
                .map(|k| {
                    view! {
                        <a
                            role="tab"
                            class="tab"
                            class:tab-active=move || kind.get() == k
                            on:click=move |_| set_kind.set(k)
                        >
                            {label(k)}
                        </a>
                    }
                })
                .collect_view()}
        </div>
        {move || {
            let kind = kind.get();
            view! { <Report kind=kind /> }
        }}
    }
}

#[component]
fn Report(kind: ReportKind) -> impl IntoView {
    let report = use_api_query(keys::report(kind), move || StudioReportRequest { kind });

    move || {
        let state = report.get();
        render_record(
            &state,
            || view! { <SkeletonList /> }.into_any(),
            |r| {
                if r.rows.is_empty() {
                    return view! {
                        <EmptyState title="Sin datos" message="Este reporte todavía no tiene datos." />
                    }
                        .into_any();
                }
                view! {
                    <div class="overflow-x-auto bg-base-100 rounded-box shadow">
                        <table class="table">
                            <tbody>
                                {r
                                    .rows
                                    .iter()
                                    .map(|row| {
                                        view! {
                                            <tr>
                                                <td class="font-medium">{row.label.clone()}</td>
                                                <td class="text-right">{row.value}</td>
                                                <td class="opacity-70">{row.detail.clone()}</td>
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
    }
}
