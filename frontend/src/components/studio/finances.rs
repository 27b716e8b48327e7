use aula_shared::protocol::StudioFinancesRequest;
use leptos::prelude::*;

use super::StudioNav;
use crate::components::collection::{SkeletonGrid, render_record};
use crate::components::format;
use crate::components::layout::PageHeader;
use crate::query::{keys, use_api_query};

#[component]
pub fn FinancesPage() -> impl IntoView {
    let finances = use_api_query(keys::finances(), || StudioFinancesRequest);

    view! {
        <PageHeader title="Finanzas" />
        <StudioNav />
        {move || {
            let state = finances.get();
            render_record(
                &state,
                || view! { <SkeletonGrid count=3 /> }.into_any(),
                |f| {
                    view! {
                        <div class="stats stats-vertical md:stats-horizontal shadow w-full">
                            <div class="stat">
                                <div class="stat-title">"Ingresos brutos"</div>
                                <div class="stat-value text-2xl">{format::money(f.gross_revenue)}</div>
                            </div>
                            <div class="stat">
                                <div class="stat-title">"Ingresos netos"</div>
                                <div class="stat-value text-2xl">{format::money(f.net_revenue)}</div>
                            </div>
                            <div class="stat">
                                <div class="stat-title">"Pago pendiente"</div>
                                <div class="stat-value text-2xl">{format::money(f.pending_payout)}</div>
                            </div>
                        </div>
                        <h2 class="text-xl font-semibold">"Transacciones"</h2>
                        {if f.transactions.is_empty() {
                            view! { <p class="text-base-content/60">"Todavía no hay ventas."</p> }.into_any()
                        } else {
                            view! {
                                <div class="overflow-x-auto bg-base-100 rounded-box shadow">
                                    <table class="table">
                                        <thead>
                                            <tr>
                                                <th>"Fecha"</th>
                                                <th>"Curso"</th>
                                                <th class="text-right">"Importe"</th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {f
                                                .transactions
                                                .iter()
                                                .map(|t| {
                                                    view! {
                                                        <tr>
                                                            <td>{format::date(t.created_at)}</td>
                                                            <td>{t.course_title.clone()}</td>
                                                            <td class="text-right">{format::money(t.amount)}</td>
                                                        </tr>
                                                    }
                                                })
                                                .collect_view()}
                                        </tbody>
                                    </table>
                                </div>
                            }
                                .into_any()
                        }}
                    }
                        .into_any()
                },
            )
        }}
    }
}
