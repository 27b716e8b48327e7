use aula_shared::models::{Notification, NotificationFilter};
use aula_shared::protocol::{ListNotifications, MarkAllNotificationsRead, MarkNotificationRead};
use leptos::prelude::*;

use crate::components::collection::{
    EmptyState, SkeletonList, collection_items, keyed_rows, render_shape, use_collection_shape,
};
use crate::components::feedback::ActionButton;
use crate::components::format;
use crate::components::layout::PageHeader;
use crate::context::use_app;
use crate::query::{keys, use_api_query};

fn tab_label(filter: NotificationFilter) -> &'static str {
    match filter {
        NotificationFilter::All => "Todas",
        NotificationFilter::Unread => "No leídas",
    }
}

#[component]
pub fn NotificationsPage() -> impl IntoView {
    let app = use_app();
    let (filter, set_filter) = signal(NotificationFilter::All);
    let marking_all = RwSignal::new(false);

    let mark_all = Callback::new(move |_: ()| {
        app.mutate(
            marking_all,
            MarkAllNotificationsRead,
            vec![keys::notifications()],
            app.report("Todas las notificaciones están leídas"),
        );
    });

    view! {
        <div class="flex items-end justify-between gap-4">
            <PageHeader title="Notificaciones" />
            <ActionButton pending=marking_all label="Marcar todas como leídas" on_click=mark_all />
        </div>

        <div role="tablist" class="tabs tabs-boxed w-fit">
            {[NotificationFilter::All, NotificationFilter::Unread]
                .into_iter()
                .map(|f| {
                    view! {
                        <a
                            role="tab"
                            class="tab"
                            class:tab-active=move || filter.get() == f
                            on:click=move |_| set_filter.set(f)
                        >
                            {tab_label(f)}
                        </a>
                    }
                })
                .collect_view()}
        </div>

        // Each tab is its own query entry, so switching re-subscribes.
        {move || {
            let filter = filter.get();
            view! { <NotificationList filter=filter /> }
        }}
    }
}

#[component]
fn NotificationList(filter: NotificationFilter) -> impl IntoView {
    let notifications = use_api_query(keys::notifications_filtered(filter), move || {
        ListNotifications { filter }
    });

    let shape = use_collection_shape(notifications);

    move || {
        render_shape(
            shape.get(),
            || view! { <SkeletonList /> }.into_any(),
            move || {
                let message = match filter {
                    NotificationFilter::All => "Aquí verás avisos sobre tus cursos y tu cuenta.",
                    NotificationFilter::Unread => "Estás al día.",
                };
                view! { <EmptyState title="No hay notificaciones" message=message /> }.into_any()
            },
            move || {
                view! {
                    <ul class="space-y-2">
                        <For
                            each=move || keyed_rows(notifications.with(collection_items), notification_key)
                            key=|(key, _)| key.clone()
                            children=|(_, n)| view! { <NotificationRow notification=n /> }
                        />
                    </ul>
                }
                    .into_any()
            },
        )
    }
}

/// Rows are rebuilt only when what they show changes.
fn notification_key(n: &Notification) -> (String, bool) {
    (n.id.clone(), n.is_read)
}

#[component]
fn NotificationRow(notification: Notification) -> impl IntoView {
    let app = use_app();
    let pending = RwSignal::new(false);
    let id = notification.id.clone();
    let unread = !notification.is_read;

    let mark_read = Callback::new(move |_: ()| {
        app.mutate(
            pending,
            MarkNotificationRead { id: id.clone() },
            vec![keys::notifications()],
            move |result| {
                if let Err(e) = result {
                    app.notify_error(&e);
                }
            },
        );
    });

    view! {
        <li
            class="card bg-base-100 shadow-sm"
            class:border-l-4=unread
            class:border-primary=unread
        >
            <div class="card-body py-4 flex-row items-start justify-between gap-4">
                <div>
                    <p class="font-semibold">{notification.title.clone()}</p>
                    <p class="text-base-content/80">{notification.message.clone()}</p>
                    <p class="text-xs opacity-60 mt-1">{format::date(notification.created_at)}</p>
                </div>
                {unread
                    .then(|| {
                        view! {
                            <ActionButton
                                pending=pending
                                label="Marcar como leída"
                                on_click=mark_read
                                class="btn btn-ghost btn-xs"
                            />
                        }
                    })}
            </div>
        </li>
    }
}
