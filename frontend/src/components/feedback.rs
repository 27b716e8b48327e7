use std::time::Duration;

use leptos::prelude::*;

use crate::context::use_app;

/// Label shown on a submit button while its mutation is pending.
pub const PENDING_LABEL: &str = "Procesando…";

/// Global toast; hides itself after three seconds.
#[component]
pub fn ToastHost() -> impl IntoView {
    let app = use_app();
    let toast = app.toast();

    Effect::new(move |_| {
        if toast.get().is_some() {
            set_timeout(move || app.dismiss_toast(), Duration::from_secs(3));
        }
    });

    move || {
        toast.get().map(|t| {
            let class = if t.is_error {
                "alert alert-error shadow-lg"
            } else {
                "alert alert-success shadow-lg"
            };
            view! {
                <div class="toast toast-top toast-end z-50">
                    <div class=class>
                        <span>{t.message}</span>
                    </div>
                </div>
            }
        })
    }
}

pub fn button_label(pending: bool, label: &'static str) -> &'static str {
    if pending { PENDING_LABEL } else { label }
}

/// Spinner plus `PENDING_LABEL` while `pending` is raised, `label` otherwise.
fn pending_label(pending: RwSignal<bool>, label: &'static str) -> impl IntoView {
    move || {
        let busy = pending.get();
        let text = button_label(busy, label);
        if busy {
            view! {
                <span class="loading loading-spinner loading-sm"></span>
                {text}
            }
                .into_any()
        } else {
            text.into_any()
        }
    }
}

/// Submit button that disables itself and shows `PENDING_LABEL` while
/// `pending` is raised.
#[component]
pub fn SubmitButton(
    pending: RwSignal<bool>,
    label: &'static str,
    #[prop(default = "btn btn-primary")] class: &'static str,
) -> impl IntoView {
    view! {
        <button type="submit" class=class disabled=move || pending.get()>
            {pending_label(pending, label)}
        </button>
    }
}

/// `SubmitButton` for actions outside a form.
#[component]
pub fn ActionButton(
    pending: RwSignal<bool>,
    label: &'static str,
    on_click: Callback<()>,
    #[prop(default = "btn btn-outline btn-sm")] class: &'static str,
) -> impl IntoView {
    view! {
        <button
            type="button"
            class=class
            disabled=move || pending.get()
            on:click=move |_| on_click.run(())
        >
            {pending_label(pending, label)}
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_actions_read_procesando() {
        assert_eq!(button_label(true, "Marcar todas como leídas"), "Procesando…");
        assert_eq!(
            button_label(false, "Marcar todas como leídas"),
            "Marcar todas como leídas"
        );
    }
}
