use aula_shared::models::UserProfile;
use aula_shared::protocol::{GetProfile, UpdateProfile};
use leptos::prelude::*;

use crate::auth::{set_user, use_auth};
use crate::components::collection::{SkeletonList, render_record};
use crate::components::feedback::SubmitButton;
use crate::components::layout::PageHeader;
use crate::context::use_app;
use crate::query::{keys, use_api_query};

/// Only the fields that differ from `current` end up in the update.
pub fn profile_changes(current: &UserProfile, name: &str, bio: &str, avatar_url: &str) -> UpdateProfile {
    fn changed(new: &str, old: Option<&str>) -> Option<String> {
        let new = new.trim();
        (new != old.unwrap_or_default()).then(|| new.to_string())
    }

    let name = name.trim();
    UpdateProfile {
        name: (!name.is_empty() && name != current.name).then(|| name.to_string()),
        bio: changed(bio, current.bio.as_deref()),
        avatar_url: changed(avatar_url, current.avatar_url.as_deref()),
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let profile = use_api_query(keys::profile(), || GetProfile);

    view! {
        <PageHeader title="Mi perfil" />
        {move || {
            let state = profile.get();
            render_record(
                &state,
                || view! { <SkeletonList rows=3 /> }.into_any(),
                |user| view! { <ProfileForm user=user.clone() /> }.into_any(),
            )
        }}
    }
}

#[component]
fn ProfileForm(user: UserProfile) -> impl IntoView {
    let app = use_app();
    let auth = use_auth();
    let pending = RwSignal::new(false);

    let (name, set_name) = signal(user.name.clone());
    let (bio, set_bio) = signal(user.bio.clone().unwrap_or_default());
    let (avatar, set_avatar) = signal(user.avatar_url.clone().unwrap_or_default());
    let email = user.email.clone();
    let role = format!("{:?}", user.role);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let changes = profile_changes(&user, &name.get(), &bio.get(), &avatar.get());
        app.mutate(
            pending,
            changes,
            vec![keys::profile()],
            move |result| match result {
                Ok(updated) => {
                    set_user(&auth, updated);
                    app.notify("Perfil actualizado");
                }
                Err(e) => app.notify_error(&e),
            },
        );
    };

    view! {
        <form class="card bg-base-100 shadow max-w-xl" on:submit=on_submit>
            <div class="card-body gap-4">
                <div class="flex items-center gap-3">
                    <span class="text-base-content/70">{email}</span>
                    <span class="badge badge-outline">{role}</span>
                </div>
                <label class="form-control">
                    <span class="label-text mb-1">"Nombre"</span>
                    <input
                        class="input input-bordered"
                        prop:value=name
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                        required
                    />
                </label>
                <label class="form-control">
                    <span class="label-text mb-1">"Biografía"</span>
                    <textarea
                        class="textarea textarea-bordered"
                        prop:value=bio
                        on:input=move |ev| set_bio.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <label class="form-control">
                    <span class="label-text mb-1">"URL del avatar"</span>
                    <input
                        type="url"
                        class="input input-bordered"
                        prop:value=avatar
                        on:input=move |ev| set_avatar.set(event_target_value(&ev))
                    />
                </label>
                <div class="card-actions justify-end">
                    <SubmitButton pending=pending label="Guardar cambios" />
                </div>
            </div>
        </form>
    }
}
