use aula_shared::models::{Resource, ResourceKind};
use aula_shared::protocol::{CreateResource, DeleteResource, ListResources, UpdateResource};
use leptos::prelude::*;

use super::StudioNav;
use crate::components::collection::{
    EmptyState, SkeletonList, collection_items, keyed_rows, render_shape, use_collection_shape,
};
use crate::components::feedback::SubmitButton;
use crate::components::layout::PageHeader;
use crate::context::use_app;
use crate::query::{keys, use_api_query};

/// Resources are stored as links; only http(s) URLs are accepted.
pub fn is_valid_link(url: &str) -> bool {
    let url = url.trim();
    ["https://", "http://"]
        .iter()
        .any(|scheme| url.len() > scheme.len() && url.starts_with(scheme))
}

/// A row is rebuilt, closing any inline edit, only when what it shows changes.
fn resource_key(resource: &Resource) -> (String, String, String) {
    (resource.id.clone(), resource.title.clone(), resource.url.clone())
}

fn kind_label(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Link => "Enlace",
        ResourceKind::File => "Archivo",
        ResourceKind::Video => "Video",
    }
}

#[component]
pub fn ResourcesPage(course_id: String) -> impl IntoView {
    let resources = {
        let course_id = course_id.clone();
        use_api_query(keys::resources(&course_id), move || ListResources {
            course_id: course_id.clone(),
        })
    };
    let shape = use_collection_shape(resources);
    let form_course = course_id.clone();
    let course_id = StoredValue::new(course_id);

    view! {
        <PageHeader title="Recursos del curso" />
        <StudioNav />
        <NewResourceForm course_id=form_course />
        {move || {
            render_shape(
                shape.get(),
                || view! { <SkeletonList /> }.into_any(),
                || {
                    view! {
                        <EmptyState
                            title="Sin recursos"
                            message="Agrega enlaces a diapositivas, lecturas o videos para tus estudiantes."
                        />
                    }
                        .into_any()
                },
                move || {
                    view! {
                        <ul class="space-y-2">
                            <For
                                each=move || keyed_rows(resources.with(collection_items), resource_key)
                                key=|(key, _)| key.clone()
                                children=move |(_, r)| {
                                    view! { <ResourceRow resource=r course_id=course_id.get_value() /> }
                                }
                            />
                        </ul>
                    }
                        .into_any()
                },
            )
        }}
    }
}

#[component]
fn NewResourceForm(course_id: String) -> impl IntoView {
    let app = use_app();
    let pending = RwSignal::new(false);
    let (title, set_title) = signal(String::new());
    let (url, set_url) = signal(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (t, u) = (title.get().trim().to_string(), url.get().trim().to_string());
        if t.is_empty() || !is_valid_link(&u) {
            app.alert("Indica un título y una URL http(s) válida");
            return;
        }
        app.mutate(
            pending,
            CreateResource {
                course_id: course_id.clone(),
                title: t,
                kind: ResourceKind::Link,
                url: u,
                lesson_id: None,
            },
            vec![keys::resources(&course_id)],
            move |result| match result {
                Ok(_) => {
                    set_title.set(String::new());
                    set_url.set(String::new());
                    app.notify("Recurso agregado");
                }
                Err(e) => app.notify_error(&e),
            },
        );
    };

    view! {
        <form class="card bg-base-100 shadow" on:submit=on_submit>
            <div class="card-body gap-3 md:flex-row md:items-center">
                <input
                    class="input input-bordered flex-1"
                    placeholder="Título"
                    prop:value=title
                    on:input=move |ev| set_title.set(event_target_value(&ev))
                />
                <input
                    type="url"
                    class="input input-bordered flex-1"
                    placeholder="https://…"
                    prop:value=url
                    on:input=move |ev| set_url.set(event_target_value(&ev))
                />
                <SubmitButton pending=pending label="Agregar" />
            </div>
        </form>
    }
}

#[component]
fn ResourceRow(resource: Resource, course_id: String) -> impl IntoView {
    let app = use_app();
    let busy = RwSignal::new(false);
    let (editing, set_editing) = signal(false);
    let (draft, set_draft) = signal(resource.title.clone());

    let id = resource.id.clone();
    let original = resource.title.clone();
    let rename = {
        let id = id.clone();
        let course_id = course_id.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let title = draft.get().trim().to_string();
            if title.is_empty() || title == original {
                set_editing.set(false);
                return;
            }
            app.mutate(
                busy,
                UpdateResource {
                    id: id.clone(),
                    title: Some(title),
                    ..Default::default()
                },
                vec![keys::resources(&course_id)],
                move |result| match result {
                    Ok(_) => {
                        let _ = set_editing.try_set(false);
                        app.notify("Recurso actualizado");
                    }
                    Err(e) => app.notify_error(&e),
                },
            );
        }
    };
    let delete = move |_| {
        app.mutate(
            busy,
            DeleteResource { id: id.clone() },
            vec![keys::resources(&course_id)],
            app.report("Recurso eliminado"),
        );
    };

    let title = resource.title.clone();
    let href = resource.url.clone();

    view! {
        <li class="card bg-base-100 shadow-sm">
            <div class="card-body py-3 flex-row items-center justify-between gap-4">
                <Show
                    when=move || editing.get()
                    fallback=move || {
                        view! {
                            <div class="flex items-center gap-3">
                                <span class="badge badge-outline">{kind_label(resource.kind)}</span>
                                <a class="link link-hover font-medium" href=href.clone() target="_blank" rel="noopener">
                                    {title.clone()}
                                </a>
                            </div>
                        }
                    }
                >
                    <form class="flex gap-2 flex-1" on:submit=rename.clone()>
                        <input
                            class="input input-bordered input-sm flex-1"
                            prop:value=draft
                            on:input=move |ev| set_draft.set(event_target_value(&ev))
                        />
                        <SubmitButton pending=busy label="Guardar" class="btn btn-primary btn-sm" />
                    </form>
                </Show>
                <div class="join">
                    <button
                        class="btn btn-sm join-item"
                        disabled=move || busy.get()
                        on:click=move |_| set_editing.update(|e| *e = !*e)
                    >
                        {move || if editing.get() { "Cancelar" } else { "Renombrar" }}
                    </button>
                    <button class="btn btn-sm btn-error join-item" disabled=move || busy.get() on:click=delete>
                        "Eliminar"
                    </button>
                </div>
            </div>
        </li>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renaming_changes_the_row_identity() {
        let resource: Resource = serde_json::from_value(serde_json::json!({
            "id": "r1", "courseId": "c1", "title": "Slides", "kind": "LINK", "url": "https://a.test/s.pdf"
        }))
        .unwrap();
        let mut renamed = resource.clone();
        assert_eq!(resource_key(&resource), resource_key(&renamed));
        renamed.title = "Diapositivas".to_string();
        assert_ne!(resource_key(&resource), resource_key(&renamed));
    }

    #[test]
    fn only_http_links_are_accepted() {
        assert!(is_valid_link("https://example.com/slides.pdf"));
        assert!(is_valid_link(" http://aula.test "));
        assert!(!is_valid_link("https://"));
        assert!(!is_valid_link("ftp://example.com"));
        assert!(!is_valid_link("javascript:alert(1)"));
        assert!(!is_valid_link(""));
    }
}
