use std::collections::{HashMap, HashSet};

use aula_shared::models::{DiscussionTopic, UserProfile};
use aula_shared::protocol::{CreatePost, CreateTopic, DeleteTopic, ListTopics, UpdateTopic};
use leptos::prelude::*;

use crate::auth::use_auth;
use crate::components::collection::{
    EmptyState, SkeletonList, keyed_rows, render_shape, use_collection_shape,
};
use crate::components::feedback::SubmitButton;
use crate::components::format;
use crate::components::layout::PageHeader;
use crate::context::use_app;
use crate::query::{QueryState, keys, use_api_query};
use crate::web::route::AppRoute;
use crate::web::router::Link;

/// Client-side narrowing of a course's topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopicFilter {
    #[default]
    All,
    Pinned,
    Resolved,
    Unresolved,
}

impl TopicFilter {
    pub const ALL: [TopicFilter; 4] = [
        TopicFilter::All,
        TopicFilter::Pinned,
        TopicFilter::Resolved,
        TopicFilter::Unresolved,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TopicFilter::All => "Todos",
            TopicFilter::Pinned => "Fijados",
            TopicFilter::Resolved => "Resueltos",
            TopicFilter::Unresolved => "Sin resolver",
        }
    }

    pub fn matches(&self, topic: &DiscussionTopic) -> bool {
        match self {
            TopicFilter::All => true,
            TopicFilter::Pinned => topic.is_pinned,
            TopicFilter::Resolved => topic.is_resolved,
            TopicFilter::Unresolved => !topic.is_resolved,
        }
    }
}

/// Topics that pass `filter`, pinned ones first. Otherwise the server order
/// is kept.
pub fn visible_topics(topics: &[DiscussionTopic], filter: TopicFilter) -> Vec<&DiscussionTopic> {
    let mut visible: Vec<_> = topics.iter().filter(|t| filter.matches(t)).collect();
    visible.sort_by_key(|t| !t.is_pinned);
    visible
}

/// Identity of a rendered topic card. A refresh that leaves these unchanged
/// keeps the card (and its focus) as it is.
pub fn topic_key(topic: &DiscussionTopic) -> (String, bool, bool, usize, String) {
    (
        topic.id.clone(),
        topic.is_pinned,
        topic.is_resolved,
        topic.posts.len(),
        topic.title.clone(),
    )
}

/// Per-thread UI state, held by the page so it outlives card rebuilds.
#[derive(Clone, Copy)]
struct Threads {
    open: RwSignal<HashSet<String>>,
    drafts: RwSignal<HashMap<String, String>>,
}

impl Threads {
    fn new() -> Self {
        Self {
            open: RwSignal::new(HashSet::new()),
            drafts: RwSignal::new(HashMap::new()),
        }
    }

    fn is_open(&self, id: &str) -> bool {
        self.open.with(|open| open.contains(id))
    }

    fn toggle(&self, id: &str) {
        self.open.update(|open| {
            if !open.remove(id) {
                open.insert(id.to_string());
            }
        });
    }

    fn draft(&self, id: &str) -> String {
        self.drafts.with(|d| d.get(id).cloned().unwrap_or_default())
    }

    fn set_draft(&self, id: &str, text: String) {
        self.drafts.update(|d| {
            if text.is_empty() {
                d.remove(id);
            } else {
                d.insert(id.to_string(), text);
            }
        });
    }
}

/// Whether `user` may pin, resolve or delete `topic`.
pub fn can_moderate(user: Option<&UserProfile>, topic: &DiscussionTopic) -> bool {
    user.is_some_and(|u| {
        u.role.can_teach() || topic.author.as_ref().is_some_and(|a| a.id == u.id)
    })
}

#[component]
pub fn DiscussionsPage(course_id: String) -> impl IntoView {
    let topics = {
        let course_id = course_id.clone();
        use_api_query(keys::topics(&course_id), move || ListTopics {
            course_id: course_id.clone(),
        })
    };
    let shape = use_collection_shape(topics);
    let (filter, set_filter) = signal(TopicFilter::All);
    let back = AppRoute::CourseDetail {
        id: course_id.clone(),
    };
    let form_course = course_id.clone();
    let list_course = StoredValue::new(course_id);
    let threads = Threads::new();

    view! {
        <div class="flex items-end justify-between gap-4">
            <PageHeader title="Foro del curso" subtitle="Preguntas y respuestas entre estudiantes e instructores." />
            <Link to=back class="btn btn-ghost btn-sm">
                "Volver al curso"
            </Link>
        </div>

        <NewTopicForm course_id=form_course />

        <div role="tablist" class="tabs tabs-boxed w-fit">
            {TopicFilter::ALL
                .into_iter()
                .map(|f| {
                    view! {
                        <a
                            role="tab"
                            class="tab"
                            class:tab-active=move || filter.get() == f
                            on:click=move |_| set_filter.set(f)
                        >
                            {f.label()}
                        </a>
                    }
                })
                .collect_view()}
        </div>

        {move || {
            render_shape(
                shape.get(),
                || view! { <SkeletonList /> }.into_any(),
                || {
                    view! {
                        <EmptyState
                            title="Aún no hay temas"
                            message="Sé el primero en abrir una conversación sobre este curso."
                        />
                    }
                        .into_any()
                },
                move || {
                    view! { <TopicList topics=topics filter=filter course_id=list_course.get_value() threads=threads /> }
                        .into_any()
                },
            )
        }}
    }
}

#[component]
fn TopicList(
    topics: Memo<QueryState<Vec<DiscussionTopic>>>,
    filter: ReadSignal<TopicFilter>,
    course_id: String,
    threads: Threads,
) -> impl IntoView {
    let course_id = StoredValue::new(course_id);
    let visible = Memo::new(move |_| {
        topics.with(|state| {
            let all = state.data.as_deref().map(Vec::as_slice).unwrap_or_default();
            filter.with(|f| visible_topics(all, *f).into_iter().cloned().collect::<Vec<_>>())
        })
    });

    view! {
        <Show
            when=move || visible.with(|v| !v.is_empty())
            fallback=|| {
                view! { <EmptyState title="Sin resultados" message="Ningún tema coincide con el filtro." /> }
            }
        >
            <div class="space-y-4">
                <For
                    each=move || keyed_rows(visible.get(), topic_key)
                    key=|(key, _)| key.clone()
                    children=move |(_, topic)| {
                        view! { <TopicCard topic=topic course_id=course_id.get_value() threads=threads /> }
                    }
                />
            </div>
        </Show>
    }
}

#[component]
fn NewTopicForm(course_id: String) -> impl IntoView {
    let app = use_app();
    let (title, set_title) = signal(String::new());
    let (content, set_content) = signal(String::new());
    let pending = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (t, c) = (title.get().trim().to_string(), content.get().trim().to_string());
        if t.is_empty() || c.is_empty() {
            return;
        }
        app.mutate(
            pending,
            CreateTopic {
                course_id: course_id.clone(),
                title: t,
                content: c,
                lesson_id: None,
            },
            vec![keys::topics(&course_id)],
            move |result| match result {
                Ok(_) => {
                    set_title.set(String::new());
                    set_content.set(String::new());
                    app.notify("Tema publicado");
                }
                Err(e) => app.notify_error(&e),
            },
        );
    };

    view! {
        <form class="card bg-base-100 shadow" on:submit=on_submit>
            <div class="card-body gap-3">
                <h2 class="card-title text-lg">"Nuevo tema"</h2>
                <input
                    class="input input-bordered"
                    placeholder="Título"
                    prop:value=title
                    on:input=move |ev| set_title.set(event_target_value(&ev))
                    required
                />
                <textarea
                    class="textarea textarea-bordered"
                    placeholder="¿Qué quieres preguntar?"
                    prop:value=content
                    on:input=move |ev| set_content.set(event_target_value(&ev))
                    required
                ></textarea>
                <div class="card-actions justify-end">
                    <SubmitButton pending=pending label="Publicar" />
                </div>
            </div>
        </form>
    }
}

#[component]
fn TopicCard(topic: DiscussionTopic, course_id: String, threads: Threads) -> impl IntoView {
    let app = use_app();
    let auth = use_auth();
    let moderate = auth.state.with_untracked(|s| can_moderate(s.user.as_ref(), &topic));
    let busy = RwSignal::new(false);

    let id = topic.id.clone();
    let open = {
        let id = id.clone();
        move || threads.is_open(&id)
    };
    let toggle_open = {
        let id = id.clone();
        move |_| threads.toggle(&id)
    };
    let (pinned, resolved) = (topic.is_pinned, topic.is_resolved);
    let update = {
        let id = id.clone();
        let course_id = course_id.clone();
        move |is_pinned: Option<bool>, is_resolved: Option<bool>| {
            app.mutate(
                busy,
                UpdateTopic {
                    id: id.clone(),
                    is_pinned,
                    is_resolved,
                    ..Default::default()
                },
                vec![keys::topics(&course_id)],
                app.report("Tema actualizado"),
            );
        }
    };
    let toggle_pin = {
        let update = update.clone();
        move |_| update(Some(!pinned), None)
    };
    let toggle_resolved = move |_| update(None, Some(!resolved));
    let delete = {
        let id = id.clone();
        let course_id = course_id.clone();
        move |_| {
            app.mutate(
                busy,
                DeleteTopic { id: id.clone() },
                vec![keys::topics(&course_id)],
                app.report("Tema eliminado"),
            );
        }
    };

    let author = topic.author.as_ref().map(|a| a.name.clone()).unwrap_or_default();
    let reply_count = topic.posts.len();
    let posts = topic.posts.clone();

    view! {
        <article class="card bg-base-100 shadow-sm">
            <div class="card-body gap-2">
                <div class="flex flex-wrap items-center gap-2">
                    {pinned.then(|| view! { <span class="badge badge-warning">"Fijado"</span> })}
                    {resolved.then(|| view! { <span class="badge badge-success">"Resuelto"</span> })}
                    <h3 class="font-semibold text-lg">{topic.title.clone()}</h3>
                </div>
                <p class="text-sm text-base-content/60">
                    {author} " · " {format::date(topic.created_at)}
                </p>
                <p class="whitespace-pre-line">{topic.content.clone()}</p>

                <div class="card-actions items-center justify-between">
                    <button class="btn btn-ghost btn-sm" on:click=toggle_open>
                        {reply_count} " respuestas"
                    </button>
                    <Show when=move || moderate>
                        <div class="join">
                            <button class="btn btn-sm join-item" disabled=move || busy.get() on:click=toggle_pin.clone()>
                                {if pinned { "Desfijar" } else { "Fijar" }}
                            </button>
                            <button
                                class="btn btn-sm join-item"
                                disabled=move || busy.get()
                                on:click=toggle_resolved.clone()
                            >
                                {if resolved { "Reabrir" } else { "Marcar resuelto" }}
                            </button>
                            <button
                                class="btn btn-sm btn-error join-item"
                                disabled=move || busy.get()
                                on:click=delete.clone()
                            >
                                "Eliminar"
                            </button>
                        </div>
                    </Show>
                </div>

                <Show when=open>
                    <ul class="border-l-2 border-base-300 pl-4 space-y-3">
                        {posts
                            .iter()
                            .map(|post| {
                                view! {
                                    <li>
                                        <p class="text-sm font-medium">
                                            {post.author.as_ref().map(|a| a.name.clone()).unwrap_or_default()}
                                            <span class="opacity-60 font-normal">
                                                " · " {format::date(post.created_at)}
                                            </span>
                                        </p>
                                        <p class="whitespace-pre-line">{post.content.clone()}</p>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                    <ReplyForm topic_id=id.clone() course_id=course_id.clone() threads=threads />
                </Show>
            </div>
        </article>
    }
}

#[component]
fn ReplyForm(topic_id: String, course_id: String, threads: Threads) -> impl IntoView {
    let app = use_app();
    let pending = RwSignal::new(false);
    let content = {
        let topic_id = topic_id.clone();
        move || threads.draft(&topic_id)
    };
    let on_input = {
        let topic_id = topic_id.clone();
        move |ev: web_sys::Event| threads.set_draft(&topic_id, event_target_value(&ev))
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let text = threads.draft(&topic_id).trim().to_string();
        if text.is_empty() {
            return;
        }
        let sent = topic_id.clone();
        app.mutate(
            pending,
            CreatePost {
                topic_id: topic_id.clone(),
                content: text,
                parent_id: None,
            },
            vec![keys::topics(&course_id)],
            move |result| match result {
                Ok(_) => threads.set_draft(&sent, String::new()),
                Err(e) => app.notify_error(&e),
            },
        );
    };

    view! {
        <form class="flex gap-2 mt-2" on:submit=on_submit>
            <input
                class="input input-bordered input-sm flex-1"
                placeholder="Escribe una respuesta…"
                prop:value=content
                on:input=on_input
            />
            <SubmitButton pending=pending label="Responder" class="btn btn-primary btn-sm" />
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aula_shared::models::Role;
    use serde_json::json;

    fn topics() -> Vec<DiscussionTopic> {
        serde_json::from_value(json!([
            { "id": "t1", "courseId": "c1", "title": "Dudas", "content": "…", "isResolved": true,
              "author": { "id": "u1", "name": "Ana" } },
            { "id": "t2", "courseId": "c1", "title": "Bienvenida", "content": "…", "isPinned": true },
            { "id": "t3", "courseId": "c1", "title": "Error al compilar", "content": "…" },
            { "id": "t4", "courseId": "c1", "title": "Reglas", "content": "…", "isPinned": true, "isResolved": true }
        ]))
        .unwrap()
    }

    fn ids(topics: Vec<&DiscussionTopic>) -> Vec<&str> {
        topics.into_iter().map(|t| t.id.as_str()).collect()
    }

    fn user(id: &str, role: Role) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            email: format!("{id}@aula.test"),
            name: id.to_string(),
            avatar_url: None,
            bio: None,
            role,
        }
    }

    #[test]
    fn pinned_topics_come_first_in_server_order() {
        assert_eq!(ids(visible_topics(&topics(), TopicFilter::All)), ["t2", "t4", "t1", "t3"]);
    }

    #[test]
    fn filters_narrow_by_flag() {
        let all = topics();
        assert_eq!(ids(visible_topics(&all, TopicFilter::Pinned)), ["t2", "t4"]);
        assert_eq!(ids(visible_topics(&all, TopicFilter::Resolved)), ["t4", "t1"]);
        assert_eq!(ids(visible_topics(&all, TopicFilter::Unresolved)), ["t2", "t3"]);
        assert!(visible_topics(&[], TopicFilter::All).is_empty());
    }

    #[test]
    fn card_identity_survives_an_unchanged_refresh() {
        let before = topics();
        let after = topics();
        assert_eq!(topic_key(&before[2]), topic_key(&after[2]));

        let mut replied = after[2].clone();
        replied.posts = serde_json::from_value(json!([
            { "id": "p1", "topicId": "t3", "content": "Prueba con cargo clean" }
        ]))
        .unwrap();
        assert_ne!(topic_key(&before[2]), topic_key(&replied));

        let mut resolved = after[2].clone();
        resolved.is_resolved = true;
        assert_ne!(topic_key(&before[2]), topic_key(&resolved));
    }

    #[test]
    fn authors_and_instructors_moderate() {
        let all = topics();
        let own = &all[0];
        let student = user("u1", Role::Student);
        let other = user("u2", Role::Student);
        let instructor = user("u3", Role::Instructor);

        assert!(can_moderate(Some(&student), own));
        assert!(!can_moderate(Some(&other), own));
        assert!(can_moderate(Some(&instructor), own));
        assert!(!can_moderate(None, own));
        // Anonymous topics can only be moderated by staff.
        assert!(!can_moderate(Some(&student), &all[1]));
    }
}
