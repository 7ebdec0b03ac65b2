//! Bulletin Board
//!
//! Pinned notes sit above the board. Pinning moves a note between the two.

use leptos::prelude::*;

use crate::board::BoardStateStoreFields;
use crate::commands::FormRequest;
use crate::context::use_app;
use crate::intercept::submit_form;
use crate::models::Note;

#[component]
pub fn BulletinBoard() -> impl IntoView {
    let ctx = use_app();

    view! {
        <section class="bulletin-board">
            <AddNoteForm />
            <Show when=move || ctx.store.pinned_notes().with(|n| !n.is_empty())>
                <h3 class="pinned-heading">"Pinned"</h3>
            </Show>
            <div class="pinned-notes" id="pinned-notes-container">
                <For
                    each=move || ctx.store.pinned_notes().get()
                    key=|note| (note.id, note.html.is_some())
                    children=move |note| view! { <NoteCard note=note /> }
                />
            </div>
            <div class="notes" id="notes-container">
                <For
                    each=move || ctx.store.notes().get()
                    key=|note| (note.id, note.html.is_some())
                    children=move |note| view! { <NoteCard note=note /> }
                />
            </div>
        </section>
    }
}

#[component]
fn AddNoteForm() -> impl IntoView {
    let ctx = use_app();
    let (content, set_content) = signal(String::new());

    let add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = content.get().trim().to_string();
        if text.is_empty() { return; }
        submit_form(ctx, FormRequest::AddNote { content: text }, move || set_content.set(String::new()));
    };

    view! {
        <form class="note-add-form" on:submit=add>
            <textarea
                placeholder="Leave a note for the family..."
                prop:value=move || content.get()
                on:input=move |ev| set_content.set(event_target_value(&ev))
            ></textarea>
            <button type="submit">"Post"</button>
        </form>
    }
}

#[component]
fn NoteCard(note: Note) -> impl IntoView {
    let ctx = use_app();
    let note_id = note.id;
    let is_author = note.author_id == Some(ctx.config().user_id);

    let body = match note.html.clone() {
        // Fetched as a server fragment
        Some(html) => view! { <div class="note-html" inner_html=html></div> }.into_any(),
        None => view! {
            <p class="note-content">{note.content.clone()}</p>
            <footer class="note-meta">
                <span class="note-author">{note.author.clone()}</span>
                <span class="note-timestamp">{note.timestamp.clone()}</span>
            </footer>
        }
        .into_any(),
    };

    view! {
        <article class=if note.is_pinned { "note pinned" } else { "note" } id=format!("note-{}", note_id)>
            {body}
            <div class="note-actions">
                <button
                    class="pin-btn"
                    title=if note.is_pinned { "Unpin" } else { "Pin" }
                    on:click=move |_| submit_form(ctx, FormRequest::PinNote { note_id }, || {})
                >
                    "📌"
                </button>
                <Show when=move || is_author>
                    <button
                        class="delete-btn"
                        on:click=move |_| submit_form(ctx, FormRequest::DeleteNote { note_id }, || {})
                    >
                        "×"
                    </button>
                </Show>
            </div>
        </article>
    }
}
