//! Family Vault
//!
//! Reference entries (wifi passwords, doctors, insurance numbers) grouped by
//! category. Only the family owner can change them.

use std::collections::BTreeMap;

use leptos::prelude::*;

use crate::board::BoardStateStoreFields;
use crate::commands::FormRequest;
use crate::context::use_app;
use crate::intercept::submit_form;
use crate::models::VaultEntry;

/// Entries grouped by category, categories and titles alphabetical
pub fn group_by_category(entries: &[VaultEntry]) -> Vec<(String, Vec<VaultEntry>)> {
    let mut groups: BTreeMap<String, Vec<VaultEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.category.clone()).or_default().push(entry.clone());
    }
    groups
        .into_iter()
        .map(|(category, mut entries)| {
            entries.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
            (category, entries)
        })
        .collect()
}

#[component]
pub fn VaultPage() -> impl IntoView {
    let ctx = use_app();
    let (editing, set_editing) = signal(None::<VaultEntry>);

    view! {
        <section class="vault-page">
            <Show when=move || ctx.is_owner()>
                <VaultForm editing=editing set_editing=set_editing />
            </Show>
            <For
                each=move || ctx.store.vault().with(|v| group_by_category(v))
                key=|(category, entries)| (category.clone(), entries.clone().into_iter().map(|e| (e.id, e.title, e.content)).collect::<Vec<_>>())
                children=move |(category, entries)| view! {
                    <div class="vault-category" id=format!("vault-category-{}", category.to_lowercase().replace(' ', "-"))>
                        <h3>{category.clone()}</h3>
                        <ul>
                            {entries.into_iter().map(|entry| view! { <VaultRow entry=entry set_editing=set_editing /> }).collect_view()}
                        </ul>
                    </div>
                }
            />
        </section>
    }
}

/// Add form, or edit form while an entry is selected
#[component]
fn VaultForm(editing: ReadSignal<Option<VaultEntry>>, set_editing: WriteSignal<Option<VaultEntry>>) -> impl IntoView {
    let ctx = use_app();
    let (category, set_category) = signal(String::new());
    let (title, set_title) = signal(String::new());
    let (content, set_content) = signal(String::new());

    Effect::new(move |_| {
        let entry = editing.get();
        set_category.set(entry.as_ref().map(|e| e.category.clone()).unwrap_or_default());
        set_title.set(entry.as_ref().map(|e| e.title.clone()).unwrap_or_default());
        set_content.set(entry.map(|e| e.content).unwrap_or_default());
    });

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (category, title, content) = (
            category.get().trim().to_string(),
            title.get().trim().to_string(),
            content.get().trim().to_string(),
        );
        if category.is_empty() || title.is_empty() || content.is_empty() {
            ctx.toast_error("All fields are required.");
            return;
        }
        let request = match editing.get_untracked() {
            Some(entry) => FormRequest::VaultEdit { entry_id: entry.id, category, title, content },
            None => FormRequest::VaultAdd { category, title, content },
        };
        submit_form(ctx, request, move || set_editing.set(None));
    };

    view! {
        <form class="vault-form" on:submit=save>
            <input
                type="text"
                placeholder="Category"
                prop:value=move || category.get()
                on:input=move |ev| set_category.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Title"
                prop:value=move || title.get()
                on:input=move |ev| set_title.set(event_target_value(&ev))
            />
            <textarea
                placeholder="Details"
                prop:value=move || content.get()
                on:input=move |ev| set_content.set(event_target_value(&ev))
            ></textarea>
            <button type="submit">{move || if editing.get().is_some() { "Save" } else { "Add" }}</button>
            <Show when=move || editing.get().is_some()>
                <button type="button" class="cancel-btn" on:click=move |_| set_editing.set(None)>"Cancel"</button>
            </Show>
        </form>
    }
}

#[component]
fn VaultRow(entry: VaultEntry, set_editing: WriteSignal<Option<VaultEntry>>) -> impl IntoView {
    let ctx = use_app();
    let entry_id = entry.id;
    let selected = entry.clone();

    view! {
        <li class="vault-entry" id=format!("vault-entry-{}", entry_id)>
            <strong class="vault-title">{entry.title}</strong>
            <pre class="vault-content">{entry.content}</pre>
            <Show when=move || ctx.is_owner()>
                <button class="edit-btn" on:click={
                    let selected = selected.clone();
                    move |_| set_editing.set(Some(selected.clone()))
                }>"✎"</button>
                <button
                    class="delete-btn"
                    on:click=move |_| submit_form(ctx, FormRequest::VaultDelete { entry_id }, || {})
                >
                    "×"
                </button>
            </Show>
        </li>
    }
}
