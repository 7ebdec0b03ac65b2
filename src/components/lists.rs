//! Shared Lists
//!
//! Dashboard list cards, their rows, and the add / edit / toggle / delete
//! controls for each row.

use leptos::prelude::*;

use crate::board::{BoardStateStoreFields, Change};
use crate::commands::FormRequest;
use crate::context::use_app;
use crate::events::ClientEmit;
use crate::intercept::submit_form;
use crate::models::{ListItem, ShoppingList};

#[component]
pub fn ListsPage() -> impl IntoView {
    let ctx = use_app();

    view! {
        <section class="lists-page">
            <CreateListForm />
            <div class="list-cards">
                <For
                    each=move || ctx.store.lists().get()
                    key=|list| list.id
                    children=move |list| view! { <ListCard list=list /> }
                />
            </div>
        </section>
    }
}

#[component]
fn CreateListForm() -> impl IntoView {
    let ctx = use_app();
    let (name, set_name) = signal(String::new());

    let create = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = name.get().trim().to_string();
        if text.is_empty() { return; }
        submit_form(ctx, FormRequest::CreateList { name: text }, move || set_name.set(String::new()));
    };

    view! {
        <form class="list-create-form" on:submit=create>
            <input
                type="text"
                placeholder="New list name..."
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
            />
            <button type="submit">"Create"</button>
        </form>
    }
}

/// One list with its rows
#[component]
fn ListCard(list: ShoppingList) -> impl IntoView {
    let ctx = use_app();
    let list_id = list.id;

    let rows = move || {
        ctx.store
            .items()
            .with(|items| items.get(&list_id).cloned().unwrap_or_default())
    };

    let header = match (list.name.clone(), list.card_html.clone()) {
        (Some(name), _) => view! { <h2 class="list-title">{name}</h2> }.into_any(),
        // Lists announced by push only carry the server's card markup
        (None, Some(html)) => view! { <div class="list-card-html" inner_html=html></div> }.into_any(),
        (None, None) => view! { <h2 class="list-title">{format!("List #{}", list_id)}</h2> }.into_any(),
    };

    view! {
        <div class="list-card" id=format!("items-list-{}", list_id)>
            <div class="list-card-header">
                {header}
                <Show when=move || ctx.is_owner()>
                    <button
                        class="delete-btn"
                        title="Delete list"
                        on:click=move |_| submit_form(ctx, FormRequest::DeleteList { list_id }, || {})
                    >
                        "×"
                    </button>
                </Show>
            </div>
            <ul class="list-items">
                <For
                    each=rows
                    key=|item| (item.id, item.text.clone(), item.done)
                    children=move |item| view! { <ItemRow item=item /> }
                />
            </ul>
            <AddItemForm list_id=list_id />
        </div>
    }
}

#[component]
fn AddItemForm(list_id: u32) -> impl IntoView {
    let ctx = use_app();
    let (text, set_text) = signal(String::new());

    let add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let value = text.get().trim().to_string();
        if value.is_empty() { return; }
        submit_form(
            ctx,
            FormRequest::AddItem { list_id, text: value },
            move || set_text.set(String::new()),
        );
    };

    view! {
        <form class="item-add-form" on:submit=add>
            <input
                type="text"
                placeholder="Add item..."
                prop:value=move || text.get()
                on:input=move |ev| set_text.set(event_target_value(&ev))
            />
            <button type="submit">"Add"</button>
        </form>
    }
}

/// A single list row
#[component]
fn ItemRow(item: ListItem) -> impl IntoView {
    let ctx = use_app();
    let id = item.id;
    let done = item.done;
    let (editing, set_editing) = signal(false);
    let (draft, set_draft) = signal(item.text.clone());
    let text = item.text.clone();
    let author = item.author.map(|a| a.username);

    let toggle = move |_| {
        if ctx.emit(ClientEmit::ToggleDone { item_id: id }) {
            ctx.apply(Change::ItemToggledLocally { item_id: id });
        } else {
            // Push channel down, fall back to the form endpoint
            submit_form(ctx, FormRequest::ToggleItem { item_id: id }, || {});
        }
    };

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let value = draft.get().trim().to_string();
        if value.is_empty() { return; }
        submit_form(ctx, FormRequest::EditItem { item_id: id, text: value }, move || set_editing.set(false));
    };

    view! {
        <li class=if done { "list-item done" } else { "list-item" } id=format!("item-{}", id)>
            <input type="checkbox" checked=done on:change=toggle />
            <Show
                when=move || editing.get()
                fallback=move || view! {
                    <span class="item-text" on:dblclick=move |_| set_editing.set(true)>{text.clone()}</span>
                }
            >
                <form class="item-edit-form" on:submit=save>
                    <input
                        type="text"
                        prop:value=move || draft.get()
                        on:input=move |ev| set_draft.set(event_target_value(&ev))
                    />
                    <button type="submit">"Save"</button>
                    <button type="button" class="cancel-btn" on:click=move |_| set_editing.set(false)>"✗"</button>
                </form>
            </Show>
            {author.map(|name| view! { <small class="item-author">{name}</small> })}
            <button class="edit-btn" on:click=move |_| set_editing.update(|e| *e = !*e)>"✎"</button>
            <button
                class="delete-btn"
                on:click=move |_| submit_form(ctx, FormRequest::DeleteItem { item_id: id }, || {})
            >
                "×"
            </button>
        </li>
    }
}
