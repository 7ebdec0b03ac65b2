//! Meal Planner
//!
//! One dinner cell per weekday. Saving goes over the push channel and waits
//! for the server's acknowledgement; the whole cell is replaced on change.

use chrono::{Days, Local};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::agenda::week_start;
use crate::board::{BoardStateStoreFields, Change};
use crate::commands::FormRequest;
use crate::context::use_app;
use crate::events::ClientEmit;
use crate::intercept::submit_form;
use crate::models::{Meal, WEEK_DAYS};

#[component]
pub fn MealPlanner() -> impl IntoView {
    let monday = week_start(Local::now().date_naive());

    view! {
        <section class="meal-planner">
            <table class="meal-table">
                <tbody>
                    {WEEK_DAYS.iter().enumerate().map(|(i, day)| {
                        let date = monday + Days::new(i as u64);
                        view! {
                            <tr>
                                <th class="meal-day">
                                    {*day}
                                    <small class="meal-date">{date.format("%b %d").to_string()}</small>
                                </th>
                                <MealCell day=day.to_string() />
                            </tr>
                        }
                    }).collect_view()}
                </tbody>
            </table>
        </section>
    }
}

#[component]
fn MealCell(day: String) -> impl IntoView {
    let ctx = use_app();
    let (editing, set_editing) = signal(false);
    let (description, set_description) = signal(String::new());
    let (notes, set_notes) = signal(String::new());
    let (saving, set_saving) = signal(false);

    let day_key = day.clone();
    let meal = move || ctx.store.meals().with(|meals| meals.get(&day_key).cloned());

    let meal_for_edit = meal.clone();
    let start_edit = move |_| {
        let current = meal_for_edit();
        set_description.set(current.as_ref().map(|m| m.description.clone()).unwrap_or_default());
        set_notes.set(current.map(|m| m.notes).unwrap_or_default());
        set_editing.set(true);
    };

    let save_day = day.clone();
    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = description.get().trim().to_string();
        if text.is_empty() { return; }
        let Some(client) = ctx.push_client() else {
            ctx.toast_error("Not connected. Please reload the page.");
            return;
        };
        let message = ClientEmit::SaveMeal {
            day: save_day.clone(),
            description: text,
            notes: notes.get().trim().to_string(),
        };
        set_saving.set(true);
        spawn_local(async move {
            let saved = client
                .request(&message)
                .await
                .and_then(|reply| serde_json::from_value::<Meal>(reply).map_err(|e| e.to_string()));
            set_saving.set(false);
            match saved {
                Ok(meal) => {
                    // Our own broadcast is dropped by sid, so apply the ack here
                    ctx.apply(Change::MealUpdated { meal, sid: None });
                    set_editing.set(false);
                }
                Err(e) => {
                    log::warn!("[PUSH] save_meal failed: {}", e);
                    ctx.toast_error("Meal was not saved.");
                }
            }
        });
    };

    let display = move || match meal() {
        Some(m) => {
            let meal_id = m.id;
            let notes = match m.notes_html.clone() {
                Some(html) if !html.is_empty() => view! { <div class="meal-notes" inner_html=html></div> }.into_any(),
                _ => view! { <div class="meal-notes">{m.notes.clone()}</div> }.into_any(),
            };
            view! {
                <div class="meal-content" id=format!("meal-content-{}", meal_id)>
                    <span class="meal-description">{m.description.clone()}</span>
                    {notes}
                    <button
                        class="delete-btn"
                        on:click=move |_| submit_form(ctx, FormRequest::DeleteMeal { meal_id }, || {})
                    >
                        "×"
                    </button>
                </div>
            }.into_any()
        }
        None => view! { <span class="meal-empty">"Not planned"</span> }.into_any(),
    };

    view! {
        <td class="meal-cell" id=format!("meal-{}-Dinner", day)>
            <Show when=move || editing.get() fallback=move || {
                let display = display.clone();
                let start_edit = start_edit.clone();
                view! {
                    {display}
                    <button class="edit-btn" on:click=start_edit>"✎"</button>
                }
            }>
                <form class="meal-add-form" on:submit=save.clone()>
                    <input
                        type="text"
                        placeholder="What's for dinner?"
                        prop:value=move || description.get()
                        on:input=move |ev| set_description.set(event_target_value(&ev))
                    />
                    <textarea
                        placeholder="Notes, links..."
                        prop:value=move || notes.get()
                        on:input=move |ev| set_notes.set(event_target_value(&ev))
                    ></textarea>
                    <button type="submit" disabled=move || saving.get()>"Save"</button>
                    <button type="button" class="cancel-btn" on:click=move |_| set_editing.set(false)>"Cancel"</button>
                </form>
            </Show>
        </td>
    }
}
