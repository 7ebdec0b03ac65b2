//! Chores
//!
//! Weekly chore board: family progress, one column per member, and for the
//! family owner the chore bank, weekly generation and the history browser.

use chrono::{Days, Local, NaiveDate};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use crate::agenda::{next_history_week, week_start};
use crate::board::{BoardStateStoreFields, Change};
use crate::commands::{self, ChoreHistory, FormRequest};
use crate::context::use_app;
use crate::events::ClientEmit;
use crate::intercept::submit_form;
use crate::models::ChoreAssignment;
use crate::progress::{family_progress, member_progress, Progress};

#[component]
pub fn ChoresPage() -> impl IntoView {
    let ctx = use_app();

    view! {
        <section class="chores-page">
            <FamilyProgress />
            <div class="chore-columns">
                <For
                    each=move || ctx.store.chores().with(|c| member_progress(c))
                    key=|row| (row.member_id, row.assignments.iter().map(|a| (a.id, a.is_complete)).collect::<Vec<_>>())
                    children=move |row| view! {
                        <div class="chore-column" id=format!("member-{}", row.member_id)>
                            <h3>{row.member_name.clone()}</h3>
                            <ProgressBar progress=row.progress />
                            <ul class="chore-cards">
                                {row.assignments.into_iter().map(|a| view! { <ChoreCard assignment=a /> }).collect_view()}
                            </ul>
                        </div>
                    }
                />
            </div>
            <Show when=move || ctx.is_owner()>
                <ChoreBank />
                <ChoreHistoryBrowser />
            </Show>
        </section>
    }
}

#[component]
fn FamilyProgress() -> impl IntoView {
    let ctx = use_app();
    let progress = Memo::new(move |_| ctx.store.chores().with(|c| family_progress(c)));

    view! {
        <div class="family-progress">
            <span class="progress-label">
                {move || {
                    let p = progress.get();
                    format!("Family: {} / {} points", p.completed, p.total)
                }}
            </span>
            {move || view! { <ProgressBar progress=progress.get() /> }}
        </div>
    }
}

#[component]
fn ProgressBar(progress: Progress) -> impl IntoView {
    let pct = progress.percentage();
    view! {
        <div class="progress-bar">
            <div class="progress-fill" style=format!("width: {}%", pct)></div>
            <span class="progress-text">{format!("{}%", pct)}</span>
        </div>
    }
}

#[component]
fn ChoreCard(assignment: ChoreAssignment) -> impl IntoView {
    let ctx = use_app();
    let id = assignment.id;

    let toggle = move |_| {
        if ctx.emit(ClientEmit::ToggleChore { assignment_id: id }) {
            ctx.apply(Change::ChoreToggledLocally { assignment_id: id });
        } else {
            ctx.toast_error("Not connected. Please reload the page.");
        }
    };

    view! {
        <li
            class=if assignment.is_complete { "chore-card complete" } else { "chore-card" }
            id=format!("assignment-{}", id)
            on:click=toggle
        >
            <span class="chore-name">{assignment.chore_name.clone()}</span>
            <span class="chore-points">{format!("{} pts", assignment.points)}</span>
        </li>
    }
}

#[component]
fn ChoreBank() -> impl IntoView {
    let ctx = use_app();
    let (name, set_name) = signal(String::new());
    let (points, set_points) = signal(String::from("1"));

    let add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let chore = name.get().trim().to_string();
        if chore.is_empty() { return; }
        let Ok(points) = points.get().trim().parse::<u32>() else {
            ctx.toast_error("Points must be a whole number.");
            return;
        };
        submit_form(ctx, FormRequest::AddChore { name: chore, points }, move || {
            set_name.set(String::new());
            set_points.set(String::from("1"));
        });
    };

    view! {
        <div class="chore-bank">
            <h3>"Chore bank"</h3>
            <ul class="chore-bank-list">
                <For
                    each=move || ctx.store.chore_bank().get()
                    key=|chore| chore.id
                    children=move |chore| {
                        let chore_id = chore.id;
                        view! {
                            <li id=format!("chore-{}", chore_id)>
                                <span>{chore.name}</span>
                                <small>{format!("{} pts", chore.points)}</small>
                                <button
                                    class="delete-btn"
                                    on:click=move |_| submit_form(ctx, FormRequest::DeleteChore { chore_id }, || {})
                                >
                                    "×"
                                </button>
                            </li>
                        }
                    }
                />
            </ul>
            <form class="chore-add-form" on:submit=add>
                <input
                    type="text"
                    placeholder="Chore name"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
                <input
                    type="number"
                    min="1"
                    prop:value=move || points.get()
                    on:input=move |ev| set_points.set(event_target_value(&ev))
                />
                <button type="submit">"Add"</button>
            </form>
            <button class="generate-btn" on:click=move |_| submit_form(ctx, FormRequest::GenerateChores, || {})>
                "Generate this week's chores"
            </button>
        </div>
    }
}

/// Past weeks, rendered by the server one week at a time
#[component]
fn ChoreHistoryBrowser() -> impl IntoView {
    let ctx = use_app();
    let this_week = week_start(Local::now().date_naive());
    let (week, set_week) = signal(this_week);
    let (history, set_history) = signal(None::<ChoreHistory>);
    let (loading, set_loading) = signal(false);

    let load = move |target: NaiveDate| {
        let target = week_start(target);
        set_week.set(target);
        set_loading.set(true);
        spawn_local(async move {
            match commands::chore_history(target).await {
                Ok(page) => set_history.set(Some(page)),
                Err(e) => {
                    log::warn!("[CHORES] history for {} failed: {}", target, e);
                    ctx.toast_error(e.toast_message());
                }
            }
            set_loading.set(false);
        });
    };

    load(this_week);

    // Follow the server's prev/next links in place
    let on_nav_click = move |ev: web_sys::MouseEvent| {
        let href = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .and_then(|el| el.closest("a").ok().flatten())
            .and_then(|a| a.get_attribute("href"));
        if let Some(target) = href.as_deref().and_then(commands::history_week_from_href) {
            ev.prevent_default();
            load(target);
        }
    };

    view! {
        <div class="chore-history">
            <h3>"History"</h3>
            <div class="history-controls">
                <button on:click=move |_| load(week.get_untracked() - Days::new(7))>"‹ Previous"</button>
                <button
                    disabled=move || { next_history_week(week.get(), this_week).is_none() }
                    on:click=move |_| {
                        if let Some(next) = next_history_week(week.get_untracked(), this_week) {
                            load(next);
                        }
                    }
                >
                    "Next ›"
                </button>
            </div>
            <Show when=move || loading.get()>
                <p class="loading">"Loading..."</p>
            </Show>
            {move || history.get().map(|page| view! {
                <p class="week-display">{format!("Week of {}", page.week_display)}</p>
                <div class="history-nav" on:click=on_nav_click inner_html=page.nav_html></div>
                <div class="history-grid" inner_html=page.grid_html></div>
            })}
        </div>
    }
}
