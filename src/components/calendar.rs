//! Calendar
//!
//! Event list, month grid and the mobile agenda, all rendered from the
//! calendar cache in the board store.

use chrono::{Datelike, Local, NaiveDate};
use leptos::prelude::*;

use crate::agenda::{agenda, events_on, month_grid, shift_month};
use crate::board::BoardStateStoreFields;
use crate::commands::FormRequest;
use crate::context::use_app;
use crate::intercept::submit_form;
use crate::models::CalendarEvent;

const AGENDA_DAYS: u64 = 14;

#[derive(Clone, Copy, PartialEq)]
enum CalendarView {
    Month,
    Agenda,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[component]
pub fn CalendarPage() -> impl IntoView {
    // Narrow screens start on the agenda
    let narrow = web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|w| w.as_f64())
        .map_or(false, |w| w < 768.0);
    let (view_mode, set_view_mode) = signal(if narrow { CalendarView::Agenda } else { CalendarView::Month });
    let (editing, set_editing) = signal::<Option<CalendarEvent>>(None);

    let tab_class = move |mode: CalendarView| {
        if view_mode.get() == mode { "tab-btn active" } else { "tab-btn" }
    };

    view! {
        <section class="calendar-page">
            <EventForm editing=editing set_editing=set_editing />
            <div class="calendar-tabs">
                <button class=move || tab_class(CalendarView::Month) on:click=move |_| set_view_mode.set(CalendarView::Month)>
                    "Month"
                </button>
                <button class=move || tab_class(CalendarView::Agenda) on:click=move |_| set_view_mode.set(CalendarView::Agenda)>
                    "Agenda"
                </button>
            </div>
            {move || match view_mode.get() {
                CalendarView::Month => view! { <MonthView set_editing=set_editing /> }.into_any(),
                CalendarView::Agenda => view! { <AgendaView set_editing=set_editing /> }.into_any(),
            }}
        </section>
    }
}

/// Add form, doubling as the edit form when an event is selected
#[component]
fn EventForm(
    editing: ReadSignal<Option<CalendarEvent>>,
    set_editing: WriteSignal<Option<CalendarEvent>>,
) -> impl IntoView {
    let ctx = use_app();
    let (title, set_title) = signal(String::new());
    let (date, set_date) = signal(today().format("%Y-%m-%d").to_string());
    let (time, set_time) = signal(String::from("12:00"));

    Effect::new(move |_| {
        if let Some(event) = editing.get() {
            set_title.set(event.title.clone());
            set_date.set(event.date.format("%Y-%m-%d").to_string());
            set_time.set(event.time.clone());
        }
    });

    let reset = move || {
        set_title.set(String::new());
        set_editing.set(None);
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (t, d, tm) = (title.get().trim().to_string(), date.get(), time.get());
        if t.is_empty() || d.is_empty() || tm.is_empty() { return; }
        let request = match editing.get_untracked() {
            Some(event) => FormRequest::EditEvent { event_id: event.id, title: t, date: d, time: tm },
            None => FormRequest::AddEvent { title: t, date: d, time: tm },
        };
        submit_form(ctx, request, reset);
    };

    view! {
        <form class="event-add-form" on:submit=submit>
            <input
                type="text"
                placeholder="Event title"
                prop:value=move || title.get()
                on:input=move |ev| set_title.set(event_target_value(&ev))
            />
            <input type="date" prop:value=move || date.get() on:input=move |ev| set_date.set(event_target_value(&ev)) />
            <input type="time" prop:value=move || time.get() on:input=move |ev| set_time.set(event_target_value(&ev)) />
            <button type="submit">{move || if editing.get().is_some() { "Save" } else { "Add" }}</button>
            <Show when=move || editing.get().is_some()>
                <button type="button" class="cancel-btn" on:click=move |_| reset()>"Cancel"</button>
            </Show>
        </form>
    }
}

/// Badge for one event
#[component]
fn EventBadge(event: CalendarEvent, set_editing: WriteSignal<Option<CalendarEvent>>) -> impl IntoView {
    let ctx = use_app();
    let event_id = event.id;
    let when = event.display_when();
    let author = event.author.as_ref().map(|a| a.username.clone());
    let title = event.title.clone();

    view! {
        <li class="event-badge" id=format!("event-{}", event_id)>
            <div class="event-main" on:click=move |_| set_editing.set(Some(event.clone()))>
                <div class="event-title">{title}</div>
                <small class="event-when">{when}</small>
                {author.map(|name| view! { <small class="event-author">" · " {name}</small> })}
            </div>
            <button
                class="delete-btn"
                on:click=move |_| submit_form(ctx, FormRequest::DeleteEvent { event_id }, || {})
            >
                "×"
            </button>
        </li>
    }
}

#[component]
fn MonthView(set_editing: WriteSignal<Option<CalendarEvent>>) -> impl IntoView {
    let ctx = use_app();
    let now = today();
    let (month, set_month) = signal((now.year(), now.month()));
    let (selected, set_selected) = signal(now);

    let grid = move || {
        let (y, m) = month.get();
        ctx.store.events().with(|events| month_grid(y, m, events))
    };
    let day_events = move || ctx.store.events().with(|events| events_on(events, selected.get()));
    let label = move || {
        let (y, m) = month.get();
        NaiveDate::from_ymd_opt(y, m, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default()
    };

    view! {
        <div class="month-view">
            <div class="month-nav">
                <button on:click=move |_| set_month.update(|ym| *ym = shift_month(ym.0, ym.1, -1))>"‹"</button>
                <span class="month-label">{label}</span>
                <button on:click=move |_| set_month.update(|ym| *ym = shift_month(ym.0, ym.1, 1))>"›"</button>
            </div>
            <table class="month-grid">
                <thead>
                    <tr>
                        {["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"].into_iter().map(|d| view! { <th>{d}</th> }).collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {move || grid().into_iter().map(|week| view! {
                        <tr>
                            {week.into_iter().map(|day| {
                                let date = day.date;
                                let in_month = day.in_month;
                                let count = day.event_count;
                                let class = move || {
                                    let mut c = String::from("grid-day");
                                    if !in_month { c.push_str(" other-month"); }
                                    if date == now { c.push_str(" today"); }
                                    if selected.get() == date { c.push_str(" selected"); }
                                    c
                                };
                                view! {
                                    <td class=class on:click=move |_| set_selected.set(date)>
                                        <span class="grid-date">{date.day()}</span>
                                        {(count > 0).then(|| view! {
                                            <span class="event-count">{count}</span>
                                        })}
                                    </td>
                                }
                            }).collect_view()}
                        </tr>
                    }).collect_view()}
                </tbody>
            </table>
            <ul class="calendar-events">
                <For
                    each=day_events
                    key=|e| (e.id, e.title.clone(), e.date, e.time.clone())
                    children=move |e| view! { <EventBadge event=e set_editing=set_editing /> }
                />
            </ul>
        </div>
    }
}

#[component]
fn AgendaView(set_editing: WriteSignal<Option<CalendarEvent>>) -> impl IntoView {
    let ctx = use_app();
    let days = move || ctx.store.events().with(|events| agenda(events, today(), AGENDA_DAYS));

    view! {
        <div class="agenda-view">
            <Show when=move || !days().is_empty() fallback=|| view! { <p class="empty">"Nothing planned for the next two weeks."</p> }>
                <For
                    each=days
                    key=|day| (day.date, day.events.iter().map(|e| (e.id, e.title.clone(), e.time.clone())).collect::<Vec<_>>())
                    children=move |day| view! {
                        <div class="agenda-day">
                            <h3 class="agenda-date">{day.date.format("%A, %b %d").to_string()}</h3>
                            <ul class="calendar-events">
                                {day.events.into_iter().map(|e| view! { <EventBadge event=e set_editing=set_editing /> }).collect_view()}
                            </ul>
                        </div>
                    }
                />
            </Show>
        </div>
    }
}
