//! Toast Notification Component
//!
//! Shows transient success and error messages.

use leptos::prelude::*;

use crate::context::{use_app, Toast, ToastKind};

/// Toast notification container
#[component]
pub fn ToastStack() -> impl IntoView {
    let ctx = use_app();

    view! {
        <div class="toast-stack" aria-live="polite">
            <For
                each=move || ctx.toasts.get()
                key=|toast| toast.id
                children=move |toast| view! { <ToastMessage toast=toast /> }
            />
        </div>
    }
}

#[component]
fn ToastMessage(toast: Toast) -> impl IntoView {
    let ctx = use_app();
    let id = toast.id;
    let (icon, class) = match toast.kind {
        ToastKind::Success => ("✓", "toast toast-success"),
        ToastKind::Error => ("✕", "toast toast-error"),
    };

    view! {
        <div class=class role="status" on:click=move |_| ctx.dismiss_toast(id)>
            <span class="toast-icon">{icon}</span>
            <span class="toast-text">{toast.message}</span>
        </div>
    }
}
