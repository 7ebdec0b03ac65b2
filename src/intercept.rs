//! Form Interception
//!
//! Every form submits through here: confirm if needed, send in the
//! background, then feed the reply through the board reducer. Failures are
//! a toast and nothing else.

use gloo_timers::callback::Timeout;
use leptos::task::spawn_local;

use crate::commands::{self, FormOutcome, FormRequest};
use crate::context::{AppContext, ToastKind};

const RELOAD_DELAY_MS: u32 = 1500;

/// Submit `request`, running `on_success` (typically: clear the inputs)
/// once the reply has been applied
pub fn submit_form(ctx: AppContext, request: FormRequest, on_success: impl FnOnce() + 'static) {
    match request.confirm_prompt() {
        Some(prompt) => ctx.confirm.request(prompt, move || send(ctx, request, on_success)),
        None => send(ctx, request, on_success),
    }
}

fn send(ctx: AppContext, request: FormRequest, on_success: impl FnOnce() + 'static) {
    spawn_local(async move {
        match commands::submit(&request).await {
            Ok(outcome) => {
                apply_outcome(ctx, outcome);
                on_success();
            }
            Err(e) => {
                log::warn!("[FORM] {} failed: {}", request.endpoint(), e);
                ctx.toast_error(e.toast_message());
            }
        }
    });
}

fn apply_outcome(ctx: AppContext, outcome: FormOutcome) {
    for change in outcome.changes {
        ctx.apply(change);
    }
    if let Some(notice) = outcome.notice {
        ctx.toast(ToastKind::Success, notice);
    }
    if outcome.reload {
        Timeout::new(RELOAD_DELAY_MS, || {
            if let Some(window) = web_sys::window() {
                let _ = window.location().reload();
            }
        })
        .forget();
    }
}
