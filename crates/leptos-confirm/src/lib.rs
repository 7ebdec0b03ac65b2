//! Leptos Confirm Utilities
//!
//! One shared confirmation dialog for a whole page. Any control can park an
//! action behind a prompt; the dialog runs it on confirm and drops it on
//! cancel. Only one action is pending at a time: a new request replaces the
//! previous one.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

type PendingAction = Box<dyn FnOnce()>;

/// Confirmation state signals
#[derive(Clone, Copy)]
pub struct ConfirmSignals {
    /// Prompt being shown, `None` when the dialog is closed
    pub prompt_read: ReadSignal<Option<String>>,
    prompt_write: WriteSignal<Option<String>>,
    pending: StoredValue<Option<PendingAction>, LocalStorage>,
}

pub fn create_confirm_signals() -> ConfirmSignals {
    let (prompt_read, prompt_write) = signal(None::<String>);
    ConfirmSignals {
        prompt_read,
        prompt_write,
        pending: StoredValue::new_local(None),
    }
}

impl ConfirmSignals {
    /// Park `action` behind `prompt` and open the dialog
    pub fn request(&self, prompt: impl Into<String>, action: impl FnOnce() + 'static) {
        self.pending.set_value(Some(Box::new(action)));
        self.prompt_write.set(Some(prompt.into()));
    }

    pub fn is_open(&self) -> bool {
        self.prompt_read.get_untracked().is_some()
    }

    /// Close the dialog and run the parked action
    pub fn confirm(&self) {
        self.prompt_write.set(None);
        if let Some(action) = self.take() {
            action();
        }
    }

    /// Close the dialog and drop the parked action
    pub fn cancel(&self) {
        self.prompt_write.set(None);
        let _ = self.take();
    }

    fn take(&self) -> Option<PendingAction> {
        self.pending.try_update_value(|p| p.take()).flatten()
    }
}

/// Bind Escape on the document to cancel the open dialog
pub fn bind_escape_to_cancel(confirm: ConfirmSignals) {
    use wasm_bindgen::closure::Closure;

    let on_keydown = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" && confirm.is_open() {
            confirm.cancel();
        }
    });

    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref());
        }
    }
    on_keydown.forget();
}

/// Modal shown while an action is pending
#[component]
pub fn ConfirmDialog(
    confirm: ConfirmSignals,
    #[prop(into, default = "Confirm".to_string())] confirm_label: String,
    #[prop(into, default = "Cancel".to_string())] cancel_label: String,
) -> impl IntoView {
    view! {
        <Show when=move || confirm.prompt_read.get().is_some()>
            <div class="confirm-backdrop" on:click=move |_| confirm.cancel()>
                <div class="confirm-dialog" role="dialog" on:click=|ev| ev.stop_propagation()>
                    <p class="confirm-prompt">{move || confirm.prompt_read.get().unwrap_or_default()}</p>
                    <div class="confirm-actions">
                        <button class="cancel-btn" on:click=move |_| confirm.cancel()>
                            {cancel_label.clone()}
                        </button>
                        <button class="confirm-btn danger" on:click=move |_| confirm.confirm()>
                            {confirm_label.clone()}
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
