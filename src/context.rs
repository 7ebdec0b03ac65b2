//! Application Context
//!
//! Shared handles provided via Leptos Context API: the board store, the
//! push client, toasts and the shared confirmation dialog.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_confirm::ConfirmSignals;
use reactive_stores::Store;

use crate::board::{reduce, BoardState, Change, Patch};
use crate::commands;
use crate::config::AppConfig;
use crate::events::ClientEmit;
use crate::socket::PushClient;

pub type AppStore = Store<BoardState>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    pub store: AppStore,
    pub confirm: ConfirmSignals,
    pub toasts: RwSignal<Vec<Toast>>,
    config: StoredValue<AppConfig>,
    push: StoredValue<Option<PushClient>, LocalStorage>,
    next_toast: StoredValue<u32>,
}

impl AppContext {
    pub fn new(config: AppConfig, board: BoardState, confirm: ConfirmSignals) -> Self {
        Self {
            store: Store::new(board),
            confirm,
            toasts: RwSignal::new(Vec::new()),
            config: StoredValue::new(config),
            push: StoredValue::new_local(None),
            next_toast: StoredValue::new(0),
        }
    }

    pub fn config(&self) -> AppConfig {
        self.config.get_value()
    }

    pub fn is_owner(&self) -> bool {
        self.config.with_value(|c| c.is_owner)
    }

    pub fn set_push_client(&self, client: PushClient) {
        self.push.set_value(Some(client));
    }

    pub fn push_client(&self) -> Option<PushClient> {
        self.push.get_value()
    }

    /// Emit on the push channel; false when it is down
    pub fn emit(&self, message: ClientEmit) -> bool {
        self.push_client().map_or(false, |client| client.emit(&message))
    }

    /// Reduce a change against the board and apply its patches
    pub fn apply(&self, change: Change) {
        let patches = reduce(&self.store.read_untracked(), &change);
        if patches.is_empty() {
            log::debug!("[APP] no-op change {:?}", change);
            return;
        }
        self.store.update(|state| {
            for patch in &patches {
                state.apply(patch);
            }
        });

        for patch in patches {
            match patch {
                Patch::FetchNote { note_id, pinned } => self.fetch_note(note_id, pinned),
                // Item pushes for a new list arrive on its own room
                Patch::AppendList(list) => {
                    self.emit(ClientEmit::Join { list_id: list.id });
                }
                _ => {}
            }
        }
    }

    fn fetch_note(&self, note_id: u32, pinned: bool) {
        let ctx = *self;
        spawn_local(async move {
            match commands::rendered_note(note_id, pinned).await {
                Ok(note) => ctx.apply(Change::NoteFetched { note }),
                Err(e) => {
                    log::warn!("[APP] could not fetch note {}: {}", note_id, e);
                    ctx.toast_error(e.toast_message());
                }
            }
        });
    }

    /// Show a transient toast
    pub fn toast(&self, kind: ToastKind, message: impl Into<String>) {
        let id = self.next_toast.get_value();
        self.next_toast.set_value(id.wrapping_add(1));
        self.toasts.update(|t| t.push(Toast { id, kind, message: message.into() }));

        let toasts = self.toasts;
        let ms = self.config.with_value(|c| c.toast_ms);
        Timeout::new(ms, move || {
            toasts.update(|t| t.retain(|toast| toast.id != id));
        })
        .forget();
    }

    pub fn toast_error(&self, message: impl Into<String>) {
        self.toast(ToastKind::Error, message);
    }

    pub fn dismiss_toast(&self, id: u32) {
        self.toasts.update(|t| t.retain(|toast| toast.id != id));
    }
}

/// Get the app context
pub fn use_app() -> AppContext {
    expect_context::<AppContext>()
}
