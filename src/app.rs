//! Hearth Frontend App
//!
//! Reads the page bootstrap, wires the push channel into the board store and
//! renders the current feature page.

use leptos::prelude::*;
use leptos_confirm::{bind_escape_to_cancel, create_confirm_signals, ConfirmDialog};

use crate::board::{BoardStateStoreFields, Change};
use crate::components::{
    BulletinBoard, CalendarPage, ChoresPage, FeatureNav, InvitePanel, ListsPage, MealPlanner, ToastStack,
    VaultPage,
};
use crate::config::{AppConfig, Bootstrap};
use crate::context::AppContext;
use crate::events::{decode_push, ClientEmit, EventError};
use crate::logging;
use crate::models::Feature;
use crate::socket::PushClient;
use crate::unread::{visit_time, LocalStore, UnreadTracker};

#[component]
pub fn App() -> impl IntoView {
    let bootstrap = match Bootstrap::from_document() {
        Ok(bootstrap) => bootstrap,
        Err(e) => {
            logging::init(log::LevelFilter::Info);
            log::error!("[APP] {}", e);
            return view! {
                <div class="app-error">"Could not load this page. Please reload."</div>
            }
            .into_any();
        }
    };

    let config = AppConfig::new(&bootstrap, &LocalStore::new());
    logging::init(config.log_level);
    log::info!("[APP] family {} on {}", config.family_id, config.page.key());

    let mut tracker = UnreadTracker::new(config.family_id, LocalStore::new());
    let mut board = bootstrap.board();
    board.last_seen = tracker.load();

    let confirm = create_confirm_signals();
    bind_escape_to_cancel(confirm);

    let ctx = AppContext::new(config.clone(), board, confirm);
    provide_context(ctx);

    let now = visit_time();
    tracker.mark_seen(config.page, now);
    ctx.apply(Change::FeatureVisited { feature: config.page, at: now });

    connect_push(ctx, config.family_id, config.socket_url.as_deref());

    view! {
        <div class="app-layout">
            <FeatureNav />
            <main class="main-content">
                {page(config.page, config.is_owner)}
            </main>
            <ToastStack />
            <ConfirmDialog confirm=confirm />
        </div>
    }
    .into_any()
}

fn page(feature: Feature, is_owner: bool) -> AnyView {
    match feature {
        Feature::Dashboard => view! {
            <ListsPage />
            {is_owner.then(|| view! { <InvitePanel /> })}
        }
        .into_any(),
        Feature::Calendar => view! { <CalendarPage /> }.into_any(),
        Feature::MealPlanner => view! { <MealPlanner /> }.into_any(),
        Feature::BulletinBoard => view! { <BulletinBoard /> }.into_any(),
        Feature::Chores => view! { <ChoresPage /> }.into_any(),
        Feature::Vault => view! { <VaultPage /> }.into_any(),
    }
}

/// Open the push channel, join the family and list rooms on every
/// (re)connect, and route pushes through the board reducer
fn connect_push(ctx: AppContext, family_id: u32, url: Option<&str>) {
    let client = PushClient::connect(url);

    let on_connect_client = client.clone();
    client.on_connect(move || {
        let Some(sid) = on_connect_client.sid() else {
            return;
        };
        log::info!("[PUSH] connected as {}", sid);
        ctx.apply(Change::Connected { sid });
        on_connect_client.emit(&ClientEmit::JoinFamilyRoom { family_id });
        let list_ids: Vec<u32> = ctx.store.lists().with_untracked(|lists| lists.iter().map(|l| l.id).collect());
        for list_id in list_ids {
            on_connect_client.emit(&ClientEmit::Join { list_id });
        }
    });

    client.on_push(move |name, payload| match decode_push(name, payload) {
        Ok(change) => ctx.apply(change),
        Err(EventError::Unknown(name)) => log::debug!("[PUSH] ignoring `{}`", name),
        Err(e) => log::warn!("[PUSH] {}", e),
    });

    ctx.set_push_client(client);
}
