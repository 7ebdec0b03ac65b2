//! Invitations
//!
//! Owner-only panel: pick a registered user who is not yet in the family and
//! send them an invite.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands::{self, FormRequest};
use crate::context::use_app;
use crate::intercept::submit_form;
use crate::models::InviteableUser;

#[component]
pub fn InvitePanel() -> impl IntoView {
    let ctx = use_app();
    let (users, set_users) = signal(Vec::<InviteableUser>::new());
    let (username, set_username) = signal(String::new());

    let refresh = move || {
        spawn_local(async move {
            match commands::inviteable_users().await {
                Ok(list) => set_users.set(list),
                Err(e) => {
                    log::warn!("[INVITE] could not load users: {}", e);
                    ctx.toast_error(e.toast_message());
                }
            }
        });
    };
    refresh();

    let invite = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = username.get().trim().to_string();
        if name.is_empty() { return; }
        submit_form(ctx, FormRequest::InviteUser { username: name }, move || {
            set_username.set(String::new());
            refresh();
        });
    };

    view! {
        <div class="invite-panel">
            <h3>"Invite to family"</h3>
            <form class="invite-form" on:submit=invite>
                <input
                    type="text"
                    list="inviteable-users"
                    placeholder="Username"
                    prop:value=move || username.get()
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                />
                <datalist id="inviteable-users">
                    <For
                        each=move || users.get()
                        key=|user| user.username.clone()
                        children=|user| view! { <option value=user.username></option> }
                    />
                </datalist>
                <button type="submit">"Invite"</button>
            </form>
        </div>
    }
}
