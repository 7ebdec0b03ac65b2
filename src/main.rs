//! Hearth Frontend Entry Point

mod agenda;
mod app;
mod board;
mod commands;
mod components;
mod config;
mod context;
mod events;
mod intercept;
mod logging;
mod models;
mod progress;
mod socket;
mod unread;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
