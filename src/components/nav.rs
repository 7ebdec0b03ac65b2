//! Feature Navigation
//!
//! Links to every feature page, with a dot on features that have unseen
//! activity.

use leptos::prelude::*;

use crate::board::BoardStateStoreFields;
use crate::context::use_app;
use crate::models::Feature;

fn href(feature: Feature) -> &'static str {
    match feature {
        Feature::Dashboard => "/",
        Feature::Calendar => "/calendar",
        Feature::MealPlanner => "/meal_planner",
        Feature::BulletinBoard => "/bulletin_board",
        Feature::Chores => "/chores",
        Feature::Vault => "/vault",
    }
}

#[component]
pub fn FeatureNav() -> impl IntoView {
    let ctx = use_app();

    view! {
        <nav class="feature-nav">
            {Feature::ALL.iter().map(|&feature| {
                let class = move || {
                    let mut c = String::from("nav-link");
                    if ctx.store.current().get() == feature { c.push_str(" active"); }
                    c
                };
                view! {
                    <a class=class href=href(feature)>
                        {feature.label()}
                        <Show when=move || ctx.store.unread().with(|u| u.contains(&feature))>
                            <span class="unread-dot" title="New activity"></span>
                        </Show>
                    </a>
                }
            }).collect_view()}
        </nav>
    }
}
