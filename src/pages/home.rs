//! Home Page
//!
//! Public recipe feed with a debounced name search.

use leptos::prelude::*;
use list_sync::QUIET_PERIOD_MS;

use crate::commands::{use_api, RecipeFeed, RecipeSource};
use crate::components::RecipeGrid;
use crate::config::HOME_PAGE_SIZE;
use crate::context::use_locale;
use crate::store::{store_is_signed_in, use_app_store};
use crate::sync::{use_debounced, use_feed};

#[component]
pub fn HomePage() -> impl IntoView {
    let i18n = use_locale();
    let store = use_app_store();
    let feed = use_feed(RecipeFeed::new(use_api(), RecipeSource::Explore), HOME_PAGE_SIZE);

    let (raw_query, set_raw_query) = signal(String::new());
    let query = use_debounced(raw_query, QUIET_PERIOD_MS);

    // Page 1 again on every stable query, language or session change
    Effect::new(move |_| {
        let query = query.get();
        i18n.locale.track();
        let _ = store_is_signed_in(&store);
        feed.reset(query);
    });

    let empty_key = Signal::derive(move || if query.with(|q| q.trim().is_empty()) { "home.noRecipes" } else { "home.noResults" });

    view! {
        <div class="page home-page">
            <h1>{move || i18n.t("home.title")}</h1>
            <p class="page-subtitle">{move || i18n.t("home.subtitle")}</p>
            <input
                type="search"
                class="search-input"
                placeholder=move || i18n.t("home.searchPlaceholder")
                prop:value=move || raw_query.get()
                on:input=move |ev| set_raw_query.set(event_target_value(&ev))
            />
            <Show when=move || raw_query.get() != query.get()>
                <span class="search-pending spinner-small" aria-busy="true"></span>
            </Show>
            <RecipeGrid feed=feed empty_key=empty_key end_key="home.endMessage" />
        </div>
    }
}
