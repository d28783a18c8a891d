//! Profile Page
//!
//! Account summary plus the "my recipes" and "favourites" tabs. Switching
//! tabs empties the list before the new one loads.

use leptos::prelude::*;

use crate::commands::{use_api, RecipeFeed, RecipeSource};
use crate::components::RecipeGrid;
use crate::config::PROFILE_PAGE_SIZE;
use crate::context::use_locale;
use crate::store::{store_user, use_app_store};
use crate::sync::use_feed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Mine,
    Favourites,
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let i18n = use_locale();
    let store = use_app_store();
    let api = use_api();
    let mine = use_feed(RecipeFeed::new(api.clone(), RecipeSource::Mine), PROFILE_PAGE_SIZE);
    let favourites = use_feed(RecipeFeed::new(api, RecipeSource::Favourites), PROFILE_PAGE_SIZE);
    let (tab, set_tab) = signal(Tab::Mine);

    Effect::new(move |_| {
        i18n.locale.track();
        let feed = match tab.get() {
            Tab::Mine => mine,
            Tab::Favourites => favourites,
        };
        feed.clear_confirmed();
        feed.reset(String::new());
    });

    let tab_button = move |target: Tab, key: &'static str| {
        view! {
            <button
                class=move || if tab.get() == target { "tab active" } else { "tab" }
                on:click=move |_| set_tab.set(target)
            >
                {move || i18n.t(key)}
            </button>
        }
    };

    view! {
        <div class="page profile-page">
            {move || store_user(&store).map(|user| view! {
                <header class="profile-header">
                    <img class="avatar avatar-large" src=user.avatar_url() alt=user.name.clone() />
                    <div>
                        <h1>{user.name.clone()}</h1>
                        <p class="profile-email">{user.email.clone()}</p>
                        {user.member_since().map(|date| view! {
                            <p class="profile-since">{move || format!("{} {}", i18n.t("settings_date_account"), date)}</p>
                        })}
                    </div>
                </header>
            })}
            <div class="tabs">
                {tab_button(Tab::Mine, "profile.myrecipes")}
                {tab_button(Tab::Favourites, "profile.favoriterecipes")}
            </div>
            {move || match tab.get() {
                Tab::Mine => view! {
                    <RecipeGrid
                        feed=mine
                        owner=true
                        empty_key="profile.norecipescreated"
                        empty_hint_key="profile.norecipescreateddesc"
                    />
                }.into_any(),
                Tab::Favourites => view! {
                    <RecipeGrid
                        feed=favourites
                        empty_key="profile.nofavoriterecipes"
                        empty_hint_key="profile.nofavoriterecipesdesc"
                    />
                }.into_any(),
            }}
        </div>
    }
}
