//! Navigation Bar Component

use leptos::prelude::*;
use leptos::task::spawn_local;
use list_sync::Notifier;

use crate::commands::{self, use_api};
use crate::components::{use_toaster, LanguageSelect};
use crate::context::{use_locale, use_navigation, use_theme, Screen, Theme};
use crate::store::{store_is_signed_in, store_sign_out, store_user, use_app_store};

/// Log out on the server, then forget the user and go home
pub fn use_sign_out() -> Callback<()> {
    let nav = use_navigation();
    let store = use_app_store();
    let api = use_api();
    let toaster = use_toaster();

    Callback::new(move |_: ()| {
        let api = api.clone();
        spawn_local(async move {
            match commands::logout(&api).await {
                Ok(()) => {
                    store_sign_out(&store);
                    nav.go(Screen::Home);
                }
                Err(e) => toaster.error(&e),
            }
        });
    })
}

#[component]
pub fn Navbar() -> impl IntoView {
    let i18n = use_locale();
    let nav = use_navigation();
    let theme = use_theme();
    let store = use_app_store();
    let sign_out = use_sign_out();

    let link = move |screen: Screen, key: &'static str| {
        view! {
            <button
                class=move || if nav.screen.get() == screen { "nav-link active" } else { "nav-link" }
                on:click=move |_| nav.go(screen)
            >
                {move || i18n.t(key)}
            </button>
        }
    };

    view! {
        <nav class="navbar">
            <button class="brand" on:click=move |_| nav.go(Screen::Home)>"Foodmind"</button>
            <div class="nav-links">
                {link(Screen::Home, "nav_home")}
                <Show when=move || store_is_signed_in(&store)>
                    {link(Screen::Pantry, "nav_pantry")}
                    {link(Screen::Profile, "nav_profile")}
                    {link(Screen::CreateRecipe, "nav_create_recipe")}
                </Show>
                {link(Screen::Settings, "nav_settings")}
            </div>
            <div class="nav-actions">
                <LanguageSelect />
                <button class="theme-toggle" on:click=move |_| theme.toggle()>
                    {move || if theme.theme.get() == Theme::Dark { "☀️" } else { "🌙" }}
                </button>
                <Show
                    when=move || store_is_signed_in(&store)
                    fallback=move || view! {
                        <button class="nav-link" on:click=move |_| nav.go(Screen::Login)>
                            {move || i18n.t("login")}
                        </button>
                        <button class="nav-link" on:click=move |_| nav.go(Screen::Register)>
                            {move || i18n.t("register")}
                        </button>
                    }
                >
                    {move || store_user(&store).map(|user| view! {
                        <img class="avatar" src=user.avatar_url() alt=user.name.clone() on:click=move |_| nav.go(Screen::Profile) />
                    })}
                    <button class="nav-link" on:click=move |_| sign_out.run(())>
                        {move || i18n.t("settings_sign_out")}
                    </button>
                </Show>
            </div>
        </nav>
    }
}
