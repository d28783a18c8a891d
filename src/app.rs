//! Foodmind Frontend App
//!
//! Builds the shared contexts, checks the session, and switches between
//! screens following the location fragment.

use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use list_sync::ApiError;
use reactive_stores::Store;

use crate::commands::{self, ApiClient};
use crate::components::{AuthForm, AuthMode, Navbar, ToastStack, Toaster};
use crate::config::API_URL;
use crate::context::{LocaleContext, Navigation, Screen, ThemeContext};
use crate::pages::{
    CreateRecipePage, HomePage, PantryPage, ProfilePage, ProfileVisitPage, RecipeDetailsPage, SettingsPage,
};
use crate::store::{store_auth_checked, store_finish_auth_check, store_is_signed_in, AppState, AppStore};

#[component]
pub fn App() -> impl IntoView {
    // Contexts
    let store: AppStore = Store::new(AppState::default());
    let theme = ThemeContext::init();
    let locale = LocaleContext::init();
    let nav = Navigation::init();
    let api = ApiClient::new(API_URL, locale.locale.into());
    let toaster = Toaster::new(store, locale);

    provide_context(store);
    provide_context(theme);
    provide_context(locale);
    provide_context(nav);
    provide_context(api.clone());
    provide_context(toaster);

    // Translations follow the selected language
    Effect::new({
        let api = api.clone();
        move |_| {
            let selected = locale.locale.get();
            let api = api.clone();
            spawn_local(async move {
                match commands::fetch_translations(&api, selected).await {
                    Ok(table) => {
                        log::debug!("[App] Loaded translations for {}", selected.code());
                        locale.set_translations(table);
                    }
                    Err(e) => log::warn!("[App] Translations for {} failed: {}", selected.code(), e),
                }
            });
        }
    });

    // Back button and pasted links
    let _hashchange = window_event_listener(ev::hashchange, move |_| nav.sync_from_location());

    // Initial session check; a guest answer is not an error
    spawn_local(async move {
        let user = match commands::current_user(&api).await {
            Ok(user) => Some(user),
            Err(ApiError::Auth) => None,
            Err(e) => {
                log::warn!("[App] Session check failed: {}", e);
                None
            }
        };
        store_finish_auth_check(&store, user);
    });

    let screen = move || nav.screen.get().resolve(store_is_signed_in(&store));

    view! {
        <div class="app-layout">
            <Navbar />
            <main class="main-content">
                <Show
                    when=move || store_auth_checked(&store)
                    fallback=|| view! { <div class="spinner" aria-busy="true"></div> }
                >
                    {move || match screen() {
                        Screen::Home => view! { <HomePage /> }.into_any(),
                        Screen::Pantry => view! { <PantryPage /> }.into_any(),
                        Screen::Profile => view! { <ProfilePage /> }.into_any(),
                        Screen::Settings => view! { <SettingsPage /> }.into_any(),
                        Screen::CreateRecipe => view! { <CreateRecipePage /> }.into_any(),
                        Screen::Recipe(id) => view! { <RecipeDetailsPage id=id /> }.into_any(),
                        Screen::User(id) => view! { <ProfileVisitPage id=id /> }.into_any(),
                        Screen::Login => view! { <AuthForm mode=AuthMode::Login /> }.into_any(),
                        Screen::Register => view! { <AuthForm mode=AuthMode::Register /> }.into_any(),
                    }}
                </Show>
            </main>
            <ToastStack />
        </div>
    }
}
