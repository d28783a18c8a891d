//! Profile Visit Page
//!
//! Another user's name, avatar and public recipes.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands::{self, use_api, RecipeFeed, RecipeSource};
use crate::components::RecipeGrid;
use crate::config::PROFILE_PAGE_SIZE;
use crate::context::use_locale;
use crate::models::User;
use crate::sync::use_feed;

#[component]
pub fn ProfileVisitPage(id: u64) -> impl IntoView {
    let i18n = use_locale();
    let api = use_api();
    let recipes = use_feed(RecipeFeed::new(api.clone(), RecipeSource::PublicOf(id)), PROFILE_PAGE_SIZE);
    let (user, set_user) = signal::<Option<User>>(None);

    spawn_local(async move {
        match commands::user_by_id(&api, id).await {
            Ok(found) => {
                if let Some(document) = web_sys::window().and_then(|window| window.document()) {
                    document.set_title(&format!("Foodmind - {}", found.name));
                }
                set_user.try_set(Some(found));
            }
            // the header stays empty; the recipe list reports on its own
            Err(e) => log::warn!("[ProfileVisit] User {} failed: {}", id, e),
        }
    });

    Effect::new(move |_| {
        i18n.locale.track();
        recipes.reset(String::new());
    });

    view! {
        <div class="page profile-page profile-visit">
            {move || user.get().map(|user| view! {
                <header class="profile-header">
                    <img class="avatar avatar-large" src=user.avatar_url() alt=user.name.clone() />
                    <div>
                        <h1>{user.name.clone()}</h1>
                        {user.member_since().map(|date| view! { <p class="profile-since">{date}</p> })}
                    </div>
                </header>
            })}
            <RecipeGrid
                feed=recipes
                empty_key="profilevisit.norecipescreated"
                empty_hint_key="profilevisit.norecipescreateddesc"
            />
        </div>
    }
}
