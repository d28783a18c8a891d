//! Recipe Grid Component
//!
//! Renders a recipe feed with its loading, empty, error and end states, and
//! routes card actions into the feed's optimistic mutations.

use leptos::prelude::*;
use list_sync::Phase;

use crate::commands::RecipeFeed;
use crate::components::{error_toast, RecipeCard};
use crate::context::use_locale;
use crate::models::RecipeField;
use crate::store::{store_is_signed_in, use_app_store};
use crate::sync::FeedHandle;

#[component]
pub fn RecipeGrid(
    feed: FeedHandle<RecipeFeed>,
    /// Show privacy and delete actions
    #[prop(optional)]
    owner: bool,
    /// Title shown when the list is empty
    #[prop(into)]
    empty_key: Signal<&'static str>,
    /// Second line under the empty title
    #[prop(optional)]
    empty_hint_key: Option<&'static str>,
    /// Message under the last page
    #[prop(optional)]
    end_key: Option<&'static str>,
) -> impl IntoView {
    let i18n = use_locale();
    let store = use_app_store();
    let signed_in = Signal::derive(move || store_is_signed_in(&store));

    let on_favourite = Callback::new(move |(id, value): (u64, bool)| {
        feed.patch(id, RecipeField::Favourite, value);
    });
    let on_privacy = owner.then(|| {
        Callback::new(move |(id, value): (u64, bool)| feed.patch(id, RecipeField::Private, value))
    });
    let on_delete = owner.then(|| Callback::new(move |id: u64| feed.remove(id)));

    view! {
        <section class="recipe-grid-section">
            <Show when=move || feed.phase() == Phase::Loading>
                <div class="spinner" aria-busy="true"></div>
            </Show>
            <Show when=move || feed.phase() == Phase::ErrorFirstPage>
                <div class="feed-error">
                    <p>{move || feed.last_error().map(|error| error_toast(&error, |key, fallback| i18n.t_or(key, fallback)).1)}</p>
                    <button class="retry-btn" on:click=move |_| feed.retry()>"↻"</button>
                </div>
            </Show>
            <Show when=move || feed.phase() == Phase::Ready && feed.items().is_empty()>
                <div class="feed-empty">
                    <p class="feed-empty-title">{move || i18n.t(empty_key.get())}</p>
                    {empty_hint_key.map(|key| view! { <p class="feed-empty-hint">{move || i18n.t(key)}</p> })}
                </div>
            </Show>

            <div class="recipe-grid">
                <For
                    each=move || feed.items()
                    key=|recipe| (recipe.id, recipe.is_favourite, recipe.is_private)
                    children=move |recipe| {
                        let id = recipe.id;
                        let busy = Signal::derive(move || {
                            feed.is_pending(&id, RecipeField::Favourite) || feed.is_pending(&id, RecipeField::Private)
                        });
                        view! {
                            <RecipeCard
                                recipe=recipe
                                signed_in=signed_in
                                busy=busy
                                on_favourite=on_favourite
                                on_privacy=on_privacy
                                on_delete=on_delete
                            />
                        }
                    }
                />
            </div>

            <Show when=move || feed.phase() == Phase::ErrorAppend>
                <p class="feed-error">{move || feed.last_error().map(|error| error_toast(&error, |key, fallback| i18n.t_or(key, fallback)).1)}</p>
            </Show>
            <Show when=move || feed.has_more() && matches!(feed.phase(), Phase::Ready | Phase::ErrorAppend | Phase::LoadingMore)>
                <button
                    class="load-more-btn"
                    disabled=move || feed.phase() == Phase::LoadingMore
                    aria-busy=move || (feed.phase() == Phase::LoadingMore).to_string()
                    on:click=move |_| feed.load_more()
                >
                    "↓"
                </button>
            </Show>
            {end_key.map(|key| view! {
                <Show when=move || !feed.has_more() && feed.phase() == Phase::Ready && !feed.items().is_empty()>
                    <p class="feed-end">{move || i18n.t(key)}</p>
                </Show>
            })}
        </section>
    }
}
