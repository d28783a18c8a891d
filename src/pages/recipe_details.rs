//! Recipe Details Page
//!
//! One recipe with its ingredients and steps. The favourite and privacy
//! toggles go through a one-item feed; an unknown recipe sends the user home.

use leptos::prelude::*;
use leptos::task::spawn_local;
use list_sync::{Notifier, Phase};

use crate::commands::{self, use_api, RecipeDetailFeed};
use crate::components::{use_toaster, DeleteConfirmButton, ShareModal};
use crate::context::{use_locale, use_navigation, Screen};
use crate::models::{capitalize, format_quantity, RecipeField, RecipeIngredient};
use crate::store::{store_user, use_app_store};
use crate::sync::use_feed;

/// Right-hand side of an ingredient line: `250 g`, or `To taste`
pub fn amount_text(ingredient: &RecipeIngredient, t: impl Fn(&str) -> String) -> String {
    if ingredient.is_to_taste() {
        capitalize(&t(&ingredient.unit))
    } else {
        format!("{} {}", format_quantity(ingredient.quantity), t(&ingredient.unit))
    }
}

#[component]
pub fn RecipeDetailsPage(id: u64) -> impl IntoView {
    let i18n = use_locale();
    let nav = use_navigation();
    let store = use_app_store();
    let toaster = use_toaster();
    let api = use_api();
    let feed = use_feed(RecipeDetailFeed::new(api.clone(), id), 1);
    let (sharing, set_sharing) = signal(false);

    Effect::new(move |_| {
        i18n.locale.track();
        feed.reset(String::new());
    });

    Effect::new(move |_| {
        let phase = feed.phase();
        let missing = phase == Phase::ErrorFirstPage || (phase == Phase::Ready && feed.items().is_empty());
        if missing {
            log::info!("[RecipeDetails] Recipe {} unavailable", id);
            nav.go(Screen::Home);
        }
    });

    let delete = Callback::new(move |_: ()| {
        let api = api.clone();
        spawn_local(async move {
            match commands::delete_recipe(&api, id).await {
                Ok(ack) => {
                    if !ack.message.is_empty() {
                        toaster.success(&ack.message);
                    }
                    nav.go(Screen::Home);
                }
                Err(e) => toaster.error(&e),
            }
        });
    });

    let page_url = move || {
        web_sys::window()
            .and_then(|window| window.location().href().ok())
            .unwrap_or_default()
    };

    view! {
        <div class="page recipe-details-page">
            <Show when=move || feed.phase() == Phase::Loading>
                <div class="spinner" aria-busy="true"></div>
            </Show>
            {move || feed.items().into_iter().next().map(|recipe| {
                let summary = recipe.summary.clone();
                let is_owner = recipe.is_created_by(store_user(&store).as_ref());
                let busy = Signal::derive(move || {
                    feed.is_pending(&id, RecipeField::Favourite) || feed.is_pending(&id, RecipeField::Private)
                });
                let is_favourite = summary.is_favourite;
                let is_private = summary.is_private;
                let matched = summary.ingredient_match();
                let creator_id = recipe.creator.id;
                let creator_name = capitalize(&recipe.creator.name);

                view! {
                    {summary.image.clone().map(|src| view! {
                        <img class="recipe-hero" src=src alt=summary.name.clone() />
                    })}
                    <header class="recipe-head">
                        <div>
                            <h1>{capitalize(&summary.name)}</h1>
                            <button class="link-btn recipe-creator" on:click=move |_| nav.go(Screen::User(creator_id))>
                                {move || format!("{} {}", i18n.t("created_by"), creator_name)}
                            </button>
                        </div>
                        <div class="recipe-actions">
                            <span class="recipe-match" title=move || i18n.t(matched.label_key())>{matched.icon()}</span>
                            <button
                                class="privacy-btn"
                                title=move || i18n.t(if is_private { "recipe_private" } else { "recipe_public" })
                                disabled=move || !is_owner || busy.get()
                                on:click=move |_| feed.patch(id, RecipeField::Private, !is_private)
                            >
                                {if is_private { "🔒" } else { "🔓" }}
                            </button>
                            {is_owner.then(|| view! {
                                <DeleteConfirmButton disabled=busy on_confirm=delete>
                                    <span title=move || i18n.t("delete_recipe_message")>"🗑"</span>
                                </DeleteConfirmButton>
                            })}
                            <button
                                class=if is_favourite { "favourite-btn active" } else { "favourite-btn" }
                                disabled=move || busy.get()
                                on:click=move |_| feed.patch(id, RecipeField::Favourite, !is_favourite)
                            >
                                {if is_favourite { "♥" } else { "♡" }}
                            </button>
                            <button class="share-btn" on:click=move |_| set_sharing.set(true)>"⤴"</button>
                        </div>
                    </header>

                    <div class="recipe-types">
                        {summary.types.iter().map(|kind| view! { <span class="recipe-type">{kind.clone()}</span> }).collect_view()}
                    </div>

                    <section class="recipe-section">
                        <h2>{move || i18n.t("recipe_description")}</h2>
                        <p>{summary.description.clone().unwrap_or_default()}</p>
                    </section>

                    <section class="recipe-section">
                        <h2>{move || i18n.t("recipe_ingredients")}</h2>
                        <ul class="recipe-ingredients">
                            {recipe.ingredients.iter().cloned().map(|ingredient| view! {
                                <li>
                                    <strong>{format!("{}:", capitalize(&ingredient.name))}</strong>
                                    <span>{move || amount_text(&ingredient, |key| i18n.t(key))}</span>
                                </li>
                            }).collect_view()}
                        </ul>
                    </section>

                    <section class="recipe-section">
                        <h2>{move || i18n.t("recipe_steps")}</h2>
                        <ol class="recipe-steps">
                            {recipe.steps.iter().cloned().enumerate().map(|(index, step)| view! {
                                <li>
                                    <strong>{move || format!("{} {}:", i18n.t("recipe_step"), index + 1)}</strong>
                                    <span>{step}</span>
                                </li>
                            }).collect_view()}
                        </ol>
                    </section>
                }
            })}
            <Show when=move || sharing.get()>
                <ShareModal page_url=page_url() on_close=move |_| set_sharing.set(false) />
            </Show>
        </div>
    }
}
