//! Pantry Page
//!
//! The user's ingredients: add from the catalog, edit amounts in place,
//! delete one or all. The search box filters the loaded entries locally.

use leptos::prelude::*;
use leptos::task::spawn_local;
use list_sync::{Notifier, Phase};

use crate::commands::{self, use_api, NewPantryEntry, PantryFeed};
use crate::components::{error_toast, use_toaster, DeleteConfirmButton, IngredientItem, ToastKind};
use crate::config::PANTRY_PAGE_SIZE;
use crate::context::use_locale;
use crate::models::{parse_quantity, Amount, PantryEntry, PantryField, Unit};
use crate::store::{store_catalog, store_set_catalog, use_app_store};
use crate::sync::use_feed;

#[component]
pub fn PantryPage() -> impl IntoView {
    let i18n = use_locale();
    let store = use_app_store();
    let toaster = use_toaster();
    let api = use_api();
    let feed = use_feed(PantryFeed::new(api.clone()), PANTRY_PAGE_SIZE);

    let (filter, set_filter) = signal(String::new());
    let (new_ingredient, set_new_ingredient) = signal::<Option<u64>>(None);
    let (new_quantity, set_new_quantity) = signal(String::from("1"));
    let (new_unit, set_new_unit) = signal(Unit::default());
    let (adding, set_adding) = signal(false);

    Effect::new(move |_| {
        i18n.locale.track();
        feed.reset(String::new());
    });

    // Catalog is cached for the session
    if store_catalog(&store).is_empty() {
        let api = api.clone();
        spawn_local(async move {
            match commands::ingredient_catalog(&api).await {
                Ok(catalog) => store_set_catalog(&store, catalog),
                Err(e) => toaster.error(&e),
            }
        });
    }

    let visible = move || {
        let query = filter.get();
        feed.items()
            .into_iter()
            .filter(|entry| entry.matches(&query))
            .collect::<Vec<_>>()
    };

    let add = {
        let api = api.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            let Some(ingredient_id) = new_ingredient.get_untracked() else {
                toaster.push(ToastKind::Error, i18n.t("ingredient_error"));
                return;
            };
            let amount = Amount {
                quantity: parse_quantity(&new_quantity.get_untracked()),
                unit: new_unit.get_untracked(),
            };
            let name = store_catalog(&store)
                .into_iter()
                .find(|ingredient| ingredient.id == ingredient_id)
                .map(|ingredient| ingredient.name)
                .unwrap_or_default();

            set_adding.set(true);
            let api = api.clone();
            spawn_local(async move {
                let result = commands::add_to_pantry(&api, &NewPantryEntry::new(ingredient_id, amount)).await;
                set_adding.set(false);
                match result {
                    Ok(ack) => {
                        if !ack.message.is_empty() {
                            toaster.success(&ack.message);
                        }
                        feed.insert_confirmed(PantryEntry {
                            ingredient_id,
                            name,
                            quantity: amount.quantity,
                            unit: amount.unit,
                        });
                        set_new_ingredient.set(None);
                        set_new_quantity.set(String::from("1"));
                    }
                    Err(e) => toaster.error(&e),
                }
            });
        }
    };

    let clean = Callback::new(move |_: ()| {
        let api = api.clone();
        spawn_local(async move {
            match commands::clean_pantry(&api).await {
                Ok(ack) => {
                    if !ack.message.is_empty() {
                        toaster.success(&ack.message);
                    }
                    feed.clear_confirmed();
                }
                Err(e) => toaster.error(&e),
            }
        });
    });

    let on_save = Callback::new(move |(id, amount): (u64, Amount)| feed.patch(id, PantryField::Amount, amount));
    let on_delete = Callback::new(move |id: u64| feed.remove(id));

    view! {
        <div class="page pantry-page">
            <h1>{move || i18n.t("title_pantry")}</h1>

            <form class="pantry-add" on:submit=add>
                <select
                    on:change=move |ev| set_new_ingredient.set(event_target_value(&ev).parse().ok())
                >
                    <option value="" selected=move || new_ingredient.get().is_none()>
                        {move || i18n.t("select_ingredient")}
                    </option>
                    <For
                        each=move || store_catalog(&store)
                        key=|ingredient| ingredient.id
                        children=move |ingredient| {
                            let id = ingredient.id;
                            view! {
                                <option value=id.to_string() selected=move || new_ingredient.get() == Some(id)>
                                    {ingredient.name}
                                </option>
                            }
                        }
                    />
                </select>
                <input
                    type="number"
                    min="1"
                    max="99999"
                    placeholder=move || i18n.t("quantity_placeholder")
                    prop:value=move || new_quantity.get()
                    on:input=move |ev| set_new_quantity.set(event_target_value(&ev))
                />
                <select on:change=move |ev| {
                    if let Some(unit) = Unit::from_key(&event_target_value(&ev)) {
                        set_new_unit.set(unit);
                    }
                }>
                    {Unit::ALL.into_iter().map(|unit| view! {
                        <option value=unit.key() selected=move || new_unit.get() == unit>
                            {move || i18n.t(unit.key())}
                        </option>
                    }).collect_view()}
                </select>
                <button type="submit" disabled=move || adding.get()>{move || i18n.t("add")}</button>
            </form>

            <div class="pantry-toolbar">
                <input
                    type="search"
                    placeholder=move || i18n.t("search_ingredient")
                    prop:value=move || filter.get()
                    on:input=move |ev| set_filter.set(event_target_value(&ev))
                />
                <Show when=move || !feed.items().is_empty()>
                    <DeleteConfirmButton on_confirm=clean>
                        {move || i18n.t("modal_cleanpantry_title")}
                    </DeleteConfirmButton>
                </Show>
            </div>

            <Show when=move || feed.phase() == Phase::Loading>
                <div class="spinner" aria-busy="true"></div>
            </Show>
            <Show when=move || feed.phase() == Phase::ErrorFirstPage>
                <div class="feed-error">
                    <p>{move || feed.last_error().map(|error| error_toast(&error, |key, fallback| i18n.t_or(key, fallback)).1)}</p>
                    <button class="retry-btn" on:click=move |_| feed.retry()>"↻"</button>
                </div>
            </Show>
            <Show when=move || feed.phase() == Phase::Ready && visible().is_empty()>
                <div class="feed-empty">
                    <p class="feed-empty-title">{move || i18n.t(if filter.get().trim().is_empty() { "empty_pantry" } else { "no_results" })}</p>
                    <p class="feed-empty-hint">{move || i18n.t("add_ingredients")}</p>
                </div>
            </Show>

            <ul class="pantry-list">
                <For
                    each=visible
                    key=|entry| (entry.ingredient_id, entry.quantity.to_bits(), entry.unit)
                    children=move |entry| {
                        let id = entry.ingredient_id;
                        let busy = Signal::derive(move || feed.is_pending(&id, PantryField::Amount));
                        view! {
                            <IngredientItem entry=entry busy=busy on_save=on_save on_delete=on_delete />
                        }
                    }
                />
            </ul>

            <Show when=move || feed.has_more() && feed.phase() != Phase::Loading>
                <button
                    class="load-more-btn"
                    disabled=move || feed.phase() == Phase::LoadingMore
                    on:click=move |_| feed.load_more()
                >
                    "↓"
                </button>
            </Show>
        </div>
    }
}
