//! Pantry Ingredient Row
//!
//! Inline quantity/unit editor for one pantry entry.

use leptos::prelude::*;

use crate::components::DeleteConfirmButton;
use crate::context::use_locale;
use crate::models::{format_quantity, parse_quantity, Amount, PantryEntry, Unit};

#[component]
pub fn IngredientItem(
    entry: PantryEntry,
    #[prop(into)] busy: Signal<bool>,
    #[prop(into)] on_save: Callback<(u64, Amount)>,
    #[prop(into)] on_delete: Callback<u64>,
) -> impl IntoView {
    let i18n = use_locale();
    let id = entry.ingredient_id;
    let saved = entry.amount();
    let (quantity, set_quantity) = signal(format_quantity(entry.quantity));
    let (unit, set_unit) = signal(entry.unit);

    let edited = move || Amount { quantity: parse_quantity(&quantity.get()), unit: unit.get() };
    let dirty = move || edited() != saved;

    view! {
        <li class="ingredient-item">
            <span class="ingredient-name">{entry.name.clone()}</span>
            <input
                type="number"
                min="1"
                max="99999"
                class="ingredient-quantity"
                placeholder=move || i18n.t("quantity_placeholder")
                prop:value=move || quantity.get()
                on:input=move |ev| set_quantity.set(event_target_value(&ev))
                // normalized on blur
                on:blur=move |_| set_quantity.set(format_quantity(parse_quantity(&quantity.get_untracked())))
            />
            <select
                class="ingredient-unit"
                on:change=move |ev| {
                    if let Some(next) = Unit::from_key(&event_target_value(&ev)) {
                        set_unit.set(next);
                    }
                }
            >
                {Unit::ALL.into_iter().map(|option| view! {
                    <option value=option.key() selected=move || unit.get() == option>
                        {move || i18n.t(option.key())}
                    </option>
                }).collect_view()}
            </select>
            <button
                class="save-btn"
                disabled=move || busy.get() || !dirty()
                title=move || i18n.t("confirm")
                on:click=move |_| on_save.run((id, edited()))
            >
                "✓"
            </button>
            <DeleteConfirmButton
                disabled=busy
                on_confirm=Callback::new(move |_: ()| on_delete.run(id))
            >
                "🗑"
            </DeleteConfirmButton>
        </li>
    }
}
