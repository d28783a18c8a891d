//! Recipe Card Component

use leptos::prelude::*;

use crate::components::DeleteConfirmButton;
use crate::context::{use_locale, use_navigation, Screen};
use crate::models::Recipe;

/// One recipe of a grid. Clicking the picture or the body opens the recipe.
///
/// Owner actions (privacy, delete) are shown when `on_privacy`/`on_delete`
/// are set; the favourite toggle only for signed-in users.
#[component]
pub fn RecipeCard(
    recipe: Recipe,
    #[prop(into)] signed_in: Signal<bool>,
    #[prop(into)] busy: Signal<bool>,
    #[prop(into)] on_favourite: Callback<(u64, bool)>,
    #[prop(optional_no_strip)] on_privacy: Option<Callback<(u64, bool)>>,
    #[prop(optional_no_strip)] on_delete: Option<Callback<u64>>,
) -> impl IntoView {
    let i18n = use_locale();
    let nav = use_navigation();
    let id = recipe.id;
    let is_favourite = recipe.is_favourite;
    let is_private = recipe.is_private;
    let steps = recipe.steps_count;
    let matched = recipe.ingredient_match();
    let open = move |_: leptos::ev::MouseEvent| nav.go(Screen::Recipe(id));

    view! {
        <article class="recipe-card">
            {recipe.image.clone().map(|src| view! {
                <img class="recipe-image" src=src alt=recipe.name.clone() loading="lazy" on:click=open />
            })}
            <div class="recipe-body" on:click=open>
                <h3 class="recipe-name">{recipe.name.clone()}</h3>
                {recipe.description.clone().map(|text| view! { <p class="recipe-description">{text}</p> })}
                <div class="recipe-meta">
                    <span
                        class="recipe-match"
                        title=move || i18n.t(matched.label_key())
                    >
                        {matched.icon()}
                    </span>
                    <span class="recipe-steps">
                        {move || format!("{} {}", steps, i18n.t("recipe_steps").to_lowercase())}
                    </span>
                    {recipe.types.iter().map(|kind| view! { <span class="recipe-type">{kind.clone()}</span> }).collect_view()}
                </div>
            </div>
            <div class="recipe-actions">
                <Show when=move || signed_in.get()>
                    <button
                        class=if is_favourite { "favourite-btn active" } else { "favourite-btn" }
                        disabled=move || busy.get()
                        on:click=move |_| on_favourite.run((id, !is_favourite))
                    >
                        {if is_favourite { "♥" } else { "♡" }}
                    </button>
                </Show>
                {on_privacy.map(|on_privacy| view! {
                    <button
                        class="privacy-btn"
                        disabled=move || busy.get()
                        on:click=move |_| on_privacy.run((id, !is_private))
                    >
                        {move || i18n.t(if is_private { "recipe_private" } else { "recipe_public" })}
                    </button>
                })}
                {on_delete.map(|on_delete| view! {
                    <DeleteConfirmButton
                        disabled=busy
                        on_confirm=Callback::new(move |_: ()| on_delete.run(id))
                    >
                        {move || i18n.t("delete_recipe")}
                    </DeleteConfirmButton>
                })}
            </div>
        </article>
    }
}
