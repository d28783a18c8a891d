//! Create Recipe Page
//!
//! Bilingual recipe form. Problems are listed under their fields once the
//! user tried to submit, and follow the draft from then on.

use leptos::prelude::*;
use leptos::task::spawn_local;
use list_sync::Notifier;
use wasm_bindgen_futures::JsFuture;

use crate::commands::{self, use_api};
use crate::components::use_toaster;
use crate::context::{use_locale, use_navigation, Screen};
use crate::i18n::Locale;
use crate::models::{RecipeType, Unit};
use crate::recipe_form::{check_image, Bilingual, IngredientLine, NewRecipe, RecipeFormError, RecipeImage, IMAGE_ACCEPT};
use crate::store::{store_catalog, store_set_catalog, use_app_store};

/// Bilingual text fields of the draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    Name,
    Description,
}

impl TextField {
    fn of(self, draft: &NewRecipe) -> &Bilingual {
        match self {
            TextField::Name => &draft.names,
            TextField::Description => &draft.descriptions,
        }
    }

    fn of_mut(self, draft: &mut NewRecipe) -> &mut Bilingual {
        match self {
            TextField::Name => &mut draft.names,
            TextField::Description => &mut draft.descriptions,
        }
    }

    /// e.g. `recipes.create.namePlaceholderEnglish`
    fn placeholder_key(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (TextField::Name, Locale::Es) => "recipes.create.namePlaceholderSpanish",
            (TextField::Name, Locale::En) => "recipes.create.namePlaceholderEnglish",
            (TextField::Description, Locale::Es) => "recipes.create.descriptionPlaceholderSpanish",
            (TextField::Description, Locale::En) => "recipes.create.descriptionPlaceholderEnglish",
        }
    }
}

fn edit_line(draft: RwSignal<NewRecipe>, index: usize, change: impl FnOnce(&mut IngredientLine)) {
    draft.update(|draft| {
        if let Some(line) = draft.ingredients.get_mut(index) {
            change(line);
        }
    });
}

#[component]
pub fn CreateRecipePage() -> impl IntoView {
    let i18n = use_locale();
    let nav = use_navigation();
    let store = use_app_store();
    let toaster = use_toaster();
    let api = use_api();

    let draft = RwSignal::new(NewRecipe::default());
    let (recipe_types, set_recipe_types) = signal::<Vec<RecipeType>>(Vec::new());
    let (image_error, set_image_error) = signal::<Option<RecipeFormError>>(None);
    let (submitted, set_submitted) = signal(false);
    let (sending, set_sending) = signal(false);

    let errors = Memo::new(move |_| {
        if submitted.get() {
            draft.with(NewRecipe::validate)
        } else {
            Vec::new()
        }
    });
    let has_error = move |wanted: fn(&RecipeFormError) -> bool| errors.with(|errors| errors.iter().any(wanted));
    let error_line = move |wanted: fn(&RecipeFormError) -> bool, key: &'static str| {
        view! {
            <Show when=move || has_error(wanted)>
                <p class="form-error">{move || i18n.t(key)}</p>
            </Show>
        }
    };

    {
        let api = api.clone();
        spawn_local(async move {
            if store_catalog(&store).is_empty() {
                match commands::ingredient_catalog(&api).await {
                    Ok(catalog) => store_set_catalog(&store, catalog),
                    Err(e) => toaster.error(&e),
                }
            }
            match commands::recipe_types(&api).await {
                Ok(types) => {
                    set_recipe_types.try_set(types);
                }
                Err(e) => toaster.error(&e),
            }
        });
    }

    let ingredient_rows = Memo::new(move |_| draft.with(|draft| draft.ingredients.len()));
    let step_rows = Memo::new(move |_| draft.with(|draft| draft.steps.len()));

    let pick_image = move |ev: web_sys::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            draft.update(|draft| draft.image = None);
            return;
        };
        if let Err(error) = check_image(&file.type_(), file.size() as u64) {
            set_image_error.set(Some(error));
            draft.update(|draft| draft.image = None);
            return;
        }
        set_image_error.set(None);
        spawn_local(async move {
            match JsFuture::from(file.array_buffer()).await {
                Ok(buffer) => {
                    let image = RecipeImage {
                        file_name: file.name(),
                        mime: file.type_(),
                        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
                    };
                    draft.try_update(|draft| draft.image = Some(image));
                }
                Err(e) => log::warn!("[CreateRecipe] Could not read image: {:?}", e),
            }
        });
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_submitted.set(true);
        if sending.get_untracked() || !draft.with_untracked(NewRecipe::validate).is_empty() {
            return;
        }
        set_sending.set(true);
        let api = api.clone();
        let recipe = draft.get_untracked();
        spawn_local(async move {
            let result = commands::create_recipe(&api, &recipe).await;
            set_sending.try_set(false);
            match result {
                Ok(ack) => {
                    log::info!("[CreateRecipe] Recipe created");
                    if !ack.message.is_empty() {
                        toaster.success(&ack.message);
                    }
                    nav.go(Screen::Profile);
                }
                Err(e) => toaster.error(&e),
            }
        });
    };

    let bilingual_inputs = move |field: TextField, multiline: bool| {
        Locale::ALL
            .into_iter()
            .map(|locale| {
                let placeholder = move || i18n.t(field.placeholder_key(locale));
                let value = move || draft.with(|draft| field.of(draft).get(locale).to_string());
                let set = move |ev: web_sys::Event| draft.update(|draft| field.of_mut(draft).set(locale, event_target_value(&ev)));
                if multiline {
                    view! { <textarea placeholder=placeholder prop:value=value on:input=set></textarea> }.into_any()
                } else {
                    view! { <input type="text" placeholder=placeholder prop:value=value on:input=set /> }.into_any()
                }
            })
            .collect_view()
    };

    view! {
        <form class="page create-recipe-page" on:submit=submit novalidate=true>
            <h1>{move || i18n.t("recipes.create.title")}</h1>

            <section class="form-section">
                <h2>{move || i18n.t("recipes.create.name")}</h2>
                {bilingual_inputs(TextField::Name, false)}
                {error_line(|error| *error == RecipeFormError::Name, "name_error")}
            </section>

            <section class="form-section">
                <h2>{move || i18n.t("recipes.create.description")}</h2>
                {bilingual_inputs(TextField::Description, true)}
                {error_line(|error| *error == RecipeFormError::Description, "recipes.create.descriptionError")}
            </section>

            <section class="form-section">
                <h2>{move || i18n.t("recipes.create.ingredients")}</h2>
                {move || (0..ingredient_rows.get()).map(|index| {
                    let line = move || draft.with(|draft| draft.ingredients.get(index).cloned().unwrap_or_default());
                    view! {
                        <div class="ingredient-row">
                            <select on:change=move |ev| {
                                let id = event_target_value(&ev).parse::<u64>().ok();
                                edit_line(draft, index, |line| line.ingredient_id = id);
                            }>
                                <option value="" selected=move || line().ingredient_id.is_none()>
                                    {move || i18n.t("select_ingredient")}
                                </option>
                                <For
                                    each=move || store_catalog(&store)
                                    key=|ingredient| ingredient.id
                                    children=move |ingredient| {
                                        let id = ingredient.id;
                                        view! {
                                            <option value=id.to_string() selected=move || line().ingredient_id == Some(id)>
                                                {ingredient.name}
                                            </option>
                                        }
                                    }
                                />
                            </select>
                            <input
                                type="number"
                                min="0.01"
                                step="0.01"
                                placeholder=move || i18n.t("quantity")
                                prop:value=move || line().quantity
                                on:input=move |ev| {
                                    let quantity = event_target_value(&ev);
                                    edit_line(draft, index, |line| line.quantity = quantity);
                                }
                            />
                            <select on:change=move |ev| {
                                if let Some(unit) = Unit::from_key(&event_target_value(&ev)) {
                                    edit_line(draft, index, |line| line.unit = unit);
                                }
                            }>
                                {Unit::ALL.into_iter().map(|unit| view! {
                                    <option value=unit.key() selected=move || line().unit == unit>
                                        {move || i18n.t(unit.key())}
                                    </option>
                                }).collect_view()}
                            </select>
                            <button
                                type="button"
                                class="remove-btn"
                                disabled=move || ingredient_rows.get() <= 1
                                on:click=move |_| draft.update(|draft| {
                                    if index < draft.ingredients.len() {
                                        draft.ingredients.remove(index);
                                    }
                                })
                            >
                                "✕"
                            </button>
                            <Show when=move || has_error_at(errors, index, true)>
                                <p class="form-error">{move || i18n.t("ingredient_error")}</p>
                            </Show>
                            <Show when=move || has_error_at(errors, index, false)>
                                <p class="form-error">{move || i18n.t("quantity_error")}</p>
                            </Show>
                        </div>
                    }
                }).collect_view()}
                <button
                    type="button"
                    class="add-row-btn"
                    on:click=move |_| draft.update(|draft| draft.ingredients.push(IngredientLine::default()))
                >
                    "+"
                </button>
            </section>

            <section class="form-section">
                <h2>{move || i18n.t("recipes.create.steps")}</h2>
                {move || (0..step_rows.get()).map(|index| {
                    let inputs = Locale::ALL.into_iter().map(|locale| view! {
                        <textarea
                            placeholder=move || i18n.t("recipes.create.stepPlaceholder")
                            prop:value=move || draft.with(|draft| {
                                draft.steps.get(index).map(|step| step.get(locale).to_string()).unwrap_or_default()
                            })
                            on:input=move |ev| {
                                let text = event_target_value(&ev);
                                draft.update(|draft| {
                                    if let Some(step) = draft.steps.get_mut(index) {
                                        step.set(locale, text);
                                    }
                                });
                            }
                        ></textarea>
                    }).collect_view();
                    view! {
                        <div class="step-row">
                            <label>{move || format!("{} {}", i18n.t("recipes.create.step"), index + 1)}</label>
                            {inputs}
                            <button
                                type="button"
                                class="remove-btn"
                                title=move || i18n.t("recipes.create.removeStep")
                                disabled=move || step_rows.get() <= 1
                                on:click=move |_| draft.update(|draft| {
                                    if index < draft.steps.len() {
                                        draft.steps.remove(index);
                                    }
                                })
                            >
                                "✕"
                            </button>
                            <Show when=move || errors.with(|errors| errors.contains(&RecipeFormError::Step(index)))>
                                <p class="form-error">{move || i18n.t("recipes.create.stepRequired")}</p>
                            </Show>
                        </div>
                    }
                }).collect_view()}
                <button
                    type="button"
                    class="add-row-btn"
                    on:click=move |_| draft.update(|draft| draft.steps.push(Bilingual::default()))
                >
                    "+"
                </button>
            </section>

            <section class="form-section">
                <h2>{move || i18n.t("recipes.create.types")}</h2>
                <div class="type-options">
                    <For
                        each=move || recipe_types.get()
                        key=|kind| kind.id
                        children=move |kind| {
                            let id = kind.id;
                            view! {
                                <label class="type-option">
                                    <input
                                        type="checkbox"
                                        prop:checked=move || draft.with(|draft| draft.types.contains(&id))
                                        on:change=move |_| draft.update(|draft| {
                                            if let Some(at) = draft.types.iter().position(|picked| *picked == id) {
                                                draft.types.remove(at);
                                            } else {
                                                draft.types.push(id);
                                            }
                                        })
                                    />
                                    {kind.name}
                                </label>
                            }
                        }
                    />
                </div>
                {error_line(|error| *error == RecipeFormError::Types, "recipes.create.typesRequired")}
            </section>

            <section class="form-section">
                <label class="private-option">
                    <input
                        type="checkbox"
                        prop:checked=move || draft.with(|draft| draft.is_private)
                        on:change=move |_| draft.update(|draft| draft.is_private = !draft.is_private)
                    />
                    {move || i18n.t("recipes.create.isPrivate")}
                </label>
                <small>{move || i18n.t("recipes.create.isPrivateDescription")}</small>
            </section>

            <section class="form-section">
                <h2>{move || i18n.t("recipes.create.image")}</h2>
                <input type="file" accept=IMAGE_ACCEPT on:change=pick_image />
                <small>{move || format!("{} · {}", i18n.t("recipes.create.uploadHint"), i18n.t("recipes.create.imageFormats"))}</small>
                {move || {
                    let shown = image_error.get().or_else(|| {
                        errors.with(|errors| {
                            errors.iter().copied().find(|error| {
                                matches!(
                                    error,
                                    RecipeFormError::ImageRequired
                                        | RecipeFormError::ImageTooLarge
                                        | RecipeFormError::ImageFormat
                                )
                            })
                        })
                    });
                    shown.map(|error| view! { <p class="form-error">{move || i18n.t(error.key())}</p> })
                }}
            </section>

            <button type="submit" disabled=move || sending.get() aria-busy=move || sending.get().to_string()>
                {move || i18n.t("recipes.create.submit")}
            </button>
        </form>
    }
}

/// Whether ingredient row `index` has a missing ingredient (`ingredient`) or
/// a bad quantity (`!ingredient`)
fn has_error_at(errors: Memo<Vec<RecipeFormError>>, index: usize, ingredient: bool) -> bool {
    let wanted = if ingredient {
        RecipeFormError::Ingredient(index)
    } else {
        RecipeFormError::Quantity(index)
    };
    errors.with(|errors| errors.contains(&wanted))
}
