//! Delete Confirm Button Component
//!
//! Two-step delete: the first click asks, the second one runs `on_confirm`.

use leptos::prelude::*;

use crate::context::use_locale;

/// Inline delete confirmation.
///
/// * `children` - content of the initial button
/// * `on_confirm` - runs when the user confirms
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(optional, into)] disabled: Signal<bool>,
    children: ChildrenFn,
) -> impl IntoView {
    let i18n = use_locale();
    let (asking, set_asking) = signal(false);

    view! {
        <Show
            when=move || asking.get()
            fallback=move || view! {
                <button
                    class="delete-btn"
                    disabled=move || disabled.get()
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_asking.set(true);
                    }
                >
                    {children()}
                </button>
            }
        >
            <span class="delete-confirm">
                <button
                    class="confirm-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_asking.set(false);
                        on_confirm.run(());
                    }
                >
                    {move || i18n.t("confirm")}
                </button>
                <button
                    class="cancel-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_asking.set(false);
                    }
                >
                    {move || i18n.t("cancel")}
                </button>
            </span>
        </Show>
    }
}
