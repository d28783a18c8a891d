//! Language Select Component

use leptos::prelude::*;

use crate::context::use_locale;
use crate::i18n::Locale;

#[component]
pub fn LanguageSelect() -> impl IntoView {
    let i18n = use_locale();

    let on_change = move |ev: web_sys::Event| {
        if let Some(locale) = Locale::from_code(&event_target_value(&ev)) {
            i18n.set(locale);
        }
    };

    view! {
        <select class="language-select" on:change=on_change>
            {Locale::ALL.into_iter().map(|locale| view! {
                <option
                    value=locale.code()
                    selected=move || i18n.locale.get() == locale
                >
                    {locale.label()}
                </option>
            }).collect_view()}
        </select>
    }
}
