//! Settings Page
//!
//! Account details, language, color theme and sign out.

use leptos::prelude::*;

use crate::components::{use_sign_out, DeleteConfirmButton, LanguageSelect};
use crate::context::{use_locale, use_theme, Theme};
use crate::store::{store_user, use_app_store};

#[component]
pub fn SettingsPage() -> impl IntoView {
    let i18n = use_locale();
    let theme = use_theme();
    let store = use_app_store();
    let sign_out = use_sign_out();

    let row = move |title_key: &'static str, tip_key: Option<&'static str>, control: AnyView| {
        view! {
            <section class="settings-row">
                <div class="settings-label">
                    <span>{move || i18n.t(title_key)}</span>
                    {tip_key.map(|key| view! { <small class="settings-tip">{move || i18n.t(key)}</small> })}
                </div>
                {control}
            </section>
        }
    };

    view! {
        <div class="page settings-page">
            <h1>{move || i18n.t("settings_title")}</h1>

            {move || store_user(&store).map(|user| {
                let since = user.member_since().unwrap_or_default();
                view! {
                    <div class="settings-account">
                        {row("settings_username", None, view! { <span>{user.name.clone()}</span> }.into_any())}
                        {row("settings_email", None, view! { <span>{user.email.clone()}</span> }.into_any())}
                        {row("settings_date_account", None, view! { <span>{since}</span> }.into_any())}
                    </div>
                }
            })}

            {row("settings_language", Some("settings_language_tip"), view! { <LanguageSelect /> }.into_any())}
            {row(
                "settings_color_theme",
                Some("settings_color_theme_tip"),
                view! {
                    <input
                        type="checkbox"
                        prop:checked=move || theme.theme.get() == Theme::Dark
                        on:change=move |_| theme.toggle()
                    />
                }.into_any(),
            )}

            {move || store_user(&store).is_some().then(|| row(
                "settings_sign_out",
                Some("settings_sign_out_tip"),
                view! {
                    <DeleteConfirmButton on_confirm=sign_out>
                        {move || i18n.t("settings_sign_out_confirm")}
                    </DeleteConfirmButton>
                }.into_any(),
            ))}
        </div>
    }
}
