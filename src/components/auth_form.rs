//! Auth Form Component
//!
//! Login and registration share one form. Registration runs in two steps:
//! name and email are checked against the server first, and only a free
//! address reveals the password field.

use leptos::prelude::*;
use leptos::task::spawn_local;
use list_sync::ApiError;

use crate::commands::{self, use_api};
use crate::config::NETWORK_ERROR_TEXT;
use crate::context::{use_locale, use_navigation, LocaleContext, Screen};
use crate::store::{store_sign_in, use_app_store};
use crate::validators::{is_blank, is_email_valid, is_password_valid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegisterStep {
    Details,
    Password,
}

/// Translation key of the first failing login rule
pub fn validate_login(email: &str, password: &str) -> Option<&'static str> {
    if is_blank(email) {
        Some("error_empty_email")
    } else if !is_email_valid(email.trim()) {
        Some("error_invalid_email")
    } else if password.trim().is_empty() {
        Some("error_empty_password")
    } else {
        None
    }
}

/// First registration step: name and email
pub fn validate_details(name: &str, email: &str) -> Option<&'static str> {
    if is_blank(name) {
        Some("error_empty_name")
    } else if is_blank(email) {
        Some("error_empty_email")
    } else if !is_email_valid(email.trim()) {
        Some("error_invalid_email")
    } else {
        None
    }
}

/// Second registration step
pub fn validate_new_password(password: &str) -> Option<&'static str> {
    if is_blank(password) {
        Some("error_empty_password")
    } else if !is_password_valid(password) {
        Some("error_invalid_password")
    } else {
        None
    }
}

fn login_error(i18n: LocaleContext, error: ApiError) -> String {
    match error {
        ApiError::Auth => i18n.t("error_invalid_credentials"),
        ApiError::Network(_) => NETWORK_ERROR_TEXT.to_string(),
        // the server may answer with a translation key
        ApiError::Validation(message) | ApiError::Server { message, .. } => i18n.t(&message),
    }
}

fn register_error(i18n: LocaleContext, error: ApiError) -> String {
    match error {
        ApiError::Validation(_) => i18n.t("error_invalid_credentials"),
        ApiError::Network(_) => NETWORK_ERROR_TEXT.to_string(),
        ApiError::Auth | ApiError::Server { .. } => i18n.t("error_general"),
    }
}

#[component]
pub fn AuthForm(mode: AuthMode) -> impl IntoView {
    let i18n = use_locale();
    let nav = use_navigation();
    let store = use_app_store();
    let api = use_api();

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (step, set_step) = signal(RegisterStep::Details);
    let (error, set_error) = signal::<Option<String>>(None);
    let (submitting, set_submitting) = signal(false);

    let show_password = move || mode == AuthMode::Login || step.get() == RegisterStep::Password;

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let (name, email, password) = (name.get_untracked(), email.get_untracked(), password.get_untracked());
        let invalid = match (mode, step.get_untracked()) {
            (AuthMode::Login, _) => validate_login(&email, &password),
            (AuthMode::Register, RegisterStep::Details) => validate_details(&name, &email),
            (AuthMode::Register, RegisterStep::Password) => {
                validate_details(&name, &email).or_else(|| validate_new_password(&password))
            }
        };
        if let Some(key) = invalid {
            set_error.set(Some(i18n.t(key)));
            return;
        }

        set_error.set(None);
        set_submitting.set(true);
        let api = api.clone();
        let current_step = step.get_untracked();
        spawn_local(async move {
            let signed_in = match (mode, current_step) {
                (AuthMode::Login, _) => commands::login(&api, &email, &password)
                    .await
                    .map(Some)
                    .map_err(|e| login_error(i18n, e)),
                (AuthMode::Register, RegisterStep::Details) => {
                    match commands::is_email_registered(&api, &email).await {
                        Ok(true) => Err(i18n.t("error_email_registered")),
                        Ok(false) => {
                            set_step.set(RegisterStep::Password);
                            Ok(None)
                        }
                        Err(e) => Err(register_error(i18n, e)),
                    }
                }
                (AuthMode::Register, RegisterStep::Password) => commands::register(&api, &name, &email, &password)
                    .await
                    .map(Some)
                    .map_err(|e| register_error(i18n, e)),
            };
            set_submitting.set(false);
            match signed_in {
                Ok(Some(user)) => {
                    log::info!("[AuthForm] signed in as {}", user.email);
                    store_sign_in(&store, user);
                    nav.go(Screen::Home);
                }
                Ok(None) => {}
                Err(message) => set_error.set(Some(message)),
            }
        });
    };

    view! {
        <form class="auth-form" on:submit=submit novalidate=true>
            {match mode {
                AuthMode::Login => view! { <h2>{move || i18n.t("login")}</h2> }.into_any(),
                AuthMode::Register => view! {
                    <h2>{move || i18n.t("welcome_register")}</h2>
                    <p class="auth-subtitle">{move || i18n.t("enter_to_create")}</p>
                }.into_any(),
            }}
            {(mode == AuthMode::Register).then(|| view! {
                <input
                    type="text"
                    placeholder=move || i18n.t("input_name")
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
            })}
            <input
                type="email"
                placeholder=move || i18n.t("input_email")
                prop:value=move || email.get()
                on:input=move |ev| {
                    set_email.set(event_target_value(&ev));
                    // a different address must be checked again
                    set_step.set(RegisterStep::Details);
                }
            />
            <Show when=show_password>
                <input
                    type="password"
                    placeholder=move || i18n.t("input_password")
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
            </Show>
            {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
            <button type="submit" disabled=move || submitting.get() aria-busy=move || submitting.get().to_string()>
                {move || i18n.t(if mode == AuthMode::Login { "login" } else { "register" })}
            </button>
            {match mode {
                AuthMode::Login => view! {
                    <button type="button" class="link-btn" on:click=move |_| nav.go(Screen::Register)>
                        {move || i18n.t("register")}
                    </button>
                }.into_any(),
                AuthMode::Register => view! {
                    <button type="button" class="link-btn" on:click=move |_| nav.go(Screen::Login)>
                        {move || i18n.t("change_login")}
                    </button>
                    <p class="auth-terms">{move || i18n.t("terms_conditions_apply")}</p>
                }.into_any(),
            }}
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_rules_in_order() {
        assert_eq!(validate_login("", ""), Some("error_empty_email"));
        assert_eq!(validate_login("ana@", ""), Some("error_invalid_email"));
        assert_eq!(validate_login("ana@example.com", "  "), Some("error_empty_password"));
        // any non-empty password may log in
        assert_eq!(validate_login("ana@example.com", "x"), None);
    }

    #[test]
    fn test_register_details() {
        assert_eq!(validate_details(" ", "ana@example.com"), Some("error_empty_name"));
        assert_eq!(validate_details("Ana", ""), Some("error_empty_email"));
        assert_eq!(validate_details("Ana", "ana@example"), Some("error_invalid_email"));
        assert_eq!(validate_details("Ana", " ana@example.com "), None);
    }

    #[test]
    fn test_register_password() {
        assert_eq!(validate_new_password(""), Some("error_empty_password"));
        assert_eq!(validate_new_password("short"), Some("error_invalid_password"));
        assert_eq!(validate_new_password("tortilla42"), None);
    }
}
