//! Toast Notifications
//!
//! Transient messages for mutation results and failures. `Toaster` is the
//! `Notifier` every feed reports to.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use list_sync::{ApiError, Notifier};

use crate::config::{
    NETWORK_ERROR_TEXT, SESSION_EXPIRED_TEXT, TOAST_ERROR_MS, TOAST_SESSION_MS, TOAST_SUCCESS_MS,
};
use crate::context::LocaleContext;
use crate::store::{store_expire_session, AppStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Session,
}

impl ToastKind {
    fn duration_ms(&self) -> u32 {
        match self {
            ToastKind::Success => TOAST_SUCCESS_MS,
            ToastKind::Error => TOAST_ERROR_MS,
            ToastKind::Session => TOAST_SESSION_MS,
        }
    }

    fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
            ToastKind::Session => "toast toast-session",
        }
    }
}

/// Kind and text of the toast raised for a failure. `t_or` looks a key up
/// and falls back to the given text when the table lacks it.
pub fn error_toast(error: &ApiError, t_or: impl Fn(&str, &str) -> String) -> (ToastKind, String) {
    match error {
        ApiError::Network(_) => (ToastKind::Error, t_or("error_network", NETWORK_ERROR_TEXT)),
        ApiError::Auth => (ToastKind::Session, t_or("session_expired", SESSION_EXPIRED_TEXT)),
        ApiError::Validation(message) | ApiError::Server { message, .. } => (ToastKind::Error, message.clone()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub text: String,
}

#[derive(Clone, Copy)]
pub struct Toaster {
    toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u32>,
    store: AppStore,
    locale: LocaleContext,
}

impl Toaster {
    pub fn new(store: AppStore, locale: LocaleContext) -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
            store,
            locale,
        }
    }

    pub fn push(&self, kind: ToastKind, text: String) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id.wrapping_add(1));
        self.toasts.update(|toasts| toasts.push(Toast { id, kind, text }));

        let toasts = self.toasts;
        spawn_local(async move {
            TimeoutFuture::new(kind.duration_ms()).await;
            toasts.try_update(|toasts| toasts.retain(|toast| toast.id != id));
        });
    }

    pub fn dismiss(&self, id: u32) {
        self.toasts.update(|toasts| toasts.retain(|toast| toast.id != id));
    }
}

impl Notifier for Toaster {
    /// Every failure gets a toast; an auth failure also signs the user out
    /// the first time it is seen.
    fn error(&self, error: &ApiError) {
        log::warn!("[Toaster] {}", error);
        if error.is_auth() && store_expire_session(&self.store) {
            log::info!("[Toaster] Session expired, signed out");
        }
        let (kind, text) = error_toast(error, |key, fallback| self.locale.t_or(key, fallback));
        self.push(kind, text);
    }

    fn success(&self, message: &str) {
        self.push(ToastKind::Success, message.to_string());
    }
}

pub fn use_toaster() -> Toaster {
    expect_context::<Toaster>()
}

#[component]
pub fn ToastStack() -> impl IntoView {
    let toaster = use_toaster();

    view! {
        <div class="toast-stack">
            <For
                each=move || toaster.toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.kind.class() role="status" on:click=move |_| toaster.dismiss(id)>
                            {toast.text}
                        </div>
                    }
                }
            />
        </div>
    }
}
