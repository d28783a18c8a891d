//! Global Application State Store
//!
//! Session-wide state with field-level reactivity. Per-page lists live in
//! their own feeds (see `sync`), not here.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::{CatalogIngredient, User};

#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Signed-in user, `None` for guests
    pub user: Option<User>,
    /// Set once the initial `/api/user` check finished
    pub auth_checked: bool,
    /// Server rejected the session; the user is signed out once per session
    pub session_expired: bool,
    /// Ingredients offered by the pantry add form
    pub ingredient_catalog: Vec<CatalogIngredient>,
}

pub type AppStore = Store<AppState>;

pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_user(store: &AppStore) -> Option<User> {
    store.user().get()
}

pub fn store_is_signed_in(store: &AppStore) -> bool {
    store.user().with(Option::is_some)
}

pub fn store_auth_checked(store: &AppStore) -> bool {
    store.auth_checked().get()
}

/// Record the outcome of the initial session check
pub fn store_finish_auth_check(store: &AppStore, user: Option<User>) {
    store.user().set(user);
    store.auth_checked().set(true);
}

pub fn store_sign_in(store: &AppStore, user: User) {
    store.user().set(Some(user));
    store.session_expired().set(false);
}

pub fn store_sign_out(store: &AppStore) {
    store.user().set(None);
    store.ingredient_catalog().write().clear();
}

/// Drop the user after an auth failure. Returns `false` when the session was
/// already marked expired and nothing changed.
pub fn store_expire_session(store: &AppStore) -> bool {
    if store.session_expired().get_untracked() {
        return false;
    }
    store.session_expired().set(true);
    store_sign_out(store);
    true
}

pub fn store_catalog(store: &AppStore) -> Vec<CatalogIngredient> {
    store.ingredient_catalog().get()
}

pub fn store_set_catalog(store: &AppStore, catalog: Vec<CatalogIngredient>) {
    *store.ingredient_catalog().write() = catalog;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User { id: 5, name: "Ana".to_string(), email: String::new(), avatar: None, created_at: None }
    }

    #[test]
    fn test_session_expires_once_until_next_login() {
        let store: AppStore = Store::new(AppState::default());
        store_finish_auth_check(&store, Some(user()));

        assert!(store_expire_session(&store));
        assert!(!store_is_signed_in(&store));
        assert!(!store_expire_session(&store));

        store_sign_in(&store, user());
        assert!(store_expire_session(&store));
    }
}
