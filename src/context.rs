//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;

use crate::config::{LOCALE_KEY, THEME_KEY};
use crate::i18n::{self, Locale, Translations};

pub fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn read_stored(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

fn write_stored(key: &str, value: &str) {
    let saved = local_storage().map(|storage| storage.set_item(key, value).is_ok());
    if saved != Some(true) {
        log::warn!("[Context] Could not persist {}", key);
    }
}

// ========================
// Theme
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn key(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Color theme, mirrored as the `dark` class on `<html>`
#[derive(Clone, Copy)]
pub struct ThemeContext {
    pub theme: ReadSignal<Theme>,
    set_theme: WriteSignal<Theme>,
}

impl ThemeContext {
    /// Saved choice, else the OS preference
    pub fn init() -> Self {
        let initial = read_stored(THEME_KEY)
            .and_then(|key| Theme::from_key(&key))
            .unwrap_or_else(|| if prefers_dark() { Theme::Dark } else { Theme::Light });
        apply_theme(initial);
        let (theme, set_theme) = signal(initial);
        Self { theme, set_theme }
    }

    pub fn toggle(&self) {
        let next = self.theme.get_untracked().toggled();
        self.set_theme.set(next);
        write_stored(THEME_KEY, next.key());
        apply_theme(next);
    }
}

fn prefers_dark() -> bool {
    web_sys::window()
        .and_then(|window| window.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|query| query.matches())
        .unwrap_or(false)
}

fn apply_theme(theme: Theme) {
    let Some(root) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.document_element())
    else {
        return;
    };
    let classes = root.class_list();
    let applied = match theme {
        Theme::Dark => classes.add_1("dark"),
        Theme::Light => classes.remove_1("dark"),
    };
    if applied.is_err() {
        log::warn!("[Theme] Could not apply {}", theme.key());
    }
}

// ========================
// Locale
// ========================

/// Current language plus the translation table fetched for it
#[derive(Clone, Copy)]
pub struct LocaleContext {
    pub locale: ReadSignal<Locale>,
    set_locale: WriteSignal<Locale>,
    translations: RwSignal<Translations>,
}

impl LocaleContext {
    pub fn init() -> Self {
        let navigator = web_sys::window().and_then(|window| window.navigator().language());
        let initial = i18n::detect(read_stored(LOCALE_KEY).as_deref(), navigator.as_deref());
        let (locale, set_locale) = signal(initial);
        Self {
            locale,
            set_locale,
            translations: RwSignal::new(Translations::default()),
        }
    }

    /// Translated text; tracks the table so views re-render on load
    pub fn t(&self, key: &str) -> String {
        self.translations.with(|table| table.t(key))
    }

    /// Like `t`, with a literal for keys the server table may lack
    pub fn t_or(&self, key: &str, fallback: &str) -> String {
        self.translations.with(|table| table.t_or(key, fallback))
    }

    pub fn set(&self, locale: Locale) {
        if self.locale.get_untracked() == locale {
            return;
        }
        write_stored(LOCALE_KEY, locale.code());
        self.set_locale.set(locale);
    }

    pub fn set_translations(&self, table: Translations) {
        self.translations.set(table);
    }
}

pub fn use_locale() -> LocaleContext {
    expect_context::<LocaleContext>()
}

pub fn use_theme() -> ThemeContext {
    expect_context::<ThemeContext>()
}

// ========================
// Navigation
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Pantry,
    Profile,
    Settings,
    Login,
    Register,
    CreateRecipe,
    Recipe(u64),
    /// Another user's public profile
    User(u64),
}

impl Screen {
    fn needs_user(&self) -> bool {
        matches!(
            self,
            Screen::Pantry | Screen::Profile | Screen::CreateRecipe | Screen::Recipe(_) | Screen::User(_)
        )
    }

    fn guest_only(&self) -> bool {
        matches!(self, Screen::Login | Screen::Register)
    }

    /// Screen actually shown: guests are sent to login, users away from it
    pub fn resolve(self, signed_in: bool) -> Screen {
        if self.needs_user() && !signed_in {
            Screen::Login
        } else if self.guest_only() && signed_in {
            Screen::Home
        } else {
            self
        }
    }

    /// Location fragment of the screen, without the `#`
    pub fn path(&self) -> String {
        match self {
            Screen::Home => "/home".to_string(),
            Screen::Pantry => "/pantry".to_string(),
            Screen::Profile => "/profile".to_string(),
            Screen::Settings => "/settings".to_string(),
            Screen::Login => "/login".to_string(),
            Screen::Register => "/register".to_string(),
            Screen::CreateRecipe => "/create-recipe".to_string(),
            Screen::Recipe(id) => format!("/recipe/{}", id),
            Screen::User(id) => format!("/profile/{}", id),
        }
    }

    /// Inverse of `path`; unknown fragments land on home
    pub fn from_path(path: &str) -> Screen {
        let path = path.trim_start_matches('#').trim_end_matches('/');
        let mut parts = path.trim_start_matches('/').splitn(2, '/');
        let head = parts.next().unwrap_or("");
        let id = parts.next().and_then(|id| id.parse::<u64>().ok());
        match (head, id) {
            ("pantry", None) => Screen::Pantry,
            ("profile", None) => Screen::Profile,
            ("profile", Some(id)) => Screen::User(id),
            ("settings", None) => Screen::Settings,
            ("login", None) => Screen::Login,
            ("register", None) => Screen::Register,
            ("create-recipe", None) => Screen::CreateRecipe,
            ("recipe", Some(id)) => Screen::Recipe(id),
            _ => Screen::Home,
        }
    }
}

/// Current screen, mirrored into the location fragment (`#/recipe/12`) so
/// recipe pages can be shared and the back button works
#[derive(Clone, Copy)]
pub struct Navigation {
    pub screen: ReadSignal<Screen>,
    set_screen: WriteSignal<Screen>,
}

impl Navigation {
    pub fn init() -> Self {
        let initial = location_hash().map(|hash| Screen::from_path(&hash)).unwrap_or(Screen::Home);
        let (screen, set_screen) = signal(initial);
        Self { screen, set_screen }
    }

    pub fn go(&self, screen: Screen) {
        log::debug!("[Navigation] {:?}", screen);
        self.set_screen.set(screen);
        if let Some(location) = web_sys::window().map(|window| window.location()) {
            if location.set_hash(&screen.path()).is_err() {
                log::warn!("[Navigation] Could not update the location");
            }
        }
    }

    /// Follow a fragment changed by the browser (back button, pasted link)
    pub fn sync_from_location(&self) {
        let Some(hash) = location_hash() else { return };
        let screen = Screen::from_path(&hash);
        if self.screen.get_untracked() != screen {
            self.set_screen.set(screen);
        }
    }
}

fn location_hash() -> Option<String> {
    web_sys::window()?.location().hash().ok()
}

pub fn use_navigation() -> Navigation {
    expect_context::<Navigation>()
}
