//! Build-time Configuration

/// Base URL of the Foodmind API, overridable at build time
pub const API_URL: &str = match option_env!("FOODMIND_API_URL") {
    Some(url) => url,
    None => "http://localhost:8000",
};

/// Page size of the public recipe feed and search
pub const HOME_PAGE_SIZE: u32 = 21;
/// Page size of the profile tabs (own recipes, favourites)
pub const PROFILE_PAGE_SIZE: u32 = 12;
pub const PANTRY_PAGE_SIZE: u32 = 20;

pub const TOAST_ERROR_MS: u32 = 3000;
pub const TOAST_SUCCESS_MS: u32 = 4000;
pub const TOAST_SESSION_MS: u32 = 5000;

pub const NETWORK_ERROR_TEXT: &str = "Can't connect with the server";
pub const SESSION_EXPIRED_TEXT: &str = "Session expired, please login again";

/// Local storage keys
pub const LOCALE_KEY: &str = "i18nextLng";
pub const THEME_KEY: &str = "color-theme";
