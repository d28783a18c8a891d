//! Translation Commands

use list_sync::ApiError;
use serde_json::Value;

use super::ApiClient;
use crate::i18n::{Locale, Translations};

pub async fn fetch_translations(api: &ApiClient, locale: Locale) -> Result<Translations, ApiError> {
    let value: Value = api.get_public(&format!("/api/translations/{}", locale.code())).await?;
    Ok(Translations::from_json(value))
}
