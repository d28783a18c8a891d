//! Localization
//!
//! Supported locales and the translation table served by the API.

use std::collections::HashMap;

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Es, Locale::En];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Locale::Es => "Español",
            Locale::En => "English",
        }
    }

    /// Accepts bare codes and region tags (`en-US`)
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code.split(['-', '_']).next().unwrap_or("").to_ascii_lowercase();
        Locale::ALL.into_iter().find(|locale| locale.code() == primary)
    }
}

/// Stored choice first, then the browser language, then Spanish
pub fn detect(stored: Option<&str>, navigator: Option<&str>) -> Locale {
    stored
        .and_then(Locale::from_code)
        .or_else(|| navigator.and_then(Locale::from_code))
        .unwrap_or_default()
}

/// Flat key -> text table; nested objects become dotted keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translations(HashMap<String, String>);

impl Translations {
    pub fn from_json(value: Value) -> Self {
        let mut table = HashMap::new();
        flatten(String::new(), value, &mut table);
        Self(table)
    }

    /// Text for `key`, or the key itself when missing
    pub fn t(&self, key: &str) -> String {
        self.0.get(key).cloned().unwrap_or_else(|| key.to_string())
    }

    /// Text for `key`, or `fallback` when the table lacks it
    pub fn t_or(&self, key: &str, fallback: &str) -> String {
        self.0.get(key).cloned().unwrap_or_else(|| fallback.to_string())
    }
}

fn flatten(prefix: String, value: Value, table: &mut HashMap<String, String>) {
    match value {
        Value::Object(entries) => {
            for (key, value) in entries {
                let key = if prefix.is_empty() { key } else { format!("{}.{}", prefix, key) };
                flatten(key, value, table);
            }
        }
        Value::String(text) => {
            table.insert(prefix, text);
        }
        Value::Null => {}
        other => {
            table.insert(prefix, other.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_locale_codes() {
        assert_eq!(Locale::from_code("en-US"), Some(Locale::En));
        assert_eq!(Locale::from_code("ES"), Some(Locale::Es));
        assert_eq!(Locale::from_code("fr"), None);
    }

    #[test]
    fn test_detect_order() {
        assert_eq!(detect(Some("en"), Some("es-ES")), Locale::En);
        assert_eq!(detect(Some("de"), Some("en-GB")), Locale::En);
        assert_eq!(detect(None, Some("fr-FR")), Locale::Es);
        assert_eq!(detect(None, None), Locale::Es);
    }

    #[test]
    fn test_nested_keys_and_fallback() {
        let table = Translations::from_json(json!({
            "home": {"title": "Inicio", "searchPlaceholder": "Buscar recetas..."},
            "unit_gr": "gr",
            "count": 3,
        }));
        assert_eq!(table.t("home.title"), "Inicio");
        assert_eq!(table.t("unit_gr"), "gr");
        assert_eq!(table.t("count"), "3");
        assert_eq!(table.t("home.missing"), "home.missing");
    }

    #[test]
    fn test_literal_fallback() {
        let table = Translations::from_json(json!({"error_network": "Sin conexión"}));
        assert_eq!(table.t_or("error_network", "Can't connect with the server"), "Sin conexión");
        assert_eq!(
            Translations::default().t_or("session_expired", "Session expired, please login again"),
            "Session expired, please login again"
        );
    }
}
