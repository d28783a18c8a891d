//! Fetch Gateway Contract
//!
//! Boundary between the synchronizer and the HTTP layer.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ApiError;
use crate::optimistic::{Change, Field, KeyOf, Keyed};
use crate::page::{Page, PageRequest};

/// Server acknowledgement of a write.
///
/// Any 2xx answer is a success whatever its body looks like; the body only
/// contributes the text of the confirmation toast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    /// Raw response text. Empty or non-JSON bodies give an empty ack.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str::<Value>(body)
            .map(|value| Self::from_value(&value))
            .unwrap_or_default()
    }

    /// `message` wins over `success`; only string values count.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|text| !text.trim().is_empty())
        };
        Self {
            message: text("message").or_else(|| text("success")).unwrap_or_default().to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for Ack {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Self::from_value(&value))
    }
}

/// Paginated source plus the writes that can be applied to its items.
///
/// The gateway picks the endpoint variant: a blank `PageRequest::query`
/// means the unfiltered listing, anything else a search.
#[async_trait(?Send)]
pub trait FetchGateway {
    type Item: Keyed + Clone;
    type Field: Field<Self::Item>;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Self::Item>, ApiError>;

    async fn mutate(
        &self,
        target: &KeyOf<Self::Item>,
        change: &Change<Self::Item, Self::Field>,
    ) -> Result<Ack, ApiError>;
}

/// Side channel for user-visible notifications (toasts)
pub trait Notifier {
    fn error(&self, error: &ApiError);

    fn success(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_accepts_any_body_shape() {
        assert_eq!(Ack::from_body(""), Ack::default());
        assert_eq!(Ack::from_body("null"), Ack::default());
        assert_eq!(Ack::from_body("<html>ok</html>"), Ack::default());
        assert_eq!(Ack::from_body(r#"{"message":null}"#), Ack::default());
        assert_eq!(Ack::from_body(r#"{"success":true}"#), Ack::default());
        assert_eq!(Ack::from_body(r#"{"success":"ok"}"#).message, "ok");
        assert_eq!(Ack::from_body(r#"{"message":"ok"}"#).message, "ok");
        assert_eq!(Ack::from_body(r#"[1, 2]"#), Ack::default());
    }

    #[test]
    fn test_ack_prefers_message_over_success() {
        let ack = Ack::from_body(r#"{"success":"Receta creada","message":"Guardado"}"#);
        assert_eq!(ack.message, "Guardado");

        let ack = Ack::from_body(r#"{"success":"Receta creada","message":""}"#);
        assert_eq!(ack.message, "Receta creada");
    }

    #[test]
    fn test_ack_deserializes_inside_other_payloads() {
        let acks: Vec<Ack> =
            serde_json::from_str(r#"[{"message":null}, {"success":true}, {"success":"ok"}]"#).unwrap();
        assert_eq!(acks[0], Ack::default());
        assert_eq!(acks[1], Ack::default());
        assert_eq!(acks[2].message, "ok");
    }
}
