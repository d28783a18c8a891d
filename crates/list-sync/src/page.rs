//! Page Types
//!
//! Pagination position and the validated shape of one fetched page.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// Position of a synchronizer within a paginated endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub current_page: u32,
    pub last_page: u32,
    pub page_size: u32,
}

impl PageCursor {
    pub fn first(page_size: u32) -> Self {
        Self {
            current_page: 1,
            last_page: 1,
            page_size,
        }
    }

    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// Arguments for one page fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub query: String,
    pub page: u32,
    #[serde(rename = "perPage")]
    pub page_size: u32,
}

impl PageRequest {
    /// Blank queries go to the unfiltered endpoint, anything else to search
    pub fn is_search(&self) -> bool {
        !self.query.trim().is_empty()
    }
}

/// One page of items as returned by the server
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
}

impl<T: DeserializeOwned> Page<T> {
    /// Parse a paginator body (`{"data": [...], "current_page": n, "last_page": m}`).
    ///
    /// Missing or non-positive page numbers, a non-array `data` and items
    /// that fail to deserialize are all rejected as `ApiError::Validation`.
    pub fn from_json(value: Value) -> Result<Self, ApiError> {
        let Value::Object(mut body) = value else {
            return Err(ApiError::malformed("page body is not an object"));
        };
        let current_page = page_number(&body, "current_page")?;
        let last_page = page_number(&body, "last_page")?;
        let items = match body.remove("data") {
            Some(Value::Array(rows)) => rows
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<T>, _>>()
                .map_err(ApiError::malformed)?,
            _ => return Err(ApiError::malformed("`data` is not an array")),
        };
        Ok(Self {
            items,
            current_page,
            last_page,
        })
    }
}

fn page_number(body: &serde_json::Map<String, Value>, key: &str) -> Result<u32, ApiError> {
    body.get(key)
        .and_then(Value::as_u64)
        .filter(|n| *n >= 1)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ApiError::malformed(format!("`{}` is not a positive integer", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Row {
        id: u32,
    }

    #[test]
    fn test_parse_paginator() {
        let page: Page<Row> = Page::from_json(json!({
            "current_page": 2,
            "last_page": 3,
            "per_page": 21,
            "data": [{"id": 4}, {"id": 5}],
        }))
        .unwrap();
        assert_eq!(page.items, vec![Row { id: 4 }, Row { id: 5 }]);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.last_page, 3);
    }

    #[test]
    fn test_rejects_malformed_shapes() {
        let missing_data = Page::<Row>::from_json(json!({"current_page": 1, "last_page": 1}));
        assert!(matches!(missing_data, Err(ApiError::Validation(_))));

        let zero_page = Page::<Row>::from_json(json!({"current_page": 0, "last_page": 1, "data": []}));
        assert!(matches!(zero_page, Err(ApiError::Validation(_))));

        let bad_item = Page::<Row>::from_json(json!({"current_page": 1, "last_page": 1, "data": [{"name": "x"}]}));
        assert!(matches!(bad_item, Err(ApiError::Validation(_))));

        let not_object = Page::<Row>::from_json(json!([1, 2]));
        assert!(matches!(not_object, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_cursor_has_more() {
        let mut cursor = PageCursor::first(21);
        assert!(!cursor.has_more());
        cursor.last_page = 3;
        assert!(cursor.has_more());
        cursor.current_page = 3;
        assert!(!cursor.has_more());
    }

    #[test]
    fn test_search_branch() {
        let request = |query: &str| PageRequest { query: query.to_string(), page: 1, page_size: 21 };
        assert!(!request("").is_search());
        assert!(!request("   ").is_search());
        assert!(request("pasta").is_search());
    }
}
