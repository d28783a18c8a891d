//! Pantry Commands

use async_trait::async_trait;
use list_sync::{Ack, ApiError, Change, FetchGateway, Page, PageRequest};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::{unwrap_data, ApiClient};
use crate::models::{Amount, CatalogIngredient, PantryEntry, PantryField, Unit};

#[derive(Clone)]
pub struct PantryFeed {
    api: ApiClient,
}

impl PantryFeed {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait(?Send)]
impl FetchGateway for PantryFeed {
    type Item = PantryEntry;
    type Field = PantryField;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<PantryEntry>, ApiError> {
        let params = [
            ("page", request.page.to_string()),
            ("perPage", request.page_size.to_string()),
        ];
        let value: Value = self.api.request(Method::GET, "/api/ingredients", &params, None).await?;
        pantry_page(value)
    }

    async fn mutate(&self, target: &u64, change: &Change<PantryEntry, PantryField>) -> Result<Ack, ApiError> {
        let path = format!("/api/ingredients/{}", target);
        match change {
            Change::Set { optimistic, .. } => {
                let body = serde_json::to_value(optimistic).map_err(ApiError::malformed)?;
                self.api.write(Method::PUT, &path, Some(body)).await
            }
            Change::Remove { .. } => self.api.write(Method::DELETE, &path, None).await,
        }
    }
}

/// Older servers answer with a bare array instead of a page envelope
fn pantry_page(value: Value) -> Result<Page<PantryEntry>, ApiError> {
    match value {
        Value::Array(entries) => {
            let items = serde_json::from_value(Value::Array(entries)).map_err(ApiError::malformed)?;
            Ok(Page { items, current_page: 1, last_page: 1 })
        }
        other => Page::from_json(other),
    }
}

/// Body of `POST /api/ingredients`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPantryEntry {
    pub ingredient_id: u64,
    pub quantity: f64,
    pub unit: Unit,
}

impl NewPantryEntry {
    pub fn new(ingredient_id: u64, amount: Amount) -> Self {
        Self { ingredient_id, quantity: amount.quantity, unit: amount.unit }
    }
}

pub async fn add_to_pantry(api: &ApiClient, entry: &NewPantryEntry) -> Result<Ack, ApiError> {
    let body = serde_json::to_value(entry).map_err(ApiError::malformed)?;
    api.write(Method::POST, "/api/ingredients", Some(body)).await
}

/// Remove every entry of the pantry
pub async fn clean_pantry(api: &ApiClient) -> Result<Ack, ApiError> {
    api.write(Method::DELETE, "/api/ingredients", None).await
}

/// All ingredients known to the server, for the add form
pub async fn ingredient_catalog(api: &ApiClient) -> Result<Vec<CatalogIngredient>, ApiError> {
    let value: Value = api.request(Method::GET, "/api/ingredients/list", &[], None).await?;
    serde_json::from_value(unwrap_data(value)).map_err(ApiError::malformed)
}
