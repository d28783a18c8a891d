//! Recipe Commands
//!
//! Paginated recipe listings, the per-recipe writes behind the card
//! buttons, the detail view and recipe creation.

use async_trait::async_trait;
use list_sync::{Ack, ApiError, Change, FetchGateway, Field, Page, PageRequest};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::{json, Value};

use super::{unwrap_data, ApiClient};
use crate::models::{Recipe, RecipeDetail, RecipeField, RecipeType};
use crate::recipe_form::NewRecipe;

/// Which listing a feed reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeSource {
    /// Public recipes, or a name search when the query is set
    Explore,
    /// Recipes created by the signed-in user
    Mine,
    /// Recipes the signed-in user marked as favourite
    Favourites,
    /// Public recipes of another user; the endpoint is not paginated
    PublicOf(u64),
}

#[derive(Clone)]
pub struct RecipeFeed {
    api: ApiClient,
    source: RecipeSource,
}

impl RecipeFeed {
    pub fn new(api: ApiClient, source: RecipeSource) -> Self {
        Self { api, source }
    }
}

#[async_trait(?Send)]
impl FetchGateway for RecipeFeed {
    type Item = Recipe;
    type Field = RecipeField;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Recipe>, ApiError> {
        match listing(self.source, request) {
            Listing::Paged(path, body) => {
                let value: Value = self.api.request(Method::POST, path, &[], Some(body)).await?;
                Page::from_json(value)
            }
            Listing::Whole(path) => {
                let value: Value = self.api.request(Method::GET, &path, &[], None).await?;
                Ok(single_page(value))
            }
        }
    }

    async fn mutate(&self, target: &u64, change: &Change<Recipe, RecipeField>) -> Result<Ack, ApiError> {
        send_recipe_write(&self.api, *target, change).await
    }
}

/// One recipe as a one-item feed, so the detail screen shares the
/// optimistic toggles of the grids
#[derive(Clone)]
pub struct RecipeDetailFeed {
    api: ApiClient,
    id: u64,
}

impl RecipeDetailFeed {
    pub fn new(api: ApiClient, id: u64) -> Self {
        Self { api, id }
    }
}

#[async_trait(?Send)]
impl FetchGateway for RecipeDetailFeed {
    type Item = RecipeDetail;
    type Field = RecipeField;

    async fn fetch_page(&self, _request: &PageRequest) -> Result<Page<RecipeDetail>, ApiError> {
        let value: Value = self
            .api
            .request(Method::GET, &format!("/api/recipes/{}", self.id), &[], None)
            .await?;
        Ok(Page { items: vec![detail_from(value)?], current_page: 1, last_page: 1 })
    }

    async fn mutate(&self, target: &u64, change: &Change<RecipeDetail, RecipeField>) -> Result<Ack, ApiError> {
        send_recipe_write(&self.api, *target, change).await
    }
}

/// A missing recipe comes back as `{"error": ...}` rather than a 404
fn detail_from(value: Value) -> Result<RecipeDetail, ApiError> {
    if let Some(error) = value.get("error").and_then(Value::as_str) {
        return Err(ApiError::Validation(error.to_string()));
    }
    serde_json::from_value(value).map_err(ApiError::malformed)
}

/// Category options of the create form
pub async fn recipe_types(api: &ApiClient) -> Result<Vec<RecipeType>, ApiError> {
    let value: Value = api.request(Method::POST, "/api/recipes/types", &[], Some(json!({}))).await?;
    serde_json::from_value(unwrap_data(value)).map_err(ApiError::malformed)
}

/// Delete outside of a feed (detail screen)
pub async fn delete_recipe(api: &ApiClient, id: u64) -> Result<Ack, ApiError> {
    api.write(Method::DELETE, &format!("/api/recipes/{}", id), None).await
}

/// Send a validated draft as `multipart/form-data`
pub async fn create_recipe(api: &ApiClient, draft: &NewRecipe) -> Result<Ack, ApiError> {
    let mut form = draft
        .text_fields()
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value));
    if let Some(image) = &draft.image {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime)
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        form = form.part("image", part);
    }
    api.write_form("/api/recipes", form).await
}

/// Arrays are the whole listing; anything else reads as no recipes
fn single_page(value: Value) -> Page<Recipe> {
    let items = match value {
        Value::Array(rows) => rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<Recipe>(row) {
                Ok(recipe) => Some(recipe),
                Err(e) => {
                    log::warn!("[RecipeFeed] Skipping unreadable recipe: {}", e);
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    };
    Page { items, current_page: 1, last_page: 1 }
}

async fn send_recipe_write<T>(api: &ApiClient, id: u64, change: &Change<T, RecipeField>) -> Result<Ack, ApiError>
where
    RecipeField: Field<T, Value = bool>,
{
    let (method, path) = recipe_write(id, change);
    let body = (method != Method::DELETE).then(|| json!({}));
    api.write(method, &path, body).await
}

#[derive(Debug, PartialEq)]
enum Listing {
    /// Paginator endpoint taking page, size and filters in a POST body
    Paged(&'static str, Value),
    /// Plain GET answering every item at once
    Whole(String),
}

fn listing(source: RecipeSource, request: &PageRequest) -> Listing {
    let mut body = json!({
        "page": request.page,
        "perPage": request.page_size,
    });
    let path = match source {
        RecipeSource::Explore if request.is_search() => {
            body["name"] = Value::from(request.query.trim());
            "/api/recipes/byName"
        }
        RecipeSource::Explore => "/api/recipes/available",
        RecipeSource::Mine => "/api/user/yourRecipes",
        RecipeSource::Favourites => "/api/user/favourites",
        RecipeSource::PublicOf(user_id) => {
            return Listing::Whole(format!("/api/user/{}/public-recipes", user_id));
        }
    };
    Listing::Paged(path, body)
}

fn recipe_write<T>(id: u64, change: &Change<T, RecipeField>) -> (Method, String)
where
    RecipeField: Field<T, Value = bool>,
{
    match change {
        Change::Set { field: RecipeField::Favourite, optimistic: true, .. } => {
            (Method::POST, format!("/api/recipes/{}/favourite", id))
        }
        Change::Set { field: RecipeField::Favourite, optimistic: false, .. } => {
            (Method::DELETE, format!("/api/recipes/{}/favourite", id))
        }
        Change::Set { field: RecipeField::Private, optimistic: true, .. } => {
            (Method::POST, format!("/api/recipes/{}/private", id))
        }
        Change::Set { field: RecipeField::Private, optimistic: false, .. } => {
            (Method::POST, format!("/api/recipes/{}/public", id))
        }
        Change::Remove { .. } => (Method::DELETE, format!("/api/recipes/{}", id)),
    }
}
