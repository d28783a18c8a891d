//! API Client
//!
//! HTTP bindings to the Foodmind API, organized by domain.
//!
//! Every authenticated call first refreshes the Sanctum CSRF cookie, then
//! sends the session cookie plus the `X-XSRF-TOKEN` header.

mod auth;
mod pantry;
mod recipe;
mod translation;

use std::sync::Arc;

use leptos::prelude::*;
use list_sync::{Ack, ApiError};
use reqwest::multipart::Form;
use reqwest::{header, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::i18n::Locale;

pub use auth::*;
pub use pantry::*;
pub use recipe::*;
pub use translation::*;

/// Shared HTTP client. Cheap to clone; all clones send the current locale.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    locale: Signal<Locale>,
}

impl ApiClient {
    pub fn new(base_url: &str, locale: Signal<Locale>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: Arc::from(base_url.trim_end_matches('/')),
            locale,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn lang(&self) -> &'static str {
        self.locale.get_untracked().code()
    }

    async fn refresh_csrf(&self) -> Result<(), ApiError> {
        self.dispatch(self.http.get(self.url("/sanctum/csrf-cookie")))
            .await
            .map(|_| ())
    }

    async fn dispatch(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = with_session(builder)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        log::warn!("[ApiClient] {} -> {}", status, body);
        Err(error_for_status(status.as_u16(), &body))
    }

    /// Authenticated send. The locale goes into the query string for
    /// GET/DELETE and into the JSON body otherwise.
    async fn send(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Response, ApiError> {
        self.refresh_csrf().await?;

        let mut builder = self.http.request(method.clone(), self.url(path));
        if !params.is_empty() {
            builder = builder.query(params);
        }
        builder = if method == Method::GET || method == Method::DELETE {
            builder.query(&[("lang", self.lang())])
        } else {
            builder.json(&with_lang(body, self.lang()))
        };
        self.dispatch(builder).await
    }

    /// Authenticated read whose body must match `R`
    pub(crate) async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<R, ApiError> {
        self.send(method, path, params, body)
            .await?
            .json::<R>()
            .await
            .map_err(ApiError::malformed)
    }

    /// Authenticated write. Success is decided by the status alone; the body
    /// only feeds the acknowledgement text.
    pub(crate) async fn write(&self, method: Method, path: &str, body: Option<Value>) -> Result<Ack, ApiError> {
        let response = self.send(method, path, &[], body).await?;
        Ok(read_ack(response).await)
    }

    /// Authenticated multipart POST. The form carries no locale field.
    pub(crate) async fn write_form(&self, path: &str, form: Form) -> Result<Ack, ApiError> {
        self.refresh_csrf().await?;
        let response = self.dispatch(self.http.post(self.url(path)).multipart(form)).await?;
        Ok(read_ack(response).await)
    }

    /// Unauthenticated GET, no CSRF round trip
    pub(crate) async fn get_public<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.dispatch(self.http.get(self.url(path)))
            .await?
            .json::<R>()
            .await
            .map_err(ApiError::malformed)
    }
}

async fn read_ack(response: Response) -> Ack {
    match response.text().await {
        Ok(body) => Ack::from_body(&body),
        Err(e) => {
            log::warn!("[ApiClient] unreadable write response: {}", e);
            Ack::default()
        }
    }
}

pub fn use_api() -> ApiClient {
    expect_context::<ApiClient>()
}

fn with_lang(body: Option<Value>, lang: &str) -> Value {
    let mut object = match body {
        Some(Value::Object(object)) => object,
        _ => Map::new(),
    };
    object.insert("lang".to_string(), Value::from(lang));
    Value::Object(object)
}

/// Lists arrive either bare or wrapped in `{"data": [...]}`
pub(crate) fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut object) => object.remove("data").unwrap_or_else(|| Value::Array(Vec::new())),
        other => other,
    }
}

/// Map a failed response to the error kinds the UI distinguishes
pub(crate) fn error_for_status(status: u16, body: &Value) -> ApiError {
    let message = body
        .get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
        .map(str::to_string);

    match status {
        401 | 419 => ApiError::Auth,
        400 | 409 | 422 => {
            ApiError::Validation(message.unwrap_or_else(|| "The given data was invalid.".to_string()))
        }
        _ => ApiError::Server {
            status,
            message: message.unwrap_or_else(|| "An error occurred.".to_string()),
        },
    }
}

/// Value of a cookie in a `document.cookie` string, percent-decoded
pub(crate) fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| {
            percent_encoding::percent_decode_str(value)
                .decode_utf8_lossy()
                .into_owned()
        })
}

#[cfg(target_arch = "wasm32")]
fn with_session(builder: RequestBuilder) -> RequestBuilder {
    let builder = builder.fetch_credentials_include();
    match xsrf_token() {
        Some(token) => builder.header("X-XSRF-TOKEN", token),
        None => builder,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn with_session(builder: RequestBuilder) -> RequestBuilder {
    builder
}

#[cfg(target_arch = "wasm32")]
fn xsrf_token() -> Option<String> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()?.document()?;
    let cookies = document.dyn_into::<web_sys::HtmlDocument>().ok()?.cookie().ok()?;
    cookie_value(&cookies, "XSRF-TOKEN")
}
