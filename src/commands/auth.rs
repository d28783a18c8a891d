//! Auth Commands
//!
//! Cookie-session login against Sanctum, plus the public user lookups.

use list_sync::ApiError;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};

use super::ApiClient;
use crate::models::User;

pub async fn current_user(api: &ApiClient) -> Result<User, ApiError> {
    let value: Value = api.request(Method::GET, "/api/user", &[], None).await?;
    user_from(value)
}

/// Another user's public profile
pub async fn user_by_id(api: &ApiClient, id: u64) -> Result<User, ApiError> {
    let value: Value = api.request(Method::GET, &format!("/api/user/{}", id), &[], None).await?;
    user_from(value)
}

#[derive(Debug, Default, Deserialize)]
struct EmailStatus {
    #[serde(default)]
    registered: bool,
}

/// First step of registration: is the address already taken?
pub async fn is_email_registered(api: &ApiClient, email: &str) -> Result<bool, ApiError> {
    let params = [("email", email.trim().to_string())];
    let status: EmailStatus = api.request(Method::GET, "/api/email/registered", &params, None).await?;
    Ok(status.registered)
}

/// Log in and return the session's user
pub async fn login(api: &ApiClient, email: &str, password: &str) -> Result<User, ApiError> {
    let body = json!({ "email": email.trim(), "password": password });
    api.write(Method::POST, "/api/login", Some(body)).await?;
    current_user(api).await
}

/// Create the account, then sign in with it
pub async fn register(api: &ApiClient, name: &str, email: &str, password: &str) -> Result<User, ApiError> {
    let body = json!({
        "name": name.trim(),
        "email": email.trim(),
        "password": password,
    });
    api.write(Method::POST, "/api/register", Some(body)).await?;
    login(api, email, password).await
}

pub async fn logout(api: &ApiClient) -> Result<(), ApiError> {
    api.write(Method::GET, "/api/logout", None).await?;
    Ok(())
}

/// `/api/user` answers either the user or `{ "user": ... }`
fn user_from(value: Value) -> Result<User, ApiError> {
    let value = match value {
        Value::Object(mut object) if object.contains_key("user") => object.remove("user").unwrap_or(Value::Null),
        other => other,
    };
    serde_json::from_value(value).map_err(ApiError::malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_shapes() {
        let bare = user_from(json!({"id": 1, "name": "Ana"})).unwrap();
        let wrapped = user_from(json!({"user": {"id": 1, "name": "Ana"}})).unwrap();
        assert_eq!(bare, wrapped);
        assert!(user_from(json!({"user": null})).is_err());
    }

    #[test]
    fn test_visited_user_has_no_email() {
        let user = user_from(json!({
            "id": 8,
            "name": "Luis",
            "avatar": null,
            "created_at": "2023-11-20T08:00:00.000000Z",
        }))
        .unwrap();
        assert_eq!(user.email, "");
        assert_eq!(user.member_since().as_deref(), Some("20 Nov 2023"));
    }

    #[test]
    fn test_email_status_shapes() {
        let taken: EmailStatus = serde_json::from_value(json!({"registered": true})).unwrap();
        assert!(taken.registered);
        let free: EmailStatus = serde_json::from_value(json!({})).unwrap();
        assert!(!free.registered);
    }
}
