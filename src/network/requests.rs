/*!
 * Backend requests and response models.
 */

use serde::{Deserialize, Serialize};

use super::http::RequestDescriptor;
use crate::errors::NetworkError;

/// Credentials sent to obtain a token
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationRequestModel {
    pub email: String,
    pub password: String,
}

/// Token issued by the backend
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AuthorizationResponseModel {
    /// Opaque token
    pub token: String,
    /// Token scheme, e.g. "Bearer"
    #[serde(rename = "type")]
    pub token_type: String,
}

impl AuthorizationResponseModel {
    /// Authorization header value
    pub fn header_value(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }
}

/// Account returned by the user lookup
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UserResponseModel {
    /// Backend user id
    #[serde(default)]
    pub id: i64,
    pub username: Option<String>,
    #[serde(rename = "email_confirmation_code")]
    pub email_code: i64,
}

/// Account fields accepted by the update endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserUpdateRequestModel {
    pub first_name: String,
    pub second_name: String,
    #[serde(rename = "username")]
    pub user_name: String,
    #[serde(rename = "hashed_password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UserUpdateRequestModel {
    /// Update that only changes the user name
    pub fn rename(user_name: impl Into<String>) -> Self {
        Self {
            first_name: String::new(),
            second_name: String::new(),
            user_name: user_name.into(),
            password: None,
        }
    }
}

/// `POST auth/login`
pub fn authorization(model: &AuthorizationRequestModel) -> Result<RequestDescriptor, NetworkError> {
    RequestDescriptor::post("auth/login").model(model)
}

/// `GET users/?email=...`
pub fn user(email: &str, token: &str) -> RequestDescriptor {
    RequestDescriptor::get("users/")
        .query("email", email)
        .token(token)
}

/// `PUT users/{id}`
pub fn update_user(
    model: &UserUpdateRequestModel,
    id: i64,
    token: &str,
) -> Result<RequestDescriptor, NetworkError> {
    Ok(RequestDescriptor::put(format!("users/{}", id))
        .model(model)?
        .token(token))
}

/// `DELETE users/{id}`
pub fn delete_user(id: i64, token: &str) -> RequestDescriptor {
    RequestDescriptor::delete(format!("users/{}", id)).token(token)
}

/// `GET words/popular`, a JSON array of headwords
pub fn popular_words(limit: usize) -> RequestDescriptor {
    RequestDescriptor::get("words/popular").query("limit", limit)
}
