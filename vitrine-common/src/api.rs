//! Wire types of the Vitrine portal API.

use serde::{Deserialize, Serialize};

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Success body of `POST /auth/login`.
///
/// The token is optional at the wire level: a 2xx response without it is a
/// malformed response, not a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: Option<String>,
}
