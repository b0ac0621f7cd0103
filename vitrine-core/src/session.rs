//! Portal authentication and token ownership.

use std::time::Duration;

use log::{error, info};
use reqwest::Client;
use vitrine_common::Config;
use vitrine_common::api::{LoginRequest, LoginResponse};

use crate::error::AuthError;

pub(crate) const LOGIN_TIMEOUT: Duration = Duration::from_secs(10);

/// An authenticated portal session.
///
/// Replaced whole by every successful login; invalidation flips `valid`
/// and nothing else.
#[derive(Debug, Clone)]
pub struct Session {
    token: String,
    valid: bool,
}

impl Session {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Owns the credentials and the current bearer token.
pub struct SessionManager {
    http: Client,
    login_url: String,
    email: String,
    password: String,
    session: Option<Session>,
}

impl SessionManager {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            login_url: format!("{}/auth/login", config.api_base_url.trim_end_matches('/')),
            email: config.email.clone(),
            password: config.password.clone(),
            session: None,
        }
    }

    /// Authenticate against the portal and replace the held session.
    ///
    /// Idempotent: repeated calls simply re-authenticate.
    pub async fn login(&mut self) -> Result<Session, AuthError> {
        info!("logging in to {}", self.login_url);

        let response = self
            .http
            .post(&self.login_url)
            .timeout(LOGIN_TIMEOUT)
            .json(&LoginRequest {
                email: &self.email,
                password: &self.password,
            })
            .send()
            .await
            .map_err(AuthError::Unreachable)?;

        let status = response.status();
        if status.as_u16() >= 400 {
            error!("login rejected with status {status}");
            return Err(AuthError::InvalidCredentials(status.as_u16()));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|_| AuthError::MalformedResponse)?;
        let token = match body.access_token {
            Some(token) if !token.is_empty() => token,
            _ => {
                error!("login response carried no access token");
                return Err(AuthError::MalformedResponse);
            }
        };

        info!("authenticated");
        let session = Session { token, valid: true };
        self.session = Some(session.clone());
        Ok(session)
    }

    /// The current token, only while the session is marked valid.
    pub fn token(&self) -> Option<&str> {
        self.session
            .as_ref()
            .filter(|session| session.valid)
            .map(|session| session.token.as_str())
    }

    /// Mark the current token rejected. It is never presented again until
    /// a new login succeeds.
    pub fn invalidate(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.valid = false;
        }
    }
}
