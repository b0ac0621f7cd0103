//! Dashboard image acquisition.

use std::time::Duration;

use image::DynamicImage;
use log::{error, info, warn};
use reqwest::{Client, StatusCode};
use vitrine_common::Config;

use crate::error::FetchError;
use crate::session::SessionManager;

pub(crate) const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const RETRY_TIMEOUT: Duration = Duration::from_secs(10);

/// Dashboard bitmap as received from the portal.
#[derive(Debug)]
pub struct RawImage {
    pub image: DynamicImage,
    /// Pixel format the body declared itself in.
    pub color: image::ColorType,
    pub width: u32,
    pub height: u32,
}

/// Fetches the rendered dashboard with the current token, re-authenticating
/// at most once when the portal rejects it.
pub struct ImageAcquirer {
    http: Client,
    image_url: String,
}

impl ImageAcquirer {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            image_url: format!("{}/display/image", config.api_base_url.trim_end_matches('/')),
        }
    }

    pub async fn fetch(&self, sessions: &mut SessionManager) -> Result<RawImage, FetchError> {
        if sessions.token().is_none() {
            warn!("no valid session, logging in before fetch");
            sessions.login().await.map_err(|err| {
                error!("pre-fetch login failed: {err}");
                FetchError::Unauthorized
            })?;
        }

        let mut response = self.request(sessions, FETCH_TIMEOUT).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("token rejected, re-authenticating once");
            sessions.invalidate();
            sessions.login().await.map_err(|err| {
                error!("re-authentication failed: {err}");
                FetchError::Unauthorized
            })?;

            response = self.request(sessions, RETRY_TIMEOUT).await?;
            if response.status() == StatusCode::UNAUTHORIZED {
                return Err(FetchError::Unauthorized);
            }
        }

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!("status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;
        let image = image::load_from_memory(&body).map_err(FetchError::Malformed)?;

        let raw = RawImage {
            color: image.color(),
            width: image.width(),
            height: image.height(),
            image,
        };
        info!("fetched image: {}x{} {:?}", raw.width, raw.height, raw.color);
        Ok(raw)
    }

    async fn request(
        &self,
        sessions: &SessionManager,
        timeout: Duration,
    ) -> Result<reqwest::Response, FetchError> {
        // An invalidated token is never put on the wire.
        let token = sessions.token().ok_or(FetchError::Unauthorized)?;

        self.http
            .get(&self.image_url)
            .timeout(timeout)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))
    }
}
