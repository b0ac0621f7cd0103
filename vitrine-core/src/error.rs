use thiserror::Error;
use vitrine_common::DeviceError;

/// Login failures. Fatal at startup only; mid-loop token expiry is
/// absorbed by the acquirer's one-shot re-authentication path.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login rejected with status {0}")]
    InvalidCredentials(u16),
    #[error("authentication endpoint unreachable")]
    Unreachable(#[source] reqwest::Error),
    #[error("login response carried no access token")]
    MalformedResponse,
}

/// Image acquisition failures. Always recovered locally by the fallback
/// renderer; logged, never fatal.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The portal rejected the token and the one-shot re-authentication
    /// path did not recover.
    #[error("portal rejected the session token")]
    Unauthorized,
    #[error("image request failed: {0}")]
    Network(String),
    #[error("image body could not be decoded")]
    Malformed(#[source] image::ImageError),
}

/// The two conditions that terminate the process abnormally.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("panel initialization failed")]
    Device(#[source] DeviceError),
    #[error("initial authentication failed")]
    Auth(#[source] AuthError),
}
