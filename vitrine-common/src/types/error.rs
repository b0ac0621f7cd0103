use thiserror::Error;

/// Startup configuration problems. Always fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Panel failures.
///
/// `InitFailed` is fatal at startup; `WriteFailed` during a steady-state
/// cycle is logged and the loop proceeds to the next interval.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("panel initialization failed: {0}")]
    InitFailed(String),
    #[error("frame write failed: {0}")]
    WriteFailed(String),
}
