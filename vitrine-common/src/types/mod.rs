pub mod config;
pub mod error;
pub mod frame;

pub use config::*;
pub use error::*;
pub use frame::*;
