//! Client logic for the Vitrine e-ink display.
//!
//! The refresh loop authenticates against the portal, fetches the rendered
//! dashboard image each cycle, normalizes it to the panel's 1-bit format
//! and writes it out through the [`vitrine_common::Panel`] capability
//! trait. Every steady-state failure degrades to a locally drawn fallback
//! frame; only panel initialization and the initial login are fatal.

pub mod acquire;
pub mod device;
pub mod error;
pub mod fallback;
pub mod normalize;
pub mod refresh;
pub mod session;
pub mod testing;

pub use acquire::{ImageAcquirer, RawImage};
pub use device::DeviceController;
pub use error::{AuthError, FetchError, RunError};
pub use fallback::FallbackRenderer;
pub use normalize::normalize;
pub use refresh::{CycleOutcome, RefreshLoop};
pub use session::{Session, SessionManager};
