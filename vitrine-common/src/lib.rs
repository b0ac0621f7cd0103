//! Shared types and capability traits for the Vitrine display client.
//!
//! This crate is the leaf of the workspace: the panel trait the board
//! crates implement, the packed 1-bit frame that crosses that boundary,
//! the immutable process configuration and the portal wire types.

#![allow(async_fn_in_trait)]

pub mod api;
pub mod traits;
pub mod types;

pub use traits::*;
pub use types::*;
