//! Typed API wrappers.
//!
//! One module per backend resource. Wrappers only build paths and query
//! strings and hand off to the shared [`ApiClient`]; retries and error
//! surfacing live in [`crate::query`].

pub mod activities;
pub mod auth;
mod client;
pub mod endpoints;
pub mod incidents;
pub mod nfc;
mod params;

pub use activities::*;
pub use client::*;
pub use incidents::*;
pub use nfc::*;
pub use params::*;
