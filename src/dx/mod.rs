//! # StreamHub Developer Experience
//!
//! This module provides the structures and methods for the StreamHub
//! message history service. It is intended to be used by the [`streamhub`]
//! crate.
//!
//! [`streamhub`]: ../index.html

pub mod history;

pub use client::{Keyset, StreamHubClientBuilder, StreamHubClientInstance};
pub mod client;
