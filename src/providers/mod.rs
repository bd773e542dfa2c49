//! # Providers module
//!
//! This module contains the implementations of the `core` seams provided by
//! the crate.

pub mod deserialization_serde;

#[cfg(feature = "crypto")]
pub mod crypto;
