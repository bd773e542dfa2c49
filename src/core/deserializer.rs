//! Deserialization of service responses.
//!
//! This module contains the `Deserializer` trait which is used to implement
//! deserialization of the data returned by the StreamHub service.

use super::StreamHubError;

/// Trait for deserializing service responses.
///
/// This trait is used by the [`dx`] modules to deserialize the data returned
/// by the StreamHub service into the typed response bodies declared next to
/// each operation.
///
/// A `serde`-backed implementation ships in
/// [`providers::deserialization_serde`]; provide your own implementation to
/// swap the data-interchange library.
///
/// [`dx`]: ../dx/index.html
/// [`providers::deserialization_serde`]: ../../providers/deserialization_serde/index.html
pub trait Deserializer: Send + Sync {
    /// Deserialize a `&[u8]` into a `Result<T, StreamHubError>`.
    ///
    /// # Errors
    /// Should return a [`StreamHubError::Deserialization`] if the bytes
    /// can't be deserialized into the target type.
    fn deserialize<T>(&self, bytes: &[u8]) -> Result<T, StreamHubError>
    where
        T: for<'de> serde::Deserialize<'de>;
}
