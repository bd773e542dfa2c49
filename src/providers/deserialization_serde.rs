//! Serde implementation for StreamHub [`Deserializer`] trait.
//!
//! This module provides a `serde` deserializer for the StreamHub protocol.
//!
//! [`Deserializer`]: ../../core/deserializer/trait.Deserializer.html

use crate::core::{Deserializer, StreamHubError};

/// Serde implementation for StreamHub [`Deserializer`] trait.
///
/// This struct implements the [`Deserializer`] trait for the [`serde`] crate.
/// It is used by the [`dx`] modules to deserialize the data returned by the
/// StreamHub service.
///
/// [`Deserializer`]: ../../core/deserializer/trait.Deserializer.html
/// [`serde`]: https://crates.io/crates/serde
/// [`dx`]: ../../dx/index.html
#[derive(Debug, Clone)]
pub struct DeserializerSerde;

impl Deserializer for DeserializerSerde {
    fn deserialize<T>(&self, bytes: &[u8]) -> Result<T, StreamHubError>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        serde_json::from_slice(bytes).map_err(|e| StreamHubError::Deserialization {
            details: e.to_string(),
        })
    }
}

#[cfg(test)]
mod should {
    use super::*;

    #[derive(serde::Deserialize, Debug, PartialEq)]
    struct Foo {
        bar: String,
    }

    #[test]
    fn deserialize() {
        let sut = DeserializerSerde;

        let result: Foo = sut.deserialize(&Vec::from("{\"bar\":\"baz\"}")).unwrap();

        assert_eq!(
            result,
            Foo {
                bar: "baz".to_string()
            }
        );
    }

    #[test]
    fn not_deserialize_invalid_json() {
        let sut = DeserializerSerde;

        let result: Result<Foo, StreamHubError> = sut.deserialize(&Vec::from("{\"bar\":"));

        assert!(matches!(
            result,
            Err(StreamHubError::Deserialization { .. })
        ));
    }
}
