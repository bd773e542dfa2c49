//! StreamHub client module
//!
//! This module contains the [`StreamHubClientInstance`] struct.
//! It's used to send requests to the StreamHub message history service.
//! It's intended to be used by the [`streamhub`] crate.
//!
//! [`streamhub`]: ../index.html

use derive_builder::Builder;
use log::info;
use std::{ops::Deref, sync::Arc};

use crate::{
    core::{CryptoProvider, StreamHubError, Transport},
    providers::deserialization_serde::DeserializerSerde,
};

/// StreamHub client raw instance.
///
/// The client is transport-layer-agnostic, so you can use any transport
/// layer that implements the [`Transport`] trait.
///
/// You can create client instances using the
/// [`StreamHubClientBuilder::with_transport`] method.
/// You must provide a valid [`Keyset`] with the subscribe key of your
/// StreamHub account.
///
/// # Examples
/// ```
/// use streamhub::{Keyset, StreamHubClientBuilder};
///
/// # use streamhub::core::{Transport, TransportRequest, TransportResponse, StreamHubError};
/// # struct MyTransport;
/// # #[async_trait::async_trait]
/// # impl Transport for MyTransport {
/// #     async fn send(&self, _request: TransportRequest) -> Result<TransportResponse, StreamHubError> {
/// #         unimplemented!()
/// #     }
/// # }
/// # impl MyTransport {
/// #     fn new() -> Self {
/// #         Self
/// #     }
/// # }
///
/// # fn main() -> Result<(), StreamHubError> {
/// // note that MyTransport must implement the `Transport` trait
/// let transport = MyTransport::new();
///
/// let client = StreamHubClientBuilder::with_transport(transport)
///    .with_keyset(Keyset {
///         subscribe_key: "sub-c-abc123",
///    })
///    .build()?;
///
/// # Ok(())
/// # }
/// ```
///
/// # Synchronization
///
/// Client is thread-safe and can be shared between threads. You don't need
/// to wrap it in `Arc` or `Mutex` because it is already wrapped in `Arc`.
#[derive(Debug)]
pub struct StreamHubClientInstance<T, D> {
    pub(crate) inner: Arc<StreamHubClientRef<T, D>>,
}

impl<T, D> Deref for StreamHubClientInstance<T, D> {
    type Target = StreamHubClientRef<T, D>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T, D> Clone for StreamHubClientInstance<T, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Client reference
///
/// This struct contains the actual client state.
/// It's wrapped in `Arc` by [`StreamHubClientInstance`] and shared between
/// the request builders the client produces.
///
/// Not intended to be used directly. Use [`StreamHubClientInstance`]
/// instead.
#[derive(Builder, Debug)]
#[builder(
    pattern = "owned",
    name = "StreamHubClientConfigBuilder",
    build_fn(private, name = "build_internal"),
    setter(prefix = "with")
)]
pub struct StreamHubClientRef<T, D> {
    /// Transport layer
    pub(crate) transport: T,

    /// Service responses deserializer
    pub(crate) deserializer: Arc<D>,

    /// Message payload decryption provider
    #[builder(setter(custom), field(vis = "pub(crate)"), default = "None")]
    pub(crate) cryptor: Option<Arc<dyn CryptoProvider>>,

    /// Configuration
    pub(crate) config: StreamHubConfig,
}

impl<T, D> StreamHubClientConfigBuilder<T, D> {
    /// Message payload encryption / decryption.
    ///
    /// The cryptor is applied as an optional, failure-tolerant pass over
    /// fetched history payloads. It is never mutated by the client and may
    /// be shared by concurrent requests.
    ///
    /// It returns [`StreamHubClientConfigBuilder`] that you can use to set
    /// the configuration for the client.
    pub fn with_cryptor<C>(mut self, cryptor: C) -> Self
    where
        C: CryptoProvider + 'static,
    {
        self.cryptor = Some(Some(Arc::new(cryptor)));

        self
    }

    /// Build a [`StreamHubClientInstance`] from the builder.
    pub fn build(self) -> Result<StreamHubClientInstance<T, D>, StreamHubError> {
        self.build_internal()
            .map_err(|err| StreamHubError::ClientInitialization {
                details: err.to_string(),
            })
            .map(|client| {
                info!(
                    "Client configuration: \n subscribe_key: {}",
                    client.config.subscribe_key
                );

                StreamHubClientInstance {
                    inner: Arc::new(client),
                }
            })
    }
}

/// StreamHub configuration
///
/// Configuration for [`StreamHubClientInstance`].
/// This struct separates the configuration from the actual client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHubConfig {
    /// Subscribe key
    pub(crate) subscribe_key: String,
}

/// StreamHub builder for [`StreamHubClientInstance`]
///
/// Builder that is a first step to create a client. The client is
/// transport-layer-agnostic, so you can use any transport layer that
/// implements the [`Transport`] trait.
///
/// The builder provides methods to set the transport layer and returns the
/// next step of the builder with the remaining parameters.
///
/// See [`StreamHubClientInstance`] for more information.
#[derive(Debug, Clone)]
pub struct StreamHubClientBuilder;

impl StreamHubClientBuilder {
    /// Set the transport layer for the client.
    ///
    /// Returns [`StreamHubClientKeysetBuilder`] where the [`Keyset`] can be
    /// set.
    pub fn with_transport<T>(transport: T) -> StreamHubClientKeysetBuilder<T>
    where
        T: Transport,
    {
        StreamHubClientKeysetBuilder { transport }
    }
}

/// StreamHub builder for [`StreamHubClientInstance`] used to set the
/// [`Keyset`]. It is returned by [`StreamHubClientBuilder::with_transport`].
///
/// See [`StreamHubClientInstance`] for more information.
#[derive(Debug, Clone)]
pub struct StreamHubClientKeysetBuilder<T> {
    /// Transport layer
    pub(crate) transport: T,
}

impl<T> StreamHubClientKeysetBuilder<T> {
    /// Set the [`Keyset`] for the client and continue with the `serde`
    /// responses deserializer.
    ///
    /// It returns [`StreamHubClientConfigBuilder`] that you can use to set
    /// the configuration for the client.
    pub fn with_keyset<S>(self, keyset: Keyset<S>) -> StreamHubClientConfigBuilder<T, DeserializerSerde>
    where
        S: Into<String>,
    {
        StreamHubClientConfigBuilder {
            transport: Some(self.transport),
            deserializer: Some(Arc::new(DeserializerSerde)),
            config: Some(StreamHubConfig {
                subscribe_key: keyset.subscribe_key.into(),
            }),
            ..Default::default()
        }
    }
}

/// Keyset for the StreamHub client
///
/// # Examples
/// ```
/// use streamhub::Keyset;
///
/// Keyset {
///    subscribe_key: "sub-c-abc123",
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Keyset<S>
where
    S: Into<String>,
{
    /// Subscribe key
    pub subscribe_key: S,
}
