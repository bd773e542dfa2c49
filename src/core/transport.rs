//! # Transport module
//!
//! This module contains the [`Transport`] trait which decouples the request
//! decoding layer from any particular HTTP client.
//!
//! The crate doesn't bundle an HTTP implementation. Implement this trait for
//! your own transport type and hand it to the client builder.

use super::{transport_response::TransportResponse, StreamHubError, TransportRequest};

/// This trait is used to send requests to the StreamHub service.
///
/// You can implement this trait for your own types backed by any HTTP
/// client. Connection management, pooling and retries are the transport's
/// responsibility; the client only consumes the resulting status code and
/// body bytes.
///
/// # Examples
/// ```
/// use streamhub::core::{Transport, TransportRequest, TransportResponse, StreamHubError};
///
/// struct MyTransport;
///
/// #[async_trait::async_trait]
/// impl Transport for MyTransport {
///    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, StreamHubError> {
///         // Send your request here
///
///         Ok(TransportResponse::default())
///    }
/// }
/// ```
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send a request to the StreamHub service.
    ///
    /// # Errors
    /// Should return a [`StreamHubError::Transport`] if the request cannot be
    /// sent.
    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, StreamHubError>;
}
