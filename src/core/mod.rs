//! # StreamHub Core
//!
//! The `core` module contains the seams between the decoding layer and its
//! external collaborators: transport, response deserialization and data
//! decryption. It also contains the crate-wide error type.
//!
//! It is intended to be used by the [`streamhub`] crate.
//!
//! [`streamhub`]: ../index.html

#[doc(inline)]
pub use error::StreamHubError;
pub mod error;

#[doc(inline)]
pub use error_response::APIErrorBody;
pub mod error_response;

#[doc(inline)]
pub use transport::Transport;
pub mod transport;

#[doc(inline)]
pub use transport_request::{TransportMethod, TransportRequest};
pub mod transport_request;

#[doc(inline)]
pub use transport_response::TransportResponse;
pub mod transport_response;

#[doc(inline)]
pub use deserializer::Deserializer;
pub mod deserializer;

#[doc(inline)]
pub use crypto_provider::CryptoProvider;
pub mod crypto_provider;

pub(crate) mod utils;
