//! # StreamHub message history SDK
//!
//! This crate is the client-side decoding layer for the StreamHub message
//! history service. It turns raw response bytes into uniform, typed history
//! results while tolerating the two wire formats the service has shipped
//! over time, reconstructs denormalized message actions, and applies an
//! optional, failure-tolerant decryption pass to message payloads.
//!
//! The crate performs no I/O of its own: supply any HTTP stack by
//! implementing the [`Transport`] trait and hand it to the client builder.
//!
//! # Example
//! ```no_run
//! use streamhub::{Keyset, StreamHubClientBuilder};
//! # use streamhub::core::{Transport, TransportRequest, TransportResponse, StreamHubError};
//! # struct MyTransport;
//! # #[async_trait::async_trait]
//! # impl Transport for MyTransport {
//! #     async fn send(&self, _request: TransportRequest) -> Result<TransportResponse, StreamHubError> {
//! #         unimplemented!()
//! #     }
//! # }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StreamHubClientBuilder::with_transport(MyTransport)
//!     .with_keyset(Keyset {
//!         subscribe_key: "sub-c-abc123",
//!     })
//!     .build()?;
//!
//! let history = client
//!     .fetch_messages()
//!     .channels(["my_channel".into()])
//!     .include_meta(true)
//!     .execute()
//!     .await?;
//!
//! for (channel, page) in &history.channels {
//!     println!("{channel}: {} message(s)", page.messages.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! * `crypto` - ships an AES-CBC [`CryptoProvider`] implementation for the
//!   history decryption pass.
//!
//! [`Transport`]: crate::core::Transport
//! [`CryptoProvider`]: crate::core::CryptoProvider

#![warn(missing_docs)]
#![forbid(unsafe_code)]

#[doc(inline)]
pub use crate::core::error::StreamHubError;
pub mod core;

#[doc(inline)]
pub use crate::dx::client::{Keyset, StreamHubClientBuilder, StreamHubClientInstance};
#[doc(inline)]
pub use crate::dx::history;
pub mod dx;

pub mod providers;
