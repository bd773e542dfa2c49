//! # Error types
//!
//! This module contains the error types for the [`streamhub`] crate.
//!
//! [`streamhub`]: ../index.html

use crate::core::TransportResponse;
use snafu::Snafu;

/// StreamHub error type
///
/// This type is used to represent errors that can occur while talking to the
/// StreamHub service. It is used as the error type for the [`Result`] type.
///
/// [`Result`]: https://doc.rust-lang.org/std/result/enum.Result.html
#[derive(Debug, Snafu)]
pub enum StreamHubError {
    /// This error is returned when the transport layer fails.
    #[snafu(display("Transport error: {details}"))]
    Transport {
        /// Transport-specific failure description.
        details: String,

        /// Operation status (HTTP) code, when a response has been received.
        status: u16,
    },

    /// This error is returned when the service answers with an error body.
    #[snafu(display("API error: {message}"))]
    API {
        /// Operation status (HTTP) code.
        status: u16,

        /// A message explaining what went wrong.
        message: String,

        /// Service which reported the error.
        service: Option<String>,

        /// The list of channels affected by the error.
        affected_channels: Option<Vec<String>>,

        /// Raw service response, when available, for diagnostics.
        response: Option<Box<TransportResponse>>,
    },

    /// This error is returned when the response body is not valid JSON or a
    /// structurally required field is absent or mistyped.
    #[snafu(display("Response deserialization error: {details}"))]
    Deserialization {
        /// Underlying parse failure description.
        details: String,
    },

    /// This error is returned when the response body is valid JSON but
    /// matches none of the known wire shapes.
    ///
    /// The original body bytes and status code are retained so callers can
    /// inspect what the service actually answered.
    #[snafu(display("Malformed response body (status code {status})"))]
    MalformedResponseBody {
        /// Operation status (HTTP) code.
        status: u16,

        /// Raw response body bytes.
        body: Vec<u8>,
    },

    /// This error is returned when a timetoken field could not be parsed as
    /// either a quoted or a numeric 64-bit integer.
    #[snafu(display("Malformed timetoken: {details}"))]
    MalformedTimetoken {
        /// Description of the offending value.
        details: String,
    },

    /// This error is returned when user-provided request data is incomplete
    /// or inconsistent. Reported before any network call is attempted.
    #[snafu(display("Request validation error: {details}"))]
    Validation {
        /// Description of the rejected request data.
        details: String,
    },

    /// This error is returned when provided data can't be encrypted.
    #[snafu(display("Data encryption error: {details}"))]
    Encryption {
        /// Cryptor failure description.
        details: String,
    },

    /// This error is returned when provided data can't be decrypted.
    #[snafu(display("Data decryption error: {details}"))]
    Decryption {
        /// Cryptor failure description.
        details: String,
    },

    /// This error is returned when a cryptor can't be created from the
    /// provided cipher key material.
    #[snafu(display("Cryptor initialization error: {details}"))]
    CryptoInitialization {
        /// Cryptor construction failure description.
        details: String,
    },

    /// This error is returned when the initialization of the client fails.
    #[snafu(display("Client initialization error: {details}"))]
    ClientInitialization {
        /// Client construction failure description.
        details: String,
    },
}

impl StreamHubError {
    /// Create general API call error.
    pub(crate) fn general_api_error<S>(
        message: S,
        status: Option<u16>,
        response: Option<Box<TransportResponse>>,
    ) -> Self
    where
        S: Into<String>,
    {
        StreamHubError::API {
            status: status.unwrap_or(400),
            message: message.into(),
            service: None,
            affected_channels: None,
            response,
        }
    }

    /// Attach the raw service response to an API error for diagnostics.
    pub(crate) fn attach_response(self, response: TransportResponse) -> Self {
        match self {
            StreamHubError::API {
                status,
                message,
                service,
                affected_channels,
                ..
            } => StreamHubError::API {
                status,
                message,
                service,
                affected_channels,
                response: Some(Box::new(response)),
            },
            _ => self,
        }
    }
}
