//! # Transport Request
//!
//! This module contains the `TransportRequest` struct and related types.
//!
//! The request decoding layer produces these values; a [`Transport`]
//! implementation turns them into actual network exchanges.
//!
//! [`Transport`]: ../transport/trait.Transport.html

use crate::core::{Deserializer, StreamHubError, Transport, TransportResponse};
use std::{collections::HashMap, fmt::Display, sync::Arc};

/// The method to use for a request.
///
/// This enum represents the method to use for a request. It is used by the
/// [`TransportRequest`] struct.
///
/// [`TransportRequest`]: struct.TransportRequest.html
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub enum TransportMethod {
    /// The GET method.
    #[default]
    Get,

    /// The DELETE method.
    Delete,
}

impl Display for TransportMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TransportMethod::Get => "GET",
                TransportMethod::Delete => "DELETE",
            }
        )
    }
}

/// This struct represents a request to be sent to the StreamHub service.
///
/// All fields are representing certain parts of the request that can be used
/// to prepare one.
///
/// [`Transport`]: ../transport/trait.Transport.html
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct TransportRequest {
    /// path to the resource
    pub path: String,

    /// query parameters to be sent with the request
    pub query_parameters: HashMap<String, String>,

    /// method to use for the request
    pub method: TransportMethod,

    /// headers to be sent with the request
    pub headers: HashMap<String, String>,

    /// body to be sent with the request
    pub body: Option<Vec<u8>>,
}

impl TransportRequest {
    /// Send the request through the provided transport and deserialize the
    /// response body.
    ///
    /// Returns the deserialized body together with the raw transport
    /// response, so callers can finish normalization with the status code
    /// and original bytes at hand.
    pub(crate) async fn send<B, T, D>(
        &self,
        transport: &T,
        deserializer: Arc<D>,
    ) -> Result<(B, TransportResponse), StreamHubError>
    where
        B: for<'de> serde::Deserialize<'de>,
        T: Transport + ?Sized,
        D: Deserializer + ?Sized,
    {
        let response = transport.send(self.clone()).await?;

        match response.body.as_deref() {
            Some(bytes) => {
                let body = deserializer.deserialize::<B>(bytes)?;
                Ok((body, response))
            }
            None => Err(StreamHubError::general_api_error(
                "Service answered with an empty response body",
                Some(response.status),
                Some(Box::new(response)),
            )),
        }
    }
}
