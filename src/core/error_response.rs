//! # Error response
//!
//! The module contains a result type that represents parsed service error
//! responses for [`StreamHubError`] consumption.

use crate::core::StreamHubError;

/// Implementation for [`APIErrorBody`] to create error from service error
/// response body.
impl From<APIErrorBody> for StreamHubError {
    fn from(value: APIErrorBody) -> Self {
        StreamHubError::API {
            status: value.status(),
            message: value.message(),
            service: value.service(),
            affected_channels: value.affected_channels(),
            response: None,
        }
    }
}

/// Additional error information struct.
///
/// This structure used by [`APIErrorBody::AsObjectWithServiceAndErrorPayload`]
/// to represent list of errors in response.
#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ErrorObjectPayload {
    /// The list of channels for which an error was reported.
    channels: Option<Vec<String>>,
}

/// StreamHub service error response.
///
/// `APIErrorBody` enum variants covers the error responses which the service
/// returns for history family endpoints.
#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum APIErrorBody {
    /// Error response in format of dictionary.
    ///
    /// # Example
    /// ```json
    /// {
    ///     "message": "Forbidden",
    ///     "payload": {
    ///         "channels": [
    ///             "test-channel1"
    ///         ]
    ///     },
    ///     "error": true,
    ///     "service": "Access Manager",
    ///     "status": 403
    /// }
    /// ```
    AsObjectWithServiceAndErrorPayload {
        /// Operation status (HTTP) code.
        status: u16,

        /// There is a flag that tells if this is an error response.
        error: bool,

        /// Service which reported an error.
        service: String,

        /// A message explaining what went wrong.
        message: String,

        /// Payload with additional information about error.
        payload: ErrorObjectPayload,
    },

    /// Error response in format of dictionary.
    ///
    /// # Example
    /// ```json
    /// {
    ///     "status": 413,
    ///     "error": true,
    ///     "service": "Balancer",
    ///     "message": "Request Entity Too Large."
    /// }
    /// ```
    AsObjectWithService {
        /// Operation status (HTTP) code.
        status: u16,

        /// There is a flag that tells if this is an error response.
        error: bool,

        /// Service which reported an error.
        service: String,

        /// A message explaining what went wrong.
        message: String,
    },

    /// Error response in format of dictionary.
    ///
    /// # Example
    /// ```json
    /// {
    ///     "status": 429,
    ///     "error": true,
    ///     "message": "Too many requests."
    /// }
    /// ```
    AsObjectWithMessage {
        /// Operation status (HTTP) code.
        status: u16,

        /// There is a flag that tells if this is an error response.
        error: bool,

        /// A message explaining what went wrong.
        message: String,
    },
}

impl APIErrorBody {
    /// Retrieve status code from error body payload.
    fn status(&self) -> u16 {
        match self {
            APIErrorBody::AsObjectWithServiceAndErrorPayload { status, .. } => *status,
            APIErrorBody::AsObjectWithService { status, .. } => *status,
            APIErrorBody::AsObjectWithMessage { status, .. } => *status,
        }
    }

    /// Retrieve service name from error body payload.
    fn service(&self) -> Option<String> {
        match self {
            APIErrorBody::AsObjectWithServiceAndErrorPayload { service, .. } => {
                Some(service.to_owned())
            }
            APIErrorBody::AsObjectWithService { service, .. } => Some(service.to_owned()),
            _ => None,
        }
    }

    fn message(&self) -> String {
        match self {
            APIErrorBody::AsObjectWithServiceAndErrorPayload {
                message, payload, ..
            } => match &payload.channels {
                Some(channels) if !channels.is_empty() => {
                    format!("{} (affected channels: {})", message, channels.join(", "))
                }
                _ => message.to_owned(),
            },
            APIErrorBody::AsObjectWithService { message, .. } => message.to_owned(),
            APIErrorBody::AsObjectWithMessage { message, .. } => message.to_owned(),
        }
    }

    fn affected_channels(&self) -> Option<Vec<String>> {
        match self {
            APIErrorBody::AsObjectWithServiceAndErrorPayload { payload, .. } => {
                payload.channels.clone()
            }
            _ => None,
        }
    }
}
