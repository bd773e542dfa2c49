//! StreamHub fetch messages module.
//!
//! The [`FetchMessagesRequestBuilder`] lets you make and execute requests
//! that will retrieve stored messages, and optionally their annotations,
//! from one or more channels.

use derive_builder::Builder;

use crate::{
    core::{
        utils::{
            encoding::url_encoded_channels,
            headers::{APPLICATION_JSON, CONTENT_TYPE},
        },
        Deserializer, StreamHubError, Transport, TransportMethod, TransportRequest,
    },
    dx::{
        client::StreamHubClientInstance,
        history::{
            builders,
            result::{fetch_body_to_result, FetchMessagesResponseBody, FetchMessagesResult},
            timetoken::Timetoken,
        },
    },
};
use std::collections::HashMap;

/// The fetch messages request builder.
///
/// Allows you to build a fetch messages request that is sent to the
/// StreamHub network.
///
/// This struct is used by the [`fetch_messages`] method of the client.
///
/// [`fetch_messages`]: crate::dx::client::StreamHubClientInstance::fetch_messages
#[derive(Builder, Debug)]
#[builder(
    pattern = "owned",
    build_fn(vis = "pub(in crate::dx::history)", validate = "Self::validate")
)]
pub struct FetchMessagesRequest<T, D> {
    /// Current client which can provide transportation to perform the
    /// request.
    #[builder(field(vis = "pub(in crate::dx::history)"), setter(custom))]
    pub(in crate::dx::history) client: StreamHubClientInstance<T, D>,

    /// Channels to fetch stored messages for.
    #[builder(field(vis = "pub(in crate::dx::history)"), setter(into))]
    pub(in crate::dx::history) channels: Vec<String>,

    /// Maximum number of messages to return per channel.
    #[builder(
        field(vis = "pub(in crate::dx::history)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::history) max: Option<usize>,

    /// Timetoken delimiting the start of the requested page (exclusive).
    ///
    /// Passed through to the service verbatim.
    #[builder(
        field(vis = "pub(in crate::dx::history)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::history) start: Option<Timetoken>,

    /// Timetoken delimiting the end of the requested page (inclusive).
    ///
    /// Passed through to the service verbatim.
    #[builder(
        field(vis = "pub(in crate::dx::history)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::history) end: Option<Timetoken>,

    /// Whether message metadata should be included in the response.
    #[builder(field(vis = "pub(in crate::dx::history)"), default = "false")]
    pub(in crate::dx::history) include_meta: bool,

    /// Whether message actions should be included in the response.
    ///
    /// Routes the request to the annotations-aware endpoint, which serves a
    /// single channel per request.
    #[builder(field(vis = "pub(in crate::dx::history)"), default = "false")]
    pub(in crate::dx::history) include_message_actions: bool,
}

impl<T, D> FetchMessagesRequestBuilder<T, D> {
    /// Validate user-provided data for request builder.
    ///
    /// Validator ensure that list of provided data is enough to build valid
    /// fetch messages request instance.
    fn validate(&self) -> Result<(), String> {
        let channels_len = self.channels.as_ref().map_or_else(|| 0, |v| v.len());
        let with_actions = self.include_message_actions.unwrap_or(false);

        builders::validate_configuration(&self.client).and_then(|_| {
            if channels_len == 0 {
                Err("At least one channel should be provided".into())
            } else if with_actions && channels_len > 1 {
                Err("History with actions can be fetched only for a single channel".into())
            } else {
                Ok(())
            }
        })
    }

    /// Build [`FetchMessagesRequest`] from builder.
    fn request(self) -> Result<FetchMessagesRequest<T, D>, StreamHubError> {
        self.build().map_err(|err| StreamHubError::Validation {
            details: err.to_string(),
        })
    }
}

impl<T, D> FetchMessagesRequest<T, D> {
    /// Create transport request from the request builder.
    pub(in crate::dx::history) fn transport_request(
        &self,
    ) -> Result<TransportRequest, StreamHubError> {
        let sub_key = &self.client.config.subscribe_key;
        let mut query: HashMap<String, String> = HashMap::new();

        if let Some(max) = self.max {
            query.insert("max".into(), max.to_string());
        }

        if let Some(start) = self.start {
            query.insert("start".into(), start.to_string());
        }

        if let Some(end) = self.end {
            query.insert("end".into(), end.to_string());
        }

        query.insert("include_meta".into(), self.include_meta.to_string());

        let endpoint = if self.include_message_actions {
            "history-with-actions"
        } else {
            "history"
        };

        Ok(TransportRequest {
            path: format!(
                "/v3/{endpoint}/sub-key/{sub_key}/channel/{}",
                url_encoded_channels(&self.channels),
            ),
            query_parameters: query,
            method: TransportMethod::Get,
            headers: [(CONTENT_TYPE.into(), APPLICATION_JSON.into())].into(),
            body: None,
        })
    }
}

impl<T, D> FetchMessagesRequestBuilder<T, D>
where
    T: Transport,
    D: Deserializer + 'static,
{
    /// Build and call asynchronous request.
    pub async fn execute(self) -> Result<FetchMessagesResult, StreamHubError> {
        let request = self.request()?;
        let transport_request = request.transport_request()?;
        let client = request.client.clone();
        let deserializer = client.deserializer.clone();

        let (body, response) = transport_request
            .send::<FetchMessagesResponseBody, _, _>(&client.transport, deserializer)
            .await?;

        // The deprecated positional format doesn't echo the channel name;
        // recover it from the request.
        let channel = request.channels.first().cloned().unwrap_or_default();
        let result = fetch_body_to_result(body, &response, &channel)?;

        Ok(match client.cryptor.as_deref() {
            Some(cryptor) => result.decrypted_with(cryptor),
            None => result,
        })
    }
}
