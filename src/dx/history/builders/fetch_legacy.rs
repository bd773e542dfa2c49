//! StreamHub deprecated fetch messages module.
//!
//! The [`FetchMessagesLegacyRequestBuilder`] lets you make and execute
//! requests against the first-generation history endpoint, which answers
//! with the positional response format and serves a single channel.
//!
//! Kept for keysets which haven't been migrated to message persistence v3
//! yet; new code should prefer [`fetch_messages`].
//!
//! [`fetch_messages`]: crate::dx::client::StreamHubClientInstance::fetch_messages

use derive_builder::Builder;

use crate::{
    core::{
        utils::{
            encoding::url_encode,
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

/// The deprecated fetch messages request builder.
///
/// Allows you to build a fetch messages request against the
/// first-generation history endpoint.
///
/// This struct is used by the [`fetch_messages_legacy`] method of the
/// client.
///
/// [`fetch_messages_legacy`]: crate::dx::client::StreamHubClientInstance::fetch_messages_legacy
#[derive(Builder, Debug)]
#[builder(
    pattern = "owned",
    build_fn(vis = "pub(in crate::dx::history)", validate = "Self::validate")
)]
pub struct FetchMessagesLegacyRequest<T, D> {
    /// Current client which can provide transportation to perform the
    /// request.
    #[builder(field(vis = "pub(in crate::dx::history)"), setter(custom))]
    pub(in crate::dx::history) client: StreamHubClientInstance<T, D>,

    /// Channel to fetch stored messages for.
    #[builder(field(vis = "pub(in crate::dx::history)"), setter(into))]
    pub(in crate::dx::history) channel: String,

    /// Maximum number of messages to return.
    #[builder(
        field(vis = "pub(in crate::dx::history)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::history) count: Option<usize>,

    /// Whether messages should be traversed from oldest to newest.
    #[builder(field(vis = "pub(in crate::dx::history)"), default = "false")]
    pub(in crate::dx::history) reverse: bool,

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
}

impl<T, D> FetchMessagesLegacyRequestBuilder<T, D> {
    /// Validate user-provided data for request builder.
    fn validate(&self) -> Result<(), String> {
        let channel_is_empty = self.channel.as_ref().map_or_else(|| true, |v| v.is_empty());

        builders::validate_configuration(&self.client).and_then(|_| {
            if channel_is_empty {
                Err("Channel should be provided".into())
            } else {
                Ok(())
            }
        })
    }

    /// Build [`FetchMessagesLegacyRequest`] from builder.
    fn request(self) -> Result<FetchMessagesLegacyRequest<T, D>, StreamHubError> {
        self.build().map_err(|err| StreamHubError::Validation {
            details: err.to_string(),
        })
    }
}

impl<T, D> FetchMessagesLegacyRequest<T, D> {
    /// Create transport request from the request builder.
    pub(in crate::dx::history) fn transport_request(
        &self,
    ) -> Result<TransportRequest, StreamHubError> {
        let sub_key = &self.client.config.subscribe_key;
        let mut query: HashMap<String, String> = HashMap::new();

        if let Some(count) = self.count {
            query.insert("count".into(), count.to_string());
        }

        // The endpoint predates unambiguous timetoken encoding; these two
        // are pinned so the response stays decodable.
        query.insert("stringtoken".into(), "false".into());
        query.insert("include_token".into(), "true".into());

        query.insert("reverse".into(), self.reverse.to_string());

        if let Some(start) = self.start {
            query.insert("start".into(), start.to_string());
        }

        if let Some(end) = self.end {
            query.insert("end".into(), end.to_string());
        }

        query.insert("include_meta".into(), self.include_meta.to_string());

        Ok(TransportRequest {
            path: format!(
                "/v2/history/sub-key/{sub_key}/channel/{}",
                url_encode(self.channel.as_bytes()),
            ),
            query_parameters: query,
            method: TransportMethod::Get,
            headers: [(CONTENT_TYPE.into(), APPLICATION_JSON.into())].into(),
            body: None,
        })
    }
}

impl<T, D> FetchMessagesLegacyRequestBuilder<T, D>
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

        let result = fetch_body_to_result(body, &response, &request.channel)?;

        Ok(match client.cryptor.as_deref() {
            Some(cryptor) => result.decrypted_with(cryptor),
            None => result,
        })
    }
}
