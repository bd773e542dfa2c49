//! StreamHub delete messages module.
//!
//! The [`DeleteMessagesRequestBuilder`] lets you make and execute requests
//! that will remove stored messages from channel history.

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
            result::{fetch_body_to_result, DeleteMessagesResult, FetchMessagesResponseBody},
            timetoken::Timetoken,
        },
    },
};
use std::collections::HashMap;

/// The delete messages request builder.
///
/// Allows you to build a delete messages request that is sent to the
/// StreamHub network.
///
/// This struct is used by the [`delete_messages`] method of the client.
///
/// [`delete_messages`]: crate::dx::client::StreamHubClientInstance::delete_messages
#[derive(Builder, Debug)]
#[builder(
    pattern = "owned",
    build_fn(vis = "pub(in crate::dx::history)", validate = "Self::validate")
)]
pub struct DeleteMessagesRequest<T, D> {
    /// Current client which can provide transportation to perform the
    /// request.
    #[builder(field(vis = "pub(in crate::dx::history)"), setter(custom))]
    pub(in crate::dx::history) client: StreamHubClientInstance<T, D>,

    /// Channels to remove stored messages from.
    #[builder(field(vis = "pub(in crate::dx::history)"), setter(into))]
    pub(in crate::dx::history) channels: Vec<String>,

    /// Timetoken delimiting the start of the removed range (exclusive).
    #[builder(
        field(vis = "pub(in crate::dx::history)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::history) start: Option<Timetoken>,

    /// Timetoken delimiting the end of the removed range (inclusive).
    #[builder(
        field(vis = "pub(in crate::dx::history)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::history) end: Option<Timetoken>,
}

impl<T, D> DeleteMessagesRequestBuilder<T, D> {
    /// Validate user-provided data for request builder.
    fn validate(&self) -> Result<(), String> {
        let channels_len = self.channels.as_ref().map_or_else(|| 0, |v| v.len());

        builders::validate_configuration(&self.client).and_then(|_| {
            if channels_len == 0 {
                Err("At least one channel should be provided".into())
            } else {
                Ok(())
            }
        })
    }

    /// Build [`DeleteMessagesRequest`] from builder.
    fn request(self) -> Result<DeleteMessagesRequest<T, D>, StreamHubError> {
        self.build().map_err(|err| StreamHubError::Validation {
            details: err.to_string(),
        })
    }
}

impl<T, D> DeleteMessagesRequest<T, D> {
    /// Create transport request from the request builder.
    pub(in crate::dx::history) fn transport_request(
        &self,
    ) -> Result<TransportRequest, StreamHubError> {
        let sub_key = &self.client.config.subscribe_key;
        let mut query: HashMap<String, String> = HashMap::new();

        if let Some(start) = self.start {
            query.insert("start".into(), start.to_string());
        }

        if let Some(end) = self.end {
            query.insert("end".into(), end.to_string());
        }

        Ok(TransportRequest {
            path: format!(
                "/v3/history/sub-key/{sub_key}/channel/{}",
                url_encoded_channels(&self.channels),
            ),
            query_parameters: query,
            method: TransportMethod::Delete,
            headers: [(CONTENT_TYPE.into(), APPLICATION_JSON.into())].into(),
            body: None,
        })
    }
}

impl<T, D> DeleteMessagesRequestBuilder<T, D>
where
    T: Transport,
    D: Deserializer + 'static,
{
    /// Build and call asynchronous request.
    pub async fn execute(self) -> Result<DeleteMessagesResult, StreamHubError> {
        let request = self.request()?;
        let transport_request = request.transport_request()?;
        let client = request.client.clone();
        let deserializer = client.deserializer.clone();

        let (body, response) = transport_request
            .send::<FetchMessagesResponseBody, _, _>(&client.transport, deserializer)
            .await?;

        let channel = request.channels.first().cloned().unwrap_or_default();
        fetch_body_to_result(body, &response, &channel)
    }
}
