//! StreamHub message counts module.
//!
//! The [`MessageCountsRequestBuilder`] lets you make and execute requests
//! that will count the messages stored on channels since the provided
//! timetoken(s).

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
            result::{message_counts_body_to_result, MessageCountsResponseBody, MessageCountsResult},
            timetoken::Timetoken,
        },
    },
};
use std::collections::HashMap;

/// The message counts request builder.
///
/// Allows you to build a message counts request that is sent to the
/// StreamHub network.
///
/// Either a single [`timetoken`] shared by all channels or a per-channel
/// [`channels_timetoken`] list has to be provided.
///
/// This struct is used by the [`message_counts`] method of the client.
///
/// [`timetoken`]: struct.MessageCountsRequestBuilder.html#method.timetoken
/// [`channels_timetoken`]: struct.MessageCountsRequestBuilder.html#method.channels_timetoken
/// [`message_counts`]: crate::dx::client::StreamHubClientInstance::message_counts
#[derive(Builder, Debug)]
#[builder(
    pattern = "owned",
    build_fn(vis = "pub(in crate::dx::history)", validate = "Self::validate")
)]
pub struct MessageCountsRequest<T, D> {
    /// Current client which can provide transportation to perform the
    /// request.
    #[builder(field(vis = "pub(in crate::dx::history)"), setter(custom))]
    pub(in crate::dx::history) client: StreamHubClientInstance<T, D>,

    /// Channels to count stored messages for.
    #[builder(field(vis = "pub(in crate::dx::history)"), setter(into))]
    pub(in crate::dx::history) channels: Vec<String>,

    /// Single timetoken to count messages since, shared by all channels.
    #[builder(
        field(vis = "pub(in crate::dx::history)"),
        setter(strip_option),
        default = "None"
    )]
    pub(in crate::dx::history) timetoken: Option<Timetoken>,

    /// Per-channel timetokens to count messages since.
    ///
    /// When provided, the list length must match the channel list length.
    #[builder(
        field(vis = "pub(in crate::dx::history)"),
        setter(strip_option, into),
        default = "None"
    )]
    pub(in crate::dx::history) channels_timetoken: Option<Vec<Timetoken>>,
}

impl<T, D> MessageCountsRequestBuilder<T, D> {
    /// Validate user-provided data for request builder.
    ///
    /// Validator ensure that the provided timetokens make up a valid message
    /// counts request.
    fn validate(&self) -> Result<(), String> {
        let channels_len = self.channels.as_ref().map_or_else(|| 0, |v| v.len());
        let timetoken = self.timetoken.as_ref().and_then(|v| v.as_ref());
        let channels_timetoken = self.channels_timetoken.as_ref().and_then(|v| v.as_ref());

        builders::validate_configuration(&self.client).and_then(|_| {
            if channels_len == 0 {
                Err("At least one channel should be provided".into())
            } else if timetoken.is_none() && channels_timetoken.is_none() {
                Err("Either timetoken or channels timetoken list should be provided".into())
            } else if channels_timetoken.is_some_and(|timetokens| timetokens.len() != channels_len)
            {
                Err("The number of channels timetokens should match the number of channels".into())
            } else {
                Ok(())
            }
        })
    }

    /// Build [`MessageCountsRequest`] from builder.
    fn request(self) -> Result<MessageCountsRequest<T, D>, StreamHubError> {
        self.build().map_err(|err| StreamHubError::Validation {
            details: err.to_string(),
        })
    }
}

impl<T, D> MessageCountsRequest<T, D> {
    /// Create transport request from the request builder.
    pub(in crate::dx::history) fn transport_request(
        &self,
    ) -> Result<TransportRequest, StreamHubError> {
        let sub_key = &self.client.config.subscribe_key;
        let mut query: HashMap<String, String> = HashMap::new();

        if let Some(timetoken) = self.timetoken {
            query.insert("timetoken".into(), timetoken.to_string());
        }

        if let Some(timetokens) = &self.channels_timetoken {
            query.insert(
                "channelsTimetoken".into(),
                timetokens
                    .iter()
                    .map(|timetoken| timetoken.to_string())
                    .collect::<Vec<String>>()
                    .join(","),
            );
        }

        Ok(TransportRequest {
            path: format!(
                "/v3/history/sub-key/{sub_key}/message-counts/{}",
                url_encoded_channels(&self.channels),
            ),
            query_parameters: query,
            method: TransportMethod::Get,
            headers: [(CONTENT_TYPE.into(), APPLICATION_JSON.into())].into(),
            body: None,
        })
    }
}

impl<T, D> MessageCountsRequestBuilder<T, D>
where
    T: Transport,
    D: Deserializer + 'static,
{
    /// Build and call asynchronous request.
    pub async fn execute(self) -> Result<MessageCountsResult, StreamHubError> {
        let request = self.request()?;
        let transport_request = request.transport_request()?;
        let client = request.client.clone();
        let deserializer = client.deserializer.clone();

        let (body, response) = transport_request
            .send::<MessageCountsResponseBody, _, _>(&client.transport, deserializer)
            .await?;

        message_counts_body_to_result(body, &response)
    }
}
