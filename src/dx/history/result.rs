//! History result module.
//!
//! This module contains the normalized history types together with the
//! decoding of the two response formats the message history service family
//! has shipped over time, and the optional payload decryption pass.

use crate::core::{APIErrorBody, CryptoProvider, StreamHubError, TransportResponse};
use crate::dx::history::timetoken::{self, Timetoken};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// A single message annotation.
///
/// Actions are lightweight markers (reactions, receipts, custom flags)
/// contributed by users on top of an already stored message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageAction {
    /// Identifier of the user who added the action.
    pub uuid: String,

    /// Action type (feature namespace, e.g. `reaction` or `receipt`).
    pub r#type: String,

    /// Action value within the type namespace (e.g. `smile`).
    pub value: String,

    /// Timetoken at which the action has been added.
    pub action_timetoken: Timetoken,

    /// Timetoken of the message this action is attached to.
    pub message_timetoken: Timetoken,
}

/// Wire form of a single action contribution.
#[derive(Debug, Clone, Deserialize)]
struct MessageActionReceipt {
    /// Identifier of the user who added the action.
    uuid: String,

    /// Timetoken at which the action has been added.
    #[serde(rename = "actionTimetoken", deserialize_with = "timetoken::deserialize")]
    action_timetoken: Timetoken,
}

/// Nested wire grouping of annotations: action type, then action value,
/// then the list of contributions.
type MessageActionsMap = HashMap<String, HashMap<String, Vec<MessageActionReceipt>>>;

/// Flatten the nested wire grouping into a flat action list stamped with the
/// owning message timetoken.
///
/// The emitted order follows the iteration order of the wire maps and is not
/// significant.
fn reconstruct_actions(
    actions: MessageActionsMap,
    message_timetoken: Timetoken,
) -> Vec<MessageAction> {
    let mut reconstructed = Vec::new();

    for (action_type, values) in actions {
        for (action_value, receipts) in values {
            for receipt in receipts {
                reconstructed.push(MessageAction {
                    uuid: receipt.uuid,
                    r#type: action_type.clone(),
                    value: action_value.clone(),
                    action_timetoken: receipt.action_timetoken,
                    message_timetoken,
                });
            }
        }
    }

    reconstructed
}

/// A single history record.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryMessage {
    /// Message payload as it has been received from the service.
    ///
    /// The payload is domain data and stays an untyped JSON value.
    pub message: Value,

    /// Timetoken of the message.
    pub timetoken: Timetoken,

    /// Message metadata, when `include_meta` has been requested and the
    /// publisher supplied one.
    pub meta: Option<Value>,

    /// Actions attached to this message.
    ///
    /// Every entry carries this message's timetoken as
    /// [`MessageAction::message_timetoken`]. The sequence order is not
    /// significant; treat it as a set.
    pub actions: Vec<MessageAction>,
}

impl<'de> Deserialize<'de> for HistoryMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct HistoryMessagePayload {
            message: Value,
            timetoken: Value,
            #[serde(default)]
            meta: Option<Value>,
            #[serde(default)]
            actions: MessageActionsMap,
        }

        let payload = HistoryMessagePayload::deserialize(deserializer)?;
        let timetoken = timetoken::decode(&payload.timetoken).map_err(serde::de::Error::custom)?;
        let actions = reconstruct_actions(payload.actions, timetoken);

        Ok(Self {
            message: payload.message,
            timetoken,
            meta: payload.meta,
            actions,
        })
    }
}

/// Messages of a single channel for one history page.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelHistory {
    /// Messages in the order the service returned them.
    pub messages: Vec<HistoryMessage>,

    /// Timetoken of the start of the page.
    pub start_timetoken: Timetoken,

    /// Timetoken of the end of the page.
    pub end_timetoken: Timetoken,
}

impl<'de> Deserialize<'de> for ChannelHistory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // The wire shape is a bare message array. Page bounds default to
        // the first / last message timetoken.
        let messages = Vec::<HistoryMessage>::deserialize(deserializer)?;
        let start_timetoken = messages.first().map_or(0, |message| message.timetoken);
        let end_timetoken = messages.last().map_or(0, |message| message.timetoken);

        Ok(Self {
            messages,
            start_timetoken,
            end_timetoken,
        })
    }
}

/// The result of a fetch messages operation.
///
/// Channels without any stored messages are absent from [`channels`], so
/// map-key presence distinguishes "channel has history" from "channel had
/// zero results".
///
/// [`channels`]: struct.FetchMessagesResult.html#structfield.channels
#[derive(Debug, Clone, PartialEq)]
pub struct FetchMessagesResult {
    /// Operation status (HTTP) code.
    pub status: u16,

    /// Whether the service reported the operation as failed.
    pub error: bool,

    /// Service-provided status / error message.
    pub error_message: String,

    /// Per-channel history pages.
    pub channels: HashMap<String, ChannelHistory>,
}

/// The result of a delete messages operation.
///
/// The service answers message removal with the same keyed shape it uses for
/// fetches, with an empty channel mapping.
pub type DeleteMessagesResult = FetchMessagesResult;

impl FetchMessagesResult {
    /// Run the payload decryption pass with the provided cryptor.
    ///
    /// Every message payload that is shipped as base64 text is decrypted and
    /// replaced with its UTF-8 decoded form. A payload that can't be decoded,
    /// decrypted or stringified is kept exactly as received and a warning is
    /// emitted; a single undecryptable record never hides the rest of the
    /// page.
    ///
    /// Returns a new result value; `self` is left untouched so callers can
    /// keep the pre-decryption value around.
    pub fn decrypted_with(&self, cryptor: &dyn CryptoProvider) -> Self {
        let channels = self
            .channels
            .iter()
            .map(|(name, history)| {
                let messages = history
                    .messages
                    .iter()
                    .map(|message| decrypted_message(message, cryptor))
                    .collect();

                (
                    name.clone(),
                    ChannelHistory {
                        messages,
                        start_timetoken: history.start_timetoken,
                        end_timetoken: history.end_timetoken,
                    },
                )
            })
            .collect();

        Self {
            status: self.status,
            error: self.error,
            error_message: self.error_message.clone(),
            channels,
        }
    }
}

/// Decrypt a single message payload, keeping the original on any failure.
fn decrypted_message(message: &HistoryMessage, cryptor: &dyn CryptoProvider) -> HistoryMessage {
    // Only payloads shipped as base64 text can hold ciphertext.
    let Some(encoded) = message.message.as_str() else {
        return message.clone();
    };

    let decrypted = general_purpose::STANDARD
        .decode(encoded)
        .map_err(|err| StreamHubError::Decryption {
            details: err.to_string(),
        })
        .and_then(|data| cryptor.decrypt(data))
        .and_then(|data| {
            String::from_utf8(data).map_err(|err| StreamHubError::Decryption {
                details: err.to_string(),
            })
        });

    match decrypted {
        Ok(payload) => HistoryMessage {
            message: Value::String(payload),
            ..message.clone()
        },
        Err(err) => {
            log::warn!(
                "History message with timetoken {} failed to decrypt: {err}",
                message.timetoken
            );
            message.clone()
        }
    }
}

/// Current keyed-object response shape of the fetch / delete family.
///
/// # Example
/// ```json
/// {
///     "status": 200,
///     "error": false,
///     "error_message": "",
///     "channels": {
///         "my_channel": [
///             {"message": "Hello", "timetoken": "15909263655404500"}
///         ]
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FetchMessagesSuccessBody {
    /// Operation status (HTTP) code.
    pub status: u16,

    /// Whether the service reported the operation as failed.
    pub error: bool,

    /// Service-provided status / error message.
    pub error_message: String,

    /// Message list per channel.
    #[serde(default)]
    pub channels: HashMap<String, ChannelHistory>,
}

/// Deprecated positional response shape of the fetch family.
///
/// Exactly three elements: the message list and the page start / end
/// timetokens. The channel name is not echoed and has to be recovered from
/// the originating request.
///
/// # Example
/// ```json
/// [[{"message": "Hello", "timetoken": 15909263655404500}], 15909263655404500, 15909263655404500]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyFetchMessagesBody(
    Vec<HistoryMessage>,
    #[serde(deserialize_with = "timetoken::deserialize")] Timetoken,
    #[serde(deserialize_with = "timetoken::deserialize")] Timetoken,
);

/// The response body of the message history fetch / delete family.
///
/// The two historically deployed wire shapes are decoded as an ordered
/// attempt: the current keyed shape first, the deprecated positional shape
/// second, known service error shapes after that. Anything else that still
/// is valid JSON lands in the trailing variant so the decoder can report the
/// original payload instead of a bare parse error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FetchMessagesResponseBody {
    /// Current keyed-object response shape.
    SuccessResponse(FetchMessagesSuccessBody),

    /// Deprecated positional response shape.
    LegacySuccessResponse(LegacyFetchMessagesBody),

    /// Service error response.
    ErrorResponse(APIErrorBody),

    /// Valid JSON that matches none of the known shapes.
    MalformedResponse(Value),
}

/// Normalize a decoded fetch / delete body.
///
/// `channel` is the first channel of the originating request; the
/// deprecated positional shape doesn't echo the channel name, so the decoder
/// has to recover it from the request side.
pub(in crate::dx::history) fn fetch_body_to_result(
    body: FetchMessagesResponseBody,
    response: &TransportResponse,
    channel: &str,
) -> Result<FetchMessagesResult, StreamHubError> {
    match body {
        FetchMessagesResponseBody::SuccessResponse(success) => Ok(FetchMessagesResult {
            status: success.status,
            error: success.error,
            error_message: success.error_message,
            channels: success
                .channels
                .into_iter()
                .filter(|(_, history)| !history.messages.is_empty())
                .collect(),
        }),
        FetchMessagesResponseBody::LegacySuccessResponse(legacy) => {
            let LegacyFetchMessagesBody(messages, start_timetoken, end_timetoken) = legacy;
            let mut channels = HashMap::new();

            // A channel with zero history is omitted from the mapping
            // instead of being present with an empty list.
            if !messages.is_empty() {
                channels.insert(
                    channel.to_string(),
                    ChannelHistory {
                        messages,
                        start_timetoken,
                        end_timetoken,
                    },
                );
            }

            Ok(FetchMessagesResult {
                status: response.status,
                error: false,
                error_message: String::new(),
                channels,
            })
        }
        FetchMessagesResponseBody::ErrorResponse(error_body) => {
            Err(StreamHubError::from(error_body).attach_response(response.clone()))
        }
        FetchMessagesResponseBody::MalformedResponse(_) => {
            Err(StreamHubError::MalformedResponseBody {
                status: response.status,
                body: response.body.clone().unwrap_or_default(),
            })
        }
    }
}

/// The result of a message counts operation.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageCountsResult {
    /// Operation status (HTTP) code.
    pub status: u16,

    /// Whether the service reported the operation as failed.
    pub error: bool,

    /// Service-provided status / error message.
    pub error_message: String,

    /// Number of messages per channel since the requested timetoken(s).
    pub channels: HashMap<String, u64>,

    /// Opaque pagination markers per channel, passed through from the
    /// service unmodified.
    pub more: HashMap<String, Value>,
}

/// Message counts response shape.
///
/// # Example
/// ```json
/// {
///     "status": 200,
///     "error": false,
///     "error_message": "",
///     "channels": {"my_channel": 10},
///     "more": {"my_channel": {"url": "..."}}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageCountsSuccessBody {
    /// Operation status (HTTP) code.
    pub status: u16,

    /// Whether the service reported the operation as failed.
    pub error: bool,

    /// Service-provided status / error message.
    pub error_message: String,

    /// Number of messages per channel.
    pub channels: HashMap<String, u64>,

    /// Opaque pagination markers per channel.
    #[serde(default)]
    pub more: HashMap<String, Value>,
}

/// The response body of a message counts operation.
///
/// No version ambiguity exists for this endpoint: a single structural decode
/// either succeeds or the body is reported as malformed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MessageCountsResponseBody {
    /// Message counts response.
    SuccessResponse(MessageCountsSuccessBody),

    /// Service error response.
    ErrorResponse(APIErrorBody),

    /// Valid JSON that matches none of the known shapes.
    MalformedResponse(Value),
}

/// Normalize a decoded message counts body.
pub(in crate::dx::history) fn message_counts_body_to_result(
    body: MessageCountsResponseBody,
    response: &TransportResponse,
) -> Result<MessageCountsResult, StreamHubError> {
    match body {
        MessageCountsResponseBody::SuccessResponse(success) => Ok(MessageCountsResult {
            status: success.status,
            error: success.error,
            error_message: success.error_message,
            channels: success.channels,
            more: success.more,
        }),
        MessageCountsResponseBody::ErrorResponse(error_body) => {
            Err(StreamHubError::from(error_body).attach_response(response.clone()))
        }
        MessageCountsResponseBody::MalformedResponse(_) => {
            Err(StreamHubError::MalformedResponseBody {
                status: response.status,
                body: response.body.clone().unwrap_or_default(),
            })
        }
    }
}
