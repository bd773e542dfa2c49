//! # History module.
//!
//! The history module allows fetching, removing and counting the messages
//! stored on channels of the StreamHub network.
//!
//! Two response formats are in production for the fetch family: the current
//! keyed-object format and the deprecated positional format. The module
//! normalizes both into the same result types, so callers never need to know
//! which one the service answered with.

#[doc(inline)]
pub use result::{
    ChannelHistory, DeleteMessagesResult, FetchMessagesResponseBody, FetchMessagesResult,
    FetchMessagesSuccessBody, HistoryMessage, LegacyFetchMessagesBody, MessageAction,
    MessageCountsResponseBody, MessageCountsResult, MessageCountsSuccessBody,
};
pub mod result;

#[doc(inline)]
pub use timetoken::Timetoken;
pub mod timetoken;

#[doc(inline)]
pub use builders::{
    delete::{DeleteMessagesRequest, DeleteMessagesRequestBuilder},
    fetch::{FetchMessagesRequest, FetchMessagesRequestBuilder},
    fetch_legacy::{FetchMessagesLegacyRequest, FetchMessagesLegacyRequestBuilder},
    message_counts::{MessageCountsRequest, MessageCountsRequestBuilder},
};
pub mod builders;

use crate::dx::client::StreamHubClientInstance;

impl<T, D> StreamHubClientInstance<T, D> {
    /// Create a new fetch messages builder.
    ///
    /// This method is used to retrieve the messages stored on one or more
    /// channels, and optionally the actions attached to them.
    ///
    /// Instance of [`FetchMessagesRequestBuilder`] is returned.
    ///
    /// # Example
    /// ```no_run
    /// # use streamhub::{Keyset, StreamHubClientBuilder};
    /// # use streamhub::core::{Transport, TransportRequest, TransportResponse, StreamHubError};
    /// # struct MyTransport;
    /// # #[async_trait::async_trait]
    /// # impl Transport for MyTransport {
    /// #     async fn send(&self, _request: TransportRequest) -> Result<TransportResponse, StreamHubError> {
    /// #         unimplemented!()
    /// #     }
    /// # }
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = // StreamHubClientInstance
    /// #     StreamHubClientBuilder::with_transport(MyTransport)
    /// #         .with_keyset(Keyset {
    /// #             subscribe_key: "demo",
    /// #         })
    /// #         .build()?;
    ///
    /// let history = client
    ///     .fetch_messages()
    ///     .channels(["my_channel".into()])
    ///     .include_message_actions(true)
    ///     .execute()
    ///     .await?;
    ///
    /// if let Some(channel) = history.channels.get("my_channel") {
    ///     println!("{} stored message(s)", channel.messages.len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn fetch_messages(&self) -> FetchMessagesRequestBuilder<T, D> {
        FetchMessagesRequestBuilder {
            client: Some(self.clone()),
            ..Default::default()
        }
    }

    /// Create a new fetch messages builder for the deprecated
    /// single-channel history endpoint.
    ///
    /// The endpoint answers with the positional response format; the
    /// normalized result is indistinguishable from [`fetch_messages`]
    /// output.
    ///
    /// Instance of [`FetchMessagesLegacyRequestBuilder`] is returned.
    ///
    /// [`fetch_messages`]: Self::fetch_messages
    pub fn fetch_messages_legacy(&self) -> FetchMessagesLegacyRequestBuilder<T, D> {
        FetchMessagesLegacyRequestBuilder {
            client: Some(self.clone()),
            ..Default::default()
        }
    }

    /// Create a new delete messages builder.
    ///
    /// This method is used to remove the messages stored on one or more
    /// channels.
    ///
    /// Instance of [`DeleteMessagesRequestBuilder`] is returned.
    pub fn delete_messages(&self) -> DeleteMessagesRequestBuilder<T, D> {
        DeleteMessagesRequestBuilder {
            client: Some(self.clone()),
            ..Default::default()
        }
    }

    /// Create a new message counts builder.
    ///
    /// This method is used to count the messages stored on channels since
    /// the provided timetoken(s).
    ///
    /// Instance of [`MessageCountsRequestBuilder`] is returned.
    pub fn message_counts(&self) -> MessageCountsRequestBuilder<T, D> {
        MessageCountsRequestBuilder {
            client: Some(self.clone()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod should {
    use super::*;
    use crate::{
        core::{StreamHubError, Transport, TransportMethod, TransportRequest, TransportResponse},
        providers::deserialization_serde::DeserializerSerde,
        Keyset, StreamHubClientBuilder,
    };
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    struct MockTransport {
        status: u16,
        response_body: &'static str,
        captured: Arc<Mutex<Option<TransportRequest>>>,
    }

    #[async_trait::async_trait]
    impl Transport for MockTransport {
        async fn send(&self, req: TransportRequest) -> Result<TransportResponse, StreamHubError> {
            *self.captured.lock().unwrap() = Some(req);

            Ok(TransportResponse {
                status: self.status,
                body: Some(self.response_body.as_bytes().to_vec()),
                ..Default::default()
            })
        }
    }

    fn client_with(
        status: u16,
        response_body: &'static str,
        captured: Arc<Mutex<Option<TransportRequest>>>,
    ) -> StreamHubClientInstance<MockTransport, DeserializerSerde> {
        StreamHubClientBuilder::with_transport(MockTransport {
            status,
            response_body,
            captured,
        })
        .with_keyset(Keyset {
            subscribe_key: "demo",
        })
        .build()
        .expect("Client should be created")
    }

    #[tokio::test]
    async fn fetch_messages_from_keyed_response() {
        let captured = Arc::new(Mutex::new(None));
        let client = client_with(
            200,
            r#"{
                "status": 200, "error": false, "error_message": "",
                "channels": {"chan1": [
                    {"message": "a", "timetoken": "100"},
                    {"message": "b", "timetoken": "200"}
                ]}
            }"#,
            captured.clone(),
        );

        let result = client
            .fetch_messages()
            .channels(["chan1".into()])
            .include_meta(true)
            .execute()
            .await
            .unwrap();

        let request = captured.lock().unwrap().clone().unwrap();
        assert_eq!(request.path, "/v3/history/sub-key/demo/channel/chan1");
        assert_eq!(request.method, TransportMethod::Get);
        assert_eq!(
            request.query_parameters.get("include_meta"),
            Some(&"true".to_string())
        );

        let history = &result.channels["chan1"];
        assert_eq!(history.messages.len(), 2);
        assert_eq!(history.start_timetoken, 100);
        assert_eq!(history.end_timetoken, 200);
    }

    #[tokio::test]
    async fn fetch_messages_with_actions_from_dedicated_endpoint() {
        let captured = Arc::new(Mutex::new(None));
        let client = client_with(
            200,
            r#"{
                "status": 200, "error": false, "error_message": "",
                "channels": {"chan1": [{
                    "message": "a", "timetoken": "100",
                    "actions": {"reaction": {"smile": [{"uuid": "u1", "actionTimetoken": "150"}]}}
                }]}
            }"#,
            captured.clone(),
        );

        let result = client
            .fetch_messages()
            .channels(["chan1".into()])
            .include_message_actions(true)
            .execute()
            .await
            .unwrap();

        let request = captured.lock().unwrap().clone().unwrap();
        assert_eq!(
            request.path,
            "/v3/history-with-actions/sub-key/demo/channel/chan1"
        );

        let message = &result.channels["chan1"].messages[0];
        assert_eq!(message.actions.len(), 1);
        assert_eq!(message.actions[0].uuid, "u1");
        assert_eq!(message.actions[0].r#type, "reaction");
        assert_eq!(message.actions[0].value, "smile");
        assert_eq!(message.actions[0].action_timetoken, 150);
        assert_eq!(message.actions[0].message_timetoken, 100);
    }

    #[tokio::test]
    async fn fetch_messages_from_positional_response() {
        let captured = Arc::new(Mutex::new(None));
        let client = client_with(
            200,
            r#"[[{"message":"a","timetoken":"100"},{"message":"b","timetoken":"200"}], 100, 200]"#,
            captured.clone(),
        );

        let result = client
            .fetch_messages_legacy()
            .channel("chan1")
            .count(25)
            .execute()
            .await
            .unwrap();

        let request = captured.lock().unwrap().clone().unwrap();
        assert_eq!(request.path, "/v2/history/sub-key/demo/channel/chan1");
        assert_eq!(
            request.query_parameters.get("count"),
            Some(&"25".to_string())
        );
        assert_eq!(
            request.query_parameters.get("stringtoken"),
            Some(&"false".to_string())
        );
        assert_eq!(
            request.query_parameters.get("include_token"),
            Some(&"true".to_string())
        );
        assert_eq!(
            request.query_parameters.get("reverse"),
            Some(&"false".to_string())
        );

        // The channel key is recovered from the request.
        let history = &result.channels["chan1"];
        assert_eq!(history.messages.len(), 2);
        assert_eq!(history.start_timetoken, 100);
        assert_eq!(history.end_timetoken, 200);
    }

    #[tokio::test]
    async fn not_fetch_messages_without_channels() {
        let captured = Arc::new(Mutex::new(None));
        let client = client_with(200, "{}", captured.clone());

        let result = client
            .fetch_messages()
            .channels(Vec::<String>::new())
            .execute()
            .await;

        assert!(matches!(result, Err(StreamHubError::Validation { .. })));
        assert!(captured.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn not_fetch_messages_legacy_without_channel() {
        let captured = Arc::new(Mutex::new(None));
        let client = client_with(200, "{}", captured.clone());

        let result = client.fetch_messages_legacy().channel("").execute().await;

        assert!(matches!(result, Err(StreamHubError::Validation { .. })));
        assert!(captured.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn not_delete_messages_without_channels() {
        let captured = Arc::new(Mutex::new(None));
        let client = client_with(200, "{}", captured.clone());

        let result = client
            .delete_messages()
            .channels(Vec::<String>::new())
            .execute()
            .await;

        assert!(matches!(result, Err(StreamHubError::Validation { .. })));
        assert!(captured.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn not_fetch_actions_for_multiple_channels() {
        let captured = Arc::new(Mutex::new(None));
        let client = client_with(200, "{}", captured.clone());

        let result = client
            .fetch_messages()
            .channels(["chan1".into(), "chan2".into()])
            .include_message_actions(true)
            .execute()
            .await;

        assert!(matches!(result, Err(StreamHubError::Validation { .. })));
        assert!(captured.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn preserve_timetoken_precision() {
        let captured = Arc::new(Mutex::new(None));
        let client = client_with(
            200,
            r#"{
                "status": 200, "error": false, "error_message": "",
                "channels": {"chan1": [{"message": "a", "timetoken": "9223372036854775807"}]}
            }"#,
            captured.clone(),
        );

        let result = client
            .fetch_messages()
            .channels(["chan1".into()])
            .include_message_actions(true)
            .start(9223372036854775806)
            .end(9223372036854775807)
            .execute()
            .await
            .unwrap();

        let request = captured.lock().unwrap().clone().unwrap();
        assert_eq!(
            request.query_parameters.get("start"),
            Some(&"9223372036854775806".to_string())
        );
        assert_eq!(
            request.query_parameters.get("end"),
            Some(&"9223372036854775807".to_string())
        );
        assert_eq!(
            result.channels["chan1"].messages[0].timetoken,
            9_223_372_036_854_775_807
        );
    }

    #[tokio::test]
    async fn decrypt_fetched_messages_with_configured_cryptor() {
        use crate::core::CryptoProvider;

        #[derive(Debug)]
        struct PassThroughCryptor;

        impl CryptoProvider for PassThroughCryptor {
            fn encrypt(&self, data: Vec<u8>) -> Result<Vec<u8>, StreamHubError> {
                Ok(data)
            }

            fn decrypt(&self, data: Vec<u8>) -> Result<Vec<u8>, StreamHubError> {
                Ok(data)
            }
        }

        let captured = Arc::new(Mutex::new(None));
        let client = StreamHubClientBuilder::with_transport(MockTransport {
            status: 200,
            // "aGVsbG8=" is base64 for "hello"; the second payload is not
            // valid base64 and must survive untouched.
            response_body: r#"{
                "status": 200, "error": false, "error_message": "",
                "channels": {"chan1": [
                    {"message": "aGVsbG8=", "timetoken": "100"},
                    {"message": "not base64!!", "timetoken": "200"}
                ]}
            }"#,
            captured,
        })
        .with_keyset(Keyset {
            subscribe_key: "demo",
        })
        .with_cryptor(PassThroughCryptor)
        .build()
        .expect("Client should be created");

        let result = client
            .fetch_messages()
            .channels(["chan1".into()])
            .execute()
            .await
            .unwrap();

        let messages = &result.channels["chan1"].messages;
        assert_eq!(messages[0].message, serde_json::json!("hello"));
        assert_eq!(messages[1].message, serde_json::json!("not base64!!"));
    }

    #[tokio::test]
    async fn delete_messages_via_delete_method() {
        let captured = Arc::new(Mutex::new(None));
        let client = client_with(
            200,
            r#"{"status":200,"error":false,"error_message":"","channels":{}}"#,
            captured.clone(),
        );

        let result = client
            .delete_messages()
            .channels(["chan1".into()])
            .start(100)
            .end(200)
            .execute()
            .await
            .unwrap();

        let request = captured.lock().unwrap().clone().unwrap();
        assert_eq!(request.path, "/v3/history/sub-key/demo/channel/chan1");
        assert_eq!(request.method, TransportMethod::Delete);
        assert_eq!(
            request.query_parameters.get("start"),
            Some(&"100".to_string())
        );
        assert_eq!(
            request.query_parameters.get("end"),
            Some(&"200".to_string())
        );
        assert!(result.channels.is_empty());
        assert!(!result.error);
    }

    #[tokio::test]
    async fn count_messages_with_shared_timetoken() {
        let captured = Arc::new(Mutex::new(None));
        let client = client_with(
            200,
            r#"{
                "status": 200, "error": false, "error_message": "",
                "channels": {"chan1": 10, "chan2": 0}
            }"#,
            captured.clone(),
        );

        let result = client
            .message_counts()
            .channels(["chan1".into(), "chan2".into()])
            .timetoken(100)
            .execute()
            .await
            .unwrap();

        let request = captured.lock().unwrap().clone().unwrap();
        assert_eq!(
            request.path,
            "/v3/history/sub-key/demo/message-counts/chan1,chan2"
        );
        assert_eq!(
            request.query_parameters.get("timetoken"),
            Some(&"100".to_string())
        );
        assert_eq!(result.channels["chan1"], 10);
        assert_eq!(result.channels["chan2"], 0);
    }

    #[tokio::test]
    async fn count_messages_with_per_channel_timetokens() {
        let captured = Arc::new(Mutex::new(None));
        let client = client_with(
            200,
            r#"{
                "status": 200, "error": false, "error_message": "",
                "channels": {"chan1": 1, "chan2": 2}
            }"#,
            captured.clone(),
        );

        client
            .message_counts()
            .channels(["chan1".into(), "chan2".into()])
            .channels_timetoken([100, 200])
            .execute()
            .await
            .unwrap();

        let request = captured.lock().unwrap().clone().unwrap();
        assert_eq!(
            request.query_parameters.get("channelsTimetoken"),
            Some(&"100,200".to_string())
        );
    }

    #[tokio::test]
    async fn not_count_messages_without_timetokens() {
        let captured = Arc::new(Mutex::new(None));
        let client = client_with(200, "{}", captured.clone());

        let result = client
            .message_counts()
            .channels(["chan1".into()])
            .execute()
            .await;

        assert!(matches!(result, Err(StreamHubError::Validation { .. })));
        assert!(captured.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn not_count_messages_with_mismatched_timetokens() {
        let captured = Arc::new(Mutex::new(None));
        let client = client_with(200, "{}", captured.clone());

        let result = client
            .message_counts()
            .channels(["chan1".into(), "chan2".into()])
            .channels_timetoken([100])
            .execute()
            .await;

        assert!(matches!(result, Err(StreamHubError::Validation { .. })));
        assert!(captured.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn report_malformed_response_body() {
        let captured = Arc::new(Mutex::new(None));
        let client = client_with(200, r#"{"unexpected":"shape"}"#, captured.clone());

        let result = client
            .fetch_messages()
            .channels(["chan1".into()])
            .execute()
            .await;

        assert!(matches!(
            result,
            Err(StreamHubError::MalformedResponseBody { status: 200, .. })
        ));
    }
}
