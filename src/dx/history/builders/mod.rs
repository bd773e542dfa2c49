//! # History API request builders.

use crate::dx::client::StreamHubClientInstance;

pub mod delete;
pub mod fetch;
pub mod fetch_legacy;
pub mod message_counts;

/// Validate [`StreamHubClientInstance`] configuration.
///
/// Check whether the client configuration contains all the required fields
/// set for history endpoint usage or not.
pub(in crate::dx::history) fn validate_configuration<T, D>(
    client: &Option<StreamHubClientInstance<T, D>>,
) -> Result<(), String> {
    if let Some(client) = client {
        if client.config.subscribe_key.is_empty() {
            return Err(
                "Incomplete StreamHub client configuration: 'subscribe_key' is empty.".into(),
            );
        }
    }

    Ok(())
}
