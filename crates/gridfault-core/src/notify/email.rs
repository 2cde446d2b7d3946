//! Email notifier -- posts messages to an HTTP mail relay.
//!
//! The relay accepts `{name, email, message}` JSON and handles the actual
//! mail transport. Anything other than a 2xx response is treated as a
//! failed delivery.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use url::Url;

use super::{Notifier, RecipientRole};
use crate::error::NotifyError;

/// Bound on a single relay request. A hung connection becomes an ordinary
/// dispatch failure instead of stalling the poll cycle and every report
/// behind it.
const RELAY_TIMEOUT: Duration = Duration::from_secs(10);

pub struct EmailNotifier {
    client: Client,
    endpoint: Url,
}

impl EmailNotifier {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    /// Parse and validate the relay endpoint from configuration.
    pub fn from_endpoint(endpoint: &str) -> Result<Self, NotifyError> {
        let url = Url::parse(endpoint).map_err(|e| NotifyError::Endpoint(e.to_string()))?;
        Self::new(url, RELAY_TIMEOUT)
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(
        &self,
        recipient: RecipientRole,
        address: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        let payload = json!({
            "name": recipient.display_name(),
            "email": address,
            "message": body,
        });

        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(NotifyError::Http {
                status: resp.status().as_u16(),
            });
        }
        Ok(())
    }
}
