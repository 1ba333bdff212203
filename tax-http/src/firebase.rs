//! Server message from the Firebase Realtime Database.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tax_core::services::{MessageError, MessageService};
use tracing::debug;

use crate::client::{http_client, snippet};

/// Reads `/message.json` from a Realtime Database on behalf of a user.
pub struct FirebaseMessageClient {
    client: Client,
    database_url: String,
}

impl FirebaseMessageClient {
    pub fn new(
        database_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: http_client(timeout),
            database_url: database_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn message_url(
        &self,
        token: &str,
    ) -> Result<Url, MessageError> {
        Url::parse_with_params(
            &format!("{}/message.json", self.database_url),
            &[("auth", token)],
        )
        .map_err(|e| MessageError::Network(format!("invalid database URL '{}': {e}", self.database_url)))
    }
}

#[async_trait]
impl MessageService for FirebaseMessageClient {
    async fn fetch_message(
        &self,
        token: &str,
    ) -> Result<Option<String>, MessageError> {
        let url = self.message_url(token)?;
        debug!(database = %self.database_url, "requesting server message");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MessageError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MessageError::Network(e.to_string()))?;

        if !status.is_success() {
            debug!(%status, body = %snippet(&body), "message service error");
            return Err(MessageError::Status(status.as_u16()));
        }

        parse_message(&body)
    }
}

/// A stored message is a bare JSON string; `null` means none is set.
pub fn parse_message(body: &str) -> Result<Option<String>, MessageError> {
    serde_json::from_str::<Option<String>>(body)
        .map_err(|e| MessageError::Malformed(format!("{e}: {}", snippet(body))))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn message_url_appends_path_and_token() {
        let client = FirebaseMessageClient::new(
            "https://example-rtdb.europe-west1.firebasedatabase.app/",
            Duration::from_secs(1),
        );

        let url = client.message_url("abc.def").unwrap();

        assert_eq!(
            url.as_str(),
            "https://example-rtdb.europe-west1.firebasedatabase.app/message.json?auth=abc.def"
        );
    }

    #[test]
    fn string_body_is_the_message() {
        assert_eq!(
            parse_message(r#""Deadline is the 15th""#),
            Ok(Some("Deadline is the 15th".to_string()))
        );
    }

    #[test]
    fn null_body_is_no_message() {
        assert_eq!(parse_message("null"), Ok(None));
    }

    #[test]
    fn object_body_is_malformed() {
        assert!(matches!(
            parse_message(r#"{"text":"hi"}"#),
            Err(MessageError::Malformed(_))
        ));
    }
}
