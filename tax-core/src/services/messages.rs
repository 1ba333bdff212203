use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use super::Session;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessageError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Message service returned HTTP {0}")]
    Status(u16),

    #[error("Malformed message response: {0}")]
    Malformed(String),
}

/// Server-held message shown to signed-in users.
#[async_trait]
pub trait MessageService: Send + Sync {
    /// Fetches the current message; `None` when the server holds none.
    async fn fetch_message(
        &self,
        token: &str,
    ) -> Result<Option<String>, MessageError>;
}

/// Loads the banner message for `session`.
///
/// Anonymous sessions never reach the service. Failures are logged and
/// reported as no message.
pub async fn load_server_message(
    session: &Session,
    service: &dyn MessageService,
) -> Option<String> {
    let token = session.token()?;

    let message = match service.fetch_message(token).await {
        Ok(message) => message.filter(|m| !m.trim().is_empty()),
        Err(error) => {
            warn!(%error, "server message missing");
            None
        }
    };
    if let Some(message) = &message {
        debug!(len = message.len(), "loaded server message");
    }
    message
}
