//! Client-side error taxonomy.

use thiserror::Error;

use shds_core::DomainError;

use crate::identity::IdentityError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected before any request was issued.
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// No signed-in session to attach to the request.
    #[error("not signed in")]
    Unauthenticated,

    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response; `detail` is the server's message.
    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

impl ClientError {
    /// Text for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(e) => e.user_message(),
            ClientError::Unauthenticated => "Please sign in first".to_string(),
            ClientError::Network(msg) => msg.clone(),
            ClientError::Api { detail, .. } => detail.clone(),
            ClientError::Decode(msg) => msg.clone(),
            ClientError::Identity(e) => e.to_string(),
        }
    }

    /// [`user_message`](Self::user_message), or `fallback` when that is blank.
    pub fn user_message_or(&self, fallback: &str) -> String {
        let message = self.user_message();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}
