//! Identity provider seam.
//!
//! The provider's protocol is external; this module only defines what the
//! portal needs from it and owns the session writer.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::session::{IdToken, Identity, SessionReader, SessionWriter, SignedIn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// Wrong email/password, revoked account, etc. The message is shown to the user.
    #[error("{0}")]
    Rejected(String),

    #[error("sign-in method not available: {0}")]
    Unsupported(&'static str),

    #[error("identity provider unreachable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
}

impl OAuthProvider {
    pub fn display_name(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "Google",
        }
    }
}

/// Operations the portal needs from an identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The already signed-in user, if any (e.g. a persisted session).
    async fn current(&self) -> Result<Option<SignedIn>, IdentityError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignedIn, IdentityError>;

    async fn sign_in_with_oauth(&self, provider: OAuthProvider) -> Result<SignedIn, IdentityError>;

    async fn sign_out(&self) -> Result<(), IdentityError>;
}

/// Binds a provider to the session channel; the only place sessions are written.
pub struct IdentitySession {
    provider: Arc<dyn IdentityProvider>,
    writer: SessionWriter,
}

impl IdentitySession {
    pub fn new(provider: Arc<dyn IdentityProvider>, writer: SessionWriter) -> Self {
        Self { provider, writer }
    }

    pub fn reader(&self) -> SessionReader {
        self.writer.reader()
    }

    /// Report the provider's initial state, ending the loading phase.
    pub async fn restore(&self) -> Result<(), IdentityError> {
        match self.provider.current().await {
            Ok(Some(signed_in)) => {
                tracing::info!(uid = %signed_in.identity.uid, "restored identity session");
                self.writer.sign_in(signed_in.identity, signed_in.token);
                Ok(())
            }
            Ok(None) => {
                self.writer.sign_out();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not restore identity session");
                self.writer.sign_out();
                Err(e)
            }
        }
    }

    pub async fn login_with_email(&self, email: &str, password: &str) -> Result<(), IdentityError> {
        let signed_in = self.provider.sign_in_with_password(email, password).await?;
        tracing::info!(uid = %signed_in.identity.uid, method = "password", "signed in");
        self.writer.sign_in(signed_in.identity, signed_in.token);
        Ok(())
    }

    pub async fn login_with_oauth(&self, provider: OAuthProvider) -> Result<(), IdentityError> {
        let signed_in = self.provider.sign_in_with_oauth(provider).await?;
        tracing::info!(
            uid = %signed_in.identity.uid,
            method = provider.display_name(),
            "signed in"
        );
        self.writer.sign_in(signed_in.identity, signed_in.token);
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), IdentityError> {
        self.provider.sign_out().await?;
        self.writer.sign_out();
        tracing::info!("signed out");
        Ok(())
    }
}

/// Provider backed by a pre-issued token (CLI / service use).
///
/// Interactive sign-in is not possible without a real provider.
pub struct StaticTokenProvider {
    token: Option<IdToken>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.map(IdToken::new),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.id_token.clone())
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenProvider {
    async fn current(&self) -> Result<Option<SignedIn>, IdentityError> {
        Ok(self.token.clone().map(|token| SignedIn {
            identity: Identity {
                uid: "static".to_string(),
                ..Identity::default()
            },
            token,
        }))
    }

    async fn sign_in_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<SignedIn, IdentityError> {
        Err(IdentityError::Unsupported(
            "password sign-in needs an interactive identity provider",
        ))
    }

    async fn sign_in_with_oauth(
        &self,
        _provider: OAuthProvider,
    ) -> Result<SignedIn, IdentityError> {
        Err(IdentityError::Unsupported(
            "OAuth sign-in needs an interactive identity provider",
        ))
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Session, SessionStore};

    #[tokio::test]
    async fn restore_without_token_signs_out() {
        let (writer, reader) = SessionStore::channel();
        let provider = StaticTokenProvider::new(None);
        let identity = IdentitySession::new(Arc::new(provider), writer);
        identity.restore().await.unwrap();
        assert_eq!(reader.current(), Session::SignedOut);
    }

    #[tokio::test]
    async fn restore_with_token_signs_in_and_logout_clears() {
        let (writer, reader) = SessionStore::channel();
        let identity = IdentitySession::new(
            Arc::new(StaticTokenProvider::new(Some("tok".to_string()))),
            writer,
        );
        identity.restore().await.unwrap();
        assert_eq!(reader.current().token().map(IdToken::as_str), Some("tok"));

        identity.logout().await.unwrap();
        assert_eq!(reader.current(), Session::SignedOut);
    }

    #[tokio::test]
    async fn static_provider_rejects_interactive_sign_in() {
        let (writer, reader) = SessionStore::channel();
        let provider = StaticTokenProvider::new(None);
        let identity = IdentitySession::new(Arc::new(provider), writer);
        let err = identity.login_with_email("a@b.c", "pw").await.unwrap_err();
        assert!(matches!(err, IdentityError::Unsupported(_)));
        assert_eq!(reader.current(), Session::Loading);
    }
}
