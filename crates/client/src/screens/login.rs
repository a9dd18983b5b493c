//! Login screen: password and OAuth sign-in, then forward to the destination.

use shds_auth::{GuardDecision, Screen};
use shds_core::DomainError;

use crate::error::ClientError;
use crate::identity::{IdentitySession, OAuthProvider};
use crate::notify::Notice;

use super::PortalContext;

/// Credentials typed into the login form.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.email.trim().is_empty() {
            return Err(DomainError::validation("Email is required"));
        }
        if self.password.is_empty() {
            return Err(DomainError::validation("Password is required"));
        }
        Ok(())
    }
}

/// Decide where a user on the login screen belongs.
///
/// Signed-out users stay; signed-in users are replaced to their destination.
pub async fn decide(ctx: &PortalContext) -> GuardDecision {
    ctx.mount(Screen::Login).await.decision
}

/// Sign in with email and password, then route.
pub async fn sign_in_with_email(
    ctx: &PortalContext,
    identity: &IdentitySession,
    form: &LoginForm,
) -> Result<GuardDecision, ClientError> {
    if let Err(e) = form.validate() {
        ctx.notify(Notice::error(e.user_message()));
        return Err(e.into());
    }

    if let Err(e) = identity.login_with_email(form.email.trim(), &form.password).await {
        let message = non_empty_or(e.to_string(), "Login failed");
        ctx.notify(Notice::error(message));
        return Err(e.into());
    }
    ctx.notify(Notice::success("Signed in"));

    Ok(decide(ctx).await)
}

/// Sign in through an OAuth provider, then route.
pub async fn sign_in_with_oauth(
    ctx: &PortalContext,
    identity: &IdentitySession,
    provider: OAuthProvider,
) -> Result<GuardDecision, ClientError> {
    if let Err(e) = identity.login_with_oauth(provider).await {
        let fallback = format!("{} sign-in failed", provider.display_name());
        ctx.notify(Notice::error(non_empty_or(e.to_string(), &fallback)));
        return Err(e.into());
    }
    ctx.notify(Notice::success(format!(
        "Signed in with {}",
        provider.display_name()
    )));

    Ok(decide(ctx).await)
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
