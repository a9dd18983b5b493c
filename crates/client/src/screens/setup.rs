//! Invite activation: redeem an invite token or set up manually.

use shds_auth::Screen;
use shds_core::{BranchId, DomainError, DomainResult, InviteToken};

use crate::dto::{InviteRedemption, ManualRole, ManualSetup, SetupRequest};
use crate::error::ClientError;
use crate::notify::Notice;

use super::{Mounted, PortalContext};

/// State of the setup form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupForm {
    invite_token: String,
    pub display_name: String,
    pub branch_id: String,
    pub manual_role: ManualRole,
    /// "I don't have an invite token".
    pub manual_mode: bool,
}

/// How the form will be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupMode {
    Invite,
    Manual,
}

impl SetupForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill from a setup link (`/setup?token=...`) or a bare query string.
    pub fn from_link(link: &str) -> Self {
        let mut form = Self::default();
        if let Some(token) = token_from_link(link) {
            form.set_invite_token(token);
        }
        form
    }

    pub fn invite_token(&self) -> &str {
        &self.invite_token
    }

    /// Typing a token switches manual mode off.
    pub fn set_invite_token(&mut self, value: impl Into<String>) {
        self.invite_token = value.into();
        if !self.invite_token.is_empty() {
            self.manual_mode = false;
        }
    }

    /// Manual when toggled, or when no usable token was entered.
    pub fn mode(&self) -> SetupMode {
        if self.manual_mode || InviteToken::parse(&self.invite_token).is_none() {
            SetupMode::Manual
        } else {
            SetupMode::Invite
        }
    }

    fn confirmed_name(&self) -> Option<String> {
        let name = self.display_name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Validate and build the request payload. No IO.
    pub fn build_request(&self) -> DomainResult<SetupRequest> {
        match (self.mode(), InviteToken::parse(&self.invite_token)) {
            (SetupMode::Invite, Some(invite_token)) => Ok(SetupRequest::Invite(InviteRedemption {
                invite_token,
                confirmed_name: self.confirmed_name(),
            })),
            _ => {
                let branch_id = BranchId::parse(&self.branch_id)
                    .map_err(|_| DomainError::validation("Branch id is required"))?;
                Ok(SetupRequest::Manual(ManualSetup {
                    invite_token: InviteToken::manual(),
                    confirmed_name: self.confirmed_name(),
                    branch_id,
                    roles: vec![self.manual_role],
                    target_type: self.manual_role,
                }))
            }
        }
    }
}

fn token_from_link(link: &str) -> Option<&str> {
    let query = link.split_once('?').map(|(_, q)| q).unwrap_or(link);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "token")
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Mount the setup screen (any signed-in user may stay).
pub async fn mount(ctx: &PortalContext) -> Mounted {
    ctx.mount(Screen::Setup).await
}

/// Submit the form and route using the roles/branch the service returns.
///
/// Validation failures and a missing session are rejected before any request
/// is made.
pub async fn submit(ctx: &PortalContext, form: &SetupForm) -> Result<Screen, ClientError> {
    let session = ctx.session.current();
    let Some(token) = session.token() else {
        tracing::debug!("setup submitted without a session; ignoring");
        return Err(ClientError::Unauthenticated);
    };

    let request = match form.build_request() {
        Ok(request) => request,
        Err(e) => {
            ctx.notify(Notice::error(e.user_message()));
            return Err(e.into());
        }
    };

    match ctx.directory.setup(token, &request).await {
        Ok(profile) => {
            let why = profile.explain();
            let destination = why.destination;
            tracing::info!(
                manual = request.is_manual(),
                destination = %destination,
                rule = why.rule.as_str(),
                admin_hits = ?why.admin_hits,
                student_hits = ?why.student_hits,
                "setup complete"
            );
            ctx.notify(Notice::success("Setup complete"));
            ctx.navigator.replace(destination);
            Ok(destination)
        }
        Err(e) => {
            ctx.notify(Notice::error(e.user_message_or("Setup failed")));
            Err(e)
        }
    }
}
