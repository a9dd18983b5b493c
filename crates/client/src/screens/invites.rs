//! Invite creation (super admins only).

use shds_auth::{Profile, Screen};
use shds_core::{BranchId, DomainError, DomainResult};

use crate::dto::{InviteAudience, InviteRequest};
use crate::error::ClientError;
use crate::notify::Notice;

use super::{Mounted, PortalContext};

const MAX_MESSAGE_CHARS: usize = 500;

/// Role checkboxes of the invite form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleChoices {
    pub admin: bool,
    pub staff: bool,
    pub student: bool,
    pub guardian: bool,
}

impl Default for RoleChoices {
    fn default() -> Self {
        Self {
            admin: false,
            staff: true,
            student: false,
            guardian: false,
        }
    }
}

impl RoleChoices {
    pub fn selected(&self) -> Vec<String> {
        [
            (self.admin, "admin"),
            (self.staff, "staff"),
            (self.student, "student"),
            (self.guardian, "guardian"),
        ]
        .into_iter()
        .filter_map(|(on, role)| on.then(|| role.to_string()))
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InviteForm {
    pub email: String,
    pub branch_id: String,
    pub target_type: InviteAudience,
    pub roles: RoleChoices,
    pub student_name: String,
    pub batch_name: String,
    pub message: String,
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl InviteForm {
    /// Empty form with the branch prefilled from the inviter's profile.
    pub fn for_profile(profile: &Profile) -> Self {
        Self {
            branch_id: profile
                .branch_id
                .as_ref()
                .map(|b| b.as_str().to_string())
                .unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Validate and build the payload. No IO.
    pub fn build_request(&self) -> DomainResult<InviteRequest> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(DomainError::validation("Recipient email is required"));
        }
        let roles = self.roles.selected();
        if roles.is_empty() {
            return Err(DomainError::validation("Select at least one role"));
        }
        let branch_id = BranchId::parse(&self.branch_id)
            .map_err(|_| DomainError::validation("Branch id is required"))?;
        if !email.contains('@') {
            return Err(DomainError::validation("Recipient email is invalid"));
        }
        if self.message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(DomainError::validation(format!(
                "Message must be at most {MAX_MESSAGE_CHARS} characters"
            )));
        }

        Ok(InviteRequest {
            email: email.to_string(),
            branch_id,
            roles,
            target_type: self.target_type,
            student_name: optional(&self.student_name),
            batch_name: optional(&self.batch_name),
            message: optional(&self.message),
        })
    }

    /// Clear the per-recipient fields after a successful send.
    fn reset_after_send(&mut self) {
        self.email.clear();
        self.message.clear();
        self.student_name.clear();
        self.batch_name.clear();
    }

    /// Send the invite. Returns the shareable link, if the service gave one.
    pub async fn submit(&mut self, ctx: &PortalContext) -> Result<Option<String>, ClientError> {
        let session = ctx.session.current();
        let Some(token) = session.token() else {
            return Err(ClientError::Unauthenticated);
        };

        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => {
                ctx.notify(Notice::error(e.user_message()));
                return Err(e.into());
            }
        };

        match ctx.directory.create_invite(token, &request).await {
            Ok(response) => {
                tracing::info!(
                    target_type = request.target_type.as_str(),
                    branch = %request.branch_id,
                    "invite sent"
                );
                ctx.notify(Notice::success("Invite sent"));
                self.reset_after_send();
                Ok(response.link())
            }
            Err(e) => {
                ctx.notify(Notice::error(e.user_message_or("Failed to send invite")));
                Err(e)
            }
        }
    }
}

/// Mount the invites screen; non-super-admins are sent back to the dashboard.
pub async fn open(ctx: &PortalContext) -> (Mounted, Option<InviteForm>) {
    let mounted = ctx.mount(Screen::Invites).await;
    let form = match (&mounted.profile, mounted.may_render()) {
        (Some(profile), true) => Some(InviteForm::for_profile(profile)),
        _ => None,
    };
    (mounted, form)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> InviteForm {
        InviteForm {
            email: "new@example.org".to_string(),
            branch_id: "b1".to_string(),
            ..InviteForm::default()
        }
    }

    #[test]
    fn validation_order() {
        let mut form = InviteForm {
            roles: RoleChoices {
                staff: false,
                ..RoleChoices::default()
            },
            ..InviteForm::default()
        };
        assert_eq!(
            form.build_request().unwrap_err(),
            DomainError::validation("Recipient email is required")
        );

        form.email = "x@example.org".to_string();
        assert_eq!(
            form.build_request().unwrap_err(),
            DomainError::validation("Select at least one role")
        );

        form.roles.student = true;
        assert_eq!(
            form.build_request().unwrap_err(),
            DomainError::validation("Branch id is required")
        );
    }

    #[test]
    fn defaults_target_staff_with_staff_role() {
        let request = filled().build_request().unwrap();
        assert_eq!(request.target_type, InviteAudience::Staff);
        assert_eq!(request.roles, vec!["staff"]);
        assert_eq!(request.student_name, None);
        assert_eq!(request.message, None);
    }

    #[test]
    fn address_without_at_sign_is_rejected() {
        let mut form = filled();
        form.email = "new.example.org".to_string();
        assert_eq!(
            form.build_request().unwrap_err(),
            DomainError::validation("Recipient email is invalid")
        );
    }

    #[test]
    fn long_message_is_rejected() {
        let mut form = filled();
        form.message = "x".repeat(MAX_MESSAGE_CHARS);
        assert!(form.build_request().is_ok());

        form.message.push('x');
        assert_eq!(
            form.build_request().unwrap_err(),
            DomainError::validation("Message must be at most 500 characters")
        );
    }

    #[test]
    fn branch_prefilled_from_profile() {
        let profile = Profile::new(Default::default(), BranchId::parse_optional(Some("b4")));
        assert_eq!(InviteForm::for_profile(&profile).branch_id, "b4");
    }
}
