//! Wire shapes of the directory service (camelCase JSON).
//!
//! Responses are parsed leniently (missing fields default) and converted into
//! validated domain types at this boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shds_auth::{Profile, ProfileDetails, RoleSet};
use shds_core::{BranchId, InviteToken, StudentId};

/// `GET /users/me`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default)]
    pub profile: Option<ProfileDoc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDoc {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub branch_id: Option<String>,
}

impl MeResponse {
    /// Validate into a [`Profile`]. A top-level branch wins over the nested one;
    /// blank strings count as absent.
    pub fn into_profile(self) -> Profile {
        let doc = self.profile.unwrap_or_default();
        let branch_id = BranchId::parse_optional(self.branch_id.as_deref())
            .or_else(|| BranchId::parse_optional(doc.branch_id.as_deref()));
        let details = ProfileDetails {
            display_name: doc.display_name.filter(|n| !n.trim().is_empty()),
            student_id: StudentId::parse_optional(doc.student_id.as_deref()),
        };
        Profile::new(RoleSet::from_raw(self.roles.unwrap_or_default()), branch_id)
            .with_details(details)
    }
}

/// Row of `GET /students`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub guardian_phone: Option<String>,
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl StudentSummary {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Unnamed")
    }
}

/// Document of `GET /collections/students?id=<id>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDoc {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub guardian_links: Vec<GuardianLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianLink {
    pub guardian_id: String,
    #[serde(default)]
    pub relationship: Option<String>,
}

/// Who an invite is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteAudience {
    Admin,
    #[default]
    Staff,
    Student,
    Guardian,
}

impl InviteAudience {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteAudience::Admin => "admin",
            InviteAudience::Staff => "staff",
            InviteAudience::Student => "student",
            InviteAudience::Guardian => "guardian",
        }
    }
}

/// `POST /users/invites`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub email: String,
    pub branch_id: BranchId,
    pub roles: Vec<String>,
    pub target_type: InviteAudience,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteResponse {
    #[serde(default)]
    pub invite_link: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl InviteResponse {
    /// Shareable link: the server's link, else a setup link built from the token.
    pub fn link(&self) -> Option<String> {
        if let Some(link) = self.invite_link.as_deref().filter(|l| !l.is_empty()) {
            return Some(link.to_string());
        }
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| format!("/setup?token={t}"))
    }
}

/// Role a user may pick for themselves during manual setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualRole {
    #[default]
    Student,
    Guardian,
}

impl ManualRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManualRole::Student => "student",
            ManualRole::Guardian => "guardian",
        }
    }
}

/// `POST /users/setup`, redeeming an invite token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRedemption {
    pub invite_token: InviteToken,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_name: Option<String>,
}

/// `POST /users/setup` without an invite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualSetup {
    /// Always the manual sentinel.
    pub invite_token: InviteToken,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_name: Option<String>,
    pub branch_id: BranchId,
    pub roles: Vec<ManualRole>,
    pub target_type: ManualRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SetupRequest {
    Invite(InviteRedemption),
    Manual(ManualSetup),
}

impl SetupRequest {
    pub fn is_manual(&self) -> bool {
        matches!(self, SetupRequest::Manual(_))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupResponse {
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    #[serde(default)]
    pub branch_id: Option<String>,
}

impl SetupResponse {
    pub fn into_profile(self) -> Profile {
        Profile::new(
            RoleSet::from_raw(self.roles.unwrap_or_default()),
            BranchId::parse_optional(self.branch_id.as_deref()),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn me_response_prefers_top_level_branch() {
        let me: MeResponse = serde_json::from_value(json!({
            "uid": "u1",
            "roles": ["staff", " "],
            "branchId": "b-top",
            "profile": { "branchId": "b-nested", "displayName": "Ada", "studentId": "" }
        }))
        .unwrap();
        let profile = me.into_profile();
        assert_eq!(profile.branch_id.unwrap().as_str(), "b-top");
        assert_eq!(profile.roles.to_strings(), vec!["staff"]);
        assert_eq!(profile.details.display_name.as_deref(), Some("Ada"));
        assert_eq!(profile.details.student_id, None);
    }

    #[test]
    fn me_response_falls_back_to_nested_branch_and_tolerates_nulls() {
        let me: MeResponse = serde_json::from_value(json!({
            "roles": null,
            "branchId": "",
            "profile": { "branchId": "b-nested", "studentId": "s1" }
        }))
        .unwrap();
        let profile = me.into_profile();
        assert_eq!(profile.branch_id.unwrap().as_str(), "b-nested");
        assert!(profile.roles.is_empty());
        assert_eq!(profile.details.student_id.unwrap().as_str(), "s1");
    }

    #[test]
    fn setup_payload_shapes() {
        let invite = SetupRequest::Invite(InviteRedemption {
            invite_token: InviteToken::parse("abc").unwrap(),
            confirmed_name: None,
        });
        assert_eq!(
            serde_json::to_value(&invite).unwrap(),
            json!({ "inviteToken": "abc" })
        );

        let manual = SetupRequest::Manual(ManualSetup {
            invite_token: InviteToken::manual(),
            confirmed_name: Some("Ada".to_string()),
            branch_id: BranchId::parse("b1").unwrap(),
            roles: vec![ManualRole::Guardian],
            target_type: ManualRole::Guardian,
        });
        assert_eq!(
            serde_json::to_value(&manual).unwrap(),
            json!({
                "inviteToken": "-1",
                "confirmedName": "Ada",
                "branchId": "b1",
                "roles": ["guardian"],
                "targetType": "guardian"
            })
        );
    }

    #[test]
    fn invite_link_falls_back_to_token() {
        let with_link = InviteResponse {
            invite_link: Some("https://x/setup?token=a".to_string()),
            token: Some("a".to_string()),
        };
        assert_eq!(with_link.link().as_deref(), Some("https://x/setup?token=a"));

        let token_only = InviteResponse {
            invite_link: None,
            token: Some("zz".to_string()),
        };
        assert_eq!(token_only.link().as_deref(), Some("/setup?token=zz"));
        assert_eq!(InviteResponse::default().link(), None);
    }

    #[test]
    fn student_summary_display_name() {
        let row: StudentSummary = serde_json::from_value(json!({
            "id": "s1",
            "branchId": "b1",
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(row.display_name(), "Unnamed");
        assert!(row.created_at.is_some());
    }
}
