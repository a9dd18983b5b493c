//! Student/guardian landing screen.

use serde::Serialize;

use shds_auth::{Profile, Screen};

use crate::dto::{GuardianLink, StudentDoc};
use crate::notify::Notice;
use crate::session::Identity;

use super::dashboard::display_name;
use super::{Mounted, PortalContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentPortalView {
    pub display_name: String,
    pub branch: String,
    pub status: String,
    pub student_id: String,
    pub guardians: Vec<GuardianLink>,
    /// The student document, when the profile links one and it was found.
    pub student: Option<StudentDoc>,
}

impl StudentPortalView {
    pub fn build(
        student: Option<StudentDoc>,
        profile: Option<&Profile>,
        identity: Option<&Identity>,
    ) -> Self {
        let full_name = student.as_ref().and_then(|s| {
            let first = s.first_name.as_deref().map(str::trim).filter(|f| !f.is_empty())?;
            let last = s.last_name.as_deref().unwrap_or_default().trim();
            Some(format!("{first} {last}").trim().to_string())
        });
        let display_name =
            full_name.unwrap_or_else(|| display_name(profile, identity, "Student"));

        let branch = student
            .as_ref()
            .and_then(|s| s.branch_id.clone())
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| {
                profile
                    .map(Profile::branch_display)
                    .unwrap_or("-")
                    .to_string()
            });

        Self {
            display_name,
            branch,
            status: student
                .as_ref()
                .and_then(|s| s.status.clone())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "pending".to_string()),
            student_id: student
                .as_ref()
                .and_then(|s| s.id.clone())
                .unwrap_or_else(|| "-".to_string()),
            guardians: student
                .as_ref()
                .map(|s| s.guardian_links.clone())
                .unwrap_or_default(),
            student,
        }
    }
}

/// Mount the portal and load the linked student document.
///
/// A profile without a student link is not an error: the view simply has no
/// student data.
pub async fn open(ctx: &PortalContext) -> (Mounted, Option<StudentPortalView>) {
    let mounted = ctx.mount(Screen::StudentPortal).await;
    if !mounted.may_render() {
        return (mounted, None);
    }

    let profile = mounted.profile.as_ref();
    let student_id = profile.and_then(|p| p.details.student_id.as_ref());
    let student = match (mounted.session.token(), student_id) {
        (Some(token), Some(student_id)) => {
            match ctx.directory.find_student(token, student_id).await {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!(%student_id, error = %e, "failed to load student");
                    ctx.notify(Notice::error(e.user_message_or("Failed to load student info")));
                    None
                }
            }
        }
        _ => None,
    };

    let view = StudentPortalView::build(student, profile, mounted.session.identity());
    (mounted, Some(view))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_student_document() {
        let view = StudentPortalView::build(None, None, None);
        assert_eq!(view.display_name, "Student");
        assert_eq!(view.status, "pending");
        assert_eq!(view.student_id, "-");
        assert_eq!(view.branch, "-");
        assert!(view.guardians.is_empty());
    }

    #[test]
    fn student_document_wins_for_name_and_branch() {
        let doc = StudentDoc {
            id: Some("s1".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: None,
            branch_id: Some("b9".to_string()),
            status: Some("active".to_string()),
            guardian_links: vec![GuardianLink {
                guardian_id: "g1".to_string(),
                relationship: Some("Mother".to_string()),
            }],
        };
        let view = StudentPortalView::build(Some(doc), None, None);
        assert_eq!(view.display_name, "Ada");
        assert_eq!(view.branch, "b9");
        assert_eq!(view.status, "active");
        assert_eq!(view.guardians.len(), 1);
    }
}
