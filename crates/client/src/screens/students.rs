//! Students list (admin area).

use shds_auth::Screen;

use crate::dto::StudentSummary;
use crate::error::ClientError;
use crate::notify::Notice;

use super::{Mounted, PortalContext};

/// Last loaded list of students.
#[derive(Debug, Clone, Default)]
pub struct StudentsList {
    pub students: Vec<StudentSummary>,
}

impl StudentsList {
    /// Mount the screen and load the list if the user may see it.
    pub async fn open(ctx: &PortalContext) -> (Mounted, Self) {
        let mut list = Self::default();
        let mounted = ctx.mount(Screen::Students).await;
        if mounted.may_render() {
            // Failure is already reported; the screen shows an empty list.
            let _ = list.refresh(ctx).await;
        }
        (mounted, list)
    }

    /// Reload from the directory. On failure the previous rows are kept.
    pub async fn refresh(&mut self, ctx: &PortalContext) -> Result<usize, ClientError> {
        let session = ctx.session.current();
        let token = session.token().ok_or(ClientError::Unauthenticated)?;

        match ctx.directory.list_students(token).await {
            Ok(students) => {
                tracing::debug!(count = students.len(), "students loaded");
                self.students = students;
                Ok(self.students.len())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load students");
                ctx.notify(Notice::error(e.user_message()));
                Err(e)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}
