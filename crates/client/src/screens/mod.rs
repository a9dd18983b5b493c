//! Screen controllers.
//!
//! Each screen runs [`PortalContext::mount`] before doing anything else: it
//! waits for the session, fetches the profile, asks the guard, and follows
//! any redirect.

pub mod dashboard;
pub mod invites;
pub mod login;
pub mod setup;
pub mod student_portal;
pub mod students;

use std::sync::Arc;

use shds_auth::{GuardDecision, Profile, ProfileState, Screen, guard_screen};

use crate::directory::DirectoryService;
use crate::navigator::Navigator;
use crate::notify::{Notice, Notifier};
use crate::session::{Session, SessionReader};

/// Everything a screen needs; cheap to clone.
#[derive(Clone)]
pub struct PortalContext {
    pub directory: Arc<dyn DirectoryService>,
    pub session: SessionReader,
    pub navigator: Navigator,
    pub notifier: Arc<dyn Notifier>,
}

/// Result of mounting a screen.
#[derive(Debug, Clone)]
pub struct Mounted {
    pub screen: Screen,
    pub decision: GuardDecision,
    pub session: Session,
    /// `None` when signed out or when the fetch failed.
    pub profile: Option<Profile>,
}

impl Mounted {
    pub fn may_render(&self) -> bool {
        self.decision == GuardDecision::Render
    }
}

impl PortalContext {
    pub fn new(
        directory: Arc<dyn DirectoryService>,
        session: SessionReader,
        navigator: Navigator,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            directory,
            session,
            navigator,
            notifier,
        }
    }

    pub fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    /// Guard `screen`: block until the session settles, fetch the profile
    /// when signed in, then render or redirect.
    pub async fn mount(&self, screen: Screen) -> Mounted {
        let session = self.session.settled().await;

        let (decision, profile) = match session.token() {
            None => (guard_screen(screen, session.phase(), ProfileState::Pending), None),
            Some(token) => match self.directory.me(token).await {
                Ok(profile) => {
                    let state = ProfileState::Loaded(&profile);
                    (guard_screen(screen, session.phase(), state), Some(profile))
                }
                Err(e) => {
                    tracing::warn!(
                        screen = %screen,
                        error = %e,
                        "profile fetch failed; treating user as unassigned"
                    );
                    self.notify(Notice::error(e.user_message()));
                    (guard_screen(screen, session.phase(), ProfileState::Failed), None)
                }
            },
        };

        match decision {
            GuardDecision::Redirect(target) => {
                log_redirect(screen, target, &session, profile.as_ref());
                self.navigator.replace(target);
            }
            GuardDecision::Render => {
                self.navigator.replace(screen);
            }
            GuardDecision::Pending => {}
        }

        Mounted {
            screen,
            decision,
            session,
            profile,
        }
    }
}

fn log_redirect(from: Screen, to: Screen, session: &Session, profile: Option<&Profile>) {
    if !session.is_authenticated() {
        tracing::info!(from = %from, to = %to, "redirecting signed-out user");
        return;
    }
    // A failed fetch is routed as an unassigned profile.
    let why = profile.map_or_else(|| Profile::unassigned().explain(), Profile::explain);
    tracing::info!(
        from = %from,
        to = %to,
        rule = why.rule.as_str(),
        admin_hits = ?why.admin_hits,
        student_hits = ?why.student_hits,
        "redirecting"
    );
}
