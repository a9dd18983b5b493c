//! Screen mount guard.
//!
//! Every screen asks the guard before rendering. The guard never performs IO;
//! the caller reports how far session and profile loading got.

use serde::Serialize;

use crate::profile::Profile;
use crate::route::Screen;

/// Where the identity session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    /// The identity provider has not reported yet.
    Loading,
    SignedOut,
    SignedIn,
}

/// Outcome of the per-mount profile fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileState<'a> {
    Pending,
    Loaded(&'a Profile),
    /// The fetch failed; treated as "no roles, no branch".
    Failed,
}

/// What the screen must do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "to")]
pub enum GuardDecision {
    /// Block rendering until loading completes.
    Pending,
    Render,
    Redirect(Screen),
}

/// Decide whether `screen` may render for the given session and profile.
///
/// A redirect to `screen` itself collapses to `Render`, so re-running the
/// guard after a redirect settles instead of looping.
pub fn guard_screen(screen: Screen, auth: AuthPhase, profile: ProfileState<'_>) -> GuardDecision {
    let decision = match auth {
        AuthPhase::Loading => GuardDecision::Pending,
        AuthPhase::SignedOut if screen == Screen::Login => GuardDecision::Render,
        AuthPhase::SignedOut => GuardDecision::Redirect(Screen::Login),
        AuthPhase::SignedIn => match profile {
            ProfileState::Pending => GuardDecision::Pending,
            ProfileState::Loaded(profile) => signed_in(screen, profile),
            ProfileState::Failed => signed_in(screen, &Profile::unassigned()),
        },
    };

    match decision {
        GuardDecision::Redirect(target) if target == screen => GuardDecision::Render,
        other => other,
    }
}

fn signed_in(screen: Screen, profile: &Profile) -> GuardDecision {
    let destination = profile.destination();
    match screen {
        Screen::Login => GuardDecision::Redirect(destination),
        // Reachable by any signed-in user (profile edits, manual setup).
        Screen::Setup => GuardDecision::Render,
        Screen::Invites => {
            if destination != Screen::AdminDashboard {
                GuardDecision::Redirect(destination)
            } else if !profile.roles.is_super_admin() {
                GuardDecision::Redirect(Screen::AdminDashboard)
            } else {
                GuardDecision::Render
            }
        }
        s if s.is_admin_area() => {
            if destination == Screen::AdminDashboard {
                GuardDecision::Render
            } else {
                GuardDecision::Redirect(destination)
            }
        }
        Screen::StudentPortal => {
            if destination == Screen::StudentPortal {
                GuardDecision::Render
            } else {
                GuardDecision::Redirect(destination)
            }
        }
        _ => GuardDecision::Redirect(destination),
    }
}
