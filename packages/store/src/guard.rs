//! Route gating on the session state.

use crate::routes;
use crate::session::SessionState;

/// Which side of authentication a route belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Only for signed-in users; others go to sign-in.
    Private,
    /// Only for anonymous users; signed-in users go to the dashboard.
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving: show a busy indicator, never redirect.
    Busy,
    Render,
    Redirect(&'static str),
}

impl Guard {
    pub fn decide(self, session: &SessionState) -> GuardDecision {
        if session.loading {
            return GuardDecision::Busy;
        }
        match (self, session.user.is_some()) {
            (Guard::Private, false) => GuardDecision::Redirect(routes::SIGNIN),
            (Guard::Public, true) => GuardDecision::Redirect(routes::DASHBOARD),
            _ => GuardDecision::Render,
        }
    }
}

/// Decision for `/`: wait, then send the visitor to the right side.
pub fn home_redirect(session: &SessionState) -> GuardDecision {
    if session.loading {
        GuardDecision::Busy
    } else if session.user.is_some() {
        GuardDecision::Redirect(routes::DASHBOARD)
    } else {
        GuardDecision::Redirect(routes::SIGNIN)
    }
}
