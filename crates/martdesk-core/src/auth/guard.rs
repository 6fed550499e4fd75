use tracing::debug;

use crate::models::Role;
use crate::nav::{Page, LANDING_PAGE, LOGIN_PATH};

use super::{Session, SessionStore};

/// What a protected view should do right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Verification pending; show a placeholder
    Loading,
    Render,
    /// Not authenticated
    RedirectToLogin,
    /// Authenticated but missing the required role
    RedirectToLanding,
}

impl GuardDecision {
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            GuardDecision::RedirectToLogin => Some(LOGIN_PATH),
            GuardDecision::RedirectToLanding => Some(LANDING_PAGE.path()),
            GuardDecision::Loading | GuardDecision::Render => None,
        }
    }
}

/// Gate in front of protected content.
pub struct RouteGuard {
    session: SessionStore,
    allowed: Option<Vec<Role>>,
}

impl RouteGuard {
    /// Guard that only requires an authenticated session
    pub fn new(session: SessionStore) -> Self {
        Self {
            session,
            allowed: None,
        }
    }

    pub fn require_role(mut self, role: Role) -> Self {
        self.allowed = Some(vec![role]);
        self
    }

    /// Use the roles `page` is visible to
    pub fn for_page(mut self, page: Page) -> Self {
        self.allowed = Some(page.allowed_roles().to_vec());
        self
    }

    /// Decision without touching the network. Reports `Loading` until the
    /// session's first verification has resolved.
    pub fn current(&self) -> GuardDecision {
        if self.session.is_loading() {
            return GuardDecision::Loading;
        }
        self.decide(&self.session.session())
    }

    /// Verify the session if needed, then decide.
    pub async fn resolve(&self) -> GuardDecision {
        if !self.session.is_authenticated() {
            self.session.check_auth().await;
        }
        let decision = self.decide(&self.session.session());
        debug!(?decision, "Route guard resolved");
        decision
    }

    fn decide(&self, session: &Session) -> GuardDecision {
        if !session.is_authenticated {
            return GuardDecision::RedirectToLogin;
        }
        match (&self.allowed, session.user.as_ref()) {
            (None, _) => GuardDecision::Render,
            (Some(roles), Some(user)) if roles.contains(&user.role) => GuardDecision::Render,
            (Some(_), _) => GuardDecision::RedirectToLanding,
        }
    }
}
