//! Gates for protected actions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages call [`AccessGuard::require_login`] / [`AccessGuard::require_admin`]
//! before protected actions. A denial shows a notice and schedules a redirect;
//! real access control stays on the server.
//!
//! DESIGN
//! ======
//! A cached identity answers immediately with no round trip. An empty cache
//! gets exactly one refresh before deciding, which covers a guard running
//! before the page-load refresh has finished. Two guards racing on an empty
//! cache each refresh independently.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::rc::Rc;
use std::time::Duration;

use crate::config::Routes;
use crate::state::session::SessionCache;

use super::location::{Location, login_redirect_href};
use super::notify::{NotificationService, Severity};
use super::schedule::{ScheduledTask, Scheduler};

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in first";
pub const ADMIN_REQUIRED_MESSAGE: &str = "Administrator access required";

#[derive(Clone)]
pub struct AccessGuard {
    session: SessionCache,
    notices: NotificationService,
    scheduler: Rc<dyn Scheduler>,
    location: Rc<dyn Location>,
    routes: Routes,
    redirect_delay: Duration,
}

impl AccessGuard {
    #[must_use]
    pub fn new(
        session: SessionCache,
        notices: NotificationService,
        scheduler: Rc<dyn Scheduler>,
        location: Rc<dyn Location>,
        routes: Routes,
        redirect_delay: Duration,
    ) -> Self {
        Self { session, notices, scheduler, location, routes, redirect_delay }
    }

    /// `true` if someone is signed in. Otherwise warns and heads for the login
    /// view, carrying the current path so login can come back here.
    pub async fn require_login(&self) -> bool {
        if self.session.is_signed_in() {
            return true;
        }
        if self.session.refresh().await {
            return true;
        }

        let current = self.location.path_and_query();
        tracing::warn!(path = %current, "login required");
        self.notices.show_message(LOGIN_REQUIRED_MESSAGE, Severity::Warning);
        self.redirect_later(login_redirect_href(&self.routes.login, &current));
        false
    }

    /// `true` if an admin is signed in. A signed-in non-admin is sent home.
    pub async fn require_admin(&self) -> bool {
        if !self.require_login().await {
            return false;
        }

        let Some(identity) = self.session.get() else {
            return false;
        };
        if identity.is_admin() {
            return true;
        }

        tracing::warn!(username = %identity.username, "admin required");
        self.notices.show_message(ADMIN_REQUIRED_MESSAGE, Severity::Error);
        self.redirect_later(self.routes.home.clone());
        false
    }

    fn redirect_later(&self, href: String) -> ScheduledTask {
        let location = self.location.clone();
        self.scheduler
            .schedule(self.redirect_delay, Box::new(move || location.assign(&href)))
    }
}
