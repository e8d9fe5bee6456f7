//! Page controller wiring the session, guards, notices and navigation.
//!
//! SYSTEM CONTEXT
//! ==============
//! One [`Storefront`] exists per page. It performs the single page-ready
//! refresh and owns the account flows (login, logout, registration,
//! password change) that report through notices and delayed redirects.
//!
//! DESIGN
//! ======
//! Login never writes the session directly: after the server accepts the
//! credentials, a refresh re-reads the identity, so refresh and clear remain
//! the only writers.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::rc::Rc;

use crate::config::ClientConfig;
use crate::net::api;
use crate::net::request::{RequestClient, Transport};
use crate::net::types::{ApiResponse, ChangePasswordRequest, RegisterRequest, RequestError};
use crate::state::session::SessionCache;
use crate::util::guard::AccessGuard;
use crate::util::location::{Location, REDIRECT_PARAM, safe_redirect_target};
use crate::util::nav::{self, NavFragment};
use crate::util::notify::{NoticeSink, NotificationService, Severity};
use crate::util::schedule::Scheduler;

pub const LOGGED_OUT_MESSAGE: &str = "Logged out";
pub const LOGOUT_FAILED_MESSAGE: &str = "Logout failed";
pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const REGISTER_SUCCESS_MESSAGE: &str = "Registration successful, please log in";
pub const REGISTER_FAILED_MESSAGE: &str = "Registration failed";
pub const PASSWORD_CHANGED_MESSAGE: &str = "Password changed";
pub const PASSWORD_CHANGE_FAILED_MESSAGE: &str = "Password change failed";

/// Result of [`Storefront::logout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// Server ended the session; local state cleared, redirect scheduled.
    LoggedOut,
    /// Server answered `success: false`; local state left untouched.
    Rejected { message: Option<String> },
    /// No usable response; local state left untouched.
    Failed,
}

/// Result of an account form submission (login, register, password change).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Accepted,
    Rejected { message: String },
    Failed,
}

pub struct Storefront {
    config: ClientConfig,
    client: RequestClient,
    session: SessionCache,
    notices: NotificationService,
    guard: AccessGuard,
    scheduler: Rc<dyn Scheduler>,
    location: Rc<dyn Location>,
}

impl Storefront {
    #[must_use]
    pub fn new(
        config: ClientConfig,
        transport: Rc<dyn Transport>,
        scheduler: Rc<dyn Scheduler>,
        location: Rc<dyn Location>,
        sink: Rc<dyn NoticeSink>,
    ) -> Self {
        let client = RequestClient::new(transport);
        let session = SessionCache::new(client.clone(), config.api_base.clone());
        let notices = NotificationService::new(scheduler.clone(), sink, config.notice_ttl, config.max_notices);
        let guard = AccessGuard::new(
            session.clone(),
            notices.clone(),
            scheduler.clone(),
            location.clone(),
            config.routes.clone(),
            config.redirect_delay,
        );
        Self { config, client, session, notices, guard, scheduler, location }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    #[must_use]
    pub fn session(&self) -> &SessionCache {
        &self.session
    }

    #[must_use]
    pub fn guard(&self) -> &AccessGuard {
        &self.guard
    }

    #[must_use]
    pub fn notices(&self) -> &NotificationService {
        &self.notices
    }

    /// The page-ready hook: exactly one refresh.
    pub async fn on_ready(&self) -> bool {
        self.session.refresh().await
    }

    /// Navigation for the current session state.
    #[must_use]
    pub fn navbar(&self) -> NavFragment {
        let identity = self.session.get();
        nav::render_with_routes(identity.as_deref(), &self.config.routes)
    }

    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.location.query_param(name)
    }

    /// End the session on the server, then locally.
    ///
    /// A `success: false` answer leaves the cached identity as it was, with no
    /// notice and no redirect.
    pub async fn logout(&self) -> LogoutOutcome {
        match api::logout(&self.client, &self.config.api_base).await {
            Ok(envelope) if envelope.success => {
                self.notices.show_message(LOGGED_OUT_MESSAGE, Severity::Success);
                self.session.clear();
                self.redirect_later(self.config.routes.home.clone());
                LogoutOutcome::LoggedOut
            }
            Ok(envelope) => {
                tracing::warn!(message = envelope.message_or(""), "logout rejected");
                LogoutOutcome::Rejected { message: envelope.message }
            }
            Err(e) => {
                tracing::warn!(error = %e, "logout failed");
                self.notices.show_message(LOGOUT_FAILED_MESSAGE, Severity::Error);
                LogoutOutcome::Failed
            }
        }
    }

    /// Submit credentials. On success the identity is re-read and the page
    /// returns to `?redirect=` when it names a local path, else home.
    pub async fn login(&self, username: &str, password: &str) -> FormOutcome {
        let result = api::login(&self.client, &self.config.api_base, username, password).await;
        let outcome = self.report(result, LOGIN_FAILED_MESSAGE);
        if outcome != FormOutcome::Accepted {
            return outcome;
        }

        if !self.session.refresh().await {
            tracing::warn!(%username, "login accepted but no session established");
        }
        self.notices.show_message(LOGIN_SUCCESS_MESSAGE, Severity::Success);
        let target = self
            .query_param(REDIRECT_PARAM)
            .and_then(|raw| safe_redirect_target(&raw).map(str::to_owned))
            .unwrap_or_else(|| self.config.routes.home.clone());
        self.redirect_later(target);
        FormOutcome::Accepted
    }

    /// Create an account, then head for the login view.
    pub async fn register(&self, username: &str, password: &str, email: &str) -> FormOutcome {
        let request = RegisterRequest { username, password, email };
        let result = api::register(&self.client, &self.config.api_base, &request).await;
        let outcome = self.report(result, REGISTER_FAILED_MESSAGE);
        if outcome == FormOutcome::Accepted {
            self.notices.show_message(REGISTER_SUCCESS_MESSAGE, Severity::Success);
            self.redirect_later(self.config.routes.login.clone());
        }
        outcome
    }

    pub async fn change_password(&self, old_password: &str, new_password: &str) -> FormOutcome {
        let request = ChangePasswordRequest { old_password, new_password };
        let result = api::change_password(&self.client, &self.config.api_base, &request).await;
        let outcome = self.report(result, PASSWORD_CHANGE_FAILED_MESSAGE);
        if outcome == FormOutcome::Accepted {
            self.notices.show_message(PASSWORD_CHANGED_MESSAGE, Severity::Success);
        }
        outcome
    }

    /// Shared failure reporting for form submissions.
    fn report(&self, result: Result<ApiResponse, RequestError>, fallback: &str) -> FormOutcome {
        match result {
            Ok(envelope) if envelope.success => FormOutcome::Accepted,
            Ok(envelope) => {
                let message = envelope.message_or(fallback).to_owned();
                self.notices.show_message(message.clone(), Severity::Error);
                FormOutcome::Rejected { message }
            }
            Err(e) => {
                tracing::warn!(error = %e, "form submission failed");
                self.notices.show_message(fallback, Severity::Error);
                FormOutcome::Failed
            }
        }
    }

    fn redirect_later(&self, href: String) {
        let location = self.location.clone();
        self.scheduler
            .schedule(self.config.redirect_delay, Box::new(move || location.assign(&href)));
    }
}
