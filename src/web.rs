//! Browser entry points.
//!
//! SYSTEM CONTEXT
//! ==============
//! The module start hook builds the page's single [`Storefront`] on real
//! timers, `fetch` and `window.location`, mounts the navbar and runs the
//! page-ready refresh. Page scripts reach the guards and helpers through the
//! exported functions below.

use std::rc::Rc;

use wasm_bindgen::prelude::wasm_bindgen;

use crate::app::{FormOutcome, LogoutOutcome, Storefront};
use crate::config::ClientConfig;
use crate::net::browser::BrowserTransport;
use crate::util::browser::{BrowserLocation, DomNoticeSink, mount_navbar};
use crate::util::format;
use crate::util::notify::Severity;
use crate::util::schedule::TimeoutScheduler;

thread_local! {
    static STOREFRONT: Rc<Storefront> = Rc::new(Storefront::new(
        ClientConfig::default(),
        Rc::new(BrowserTransport),
        Rc::new(TimeoutScheduler),
        Rc::new(BrowserLocation),
        Rc::new(DomNoticeSink),
    ));
}

fn storefront() -> Rc<Storefront> {
    STOREFRONT.with(Rc::clone)
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let page = storefront();
    mount_navbar(page.session(), || {
        wasm_bindgen_futures::spawn_local(async {
            storefront().logout().await;
        });
    });
    wasm_bindgen_futures::spawn_local(async move {
        page.on_ready().await;
    });
}

#[wasm_bindgen(js_name = requireLogin)]
pub async fn require_login() -> bool {
    storefront().guard().require_login().await
}

#[wasm_bindgen(js_name = requireAdmin)]
pub async fn require_admin() -> bool {
    storefront().guard().require_admin().await
}

#[wasm_bindgen]
pub async fn logout() -> bool {
    matches!(storefront().logout().await, LogoutOutcome::LoggedOut)
}

#[wasm_bindgen]
pub async fn login(username: String, password: String) -> bool {
    storefront().login(&username, &password).await == FormOutcome::Accepted
}

#[wasm_bindgen(js_name = getUrlParam)]
#[must_use]
pub fn get_url_param(name: &str) -> Option<String> {
    storefront().query_param(name)
}

/// Current identity as a JSON string, or `undefined` when signed out.
#[wasm_bindgen(js_name = currentUser)]
#[must_use]
pub fn current_user() -> Option<String> {
    let identity = storefront().session().get()?;
    serde_json::to_string(&*identity).ok()
}

#[wasm_bindgen(js_name = showMessage)]
pub fn show_message(text: &str, severity: Option<String>) {
    let severity = match severity.as_deref() {
        Some("success") => Severity::Success,
        Some("warning") => Severity::Warning,
        Some("error") => Severity::Error,
        _ => Severity::Info,
    };
    storefront().notices().show_message(text, severity);
}

#[wasm_bindgen(js_name = formatPrice)]
#[must_use]
pub fn format_price(amount: f64) -> String {
    format::format_price(amount)
}

#[wasm_bindgen(js_name = formatDate)]
#[must_use]
pub fn format_date(raw: &str) -> String {
    format::format_date(raw)
}
