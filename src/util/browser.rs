//! DOM adapters for the browser build.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything here is glue between the portable core and `web-sys`: the page
//! location, a notice sink that renders `<div class="message ...">` elements,
//! and the navbar mount that re-renders on every session transition.
//!
//! ERROR HANDLING
//! ==============
//! DOM calls that fail (missing window, missing element) are skipped. The
//! page keeps working without the affected decoration.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::state::session::SessionCache;

use super::location::Location;
use super::nav;
use super::notify::{Notice, NoticeSink};

/// Element id the navbar fragment is written into.
pub const NAVBAR_ELEMENT_ID: &str = "navbar-user";

fn document() -> Option<web_sys::Document> {
    web_sys::window().and_then(|w| w.document())
}

// =============================================================================
// LOCATION
// =============================================================================

/// `window.location`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserLocation;

impl Location for BrowserLocation {
    fn path_and_query(&self) -> String {
        let Some(window) = web_sys::window() else {
            return String::new();
        };
        let location = window.location();
        let path = location.pathname().unwrap_or_default();
        let search = location.search().unwrap_or_default();
        format!("{path}{search}")
    }

    fn search(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default()
    }

    fn assign(&self, href: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if window.location().set_href(href).is_err() {
            tracing::warn!(%href, "navigation failed");
        }
    }
}

// =============================================================================
// NOTICES
// =============================================================================

/// Appends one element per notice to `<body>` and removes it on dismissal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomNoticeSink;

impl NoticeSink for DomNoticeSink {
    fn show(&self, notice: &Notice) {
        let Some(document) = document() else {
            return;
        };
        let (Ok(element), Some(body)) = (document.create_element("div"), document.body()) else {
            return;
        };
        element.set_class_name(&notice.severity.css_class());
        // Dismissal finds the element by this attribute.
        if element.set_attribute("data-notice-id", &notice.id.to_string()).is_err() {
            tracing::warn!(id = notice.id, "notice not rendered");
            return;
        }
        element.set_text_content(Some(&notice.text));
        let _ = body.append_child(&element);
    }

    fn dismiss(&self, id: u64) {
        let Some(document) = document() else {
            return;
        };
        let selector = format!(r#"[data-notice-id="{id}"]"#);
        if let Ok(Some(element)) = document.query_selector(&selector) {
            element.remove();
        }
    }
}

// =============================================================================
// NAVBAR
// =============================================================================

/// Keep `#navbar-user` in sync with `session` and route clicks on the logout
/// link to `on_logout`. Does nothing when the page has no navbar.
pub fn mount_navbar(session: &SessionCache, on_logout: impl Fn() + 'static) {
    let Some(container) = document().and_then(|d| d.get_element_by_id(NAVBAR_ELEMENT_ID)) else {
        tracing::debug!("no navbar on this page");
        return;
    };

    container.set_inner_html(&nav::render(session.get().as_deref()).to_html());

    let target = container.clone();
    session.subscribe(move |identity| target.set_inner_html(&nav::render(identity).to_html()));

    let on_logout = Rc::new(on_logout);
    let on_click = Closure::wrap(Box::new(move |event: web_sys::Event| {
        let clicked_logout = event
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .and_then(|el| el.closest(r#"[data-action="logout"]"#).ok().flatten())
            .is_some();
        if clicked_logout {
            event.prevent_default();
            on_logout();
        }
    }) as Box<dyn FnMut(web_sys::Event)>);

    if container
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        .is_ok()
    {
        // The navbar lives as long as the page.
        on_click.forget();
    }
}
