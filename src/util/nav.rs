//! Identity-dependent navigation fragment.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`render`] is pure: it maps the current identity (or none) to a
//! [`NavFragment`] and touches neither the network nor the DOM. The browser
//! adapter in `util::browser` writes the fragment into the page after every
//! session transition.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use std::fmt;

use crate::config::Routes;
use crate::net::types::Identity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavItem {
    Greeting { username: String },
    Link { href: String, label: &'static str, admin_only: bool },
    Logout,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavFragment {
    pub items: Vec<NavItem>,
}

/// Render with the default storefront routes.
#[must_use]
pub fn render(identity: Option<&Identity>) -> NavFragment {
    render_with_routes(identity, &Routes::default())
}

#[must_use]
pub fn render_with_routes(identity: Option<&Identity>, routes: &Routes) -> NavFragment {
    let Some(identity) = identity else {
        return NavFragment {
            items: vec![link(&routes.login, "Login", false), link(&routes.register, "Register", false)],
        };
    };

    let mut items = vec![NavItem::Greeting { username: identity.username.clone() }];
    if identity.is_admin() {
        items.push(link(&routes.admin, "Admin", true));
    }
    items.push(link(&routes.orders, "My Orders", false));
    items.push(link(&routes.cart, "Cart", false));
    items.push(NavItem::Logout);
    NavFragment { items }
}

fn link(href: &str, label: &'static str, admin_only: bool) -> NavItem {
    NavItem::Link { href: href.to_owned(), label, admin_only }
}

impl NavFragment {
    #[must_use]
    pub fn admin_only_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, NavItem::Link { admin_only: true, .. }))
            .count()
    }

    #[must_use]
    pub fn has_logout(&self) -> bool {
        self.items.contains(&NavItem::Logout)
    }

    /// HTML for the navbar container. Interpolated text is escaped.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.items
            .iter()
            .map(|item| match item {
                NavItem::Greeting { username } => format!("<span>Welcome, {}</span>", escape_html(username)),
                NavItem::Link { href, label, admin_only } => {
                    let marker = if *admin_only { r#" data-admin-only="true""# } else { "" };
                    format!(r#"<a href="{}"{marker}>{}</a>"#, escape_html(href), escape_html(label))
                }
                NavItem::Logout => r##"<a href="#" data-action="logout">Logout</a>"##.to_owned(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One-line text form, e.g. `Welcome, alice | My Orders | Cart | Logout`.
impl fmt::Display for NavFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .items
            .iter()
            .map(|item| match item {
                NavItem::Greeting { username } => format!("Welcome, {username}"),
                NavItem::Link { label, .. } => (*label).to_owned(),
                NavItem::Logout => "Logout".to_owned(),
            })
            .collect();
        f.write_str(&parts.join(" | "))
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
