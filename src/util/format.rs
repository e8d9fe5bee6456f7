//! Display formatting shared by the storefront pages.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

/// Price in yuan with two decimals, e.g. `¥12.50`.
#[must_use]
pub fn format_price(amount: f64) -> String {
    format!("¥{amount:.2}")
}

/// Server timestamp (`2024-03-01T10:15:30.123`) as `2024-03-01 10:15:30`.
///
/// Only the first `T` is replaced; the result is cut to 19 characters.
#[must_use]
pub fn format_date(raw: &str) -> String {
    raw.replacen('T', " ", 1).chars().take(19).collect()
}
