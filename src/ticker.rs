//! Ticker code canonicalization.
//!
//! Persisted ticker codes are always the prefix-free 6-digit numeric form.
//! The market prefix is a presentation/query detail: it is stripped on the
//! way in and re-derived on demand for the quote-fetch collaborator.

use serde::{Deserialize, Serialize};

/// Exchange a ticker trades on, derived from its leading digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Market {
    Shanghai,
    Shenzhen,
}

impl Market {
    /// The lowercase prefix quote providers expect (`sh` / `sz`).
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Shanghai => "sh",
            Self::Shenzhen => "sz",
        }
    }
}

/// Strip an optional `sh`/`sz` market prefix and surrounding whitespace.
///
/// ```
/// use watchlist_sync::ticker;
///
/// assert_eq!(ticker::normalize("sh600000"), "600000");
/// assert_eq!(ticker::normalize("600000"), "600000");
/// ```
#[must_use]
pub fn normalize(code: &str) -> String {
    let trimmed = code.trim();
    let stripped = trimmed
        .strip_prefix("sh")
        .or_else(|| trimmed.strip_prefix("sz"))
        .unwrap_or(trimmed);
    stripped.to_string()
}

/// A valid persisted code is exactly six ASCII digits.
#[must_use]
pub fn is_valid(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Codes starting with `6` are Shanghai-market, everything else Shenzhen.
#[must_use]
pub fn market(code: &str) -> Market {
    if code.starts_with('6') {
        Market::Shanghai
    } else {
        Market::Shenzhen
    }
}

/// Re-derive the prefixed form a quote provider queries with.
#[must_use]
pub fn prefixed(code: &str) -> String {
    format!("{}{}", market(code).prefix(), code)
}
